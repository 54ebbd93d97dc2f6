//! Simulation-specific error types.
//!
//! Loaders and validation helpers return these through [`SimResult`]; the
//! runtime tick never propagates them. Callers log the error and fall back to
//! built-in data so a run is never blocked on a bad file.
//!
//! ## Usage
//!
//! ```text
//! let table = match WeaponConfigTable::load_from_path(path) {
//!     Ok(table) => table,
//!     Err(err) => {
//!         warn!("{err}; using built-in weapon table");
//!         WeaponConfigTable::default()
//!     }
//! };
//! ```

use std::fmt;

/// Top-level error enum for the survival simulation.
#[derive(Debug)]
pub enum SimError {
    /// A weapon kind name did not match any known weapon.
    UnknownWeaponKind {
        /// The name as it appeared in the data source.
        name: String,
    },

    /// A character kind name did not match any known character.
    UnknownCharacter {
        /// The name as it appeared in the request.
        name: String,
    },

    /// A chapter number outside the supported range was requested.
    UnknownChapter {
        /// The rejected chapter number.
        number: u32,
    },

    /// A data file could not be read from disk.
    DataFileUnreadable {
        /// Path that was attempted.
        path: String,
        /// Underlying I/O error, stringified.
        reason: String,
    },

    /// A data file was read but could not be parsed.
    DataFileMalformed {
        /// Path of the offending file.
        path: String,
        /// Parser message.
        reason: String,
    },

    /// A weapon entry parsed but carries values the simulation cannot use.
    InvalidWeaponConfig {
        /// Weapon kind name of the rejected entry.
        kind: String,
        /// Human-readable description of the rejected field.
        reason: String,
    },

    /// A data file parsed but contained no usable entries.
    EmptyWeaponTable {
        /// Path of the offending file.
        path: String,
    },
}

impl fmt::Display for SimError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimError::UnknownWeaponKind { name } => write!(f, "unknown weapon kind '{}'", name),
            SimError::UnknownCharacter { name } => write!(f, "unknown character '{}'", name),
            SimError::UnknownChapter { number } => {
                write!(f, "chapter {} does not exist (expected 1..=3)", number)
            }
            SimError::DataFileUnreadable { path, reason } => {
                write!(f, "could not read '{}': {}", path, reason)
            }
            SimError::DataFileMalformed { path, reason } => {
                write!(f, "could not parse '{}': {}", path, reason)
            }
            SimError::InvalidWeaponConfig { kind, reason } => {
                write!(f, "weapon '{}' rejected: {}", kind, reason)
            }
            SimError::EmptyWeaponTable { path } => {
                write!(f, "'{}' contains no usable weapon entries", path)
            }
        }
    }
}

impl std::error::Error for SimError {}

/// Convenience alias: a `Result` using `SimError` as the error type.
pub type SimResult<T> = Result<T, SimError>;

// ── Validation helpers ────────────────────────────────────────────────────────

/// Returns an error unless `value` is finite and strictly positive.
pub fn require_positive(kind: &str, field: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidWeaponConfig {
            kind: kind.to_string(),
            reason: format!("{} must be > 0 (got {})", field, value),
        })
    }
}

/// Returns an error unless `value` is finite and not negative.
pub fn require_non_negative(kind: &str, field: &'static str, value: f32) -> SimResult<()> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(SimError::InvalidWeaponConfig {
            kind: kind.to_string(),
            reason: format!("{} must be >= 0 (got {})", field, value),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_mentions_offending_value() {
        let err = SimError::UnknownWeaponKind {
            name: "flail".into(),
        };
        assert!(err.to_string().contains("flail"));

        let err = SimError::UnknownChapter { number: 9 };
        assert!(err.to_string().contains('9'));
    }

    #[test]
    fn validation_helpers_reject_bad_values() {
        assert!(require_positive("knife", "speed", 10.0).is_ok());
        assert!(require_positive("knife", "speed", 0.0).is_err());
        assert!(require_positive("knife", "speed", f32::NAN).is_err());
        assert!(require_non_negative("knife", "knockback", 0.0).is_ok());
        assert!(require_non_negative("knife", "knockback", -1.0).is_err());
    }
}
