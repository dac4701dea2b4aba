//! Error types for tracked optionals

use thiserror::Error;

use crate::kind::{Kind, Policy};

/// Main error type for chainopt operations.
///
/// `Absent` is the only recoverable variant. Every other variant signals a
/// caller defect and is raised as a panic by the non-`try_` entry points.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TrackError {
    /// The optional (or handle) holds nothing usable right now
    #[error("optional value is absent")]
    Absent,

    /// A "present" optional was constructed from an already-absent value
    #[error("cannot construct a present optional from an absent {kind} ({policy} tracking)")]
    AbsentAtConstruction {
        /// Policy the value was classified with
        policy: Policy,
        /// Kind of the rejected value
        kind: Kind,
    },

    /// The introspection adapter could not inspect the value
    #[error("value cannot be inspected: {kind}")]
    Uninspectable {
        /// Kind reported for the offending value or its first target
        kind: Kind,
    },

    /// The reference chain leads back to a pointer already walked
    #[error("reference chain is cyclic (revisited a pointer after {depth} hops)")]
    CyclicChain {
        /// Number of hops walked before the repeat was found
        depth: usize,
    },

    /// `unwrap`/`expect` on an absent optional
    #[error("{0}")]
    UnwrapAbsent(String),
}

impl TrackError {
    /// Whether this error belongs to the non-recoverable class.
    pub fn is_fatal(&self) -> bool {
        !matches!(self, TrackError::Absent)
    }
}

/// Result type alias for chainopt operations
pub type Result<T> = std::result::Result<T, TrackError>;

/// Raise a fatal error as a panic at the caller's location.
#[track_caller]
pub(crate) fn raise(err: TrackError) -> ! {
    tracing::error!(error = %err, "fatal optional misuse");
    panic!("{}", err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_absent_is_recoverable() {
        assert!(!TrackError::Absent.is_fatal());
        assert!(TrackError::CyclicChain { depth: 2 }.is_fatal());
        assert!(TrackError::UnwrapAbsent("x".into()).is_fatal());
    }

    #[test]
    fn test_construction_message_names_kind_and_policy() {
        let err = TrackError::AbsentAtConstruction {
            policy: Policy::Shallow,
            kind: Kind::Map,
        };
        assert_eq!(
            err.to_string(),
            "cannot construct a present optional from an absent map (shallow tracking)"
        );
    }
}
