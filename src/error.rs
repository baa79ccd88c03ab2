//! Error taxonomy for the search engine.
//!
//! Heuristic rejections (low scores, X-drop exhaustion, failed identity gates)
//! are not errors and never show up here. Everything in this module is fatal
//! for the run that produced it.

use thiserror::Error;

/// Result type alias for engine operations
pub type Result<T> = std::result::Result<T, SaltError>;

/// Coarse classification used by the CLI to pick an exit message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad configuration, detected at startup and never retried
    Configuration,
    /// A buffer would exceed its maximum representable size
    ResourceExhaustion,
    /// Internal consistency violation (a defect, not bad input)
    Internal,
    /// The job was cancelled because a sibling job failed
    Cancelled,
    /// Reading inputs or writing outputs failed
    Io,
}

/// Error type for seed indexing, matching and alignment
#[derive(Error, Debug)]
pub enum SaltError {
    /// Seed code does not fit a 64-bit word
    #[error(
        "seed shape '{shape}' needs {bits} bits ({weight} letters x {bits_per_letter} bits), \
         but a seed code holds at most 64"
    )]
    SeedTooWide {
        /// Shape pattern
        shape: String,
        /// Number of informative positions
        weight: usize,
        /// Bits used per reduced letter
        bits_per_letter: u32,
        /// Total bits required
        bits: usize,
    },

    /// Seed shape pattern could not be parsed
    #[error("invalid seed shape '{shape}': {reason}")]
    InvalidShape {
        /// Shape pattern as given
        shape: String,
        /// Explanation of the problem
        reason: String,
    },

    /// Invalid parameter value
    #[error("invalid parameter '{parameter}': {reason}")]
    InvalidParameter {
        /// The parameter name
        parameter: String,
        /// Explanation of why it's invalid
        reason: String,
    },

    /// The reference set does not hold the sequence type the search mode needs
    #[error("{mode} searches need {expected} references, but the reference set holds {found} sequences")]
    IncompatibleSequenceType {
        /// Search mode name
        mode: String,
        /// Sequence type the mode needs
        expected: String,
        /// Sequence type found
        found: String,
    },

    /// A seed bucket outgrew its maximum size
    #[error(
        "seed bucket would hold {requested} entries, more than the maximum of {max}; \
         re-run with more chunks"
    )]
    CapacityExceeded {
        /// Entries requested
        requested: usize,
        /// Maximum representable entries
        max: usize,
    },

    /// A field does not fit its slot in the packed location word
    #[error("seed location {field} = {value} is out of range (must be < {limit})")]
    LocationOutOfRange {
        /// Which field overflowed
        field: &'static str,
        /// Offending value
        value: u64,
        /// Exclusive upper bound
        limit: u64,
    },

    /// Internal consistency violation
    #[error("internal consistency error: {0}")]
    InvariantViolation(String),

    /// Job was cancelled after a sibling failed
    #[error("search cancelled")]
    Cancelled,

    /// I/O failure
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl SaltError {
    /// Shorthand for `InvalidParameter`
    pub fn invalid_parameter(parameter: &str, reason: impl Into<String>) -> Self {
        SaltError::InvalidParameter {
            parameter: parameter.to_string(),
            reason: reason.into(),
        }
    }

    /// Which part of the error taxonomy this error belongs to
    pub fn kind(&self) -> ErrorKind {
        match self {
            SaltError::SeedTooWide { .. }
            | SaltError::InvalidShape { .. }
            | SaltError::InvalidParameter { .. }
            | SaltError::IncompatibleSequenceType { .. } => ErrorKind::Configuration,
            SaltError::CapacityExceeded { .. } => ErrorKind::ResourceExhaustion,
            SaltError::LocationOutOfRange { .. } | SaltError::InvariantViolation(_) => {
                ErrorKind::Internal
            }
            SaltError::Cancelled => ErrorKind::Cancelled,
            SaltError::Io(_) => ErrorKind::Io,
        }
    }
}
