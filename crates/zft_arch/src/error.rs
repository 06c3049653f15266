//! Errors raised while reading an architecture description.

/// Errors that can occur when loading an `.arch` file.
#[derive(Debug, thiserror::Error)]
pub enum ArchError {
    /// The file could not be read.
    #[error("failed to read architecture: {0}")]
    Io(#[from] std::io::Error),

    /// A numeric parameter had a non-numeric value.
    #[error("line {line}: expected a number but found '{value}'")]
    InvalidNumber {
        /// 1-based line number.
        line: usize,
        /// The offending token.
        value: String,
    },

    /// A keyword was present without its value.
    #[error("line {line}: '{key}' needs a value")]
    MissingValue {
        /// 1-based line number.
        line: usize,
        /// The keyword.
        key: String,
    },

    /// No usable `io_rat` was given.
    #[error("io_rat must be at least 1")]
    InvalidIoRate,
}
