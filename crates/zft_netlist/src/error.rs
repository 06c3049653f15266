//! Errors raised while reading a netlist.

use zft_common::InternalError;

/// Errors that can occur when loading a `.net` file.
///
/// Line numbers are 1-based and point at the offending line.
#[derive(Debug, thiserror::Error)]
pub enum NetlistError {
    /// The file could not be read.
    #[error("failed to read netlist: {0}")]
    Io(#[from] std::io::Error),

    /// A block started with something other than `.input`, `.output`, `.clb` or `.global`.
    #[error("line {line}: unknown element type '{keyword}'")]
    UnknownBlockType {
        /// 1-based line number.
        line: usize,
        /// The unrecognized keyword.
        keyword: String,
    },

    /// A block header had no name.
    #[error("line {line}: no block name specified")]
    MissingName {
        /// 1-based line number.
        line: usize,
    },

    /// A block had the wrong number of lines.
    #[error("line {line}: unexpected number of lines for {kind} block (expected {expected}, found {found})")]
    LineCount {
        /// 1-based line number of the block header.
        line: usize,
        /// Block keyword.
        kind: &'static str,
        /// Description of the expected count.
        expected: &'static str,
        /// Actual number of lines.
        found: usize,
    },

    /// A line did not start with the keyword required at that point.
    #[error("line {line}: unknown keyword '{found}', expected '{expected}'")]
    ExpectedKeyword {
        /// 1-based line number.
        line: usize,
        /// The required keyword.
        expected: &'static str,
        /// What was found instead.
        found: String,
    },

    /// A `pinlist:` or `subblock:` line had nothing after the keyword.
    #[error("line {line}: at least one pin must be given")]
    EmptyPinlist {
        /// 1-based line number.
        line: usize,
    },

    /// Two blocks share a name.
    #[error("line {line}: block name '{name}' already given")]
    DuplicateBlock {
        /// 1-based line number.
        line: usize,
        /// The repeated name.
        name: String,
    },

    /// Building the netlist broke an invariant.
    #[error(transparent)]
    Internal(#[from] InternalError),
}
