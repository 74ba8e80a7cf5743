//! Errors raised while turning an option set into a configuration document.

use crate::lines::LineKind;
use thiserror::Error;

/// Fatal generation errors. Any of these aborts the whole pass; no partial
/// document is produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    /// A line in one of the multi-line blocks does not match its grammar.
    #[error("{kind} line {line_no} is malformed: {line:?}")]
    MalformedLine {
        kind: LineKind,
        /// 1-based position of the line inside its block.
        line_no: usize,
        line: String,
    },

    /// `http-socket` is neither `inet` nor `unix`.
    #[error("http-socket only supports values inet or unix, got {0:?}")]
    InvalidTransportKind(String),
}
