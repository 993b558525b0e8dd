use thiserror::Error;

/// Parsing errors.
///
/// Defines all error types that can occur while scanning and parsing a line.
/// Parse errors include malformed tokens, unexpected tokens, missing
/// delimiters, bad operator definitions and unknown special commands.
pub mod parse_error;
/// Runtime errors.
///
/// Contains all error types that can be raised during evaluation. Runtime
/// errors include undefined names, kind mismatches, indexing violations and
/// arithmetic failures such as division by zero.
pub mod runtime_error;

pub use parse_error::ParseError;
pub use runtime_error::RuntimeError;

/// Any error that aborts a line.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// The line could not be scanned or parsed.
    #[error(transparent)]
    Parse(#[from] ParseError),
    /// The line failed during evaluation.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}
