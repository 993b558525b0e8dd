use thiserror::Error;

/// Represents all errors that can occur during scanning or parsing.
///
/// Any of these aborts the line being parsed; the tokens left on that line
/// are discarded.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// The scanner could not form a token.
    #[error("Error on line {line}: Unrecognized input '{text}'.")]
    ScanError {
        /// The offending source text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Found a token the grammar does not allow at this point.
    #[error("Error on line {line}: Unexpected {token}.")]
    UnexpectedToken {
        /// A description of the token encountered.
        token: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The line ended while an operand or operator was still expected.
    #[error("Error on line {line}: Unexpected end of line.")]
    UnexpectedEndOfLine {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A closing delimiter was expected but something else was found.
    #[error("Error on line {line}: Expected '{delimiter}', found {found}.")]
    ExpectedClosing {
        /// The delimiter that was expected.
        delimiter: char,
        /// A description of what was found instead.
        found:     String,
        /// The source line where the error occurred.
        line:      usize,
    },
    /// The left side of `=` is neither a variable nor an indexed variable.
    #[error("Error on line {line}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A literal could not be turned into a value.
    #[error("Error on line {line}: Invalid literal '{text}'.")]
    InvalidLiteral {
        /// The literal text.
        text: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An `op` definition was malformed.
    #[error("Error on line {line}: Invalid operator definition: {details}.")]
    InvalidOperatorDefinition {
        /// What was wrong with the definition.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Operators, parentheses or brackets nest deeper than the configured
    /// limit.
    #[error("Error on line {line}: Expression nests deeper than {limit} levels.")]
    NestingTooDeep {
        /// The nesting limit in force.
        limit: usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A `)` command was unknown or had a bad argument.
    #[error("Error on line {line}: Invalid special command: {details}.")]
    InvalidSpecialCommand {
        /// What was wrong with the command.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
}
