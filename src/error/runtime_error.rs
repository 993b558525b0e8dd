use thiserror::Error;

use crate::interpreter::value::core::Kind;

/// Represents all errors that can occur during evaluation.
///
/// An evaluation error aborts the rest of the line; assignments that
/// completed before it keep their effect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// Tried to read a variable that has no binding.
    #[error("Error on line {line}: Undefined variable '{name}'.")]
    UndefinedVariable {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The operator has no implementation for these operand kinds.
    #[error("Error on line {line}: Operator '{op}' is not defined for {kinds}.")]
    UndefinedOperator {
        /// The operator, as written in source.
        op:    String,
        /// The operand kinds, e.g. `string and map`.
        kinds: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// A vector literal element evaluated to a vector, matrix or map.
    #[error("Error on line {line}: Vector elements must be scalars, found {kind}.")]
    NonScalarVectorElement {
        /// The kind of the offending element.
        kind: Kind,
        /// The source line where the error occurred.
        line: usize,
    },
    /// An index fell outside the indexed value.
    #[error("Error on line {line}: Index {index} out of range for length {len}.")]
    IndexOutOfRange {
        /// The index as the user wrote it.
        index: String,
        /// The length of the indexed axis.
        len:   usize,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// An index was not an integer.
    #[error("Error on line {line}: Index {index} is not an integer.")]
    NonIntegerIndex {
        /// The index value.
        index: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// Two vectors that must pair up element by element differ in length.
    #[error("Error on line {line}: Length mismatch: expected {expected}, found {found}.")]
    LengthMismatch {
        /// The required length.
        expected: usize,
        /// The length that was supplied.
        found:    usize,
        /// The source line where the error occurred.
        line:     usize,
    },
    /// Two matrices that must pair up element by element differ in shape.
    #[error("Error on line {line}: Shape mismatch: {left} and {right}.")]
    ShapeMismatch {
        /// The left shape, space separated.
        left:  String,
        /// The right shape, space separated.
        right: String,
        /// The source line where the error occurred.
        line:  usize,
    },
    /// The value cannot be converted to the requested kind.
    #[error("Error on line {line}: Cannot convert {from} to {to}.")]
    ConversionError {
        /// The source kind.
        from: Kind,
        /// The requested kind.
        to:   Kind,
        /// The source line where the error occurred.
        line: usize,
    },
    /// Attempted division by zero.
    #[error("Error on line {line}: Division by zero.")]
    DivisionByZero {
        /// The source line where the error occurred.
        line: usize,
    },
    /// An operand lies outside the domain of the operator.
    #[error("Error on line {line}: Domain error: {details}.")]
    DomainError {
        /// What was out of the domain.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// Indexed assignment to a name with no binding.
    #[error("Error on line {line}: Cannot index unknown variable '{name}'.")]
    UnknownTarget {
        /// The name of the variable.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
    /// The target of an assignment cannot be written.
    #[error("Error on line {line}: Invalid assignment target.")]
    InvalidAssignmentTarget {
        /// The source line where the error occurred.
        line: usize,
    },
    /// A value had an unexpected or incompatible kind.
    #[error("Error on line {line}: Type error: {details}.")]
    TypeError {
        /// Details about the mismatch.
        details: String,
        /// The source line where the error occurred.
        line:    usize,
    },
    /// User operator calls nested too deeply.
    #[error("Error on line {line}: Recursion limit reached in '{name}'.")]
    RecursionLimit {
        /// The operator being called.
        name: String,
        /// The source line where the error occurred.
        line: usize,
    },
}
