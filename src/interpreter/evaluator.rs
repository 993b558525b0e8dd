/// Core evaluation logic and context management.
///
/// Contains the runtime context, the operator registries and the main
/// expression dispatch.
pub mod core;

/// Variable lookup, assignment and scope handling.
pub mod utils;

/// Unary operator evaluation logic.
///
/// Implements the scalar unary operators and the structural ones: `iota`,
/// `rho`, ravel, `transp` and reductions.
pub mod unary;

/// Binary operator evaluation logic.
///
/// Handles arithmetic, comparisons, logic, catenation and reshape across
/// scalars, vectors and matrices.
pub mod binary;

/// Indexed reads and indexed assignment.
pub mod index;

/// Calls of user-defined operators.
///
/// Binds parameters in a fresh scope and evaluates the operator body.
pub mod function;
