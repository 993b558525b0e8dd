//! # ravel
//!
//! ravel is an interpreter for a small array language in the APL family.
//! Values are numbers on an exact numeric tower (integers of any size,
//! rationals, big floats), chars, strings, vectors, matrices and maps.
//! Operators are right associative with equal precedence, juxtaposed atoms
//! form vectors, and users can define their own unary and binary operators,
//! which changes how later input parses.

#![warn(
    clippy::redundant_clone,
    clippy::needless_pass_by_value,
    clippy::similar_names,
    clippy::large_enum_variant,
    clippy::string_lit_as_bytes,
    clippy::match_same_arms,
    clippy::cargo,
    clippy::nursery,
    clippy::perf,
    clippy::style,
    clippy::suspicious,
    clippy::correctness,
    clippy::complexity,
    clippy::pedantic,
    //missing_docs,
)]
#![allow(clippy::missing_errors_doc)]

use crate::{
    error::Error,
    interpreter::{evaluator::core::Context, parser::core::Parser, value::core::Value},
};

/// Defines the structure of parsed code.
///
/// This module declares the `Expr` enum and related types that represent the
/// syntactic structure of a line as a tree. The tree is built by the parser
/// and traversed by the evaluator.
///
/// # Responsibilities
/// - Defines expression and statement types for all language constructs.
/// - Renders trees as canonical source text and as a debug tree form.
/// - Attaches source lines to every node for error reporting.
pub mod ast;
/// Session configuration.
///
/// Holds the index origin, float precision, recursion limit and debug
/// toggles shared by the parser and evaluator.
pub mod config;
/// Provides unified error types for parsing and evaluation.
///
/// This module defines all errors that can be raised while scanning,
/// parsing or evaluating a line. Every error carries the source line it
/// refers to.
///
/// # Responsibilities
/// - Defines error enums for every failure mode (scanner, parser,
///   evaluator).
/// - Formats messages as `Error on line N: ...`.
/// - Wraps both kinds in a single `Error` for the line driver.
pub mod error;
/// Orchestrates the entire process of code execution.
///
/// This module ties together lexing, parsing, evaluation and the value
/// model to provide a complete runtime for the language.
///
/// # Responsibilities
/// - Coordinates the lexer, parser, evaluator and value types.
/// - Provides the line driver used by [`run`] and the command-line tool.
pub mod interpreter;
/// General utilities for safe numeric conversion.
///
/// Turns user-supplied integers into offsets and counts without silent
/// wrap-around.
pub mod util;

/// Runs every line of `source` in `context` and returns the printable
/// results in order.
///
/// Stops at the first line that fails. Lines that ran before it keep their
/// effects on `context`.
///
/// # Errors
/// Returns the parse or runtime error of the first failing line.
///
/// # Examples
/// ```
/// use ravel::{interpreter::{evaluator::core::Context, value::core::Value}, run};
///
/// let mut context = Context::new();
///
/// let values = run("v = 1 2 3\nv[2] = 9\nv", &mut context).unwrap();
/// assert_eq!(values.len(), 1);
/// assert_eq!(values[0].to_string(), "1 9 3");
///
/// // `y` is not defined.
/// assert!(run("y + 1", &mut context).is_err());
/// ```
pub fn run(source: &str, context: &mut Context) -> Result<Vec<Value>, Error> {
    let mut parser = Parser::new(source);
    let mut values = Vec::new();
    while let Some(result) = parser.line(context) {
        values.extend(result?);
    }
    Ok(values)
}
