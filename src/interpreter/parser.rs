/// Core parser types and the line driver.
///
/// Defines `ParseResult`, the `OperatorRegistry` capability the grammar
/// consults, and `Parser`, which buffers, parses and evaluates one line at
/// a time.
pub mod core;

/// Expression parsing.
///
/// Binary operators, unary operators, assignment, map literals and
/// indexing.
pub mod expression;

/// Vector literals and atoms.
///
/// Numbers, rationals, strings, chars, variables and parenthesized
/// expressions, and the juxtaposition that turns several of them into a
/// vector.
pub mod vector;

/// User operator definitions (`op ...`).
pub mod definition;

/// Special commands introduced by a leading `)`.
pub mod special;
