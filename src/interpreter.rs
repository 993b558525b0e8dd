/// The evaluator module executes AST nodes and computes results.
///
/// The evaluator walks the tree built by the parser, applies built-in and
/// user-defined operators, manages variable state and reports runtime
/// errors.
///
/// # Responsibilities
/// - Evaluates every expression node, right operand first.
/// - Handles variables, indexed assignment and user operator calls.
/// - Reports runtime errors such as undefined names or shape mismatches.
pub mod evaluator;
/// The lexer module tokenizes source code for further parsing.
///
/// The lexer reads raw source text and produces tokens for numbers,
/// rationals, strings, chars, identifiers, keywords, operators and
/// delimiters, each tagged with its source line.
///
/// # Responsibilities
/// - Converts the input character stream into `(Token, line)` pairs.
/// - Skips comments and joins lines ending in a backslash.
/// - Reports input it cannot match as a scan error.
pub mod lexer;
/// The parser module builds expression trees from tokens.
///
/// The grammar is context-sensitive: whether an identifier is an operand
/// or an operator depends on the operators defined so far, so the parser
/// consults the context's registries as it goes.
///
/// # Responsibilities
/// - Buffers one line of tokens and parses it into statements.
/// - Forms vectors from juxtaposed atoms.
/// - Runs special commands and drives evaluation line by line.
pub mod parser;
/// The value module defines the runtime data types for evaluation.
///
/// Values are numbers on a tower of increasing generality (machine
/// integers, big integers, exact rationals, big floats), chars, strings,
/// vectors, matrices and maps.
///
/// # Responsibilities
/// - Defines the `Value` enum and its kinds.
/// - Implements numeric promotion and the arithmetic kernels.
/// - Renders values for printing and as re-parseable source text.
pub mod value;
