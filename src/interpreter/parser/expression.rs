use std::iter::Peekable;

use crate::{
    ast::{BinaryOperator, Expr, UnaryOperator},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{OperatorRegistry, ParseResult},
            vector::{parse_number_or_vector, starts_atom},
        },
    },
};

/// Parses a full expression.
///
/// All binary operators share one precedence level and group to the
/// right, so `2 * 3 + 4` is `2 * (3 + 4)`. An identifier after an operand
/// continues the expression only if it names a binary operator in
/// `registry`.
///
/// Grammar: `expr := operand (binop expr | "=" expr)?`
///
/// # Parameters
/// - `tokens`: Token iterator providing `(Token, line)` pairs. The line
///   must end with a `NewLine` token.
/// - `registry`: The operators defined so far.
///
/// # Returns
/// The parsed expression node.
///
/// # Errors
/// - `InvalidAssignmentTarget` when the left of `=` is neither a variable
///   nor an index expression.
/// - `UnexpectedToken` when something other than an operator or a
///   terminator follows an operand.
/// - `NestingTooDeep` when operators, parentheses or brackets nest past
///   [`OperatorRegistry::max_nesting`].
///
/// # Example
/// ```
/// use ravel::interpreter::{
///     evaluator::core::Context,
///     lexer::Scanner,
///     parser::expression::parse_expression,
/// };
///
/// let tokens: Vec<_> = Scanner::new("2 * 3 + 4\n").collect::<Result<_, _>>().unwrap();
/// let expr = parse_expression(&mut tokens.iter().peekable(), &Context::new()).unwrap();
///
/// assert_eq!(expr.canonical(), "(2 * (3 + 4))");
/// ```
pub fn parse_expression<'a, I, R>(tokens: &mut Peekable<I>, registry: &R) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    parse_nested(tokens, registry, 0)
}

/// Parses an expression found `depth` levels inside the statement.
///
/// Every binary operator, unary prefix, parenthesis, bracket and brace
/// opens one more level. Parsing stops with `NestingTooDeep` once the
/// registry's limit is passed, before the recursion can exhaust the stack.
pub(in crate::interpreter::parser) fn parse_nested<'a, I, R>(tokens: &mut Peekable<I>,
                                                             registry: &R,
                                                             depth: usize)
                                                             -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    let limit = registry.max_nesting();
    if depth > limit {
        let line = tokens.peek().map_or(0, |(_, line)| *line);
        return Err(ParseError::NestingTooDeep { limit, line });
    }

    let left = parse_operand(tokens, registry, depth)?;

    let Some((tok, line)) = tokens.peek().copied() else {
        return Ok(left);
    };
    let line = *line;

    if *tok == Token::Equals {
        if !matches!(left, Expr::Variable { .. } | Expr::Index { .. }) {
            return Err(ParseError::InvalidAssignmentTarget { line });
        }
        tokens.next();
        let value = parse_nested(tokens, registry, depth + 1)?;
        return Ok(Expr::Assign { target: Box::new(left),
                                 value: Box::new(value),
                                 line });
    }

    if let Some(op) = binary_operator(tok) {
        tokens.next();
        let right = parse_nested(tokens, registry, depth + 1)?;
        return Ok(Expr::Binary { left: Box::new(left),
                                 op,
                                 right: Box::new(right),
                                 line });
    }

    match tok {
        Token::Identifier(name) if registry.is_defined_binary(name) => {
            let name = name.clone();
            tokens.next();
            let right = parse_nested(tokens, registry, depth + 1)?;
            Ok(Expr::BinaryCall { left: Box::new(left),
                                  name,
                                  right: Box::new(right),
                                  line })
        },
        Token::NewLine | Token::Semicolon | Token::RParen | Token::RBracket | Token::RBrace => {
            Ok(left)
        },
        other => Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                   line }),
    }
}

/// Parses an operand and any index brackets that follow it.
///
/// A unary operator takes the whole expression to its right as its
/// operand, so `-2 + 3` is `-(2 + 3)`.
///
/// Grammar:
/// ```text
/// operand := (unop expr | "{" expr "}" | atom+) ("[" expr "]")*
/// ```
fn parse_operand<'a, I, R>(tokens: &mut Peekable<I>, registry: &R, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    let Some((tok, line)) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfLine { line: 0 });
    };
    let line = *line;

    let expr = if let Some(op) = unary_operator(tok) {
        tokens.next();
        let operand = parse_nested(tokens, registry, depth + 1)?;
        Expr::Unary { op,
                      operand: Box::new(operand),
                      line }
    } else {
        match tok {
            Token::Identifier(name) if registry.is_defined_unary(name) => {
                let name = name.clone();
                tokens.next();
                let operand = parse_nested(tokens, registry, depth + 1)?;
                Expr::UnaryCall { name,
                                  operand: Box::new(operand),
                                  line }
            },
            Token::LBrace => parse_map(tokens, registry, line, depth)?,
            Token::Identifier(_) => parse_number_or_vector(tokens, registry, depth)?,
            _ if starts_atom(tok, registry) => parse_number_or_vector(tokens, registry, depth)?,
            Token::NewLine => return Err(ParseError::UnexpectedEndOfLine { line }),
            other => {
                return Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                         line });
            },
        }
    };

    parse_index(tokens, registry, expr, depth)
}

/// Wraps `expr` in an index node for every `[ ... ]` that follows.
fn parse_index<'a, I, R>(tokens: &mut Peekable<I>,
                         registry: &R,
                         mut expr: Expr,
                         depth: usize)
                         -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    while let Some((Token::LBracket, line)) = tokens.peek() {
        let line = *line;
        tokens.next();
        let index = parse_nested(tokens, registry, depth + 1)?;
        expect_closing(tokens, &Token::RBracket, ']')?;
        expr = Expr::Index { target: Box::new(expr),
                             index: Box::new(index),
                             line };
    }
    Ok(expr)
}

/// Parses `{ expr }`.
///
/// A vector literal inside the braces lists the entries; any other
/// expression is a single entry.
fn parse_map<'a, I, R>(tokens: &mut Peekable<I>,
                       registry: &R,
                       line: usize,
                       depth: usize)
                       -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    tokens.next();
    let inner = parse_nested(tokens, registry, depth + 1)?;
    expect_closing(tokens, &Token::RBrace, '}')?;

    let elements = match inner {
        Expr::Slice { elements, .. } => elements,
        other => vec![other],
    };
    Ok(Expr::Map { elements, line })
}

/// Consumes `closing` or reports what was found instead.
pub(in crate::interpreter::parser) fn expect_closing<'a, I>(tokens: &mut Peekable<I>,
                                                            closing: &Token,
                                                            delimiter: char)
                                                            -> ParseResult<()>
    where I: Iterator<Item = &'a (Token, usize)>
{
    match tokens.next() {
        Some((tok, _)) if tok == closing => Ok(()),
        Some((tok, line)) => Err(ParseError::ExpectedClosing { delimiter,
                                                               found: tok.to_string(),
                                                               line: *line }),
        None => Err(ParseError::UnexpectedEndOfLine { line: 0 }),
    }
}

/// Maps a token in operand position to a built-in unary operator.
const fn unary_operator(token: &Token) -> Option<UnaryOperator> {
    Some(match token {
             Token::Minus => UnaryOperator::Negate,
             Token::Plus => UnaryOperator::Identity,
             Token::Abs => UnaryOperator::Abs,
             Token::Sgn => UnaryOperator::Sign,
             Token::Floor => UnaryOperator::Floor,
             Token::Ceil => UnaryOperator::Ceil,
             Token::Sqrt => UnaryOperator::Sqrt,
             Token::ToFloat => UnaryOperator::Float,
             Token::Not => UnaryOperator::Not,
             Token::Iota => UnaryOperator::Iota,
             Token::Rho => UnaryOperator::Shape,
             Token::Comma => UnaryOperator::Ravel,
             Token::Transp => UnaryOperator::Transpose,
             Token::PlusReduce => UnaryOperator::Reduce(BinaryOperator::Add),
             Token::MinusReduce => UnaryOperator::Reduce(BinaryOperator::Sub),
             Token::StarReduce => UnaryOperator::Reduce(BinaryOperator::Mul),
             _ => return None,
         })
}

/// Maps a token after an operand to a built-in binary operator.
const fn binary_operator(token: &Token) -> Option<BinaryOperator> {
    Some(match token {
             Token::Plus => BinaryOperator::Add,
             Token::Minus => BinaryOperator::Sub,
             Token::Star => BinaryOperator::Mul,
             Token::Slash => BinaryOperator::Div,
             Token::StarStar => BinaryOperator::Pow,
             Token::Div => BinaryOperator::IntDiv,
             Token::Mod => BinaryOperator::Mod,
             Token::Min => BinaryOperator::Min,
             Token::Max => BinaryOperator::Max,
             Token::EqualEqual => BinaryOperator::Equal,
             Token::BangEqual => BinaryOperator::NotEqual,
             Token::Less => BinaryOperator::Less,
             Token::LessEqual => BinaryOperator::LessEqual,
             Token::Greater => BinaryOperator::Greater,
             Token::GreaterEqual => BinaryOperator::GreaterEqual,
             Token::And => BinaryOperator::And,
             Token::Or => BinaryOperator::Or,
             Token::Comma => BinaryOperator::Catenate,
             Token::Rho => BinaryOperator::Reshape,
             _ => return None,
         })
}
