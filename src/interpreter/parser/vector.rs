use std::{iter::Peekable, str::FromStr};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::Zero;

use crate::{
    ast::Expr,
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{OperatorRegistry, ParseResult},
            expression::{expect_closing, parse_nested},
        },
        value::{
            core::Value,
            number::{int_or_big, normalize_rational},
        },
    },
};

/// Whether `token` can continue a vector literal.
///
/// Identifiers naming a user operator end the vector, so that `x f y` reads
/// as a call when `f` is a binary operator.
pub fn starts_atom<R>(token: &Token, registry: &R) -> bool
    where R: OperatorRegistry + ?Sized
{
    match token {
        Token::Number(_)
        | Token::Float(_)
        | Token::Rational(_)
        | Token::Str(_)
        | Token::Char(_)
        | Token::LParen => true,
        Token::Identifier(name) => {
            !registry.is_defined_unary(name) && !registry.is_defined_binary(name)
        },
        _ => false,
    }
}

/// Parses one or more juxtaposed atoms.
///
/// A single atom stands for itself. Several atoms form a vector literal,
/// in which every bare string literal contributes its characters as
/// separate elements. A parenthesized string such as `("ab")` stays one
/// element. `depth` is the nesting level of the enclosing expression.
///
/// Grammar: `numberOrVector := atom+`
///
/// # Example
/// ```
/// use ravel::{
///     ast::Expr,
///     interpreter::{
///         evaluator::core::Context,
///         lexer::Scanner,
///         parser::vector::parse_number_or_vector,
///     },
/// };
///
/// let tokens: Vec<_> = Scanner::new("1 x \"ab\" (\"cd\")\n").collect::<Result<_, _>>().unwrap();
/// let expr = parse_number_or_vector(&mut tokens.iter().peekable(), &Context::new(), 0).unwrap();
///
/// assert_eq!(expr.tree(), "<<1> <var x> <'a'> <'b'> <\"cd\">>");
/// ```
pub fn parse_number_or_vector<'a, I, R>(tokens: &mut Peekable<I>,
                                        registry: &R,
                                        depth: usize)
                                        -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    let Some((first, line)) = tokens.peek().copied() else {
        return Err(ParseError::UnexpectedEndOfLine { line: 0 });
    };
    let line = *line;

    let mut atoms = vec![(parse_atom(tokens, registry, depth)?, is_bare_string(first))];
    while let Some((tok, _)) = tokens.peek().copied()
          && starts_atom(tok, registry)
    {
        atoms.push((parse_atom(tokens, registry, depth)?, is_bare_string(tok)));
    }

    if atoms.len() == 1 {
        return Ok(atoms.remove(0).0);
    }

    let elements = atoms.into_iter()
                        .flat_map(|atom| match atom {
                            (Expr::Literal { value: Value::String(s), line }, true) => {
                                s.chars()
                                 .map(|c| Expr::Literal { value: Value::Char(c),
                                                          line })
                                 .collect()
                            },
                            (other, _) => vec![other],
                        })
                        .collect();
    Ok(Expr::Slice { elements, line })
}

const fn is_bare_string(token: &Token) -> bool {
    matches!(token, Token::Str(_))
}

/// Parses a single atom: a literal, a variable, or a parenthesized
/// expression.
fn parse_atom<'a, I, R>(tokens: &mut Peekable<I>, registry: &R, depth: usize) -> ParseResult<Expr>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    let Some((tok, line)) = tokens.next() else {
        return Err(ParseError::UnexpectedEndOfLine { line: 0 });
    };
    let line = *line;

    let value = match tok {
        Token::Identifier(name) => {
            return Ok(Expr::Variable { name: name.clone(),
                                       line });
        },
        Token::LParen => {
            let inner = parse_nested(tokens, registry, depth + 1)?;
            expect_closing(tokens, &Token::RParen, ')')?;
            return Ok(inner);
        },
        Token::Number(text) => parse_integer(text, line)?,
        Token::Rational(text) => parse_rational(text, line)?,
        Token::Float(text) => {
            let f = BigDecimal::from_str(text).map_err(|_| invalid(text, line))?;
            Value::BigFloat(f)
        },
        Token::Str(s) => Value::String(s.clone()),
        Token::Char(c) => Value::Char(*c),
        Token::NewLine => return Err(ParseError::UnexpectedEndOfLine { line }),
        other => {
            return Err(ParseError::UnexpectedToken { token: other.to_string(),
                                                     line });
        },
    };
    Ok(Expr::Literal { value, line })
}

/// Decimal digits become an `Int`, or a `BigInt` when they do not fit.
fn parse_integer(text: &str, line: usize) -> ParseResult<Value> {
    BigInt::from_str(text).map(int_or_big).map_err(|_| invalid(text, line))
}

/// `n/d` becomes an exact rational, normalized to an integer when `d`
/// divides `n`.
fn parse_rational(text: &str, line: usize) -> ParseResult<Value> {
    let (numer, denom) = text.split_once('/').ok_or_else(|| invalid(text, line))?;
    let numer = BigInt::from_str(numer).map_err(|_| invalid(text, line))?;
    let denom = BigInt::from_str(denom).map_err(|_| invalid(text, line))?;
    if denom.is_zero() {
        return Err(invalid(text, line));
    }
    Ok(normalize_rational(BigRational::new(numer, denom)))
}

fn invalid(text: &str, line: usize) -> ParseError {
    ParseError::InvalidLiteral { text: text.to_string(),
                                 line }
}
