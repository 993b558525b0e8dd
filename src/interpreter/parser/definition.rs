use std::{iter::Peekable, rc::Rc};

use crate::{
    ast::{OperatorDef, Params},
    error::ParseError,
    interpreter::{
        lexer::Token,
        parser::{
            core::{OperatorRegistry, ParseResult, Pending},
            expression::parse_expression,
        },
    },
};

/// Parses a user operator definition.
///
/// The operator counts as defined from the moment its header is read, so
/// the body may call it and so may every later statement on the line.
///
/// Grammar:
/// ```text
/// definition := "op" ident ident "=" expr          // unary: op name arg
///             | "op" ident ident ident "=" expr    // binary: op left name right
/// ```
///
/// # Errors
/// `InvalidOperatorDefinition` when the header is malformed or a parameter
/// shares its name with a defined operator.
pub fn parse_definition<'a, I, R>(tokens: &mut Peekable<I>,
                                  registry: &mut Pending<'_, R>)
                                  -> ParseResult<OperatorDef>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    let line = match tokens.next() {
        Some((Token::Op, line)) => *line,
        Some((tok, line)) => {
            return Err(ParseError::UnexpectedToken { token: tok.to_string(),
                                                     line:  *line, });
        },
        None => return Err(ParseError::UnexpectedEndOfLine { line: 0 }),
    };

    let mut names = Vec::new();
    loop {
        match tokens.next() {
            Some((Token::Identifier(name), _)) => names.push(name.clone()),
            Some((Token::Equals, _)) => break,
            Some((tok, _)) => return Err(malformed(format!("unexpected {tok}"), line)),
            None => return Err(malformed("missing '='".to_string(), line)),
        }
    }

    let (name, params) = match names.as_slice() {
        [name, arg] => (name.clone(), Params::Unary { arg: arg.clone() }),
        [left, name, right] => (name.clone(),
                                Params::Binary { left:  left.clone(),
                                                 right: right.clone(), }),
        _ => {
            return Err(malformed("expected 'op name arg' or 'op left name right'".to_string(),
                                 line));
        },
    };

    for param in parameter_names(&params) {
        if param == &name || registry.is_defined_unary(param) || registry.is_defined_binary(param) {
            return Err(malformed(format!("parameter '{param}' is an operator name"), line));
        }
    }

    registry.declare(&name, matches!(params, Params::Binary { .. }));
    let body = parse_expression(tokens, &*registry)?;

    Ok(OperatorDef { name,
                     params,
                     body: Rc::new(body),
                     line })
}

fn parameter_names(params: &Params) -> Vec<&String> {
    match params {
        Params::Unary { arg } => vec![arg],
        Params::Binary { left, right } => vec![left, right],
    }
}

fn malformed(details: String, line: usize) -> ParseError {
    ParseError::InvalidOperatorDefinition { details, line }
}
