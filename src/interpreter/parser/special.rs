use std::iter::Peekable;

use tracing::debug;

use crate::{
    config::{DebugFlags, MAX_FLOAT_PRECISION},
    error::ParseError,
    interpreter::{evaluator::core::Context, lexer::Token, parser::core::ParseResult, value::core::Value},
};

/// Runs a special command, the text after a leading `)`.
///
/// | Command            | Effect                                      |
/// |--------------------|---------------------------------------------|
/// | `)origin [0\|1]`   | report or set the index origin              |
/// | `)prec [n]`        | report or set the float precision in digits |
/// | `)debug [name]`    | list the debug toggles or flip one          |
/// | `)vars`            | the global variables as a map               |
/// | `)ops`             | the user-defined operators, one per line    |
///
/// The precision is limited to [`MAX_FLOAT_PRECISION`] digits.
///
/// # Returns
/// The report, or `None` for commands that only change state.
///
/// # Errors
/// `InvalidSpecialCommand` for unknown commands, bad arguments or
/// trailing tokens.
///
/// # Example
/// ```
/// use ravel::{interpreter::{evaluator::core::Context, value::core::Value}, run};
///
/// let mut context = Context::new();
/// run(")origin 0", &mut context).unwrap();
///
/// assert_eq!(context.config.origin, 0);
/// assert_eq!(run(")origin", &mut context).unwrap(), vec![Value::Int(0)]);
/// ```
pub fn run_special<'a, I>(tokens: &mut Peekable<I>, context: &mut Context) -> ParseResult<Option<Value>>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let (word, line) = match tokens.next() {
        Some((Token::Identifier(word), line)) => (word.as_str(), *line),
        Some((tok, line)) => return Err(invalid(format!("unexpected {tok}"), *line)),
        None => return Err(invalid("missing command".to_string(), 0)),
    };
    let argument = match tokens.next() {
        Some((Token::NewLine, _)) | None => None,
        Some((tok, _)) => {
            if !matches!(tokens.next(), Some((Token::NewLine, _)) | None) {
                return Err(invalid(format!("too many arguments to '{word}'"), line));
            }
            Some(tok)
        },
    };
    debug!(command = word, "special command");

    match (word, argument) {
        ("origin", None) => Ok(Some(Value::Int(context.config.origin))),
        ("origin", Some(Token::Number(n))) if n == "0" || n == "1" => {
            context.config.origin = i64::from(n == "1");
            Ok(None)
        },
        ("origin", Some(tok)) => Err(invalid(format!("origin must be 0 or 1, not {tok}"), line)),
        ("prec", None) => {
            let prec = i64::try_from(context.config.float_precision).unwrap_or(i64::MAX);
            Ok(Some(Value::Int(prec)))
        },
        ("prec", Some(Token::Number(n))) => match n.parse::<u64>() {
            Ok(digits) if (1..=MAX_FLOAT_PRECISION).contains(&digits) => {
                context.config.float_precision = digits;
                Ok(None)
            },
            _ => Err(invalid(format!("precision must be between 1 and {MAX_FLOAT_PRECISION}, not {n}"),
                             line)),
        },
        ("prec", Some(tok)) => Err(invalid(format!("precision must be a number, not {tok}"), line)),
        ("debug", None) => Ok(Some(Value::String(context.config.debug.to_string()))),
        ("debug", Some(Token::Identifier(name))) => match context.config.debug.toggle(name) {
            Some(_) => Ok(None),
            None => Err(invalid(format!("unknown debug toggle '{name}'; expected one of {}",
                                        DebugFlags::NAMES.join(", ")),
                                line)),
        },
        ("vars", None) => Ok(Some(Value::Map(context.globals()))),
        ("ops", None) => {
            let listing = context.operators()
                                 .iter()
                                 .map(ToString::to_string)
                                 .collect::<Vec<_>>()
                                 .join("\n");
            Ok(Some(Value::String(listing)))
        },
        ("debug" | "vars" | "ops", Some(tok)) => {
            Err(invalid(format!("unexpected {tok} after '{word}'"), line))
        },
        _ => Err(invalid(format!("unknown command '{word}'"), line)),
    }
}

fn invalid(details: String, line: usize) -> ParseError {
    ParseError::InvalidSpecialCommand { details, line }
}
