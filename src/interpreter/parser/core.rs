use std::{collections::HashSet, iter::Peekable};

use tracing::{debug, info};

use crate::{
    ast::Statement,
    config::DEFAULT_MAX_NESTING,
    error::{Error, ParseError},
    interpreter::{
        evaluator::core::Context,
        lexer::{Scanner, Token},
        parser::{definition::parse_definition, expression::parse_expression, special::run_special},
        value::core::Value,
    },
};

pub type ParseResult<T> = Result<T, ParseError>;

/// Answers whether a name is a user-defined operator.
///
/// The grammar depends on these answers: an identifier in operand position
/// is a unary call if the unary registry knows it, and an identifier after
/// an operand is a binary call if the binary registry knows it. The parser
/// asks every time and never caches the answer.
pub trait OperatorRegistry {
    /// Whether `name` is a defined unary operator.
    fn is_defined_unary(&self, name: &str) -> bool;
    /// Whether `name` is a defined binary operator.
    fn is_defined_binary(&self, name: &str) -> bool;

    /// How many levels expressions may nest while parsing.
    fn max_nesting(&self) -> usize {
        DEFAULT_MAX_NESTING
    }
}

/// A registry overlay holding the operators defined earlier on the line
/// being parsed.
///
/// Definitions only reach the [`Context`] when they are evaluated, but the
/// statements after them on the same line must already parse with the new
/// names.
pub struct Pending<'r, R: OperatorRegistry + ?Sized> {
    base:   &'r R,
    unary:  HashSet<String>,
    binary: HashSet<String>,
}

impl<'r, R: OperatorRegistry + ?Sized> Pending<'r, R> {
    /// Wraps `base` with no pending names.
    pub fn new(base: &'r R) -> Self {
        Self { base,
               unary: HashSet::new(),
               binary: HashSet::new() }
    }

    /// Marks `name` as defined.
    pub fn declare(&mut self, name: &str, binary: bool) {
        let names = if binary { &mut self.binary } else { &mut self.unary };
        names.insert(name.to_string());
    }
}

impl<R: OperatorRegistry + ?Sized> OperatorRegistry for Pending<'_, R> {
    fn is_defined_unary(&self, name: &str) -> bool {
        self.unary.contains(name) || self.base.is_defined_unary(name)
    }

    fn is_defined_binary(&self, name: &str) -> bool {
        self.binary.contains(name) || self.base.is_defined_binary(name)
    }

    fn max_nesting(&self) -> usize {
        self.base.max_nesting()
    }
}

/// Reads, parses and evaluates program text one line at a time.
///
/// # Example
/// ```
/// use ravel::interpreter::{
///     evaluator::core::Context,
///     parser::core::Parser,
///     value::core::Value,
/// };
///
/// let mut context = Context::new();
/// let mut parser = Parser::new("x = 5\nx * 2\n");
///
/// assert_eq!(parser.line(&mut context), Some(Ok(vec![])));
/// assert_eq!(parser.line(&mut context), Some(Ok(vec![Value::Int(10)])));
/// assert_eq!(parser.line(&mut context), None);
/// ```
pub struct Parser<'src> {
    scanner: Scanner<'src>,
    line:    usize,
}

impl<'src> Parser<'src> {
    /// Creates a parser over `source`.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { scanner: Scanner::new(source),
               line:    1, }
    }

    /// Runs the next line.
    ///
    /// The whole line is buffered, parsed into statements and only then
    /// evaluated, so a parse error anywhere on the line means nothing on it
    /// runs. A runtime error stops the line but keeps the effects of the
    /// statements before it.
    ///
    /// # Returns
    /// - `None` at the end of input.
    /// - `Some(Ok(values))` with the printable results of the line; results
    ///   of assignments, definitions and state-only commands are left out.
    /// - `Some(Err(e))` when the line failed. The next call starts on the
    ///   following line.
    pub fn line(&mut self, context: &mut Context) -> Option<Result<Vec<Value>, Error>> {
        let tokens = match self.buffer_line()? {
            Ok(tokens) => tokens,
            Err(e) => return Some(Err(e.into())),
        };

        if context.config.debug.tokens {
            let text = tokens.iter().map(|(tok, _)| tok.to_string()).collect::<Vec<_>>();
            info!(target: "ravel::tokens", "{}", text.join(" "));
        }

        let result = run_tokens(&tokens, context);
        if let Err(e) = &result {
            debug!(error = %e, "line failed");
        }
        Some(result)
    }

    /// Collects the tokens of one line, ending with a `NewLine` token.
    ///
    /// A scan error discards the rest of the line.
    fn buffer_line(&mut self) -> Option<Result<Vec<(Token, usize)>, ParseError>> {
        let mut tokens = Vec::new();
        loop {
            match self.scanner.next() {
                None if tokens.is_empty() => return None,
                None => {
                    tokens.push((Token::NewLine, self.line));
                    return Some(Ok(tokens));
                },
                Some(Ok((Token::NewLine, line))) => {
                    self.line = line + 1;
                    tokens.push((Token::NewLine, line));
                    return Some(Ok(tokens));
                },
                Some(Ok((tok, line))) => {
                    self.line = line;
                    tokens.push((tok, line));
                },
                Some(Err(e)) => {
                    self.skip_line();
                    return Some(Err(e));
                },
            }
        }
    }

    fn skip_line(&mut self) {
        for item in self.scanner.by_ref() {
            if let Ok((Token::NewLine, line)) = item {
                self.line = line + 1;
                break;
            }
        }
    }
}

/// Parses and evaluates one buffered line.
fn run_tokens(tokens: &[(Token, usize)], context: &mut Context) -> Result<Vec<Value>, Error> {
    let mut iter = tokens.iter().peekable();

    match iter.peek() {
        Some((Token::NewLine, _)) | None => return Ok(Vec::new()),
        Some((Token::RParen, _)) => {
            iter.next();
            return Ok(run_special(&mut iter, context)?.into_iter().collect());
        },
        _ => {},
    }

    let statements = parse_line(&mut iter, context)?;

    let mut values = Vec::new();
    for statement in &statements {
        if let Some(value) = context.eval_statement(statement)?
           && !value.is_assignment()
        {
            context.assign("_", value.clone());
            values.push(value);
        }
    }
    Ok(values)
}

/// Parses `statement (';' statement)*` up to the end of the line.
///
/// Operators defined by earlier statements count as registered for the
/// later ones.
///
/// Grammar: `line := statement (";" statement)* NEWLINE`
fn parse_line<'a, I>(tokens: &mut Peekable<I>, context: &Context) -> ParseResult<Vec<Statement>>
    where I: Iterator<Item = &'a (Token, usize)>
{
    let mut registry = Pending::new(context);
    let mut statements = Vec::new();

    loop {
        let statement = parse_statement(tokens, &mut registry)?;
        if context.config.debug.parse {
            match &statement {
                Statement::Definition(def) => {
                    info!(target: "ravel::parse", "op {}: {}", def.name, def.body.tree());
                },
                Statement::Expression(expr) => info!(target: "ravel::parse", "{}", expr.tree()),
            }
        }
        statements.push(statement);

        match tokens.next() {
            Some((Token::Semicolon, _)) => {},
            Some((Token::NewLine, _)) | None => return Ok(statements),
            Some((tok, line)) => {
                return Err(ParseError::UnexpectedToken { token: tok.to_string(),
                                                         line:  *line, });
            },
        }
    }
}

/// Parses one statement: an operator definition or an expression.
fn parse_statement<'a, I, R>(tokens: &mut Peekable<I>,
                             registry: &mut Pending<'_, R>)
                             -> ParseResult<Statement>
    where I: Iterator<Item = &'a (Token, usize)>,
          R: OperatorRegistry + ?Sized
{
    match tokens.peek() {
        Some((Token::Op, _)) => parse_definition(tokens, registry).map(Statement::Definition),
        Some(_) => parse_expression(tokens, &*registry).map(Statement::Expression),
        None => Err(ParseError::UnexpectedEndOfLine { line: 0 }),
    }
}
