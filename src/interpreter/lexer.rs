use std::fmt;

use logos::Logos;

use crate::error::ParseError;

/// Represents a lexical token in the source input.
/// A token is a minimal but meaningful unit of text produced by the lexer.
/// This enum defines all recognized tokens in the language.
#[derive(Logos, Debug, PartialEq, Eq, Clone)]
#[logos(extras = LexerExtras)]
pub enum Token {
    /// Float literal tokens, such as `3.14`, `.5`, `2.0` or `2.1e-10`.
    #[regex(r"[0-9]+\.[0-9]+([eE][+-]?[0-9]+)?", |lex| lex.slice().to_string())]
    #[regex(r"\.[0-9]+([eE][+-]?[0-9]+)?", |lex| format!("0{}", lex.slice()))]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+", |lex| lex.slice().to_string())]
    Float(String),
    /// Integer literal tokens, such as `42`. Kept as text so that literals
    /// wider than 64 bits survive until the parser builds a big integer.
    #[regex(r"[0-9]+", |lex| lex.slice().to_string())]
    Number(String),
    /// Rational literal tokens written without spaces, such as `1/3`.
    #[regex(r"[0-9]+/[0-9]+", |lex| lex.slice().to_string())]
    Rational(String),
    /// String literal tokens, such as `"hello\n"`.
    #[regex(r#""([^"\\\n]|\\[nt\\"'])*""#, |lex| unescape(&lex.slice()[1..lex.slice().len() - 1]))]
    Str(String),
    /// Character literal tokens, such as `'a'` or `'\n'`.
    #[regex(r#"'([^'\\\n]|\\[nt\\"'])*'"#, parse_char)]
    Char(char),
    /// `op`
    #[token("op")]
    Op,
    /// `iota`
    #[token("iota")]
    Iota,
    /// `rho`
    #[token("rho")]
    Rho,
    /// `abs`
    #[token("abs")]
    Abs,
    /// `sgn`
    #[token("sgn")]
    Sgn,
    /// `floor`
    #[token("floor")]
    Floor,
    /// `ceil`
    #[token("ceil")]
    Ceil,
    /// `sqrt`
    #[token("sqrt")]
    Sqrt,
    /// `float`
    #[token("float")]
    ToFloat,
    /// `not`
    #[token("not")]
    Not,
    /// `transp`
    #[token("transp")]
    Transp,
    /// `div`
    #[token("div")]
    Div,
    /// `mod`
    #[token("mod")]
    Mod,
    /// `min`
    #[token("min")]
    Min,
    /// `max`
    #[token("max")]
    Max,
    /// `and`
    #[token("and")]
    And,
    /// `or`
    #[token("or")]
    Or,
    /// Identifier tokens; variable or operator names such as `x` or `avg`.
    #[regex(r"[a-zA-Z_][a-zA-Z0-9_]*", |lex| lex.slice().to_string())]
    Identifier(String),
    /// `# Comments.`
    #[regex(r"#[^\n]*", logos::skip, allow_greedy = true)]
    Comment,
    /// A backslash before a newline joins two physical lines.
    #[regex(r"\\\r?\n", |lex| {
        lex.extras.line += 1;
        logos::Skip
    })]
    Continuation,
    /// `+/`
    #[token("+/")]
    PlusReduce,
    /// `-/`
    #[token("-/")]
    MinusReduce,
    /// `*/`
    #[token("*/")]
    StarReduce,
    /// `**`
    #[token("**")]
    StarStar,
    /// `+`
    #[token("+")]
    Plus,
    /// `-`
    #[token("-")]
    Minus,
    /// `*`
    #[token("*")]
    Star,
    /// `/`
    #[token("/")]
    Slash,
    /// `,`
    #[token(",")]
    Comma,
    /// `==`
    #[token("==")]
    EqualEqual,
    /// `!=`
    #[token("!=")]
    BangEqual,
    /// `<=`
    #[token("<=")]
    LessEqual,
    /// `>=`
    #[token(">=")]
    GreaterEqual,
    /// `<`
    #[token("<")]
    Less,
    /// `>`
    #[token(">")]
    Greater,
    /// `=`
    #[token("=")]
    Equals,
    /// `;`
    #[token(";")]
    Semicolon,
    /// `(`
    #[token("(")]
    LParen,
    /// `)`
    #[token(")")]
    RParen,
    /// `[`
    #[token("[")]
    LBracket,
    /// `]`
    #[token("]")]
    RBracket,
    /// `{`
    #[token("{")]
    LBrace,
    /// `}`
    #[token("}")]
    RBrace,
    /// End of a logical line.
    #[token("\n", |lex| {
        lex.extras.line += 1;
    })]
    NewLine,
    /// Spaces, tabs and feeds.
    #[regex(r"[ \t\f\r]+", logos::skip)]
    Ignored,
}

/// Additional information carried by the lexer during tokenization.
///
/// Tracks the current line number for error reporting and diagnostics.
/// Incremented as newlines and line continuations are processed.
#[derive(Default)]
pub struct LexerExtras {
    /// The current line number in the source being tokenized.
    pub line: usize,
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Float(text) | Self::Number(text) | Self::Rational(text) => {
                write!(f, "number {text}")
            },
            Self::Str(text) => write!(f, "string {text:?}"),
            Self::Char(c) => write!(f, "char {c:?}"),
            Self::Identifier(name) => write!(f, "identifier '{name}'"),
            Self::NewLine => write!(f, "newline"),
            other => write!(f, "'{}'", other.text()),
        }
    }
}

impl Token {
    /// The source spelling of keyword, operator and punctuation tokens.
    #[must_use]
    pub const fn text(&self) -> &'static str {
        match self {
            Self::Op => "op",
            Self::Iota => "iota",
            Self::Rho => "rho",
            Self::Abs => "abs",
            Self::Sgn => "sgn",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Sqrt => "sqrt",
            Self::ToFloat => "float",
            Self::Not => "not",
            Self::Transp => "transp",
            Self::Div => "div",
            Self::Mod => "mod",
            Self::Min => "min",
            Self::Max => "max",
            Self::And => "and",
            Self::Or => "or",
            Self::PlusReduce => "+/",
            Self::MinusReduce => "-/",
            Self::StarReduce => "*/",
            Self::StarStar => "**",
            Self::Plus => "+",
            Self::Minus => "-",
            Self::Star => "*",
            Self::Slash => "/",
            Self::Comma => ",",
            Self::EqualEqual => "==",
            Self::BangEqual => "!=",
            Self::LessEqual => "<=",
            Self::GreaterEqual => ">=",
            Self::Less => "<",
            Self::Greater => ">",
            Self::Equals => "=",
            Self::Semicolon => ";",
            Self::LParen => "(",
            Self::RParen => ")",
            Self::LBracket => "[",
            Self::RBracket => "]",
            Self::LBrace => "{",
            Self::RBrace => "}",
            Self::NewLine => "\n",
            _ => "",
        }
    }
}

/// Pull-based token source over one piece of program text.
///
/// Yields `(token, line)` pairs; input the lexer cannot match is reported
/// as a [`ParseError::ScanError`] carrying the offending text.
///
/// # Example
/// ```
/// use ravel::interpreter::lexer::{Scanner, Token};
///
/// let tokens: Vec<_> = Scanner::new("x = 1/3 # comment").collect();
///
/// assert_eq!(tokens,
///            vec![Ok((Token::Identifier("x".to_string()), 1)),
///                 Ok((Token::Equals, 1)),
///                 Ok((Token::Rational("1/3".to_string()), 1))]);
/// ```
pub struct Scanner<'src> {
    lexer: logos::Lexer<'src, Token>,
}

impl<'src> Scanner<'src> {
    /// Starts scanning `source` at line 1.
    #[must_use]
    pub fn new(source: &'src str) -> Self {
        Self { lexer: Token::lexer_with_extras(source, LexerExtras { line: 1 }) }
    }
}

impl Iterator for Scanner<'_> {
    type Item = Result<(Token, usize), ParseError>;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.lexer.next()?;
        // The newline callback has already counted the line it terminates.
        let line = if token == Ok(Token::NewLine) {
            self.lexer.extras.line - 1
        } else {
            self.lexer.extras.line
        };

        Some(token.map(|tok| (tok, line))
                  .map_err(|()| ParseError::ScanError { text: self.lexer.slice().to_string(),
                                                         line }))
    }
}

/// Resolves backslash escapes inside a string or char literal.
///
/// Returns `None` for an unknown escape, which the lexer reports as an
/// unrecognized token.
fn unescape(body: &str) -> Option<String> {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        out.push(match chars.next()? {
                     'n' => '\n',
                     't' => '\t',
                     '\\' => '\\',
                     '"' => '"',
                     '\'' => '\'',
                     _ => return None,
                 });
    }
    Some(out)
}

/// Parses a character literal; it must hold exactly one code point.
fn parse_char(lex: &logos::Lexer<Token>) -> Option<char> {
    let slice = lex.slice();
    let body = unescape(&slice[1..slice.len() - 1])?;
    let mut chars = body.chars();
    let c = chars.next()?;
    if chars.next().is_some() { None } else { Some(c) }
}
