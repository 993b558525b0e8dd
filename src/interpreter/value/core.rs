use std::{collections::BTreeMap, fmt, rc::Rc};

use bigdecimal::BigDecimal;
use num_bigint::BigInt;
use num_rational::BigRational;
use num_traits::ToPrimitive;

use crate::{
    config::Config,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::{
            matrix::Matrix,
            number::{Arith, int_or_big, to_bigint, to_float, to_rational},
        },
    },
};

/// Represents a runtime value in the interpreter.
///
/// The four numeric variants form a tower ordered by promotion rank:
/// `Int < BigInt < BigRat < BigFloat`. Binary arithmetic lifts the
/// lower-ranked operand to the rank of the higher one.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A machine integer.
    Int(i64),
    /// An arbitrary-precision integer.
    BigInt(BigInt),
    /// An exact rational number.
    BigRat(BigRational),
    /// An arbitrary-precision decimal float.
    BigFloat(BigDecimal),
    /// A single code point.
    Char(char),
    /// An immutable string; behaves as a vector of chars under arithmetic.
    String(String),
    /// A sequence of scalars.
    ///
    /// The backing storage is shared between copies and cloned on the first
    /// indexed write.
    Vector(Rc<Vec<Self>>),
    /// A multi-dimensional array.
    Matrix(Matrix),
    /// String keys to values; produced by `{ ... }` and `)vars`.
    Map(BTreeMap<String, Self>),
    /// The result of an assignment expression.
    ///
    /// Behaves exactly like the wrapped value except that the line driver
    /// does not print it.
    Assignment(Box<Self>),
}

/// The kind of a [`Value`], used for conversions and error messages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    /// [`Value::Int`]
    Int,
    /// [`Value::BigInt`]
    BigInt,
    /// [`Value::BigRat`]
    BigRat,
    /// [`Value::BigFloat`]
    BigFloat,
    /// [`Value::Char`]
    Char,
    /// [`Value::String`]
    String,
    /// [`Value::Vector`]
    Vector,
    /// [`Value::Matrix`]
    Matrix,
    /// [`Value::Map`]
    Map,
    /// [`Value::Assignment`]
    Assignment,
}

impl Kind {
    /// Position on the numeric tower, or `None` for non-numeric kinds.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::core::Kind;
    ///
    /// assert!(Kind::Int.rank() < Kind::BigFloat.rank());
    /// assert_eq!(Kind::Char.rank(), None);
    /// ```
    #[must_use]
    pub const fn rank(self) -> Option<u8> {
        match self {
            Self::Int => Some(0),
            Self::BigInt => Some(1),
            Self::BigRat => Some(2),
            Self::BigFloat => Some(3),
            _ => None,
        }
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Int => "int",
            Self::BigInt => "big int",
            Self::BigRat => "rational",
            Self::BigFloat => "float",
            Self::Char => "char",
            Self::String => "string",
            Self::Vector => "vector",
            Self::Matrix => "matrix",
            Self::Map => "map",
            Self::Assignment => "assignment",
        };
        write!(f, "{name}")
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<char> for Value {
    fn from(c: char) -> Self {
        Self::Char(c)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<Vec<Self>> for Value {
    fn from(v: Vec<Self>) -> Self {
        Self::Vector(Rc::new(v))
    }
}

impl From<Matrix> for Value {
    fn from(m: Matrix) -> Self {
        Self::Matrix(m)
    }
}

impl Value {
    /// Returns the kind of this value.
    #[must_use]
    pub const fn kind(&self) -> Kind {
        match self {
            Self::Int(_) => Kind::Int,
            Self::BigInt(_) => Kind::BigInt,
            Self::BigRat(_) => Kind::BigRat,
            Self::BigFloat(_) => Kind::BigFloat,
            Self::Char(_) => Kind::Char,
            Self::String(_) => Kind::String,
            Self::Vector(_) => Kind::Vector,
            Self::Matrix(_) => Kind::Matrix,
            Self::Map(_) => Kind::Map,
            Self::Assignment(_) => Kind::Assignment,
        }
    }

    /// Returns the wrapped value of an assignment, or `self` otherwise.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::core::Value;
    ///
    /// let assigned = Value::Assignment(Box::new(Value::Int(3)));
    ///
    /// assert_eq!(assigned.inner(), &Value::Int(3));
    /// assert_eq!(Value::Int(4).inner(), &Value::Int(4));
    /// ```
    #[must_use]
    pub fn inner(&self) -> &Self {
        match self {
            Self::Assignment(v) => v.inner(),
            other => other,
        }
    }

    /// Owned version of [`Value::inner`].
    #[must_use]
    pub fn into_inner(self) -> Self {
        match self {
            Self::Assignment(v) => v.into_inner(),
            other => other,
        }
    }

    /// Whether the value came from an assignment expression.
    #[must_use]
    pub const fn is_assignment(&self) -> bool {
        matches!(self, Self::Assignment(_))
    }

    /// Whether the value may be an element of a vector.
    ///
    /// Numbers, chars and strings are scalars.
    #[must_use]
    pub fn is_scalar(&self) -> bool {
        match self {
            Self::Assignment(v) => v.is_scalar(),
            other => other.kind().rank().is_some() || matches!(other, Self::Char(_) | Self::String(_)),
        }
    }

    /// Whether the value is on the numeric tower.
    #[must_use]
    pub fn is_numeric(&self) -> bool {
        self.inner().kind().rank().is_some()
    }

    /// Reads a machine-sized integer, accepting big integers that fit.
    ///
    /// Used for indices, counts and shapes.
    ///
    /// # Errors
    /// Returns `NonIntegerIndex` for rationals, floats and anything that
    /// does not fit in 64 bits, and `TypeError` for non-numbers.
    pub fn as_i64(&self, line: usize) -> EvalResult<i64> {
        match self.inner() {
            Self::Int(n) => Ok(*n),
            Self::BigInt(n) => n.to_i64().ok_or_else(|| RuntimeError::NonIntegerIndex { index: n.to_string(),
                                                                                        line }),
            v @ (Self::BigRat(_) | Self::BigFloat(_)) => {
                Err(RuntimeError::NonIntegerIndex { index: v.to_string(),
                                                    line })
            },
            other => Err(RuntimeError::TypeError { details: format!("expected an integer, found {}",
                                                                     other.kind()),
                                                   line }),
        }
    }

    /// Views the value as a flat list of elements.
    ///
    /// Vectors yield their elements, strings their chars, matrices their
    /// row-major data and scalars themselves.
    #[must_use]
    pub fn elements(&self) -> Vec<Self> {
        match self.inner() {
            Self::Vector(v) => v.as_ref().clone(),
            Self::String(s) => s.chars().map(Self::Char).collect(),
            Self::Matrix(m) => m.data().to_vec(),
            other => vec![other.clone()],
        }
    }

    /// Converts the value to the requested kind.
    ///
    /// Numbers convert up the tower exactly (rationals to floats are rounded
    /// to the session precision) and down only when nothing is lost.
    /// Strings convert to vectors of chars or single-row matrices. Maps only
    /// convert to maps.
    ///
    /// # Errors
    /// Returns `ConversionError` naming both kinds when the conversion is not
    /// supported.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::{
    ///     core::{Kind, Value},
    ///     number::Arith,
    /// };
    ///
    /// let arith = Arith::new(32, 1);
    /// let chars = Value::from("hi").convert(Kind::Vector, arith).unwrap();
    ///
    /// assert_eq!(chars, Value::from(vec![Value::Char('h'), Value::Char('i')]));
    /// assert!(Value::from("hi").convert(Kind::Map, arith).is_err());
    /// ```
    pub fn convert(&self, to: Kind, arith: Arith) -> EvalResult<Self> {
        let value = self.inner();
        let fail = || RuntimeError::ConversionError { from: value.kind(),
                                                      to,
                                                      line: arith.line };
        if value.kind() == to {
            return Ok(value.clone());
        }

        match (value, to) {
            (Self::Map(_), _) | (_, Kind::Map | Kind::Assignment) => Err(fail()),
            (_, Kind::BigInt) if value.is_numeric() => match value {
                Self::Int(_) => Ok(Self::BigInt(to_bigint(value, arith)?)),
                Self::BigRat(r) if r.is_integer() => Ok(Self::BigInt(r.to_integer())),
                _ => Err(fail()),
            },
            (_, Kind::Int) if value.is_numeric() => match value {
                Self::BigInt(n) => n.to_i64().map(Self::Int).ok_or_else(fail),
                Self::BigRat(r) if r.is_integer() => match int_or_big(r.to_integer()) {
                    v @ Self::Int(_) => Ok(v),
                    _ => Err(fail()),
                },
                _ => Err(fail()),
            },
            (Self::Int(_) | Self::BigInt(_), Kind::BigRat) => {
                Ok(Self::BigRat(to_rational(value, arith)?))
            },
            (Self::Int(_) | Self::BigInt(_) | Self::BigRat(_), Kind::BigFloat) => {
                Ok(Self::BigFloat(to_float(value, arith)?))
            },
            (Self::Char(c), Kind::String) => Ok(Self::String(c.to_string())),
            (Self::Vector(v), Kind::String) => v.iter()
                                                 .map(|e| match e {
                                                     Self::Char(c) => Some(*c),
                                                     _ => None,
                                                 })
                                                 .collect::<Option<String>>()
                                                 .map(Self::String)
                                                 .ok_or_else(fail),
            (Self::Matrix(m), Kind::Vector) => Ok(Self::from(m.data().to_vec())),
            (Self::String(_), Kind::Vector) => Ok(Self::from(value.elements())),
            (Self::Vector(_) | Self::String(_), Kind::Matrix) => {
                let data = value.elements();
                Ok(Self::Matrix(Matrix::new(vec![1, data.len()], data, arith.line)?))
            },
            (_, Kind::Vector) if value.is_scalar() => Ok(Self::from(vec![value.clone()])),
            _ => Err(fail()),
        }
    }

    /// Formats the value for display under the given configuration.
    ///
    /// Floats are shown with at most `float_precision` significant digits,
    /// vectors of chars print as text, matrices print one row per line with
    /// right-aligned columns.
    ///
    /// # Example
    /// ```
    /// use ravel::{config::Config, interpreter::value::core::Value};
    ///
    /// let v = Value::from(vec![Value::Int(1), Value::Int(22), Value::Int(3)]);
    /// let word = Value::from(vec![Value::Char('o'), Value::Char('k')]);
    ///
    /// assert_eq!(v.sprint(&Config::default()), "1 22 3");
    /// assert_eq!(word.sprint(&Config::default()), "ok");
    /// ```
    #[must_use]
    pub fn sprint(&self, config: &Config) -> String {
        match self {
            Self::Int(n) => n.to_string(),
            Self::BigInt(n) => n.to_string(),
            Self::BigRat(r) => format!("{}/{}", r.numer(), r.denom()),
            Self::BigFloat(f) => {
                Arith::new(config.float_precision, 0).round(f.clone())
                                                     .normalized()
                                                     .to_string()
            },
            Self::Char(c) => c.to_string(),
            Self::String(s) => s.clone(),
            Self::Vector(v) => {
                if !v.is_empty() && v.iter().all(|e| matches!(e, Self::Char(_))) {
                    return v.iter().map(|e| e.sprint(config)).collect();
                }
                v.iter().map(|e| e.sprint(config)).collect::<Vec<_>>().join(" ")
            },
            Self::Matrix(m) => m.sprint(config),
            Self::Map(entries) => {
                let body = entries.iter()
                                  .map(|(k, v)| format!("{k}:{}", v.sprint(config)))
                                  .collect::<Vec<_>>()
                                  .join(" ");
                format!("{{ {body} }}")
            },
            Self::Assignment(v) => v.sprint(config),
        }
    }

    /// Produces source text that parses back to this value.
    ///
    /// Maps have no source form and print as `{ map }`.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::value::core::Value;
    ///
    /// assert_eq!(Value::Int(-5).canonical(), "(-5)");
    /// assert_eq!(Value::from(vec![Value::Int(7)]).canonical(), "(, 7)");
    /// assert_eq!(Value::from(Vec::new()).canonical(), "(iota 0)");
    /// assert_eq!(Value::from("a\"b").canonical(), "\"a\\\"b\"");
    ///
    /// let mixed = Value::from(vec![Value::from("ab"), Value::Char('c')]);
    /// assert_eq!(mixed.canonical(), "((\"ab\") 'c')");
    /// ```
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Int(n) => parenthesize_negative(n.to_string()),
            Self::BigInt(n) => parenthesize_negative(n.to_string()),
            Self::BigRat(r) => parenthesize_negative(format!("{}/{}", r.numer(), r.denom())),
            Self::BigFloat(f) => {
                let mut text = f.normalized().to_string();
                if !text.contains(['.', 'e', 'E']) {
                    text.push_str(".0");
                }
                parenthesize_negative(text)
            },
            Self::Char(c) => format!("'{}'", escape(&c.to_string(), '\'')),
            Self::String(s) => format!("\"{}\"", escape(s, '"')),
            Self::Vector(v) => match v.len() {
                0 => "(iota 0)".to_string(),
                // `, "ab"` would ravel the string into chars.
                1 if matches!(v[0], Self::String(_)) => {
                    format!("(1 rho {} 0)", v[0].element_canonical())
                },
                1 => format!("(, {})", v[0].canonical()),
                _ => format!("({})",
                             v.iter().map(Self::element_canonical).collect::<Vec<_>>().join(" ")),
            },
            Self::Matrix(m) => m.canonical(),
            Self::Map(_) => "{ map }".to_string(),
            Self::Assignment(v) => v.canonical(),
        }
    }

    /// Canonical text of a vector element. A string is parenthesized, or a
    /// vector literal would read it back as separate chars.
    fn element_canonical(&self) -> String {
        match self {
            Self::String(_) => format!("({})", self.canonical()),
            _ => self.canonical(),
        }
    }
}

fn parenthesize_negative(text: String) -> String {
    if text.starts_with('-') { format!("({text})") } else { text }
}

fn escape(text: &str, quote: char) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\\' => out.push_str("\\\\"),
            c if c == quote => {
                out.push('\\');
                out.push(c);
            },
            c => out.push(c),
        }
    }
    out
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.sprint(&Config::default()))
    }
}
