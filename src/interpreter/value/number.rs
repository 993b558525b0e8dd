use std::cmp::Ordering;

use bigdecimal::{BigDecimal, RoundingMode};
use num_bigint::{BigInt, Sign};
use num_integer::Integer;
use num_rational::BigRational;
use num_traits::{One, Signed, ToPrimitive, Zero};

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::EvalResult,
        value::core::{Kind, Value},
    },
};

/// Largest exponent accepted by `**`.
pub const MAX_EXPONENT: i64 = 1 << 20;
/// Largest exact result of `**`, in bits.
pub const MAX_POWER_BITS: u64 = 1 << 24;

/// Parameters shared by every arithmetic kernel call.
///
/// Carries the float precision of the session and the source line used for
/// error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Arith {
    /// Significant digits kept by float results.
    pub precision: u64,
    /// Source line for error reporting.
    pub line:      usize,
}

impl Arith {
    /// Creates kernel parameters for one evaluation step.
    #[must_use]
    pub const fn new(precision: u64, line: usize) -> Self {
        Self { precision, line }
    }

    /// Rounds `x` to the configured number of significant digits.
    ///
    /// Values that already fit are returned unchanged, so no trailing zeros
    /// are introduced.
    ///
    /// # Example
    /// ```
    /// use std::str::FromStr;
    ///
    /// use bigdecimal::BigDecimal;
    /// use ravel::interpreter::value::number::Arith;
    ///
    /// let arith = Arith::new(3, 1);
    /// let x = BigDecimal::from_str("3.14159").unwrap();
    ///
    /// assert_eq!(arith.round(x).to_string(), "3.14");
    /// ```
    #[must_use]
    pub fn round(&self, x: BigDecimal) -> BigDecimal {
        if x.digits() > self.precision { x.with_prec(self.precision) } else { x }
    }
}

/// Arithmetic on one rung of the numeric tower.
///
/// Both operands have already been promoted to the same rung. Results may
/// climb the tower (an overflowing `i64` sum becomes a big integer, an
/// inexact integer quotient becomes a rational) but never fall below the
/// operands' rung, except that a rational with denominator 1 becomes an
/// integer.
pub trait Kernel: Sized {
    /// Wraps the operand back into a [`Value`].
    fn into_value(self) -> Value;
    /// `self + rhs`
    fn add(self, rhs: Self, arith: Arith) -> EvalResult<Value>;
    /// `self - rhs`
    fn sub(self, rhs: Self, arith: Arith) -> EvalResult<Value>;
    /// `self * rhs`
    fn mul(self, rhs: Self, arith: Arith) -> EvalResult<Value>;
    /// Exact division, `self / rhs`.
    fn div(self, rhs: Self, arith: Arith) -> EvalResult<Value>;
    /// Total order between two operands of the same rung.
    fn compare(&self, rhs: &Self) -> Ordering;

    /// Floored integer division. Only integers support it.
    fn int_div(self, _rhs: Self, arith: Arith) -> EvalResult<Value> {
        Err(integers_only("div", arith.line))
    }

    /// Floored modulus. Only integers support it.
    fn modulo(self, _rhs: Self, arith: Arith) -> EvalResult<Value> {
        Err(integers_only("mod", arith.line))
    }
}

fn integers_only(op: &str, line: usize) -> RuntimeError {
    RuntimeError::DomainError { details: format!("'{op}' requires integer operands"),
                                line }
}

/// Returns `Int` when `n` fits in 64 bits, `BigInt` otherwise.
#[must_use]
pub fn int_or_big(n: BigInt) -> Value {
    n.to_i64().map_or(Value::BigInt(n), Value::Int)
}

/// Normalizes a rational: a denominator of 1 yields an integer.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use num_rational::BigRational;
/// use ravel::interpreter::value::{core::Value, number::normalize_rational};
///
/// let half = BigRational::new(BigInt::from(1), BigInt::from(2));
/// let two = BigRational::new(BigInt::from(4), BigInt::from(2));
///
/// assert_eq!(normalize_rational(half.clone()), Value::BigRat(half));
/// assert_eq!(normalize_rational(two), Value::Int(2));
/// ```
#[must_use]
pub fn normalize_rational(r: BigRational) -> Value {
    if r.is_integer() { int_or_big(r.to_integer()) } else { Value::BigRat(r) }
}

/// Converts a rational to a float rounded to the configured precision.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use num_rational::BigRational;
/// use ravel::interpreter::value::number::{Arith, rational_to_float};
///
/// let third = BigRational::new(BigInt::from(1), BigInt::from(3));
/// let digits = rational_to_float(&third, Arith::new(150, 1)).to_string();
///
/// assert_eq!(digits.len(), "0.".len() + 150);
/// ```
#[must_use]
pub fn rational_to_float(r: &BigRational, arith: Arith) -> BigDecimal {
    divide(r.numer(), r.denom(), 0, arith)
}

/// Number of decimal digits in `n`, ignoring the sign.
fn decimal_digits(n: &BigInt) -> u64 {
    n.magnitude().to_str_radix(10).len() as u64
}

fn power_of_ten(exp: u64) -> BigInt {
    BigInt::from(10u8).pow(u32::try_from(exp).unwrap_or(u32::MAX))
}

/// `numer / denom * 10^-scale`, rounded to `arith.precision` significant
/// digits.
///
/// The dividend is widened with two guard digits beyond the precision
/// before the integer division, so the result does not depend on
/// bigdecimal's own division limit.
fn divide(numer: &BigInt, denom: &BigInt, scale: i64, arith: Arith) -> BigDecimal {
    let wanted = arith.precision + 2 + decimal_digits(denom);
    let shift = wanted.saturating_sub(decimal_digits(numer));
    let quotient = numer * power_of_ten(shift) / denom;
    let exponent = i64::try_from(shift).unwrap_or(i64::MAX).saturating_add(scale);
    arith.round(BigDecimal::new(quotient, exponent))
}

/// Float division at the configured precision. `rhs` must not be zero.
fn divide_floats(lhs: BigDecimal, rhs: BigDecimal, arith: Arith) -> BigDecimal {
    let (numer, numer_scale) = lhs.into_bigint_and_exponent();
    let (denom, denom_scale) = rhs.into_bigint_and_exponent();
    divide(&numer, &denom, numer_scale - denom_scale, arith)
}

impl Kernel for i64 {
    fn into_value(self) -> Value {
        Value::Int(self)
    }

    fn add(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(self.checked_add(rhs)
               .map_or_else(|| Value::BigInt(BigInt::from(self) + rhs), Value::Int))
    }

    fn sub(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(self.checked_sub(rhs)
               .map_or_else(|| Value::BigInt(BigInt::from(self) - rhs), Value::Int))
    }

    fn mul(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(self.checked_mul(rhs)
               .map_or_else(|| Value::BigInt(BigInt::from(self) * rhs), Value::Int))
    }

    fn div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs == 0 {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        if let Some(q) = self.checked_div(rhs)
           && q * rhs == self
        {
            return Ok(Value::Int(q));
        }
        Ok(normalize_rational(BigRational::new(self.into(), rhs.into())))
    }

    fn compare(&self, rhs: &Self) -> Ordering {
        self.cmp(rhs)
    }

    fn int_div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs == 0 {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(int_or_big(BigInt::from(self).div_floor(&BigInt::from(rhs))))
    }

    fn modulo(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs == 0 {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(int_or_big(BigInt::from(self).mod_floor(&BigInt::from(rhs))))
    }
}

impl Kernel for BigInt {
    fn into_value(self) -> Value {
        Value::BigInt(self)
    }

    fn add(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigInt(self + rhs))
    }

    fn sub(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigInt(self - rhs))
    }

    fn mul(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigInt(self * rhs))
    }

    fn div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        if (&self % &rhs).is_zero() {
            return Ok(Value::BigInt(self / rhs));
        }
        Ok(normalize_rational(BigRational::new(self, rhs)))
    }

    fn compare(&self, rhs: &Self) -> Ordering {
        self.cmp(rhs)
    }

    fn int_div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(Value::BigInt(self.div_floor(&rhs)))
    }

    fn modulo(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(Value::BigInt(self.mod_floor(&rhs)))
    }
}

impl Kernel for BigRational {
    fn into_value(self) -> Value {
        normalize_rational(self)
    }

    fn add(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(normalize_rational(self + rhs))
    }

    fn sub(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(normalize_rational(self - rhs))
    }

    fn mul(self, rhs: Self, _arith: Arith) -> EvalResult<Value> {
        Ok(normalize_rational(self * rhs))
    }

    fn div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(normalize_rational(self / rhs))
    }

    fn compare(&self, rhs: &Self) -> Ordering {
        self.cmp(rhs)
    }
}

impl Kernel for BigDecimal {
    fn into_value(self) -> Value {
        Value::BigFloat(self)
    }

    fn add(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigFloat(arith.round(self + rhs)))
    }

    fn sub(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigFloat(arith.round(self - rhs)))
    }

    fn mul(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        Ok(Value::BigFloat(arith.round(self * rhs)))
    }

    fn div(self, rhs: Self, arith: Arith) -> EvalResult<Value> {
        if rhs.is_zero() {
            return Err(RuntimeError::DivisionByZero { line: arith.line });
        }
        Ok(Value::BigFloat(divide_floats(self, rhs, arith)))
    }

    fn compare(&self, rhs: &Self) -> Ordering {
        self.cmp(rhs)
    }
}

/// Two numeric operands lifted to the higher of their two rungs.
#[derive(Debug, Clone, PartialEq)]
pub enum Promoted {
    /// Both operands are machine integers.
    Int(i64, i64),
    /// Both operands are big integers.
    BigInt(BigInt, BigInt),
    /// Both operands are rationals.
    BigRat(BigRational, BigRational),
    /// Both operands are floats.
    BigFloat(BigDecimal, BigDecimal),
}

/// Lifts the lower-ranked operand to the rank of the higher one.
///
/// # Errors
/// Returns `TypeError` when either operand is not numeric.
///
/// # Example
/// ```
/// use num_bigint::BigInt;
/// use ravel::interpreter::value::{
///     core::Value,
///     number::{Arith, Promoted, promote},
/// };
///
/// let big = Value::BigInt(BigInt::from(10).pow(30));
/// let pair = promote(&Value::Int(1), &big, Arith::new(32, 1)).unwrap();
///
/// assert!(matches!(pair, Promoted::BigInt(..)));
/// ```
pub fn promote(left: &Value, right: &Value, arith: Arith) -> EvalResult<Promoted> {
    let (Some(l), Some(r)) = (left.kind().rank(), right.kind().rank()) else {
        return Err(RuntimeError::TypeError { details: format!("expected numbers, found {} and {}",
                                                              left.kind(),
                                                              right.kind()),
                                             line:    arith.line, });
    };

    let pair = match l.max(r) {
        0 => match (left, right) {
            (Value::Int(a), Value::Int(b)) => Promoted::Int(*a, *b),
            _ => unreachable_rank(arith.line)?,
        },
        1 => Promoted::BigInt(to_bigint(left, arith)?, to_bigint(right, arith)?),
        2 => Promoted::BigRat(to_rational(left, arith)?, to_rational(right, arith)?),
        _ => Promoted::BigFloat(to_float(left, arith)?, to_float(right, arith)?),
    };
    Ok(pair)
}

fn unreachable_rank<T>(line: usize) -> EvalResult<T> {
    Err(RuntimeError::TypeError { details: "inconsistent numeric rank".to_string(),
                                  line })
}

/// Converts an integer value to a big integer.
pub fn to_bigint(value: &Value, arith: Arith) -> EvalResult<BigInt> {
    match value {
        Value::Int(n) => Ok(BigInt::from(*n)),
        Value::BigInt(n) => Ok(n.clone()),
        other => Err(RuntimeError::ConversionError { from: other.kind(),
                                                     to:   Kind::BigInt,
                                                     line: arith.line, }),
    }
}

/// Converts an integer or rational value to a rational.
pub fn to_rational(value: &Value, arith: Arith) -> EvalResult<BigRational> {
    match value {
        Value::Int(n) => Ok(BigRational::from_integer(BigInt::from(*n))),
        Value::BigInt(n) => Ok(BigRational::from_integer(n.clone())),
        Value::BigRat(r) => Ok(r.clone()),
        other => Err(RuntimeError::ConversionError { from: other.kind(),
                                                     to:   Kind::BigRat,
                                                     line: arith.line, }),
    }
}

/// Converts any numeric value to a float.
pub fn to_float(value: &Value, arith: Arith) -> EvalResult<BigDecimal> {
    match value {
        Value::Int(n) => Ok(BigDecimal::from(*n)),
        Value::BigInt(n) => Ok(BigDecimal::new(n.clone(), 0)),
        Value::BigRat(r) => Ok(rational_to_float(r, arith)),
        Value::BigFloat(f) => Ok(f.clone()),
        other => Err(RuntimeError::ConversionError { from: other.kind(),
                                                     to:   Kind::BigFloat,
                                                     line: arith.line, }),
    }
}

/// Applies an arithmetic or comparison operator to two numeric scalars.
///
/// # Errors
/// Fails with `TypeError` for non-numeric operands, with `DivisionByZero`,
/// or with `DomainError` when `div`/`mod` meet non-integers.
///
/// # Example
/// ```
/// use ravel::{
///     ast::BinaryOperator,
///     interpreter::value::{core::Value, number::{Arith, numeric_binary}},
/// };
///
/// let arith = Arith::new(32, 1);
/// let sum = numeric_binary(BinaryOperator::Add, &Value::Int(i64::MAX), &Value::Int(1), arith);
///
/// assert!(matches!(sum.unwrap(), Value::BigInt(_)));
/// ```
pub fn numeric_binary(op: BinaryOperator,
                      left: &Value,
                      right: &Value,
                      arith: Arith)
                      -> EvalResult<Value> {
    if op == BinaryOperator::Pow {
        return pow(left, right, arith);
    }
    match promote(left, right, arith)? {
        Promoted::Int(a, b) => apply(op, a, b, arith),
        Promoted::BigInt(a, b) => apply(op, a, b, arith),
        Promoted::BigRat(a, b) => apply(op, a, b, arith),
        Promoted::BigFloat(a, b) => apply(op, a, b, arith),
    }
}

fn apply<K: Kernel>(op: BinaryOperator, a: K, b: K, arith: Arith) -> EvalResult<Value> {
    use BinaryOperator::{
        Add, Div, Equal, Greater, GreaterEqual, IntDiv, Less, LessEqual, Max, Min, Mod, Mul,
        NotEqual, Sub,
    };

    match op {
        Add => a.add(b, arith),
        Sub => a.sub(b, arith),
        Mul => a.mul(b, arith),
        Div => a.div(b, arith),
        IntDiv => a.int_div(b, arith),
        Mod => a.modulo(b, arith),
        Min => Ok(if a.compare(&b) == Ordering::Greater { b } else { a }.into_value()),
        Max => Ok(if a.compare(&b) == Ordering::Less { b } else { a }.into_value()),
        Equal | NotEqual | Less | LessEqual | Greater | GreaterEqual => {
            Ok(Value::from(ordering_holds(op, a.compare(&b))))
        },
        _ => Err(RuntimeError::UndefinedOperator { op:    op.to_string(),
                                                   kinds: "numbers".to_string(),
                                                   line:  arith.line, }),
    }
}

/// Tells whether a comparison operator accepts the given ordering.
#[must_use]
pub fn ordering_holds(op: BinaryOperator, ordering: Ordering) -> bool {
    match op {
        BinaryOperator::Equal => ordering == Ordering::Equal,
        BinaryOperator::NotEqual => ordering != Ordering::Equal,
        BinaryOperator::Less => ordering == Ordering::Less,
        BinaryOperator::LessEqual => ordering != Ordering::Greater,
        BinaryOperator::Greater => ordering == Ordering::Greater,
        BinaryOperator::GreaterEqual => ordering != Ordering::Less,
        _ => false,
    }
}

/// Raises `base` to an integer power.
///
/// Integer bases with negative exponents produce exact rationals. A float
/// or rational exponent is accepted when its value is an integer; a float
/// exponent makes the result a float. Any other exponent is a domain error,
/// as is an exact result wider than [`MAX_POWER_BITS`].
///
/// # Example
/// ```
/// use std::str::FromStr;
///
/// use bigdecimal::BigDecimal;
/// use num_bigint::BigInt;
/// use num_rational::BigRational;
/// use ravel::interpreter::value::{core::{Kind, Value}, number::{Arith, pow}};
///
/// let arith = Arith::new(32, 1);
/// let half = Value::BigRat(BigRational::new(BigInt::from(1), BigInt::from(2)));
/// let two = Value::BigFloat(BigDecimal::from_str("2.0").unwrap());
///
/// assert_eq!(pow(&Value::Int(2), &Value::Int(10), arith).unwrap(), Value::Int(1024));
/// assert_eq!(pow(&Value::Int(2), &Value::Int(-1), arith).unwrap(), half);
/// assert_eq!(pow(&Value::Int(3), &two, arith).unwrap().kind(), Kind::BigFloat);
/// assert!(pow(&Value::Int(2), &half, arith).is_err());
/// ```
pub fn pow(base: &Value, exponent: &Value, arith: Arith) -> EvalResult<Value> {
    let too_large = || RuntimeError::DomainError { details: "exponent too large".to_string(),
                                                   line:    arith.line, };
    let exp = match exponent {
        Value::Int(e) => *e,
        Value::BigInt(_) => return Err(too_large()),
        Value::BigRat(r) if r.is_integer() => r.to_integer().to_i64().ok_or_else(too_large)?,
        Value::BigFloat(f) if f.is_integer() => f.to_i64().ok_or_else(too_large)?,
        Value::BigRat(_) | Value::BigFloat(_) => {
            return Err(RuntimeError::DomainError { details: format!("non-integer exponent {exponent}"),
                                                   line:    arith.line, });
        },
        other => {
            return Err(RuntimeError::TypeError { details: format!("exponent must be a number, found {}",
                                                                  other.kind()),
                                                 line:    arith.line, });
        },
    };
    if exp.unsigned_abs() > MAX_EXPONENT.unsigned_abs() {
        return Err(too_large());
    }
    let magnitude = u32::try_from(exp.unsigned_abs()).map_err(|_| too_large())?;

    let result = raise(base, exp, magnitude, arith)?;
    match exponent {
        Value::BigFloat(_) => Ok(Value::BigFloat(to_float(&result, arith)?)),
        _ => Ok(result),
    }
}

/// Fails when `bits` raised to `magnitude` would exceed [`MAX_POWER_BITS`].
fn check_power_size(bits: u64, magnitude: u32, line: usize) -> EvalResult<()> {
    if bits.saturating_mul(u64::from(magnitude)) > MAX_POWER_BITS {
        return Err(RuntimeError::DomainError { details: "result of '**' is too large".to_string(),
                                               line });
    }
    Ok(())
}

fn raise(base: &Value, exp: i64, magnitude: u32, arith: Arith) -> EvalResult<Value> {
    match base {
        Value::Int(_) | Value::BigInt(_) => {
            let b = to_bigint(base, arith)?;
            check_power_size(b.bits(), magnitude, arith.line)?;
            if exp >= 0 {
                let raised = b.pow(magnitude);
                return Ok(match base {
                              Value::Int(_) => int_or_big(raised),
                              _ => Value::BigInt(raised),
                          });
            }
            if b.is_zero() {
                return Err(RuntimeError::DivisionByZero { line: arith.line });
            }
            Ok(normalize_rational(BigRational::new(BigInt::one(), b.pow(magnitude))))
        },
        Value::BigRat(r) => {
            check_power_size(r.numer().bits().max(r.denom().bits()), magnitude, arith.line)?;
            let numer = r.numer().pow(magnitude);
            let denom = r.denom().pow(magnitude);
            if exp >= 0 {
                return Ok(normalize_rational(BigRational::new(numer, denom)));
            }
            if numer.is_zero() {
                return Err(RuntimeError::DivisionByZero { line: arith.line });
            }
            Ok(normalize_rational(BigRational::new(denom, numer)))
        },
        Value::BigFloat(f) => {
            let mut result = BigDecimal::one();
            let mut square = f.clone();
            let mut remaining = magnitude;
            while remaining > 0 {
                if remaining & 1 == 1 {
                    result = arith.round(result * &square);
                }
                square = arith.round(&square * &square);
                remaining >>= 1;
            }
            if exp >= 0 {
                return Ok(Value::BigFloat(result));
            }
            if result.is_zero() {
                return Err(RuntimeError::DivisionByZero { line: arith.line });
            }
            Ok(Value::BigFloat(divide_floats(BigDecimal::one(), result, arith)))
        },
        other => Err(RuntimeError::UndefinedOperator { op:    "**".to_string(),
                                                       kinds: other.kind().to_string(),
                                                       line:  arith.line, }),
    }
}

/// Which way `floor`/`ceil` round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rounding {
    /// Toward negative infinity.
    Floor,
    /// Toward positive infinity.
    Ceil,
}

/// Rounds a number to an integer.
pub fn round_to_integer(value: &Value, rounding: Rounding, arith: Arith) -> EvalResult<Value> {
    match value {
        Value::Int(_) | Value::BigInt(_) => Ok(value.clone()),
        Value::BigRat(r) => {
            let rounded = match rounding {
                Rounding::Floor => r.floor(),
                Rounding::Ceil => r.ceil(),
            };
            Ok(int_or_big(rounded.to_integer()))
        },
        Value::BigFloat(f) => {
            let mode = match rounding {
                Rounding::Floor => RoundingMode::Floor,
                Rounding::Ceil => RoundingMode::Ceiling,
            };
            let (digits, _) = f.with_scale_round(0, mode).into_bigint_and_exponent();
            Ok(int_or_big(digits))
        },
        other => Err(RuntimeError::TypeError { details: format!("cannot round {}", other.kind()),
                                               line:    arith.line, }),
    }
}

/// Negates a number; `-i64::MIN` climbs to a big integer.
pub fn negate(value: &Value, arith: Arith) -> EvalResult<Value> {
    match value {
        Value::Int(n) => Ok(n.checked_neg()
                             .map_or_else(|| Value::BigInt(-BigInt::from(*n)), Value::Int)),
        Value::BigInt(n) => Ok(Value::BigInt(-n)),
        Value::BigRat(r) => Ok(Value::BigRat(-r)),
        Value::BigFloat(f) => Ok(Value::BigFloat(-f)),
        other => Err(RuntimeError::TypeError { details: format!("cannot negate {}", other.kind()),
                                               line:    arith.line, }),
    }
}

/// Returns the sign of a number as `-1`, `0` or `1`.
pub fn signum(value: &Value, arith: Arith) -> EvalResult<Value> {
    let ordering = match value {
        Value::Int(n) => n.cmp(&0),
        Value::BigInt(n) => n.sign().cmp_zero(),
        Value::BigRat(r) => r.numer().sign().cmp_zero(),
        Value::BigFloat(f) => f.sign().cmp_zero(),
        other => {
            return Err(RuntimeError::TypeError { details: format!("no sign for {}", other.kind()),
                                                 line:    arith.line, });
        },
    };
    Ok(Value::Int(ordering as i64))
}

trait SignExt {
    fn cmp_zero(self) -> Ordering;
}

impl SignExt for Sign {
    fn cmp_zero(self) -> Ordering {
        match self {
            Sign::Minus => Ordering::Less,
            Sign::NoSign => Ordering::Equal,
            Sign::Plus => Ordering::Greater,
        }
    }
}

/// Absolute value of a number.
pub fn absolute(value: &Value, arith: Arith) -> EvalResult<Value> {
    match value {
        Value::Int(n) => Ok(n.checked_abs()
                             .map_or_else(|| Value::BigInt(BigInt::from(*n).abs()), Value::Int)),
        Value::BigInt(n) => Ok(Value::BigInt(n.abs())),
        Value::BigRat(r) => Ok(Value::BigRat(r.abs())),
        Value::BigFloat(f) => Ok(Value::BigFloat(f.abs())),
        other => Err(RuntimeError::TypeError { details: format!("no absolute value for {}",
                                                                other.kind()),
                                               line:    arith.line, }),
    }
}

/// Square root, always a float.
///
/// The radicand is widened to twice the precision plus guard digits and
/// its integer square root taken, so any precision is honoured.
pub fn square_root(value: &Value, arith: Arith) -> EvalResult<Value> {
    let x = to_float(value, arith)?;
    if x.sign() == Sign::Minus {
        return Err(RuntimeError::DomainError { details: format!("square root of negative number {value}"),
                                               line:    arith.line, });
    }
    let (digits, scale) = x.into_bigint_and_exponent();
    let wanted = 2 * (arith.precision + 2);
    let mut shift = wanted.saturating_sub(decimal_digits(&digits));
    let mut exponent = i64::try_from(shift).unwrap_or(i64::MAX).saturating_add(scale);
    if exponent % 2 != 0 {
        shift += 1;
        exponent += 1;
    }
    let root = (digits * power_of_ten(shift)).sqrt();
    Ok(Value::BigFloat(arith.round(BigDecimal::new(root, exponent / 2))))
}

/// Tells whether a numeric value is zero. Non-numbers are never zero.
#[must_use]
pub fn is_zero(value: &Value) -> bool {
    match value {
        Value::Int(n) => *n == 0,
        Value::BigInt(n) => n.is_zero(),
        Value::BigRat(r) => r.is_zero(),
        Value::BigFloat(f) => f.is_zero(),
        _ => false,
    }
}
