use crate::{
    ast::{BinaryOperator, UnaryOperator},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            matrix::Matrix,
            number::{Rounding, absolute, is_zero, negate, round_to_integer, signum, square_root,
                     to_float},
        },
    },
    util::num::{count_from_i64, usize_to_i64_checked},
};

impl Context {
    /// Evaluates a unary operation on a value.
    ///
    /// Scalar operators (`-`, `abs`, `sgn`, `floor`, `ceil`, `sqrt`,
    /// `float`, `not`) apply element by element to vectors, strings and
    /// matrices. The structural operators work on the value as a whole:
    /// - `iota n`: the integers `origin .. origin + n - 1`;
    /// - `rho x`: the shape of `x` as a vector;
    /// - `, x`: `x` flattened to a vector;
    /// - `transp x`: `x` with its axes reversed;
    /// - `+/ x` and friends: a right-to-left reduction along the last axis.
    ///
    /// # Parameters
    /// - `op`: The unary operator.
    /// - `value`: The evaluated operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// The result of the operation.
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::UnaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    /// let result = context.eval_unary(UnaryOperator::Iota, &Value::Int(3), 1).unwrap();
    ///
    /// assert_eq!(result, Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    /// ```
    pub fn eval_unary(&self, op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match op {
            UnaryOperator::Identity => Ok(value.clone()),
            UnaryOperator::Iota => self.eval_iota(value, line),
            UnaryOperator::Shape => Self::eval_shape(value, line),
            UnaryOperator::Ravel => Self::eval_ravel(value, line),
            UnaryOperator::Transpose => match value {
                Value::Matrix(m) => Ok(Value::Matrix(m.transpose(line)?)),
                Value::Map(_) => Err(undefined(op, value, line)),
                other => Ok(other.clone()),
            },
            UnaryOperator::Reduce(binary) => self.eval_reduce(binary, value, line),
            _ => self.map_scalars(value, line, &|scalar| self.eval_unary_scalar(op, scalar, line)),
        }
    }

    /// Applies `f` to every scalar inside `value`, keeping its structure.
    ///
    /// Strings are treated as vectors of chars.
    pub(crate) fn map_scalars(&self,
                              value: &Value,
                              line: usize,
                              f: &dyn Fn(&Value) -> EvalResult<Value>)
                              -> EvalResult<Value> {
        match value {
            Value::Vector(_) | Value::String(_) => {
                let mapped = value.elements()
                                  .iter()
                                  .map(f)
                                  .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(mapped))
            },
            Value::Matrix(m) => {
                let mapped = m.data().iter().map(f).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Matrix(Matrix::new(m.shape().to_vec(), mapped, line)?))
            },
            Value::Map(_) => Err(RuntimeError::TypeError { details: "maps do not support arithmetic".to_string(),
                                                           line }),
            scalar => f(scalar),
        }
    }

    fn eval_unary_scalar(&self, op: UnaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        if !value.is_numeric() {
            return Err(undefined(op, value, line));
        }
        let arith = self.arith(line);
        match op {
            UnaryOperator::Negate => negate(value, arith),
            UnaryOperator::Abs => absolute(value, arith),
            UnaryOperator::Sign => signum(value, arith),
            UnaryOperator::Floor => round_to_integer(value, Rounding::Floor, arith),
            UnaryOperator::Ceil => round_to_integer(value, Rounding::Ceil, arith),
            UnaryOperator::Sqrt => square_root(value, arith),
            UnaryOperator::Float => Ok(Value::BigFloat(arith.round(to_float(value, arith)?))),
            UnaryOperator::Not => Ok(Value::from(is_zero(value))),
            _ => Err(undefined(op, value, line)),
        }
    }

    fn eval_iota(&self, value: &Value, line: usize) -> EvalResult<Value> {
        if !value.is_numeric() {
            return Err(undefined(UnaryOperator::Iota, value, line));
        }
        let n = count_from_i64(value.as_i64(line)?, "iota", line)?;
        let origin = self.config.origin;
        let last = usize_to_i64_checked(n, line)?;
        Ok(Value::from((0..last).map(|i| Value::Int(origin + i)).collect::<Vec<_>>()))
    }

    fn eval_shape(value: &Value, line: usize) -> EvalResult<Value> {
        let dims = match value {
            Value::Vector(v) => vec![v.len()],
            Value::String(s) => vec![s.chars().count()],
            Value::Matrix(m) => m.shape().to_vec(),
            Value::Map(_) => return Err(undefined(UnaryOperator::Shape, value, line)),
            _ => Vec::new(),
        };
        let dims = dims.into_iter()
                       .map(|d| usize_to_i64_checked(d, line).map(Value::Int))
                       .collect::<EvalResult<Vec<_>>>()?;
        Ok(Value::from(dims))
    }

    fn eval_ravel(value: &Value, line: usize) -> EvalResult<Value> {
        match value {
            Value::Map(_) => Err(undefined(UnaryOperator::Ravel, value, line)),
            other => Ok(Value::from(other.elements())),
        }
    }

    /// Folds `op` from the right along the last axis.
    ///
    /// `-/ 1 2 3` is `1 - (2 - 3)`. An empty vector reduces to the identity
    /// of `op`.
    fn eval_reduce(&self, op: BinaryOperator, value: &Value, line: usize) -> EvalResult<Value> {
        match value {
            Value::Matrix(m) => {
                let Some((&columns, leading)) = m.shape().split_last() else {
                    return Ok(value.clone());
                };
                let mut reduced = if columns == 0 {
                    vec![identity(op, line)?; leading.iter().product()]
                } else {
                    m.data()
                     .chunks(columns)
                     .map(|row| self.fold_right(op, row, line))
                     .collect::<EvalResult<Vec<_>>>()?
                };
                match leading.len() {
                    0 => Ok(reduced.pop().unwrap_or(Value::Int(0))),
                    1 => Ok(Value::from(reduced)),
                    _ => Ok(Value::Matrix(Matrix::new(leading.to_vec(), reduced, line)?)),
                }
            },
            Value::Vector(_) | Value::String(_) => self.fold_right(op, &value.elements(), line),
            Value::Map(_) => Err(undefined(UnaryOperator::Reduce(op), value, line)),
            scalar => Ok(scalar.clone()),
        }
    }

    fn fold_right(&self, op: BinaryOperator, items: &[Value], line: usize) -> EvalResult<Value> {
        let Some((last, rest)) = items.split_last() else {
            return identity(op, line);
        };
        rest.iter()
            .rev()
            .try_fold(last.clone(), |acc, item| self.eval_binary(item, op, &acc, line))
    }
}

fn identity(op: BinaryOperator, line: usize) -> EvalResult<Value> {
    match op {
        BinaryOperator::Add | BinaryOperator::Sub => Ok(Value::Int(0)),
        BinaryOperator::Mul => Ok(Value::Int(1)),
        _ => Err(RuntimeError::DomainError { details: format!("'{op}/' of an empty vector"),
                                             line }),
    }
}

fn undefined(op: UnaryOperator, value: &Value, line: usize) -> RuntimeError {
    RuntimeError::UndefinedOperator { op: op.to_string(),
                                      kinds: value.kind().to_string(),
                                      line }
}
