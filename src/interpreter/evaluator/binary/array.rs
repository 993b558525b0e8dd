use std::rc::Rc;

use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::{
            binary::scalar::undefined,
            core::{Context, EvalResult},
        },
        value::{
            core::Value,
            matrix::{Matrix, join_shape},
        },
    },
    util::num::{MAX_ELEMENTS, count_from_i64},
};

/// An operand seen as either one scalar or a shaped block of scalars.
enum Operand {
    Scalar(Value),
    Vector(Rc<Vec<Value>>),
    Matrix(Matrix),
}

impl Operand {
    /// Strings become vectors of chars and one-element vectors act as
    /// scalars.
    fn from_value(value: &Value) -> Self {
        match value {
            Value::Vector(v) if v.len() == 1 => Self::Scalar(v[0].clone()),
            Value::Vector(v) => Self::Vector(Rc::clone(v)),
            Value::String(_) => match value.elements().as_slice() {
                [single] => Self::Scalar(single.clone()),
                chars => Self::Vector(Rc::new(chars.to_vec())),
            },
            Value::Matrix(m) => Self::Matrix(m.clone()),
            scalar => Self::Scalar(scalar.clone()),
        }
    }
}

impl Context {
    /// Applies a scalar operator across two values, broadcasting scalars.
    ///
    /// # Errors
    /// - `LengthMismatch` for vectors of different lengths.
    /// - `ShapeMismatch` for matrices of different shapes, or a matrix
    ///   paired with a vector.
    /// - `UndefinedOperator` for maps.
    pub fn eval_elementwise(&self,
                            left: &Value,
                            op: BinaryOperator,
                            right: &Value,
                            line: usize)
                            -> EvalResult<Value> {
        if matches!(left, Value::Map(_)) || matches!(right, Value::Map(_)) {
            return Err(undefined(left, op, right, line));
        }
        let apply = |a: &Value, b: &Value| self.eval_scalar_op(a, op, b, line);

        match (Operand::from_value(left), Operand::from_value(right)) {
            (Operand::Scalar(a), Operand::Scalar(b)) => apply(&a, &b),
            (Operand::Vector(a), Operand::Vector(b)) => {
                if a.len() != b.len() {
                    return Err(RuntimeError::LengthMismatch { expected: a.len(),
                                                              found: b.len(),
                                                              line });
                }
                let values = a.iter()
                              .zip(b.iter())
                              .map(|(x, y)| apply(x, y))
                              .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(values))
            },
            (Operand::Vector(a), Operand::Scalar(b)) => {
                let values = a.iter().map(|x| apply(x, &b)).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(values))
            },
            (Operand::Scalar(a), Operand::Vector(b)) => {
                let values = b.iter().map(|y| apply(&a, y)).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::from(values))
            },
            (Operand::Matrix(a), Operand::Matrix(b)) => {
                if a.shape() != b.shape() {
                    return Err(RuntimeError::ShapeMismatch { left: join_shape(a.shape()),
                                                             right: join_shape(b.shape()),
                                                             line });
                }
                let data = a.data()
                            .iter()
                            .zip(b.data())
                            .map(|(x, y)| apply(x, y))
                            .collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Matrix(Matrix::new(a.shape().to_vec(), data, line)?))
            },
            (Operand::Matrix(a), Operand::Scalar(b)) => {
                let data = a.data().iter().map(|x| apply(x, &b)).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Matrix(Matrix::new(a.shape().to_vec(), data, line)?))
            },
            (Operand::Scalar(a), Operand::Matrix(b)) => {
                let data = b.data().iter().map(|y| apply(&a, y)).collect::<EvalResult<Vec<_>>>()?;
                Ok(Value::Matrix(Matrix::new(b.shape().to_vec(), data, line)?))
            },
            (Operand::Matrix(m), Operand::Vector(v)) | (Operand::Vector(v), Operand::Matrix(m)) => {
                Err(RuntimeError::ShapeMismatch { left: join_shape(m.shape()),
                                                  right: v.len().to_string(),
                                                  line })
            },
        }
    }

    /// Joins two values end to end.
    ///
    /// Two strings (or chars) join into a string; anything else joins into
    /// a vector of the operands' elements.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let joined = Context::eval_catenate(&Value::from("ab"), &Value::Char('c'), 1).unwrap();
    /// assert_eq!(joined, Value::from("abc"));
    ///
    /// let v = Context::eval_catenate(&Value::Int(1), &Value::from(vec![Value::Int(2)]), 1);
    /// assert_eq!(v.unwrap(), Value::from(vec![Value::Int(1), Value::Int(2)]));
    /// ```
    pub fn eval_catenate(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        match (left, right) {
            (Value::Map(_), _) | (_, Value::Map(_)) => {
                Err(undefined(left, BinaryOperator::Catenate, right, line))
            },
            (Value::String(_) | Value::Char(_), Value::String(_) | Value::Char(_)) => {
                Ok(Value::String(format!("{left}{right}")))
            },
            _ => {
                let mut elements = left.elements();
                elements.extend(right.elements());
                Ok(Value::from(elements))
            },
        }
    }

    /// Builds a value of the shape given on the left from the elements on
    /// the right, repeating the elements as often as needed.
    ///
    /// A one-dimensional shape yields a vector; longer shapes yield a
    /// matrix.
    ///
    /// # Errors
    /// - `DomainError` for negative sizes, oversize results, or an empty
    ///   source asked to fill a non-empty shape.
    /// - `NonIntegerIndex` for fractional sizes.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let shape = Value::from(vec![Value::Int(2), Value::Int(2)]);
    /// let data = Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    ///
    /// let m = Context::eval_reshape(&shape, &data, 1).unwrap();
    /// assert_eq!(m.to_string(), "1 2\n3 1");
    /// ```
    pub fn eval_reshape(left: &Value, right: &Value, line: usize) -> EvalResult<Value> {
        if matches!(left, Value::Map(_) | Value::String(_)) || matches!(right, Value::Map(_)) {
            return Err(undefined(left, BinaryOperator::Reshape, right, line));
        }
        let shape = left.elements()
                        .iter()
                        .map(|d| count_from_i64(d.as_i64(line)?, "rho", line))
                        .collect::<EvalResult<Vec<_>>>()?;
        let count = shape.iter()
                         .try_fold(1usize, |acc, d| acc.checked_mul(*d))
                         .filter(|n| *n <= MAX_ELEMENTS)
                         .ok_or_else(|| RuntimeError::DomainError { details: format!("shape {} is too large",
                                                                                     join_shape(&shape)),
                                                                    line })?;

        let source = right.elements();
        if source.is_empty() && count > 0 {
            return Err(RuntimeError::DomainError { details: "cannot reshape an empty value".to_string(),
                                                   line });
        }
        let mut data: Vec<Value> = source.into_iter().cycle().take(count).collect();

        match shape.len() {
            // An empty shape selects a single scalar.
            0 => Ok(data.pop().unwrap_or(Value::Int(0))),
            1 => Ok(Value::from(data)),
            _ => Ok(Value::Matrix(Matrix::new(shape, data, line)?)),
        }
    }
}
