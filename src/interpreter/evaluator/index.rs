use std::rc::Rc;

use crate::{
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{core::Value, matrix::Matrix},
    },
    util::num::index_offset,
};

impl Context {
    /// Reads `target[index]`.
    ///
    /// A scalar index selects one element of a vector, one char of a string
    /// or one row of a matrix. A vector of indices selects several, in
    /// order. Indices count from the configured origin.
    ///
    /// # Errors
    /// - `IndexOutOfRange` when an index falls outside the target.
    /// - `NonIntegerIndex` when an index is a rational or float.
    /// - `TypeError` when the target cannot be indexed.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let context = Context::new();
    /// let v = Value::from(vec![Value::Int(10), Value::Int(20), Value::Int(30)]);
    ///
    /// assert_eq!(context.index_value(&v, &Value::Int(2), 1).unwrap(), Value::Int(20));
    /// assert!(context.index_value(&v, &Value::Int(4), 1).is_err());
    /// ```
    pub fn index_value(&self, target: &Value, index: &Value, line: usize) -> EvalResult<Value> {
        match index {
            Value::Vector(indices) => {
                let picked = indices.iter()
                                    .map(|i| self.index_value(target, i, line))
                                    .collect::<EvalResult<Vec<_>>>()?;
                match target {
                    Value::Matrix(m) if m.shape().len() > 1 => {
                        let mut shape = vec![picked.len()];
                        shape.extend_from_slice(&m.shape()[1..]);
                        let data = picked.iter().flat_map(Value::elements).collect();
                        Ok(Value::Matrix(Matrix::new(shape, data, line)?))
                    },
                    _ => Ok(Value::from(picked)),
                }
            },
            _ => {
                let i = index.as_i64(line)?;
                let origin = self.config.origin;
                match target {
                    Value::Vector(v) => Ok(v[index_offset(i, origin, v.len(), line)?].clone()),
                    Value::String(s) => {
                        let len = s.chars().count();
                        let offset = index_offset(i, origin, len, line)?;
                        s.chars()
                         .nth(offset)
                         .map(Value::Char)
                         .ok_or(RuntimeError::IndexOutOfRange { index: i.to_string(),
                                                                len,
                                                                line })
                    },
                    Value::Matrix(m) => m.row(index_offset(i, origin, m.shape()[0], line)?, line),
                    other => Err(RuntimeError::TypeError { details: format!("cannot index {}",
                                                                            other.kind()),
                                                           line }),
                }
            },
        }
    }

    /// Writes `name[index] = rhs` in place.
    ///
    /// With a scalar index, `rhs` must be a scalar. With a vector of indices,
    /// `rhs` must be a vector of the same length; every index is checked
    /// before any element is written, so a failing assignment leaves the
    /// vector untouched.
    ///
    /// # Errors
    /// - `UnknownTarget` when `name` is unbound.
    /// - `InvalidAssignmentTarget` when `name` does not hold a vector.
    /// - `IndexOutOfRange`, `NonIntegerIndex` for bad indices.
    /// - `LengthMismatch` when index and value counts differ.
    /// - `NonScalarVectorElement` for a non-scalar single value.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    /// context.assign("v", Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
    ///
    /// let indices = Value::from(vec![Value::Int(1), Value::Int(5)]);
    /// let values = Value::from(vec![Value::Int(7), Value::Int(8)]);
    /// assert!(context.assign_indexed("v", &indices, &values, 1).is_err());
    ///
    /// let unchanged = Value::from(vec![Value::Int(1), Value::Int(2), Value::Int(3)]);
    /// assert_eq!(context.get_variable("v"), Some(&unchanged));
    /// ```
    pub fn assign_indexed(&mut self,
                          name: &str,
                          index: &Value,
                          rhs: &Value,
                          line: usize)
                          -> EvalResult<()> {
        let origin = self.config.origin;
        let slot = self.get_variable_mut(name)
                       .ok_or_else(|| RuntimeError::UnknownTarget { name: name.to_string(),
                                                                    line })?;
        let Value::Vector(storage) = slot else {
            return Err(RuntimeError::InvalidAssignmentTarget { line });
        };
        let len = storage.len();

        if let Value::Vector(indices) = index {
            let values = match rhs {
                Value::Vector(_) | Value::String(_) => rhs.elements(),
                other => {
                    return Err(RuntimeError::TypeError { details: format!("assigning to {} indices needs a vector, found {}",
                                                                          indices.len(),
                                                                          other.kind()),
                                                         line });
                },
            };
            if values.len() != indices.len() {
                return Err(RuntimeError::LengthMismatch { expected: indices.len(),
                                                          found: values.len(),
                                                          line });
            }
            let offsets = indices.iter()
                                 .map(|i| index_offset(i.as_i64(line)?, origin, len, line))
                                 .collect::<EvalResult<Vec<_>>>()?;

            let elements = Rc::make_mut(storage);
            for (offset, value) in offsets.into_iter().zip(values) {
                elements[offset] = value;
            }
            return Ok(());
        }

        let offset = index_offset(index.as_i64(line)?, origin, len, line)?;
        if !rhs.is_scalar() {
            return Err(RuntimeError::NonScalarVectorElement { kind: rhs.kind(),
                                                              line });
        }
        Rc::make_mut(storage)[offset] = rhs.clone();
        Ok(())
    }
}
