use crate::{
    ast::BinaryOperator,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::{
            core::Value,
            number::{is_zero, numeric_binary, ordering_holds},
        },
    },
};

impl Context {
    /// Evaluates a binary operator on two scalars.
    ///
    /// Numbers go through the numeric tower. `and` and `or` treat any
    /// non-zero number as true. Chars compare by code point, and a char is
    /// never equal to a number.
    ///
    /// # Errors
    /// Returns `UndefinedOperator` when the operator has no meaning for the
    /// operand kinds, plus any arithmetic error from the kernels.
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    ///
    /// let less = context.eval_scalar_op(&Value::Char('a'), BinaryOperator::Less, &Value::Char('b'), 1);
    /// assert_eq!(less.unwrap(), Value::Int(1));
    ///
    /// let third = context.eval_scalar_op(&Value::Int(1), BinaryOperator::Div, &Value::Int(3), 1);
    /// assert_eq!(third.unwrap().to_string(), "1/3");
    /// ```
    pub fn eval_scalar_op(&self,
                          left: &Value,
                          op: BinaryOperator,
                          right: &Value,
                          line: usize)
                          -> EvalResult<Value> {
        use BinaryOperator::{And, Equal, Max, Min, NotEqual, Or};

        match (left, right) {
            (l, r) if l.is_numeric() && r.is_numeric() => match op {
                And => Ok(Value::from(!is_zero(l) && !is_zero(r))),
                Or => Ok(Value::from(!is_zero(l) || !is_zero(r))),
                _ => numeric_binary(op, l, r, self.arith(line)),
            },
            (Value::Char(a), Value::Char(b)) => match op {
                _ if op.is_comparison() => Ok(Value::from(ordering_holds(op, a.cmp(b)))),
                Min => Ok(Value::Char(*a.min(b))),
                Max => Ok(Value::Char(*a.max(b))),
                _ => Err(undefined(left, op, right, line)),
            },
            (Value::String(a), Value::String(b)) if op.is_comparison() => {
                Ok(Value::from(ordering_holds(op, a.cmp(b))))
            },
            _ => match op {
                Equal => Ok(Value::Int(0)),
                NotEqual => Ok(Value::Int(1)),
                _ => Err(undefined(left, op, right, line)),
            },
        }
    }
}

/// Builds the error for an operator applied to unsupported kinds.
pub fn undefined(left: &Value, op: BinaryOperator, right: &Value, line: usize) -> RuntimeError {
    RuntimeError::UndefinedOperator { op: op.to_string(),
                                      kinds: format!("{} and {}", left.kind(), right.kind()),
                                      line }
}
