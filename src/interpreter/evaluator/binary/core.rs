use crate::{
    ast::BinaryOperator,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a binary operation between two values.
    ///
    /// Catenation (`,`) and reshape (`rho`) work on whole values. Every
    /// other operator is applied element by element: a scalar pairs with
    /// every element of an array, two vectors pair up by position, two
    /// matrices pair up cell by cell. Strings take part as vectors of chars.
    ///
    /// # Parameters
    /// - `left`: Left operand.
    /// - `op`: The operator.
    /// - `right`: Right operand.
    /// - `line`: Line number for error reporting.
    ///
    /// # Returns
    /// An `EvalResult<Value>` containing the evaluated result.
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::BinaryOperator,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let context = Context::new();
    /// let v = Value::from(vec![Value::Int(1), Value::Int(2)]);
    ///
    /// let result = context.eval_binary(&v, BinaryOperator::Mul, &Value::Int(10), 1);
    /// assert_eq!(result.unwrap(), Value::from(vec![Value::Int(10), Value::Int(20)]));
    /// ```
    pub fn eval_binary(&self,
                       left: &Value,
                       op: BinaryOperator,
                       right: &Value,
                       line: usize)
                       -> EvalResult<Value> {
        match op {
            BinaryOperator::Catenate => Self::eval_catenate(left, right, line),
            BinaryOperator::Reshape => Self::eval_reshape(left, right, line),
            _ => self.eval_elementwise(left, op, right, line),
        }
    }
}
