use std::rc::Rc;

use tracing::trace;

use crate::{
    ast::{OperatorDef, Params},
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Calls a user-defined unary operator.
    ///
    /// The argument is bound to the operator's parameter in a fresh scope
    /// and the body is evaluated there. Names the body does not bind
    /// resolve to globals.
    ///
    /// # Errors
    /// - `UndefinedOperator` if no unary operator `name` is registered.
    /// - `RecursionLimit` once calls nest deeper than the configured limit.
    /// - Any error raised by the body.
    ///
    /// # Example
    /// ```
    /// use ravel::{interpreter::{evaluator::core::Context, value::core::Value}, run};
    ///
    /// let mut context = Context::new();
    /// run("op double x = x + x", &mut context).unwrap();
    ///
    /// let result = context.call_unary("double", Value::Int(21), 1).unwrap();
    /// assert_eq!(result, Value::Int(42));
    /// ```
    pub fn call_unary(&mut self, name: &str, arg: Value, line: usize) -> EvalResult<Value> {
        let def = self.unary_operator(name).ok_or_else(|| undefined(name, &[&arg], line))?;
        let Params::Unary { arg: param } = &def.params else {
            return Err(undefined(name, &[&arg], line));
        };
        trace!(name, arg = %arg.canonical(), "calling unary operator");
        let bindings = vec![(param.clone(), arg)];
        self.invoke(&def, bindings, line)
    }

    /// Calls a user-defined binary operator.
    ///
    /// # Errors
    /// - `UndefinedOperator` if no binary operator `name` is registered.
    /// - `RecursionLimit` once calls nest deeper than the configured limit.
    /// - Any error raised by the body.
    pub fn call_binary(&mut self, name: &str, left: Value, right: Value, line: usize) -> EvalResult<Value> {
        let def = self.binary_operator(name)
                      .ok_or_else(|| undefined(name, &[&left, &right], line))?;
        let Params::Binary { left: lhs, right: rhs } = &def.params else {
            return Err(undefined(name, &[&left, &right], line));
        };
        trace!(name, left = %left.canonical(), right = %right.canonical(), "calling binary operator");
        let bindings = vec![(lhs.clone(), left), (rhs.clone(), right)];
        self.invoke(&def, bindings, line)
    }

    fn invoke(&mut self, def: &Rc<OperatorDef>, bindings: Vec<(String, Value)>, line: usize) -> EvalResult<Value> {
        if self.depth >= self.config.max_depth {
            return Err(RuntimeError::RecursionLimit { name: def.name.clone(),
                                                      line });
        }

        self.push_scope();
        for (name, value) in bindings {
            self.define_local(&name, value);
        }
        self.depth += 1;
        let result = self.eval(&def.body);
        self.depth -= 1;
        self.pop_scope();

        result.map(Value::into_inner)
    }
}

fn undefined(name: &str, args: &[&Value], line: usize) -> RuntimeError {
    let kinds = args.iter().map(|v| v.kind().to_string()).collect::<Vec<_>>().join(" and ");
    RuntimeError::UndefinedOperator { op: name.to_string(),
                                      kinds,
                                      line }
}
