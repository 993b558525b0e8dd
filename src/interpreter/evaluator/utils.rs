use std::collections::{BTreeMap, HashMap};

use crate::{
    ast::Expr,
    error::RuntimeError,
    interpreter::{
        evaluator::core::{Context, EvalResult},
        value::core::Value,
    },
};

impl Context {
    /// Evaluates a variable reference.
    ///
    /// # Errors
    /// Returns `UndefinedVariable` when no frame binds `name`.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    /// context.assign("x", Value::Int(5));
    ///
    /// assert_eq!(context.lookup("x", 1).unwrap(), Value::Int(5));
    /// assert!(context.lookup("y", 1).is_err());
    /// ```
    pub fn lookup(&self, name: &str, line: usize) -> EvalResult<Value> {
        self.get_variable(name)
            .cloned()
            .ok_or_else(|| RuntimeError::UndefinedVariable { name: name.to_string(),
                                                             line })
    }

    /// Evaluates an assignment expression.
    ///
    /// The target is interpreted syntactically: a plain variable is bound
    /// with [`Context::assign`], an indexed variable is written in place.
    /// The result is the right-hand side wrapped in [`Value::Assignment`].
    ///
    /// # Errors
    /// - `InvalidAssignmentTarget` for any other target shape.
    /// - Errors from [`Context::assign_indexed`] for indexed targets.
    pub fn eval_assign(&mut self, target: &Expr, value: &Expr, line: usize) -> EvalResult<Value> {
        let rhs = self.eval(value)?.into_inner();

        match target {
            Expr::Variable { name, .. } => self.assign(name, rhs.clone()),
            Expr::Index { target: base, index, .. } => {
                let Expr::Variable { name, .. } = base.as_ref() else {
                    return Err(RuntimeError::InvalidAssignmentTarget { line });
                };
                let index = self.eval(index)?.into_inner();
                self.assign_indexed(name, &index, &rhs, line)?;
            },
            _ => return Err(RuntimeError::InvalidAssignmentTarget { line }),
        }

        Ok(Value::Assignment(Box::new(rhs)))
    }

    /// Evaluates a vector literal.
    ///
    /// Elements that are assignments run first, in source order, so that
    /// `x (x = 3)` and `(x = 3) x` both see the new binding. The remaining
    /// elements run second. Every result must be a scalar.
    ///
    /// # Errors
    /// Returns `NonScalarVectorElement` when an element evaluates to a
    /// vector, matrix or map.
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::Expr,
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let x = || Expr::Variable { name: "x".to_string(),
    ///                             line: 1, };
    /// let three = Expr::Literal { value: Value::Int(3),
    ///                             line:  1, };
    /// let assign = Expr::Assign { target: Box::new(x()),
    ///                             value:  Box::new(three),
    ///                             line:   1, };
    ///
    /// let mut context = Context::new();
    /// let v = context.eval_slice(&[x(), assign], 1).unwrap();
    ///
    /// assert_eq!(v, Value::from(vec![Value::Int(3), Value::Int(3)]));
    /// ```
    pub fn eval_slice(&mut self, elements: &[Expr], line: usize) -> EvalResult<Value> {
        let mut results: Vec<Option<Value>> = vec![None; elements.len()];

        for (slot, element) in results.iter_mut().zip(elements) {
            if element.is_assignment() {
                *slot = Some(self.eval(element)?.into_inner());
            }
        }

        let mut values = Vec::with_capacity(elements.len());
        for (slot, element) in results.into_iter().zip(elements) {
            let value = match slot {
                Some(value) => value,
                None => self.eval(element)?.into_inner(),
            };
            if !value.is_scalar() {
                return Err(RuntimeError::NonScalarVectorElement { kind: value.kind(),
                                                                  line });
            }
            values.push(value);
        }

        Ok(Value::from(values))
    }

    /// Evaluates a map literal.
    ///
    /// Every element that is a bare variable becomes an entry keyed by the
    /// variable's name. Other elements are ignored.
    pub fn eval_map(&mut self, elements: &[Expr]) -> EvalResult<Value> {
        let mut entries = BTreeMap::new();
        for element in elements {
            if let Expr::Variable { name, line } = element {
                entries.insert(name.clone(), self.lookup(name, *line)?);
            }
        }
        Ok(Value::Map(entries))
    }

    /// Adds a new innermost scope.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::evaluator::core::Context;
    ///
    /// let mut context = Context::new();
    /// let initial = context.scope_stack.len();
    ///
    /// context.push_scope();
    ///
    /// assert_eq!(context.scope_stack.len(), initial + 1);
    /// ```
    pub fn push_scope(&mut self) {
        self.scope_stack.push(HashMap::new());
    }

    /// Removes the innermost scope. The global scope is never removed.
    pub fn pop_scope(&mut self) {
        if self.scope_stack.len() > 1 {
            self.scope_stack.pop();
        }
    }

    /// Retrieves a variable from the current scope stack.
    ///
    /// Lookup begins at the innermost scope and proceeds outward toward the
    /// global scope.
    #[must_use]
    pub fn get_variable(&self, name: &str) -> Option<&Value> {
        self.scope_stack.iter().rev().find_map(|scope| scope.get(name))
    }

    /// Mutable access to the nearest binding of `name`.
    pub fn get_variable_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.scope_stack.iter_mut().rev().find_map(|scope| scope.get_mut(name))
    }

    /// Defines a variable in the innermost scope.
    pub fn define_local(&mut self, name: &str, value: Value) {
        if let Some(scope) = self.scope_stack.last_mut() {
            scope.insert(name.to_string(), value);
        }
    }

    /// Binds `name` to `value`.
    ///
    /// The nearest scope that already binds the name is updated; otherwise
    /// the name is created in the innermost scope. There is no check against
    /// the kind of any earlier value.
    ///
    /// # Example
    /// ```
    /// use ravel::interpreter::{evaluator::core::Context, value::core::Value};
    ///
    /// let mut context = Context::new();
    ///
    /// context.assign("x", Value::Int(10));
    /// context.assign("x", Value::from("ten"));
    ///
    /// assert_eq!(context.get_variable("x"), Some(&Value::from("ten")));
    /// ```
    pub fn assign(&mut self, name: &str, value: Value) {
        if let Some(slot) = self.get_variable_mut(name) {
            *slot = value;
        } else {
            self.define_local(name, value);
        }
    }

    /// The global variables, sorted by name.
    #[must_use]
    pub fn globals(&self) -> BTreeMap<String, Value> {
        self.scope_stack
            .first()
            .map(|scope| scope.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }
}
