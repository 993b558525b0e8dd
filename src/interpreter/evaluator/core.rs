use std::{collections::HashMap, rc::Rc};

use tracing::debug;

use crate::{
    ast::{Expr, OperatorDef, Statement},
    config::Config,
    error::RuntimeError,
    interpreter::{
        parser::core::OperatorRegistry,
        value::{core::Value, number::Arith},
    },
};

/// Result type used by the evaluator.
///
/// All evaluation functions return either a value of type `T` or a
/// `RuntimeError` describing the failure.
pub type EvalResult<T> = Result<T, RuntimeError>;

/// Stores the runtime evaluation context.
///
/// This struct holds the interpreter state: variable bindings, the
/// user-defined unary and binary operator registries and the session
/// configuration.
///
/// ## Usage
///
/// `Context` is created once per session and reused for every line. The
/// parser reads its operator registries through [`OperatorRegistry`] to
/// decide whether an identifier is an operator or an operand, so defining an
/// operator changes how later text parses.
pub struct Context {
    /// Variable frames, global first. User operator calls push a frame for
    /// their parameters.
    pub scope_stack: Vec<HashMap<String, Value>>,
    /// Session configuration.
    pub config:      Config,
    unary_ops:       HashMap<String, Rc<OperatorDef>>,
    binary_ops:      HashMap<String, Rc<OperatorDef>>,
    pub(crate) depth: usize,
}

impl Default for Context {
    fn default() -> Self {
        Self::new()
    }
}

impl Context {
    /// Creates a new evaluation context with no variables, no user-defined
    /// operators and the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(Config::default())
    }

    /// Creates a new evaluation context with the given configuration.
    #[must_use]
    pub fn with_config(config: Config) -> Self {
        Self { scope_stack: vec![HashMap::new()],
               config,
               unary_ops: HashMap::new(),
               binary_ops: HashMap::new(),
               depth: 0 }
    }

    /// Kernel parameters for arithmetic reported against `line`.
    #[must_use]
    pub const fn arith(&self, line: usize) -> Arith {
        Arith::new(self.config.float_precision, line)
    }

    /// Evaluates an expression and returns the resulting value.
    ///
    /// This is the main entry point for expression evaluation. Operands of
    /// unary and binary operators are unwrapped from any `Assignment`
    /// before the operator sees them; binary operators evaluate their left
    /// operand first.
    ///
    /// # Parameters
    /// - `expr`: Expression to evaluate.
    ///
    /// # Returns
    /// The value of the expression. Assignments return their right-hand
    /// side wrapped in [`Value::Assignment`].
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::{BinaryOperator, Expr},
    ///     interpreter::{evaluator::core::Context, value::core::Value},
    /// };
    ///
    /// let mut context = Context::new();
    /// let expr = Expr::Binary { left:  Box::new(Expr::Literal { value: Value::Int(2),
    ///                                                           line:  1, }),
    ///                           op:    BinaryOperator::Mul,
    ///                           right: Box::new(Expr::Literal { value: Value::Int(21),
    ///                                                           line:  1, }),
    ///                           line:  1, };
    ///
    /// assert_eq!(context.eval(&expr).unwrap(), Value::Int(42));
    /// ```
    pub fn eval(&mut self, expr: &Expr) -> EvalResult<Value> {
        match expr {
            Expr::Literal { value, .. } => Ok(value.clone()),
            Expr::Variable { name, line } => self.lookup(name, *line),
            Expr::Unary { op, operand, line } => {
                let value = self.eval(operand)?.into_inner();
                self.eval_unary(*op, &value, *line)
            },
            Expr::Binary { left, op, right, line } => {
                let left = self.eval(left)?.into_inner();
                let right = self.eval(right)?.into_inner();
                self.eval_binary(&left, *op, &right, *line)
            },
            Expr::Index { target, index, line } => {
                let target = self.eval(target)?.into_inner();
                let index = self.eval(index)?.into_inner();
                self.index_value(&target, &index, *line)
            },
            Expr::Assign { target, value, line } => self.eval_assign(target, value, *line),
            Expr::Slice { elements, line } => self.eval_slice(elements, *line),
            Expr::Map { elements, .. } => self.eval_map(elements),
            Expr::UnaryCall { name, operand, line } => {
                let value = self.eval(operand)?.into_inner();
                self.call_unary(name, value, *line)
            },
            Expr::BinaryCall { left, name, right, line } => {
                let left = self.eval(left)?.into_inner();
                let right = self.eval(right)?.into_inner();
                self.call_binary(name, left, right, *line)
            },
        }
    }

    /// Evaluates a single statement.
    ///
    /// Operator definitions are registered and yield `None`; expressions
    /// yield their value.
    pub fn eval_statement(&mut self, statement: &Statement) -> EvalResult<Option<Value>> {
        match statement {
            Statement::Definition(def) => {
                self.define(def.clone());
                Ok(None)
            },
            Statement::Expression(expr) => self.eval(expr).map(Some),
        }
    }

    /// Registers a user-defined operator, replacing any earlier definition
    /// of the same name and arity.
    ///
    /// # Example
    /// ```
    /// use std::rc::Rc;
    ///
    /// use ravel::{
    ///     ast::{Expr, OperatorDef, Params},
    ///     interpreter::{evaluator::core::Context, parser::core::OperatorRegistry},
    /// };
    ///
    /// let mut context = Context::new();
    /// let body = Expr::Variable { name: "x".to_string(),
    ///                             line: 1, };
    /// context.define(OperatorDef { name:   "same".to_string(),
    ///                              params: Params::Unary { arg: "x".to_string() },
    ///                              body:   Rc::new(body),
    ///                              line:   1, });
    ///
    /// assert!(context.is_defined_unary("same"));
    /// assert!(!context.is_defined_binary("same"));
    /// ```
    pub fn define(&mut self, def: OperatorDef) {
        debug!(name = %def.name, binary = def.is_binary(), "defining operator");
        let registry = if def.is_binary() { &mut self.binary_ops } else { &mut self.unary_ops };
        registry.insert(def.name.clone(), Rc::new(def));
    }

    /// Returns a registered unary operator.
    #[must_use]
    pub fn unary_operator(&self, name: &str) -> Option<Rc<OperatorDef>> {
        self.unary_ops.get(name).cloned()
    }

    /// Returns a registered binary operator.
    #[must_use]
    pub fn binary_operator(&self, name: &str) -> Option<Rc<OperatorDef>> {
        self.binary_ops.get(name).cloned()
    }

    /// All user-defined operators, sorted by name, unary first.
    #[must_use]
    pub fn operators(&self) -> Vec<Rc<OperatorDef>> {
        let mut unary: Vec<_> = self.unary_ops.values().cloned().collect();
        let mut binary: Vec<_> = self.binary_ops.values().cloned().collect();
        unary.sort_by(|a, b| a.name.cmp(&b.name));
        binary.sort_by(|a, b| a.name.cmp(&b.name));
        unary.extend(binary);
        unary
    }
}

impl OperatorRegistry for Context {
    fn is_defined_unary(&self, name: &str) -> bool {
        self.unary_ops.contains_key(name)
    }

    fn is_defined_binary(&self, name: &str) -> bool {
        self.binary_ops.contains_key(name)
    }

    fn max_nesting(&self) -> usize {
        self.config.max_nesting
    }
}
