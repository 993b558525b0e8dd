use std::{fmt, rc::Rc};

use crate::interpreter::value::core::Value;

/// An abstract syntax tree (AST) node representing an expression in the
/// language.
///
/// Nodes are built fresh for every parsed line and own their children. Each
/// variant carries the source line it started on.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    /// A literal scalar: a number, char or string.
    Literal {
        /// The constant value.
        value: Value,
        /// Line number in the source code.
        line:  usize,
    },
    /// Reference to a variable by name.
    Variable {
        /// Name of the variable.
        name: String,
        /// Line number in the source code.
        line: usize,
    },
    /// A built-in unary operator applied to the expression on its right.
    Unary {
        /// The unary operator to apply.
        op:      UnaryOperator,
        /// The operand expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// A built-in binary operator.
    Binary {
        /// Left operand.
        left:  Box<Self>,
        /// The operator.
        op:    BinaryOperator,
        /// Right operand.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
    /// Indexing, `target[index]`.
    Index {
        /// The value being indexed.
        target: Box<Self>,
        /// The index expression; a scalar or a vector of indices.
        index:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// Assignment, `target = value`.
    ///
    /// The target is either a `Variable` or an `Index` whose target is a
    /// `Variable`; other shapes are rejected.
    Assign {
        /// The assignment target.
        target: Box<Self>,
        /// The value expression.
        value:  Box<Self>,
        /// Line number in the source code.
        line:   usize,
    },
    /// A vector literal formed by juxtaposition, e.g. `1 2 x`.
    Slice {
        /// Elements of the vector in source order.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// A map literal, e.g. `{ a b }`.
    Map {
        /// The constituent expressions; only bare variables become entries.
        elements: Vec<Self>,
        /// Line number in the source code.
        line:     usize,
    },
    /// Application of a user-defined unary operator.
    UnaryCall {
        /// Name of the operator.
        name:    String,
        /// The argument expression.
        operand: Box<Self>,
        /// Line number in the source code.
        line:    usize,
    },
    /// Application of a user-defined binary operator.
    BinaryCall {
        /// Left argument.
        left:  Box<Self>,
        /// Name of the operator.
        name:  String,
        /// Right argument.
        right: Box<Self>,
        /// Line number in the source code.
        line:  usize,
    },
}

impl Expr {
    /// Whether the expression is an assignment.
    #[must_use]
    pub const fn is_assignment(&self) -> bool {
        matches!(self, Self::Assign { .. })
    }

    /// Fully parenthesized source text for the expression.
    ///
    /// Re-parsing the result with the same operator registry yields a tree
    /// that evaluates to the same value.
    ///
    /// # Example
    /// ```
    /// use ravel::{
    ///     ast::{BinaryOperator, Expr},
    ///     interpreter::value::core::Value,
    /// };
    ///
    /// let expr = Expr::Binary { left:  Box::new(Expr::Variable { name: "x".to_string(),
    ///                                                            line: 1, }),
    ///                           op:    BinaryOperator::Add,
    ///                           right: Box::new(Expr::Literal { value: Value::Int(-2),
    ///                                                           line:  1, }),
    ///                           line:  1, };
    ///
    /// assert_eq!(expr.canonical(), "(x + (-2))");
    /// ```
    #[must_use]
    pub fn canonical(&self) -> String {
        match self {
            Self::Literal { value, .. } => value.canonical(),
            Self::Variable { name, .. } => name.clone(),
            Self::Unary { op, operand, .. } => format!("({op} {})", operand.canonical()),
            Self::Binary { left, op, right, .. } => {
                format!("({} {op} {})", left.canonical(), right.canonical())
            },
            Self::Index { target, index, .. } => {
                format!("{}[{}]", target.enclosed(), index.canonical())
            },
            Self::Assign { target, value, .. } => {
                format!("({} = {})", target.canonical(), value.canonical())
            },
            Self::Slice { elements, .. } => {
                elements.iter().map(Self::enclosed).collect::<Vec<_>>().join(" ")
            },
            Self::Map { elements, .. } => {
                format!("{{ {} }}",
                        elements.iter().map(Self::enclosed).collect::<Vec<_>>().join(" "))
            },
            Self::UnaryCall { name, operand, .. } => format!("({name} {})", operand.canonical()),
            Self::BinaryCall { left, name, right, .. } => {
                format!("({} {name} {})", left.canonical(), right.canonical())
            },
        }
    }

    /// Canonical text that can stand as a single atom.
    ///
    /// String literals are parenthesized so that a vector literal keeps them
    /// whole instead of splitting them into chars.
    fn enclosed(&self) -> String {
        match self {
            Self::Slice { .. }
            | Self::Index { .. }
            | Self::Map { .. }
            | Self::Literal { value: Value::String(_), .. } => format!("({})", self.canonical()),
            _ => self.canonical(),
        }
    }

    /// Debug rendering that shows how the parser grouped the input.
    ///
    /// Literals print as `<5>`, `<big ...>`, `<rat 1/3>` or `<float 1.5>`,
    /// variables as `<var x>`, vector literals as `<a b c>`, assignments as
    /// `<x = value>`, and applications as `(op x)` or `(l op r)`.
    ///
    /// # Example
    /// ```
    /// use ravel::{ast::Expr, interpreter::value::core::Value};
    ///
    /// let f = Expr::Variable { name: "f".to_string(),
    ///                          line: 1, };
    /// let three = Expr::Literal { value: Value::Int(3),
    ///                             line:  1, };
    /// let slice = Expr::Slice { elements: vec![f, three],
    ///                           line:     1, };
    ///
    /// assert_eq!(slice.tree(), "<<var f> <3>>");
    /// ```
    #[must_use]
    pub fn tree(&self) -> String {
        match self {
            Self::Literal { value, .. } => match value {
                Value::BigInt(n) => format!("<big {n}>"),
                Value::BigRat(r) => format!("<rat {}/{}>", r.numer(), r.denom()),
                Value::BigFloat(f) => format!("<float {}>", f.normalized()),
                other => format!("<{}>", other.canonical()),
            },
            Self::Variable { name, .. } => format!("<var {name}>"),
            Self::Unary { op, operand, .. } => format!("({op} {})", operand.tree()),
            Self::Binary { left, op, right, .. } => {
                format!("({} {op} {})", left.tree(), right.tree())
            },
            Self::Index { target, index, .. } => format!("({} [] {})", target.tree(), index.tree()),
            Self::Assign { target, value, .. } => format!("<{} = {}>", target.canonical(), value.tree()),
            Self::Slice { elements, .. } => {
                format!("<{}>", elements.iter().map(Self::tree).collect::<Vec<_>>().join(" "))
            },
            Self::Map { elements, .. } => {
                format!("<map {}>", elements.iter().map(Self::tree).collect::<Vec<_>>().join(" "))
            },
            Self::UnaryCall { name, operand, .. } => format!("({name} {})", operand.tree()),
            Self::BinaryCall { left, name, right, .. } => {
                format!("({} {name} {})", left.tree(), right.tree())
            },
        }
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.canonical())
    }
}

/// The parameter list of a user-defined operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Params {
    /// `op name x = ...`
    Unary {
        /// The argument name.
        arg: String,
    },
    /// `op l name r = ...`
    Binary {
        /// The left argument name.
        left:  String,
        /// The right argument name.
        right: String,
    },
}

/// Represents a user-defined operator.
///
/// The body is shared between the registry and any calls in progress, so
/// redefining the operator while it runs is harmless.
#[derive(Debug, Clone, PartialEq)]
pub struct OperatorDef {
    /// The name of the operator.
    pub name:   String,
    /// The parameter names.
    pub params: Params,
    /// The body expression evaluated when the operator is called.
    pub body:   Rc<Expr>,
    /// Line number in the source code.
    pub line:   usize,
}

impl OperatorDef {
    /// Whether the operator takes two arguments.
    #[must_use]
    pub const fn is_binary(&self) -> bool {
        matches!(self.params, Params::Binary { .. })
    }
}

impl fmt::Display for OperatorDef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.params {
            Params::Unary { arg } => write!(f, "op {} {arg} = {}", self.name, self.body),
            Params::Binary { left, right } => {
                write!(f, "op {left} {} {right} = {}", self.name, self.body)
            },
        }
    }
}

/// Represents one statement of a line.
///
/// Statements are separated by `;`.
#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    /// A user-defined operator declaration.
    Definition(OperatorDef),
    /// An expression evaluated for its result.
    Expression(Expr),
}

/// Represents a binary operator.
///
/// All binary operators have equal precedence and group to the right.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BinaryOperator {
    /// Addition (`+`)
    Add,
    /// Subtraction (`-`)
    Sub,
    /// Multiplication (`*`)
    Mul,
    /// Exact division (`/`)
    Div,
    /// Exponentiation (`**`)
    Pow,
    /// Floored integer division (`div`)
    IntDiv,
    /// Floored modulus (`mod`)
    Mod,
    /// Smaller of two values (`min`)
    Min,
    /// Larger of two values (`max`)
    Max,
    /// Equal to (`==`)
    Equal,
    /// Not equal to (`!=`)
    NotEqual,
    /// Less than (`<`)
    Less,
    /// Less than or equal (`<=`)
    LessEqual,
    /// Greater than (`>`)
    Greater,
    /// Greater than or equal (`>=`)
    GreaterEqual,
    /// Logical and (`and`)
    And,
    /// Logical or (`or`)
    Or,
    /// Catenation (`,`)
    Catenate,
    /// Reshape (`rho`)
    Reshape,
}

impl BinaryOperator {
    /// Whether the operator yields a 0/1 comparison result.
    #[must_use]
    pub const fn is_comparison(self) -> bool {
        matches!(self,
                 Self::Equal
                 | Self::NotEqual
                 | Self::Less
                 | Self::LessEqual
                 | Self::Greater
                 | Self::GreaterEqual)
    }
}

/// Represents a unary operator.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum UnaryOperator {
    /// Arithmetic negation (`-x`).
    Negate,
    /// Identity (`+x`).
    Identity,
    /// Absolute value (`abs`).
    Abs,
    /// Sign as -1, 0 or 1 (`sgn`).
    Sign,
    /// Round toward negative infinity (`floor`).
    Floor,
    /// Round toward positive infinity (`ceil`).
    Ceil,
    /// Square root (`sqrt`).
    Sqrt,
    /// Conversion to float (`float`).
    Float,
    /// Logical not (`not`).
    Not,
    /// Counting vector (`iota`).
    Iota,
    /// Shape (`rho`).
    Shape,
    /// Flatten to a vector (`,`).
    Ravel,
    /// Reverse the axes (`transp`).
    Transpose,
    /// Reduction along the last axis (`+/`, `-/`, `*/`).
    Reduce(BinaryOperator),
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use BinaryOperator::{
            Add, And, Catenate, Div, Equal, Greater, GreaterEqual, IntDiv, Less, LessEqual, Max,
            Min, Mod, Mul, NotEqual, Or, Pow, Reshape, Sub,
        };
        let operator = match self {
            Add => "+",
            Sub => "-",
            Mul => "*",
            Div => "/",
            Pow => "**",
            IntDiv => "div",
            Mod => "mod",
            Min => "min",
            Max => "max",
            Equal => "==",
            NotEqual => "!=",
            Less => "<",
            LessEqual => "<=",
            Greater => ">",
            GreaterEqual => ">=",
            And => "and",
            Or => "or",
            Catenate => ",",
            Reshape => "rho",
        };
        write!(f, "{operator}")
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let operator = match self {
            Self::Negate => "-",
            Self::Identity => "+",
            Self::Abs => "abs",
            Self::Sign => "sgn",
            Self::Floor => "floor",
            Self::Ceil => "ceil",
            Self::Sqrt => "sqrt",
            Self::Float => "float",
            Self::Not => "not",
            Self::Iota => "iota",
            Self::Shape => "rho",
            Self::Ravel => ",",
            Self::Transpose => "transp",
            Self::Reduce(op) => return write!(f, "{op}/"),
        };
        write!(f, "{operator}")
    }
}
