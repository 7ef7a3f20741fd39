//! AST node definitions.
//!
//! All nodes are arena-allocated values: child expressions and statements
//! are `&'a` references into the same [`Bump`](bc_util::Bump) the parser
//! allocates from, and identifier/literal text borrows from the source
//! buffer. Nodes are therefore `Copy` and carry no ownership; the whole
//! tree is released when the arena is dropped.

use std::fmt;

/// Binary operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `%`
    Mod,
    /// `==`
    Eq,
    /// `!=`
    Ne,
}

impl BinOp {
    /// Source spelling of the operator.
    pub fn as_str(self) -> &'static str {
        match self {
            BinOp::Add => "+",
            BinOp::Sub => "-",
            BinOp::Mul => "*",
            BinOp::Div => "/",
            BinOp::Mod => "%",
            BinOp::Eq => "==",
            BinOp::Ne => "!=",
        }
    }

    /// True for `==` and `!=`, which lower to Batch `if` comparisons
    /// rather than `set /a` arithmetic.
    pub fn is_comparison(self) -> bool {
        matches!(self, BinOp::Eq | BinOp::Ne)
    }
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An expression.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Expr<'a> {
    /// A name reference.
    Ident(&'a str),
    /// An ASCII decimal literal, kept as the source substring.
    Number(&'a str),
    /// A string literal: the raw bytes between the quotes. Escape
    /// processing is deferred to emission.
    String(&'a str),
    /// A call. The grammar only produces identifier callees.
    Call {
        callee: &'a Expr<'a>,
        args: &'a [Expr<'a>],
    },
    /// A binary operation. Operators are right-associative with no
    /// precedence; programs parenthesize by splitting declarations.
    Binary {
        op: BinOp,
        lhs: &'a Expr<'a>,
        rhs: &'a Expr<'a>,
    },
    /// A function literal. Only valid as the value of a top-level
    /// declaration; the analyzer rejects every other position.
    Function {
        params: &'a [&'a str],
        body: &'a Stmt<'a>,
    },
}

/// A statement.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Stmt<'a> {
    /// A bare expression followed by `;`.
    Expression(Expr<'a>),
    /// `name := value;` or `name :: value;`
    Declaration {
        name: &'a str,
        value: Expr<'a>,
        constant: bool,
    },
    /// `name = value;`
    Assignment { name: &'a str, value: Expr<'a> },
    /// `if (cond) stmt` with optional `else stmt`.
    If {
        condition: Expr<'a>,
        consequence: &'a Stmt<'a>,
        alternate: Option<&'a Stmt<'a>>,
    },
    /// `while (cond) stmt`
    While {
        condition: Expr<'a>,
        body: &'a Stmt<'a>,
    },
    /// `return;` or `return value;`
    Return(Option<Expr<'a>>),
    /// `{ stmt* }`
    Block { statements: &'a [Stmt<'a>] },
    /// A `batch { ... }` payload, injected verbatim after trimming.
    InlineBatch(&'a str),
}

/// A parsed source file: the ordered list of top-level statements.
#[derive(Clone, Copy, Debug)]
pub struct Program<'a> {
    pub statements: &'a [Stmt<'a>],
}

impl fmt::Display for Expr<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Expr::Ident(name) => write!(f, "Ident({})", name),
            Expr::Number(text) => write!(f, "Number({})", text),
            Expr::String(text) => write!(f, "String(\"{}\")", text),
            Expr::Call { callee, args } => {
                write!(f, "Call({}, [", callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", arg)?;
                }
                write!(f, "])")
            }
            Expr::Binary { op, lhs, rhs } => {
                write!(f, "Binary({}, {}, {})", op, lhs, rhs)
            }
            Expr::Function { params, body } => {
                write!(f, "Function([")?;
                for (i, param) in params.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", param)?;
                }
                write!(f, "], {})", body)
            }
        }
    }
}

impl fmt::Display for Stmt<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stmt::Expression(expr) => write!(f, "Expression({})", expr),
            Stmt::Declaration {
                name,
                value,
                constant,
            } => {
                let kind = if *constant { "constant" } else { "mutable" };
                write!(f, "Declaration({}, {}, {})", name, kind, value)
            }
            Stmt::Assignment { name, value } => {
                write!(f, "Assignment({}, {})", name, value)
            }
            Stmt::If {
                condition,
                consequence,
                alternate,
            } => match alternate {
                Some(alternate) => {
                    write!(f, "If({}, {}, {})", condition, consequence, alternate)
                }
                None => write!(f, "If({}, {})", condition, consequence),
            },
            Stmt::While { condition, body } => {
                write!(f, "While({}, {})", condition, body)
            }
            Stmt::Return(value) => match value {
                Some(value) => write!(f, "Return({})", value),
                None => write!(f, "Return"),
            },
            Stmt::Block { statements } => {
                write!(f, "Block {{ ")?;
                for statement in statements.iter() {
                    write!(f, "{}; ", statement)?;
                }
                write!(f, "}}")
            }
            Stmt::InlineBatch(body) => {
                write!(f, "InlineBatch({} bytes)", body.len())
            }
        }
    }
}
