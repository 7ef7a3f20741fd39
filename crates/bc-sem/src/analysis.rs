//! The AST walker.

use bc_par::{Expr, Program, Stmt};
use bc_util::Handler;
use thiserror::Error;

use crate::scope::ScopeStack;

/// The built-in output routine. Never a binding, never reported unused.
const BUILTIN_PRINT: &str = "print";

/// Hard errors from analysis. Everything else the analyzer finds is a
/// warning and does not stop compilation.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SemError {
    /// A `func` expression anywhere other than the value of a top-level
    /// declaration.
    #[error("function declarations are only allowed as the value of a top-level declaration")]
    NestedFunction,

    /// A declaration that shadows the built-in `print`.
    #[error("`print` is a built-in and cannot be redeclared")]
    RedeclaredBuiltin,
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, SemError>;

/// Runs name resolution and the warning checks over a whole program.
pub fn analyze<'a>(program: &Program<'a>, handler: &Handler) -> Result<()> {
    Analyzer::new(handler).analyze(program)
}

/// The semantic analyzer.
///
/// Walks the AST with a stack of scopes; blocks and function bodies push.
/// Warnings go to the diagnostic handler and the walk continues; only
/// ill-formed function placement and redeclaration of `print` abort.
pub struct Analyzer<'a, 'h> {
    scopes: ScopeStack<'a>,
    handler: &'h Handler,
}

impl<'a, 'h> Analyzer<'a, 'h> {
    /// Creates an analyzer reporting through `handler`.
    pub fn new(handler: &'h Handler) -> Self {
        Self {
            scopes: ScopeStack::new(),
            handler,
        }
    }

    /// Analyzes a program, then reports unused top-level bindings.
    pub fn analyze(&mut self, program: &Program<'a>) -> Result<()> {
        for statement in program.statements {
            self.analyze_statement(statement)?;
        }
        for (name, binding) in self.scopes.top_level().iter() {
            if !binding.read {
                let kind = if binding.constant { "constant" } else { "variable" };
                self.handler.warn(format!("Unused {}: {}", kind, name));
            }
        }
        Ok(())
    }

    fn analyze_statement(&mut self, statement: &Stmt<'a>) -> Result<()> {
        match *statement {
            Stmt::Expression(expr) => self.analyze_expression(&expr),
            Stmt::Declaration {
                name,
                value,
                constant,
            } => self.analyze_declaration(name, value, constant),
            Stmt::Assignment { name, value } => {
                match self.scopes.resolve(name) {
                    None => self
                        .handler
                        .warn(format!("Assignment to undeclared name: {}", name)),
                    Some(binding) if binding.constant => self
                        .handler
                        .warn(format!("Assignment to constant: {}", name)),
                    Some(_) => {}
                }
                self.analyze_expression(&value)
            }
            Stmt::If {
                condition,
                consequence,
                alternate,
            } => {
                self.analyze_expression(&condition)?;
                self.analyze_statement(consequence)?;
                if let Some(alternate) = alternate {
                    self.analyze_statement(alternate)?;
                }
                Ok(())
            }
            Stmt::While { condition, body } => {
                self.analyze_expression(&condition)?;
                self.analyze_statement(body)
            }
            Stmt::Return(value) => match value {
                Some(value) => self.analyze_expression(&value),
                None => Ok(()),
            },
            Stmt::Block { statements } => {
                self.scopes.push();
                for statement in statements {
                    self.analyze_statement(statement)?;
                }
                self.scopes.pop();
                Ok(())
            }
            Stmt::InlineBatch(_) => Ok(()),
        }
    }

    fn analyze_declaration(
        &mut self,
        name: &'a str,
        value: Expr<'a>,
        constant: bool,
    ) -> Result<()> {
        if name == BUILTIN_PRINT {
            return Err(SemError::RedeclaredBuiltin);
        }
        if self.scopes.current().contains(name) {
            self.handler
                .warn(format!("Double declaration of: {}", name));
            return self.analyze_value(value);
        }
        if let Expr::Function { params, body } = value {
            if self.scopes.depth() != 1 {
                return Err(SemError::NestedFunction);
            }
            // Declared before the body is walked so the function can
            // call itself.
            self.scopes.current_mut().declare(name, constant);
            return self.analyze_function(params, body);
        }
        self.analyze_expression(&value)?;
        self.scopes.current_mut().declare(name, constant);
        Ok(())
    }

    /// Analyzes a declaration value that will not be bound (the name was
    /// a duplicate). Function literals still get their placement check.
    fn analyze_value(&mut self, value: Expr<'a>) -> Result<()> {
        if let Expr::Function { params, body } = value {
            if self.scopes.depth() != 1 {
                return Err(SemError::NestedFunction);
            }
            return self.analyze_function(params, body);
        }
        self.analyze_expression(&value)
    }

    fn analyze_function(&mut self, params: &'a [&'a str], body: &'a Stmt<'a>) -> Result<()> {
        self.scopes.push();
        for &param in params {
            self.scopes.current_mut().declare(param, false);
        }
        self.analyze_statement(body)?;
        self.scopes.pop();
        Ok(())
    }

    fn analyze_expression(&mut self, expr: &Expr<'a>) -> Result<()> {
        match *expr {
            Expr::Ident(name) => {
                if !self.scopes.mark_read(name) && name != BUILTIN_PRINT {
                    self.handler
                        .warn(format!("Referring to undeclared name: {}", name));
                }
                Ok(())
            }
            Expr::Number(_) | Expr::String(_) => Ok(()),
            Expr::Call { callee, args } => {
                self.analyze_expression(callee)?;
                for arg in args {
                    self.analyze_expression(arg)?;
                }
                Ok(())
            }
            Expr::Binary { lhs, rhs, .. } => {
                self.analyze_expression(lhs)?;
                self.analyze_expression(rhs)
            }
            // Valid function positions are intercepted by
            // `analyze_declaration`; reaching one here means it is
            // nested inside an expression.
            Expr::Function { .. } => Err(SemError::NestedFunction),
        }
    }
}
