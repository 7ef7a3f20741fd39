//! Lowering of the AST to Batch text.
//!
//! Batch has two disjoint expression sublanguages - `set /a` arithmetic
//! and `if "X"=="Y"` comparisons - and no notion of a subexpression, so
//! the generator threads a [`StmtCtx`] through expression emission and
//! hoists whatever cannot be said inline into synthetic statements ahead
//! of the current one ("spilling"):
//!
//! - a call becomes `@call :name args` plus a `_retN_` copy of the
//!   reserved `__ret__` variable,
//! - arithmetic outside a `set` right-hand side becomes a `_tmpN_`
//!   declaration,
//! - a comparison outside condition position becomes a `_tmpN_` set to
//!   `true`/`false` through a goto island.
//!
//! Every minted label and temporary uses a monotonic counter, so names
//! never collide anywhere in the output. Scoped blocks lower to
//! `setlocal`/`endlocal`, with assignments to outer names carried across
//! the boundary by the `endlocal && set "n=%n%"` idiom.

use std::fmt::Write;

use bc_par::{BinOp, Expr, Program, Stmt};
use bc_util::{Bump, Handler};
use bumpalo::collections::String as BumpString;
use rustc_hash::FxHashSet;

use crate::error::{CodeGenError, Result};

/// Lines the generator puts before the lowered program.
const PROLOGUE: &str = "@setlocal EnableDelayedExpansion\r\n@pushd \"%~dp0\"\r\n\r\n";

/// Lines the generator puts after the lowered program, ahead of the
/// functions section.
const EPILOGUE: &str = "\r\n@popd\r\n@endlocal\r\n@exit /b 0\r\n";

/// The syntactic context of the statement an expression is emitted for.
///
/// This is deliberately the *only* state expression emission receives: it
/// answers "am I the right-hand side of a `set`, or the condition of an
/// `if`?", nothing more.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StmtCtx {
    Declaration,
    Assignment,
    If,
    While,
    Return,
    Expression,
}

impl StmtCtx {
    /// Condition position: identifiers compare against `"true"` and
    /// comparisons stay inline.
    fn is_condition(self) -> bool {
        matches!(self, StmtCtx::If | StmtCtx::While)
    }

    /// Right-hand side of a `set`: arithmetic stays inline under `/a`.
    fn is_value(self) -> bool {
        matches!(
            self,
            StmtCtx::Declaration | StmtCtx::Assignment | StmtCtx::Return
        )
    }
}

/// Names visible to the generator in one lexical scope.
#[derive(Default)]
struct GenScope<'a> {
    /// Names declared in this scope, temporaries included.
    declared: FxHashSet<&'a str>,
    /// Names assigned here but declared outside: exported through the
    /// enclosing `endlocal`, in first-assignment order.
    exports: Vec<&'a str>,
}

/// Generates the Batch script for a program.
///
/// The returned text lives in the arena and uses CRLF line endings
/// throughout.
pub fn generate<'a>(
    program: &Program<'a>,
    arena: &'a Bump,
    handler: &Handler,
) -> Result<&'a str> {
    BatchGen::new(arena, handler).emit_program(program)
}

/// The Batch code generator.
pub struct BatchGen<'a, 'h> {
    arena: &'a Bump,
    handler: &'h Handler,

    /// Function bodies, concatenated after the program epilogue so the
    /// labels sit below the top-level `exit /b`.
    funcs: BumpString<'a>,

    scopes: Vec<GenScope<'a>>,
    if_labels: u32,
    while_labels: u32,
    tmps: u32,
    rets: u32,
}

impl<'a, 'h> BatchGen<'a, 'h> {
    fn new(arena: &'a Bump, handler: &'h Handler) -> Self {
        Self {
            arena,
            handler,
            funcs: BumpString::new_in(arena),
            scopes: vec![GenScope::default()],
            if_labels: 0,
            while_labels: 0,
            tmps: 0,
            rets: 0,
        }
    }

    fn emit_program(mut self, program: &Program<'a>) -> Result<&'a str> {
        let mut out = BumpString::new_in(self.arena);
        out.push_str(PROLOGUE);
        for statement in program.statements {
            let text = self.emit_statement(statement)?;
            out.push_str(&text);
        }
        out.push_str(EPILOGUE);
        out.push_str(&self.funcs);
        Ok(out.into_bump_str())
    }

    /// Lowers one statement to its complete text, spilled temporaries
    /// already flushed ahead of their referents.
    fn emit_statement(&mut self, statement: &Stmt<'a>) -> Result<BumpString<'a>> {
        match *statement {
            Stmt::Declaration { name, value, .. } => {
                if let Expr::Function { params, body } = value {
                    return self.emit_function(name, params, body);
                }
                let mut out = self.new_buf();
                let text = self.emit_expression(&value, StmtCtx::Declaration, &mut out)?;
                self.declare(name);
                self.write_set(&mut out, name, &text, is_numeric(&value))?;
                Ok(out)
            }
            Stmt::Assignment { name, value } => {
                let mut out = self.new_buf();
                let text = self.emit_expression(&value, StmtCtx::Assignment, &mut out)?;
                self.note_assignment(name);
                self.write_set(&mut out, name, &text, is_numeric(&value))?;
                Ok(out)
            }
            Stmt::InlineBatch(body) => {
                let mut out = self.new_buf();
                out.push_str(body.trim());
                out.push_str("\r\n");
                Ok(out)
            }
            Stmt::Block { statements } => self.emit_block(statements),
            Stmt::If {
                condition,
                consequence,
                alternate,
            } => {
                let mut out = self.new_buf();
                let condition = self.emit_expression(&condition, StmtCtx::If, &mut out)?;
                let label = self.if_labels;
                self.if_labels += 1;
                let target = if alternate.is_some() { "else" } else { "endif" };
                write!(out, "@if not {} goto :_{}{}_\r\n", condition, target, label)?;
                let consequence = self.emit_statement(consequence)?;
                out.push_str(&consequence);
                write!(out, "@goto :_endif{}_\r\n", label)?;
                if let Some(alternate) = alternate {
                    write!(out, ":_else{}_\r\n", label)?;
                    let alternate = self.emit_statement(alternate)?;
                    out.push_str(&alternate);
                }
                write!(out, ":_endif{}_\r\n", label)?;
                Ok(out)
            }
            Stmt::While { condition, body } => {
                let label = self.while_labels;
                self.while_labels += 1;
                let mut out = self.new_buf();
                write!(out, ":_while{}_\r\n", label)?;
                // Condition temporaries land after the loop label so a
                // call or spill re-evaluates on every iteration.
                let condition = self.emit_expression(&condition, StmtCtx::While, &mut out)?;
                write!(out, "@if not {} goto :_endwhile{}_\r\n", condition, label)?;
                let body = self.emit_statement(body)?;
                out.push_str(&body);
                write!(out, "@goto :_while{}_\r\n", label)?;
                write!(out, ":_endwhile{}_\r\n", label)?;
                Ok(out)
            }
            Stmt::Return(value) => {
                let mut out = self.new_buf();
                match value {
                    None => out.push_str("@endlocal && exit /b 0\r\n"),
                    Some(value) => {
                        let text = self.emit_expression(&value, StmtCtx::Return, &mut out)?;
                        let slash_a = if is_numeric(&value) { "/a " } else { "" };
                        write!(
                            out,
                            "@endlocal && set {}\"__ret__={}\" && exit /b 0\r\n",
                            slash_a, text
                        )?;
                    }
                }
                Ok(out)
            }
            Stmt::Expression(expr) => self.emit_expression_statement(&expr),
        }
    }

    fn emit_block(&mut self, statements: &'a [Stmt<'a>]) -> Result<BumpString<'a>> {
        self.scopes.push(GenScope::default());
        let mut body = self.new_buf();
        for statement in statements {
            let text = self.emit_statement(statement)?;
            body.push_str(&text);
        }
        let scope = self.scopes.pop().unwrap_or_default();

        let mut out = self.new_buf();
        out.push_str("@setlocal EnableDelayedExpansion\r\n");
        out.push_str(&body);
        out.push_str("@endlocal");
        for name in &scope.exports {
            write!(out, " && set \"{0}=%{0}%\"", name)?;
        }
        out.push_str("\r\n");

        // An exported name the enclosing block does not declare either
        // must ride through that block's endlocal as well.
        for name in scope.exports {
            self.note_assignment(name);
        }
        Ok(out)
    }

    /// Emits a function body into the functions buffer: the `:name`
    /// label, positional parameter shims, the body as a block, and a
    /// closing `exit /b 0`. Produces nothing at the declaration site.
    fn emit_function(
        &mut self,
        name: &'a str,
        params: &'a [&'a str],
        body: &'a Stmt<'a>,
    ) -> Result<BumpString<'a>> {
        if self.scopes.len() != 1 {
            return Err(CodeGenError::NestedFunction);
        }
        self.declare(name);

        let mut f = self.new_buf();
        write!(f, ":{}\r\n", name)?;
        self.scopes.push(GenScope::default());
        for (index, &param) in params.iter().enumerate() {
            self.declare(param);
            write!(f, "@set {}=%~{}\r\n", param, index + 1)?;
        }
        let body = self.emit_statement(body)?;
        f.push_str(&body);
        // Function boundary: assignments to outer names stop here, they
        // belong to the caller's environment at run time.
        self.scopes.pop();
        f.push_str("@exit /b 0\r\n");

        self.funcs.push_str(&f);
        Ok(self.new_buf())
    }

    fn emit_expression_statement(&mut self, expr: &Expr<'a>) -> Result<BumpString<'a>> {
        match *expr {
            Expr::Call { callee, args } => {
                let Expr::Ident(name) = *callee else {
                    return Err(CodeGenError::InvalidCallee);
                };
                let mut out = self.new_buf();
                if name == "print" {
                    let mut lines = self.new_buf();
                    for arg in args {
                        let text = self.emit_expression(arg, StmtCtx::Expression, &mut out)?;
                        write!(lines, "@echo {}\r\n", text)?;
                    }
                    out.push_str(&lines);
                } else {
                    // At statement position the return value is unused,
                    // so the call needs no `_retN_` substitution.
                    let mut line = self.new_buf();
                    write!(line, "@call :{}", name)?;
                    for arg in args {
                        let text = self.emit_expression(arg, StmtCtx::Expression, &mut out)?;
                        write!(line, " {}", text)?;
                    }
                    line.push_str("\r\n");
                    out.push_str(&line);
                }
                Ok(out)
            }
            other => {
                self.handler
                    .warn(format!("Skipped expression statement: {}", other));
                Ok(self.new_buf())
            }
        }
    }

    /// Lowers an expression to the fragment that stands for it in the
    /// enclosing statement, appending any spilled statements to `spills`.
    /// Spills are appended in dependency order: a temporary always
    /// precedes the fragment that reads it.
    fn emit_expression(
        &mut self,
        expr: &Expr<'a>,
        ctx: StmtCtx,
        spills: &mut BumpString<'a>,
    ) -> Result<BumpString<'a>> {
        match *expr {
            Expr::Ident(name) => self.reference(name, ctx),
            Expr::Number(text) => {
                let mut out = self.new_buf();
                out.push_str(text);
                Ok(out)
            }
            Expr::String(text) => {
                let mut out = self.new_buf();
                for b in text.bytes() {
                    // `\` is the bb escape sentinel; Batch escapes with `^`.
                    out.push(if b == b'\\' { '^' } else { b as char });
                }
                Ok(out)
            }
            Expr::Binary { op, lhs, rhs } if op.is_comparison() => {
                let lhs = self.emit_expression(lhs, StmtCtx::Declaration, spills)?;
                let rhs = self.emit_expression(rhs, StmtCtx::Declaration, spills)?;
                let mut condition = self.new_buf();
                match op {
                    BinOp::Ne => write!(condition, "\"{}\" NEQ \"{}\"", lhs, rhs)?,
                    _ => write!(condition, "\"{}\"==\"{}\"", lhs, rhs)?,
                }
                if ctx.is_condition() {
                    return Ok(condition);
                }
                // Comparison as a value: lower to a `true`/`false`
                // temporary through a goto island.
                let temp = self.next_tmp()?;
                let label = self.if_labels;
                self.if_labels += 1;
                write!(spills, "@if not {} goto :_else{}_\r\n", condition, label)?;
                write!(spills, "@set {}=true\r\n", temp)?;
                write!(spills, "@goto :_endif{}_\r\n", label)?;
                write!(spills, ":_else{}_\r\n", label)?;
                write!(spills, "@set {}=false\r\n", temp)?;
                write!(spills, ":_endif{}_\r\n", label)?;
                self.declare(temp);
                self.reference(temp, ctx)
            }
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.emit_expression(lhs, StmtCtx::Declaration, spills)?;
                let rhs = self.emit_expression(rhs, StmtCtx::Declaration, spills)?;
                // `%` is the modulo operator in `set /a`, doubled inside
                // a script file.
                let op_text = if op == BinOp::Mod { "%%" } else { op.as_str() };
                let mut inline = self.new_buf();
                write!(inline, "{}{}{}", lhs, op_text, rhs)?;
                if ctx.is_value() {
                    return Ok(inline);
                }
                let temp = self.next_tmp()?;
                write!(spills, "@set /a {}={}\r\n", temp, inline)?;
                self.declare(temp);
                self.reference(temp, ctx)
            }
            Expr::Call { callee, args } => {
                let Expr::Ident(name) = *callee else {
                    return Err(CodeGenError::InvalidCallee);
                };
                let mut line = self.new_buf();
                write!(line, "@call :{}", name)?;
                for arg in args {
                    let text = self.emit_expression(arg, StmtCtx::Expression, spills)?;
                    write!(line, " {}", text)?;
                }
                line.push_str("\r\n");
                spills.push_str(&line);
                let temp = self.next_ret()?;
                write!(spills, "@set {}=%__ret__%\r\n", temp)?;
                self.declare(temp);
                self.reference(temp, ctx)
            }
            Expr::Function { .. } => Err(CodeGenError::FunctionInExpression),
        }
    }

    /// The fragment that reads a variable: `%n%`, or the boolean test
    /// `"%n%"=="true"` in condition position.
    fn reference(&self, name: &str, ctx: StmtCtx) -> Result<BumpString<'a>> {
        let mut out = self.new_buf();
        if ctx.is_condition() {
            write!(out, "\"%{}%\"==\"true\"", name)?;
        } else {
            write!(out, "%{}%", name)?;
        }
        Ok(out)
    }

    fn write_set(
        &self,
        out: &mut BumpString<'a>,
        name: &str,
        value: &str,
        numeric: bool,
    ) -> Result<()> {
        let slash_a = if numeric { "/a " } else { "" };
        write!(out, "@set {}{}={}\r\n", slash_a, name, value)?;
        Ok(())
    }

    fn new_buf(&self) -> BumpString<'a> {
        BumpString::new_in(self.arena)
    }

    fn next_tmp(&mut self) -> Result<&'a str> {
        let mut name = self.new_buf();
        write!(name, "_tmp{}_", self.tmps)?;
        self.tmps += 1;
        Ok(name.into_bump_str())
    }

    fn next_ret(&mut self) -> Result<&'a str> {
        let mut name = self.new_buf();
        write!(name, "_ret{}_", self.rets)?;
        self.rets += 1;
        Ok(name.into_bump_str())
    }

    fn declare(&mut self, name: &'a str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.declared.insert(name);
        }
    }

    /// Records an assignment for scope-export analysis: a name assigned
    /// in this scope but declared outside it must be exported through
    /// the enclosing `endlocal`.
    fn note_assignment(&mut self, name: &'a str) {
        let Some(scope) = self.scopes.last_mut() else {
            return;
        };
        if scope.declared.contains(name) {
            return;
        }
        if !scope.exports.contains(&name) {
            scope.exports.push(name);
        }
    }
}

/// True for values that lower under `set /a`: arithmetic, but not
/// comparisons (those become `true`/`false` strings).
fn is_numeric(expr: &Expr<'_>) -> bool {
    matches!(expr, Expr::Binary { op, .. } if !op.is_comparison())
}
