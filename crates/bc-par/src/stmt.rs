//! Statement parsing.

use bc_lex::Token;

use crate::ast::{BinOp, Expr, Stmt};
use crate::error::Result;
use crate::Parser;

impl<'a, 't> Parser<'a, 't> {
    /// Parses one statement.
    ///
    /// `decl`, `assign`, `return` and expression statements require a
    /// trailing `;`; `if`, `while`, blocks and inline batch do not.
    pub(crate) fn parse_statement(&mut self) -> Result<Stmt<'a>> {
        match self.peek()? {
            Token::InlineBatch(body) => {
                self.next()?;
                Ok(Stmt::InlineBatch(body))
            }
            Token::OpenCurly => self.parse_block(),
            Token::Ident("if") => {
                self.next()?;
                self.parse_if()
            }
            Token::Ident("while") => {
                self.next()?;
                self.parse_while()
            }
            Token::Ident("return") => {
                self.next()?;
                self.parse_return()
            }
            Token::Ident(name) => {
                self.next()?;
                self.finish_ident_statement(name)
            }
            Token::Number(_) | Token::String(_) => {
                let first = self.next()?;
                let expr = self.parse_expression_from(first)?;
                self.expect_semi()?;
                Ok(Stmt::Expression(expr))
            }
            _ => {
                let token = self.next()?;
                Err(self.unexpected(token, "a statement"))
            }
        }
    }

    /// Parses `{ statement* }`. Also used for function bodies.
    pub(crate) fn parse_block(&mut self) -> Result<Stmt<'a>> {
        self.expect(Token::OpenCurly, "`{`")?;
        let mut statements = Vec::new();
        loop {
            match self.peek()? {
                Token::CloseCurly => {
                    self.next()?;
                    break;
                }
                Token::Eof => {
                    let token = self.next()?;
                    return Err(self.unexpected(token, "`}` to close block"));
                }
                _ => statements.push(self.parse_statement()?),
            }
        }
        Ok(Stmt::Block {
            statements: self.arena.alloc_slice_fill_iter(statements),
        })
    }

    fn parse_if(&mut self) -> Result<Stmt<'a>> {
        self.expect(Token::OpenParen, "`(` after `if`")?;
        let condition = self.parse_expression()?;
        self.expect(Token::CloseParen, "`)` after condition")?;
        let consequence = self.parse_statement()?;
        let consequence = &*self.arena.alloc(consequence);
        let alternate = if self.peek()? == Token::Ident("else") {
            self.next()?;
            let alternate = self.parse_statement()?;
            Some(&*self.arena.alloc(alternate))
        } else {
            None
        };
        Ok(Stmt::If {
            condition,
            consequence,
            alternate,
        })
    }

    fn parse_while(&mut self) -> Result<Stmt<'a>> {
        self.expect(Token::OpenParen, "`(` after `while`")?;
        let condition = self.parse_expression()?;
        self.expect(Token::CloseParen, "`)` after condition")?;
        let body = self.parse_statement()?;
        let body = &*self.arena.alloc(body);
        Ok(Stmt::While { condition, body })
    }

    fn parse_return(&mut self) -> Result<Stmt<'a>> {
        let value = if self.peek()? == Token::Semi {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_semi()?;
        Ok(Stmt::Return(value))
    }

    /// Continues a statement whose leading identifier has been consumed:
    /// a declaration (`:=`/`::`), an assignment (`=`), or an expression
    /// statement.
    fn finish_ident_statement(&mut self, name: &'a str) -> Result<Stmt<'a>> {
        match self.peek()? {
            Token::Colon => {
                self.next()?;
                let token = self.next()?;
                let constant = match token {
                    Token::Equal => false,
                    Token::Colon => true,
                    other => {
                        return Err(self.unexpected(other, "`=` or `:` in declaration"))
                    }
                };
                let value = self.parse_expression()?;
                if matches!(value, Expr::Function { .. }) {
                    // A function block closes the declaration itself;
                    // the trailing `;` is optional.
                    if self.peek()? == Token::Semi {
                        self.next()?;
                    }
                } else {
                    self.expect_semi()?;
                }
                Ok(Stmt::Declaration {
                    name,
                    value,
                    constant,
                })
            }
            Token::Equal => {
                self.next()?;
                if self.peek()? == Token::Equal {
                    // `name == ...` is an equality comparison in
                    // statement position, not an assignment.
                    self.next()?;
                    let rhs = self.parse_expression()?;
                    let expr = self.binary(BinOp::Eq, Expr::Ident(name), rhs);
                    self.expect_semi()?;
                    Ok(Stmt::Expression(expr))
                } else {
                    let value = self.parse_expression()?;
                    self.expect_semi()?;
                    Ok(Stmt::Assignment { name, value })
                }
            }
            _ => {
                let primary = self.parse_ident_primary(name)?;
                let expr = self.parse_binary_suffix(primary)?;
                self.expect_semi()?;
                Ok(Stmt::Expression(expr))
            }
        }
    }
}
