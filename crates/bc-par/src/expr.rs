//! Expression parsing.

use bc_lex::Token;

use crate::ast::{BinOp, Expr};
use crate::error::Result;
use crate::Parser;

impl<'a, 't> Parser<'a, 't> {
    /// Parses a full expression starting at the next token.
    pub(crate) fn parse_expression(&mut self) -> Result<Expr<'a>> {
        let first = self.next()?;
        self.parse_expression_from(first)
    }

    /// Parses a full expression whose first token has been consumed.
    pub(crate) fn parse_expression_from(&mut self, first: Token<'a>) -> Result<Expr<'a>> {
        let primary = self.parse_primary_from(first)?;
        self.parse_binary_suffix(primary)
    }

    fn parse_primary_from(&mut self, token: Token<'a>) -> Result<Expr<'a>> {
        match token {
            Token::Number(text) => Ok(Expr::Number(text)),
            Token::String(text) => Ok(Expr::String(text)),
            Token::Ident("func") => self.parse_function(),
            Token::Ident(name) => self.parse_ident_primary(name),
            other => Err(self.unexpected(other, "an expression")),
        }
    }

    /// Parses the primary that starts with an already-consumed
    /// identifier: either a call or a plain name reference.
    pub(crate) fn parse_ident_primary(&mut self, name: &'a str) -> Result<Expr<'a>> {
        if self.peek()? == Token::OpenParen {
            self.next()?;
            let args = self.parse_call_args()?;
            let callee = &*self.arena.alloc(Expr::Ident(name));
            Ok(Expr::Call { callee, args })
        } else {
            Ok(Expr::Ident(name))
        }
    }

    fn parse_call_args(&mut self) -> Result<&'a [Expr<'a>]> {
        let mut args = Vec::new();
        if self.peek()? == Token::CloseParen {
            self.next()?;
        } else {
            loop {
                args.push(self.parse_expression()?);
                let token = self.next()?;
                match token {
                    Token::Comma => continue,
                    Token::CloseParen => break,
                    other => {
                        return Err(self.unexpected(other, "`,` or `)` in argument list"))
                    }
                }
            }
        }
        Ok(self.arena.alloc_slice_fill_iter(args))
    }

    /// Parses an optional binary-operator continuation after `lhs`.
    ///
    /// Right-associative with no precedence: the right operand is the
    /// entire rest of the expression. `==`/`!=` are composed from
    /// adjacent `=`/`!` + `=` token pairs; a lone `=` or `!` here is a
    /// parse error.
    pub(crate) fn parse_binary_suffix(&mut self, lhs: Expr<'a>) -> Result<Expr<'a>> {
        let op = match self.peek()? {
            Token::Plus => {
                self.next()?;
                BinOp::Add
            }
            Token::Hyphen => {
                self.next()?;
                BinOp::Sub
            }
            Token::Star => {
                self.next()?;
                BinOp::Mul
            }
            Token::Slash => {
                self.next()?;
                BinOp::Div
            }
            Token::Percent => {
                self.next()?;
                BinOp::Mod
            }
            Token::Equal => {
                self.next()?;
                let token = self.next()?;
                if token != Token::Equal {
                    return Err(self.unexpected(token, "`=` to form `==`"));
                }
                BinOp::Eq
            }
            Token::Excl => {
                self.next()?;
                let token = self.next()?;
                if token != Token::Equal {
                    return Err(self.unexpected(token, "`=` to form `!=`"));
                }
                BinOp::Ne
            }
            _ => return Ok(lhs),
        };
        let rhs = self.parse_expression()?;
        Ok(self.binary(op, lhs, rhs))
    }

    pub(crate) fn binary(&self, op: BinOp, lhs: Expr<'a>, rhs: Expr<'a>) -> Expr<'a> {
        Expr::Binary {
            op,
            lhs: self.arena.alloc(lhs),
            rhs: self.arena.alloc(rhs),
        }
    }

    /// Parses `func ( ident-list? ) block` after the `func` identifier
    /// has been consumed.
    fn parse_function(&mut self) -> Result<Expr<'a>> {
        self.expect(Token::OpenParen, "`(` after `func`")?;
        let mut params: Vec<&'a str> = Vec::new();
        if self.peek()? == Token::CloseParen {
            self.next()?;
        } else {
            loop {
                let token = self.next()?;
                let Token::Ident(name) = token else {
                    return Err(self.unexpected(token, "a parameter name"));
                };
                params.push(name);
                let token = self.next()?;
                match token {
                    Token::Comma => continue,
                    Token::CloseParen => break,
                    other => {
                        return Err(self.unexpected(other, "`,` or `)` in parameter list"))
                    }
                }
            }
        }
        let body = self.parse_block()?;
        Ok(Expr::Function {
            params: self.arena.alloc_slice_copy(&params),
            body: self.arena.alloc(body),
        })
    }
}
