//! bc-par - Parser (Syntactic Analyzer)
//!
//! Recursive descent over the token stream, producing an arena-owned AST.
//! Lookahead is limited to the tokenizer's single-token peek; the few
//! places that would need more (distinguishing `x = y;` from `x == y;`)
//! resolve themselves by consuming as they go.
//!
//! Two grammar properties worth knowing before reading the code:
//!
//! - Binary operators are right-associative and have **no precedence**.
//!   `1 + 2 * 3` parses as `1 + (2 * 3)` because the right operand of any
//!   operator is the entire rest of the expression. Programs that need
//!   grouping split the computation across declarations.
//! - Keywords (`if`, `else`, `while`, `return`, `func`) are ordinary
//!   identifiers recognized contextually; the tokenizer does not reserve
//!   them.
//!
//! The first unexpected token is fatal. There is no error recovery.

mod ast;
mod edge_cases;
mod error;
mod expr;
mod stmt;

pub use ast::{BinOp, Expr, Program, Stmt};
pub use error::{ParseError, Result};

use bc_lex::{Token, TokenStream};
use bc_util::Bump;

/// The bb parser.
///
/// Borrows the token stream and allocates every AST node into the arena,
/// so the returned [`Program`] lives as long as the arena does.
///
/// # Example
///
/// ```
/// use bc_lex::TokenStream;
/// use bc_par::Parser;
/// use bc_util::Bump;
///
/// let arena = Bump::new();
/// let mut tokens = TokenStream::new("x := 1;");
/// let program = Parser::new(&mut tokens, &arena).parse_program().unwrap();
/// assert_eq!(program.statements.len(), 1);
/// ```
pub struct Parser<'a, 't> {
    pub(crate) tokens: &'t mut TokenStream<'a>,
    pub(crate) arena: &'a Bump,
}

impl<'a, 't> Parser<'a, 't> {
    /// Creates a parser over `tokens`, allocating nodes in `arena`.
    pub fn new(tokens: &'t mut TokenStream<'a>, arena: &'a Bump) -> Self {
        Self { tokens, arena }
    }

    /// Parses the whole token stream into a [`Program`].
    pub fn parse_program(&mut self) -> Result<Program<'a>> {
        let mut statements = Vec::new();
        loop {
            if self.peek()? == Token::Eof {
                break;
            }
            statements.push(self.parse_statement()?);
        }
        Ok(Program {
            statements: self.arena.alloc_slice_fill_iter(statements),
        })
    }

    pub(crate) fn next(&mut self) -> Result<Token<'a>> {
        Ok(self.tokens.next_token()?)
    }

    pub(crate) fn peek(&mut self) -> Result<Token<'a>> {
        Ok(self.tokens.peek_token()?)
    }

    /// Consumes a token and checks it against `expected`.
    pub(crate) fn expect(&mut self, expected: Token<'a>, what: &'static str) -> Result<()> {
        let token = self.next()?;
        if token == expected {
            Ok(())
        } else {
            Err(self.unexpected(token, what))
        }
    }

    pub(crate) fn expect_semi(&mut self) -> Result<()> {
        self.expect(Token::Semi, "`;`")
    }

    /// Builds the fatal diagnostic for a token that was just consumed.
    pub(crate) fn unexpected(&self, found: Token<'_>, expected: &'static str) -> ParseError {
        ParseError::UnexpectedToken {
            found: found.to_string(),
            pos: self.tokens.token_pos(),
            expected,
        }
    }
}
