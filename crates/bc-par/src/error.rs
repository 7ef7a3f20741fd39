//! Error types for parsing.

use bc_lex::LexError;
use bc_util::Pos;
use thiserror::Error;

/// Error type for the parser.
///
/// The first error halts parsing; there is no recovery. Messages are a
/// single line naming the offending token and its position.
#[derive(Debug, Error)]
pub enum ParseError {
    /// A token that does not fit the grammar at this point.
    #[error("unexpected token {found} at {pos}: expected {expected}")]
    UnexpectedToken {
        /// The offending token, in its trace form (`Ident(x)`, `(eof)`, ...).
        found: String,
        /// Start position of the offending token.
        pos: Pos,
        /// What the grammar wanted instead.
        expected: &'static str,
    },

    /// A tokenization failure surfaced while pulling tokens.
    #[error(transparent)]
    Lex(#[from] LexError),
}

/// Result type alias for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
