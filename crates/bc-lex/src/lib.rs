//! bc-lex - Tokenizer (Lexical Analyzer)
//!
//! First phase of the bb compiler: raw source bytes in, a lazy stream of
//! [`Token`]s out. The stream supports single-token lookahead and a
//! rewind, which is all the recursive-descent parser above it needs.
//!
//! Everything here borrows from the source buffer; the tokenizer
//! allocates nothing. Unknown bytes are not errors at this level - they
//! become [`Token::Unknown`] and the parser rejects them with a proper
//! position. The only fatal condition is an unterminated string literal.

pub mod cursor;
mod edge_cases;
pub mod lexer;
pub mod token;

pub use lexer::{LexError, Result, TokenStream};
pub use token::Token;
