//! The bb tokenizer.
//!
//! [`TokenStream`] is a lazy token iterator over a source buffer with
//! single-token lookahead and a rewind-to-start operation. The driver
//! lexes the whole stream once for its trace dump, resets, and hands the
//! stream to the parser.

use bc_util::Pos;
use thiserror::Error;

use crate::cursor::Cursor;
use crate::token::Token;

/// Error type for tokenization.
///
/// Only unterminated strings are fatal at this level; any other
/// unexpected byte is surfaced as [`Token::Unknown`] and left for the
/// parser to reject.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LexError {
    /// The closing quote of a string literal was never found.
    #[error("unterminated string literal at {0}")]
    UnterminatedString(Pos),
}

/// Result type alias for tokenization.
pub type Result<T> = std::result::Result<T, LexError>;

/// A lazy token stream over a source buffer.
///
/// # Example
///
/// ```
/// use bc_lex::{Token, TokenStream};
///
/// let mut tokens = TokenStream::new("x := 42;");
/// assert_eq!(tokens.next_token(), Ok(Token::Ident("x")));
/// assert_eq!(tokens.next_token(), Ok(Token::Colon));
/// assert_eq!(tokens.next_token(), Ok(Token::Equal));
/// assert_eq!(tokens.next_token(), Ok(Token::Number("42")));
/// assert_eq!(tokens.next_token(), Ok(Token::Semi));
/// assert_eq!(tokens.next_token(), Ok(Token::Eof));
/// assert_eq!(tokens.next_token(), Ok(Token::Eof));
/// ```
pub struct TokenStream<'a> {
    cursor: Cursor<'a>,

    /// Start position of the most recently produced token.
    token_pos: Pos,
}

impl<'a> TokenStream<'a> {
    /// Creates a token stream over the given source text.
    pub fn new(source: &'a str) -> Self {
        Self {
            cursor: Cursor::new(source),
            token_pos: Pos::START,
        }
    }

    /// The source text this stream lexes.
    pub fn source(&self) -> &'a str {
        self.cursor.source()
    }

    /// Start position of the token most recently returned by
    /// [`next_token`](Self::next_token).
    pub fn token_pos(&self) -> Pos {
        self.token_pos
    }

    /// Rewinds the stream to the beginning of the source.
    pub fn reset(&mut self) {
        self.cursor = Cursor::new(self.cursor.source());
        self.token_pos = Pos::START;
    }

    /// Returns the token [`next_token`](Self::next_token) would return,
    /// without advancing the stream.
    pub fn peek_token(&mut self) -> Result<Token<'a>> {
        let cursor = self.cursor;
        let token_pos = self.token_pos;
        let token = self.next_token();
        self.cursor = cursor;
        self.token_pos = token_pos;
        token
    }

    /// Consumes and returns the next token.
    ///
    /// [`Token::Eof`] is returned at the end of input and again on every
    /// subsequent call.
    pub fn next_token(&mut self) -> Result<Token<'a>> {
        self.skip_whitespace();
        self.token_pos = self.cursor.pos();

        let Some(b) = self.cursor.current_byte() else {
            return Ok(Token::Eof);
        };

        let punct = match b {
            b'(' => Some(Token::OpenParen),
            b')' => Some(Token::CloseParen),
            b'{' => Some(Token::OpenCurly),
            b'}' => Some(Token::CloseCurly),
            b';' => Some(Token::Semi),
            b',' => Some(Token::Comma),
            b':' => Some(Token::Colon),
            b'=' => Some(Token::Equal),
            b'!' => Some(Token::Excl),
            b'*' => Some(Token::Star),
            b'+' => Some(Token::Plus),
            b'-' => Some(Token::Hyphen),
            b'/' => Some(Token::Slash),
            b'%' => Some(Token::Percent),
            _ => None,
        };
        if let Some(token) = punct {
            self.cursor.advance();
            return Ok(token);
        }

        if is_ident_start(b) {
            return Ok(self.lex_ident());
        }
        if b.is_ascii_digit() {
            let (start, end) = self.cursor.advance_while(|b| b.is_ascii_digit());
            return Ok(Token::Number(self.cursor.slice(start, end)));
        }
        if b == b'"' {
            return self.lex_string();
        }

        let pos = self.cursor.pos();
        self.cursor.advance();
        Ok(Token::Unknown {
            line: pos.line,
            col: pos.col,
            ch: b as char,
        })
    }

    fn skip_whitespace(&mut self) {
        self.cursor
            .advance_while(|b| matches!(b, b' ' | b'\t' | b'\n' | b'\r'));
    }

    fn lex_ident(&mut self) -> Token<'a> {
        let (start, end) = self.cursor.advance_while(is_ident_continue);
        let text = self.cursor.slice(start, end);
        if text == "batch" {
            if let Some(token) = self.lex_inline_batch() {
                return token;
            }
        }
        Token::Ident(text)
    }

    /// Attempts to lex an inline-batch body after the identifier `batch`.
    ///
    /// Skips whitespace and counts a run of N opening braces; the body
    /// then extends until N consecutive closing braces. Shorter closer
    /// runs are part of the body. EOF truncates the body to what was
    /// collected. Returns `None`, restoring the cursor, when no opening
    /// brace follows, in which case `batch` is an ordinary identifier.
    fn lex_inline_batch(&mut self) -> Option<Token<'a>> {
        let saved = self.cursor;
        self.skip_whitespace();
        if self.cursor.current_byte() != Some(b'{') {
            self.cursor = saved;
            return None;
        }

        let mut openers = 0usize;
        while self.cursor.current_byte() == Some(b'{') {
            self.cursor.advance();
            openers += 1;
        }

        let body_start = self.cursor.position();
        let mut run = 0usize;
        loop {
            match self.cursor.current_byte() {
                None => {
                    let body = self.cursor.slice(body_start, self.cursor.position());
                    return Some(Token::InlineBatch(body));
                }
                Some(b'}') => {
                    self.cursor.advance();
                    run += 1;
                    if run == openers {
                        let end = self.cursor.position() - openers;
                        return Some(Token::InlineBatch(self.cursor.slice(body_start, end)));
                    }
                }
                Some(_) => {
                    self.cursor.advance();
                    run = 0;
                }
            }
        }
    }

    fn lex_string(&mut self) -> Result<Token<'a>> {
        let start_pos = self.token_pos;
        self.cursor.advance(); // opening quote
        let payload_start = self.cursor.position();
        loop {
            match self.cursor.current_byte() {
                None => return Err(LexError::UnterminatedString(start_pos)),
                Some(b'\\') => {
                    // Escape sentinel: the next byte, whatever it is,
                    // belongs to the payload.
                    self.cursor.advance();
                    if self.cursor.is_at_end() {
                        return Err(LexError::UnterminatedString(start_pos));
                    }
                    self.cursor.advance();
                }
                Some(b'"') => {
                    let payload = self.cursor.slice(payload_start, self.cursor.position());
                    self.cursor.advance();
                    return Ok(Token::String(payload));
                }
                Some(_) => self.cursor.advance(),
            }
        }
    }
}

fn is_ident_start(b: u8) -> bool {
    b.is_ascii_alphabetic() || b == b'_'
}

fn is_ident_continue(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_all(source: &str) -> Vec<Token<'_>> {
        let mut tokens = TokenStream::new(source);
        let mut out = Vec::new();
        loop {
            let token = tokens.next_token().expect("lex error");
            if token == Token::Eof {
                break;
            }
            out.push(token);
        }
        out
    }

    #[test]
    fn lexes_declaration() {
        assert_eq!(
            lex_all("x := 1;"),
            vec![
                Token::Ident("x"),
                Token::Colon,
                Token::Equal,
                Token::Number("1"),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn lexes_constant_declaration() {
        assert_eq!(
            lex_all("pi :: 3;"),
            vec![
                Token::Ident("pi"),
                Token::Colon,
                Token::Colon,
                Token::Number("3"),
                Token::Semi,
            ]
        );
    }

    #[test]
    fn string_payload_is_raw() {
        assert_eq!(lex_all(r#""a\"b""#), vec![Token::String(r#"a\"b"#)]);
    }

    #[test]
    fn unterminated_string_is_fatal() {
        let mut tokens = TokenStream::new("x := \"oops");
        assert_eq!(tokens.next_token(), Ok(Token::Ident("x")));
        assert_eq!(tokens.next_token(), Ok(Token::Colon));
        assert_eq!(tokens.next_token(), Ok(Token::Equal));
        assert_eq!(
            tokens.next_token(),
            Err(LexError::UnterminatedString(Pos::new(1, 6)))
        );
    }

    #[test]
    fn trailing_escape_is_unterminated() {
        let mut tokens = TokenStream::new("\"abc\\");
        assert_eq!(
            tokens.next_token(),
            Err(LexError::UnterminatedString(Pos::new(1, 1)))
        );
    }

    #[test]
    fn unknown_byte_carries_position() {
        let mut tokens = TokenStream::new("  @");
        assert_eq!(
            tokens.next_token(),
            Ok(Token::Unknown { line: 1, col: 3, ch: '@' })
        );
    }

    #[test]
    fn peek_does_not_advance() {
        let mut tokens = TokenStream::new("a b");
        assert_eq!(tokens.peek_token(), Ok(Token::Ident("a")));
        assert_eq!(tokens.peek_token(), Ok(Token::Ident("a")));
        assert_eq!(tokens.next_token(), Ok(Token::Ident("a")));
        assert_eq!(tokens.next_token(), Ok(Token::Ident("b")));
    }

    #[test]
    fn reset_rewinds_to_the_start() {
        let mut tokens = TokenStream::new("a b");
        assert_eq!(tokens.next_token(), Ok(Token::Ident("a")));
        tokens.reset();
        assert_eq!(tokens.next_token(), Ok(Token::Ident("a")));
    }

    #[test]
    fn inline_batch_single_brace() {
        assert_eq!(
            lex_all("batch { echo hi }"),
            vec![Token::InlineBatch(" echo hi ")]
        );
    }

    #[test]
    fn inline_batch_nested_braces() {
        // Two openers, so a single } stays in the body.
        assert_eq!(
            lex_all("batch {{ if exist x ( echo y } ) }}"),
            vec![Token::InlineBatch(" if exist x ( echo y } ) ")]
        );
    }

    #[test]
    fn inline_batch_truncated_at_eof() {
        assert_eq!(
            lex_all("batch { echo hi"),
            vec![Token::InlineBatch(" echo hi")]
        );
    }

    #[test]
    fn batch_without_brace_is_an_identifier() {
        assert_eq!(
            lex_all("batch ;"),
            vec![Token::Ident("batch"), Token::Semi]
        );
    }

    #[test]
    fn eof_is_sticky() {
        let mut tokens = TokenStream::new("");
        assert_eq!(tokens.next_token(), Ok(Token::Eof));
        assert_eq!(tokens.next_token(), Ok(Token::Eof));
    }
}
