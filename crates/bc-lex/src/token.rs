//! Token definitions for the bb language.

use std::fmt;

/// A single token.
///
/// Text-carrying variants borrow directly from the source buffer; tokens
/// own nothing and never outlive the buffer they were lexed from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Token<'a> {
    /// End of input. Returned again on every call once reached.
    Eof,
    /// `[A-Za-z_][A-Za-z0-9_]*`
    Ident(&'a str),
    /// `[0-9]+`, kept as the source substring.
    Number(&'a str),
    /// The raw bytes between the delimiting quotes, escapes unprocessed.
    String(&'a str),
    /// The body of a `batch { ... }` construct, braces stripped.
    InlineBatch(&'a str),
    /// `(`
    OpenParen,
    /// `)`
    CloseParen,
    /// `{`
    OpenCurly,
    /// `}`
    CloseCurly,
    /// `;`
    Semi,
    /// `,`
    Comma,
    /// `:`
    Colon,
    /// `=`
    Equal,
    /// `!`
    Excl,
    /// `*`
    Star,
    /// `+`
    Plus,
    /// `-`
    Hyphen,
    /// `/`
    Slash,
    /// `%`
    Percent,
    /// Any other byte, with the position where it was found.
    Unknown { line: u32, col: u32, ch: char },
}

impl<'a> Token<'a> {
    /// Renders the token back to source text.
    ///
    /// Joining rendered tokens with spaces and re-lexing the result yields
    /// the original token sequence. Inline-batch bodies are wrapped in one
    /// more brace than their longest run of closers so the body survives
    /// the trip.
    pub fn render(&self) -> std::string::String {
        match self {
            Token::Eof => std::string::String::new(),
            Token::Ident(text) => (*text).to_owned(),
            Token::Number(text) => (*text).to_owned(),
            Token::String(text) => format!("\"{}\"", text),
            Token::InlineBatch(body) => {
                let mut run = 0usize;
                let mut longest = 0usize;
                for b in body.bytes() {
                    if b == b'}' {
                        run += 1;
                        longest = longest.max(run);
                    } else {
                        run = 0;
                    }
                }
                let braces = longest + 1;
                format!(
                    "batch {}{}{}",
                    "{".repeat(braces),
                    body,
                    "}".repeat(braces)
                )
            }
            Token::OpenParen => "(".to_owned(),
            Token::CloseParen => ")".to_owned(),
            Token::OpenCurly => "{".to_owned(),
            Token::CloseCurly => "}".to_owned(),
            Token::Semi => ";".to_owned(),
            Token::Comma => ",".to_owned(),
            Token::Colon => ":".to_owned(),
            Token::Equal => "=".to_owned(),
            Token::Excl => "!".to_owned(),
            Token::Star => "*".to_owned(),
            Token::Plus => "+".to_owned(),
            Token::Hyphen => "-".to_owned(),
            Token::Slash => "/".to_owned(),
            Token::Percent => "%".to_owned(),
            Token::Unknown { ch, .. } => ch.to_string(),
        }
    }
}

/// The annotated form used by the TOKENS trace dump.
impl fmt::Display for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Token::Eof => write!(f, "(eof)"),
            Token::Ident(text) => write!(f, "Ident({})", text),
            Token::Number(text) => write!(f, "Number({})", text),
            Token::String(text) => write!(f, "String(\"{}\")", text),
            Token::InlineBatch(body) => write!(f, "InlineBatch({} bytes)", body.len()),
            Token::OpenParen => write!(f, "OpenParen"),
            Token::CloseParen => write!(f, "CloseParen"),
            Token::OpenCurly => write!(f, "OpenCurly"),
            Token::CloseCurly => write!(f, "CloseCurly"),
            Token::Semi => write!(f, "Semi"),
            Token::Comma => write!(f, "Comma"),
            Token::Colon => write!(f, "Colon"),
            Token::Equal => write!(f, "Equal"),
            Token::Excl => write!(f, "Excl"),
            Token::Star => write!(f, "Star"),
            Token::Plus => write!(f, "Plus"),
            Token::Hyphen => write!(f, "Hyphen"),
            Token::Slash => write!(f, "Slash"),
            Token::Percent => write!(f, "Percent"),
            Token::Unknown { line, col, ch } => {
                write!(f, "(unknown:{}:{}: '{}')", line, col, ch)
            }
        }
    }
}
