//! Diagnostic reporting infrastructure.
//!
//! Warnings produced by the analyzer and the code generator do not stop
//! compilation; they are printed to standard output as they are recorded,
//! interleaved with the driver's trace sections, which is where users of
//! the original compiler expect to see them. Fatal conditions are not
//! diagnostics at all - the phases return them as errors and the driver
//! terminates.

use std::cell::RefCell;
use std::fmt;

/// Diagnostic severity level.
///
/// # Examples
///
/// ```
/// use bc_util::Level;
///
/// assert_eq!(format!("{}", Level::Warning), "warning");
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Level {
    /// An error that prevents compilation.
    Error,
    /// A warning that does not prevent compilation.
    Warning,
    /// Additional information about another diagnostic.
    Note,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Error => write!(f, "error"),
            Level::Warning => write!(f, "warning"),
            Level::Note => write!(f, "note"),
        }
    }
}

/// A single diagnostic message.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    /// Severity of the message.
    pub level: Level,
    /// The message text, already fully formatted.
    pub message: String,
}

impl Diagnostic {
    /// Creates a warning diagnostic.
    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            message: message.into(),
        }
    }

    /// Creates an error diagnostic.
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            message: message.into(),
        }
    }
}

/// Collector for diagnostics emitted during a compilation.
///
/// The handler records every diagnostic and, unless constructed with
/// [`Handler::silent`], echoes warnings to standard output the moment
/// they are recorded. Phases take `&Handler`; interior mutability keeps
/// the borrow story simple while the AST is being walked.
///
/// # Examples
///
/// ```
/// use bc_util::Handler;
///
/// let handler = Handler::silent();
/// handler.warn("Unused variable: x");
/// assert_eq!(handler.warning_count(), 1);
/// assert!(!handler.has_errors());
/// ```
pub struct Handler {
    diagnostics: RefCell<Vec<Diagnostic>>,
    echo: bool,
}

impl Handler {
    /// Creates a handler that echoes warnings to stdout.
    pub fn new() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            echo: true,
        }
    }

    /// Creates a handler that only records. Used by tests.
    pub fn silent() -> Self {
        Self {
            diagnostics: RefCell::new(Vec::new()),
            echo: false,
        }
    }

    /// Records a warning.
    pub fn warn(&self, message: impl Into<String>) {
        self.report(Diagnostic::warning(message));
    }

    /// Records an error.
    pub fn error(&self, message: impl Into<String>) {
        self.report(Diagnostic::error(message));
    }

    /// Records an arbitrary diagnostic.
    pub fn report(&self, diagnostic: Diagnostic) {
        if self.echo {
            match diagnostic.level {
                Level::Error => eprintln!("{}", diagnostic.message),
                _ => println!("{}", diagnostic.message),
            }
        }
        self.diagnostics.borrow_mut().push(diagnostic);
    }

    /// Returns true if any error-level diagnostic was recorded.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .borrow()
            .iter()
            .any(|d| d.level == Level::Error)
    }

    /// Number of warning-level diagnostics recorded so far.
    pub fn warning_count(&self) -> usize {
        self.diagnostics
            .borrow()
            .iter()
            .filter(|d| d.level == Level::Warning)
            .count()
    }

    /// Clones out the recorded messages, in order. Used by tests and the
    /// driver's summary.
    pub fn messages(&self) -> Vec<String> {
        self.diagnostics
            .borrow()
            .iter()
            .map(|d| d.message.clone())
            .collect()
    }
}

impl Default for Handler {
    fn default() -> Self {
        Self::new()
    }
}
