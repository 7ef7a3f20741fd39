//! Error types for Batch code generation.

use thiserror::Error;

/// Error type for the code generator.
///
/// Codegen never recovers: any attempt to emit a forbidden AST shape
/// aborts the compilation. Shapes the analyzer rejects can still reach a
/// generator that is driven directly, so the checks are repeated here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodeGenError {
    /// A `func` literal in expression position.
    #[error("cannot emit a function in expression position")]
    FunctionInExpression,

    /// A function declaration below the top level.
    #[error("function declarations are only allowed at the top level")]
    NestedFunction,

    /// A call whose target is not a plain name.
    #[error("call target is not a plain name")]
    InvalidCallee,

    /// Formatting into the output buffer failed.
    #[error("formatting error: {0}")]
    Format(#[from] std::fmt::Error),
}

/// Result type alias for code generation operations.
pub type Result<T> = std::result::Result<T, CodeGenError>;
