//! bc-gen - Batch Code Generator
//!
//! The final phase of the bb compiler: lowering the structured,
//! expression-oriented AST into the statement-oriented Batch language.
//! This is where the distance between the two languages is paid for -
//! see the module documentation in [`batch`] for the lowering rules.
//!
//! The generator is deterministic: identical input programs produce
//! byte-identical scripts. Output uses CRLF line endings, as Batch
//! expects.

mod batch;
mod edge_cases;
mod error;

pub use batch::{generate, BatchGen, StmtCtx};
pub use error::{CodeGenError, Result};
