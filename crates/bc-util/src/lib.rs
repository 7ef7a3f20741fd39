//! bc-util - Core Utilities and Foundation Types
//!
//! This crate provides the small set of types shared by every phase of the
//! bb compiler: source positions, the diagnostic handler, and the bump
//! arena that owns the working set of a compilation.
//!
//! The arena is the backbone of the memory model. The driver creates a
//! single [`Bump`] per compilation; the source text is copied into it, the
//! parser allocates every AST node in it, and the code generator grows its
//! output buffers in it. Nothing is freed until the whole compilation is
//! done, which keeps ownership trivial: tokens borrow from the source
//! text, AST nodes borrow from each other, and all of it lives exactly as
//! long as the arena.

mod diagnostic;
mod pos;

pub use diagnostic::{Diagnostic, Handler, Level};
pub use pos::Pos;

// The arena. Phase crates name it through here so the whole workspace
// agrees on one allocator type.
pub use bumpalo::Bump;
