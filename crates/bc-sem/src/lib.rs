//! bc-sem - Semantic Analyzer
//!
//! Name resolution and the warning checks that run between parsing and
//! code generation. The analyzer walks the AST with a stack of scopes:
//! blocks push a fresh scope, function bodies push one pre-populated
//! with the parameter names.
//!
//! Almost everything the analyzer finds is a warning: referring to an
//! undeclared name, assigning to an undeclared name or to a constant,
//! declaring the same name twice in one scope, and top-level bindings
//! that are never read. Warnings do not stop compilation; the generator
//! emits the program as written. The two hard errors are structural:
//! a `func` literal anywhere other than the value of a top-level
//! declaration, and redeclaring the built-in `print`.

mod analysis;
mod edge_cases;
mod scope;

pub use analysis::{analyze, Analyzer, Result, SemError};
pub use scope::{Binding, Scope, ScopeStack};
