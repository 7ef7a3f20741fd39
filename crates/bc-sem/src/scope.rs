//! Lexical scopes and bindings.

use indexmap::IndexMap;

/// What the analyzer knows about one declared name.
#[derive(Clone, Copy, Debug)]
pub struct Binding {
    /// Declared with `::` rather than `:=`.
    pub constant: bool,
    /// Set the first time an identifier resolves to this binding.
    pub read: bool,
}

/// A single scope: the bindings declared in one block or function body,
/// in declaration order.
#[derive(Debug, Default)]
pub struct Scope<'a> {
    bindings: IndexMap<&'a str, Binding>,
}

impl<'a> Scope<'a> {
    /// True if `name` is declared in this scope.
    pub fn contains(&self, name: &str) -> bool {
        self.bindings.contains_key(name)
    }

    /// Adds a binding. The caller checks for duplicates first.
    pub fn declare(&mut self, name: &'a str, constant: bool) {
        self.bindings.insert(
            name,
            Binding {
                constant,
                read: false,
            },
        );
    }

    /// Iterates bindings in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &Binding)> {
        self.bindings.iter().map(|(name, binding)| (*name, binding))
    }
}

/// The scope stack. Blocks and function bodies push; resolution walks
/// from the innermost scope outward.
#[derive(Debug)]
pub struct ScopeStack<'a> {
    scopes: Vec<Scope<'a>>,
}

impl<'a> ScopeStack<'a> {
    /// Creates a stack holding only the top-level scope.
    pub fn new() -> Self {
        Self {
            scopes: vec![Scope::default()],
        }
    }

    /// Enters a fresh scope.
    pub fn push(&mut self) {
        self.scopes.push(Scope::default());
    }

    /// Leaves the innermost scope, returning it.
    pub fn pop(&mut self) -> Scope<'a> {
        debug_assert!(self.scopes.len() > 1, "cannot pop the top-level scope");
        self.scopes.pop().unwrap_or_default()
    }

    /// Number of open scopes. 1 means top level.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// The innermost scope.
    pub fn current(&self) -> &Scope<'a> {
        &self.scopes[self.scopes.len() - 1]
    }

    /// The innermost scope, mutable.
    pub fn current_mut(&mut self) -> &mut Scope<'a> {
        let last = self.scopes.len() - 1;
        &mut self.scopes[last]
    }

    /// The top-level scope.
    pub fn top_level(&self) -> &Scope<'a> {
        &self.scopes[0]
    }

    /// Resolves `name` to its innermost visible binding.
    pub fn resolve(&self, name: &str) -> Option<Binding> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.bindings.get(name).copied())
    }

    /// Resolves `name` and marks the binding as read.
    pub fn mark_read(&mut self, name: &str) -> bool {
        for scope in self.scopes.iter_mut().rev() {
            if let Some(binding) = scope.bindings.get_mut(name) {
                binding.read = true;
                return true;
            }
        }
        false
    }
}

impl Default for ScopeStack<'_> {
    fn default() -> Self {
        Self::new()
    }
}
