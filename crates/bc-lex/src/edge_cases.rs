//! Edge case tests for bc-lex.
