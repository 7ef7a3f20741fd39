//! Edge case tests for bc-sem.
