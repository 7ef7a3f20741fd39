//! Edge case tests for bc-par.
