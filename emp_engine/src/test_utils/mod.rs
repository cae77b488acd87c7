//! Helpers for tests that need a real database. Enabled with the `test_utils` feature.
pub mod prepare_env;
