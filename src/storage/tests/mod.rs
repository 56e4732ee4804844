//! Unit tests for local key/value storage.

mod json_tests;
