//! Unit tests for the document store.

mod path_tests;
