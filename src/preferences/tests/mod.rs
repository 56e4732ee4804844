//! Unit tests for layout preferences.
