//! Integration test suite for datastore configuration assembly.
//!
//! 1. Defaults and the fuzzing/GC window invariant
//! 2. Last-write-wins option ordering
//! 3. Settings file and environment layering

pub mod ordering_tests;
pub mod settings_tests;
