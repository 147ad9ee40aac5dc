//! Common Test Utilities
//!
//! Service handles wired to a mock backend, key event builders, and a
//! polling helper for views whose work finishes on spawned tasks.

pub mod fixtures;

pub use fixtures::*;
