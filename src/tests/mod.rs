//! Crate-internal test suites.
//!
//! - `common`: fixtures shared by the suites below
//! - `mocks`: mockall double of the backend gateway
//! - `integration`: view flows driven against a wiremock backend
//! - `property`: proptest invariants of the core state machines

pub mod common;
pub mod mocks;

mod property;
