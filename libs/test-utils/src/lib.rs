//! Shared test utilities for glacier-client.
//!
//! This crate provides:
//! - An in-memory fake Glacier service usable as a `Transport`
//! - A fixed clock for deterministic timestamps
//! - Proptest generators for vault names and markers
//! - JSON fixtures shaped like Glacier responses

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod clock;
pub mod fake;
pub mod fixtures;
pub mod generators;
pub mod logging;

pub use clock::FixedClock;
pub use fake::FakeGlacier;
pub use generators::*;
pub use logging::init_test_tracing;
