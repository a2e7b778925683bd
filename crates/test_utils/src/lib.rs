//! Test Utilities
//!
//! Shared helpers for the clinic billing test suites: deterministic
//! builders with sensible defaults, common fixtures, randomized data
//! generators, and domain-specific assertions.

pub mod assertions;
pub mod builders;
pub mod fixtures;
pub mod generators;

pub use builders::{TestBillBuilder, TestPatientBuilder};
