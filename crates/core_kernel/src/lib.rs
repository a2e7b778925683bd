//! Core Kernel - Foundational types and utilities for the clinic billing system
//!
//! This crate provides the fundamental building blocks used across all domain modules:
//! - Money with precise decimal arithmetic
//! - Strongly-typed entity identifiers

pub mod money;
pub mod identifiers;

pub use money::{Money, MoneyError};
pub use identifiers::{PatientId, BillId, PaymentId};
