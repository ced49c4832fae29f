//! Domain layer for airelay
//!
//! Core business types and boundary contracts for the AI routing engine.
//! This crate holds no I/O: providers and infrastructure implement the
//! port traits defined here.

/// Domain-wide constants and defaults
pub mod constants;
/// Error handling types
pub mod error;
/// Port interfaces implemented by outer layers
pub mod ports;
/// Repository interfaces for durable state
pub mod repositories;
/// Immutable domain value objects
pub mod value_objects;

pub use error::{Error, ProviderErrorKind, Result};
