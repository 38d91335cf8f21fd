//! Configuration module for the delivery stream sink
//!
//! This module handles configuration loading, validation, and management.

pub mod loader;
pub mod types;

pub use types::SinkConfiguration;
