//! Core types for the sensus synthetic civil-registry generator.
//!
//! This crate is deliberately free of RNG and I/O dependencies.
//! All other crates depend on it.

pub mod config;
pub mod error;
pub mod id_number;
pub mod record;

pub use error::{Error, Result};
