//! # MCS Core
//!
//! Core types, errors, and wire constants for the MCS multi-chain storage
//! gateway client.
//!
//! This crate provides the foundational building blocks used by the client
//! crates:
//!
//! - **Types**: Wire-level response shapes for add and lookup operations
//! - **Errors**: Comprehensive error types with context
//! - **Constants**: Exact spellings of query options and endpoint paths

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms, clippy::all)]

pub mod constants;
pub mod error;
pub mod types;

// Re-export commonly used items at crate root
pub use constants::*;
pub use error::{McsError, Result};
pub use types::*;
