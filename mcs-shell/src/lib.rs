//! HTTP shell for the MCS multi-chain storage gateway.
//!
//! Builds multipart add requests and query-option lookups against an
//! IPFS-style gateway and decodes the JSON responses into typed results.
//! There is no caching, no retry policy and no state beyond the underlying
//! connection pool; every operation is a single request/response round trip.
//!
//! ```rust,ignore
//! let shell = Shell::new("https://gateway.example.com/api/v0/")?;
//! let hash = shell.add(b"hello".to_vec(), &AddOptions::new().pin(true)).await?;
//! ```

mod add;
mod config;
mod files;
mod gateway;
mod shell;

pub use add::AddOptions;
pub use config::ShellConfig;
pub use shell::{RequestBuilder, Shell};

// Re-export the shared result/error types and wire shapes
pub use mcs_core::{
    AddResult, FileServerData, GatewayEntry, GatewayListResponse, McsError, Result,
};
