//! Shell configuration.

use serde::{Deserialize, Serialize};

/// Configuration for a [`Shell`](crate::Shell).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ShellConfig {
    /// Base URL of the gateway API (e.g. "https://gateway.example.com/api/v0/")
    pub api_url: String,
    /// Request timeout in seconds
    pub timeout_seconds: u64,
}

impl ShellConfig {
    /// Creates a config for the given gateway base URL.
    pub fn new(api_url: impl Into<String>) -> Self {
        Self {
            api_url: api_url.into(),
            timeout_seconds: 30,
        }
    }

    /// Overrides the request timeout.
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout_seconds = seconds;
        self
    }
}
