//! The gateway handle and its request builder.

use std::time::Duration;

use reqwest::multipart::Form;
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use mcs_core::error::{McsError, Result};

use crate::config::ShellConfig;

/// Handle to a single MCS gateway.
///
/// Cheap to clone and safe to share across tasks; each operation issues
/// exactly one outbound request and holds no state between calls beyond the
/// reqwest connection pool.
#[derive(Clone, Debug)]
pub struct Shell {
    http: Client,
    base: Url,
}

impl Shell {
    /// Creates a shell for the given gateway base URL with default settings.
    pub fn new(api_url: impl Into<String>) -> Result<Self> {
        Self::with_config(ShellConfig::new(api_url))
    }

    /// Creates a shell with custom configuration.
    pub fn with_config(config: ShellConfig) -> Result<Self> {
        let mut base = Url::parse(&config.api_url)
            .map_err(|e| McsError::Config(format!("invalid api url `{}`: {}", config.api_url, e)))?;

        // Endpoint paths join onto the base, so it must end with a slash.
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        let http = Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build()
            .map_err(|e| McsError::Config(format!("building HTTP client: {e}")))?;

        Ok(Self { http, base })
    }

    /// Starts a request against the given endpoint path.
    pub fn request(&self, path: &str) -> RequestBuilder {
        RequestBuilder {
            http: self.http.clone(),
            base: self.base.clone(),
            path: path.to_string(),
            options: Vec::new(),
            form: None,
        }
    }
}

/// Accumulates one request: endpoint path, query options, optional multipart
/// body. Owned by a single call path; consumed on send.
pub struct RequestBuilder {
    http: Client,
    base: Url,
    path: String,
    options: Vec<(String, String)>,
    form: Option<Form>,
}

impl RequestBuilder {
    /// Records one query option. Setting the same name again overwrites the
    /// previous value (last write wins).
    pub fn option(mut self, name: &str, value: impl ToString) -> Self {
        let value = value.to_string();
        match self.options.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = value,
            None => self.options.push((name.to_string(), value)),
        }
        self
    }

    /// Attaches a multipart body.
    pub fn body(mut self, form: Form) -> Self {
        self.form = Some(form);
        self
    }

    /// Sends as POST and returns the raw response. The caller decodes the
    /// body; dropping the response releases the connection.
    pub async fn send(self) -> Result<Response> {
        let endpoint = self.endpoint()?;
        debug!(%endpoint, "sending request");

        let mut request = self.http.post(endpoint);
        if !self.options.is_empty() {
            request = request.query(&self.options);
        }
        if let Some(form) = self.form {
            request = request.multipart(form);
        }

        check_status(request.send().await).await
    }

    /// Sends as GET (lookup endpoints) and returns the raw response.
    pub async fn get(self) -> Result<Response> {
        let endpoint = self.endpoint()?;
        debug!(%endpoint, "sending lookup request");

        let mut request = self.http.get(endpoint);
        if !self.options.is_empty() {
            request = request.query(&self.options);
        }

        check_status(request.send().await).await
    }

    /// Sends and decodes the single JSON response object into `T`.
    pub async fn exec<T: DeserializeOwned>(self) -> Result<T> {
        let response = self.send().await?;
        let body = response
            .bytes()
            .await
            .map_err(|e| McsError::Http(e.to_string()))?;
        Ok(serde_json::from_slice(&body)?)
    }

    fn endpoint(&self) -> Result<Url> {
        self.base
            .join(&self.path)
            .map_err(|e| McsError::Config(format!("invalid endpoint `{}`: {}", self.path, e)))
    }

    #[cfg(test)]
    pub(crate) fn recorded_options(&self) -> &[(String, String)] {
        &self.options
    }
}

async fn check_status(response: reqwest::Result<Response>) -> Result<Response> {
    let response = response.map_err(|e| McsError::Http(e.to_string()))?;

    if response.status().is_success() {
        return Ok(response);
    }

    let status = response.status().as_u16();
    let body = response.text().await.unwrap_or_default();
    Err(McsError::UnexpectedStatus { status, body })
}
