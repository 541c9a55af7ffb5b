//! HTTP client for the upstream topology service.
//!
//! Wraps the `/securetrack/api/topology/*` endpoints with the
//! authentication and TLS settings from [`UpstreamConfig`]. Non-2xx
//! responses are surfaced as [`UpstreamError`] with the upstream body
//! attached so callers can forward it.

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use serde_json::Value;
use tracing::debug;
use ureq::tls::TlsConfig;
use ureq::Agent;

use crate::config::UpstreamConfig;

/// Upstream error bodies can be full HTML pages, keep a bounded slice.
const MAX_DETAIL_LEN: usize = 2048;

/// Error type for upstream topology requests
#[derive(Debug, Clone)]
pub struct UpstreamError {
    /// HTTP status returned by the upstream, if a response was received
    pub status: Option<u16>,
    /// Error message or upstream response body
    pub details: String,
}

impl UpstreamError {
    /// Create an error for a failed transport (no response received)
    pub fn transport(details: impl Into<String>) -> Self {
        Self {
            status: None,
            details: truncate_details(details.into()),
        }
    }

    /// Create an error for a non-2xx upstream response
    pub fn bad_status(status: u16, details: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            details: truncate_details(details.into()),
        }
    }

    /// Create an error for missing or unusable client configuration
    pub fn not_configured(details: impl Into<String>) -> Self {
        Self {
            status: None,
            details: details.into(),
        }
    }
}

impl std::fmt::Display for UpstreamError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.status {
            Some(code) => write!(f, "Upstream returned status {}: {}", code, self.details),
            None => write!(f, "Upstream request failed: {}", self.details),
        }
    }
}

impl std::error::Error for UpstreamError {}

fn truncate_details(details: String) -> String {
    if details.len() <= MAX_DETAIL_LEN {
        return details;
    }
    let mut end = MAX_DETAIL_LEN;
    while !details.is_char_boundary(end) {
        end -= 1;
    }
    details[..end].to_string()
}

/// Client for the upstream topology path API.
pub struct TopologyClient {
    agent: Agent,
    upstream: UpstreamConfig,
}

impl TopologyClient {
    /// Create a client from upstream settings. The agent is configured
    /// once, requests reuse its connection pool.
    pub fn new(upstream: &UpstreamConfig) -> Self {
        let mut config = Agent::config_builder()
            .timeout_global(Some(upstream.timeout()))
            .http_status_as_error(false);
        if upstream.insecure {
            config = config.tls_config(TlsConfig::builder().disable_verification(true).build());
        }
        let agent: Agent = config.build().into();
        Self {
            agent,
            upstream: upstream.clone(),
        }
    }

    fn base_url(&self) -> &str {
        self.upstream.url.trim_end_matches('/')
    }

    fn auth_header(&self) -> Result<String, UpstreamError> {
        if let Some(token) = &self.upstream.token {
            return Ok(format!("Bearer {}", token));
        }
        if let (Some(user), Some(password)) = (&self.upstream.user, &self.upstream.password) {
            let encoded = STANDARD.encode(format!("{}:{}", user, password));
            return Ok(format!("Basic {}", encoded));
        }
        Err(UpstreamError::not_configured(
            "Missing authentication. Set PATHLENS_UPSTREAM_TOKEN or PATHLENS_UPSTREAM_USER/PATHLENS_UPSTREAM_PASSWORD",
        ))
    }

    /// Fetch the path document for a source/destination pair.
    ///
    /// `service` is forwarded as-is when given and omitted otherwise,
    /// the upstream applies its own default in that case.
    pub fn fetch_path(
        &self,
        source: &str,
        destination: &str,
        service: Option<&str>,
    ) -> Result<Value, UpstreamError> {
        let auth = self.auth_header()?;
        let url = format!("{}/securetrack/api/topology/path", self.base_url());
        debug!("Fetching topology path from {} ({} -> {})", url, source, destination);

        let mut request = self
            .agent
            .get(&url)
            .query("src", source)
            .query("dst", destination);
        if let Some(service) = service {
            request = request.query("service", service);
        }
        let mut response = request
            .header("Authorization", &auth)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| UpstreamError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(UpstreamError::bad_status(status.as_u16(), body));
        }
        response
            .body_mut()
            .read_json::<Value>()
            .map_err(|e| UpstreamError::transport(e.to_string()))
    }

    /// Fetch the rendered path image (PNG bytes) for a source/destination pair.
    pub fn fetch_path_image(
        &self,
        source: &str,
        destination: &str,
        service: &str,
    ) -> Result<Vec<u8>, UpstreamError> {
        let auth = self.auth_header()?;
        let url = format!("{}/securetrack/api/topology/path_image", self.base_url());
        debug!("Fetching topology image from {} ({} -> {})", url, source, destination);

        let mut response = self
            .agent
            .get(&url)
            .query("src", source)
            .query("dst", destination)
            .query("service", service)
            .header("Authorization", &auth)
            .header("Accept", "image/png")
            .call()
            .map_err(|e| UpstreamError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.body_mut().read_to_string().unwrap_or_default();
            return Err(UpstreamError::bad_status(status.as_u16(), body));
        }
        response
            .body_mut()
            .read_to_vec()
            .map_err(|e| UpstreamError::transport(e.to_string()))
    }
}
