//! FHIR REST API client

use crate::cache_control::CacheControl;
use crate::error::{Error, Result};
use crate::search::PatientSearchParams;
use async_trait::async_trait;
use ferrum_models::Bundle;
use reqwest::header::{ACCEPT, CACHE_CONTROL};
use reqwest::Client;
use std::time::{Duration, Instant};
use tracing::debug;

/// Public HAPI FHIR R4 test server
pub const DEFAULT_BASE_URL: &str = "http://hapi.fhir.org/baseR4";

const FHIR_JSON: &str = "application/fhir+json";

/// A value returned by a request together with how long the request took.
#[derive(Debug, Clone, PartialEq)]
pub struct Timed<T> {
    pub value: T,
    pub elapsed: Duration,
}

impl<T> Timed<T> {
    pub fn new(value: T, elapsed: Duration) -> Self {
        Self { value, elapsed }
    }

    /// Elapsed time in whole milliseconds.
    pub fn elapsed_millis(&self) -> u64 {
        u64::try_from(self.elapsed.as_millis()).unwrap_or(u64::MAX)
    }

    pub fn into_parts(self) -> (T, Duration) {
        (self.value, self.elapsed)
    }
}

/// Connection settings for a [`FhirClient`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientConfig {
    /// Service base URL, without a trailing slash
    pub base_url: String,
    pub timeout: Duration,
    pub user_agent: String,
}

impl ClientConfig {
    /// Settings for the given base URL with default timeout and user agent.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: format!("ferrum-client/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}

/// Patient search capability of a FHIR server.
///
/// Each call returns the search Bundle along with the request's latency.
#[async_trait]
pub trait PatientSearch: Send + Sync {
    async fn search_patients(
        &self,
        params: &PatientSearchParams,
        cache: CacheControl,
    ) -> Result<Timed<Bundle>>;

    /// Search `Patient` by family name.
    async fn search_patients_by_family(
        &self,
        family: &str,
        cache: CacheControl,
    ) -> Result<Timed<Bundle>> {
        self.search_patients(&PatientSearchParams::by_family(family), cache)
            .await
    }
}

/// Client for a FHIR server's RESTful API.
pub struct FhirClient {
    client: Client,
    base_url: String,
}

impl FhirClient {
    /// Create a client for the public HAPI test server.
    pub fn new() -> Result<Self> {
        Self::with_config(&ClientConfig::default())
    }

    /// Create a client from explicit settings.
    pub fn with_config(config: &ClientConfig) -> Result<Self> {
        if config.base_url.trim().is_empty() {
            return Err(Error::Config("base URL must not be empty".to_string()));
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(config.user_agent.clone())
            .build()?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn search_url(&self, resource_type: &str, params: &PatientSearchParams) -> String {
        let query = params.to_query_string();
        if query.is_empty() {
            format!("{}/{}", self.base_url, resource_type)
        } else {
            format!("{}/{}?{}", self.base_url, resource_type, query)
        }
    }
}

#[async_trait]
impl PatientSearch for FhirClient {
    async fn search_patients(
        &self,
        params: &PatientSearchParams,
        cache: CacheControl,
    ) -> Result<Timed<Bundle>> {
        let url = self.search_url("Patient", params);

        let mut request = self.client.get(&url).header(ACCEPT, FHIR_JSON);
        if let Some(directive) = cache.header_value() {
            request = request.header(CACHE_CONTROL, directive);
        }

        // Latency covers the round trip and body transfer, not JSON decoding.
        let started = Instant::now();
        let response = request.send().await?;
        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "search rejected");
            return Err(Error::Status { status, url });
        }
        let body = response.bytes().await?;
        let elapsed = started.elapsed();

        debug!(
            method = "GET",
            %url,
            %status,
            bytes = body.len(),
            elapsed_ms = elapsed.as_millis() as u64,
            cache_control = ?cache.header_value(),
            "search completed"
        );

        let bundle = Bundle::from_slice(&body)?;
        Ok(Timed::new(bundle, elapsed))
    }
}
