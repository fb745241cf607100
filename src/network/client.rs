//! HTTP client for making requests to catalog providers

use super::user_agent::{accept_json, accept_language, default_user_agent};
use crate::config::OutgoingSettings;
use crate::providers::{ProviderRequest, ProviderResponse};
use crate::results::ProviderError;
use anyhow::Result;
use reqwest::{Client, Response};
use std::collections::HashMap;
use std::time::Duration;

/// HTTP client wrapper with bookscout-specific configuration
#[derive(Clone)]
pub struct HttpClient {
    client: Client,
    default_timeout: Duration,
    user_agent: String,
}

impl HttpClient {
    /// Create a new HTTP client with default settings
    pub fn new() -> Result<Self> {
        Self::with_settings(&OutgoingSettings::default())
    }

    /// Create a new HTTP client with custom settings
    pub fn with_settings(settings: &OutgoingSettings) -> Result<Self> {
        let mut builder = Client::builder()
            .timeout(Duration::from_secs_f64(settings.request_timeout))
            .pool_max_idle_per_host(settings.pool_maxsize)
            .gzip(true)
            .brotli(true);

        // SSL verification
        if !settings.verify_ssl {
            builder = builder.danger_accept_invalid_certs(true);
        }

        // Proxy settings
        if let Some(ref proxy_url) = settings.proxies.all {
            builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
        } else {
            if let Some(ref http) = settings.proxies.http {
                builder = builder.proxy(reqwest::Proxy::http(http)?);
            }
            if let Some(ref https) = settings.proxies.https {
                builder = builder.proxy(reqwest::Proxy::https(https)?);
            }
        }

        let client = builder.build()?;

        Ok(Self {
            client,
            default_timeout: Duration::from_secs_f64(settings.request_timeout),
            user_agent: default_user_agent(),
        })
    }

    /// Execute a provider request
    pub async fn execute(&self, request: ProviderRequest) -> Result<ProviderResponse, ProviderError> {
        self.execute_with_timeout(request, self.default_timeout)
            .await
    }

    /// Execute a provider request with a custom timeout
    pub async fn execute_with_timeout(
        &self,
        request: ProviderRequest,
        timeout: Duration,
    ) -> Result<ProviderResponse, ProviderError> {
        let mut req_builder = self.client.get(&request.url).timeout(timeout);

        // Default headers
        req_builder = req_builder
            .header("User-Agent", &self.user_agent)
            .header("Accept", accept_json())
            .header("Accept-Language", accept_language("en"));

        // Custom headers
        for (key, value) in &request.headers {
            req_builder = req_builder.header(key, value);
        }

        // Query parameters
        if !request.params.is_empty() {
            req_builder = req_builder.query(&request.params);
        }

        let response = req_builder.send().await.map_err(Self::classify_error)?;

        Self::parse_response(response).await
    }

    /// GET request with parameters
    pub async fn get_with_params(
        &self,
        url: &str,
        params: HashMap<String, String>,
    ) -> Result<ProviderResponse, ProviderError> {
        let mut request = ProviderRequest::get(url);
        request.params = params;
        self.execute(request).await
    }

    /// Parse a reqwest response into a ProviderResponse
    async fn parse_response(response: Response) -> Result<ProviderResponse, ProviderError> {
        let status = response.status().as_u16();
        let url = response.url().to_string();

        let text = response.text().await.map_err(Self::classify_error)?;

        Ok(ProviderResponse { status, text, url })
    }

    /// Map a transport failure onto a provider error kind
    fn classify_error(err: reqwest::Error) -> ProviderError {
        if err.is_timeout() {
            ProviderError::Timeout
        } else {
            ProviderError::Network(err.to_string())
        }
    }

    /// Get current user agent
    pub fn user_agent(&self) -> &str {
        &self.user_agent
    }

    /// Default timeout this client was built with
    pub fn default_timeout(&self) -> Duration {
        self.default_timeout
    }
}

impl Default for HttpClient {
    fn default() -> Self {
        Self::new().expect("Failed to create default HTTP client")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_client_creation() {
        let client = HttpClient::new();
        assert!(client.is_ok());
    }

    #[tokio::test]
    async fn test_get_with_params() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(query_param("q", "dune"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{\"ok\":true}"))
            .mount(&server)
            .await;

        let client = HttpClient::new().unwrap();
        let mut params = HashMap::new();
        params.insert("q".to_string(), "dune".to_string());

        let response = client.get_with_params(&server.uri(), params).await.unwrap();
        assert!(response.is_success());
        assert!(response.text.contains("ok"));
    }

    #[tokio::test]
    async fn test_network_error_classification() {
        // Nothing listens on this port
        let client = HttpClient::new().unwrap();
        let err = client
            .execute(ProviderRequest::get("http://127.0.0.1:9/none"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ProviderError::Network(_) | ProviderError::Timeout
        ));
    }
}
