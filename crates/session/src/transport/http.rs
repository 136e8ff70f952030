use std::time::Duration;

use protocol::{QueryRequest, QueryResponse, decode_response};
use tracing::debug;

use crate::config::ClientConfig;
use crate::transport::{QueryTransport, TransportError};

/// Requests that take longer than this resolve to a network error instead of
/// leaving the session loading.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(90);

/// Native transport on `reqwest`.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    url: String,
}

impl HttpTransport {
    pub fn new(config: &ClientConfig) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(Self::with_client(client, config))
    }

    pub fn with_client(client: reqwest::Client, config: &ClientConfig) -> Self {
        Self {
            client,
            url: config.query_url(),
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl QueryTransport for HttpTransport {
    async fn send(&self, request: QueryRequest) -> Result<QueryResponse, TransportError> {
        debug!(url = %self.url, "posting query");
        let resp = self
            .client
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(TransportError::Status(status.as_u16()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(decode_response(&body)?)
    }
}
