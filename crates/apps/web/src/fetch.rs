use gloo_net::http::Request;
use protocol::{QueryRequest, QueryResponse, decode_response};
use session::{ClientConfig, QueryTransport, TransportError};

/// Browser transport on the Fetch API.
///
/// There is no abort: a superseded request is left to finish and its answer
/// is discarded by the page controller.
#[derive(Debug, Clone)]
pub struct FetchTransport {
    url: String,
}

impl FetchTransport {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            url: config.query_url(),
        }
    }
}

impl QueryTransport for FetchTransport {
    async fn send(&self, request: QueryRequest) -> Result<QueryResponse, TransportError> {
        let resp = Request::post(&self.url)
            .json(&request)
            .map_err(|e| TransportError::Network(e.to_string()))?
            .send()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;

        if !resp.ok() {
            return Err(TransportError::Status(resp.status()));
        }

        let body = resp
            .text()
            .await
            .map_err(|e| TransportError::Network(e.to_string()))?;
        Ok(decode_response(&body)?)
    }
}
