use alloy::{
    rpc::json_rpc::{RequestPacket, ResponsePacket},
    transports::{
        BoxTransport, TransportError, TransportErrorKind, TransportFut, TransportResult,
        http::reqwest::{
            self,
            header::{HeaderMap, HeaderValue},
        },
    },
};
use std::task;
use tower::Service;
use tracing::{Instrument, debug, debug_span, trace};

use crate::error::ConnectError;

/// Credentials attached to every request sent to an RPC endpoint
#[derive(Clone, Debug, Default)]
pub struct RpcCredentials {
    pub client_id: Option<String>,
    pub secret_key: Option<String>,
}

impl RpcCredentials {
    pub fn to_header_map(&self) -> Result<HeaderMap, ConnectError> {
        let mut headers = HeaderMap::new();
        if let Some(client_id) = &self.client_id {
            headers.insert("x-client-id", HeaderValue::from_str(client_id)?);
        }
        if let Some(secret_key) = &self.secret_key {
            headers.insert("x-secret-key", HeaderValue::from_str(secret_key)?);
        }
        Ok(headers)
    }
}

/// JSON-RPC over HTTP on a shared reqwest client, with headers injected per request
#[derive(Clone, Debug)]
pub struct HeaderInjectingTransport {
    /// Shared client, connection pooling happens here
    client: reqwest::Client,
    url: reqwest::Url,
    custom_headers: HeaderMap,
}

impl HeaderInjectingTransport {
    pub fn new(client: reqwest::Client, url: reqwest::Url, headers: HeaderMap) -> Self {
        Self {
            client,
            url,
            custom_headers: headers,
        }
    }

    pub fn url(&self) -> &reqwest::Url {
        &self.url
    }

    pub fn into_box(self) -> BoxTransport {
        BoxTransport::new(self)
    }

    async fn do_request(self, req: RequestPacket) -> TransportResult<ResponsePacket> {
        let mut request_builder = self.client.post(self.url).json(&req);

        for (name, value) in &self.custom_headers {
            request_builder = request_builder.header(name, value);
        }

        let resp = request_builder
            .send()
            .await
            .map_err(TransportErrorKind::custom)?;

        let status = resp.status();
        debug!(?status, "received response from server");

        let body = resp.bytes().await.map_err(TransportErrorKind::custom)?;
        debug!(bytes = body.len(), "retrieved response body");
        trace!(body = ?String::from_utf8_lossy(&body), "response body");

        if !status.is_success() {
            return Err(TransportErrorKind::http_error(
                status.as_u16(),
                String::from_utf8_lossy(&body).into_owned(),
            ));
        }

        serde_json::from_slice(&body)
            .map_err(|err| TransportError::deser_err(err, String::from_utf8_lossy(&body)))
    }
}

impl Service<RequestPacket> for HeaderInjectingTransport {
    type Response = ResponsePacket;
    type Error = TransportError;
    type Future = TransportFut<'static>;

    #[inline]
    fn poll_ready(&mut self, _cx: &mut task::Context<'_>) -> task::Poll<Result<(), Self::Error>> {
        // reqwest is always ready
        task::Poll::Ready(Ok(()))
    }

    #[inline]
    fn call(&mut self, req: RequestPacket) -> Self::Future {
        let this = self.clone();
        let span = debug_span!("HeaderInjectingTransport", url = %this.url);
        Box::pin(this.do_request(req).instrument(span))
    }
}

/// Creates transports that all share one connection pool
#[derive(Clone, Debug)]
pub struct SharedClientTransportBuilder {
    shared_client: reqwest::Client,
}

impl SharedClientTransportBuilder {
    pub fn new(client: reqwest::Client) -> Self {
        Self {
            shared_client: client,
        }
    }

    /// Builds a fresh reqwest client to share
    pub fn with_new_client() -> Result<Self, ConnectError> {
        let client = reqwest::ClientBuilder::new()
            .build()
            .map_err(|e| ConnectError::RpcConfig {
                message: format!("Failed to build HTTP client: {e}"),
            })?;
        Ok(Self::new(client))
    }

    pub fn with_headers(&self, url: reqwest::Url, headers: HeaderMap) -> HeaderInjectingTransport {
        HeaderInjectingTransport::new(self.shared_client.clone(), url, headers)
    }

    pub fn with_credentials(
        &self,
        url: &str,
        credentials: &RpcCredentials,
    ) -> Result<HeaderInjectingTransport, ConnectError> {
        let url = reqwest::Url::parse(url).map_err(|e| ConnectError::RpcConfig {
            message: format!("Failed to parse RPC URL {url}: {e}"),
        })?;
        Ok(self.with_headers(url, credentials.to_header_map()?))
    }

    pub fn default_transport(&self, url: reqwest::Url) -> HeaderInjectingTransport {
        HeaderInjectingTransport::new(self.shared_client.clone(), url, HeaderMap::new())
    }
}
