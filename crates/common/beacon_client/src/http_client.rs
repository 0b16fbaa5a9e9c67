use std::time::Duration;

use anyhow::anyhow;
use async_trait::async_trait;
use hyperdrive_api_types_beacon::error::{BeaconError, TransportError};
use reqwest::{
    Client, RequestBuilder, StatusCode, Url,
    header::{ACCEPT, CONTENT_TYPE, HeaderValue},
};
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub const JSON_ACCEPT_PRIORITY: &str = "application/json;q=1";
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Raw outcome of a request that reached the server. The status is never interpreted here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: StatusCode,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// Issues single requests against one beacon node.
///
/// Implementations must return [BeaconError::Transport] for every failure that happens before
/// a status line is received, including cancellation through `cancel`.
#[async_trait]
pub trait HttpTransport: Send + Sync {
    fn base_url(&self) -> &Url;

    async fn get(&self, path: &str, cancel: &CancellationToken)
    -> Result<HttpResponse, BeaconError>;

    /// `body` is already serialized JSON.
    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError>;
}

#[derive(Debug, Clone)]
pub struct ClientWithBaseUrl {
    client: Client,
    base_url: Url,
}

impl ClientWithBaseUrl {
    pub fn new(url: Url, request_timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| anyhow!("Failed to build HTTP client {err:?}"))?;

        Ok(Self {
            client,
            base_url: url,
        })
    }

    fn url(&self, path: &str) -> Result<Url, BeaconError> {
        self.base_url
            .join(path)
            .map_err(|err| BeaconError::InvalidInput(format!("Invalid request path {path}: {err}")))
    }

    async fn execute(
        &self,
        request: RequestBuilder,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        let request = request.header(ACCEPT, HeaderValue::from_static(JSON_ACCEPT_PRIORITY));
        let exchange = async {
            let response = request.send().await?;
            let status = response.status();
            let body = response.bytes().await?;
            Ok::<_, reqwest::Error>(HttpResponse::new(status, body.to_vec()))
        };

        tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(TransportError::cancelled().into()),
            result = exchange => result.map_err(BeaconError::from),
        }
    }
}

#[async_trait]
impl HttpTransport for ClientWithBaseUrl {
    fn base_url(&self) -> &Url {
        &self.base_url
    }

    async fn get(
        &self,
        path: &str,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        let url = self.url(path)?;
        debug!("GET {url}");
        self.execute(self.client.get(url), cancel).await
    }

    async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        cancel: &CancellationToken,
    ) -> Result<HttpResponse, BeaconError> {
        let url = self.url(path)?;
        debug!("POST {url}");
        let request = self
            .client
            .post(url)
            .header(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE))
            .body(body);
        self.execute(request, cancel).await
    }
}
