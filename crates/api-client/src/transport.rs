//! Network transport
//!
//! [`Transport`] is the seam between request building and the network. The
//! default implementation wraps `reqwest`; tests substitute their own.

use crate::config::ClientConfig;
use crate::error::SdkError;
use reqwest::header::HeaderMap;
use reqwest::{Client, Proxy, Request, StatusCode};
use std::fmt;
use std::future::Future;
use std::pin::Pin;

/// User agent sent with every request
const USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));

/// Boxed future returned by [`Transport::execute`]
pub type TransportFuture<'a> = Pin<Box<dyn Future<Output = Result<RawResponse, SdkError>> + Send + 'a>>;

/// Performs one HTTP exchange
pub trait Transport: Send + Sync + fmt::Debug {
    /// Send `request` and read the full response body
    ///
    /// Implementations must report every transport fault as
    /// [`SdkError::FetchFailed`] and must not retry.
    fn execute(&self, request: Request) -> TransportFuture<'_>;
}

/// Raw outcome of one network exchange
#[derive(Debug, Clone)]
pub struct RawResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Response headers
    pub headers: HeaderMap,
    /// Response body
    pub body: Vec<u8>,
}

impl RawResponse {
    /// Response with no headers
    pub fn new(status: StatusCode, body: impl Into<Vec<u8>>) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: body.into(),
        }
    }
}

/// `reqwest`-backed transport
#[derive(Debug, Clone)]
pub struct ReqwestTransport {
    inner: Client,
}

impl ReqwestTransport {
    /// Wrap an existing `reqwest` client
    #[must_use]
    pub const fn with_client(inner: Client) -> Self {
        Self { inner }
    }

    /// Underlying `reqwest` client
    #[must_use]
    pub fn client(&self) -> &Client {
        &self.inner
    }

    /// Build a client applying the configured timeout and proxy
    ///
    /// Neither setting touches request URLs or headers.
    pub fn from_config(config: &ClientConfig) -> Result<Self, SdkError> {
        let mut builder = Client::builder().user_agent(USER_AGENT);

        if let Some(timeout) = config.timeout {
            builder = builder.timeout(timeout);
        }

        if let Some(ref proxy_config) = config.proxy {
            let mut proxy = Proxy::all(&proxy_config.url)
                .map_err(|e| SdkError::config(format!("invalid proxy url: {e}")))?;
            if let (Some(username), Some(password)) = (&proxy_config.username, &proxy_config.password) {
                proxy = proxy.basic_auth(username, password);
            }
            builder = builder.proxy(proxy);
        }

        let inner = builder
            .build()
            .map_err(|e| SdkError::config(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { inner })
    }
}

impl Transport for ReqwestTransport {
    fn execute(&self, request: Request) -> TransportFuture<'_> {
        Box::pin(async move {
            let response = self
                .inner
                .execute(request)
                .await
                .map_err(SdkError::FetchFailed)?;

            let status = response.status();
            let headers = response.headers().clone();
            let body = response.bytes().await.map_err(SdkError::FetchFailed)?;

            Ok(RawResponse {
                status,
                headers,
                body: body.to_vec(),
            })
        })
    }
}
