//! Main API client implementation

use crate::config::ClientConfig;
use crate::endpoints::{
    CardsApi, CustomersApi, PaymentBulksApi, PaymentsApi, PlansApi, PlatformAccountsApi,
    SubscriptionsApi, TenantsApi, WebhooksApi,
};
use crate::error::{ApiResult, SdkError};
use crate::request::{ApiRequest, PreparedRequest};
use crate::response::{classify_exchange, Outcome};
use crate::transport::{ReqwestTransport, Transport};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, instrument, warn, Span};
use uuid::Uuid;

/// fincode API client
///
/// Cheap to clone; clones share the configuration and the connection pool.
/// Every call performs exactly one exchange: there is no retry, rate limiting
/// or caching.
#[derive(Clone, Debug)]
pub struct FincodeClient {
    transport: Arc<dyn Transport>,
    http: Client,
    config: Arc<ClientConfig>,
}

impl FincodeClient {
    /// Create a new client with configuration from environment
    pub fn new() -> ApiResult<Self> {
        let config = ClientConfig::from_env()?;
        Self::with_config(config)
    }

    /// Create a new client with specific configuration
    pub fn with_config(config: ClientConfig) -> ApiResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::from_config(&config)?;
        Ok(Self {
            http: transport.client().clone(),
            transport: Arc::new(transport),
            config: Arc::new(config),
        })
    }

    /// Create a client that sends through a custom transport
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn Transport>) -> ApiResult<Self> {
        config.validate()?;
        let http = Client::builder()
            .build()
            .map_err(|e| SdkError::config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            transport,
            http,
            config: Arc::new(config),
        })
    }

    /// Get the current configuration
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Get the base URL
    #[must_use]
    pub fn base_url(&self) -> &'static str {
        self.config.base_url()
    }

    // -------------------------------------------------------------------------
    // Resource accessors
    // -------------------------------------------------------------------------

    /// Access customer endpoints
    #[must_use]
    pub fn customers(&self) -> CustomersApi {
        CustomersApi::new(self.clone())
    }

    /// Access card endpoints
    #[must_use]
    pub fn cards(&self) -> CardsApi {
        CardsApi::new(self.clone())
    }

    /// Access payment endpoints
    #[must_use]
    pub fn payments(&self) -> PaymentsApi {
        PaymentsApi::new(self.clone())
    }

    /// Access bulk payment endpoints
    #[must_use]
    pub fn payment_bulks(&self) -> PaymentBulksApi {
        PaymentBulksApi::new(self.clone())
    }

    /// Access plan endpoints
    #[must_use]
    pub fn plans(&self) -> PlansApi {
        PlansApi::new(self.clone())
    }

    /// Access subscription endpoints
    #[must_use]
    pub fn subscriptions(&self) -> SubscriptionsApi {
        SubscriptionsApi::new(self.clone())
    }

    /// Access tenant endpoints
    #[must_use]
    pub fn tenants(&self) -> TenantsApi {
        TenantsApi::new(self.clone())
    }

    /// Access webhook setting endpoints
    #[must_use]
    pub fn webhooks(&self) -> WebhooksApi {
        WebhooksApi::new(self.clone())
    }

    /// Access platform account endpoints
    #[must_use]
    pub fn platform_accounts(&self) -> PlatformAccountsApi {
        PlatformAccountsApi::new(self.clone())
    }

    // -------------------------------------------------------------------------
    // Generic call pipeline
    // -------------------------------------------------------------------------

    /// Build a request without sending it
    pub fn prepare(&self, request: ApiRequest) -> Result<PreparedRequest, SdkError> {
        request.build(&self.config, &self.http, Arc::clone(&self.transport))
    }

    /// Build, send and classify a request, leaving the success body untyped
    #[instrument(
        skip(self, request),
        fields(request_id, method = %request.method(), path = %request.path())
    )]
    pub async fn execute_raw(&self, request: ApiRequest) -> Outcome {
        let request_id = Uuid::new_v4().to_string();
        Span::current().record("request_id", request_id.as_str());

        let prepared = match self.prepare(request) {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(error = %e, "Failed to build request");
                return Outcome::Sdk(e);
            }
        };

        let start = Instant::now();
        let outcome = classify_exchange(prepared.send().await);
        let elapsed = start.elapsed();

        match &outcome {
            Outcome::Success(_) => {
                debug!(elapsed_ms = elapsed.as_millis(), "Request succeeded");
            }
            Outcome::Api(e) => {
                debug!(
                    status = e.status,
                    error_codes = ?e.error_codes().collect::<Vec<_>>(),
                    elapsed_ms = elapsed.as_millis(),
                    "API rejected request"
                );
            }
            Outcome::Sdk(e) => {
                warn!(error = %e, elapsed_ms = elapsed.as_millis(), "Request failed");
            }
        }

        outcome
    }

    /// Build, send and classify a request, decoding the success body as `T`
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> ApiResult<T> {
        self.execute_raw(request).await.decode()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Environment;

    #[test]
    fn test_client_creation() {
        let client = FincodeClient::with_config(ClientConfig::test("m_test_key"));
        assert!(client.is_ok());
    }

    #[test]
    fn test_client_rejects_invalid_config() {
        let err = FincodeClient::with_config(ClientConfig::test("")).unwrap_err();
        assert!(err.is_sdk());
    }

    #[test]
    fn test_prepare_uses_environment_base_url() {
        let client = FincodeClient::with_config(ClientConfig::live("m_live_key")).unwrap();
        assert_eq!(client.config().environment, Environment::Live);

        let prepared = client.prepare(ApiRequest::get("/v1/plans")).unwrap();
        assert_eq!(prepared.url().as_str(), "https://api.fincode.jp/v1/plans");
    }

    #[test]
    fn test_build_failure_never_reaches_network() {
        let client = FincodeClient::with_config(ClientConfig::test("m_test_key")).unwrap();
        let request = ApiRequest::new(reqwest::Method::PATCH, "/v1/plans/pl_1");

        let outcome = tokio_test::block_on(client.execute_raw(request));
        assert!(matches!(outcome, Outcome::Sdk(SdkError::Config(_))));
    }
}
