//! Resource-specific API facades
//!
//! Each facade only names the method, path, body and query of an operation and
//! hands it to [`FincodeClient::execute`](crate::client::FincodeClient::execute).
//!
//! | Module | Paths |
//! |--------|-------|
//! | `customers` | `/v1/customers` |
//! | `cards` | `/v1/customers/{customer_id}/cards` |
//! | `payments` | `/v1/payments`, `/v1/secure2` |
//! | `payment_bulks` | `/v1/payments/bulk` |
//! | `plans` | `/v1/plans` |
//! | `subscriptions` | `/v1/subscriptions` |
//! | `tenants` | `/v1/tenant_users`, `/v1/join_tenants`, `/v1/tenants`, `/v1/contracts` |
//! | `webhooks` | `/v1/webhook_settings` |
//! | `platform_accounts` | `/v1/platform_accounts` |

/// Declare a facade struct bound to a client plus per-call header options
macro_rules! facade {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug)]
        pub struct $name {
            client: $crate::client::FincodeClient,
            options: $crate::request::RequestOptions,
        }

        impl $name {
            pub(crate) fn new(client: $crate::client::FincodeClient) -> Self {
                Self {
                    client,
                    options: $crate::request::RequestOptions::default(),
                }
            }

            /// Act on behalf of a tenant shop (`tenant-shop-id` header)
            #[must_use]
            pub fn with_tenant_shop_id(mut self, shop_id: impl Into<String>) -> Self {
                self.options.tenant_shop_id = Some(shop_id.into());
                self
            }

            /// Send an idempotency key with every call made through this facade
            #[must_use]
            pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
                self.options.idempotency_key = Some(key.into());
                self
            }

            async fn send<T: serde::de::DeserializeOwned>(
                &self,
                request: $crate::request::ApiRequest,
            ) -> $crate::error::ApiResult<T> {
                self.client
                    .execute(request.options(self.options.clone()))
                    .await
            }
        }
    };
}

pub mod cards;
pub mod customers;
pub mod payment_bulks;
pub mod payments;
pub mod plans;
pub mod platform_accounts;
pub mod subscriptions;
pub mod tenants;
pub mod webhooks;

pub use cards::CardsApi;
pub use customers::CustomersApi;
pub use payment_bulks::PaymentBulksApi;
pub use payments::PaymentsApi;
pub use plans::PlansApi;
pub use platform_accounts::PlatformAccountsApi;
pub use subscriptions::SubscriptionsApi;
pub use tenants::TenantsApi;
pub use webhooks::WebhooksApi;
