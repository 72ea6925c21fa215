//! Typed async client for the fincode payment REST API
//!
//! Every call ends in exactly one of three outcomes: a decoded success body,
//! an [`ApiError`] carrying the server's error list, or an [`SdkError`] when
//! the request never produced a usable response.
//!
//! # Features
//!
//! - **Environment selection**: test and live origins derived from [`Environment`]
//! - **Query encoding**: search, pagination and sort directives flattened into one query string
//! - **Per-call headers**: idempotency keys and tenant shop ids on any facade
//! - **Multipart uploads**: bulk payment files sent as `multipart/form-data`
//! - **Request correlation**: each call is traced under a unique request id
//!
//! # Example
//!
//! ```rust,no_run
//! use fincode_api_client::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Reads FINCODE_SECRET_KEY and FINCODE_ENV
//!     let client = FincodeClient::new()?;
//!
//!     let customers = client
//!         .customers()
//!         .list(&Default::default(), &Pagination::new().with_limit(10))
//!         .await?;
//!     println!("{} customers", customers.total_count.unwrap_or_default());
//!
//!     match client.payments().retrieve("o_missing", PayType::Card).await {
//!         Ok(payment) => println!("status: {:?}", payment.status),
//!         Err(FincodeError::Api(err)) => println!("rejected: {:?}", err.error_codes().collect::<Vec<_>>()),
//!         Err(FincodeError::Sdk(err)) => println!("transport problem: {err}"),
//!     }
//!
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod endpoints;
pub mod error;
pub mod multipart;
pub mod query;
pub mod request;
pub mod response;
pub mod transport;
pub mod types;

pub use client::FincodeClient;
pub use config::{ClientConfig, Environment, ProxyConfig};
pub use error::{ApiError, ApiResult, ErrorDetail, FincodeError, SdkError};
pub use query::{Pagination, QueryMap, QuerySpec, QueryValue, SortDirective, SortOrder};
pub use request::{ApiRequest, RequestBody, RequestOptions};
pub use response::Outcome;
pub use transport::{RawResponse, ReqwestTransport, Transport};

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::client::FincodeClient;
    pub use crate::config::{ClientConfig, Environment};
    pub use crate::endpoints::{
        CardsApi, CustomersApi, PaymentBulksApi, PaymentsApi, PlansApi, PlatformAccountsApi,
        SubscriptionsApi, TenantsApi, WebhooksApi,
    };
    pub use crate::error::{ApiError, ApiResult, FincodeError, SdkError};
    pub use crate::query::{Pagination, SortDirective, SortOrder};
    pub use crate::types::{ListResponse, PayType};
}
