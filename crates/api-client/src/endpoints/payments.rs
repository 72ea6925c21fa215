//! Payment endpoints
//!
//! A payment is registered first (`create`), then executed with card or
//! wallet details (`execute`). Most follow-up actions are `PUT`s on a
//! sub-path of the payment and require the `access_id` returned at
//! registration.

use crate::error::ApiResult;
use crate::query::{Pagination, QueryMap, QuerySpec};
use crate::request::ApiRequest;
use crate::types::{ListResponse, PayType};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Payment API interface
    PaymentsApi
}

impl PaymentsApi {
    /// Register a payment
    ///
    /// POST /v1/payments
    pub async fn create(&self, params: &CreatePaymentParams) -> ApiResult<Payment> {
        self.send(ApiRequest::post("/v1/payments").json(params)?).await
    }

    /// List payments of one pay type
    ///
    /// GET /v1/payments
    pub async fn list(
        &self,
        search: &PaymentSearch,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<Payment>> {
        let query = QuerySpec::new()
            .with_search_params(search)?
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/payments").query(query)).await
    }

    /// Retrieve a payment
    ///
    /// GET /v1/payments/{id}?pay_type=...
    pub async fn retrieve(&self, payment_id: &str, pay_type: PayType) -> ApiResult<Payment> {
        let query = QueryMap::new().with("pay_type", pay_type);
        self.send(payment(Method::GET, payment_id).query(query))
            .await
    }

    /// Execute a registered payment
    ///
    /// PUT /v1/payments/{id}
    pub async fn execute(&self, payment_id: &str, params: &ExecutePaymentParams) -> ApiResult<Payment> {
        self.send(payment(Method::PUT, payment_id).json(params)?)
            .await
    }

    /// Capture an authorized payment
    ///
    /// PUT /v1/payments/{id}/capture
    pub async fn capture(&self, payment_id: &str, params: &PaymentActionParams) -> ApiResult<Payment> {
        self.action(payment_id, "capture", params).await
    }

    /// Cancel a payment
    ///
    /// PUT /v1/payments/{id}/cancel
    pub async fn cancel(&self, payment_id: &str, params: &PaymentActionParams) -> ApiResult<Payment> {
        self.action(payment_id, "cancel", params).await
    }

    /// Re-authorize a cancelled or expired authorization
    ///
    /// PUT /v1/payments/{id}/auth
    pub async fn reauthorize(
        &self,
        payment_id: &str,
        params: &PaymentActionParams,
    ) -> ApiResult<Payment> {
        self.action(payment_id, "auth", params).await
    }

    /// Change the amount of a payment
    ///
    /// PUT /v1/payments/{id}/change
    pub async fn change_amount(
        &self,
        payment_id: &str,
        params: &ChangeAmountParams,
    ) -> ApiResult<Payment> {
        self.send(payment(Method::PUT, payment_id).segment("change").json(params)?)
            .await
    }

    /// Run 3-D Secure 2.0 authentication
    ///
    /// PUT /v1/secure2/{access_id}
    pub async fn execute_3ds_authentication(
        &self,
        access_id: &str,
        params: &ThreeDsAuthParams,
    ) -> ApiResult<ThreeDsResult> {
        self.send(ApiRequest::put("/v1/secure2").segment(access_id).json(params)?)
            .await
    }

    /// Retrieve the 3-D Secure 2.0 authentication result
    ///
    /// GET /v1/secure2/{access_id}
    pub async fn retrieve_3ds_result(&self, access_id: &str) -> ApiResult<ThreeDsResult> {
        self.send(ApiRequest::get("/v1/secure2").segment(access_id))
            .await
    }

    /// Complete a payment after 3-D Secure authentication
    ///
    /// PUT /v1/payments/{id}/secure
    pub async fn execute_after_3ds(
        &self,
        payment_id: &str,
        params: &PaymentActionParams,
    ) -> ApiResult<Payment> {
        self.action(payment_id, "secure", params).await
    }

    /// Generate a convenience store barcode
    ///
    /// PUT /v1/payments/{id}/barcode
    pub async fn generate_barcode(
        &self,
        payment_id: &str,
        params: &BarcodeParams,
    ) -> ApiResult<Payment> {
        self.send(payment(Method::PUT, payment_id).segment("barcode").json(params)?)
            .await
    }

    async fn action(
        &self,
        payment_id: &str,
        action: &str,
        params: &PaymentActionParams,
    ) -> ApiResult<Payment> {
        self.send(payment(Method::PUT, payment_id).segment(action).json(params)?)
            .await
    }
}

fn payment(method: Method, payment_id: &str) -> ApiRequest {
    ApiRequest::new(method, "/v1/payments").segment(payment_id)
}

/// Payment entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Payment {
    /// Order id
    pub id: String,
    /// Shop id
    pub shop_id: Option<String>,
    /// Payment method family
    pub pay_type: Option<PayType>,
    /// e.g. `UNPROCESSED`, `AUTHORIZED`, `CAPTURED`, `CANCELED`
    pub status: Option<String>,
    /// Access id issued with the order
    pub access_id: Option<String>,
    /// `AUTH` or `CAPTURE`
    pub job_code: Option<String>,
    /// Amount excluding tax
    pub amount: Option<i64>,
    /// Tax amount
    pub tax: Option<i64>,
    /// Total amount
    pub total_amount: Option<i64>,
    /// Customer id
    pub customer_id: Option<String>,
    /// Processing timestamp
    pub process_date: Option<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for payment registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatePaymentParams {
    /// Payment method family
    pub pay_type: PayType,
    /// `AUTH` or `CAPTURE`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub job_code: Option<String>,
    /// Amount as a decimal string, e.g. `"1000"`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Tax amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Merchant-assigned order id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// `0` (none) or `2` (3-D Secure 2.0)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tds_type: Option<String>,
    /// Free field 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_field_1: Option<String>,
    /// Free field 2
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_field_2: Option<String>,
    /// Free field 3
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_field_3: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreatePaymentParams {
    /// Register a payment of `pay_type`
    pub fn new(pay_type: PayType) -> Self {
        Self {
            pay_type,
            job_code: None,
            amount: None,
            tax: None,
            id: None,
            tds_type: None,
            client_field_1: None,
            client_field_2: None,
            client_field_3: None,
            extra: Map::new(),
        }
    }

    /// Set the job code
    #[must_use]
    pub fn with_job_code(mut self, job_code: impl Into<String>) -> Self {
        self.job_code = Some(job_code.into());
        self
    }

    /// Set the amount
    #[must_use]
    pub fn with_amount(mut self, amount: u64) -> Self {
        self.amount = Some(amount.to_string());
        self
    }

    /// Set the order id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }
}

/// Body for payment execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutePaymentParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Access id issued with the order
    pub access_id: String,
    /// Card token from the JS SDK
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Registered card id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    /// `1` lump sum, `2` installments
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Installment count
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_times: Option<String>,
    /// Return URL after the 3D Secure flow
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tds2_ret_url: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExecutePaymentParams {
    /// Execute with a card token
    pub fn with_token(pay_type: PayType, access_id: impl Into<String>, token: impl Into<String>) -> Self {
        Self {
            pay_type,
            access_id: access_id.into(),
            token: Some(token.into()),
            customer_id: None,
            card_id: None,
            method: None,
            pay_times: None,
            tds2_ret_url: None,
            extra: Map::new(),
        }
    }

    /// Execute with a registered card
    pub fn with_card(
        pay_type: PayType,
        access_id: impl Into<String>,
        customer_id: impl Into<String>,
        card_id: impl Into<String>,
    ) -> Self {
        Self {
            pay_type,
            access_id: access_id.into(),
            token: None,
            customer_id: Some(customer_id.into()),
            card_id: Some(card_id.into()),
            method: None,
            pay_times: None,
            tds2_ret_url: None,
            extra: Map::new(),
        }
    }
}

/// Body for capture, cancel, re-authorization and post-3DS execution
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentActionParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Access id issued with the order
    pub access_id: String,
    /// Payment method (lump sum or installments)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PaymentActionParams {
    /// Action on the payment identified by `access_id`
    pub fn new(pay_type: PayType, access_id: impl Into<String>) -> Self {
        Self {
            pay_type,
            access_id: access_id.into(),
            method: None,
            extra: Map::new(),
        }
    }
}

/// Body for changing a payment amount
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChangeAmountParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Access id issued with the order
    pub access_id: String,
    /// `AUTH` or `CAPTURE`
    pub job_code: String,
    /// Amount excluding tax
    pub amount: String,
    /// Tax amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for 3-D Secure 2.0 authentication
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeDsAuthParams {
    /// Value received at the `tds2_ret_url` callback
    pub param: String,
}

/// 3-D Secure 2.0 authentication state
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreeDsResult {
    /// e.g. `AUTHENTICATED`, `CHALLENGE`
    pub tds2_trans_result: Option<String>,
    /// Reason code of the 3D Secure result
    pub tds2_trans_result_reason: Option<String>,
    /// ACS challenge URL when a challenge is required
    pub challenge_url: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for convenience store barcode generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BarcodeParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Access id issued with the order
    pub access_id: String,
    /// Device name for 3D Secure
    #[serde(skip_serializing_if = "Option::is_none")]
    pub device_name: Option<String>,
    /// Browser window width
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_width: Option<String>,
    /// Browser window height
    #[serde(skip_serializing_if = "Option::is_none")]
    pub win_height: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search filters for listing payments; `pay_type` is required by the API
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentSearch {
    /// Payment method family
    pub pay_type: PayType,
    /// Customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Any of the listed statuses
    #[serde(skip_serializing_if = "Vec::is_empty", default)]
    pub status: Vec<String>,
    /// Lower bound of the total amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_min: Option<i64>,
    /// Upper bound of the total amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount_max: Option<i64>,
    /// Lower bound of the processing date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_date_from: Option<String>,
    /// Upper bound of the processing date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_date_to: Option<String>,
    /// Lower bound of the creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_from: Option<String>,
    /// Upper bound of the creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_to: Option<String>,
}

impl PaymentSearch {
    /// Search payments of `pay_type`
    pub fn new(pay_type: PayType) -> Self {
        Self {
            pay_type,
            customer_id: None,
            status: Vec::new(),
            total_amount_min: None,
            total_amount_max: None,
            process_date_from: None,
            process_date_to: None,
            created_from: None,
            created_to: None,
        }
    }

    /// Restrict to one customer
    #[must_use]
    pub fn with_customer(mut self, customer_id: impl Into<String>) -> Self {
        self.customer_id = Some(customer_id.into());
        self
    }

    /// Restrict to a status; may be called repeatedly
    #[must_use]
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status.push(status.into());
        self
    }
}
