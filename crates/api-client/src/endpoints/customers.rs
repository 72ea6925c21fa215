//! Customer endpoints
//!
//! - `POST   /v1/customers`
//! - `GET    /v1/customers`
//! - `GET    /v1/customers/{id}`
//! - `PUT    /v1/customers/{id}`
//! - `DELETE /v1/customers/{id}`

use crate::error::ApiResult;
use crate::query::{Pagination, QuerySpec};
use crate::request::ApiRequest;
use crate::types::{DeleteResponse, ListResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Customer API interface
    CustomersApi
}

impl CustomersApi {
    /// Register a customer
    pub async fn create(&self, params: &CustomerParams) -> ApiResult<Customer> {
        self.send(ApiRequest::post("/v1/customers").json(params)?).await
    }

    /// List customers
    pub async fn list(
        &self,
        search: &CustomerSearch,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<Customer>> {
        let query = QuerySpec::new()
            .with_search_params(search)?
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/customers").query(query)).await
    }

    /// Retrieve a customer
    pub async fn retrieve(&self, customer_id: &str) -> ApiResult<Customer> {
        self.send(ApiRequest::get("/v1/customers").segment(customer_id))
            .await
    }

    /// Update a customer
    pub async fn update(&self, customer_id: &str, params: &CustomerParams) -> ApiResult<Customer> {
        self.send(ApiRequest::put("/v1/customers").segment(customer_id).json(params)?)
            .await
    }

    /// Delete a customer
    pub async fn delete(&self, customer_id: &str) -> ApiResult<DeleteResponse> {
        self.send(ApiRequest::delete("/v1/customers").segment(customer_id))
            .await
    }
}

/// Customer entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Customer id
    pub id: String,
    /// Customer name
    pub name: Option<String>,
    /// Email address
    pub email: Option<String>,
    /// Phone country code
    pub phone_cc: Option<String>,
    /// Phone number
    pub phone_no: Option<String>,
    /// `"1"` when a card is registered
    pub card_registration: Option<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Fields this crate does not model
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for customer registration and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerParams {
    /// Merchant-assigned id; generated by the API when absent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_cc: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    /// Billing address country code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_country: Option<String>,
    /// Billing address state code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_state: Option<String>,
    /// Billing address city
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_city: Option<String>,
    /// Billing address line 1
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_line_1: Option<String>,
    /// Billing address postal code
    #[serde(skip_serializing_if = "Option::is_none")]
    pub addr_post_code: Option<String>,
    /// Additional fields passed through as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CustomerParams {
    /// Create empty params
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the customer id
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Set the name
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Set the email
    #[must_use]
    pub fn with_email(mut self, email: impl Into<String>) -> Self {
        self.email = Some(email.into());
        self
    }
}

/// Search filters for listing customers
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CustomerSearch {
    /// Customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    /// Customer name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Email address
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    /// Phone number
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone_no: Option<String>,
    /// Lower bound of the creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_from: Option<String>,
    /// Upper bound of the creation date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_skip_unset_fields() {
        let params = CustomerParams::new().with_name("Taro Yamada").with_email("taro@example.com");
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "name": "Taro Yamada", "email": "taro@example.com" })
        );
    }

    #[test]
    fn test_customer_deserialize_keeps_unknown_fields() {
        let json = r#"{
            "id": "c_abc",
            "name": "Taro",
            "email": null,
            "card_registration": "1",
            "directdebit_registration": "0",
            "created": "2024/01/01 00:00:00.000"
        }"#;

        let customer: Customer = serde_json::from_str(json).unwrap();
        assert_eq!(customer.id, "c_abc");
        assert_eq!(customer.card_registration.as_deref(), Some("1"));
        assert_eq!(customer.extra["directdebit_registration"], "0");
    }
}
