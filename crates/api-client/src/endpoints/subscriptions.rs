//! Subscription endpoints
//!
//! Most subscription operations require the `pay_type` of the subscription,
//! either in the body or as a query parameter.

use crate::error::ApiResult;
use crate::query::{Pagination, QueryMap, QuerySpec};
use crate::request::ApiRequest;
use crate::types::{ListResponse, PayType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Subscription API interface
    SubscriptionsApi
}

impl SubscriptionsApi {
    /// Start a subscription
    ///
    /// POST /v1/subscriptions
    pub async fn create(&self, params: &CreateSubscriptionParams) -> ApiResult<Subscription> {
        self.send(ApiRequest::post("/v1/subscriptions").json(params)?)
            .await
    }

    /// List subscriptions
    ///
    /// GET /v1/subscriptions
    pub async fn list(
        &self,
        search: &SubscriptionSearch,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<Subscription>> {
        let query = QuerySpec::new()
            .with_search_params(search)?
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/subscriptions").query(query))
            .await
    }

    /// Retrieve a subscription
    ///
    /// GET /v1/subscriptions/{id}?pay_type=...
    pub async fn retrieve(&self, subscription_id: &str, pay_type: PayType) -> ApiResult<Subscription> {
        let query = QueryMap::new().with("pay_type", pay_type);
        self.send(ApiRequest::get("/v1/subscriptions").segment(subscription_id).query(query))
            .await
    }

    /// Update a subscription
    ///
    /// PUT /v1/subscriptions/{id}
    pub async fn update(
        &self,
        subscription_id: &str,
        params: &UpdateSubscriptionParams,
    ) -> ApiResult<Subscription> {
        self.send(ApiRequest::put("/v1/subscriptions").segment(subscription_id).json(params)?)
            .await
    }

    /// Cancel a subscription
    ///
    /// DELETE /v1/subscriptions/{id}?pay_type=...
    pub async fn cancel(&self, subscription_id: &str, pay_type: PayType) -> ApiResult<Subscription> {
        let query = QueryMap::new().with("pay_type", pay_type);
        self.send(ApiRequest::delete("/v1/subscriptions").segment(subscription_id).query(query))
            .await
    }

    /// List billing results of a subscription
    ///
    /// GET /v1/subscriptions/{id}/result?pay_type=...
    pub async fn list_results(
        &self,
        subscription_id: &str,
        pay_type: PayType,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<SubscriptionResult>> {
        let query = QuerySpec::new()
            .with_search(QueryMap::new().with("pay_type", pay_type))
            .with_pagination(pagination.clone());
        let request = ApiRequest::get("/v1/subscriptions")
            .segment(subscription_id)
            .segment("result")
            .query(query);
        self.send(request).await
    }
}

/// Subscription entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Subscription {
    /// Subscription id
    pub id: String,
    /// Payment method family
    pub pay_type: Option<PayType>,
    /// Plan id
    pub plan_id: Option<String>,
    /// Customer id
    pub customer_id: Option<String>,
    /// Registered card id
    pub card_id: Option<String>,
    /// e.g. `ACTIVE`, `CANCELED`
    pub status: Option<String>,
    /// First billing date
    pub start_date: Option<String>,
    /// Next billing date
    pub next_charge_date: Option<String>,
    /// Last billing date
    pub stop_date: Option<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for subscription creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSubscriptionParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Plan id
    pub plan_id: String,
    /// Customer id
    pub customer_id: String,
    /// Registered card id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    /// Payment method id (direct debit)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method_id: Option<String>,
    /// First billing date, `yyyy/MM/dd`
    pub start_date: String,
    /// Last billing date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    /// `1` to bill on the last day of the month
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_month_flag: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for subscription update
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSubscriptionParams {
    /// Payment method family
    pub pay_type: PayType,
    /// Plan id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Registered card id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub card_id: Option<String>,
    /// Last billing date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_date: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One billing attempt of a subscription
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionResult {
    /// Billing result id
    pub id: Option<String>,
    /// Subscription id
    pub subscription_id: Option<String>,
    /// Processing timestamp
    pub process_date: Option<String>,
    /// Order id
    pub order_id: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Error code when the attempt failed
    pub error_code: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search filters for listing subscriptions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubscriptionSearch {
    /// Payment method family
    pub pay_type: PayType,
    /// Plan id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_id: Option<String>,
    /// Customer id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

impl SubscriptionSearch {
    /// Search subscriptions of `pay_type`
    pub fn new(pay_type: PayType) -> Self {
        Self {
            pay_type,
            plan_id: None,
            customer_id: None,
            status: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_params_serialize() {
        let params = CreateSubscriptionParams {
            pay_type: PayType::Card,
            plan_id: "pl_1".to_string(),
            customer_id: "c_1".to_string(),
            card_id: Some("cs_1".to_string()),
            payment_method_id: None,
            start_date: "2024/03/01".to_string(),
            stop_date: None,
            end_month_flag: None,
            extra: Map::new(),
        };
        let json = serde_json::to_value(&params).unwrap();
        assert_eq!(json["pay_type"], "Card");
        assert!(json.get("stop_date").is_none());
    }

    #[test]
    fn test_subscription_deserialize() {
        let json = r#"{"id": "su_1", "pay_type": "Card", "status": "ACTIVE", "remarks": "x"}"#;
        let subscription: Subscription = serde_json::from_str(json).unwrap();
        assert_eq!(subscription.status.as_deref(), Some("ACTIVE"));
        assert_eq!(subscription.extra["remarks"], "x");
    }
}
