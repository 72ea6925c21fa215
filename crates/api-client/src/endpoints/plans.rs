//! Subscription plan endpoints

use crate::error::ApiResult;
use crate::query::{Pagination, QuerySpec};
use crate::request::ApiRequest;
use crate::types::{DeleteResponse, ListResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Plan API interface
    PlansApi
}

impl PlansApi {
    /// Create a plan
    ///
    /// POST /v1/plans
    pub async fn create(&self, params: &PlanParams) -> ApiResult<Plan> {
        self.send(ApiRequest::post("/v1/plans").json(params)?).await
    }

    /// List plans
    ///
    /// GET /v1/plans
    pub async fn list(&self, pagination: &Pagination) -> ApiResult<ListResponse<Plan>> {
        self.send(ApiRequest::get("/v1/plans").query(QuerySpec::from(pagination.clone())))
            .await
    }

    /// Retrieve a plan
    pub async fn retrieve(&self, plan_id: &str) -> ApiResult<Plan> {
        self.send(ApiRequest::get("/v1/plans").segment(plan_id)).await
    }

    /// Update a plan
    pub async fn update(&self, plan_id: &str, params: &PlanParams) -> ApiResult<Plan> {
        self.send(ApiRequest::put("/v1/plans").segment(plan_id).json(params)?)
            .await
    }

    /// Delete a plan
    pub async fn delete(&self, plan_id: &str) -> ApiResult<DeleteResponse> {
        self.send(ApiRequest::delete("/v1/plans").segment(plan_id))
            .await
    }
}

/// Plan entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Plan id
    pub id: String,
    /// Plan name
    pub plan_name: Option<String>,
    /// Free text description
    pub description: Option<String>,
    /// Amount excluding tax
    pub amount: Option<String>,
    /// Tax amount
    pub tax: Option<String>,
    /// Total amount
    pub total_amount: Option<String>,
    /// `year`, `month` or `week`
    pub interval_pattern: Option<String>,
    /// Number of intervals between charges
    pub interval_count: Option<u32>,
    /// `1` while subscriptions use the plan
    pub used_flag: Option<String>,
    /// `1` once deleted
    pub delete_flag: Option<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for plan creation and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanParams {
    /// Plan name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plan_name: Option<String>,
    /// Free text description
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Amount excluding tax
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<String>,
    /// Tax amount
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax: Option<String>,
    /// Billing interval unit
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_pattern: Option<String>,
    /// Number of intervals between charges
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval_count: Option<u32>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}
