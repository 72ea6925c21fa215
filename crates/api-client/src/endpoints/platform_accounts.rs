//! Platform account endpoints (payout statements of a platform shop)

use crate::error::ApiResult;
use crate::query::{Pagination, QuerySpec};
use crate::request::ApiRequest;
use crate::types::ListResponse;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Platform account API interface
    PlatformAccountsApi
}

impl PlatformAccountsApi {
    /// List platform accounts
    ///
    /// GET /v1/platform_accounts
    pub async fn list(
        &self,
        search: &PlatformAccountSearch,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<PlatformAccount>> {
        let query = QuerySpec::new()
            .with_search_params(search)?
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/platform_accounts").query(query))
            .await
    }

    /// Retrieve a platform account
    pub async fn retrieve(&self, account_id: &str) -> ApiResult<PlatformAccount> {
        self.send(ApiRequest::get("/v1/platform_accounts").segment(account_id))
            .await
    }

    /// Retrieve the per-tenant summary of a platform account
    ///
    /// GET /v1/platform_accounts/{id}/summary
    pub async fn retrieve_summary(&self, account_id: &str) -> ApiResult<ListResponse<PlatformAccountSummary>> {
        self.send(ApiRequest::get("/v1/platform_accounts").segment(account_id).segment("summary"))
            .await
    }

    /// Cancel a scheduled payout
    ///
    /// PUT /v1/platform_accounts/{id}/cancel_payout
    pub async fn cancel_payout(&self, account_id: &str) -> ApiResult<PlatformAccount> {
        self.send(ApiRequest::put("/v1/platform_accounts").segment(account_id).segment("cancel_payout"))
            .await
    }
}

/// Platform account (one payout period)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAccount {
    /// Platform account id
    pub id: String,
    /// Shop id
    pub shop_id: Option<String>,
    /// First day of the aggregation period
    pub aggregate_term_start: Option<String>,
    /// Last day of the aggregation period
    pub aggregate_term_end: Option<String>,
    /// Payout date
    pub payment_date: Option<String>,
    /// Total amount
    pub total_amount: Option<i64>,
    /// Amount transferred
    pub total_transfer_amount: Option<i64>,
    /// e.g. `PAID`, `UNPAID`
    pub status: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Per-tenant line of a platform account summary
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformAccountSummary {
    /// Tenant shop id
    pub tenant_shop_id: Option<String>,
    /// Total amount
    pub total_amount: Option<i64>,
    /// Platform fee
    pub platform_fee: Option<i64>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Search filters for listing platform accounts
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlatformAccountSearch {
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Lower bound of the payout date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date_from: Option<String>,
    /// Upper bound of the payout date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_date_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_account_deserialize() {
        let json = r#"{"id": "pa_1", "status": "UNPAID", "total_amount": 12000}"#;
        let account: PlatformAccount = serde_json::from_str(json).unwrap();
        assert_eq!(account.total_amount, Some(12000));
    }
}
