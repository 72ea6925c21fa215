//! Bulk payment endpoints
//!
//! A bulk is registered by uploading a file of payment rows; the API
//! processes it on the planned date and reports per-row results.

use crate::error::ApiResult;
use crate::multipart::MultipartFile;
use crate::query::{Pagination, QueryMap, QuerySpec};
use crate::request::{ApiRequest, RequestBody};
use crate::types::{DeleteResponse, ListResponse, ListWithErrors, PayType};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Multipart field carrying the upload
const FILE_FIELD: &str = "file";

facade! {
    /// Bulk payment API interface
    PaymentBulksApi
}

impl PaymentBulksApi {
    /// Register a bulk payment from a file
    ///
    /// POST /v1/payments/bulk?pay_type=...&process_plan_at=...
    pub async fn create(&self, params: &CreatePaymentBulkParams<'_>) -> ApiResult<PaymentBulk> {
        let query = QueryMap::new()
            .with("pay_type", params.pay_type)
            .with("process_plan_at", params.process_plan_at.as_str());
        let body = MultipartFile::new(
            FILE_FIELD,
            params.file_name.as_str(),
            params.content_type.as_str(),
            params.contents,
        );
        self.send(
            ApiRequest::post("/v1/payments/bulk")
                .query(query)
                .body(RequestBody::Multipart(body)),
        )
        .await
    }

    /// List registered bulks
    ///
    /// GET /v1/payments/bulk
    pub async fn list(
        &self,
        search: &PaymentBulkSearch,
        pagination: &Pagination,
    ) -> ApiResult<ListResponse<PaymentBulk>> {
        let query = QuerySpec::new()
            .with_search_params(search)?
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/payments/bulk").query(query))
            .await
    }

    /// List the rows of one bulk with their per-row errors
    ///
    /// GET /v1/payments/bulk/{id}
    pub async fn list_details(
        &self,
        bulk_id: &str,
        pay_type: PayType,
        pagination: &Pagination,
    ) -> ApiResult<ListWithErrors<PaymentBulkDetail>> {
        let query = QuerySpec::new()
            .with_search(QueryMap::new().with("pay_type", pay_type))
            .with_pagination(pagination.clone());
        self.send(ApiRequest::get("/v1/payments/bulk").segment(bulk_id).query(query))
            .await
    }

    /// Delete a bulk that has not been processed yet
    ///
    /// DELETE /v1/payments/bulk/{id}
    pub async fn delete(&self, bulk_id: &str, pay_type: PayType) -> ApiResult<DeleteResponse> {
        let query = QueryMap::new().with("pay_type", pay_type);
        self.send(ApiRequest::delete("/v1/payments/bulk").segment(bulk_id).query(query))
            .await
    }
}

/// Upload for bulk payment registration
#[derive(Debug, Clone)]
pub struct CreatePaymentBulkParams<'a> {
    /// Payment method family
    pub pay_type: PayType,
    /// Planned processing date, `yyyy/MM/dd`
    pub process_plan_at: String,
    /// File name sent in the form part
    pub file_name: String,
    /// MIME type of the upload
    pub content_type: String,
    /// Raw file bytes
    pub contents: &'a [u8],
}

impl<'a> CreatePaymentBulkParams<'a> {
    /// JSON upload of payment rows
    pub fn json(
        pay_type: PayType,
        process_plan_at: impl Into<String>,
        file_name: impl Into<String>,
        contents: &'a [u8],
    ) -> Self {
        Self {
            pay_type,
            process_plan_at: process_plan_at.into(),
            file_name: file_name.into(),
            content_type: "application/json".to_string(),
            contents,
        }
    }
}

/// Bulk payment registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBulk {
    /// Bulk id
    pub id: String,
    /// Payment method family
    pub pay_type: Option<PayType>,
    /// e.g. `UNPROCESSED`, `PROCESSING`, `COMPLETED`
    pub status: Option<String>,
    /// Scheduled processing date, `yyyy/MM/dd`
    pub process_plan_at: Option<String>,
    /// File name sent in the form part
    pub file_name: Option<String>,
    /// Total matching records
    pub total_count: Option<u64>,
    /// Rows that succeeded
    pub success_count: Option<u64>,
    /// Rows that failed
    pub error_count: Option<u64>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// One row of a bulk
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentBulkDetail {
    /// Row id
    pub id: Option<String>,
    /// Owning bulk id
    pub bulk_payment_id: Option<String>,
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

/// Search filters for listing bulks
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PaymentBulkSearch {
    /// Payment method family
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pay_type: Option<PayType>,
    /// Status
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Lower bound of the scheduled date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_plan_at_from: Option<String>,
    /// Upper bound of the scheduled date
    #[serde(skip_serializing_if = "Option::is_none")]
    pub process_plan_at_to: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_deserialize() {
        let json = r#"{
            "id": "pb_1",
            "pay_type": "Card",
            "status": "UNPROCESSED",
            "process_plan_at": "2024/02/01",
            "total_count": 3
        }"#;
        let bulk: PaymentBulk = serde_json::from_str(json).unwrap();
        assert_eq!(bulk.id, "pb_1");
        assert_eq!(bulk.total_count, Some(3));
    }

    #[test]
    fn test_empty_search_serializes_to_nothing() {
        let query = QuerySpec::new()
            .with_search_params(&PaymentBulkSearch::default())
            .unwrap();
        assert_eq!(query.to_query_string().unwrap(), "");
    }
}
