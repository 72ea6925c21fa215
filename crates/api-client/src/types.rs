//! Response envelopes and enums shared across resources

use crate::error::ErrorDetail;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

/// Paginated list envelope
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    /// Items on this page
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    /// Total number of matching items
    pub total_count: Option<u64>,
    /// Last page number
    pub last_page: Option<u32>,
    /// Current page number
    pub current_page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// URL of the next page
    pub link_next: Option<String>,
    /// URL of the previous page
    pub link_previous: Option<String>,
}

/// List envelope for bulk operations that may partially fail
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListWithErrors<T> {
    /// Items that were processed
    #[serde(default = "Vec::new")]
    pub list: Vec<T>,
    /// Per-item failures, parallel to the request
    #[serde(default)]
    pub errors: Vec<ErrorDetail>,
    /// Total number of matching items
    pub total_count: Option<u64>,
    /// Last page number
    pub last_page: Option<u32>,
    /// Current page number
    pub current_page: Option<u32>,
    /// Page size
    pub limit: Option<u32>,
    /// URL of the next page
    pub link_next: Option<String>,
    /// URL of the previous page
    pub link_previous: Option<String>,
}

/// Response to a DELETE
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteResponse {
    /// Id of the deleted object
    pub id: String,
    /// Deletion marker as returned by the API
    pub delete_flag: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Payment method family
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PayType {
    /// Credit card
    Card,
    /// Apple Pay
    Applepay,
    /// Convenience store payment
    Konbini,
    /// PayPay
    Paypay,
    /// Direct debit (account transfer)
    Directdebit,
    /// Bank transfer to a virtual account
    Virtualaccount,
    /// A pay type this client does not know yet; only produced when decoding
    #[serde(other, skip_serializing)]
    Unknown,
}

impl PayType {
    /// Wire representation
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Card => "Card",
            Self::Applepay => "Applepay",
            Self::Konbini => "Konbini",
            Self::Paypay => "Paypay",
            Self::Directdebit => "Directdebit",
            Self::Virtualaccount => "Virtualaccount",
            Self::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for PayType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<PayType> for crate::query::QueryValue {
    fn from(pay_type: PayType) -> Self {
        Self::String(pay_type.as_str().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_response_deserialize() {
        let json = r#"{
            "total_count": 2,
            "last_page": 1,
            "current_page": 1,
            "limit": 10,
            "link_next": null,
            "link_previous": null,
            "list": [{"id": "a"}, {"id": "b"}]
        }"#;

        let response: ListResponse<Value> = serde_json::from_str(json).unwrap();
        assert_eq!(response.total_count, Some(2));
        assert_eq!(response.list.len(), 2);
        assert!(response.link_next.is_none());
    }

    #[test]
    fn test_count_only_list_has_no_items() {
        let response: ListResponse<Value> = serde_json::from_str(r#"{"total_count": 42}"#).unwrap();
        assert!(response.list.is_empty());
        assert_eq!(response.total_count, Some(42));
    }

    #[test]
    fn test_list_with_errors_deserialize() {
        let json = r#"{
            "list": [{"id": "o_1"}],
            "errors": [{"error_code": "E01", "error_message": "row 2 invalid"}]
        }"#;
        let response: ListWithErrors<Value> = serde_json::from_str(json).unwrap();
        assert_eq!(response.list.len(), 1);
        assert_eq!(response.errors[0].error_code, "E01");
    }

    #[test]
    fn test_pay_type_wire_format() {
        assert_eq!(serde_json::to_string(&PayType::Card).unwrap(), "\"Card\"");
        assert_eq!(PayType::Virtualaccount.to_string(), "Virtualaccount");
    }

    #[test]
    fn test_unknown_pay_type_decodes() {
        let pay_type: PayType = serde_json::from_str("\"Googlepay\"").unwrap();
        assert_eq!(pay_type, PayType::Unknown);
        assert_eq!(serde_json::from_str::<PayType>("\"Konbini\"").unwrap(), PayType::Konbini);
        assert!(serde_json::to_string(&PayType::Unknown).is_err());
    }
}
