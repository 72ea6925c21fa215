//! Card endpoints, nested under a customer

use crate::error::ApiResult;
use crate::request::ApiRequest;
use crate::types::{DeleteResponse, ListResponse};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Card API interface
    CardsApi
}

impl CardsApi {
    /// Register a card from a card token
    ///
    /// POST /v1/customers/{customer_id}/cards
    pub async fn create(&self, customer_id: &str, params: &CreateCardParams) -> ApiResult<Card> {
        self.send(cards(Method::POST, customer_id).json(params)?)
            .await
    }

    /// List a customer's cards
    ///
    /// GET /v1/customers/{customer_id}/cards
    pub async fn list(&self, customer_id: &str) -> ApiResult<ListResponse<Card>> {
        self.send(cards(Method::GET, customer_id)).await
    }

    /// Retrieve one card
    pub async fn retrieve(&self, customer_id: &str, card_id: &str) -> ApiResult<Card> {
        self.send(cards(Method::GET, customer_id).segment(card_id))
            .await
    }

    /// Update a card (default flag, holder name, expiry)
    pub async fn update(
        &self,
        customer_id: &str,
        card_id: &str,
        params: &UpdateCardParams,
    ) -> ApiResult<Card> {
        self.send(cards(Method::PUT, customer_id).segment(card_id).json(params)?)
            .await
    }

    /// Delete a card
    pub async fn delete(&self, customer_id: &str, card_id: &str) -> ApiResult<DeleteResponse> {
        self.send(cards(Method::DELETE, customer_id).segment(card_id))
            .await
    }
}

fn cards(method: Method, customer_id: &str) -> ApiRequest {
    ApiRequest::new(method, "/v1/customers")
        .segment(customer_id)
        .segment("cards")
}

/// Card entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Card {
    /// Card id
    pub id: String,
    /// Customer id
    pub customer_id: Option<String>,
    /// `"1"` for the customer's default card
    pub default_flag: Option<String>,
    /// Masked card number
    pub card_no: Option<String>,
    /// Expiry, `yymm`
    pub expire: Option<String>,
    /// Card holder name
    pub holder_name: Option<String>,
    /// Card brand, e.g. `VISA`
    pub brand: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for card registration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateCardParams {
    /// Token issued by the fincode JS tokenizer
    pub token: String,
    /// `"1"` to make this the default card
    pub default_flag: String,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl CreateCardParams {
    /// Register `token`, optionally as the default card
    pub fn new(token: impl Into<String>, default: bool) -> Self {
        Self {
            token: token.into(),
            default_flag: if default { "1" } else { "0" }.to_string(),
            extra: Map::new(),
        }
    }
}

/// Body for card update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateCardParams {
    /// `1` when this is the default card
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_flag: Option<String>,
    /// Card holder name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub holder_name: Option<String>,
    /// Expiry, `yymm`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expire: Option<String>,
    /// Card token from the JS SDK
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_card_request_nests_under_customer() {
        let request = cards(Method::DELETE, "c_1").segment("cs_9");
        assert_eq!(request.path(), "/v1/customers");
        assert_eq!(request.segments(), ["c_1", "cards", "cs_9"]);
    }

    #[test]
    fn test_create_params_default_flag() {
        let json = serde_json::to_value(CreateCardParams::new("tok", true)).unwrap();
        assert_eq!(json, serde_json::json!({ "token": "tok", "default_flag": "1" }));
    }
}
