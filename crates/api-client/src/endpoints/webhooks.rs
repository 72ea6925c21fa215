//! Webhook setting endpoints

use crate::error::ApiResult;
use crate::request::ApiRequest;
use crate::types::{DeleteResponse, ListResponse};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Webhook setting API interface
    WebhooksApi
}

impl WebhooksApi {
    /// Register a webhook
    ///
    /// POST /v1/webhook_settings
    pub async fn create(&self, params: &WebhookParams) -> ApiResult<WebhookSetting> {
        self.send(ApiRequest::post("/v1/webhook_settings").json(params)?)
            .await
    }

    /// List webhooks
    pub async fn list(&self) -> ApiResult<ListResponse<WebhookSetting>> {
        self.send(ApiRequest::get("/v1/webhook_settings")).await
    }

    /// Retrieve a webhook
    pub async fn retrieve(&self, webhook_id: &str) -> ApiResult<WebhookSetting> {
        self.send(ApiRequest::get("/v1/webhook_settings").segment(webhook_id))
            .await
    }

    /// Update a webhook
    pub async fn update(&self, webhook_id: &str, params: &WebhookParams) -> ApiResult<WebhookSetting> {
        self.send(ApiRequest::put("/v1/webhook_settings").segment(webhook_id).json(params)?)
            .await
    }

    /// Delete a webhook
    pub async fn delete(&self, webhook_id: &str) -> ApiResult<DeleteResponse> {
        self.send(ApiRequest::delete("/v1/webhook_settings").segment(webhook_id))
            .await
    }
}

/// Webhook setting
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebhookSetting {
    /// Webhook setting id
    pub id: String,
    /// Shop id
    pub shop_id: Option<String>,
    /// Delivery URL
    pub url: Option<String>,
    /// Event name, e.g. `payments.card.exec`
    pub event: Option<String>,
    /// Signature value
    pub signature: Option<String>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for webhook registration and update
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WebhookParams {
    /// Delivery URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Event name
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event: Option<String>,
    /// Value echoed in the `Fincode-Signature` header of deliveries
    #[serde(skip_serializing_if = "Option::is_none")]
    pub signature: Option<String>,
}

impl WebhookParams {
    /// Deliver `event` to `url`
    pub fn new(url: impl Into<String>, event: impl Into<String>) -> Self {
        Self {
            url: Some(url.into()),
            event: Some(event.into()),
            signature: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_serialize() {
        let json = serde_json::to_value(WebhookParams::new("https://example.com/hook", "payments.card.exec")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "url": "https://example.com/hook", "event": "payments.card.exec" })
        );
    }
}
