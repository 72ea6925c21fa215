//! Tenant endpoints for platform shops
//!
//! Tenant-scoped calls on other facades use
//! `with_tenant_shop_id(...)` rather than anything in this module.

use crate::error::ApiResult;
use crate::request::ApiRequest;
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

facade! {
    /// Tenant API interface
    TenantsApi
}

impl TenantsApi {
    /// Create a tenant together with a new user
    ///
    /// POST /v1/tenant_users
    pub async fn create(&self, params: &CreateTenantParams) -> ApiResult<TenantRegistration> {
        self.send(ApiRequest::post("/v1/tenant_users").json(params)?)
            .await
    }

    /// Create a tenant owned by an existing user
    ///
    /// POST /v1/join_tenants
    pub async fn create_with_existing_user(
        &self,
        params: &JoinTenantParams,
    ) -> ApiResult<TenantRegistration> {
        self.send(ApiRequest::post("/v1/join_tenants").json(params)?)
            .await
    }

    /// Retrieve a tenant
    ///
    /// GET /v1/tenants/{id}
    pub async fn retrieve(&self, tenant_id: &str) -> ApiResult<Tenant> {
        self.send(ApiRequest::get("/v1/tenants").segment(tenant_id))
            .await
    }

    /// Update a tenant
    ///
    /// PUT /v1/tenants/{id}
    pub async fn update(&self, tenant_id: &str, params: &Map<String, Value>) -> ApiResult<Tenant> {
        self.send(ApiRequest::put("/v1/tenants").segment(tenant_id).json(params)?)
            .await
    }

    /// Retrieve the examination (screening) information of a tenant
    ///
    /// GET /v1/contracts/examinations/tenants/{id}
    pub async fn retrieve_examination_info(&self, tenant_id: &str) -> ApiResult<ExaminationInfo> {
        self.send(examination(Method::GET, tenant_id))
            .await
    }

    /// Update the examination information of a tenant
    ///
    /// PUT /v1/contracts/examinations/tenants/{id}
    pub async fn update_examination_info(
        &self,
        tenant_id: &str,
        params: &Map<String, Value>,
    ) -> ApiResult<ExaminationInfo> {
        self.send(examination(Method::PUT, tenant_id).json(params)?)
            .await
    }

    /// Submit a tenant for examination
    ///
    /// POST /v1/contracts/examinations/tenants/{id}/request
    pub async fn request_examination(&self, tenant_id: &str) -> ApiResult<ExaminationInfo> {
        self.send(examination(Method::POST, tenant_id).segment("request"))
            .await
    }
}

fn examination(method: Method, tenant_id: &str) -> ApiRequest {
    ApiRequest::new(method, "/v1/contracts/examinations/tenants").segment(tenant_id)
}

/// Result of tenant creation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TenantRegistration {
    /// Created user id
    pub user_id: Option<String>,
    /// Tenant shop id
    pub tenant_id: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Tenant shop
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tenant {
    /// Tenant shop id
    pub id: String,
    /// Shop name
    pub shop_name: Option<String>,
    /// Shop type
    pub shop_type: Option<String>,
    /// Owning platform shop id
    pub platform_id: Option<String>,
    /// Platform fee rates
    pub platform_rate_list: Option<Vec<Value>>,
    /// Creation timestamp
    pub created: Option<String>,
    /// Last update timestamp
    pub updated: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating a tenant with a new user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTenantParams {
    /// Email address
    pub email: String,
    /// Login password
    pub password: String,
    /// Tenant shop name
    pub tenant_name: String,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Body for creating a tenant owned by an existing user
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JoinTenantParams {
    /// Email address
    pub email: String,
    /// Login password
    pub password: String,
    /// Tenant shop name
    pub tenant_name: String,
    /// Additional fields sent as-is
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Examination information; the field set depends on the contract
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExaminationInfo {
    /// Tenant shop id
    pub tenant_id: Option<String>,
    /// Status
    pub status: Option<String>,
    /// Remaining fields
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_examination_request() {
        let request = examination(Method::POST, "s_t1").segment("request");
        assert_eq!(request.path(), "/v1/contracts/examinations/tenants");
        assert_eq!(request.segments(), ["s_t1", "request"]);
    }

    #[test]
    fn test_registration_deserialize() {
        let json = r#"{"user_id": "u_1", "tenant_id": "s_t1"}"#;
        let registration: TenantRegistration = serde_json::from_str(json).unwrap();
        assert_eq!(registration.tenant_id.as_deref(), Some("s_t1"));
    }
}
