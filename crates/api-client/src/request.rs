//! Request building
//!
//! An [`ApiRequest`] describes one call (method, path, body, query, per-call
//! header options). [`ApiRequest::build`] turns it into a [`PreparedRequest`]
//! without touching the network; [`PreparedRequest::send`] performs exactly
//! one exchange.
//!
//! Resource ids never go into the literal path. They are appended with
//! [`ApiRequest::segment`], which percent-encodes `/`, `?`, `#` and `%` and
//! rejects `.`, `..` and empty ids.

use crate::config::ClientConfig;
use crate::error::SdkError;
use crate::multipart::MultipartFile;
use crate::query::QuerySpec;
use crate::transport::{RawResponse, Transport};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, Method, Request, Url};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

/// Header carrying the configured API version
pub const API_VERSION_HEADER: &str = "api-version";

/// Header carrying a caller-supplied idempotency key
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotent_key";

/// Header selecting the tenant shop a platform key acts on behalf of
pub const TENANT_SHOP_ID_HEADER: &str = "tenant-shop-id";

const JSON_CONTENT_TYPE: &str = "application/json";

/// Per-call header overrides
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestOptions {
    /// Idempotency key for write operations
    pub idempotency_key: Option<String>,
    /// Tenant shop to act on behalf of
    pub tenant_shop_id: Option<String>,
    /// Explicit `Content-Type`, overriding the default and any body-derived type
    pub content_type: Option<String>,
}

impl RequestOptions {
    /// No overrides
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the idempotency key
    #[must_use]
    pub fn with_idempotency_key(mut self, key: impl Into<String>) -> Self {
        self.idempotency_key = Some(key.into());
        self
    }

    /// Set the tenant shop id
    #[must_use]
    pub fn with_tenant_shop_id(mut self, shop_id: impl Into<String>) -> Self {
        self.tenant_shop_id = Some(shop_id.into());
        self
    }

    /// Override the content type
    #[must_use]
    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }
}

/// Outbound request body
#[derive(Debug, Clone, Default, PartialEq)]
pub enum RequestBody {
    /// No body
    #[default]
    Empty,
    /// JSON document
    Json(Value),
    /// `multipart/form-data` upload
    Multipart(MultipartFile),
}

impl RequestBody {
    /// Encode any serializable value as a JSON body
    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SdkError> {
        serde_json::to_value(value)
            .map(Self::Json)
            .map_err(SdkError::Serialize)
    }
}

/// Description of one API call
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    path: String,
    segments: Vec<String>,
    body: RequestBody,
    query: Option<QuerySpec>,
    options: RequestOptions,
}

impl ApiRequest {
    /// Create a request for the fixed route `path`, e.g. `/v1/customers`
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            segments: Vec::new(),
            body: RequestBody::Empty,
            query: None,
            options: RequestOptions::default(),
        }
    }

    /// GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Append one path segment, escaped
    #[must_use]
    pub fn segment(mut self, segment: impl Into<String>) -> Self {
        self.segments.push(segment.into());
        self
    }

    /// Attach a body
    #[must_use]
    pub fn body(mut self, body: RequestBody) -> Self {
        self.body = body;
        self
    }

    /// Attach a JSON body
    pub fn json<T: Serialize + ?Sized>(self, value: &T) -> Result<Self, SdkError> {
        Ok(self.body(RequestBody::json(value)?))
    }

    /// Attach a query
    #[must_use]
    pub fn query(mut self, query: impl Into<QuerySpec>) -> Self {
        self.query = Some(query.into());
        self
    }

    /// Attach per-call header options
    #[must_use]
    pub fn options(mut self, options: RequestOptions) -> Self {
        self.options = options;
        self
    }

    /// HTTP method
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Fixed route, without appended segments
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Appended segments, unescaped
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// Assemble the outbound request
    ///
    /// Performs no I/O; `http` only encodes the body. Fails when the query
    /// cannot be serialized, a segment is empty or a dot segment, the method
    /// is not one the API uses, or a header value is not valid HTTP.
    pub fn build(
        self,
        config: &ClientConfig,
        http: &Client,
        transport: Arc<dyn Transport>,
    ) -> Result<PreparedRequest, SdkError> {
        let Self {
            method,
            path,
            segments,
            body,
            query,
            options,
        } = self;

        if ![Method::GET, Method::POST, Method::PUT, Method::DELETE].contains(&method) {
            return Err(SdkError::config(format!("unsupported method {method}")));
        }

        let url = build_url(config, &path, &segments, query.as_ref())?;
        let headers = build_headers(config, &options)?;

        let builder = http.request(method, url).headers(headers);
        let builder = match body {
            RequestBody::Empty => builder.header(CONTENT_TYPE, JSON_CONTENT_TYPE),
            RequestBody::Json(value) => builder
                .header(CONTENT_TYPE, JSON_CONTENT_TYPE)
                .body(serde_json::to_vec(&value).map_err(SdkError::Serialize)?),
            RequestBody::Multipart(file) => builder.multipart(file.into_form()?),
        };

        let mut request = builder
            .build()
            .map_err(|e| SdkError::config(format!("invalid request: {e}")))?;

        if let Some(ref content_type) = options.content_type {
            request
                .headers_mut()
                .insert(CONTENT_TYPE, header_value("content-type", content_type)?);
        }

        Ok(PreparedRequest { transport, request })
    }
}

fn build_url(
    config: &ClientConfig,
    path: &str,
    segments: &[String],
    query: Option<&QuerySpec>,
) -> Result<Url, SdkError> {
    let mut raw = String::from(config.base_url());
    if !path.starts_with('/') {
        raw.push('/');
    }
    raw.push_str(path);

    let mut url =
        Url::parse(&raw).map_err(|e| SdkError::config(format!("invalid request url {raw}: {e}")))?;

    if !segments.is_empty() {
        if let Some(bad) = segments
            .iter()
            .find(|s| matches!(s.as_str(), "" | "." | ".."))
        {
            return Err(SdkError::config(format!("invalid path segment {bad:?}")));
        }
        url.path_segments_mut()
            .map_err(|()| SdkError::config(format!("cannot append segments to {raw}")))?
            .pop_if_empty()
            .extend(segments);
    }

    if let Some(query) = query {
        let query = query.to_query_string()?;
        if !query.is_empty() {
            url.set_query(Some(&query));
        }
    }

    Ok(url)
}

fn build_headers(config: &ClientConfig, options: &RequestOptions) -> Result<HeaderMap, SdkError> {
    let mut headers = HeaderMap::new();

    let mut authorization = header_value("authorization", &format!("Bearer {}", config.secret_key))?;
    authorization.set_sensitive(true);
    headers.insert(AUTHORIZATION, authorization);

    if let Some(ref version) = config.api_version {
        headers.insert(
            HeaderName::from_static(API_VERSION_HEADER),
            header_value(API_VERSION_HEADER, version)?,
        );
    }
    if let Some(ref key) = options.idempotency_key {
        headers.insert(
            HeaderName::from_static(IDEMPOTENCY_KEY_HEADER),
            header_value(IDEMPOTENCY_KEY_HEADER, key)?,
        );
    }
    if let Some(ref shop_id) = options.tenant_shop_id {
        headers.insert(
            HeaderName::from_static(TENANT_SHOP_ID_HEADER),
            header_value(TENANT_SHOP_ID_HEADER, shop_id)?,
        );
    }

    Ok(headers)
}

fn header_value(name: &'static str, value: &str) -> Result<HeaderValue, SdkError> {
    HeaderValue::from_str(value).map_err(|_| SdkError::InvalidHeader { name })
}

/// A fully assembled request, ready to be sent once
#[derive(Debug)]
pub struct PreparedRequest {
    transport: Arc<dyn Transport>,
    request: Request,
}

impl PreparedRequest {
    /// HTTP method
    #[must_use]
    pub fn method(&self) -> &Method {
        self.request.method()
    }

    /// Fully qualified URL, query included
    #[must_use]
    pub fn url(&self) -> &Url {
        self.request.url()
    }

    /// Outbound headers
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        self.request.headers()
    }

    /// Buffered body, if any; multipart bodies are streamed and return `None`
    #[must_use]
    pub fn body(&self) -> Option<&[u8]> {
        self.request.body().and_then(reqwest::Body::as_bytes)
    }

    /// Perform the network exchange
    ///
    /// Any transport fault, including one while reading the body, is a
    /// [`SdkError::FetchFailed`].
    pub async fn send(self) -> Result<RawResponse, SdkError> {
        self.transport.execute(self.request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Pagination, QueryMap, SortDirective};
    use crate::transport::ReqwestTransport;
    use reqwest::header::CONTENT_LENGTH;

    fn transport() -> Arc<dyn Transport> {
        Arc::new(ReqwestTransport::with_client(Client::new()))
    }

    fn try_build(config: &ClientConfig, request: ApiRequest) -> Result<PreparedRequest, SdkError> {
        request.build(config, &Client::new(), transport())
    }

    fn build(config: &ClientConfig, request: ApiRequest) -> PreparedRequest {
        try_build(config, request).unwrap()
    }

    fn bulk_file() -> RequestBody {
        RequestBody::Multipart(MultipartFile::new("file", "bulk.csv", "text/csv", b"x".to_vec()))
    }

    #[test]
    fn test_base_url_follows_environment() {
        let test = build(&ClientConfig::test("sk"), ApiRequest::get("/v1/customers"));
        assert_eq!(test.url().as_str(), "https://api.test.fincode.jp/v1/customers");

        let live = build(&ClientConfig::live("sk"), ApiRequest::get("v1/customers"));
        assert_eq!(live.url().as_str(), "https://api.fincode.jp/v1/customers");
    }

    #[test]
    fn test_segments_are_appended() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::put("/v1/payments").segment("o_1").segment("capture"),
        );
        assert_eq!(request.url().as_str(), "https://api.test.fincode.jp/v1/payments/o_1/capture");
    }

    #[test]
    fn test_segment_reserved_characters_are_escaped() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/customers").segment("a/b?pay_type=Card#x%"),
        );
        assert_eq!(
            request.url().as_str(),
            "https://api.test.fincode.jp/v1/customers/a%2Fb%3Fpay_type=Card%23x%25"
        );
        assert_eq!(request.url().query(), None);
        assert_eq!(request.url().fragment(), None);
    }

    #[test]
    fn test_dot_and_empty_segments_rejected() {
        for bad in ["..", ".", ""] {
            let err = try_build(
                &ClientConfig::test("sk"),
                ApiRequest::get("/v1/customers").segment(bad),
            )
            .unwrap_err();
            assert!(matches!(err, SdkError::Config(_)), "accepted {bad:?}");
        }
    }

    #[test]
    fn test_segments_keep_query() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/payments")
                .segment("o_1")
                .query(QueryMap::new().with("pay_type", "Card")),
        );
        assert_eq!(
            request.url().as_str(),
            "https://api.test.fincode.jp/v1/payments/o_1?pay_type=Card"
        );
    }

    #[test]
    fn test_default_headers() {
        let request = build(&ClientConfig::test("m_test_abc"), ApiRequest::get("/v1/plans"));
        let headers = request.headers();

        assert_eq!(headers[AUTHORIZATION], "Bearer m_test_abc");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert!(headers.get(API_VERSION_HEADER).is_none());
        assert!(headers.get(IDEMPOTENCY_KEY_HEADER).is_none());
        assert!(headers.get(TENANT_SHOP_ID_HEADER).is_none());
        assert!(request.body().is_none());
    }

    #[test]
    fn test_optional_headers() {
        let config = ClientConfig::test("sk").with_api_version("20211001");
        let options = RequestOptions::new()
            .with_idempotency_key("idem-1")
            .with_tenant_shop_id("s_tenant");
        let request = build(&config, ApiRequest::post("/v1/payments").options(options));
        let headers = request.headers();

        assert_eq!(headers[API_VERSION_HEADER], "20211001");
        assert_eq!(headers[IDEMPOTENCY_KEY_HEADER], "idem-1");
        assert_eq!(headers[TENANT_SHOP_ID_HEADER], "s_tenant");
    }

    #[test]
    fn test_content_type_override_wins() {
        let options = RequestOptions::new().with_content_type("text/plain");
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::post("/v1/payments/bulk").body(bulk_file()).options(options),
        );
        assert_eq!(request.headers()[CONTENT_TYPE], "text/plain");
        assert_eq!(request.headers().get_all(CONTENT_TYPE).iter().count(), 1);
    }

    #[test]
    fn test_multipart_sets_boundary_content_type() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::post("/v1/payments/bulk").body(bulk_file()),
        );
        let content_type = request.headers()[CONTENT_TYPE].to_str().unwrap();
        assert!(content_type.starts_with("multipart/form-data; boundary="));
        assert!(content_type.len() > "multipart/form-data; boundary=".len());
        assert!(request.headers().contains_key(CONTENT_LENGTH));
        assert_eq!(request.headers()[AUTHORIZATION], "Bearer sk");
    }

    #[test]
    fn test_invalid_part_content_type_rejected() {
        let body = RequestBody::Multipart(MultipartFile::new("file", "a.csv", "nonsense", Vec::new()));
        let err = try_build(
            &ClientConfig::test("sk"),
            ApiRequest::post("/v1/payments/bulk").body(body),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_json_body_is_encoded() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::post("/v1/customers")
                .json(&serde_json::json!({ "name": "Taro" }))
                .unwrap(),
        );
        assert_eq!(request.body(), Some(br#"{"name":"Taro"}"#.as_slice()));
        assert_eq!(request.method(), Method::POST);
    }

    #[test]
    fn test_query_is_appended() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/payments").query(QueryMap::new().with("page", 2)),
        );
        assert_eq!(request.url().query(), Some("page=2"));

        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/payments").query(
                QuerySpec::new()
                    .with_search(QueryMap::new().with("pay_type", "Card"))
                    .with_pagination(
                        Pagination::new()
                            .with_page(2)
                            .with_limit(10)
                            .with_sort(SortDirective::desc("created_at"))
                            .with_sort(SortDirective::asc("updated_at")),
                    ),
            ),
        );
        assert_eq!(
            request.url().query(),
            Some("pay_type=Card&page=2&limit=10&sort=created_at+desc&sort=updated_at+asc")
        );
    }

    #[test]
    fn test_empty_query_adds_no_question_mark() {
        let request = build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/plans").query(QueryMap::new().with_opt("page", Option::<u32>::None)),
        );
        assert_eq!(request.url().as_str(), "https://api.test.fincode.jp/v1/plans");
    }

    #[test]
    fn test_unsupported_method_rejected() {
        let err = try_build(&ClientConfig::test("sk"), ApiRequest::new(Method::PATCH, "/v1/plans"))
            .unwrap_err();
        assert!(matches!(err, SdkError::Config(_)));
    }

    #[test]
    fn test_invalid_header_value_rejected() {
        let err = try_build(
            &ClientConfig::test("sk"),
            ApiRequest::get("/v1/plans").options(RequestOptions::new().with_tenant_shop_id("bad\nvalue")),
        )
        .unwrap_err();
        assert!(matches!(err, SdkError::InvalidHeader { name: "tenant-shop-id" }));
    }
}
