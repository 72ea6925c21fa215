//! Response classification
//!
//! Every exchange ends in exactly one [`Outcome`]:
//!
//! | Outcome | When |
//! |---------|------|
//! | `Success` | 2xx status and a JSON body |
//! | `Api` | non-2xx status and a JSON body |
//! | `Sdk` | transport fault, or a body that is not JSON (whatever the status) |

use crate::error::{ApiError, ApiResult, ErrorDetail, FincodeError, SdkError};
use crate::transport::RawResponse;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Terminal result of one API call
#[derive(Debug)]
pub enum Outcome {
    /// Parsed success body
    Success(Value),
    /// Well-formed API rejection
    Api(ApiError),
    /// Local or transport failure
    Sdk(SdkError),
}

/// Shape of an error payload; every field is optional on the wire
#[derive(Debug, Default, Deserialize)]
struct ErrorPayload {
    #[serde(default)]
    errors: Vec<ErrorDetail>,
    #[serde(default)]
    message: Option<String>,
}

/// Classify a completed exchange from its status and raw body
pub fn classify(status: StatusCode, body: &[u8]) -> Outcome {
    let value: Value = match serde_json::from_slice(body) {
        Ok(value) => value,
        Err(source) => {
            return Outcome::Sdk(SdkError::ParseFailed {
                status: status.as_u16(),
                source,
            });
        }
    };

    if status.is_success() {
        return Outcome::Success(value);
    }

    // A JSON body that is not an error object still yields an API error, with an empty list
    let payload = ErrorPayload::deserialize(&value).unwrap_or_default();
    Outcome::Api(ApiError::new(status.as_u16(), payload.errors, payload.message))
}

/// Classify the result of [`PreparedRequest::send`](crate::request::PreparedRequest::send)
pub fn classify_exchange(exchange: Result<RawResponse, SdkError>) -> Outcome {
    match exchange {
        Ok(response) => classify(response.status, &response.body),
        Err(e) => Outcome::Sdk(e),
    }
}

impl Outcome {
    /// Whether this is a success
    #[must_use]
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    /// Convert into a result carrying the raw JSON value
    pub fn into_result(self) -> ApiResult<Value> {
        match self {
            Self::Success(value) => Ok(value),
            Self::Api(e) => Err(FincodeError::Api(e)),
            Self::Sdk(e) => Err(FincodeError::Sdk(e)),
        }
    }

    /// Convert into a result, decoding the success body as `T`
    ///
    /// A body that parsed as JSON but does not match `T` is a
    /// [`SdkError::DecodeFailed`].
    pub fn decode<T: DeserializeOwned>(self) -> ApiResult<T> {
        let value = self.into_result()?;
        serde_json::from_value(value).map_err(|e| FincodeError::Sdk(SdkError::DecodeFailed(e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use serde_json::json;

    #[test]
    fn test_success_returns_parsed_body() {
        let outcome = classify(StatusCode::OK, br#"{"id":"cus_1"}"#);
        match outcome {
            Outcome::Success(value) => assert_eq!(value, json!({ "id": "cus_1" })),
            other => panic!("expected success, got {other:?}"),
        }
    }

    #[test]
    fn test_error_payload_becomes_api_error() {
        let body = br#"{"errors":[{"error_code":"E01","error_message":"bad"}]}"#;
        match classify(StatusCode::BAD_REQUEST, body) {
            Outcome::Api(err) => {
                assert_eq!(err.status, 400);
                assert_eq!(err.errors.len(), 1);
                assert_eq!(err.errors[0].error_code, "E01");
                assert_eq!(err.errors[0].error_message, "bad");
                assert!(!err.has_message);
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_top_level_message_sets_flag() {
        let body = br#"{"errors":[],"message":"Internal Server Error"}"#;
        match classify(StatusCode::INTERNAL_SERVER_ERROR, body) {
            Outcome::Api(err) => {
                assert!(err.has_message);
                assert_eq!(err.message.as_deref(), Some("Internal Server Error"));
                assert!(err.is_server_error());
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_invalid_json_on_success_is_sdk_error() {
        match classify(StatusCode::OK, b"<html>oops</html>") {
            Outcome::Sdk(err) => assert!(err.is_parse_failed()),
            other => panic!("expected sdk error, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_body_is_parse_failure() {
        let outcome = classify(StatusCode::NO_CONTENT, b"");
        assert!(matches!(outcome, Outcome::Sdk(SdkError::ParseFailed { status: 204, .. })));
    }

    #[test]
    fn test_non_object_error_body() {
        match classify(StatusCode::BAD_GATEWAY, br#""upstream down""#) {
            Outcome::Api(err) => {
                assert_eq!(err.status, 502);
                assert!(err.errors.is_empty());
            }
            other => panic!("expected api error, got {other:?}"),
        }
    }

    #[test]
    fn test_decode_shape_mismatch() {
        #[derive(Debug, Deserialize)]
        struct Customer {
            id: String,
        }

        let err = classify(StatusCode::OK, br#"{"name":"no id"}"#)
            .decode::<Customer>()
            .unwrap_err();
        assert!(matches!(err, FincodeError::Sdk(SdkError::DecodeFailed(_))));

        let customer: Customer = classify(StatusCode::OK, br#"{"id":"c_1"}"#).decode().unwrap();
        assert_eq!(customer.id, "c_1");
    }

    #[test]
    fn test_transport_error_passes_through() {
        let outcome = classify_exchange(Err(SdkError::config("boom")));
        assert!(matches!(outcome, Outcome::Sdk(SdkError::Config(_))));
    }

    proptest! {
        #[test]
        fn prop_status_decides_kind_for_json_bodies(code in 200u16..600, n in any::<i64>()) {
            let status = StatusCode::from_u16(code).unwrap();
            let body = json!({ "value": n }).to_string();
            match classify(status, body.as_bytes()) {
                Outcome::Success(_) => prop_assert!(status.is_success()),
                Outcome::Api(err) => {
                    prop_assert!(!status.is_success());
                    prop_assert_eq!(err.status, code);
                }
                Outcome::Sdk(_) => prop_assert!(false, "json body classified as sdk error"),
            }
        }

        #[test]
        fn prop_unparseable_body_is_always_sdk(code in 100u16..600, junk in "<[a-zA-Z>/]{0,31}") {
            let status = StatusCode::from_u16(code).unwrap();
            let outcome = classify(status, junk.as_bytes());
            let is_parse_failed = matches!(outcome, Outcome::Sdk(SdkError::ParseFailed { .. }));
            prop_assert!(is_parse_failed);
        }
    }
}
