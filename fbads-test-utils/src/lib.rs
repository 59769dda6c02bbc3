//! FBADS Test Utilities
//!
//! Shared test infrastructure for the fbads workspace:
//! - A scripted mock transport that records every request
//! - Builders for batch response envelopes
//! - Proptest generators for arguments, descriptors and API errors
//! - Fixtures and assertions for common scenarios

pub use fbads_core::{
    AdsError, AdsResult, ApiError, ApiRequest, Args, BatchDescriptor, BatchItem, Credentials,
    HttpRequest, HttpResponse, Method, Transport,
};

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;

// ============================================================================
// MOCK TRANSPORT
// ============================================================================

/// Transport that replays scripted responses in order and records requests.
///
/// Running out of scripted responses is an error, so a test that makes more
/// calls than it expects fails loudly.
#[derive(Debug, Default)]
pub struct MockTransport {
    responses: Mutex<VecDeque<AdsResult<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(self, response: HttpResponse) -> Self {
        self.push(Ok(response));
        self
    }

    pub fn respond_json(self, status: u16, body: Value) -> Self {
        self.respond(HttpResponse::new(status, body.to_string()))
    }

    /// Script a connection-level failure.
    pub fn fail(self, message: &str) -> Self {
        self.push(Err(AdsError::transport(std::io::Error::new(
            std::io::ErrorKind::ConnectionRefused,
            message.to_string(),
        ))));
        self
    }

    /// Every request sent so far, oldest first.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().expect("requests lock poisoned").clone()
    }

    pub fn remaining(&self) -> usize {
        self.responses.lock().expect("responses lock poisoned").len()
    }

    fn push(&self, response: AdsResult<HttpResponse>) {
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .push_back(response);
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> AdsResult<HttpResponse> {
        let url = request.url.clone();
        self.requests
            .lock()
            .expect("requests lock poisoned")
            .push(request);
        self.responses
            .lock()
            .expect("responses lock poisoned")
            .pop_front()
            .unwrap_or_else(|| {
                Err(AdsError::invalid_response(format!(
                    "no scripted response left for {}",
                    url
                )))
            })
    }
}

// ============================================================================
// RESPONSE BUILDERS
// ============================================================================

/// A 200 batch envelope; each item's body is the JSON text of its value.
pub fn batch_response(items: &[(u16, Value)]) -> HttpResponse {
    let envelopes: Vec<Value> = items
        .iter()
        .map(|(code, body)| json!({ "code": code, "body": body.to_string() }))
        .collect();
    HttpResponse::new(200, Value::Array(envelopes).to_string())
}

/// The body the Graph API returns for a failed call.
pub fn error_body(error: &ApiError) -> Value {
    json!({ "error": error })
}

// ============================================================================
// PROPTEST GENERATORS
// ============================================================================

pub mod generators {
    //! Proptest strategies for request and response values.

    use super::*;
    use proptest::prelude::*;

    pub fn arb_method() -> impl Strategy<Value = Method> {
        prop_oneof![Just(Method::Get), Just(Method::Post), Just(Method::Delete)]
    }

    /// Graph object ids and `act_` paths.
    pub fn arb_path() -> impl Strategy<Value = String> {
        prop_oneof![
            "[0-9]{1,15}",
            "act_[0-9]{1,15}",
            "act_[0-9]{1,15}/(adcampaigns|adgroups|reportstats|customaudiences)",
        ]
    }

    pub fn arb_arg_key() -> impl Strategy<Value = String> {
        "[a-z][a-z_]{0,15}"
    }

    /// Values that need escaping in a query string.
    pub fn arb_arg_value() -> impl Strategy<Value = String> {
        prop_oneof![
            "[a-zA-Z0-9]{0,20}",
            "[ &=?/+%#\"{}\\[\\],:a-z0-9]{0,20}",
            "\\PC{0,12}",
        ]
    }

    /// Args with distinct keys.
    pub fn arb_args() -> impl Strategy<Value = Args> {
        prop::collection::btree_map(arb_arg_key(), arb_arg_value(), 0..8)
            .prop_map(|pairs| pairs.into_iter().collect())
    }

    pub fn arb_api_request() -> impl Strategy<Value = ApiRequest> {
        (arb_method(), arb_path(), arb_args())
            .prop_map(|(method, path, args)| ApiRequest::new(method, path).with_args(args))
    }

    pub fn arb_descriptor() -> impl Strategy<Value = BatchDescriptor> {
        (arb_method(), arb_path(), arb_args())
            .prop_map(|(method, path, args)| BatchDescriptor::new(method, &path, &args))
    }

    pub fn arb_api_error() -> impl Strategy<Value = ApiError> {
        (
            1i64..3000,
            prop_oneof![
                Just("OAuthException".to_string()),
                Just("GraphMethodException".to_string()),
                "[A-Z][a-zA-Z]{2,20}",
            ],
            "[a-zA-Z ]{1,40}",
        )
            .prop_map(|(code, error_type, message)| ApiError::new(code, error_type, message))
    }

    /// A batch item body paired with the item the client should decode it to.
    pub fn arb_batch_item() -> impl Strategy<Value = ((u16, Value), BatchItem)> {
        prop_oneof![
            (0u64..1_000_000).prop_map(|id| {
                let body = json!({ "id": id.to_string() });
                ((200, body.clone()), Ok(body))
            }),
            arb_api_error().prop_map(|error| ((400, error_body(&error)), Err(error))),
            "[a-z<>/ ]{0,20}".prop_map(|junk| ((500, Value::String(junk)), Err(ApiError::unknown()))),
        ]
    }
}

// ============================================================================
// FIXTURES
// ============================================================================

pub mod fixtures {
    //! Pre-built values for common test scenarios.

    use super::*;

    pub const ACCESS_TOKEN: &str = "test-access-token";
    pub const APP_ID: &str = "1234567890";
    pub const APP_SECRET: &str = "test-app-secret";
    pub const ACCOUNT_ID: &str = "42";

    pub fn credentials() -> Credentials {
        Credentials::new(ACCESS_TOKEN, APP_ID, APP_SECRET)
    }

    /// A minimal config file body using the fixture credentials.
    pub fn config_toml() -> String {
        format!(
            "[credentials]\naccess_token = \"{}\"\napp_id = \"{}\"\napp_secret = \"{}\"\n",
            ACCESS_TOKEN, APP_ID, APP_SECRET
        )
    }

    pub fn oauth_error() -> ApiError {
        ApiError::new(190, "OAuthException", "Error validating access token")
    }
}

// ============================================================================
// ASSERTIONS
// ============================================================================

pub mod assertions {
    //! Assertions for fbads-specific results.

    use super::*;

    #[track_caller]
    pub fn assert_precondition<T: std::fmt::Debug>(result: &AdsResult<T>) {
        match result {
            Err(AdsError::Precondition { .. }) => {}
            other => panic!("Expected Precondition error, got: {:?}", other),
        }
    }

    #[track_caller]
    pub fn assert_api_error<T: std::fmt::Debug>(result: &AdsResult<T>, code: i64) {
        match result {
            Err(AdsError::Api(error)) if error.code == code => {}
            other => panic!("Expected API error {}, got: {:?}", code, other),
        }
    }

    /// Assert that the batch parameter of a sent request holds `expected`.
    #[track_caller]
    pub fn assert_batch_sent(request: &HttpRequest, expected: &[BatchDescriptor]) {
        assert_eq!(request.method, Method::Post, "batch must be a POST");
        let batch = request.param("batch").expect("no batch parameter sent");
        let sent: Vec<BatchDescriptor> =
            serde_json::from_str(batch).expect("batch parameter is not JSON");
        assert_eq!(sent, expected);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fbads_core::decode_batch;
    use proptest::prelude::*;

    #[tokio::test]
    async fn test_mock_transport_replays_in_order() {
        let transport = MockTransport::new()
            .respond_json(200, json!({"n": 1}))
            .respond(HttpResponse::new(404, "missing"));

        let request = HttpRequest {
            method: Method::Get,
            url: "http://mock/1".to_string(),
            query: Vec::new(),
            form: Vec::new(),
            files: Vec::new(),
        };
        let first = transport.send(request.clone()).await.unwrap();
        assert_eq!(first.body, r#"{"n":1}"#);
        let second = transport.send(request.clone()).await.unwrap();
        assert_eq!(second.status, 404);
        assert!(transport.send(request).await.is_err());
        assert_eq!(transport.requests().len(), 3);
        assert_eq!(transport.remaining(), 0);
    }

    #[tokio::test]
    async fn test_mock_transport_fail() {
        let transport = MockTransport::new().fail("refused");
        let request = HttpRequest {
            method: Method::Post,
            url: "http://mock".to_string(),
            query: Vec::new(),
            form: Vec::new(),
            files: Vec::new(),
        };
        assert!(matches!(transport.send(request).await, Err(AdsError::Transport(_))));
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(50))]

        #[test]
        fn prop_batch_items_decode_as_generated(
            items in prop::collection::vec(generators::arb_batch_item(), 0..10)
        ) {
            let (bodies, expected): (Vec<_>, Vec<_>) = items.into_iter().unzip();
            let decoded = decode_batch("http://mock", batch_response(&bodies), bodies.len()).unwrap();
            prop_assert_eq!(decoded, expected);
        }

        #[test]
        fn prop_generated_descriptor_keeps_method(request in generators::arb_api_request()) {
            let descriptor = request.describe().unwrap();
            prop_assert_eq!(descriptor.method, request.method);
            prop_assert!(descriptor.relative_url.starts_with(request.path.as_str()));
        }
    }
}
