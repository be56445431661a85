use crate::people_client::{PeopleApiClient, PERSON_INFO_PATH, REPORTS_PATH, SEND_MESSAGE_PATH};
use reqwest::Method;
use serde::Serialize;
use serde_json::{json, Value};
use std::time::Instant;

/// Name used by the API tester when none is supplied.
pub const DEFAULT_TEST_NAME: &str = "John Smith";

/// One canned backend call run by the API tester.
#[derive(Debug, Clone)]
pub struct ApiCheck {
    pub name: &'static str,
    pub method: Method,
    pub endpoint: &'static str,
    pub body: Option<Value>,
}

/// Outcome of one [`ApiCheck`].
#[derive(Debug, Clone, Serialize)]
pub struct ApiCheckResult {
    pub name: String,
    pub method: String,
    pub endpoint: String,
    /// True only for a 2xx answer.
    pub success: bool,
    pub status: Option<u16>,
    pub response_time_ms: Option<u128>,
    pub data: Option<Value>,
    pub error: Option<String>,
}

/// The checks exercised by the tester: lookup, send and reports.
pub fn default_checks(test_name: &str) -> Vec<ApiCheck> {
    vec![
        ApiCheck {
            name: "Get Person Info",
            method: Method::POST,
            endpoint: PERSON_INFO_PATH,
            body: Some(json!({ "name": test_name })),
        },
        ApiCheck {
            name: "Send Message Test",
            method: Method::POST,
            endpoint: SEND_MESSAGE_PATH,
            body: Some(json!({
                "profileId": "test123",
                "email": "test@example.com",
                "phone": "+1-555-0123",
                "message": "Test message from API tester",
            })),
        },
        ApiCheck {
            name: "Get Reports",
            method: Method::GET,
            endpoint: REPORTS_PATH,
            body: None,
        },
    ]
}

/// Runs the checks one after another and reports every outcome; a failing
/// check never stops the remaining ones.
pub async fn run_api_checks(client: &PeopleApiClient, checks: Vec<ApiCheck>) -> Vec<ApiCheckResult> {
    let mut results = Vec::with_capacity(checks.len());

    for check in checks {
        let started = Instant::now();
        let outcome = client
            .raw_request(check.method.clone(), check.endpoint, check.body.as_ref())
            .await;
        let elapsed = started.elapsed().as_millis();

        let result = match outcome {
            Ok(response) => ApiCheckResult {
                name: check.name.to_string(),
                method: check.method.to_string(),
                endpoint: check.endpoint.to_string(),
                success: response.is_success(),
                status: Some(response.status),
                response_time_ms: Some(elapsed),
                data: Some(response.body),
                error: None,
            },
            Err(e) => ApiCheckResult {
                name: check.name.to_string(),
                method: check.method.to_string(),
                endpoint: check.endpoint.to_string(),
                success: false,
                status: None,
                response_time_ms: None,
                data: None,
                error: Some(e.to_string()),
            },
        };

        tracing::info!(
            "API check '{}' {} {}: success={} status={:?}",
            result.name,
            result.method,
            result.endpoint,
            result.success,
            result.status
        );
        results.push(result);
    }

    results
}
