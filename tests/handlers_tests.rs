/// Web UI handler tests against a mocked people API
use axum::extract::{Query, State};
use axum::response::IntoResponse;
use axum::Form;
use people_lookup::config::Config;
use people_lookup::handlers::{self, ApiTesterQuery, AppState, SearchForm};
use people_lookup::models::ConnectionStatus;
use people_lookup::people_client::PeopleApiClient;
use people_lookup::session::ContactDraft;
use serde_json::json;
use std::sync::Arc;
use std::time::Duration;
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper function to create app state pointing at the mock backend
fn create_test_state(mock_server: &MockServer) -> Arc<AppState> {
    let config = Config {
        api_base_url: format!("{}/api", mock_server.uri()),
        port: 3000,
        http_timeout_secs: None,
    };
    let client = PeopleApiClient::from_config(&config).unwrap();
    Arc::new(AppState::new(config, client))
}

async fn mount_backend(mock_server: &MockServer) {
    Mock::given(method("POST"))
        .and(path("/api/person-info"))
        .and(body_json(json!({"name": "John Smith"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "id": "abc",
                "name": "John Smith",
                "profilePic": "",
                "aiInsights": ["Active in professional networking"],
                "email": "john.smith@example.com",
                "phone": "+1 (555) 123-4567",
                "title": "Senior Product Manager",
                "company": "Tech Innovations Inc."
            }
        })))
        .mount(mock_server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/person-info"))
        .and(body_json(json!({"name": "Nobody"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"success": false, "error": "not found"})),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalSearches": 7, "successRate": 0.5})),
        )
        .mount(mock_server)
        .await;

    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .mount(mock_server)
        .await;
}

#[tokio::test]
async fn test_health() {
    let (status, body) = handlers::health().await;
    assert_eq!(status, axum::http::StatusCode::OK);
    assert_eq!(body.0["status"], "healthy");
}

#[tokio::test]
async fn test_search_then_render_shows_profile() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    let state = create_test_state(&mock_server);

    let redirect = handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "John Smith".to_string(),
        }),
    )
    .await;
    assert_eq!(
        redirect.into_response().status(),
        axum::http::StatusCode::SEE_OTHER
    );

    {
        let session = state.session.lock().await;
        assert_eq!(session.search_count, 1);
        assert_eq!(session.analytics.total_searches, 7);
        assert!(!session.is_searching());
    }

    let page = handlers::index(State(state.clone())).await.0;
    assert!(page.contains("John Smith"));
    assert!(page.contains("Profile Information"));
    assert!(page.contains("Found John Smith"));
    assert!(page.contains("Success rate: 50.0%"));

    // Notices are shown once.
    let page = handlers::index(State(state)).await.0;
    assert!(!page.contains("Found John Smith"));
}

#[tokio::test]
async fn test_search_handler_refreshes_analytics_exactly_once() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/person-info"))
        .and(body_json(json!({"name": "Ada Lovelace"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {"id": "def", "name": "Ada Lovelace", "email": "ada@example.com", "phone": "1"}
        })))
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/analytics"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"totalSearches": 3, "successRate": 1.0})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/reports"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([])))
        .expect(1)
        .mount(&mock_server)
        .await;
    let state = create_test_state(&mock_server);

    handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "Ada Lovelace".to_string(),
        }),
    )
    .await;

    let session = state.session.lock().await;
    assert_eq!(session.search_count, 1);
    assert_eq!(session.analytics.total_searches, 3);
}

#[tokio::test]
async fn test_abandoned_search_request_still_finishes() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api/person-info"))
        .and(body_json(json!({"name": "Ada Lovelace"})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({
                    "success": true,
                    "data": {"id": "def", "name": "Ada Lovelace", "email": "ada@example.com", "phone": "1"}
                }))
                .set_delay(Duration::from_millis(500)),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let state = create_test_state(&mock_server);

    // The client gives up long before the backend answers.
    let abandoned = tokio::time::timeout(
        Duration::from_millis(100),
        handlers::search(
            State(state.clone()),
            Form(SearchForm {
                name: "Ada Lovelace".to_string(),
            }),
        ),
    )
    .await;
    assert!(abandoned.is_err());
    assert!(state.session.lock().await.is_searching());

    for _ in 0..60 {
        if !state.session.lock().await.is_searching() {
            break;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    {
        let session = state.session.lock().await;
        assert!(!session.is_searching());
        assert_eq!(session.search_count, 1);
        assert_eq!(session.profile.as_ref().unwrap().name, "Ada Lovelace");
    }

    let page = handlers::index(State(state)).await.0;
    assert!(!page.contains("Searching..."));
    assert!(page.contains("Found Ada Lovelace"));
}

#[tokio::test]
async fn test_failed_search_renders_notice_and_keeps_profile() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    let state = create_test_state(&mock_server);

    handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "John Smith".to_string(),
        }),
    )
    .await;
    handlers::index(State(state.clone())).await;

    handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "Nobody".to_string(),
        }),
    )
    .await;

    let page = handlers::index(State(state.clone())).await.0;
    assert!(page.contains("Search failed: not found"));
    assert!(page.contains("John Smith"));
    assert_eq!(state.session.lock().await.search_count, 1);
}

#[tokio::test]
async fn test_empty_message_rejected_without_backend_call() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .expect(0)
        .mount(&mock_server)
        .await;
    let state = create_test_state(&mock_server);

    handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "John Smith".to_string(),
        }),
    )
    .await;

    handlers::send_message(
        State(state.clone()),
        Form(ContactDraft {
            email: "john.smith@example.com".to_string(),
            phone: String::new(),
            message: String::new(),
        }),
    )
    .await;

    let page = handlers::index(State(state)).await.0;
    assert!(page.contains("Message cannot be empty"));
}

#[tokio::test]
async fn test_send_message_success_notice() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api/send-message"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({"success": true, "messageId": "m-9"})),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    let state = create_test_state(&mock_server);

    handlers::search(
        State(state.clone()),
        Form(SearchForm {
            name: "John Smith".to_string(),
        }),
    )
    .await;
    handlers::send_message(
        State(state.clone()),
        Form(ContactDraft {
            email: "john.smith@example.com".to_string(),
            phone: "+1 (555) 123-4567".to_string(),
            message: "Hello!".to_string(),
        }),
    )
    .await;

    let page = handlers::index(State(state)).await.0;
    assert!(page.contains("Message sent to John Smith! (id: m-9)"));
}

#[tokio::test]
async fn test_mount_and_connection_check() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    let state = create_test_state(&mock_server);

    assert_eq!(
        state.session.lock().await.connection,
        ConnectionStatus::Unknown
    );

    handlers::mount(&state).await;
    assert_eq!(
        state.session.lock().await.connection,
        ConnectionStatus::Connected
    );

    handlers::check_connection(State(state.clone())).await;
    let page = handlers::index(State(state)).await.0;
    assert!(page.contains("Connected"));
}

#[tokio::test]
async fn test_refresh_analytics_handler() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    let state = create_test_state(&mock_server);

    handlers::refresh_analytics(State(state.clone())).await;

    let session = state.session.lock().await;
    assert_eq!(session.analytics.total_searches, 7);
    assert!(!session.is_refreshing);
}

#[tokio::test]
async fn test_session_json() {
    let mock_server = MockServer::start().await;
    let state = create_test_state(&mock_server);

    let body = handlers::session_json(State(state)).await.0;
    let value = serde_json::to_value(&body).unwrap();
    assert_eq!(value["search_count"], 0);
    assert_eq!(value["connection"], "unknown");
}

#[tokio::test]
async fn test_api_tester_page() {
    let mock_server = MockServer::start().await;
    mount_backend(&mock_server).await;
    Mock::given(method("POST"))
        .and(path("/api/send-message"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"success": true})))
        .mount(&mock_server)
        .await;
    let state = create_test_state(&mock_server);

    let page = handlers::api_tester(State(state), Query(ApiTesterQuery { name: None }))
        .await
        .0;

    assert!(page.contains("Get Person Info"));
    assert!(page.contains("Send Message Test"));
    assert!(page.contains("Get Reports"));
    assert!(page.contains("John Smith"));
}

#[test]
fn test_router_builds() {
    let config = Config {
        api_base_url: "http://localhost:9000/api".to_string(),
        port: 3000,
        http_timeout_secs: Some(5),
    };
    let client = PeopleApiClient::from_config(&config).unwrap();
    let _router = handlers::router(Arc::new(AppState::new(config, client)));
}
