use crate::config::Config;
use crate::diagnostics::{default_checks, run_api_checks, DEFAULT_TEST_NAME};
use crate::people_client::PeopleApiClient;
use crate::render;
use crate::session::{self, ContactDraft, LookupSession, SharedSession};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, Redirect},
    routing::{get, post},
    Form, Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::future::Future;
use std::sync::Arc;
use tower::ServiceBuilder;
use tower_http::{limit::RequestBodyLimitLayer, trace::TraceLayer};

/// Upper bound for form posts; a message body is the largest field.
const MAX_FORM_BYTES: usize = 64 * 1024;

/// Shared application state injected into handlers.
pub struct AppState {
    /// Application configuration.
    pub config: Config,
    /// Client for the people lookup backend.
    pub client: PeopleApiClient,
    /// The page state. The lock is never held across a backend call.
    pub session: SharedSession,
}

impl AppState {
    pub fn new(config: Config, client: PeopleApiClient) -> Self {
        Self {
            config,
            client,
            session: SharedSession::new(LookupSession::new()),
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct SearchForm {
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct ApiTesterQuery {
    pub name: Option<String>,
}

/// Builds the router with tracing and body size limits.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/search", post(search))
        .route("/message", post(send_message))
        .route("/analytics/refresh", post(refresh_analytics))
        .route("/connection/check", post(check_connection))
        .route("/api-tester", get(api_tester))
        .route("/api/session", get(session_json))
        .route("/health", get(health))
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES)),
        )
}

/// Initial load run once at startup: analytics, history and the
/// connection probe, fetched concurrently.
pub async fn mount(state: &AppState) {
    session::mount(&state.session, &state.client).await;
}

/// Runs `task` on its own tokio task and waits for it. Dropping the request
/// future does not cancel the task, so every `begin_*` still gets its
/// `finish_*`.
async fn run_to_completion<F>(operation: &'static str, task: F) -> Option<F::Output>
where
    F: Future + Send + 'static,
    F::Output: Send + 'static,
{
    match tokio::spawn(task).await {
        Ok(output) => Some(output),
        Err(e) => {
            tracing::error!("{} task did not complete: {}", operation, e);
            None
        }
    }
}

/// Health check endpoint.
pub async fn health() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "healthy",
            "service": "people-lookup",
            "version": env!("CARGO_PKG_VERSION")
        })),
    )
}

/// GET /
///
/// Renders the lookup page and drains pending notices.
pub async fn index(State(state): State<Arc<AppState>>) -> Html<String> {
    let mut session = state.session.lock().await;
    let notices = session.take_notices();
    Html(render::render_page(
        &session,
        &notices,
        &state.config.api_base_url,
        chrono::Utc::now(),
    ))
}

/// GET /api/session
pub async fn session_json(State(state): State<Arc<AppState>>) -> Json<LookupSession> {
    let session = state.session.lock().await;
    Json(session.clone())
}

/// POST /search
///
/// Runs a lookup, then refreshes analytics when it succeeded. Outcomes are
/// reported as notices on the next render.
pub async fn search(
    State(state): State<Arc<AppState>>,
    Form(form): Form<SearchForm>,
) -> Redirect {
    tracing::info!("POST /search - name: {:?}", form.name);

    let outcome = run_to_completion("search", async move {
        session::search(&state.session, &state.client, &form.name).await
    })
    .await;
    if let Some(Err(e)) = outcome {
        tracing::debug!("Search not completed: {}", e);
    }

    Redirect::to("/")
}

/// POST /message
pub async fn send_message(
    State(state): State<Arc<AppState>>,
    Form(form): Form<ContactDraft>,
) -> Redirect {
    tracing::info!("POST /message");

    let outcome = run_to_completion("send_message", async move {
        session::send_message(&state.session, &state.client, form).await
    })
    .await;
    if let Some(Err(e)) = outcome {
        tracing::debug!("Message not sent: {}", e);
    }

    Redirect::to("/")
}

/// POST /analytics/refresh
pub async fn refresh_analytics(State(state): State<Arc<AppState>>) -> Redirect {
    run_to_completion("refresh_analytics", async move {
        session::refresh_analytics(&state.session, &state.client).await
    })
    .await;
    Redirect::to("/")
}

/// POST /connection/check
pub async fn check_connection(State(state): State<Arc<AppState>>) -> Redirect {
    run_to_completion("check_connection", async move {
        session::check_connection(&state.session, &state.client).await
    })
    .await;
    Redirect::to("/")
}

/// GET /api-tester?name=...
///
/// Runs the canned endpoint checks against the backend and renders results.
pub async fn api_tester(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ApiTesterQuery>,
) -> Html<String> {
    let test_name = query
        .name
        .map(|n| n.trim().to_string())
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| DEFAULT_TEST_NAME.to_string());

    let results = run_api_checks(&state.client, default_checks(&test_name)).await;
    Html(render::render_api_tester(&test_name, &results))
}
