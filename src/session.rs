//! Page-scoped state and the orchestration steps that update it.
//!
//! [`LookupSession`] is the single owner of everything the UI displays: the
//! current profile, the contact draft, the session search counter, the
//! analytics snapshot, the communication history and the connection status.
//! Each orchestration step is a `begin_*`/`finish_*` pair that mutates state
//! around a network call. The free `async fn`s below run both halves against
//! a [`SharedSession`], taking the lock only around the state changes so the
//! session stays readable while a call is in flight.
//!
//! A superseded search that resolves late still overwrites the profile;
//! in-flight calls are never cancelled.

use crate::errors::AppError;
use crate::models::{
    AnalyticsSnapshot, CommunicationRecord, CommunicationSummary, ConnectionStatus,
    MessageRequest, Profile,
};
use crate::people_client::PeopleApiClient;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

/// Page state shared between request handlers.
pub type SharedSession = Mutex<LookupSession>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NoticeLevel {
    Success,
    Error,
}

/// A user-visible outcome message, shown once.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Notice {
    pub level: NoticeLevel,
    pub text: String,
}

/// Editable contact fields and message text. Lives only in the session;
/// the profile itself is never modified.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ContactDraft {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

impl ContactDraft {
    fn from_profile(profile: &Profile) -> Self {
        Self {
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            message: String::new(),
        }
    }
}

/// A validated message ready to be sent.
#[derive(Debug, Clone, PartialEq)]
pub struct OutgoingMessage {
    /// Display name of the recipient at send time.
    pub recipient: String,
    pub request: MessageRequest,
}

/// Result of one analytics load: both reads, fetched independently.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnalyticsRefresh {
    pub snapshot: AnalyticsSnapshot,
    pub communications: Vec<CommunicationRecord>,
}

/// Fetches the analytics snapshot and the communication history
/// concurrently. Neither read can fail the other.
pub async fn load_analytics(client: &PeopleApiClient) -> AnalyticsRefresh {
    let (snapshot, communications) =
        tokio::join!(client.get_analytics(), client.get_communications());
    tracing::debug!(
        "Analytics loaded: {} total searches, {} communications",
        snapshot.total_searches,
        communications.len()
    );
    AnalyticsRefresh {
        snapshot,
        communications,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LookupSession {
    /// Profile currently displayed.
    pub profile: Option<Profile>,
    pub draft: ContactDraft,
    /// Successful searches in this session.
    pub search_count: u64,
    /// Lookups started but not yet finished.
    pub searches_in_flight: usize,
    pub is_sending: bool,
    pub is_refreshing: bool,
    pub analytics: AnalyticsSnapshot,
    pub communications: Vec<CommunicationRecord>,
    pub connection: ConnectionStatus,
    pub started_at: DateTime<Utc>,
    pub last_search_at: Option<DateTime<Utc>>,
    /// Pending notices, drained by the next render.
    pub notices: Vec<Notice>,
}

impl Default for LookupSession {
    fn default() -> Self {
        Self::new()
    }
}

impl LookupSession {
    pub fn new() -> Self {
        Self {
            profile: None,
            draft: ContactDraft::default(),
            search_count: 0,
            searches_in_flight: 0,
            is_sending: false,
            is_refreshing: false,
            analytics: AnalyticsSnapshot::default(),
            communications: Vec::new(),
            connection: ConnectionStatus::Unknown,
            started_at: Utc::now(),
            last_search_at: None,
            notices: Vec::new(),
        }
    }

    // ============ Notices ============

    pub fn push_notice(&mut self, level: NoticeLevel, text: impl Into<String>) {
        self.notices.push(Notice {
            level,
            text: text.into(),
        });
    }

    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    /// Client-side rejection: queued as a notice, returned as `BadRequest`.
    fn reject(&mut self, reason: &str) -> AppError {
        self.push_notice(NoticeLevel::Error, reason);
        AppError::BadRequest(reason.to_string())
    }

    // ============ Search ============

    /// Validates the name and marks a search as in flight.
    ///
    /// # Returns
    ///
    /// * `Result<String, AppError>` - The trimmed name to look up, or
    ///   `BadRequest` for a blank name (no network call should follow).
    pub fn begin_search(&mut self, name: &str) -> Result<String, AppError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(self.reject("Please enter a name to search"));
        }
        self.searches_in_flight += 1;
        Ok(name.to_string())
    }

    pub fn is_searching(&self) -> bool {
        self.searches_in_flight > 0
    }

    /// Applies a lookup outcome. Only a success touches the profile, the
    /// draft and the counter. Always ends this search's loading state.
    pub fn finish_search(&mut self, result: Result<Profile, AppError>) -> Result<(), AppError> {
        self.searches_in_flight = self.searches_in_flight.saturating_sub(1);
        match result {
            Ok(profile) => {
                tracing::info!("Displaying profile {} ({})", profile.name, profile.id);
                self.push_notice(NoticeLevel::Success, format!("Found {}", profile.name));
                self.draft = ContactDraft::from_profile(&profile);
                self.profile = Some(profile);
                self.search_count += 1;
                self.last_search_at = Some(Utc::now());
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Search failed: {}", err);
                self.push_notice(NoticeLevel::Error, format!("Search failed: {}", err));
                Err(err)
            }
        }
    }

    // ============ Messaging ============

    /// Stores the edited form fields and builds the outgoing message.
    ///
    /// Rejects a blank message body, or a send with no profile displayed,
    /// before any network call.
    pub fn begin_send(&mut self, form: ContactDraft) -> Result<OutgoingMessage, AppError> {
        self.draft = form;

        if self.draft.message.trim().is_empty() {
            return Err(self.reject("Message cannot be empty"));
        }
        let (profile_id, recipient) = match &self.profile {
            Some(profile) => (profile.id.clone(), profile.name.clone()),
            None => return Err(self.reject("Search for a person before sending a message")),
        };

        let outgoing = OutgoingMessage {
            recipient,
            request: MessageRequest {
                profile_id,
                email: self.draft.email.clone(),
                phone: self.draft.phone.clone(),
                message: self.draft.message.clone(),
            },
        };
        self.is_sending = true;
        Ok(outgoing)
    }

    /// Applies a send outcome. The message text is cleared only on success.
    pub fn finish_send(
        &mut self,
        outgoing: &OutgoingMessage,
        result: Result<Option<String>, AppError>,
    ) -> Result<(), AppError> {
        self.is_sending = false;
        match result {
            Ok(message_id) => {
                let text = match message_id {
                    Some(id) => format!("Message sent to {}! (id: {})", outgoing.recipient, id),
                    None => format!("Message sent to {}!", outgoing.recipient),
                };
                self.push_notice(NoticeLevel::Success, text);
                if self.draft.message == outgoing.request.message {
                    self.draft.message.clear();
                }
                Ok(())
            }
            Err(err) => {
                tracing::warn!("Send to {} failed: {}", outgoing.recipient, err);
                self.push_notice(
                    NoticeLevel::Error,
                    format!("Failed to send message: {}", err),
                );
                Err(err)
            }
        }
    }

    // ============ Analytics ============

    pub fn begin_refresh(&mut self) {
        self.is_refreshing = true;
    }

    /// Replaces both analytics views wholesale.
    pub fn apply_analytics(&mut self, refresh: AnalyticsRefresh) {
        self.analytics = refresh.snapshot;
        self.communications = refresh.communications;
        self.is_refreshing = false;
    }

    pub fn communication_summary(&self) -> CommunicationSummary {
        CommunicationSummary::from_records(&self.communications)
    }

    /// "Just now" once a search has succeeded in this session.
    pub fn last_search_label(&self) -> &'static str {
        if self.search_count > 0 {
            "Just now"
        } else {
            "None"
        }
    }

    // ============ Connection probe ============

    pub fn begin_connection_check(&mut self) {
        self.connection = ConnectionStatus::Checking;
    }

    pub fn finish_connection_check(&mut self, status: ConnectionStatus) {
        tracing::info!("Backend connection: {}", status.label());
        self.connection = status;
    }
}

// ============ Orchestration ============

/// Looks up `name`, and on success refreshes the analytics.
pub async fn search(
    session: &SharedSession,
    client: &PeopleApiClient,
    name: &str,
) -> Result<(), AppError> {
    let name = session.lock().await.begin_search(name)?;
    let result = client.search_person(&name).await;
    session.lock().await.finish_search(result)?;
    refresh_analytics(session, client).await;
    Ok(())
}

/// Sends the drafted message to the displayed profile.
pub async fn send_message(
    session: &SharedSession,
    client: &PeopleApiClient,
    form: ContactDraft,
) -> Result<(), AppError> {
    let outgoing = session.lock().await.begin_send(form)?;
    let result = client.send_message(&outgoing.request).await;
    session.lock().await.finish_send(&outgoing, result)
}

pub async fn refresh_analytics(session: &SharedSession, client: &PeopleApiClient) {
    session.lock().await.begin_refresh();
    let refresh = load_analytics(client).await;
    session.lock().await.apply_analytics(refresh);
}

pub async fn check_connection(session: &SharedSession, client: &PeopleApiClient) {
    session.lock().await.begin_connection_check();
    let status = client.check_connection().await;
    session.lock().await.finish_connection_check(status);
}

/// Initial load: analytics, history and the connection probe, all
/// concurrently.
pub async fn mount(session: &SharedSession, client: &PeopleApiClient) {
    {
        let mut state = session.lock().await;
        state.begin_refresh();
        state.begin_connection_check();
    }
    let (refresh, status) = tokio::join!(load_analytics(client), client.check_connection());
    let mut state = session.lock().await;
    state.apply_analytics(refresh);
    state.finish_connection_check(status);
}
