use serde::{Deserialize, Serialize};
use std::collections::HashSet;

// ============ Backend Models ============

/// A looked-up person as returned by `POST /person-info`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    /// Backend identifier, passed back as `profileId` when messaging.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Reference to the profile picture.
    #[serde(default)]
    pub profile_pic: String,
    /// AI-generated insight fragments.
    #[serde(default)]
    pub ai_insights: Vec<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    /// Job title.
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub company: String,
    /// Social profile link.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub linkedin: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub location: Option<String>,
}

impl Profile {
    /// First letter of each whitespace-separated part of the name.
    pub fn initials(&self) -> String {
        self.name
            .split_whitespace()
            .filter_map(|part| part.chars().next())
            .collect()
    }
}

/// Request body for `POST /person-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchRequest {
    pub name: String,
}

/// Envelope returned by `POST /person-info`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResponse {
    pub success: bool,
    #[serde(default)]
    pub data: Option<Profile>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Request body for `POST /send-message`. Built at send time, never stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageRequest {
    pub profile_id: String,
    pub email: String,
    pub phone: String,
    pub message: String,
}

/// Envelope returned by `POST /send-message`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MessageResponse {
    pub success: bool,
    #[serde(default)]
    pub message_id: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Aggregate counters returned by `GET /analytics`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsSnapshot {
    #[serde(default)]
    pub total_searches: u64,
    /// Ratio in `0.0..=1.0`.
    #[serde(default)]
    pub success_rate: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_search_time: Option<String>,
}

impl AnalyticsSnapshot {
    pub fn success_rate_percent(&self) -> f64 {
        self.success_rate * 100.0
    }
}

/// One entry of the `GET /reports` history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CommunicationRecord {
    pub id: i64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub message: String,
    /// Delivery mode (email, sms, ...).
    #[serde(default)]
    pub mode: Option<String>,
    #[serde(default)]
    pub sent_at: Option<String>,
}

// ============ Presentation Models ============

/// Backend reachability as shown in the UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    /// No probe has run yet.
    #[default]
    Unknown,
    Checking,
    Connected,
    Disconnected,
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Unknown | ConnectionStatus::Checking => "Checking...",
            ConnectionStatus::Connected => "Connected",
            ConnectionStatus::Disconnected => "Disconnected",
        }
    }
}

/// Number of records shown in the "recent communications" list.
pub const RECENT_COMMUNICATIONS: usize = 3;

/// Derived counters for the communications widget.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CommunicationSummary {
    pub total_messages: usize,
    /// Distinct email addresses across all records.
    pub unique_contacts: usize,
    /// The last few records, newest first.
    pub recent: Vec<CommunicationRecord>,
}

impl CommunicationSummary {
    pub fn from_records(records: &[CommunicationRecord]) -> Self {
        let unique_contacts = records
            .iter()
            .map(|r| r.email.as_str())
            .collect::<HashSet<_>>()
            .len();
        let start = records.len().saturating_sub(RECENT_COMMUNICATIONS);
        let recent = records[start..].iter().rev().cloned().collect();

        Self {
            total_messages: records.len(),
            unique_contacts,
            recent,
        }
    }

    /// True when the recent list is a truncated view of the history.
    pub fn is_truncated(&self) -> bool {
        self.total_messages > self.recent.len()
    }
}
