//! Server-rendered HTML views.
//!
//! Every view is a pure function of session state, so a render never
//! touches the network. All dynamic text goes through [`html_escape`].

use crate::diagnostics::ApiCheckResult;
use crate::models::{CommunicationSummary, ConnectionStatus, Profile};
use crate::session::{ContactDraft, LookupSession, Notice, NoticeLevel};
use chrono::{DateTime, Utc};

const STYLE: &str = r#"
body { font-family: system-ui, sans-serif; margin: 0; background: linear-gradient(135deg, #eff6ff, #e0e7ff); color: #111827; }
main { max-width: 72rem; margin: 0 auto; padding: 1rem; display: grid; grid-template-columns: 2fr 1fr; gap: 2rem; }
header { text-align: center; padding: 2rem 0 1rem; }
.card { background: #fff; border-radius: 0.75rem; padding: 1.25rem; margin-bottom: 1.5rem; box-shadow: 0 1px 3px rgba(0,0,0,0.1); }
.badge { display: inline-block; padding: 0.1rem 0.5rem; border-radius: 999px; font-size: 0.8rem; background: #e0e7ff; margin: 0.15rem; }
.notice { padding: 0.75rem 1rem; border-radius: 0.5rem; margin: 0.5rem auto; max-width: 72rem; }
.notice.success { background: #dcfce7; color: #166534; }
.notice.error { background: #fee2e2; color: #991b1b; }
.connected { background: #dcfce7; color: #15803d; }
.disconnected { background: #fee2e2; color: #b91c1c; }
.checking { background: #f3f4f6; color: #374151; }
.avatar { width: 4rem; height: 4rem; border-radius: 50%; background: #c7d2fe; display: inline-flex; align-items: center; justify-content: center; font-weight: bold; }
input, textarea { width: 100%; padding: 0.5rem; box-sizing: border-box; margin-bottom: 0.5rem; }
pre { background: #f9fafb; padding: 0.5rem; overflow-x: auto; font-size: 0.8rem; }
"#;

pub fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#39;")
}

fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
    <style>{}</style>
</head>
<body>
{}
</body>
</html>
"#,
        html_escape(title),
        STYLE,
        body
    )
}

/// Full lookup page. `notices` are the ones drained for this render.
pub fn render_page(
    session: &LookupSession,
    notices: &[Notice],
    api_base_url: &str,
    now: DateTime<Utc>,
) -> String {
    let profile_card = session
        .profile
        .as_ref()
        .map(|p| render_profile(p, &session.draft, session.is_sending))
        .unwrap_or_default();

    let body = format!(
        r#"<header>
    <h1>Smart People Lookup Tool</h1>
    <p>Find and connect with professionals instantly</p>
</header>
{}
<main>
    <section>
        {}
        {}
    </section>
    <aside>
        {}
        {}
        {}
    </aside>
</main>"#,
        render_notices(notices),
        render_search(session.is_searching()),
        profile_card,
        render_connection(session.connection, api_base_url),
        render_analytics(session, now),
        render_communications(&session.communication_summary(), session.is_refreshing),
    );

    layout("Smart People Lookup Tool", &body)
}

pub fn render_notices(notices: &[Notice]) -> String {
    notices
        .iter()
        .map(|n| {
            let class = match n.level {
                NoticeLevel::Success => "success",
                NoticeLevel::Error => "error",
            };
            format!(
                r#"<div class="notice {}" role="status">{}</div>"#,
                class,
                html_escape(&n.text)
            )
        })
        .collect()
}

pub fn render_search(is_searching: bool) -> String {
    let (disabled, label) = if is_searching {
        (" disabled", "Searching...")
    } else {
        ("", "Search")
    };
    format!(
        r#"<div class="card">
    <h2>Search People</h2>
    <form method="post" action="/search">
        <input type="text" name="name" placeholder="Enter person's name..." required{0}>
        <button type="submit"{0}>{1}</button>
    </form>
</div>"#,
        disabled, label
    )
}

pub fn render_profile(profile: &Profile, draft: &ContactDraft, is_sending: bool) -> String {
    let avatar = if profile.profile_pic.is_empty() {
        format!(
            r#"<span class="avatar">{}</span>"#,
            html_escape(&profile.initials())
        )
    } else {
        format!(
            r#"<img class="avatar" src="{}" alt="{}">"#,
            html_escape(&profile.profile_pic),
            html_escape(&profile.name)
        )
    };

    let insights: String = profile
        .ai_insights
        .iter()
        .map(|i| format!(r#"<span class="badge">{}</span>"#, html_escape(i)))
        .collect();

    let mut extras = String::new();
    if let Some(location) = &profile.location {
        extras.push_str(&format!("<p>📍 {}</p>", html_escape(location)));
    }
    if let Some(linkedin) = &profile.linkedin {
        extras.push_str(&format!(
            r#"<p><a href="{0}" rel="noopener noreferrer">{0}</a></p>"#,
            html_escape(linkedin)
        ));
    }

    let send_label = if is_sending { "Sending..." } else { "Send Message" };

    format!(
        r#"<div class="card" id="profile">
    <h2>Profile Information</h2>
    <div>
        {}
        <h3>{}</h3>
        <p>{}</p>
        <p>🏢 {}</p>
        {}
    </div>
    <h4>AI Insights</h4>
    <div>{}</div>
    <form method="post" action="/message">
        <label>Email<input type="email" name="email" value="{}" placeholder="Enter email address"></label>
        <label>Phone<input type="tel" name="phone" value="{}" placeholder="Enter phone number"></label>
        <label>Message<textarea name="message" rows="4" placeholder="Type your message here...">{}</textarea></label>
        <button type="submit"{}>{}</button>
    </form>
</div>"#,
        avatar,
        html_escape(&profile.name),
        html_escape(&profile.title),
        html_escape(&profile.company),
        extras,
        insights,
        html_escape(&draft.email),
        html_escape(&draft.phone),
        html_escape(&draft.message),
        if is_sending { " disabled" } else { "" },
        send_label,
    )
}

pub fn render_connection(status: ConnectionStatus, api_base_url: &str) -> String {
    let class = match status {
        ConnectionStatus::Connected => "connected",
        ConnectionStatus::Disconnected => "disconnected",
        ConnectionStatus::Unknown | ConnectionStatus::Checking => "checking",
    };
    format!(
        r#"<div class="card">
    <p>Backend: <code>{}</code></p>
    <span class="badge {}">{}</span>
    <form method="post" action="/connection/check" style="display:inline">
        <button type="submit">Recheck</button>
    </form>
</div>"#,
        html_escape(api_base_url),
        class,
        status.label()
    )
}

pub fn render_analytics(session: &LookupSession, now: DateTime<Utc>) -> String {
    format!(
        r#"<div class="card">
    <h2>Search Analytics</h2>
    <form method="post" action="/analytics/refresh"><button type="submit">Refresh</button></form>
    <p><strong>{}</strong> total searches</p>
    <p>Success rate: {:.1}%</p>
    <p>This session: <span class="badge">{}</span></p>
    <p>Last search: <span class="badge">{}</span></p>
</div>
<div class="card">
    <h3>Session Info</h3>
    <p>Date: {}</p>
    <p>Time: {}</p>
    <p>Started: {}</p>
    <p>Status: {}</p>
</div>"#,
        session.analytics.total_searches,
        session.analytics.success_rate_percent(),
        session.search_count,
        session.last_search_label(),
        now.format("%Y-%m-%d"),
        now.format("%H:%M:%S UTC"),
        session.started_at.format("%Y-%m-%d %H:%M:%S UTC"),
        if session.is_searching() { "Searching" } else { "Active" },
    )
}

pub fn render_communications(summary: &CommunicationSummary, is_refreshing: bool) -> String {
    let heading = if is_refreshing {
        "Communication Stats (refreshing...)"
    } else {
        "Communication Stats"
    };

    let list = if summary.recent.is_empty() {
        r#"<p>No communications yet</p><p><small>Messages will appear here once sent</small></p>"#
            .to_string()
    } else {
        let items: String = summary
            .recent
            .iter()
            .map(|c| {
                format!(
                    r#"<li>
        <strong>{}</strong> <span class="badge">ID: {}</span><br>
        ✉ {} · ☎ {}<br>
        <em>{}</em><br>
        <small>Mode: {} · Sent: {}</small>
    </li>"#,
                    html_escape(c.name.as_deref().unwrap_or("Unknown")),
                    c.id,
                    html_escape(&c.email),
                    html_escape(&c.phone),
                    html_escape(&c.message),
                    html_escape(c.mode.as_deref().unwrap_or("N/A")),
                    html_escape(c.sent_at.as_deref().unwrap_or("Pending")),
                )
            })
            .collect();
        let more = if summary.is_truncated() {
            format!(
                r#"<p><span class="badge">Showing {} of {} messages</span></p>"#,
                summary.recent.len(),
                summary.total_messages
            )
        } else {
            String::new()
        };
        format!("<h4>Recent Communications</h4><ul>{}</ul>{}", items, more)
    };

    format!(
        r#"<div class="card">
    <h2>{}</h2>
    <p><strong>{}</strong> Total Messages · <strong>{}</strong> Unique Contacts</p>
    {}
</div>"#,
        heading, summary.total_messages, summary.unique_contacts, list
    )
}

/// API tester page: the name form plus one card per check result.
pub fn render_api_tester(test_name: &str, results: &[ApiCheckResult]) -> String {
    let cards: String = results
        .iter()
        .map(|r| {
            let status = r
                .status
                .map(|s| s.to_string())
                .unwrap_or_else(|| "Error".to_string());
            let timing = r
                .response_time_ms
                .map(|ms| format!(r#"<span class="badge">{}ms</span>"#, ms))
                .unwrap_or_default();
            let error = r
                .error
                .as_ref()
                .map(|e| format!(r#"<p class="disconnected">{}</p>"#, html_escape(e)))
                .unwrap_or_default();
            let data = r
                .data
                .as_ref()
                .and_then(|d| serde_json::to_string_pretty(d).ok())
                .map(|d| format!("<pre>{}</pre>", html_escape(&d)))
                .unwrap_or_default();
            format!(
                r#"<div class="card">
    <strong>{}</strong> {} <span class="badge {}">{}</span> {}
    <p><code>{} {}</code></p>
    {}{}
</div>"#,
                html_escape(&r.name),
                if r.success { "✓" } else { "✗" },
                if r.success { "connected" } else { "disconnected" },
                status,
                timing,
                html_escape(&r.method),
                html_escape(&r.endpoint),
                error,
                data
            )
        })
        .collect();

    let body = format!(
        r#"<header><h1>API Tester</h1><p><a href="/">Back to lookup</a></p></header>
<div style="max-width: 48rem; margin: 0 auto;">
    <div class="card">
        <form method="get" action="/api-tester">
            <input type="text" name="name" value="{}" placeholder="Test name for search">
            <button type="submit">Test API</button>
        </form>
    </div>
    {}
</div>"#,
        html_escape(test_name),
        cards
    );

    layout("API Tester", &body)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::CommunicationRecord;

    fn profile() -> Profile {
        Profile {
            id: "abc".to_string(),
            name: "John <b>Smith</b>".to_string(),
            profile_pic: String::new(),
            ai_insights: vec!["Strong background in product development".to_string()],
            email: "john@example.com".to_string(),
            phone: "+1 555".to_string(),
            title: "CTO".to_string(),
            company: "Acme & Sons".to_string(),
            linkedin: None,
            location: Some("Lisbon".to_string()),
        }
    }

    #[test]
    fn test_html_escape() {
        assert_eq!(
            html_escape(r#"<a href="x">&'"#),
            "&lt;a href=&quot;x&quot;&gt;&amp;&#39;"
        );
    }

    #[test]
    fn test_profile_card_escapes_and_shows_insights() {
        let html = render_profile(&profile(), &ContactDraft::default(), false);
        assert!(html.contains("John &lt;b&gt;Smith&lt;/b&gt;"));
        assert!(html.contains("Acme &amp; Sons"));
        assert!(html.contains("Strong background in product development"));
        assert!(html.contains("Lisbon"));
        assert!(html.contains("Send Message"));
    }

    #[test]
    fn test_search_form_disabled_while_searching() {
        assert!(render_search(true).contains("Searching..."));
        assert!(!render_search(false).contains("disabled"));
    }

    #[test]
    fn test_empty_communications() {
        let html = render_communications(&CommunicationSummary::from_records(&[]), false);
        assert!(html.contains("No communications yet"));
    }

    #[test]
    fn test_communications_fallback_labels() {
        let records: Vec<_> = (1..=4)
            .map(|id| CommunicationRecord {
                id,
                name: None,
                email: format!("c{}@example.com", id),
                phone: "1".to_string(),
                message: "hello".to_string(),
                mode: None,
                sent_at: None,
            })
            .collect();
        let html = render_communications(&CommunicationSummary::from_records(&records), false);
        assert!(html.contains("Unknown"));
        assert!(html.contains("Mode: N/A"));
        assert!(html.contains("Sent: Pending"));
        assert!(html.contains("Showing 3 of 4 messages"));
    }

    #[test]
    fn test_page_drains_given_notices() {
        let session = LookupSession::new();
        let notices = vec![Notice {
            level: NoticeLevel::Error,
            text: "Search failed: not found".to_string(),
        }];
        let html = render_page(&session, &notices, "http://localhost/api", Utc::now());
        assert!(html.contains("Search failed: not found"));
        assert!(html.contains("Checking..."));
        assert!(!html.contains("Profile Information"));
    }
}
