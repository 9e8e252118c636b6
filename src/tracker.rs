//! Lightweight product event tracker.
//!
//! Fires events to `POST /events/track` with a persistent anonymous id and a
//! per-process session id. Silent failure throughout — tracking must never
//! block or fail the operation that triggered it, so errors are logged at
//! debug level and swallowed.

use std::fs;
use std::path::Path;

use uuid::Uuid;

use crate::config::Session;

/// Event tracker bound to one backend.
pub struct Tracker {
    client: reqwest::Client,
    /// `None` when the configured base URL cannot carry a path
    /// (cannot-be-a-base, e.g. `mailto:`); the tracker is then disabled.
    endpoint: Option<url::Url>,
    anonymous_id: Uuid,
    session_id: Uuid,
}

impl Tracker {
    /// Build a tracker for this session. The anonymous id persists across
    /// processes under `~/.legalops/anonymous_id`; the session id is fresh.
    pub fn new(session: &Session) -> Self {
        let endpoint = session.base_url.join("/events/track").ok();
        if endpoint.is_none() {
            log::debug!("tracking disabled: base URL {} cannot carry a path", session.base_url);
        }
        Self {
            client: reqwest::Client::new(),
            endpoint,
            anonymous_id: persistent_anonymous_id(),
            session_id: Uuid::new_v4(),
        }
    }

    pub fn anonymous_id(&self) -> Uuid {
        self.anonymous_id
    }

    pub fn is_enabled(&self) -> bool {
        self.endpoint.is_some()
    }

    /// Fire an event. Never returns an error.
    pub async fn track(&self, name: &str, properties: serde_json::Value) {
        let Some(endpoint) = &self.endpoint else {
            return;
        };
        let payload = self.build_payload(name, properties);
        if let Err(e) = self.client.post(endpoint.clone()).json(&payload).send().await {
            log::debug!("event track {:?} dropped: {}", name, e);
        }
    }

    /// Convenience for the per-screen page-view event.
    pub async fn page_view(&self, page: &str) {
        self.track("page_view", serde_json::json!({ "page": page }))
            .await;
    }

    fn build_payload(&self, name: &str, properties: serde_json::Value) -> serde_json::Value {
        serde_json::json!({
            "anonymous_id": self.anonymous_id,
            "session_id": self.session_id,
            "name": name,
            "properties": properties,
        })
    }
}

fn persistent_anonymous_id() -> Uuid {
    let path = dirs::home_dir().map(|h| h.join(".legalops").join("anonymous_id"));
    match path {
        Some(path) => read_or_create_id(&path),
        None => Uuid::new_v4(),
    }
}

/// Read the stored id, or mint and store one. Any filesystem trouble falls
/// back to an ephemeral id — same posture as the tracker itself.
fn read_or_create_id(path: &Path) -> Uuid {
    if let Ok(content) = fs::read_to_string(path) {
        if let Ok(id) = content.trim().parse::<Uuid>() {
            return id;
        }
    }

    let id = Uuid::new_v4();
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(e) = fs::write(path, id.to_string()) {
        log::debug!("could not persist anonymous id: {}", e);
    }
    id
}
