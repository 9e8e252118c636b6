//! REST client for the console backend.
//!
//! JSON over HTTP with Bearer auth when the session carries a token. Non-2xx
//! responses surface the backend's structured `detail` field when present;
//! transport failures and unparseable bodies map onto the error taxonomy in
//! [`crate::error`]. No retries and no timeouts beyond transport defaults —
//! failure handling belongs to the screen that triggered the call.

use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::Session;
use crate::error::ApiError;
use crate::stage::Stage;
use crate::types::{
    AnalyticsOverview, Approval, ApprovalDecision, EntityType, FunnelResponse, Lead, PilotKpis,
    PipelineItem, PipelineView, StageChange,
};

pub struct ApiClient {
    client: reqwest::Client,
    session: Session,
}

impl ApiClient {
    pub fn new(session: Session) -> Self {
        Self {
            client: reqwest::Client::new(),
            session,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> Result<url::Url, ApiError> {
        self.session
            .base_url
            .join(path)
            .map_err(|e| ApiError::Network(format!("Invalid request URL {}: {}", path, e)))
    }

    async fn send<T: DeserializeOwned>(
        &self,
        req: reqwest::RequestBuilder,
    ) -> Result<T, ApiError> {
        let req = match &self.session.token {
            Some(token) => req.bearer_auth(token),
            None => req,
        };

        let resp = req
            .send()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(ApiError::Api {
                status: status.as_u16(),
                detail: error_detail(status.as_u16(), &body),
            });
        }

        let body = resp
            .text()
            .await
            .map_err(|e| ApiError::Network(e.to_string()))?;
        serde_json::from_str(&body).map_err(|e| ApiError::Parse(e.to_string()))
    }

    // -----------------------------------------------------------------------
    // Pipeline
    // -----------------------------------------------------------------------

    /// Authoritative pipeline read, server-grouped by stage.
    pub async fn get_pipeline(&self) -> Result<PipelineView, ApiError> {
        let url = self.url("/app/pipeline/")?;
        self.send(self.client.get(url)).await
    }

    /// Move a pipeline item, routed by entity type. The routing rule is part
    /// of the core contract: intakes and matters have distinct PATCH paths.
    pub async fn change_stage(
        &self,
        entity_type: EntityType,
        id: Uuid,
        stage: Stage,
    ) -> Result<PipelineItem, ApiError> {
        match entity_type {
            EntityType::Intake => self.change_intake_stage(id, stage).await,
            EntityType::Matter => self.change_matter_stage(id, stage).await,
        }
    }

    pub async fn change_intake_stage(
        &self,
        intake_id: Uuid,
        stage: Stage,
    ) -> Result<PipelineItem, ApiError> {
        let url = self.url(&format!("/app/pipeline/intake/{}/stage", intake_id))?;
        let body = StageChange {
            stage: stage.as_str().to_string(),
        };
        self.send(self.client.patch(url).json(&body)).await
    }

    pub async fn change_matter_stage(
        &self,
        matter_id: Uuid,
        stage: Stage,
    ) -> Result<PipelineItem, ApiError> {
        let url = self.url(&format!("/app/pipeline/matter/{}/stage", matter_id))?;
        let body = StageChange {
            stage: stage.as_str().to_string(),
        };
        self.send(self.client.patch(url).json(&body)).await
    }

    // -----------------------------------------------------------------------
    // Analytics
    // -----------------------------------------------------------------------

    pub async fn get_funnel(&self, vertical: &str, days: u32) -> Result<FunnelResponse, ApiError> {
        let url = self.url("/app/analytics/funnel")?;
        let req = self
            .client
            .get(url)
            .query(&[("vertical", vertical.to_string()), ("days", days.to_string())]);
        self.send(req).await
    }

    pub async fn get_overview(&self, days: u32) -> Result<AnalyticsOverview, ApiError> {
        let url = self.url("/app/analytics/overview")?;
        let req = self.client.get(url).query(&[("days", days.to_string())]);
        self.send(req).await
    }

    pub async fn get_pilot_kpis(&self, days: u32, sla_hours: u32) -> Result<PilotKpis, ApiError> {
        let url = self.url("/app/analytics/pilot-kpis")?;
        let req = self.client.get(url).query(&[
            ("days", days.to_string()),
            ("sla_hours", sla_hours.to_string()),
        ]);
        self.send(req).await
    }

    // -----------------------------------------------------------------------
    // Approvals
    // -----------------------------------------------------------------------

    /// Queue entries, newest first; `None` returns all statuses.
    pub async fn get_approvals(&self, status: Option<&str>) -> Result<Vec<Approval>, ApiError> {
        let url = self.url("/approvals/")?;
        let mut req = self.client.get(url);
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        self.send(req).await
    }

    pub async fn approve_item(
        &self,
        approval_id: Uuid,
        notes: Option<String>,
    ) -> Result<Approval, ApiError> {
        let url = self.url(&format!("/approvals/{}/approve", approval_id))?;
        self.send(self.client.post(url).json(&ApprovalDecision { notes }))
            .await
    }

    pub async fn reject_item(
        &self,
        approval_id: Uuid,
        notes: Option<String>,
    ) -> Result<Approval, ApiError> {
        let url = self.url(&format!("/approvals/{}/reject", approval_id))?;
        self.send(self.client.post(url).json(&ApprovalDecision { notes }))
            .await
    }

    // -----------------------------------------------------------------------
    // Leads
    // -----------------------------------------------------------------------

    pub async fn get_leads(&self, status: Option<&str>) -> Result<Vec<Lead>, ApiError> {
        let url = self.url("/app/leads")?;
        let mut req = self.client.get(url);
        if let Some(status) = status {
            req = req.query(&[("status", status)]);
        }
        self.send(req).await
    }
}

/// Extract the backend's `detail` message from an error body, falling back
/// to a generic status line when the body isn't the structured shape.
fn error_detail(status: u16, body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|v| {
            v.get("detail")
                .and_then(|d| d.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| format!("API error: {}", status))
}
