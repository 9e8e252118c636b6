//! Wire contracts for the console backend.
//!
//! Every endpoint the console consumes deserializes into one of these shapes
//! at the boundary, so a malformed server response fails fast with a typed
//! error instead of leaking untyped values into a screen. Response-only
//! fields are tolerant (`#[serde(default)]`) where the backend is known to
//! omit them.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Display threshold above which an item is flagged urgent on the kanban card.
pub const URGENCY_FLAG_THRESHOLD: i64 = 50;

/// Days in a stage after which a card is flagged as stalled.
pub const STALLED_DAYS_THRESHOLD: u32 = 3;

/// Which mutation endpoint applies to a pipeline item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Intake,
    Matter,
}

impl EntityType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Intake => "intake",
            Self::Matter => "matter",
        }
    }
}

/// A unit of work (intake submission or opened matter) tracked through the
/// pipeline stage sequence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineItem {
    pub id: Uuid,
    pub entity_type: EntityType,
    /// Stage key as the server sent it. Classified (and possibly rejected)
    /// by the stage engine, never trusted to be a valid member here.
    pub pipeline_stage: String,
    /// Case vertical (`mx_divorce`, `immigration`, ...).
    #[serde(rename = "type", default)]
    pub case_type: Option<String>,
    #[serde(default)]
    pub client_name: Option<String>,
    /// 0–100 by contract; only the display threshold is interpreted here.
    #[serde(default)]
    pub urgency_score: i64,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub intake_id: Option<Uuid>,
    #[serde(default)]
    pub matter_id: Option<Uuid>,
    /// Server-computed elapsed days since the last stage transition.
    #[serde(default)]
    pub days_in_stage: u32,
    #[serde(default)]
    pub next_action: Option<String>,
}

impl PipelineItem {
    /// Urgency badge shown only above the display threshold.
    pub fn is_urgent(&self) -> bool {
        self.urgency_score > URGENCY_FLAG_THRESHOLD
    }

    /// Cards sitting in a stage for too long get flagged for attention.
    pub fn is_stalled(&self) -> bool {
        self.days_in_stage > STALLED_DAYS_THRESHOLD
    }
}

/// Server-grouped pipeline read (`GET /app/pipeline/`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PipelineView {
    #[serde(default)]
    pub stages: HashMap<String, Vec<PipelineItem>>,
    #[serde(default)]
    pub stage_counts: HashMap<String, u64>,
}

impl PipelineView {
    /// Flatten the server grouping back into a single list. Grouping is
    /// redone locally by the stage engine, which is the authority for
    /// column order and the unknown bucket.
    pub fn into_items(self) -> Vec<PipelineItem> {
        let mut items: Vec<PipelineItem> = Vec::new();
        // Deterministic flatten order: sort server buckets by key. Relative
        // order within a bucket is preserved as received.
        let mut buckets: Vec<(String, Vec<PipelineItem>)> = self.stages.into_iter().collect();
        buckets.sort_by(|(a, _), (b, _)| a.cmp(b));
        for (_, bucket) in buckets {
            items.extend(bucket);
        }
        items
    }
}

/// PATCH body for a stage move.
#[derive(Debug, Clone, Serialize)]
pub struct StageChange {
    pub stage: String,
}

/// One named point in a conversion sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FunnelStep {
    pub name: String,
    pub count: u64,
    /// Percentage precomputed upstream. When absent, derived locally as a
    /// fallback — never overwritten when present.
    #[serde(default)]
    pub conversion_from_previous: Option<f64>,
}

/// `GET /app/analytics/funnel` response.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FunnelResponse {
    #[serde(default)]
    pub vertical: String,
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub steps: Vec<FunnelStep>,
}

/// Flat KPI block (`GET /app/analytics/overview`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalyticsOverview {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub intakes_total: u64,
    #[serde(default)]
    pub matters_total: u64,
    #[serde(default)]
    pub approvals_pending: u64,
    #[serde(default)]
    pub approvals_approved: u64,
    #[serde(default)]
    pub approvals_rejected: u64,
    #[serde(default)]
    pub time_to_approve_median_hours: Option<f64>,
    #[serde(default)]
    pub leads_total: u64,
    #[serde(default)]
    pub events_total: u64,
}

/// Pilot-readiness KPIs (`GET /app/analytics/pilot-kpis`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PilotKpis {
    #[serde(default)]
    pub period: String,
    #[serde(default)]
    pub time_to_first_response_median_hours: Option<f64>,
    #[serde(default)]
    pub time_to_approval_median_hours: Option<f64>,
    #[serde(default)]
    pub doc_completeness_72h_pct: Option<f64>,
    #[serde(default)]
    pub consult_scheduled_count: u64,
    #[serde(default)]
    pub pipeline_stage_distribution: HashMap<String, u64>,
    #[serde(default)]
    pub sla_breaches: u64,
}

/// An inbound B2C/B2B lead (`GET /app/leads`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Lead {
    pub id: Uuid,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    pub source_type: String,
    #[serde(default)]
    pub vertical: Option<String>,
    pub status: String,
    /// Free-form contact payload; name resolution lives in the leads service.
    #[serde(default)]
    pub contact_json: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// A human-gate entry over an agent output or message draft
/// (`GET /approvals/`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Approval {
    pub id: Uuid,
    #[serde(default)]
    pub tenant_id: Option<Uuid>,
    #[serde(default)]
    pub matter_id: Option<Uuid>,
    /// `agent_run` or `message_draft`; the vocabulary is the backend's.
    pub object_type: String,
    pub object_id: Uuid,
    /// `pending`, `approved`, or `rejected`.
    pub status: String,
    #[serde(default)]
    pub requested_by: Option<Uuid>,
    #[serde(default)]
    pub decided_by: Option<Uuid>,
    #[serde(default)]
    pub decided_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Approval {
    /// Only pending entries accept a decision; the backend 400s otherwise.
    pub fn is_pending(&self) -> bool {
        self.status == "pending"
    }
}

/// POST body for an approve/reject decision.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ApprovalDecision {
    pub notes: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pipeline_view_parses_backend_shape() {
        let raw = r#"{
            "stages": {
                "new_lead": [{
                    "id": "7f4df2c9-49d3-4bb3-9d34-3e61c2dc1f5d",
                    "entity_type": "intake",
                    "pipeline_stage": "new_lead",
                    "type": "mx_divorce",
                    "client_name": "Ana Torres",
                    "urgency_score": 0,
                    "created_at": "2026-08-20T14:02:00Z",
                    "intake_id": "7f4df2c9-49d3-4bb3-9d34-3e61c2dc1f5d",
                    "days_in_stage": 5,
                    "next_action": "Revisar lead y contactar"
                }],
                "closed": []
            },
            "stage_counts": {"new_lead": 1, "closed": 0}
        }"#;

        let view: PipelineView = serde_json::from_str(raw).expect("parse");
        assert_eq!(view.stage_counts["new_lead"], 1);
        let item = &view.stages["new_lead"][0];
        assert_eq!(item.entity_type, EntityType::Intake);
        assert_eq!(item.case_type.as_deref(), Some("mx_divorce"));
        assert!(!item.is_urgent());
        assert!(item.is_stalled());
    }

    #[test]
    fn funnel_response_tolerates_missing_conversion() {
        let raw = r#"{
            "vertical": "immigration",
            "period": "30d",
            "steps": [
                {"name": "Intakes Submitted", "count": 100},
                {"name": "Converted to Matter", "count": 40, "conversion_from_previous": 40.0}
            ]
        }"#;

        let funnel: FunnelResponse = serde_json::from_str(raw).expect("parse");
        assert_eq!(funnel.steps[0].conversion_from_previous, None);
        assert_eq!(funnel.steps[1].conversion_from_previous, Some(40.0));
    }

    #[test]
    fn approval_parses_undecided_entry() {
        let raw = r#"{
            "id": "7f4df2c9-49d3-4bb3-9d34-3e61c2dc1f5d",
            "tenant_id": "0e2f7f1a-1111-4222-8333-444455556666",
            "matter_id": null,
            "object_type": "message_draft",
            "object_id": "9a8b7c6d-5e4f-4a3b-9c2d-1e0f9a8b7c6d",
            "status": "pending",
            "requested_by": null,
            "decided_by": null,
            "decided_at": null,
            "notes": null,
            "created_at": "2026-08-21T09:30:00Z"
        }"#;
        let approval: Approval = serde_json::from_str(raw).expect("parse");
        assert!(approval.is_pending());
        assert_eq!(approval.object_type, "message_draft");
        assert_eq!(approval.decided_at, None);
    }

    #[test]
    fn urgency_threshold_is_exclusive() {
        let raw = r#"{
            "id": "7f4df2c9-49d3-4bb3-9d34-3e61c2dc1f5d",
            "entity_type": "matter",
            "pipeline_stage": "in_progress",
            "urgency_score": 50,
            "created_at": "2026-08-20T14:02:00Z"
        }"#;
        let item: PipelineItem = serde_json::from_str(raw).expect("parse");
        assert!(!item.is_urgent());
    }
}
