//! Approvals screen service — the human gate over agent outputs and drafts.
//!
//! The screen owns the last fetched queue. A decision is only sent for a
//! pending entry (the backend 400s on anything already decided); after a
//! successful decision the queue is refetched rather than patched in place.

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::types::Approval;

/// The two decisions the gate supports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Approve => "approve",
            Self::Reject => "reject",
        }
    }
}

/// Remote operations the approvals screen needs.
#[async_trait]
pub trait ApprovalTransport: Send + Sync {
    async fn fetch_approvals(&self, status: Option<&str>) -> Result<Vec<Approval>, ApiError>;
    async fn decide(
        &self,
        approval_id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Approval, ApiError>;
}

#[async_trait]
impl ApprovalTransport for ApiClient {
    async fn fetch_approvals(&self, status: Option<&str>) -> Result<Vec<Approval>, ApiError> {
        self.get_approvals(status).await
    }

    async fn decide(
        &self,
        approval_id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<Approval, ApiError> {
        match decision {
            Decision::Approve => self.approve_item(approval_id, notes).await,
            Decision::Reject => self.reject_item(approval_id, notes).await,
        }
    }
}

/// Outcome of a requested decision.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecisionOutcome {
    /// The decision was recorded and the queue refetched.
    Decided { decision: Decision },
    /// Nothing was sent: the entry is not pending (or not in the queue).
    NoOp,
}

/// Queue split by status, input order preserved within each bucket.
#[derive(Debug, Default)]
pub struct QueuePartition<'a> {
    pub pending: Vec<&'a Approval>,
    pub approved: Vec<&'a Approval>,
    pub rejected: Vec<&'a Approval>,
}

/// Partition a fetched queue. Statuses outside the vocabulary are ignored
/// with a warning; the backend owns the status set.
pub fn partition(queue: &[Approval]) -> QueuePartition<'_> {
    let mut split = QueuePartition::default();
    for approval in queue {
        match approval.status.as_str() {
            "pending" => split.pending.push(approval),
            "approved" => split.approved.push(approval),
            "rejected" => split.rejected.push(approval),
            other => log::warn!("approval {} has unknown status {:?}", approval.id, other),
        }
    }
    split
}

/// Card title for a queue entry.
pub fn object_label(approval: &Approval) -> &'static str {
    match approval.object_type.as_str() {
        "agent_run" => "Agent Run",
        _ => "Message Draft",
    }
}

/// Per-render state of the approvals screen.
#[derive(Default)]
pub struct ApprovalsScreen {
    queue: Vec<Approval>,
}

impl ApprovalsScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn queue(&self) -> &[Approval] {
        &self.queue
    }

    /// Refetch the queue; `None` loads all statuses.
    pub async fn load<T: ApprovalTransport>(
        &mut self,
        transport: &T,
        status: Option<&str>,
    ) -> Result<&[Approval], ApiError> {
        self.queue = transport.fetch_approvals(status).await?;
        Ok(&self.queue)
    }

    /// Decide a queue entry. Non-pending entries are a local no-op; a failed
    /// remote decision leaves the fetched queue untouched.
    pub async fn decide_item<T: ApprovalTransport>(
        &mut self,
        transport: &T,
        approval_id: Uuid,
        decision: Decision,
        notes: Option<String>,
    ) -> Result<DecisionOutcome, ApiError> {
        let decidable = self
            .queue
            .iter()
            .any(|a| a.id == approval_id && a.is_pending());
        if !decidable {
            return Ok(DecisionOutcome::NoOp);
        }

        transport.decide(approval_id, decision, notes).await?;
        self.load(transport, None).await?;
        Ok(DecisionOutcome::Decided { decision })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use std::collections::VecDeque;
    use std::sync::Mutex;

    fn approval(n: u128, object_type: &str, status: &str) -> Approval {
        Approval {
            id: Uuid::from_u128(n),
            tenant_id: None,
            matter_id: None,
            object_type: object_type.into(),
            object_id: Uuid::from_u128(n + 1000),
            status: status.into(),
            requested_by: None,
            decided_by: None,
            decided_at: None,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[derive(Default)]
    struct MockTransport {
        fetches: Mutex<VecDeque<Vec<Approval>>>,
        decisions: Mutex<Vec<(Uuid, Decision, Option<String>)>>,
        fail_decide: bool,
    }

    #[async_trait]
    impl ApprovalTransport for MockTransport {
        async fn fetch_approvals(
            &self,
            _status: Option<&str>,
        ) -> Result<Vec<Approval>, ApiError> {
            Ok(self
                .fetches
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_default())
        }

        async fn decide(
            &self,
            approval_id: Uuid,
            decision: Decision,
            notes: Option<String>,
        ) -> Result<Approval, ApiError> {
            if self.fail_decide {
                return Err(ApiError::Api {
                    status: 400,
                    detail: "Approval already approved".into(),
                });
            }
            self.decisions
                .lock()
                .unwrap()
                .push((approval_id, decision, notes));
            Ok(approval(approval_id.as_u128(), "agent_run", "approved"))
        }
    }

    fn transport_with(queues: Vec<Vec<Approval>>) -> MockTransport {
        MockTransport {
            fetches: Mutex::new(queues.into()),
            ..Default::default()
        }
    }

    #[test]
    fn partition_splits_by_status() {
        let queue = vec![
            approval(1, "agent_run", "pending"),
            approval(2, "message_draft", "approved"),
            approval(3, "agent_run", "pending"),
            approval(4, "message_draft", "rejected"),
        ];
        let split = partition(&queue);
        assert_eq!(split.pending.len(), 2);
        assert_eq!(split.approved.len(), 1);
        assert_eq!(split.rejected.len(), 1);
        // Input order preserved within a bucket.
        assert_eq!(split.pending[0].id, Uuid::from_u128(1));
        assert_eq!(split.pending[1].id, Uuid::from_u128(3));
    }

    #[test]
    fn unknown_status_is_dropped_from_partition() {
        let queue = vec![approval(1, "agent_run", "escalated")];
        let split = partition(&queue);
        assert!(split.pending.is_empty());
        assert!(split.approved.is_empty());
        assert!(split.rejected.is_empty());
    }

    #[test]
    fn object_labels_match_queue_cards() {
        assert_eq!(object_label(&approval(1, "agent_run", "pending")), "Agent Run");
        assert_eq!(
            object_label(&approval(2, "message_draft", "pending")),
            "Message Draft"
        );
    }

    #[tokio::test]
    async fn decision_routes_and_refetches() {
        let pending = approval(7, "agent_run", "pending");
        let decided = approval(7, "agent_run", "approved");
        let transport = transport_with(vec![vec![pending], vec![decided]]);

        let mut screen = ApprovalsScreen::new();
        screen.load(&transport, Some("pending")).await.expect("load");

        let outcome = screen
            .decide_item(
                &transport,
                Uuid::from_u128(7),
                Decision::Approve,
                Some("looks good".into()),
            )
            .await
            .expect("decide");
        assert_eq!(
            outcome,
            DecisionOutcome::Decided {
                decision: Decision::Approve
            }
        );

        let decisions = transport.decisions.lock().unwrap();
        assert_eq!(decisions.len(), 1);
        assert_eq!(decisions[0].1, Decision::Approve);
        assert_eq!(decisions[0].2.as_deref(), Some("looks good"));
        drop(decisions);

        // Refetched queue replaced the old one.
        assert_eq!(screen.queue()[0].status, "approved");
    }

    #[tokio::test]
    async fn decided_entries_are_a_local_noop() {
        let transport = transport_with(vec![vec![approval(7, "agent_run", "approved")]]);
        let mut screen = ApprovalsScreen::new();
        screen.load(&transport, None).await.expect("load");

        let outcome = screen
            .decide_item(&transport, Uuid::from_u128(7), Decision::Reject, None)
            .await
            .expect("decide");
        assert_eq!(outcome, DecisionOutcome::NoOp);
        assert!(transport.decisions.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn failed_decision_keeps_the_queue() {
        let transport = MockTransport {
            fetches: Mutex::new(vec![vec![approval(7, "agent_run", "pending")]].into()),
            fail_decide: true,
            ..Default::default()
        };
        let mut screen = ApprovalsScreen::new();
        screen.load(&transport, None).await.expect("load");

        let err = screen
            .decide_item(&transport, Uuid::from_u128(7), Decision::Approve, None)
            .await
            .expect_err("decision should fail");
        assert!(matches!(err, ApiError::Api { status: 400, .. }));
        // The stale queue stays; no refetch happened.
        assert_eq!(screen.queue().len(), 1);
        assert!(screen.queue()[0].is_pending());
    }
}
