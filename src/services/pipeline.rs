//! Pipeline screen service — business logic for the kanban view.
//!
//! The screen owns the last authoritative board. Stage moves are computed
//! locally (single-step adjacency only) and delegated to the backend; there
//! is no optimistic local update. A failed mutation leaves the prior board
//! displayed — stale but consistent — and a successful one refetches the
//! authoritative state instead of patching in place.

use async_trait::async_trait;
use uuid::Uuid;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::stage::{move_target, Direction, Stage, StageBoard};
use crate::tracker::Tracker;
use crate::types::{EntityType, PipelineItem, PipelineView};

/// Remote operations the pipeline screen needs.
#[async_trait]
pub trait PipelineTransport: Send + Sync {
    async fn fetch_pipeline(&self) -> Result<PipelineView, ApiError>;
    async fn change_stage(
        &self,
        entity_type: EntityType,
        id: Uuid,
        stage: Stage,
    ) -> Result<PipelineItem, ApiError>;
}

#[async_trait]
impl PipelineTransport for ApiClient {
    async fn fetch_pipeline(&self) -> Result<PipelineView, ApiError> {
        self.get_pipeline().await
    }

    async fn change_stage(
        &self,
        entity_type: EntityType,
        id: Uuid,
        stage: Stage,
    ) -> Result<PipelineItem, ApiError> {
        ApiClient::change_stage(self, entity_type, id, stage).await
    }
}

/// Outcome of a requested move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// The mutation was applied and the board refetched.
    Moved { target: Stage },
    /// Nothing was sent: the item sits at a boundary stage, or its stage
    /// key is outside the enumeration and cannot be moved from here.
    NoOp,
}

/// Per-render state of the kanban screen.
#[derive(Default)]
pub struct PipelineScreen {
    board: Option<StageBoard>,
}

impl PipelineScreen {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last successfully loaded board, if any.
    pub fn board(&self) -> Option<&StageBoard> {
        self.board.as_ref()
    }

    /// Fetch the authoritative pipeline and regroup it locally. The local
    /// engine is the authority for column order and the unknown bucket;
    /// server counts are only cross-checked for observability.
    pub async fn load<T: PipelineTransport>(
        &mut self,
        transport: &T,
    ) -> Result<&StageBoard, ApiError> {
        let view = transport.fetch_pipeline().await?;
        let server_total: u64 = view.stage_counts.values().sum();

        let board = StageBoard::group(view.into_items());
        if board.total() as u64 != server_total {
            log::warn!(
                "pipeline counts disagree: server reported {}, classified {} ({} unknown)",
                server_total,
                board.total(),
                board.unknown_count()
            );
        }
        if board.unknown_count() > 0 {
            log::warn!(
                "{} pipeline item(s) outside the stage enumeration",
                board.unknown_count()
            );
        }

        Ok(&*self.board.insert(board))
    }

    /// Move an item one stage in `direction`.
    ///
    /// Boundary moves are no-ops and never reach the network. On success the
    /// change event is tracked and the board refetched; on failure the
    /// previously loaded board is left untouched and the caller decides how
    /// to surface the error. No retry happens here.
    pub async fn move_item<T: PipelineTransport>(
        &mut self,
        transport: &T,
        tracker: Option<&Tracker>,
        item: &PipelineItem,
        direction: Direction,
    ) -> Result<MoveOutcome, ApiError> {
        let current = match Stage::parse(&item.pipeline_stage) {
            Some(stage) => stage,
            None => {
                log::warn!(
                    "refusing to move item {} from unknown stage {:?}",
                    item.id,
                    item.pipeline_stage
                );
                return Ok(MoveOutcome::NoOp);
            }
        };

        let target = match move_target(current, direction) {
            Some(target) => target,
            None => return Ok(MoveOutcome::NoOp),
        };

        transport
            .change_stage(item.entity_type, item.id, target)
            .await?;

        if let Some(tracker) = tracker {
            tracker
                .track(
                    "pipeline_stage_changed",
                    serde_json::json!({
                        "entity_type": item.entity_type.as_str(),
                        "from_stage": current.as_str(),
                        "to_stage": target.as_str(),
                    }),
                )
                .await;
        }

        self.load(transport).await?;
        Ok(MoveOutcome::Moved { target })
    }
}
