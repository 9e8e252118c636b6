//! Pipeline stage engine.
//!
//! The kanban board is a fixed, ordered sequence of 9 stages. Order is the
//! only legal adjacency: the console exposes single-step forward/backward
//! moves and nothing else. Grouping is total — items carrying a stage key
//! outside the enumeration land in an explicit unknown bucket with a surfaced
//! count rather than vanishing from the board.

use serde::{Deserialize, Serialize};

use crate::types::PipelineItem;

/// One of the 9 fixed pipeline phases. Declaration order defines the kanban
/// column order and the adjacency for moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    NewLead,
    IntakeCompleted,
    DocsPending,
    ExpedienteDraft,
    PendingApproval,
    Approved,
    ContractOnboarding,
    InProgress,
    Closed,
}

impl Stage {
    /// The full ordered stage sequence.
    pub const ALL: [Stage; 9] = [
        Stage::NewLead,
        Stage::IntakeCompleted,
        Stage::DocsPending,
        Stage::ExpedienteDraft,
        Stage::PendingApproval,
        Stage::Approved,
        Stage::ContractOnboarding,
        Stage::InProgress,
        Stage::Closed,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Stage::NewLead => "new_lead",
            Stage::IntakeCompleted => "intake_completed",
            Stage::DocsPending => "docs_pending",
            Stage::ExpedienteDraft => "expediente_draft",
            Stage::PendingApproval => "pending_approval",
            Stage::Approved => "approved",
            Stage::ContractOnboarding => "contract_onboarding",
            Stage::InProgress => "in_progress",
            Stage::Closed => "closed",
        }
    }

    /// Classify a wire stage key. `None` for anything outside the enumeration.
    pub fn parse(key: &str) -> Option<Stage> {
        match key {
            "new_lead" => Some(Stage::NewLead),
            "intake_completed" => Some(Stage::IntakeCompleted),
            "docs_pending" => Some(Stage::DocsPending),
            "expediente_draft" => Some(Stage::ExpedienteDraft),
            "pending_approval" => Some(Stage::PendingApproval),
            "approved" => Some(Stage::Approved),
            "contract_onboarding" => Some(Stage::ContractOnboarding),
            "in_progress" => Some(Stage::InProgress),
            "closed" => Some(Stage::Closed),
            _ => None,
        }
    }

    /// Zero-based position in the ordered sequence.
    pub fn index(&self) -> usize {
        Stage::ALL
            .iter()
            .position(|s| s == self)
            .expect("every stage is in ALL")
    }

    pub fn is_first(&self) -> bool {
        *self == Stage::NewLead
    }

    pub fn is_terminal(&self) -> bool {
        *self == Stage::Closed
    }

    /// Default follow-up hint shown on a card when the server sends none.
    pub fn default_next_action(&self) -> &'static str {
        match self {
            Stage::NewLead => "Revisar lead y contactar",
            Stage::IntakeCompleted => "Verificar datos y crear expediente",
            Stage::DocsPending => "Recopilar documentos faltantes",
            Stage::ExpedienteDraft => "Generar borrador de expediente",
            Stage::PendingApproval => "Revisar y aprobar expediente",
            Stage::Approved => "Enviar convenio/contrato al cliente",
            Stage::ContractOnboarding => "Confirmar firma y onboarding",
            Stage::InProgress => "Dar seguimiento al caso",
            Stage::Closed => "Archivado",
        }
    }
}

/// Direction of a single-step kanban move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Forward,
    Backward,
}

/// Compute the target of a single-step move. `None` at the ends — the move
/// buttons are simply not offered there. The target is always adjacent in
/// the ordered sequence; multi-step jumps are never produced.
pub fn move_target(current: Stage, direction: Direction) -> Option<Stage> {
    let idx = current.index();
    match direction {
        Direction::Forward => Stage::ALL.get(idx + 1).copied(),
        Direction::Backward => idx.checked_sub(1).map(|i| Stage::ALL[i]),
    }
}

/// One kanban column: a stage and its items in received order.
#[derive(Debug, Clone, Serialize)]
pub struct StageColumn {
    pub stage: Stage,
    pub items: Vec<PipelineItem>,
}

/// The fully classified board: one column per stage (always all 9, empty ones
/// included) plus the unknown bucket.
#[derive(Debug, Clone, Serialize)]
pub struct StageBoard {
    pub columns: Vec<StageColumn>,
    /// Items whose `pipeline_stage` is outside the enumeration. Kept visible
    /// instead of dropped so the count can be surfaced for observability.
    pub unknown: Vec<PipelineItem>,
}

impl StageBoard {
    /// Group a flat item list by stage, preserving input relative order
    /// within each column. Pure; every input item lands in exactly one place.
    pub fn group(items: Vec<PipelineItem>) -> StageBoard {
        let mut columns: Vec<StageColumn> = Stage::ALL
            .iter()
            .map(|&stage| StageColumn {
                stage,
                items: Vec::new(),
            })
            .collect();
        let mut unknown = Vec::new();

        for item in items {
            match Stage::parse(&item.pipeline_stage) {
                Some(stage) => columns[stage.index()].items.push(item),
                None => {
                    log::warn!(
                        "pipeline item {} carries unknown stage {:?}",
                        item.id,
                        item.pipeline_stage
                    );
                    unknown.push(item);
                }
            }
        }

        StageBoard { columns, unknown }
    }

    /// Per-stage counts, in stage order. Always consistent with the columns.
    pub fn counts(&self) -> Vec<(Stage, usize)> {
        self.columns
            .iter()
            .map(|c| (c.stage, c.items.len()))
            .collect()
    }

    pub fn count_for(&self, stage: Stage) -> usize {
        self.columns[stage.index()].items.len()
    }

    pub fn unknown_count(&self) -> usize {
        self.unknown.len()
    }

    /// Total items on the board, unknown bucket included.
    pub fn total(&self) -> usize {
        self.columns.iter().map(|c| c.items.len()).sum::<usize>() + self.unknown.len()
    }

    pub fn column(&self, stage: Stage) -> &StageColumn {
        &self.columns[stage.index()]
    }

    /// Flatten the classified columns back into one list, concatenated in
    /// stage order. The unknown bucket is not included.
    pub fn flatten(&self) -> Vec<&PipelineItem> {
        self.columns.iter().flat_map(|c| c.items.iter()).collect()
    }
}
