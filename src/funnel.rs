//! Funnel / conversion analytics.
//!
//! Pure computations over an ordered list of `(name, count)` steps as the
//! aggregation endpoint returns them. Step order as received defines
//! "previous"; there is no reordering, and an inconsistent series (a later
//! step exceeding an earlier one) is reported as-is, not corrected.

use serde::Serialize;

use crate::types::FunnelStep;

/// Minimum rendered bar width in percent, so near-zero steps stay visible.
const MIN_BAR_WIDTH_PCT: f64 = 4.0;

/// Drop-off severity band for the ranked transition table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DropoffSeverity {
    High,
    Medium,
    Low,
}

impl DropoffSeverity {
    pub fn from_pct(pct: i64) -> Self {
        if pct > 50 {
            Self::High
        } else if pct > 25 {
            Self::Medium
        } else {
            Self::Low
        }
    }
}

/// Health band for a step's conversion-from-previous percentage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionHealth {
    Healthy,
    Concerning,
}

impl ConversionHealth {
    pub fn from_pct(pct: f64) -> Self {
        if pct >= 50.0 {
            Self::Healthy
        } else {
            Self::Concerning
        }
    }
}

/// One adjacent-pair transition, ranked by loss.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DropoffRow {
    pub from_name: String,
    pub to_name: String,
    pub from_count: u64,
    pub to_count: u64,
    /// Negative when the source series is inconsistent (later step larger).
    pub dropoff_pct: i64,
}

impl DropoffRow {
    pub fn severity(&self) -> DropoffSeverity {
        DropoffSeverity::from_pct(self.dropoff_pct)
    }
}

/// Half rounds toward positive infinity, matching the source screens'
/// integer percentages. Diverges from `f64::round` only on negative halves,
/// reachable when an inconsistent series produces a negative drop-off.
fn round_half_up(x: f64) -> f64 {
    (x + 0.5).floor()
}

/// Fill in `conversion_from_previous` where the source left it absent.
///
/// The first step has no predecessor; a zero-count predecessor leaves the
/// ratio undefined (no divide-by-zero). A value supplied upstream is used
/// as-is — local derivation is strictly a fallback.
pub fn annotate_conversion(steps: &[FunnelStep]) -> Vec<FunnelStep> {
    steps
        .iter()
        .enumerate()
        .map(|(i, step)| {
            let mut annotated = step.clone();
            if annotated.conversion_from_previous.is_none() && i > 0 {
                let prev = steps[i - 1].count;
                if prev > 0 {
                    annotated.conversion_from_previous =
                        Some(round_half_up(100.0 * step.count as f64 / prev as f64));
                }
            }
            annotated
        })
        .collect()
}

/// Rendered bar width for one step, in `[4, 100]`.
///
/// The max-count floor of 1 guards an all-zero series; the 4% floor keeps
/// every bar visible. Presentation arithmetic, but a contract — downstream
/// visual parity depends on this exact floor/rounding rule.
pub fn bar_width(step: &FunnelStep, all_steps: &[FunnelStep]) -> f64 {
    let max_count = all_steps.iter().map(|s| s.count).max().unwrap_or(0).max(1);
    (100.0 * step.count as f64 / max_count as f64).max(MIN_BAR_WIDTH_PCT)
}

/// Rank adjacent transitions by drop-off, worst first.
///
/// Ties keep their pre-sort relative order (stable sort) so rankings are
/// deterministic. Fewer than two steps yields an empty table.
pub fn rank_dropoffs(steps: &[FunnelStep]) -> Vec<DropoffRow> {
    let mut rows: Vec<DropoffRow> = steps
        .windows(2)
        .map(|pair| {
            let (from, to) = (&pair[0], &pair[1]);
            let dropoff_pct = if from.count > 0 {
                round_half_up(100.0 * (1.0 - to.count as f64 / from.count as f64)) as i64
            } else {
                0
            };
            DropoffRow {
                from_name: from.name.clone(),
                to_name: to.name.clone(),
                from_count: from.count,
                to_count: to.count,
                dropoff_pct,
            }
        })
        .collect();

    rows.sort_by(|a, b| b.dropoff_pct.cmp(&a.dropoff_pct));
    rows
}
