//! Analytics screen services — funnel report assembly and KPI overview.
//!
//! The funnel screen refetches whenever the vertical toggles, and those
//! fetches can race: the screen takes a ticket per fetch and only the
//! response holding the latest ticket is applied.

use serde::Serialize;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::fetch_seq::{FetchSequence, FetchTicket};
use crate::funnel::{
    annotate_conversion, bar_width, rank_dropoffs, ConversionHealth, DropoffRow,
};
use crate::types::{AnalyticsOverview, FunnelResponse, FunnelStep, PilotKpis};

/// One funnel step, ready to render: annotated conversion, bar width, band.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelStepView {
    pub name: String,
    pub count: u64,
    pub conversion_from_previous: Option<f64>,
    pub bar_width_pct: f64,
    /// Absent on the first step and after a zero-count predecessor.
    pub health: Option<ConversionHealth>,
}

/// The full visual-ready funnel: steps in received order plus the ranked
/// drop-off table.
#[derive(Debug, Clone, Serialize)]
pub struct FunnelReport {
    pub vertical: String,
    pub period: String,
    pub steps: Vec<FunnelStepView>,
    pub dropoffs: Vec<DropoffRow>,
}

/// Build the report from a fetched funnel response. Pure.
pub fn build_funnel_report(response: FunnelResponse) -> FunnelReport {
    let annotated: Vec<FunnelStep> = annotate_conversion(&response.steps);
    let dropoffs = rank_dropoffs(&annotated);

    let steps = annotated
        .iter()
        .map(|step| FunnelStepView {
            name: step.name.clone(),
            count: step.count,
            conversion_from_previous: step.conversion_from_previous,
            bar_width_pct: bar_width(step, &annotated),
            health: step.conversion_from_previous.map(ConversionHealth::from_pct),
        })
        .collect();

    FunnelReport {
        vertical: response.vertical,
        period: response.period,
        steps,
        dropoffs,
    }
}

/// Per-render state of the funnel section.
#[derive(Default)]
pub struct FunnelScreen {
    seq: FetchSequence,
    report: Option<FunnelReport>,
}

impl FunnelScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn report(&self) -> Option<&FunnelReport> {
        self.report.as_ref()
    }

    /// Take a ticket before starting a fetch. Issuing supersedes any fetch
    /// still in flight.
    pub fn begin_load(&self) -> FetchTicket {
        self.seq.issue()
    }

    /// Apply a fetched response if its ticket is still the latest. Returns
    /// whether it was applied; superseded responses are discarded.
    pub fn apply(&mut self, ticket: FetchTicket, response: FunnelResponse) -> bool {
        if !self.seq.is_current(ticket) {
            log::debug!("discarding superseded funnel fetch");
            return false;
        }
        self.report = Some(build_funnel_report(response));
        true
    }

    /// Fetch + apply in one call for the common non-racing path.
    pub async fn load(
        &mut self,
        client: &ApiClient,
        vertical: &str,
        days: u32,
    ) -> Result<bool, ApiError> {
        let ticket = self.begin_load();
        let response = client.get_funnel(vertical, days).await?;
        Ok(self.apply(ticket, response))
    }
}

/// The overview section pairs a short window with a longer baseline
/// (7d cards with 30d context).
#[derive(Debug, Clone, Serialize)]
pub struct OverviewPair {
    pub current: AnalyticsOverview,
    pub baseline: AnalyticsOverview,
}

/// Per-render state of the overview/pilot section. The days toggle refetches
/// just like the funnel's vertical toggle, so the same ticket guard applies.
#[derive(Default)]
pub struct OverviewScreen {
    seq: FetchSequence,
    overview: Option<OverviewPair>,
    pilot: Option<PilotKpis>,
}

impl OverviewScreen {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn overview(&self) -> Option<&OverviewPair> {
        self.overview.as_ref()
    }

    pub fn pilot(&self) -> Option<&PilotKpis> {
        self.pilot.as_ref()
    }

    pub fn begin_load(&self) -> FetchTicket {
        self.seq.issue()
    }

    /// Apply fetched windows + pilot KPIs if the ticket is still the latest.
    pub fn apply(&mut self, ticket: FetchTicket, pair: OverviewPair, pilot: PilotKpis) -> bool {
        if !self.seq.is_current(ticket) {
            log::debug!("discarding superseded overview fetch");
            return false;
        }
        self.overview = Some(pair);
        self.pilot = Some(pilot);
        true
    }

    /// Fetch both windows and the pilot KPIs concurrently, then apply under
    /// one ticket.
    pub async fn load(
        &mut self,
        client: &ApiClient,
        current_days: u32,
        baseline_days: u32,
        sla_hours: u32,
    ) -> Result<bool, ApiError> {
        let ticket = self.begin_load();
        let (current, baseline, pilot) = tokio::join!(
            client.get_overview(current_days),
            client.get_overview(baseline_days),
            client.get_pilot_kpis(baseline_days, sla_hours)
        );
        let pair = OverviewPair {
            current: current?,
            baseline: baseline?,
        };
        Ok(self.apply(ticket, pair, pilot?))
    }
}
