//! Console snapshot: prints the current pipeline board and funnel report to
//! stdout. Diagnostic tool for checking what the backend is serving without
//! opening the console UI.
//!
//! Usage: `legalops-snapshot [vertical]` with `LEGALOPS_API_URL` /
//! `LEGALOPS_TOKEN` set (or `~/.legalops/config.json`).

use legalops_console::api::ApiClient;
use legalops_console::config::Session;
use legalops_console::services::analytics::{FunnelScreen, OverviewScreen};
use legalops_console::services::approvals;
use legalops_console::services::pipeline::PipelineScreen;

#[tokio::main]
async fn main() {
    legalops_console::init_logging();

    let session = match Session::resolve() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Config error: {}", e);
            std::process::exit(1);
        }
    };
    let client = ApiClient::new(session);

    let mut pipeline = PipelineScreen::new();
    match pipeline.load(&client).await {
        Ok(board) => {
            println!("Pipeline:");
            for (stage, count) in board.counts() {
                println!("  {:<20} {}", stage.as_str(), count);
            }
            if board.unknown_count() > 0 {
                println!("  {:<20} {}", "(unknown)", board.unknown_count());
            }
        }
        Err(e) => eprintln!("Pipeline unavailable: {}", e.user_message()),
    }

    let vertical = std::env::args().nth(1).unwrap_or_else(|| "immigration".to_string());
    let mut funnel = FunnelScreen::new();
    match funnel.load(&client, &vertical, 30).await {
        Ok(_) => {
            if let Some(report) = funnel.report() {
                println!("\nFunnel ({}, {}):", report.vertical, report.period);
                for step in &report.steps {
                    match step.conversion_from_previous {
                        Some(pct) => println!("  {:<24} {:>6}  ({}%)", step.name, step.count, pct),
                        None => println!("  {:<24} {:>6}", step.name, step.count),
                    }
                }
                if let Some(worst) = report.dropoffs.first() {
                    println!(
                        "  worst drop-off: {} -> {} ({}%)",
                        worst.from_name, worst.to_name, worst.dropoff_pct
                    );
                }
            }
        }
        Err(e) => eprintln!("Funnel unavailable: {}", e.user_message()),
    }

    let mut overview = OverviewScreen::new();
    match overview.load(&client, 7, 30, 24).await {
        Ok(_) => {
            if let Some(pair) = overview.overview() {
                println!(
                    "\nOverview: {} intakes (7d) / {} (30d), {} approvals pending",
                    pair.current.intakes_total,
                    pair.baseline.intakes_total,
                    pair.current.approvals_pending
                );
            }
            if let Some(pilot) = overview.pilot() {
                println!(
                    "Pilot: {} consults scheduled, {} SLA breaches",
                    pilot.consult_scheduled_count, pilot.sla_breaches
                );
            }
        }
        Err(e) => eprintln!("Overview unavailable: {}", e.user_message()),
    }

    match client.get_approvals(None).await {
        Ok(queue) => {
            let split = approvals::partition(&queue);
            println!(
                "\nApprovals: {} pending / {} approved / {} rejected",
                split.pending.len(),
                split.approved.len(),
                split.rejected.len()
            );
            for entry in &split.pending {
                println!("  {:<14} {}", approvals::object_label(entry), entry.id);
            }
        }
        Err(e) => eprintln!("Approvals unavailable: {}", e.user_message()),
    }
}
