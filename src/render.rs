use std::fmt::Write as _;

use crate::dashboard::{DashboardView, Workflow};
use crate::domain::{Direction, NarrativeAnalysis, Transaction, WalletSnapshot, MAX_TRANSACTIONS};
use crate::time::display_datetime;
use crate::units::format_ether_amount;

pub fn render_view(view: &DashboardView, tz: chrono_tz::Tz) -> String {
    match &view.workflow {
        Workflow::Idle => "Enter a wallet address and API key to begin tracking.\n".to_string(),
        Workflow::Loading => "Fetching wallet data...\n".to_string(),
        Workflow::Error { message } => format!("Error: {message}\n"),
        Workflow::Loaded { snapshot } | Workflow::LoadedWithAnalysis { snapshot, .. } => {
            render_loaded(snapshot, view.workflow.analysis(), tz)
        }
    }
}

fn render_loaded(snapshot: &WalletSnapshot, analysis: Option<&NarrativeAnalysis>, tz: chrono_tz::Tz) -> String {
    let mut out = render_balance(snapshot);
    out.push('\n');
    out.push_str(&render_analysis(analysis));
    out.push('\n');
    out.push_str(&render_activity(snapshot, tz));
    out
}

pub fn render_balance(snapshot: &WalletSnapshot) -> String {
    format!(
        "Total Balance: {}\nAddress: {}\n",
        format_ether_amount(&snapshot.balance),
        snapshot.address
    )
}

/// `None` means the analysis is still running.
pub fn render_analysis(analysis: Option<&NarrativeAnalysis>) -> String {
    let Some(a) = analysis else {
        return "AI Insights\n  Analyzing wallet activity...\n".to_string();
    };

    let mut out = format!("AI Insights [{} RISK]\n  {}\n", a.risk_assessment.as_str(), a.summary);
    out.push_str("  Key Behaviors:\n");
    for activity in &a.key_activities {
        let _ = writeln!(out, "    - {activity}");
    }
    out
}

pub fn render_activity(snapshot: &WalletSnapshot, tz: chrono_tz::Tz) -> String {
    let mut out = format!("Recent Activity (Last {MAX_TRANSACTIONS} Tx)\n");
    if snapshot.transactions.is_empty() {
        out.push_str("  No recent transactions found.\n");
        return out;
    }
    for tx in &snapshot.transactions {
        let _ = writeln!(out, "  {}", render_row(tx, &snapshot.address, tz));
    }
    out
}

pub fn render_row(tx: &Transaction, address: &str, tz: chrono_tz::Tz) -> String {
    let (verb, party) = match tx.direction(address) {
        Direction::Out => ("Sent", format!("To: {}", tx.to)),
        Direction::In => ("Received", format!("From: {}", tx.from)),
    };
    let failed = if tx.is_error() { " [Failed]" } else { "" };
    let when = display_datetime(&tx.time_stamp, tz).unwrap_or_else(|| "unknown time".to_string());

    format!("{verb} {}{failed}  {party}  {when}", format_ether_amount(&tx.value))
}
