//! Events command - list the profit/loss events of a report with filtering

use crate::cmd::read_document;
use clap::Args;
use pnlreport::{
    validate, Consistency, EventKind, PayloadError, ProfitLossEventCacheEntry, ReportEventsPayload,
    TradeHistoryReport,
};
use serde_json::Value;
use std::io;
use std::path::PathBuf;
use tabled::{
    settings::{object::Columns, Alignment, Modify, Style},
    Table, Tabled,
};

#[derive(Args, Debug)]
pub struct EventsCommand {
    /// Report with its trade history, or an events listing (JSON), or "-" for stdin
    #[arg(short, long)]
    file: PathBuf,

    /// Filter by event kind (e.g. trade, "asset movement")
    #[arg(short, long)]
    kind: Option<EventKind>,

    /// Output as CSV instead of formatted table
    #[arg(long)]
    csv: bool,
}

impl EventsCommand {
    pub fn exec(&self) -> anyhow::Result<()> {
        let document = read_document(&self.file)?;
        let events = report_events(document)?;

        let rows: Vec<_> = events
            .iter()
            .filter(|e| self.kind.map_or(true, |kind| e.kind == kind))
            .enumerate()
            .map(|(i, e)| EventRow::new(i + 1, e))
            .collect();

        if self.csv {
            self.write_csv(&rows)
        } else {
            self.print_table(&rows);
            Ok(())
        }
    }

    fn print_table(&self, rows: &[EventRow]) {
        if rows.is_empty() {
            println!("No events found matching filters");
            return;
        }

        let table = Table::new(rows)
            .with(Style::rounded())
            .with(Modify::new(Columns::new(4..9)).with(Alignment::right()))
            .to_string();
        println!("{}", table);
    }

    fn write_csv(&self, rows: &[EventRow]) -> anyhow::Result<()> {
        let mut wtr = csv::Writer::from_writer(io::stdout());
        for row in rows {
            wtr.serialize(row)?;
        }
        wtr.flush()?;
        Ok(())
    }
}

/// Events of a trade history report (paged or not), or of an events listing
fn report_events(document: Value) -> Result<Vec<ProfitLossEventCacheEntry>, PayloadError> {
    if document.get("allEvents").is_some() {
        let report: TradeHistoryReport = validate(document)?;
        log_warnings(&report);
        log::info!(
            "report {} '{}' ({}): {} events",
            report.report.identifier,
            report.report.name,
            report.report.period().display(),
            report.history.all_events.len()
        );
        Ok(report.history.all_events)
    } else {
        let listing: ReportEventsPayload = validate(document)?;
        log_warnings(&listing);
        log::info!(
            "{} of {} events in listing",
            listing.entries.len(),
            listing.entries_found
        );
        Ok(listing.entries)
    }
}

fn log_warnings<T: Consistency>(value: &T) {
    for warning in value.consistency_warnings() {
        log::warn!("{}", warning);
    }
}

/// Row for the events table output
#[derive(Debug, Clone, Tabled, serde::Serialize)]
pub struct EventRow {
    #[tabled(rename = "#")]
    #[serde(rename = "row_num")]
    pub row_num: usize,

    #[tabled(rename = "Time")]
    pub time: String,

    #[tabled(rename = "Type")]
    pub kind: String,

    #[tabled(rename = "Location")]
    pub location: String,

    #[tabled(rename = "Paid")]
    pub paid: String,

    #[tabled(rename = "Received")]
    pub received: String,

    #[tabled(rename = "Taxable Amount")]
    pub taxable_amount: String,

    #[tabled(rename = "Net P/L")]
    pub net_profit_or_loss: String,

    #[tabled(rename = "Lots")]
    pub lots: String,

    #[tabled(rename = "Cost Basis")]
    pub cost_basis: String,

    #[tabled(rename = "Virtual")]
    pub is_virtual: bool,
}

impl EventRow {
    fn new(row_num: usize, event: &ProfitLossEventCacheEntry) -> Self {
        let time = event
            .datetime()
            .map(|t| t.format("%Y-%m-%d %H:%M:%S").to_string())
            .unwrap_or_else(|| event.time.to_string());

        let (lots, cost_basis) = match &event.cost_basis {
            Some(basis) => (
                basis.matched_acquisitions.len().to_string(),
                if basis.is_complete { "complete" } else { "incomplete" }.to_string(),
            ),
            None => ("-".to_string(), "-".to_string()),
        };

        EventRow {
            row_num,
            time,
            kind: event.kind.to_string(),
            location: event.location.clone(),
            paid: format!("{} {}", event.paid_in_asset, event.paid_asset),
            received: format!("{} {}", event.received_in_asset, event.received_asset),
            taxable_amount: event.taxable_amount.to_string(),
            net_profit_or_loss: event.net_profit_or_loss.to_string(),
            lots,
            cost_basis,
            is_virtual: event.is_virtual,
        }
    }
}
