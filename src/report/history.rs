use super::events::ProfitLossEventCacheEntry;
use super::metadata::Report;
use super::overview::ProfitLossOverviewData;
use crate::consistency::{Consistency, ConsistencyWarning};
use crate::schema::FieldPath;
use pnlreport_derive::Shape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Processing result of a report: the overview and every event behind it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct TradeHistory {
    pub events_processed: u64,
    /// Maximum number of events processed; zero or negative when unlimited
    pub events_limit: i64,
    /// Timestamp of the first processed event
    pub first_processed_timestamp: i64,
    pub overview: ProfitLossOverviewData,
    /// Events in processing order
    pub all_events: Vec<ProfitLossEventCacheEntry>,
    /// Set once all events of the report have been fetched
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub loaded: Option<bool>,
}

impl Consistency for TradeHistory {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        if self.events_limit > 0 && self.events_processed > self.events_limit as u64 {
            warnings.push(ConsistencyWarning::EventsExceedLimit {
                path: path.key("eventsProcessed"),
                processed: self.events_processed,
                limit: self.events_limit,
            });
        }
        self.all_events
            .collect_warnings(&path.key("allEvents"), warnings);
    }
}

/// A [`Report`] together with its [`TradeHistory`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
pub struct TradeHistoryReport {
    #[serde(flatten)]
    pub report: Report,
    #[serde(flatten)]
    pub history: TradeHistory,
}

impl Consistency for TradeHistoryReport {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        self.report.collect_warnings(path, warnings);
        self.history.collect_warnings(path, warnings);
    }
}
