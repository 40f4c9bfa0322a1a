use super::events::ProfitLossEventCacheEntry;
use super::history::TradeHistoryReport;
use super::metadata::Report;
use super::overview::ProfitLossOverviewData;
use crate::consistency::{Consistency, ConsistencyWarning};
use crate::paging::Paged;
use crate::schema::FieldPath;
use pnlreport_derive::Shape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One page of a listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct ReportsPayload<E = Report> {
    /// Entries of this page, in listing order
    pub entries: Vec<E>,
    /// Total number of entries across all pages
    pub entries_found: u64,
    /// Maximum number of entries a page may hold; negative when unlimited
    pub entries_limit: i64,
}

pub type ReportOverviewPayload = ReportsPayload<ProfitLossOverviewData>;
pub type ReportEventsPayload = ReportsPayload<ProfitLossEventCacheEntry>;

pub type PagedReport = Paged<TradeHistoryReport>;
pub type PagedReportsPayload = Paged<ReportsPayload>;
pub type PagedReportOverviewPayload = Paged<ReportOverviewPayload>;
pub type PagedReportEventsPayload = Paged<ReportEventsPayload>;

impl<E: Consistency> Consistency for ReportsPayload<E> {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        if self.entries_limit >= 0 && self.entries.len() as u64 > self.entries_limit as u64 {
            warnings.push(ConsistencyWarning::EntriesExceedLimit {
                path: path.key("entries"),
                entries: self.entries.len(),
                limit: self.entries_limit,
            });
        }
        self.entries.collect_warnings(&path.key("entries"), warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, IssueKind};
    use crate::test_utils::*;
    use serde_json::{json, Value};

    fn payload(entries: Vec<Value>) -> Value {
        json!({
            "entries": entries,
            "entriesFound": 25,
            "entriesLimit": 10
        })
    }

    #[test]
    fn reports_listing_validates() {
        let value = payload(vec![report_json(), report_json()]);
        let listing: ReportsPayload = validate(value.clone()).unwrap();
        assert_eq!(listing.entries.len(), 2);
        assert_eq!(listing.entries_found, 25);
        assert_eq!(serde_json::to_value(&listing).unwrap(), value);
    }

    #[test]
    fn specializations_reject_each_others_entries() {
        let err = validate::<ReportOverviewPayload>(payload(vec![cache_entry_json()])).unwrap_err();
        assert!(err.contains_path("entries[0].loanProfit"));

        let err = validate::<ReportEventsPayload>(payload(vec![overview_json()])).unwrap_err();
        assert!(err.contains_path("entries[0].location"));
        assert!(err.contains_path("entries[0].eventType"));

        assert!(validate::<ReportOverviewPayload>(payload(vec![overview_json()])).is_ok());
        assert!(validate::<ReportEventsPayload>(payload(vec![cache_entry_json()])).is_ok());
    }

    #[test]
    fn events_payload_reports_entry_index() {
        let mut bad = cache_entry_json();
        bad["isVirtual"] = json!("no");
        let value = payload(vec![cache_entry_json(), bad]);
        let err = validate::<ReportEventsPayload>(value).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path.to_string(), "entries[1].isVirtual");
        assert_eq!(
            err.issues[0].kind,
            IssueKind::TypeMismatch {
                found: "string".to_string()
            }
        );
    }

    #[test]
    fn entries_found_is_independent_of_page_size() {
        let mut value = payload(vec![]);
        value["entriesFound"] = json!(1000);
        let listing: ReportsPayload = validate(value).unwrap();
        assert!(listing.consistency_warnings().is_empty());
    }

    #[test]
    fn page_over_limit_warns() {
        let mut value = payload(vec![report_json(), report_json()]);
        value["entriesLimit"] = json!(1);
        let listing: ReportsPayload = validate(value).unwrap();
        let warnings = listing.consistency_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "entries: 2 entries returned exceeds the limit of 1"
        );
    }

    #[test]
    fn paged_events_payload() {
        let value = merge(&[payload(vec![cache_entry_json()]), paging_json()]);
        let page: PagedReportEventsPayload = validate(value.clone()).unwrap();
        assert_eq!(page.inner.entries[0].paid_asset, "BTC");
        assert_eq!(page.paging.limit, 10);
        assert_eq!(serde_json::to_value(&page).unwrap(), value);
    }
}
