use crate::consistency::{check_range, Consistency, ConsistencyWarning};
use crate::numeric::NumericString;
use crate::schema::FieldPath;
use chrono::{DateTime, Utc};
use pnlreport_derive::Shape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

fn to_datetime(secs: u64) -> Option<DateTime<Utc>> {
    i64::try_from(secs)
        .ok()
        .and_then(|secs| DateTime::from_timestamp(secs, 0))
}

/// Time window covered by a report, in unix seconds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
pub struct ReportPeriod {
    pub start: u64,
    pub end: u64,
}

impl ReportPeriod {
    pub fn start_time(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.start)
    }

    pub fn end_time(&self) -> Option<DateTime<Utc>> {
        to_datetime(self.end)
    }

    /// Display as `YYYY-MM-DD - YYYY-MM-DD`
    pub fn display(&self) -> String {
        let fmt = |t: Option<DateTime<Utc>>| {
            t.map(|t| t.format("%Y-%m-%d").to_string())
                .unwrap_or_else(|| "?".to_string())
        };
        format!("{} - {}", fmt(self.start_time()), fmt(self.end_time()))
    }
}

impl Consistency for ReportPeriod {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        check_range(path, self.start, self.end, warnings);
    }
}

/// Metadata of one generated report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    pub identifier: u64,
    pub name: String,
    /// When the report was generated
    #[serde(default)]
    pub timestamp: Option<u64>,
    /// Start of the reported period
    pub start_ts: u64,
    /// End of the reported period
    pub end_ts: u64,
    /// Size of the stored report data in bytes
    #[serde(default)]
    pub size_on_disk: Option<NumericString>,
}

impl Report {
    pub fn period(&self) -> ReportPeriod {
        ReportPeriod {
            start: self.start_ts,
            end: self.end_ts,
        }
    }

    pub fn generated_at(&self) -> Option<DateTime<Utc>> {
        self.timestamp.and_then(to_datetime)
    }
}

impl Consistency for Report {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        check_range(path, self.start_ts, self.end_ts, warnings);
    }
}

/// Progress of a report being generated in the background
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct ReportProgress {
    /// Label of the current processing step
    pub processing_state: String,
    /// Overall progress, as sent by the backend (e.g. "42.5")
    pub total_progress: String,
}

impl Consistency for ReportProgress {}

/// Error returned in place of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
pub struct ReportError {
    pub error: String,
    pub message: String,
}

impl Consistency for ReportError {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, DescribeRecord, IssueKind};
    use crate::test_utils::*;
    use serde_json::json;

    #[test]
    fn report_validates_and_round_trips() {
        let value = report_json();
        let report: Report = validate(value.clone()).unwrap();
        assert_eq!(report.identifier, 1);
        assert_eq!(report.timestamp, None);
        assert_eq!(report.size_on_disk.as_ref().unwrap().as_str(), "1024.5");
        assert_eq!(serde_json::to_value(&report).unwrap(), value);
        assert!(report.consistency_warnings().is_empty());
    }

    #[test]
    fn numeric_size_on_disk_is_a_type_mismatch() {
        let mut value = report_json();
        value["sizeOnDisk"] = json!(1024.5);
        let err = validate::<Report>(value).unwrap_err();
        assert_eq!(err.issues.len(), 1);
        assert_eq!(err.issues[0].path.to_string(), "sizeOnDisk");
        assert!(err
            .leaf_issues()
            .iter()
            .any(|i| i.kind == IssueKind::TypeMismatch { found: "number".to_string() }));
    }

    #[test]
    fn nullable_report_fields_may_be_omitted() {
        let value = without(without(report_json(), "timestamp"), "sizeOnDisk");
        let report: Report = validate(value).unwrap();
        assert!(report.size_on_disk.is_none());

        let record = Report::record();
        assert!(record.get("timestamp").unwrap().is_optional());
        assert!(!record.get("startTs").unwrap().is_optional());
    }

    #[test]
    fn missing_required_field_is_reported() {
        let err = validate::<Report>(without(report_json(), "endTs")).unwrap_err();
        assert!(err.contains_path("endTs"));
        assert_eq!(err.issues[0].kind, IssueKind::Missing);
    }

    #[test]
    fn reversed_period_warns() {
        let mut value = report_json();
        value["startTs"] = json!(1704067199);
        value["endTs"] = json!(1672531200);
        let report: Report = validate(value).unwrap();
        assert_eq!(report.consistency_warnings().len(), 1);
        assert_eq!(report.period().consistency_warnings().len(), 1);
    }

    #[test]
    fn period_display() {
        let report: Report = validate(report_json()).unwrap();
        assert_eq!(report.period().display(), "2023-01-01 - 2023-12-31");
        assert!(report.generated_at().is_none());
    }

    #[test]
    fn progress_and_error_payloads() {
        let progress: ReportProgress =
            validate(json!({"processingState": "Processing trades", "totalProgress": "42.5"}))
                .unwrap();
        assert_eq!(progress.total_progress, "42.5");

        let err = validate::<ReportError>(json!({"error": "ReportNotFound"})).unwrap_err();
        assert!(err.contains_path("message"));
    }
}
