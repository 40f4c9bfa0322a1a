//! Named schemas for every payload, composed by extension.

use crate::consistency::{Consistency, ConsistencyWarning};
use crate::error::{PayloadError, Result};
use crate::numeric::NumericString;
use crate::paging::PagedResourceParameters;
use crate::report::*;
use crate::schema::{
    self, Describe, DescribeRecord, Field, FieldPath, IssueKind, RecordSchema, Schema,
    ValidationError, ValidationIssue,
};
use schemars::schema::RootSchema;
use schemars::{schema_for, JsonSchema};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::OnceLock;

type Decode = fn(Value) -> std::result::Result<Vec<ConsistencyWarning>, serde_json::Error>;

/// A named schema and the record type it decodes to
pub struct Entry {
    name: &'static str,
    schema: Schema,
    decode: Decode,
    json_schema: fn() -> RootSchema,
}

impl Entry {
    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// JSON Schema document for the record type
    pub fn json_schema(&self) -> RootSchema {
        (self.json_schema)()
    }

    pub fn check(&self, value: &Value) -> std::result::Result<(), ValidationError> {
        schema::check(&self.schema, value)
    }

    /// Check `value` and decode it into the record type, returning its consistency warnings
    pub fn validate(
        &self,
        value: Value,
    ) -> std::result::Result<Vec<ConsistencyWarning>, ValidationError> {
        self.check(&value)?;
        let warnings = (self.decode)(value).map_err(|err| ValidationError {
            schema: self.name.to_string(),
            issues: vec![ValidationIssue {
                path: FieldPath::root(),
                expected: self.name.to_string(),
                kind: IssueKind::Malformed {
                    message: err.to_string(),
                },
            }],
        })?;
        for warning in &warnings {
            log::warn!("{}: {}", self.name, warning);
        }
        Ok(warnings)
    }
}

fn decode_as<T>(value: Value) -> std::result::Result<Vec<ConsistencyWarning>, serde_json::Error>
where
    T: DeserializeOwned + Consistency,
{
    let record: T = serde_json::from_value(value)?;
    Ok(record.consistency_warnings())
}

fn json_schema_of<T: JsonSchema>() -> RootSchema {
    schema_for!(T)
}

/// Override the element type of a listing's `entries`
fn with_entries(listing: &RecordSchema, entry: Schema) -> RecordSchema {
    let doc = listing
        .get("entries")
        .map(|f| f.description().to_string())
        .unwrap_or_default();
    let entries = RecordSchema::new("entries")
        .field(Field::new("entries", Schema::array(entry)).doc(doc));
    listing.extend(&entries)
}

pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    pub fn new() -> Self {
        let mut registry = Registry {
            entries: Vec::new(),
        };

        let paging = PagedResourceParameters::record();

        let report = Report::record();
        let trade_history_report = report
            .extend(&TradeHistory::record())
            .named("TradeHistoryReport");
        let paged_report = trade_history_report.extend(&paging).named("PagedReport");

        let reports_payload = ReportsPayload::<Report>::record();
        let overview_payload = with_entries(&reports_payload, ProfitLossOverviewData::describe())
            .named("ReportOverviewPayload");
        let events_payload = with_entries(&reports_payload, ProfitLossEventCacheEntry::describe())
            .named("ReportEventsPayload");

        let paged_reports_payload = reports_payload.extend(&paging).named("PagedReportsPayload");
        let paged_overview_payload = overview_payload
            .extend(&paging)
            .named("PagedReportOverviewPayload");
        let paged_events_payload = events_payload
            .extend(&paging)
            .named("PagedReportEventsPayload");

        registry.insert::<NumericString>("NumericString", NumericString::describe());
        registry.insert::<EventKind>("EventKind", EventKind::describe());
        registry.insert::<PagedResourceParameters>("PagedResourceParameters", paging.into());
        registry.insert::<ReportPeriod>("ReportPeriod", ReportPeriod::describe());
        registry.insert::<ProfitLossOverviewData>(
            "ProfitLossOverviewData",
            ProfitLossOverviewData::describe(),
        );
        registry.insert::<MatchedAcquisitions>(
            "MatchedAcquisitions",
            MatchedAcquisitions::describe(),
        );
        registry.insert::<MatchedAcquisition>(
            "MatchedAcquisition",
            MatchedAcquisition::record().named("MatchedAcquisition").into(),
        );
        registry.insert::<CostBasis>("CostBasis", CostBasis::describe());
        registry.insert::<ProfitLossEvent>("ProfitLossEvent", ProfitLossEvent::describe());
        registry.insert::<ProfitLossEventCacheEntry>(
            "ProfitLossEventCacheEntry",
            ProfitLossEventCacheEntry::describe(),
        );
        registry.insert::<Report>("Report", report.into());
        registry.insert::<TradeHistory>("TradeHistory", TradeHistory::describe());
        registry.insert::<TradeHistoryReport>("TradeHistoryReport", trade_history_report.into());
        registry.insert::<PagedReport>("PagedReport", paged_report.into());
        registry.insert::<ReportProgress>("ReportProgress", ReportProgress::describe());
        registry.insert::<ReportError>("ReportError", ReportError::describe());
        registry.insert::<ReportsPayload>("ReportsPayload", reports_payload.into());
        registry.insert::<ReportOverviewPayload>("ReportOverviewPayload", overview_payload.into());
        registry.insert::<ReportEventsPayload>("ReportEventsPayload", events_payload.into());
        registry.insert::<PagedReportsPayload>("PagedReportsPayload", paged_reports_payload.into());
        registry.insert::<PagedReportOverviewPayload>(
            "PagedReportOverviewPayload",
            paged_overview_payload.into(),
        );
        registry.insert::<PagedReportEventsPayload>(
            "PagedReportEventsPayload",
            paged_events_payload.into(),
        );

        registry
    }

    /// Registry shared by the whole process
    pub fn global() -> &'static Registry {
        static REGISTRY: OnceLock<Registry> = OnceLock::new();
        REGISTRY.get_or_init(Registry::new)
    }

    fn insert<T>(&mut self, name: &'static str, schema: Schema)
    where
        T: DeserializeOwned + Consistency + JsonSchema,
    {
        debug_assert!(self.get(name).is_none(), "duplicate schema {}", name);
        self.entries.push(Entry {
            name,
            schema,
            decode: decode_as::<T>,
            json_schema: json_schema_of::<T>,
        });
    }

    pub fn get(&self, name: &str) -> Option<&Entry> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Exact lookup, falling back to a case-insensitive match
    pub fn find(&self, name: &str) -> Option<&Entry> {
        self.get(name).or_else(|| {
            self.entries
                .iter()
                .find(|e| e.name.eq_ignore_ascii_case(name))
        })
    }

    pub fn entries(&self) -> impl Iterator<Item = &Entry> {
        self.entries.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    /// Validate `value` against the schema registered as `name`
    pub fn validate(&self, name: &str, value: Value) -> Result<Vec<ConsistencyWarning>> {
        let entry = self
            .find(name)
            .ok_or_else(|| PayloadError::UnknownSchema(name.to_string()))?;
        Ok(entry.validate(value)?)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Registry::new()
    }
}
