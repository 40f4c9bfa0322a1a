use crate::consistency::{Consistency, ConsistencyWarning};
use crate::numeric::NumericString;
use crate::schema::{Describe, DescribeRecord, FieldPath, RecordSchema, Schema};
use chrono::{DateTime, Utc};
use pnlreport_derive::Shape;
use schemars::gen::SchemaGenerator;
use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::fmt;
use std::ops::Deref;
use std::str::FromStr;

/// Wire name of the event kind on a [`ProfitLossEvent`]
pub const KIND_FIELD: &str = "type";
/// Wire name of the event kind on a [`ProfitLossEventCacheEntry`]
pub const CACHE_ENTRY_KIND_FIELD: &str = "eventType";

/// An acquisition lot matched against a disposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct MatchedAcquisitions {
    /// When the lot was acquired
    pub time: u64,
    pub description: String,
    /// Where the lot was acquired
    pub location: String,
    /// Amount acquired in the lot
    pub amount: NumericString,
    /// Acquisition rate in the profit currency
    pub rate: NumericString,
    /// Fee per unit in the profit currency
    pub fee_rate: NumericString,
    /// Amount of the lot used by this disposal
    pub used_amount: NumericString,
}

pub type MatchedAcquisition = MatchedAcquisitions;

impl Consistency for MatchedAcquisitions {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        if let (Ok(used), Ok(amount)) = (self.used_amount.to_decimal(), self.amount.to_decimal()) {
            if used > amount {
                warnings.push(ConsistencyWarning::UsedAmountExceedsAmount {
                    path: path.clone(),
                    used_amount: self.used_amount.to_string(),
                    amount: self.amount.to_string(),
                });
            }
        }
    }
}

/// Cost basis of a single disposal
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct CostBasis {
    /// False when not enough acquisitions were found to cover the disposal
    pub is_complete: bool,
    /// Lots in the order they were matched
    pub matched_acquisitions: Vec<MatchedAcquisitions>,
}

impl Consistency for CostBasis {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        self.matched_acquisitions
            .collect_warnings(&path.key("matchedAcquisitions"), warnings);
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown event kind: {0:?}")]
pub struct UnknownEventKind(String);

/// Accounting event kinds emitted by the reporting backend
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, JsonSchema, Shape,
)]
#[serde(rename_all = "lowercase")]
pub enum EventKind {
    Trade,
    Fee,
    #[serde(rename = "asset movement")]
    AssetMovement,
    #[serde(rename = "margin position close")]
    MarginPositionClose,
    Loan,
    #[serde(rename = "prefork acquisition")]
    PreforkAcquisition,
    #[serde(rename = "ledger action")]
    LedgerAction,
    Staking,
    #[serde(rename = "defi event")]
    DefiEvent,
    #[serde(rename = "transaction event")]
    TransactionEvent,
}

impl EventKind {
    pub const ALL: [EventKind; 10] = [
        EventKind::Trade,
        EventKind::Fee,
        EventKind::AssetMovement,
        EventKind::MarginPositionClose,
        EventKind::Loan,
        EventKind::PreforkAcquisition,
        EventKind::LedgerAction,
        EventKind::Staking,
        EventKind::DefiEvent,
        EventKind::TransactionEvent,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Trade => "trade",
            EventKind::Fee => "fee",
            EventKind::AssetMovement => "asset movement",
            EventKind::MarginPositionClose => "margin position close",
            EventKind::Loan => "loan",
            EventKind::PreforkAcquisition => "prefork acquisition",
            EventKind::LedgerAction => "ledger action",
            EventKind::Staking => "staking",
            EventKind::DefiEvent => "defi event",
            EventKind::TransactionEvent => "transaction event",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Consistency for EventKind {}

impl FromStr for EventKind {
    type Err = UnknownEventKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EventKind::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| UnknownEventKind(s.to_string()))
    }
}

/// A single taxable event of a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct ProfitLossEvent {
    /// Exchange or chain the event happened on
    pub location: String,
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Value paid in the profit currency
    pub paid_in_profit_currency: NumericString,
    pub paid_asset: String,
    /// Amount of the paid asset
    pub paid_in_asset: NumericString,
    /// Part of the paid amount which is taxable
    pub taxable_amount: NumericString,
    pub taxable_bought_cost_in_profit_currency: NumericString,
    pub received_asset: String,
    pub taxable_received_in_profit_currency: NumericString,
    /// Amount of the received asset
    pub received_in_asset: NumericString,
    pub net_profit_or_loss: NumericString,
    /// Absent (null) for events which are not disposals
    pub cost_basis: Option<CostBasis>,
    /// When the event happened
    pub time: u64,
    /// True for events synthesised by the backend, such as the second leg of a trade
    pub is_virtual: bool,
}

impl ProfitLossEvent {
    pub fn datetime(&self) -> Option<DateTime<Utc>> {
        i64::try_from(self.time)
            .ok()
            .and_then(|secs| DateTime::from_timestamp(secs, 0))
    }
}

impl Consistency for ProfitLossEvent {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        self.cost_basis
            .collect_warnings(&path.key("costBasis"), warnings);
    }
}

/// A [`ProfitLossEvent`] as it appears in a report's cached event list.
///
/// Identical to the event except that the kind is carried as `eventType` on the wire.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfitLossEventCacheEntry(pub ProfitLossEvent);

impl ProfitLossEventCacheEntry {
    pub fn into_event(self) -> ProfitLossEvent {
        self.0
    }
}

impl From<ProfitLossEvent> for ProfitLossEventCacheEntry {
    fn from(event: ProfitLossEvent) -> Self {
        ProfitLossEventCacheEntry(event)
    }
}

impl Deref for ProfitLossEventCacheEntry {
    type Target = ProfitLossEvent;

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

fn rename_key(value: &mut Value, from: &str, to: &str) {
    if let Value::Object(map) = value {
        if let Some(v) = map.remove(from) {
            map.insert(to.to_string(), v);
        }
    }
}

impl Serialize for ProfitLossEventCacheEntry {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut value = serde_json::to_value(&self.0).map_err(serde::ser::Error::custom)?;
        rename_key(&mut value, KIND_FIELD, CACHE_ENTRY_KIND_FIELD);
        value.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ProfitLossEventCacheEntry {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let mut value = Value::deserialize(deserializer)?;
        rename_key(&mut value, CACHE_ENTRY_KIND_FIELD, KIND_FIELD);
        ProfitLossEvent::deserialize(value)
            .map(ProfitLossEventCacheEntry)
            .map_err(serde::de::Error::custom)
    }
}

impl DescribeRecord for ProfitLossEventCacheEntry {
    fn record() -> RecordSchema {
        ProfitLossEvent::record()
            .rename_field(KIND_FIELD, CACHE_ENTRY_KIND_FIELD)
            .named("ProfitLossEventCacheEntry")
    }
}

impl Describe for ProfitLossEventCacheEntry {
    fn describe() -> Schema {
        Schema::Record(Self::record())
    }
}

impl JsonSchema for ProfitLossEventCacheEntry {
    fn schema_name() -> String {
        "ProfitLossEventCacheEntry".to_string()
    }

    fn json_schema(gen: &mut SchemaGenerator) -> schemars::schema::Schema {
        let mut schema = ProfitLossEvent::json_schema(gen).into_object();
        let object = schema.object();
        if let Some(kind) = object.properties.remove(KIND_FIELD) {
            object
                .properties
                .insert(CACHE_ENTRY_KIND_FIELD.to_string(), kind);
        }
        if object.required.remove(KIND_FIELD) {
            object.required.insert(CACHE_ENTRY_KIND_FIELD.to_string());
        }
        schema.into()
    }
}

impl Consistency for ProfitLossEventCacheEntry {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        self.0.collect_warnings(path, warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{validate, IssueKind};
    use crate::test_utils::*;
    use serde_json::json;

    #[test]
    fn event_validates_and_round_trips() {
        let value = event_json();
        let event: ProfitLossEvent = validate(value.clone()).unwrap();
        assert_eq!(event.kind, EventKind::Trade);
        assert_eq!(event.cost_basis.as_ref().unwrap().matched_acquisitions.len(), 1);
        assert_eq!(serde_json::to_value(&event).unwrap(), value);
    }

    #[test]
    fn cache_entry_uses_event_type_on_the_wire() {
        let value = cache_entry_json();
        let entry: ProfitLossEventCacheEntry = validate(value.clone()).unwrap();
        assert_eq!(entry.kind, EventKind::Trade);
        assert_eq!(serde_json::to_value(&entry).unwrap(), value);

        let event = entry.into_event();
        assert_eq!(serde_json::to_value(&event).unwrap(), event_json());
    }

    #[test]
    fn each_record_requires_its_own_kind_field() {
        let err = validate::<ProfitLossEvent>(cache_entry_json()).unwrap_err();
        assert!(err.contains_path("type"));
        assert_eq!(err.issues[0].kind, IssueKind::Missing);

        let err = validate::<ProfitLossEventCacheEntry>(event_json()).unwrap_err();
        assert!(err.contains_path("eventType"));
    }

    #[test]
    fn cache_entry_schema_differs_only_in_kind_field_name() {
        let event = ProfitLossEvent::record();
        let entry = ProfitLossEventCacheEntry::record();
        assert_eq!(entry.name(), "ProfitLossEventCacheEntry");
        assert_eq!(entry.fields().len(), event.fields().len());
        for (a, b) in event.fields().iter().zip(entry.fields()) {
            if a.name() == KIND_FIELD {
                assert_eq!(b.name(), CACHE_ENTRY_KIND_FIELD);
                assert_eq!(a.schema(), b.schema());
            } else {
                assert_eq!(a, b);
            }
        }
    }

    #[test]
    fn cost_basis_null_or_empty_is_valid() {
        let mut value = event_json();
        value["costBasis"] = json!(null);
        let event: ProfitLossEvent = validate(value).unwrap();
        assert!(event.cost_basis.is_none());

        let mut value = event_json();
        value["costBasis"] = json!({"isComplete": true, "matchedAcquisitions": []});
        let event: ProfitLossEvent = validate(value).unwrap();
        assert!(event.cost_basis.unwrap().matched_acquisitions.is_empty());
    }

    #[test]
    fn cost_basis_with_wrong_primitive_fails() {
        let mut value = event_json();
        value["costBasis"] = json!({"isComplete": "yes", "matchedAcquisitions": []});
        let err = validate::<ProfitLossEvent>(value).unwrap_err();
        assert!(err.contains_path("costBasis"));
        assert!(err.contains_path("costBasis.isComplete"));
    }

    #[test]
    fn nested_lot_failures_carry_full_path() {
        let mut value = event_json();
        let lots = json!([
            matched_acquisition_json(),
            matched_acquisition_json(),
            without(matched_acquisition_json(), "amount"),
        ]);
        value["costBasis"]["matchedAcquisitions"] = lots;
        let err = validate::<ProfitLossEvent>(value).unwrap_err();
        assert!(err.contains_path("costBasis.matchedAcquisitions[2].amount"));
    }

    #[test]
    fn kind_outside_literal_set_fails() {
        let mut value = event_json();
        value["type"] = json!("swap");
        let err = validate::<ProfitLossEvent>(value).unwrap_err();
        assert_eq!(
            err.issues[0].kind,
            IssueKind::NotInLiteralSet {
                value: "swap".to_string()
            }
        );
    }

    #[test]
    fn kind_names_match_serde() {
        for kind in EventKind::ALL {
            assert_eq!(serde_json::to_value(kind).unwrap(), json!(kind.as_str()));
            assert_eq!(kind.as_str().parse::<EventKind>().unwrap(), kind);
        }
        let described = EventKind::describe().to_string();
        assert!(described.contains("\"margin position close\""));
        assert!("Asset Movement".parse::<EventKind>().is_ok());
        assert!("swap".parse::<EventKind>().is_err());
    }

    #[test]
    fn used_amount_over_lot_amount_warns() {
        let mut value = event_json();
        value["costBasis"]["matchedAcquisitions"][0]["usedAmount"] = json!("0.75");
        let event: ProfitLossEvent = validate(value).unwrap();
        let warnings = event.consistency_warnings();
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].to_string(),
            "costBasis.matchedAcquisitions[0]: used amount 0.75 exceeds acquired amount 0.5"
        );
    }

    #[test]
    fn event_time_as_datetime() {
        let event: ProfitLossEvent = validate(event_json()).unwrap();
        assert_eq!(
            event.datetime().unwrap().to_rfc3339(),
            "2022-01-01T00:00:00+00:00"
        );
    }
}
