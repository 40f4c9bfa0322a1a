//! JSON fixtures shared by the record tests

use serde_json::{json, Map, Value};

pub fn overview_json() -> Value {
    json!({
        "loanProfit": "0",
        "defiProfitLoss": "12.5",
        "marginPositionsProfitLoss": "-3",
        "ledgerActionsProfitLoss": "0",
        "settlementLosses": "0",
        "ethereumTransactionGasCosts": "0.0042",
        "assetMovementFees": "1.2",
        "generalTradeProfitLoss": "250.75",
        "taxableTradeProfitLoss": "100",
        "totalTaxableProfitLoss": "109.2958",
        "totalProfitLoss": "259.0458"
    })
}

pub fn matched_acquisition_json() -> Value {
    json!({
        "time": 1609459200,
        "description": "Buy BTC on kraken",
        "location": "kraken",
        "amount": "0.5",
        "rate": "29000.12",
        "feeRate": "0.1",
        "usedAmount": "0.25"
    })
}

pub fn cost_basis_json() -> Value {
    json!({
        "isComplete": true,
        "matchedAcquisitions": [matched_acquisition_json()]
    })
}

/// A sell event, with its kind under `type`
pub fn event_json() -> Value {
    json!({
        "location": "kraken",
        "type": "trade",
        "paidInProfitCurrency": "0",
        "paidAsset": "BTC",
        "paidInAsset": "0.25",
        "taxableAmount": "0.25",
        "taxableBoughtCostInProfitCurrency": "7250.03",
        "receivedAsset": "EUR",
        "taxableReceivedInProfitCurrency": "9000",
        "receivedInAsset": "9000",
        "netProfitOrLoss": "1749.97",
        "costBasis": cost_basis_json(),
        "time": 1640995200,
        "isVirtual": false
    })
}

/// The same event as [`event_json`], with its kind under `eventType`
pub fn cache_entry_json() -> Value {
    rename_key(event_json(), "type", "eventType")
}

pub fn report_json() -> Value {
    json!({
        "identifier": 1,
        "name": "2023",
        "timestamp": null,
        "startTs": 1672531200,
        "endTs": 1704067199,
        "sizeOnDisk": "1024.5"
    })
}

pub fn trade_history_json() -> Value {
    json!({
        "eventsProcessed": 1,
        "eventsLimit": 1000,
        "firstProcessedTimestamp": 1640995200,
        "overview": overview_json(),
        "allEvents": [cache_entry_json()],
        "loaded": true
    })
}

pub fn paging_json() -> Value {
    json!({
        "offset": 0,
        "limit": 10
    })
}

/// Shallow union of JSON objects, later keys winning
pub fn merge(values: &[Value]) -> Value {
    let mut merged = Map::new();
    for value in values {
        if let Value::Object(map) = value {
            merged.extend(map.clone());
        }
    }
    Value::Object(merged)
}

pub fn rename_key(mut value: Value, from: &str, to: &str) -> Value {
    if let Some(map) = value.as_object_mut() {
        if let Some(v) = map.remove(from) {
            map.insert(to.to_string(), v);
        }
    }
    value
}

pub fn without(mut value: Value, key: &str) -> Value {
    if let Some(map) = value.as_object_mut() {
        map.remove(key);
    }
    value
}
