//! Schemas and typed records for profit/loss tax report payloads.
//!
//! Every record derives its schema description from its fields, so the same declaration
//! drives validation of untyped JSON and (de)serialization of the typed value:
//!
//! ```
//! use pnlreport::{validate, Report};
//! use serde_json::json;
//!
//! let report: Report = validate(json!({
//!     "identifier": 1,
//!     "name": "2023",
//!     "timestamp": null,
//!     "startTs": 1672531200,
//!     "endTs": 1704067199,
//!     "sizeOnDisk": "1024.5"
//! }))
//! .unwrap();
//! assert_eq!(report.name, "2023");
//! ```

pub mod consistency;
pub mod error;
pub mod numeric;
pub mod paging;
pub mod registry;
pub mod report;
pub mod schema;

#[cfg(test)]
mod test_utils;

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::io::Read;

pub use consistency::{Consistency, ConsistencyWarning};
pub use error::{PayloadError, Result};
pub use numeric::NumericString;
pub use paging::{Paged, PagedResourceParameters};
pub use registry::Registry;
pub use report::*;
pub use schema::{validate, Describe, DescribeRecord, Schema, ValidationError};

/// Parse JSON text and validate it as `T`
pub fn from_str<T>(text: &str) -> Result<T>
where
    T: Describe + DeserializeOwned,
{
    let value: Value = serde_json::from_str(text)?;
    Ok(validate(value)?)
}

/// Read a JSON document and validate it as `T`
pub fn from_reader<T, R>(reader: R) -> Result<T>
where
    T: Describe + DeserializeOwned,
    R: Read,
{
    let value: Value = serde_json::from_reader(reader)?;
    Ok(validate(value)?)
}
