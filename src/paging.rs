//! Pagination envelope merged into listing payloads.

use crate::consistency::{Consistency, ConsistencyWarning};
use crate::schema::FieldPath;
use pnlreport_derive::Shape;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Offset, limit and ordering of a paged resource
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema, Shape)]
#[serde(rename_all = "camelCase")]
pub struct PagedResourceParameters {
    /// Number of entries skipped
    pub offset: u64,
    /// Maximum number of entries in the page
    pub limit: u64,
    /// Attributes to order by, most significant first
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_by_attributes: Option<Vec<String>>,
    /// Direction for each entry of `orderByAttributes`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ascending: Option<Vec<bool>>,
}

impl Consistency for PagedResourceParameters {}

/// A record extended with the pagination envelope
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema, Shape)]
pub struct Paged<T> {
    #[serde(flatten)]
    pub inner: T,
    #[serde(flatten)]
    pub paging: PagedResourceParameters,
}

impl<T: Consistency> Consistency for Paged<T> {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        self.inner.collect_warnings(path, warnings);
    }
}
