//! Checks for relationships between fields which payloads are expected, but not required, to hold.

use crate::schema::FieldPath;
use serde::Serialize;
use std::fmt;

/// Finding on a validated record. Never a validation failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type")]
pub enum ConsistencyWarning {
    /// A period or report range ends before it starts
    ReversedRange {
        path: FieldPath,
        start: u64,
        end: u64,
    },
    /// A matched acquisition uses more than its lot amount
    UsedAmountExceedsAmount {
        path: FieldPath,
        used_amount: String,
        amount: String,
    },
    /// More events processed than the events limit allows
    EventsExceedLimit {
        path: FieldPath,
        processed: u64,
        limit: i64,
    },
    /// A listing page holds more entries than its limit
    EntriesExceedLimit {
        path: FieldPath,
        entries: usize,
        limit: i64,
    },
}

impl fmt::Display for ConsistencyWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConsistencyWarning::ReversedRange { path, start, end } => {
                write!(f, "{}: range ends at {} before it starts at {}", path, end, start)
            }
            ConsistencyWarning::UsedAmountExceedsAmount {
                path,
                used_amount,
                amount,
            } => write!(
                f,
                "{}: used amount {} exceeds acquired amount {}",
                path, used_amount, amount
            ),
            ConsistencyWarning::EventsExceedLimit {
                path,
                processed,
                limit,
            } => write!(
                f,
                "{}: {} events processed exceeds the limit of {}",
                path, processed, limit
            ),
            ConsistencyWarning::EntriesExceedLimit {
                path,
                entries,
                limit,
            } => write!(
                f,
                "{}: {} entries returned exceeds the limit of {}",
                path, entries, limit
            ),
        }
    }
}

/// Records which can report [`ConsistencyWarning`]s about themselves and their contents.
pub trait Consistency {
    /// Push warnings for this value, located at `path`
    fn collect_warnings(&self, _path: &FieldPath, _warnings: &mut Vec<ConsistencyWarning>) {}

    fn consistency_warnings(&self) -> Vec<ConsistencyWarning> {
        let mut warnings = Vec::new();
        self.collect_warnings(&FieldPath::root(), &mut warnings);
        warnings
    }
}

impl<T: Consistency> Consistency for Vec<T> {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        for (i, item) in self.iter().enumerate() {
            item.collect_warnings(&path.index(i), warnings);
        }
    }
}

impl<T: Consistency> Consistency for Option<T> {
    fn collect_warnings(&self, path: &FieldPath, warnings: &mut Vec<ConsistencyWarning>) {
        if let Some(value) = self {
            value.collect_warnings(path, warnings);
        }
    }
}

pub(crate) fn check_range(
    path: &FieldPath,
    start: u64,
    end: u64,
    warnings: &mut Vec<ConsistencyWarning>,
) {
    if start > end {
        warnings.push(ConsistencyWarning::ReversedRange {
            path: path.clone(),
            start,
            end,
        });
    }
}
