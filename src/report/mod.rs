pub mod events;
pub mod history;
pub mod metadata;
pub mod overview;
pub mod payload;

pub use events::{
    CostBasis, EventKind, MatchedAcquisition, MatchedAcquisitions, ProfitLossEvent,
    ProfitLossEventCacheEntry,
};
pub use history::{TradeHistory, TradeHistoryReport};
pub use metadata::{Report, ReportError, ReportPeriod, ReportProgress};
pub use overview::ProfitLossOverviewData;
pub use payload::{
    PagedReport, PagedReportEventsPayload, PagedReportOverviewPayload, PagedReportsPayload,
    ReportEventsPayload, ReportOverviewPayload, ReportsPayload,
};
