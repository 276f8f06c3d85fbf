//! Reports for budgetcap
//!
//! Read-only rollups recomputed from the store on every call: totals,
//! spending per category against caps, monthly series, the month/week/day
//! rollup and the current-month dashboard.

pub mod category;
pub mod dashboard;
pub mod filter;
pub mod monthly;
pub mod rollup;
pub mod totals;

pub use category::{CategoryReport, CategoryReportRow};
pub use dashboard::Dashboard;
pub use filter::ReportFilter;
pub use monthly::{MonthlySeries, MonthlyTotal};
pub use rollup::SpendingRollup;
pub use totals::TotalsReport;
