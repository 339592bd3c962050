//! The API endpoints URIs.
//!
//! Every route below is nested under [API].

/// The prefix shared by all API routes.
pub const API: &str = "/api";
/// The route for seeding the database from the remote feed.
pub const INIT: &str = "/init";
/// The route for listing transactions a page at a time.
pub const TRANSACTIONS: &str = "/transactions";
/// The route for the monthly sales statistics.
pub const STATISTICS: &str = "/statistics";
/// The route for the monthly price histogram.
pub const BAR_CHART: &str = "/bar-chart";
/// The route for the monthly category breakdown.
pub const PIE_CHART: &str = "/pie-chart";
/// The route for the transactions and all reports for a month.
pub const COMBINED: &str = "/combined";
