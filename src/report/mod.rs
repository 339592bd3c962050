//! Monthly sales reports
//!
//! Provides sales statistics, a price histogram, a category breakdown, and a
//! combined report with all three plus the month's transactions. Each report
//! fans its independent queries out concurrently.

mod bar_chart;
mod combined;
mod handlers;
mod pie_chart;
mod price_range;
mod statistics;

pub use bar_chart::BarChartEntry;
pub use combined::CombinedReport;
pub use handlers::{
    get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint, get_statistics_endpoint,
};
pub use pie_chart::PieChartEntry;
pub use price_range::{PRICE_RANGES, PriceRange};
pub use statistics::Statistics;
