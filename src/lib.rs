//! Sales report is a small web service for browsing and summarising product
//! sales.
//!
//! The service seeds a SQLite record store from a remote JSON feed and
//! exposes a REST API that lists, filters and pages transactions, and reports
//! monthly sales statistics, price-range histograms and category breakdowns.

#![warn(missing_docs)]

use std::{net::SocketAddr, time::Duration};

use axum_server::Handle;
use tokio::signal;

mod app_state;
mod db;
mod endpoints;
mod internal_server_error;
mod report;
mod routing;
mod seed;
mod transaction;

pub use app_state::AppState;
pub use routing::build_router;
pub use report::{
    BarChartEntry, CombinedReport, PRICE_RANGES, PieChartEntry, PriceRange, Statistics,
};
pub use seed::DEFAULT_SEED_URL;
pub use transaction::{MonthFilter, Pagination, Transaction, TransactionFilter};

/// An async task that waits for either the ctrl+c or terminate signal, whichever comes first, and
/// then signals the server to shut down gracefully.
///
/// `handle` is a handle to an Axum `Server`.
pub async fn graceful_shutdown(handle: Handle<SocketAddr>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::debug!("Received ctrl+c signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
        _ = terminate => {
            tracing::debug!("Received terminate signal.");
            handle.graceful_shutdown(Some(Duration::from_secs(1)));
        },
    }
}

/// The errors that may occur in the application.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The seed data could not be downloaded or decoded.
    ///
    /// The error string should only be logged for debugging on the server.
    /// Clients only ever see a generic internal server error.
    #[error("could not fetch seed data: {0}")]
    SeedFetch(String),

    /// An unhandled/unexpected SQL error.
    #[error("an unexpected SQL error occurred: {0}")]
    SqlError(rusqlite::Error),

    /// Could not acquire the database lock
    #[error("could not acquire the database lock")]
    DatabaseLockError,

    /// A query running on the blocking thread pool panicked or was aborted
    /// before it could return a result.
    #[error("query task failed: {0}")]
    QueryTaskFailed(String),
}

impl From<rusqlite::Error> for Error {
    fn from(value: rusqlite::Error) -> Self {
        tracing::error!("an unhandled SQL error occurred: {}", value);
        Error::SqlError(value)
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Error::SeedFetch(value.to_string())
    }
}
