//! Defines the route handler for listing transactions a page at a time.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, db::spawn_query, internal_server_error::InternalServerError};

use super::{
    core::Transaction,
    query::{Pagination, TransactionFilter, get_transactions},
};

/// The message sent to the client when transactions cannot be listed.
pub const LIST_TRANSACTIONS_ERROR_MSG: &str = "Error fetching transactions";

/// The state needed for listing transactions.
#[derive(Debug, Clone)]
pub struct ListTransactionsState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ListTransactionsState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters for listing transactions.
///
/// Every parameter is kept as a raw string so that malformed values reach
/// the query builder instead of being rejected.
#[derive(Debug, Default, Deserialize)]
pub struct ListTransactionsParams {
    /// The 1-based page number.
    pub page: Option<String>,
    /// The number of transactions per page.
    #[serde(rename = "perPage")]
    pub per_page: Option<String>,
    /// Text to look for in the title, description or price.
    pub search: Option<String>,
    /// The two digit month, e.g. "03" for March.
    pub month: Option<String>,
}

/// Return a page of the transactions sold in the requested month that match the search text.
pub async fn list_transactions_endpoint(
    State(state): State<ListTransactionsState>,
    Query(params): Query<ListTransactionsParams>,
) -> Result<Json<Vec<Transaction>>, InternalServerError> {
    let filter = TransactionFilter::new(params.month.as_deref(), params.search.as_deref());
    let pagination = Pagination::from_params(params.page.as_deref(), params.per_page.as_deref());
    tracing::debug!("listing transactions with {filter:?} and {pagination:?}");

    spawn_query(&state.db_connection, move |connection| {
        get_transactions(&filter, Some(pagination), connection)
    })
    .join()
    .await
    .map(Json)
    .map_err(|error| {
        tracing::error!("could not list transactions: {error}");
        InternalServerError::new(LIST_TRANSACTIONS_ERROR_MSG)
    })
}
