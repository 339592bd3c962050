/*! This module sets up the application's database and runs queries against it
off the async runtime. */

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, Transaction as SqlTransaction, functions::FunctionFlags};
use tokio::task::JoinHandle;

use crate::{Error, transaction::create_transaction_table};

/// Create the tables for the domain models if they do not already exist and
/// register the SQL functions used by the queries.
///
/// Functions only live as long as the connection, so this must be called on
/// every new connection.
///
/// # Errors
/// Returns an error if there is an SQL error.
pub fn initialize(connection: &Connection) -> Result<(), Error> {
    register_functions(connection)?;

    let transaction =
        SqlTransaction::new_unchecked(connection, rusqlite::TransactionBehavior::Exclusive)?;

    create_transaction_table(&transaction)?;

    transaction.commit()?;

    Ok(())
}

/// Lowercases text with Unicode case folding, SQLite's `lower()` only handles ASCII.
pub(crate) const UNICODE_LOWER: &str = "unicode_lower";
/// Renders a price as text without a trailing ".0" for whole prices, e.g. "10" and "329.85".
pub(crate) const PRICE_TEXT: &str = "price_text";

fn register_functions(connection: &Connection) -> Result<(), rusqlite::Error> {
    let flags = FunctionFlags::SQLITE_UTF8 | FunctionFlags::SQLITE_DETERMINISTIC;

    connection.create_scalar_function(UNICODE_LOWER, 1, flags, |context| {
        let text = context.get::<Option<String>>(0)?;
        Ok(text.map(|text| text.to_lowercase()))
    })?;
    connection.create_scalar_function(PRICE_TEXT, 1, flags, |context| {
        let price = context.get::<Option<f64>>(0)?;
        Ok(price.map(|price| price.to_string()))
    })
}

/// A query that has been started on the blocking thread pool.
///
/// The query keeps running to completion even if the handle is dropped before
/// it is joined.
#[derive(Debug)]
pub(crate) struct QueryHandle<T>(JoinHandle<Result<T, Error>>);

impl<T> QueryHandle<T> {
    /// Wait for the query to finish and return its result.
    ///
    /// # Errors
    /// Returns the query's own error, or [Error::QueryTaskFailed] if the task
    /// panicked.
    pub(crate) async fn join(self) -> Result<T, Error> {
        self.0
            .await
            .inspect_err(|error| tracing::error!("query task failed: {error}"))
            .map_err(|error| Error::QueryTaskFailed(error.to_string()))?
    }
}

/// Start `query` on the blocking thread pool with exclusive access to the
/// connection for the duration of the query.
///
/// The query starts immediately, so spawning several queries before joining
/// any of them runs them concurrently.
pub(crate) fn spawn_query<T, F>(connection: &Arc<Mutex<Connection>>, query: F) -> QueryHandle<T>
where
    T: Send + 'static,
    F: FnOnce(&Connection) -> Result<T, Error> + Send + 'static,
{
    let connection = connection.clone();

    QueryHandle(tokio::task::spawn_blocking(move || {
        let connection = connection
            .lock()
            .inspect_err(|error| tracing::error!("could not acquire database lock: {error}"))
            .map_err(|_| Error::DatabaseLockError)?;

        query(&connection)
    }))
}
