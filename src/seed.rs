//! Seeds the database with the transactions published in a remote JSON feed.

use std::sync::{Arc, Mutex};

use axum::extract::{FromRef, State};
use rusqlite::Connection;

use crate::{
    AppState, Error,
    db::spawn_query,
    internal_server_error::InternalServerError,
    transaction::{Transaction, count_transactions, insert_transactions},
};

/// The feed used to seed the database when no other URL is configured.
pub const DEFAULT_SEED_URL: &str = "https://s3.amazonaws.com/roxiler.com/product_transaction.json";

/// The message sent to the client once the database has been seeded.
pub const SEED_SUCCESS_MSG: &str = "Database initialized with seed data";
/// The message sent to the client when the database could not be seeded.
pub const SEED_ERROR_MSG: &str = "Error initializing database";

/// The state needed for seeding the database.
#[derive(Debug, Clone)]
pub struct SeedState {
    /// The database connection for storing transactions.
    pub db_connection: Arc<Mutex<Connection>>,
    /// The client used to download the feed.
    pub http_client: reqwest::Client,
    /// The URL of the feed.
    pub seed_url: String,
}

impl FromRef<AppState> for SeedState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
            http_client: state.http_client.clone(),
            seed_url: state.seed_url.clone(),
        }
    }
}

/// Download the transactions published at `url`.
///
/// # Errors
/// Returns an [Error::SeedFetch] if the request fails, the server responds
/// with an error status, or the body is not a JSON array of objects.
/// Records with missing fields are accepted, see [Transaction].
pub async fn fetch_seed_transactions(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<Transaction>, Error> {
    let transactions = client
        .get(url)
        .send()
        .await?
        .error_for_status()?
        .json::<Vec<Transaction>>()
        .await?;

    Ok(transactions)
}

/// Download the feed and insert every transaction in it.
///
/// Nothing is deduplicated, seeding twice stores every transaction twice.
/// Returns the number of transactions inserted.
///
/// # Errors
/// Returns an error if the feed cannot be fetched or the transactions cannot
/// be inserted, in which case nothing is inserted.
pub async fn seed_database(state: &SeedState) -> Result<usize, Error> {
    let transactions = fetch_seed_transactions(&state.http_client, &state.seed_url).await?;
    tracing::debug!(
        "fetched {} transactions from {}",
        transactions.len(),
        state.seed_url
    );

    spawn_query(&state.db_connection, move |connection| {
        let inserted = insert_transactions(&transactions, connection)?;
        let total = count_transactions(connection)?;
        tracing::info!("Inserted {inserted} transactions, the database now holds {total}.");

        Ok(inserted)
    })
    .join()
    .await
}

/// Seed the database from the configured feed.
pub async fn get_init_endpoint(
    State(state): State<SeedState>,
) -> Result<&'static str, InternalServerError> {
    seed_database(&state)
        .await
        .map(|_| SEED_SUCCESS_MSG)
        .map_err(|error| {
            tracing::error!("could not seed the database: {error}");
            InternalServerError::new(SEED_ERROR_MSG)
        })
}
