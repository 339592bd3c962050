//! Implements a struct that holds the state of the REST server.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;

use crate::{Error, db::initialize};

/// The state of the REST server.
#[derive(Debug, Clone)]
pub struct AppState {
    /// The database connection shared by every request handler.
    pub db_connection: Arc<Mutex<Connection>>,

    /// The client used to download the seed data.
    pub http_client: reqwest::Client,

    /// The URL of the JSON document used to seed the database.
    pub seed_url: String,
}

impl AppState {
    /// Create a new [AppState] with a SQLite database connection.
    ///
    /// This function will initialize the database by adding the transaction table.
    ///
    /// # Errors
    /// Returns an error if the database cannot be initialized.
    pub fn new(db_connection: Connection, seed_url: &str) -> Result<Self, Error> {
        initialize(&db_connection)?;

        Ok(Self {
            db_connection: Arc::new(Mutex::new(db_connection)),
            http_client: reqwest::Client::new(),
            seed_url: seed_url.to_owned(),
        })
    }
}
