//! Defines the core data model and database queries for transactions.

use rusqlite::{Connection, Row};
use serde::{Deserialize, Serialize};

use crate::Error;

// ============================================================================
// MODELS
// ============================================================================

/// A product listing and whether it sold, as published in the seed feed.
///
/// Field names are serialized in camelCase to match the feed and API, e.g.
/// `date_of_sale` becomes `dateOfSale`. Fields missing from a feed record
/// take their default value instead of rejecting the record.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Transaction {
    /// The product ID from the seed feed.
    ///
    /// This is not unique in the store, seeding twice stores each product twice.
    pub id: i64,
    /// The product name.
    pub title: String,
    /// A text description of the product.
    pub description: String,
    /// The listed price of the product.
    pub price: f64,
    /// The product category, e.g. "electronics".
    pub category: String,
    /// Whether the product was sold.
    pub sold: bool,
    /// When the product was sold as an ISO 8601 string, e.g. "2021-11-27T20:29:54+05:30".
    ///
    /// The date is kept as text since month filtering matches on the string.
    pub date_of_sale: String,
    /// A URL to an image of the product.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// The columns to select, in the order expected by [map_transaction_row].
pub(crate) const TRANSACTION_COLUMNS: &str =
    "id, title, description, price, category, sold, date_of_sale, image";

// ============================================================================
// DATABASE FUNCTIONS
// ============================================================================

/// Insert every transaction in `transactions` into the database in a single SQL transaction.
///
/// Transactions are inserted unconditionally: there is no duplicate detection,
/// so inserting the same transactions twice stores them twice.
///
/// # Errors
/// Returns an [Error::SqlError] if there is an SQL error, in which case none
/// of the transactions are inserted.
pub fn insert_transactions(
    transactions: &[Transaction],
    connection: &Connection,
) -> Result<usize, Error> {
    let tx = connection.unchecked_transaction()?;

    let mut stmt = tx.prepare(
        "INSERT INTO \"transaction\" (id, title, description, price, category, sold, date_of_sale, image)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    )?;

    for transaction in transactions {
        stmt.execute((
            transaction.id,
            &transaction.title,
            &transaction.description,
            transaction.price,
            &transaction.category,
            transaction.sold,
            &transaction.date_of_sale,
            &transaction.image,
        ))?;
    }

    drop(stmt);
    tx.commit()?;

    Ok(transactions.len())
}

/// Get the total number of transactions in the database.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_transactions(connection: &Connection) -> Result<u32, Error> {
    connection
        .query_row("SELECT COUNT(row_id) FROM \"transaction\";", [], |row| {
            row.get(0)
        })
        .map_err(|error| error.into())
}

/// Create the transaction table in the database.
///
/// `row_id` is the store's own key and fixes the natural order of records.
///
/// # Errors
/// Returns an error if the table cannot be created or if there is an SQL error.
pub fn create_transaction_table(connection: &Connection) -> Result<(), rusqlite::Error> {
    connection.execute(
        "CREATE TABLE IF NOT EXISTS \"transaction\" (
                row_id INTEGER PRIMARY KEY,
                id INTEGER NOT NULL,
                title TEXT NOT NULL,
                description TEXT NOT NULL,
                price REAL NOT NULL,
                category TEXT NOT NULL,
                sold INTEGER NOT NULL,
                date_of_sale TEXT NOT NULL,
                image TEXT
                )",
        (),
    )?;

    Ok(())
}

/// Map a database row selected with [TRANSACTION_COLUMNS] to a Transaction.
pub fn map_transaction_row(row: &Row) -> Result<Transaction, rusqlite::Error> {
    Ok(Transaction {
        id: row.get(0)?,
        title: row.get(1)?,
        description: row.get(2)?,
        price: row.get(3)?,
        category: row.get(4)?,
        sold: row.get(5)?,
        date_of_sale: row.get(6)?,
        image: row.get(7)?,
    })
}

// ============================================================================
// TESTS
// ============================================================================
