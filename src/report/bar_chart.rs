//! The price histogram for a month.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::spawn_query,
    transaction::{MonthFilter, WhereClause},
};

use super::price_range::{PRICE_RANGES, PriceRange};

/// The number of transactions in one price range.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BarChartEntry {
    /// The price range label, e.g. "101-200".
    pub range: String,
    /// The number of matching transactions priced within the range.
    pub count: u32,
}

/// Count the transactions matching `month` whose price is within `range`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_in_price_range(
    month: &MonthFilter,
    range: &PriceRange,
    connection: &Connection,
) -> Result<u32, Error> {
    let where_clause = WhereClause::for_month(month).and_price_between(range.min, range.max);

    connection
        .query_row(
            &format!(
                "SELECT COUNT(row_id) FROM \"transaction\" {}",
                where_clause.sql()
            ),
            params_from_iter(where_clause.parameters().iter()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Get the number of transactions matching `month` in each of the [PRICE_RANGES].
///
/// One query per range, all running concurrently. The entries are in the
/// same order as [PRICE_RANGES].
///
/// # Errors
/// Returns an error if any of the queries fail.
pub async fn get_bar_chart(
    connection: &Arc<Mutex<Connection>>,
    month: &MonthFilter,
) -> Result<Vec<BarChartEntry>, Error> {
    let handles: Vec<_> = PRICE_RANGES
        .iter()
        .map(|range| {
            let month = month.clone();
            let range = *range;
            let handle = spawn_query(connection, move |conn| {
                count_in_price_range(&month, &range, conn)
            });
            (range, handle)
        })
        .collect();

    let mut entries = Vec::with_capacity(handles.len());
    for (range, handle) in handles {
        entries.push(BarChartEntry {
            range: range.to_string(),
            count: handle.join().await?,
        });
    }

    Ok(entries)
}
