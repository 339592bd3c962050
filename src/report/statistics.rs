//! Sales totals and sold/unsold counts for a month.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::spawn_query,
    transaction::{MonthFilter, WhereClause},
};

/// Summary statistics for the transactions sold in a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// The sum of the prices of all matching transactions, sold or not.
    pub total_sale_amount: f64,
    /// The number of matching transactions that sold.
    pub total_sold_items: u32,
    /// The number of matching transactions that did not sell.
    pub total_not_sold_items: u32,
}

/// Get the sum of the prices of the transactions matching `month`, or zero if there are none.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn get_total_sale_amount(month: &MonthFilter, connection: &Connection) -> Result<f64, Error> {
    let where_clause = WhereClause::for_month(month);

    connection
        .query_row(
            &format!(
                "SELECT COALESCE(SUM(price), 0.0) FROM \"transaction\" {}",
                where_clause.sql()
            ),
            params_from_iter(where_clause.parameters().iter()),
            |row| row.get(0),
        )
        .map_err(|error| error.into())
}

/// Count the transactions matching `month` whose sold flag equals `sold`.
///
/// # Errors
/// This function will return a [Error::SqlError] there is some SQL error.
pub fn count_by_sold(
    month: &MonthFilter,
    sold: bool,
    connection: &Connection,
) -> Result<u32, Error> {
    let where_clause = WhereClause::for_month(month).and_sold(sold);

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

/// Get the sales statistics for `month`.
///
/// The total and the two counts are queried concurrently.
///
/// # Errors
/// Returns an error if any of the queries fail.
pub async fn get_statistics(
    connection: &Arc<Mutex<Connection>>,
    month: &MonthFilter,
) -> Result<Statistics, Error> {
    let total = {
        let month = month.clone();
        spawn_query(connection, move |conn| get_total_sale_amount(&month, conn))
    };
    let sold = {
        let month = month.clone();
        spawn_query(connection, move |conn| count_by_sold(&month, true, conn))
    };
    let not_sold = {
        let month = month.clone();
        spawn_query(connection, move |conn| count_by_sold(&month, false, conn))
    };

    let (total_sale_amount, total_sold_items, total_not_sold_items) =
        tokio::try_join!(total.join(), sold.join(), not_sold.join())?;

    Ok(Statistics {
        total_sale_amount,
        total_sold_items,
        total_not_sold_items,
    })
}
