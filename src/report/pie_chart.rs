//! The category breakdown for a month.

use std::sync::{Arc, Mutex};

use rusqlite::{Connection, params_from_iter};
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::spawn_query,
    transaction::{MonthFilter, WhereClause},
};

/// The number of transactions in one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PieChartEntry {
    /// The category name.
    pub category: String,
    /// The number of matching transactions in the category.
    pub count: u32,
}

/// Count the transactions matching `month` in each category.
///
/// Categories are ordered by where they first appear in the store.
///
/// # Errors
/// Returns [Error::SqlError] if:
/// - SQL query preparation or execution fails
/// - Row mapping fails
pub fn get_category_counts(
    month: &MonthFilter,
    connection: &Connection,
) -> Result<Vec<PieChartEntry>, Error> {
    let where_clause = WhereClause::for_month(month);

    let query = format!(
        "SELECT category, COUNT(row_id) FROM \"transaction\" {} \
        GROUP BY category ORDER BY MIN(row_id) ASC",
        where_clause.sql()
    );

    connection
        .prepare(&query)?
        .query_map(params_from_iter(where_clause.parameters().iter()), |row| {
            Ok(PieChartEntry {
                category: row.get(0)?,
                count: row.get(1)?,
            })
        })?
        .map(|entry_result| entry_result.map_err(Error::SqlError))
        .collect()
}

/// Get the category breakdown for `month`.
///
/// # Errors
/// Returns an error if the query fails.
pub async fn get_pie_chart(
    connection: &Arc<Mutex<Connection>>,
    month: &MonthFilter,
) -> Result<Vec<PieChartEntry>, Error> {
    let month = month.clone();

    spawn_query(connection, move |conn| get_category_counts(&month, conn))
        .join()
        .await
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        db::initialize,
        transaction::{
            MonthFilter, Transaction, insert_transactions, test_utils::sample_transaction,
        },
    };

    use super::{PieChartEntry, get_category_counts, get_pie_chart};

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        conn
    }

    fn with_category(id: i64, category: &str, date_of_sale: &str) -> Transaction {
        Transaction {
            category: category.to_owned(),
            ..sample_transaction(id, 10.0, date_of_sale)
        }
    }

    #[test]
    fn groups_by_category_in_order_of_first_appearance() {
        let conn = get_test_connection();
        insert_transactions(
            &[
                with_category(1, "jewelery", "2022-08-01T00:00:00Z"),
                with_category(2, "electronics", "2022-08-02T00:00:00Z"),
                with_category(3, "jewelery", "2022-08-03T00:00:00Z"),
                with_category(4, "men's clothing", "2022-09-03T00:00:00Z"),
                with_category(5, "electronics", "2022-08-04T00:00:00Z"),
                with_category(6, "jewelery", "2022-08-05T00:00:00Z"),
            ],
            &conn,
        )
        .unwrap();

        let got = get_category_counts(&MonthFilter::new(Some("08")), &conn).unwrap();

        assert_eq!(
            got,
            [
                PieChartEntry {
                    category: "jewelery".to_owned(),
                    count: 3
                },
                PieChartEntry {
                    category: "electronics".to_owned(),
                    count: 2
                },
            ]
        );
    }

    #[tokio::test]
    async fn counts_sum_to_matching_transactions() {
        let conn = get_test_connection();
        let categories = ["a", "b", "c", "a", "b", "a", "d"];
        let transactions: Vec<_> = categories
            .iter()
            .enumerate()
            .map(|(i, category)| with_category(i as i64, category, "2022-10-10T00:00:00Z"))
            .collect();
        insert_transactions(&transactions, &conn).unwrap();
        let connection = Arc::new(Mutex::new(conn));

        let got = get_pie_chart(&connection, &MonthFilter::new(Some("10")))
            .await
            .unwrap();

        assert_eq!(got.len(), 4);
        assert_eq!(
            got.iter().map(|entry| entry.count).sum::<u32>() as usize,
            categories.len()
        );
    }

    #[tokio::test]
    async fn empty_month_has_no_categories() {
        let connection = Arc::new(Mutex::new(get_test_connection()));

        let got = get_pie_chart(&connection, &MonthFilter::new(Some("10")))
            .await
            .unwrap();

        assert!(got.is_empty());
    }
}
