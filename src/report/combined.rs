//! Every report for a month in a single response.

use std::sync::{Arc, Mutex};

use rusqlite::Connection;
use serde::{Deserialize, Serialize};

use crate::{
    Error,
    db::spawn_query,
    transaction::{MonthFilter, Transaction, TransactionFilter, get_transactions},
};

use super::{
    bar_chart::{BarChartEntry, get_bar_chart},
    pie_chart::{PieChartEntry, get_pie_chart},
    statistics::{Statistics, get_statistics},
};

/// The transactions, statistics, price histogram and category breakdown for a month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CombinedReport {
    /// Every transaction sold in the month, without paging.
    pub transactions: Vec<Transaction>,
    /// The sales statistics for the month.
    pub statistics: Statistics,
    /// The price histogram for the month.
    pub bar_chart: Vec<BarChartEntry>,
    /// The category breakdown for the month.
    pub pie_chart: Vec<PieChartEntry>,
}

/// Get every report for `month`.
///
/// The transaction list and the three reports are queried concurrently and
/// the first error fails the whole report. Queries that are already running
/// when another one fails still run to completion, their results are
/// discarded.
///
/// # Errors
/// Returns an error if any of the queries fail.
pub async fn get_combined_report(
    connection: &Arc<Mutex<Connection>>,
    month: &MonthFilter,
) -> Result<CombinedReport, Error> {
    let filter = TransactionFilter {
        month: month.clone(),
        search: None,
    };
    let transactions =
        spawn_query(connection, move |conn| get_transactions(&filter, None, conn));

    let (transactions, statistics, bar_chart, pie_chart) = tokio::try_join!(
        transactions.join(),
        get_statistics(connection, month),
        get_bar_chart(connection, month),
        get_pie_chart(connection, month),
    )?;

    Ok(CombinedReport {
        transactions,
        statistics,
        bar_chart,
        pie_chart,
    })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use rusqlite::Connection;

    use crate::{
        Error,
        db::initialize,
        report::{bar_chart::get_bar_chart, pie_chart::get_pie_chart, statistics::get_statistics},
        transaction::{
            MonthFilter, Transaction, TransactionFilter, get_transactions, insert_transactions,
            test_utils::sample_transaction,
        },
    };

    use super::get_combined_report;

    fn get_test_connection() -> Arc<Mutex<Connection>> {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();

        let transactions: Vec<_> = (1..=40)
            .map(|i| Transaction {
                sold: i % 2 == 0,
                category: ["electronics", "jewelery", "men's clothing"][i as usize % 3].to_owned(),
                ..sample_transaction(
                    i,
                    (i * 37 % 1200) as f64,
                    &format!("2022-{:02}-15T00:00:00Z", i % 4 + 1),
                )
            })
            .collect();
        insert_transactions(&transactions, &conn).unwrap();

        Arc::new(Mutex::new(conn))
    }

    #[tokio::test]
    async fn combined_report_matches_individual_reports() {
        let connection = get_test_connection();
        let month = MonthFilter::new(Some("02"));

        let got = get_combined_report(&connection, &month).await.unwrap();

        assert_eq!(
            got.statistics,
            get_statistics(&connection, &month).await.unwrap()
        );
        assert_eq!(
            got.bar_chart,
            get_bar_chart(&connection, &month).await.unwrap()
        );
        assert_eq!(
            got.pie_chart,
            get_pie_chart(&connection, &month).await.unwrap()
        );
    }

    #[tokio::test]
    async fn combined_report_lists_every_matching_transaction() {
        let connection = get_test_connection();
        let month = MonthFilter::new(Some("03"));
        let want = get_transactions(
            &TransactionFilter {
                month: month.clone(),
                search: None,
            },
            None,
            &connection.lock().unwrap(),
        )
        .unwrap();

        let got = get_combined_report(&connection, &month).await.unwrap();

        assert_eq!(got.transactions, want);
        assert_eq!(got.transactions.len(), 10);
        assert_eq!(
            (got.statistics.total_sold_items + got.statistics.total_not_sold_items) as usize,
            got.transactions.len()
        );
    }

    #[tokio::test]
    async fn any_failed_query_fails_the_report() {
        let connection = get_test_connection();
        connection
            .lock()
            .unwrap()
            .execute("DROP TABLE \"transaction\"", [])
            .unwrap();

        let got = get_combined_report(&connection, &MonthFilter::new(Some("02"))).await;

        assert!(matches!(got, Err(Error::SqlError(_))), "got {got:?}");
    }

    #[test]
    fn serializes_with_camel_case() {
        let report = super::CombinedReport {
            transactions: Vec::new(),
            statistics: crate::report::statistics::Statistics {
                total_sale_amount: 0.0,
                total_sold_items: 0,
                total_not_sold_items: 0,
            },
            bar_chart: Vec::new(),
            pie_chart: Vec::new(),
        };

        let got = serde_json::to_value(report).unwrap();

        for key in ["transactions", "statistics", "barChart", "pieChart"] {
            assert!(got.get(key).is_some(), "missing key {key} in {got}");
        }
    }
}
