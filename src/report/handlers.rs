//! Route handlers for the monthly reports.

use std::sync::{Arc, Mutex};

use axum::{
    Json,
    extract::{FromRef, Query, State},
};
use rusqlite::Connection;
use serde::Deserialize;

use crate::{AppState, internal_server_error::InternalServerError, transaction::MonthFilter};

use super::{
    bar_chart::{BarChartEntry, get_bar_chart},
    combined::{CombinedReport, get_combined_report},
    pie_chart::{PieChartEntry, get_pie_chart},
    statistics::{Statistics, get_statistics},
};

/// The message sent to the client when the statistics cannot be computed.
pub const STATISTICS_ERROR_MSG: &str = "Error fetching statistics";
/// The message sent to the client when the bar chart cannot be computed.
pub const BAR_CHART_ERROR_MSG: &str = "Error fetching bar chart data";
/// The message sent to the client when the pie chart cannot be computed.
pub const PIE_CHART_ERROR_MSG: &str = "Error fetching pie chart data";
/// The message sent to the client when the combined report cannot be computed.
pub const COMBINED_ERROR_MSG: &str = "Error fetching combined data";

/// The state needed for the report endpoints.
#[derive(Debug, Clone)]
pub struct ReportState {
    /// The database connection for reading transactions.
    pub db_connection: Arc<Mutex<Connection>>,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            db_connection: state.db_connection.clone(),
        }
    }
}

/// The query parameters shared by the report endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct MonthQuery {
    /// The two digit month, e.g. "03" for March.
    pub month: Option<String>,
}

impl MonthQuery {
    fn filter(&self) -> MonthFilter {
        MonthFilter::new(self.month.as_deref())
    }
}

/// Get the sales total and sold/unsold counts for the requested month.
pub async fn get_statistics_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Statistics>, InternalServerError> {
    get_statistics(&state.db_connection, &query.filter())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!("could not get statistics for {query:?}: {error}");
            InternalServerError::new(STATISTICS_ERROR_MSG)
        })
}

/// Get the price histogram for the requested month.
pub async fn get_bar_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<BarChartEntry>>, InternalServerError> {
    get_bar_chart(&state.db_connection, &query.filter())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!("could not get bar chart for {query:?}: {error}");
            InternalServerError::new(BAR_CHART_ERROR_MSG)
        })
}

/// Get the category breakdown for the requested month.
pub async fn get_pie_chart_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<Vec<PieChartEntry>>, InternalServerError> {
    get_pie_chart(&state.db_connection, &query.filter())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!("could not get pie chart for {query:?}: {error}");
            InternalServerError::new(PIE_CHART_ERROR_MSG)
        })
}

/// Get the transactions and every report for the requested month.
pub async fn get_combined_endpoint(
    State(state): State<ReportState>,
    Query(query): Query<MonthQuery>,
) -> Result<Json<CombinedReport>, InternalServerError> {
    get_combined_report(&state.db_connection, &query.filter())
        .await
        .map(Json)
        .map_err(|error| {
            tracing::error!("could not get combined report for {query:?}: {error}");
            InternalServerError::new(COMBINED_ERROR_MSG)
        })
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use axum::{Router, http::StatusCode, routing::get};
    use axum_test::TestServer;
    use rusqlite::Connection;

    use crate::{
        db::initialize,
        endpoints,
        report::{
            bar_chart::BarChartEntry, combined::CombinedReport, pie_chart::PieChartEntry,
            statistics::Statistics,
        },
        transaction::{Transaction, insert_transactions, test_utils::sample_transaction},
    };

    use super::{
        BAR_CHART_ERROR_MSG, COMBINED_ERROR_MSG, PIE_CHART_ERROR_MSG, ReportState,
        STATISTICS_ERROR_MSG, get_bar_chart_endpoint, get_combined_endpoint,
        get_pie_chart_endpoint, get_statistics_endpoint,
    };

    fn get_test_connection() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        initialize(&conn).unwrap();
        insert_transactions(
            &[
                Transaction {
                    sold: true,
                    category: "jewelery".to_owned(),
                    ..sample_transaction(1, 50.0, "2021-11-27T20:29:54+05:30")
                },
                sample_transaction(2, 150.5, "2022-11-01T08:00:00+05:30"),
                sample_transaction(3, 950.0, "2022-11-30T23:00:00+05:30"),
                sample_transaction(4, 75.0, "2022-12-01T08:00:00+05:30"),
            ],
            &conn,
        )
        .unwrap();

        conn
    }

    fn get_test_server(conn: Connection) -> TestServer {
        let state = ReportState {
            db_connection: Arc::new(Mutex::new(conn)),
        };
        let app = Router::new()
            .route(endpoints::STATISTICS, get(get_statistics_endpoint))
            .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
            .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
            .route(endpoints::COMBINED, get(get_combined_endpoint))
            .with_state(state);

        TestServer::new(app)
    }

    fn get_broken_test_server() -> TestServer {
        let conn = get_test_connection();
        conn.execute("DROP TABLE \"transaction\"", []).unwrap();

        get_test_server(conn)
    }

    #[tokio::test]
    async fn statistics_endpoint_returns_month_totals() {
        let server = get_test_server(get_test_connection());

        let response = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "11")
            .await;

        response.assert_status_ok();
        response.assert_json(&Statistics {
            total_sale_amount: 1150.5,
            total_sold_items: 1,
            total_not_sold_items: 2,
        });
    }

    #[tokio::test]
    async fn bar_chart_endpoint_returns_ten_ranges() {
        let server = get_test_server(get_test_connection());

        let response = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "11")
            .await;

        response.assert_status_ok();
        let got: Vec<BarChartEntry> = response.json();
        assert_eq!(got.len(), 10);
        assert_eq!(got[0].range, "0-100");
        assert_eq!(got[0].count, 1);
        assert_eq!(got[1].count, 1);
        assert_eq!(got[9].range, "901-Infinity");
        assert_eq!(got[9].count, 1);
    }

    #[tokio::test]
    async fn pie_chart_endpoint_returns_categories() {
        let server = get_test_server(get_test_connection());

        let response = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "11")
            .await;

        response.assert_status_ok();
        response.assert_json(&vec![
            PieChartEntry {
                category: "jewelery".to_owned(),
                count: 1,
            },
            PieChartEntry {
                category: "electronics".to_owned(),
                count: 2,
            },
        ]);
    }

    #[tokio::test]
    async fn combined_endpoint_matches_individual_endpoints() {
        let server = get_test_server(get_test_connection());

        let combined: CombinedReport = server
            .get(endpoints::COMBINED)
            .add_query_param("month", "11")
            .await
            .json();
        let statistics: Statistics = server
            .get(endpoints::STATISTICS)
            .add_query_param("month", "11")
            .await
            .json();
        let bar_chart: Vec<BarChartEntry> = server
            .get(endpoints::BAR_CHART)
            .add_query_param("month", "11")
            .await
            .json();
        let pie_chart: Vec<PieChartEntry> = server
            .get(endpoints::PIE_CHART)
            .add_query_param("month", "11")
            .await
            .json();

        assert_eq!(combined.transactions.len(), 3);
        assert_eq!(combined.statistics, statistics);
        assert_eq!(combined.bar_chart, bar_chart);
        assert_eq!(combined.pie_chart, pie_chart);
    }

    #[tokio::test]
    async fn missing_month_reports_on_every_transaction() {
        let server = get_test_server(get_test_connection());

        let got: Statistics = server.get(endpoints::STATISTICS).await.json();

        assert_eq!(got.total_sold_items + got.total_not_sold_items, 4);
    }

    #[tokio::test]
    async fn store_failures_return_endpoint_specific_messages() {
        let server = get_broken_test_server();

        for (endpoint, message) in [
            (endpoints::STATISTICS, STATISTICS_ERROR_MSG),
            (endpoints::BAR_CHART, BAR_CHART_ERROR_MSG),
            (endpoints::PIE_CHART, PIE_CHART_ERROR_MSG),
            (endpoints::COMBINED, COMBINED_ERROR_MSG),
        ] {
            let response = server
                .get(endpoint)
                .add_query_param("month", "11")
                .expect_failure()
                .await;

            response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
            response.assert_text(message);
        }
    }
}
