//! Application router configuration.

use axum::{Router, routing::get};
use tower_http::cors::CorsLayer;

use crate::{
    AppState, endpoints,
    report::{
        get_bar_chart_endpoint, get_combined_endpoint, get_pie_chart_endpoint,
        get_statistics_endpoint,
    },
    seed::get_init_endpoint,
    transaction::list_transactions_endpoint,
};

/// Return a router with all the app's routes.
///
/// Every route is nested under [endpoints::API] and accepts requests from any origin.
pub fn build_router(state: AppState) -> Router {
    let api_routes = Router::new()
        .route(endpoints::INIT, get(get_init_endpoint))
        .route(endpoints::TRANSACTIONS, get(list_transactions_endpoint))
        .route(endpoints::STATISTICS, get(get_statistics_endpoint))
        .route(endpoints::BAR_CHART, get(get_bar_chart_endpoint))
        .route(endpoints::PIE_CHART, get(get_pie_chart_endpoint))
        .route(endpoints::COMBINED, get(get_combined_endpoint));

    Router::new()
        .nest(endpoints::API, api_routes)
        .layer(CorsLayer::permissive())
        .with_state(state)
}
