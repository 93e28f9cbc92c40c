//! HTTP router
//!
//! Route names are the legacy contract operation names, so existing
//! frontends keep working unchanged.

use crate::config::ServerConfig;
use crate::handlers::{escrow, health, inspection, negotiation};
use crate::state::Gateway;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

/// Routes, body limit, request tracing and optional CORS
pub fn router(gateway: Gateway, server: &ServerConfig) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .route("/submitPrice", post(negotiation::submit_price))
        .route("/getMinimumPrice", post(negotiation::get_minimum_price))
        .route("/getOfferPrice", post(negotiation::get_offer_price))
        .route("/makeOffer", post(negotiation::make_offer))
        .route("/acceptOffer", post(negotiation::accept_offer))
        .route("/rejectOffer", post(negotiation::reject_offer))
        .route("/getAsset", post(negotiation::get_asset))
        .route(
            "/submitInspectionReport",
            post(inspection::submit_inspection_report),
        )
        .route(
            "/getInspectionReport",
            get(inspection::get_inspection_report),
        )
        .route("/fundEscrow", post(escrow::fund_escrow))
        .route("/propertyTransfer", post(escrow::property_transfer))
        .route("/releaseEscrow", post(escrow::release_escrow))
        .layer(DefaultBodyLimit::max(server.max_report_bytes))
        .layer(TraceLayer::new_for_http());

    let router = if server.cors {
        router.layer(CorsLayer::permissive())
    } else {
        router
    };
    router.with_state(gateway)
}
