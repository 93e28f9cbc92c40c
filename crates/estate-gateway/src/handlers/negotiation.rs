//! Phase 1: listing, offers, acceptance

use super::{failure, parse_body, AssetRequest, JsonBody};
use crate::state::Gateway;
use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use estate_core::{Amount, AssetId, Result};
use serde::Deserialize;
use serde_json::json;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitPriceRequest {
    /// Required unless ids are generated
    #[serde(default)]
    pub asset_id: Option<String>,
    /// Listing party
    pub seller: String,
    /// Minimum price
    pub offer_price: Amount,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OfferRequest {
    /// Target asset
    pub asset_id: String,
    /// Offering party
    pub buyer: String,
    /// Proposed price
    pub offer_price: Amount,
}

/// `POST /submitPrice`: list an asset with the seller's minimum price
pub async fn submit_price(
    State(gateway): State<Gateway>,
    body: JsonBody<SubmitPriceRequest>,
) -> Response {
    let result = async {
        let request = parse_body(body)?;
        let asset_id = request.asset_id.as_deref().map(AssetId::parse).transpose()?;
        gateway
            .lifecycle()
            .create_asset(asset_id, request.seller, request.offer_price)
            .await
    }
    .await;

    match result {
        Ok(asset_id) => Json(json!({
            "message": "Asset created successfully",
            "assetId": asset_id,
        }))
        .into_response(),
        Err(e) => failure("createAsset", "Server error: ", e),
    }
}

/// `POST /getMinimumPrice`
pub async fn get_minimum_price(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().get_minimum_price(&asset_id).await
    }
    .await;

    match result {
        Ok(price) => Json(json!({ "minimumPrice": price.to_string() })).into_response(),
        Err(e) => failure("getMinimumPrice", "Error fetching minimum price: ", e),
    }
}

/// `POST /getOfferPrice`
pub async fn get_offer_price(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().get_offer_price(&asset_id).await
    }
    .await;

    match result {
        Ok(price) => Json(json!({ "offerPrice": price.to_string() })).into_response(),
        Err(e) => failure("getOfferPrice", "Error fetching offer price: ", e),
    }
}

/// `POST /makeOffer`: answers `Offer made by {buyer} for {price}`
pub async fn make_offer(
    State(gateway): State<Gateway>,
    body: JsonBody<OfferRequest>,
) -> Response {
    let result: Result<OfferRequest> = async {
        let request = parse_body(body)?;
        let asset_id = AssetId::parse(&request.asset_id)?;
        gateway
            .lifecycle()
            .make_offer(&asset_id, request.buyer.clone(), request.offer_price)
            .await?;
        Ok(request)
    }
    .await;

    match result {
        Ok(request) => format!(
            "Offer made by {} for {}",
            request.buyer, request.offer_price
        )
        .into_response(),
        Err(e) => failure("makeOffer", "Error making offer: ", e),
    }
}

/// `POST /acceptOffer`
pub async fn accept_offer(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().accept_offer(&asset_id).await
    }
    .await;

    match result {
        Ok(()) => "Offer Accepted. Phase 1 Complete. ".into_response(),
        Err(e) => failure("acceptOffer", "Error accepting offer: ", e),
    }
}

/// `POST /rejectOffer`: clears the offer and relists
pub async fn reject_offer(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().reject_offer(&asset_id).await
    }
    .await;

    match result {
        Ok(()) => "Offer Rejected. Values are Reset.".into_response(),
        Err(e) => failure("rejectOffer", "Error rejecting offer: ", e),
    }
}

/// `POST /getAsset`: full record as JSON
pub async fn get_asset(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().get_asset(&asset_id).await
    }
    .await;

    match result {
        Ok(record) => Json(record).into_response(),
        Err(e) => failure("getAsset", "Error fetching asset: ", e),
    }
}
