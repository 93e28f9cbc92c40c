//! Phase 3: escrow and title transfer

use super::{failure, parse_body, AssetRequest, JsonBody};
use crate::state::Gateway;
use axum::extract::State;
use axum::response::{IntoResponse, Response};

/// `POST /fundEscrow`
pub async fn fund_escrow(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().fund_escrow(&asset_id).await
    }
    .await;

    match result {
        Ok(()) => "Phase 1 and Phase 2 Validated Successfully.\nEscrow funded by Buyer Successfully "
            .into_response(),
        Err(e) => failure(
            "fundEscrow",
            "Error funding escrow: ",
            format!("{e}\nPhase 1 and Phase 2 must be completed first."),
        ),
    }
}

/// `POST /propertyTransfer`
pub async fn property_transfer(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().property_transfer(&asset_id).await
    }
    .await;

    match result {
        Ok(()) => "Property Transferred from Seller to Buyer Successfully.".into_response(),
        Err(e) => failure("propertyTransfer", "Error transferring property: ", e),
    }
}

/// `POST /releaseEscrow`
pub async fn release_escrow(
    State(gateway): State<Gateway>,
    body: JsonBody<AssetRequest>,
) -> Response {
    let result = async {
        let asset_id = parse_body(body)?.asset_id()?;
        gateway.lifecycle().release_escrow(&asset_id).await
    }
    .await;

    match result {
        Ok(()) => "Escrow Funds Released to Seller Successfully.\nTransaction completed."
            .into_response(),
        Err(e) => failure("releaseEscrow", "Error releasing escrow: ", e),
    }
}
