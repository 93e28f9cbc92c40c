//! HTTP walk-throughs against the router, without sockets

#![allow(clippy::unwrap_used)]

use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::response::Response;
use axum::Router;
use estate_core::{LifecyclePolicy, ObjectStoreEffects};
use estate_effects::{content_handle, MemoryLedger, MemoryObjectStore};
use estate_gateway::config::ServerConfig;
use estate_gateway::{router, Gateway};
use serde_json::{json, Value};
use tower::ServiceExt;

const BOUNDARY: &str = "estate-test-boundary";
const REPORT: &[u8] = b"%PDF-1.4\nroof ok, plumbing ok\n";

fn app() -> (Router, MemoryObjectStore) {
    let objects = MemoryObjectStore::new();
    let gateway = Gateway::from_parts(
        MemoryLedger::new(),
        objects.clone(),
        LifecyclePolicy::default(),
    );
    (router(gateway, &ServerConfig::default()), objects)
}

async fn post_json(app: &Router, uri: &str, body: Value) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn get(app: &Router, uri: &str) -> Response {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn body_bytes(response: Response) -> Vec<u8> {
    to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

async fn body_text(response: Response) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}

async fn body_json(response: Response) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

fn multipart_body(fields: &[(&str, &str)], report: Option<&[u8]>) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, value) in fields {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
            )
            .as_bytes(),
        );
    }
    if let Some(report) = report {
        body.extend_from_slice(
            format!(
                "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"report\"; filename=\"report.pdf\"\r\nContent-Type: application/pdf\r\n\r\n"
            )
            .as_bytes(),
        );
        body.extend_from_slice(report);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

async fn upload(app: &Router, fields: &[(&str, &str)], report: Option<&[u8]>) -> Response {
    let request = Request::builder()
        .method("POST")
        .uri("/submitInspectionReport")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(fields, report)))
        .unwrap();
    app.clone().oneshot(request).await.unwrap()
}

async fn list(app: &Router, asset_id: &str) {
    let response = post_json(
        app,
        "/submitPrice",
        json!({ "assetId": asset_id, "seller": "sellerX", "offerPrice": 100000 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_health() {
    let (app, _) = app();
    let response = get(&app, "/health").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "OK");
}

#[tokio::test]
async fn test_full_walkthrough() {
    let (app, _) = app();

    let response = post_json(
        &app,
        "/submitPrice",
        json!({ "assetId": "A1", "seller": "sellerX", "offerPrice": "100000" }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({ "message": "Asset created successfully", "assetId": "A1" })
    );

    let response = post_json(&app, "/getMinimumPrice", json!({ "assetId": "A1" })).await;
    assert_eq!(body_json(response).await, json!({ "minimumPrice": "100000" }));

    let response = post_json(
        &app,
        "/makeOffer",
        json!({ "assetId": "A1", "buyer": "buyerY", "offerPrice": 95000 }),
    )
    .await;
    assert_eq!(body_text(response).await, "Offer made by buyerY for 95000");

    let response = post_json(&app, "/getOfferPrice", json!({ "assetId": "A1" })).await;
    assert_eq!(body_json(response).await, json!({ "offerPrice": "95000" }));

    let response = post_json(&app, "/acceptOffer", json!({ "assetId": "A1" })).await;
    assert_eq!(body_text(response).await, "Offer Accepted. Phase 1 Complete. ");

    let response = upload(
        &app,
        &[("assetId", "A1"), ("inspector", "inspectorZ")],
        Some(REPORT),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_text(response).await,
        format!(
            "Inspection report submitted with content handle: {}",
            content_handle(REPORT)
        )
    );

    let response = get(&app, "/getInspectionReport?assetId=A1").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[header::CONTENT_TYPE],
        "application/octet-stream"
    );
    assert_eq!(
        response.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"A1_inspection_report\""
    );
    assert_eq!(body_bytes(response).await, REPORT.to_vec());

    let response = post_json(&app, "/fundEscrow", json!({ "assetId": "A1" })).await;
    assert_eq!(
        body_text(response).await,
        "Phase 1 and Phase 2 Validated Successfully.\nEscrow funded by Buyer Successfully "
    );

    let response = post_json(&app, "/propertyTransfer", json!({ "assetId": "A1" })).await;
    assert_eq!(
        body_text(response).await,
        "Property Transferred from Seller to Buyer Successfully."
    );

    let response = post_json(&app, "/releaseEscrow", json!({ "assetId": "A1" })).await;
    assert_eq!(
        body_text(response).await,
        "Escrow Funds Released to Seller Successfully.\nTransaction completed."
    );

    let response = post_json(&app, "/getAsset", json!({ "assetId": "A1" })).await;
    let record = body_json(response).await;
    assert_eq!(record["status"], "completed");
    assert_eq!(record["buyer"], "buyerY");
    assert_eq!(record["inspector"], "inspectorZ");
    assert_eq!(record["reportHandle"], content_handle(REPORT).as_str());
}

#[tokio::test]
async fn test_fund_escrow_on_fresh_asset_fails() {
    let (app, _) = app();
    list(&app, "A2").await;

    let response = post_json(&app, "/fundEscrow", json!({ "assetId": "A2" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error funding escrow: Escrow cannot be funded before inspection completion\nPhase 1 and Phase 2 must be completed first."
    );
}

#[tokio::test]
async fn test_reject_offer_resets_record() {
    let (app, _) = app();
    list(&app, "A1").await;
    post_json(
        &app,
        "/makeOffer",
        json!({ "assetId": "A1", "buyer": "buyerY", "offerPrice": 95000 }),
    )
    .await;

    let response = post_json(&app, "/rejectOffer", json!({ "assetId": "A1" })).await;
    assert_eq!(body_text(response).await, "Offer Rejected. Values are Reset.");

    let record = body_json(post_json(&app, "/getAsset", json!({ "assetId": "A1" })).await).await;
    assert_eq!(record["status"], "available");
    assert_eq!(record["buyer"], "");
    assert_eq!(record["offerPrice"], 0);
}

#[tokio::test]
async fn test_unknown_asset_and_duplicate_listing() {
    let (app, _) = app();

    let response = post_json(&app, "/getMinimumPrice", json!({ "assetId": "nope" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error fetching minimum price: The asset nope does not exist"
    );

    list(&app, "A1").await;
    let response = post_json(
        &app,
        "/submitPrice",
        json!({ "assetId": "A1", "seller": "sellerQ", "offerPrice": 1 }),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Server error: The asset A1 already exists"
    );
}

#[tokio::test]
async fn test_upload_without_report_is_bad_request() {
    let (app, _) = app();
    list(&app, "A1").await;

    let response = upload(&app, &[("assetId", "A1"), ("inspector", "inspectorZ")], None).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "No report file uploaded.");

    let response = upload(&app, &[("assetId", "A1")], Some(REPORT)).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_text(response).await, "Missing field: inspector");
}

#[tokio::test]
async fn test_rejected_upload_leaves_orphaned_blob() {
    let (app, objects) = app();
    list(&app, "A1").await;

    let response = upload(
        &app,
        &[("assetId", "A1"), ("inspector", "inspectorZ")],
        Some(REPORT),
    )
    .await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error submitting inspection report: Inspection cannot proceed before offer acceptance"
    );
    assert!(objects.contains(&content_handle(REPORT)).await.unwrap());

    let response = get(&app, "/getInspectionReport?assetId=A1").await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        body_text(response).await,
        "Error fetching inspection report: No inspection report found for asset A1"
    );
}

#[tokio::test]
async fn test_oversized_report_is_refused() {
    let gateway = Gateway::from_parts(
        MemoryLedger::new(),
        MemoryObjectStore::new(),
        LifecyclePolicy::default(),
    );
    let server = ServerConfig {
        max_report_bytes: 64,
        ..ServerConfig::default()
    };
    let app = router(gateway, &server);
    list(&app, "A1").await;

    let response = upload(
        &app,
        &[("assetId", "A1"), ("inspector", "inspectorZ")],
        Some(&[b'x'; 1024][..]),
    )
    .await;
    assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn test_undecodable_body_answers_500_with_prefix() {
    let (app, _) = app();
    list(&app, "A1").await;

    let response = post_json(&app, "/acceptOffer", json!({ "asset": "A1" })).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let text = body_text(response).await;
    assert!(text.starts_with("Error accepting offer: Invalid: "), "{text}");
    assert!(text.contains("assetId"), "{text}");

    let request = Request::builder()
        .method("POST")
        .uri("/makeOffer")
        .header(header::CONTENT_TYPE, "text/plain")
        .body(Body::from("assetId=A1"))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body_text(response)
        .await
        .starts_with("Error making offer: Invalid: "));

    let record = body_json(post_json(&app, "/getAsset", json!({ "assetId": "A1" })).await).await;
    assert_eq!(record["status"], "available");
}
