//! Phase 2: inspection report upload and download
//!
//! The report body goes to the object store first and only its handle is
//! recorded on the ledger. The two writes are independent: if the ledger
//! update fails after the blob was stored, the blob stays behind unreferenced.

use super::{bad_request, failure};
use crate::state::Gateway;
use axum::extract::{Multipart, Query, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use estate_core::{AssetId, EstateError, ObjectStoreEffects};
use serde::Deserialize;
use tracing::{info, warn};

/// Multipart part carrying the report bytes
pub const REPORT_FIELD: &str = "report";

#[derive(Debug, Default)]
struct InspectionUpload {
    asset_id: Option<String>,
    inspector: Option<String>,
    report: Option<Vec<u8>>,
}

impl InspectionUpload {
    async fn read(mut multipart: Multipart) -> Result<Self, Response> {
        let mut upload = Self::default();
        loop {
            let field = match multipart.next_field().await {
                Ok(Some(field)) => field,
                Ok(None) => break,
                Err(e) => return Err((e.status(), e.body_text()).into_response()),
            };

            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                REPORT_FIELD => {
                    let bytes = field
                        .bytes()
                        .await
                        .map_err(|e| (e.status(), e.body_text()).into_response())?;
                    upload.report = Some(bytes.to_vec());
                }
                "assetId" | "inspector" => {
                    let text = field
                        .text()
                        .await
                        .map_err(|e| (e.status(), e.body_text()).into_response())?;
                    if name == "assetId" {
                        upload.asset_id = Some(text);
                    } else {
                        upload.inspector = Some(text);
                    }
                }
                _ => {}
            }
        }
        Ok(upload)
    }
}

/// `POST /submitInspectionReport` (multipart: `report`, `assetId`, `inspector`)
pub async fn submit_inspection_report(
    State(gateway): State<Gateway>,
    multipart: Multipart,
) -> Response {
    let upload = match InspectionUpload::read(multipart).await {
        Ok(upload) => upload,
        Err(response) => return response,
    };

    let Some(report) = upload.report else {
        return bad_request("No report file uploaded.");
    };
    let Some(asset_id) = upload.asset_id else {
        return bad_request("Missing field: assetId");
    };
    let Some(inspector) = upload.inspector else {
        return bad_request("Missing field: inspector");
    };

    const PREFIX: &str = "Error submitting inspection report: ";
    let asset_id = match AssetId::parse(&asset_id) {
        Ok(id) => id,
        Err(e) => return failure("submitInspectionReport", PREFIX, e),
    };

    let size = report.len();
    let handle = match gateway.objects().put(report).await {
        Ok(handle) => handle,
        Err(e) => return failure("submitInspectionReport", PREFIX, e),
    };
    info!(asset_id = %asset_id, handle = %handle, size, "inspection report stored");

    match gateway
        .lifecycle()
        .submit_inspection_report(&asset_id, inspector, handle.clone())
        .await
    {
        Ok(()) => {
            format!("Inspection report submitted with content handle: {handle}").into_response()
        }
        Err(e) => {
            warn!(
                asset_id = %asset_id,
                handle = %handle,
                "ledger update failed; report blob is orphaned"
            );
            failure("submitInspectionReport", PREFIX, e)
        }
    }
}

/// Query string of the download route
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReportQuery {
    /// Target asset
    pub asset_id: String,
}

/// `GET /getInspectionReport?assetId=`: report bytes as an attachment
pub async fn get_inspection_report(
    State(gateway): State<Gateway>,
    Query(query): Query<ReportQuery>,
) -> Response {
    let result = async {
        let asset_id = AssetId::parse(&query.asset_id)?;
        let handle = gateway.lifecycle().get_inspection_report(&asset_id).await?;
        let bytes = gateway.objects().get(&handle).await?;
        Ok::<_, EstateError>((asset_id, bytes))
    }
    .await;

    match result {
        Ok((asset_id, bytes)) => (
            [
                (header::CONTENT_TYPE, "application/octet-stream".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{asset_id}_inspection_report\""),
                ),
            ],
            bytes,
        )
            .into_response(),
        Err(e) => failure(
            "getInspectionReport",
            "Error fetching inspection report: ",
            e,
        ),
    }
}
