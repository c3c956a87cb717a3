//! API handlers for the pdfsplice server
//!
//! Provides REST endpoints for:
//! - Document inspection (page count)
//! - Merging several uploads into one PDF
//! - Splitting one upload into one PDF per page range

use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use pdfsplice_core::{
    extract, page_count, parse_ranges, OutOfRangePolicy, SourceDocument, SpliceCommand,
    SpliceMetrics,
};

use crate::audit::AuditEntry;
use crate::certificate::deletion_certificate;
use crate::error::ServerError;
use crate::AppState;

/// A PDF carried in a JSON request body.
#[derive(Debug, Clone, Deserialize)]
pub struct FileUpload {
    pub name: String,
    /// Base64-encoded PDF bytes
    pub data_base64: String,
}

impl FileUpload {
    fn decode(&self) -> Result<Vec<u8>, ServerError> {
        BASE64.decode(&self.data_base64).map_err(|e| {
            ServerError::InvalidRequest(format!("file '{}' is not valid base64: {}", self.name, e))
        })
    }
}

/// A PDF returned in a JSON response body.
#[derive(Debug, Serialize)]
pub struct FileDownload {
    pub name: String,
    /// Base64-encoded PDF bytes
    pub data_base64: String,
    pub page_count: u32,
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: &'static str,
    pub version: &'static str,
}

/// Handler: GET /health
pub async fn handle_health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "pdfsplice-server",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Inspect request body
#[derive(Deserialize)]
pub struct InspectRequest {
    pub file: FileUpload,
}

/// Inspect response
#[derive(Debug, Serialize)]
pub struct InspectResponse {
    pub success: bool,
    pub page_count: u32,
}

/// Handler: POST /api/inspect
///
/// Reports the page count of an upload so a client can validate range input
/// before requesting a split.
pub async fn handle_inspect(
    Json(req): Json<InspectRequest>,
) -> Result<Json<InspectResponse>, ServerError> {
    let bytes = req.file.decode()?;
    let pages = page_count(&bytes)?;

    info!("Inspect: '{}' has {} pages", req.file.name, pages);

    Ok(Json(InspectResponse {
        success: true,
        page_count: pages,
    }))
}

/// Merge request body
#[derive(Deserialize)]
pub struct MergeRequest {
    pub files: Vec<FileUpload>,

    /// Name for the produced file
    #[serde(default = "default_merge_name")]
    pub output_name: String,

    /// Attach a data-deletion certificate to the response
    #[serde(default)]
    pub certificate: bool,
}

fn default_merge_name() -> String {
    "merged.pdf".to_string()
}

/// Merge response
#[derive(Debug, Serialize)]
pub struct MergeResponse {
    pub success: bool,
    pub file: FileDownload,
    pub metrics: SpliceMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<FileDownload>,
}

/// Handler: POST /api/merge
pub async fn handle_merge(
    State(state): State<AppState>,
    Json(req): Json<MergeRequest>,
) -> Result<Json<MergeResponse>, ServerError> {
    // Zero uploads is a user mistake at this surface, even though the core
    // treats an empty merge as a valid zero-page result.
    if req.files.is_empty() {
        return Err(ServerError::InvalidRequest("no files to merge".into()));
    }

    info!(
        "Merge request: {} files -> '{}'",
        req.files.len(),
        req.output_name
    );

    let names: Vec<String> = req.files.iter().map(|f| f.name.clone()).collect();
    let mut buffers = Vec::with_capacity(req.files.len());
    for file in &req.files {
        buffers.push(file.decode()?);
    }

    let outcome = SpliceCommand::Merge { files: buffers }.execute()?;
    let merged = outcome
        .documents
        .into_iter()
        .next()
        .ok_or_else(|| ServerError::Internal("merge produced no output".into()))?;

    state.audit.record(AuditEntry {
        at: Utc::now(),
        action: "merge",
        files: names,
        range_text: None,
        output_pages: merged.page_count,
    });

    let certificate = issue_certificate(req.certificate, "merge")?;

    Ok(Json(MergeResponse {
        success: true,
        file: FileDownload {
            name: req.output_name,
            data_base64: BASE64.encode(&merged.data),
            page_count: merged.page_count,
        },
        metrics: outcome.metrics,
        certificate,
    }))
}

/// Split request body
#[derive(Deserialize)]
pub struct SplitRequest {
    pub file: FileUpload,

    /// Range expression like `"1-3, 5, 8-10"`
    pub ranges: String,

    /// Whether a range ending past the last page is clamped or refused
    #[serde(default)]
    pub on_out_of_range: OutOfRangePolicy,

    /// Attach a data-deletion certificate to the response
    #[serde(default)]
    pub certificate: bool,
}

/// One produced part of a split
#[derive(Debug, Serialize)]
pub struct SplitPart {
    /// Label of the requested range, e.g. `"2-4"`
    pub label: String,
    pub name: String,
    pub data_base64: String,
    pub page_count: u32,
}

/// Split response
#[derive(Debug, Serialize)]
pub struct SplitResponse {
    pub success: bool,
    /// Parts in the order the ranges were given
    pub parts: Vec<SplitPart>,
    pub metrics: SpliceMetrics,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub certificate: Option<FileDownload>,
}

/// Handler: POST /api/split
pub async fn handle_split(
    State(state): State<AppState>,
    Json(req): Json<SplitRequest>,
) -> Result<Json<SplitResponse>, ServerError> {
    // One load backs the page count and every extraction.
    let bytes = req.file.decode()?;
    let source = SourceDocument::from_bytes(&bytes)?;
    let total = source.page_count();

    info!(
        "Split request: '{}' ({} pages), ranges '{}'",
        req.file.name, total, req.ranges
    );

    let ranges = parse_ranges(&req.ranges, total, req.on_out_of_range)?;
    if ranges.is_empty() {
        return Err(ServerError::InvalidRequest("no page ranges given".into()));
    }

    let documents = extract(&source, &ranges, req.on_out_of_range)?;
    let metrics = SpliceMetrics {
        input_size_bytes: bytes.len(),
        output_size_bytes: documents.iter().map(|d| d.data.len()).sum(),
        page_count: documents.iter().map(|d| d.page_count).sum(),
    };

    state.audit.record(AuditEntry {
        at: Utc::now(),
        action: "split",
        files: vec![req.file.name.clone()],
        range_text: Some(req.ranges.clone()),
        output_pages: metrics.page_count,
    });

    let certificate = issue_certificate(req.certificate, "split")?;

    let parts = documents
        .into_iter()
        .map(|doc| SplitPart {
            name: format!("pages_{}.pdf", doc.label.replace('-', "_")),
            data_base64: BASE64.encode(&doc.data),
            page_count: doc.page_count,
            label: doc.label,
        })
        .collect();

    Ok(Json(SplitResponse {
        success: true,
        parts,
        metrics,
        certificate,
    }))
}

fn issue_certificate(wanted: bool, action: &str) -> Result<Option<FileDownload>, ServerError> {
    if !wanted {
        return Ok(None);
    }
    let data = deletion_certificate(action, Utc::now())?;
    Ok(Some(FileDownload {
        name: format!("{}_deletion_certificate.pdf", action),
        data_base64: BASE64.encode(&data),
        page_count: 1,
    }))
}
