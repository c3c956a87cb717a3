//! Handler-level tests for the pdfsplice server API.
//!
//! Handlers are exercised directly with in-memory PDFs built via lopdf;
//! the in-memory audit sink verifies the collaborator contract.

use std::sync::Arc;

use axum::extract::State;
use axum::Json;
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use lopdf::{dictionary, Document, Object, Stream};
use pretty_assertions::assert_eq;

use crate::api::{
    handle_inspect, handle_merge, handle_split, FileUpload, InspectRequest, MergeRequest,
    SplitRequest,
};
use crate::audit::MemoryAuditLog;
use crate::error::ServerError;
use crate::AppState;

/// Build a PDF with identifiable page markers, mirroring the core's fixtures.
fn sample_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let kids: Vec<Object> = (1..=num_pages)
        .map(|n| {
            let marker = format!("BT /F1 12 Tf 72 720 Td ({}-{}) Tj ET", prefix, n);
            let content_id = doc.add_object(Stream::new(dictionary! {}, marker.into_bytes()));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
                "Contents" => content_id,
            });
            page_id.into()
        })
        .collect();

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => num_pages as i64,
            "Kids" => kids,
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer).unwrap();
    buffer
}

fn upload(name: &str, bytes: &[u8]) -> FileUpload {
    FileUpload {
        name: name.to_string(),
        data_base64: BASE64.encode(bytes),
    }
}

fn test_state() -> (AppState, Arc<MemoryAuditLog>) {
    let log = Arc::new(MemoryAuditLog::new());
    let state = AppState { audit: log.clone() };
    (state, log)
}

fn decoded_page_count(data_base64: &str) -> usize {
    let bytes = BASE64.decode(data_base64).unwrap();
    Document::load_mem(&bytes).unwrap().get_pages().len()
}

#[tokio::test]
async fn inspect_reports_page_count() {
    let req = InspectRequest {
        file: upload("report.pdf", &sample_pdf(6, "R")),
    };
    let response = handle_inspect(Json(req)).await.unwrap().0;
    assert!(response.success);
    assert_eq!(response.page_count, 6);
}

#[tokio::test]
async fn inspect_rejects_garbage_upload() {
    let req = InspectRequest {
        file: upload("junk.pdf", b"this is not a pdf"),
    };
    let err = handle_inspect(Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::UnreadablePdf(_)));
}

#[tokio::test]
async fn merge_combines_uploads_and_audits() {
    let (state, log) = test_state();
    let req = MergeRequest {
        files: vec![
            upload("a.pdf", &sample_pdf(3, "A")),
            upload("b.pdf", &sample_pdf(2, "B")),
        ],
        output_name: "combined.pdf".to_string(),
        certificate: false,
    };

    let response = handle_merge(State(state), Json(req)).await.unwrap().0;
    assert!(response.success);
    assert_eq!(response.file.name, "combined.pdf");
    assert_eq!(response.file.page_count, 5);
    assert_eq!(decoded_page_count(&response.file.data_base64), 5);
    assert_eq!(response.metrics.page_count, 5);
    assert!(response.certificate.is_none());

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "merge");
    assert_eq!(entries[0].files, vec!["a.pdf", "b.pdf"]);
    assert_eq!(entries[0].output_pages, 5);
}

#[tokio::test]
async fn merge_without_files_is_a_bad_request() {
    let (state, log) = test_state();
    let req = MergeRequest {
        files: vec![],
        output_name: "merged.pdf".to_string(),
        certificate: false,
    };

    let err = handle_merge(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidRequest(_)));
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn merge_rejects_invalid_base64() {
    let (state, _log) = test_state();
    let req = MergeRequest {
        files: vec![FileUpload {
            name: "broken.pdf".to_string(),
            data_base64: "!!not base64!!".to_string(),
        }],
        output_name: "merged.pdf".to_string(),
        certificate: false,
    };

    let err = handle_merge(State(state), Json(req)).await.unwrap_err();
    match err {
        ServerError::InvalidRequest(msg) => assert!(msg.contains("broken.pdf")),
        other => panic!("unexpected error: {}", other),
    }
}

#[tokio::test]
async fn merge_rejects_unreadable_single_upload() {
    let (state, log) = test_state();
    let req = MergeRequest {
        files: vec![upload("junk.pdf", b"not a pdf")],
        output_name: "merged.pdf".to_string(),
        certificate: false,
    };

    let err = handle_merge(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::UnreadablePdf(_)));
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn merge_can_attach_certificate() {
    let (state, _log) = test_state();
    let req = MergeRequest {
        files: vec![
            upload("a.pdf", &sample_pdf(1, "A")),
            upload("b.pdf", &sample_pdf(1, "B")),
        ],
        output_name: "merged.pdf".to_string(),
        certificate: true,
    };

    let response = handle_merge(State(state), Json(req)).await.unwrap().0;
    let cert = response.certificate.expect("certificate requested");
    assert_eq!(cert.name, "merge_deletion_certificate.pdf");
    assert_eq!(decoded_page_count(&cert.data_base64), 1);
}

#[tokio::test]
async fn split_produces_one_part_per_range_in_order() {
    let (state, log) = test_state();
    let req = SplitRequest {
        file: upload("big.pdf", &sample_pdf(10, "P")),
        ranges: "2-4, 8-12".to_string(),
        on_out_of_range: Default::default(),
        certificate: false,
    };

    let response = handle_split(State(state), Json(req)).await.unwrap().0;
    assert!(response.success);
    assert_eq!(response.parts.len(), 2);

    assert_eq!(response.parts[0].label, "2-4");
    assert_eq!(response.parts[0].name, "pages_2_4.pdf");
    assert_eq!(response.parts[0].page_count, 3);

    // 8-12 against ten pages clamps to 8-10 under the default policy.
    assert_eq!(response.parts[1].label, "8-10");
    assert_eq!(response.parts[1].name, "pages_8_10.pdf");
    assert_eq!(response.parts[1].page_count, 3);
    assert_eq!(decoded_page_count(&response.parts[1].data_base64), 3);

    let entries = log.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action, "split");
    assert_eq!(entries[0].range_text.as_deref(), Some("2-4, 8-12"));
    assert_eq!(entries[0].output_pages, 6);
}

#[tokio::test]
async fn split_respects_reject_policy() {
    let (state, log) = test_state();
    let req = SplitRequest {
        file: upload("big.pdf", &sample_pdf(10, "P")),
        ranges: "8-12".to_string(),
        on_out_of_range: pdfsplice_core::OutOfRangePolicy::Reject,
        certificate: false,
    };

    let err = handle_split(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidRange(_)));
    assert!(log.entries().is_empty());
}

#[tokio::test]
async fn split_rejects_inverted_range() {
    let (state, _log) = test_state();
    let req = SplitRequest {
        file: upload("doc.pdf", &sample_pdf(10, "P")),
        ranges: "5-3".to_string(),
        on_out_of_range: Default::default(),
        certificate: false,
    };

    let err = handle_split(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidRange(_)));
}

#[tokio::test]
async fn split_rejects_malformed_range_text() {
    let (state, _log) = test_state();
    let req = SplitRequest {
        file: upload("doc.pdf", &sample_pdf(10, "P")),
        ranges: "abc".to_string(),
        on_out_of_range: Default::default(),
        certificate: false,
    };

    let err = handle_split(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidRange(_)));
}

#[tokio::test]
async fn split_requires_at_least_one_range() {
    let (state, _log) = test_state();
    let req = SplitRequest {
        file: upload("doc.pdf", &sample_pdf(10, "P")),
        ranges: " , ".to_string(),
        on_out_of_range: Default::default(),
        certificate: false,
    };

    let err = handle_split(State(state), Json(req)).await.unwrap_err();
    assert!(matches!(err, ServerError::InvalidRequest(_)));
}
