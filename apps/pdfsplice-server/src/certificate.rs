//! Data-deletion certificate.
//!
//! Optional one-page PDF stating that nothing from the request was retained.
//! Generated from scratch; it consumes nothing from the operation except the
//! fact that it succeeded.

use chrono::{DateTime, Utc};
use lopdf::{dictionary, Document, Object, Stream};

use crate::error::ServerError;

/// Build the certificate PDF for a completed `action` (`"merge"`/`"split"`).
pub fn deletion_certificate(action: &str, at: DateTime<Utc>) -> Result<Vec<u8>, ServerError> {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });

    let lines = [
        format!("Data Deletion Certificate ({})", action),
        format!("Generated on: {}", at.format("%Y-%m-%d %H:%M:%S UTC")),
        "All uploaded documents were processed in memory and discarded.".to_string(),
    ];
    let mut ops = String::from("BT /F1 12 Tf 50 750 Td ");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            ops.push_str("0 -24 Td ");
        }
        ops.push('(');
        ops.push_str(&escape_literal(line));
        ops.push_str(") Tj ");
    }
    ops.push_str("ET");

    let content_id = doc.add_object(Stream::new(dictionary! {}, ops.into_bytes()));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "MediaBox" => vec![0.into(), 0.into(), 612.into(), 792.into()],
        "Resources" => resources_id,
        "Contents" => content_id,
    });

    doc.objects.insert(
        pages_id,
        Object::Dictionary(dictionary! {
            "Type" => "Pages",
            "Count" => 1,
            "Kids" => vec![page_id.into()],
        }),
    );
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", Object::Reference(catalog_id));

    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| ServerError::Internal(format!("certificate generation failed: {}", e)))?;
    Ok(buffer)
}

/// Escape the characters PDF literal strings reserve.
fn escape_literal(text: &str) -> String {
    text.replace('\\', "\\\\")
        .replace('(', "\\(")
        .replace(')', "\\)")
}
