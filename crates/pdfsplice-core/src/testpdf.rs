//! Programmatic PDF fixtures shared by the crate's tests.

use lopdf::{dictionary, Document, Object, Stream};

/// Build a PDF with `num_pages` pages, each carrying an identifiable
/// `{prefix}-{page}` marker in its content stream.
pub(crate) fn sample_pdf(num_pages: u32, prefix: &str) -> Vec<u8> {
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

/// Page count of a serialized PDF.
pub(crate) fn loaded_page_count(bytes: &[u8]) -> u32 {
    Document::load_mem(bytes).unwrap().get_pages().len() as u32
}

/// Decoded content stream of page `page_no` (1-based), as text.
pub(crate) fn page_text(bytes: &[u8], page_no: u32) -> String {
    let doc = Document::load_mem(bytes).unwrap();
    let page_id = doc.get_pages()[&page_no];
    String::from_utf8_lossy(&doc.get_page_content(page_id).unwrap()).into_owned()
}
