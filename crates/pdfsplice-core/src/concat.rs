//! Concatenation of multiple PDFs into one document.

use std::collections::BTreeMap;

use lopdf::{Dictionary, Document, Object, ObjectId};

use crate::error::SpliceError;

/// Append every page of every input document, in input order then in-document
/// page order, into a single output PDF.
///
/// Object IDs from each source are shifted past the IDs already present in
/// the destination so references never collide, then the page tree is rebuilt
/// over the combined page list. No page is dropped, reordered, or
/// deduplicated.
///
/// An empty input slice yields a valid zero-page document rather than an
/// error; whether that is worth surfacing as "nothing to do" is the caller's
/// decision.
pub fn concatenate(documents: &[Vec<u8>]) -> Result<Vec<u8>, SpliceError> {
    if documents.is_empty() {
        return save(empty_document());
    }
    // A single source passes through untouched, once it proves readable.
    if documents.len() == 1 {
        Document::load_mem(&documents[0])
            .map_err(|e| SpliceError::SourceRead(format!("document 1: {}", e)))?;
        return Ok(documents[0].clone());
    }

    let mut sources = Vec::with_capacity(documents.len());
    for (index, bytes) in documents.iter().enumerate() {
        let doc = Document::load_mem(bytes)
            .map_err(|e| SpliceError::SourceRead(format!("document {}: {}", index + 1, e)))?;
        sources.push(doc);
    }

    let mut sources = sources.into_iter();
    let mut dest = sources.next().expect("length checked above");
    let mut page_refs: Vec<ObjectId> = ordered_page_refs(&dest);

    for source in sources {
        let offset = dest.max_id;
        let source_pages = ordered_page_refs(&source);
        let source_max = source.max_id;

        let shifted: BTreeMap<ObjectId, Object> = source
            .objects
            .into_iter()
            .map(|((num, gen), object)| ((num + offset, gen), shift_references(object, offset)))
            .collect();
        dest.objects.extend(shifted);

        page_refs.extend(source_pages.into_iter().map(|(num, gen)| (num + offset, gen)));
        dest.max_id = dest.max_id.max(source_max + offset);
    }

    rebuild_page_tree(&mut dest, &page_refs)?;
    dest.compress();
    save(dest)
}

/// Page object references in page order.
fn ordered_page_refs(doc: &Document) -> Vec<ObjectId> {
    doc.get_pages().values().copied().collect()
}

/// Shift every indirect reference inside `object` by `offset`.
fn shift_references(object: Object, offset: u32) -> Object {
    match object {
        Object::Reference((num, gen)) => Object::Reference((num + offset, gen)),
        Object::Array(items) => Object::Array(
            items
                .into_iter()
                .map(|item| shift_references(item, offset))
                .collect(),
        ),
        Object::Dictionary(mut dict) => {
            for (_, value) in dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Dictionary(dict)
        }
        Object::Stream(mut stream) => {
            for (_, value) in stream.dict.iter_mut() {
                *value = shift_references(value.clone(), offset);
            }
            Object::Stream(stream)
        }
        other => other,
    }
}

/// Point the destination's page tree root at the combined page list.
fn rebuild_page_tree(doc: &mut Document, page_refs: &[ObjectId]) -> Result<(), SpliceError> {
    let catalog_id = doc
        .trailer
        .get(b"Root")
        .and_then(|root| root.as_reference())
        .map_err(|_| structure("trailer has no document catalog"))?;

    let pages_id = doc
        .objects
        .get(&catalog_id)
        .ok_or_else(|| structure("catalog object missing"))?
        .as_dict()
        .and_then(|catalog| catalog.get(b"Pages"))
        .and_then(|pages| pages.as_reference())
        .map_err(|_| structure("catalog has no page tree"))?;

    match doc.objects.get_mut(&pages_id) {
        Some(Object::Dictionary(pages)) => {
            pages.set(
                "Kids",
                Object::Array(page_refs.iter().map(|&id| Object::Reference(id)).collect()),
            );
            pages.set("Count", Object::Integer(page_refs.len() as i64));
            Ok(())
        }
        _ => Err(structure("page tree root is not a dictionary")),
    }
}

fn structure(detail: &str) -> SpliceError {
    SpliceError::SourceRead(detail.to_string())
}

/// A well-formed document with no pages.
fn empty_document() -> Document {
    let mut doc = Document::with_version("1.7");
    let pages_id = doc.new_object_id();

    let mut pages = Dictionary::new();
    pages.set("Type", Object::Name(b"Pages".to_vec()));
    pages.set("Count", Object::Integer(0));
    pages.set("Kids", Object::Array(vec![]));
    doc.objects.insert(pages_id, Object::Dictionary(pages));

    let mut catalog = Dictionary::new();
    catalog.set("Type", Object::Name(b"Catalog".to_vec()));
    catalog.set("Pages", Object::Reference(pages_id));
    let catalog_id = doc.add_object(catalog);
    doc.trailer.set("Root", Object::Reference(catalog_id));
    doc
}

fn save(mut doc: Document) -> Result<Vec<u8>, SpliceError> {
    let mut buffer = Vec::new();
    doc.save_to(&mut buffer)
        .map_err(|e| SpliceError::Save(e.to_string()))?;
    Ok(buffer)
}
