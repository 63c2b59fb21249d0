//! PDF page counting, trimming and text-layer extraction.

use std::panic::{self, AssertUnwindSafe};

use lopdf::Document;

use crate::error::{DocPrepError, Result};
use crate::range::PageRange;

fn load(bytes: &[u8]) -> Result<Document> {
    Document::load_mem(bytes).map_err(|e| DocPrepError::Pdf(e.to_string()))
}

/// True when the bytes start with the PDF magic number.
pub fn is_pdf(head: &[u8]) -> bool {
    head.starts_with(b"%PDF-")
}

pub fn page_count(bytes: &[u8]) -> Result<u32> {
    Ok(load(bytes)?.get_pages().len() as u32)
}

/// Returns a new PDF holding only the pages in `range`.
pub fn trim(bytes: &[u8], range: PageRange) -> Result<Vec<u8>> {
    let mut doc = load(bytes)?;
    let total = doc.get_pages().len() as u32;
    range.validate(total)?;

    let to_delete: Vec<u32> = (1..=total).filter(|page| !range.contains(*page)).collect();
    if !to_delete.is_empty() {
        doc.delete_pages(&to_delete);
        doc.prune_objects();
    }

    let mut out = Vec::new();
    doc.save_to(&mut out)
        .map_err(|e| DocPrepError::Pdf(format!("failed to write trimmed PDF: {}", e)))?;
    log::debug!(
        "Trimmed PDF to pages {} ({} of {} kept)",
        range,
        range.len(),
        total
    );
    Ok(out)
}

/// Extracts the text layer. Image-only PDFs yield little or no text.
///
/// `pdf_extract` panics on some documents that `lopdf` accepts (a page
/// without `/MediaBox`, for one); the panic is reported as an extraction
/// error.
pub fn extract_text(bytes: &[u8]) -> Result<String> {
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem(bytes)
    }));

    match result {
        Ok(Ok(text)) => Ok(text),
        Ok(Err(e)) => Err(DocPrepError::Extract(e.to_string())),
        Err(_) => Err(DocPrepError::Extract(
            "PDF text extraction panicked (malformed PDF)".to_string(),
        )),
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use lopdf::content::{Content, Operation};
    use lopdf::{dictionary, Document, Object, Stream};

    /// Builds an in-memory PDF whose page `n` shows the text `Page n`.
    pub fn sample_pdf(pages: u32) -> Vec<u8> {
        build_pdf(pages, true)
    }

    /// Same layout, but no page or parent node carries a `/MediaBox`.
    pub fn pdf_without_media_box(pages: u32) -> Vec<u8> {
        build_pdf(pages, false)
    }

    fn build_pdf(pages: u32, media_box: bool) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
            "Encoding" => "WinAnsiEncoding",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });

        let mut kids: Vec<Object> = Vec::new();
        for n in 1..=pages {
            let content = Content {
                operations: vec![
                    Operation::new("BT", vec![]),
                    Operation::new("Tf", vec!["F1".into(), Object::Integer(24)]),
                    Operation::new("Td", vec![Object::Integer(72), Object::Integer(720)]),
                    Operation::new("Tj", vec![Object::string_literal(format!("Page {}", n))]),
                    Operation::new("ET", vec![]),
                ],
            };
            let content_id = doc.add_object(Stream::new(
                dictionary! {},
                content.encode().expect("encode content"),
            ));
            let page_id = doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => pages_id,
                "Contents" => content_id,
            });
            kids.push(page_id.into());
        }

        let mut pages_dict = dictionary! {
            "Type" => "Pages",
            "Kids" => kids,
            "Count" => Object::Integer(pages as i64),
            "Resources" => resources_id,
        };
        if media_box {
            pages_dict.set(
                "MediaBox",
                vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Integer(612),
                    Object::Integer(792),
                ],
            );
        }
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut out = Vec::new();
        doc.save_to(&mut out).expect("save pdf");
        out
    }
}
