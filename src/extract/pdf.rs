//! Per-page PDF text extraction backed by lopdf.

use super::ExtractError;
use lopdf::Document;
use std::path::Path;

/// Extract the text of every page in order, concatenated with no separator.
///
/// A page yielding no extractable text contributes an empty string rather
/// than failing the whole document.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let doc = Document::load(path)
        .map_err(|err| ExtractError::Failed(format!("failed to open PDF: {err}")))?;

    let mut content = String::new();
    for (page_number, _page_id) in doc.get_pages() {
        content.push_str(&doc.extract_text(&[page_number]).unwrap_or_default());
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use lopdf::content::{Content, Operation};
    use lopdf::{Document, Object, Stream, dictionary};
    use std::io::Write;

    fn single_page_pdf(text: &str) -> Vec<u8> {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        let font_id = doc.add_object(dictionary! {
            "Type" => "Font",
            "Subtype" => "Type1",
            "BaseFont" => "Courier",
        });
        let resources_id = doc.add_object(dictionary! {
            "Font" => dictionary! { "F1" => font_id },
        });
        let content = Content {
            operations: vec![
                Operation::new("BT", vec![]),
                Operation::new("Tf", vec!["F1".into(), 36.into()]),
                Operation::new("Td", vec![72.into(), 720.into()]),
                Operation::new("Tj", vec![Object::string_literal(text)]),
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
        let pages = dictionary! {
            "Type" => "Pages",
            "Kids" => vec![page_id.into()],
            "Count" => 1,
            "Resources" => resources_id,
            "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
        };
        doc.objects.insert(pages_id, Object::Dictionary(pages));
        let catalog_id = doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => pages_id,
        });
        doc.trailer.set("Root", catalog_id);

        let mut bytes = Vec::new();
        doc.save_to(&mut bytes).expect("serialize pdf");
        bytes
    }

    #[test]
    fn extracts_text_from_generated_pdf() {
        let bytes = single_page_pdf("Quarterly results");
        let mut spool = tempfile::NamedTempFile::new().expect("temp file");
        spool.write_all(&bytes).expect("write pdf");
        spool.flush().expect("flush pdf");

        let text = extract_text(spool.path()).expect("pdf extraction");
        assert!(text.contains("Quarterly results"));
    }

    #[test]
    fn rejects_non_pdf_bytes() {
        let mut spool = tempfile::NamedTempFile::new().expect("temp file");
        spool.write_all(b"not a pdf").expect("write bytes");
        spool.flush().expect("flush bytes");

        let error = extract_text(spool.path()).expect_err("invalid pdf");
        assert!(matches!(error, ExtractError::Failed(_)));
    }
}
