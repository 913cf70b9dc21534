//! DOCX paragraph extraction backed by docx-rs.

use super::ExtractError;
use docx_rs::{DocumentChild, ParagraphChild, RunChild, read_docx};
use std::path::Path;

/// Concatenate the text of every paragraph in document order, appending a
/// newline after each paragraph.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let docx = read_docx(&bytes)
        .map_err(|err| ExtractError::Failed(format!("failed to open DOCX: {err}")))?;

    let mut content = String::new();
    for child in &docx.document.children {
        if let DocumentChild::Paragraph(paragraph) = child {
            for paragraph_child in &paragraph.children {
                if let ParagraphChild::Run(run) = paragraph_child {
                    for run_child in &run.children {
                        if let RunChild::Text(text) = run_child {
                            content.push_str(&text.text);
                        }
                    }
                }
            }
            content.push('\n');
        }
    }
    Ok(content)
}

#[cfg(test)]
mod tests {
    use super::*;
    use docx_rs::{Docx, Paragraph, Run};
    use std::io::{Cursor, Write};

    fn docx_with_paragraphs(paragraphs: &[&str]) -> Vec<u8> {
        let mut docx = Docx::new();
        for text in paragraphs {
            docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_text(*text)));
        }
        let mut buffer = Cursor::new(Vec::new());
        docx.build().pack(&mut buffer).expect("pack docx");
        buffer.into_inner()
    }

    #[test]
    fn concatenates_paragraphs_with_trailing_newlines() {
        let bytes = docx_with_paragraphs(&["A", "B"]);
        let mut spool = tempfile::NamedTempFile::new().expect("temp file");
        spool.write_all(&bytes).expect("write docx");
        spool.flush().expect("flush docx");

        let text = extract_text(spool.path()).expect("docx extraction");
        assert_eq!(text, "A\nB\n");
    }

    #[test]
    fn rejects_non_docx_bytes() {
        let mut spool = tempfile::NamedTempFile::new().expect("temp file");
        spool.write_all(b"plain text").expect("write bytes");
        spool.flush().expect("flush bytes");

        let error = extract_text(spool.path()).expect_err("invalid docx");
        assert!(matches!(error, ExtractError::Failed(_)));
    }
}
