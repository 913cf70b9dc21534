//! Optical character recognition over uploaded images.
//!
//! Requires the `tesseract` binary on `PATH`. The upload is decoded first so
//! corrupt files fail before a subprocess is spawned, then re-encoded to PNG
//! in a scoped temp directory for tesseract to read.

use super::ExtractError;
use std::path::Path;
use std::process::Command;

/// Run OCR over the decoded image and return the recognized text.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    let decoded = image::load_from_memory(&bytes)
        .map_err(|err| ExtractError::Failed(format!("failed to decode image: {err}")))?;

    let workdir = tempfile::tempdir()?;
    let png_path = workdir.path().join("upload.png");
    decoded
        .save_with_format(&png_path, image::ImageFormat::Png)
        .map_err(|err| ExtractError::Failed(format!("failed to re-encode image: {err}")))?;

    let output = Command::new("tesseract")
        .arg(&png_path)
        .arg("stdout")
        .arg("-l")
        .arg("eng")
        .output()
        .map_err(|err| ExtractError::Failed(format!("failed to run tesseract: {err}")))?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(ExtractError::Failed(format!(
            "tesseract exited with {}: {stderr}",
            output.status
        )));
    }

    Ok(String::from_utf8_lossy(&output.stdout).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn rejects_undecodable_image_bytes() {
        let mut spool = tempfile::NamedTempFile::new().expect("temp file");
        spool.write_all(b"not an image").expect("write bytes");
        spool.flush().expect("flush bytes");

        let error = extract_text(spool.path()).expect_err("invalid image");
        assert!(matches!(error, ExtractError::Failed(_)));
    }
}
