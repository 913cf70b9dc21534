//! Plain-text extraction.

use super::ExtractError;
use std::path::Path;

/// Decode the full byte content as UTF-8 text, verbatim.
pub(super) fn extract_text(path: &Path) -> Result<String, ExtractError> {
    let bytes = std::fs::read(path)?;
    String::from_utf8(bytes)
        .map_err(|err| ExtractError::Failed(format!("file is not valid UTF-8: {err}")))
}
