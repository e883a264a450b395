use std::fmt;

use super::UploadId;

const FALLBACK_FILENAME: &str = "upload";

/// File name of an uploaded audio file inside the uploads directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoragePath(String);

impl StoragePath {
    pub fn new(upload_id: &UploadId, filename: &str) -> Self {
        Self(format!(
            "{}_{}",
            upload_id.as_uuid().simple(),
            sanitize_filename(filename)
        ))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Reduces a client-supplied file name to a safe, flat ASCII name.
///
/// Path separators become spaces, runs of whitespace collapse to `_`, and
/// only `[A-Za-z0-9._-]` survive. Leading and trailing `.`/`_` are stripped.
pub fn sanitize_filename(filename: &str) -> String {
    let flattened: String = filename
        .chars()
        .map(|c| if c == '/' || c == '\\' { ' ' } else { c })
        .collect();

    let joined = flattened.split_whitespace().collect::<Vec<_>>().join("_");

    let kept: String = joined
        .chars()
        .filter(|c| c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-'))
        .collect();

    let trimmed = kept.trim_matches(|c| c == '.' || c == '_');

    if trimmed.is_empty() {
        FALLBACK_FILENAME.to_string()
    } else {
        trimmed.to_string()
    }
}
