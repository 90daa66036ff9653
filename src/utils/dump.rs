// src/utils/dump.rs

use std::path::Path;

/// Writes the raw model output to `path` for debugging.
///
/// Failures are logged and otherwise ignored; the copy never affects the request.
pub async fn dump_raw_response(path: Option<&Path>, raw: &str) {
    let Some(path) = path else {
        return;
    };

    match tokio::fs::write(path, raw).await {
        Ok(()) => tracing::debug!(path = %path.display(), bytes = raw.len(), "Raw response written"),
        Err(e) => tracing::warn!(path = %path.display(), "Failed to write raw response: {}", e),
    }
}
