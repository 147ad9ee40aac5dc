//! Collection download to the local export directory.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::core::api::{ApiError, ApiGateway};

pub const EXPORT_FAILED: &str = "Failed to export collection";

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("{0}")]
    Api(#[from] ApiError),

    #[error("Could not write export file: {0}")]
    Io(#[from] std::io::Error),
}

/// `<name>.json`, with path separators replaced so the file stays in the
/// export directory.
pub fn export_file_name(name: &str) -> String {
    let safe: String = name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '\0' => '_',
            c => c,
        })
        .collect();
    let safe = safe.trim_start_matches('.');
    if safe.is_empty() {
        "collection.json".to_string()
    } else {
        format!("{safe}.json")
    }
}

/// Write the raw export body without re-encoding it.
pub async fn write_export(dir: &Path, name: &str, body: &[u8]) -> Result<PathBuf, ExportError> {
    tokio::fs::create_dir_all(dir).await?;
    let path = dir.join(export_file_name(name));
    tokio::fs::write(&path, body).await?;
    Ok(path)
}

/// Fetch `name` from the backend and save it under `dir`.
pub async fn export_collection(
    api: &dyn ApiGateway,
    dir: &Path,
    name: &str,
) -> Result<PathBuf, ExportError> {
    let body = api.export_collection(name).await?;
    let path = write_export(dir, name, &body).await?;
    log::info!("Exported {name} ({} bytes) to {}", body.len(), path.display());
    Ok(path)
}
