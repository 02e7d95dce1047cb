use std::path::Path;
use shared::types::MaintenanceRecord;
use crate::error::PipelineError;

/// Pretty-printed JSON with two-space indentation
pub fn render(records: &[MaintenanceRecord]) -> Result<Vec<u8>, serde_json::Error> {
    serde_json::to_vec_pretty(records)
}

/// Overwrite `path` with the records, creating parent directories as needed
pub fn write_records(path: &Path, records: &[MaintenanceRecord]) -> Result<(), PipelineError> {
    let persist_err = |source: std::io::Error| PipelineError::Persist {
        path: path.to_path_buf(),
        source,
    };

    let bytes = render(records).map_err(|e| persist_err(e.into()))?;

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(persist_err)?;
    }

    std::fs::write(path, bytes).map_err(persist_err)?;
    tracing::info!("wrote {} records to {}", records.len(), path.display());
    Ok(())
}
