// file: src/table/writer.rs
// description: csv export of collected listing rows
// reference: https://docs.rs/csv

use crate::error::{HarvestError, Result};
use crate::models::Row;
use std::fs;
use std::path::Path;
use tracing::info;

/// Writes `rows` to `path` in one go. The header line is always present so an
/// empty collection still yields a readable table.
pub fn write_rows(path: &Path, rows: &[Row]) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| HarvestError::FileOperation {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)?;

    writer.write_record(Row::HEADERS)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;

    info!("Saved {} items to '{}'", rows.len(), path.display());
    Ok(())
}
