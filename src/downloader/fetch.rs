// file: src/downloader/fetch.rs
// description: per-row image download with skip-if-present and table enrichment
// reference: sequential download loop writing images next to the table

use crate::api::ImageSource;
use crate::config::DownloaderConfig;
use crate::downloader::naming::{is_missing_url, resolve_extension, sanitize_filename};
use crate::error::{HarvestError, Result};
use crate::pipeline::ProgressTracker;
use crate::table::Table;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

pub const IMAGE_URL_COLUMN: &str = "image_url";
pub const ITEM_ID_COLUMN: &str = "item_id";
pub const IMAGE_PATH_COLUMN: &str = "image_path";

/// Identifier used when a row has no item id.
const MISSING_ID: &str = "missingid";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowOutcome {
    Downloaded(PathBuf),
    /// A file with the guessed name was already present.
    Existing(PathBuf),
    MissingUrl,
    Failed,
}

impl RowOutcome {
    pub fn path(&self) -> Option<&Path> {
        match self {
            RowOutcome::Downloaded(path) | RowOutcome::Existing(path) => Some(path),
            RowOutcome::MissingUrl | RowOutcome::Failed => None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DownloadStats {
    pub downloaded: usize,
    pub existing: usize,
    pub missing_url: usize,
    pub failed: usize,
}

impl DownloadStats {
    pub fn with_path(&self) -> usize {
        self.downloaded + self.existing
    }
}

pub struct Downloader<'a, S: ImageSource> {
    source: &'a S,
    config: &'a DownloaderConfig,
    /// Progress bar style; `None` keeps the bar hidden.
    color: Option<bool>,
}

impl<'a, S: ImageSource> Downloader<'a, S> {
    pub fn new(source: &'a S, config: &'a DownloaderConfig) -> Self {
        Self {
            source,
            config,
            color: None,
        }
    }

    /// Draws a progress bar, colored or plain.
    pub fn with_progress(mut self, color: bool) -> Self {
        self.color = Some(color);
        self
    }

    /// Downloads one image per row and stores the local path, or an empty
    /// cell, in the `image_path` column. Row failures never abort the batch.
    pub async fn enrich(&self, table: &mut Table) -> Result<DownloadStats> {
        if table.column_index(IMAGE_URL_COLUMN).is_none() {
            return Err(HarvestError::Validation(format!(
                "input table has no '{}' column",
                IMAGE_URL_COLUMN
            )));
        }

        let image_dir = &self.config.image_dir;
        tokio::fs::create_dir_all(image_dir)
            .await
            .map_err(|source| HarvestError::FileOperation {
                path: image_dir.clone(),
                source,
            })?;

        let urls: Vec<Option<String>> = table
            .column(IMAGE_URL_COLUMN)
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();
        let ids: Vec<Option<String>> = table
            .column(ITEM_ID_COLUMN)
            .into_iter()
            .map(|v| v.map(str::to_string))
            .collect();

        let progress = match self.color {
            Some(color) => {
                ProgressTracker::with_color(table.len(), "Downloading images", color)
            }
            None => ProgressTracker::hidden(table.len()),
        };

        let mut stats = DownloadStats::default();
        let mut paths = Vec::with_capacity(table.len());

        for (url, id) in urls.iter().zip(ids.iter()) {
            let outcome = self.download_row(url.as_deref(), id.as_deref()).await;

            match &outcome {
                RowOutcome::Downloaded(_) => {
                    stats.downloaded += 1;
                    progress.inc_completed();
                }
                RowOutcome::Existing(_) => {
                    stats.existing += 1;
                    progress.inc_skipped(true);
                }
                RowOutcome::MissingUrl => {
                    stats.missing_url += 1;
                    progress.inc_skipped(true);
                }
                RowOutcome::Failed => {
                    stats.failed += 1;
                    progress.inc_failed();
                }
            }

            paths.push(outcome.path().map(|p| p.display().to_string()));
        }

        progress.finish();
        let run = progress.get_stats();
        debug!(
            "Download success rate {:.1}% over {}s ({:.2} rows/s)",
            run.success_rate(),
            run.duration_secs,
            run.items_per_second()
        );
        table.set_column(IMAGE_PATH_COLUMN, paths)?;

        info!(
            "Images: {} downloaded, {} already present, {} without url, {} failed",
            stats.downloaded, stats.existing, stats.missing_url, stats.failed
        );
        Ok(stats)
    }

    /// Resolves one row to a local file.
    ///
    /// The existence check uses the extension guessed from the url alone, so a
    /// file saved earlier under a content-type derived extension is fetched
    /// again.
    pub async fn download_row(&self, url: Option<&str>, item_id: Option<&str>) -> RowOutcome {
        if is_missing_url(url) {
            return RowOutcome::MissingUrl;
        }
        let url = url.unwrap_or_default().trim();
        let item_id = item_id
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .unwrap_or(MISSING_ID);

        let default_ext = self.config.default_extension.as_str();
        let guessed_ext = resolve_extension(url, None, default_ext);
        let guessed_path = self
            .config
            .image_dir
            .join(sanitize_filename(item_id, &guessed_ext));

        if tokio::fs::try_exists(&guessed_path).await.unwrap_or(false) {
            debug!("Reusing {}", guessed_path.display());
            return RowOutcome::Existing(guessed_path);
        }

        let image = match self.source.fetch(url).await {
            Ok(image) => image,
            Err(e) => {
                debug!("Download failed for {}: {}", url, e);
                return RowOutcome::Failed;
            }
        };

        if image.status != 200 {
            debug!("Download of {} returned status {}", url, image.status);
            return RowOutcome::Failed;
        }

        let ext = resolve_extension(url, image.content_type.as_deref(), default_ext);
        let save_path = self
            .config
            .image_dir
            .join(sanitize_filename(item_id, &ext));

        match tokio::fs::write(&save_path, &image.body).await {
            Ok(()) => RowOutcome::Downloaded(save_path),
            Err(e) => {
                warn!("Failed to write {}: {}", save_path.display(), e);
                RowOutcome::Failed
            }
        }
    }
}
