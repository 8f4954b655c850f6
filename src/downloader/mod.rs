// file: src/downloader/mod.rs
// description: image download pipeline exports
// reference: internal module structure

pub mod fetch;
pub mod naming;

pub use fetch::{DownloadStats, Downloader, RowOutcome};
pub use naming::{is_missing_url, resolve_extension, sanitize_filename};
