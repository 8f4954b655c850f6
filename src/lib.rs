// file: src/lib.rs
// description: library entry point and public api exports
// reference: rust library patterns
#![doc = include_str!(concat!(env!("CARGO_MANIFEST_DIR"), "/readme.md"))]

pub mod api;
pub mod collector;
pub mod config;
pub mod downloader;
pub mod error;
pub mod models;
pub mod pipeline;
pub mod table;
pub mod utils;

pub use api::{AccessToken, EbayClient, HttpImageSource, ImageSource, SearchApi, TokenClient};
pub use collector::{CollectStats, Collection, Collector};
pub use config::{ApiConfig, CollectorConfig, Config, CredentialsConfig, DownloaderConfig};
pub use downloader::{DownloadStats, Downloader, RowOutcome};
pub use error::{FetchError, HarvestError, Result};
pub use models::{ItemSummary, Row, SearchPage};
pub use pipeline::{PipelineStats, ProgressTracker};
pub use table::{Table, write_rows};
pub use utils::{OperationTimer, RunMetrics, Validator};
