// file: src/collector/mod.rs
// description: listing collection pipeline exports
// reference: internal module structure

pub mod filter;
pub mod paginator;

pub use filter::passes_date_filter;
pub use paginator::{CollectStats, Collection, Collector, TermReport};
