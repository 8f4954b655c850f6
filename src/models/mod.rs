// file: src/models/mod.rs
// description: data models module exports
// reference: internal module structure

pub mod item;
pub mod row;

pub use item::{ItemSummary, SearchPage};
pub use row::Row;
