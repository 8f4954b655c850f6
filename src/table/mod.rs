// file: src/table/mod.rs
// description: tabular file input and output
// reference: internal module structure

pub mod frame;
pub mod writer;

pub use frame::Table;
pub use writer::write_rows;
