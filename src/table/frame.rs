// file: src/table/frame.rs
// description: generic csv table that keeps unknown columns intact
// reference: https://docs.rs/csv

use crate::error::{HarvestError, Result};
use std::fs;
use std::path::Path;

/// A CSV table held in memory with its header. Columns the pipeline does not
/// know about are carried through unchanged.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    headers: Vec<String>,
    records: Vec<Vec<String>>,
}

impl Table {
    pub fn new(headers: Vec<String>, records: Vec<Vec<String>>) -> Self {
        Self { headers, records }
    }

    pub fn read(path: &Path) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .from_path(path)?;

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut records = Vec::new();
        for record in reader.records() {
            records.push(record?.iter().map(str::to_string).collect());
        }

        Ok(Self { headers, records })
    }

    pub fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|source| HarvestError::FileOperation {
                path: parent.to_path_buf(),
                source,
            })?;
        }

        let mut writer = csv::WriterBuilder::new().flexible(true).from_path(path)?;
        writer.write_record(&self.headers)?;
        for record in &self.records {
            writer.write_record(record)?;
        }
        writer.flush()?;
        Ok(())
    }

    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Values of column `name`, `None` for every cell when the column is absent
    /// or the record is short.
    pub fn column(&self, name: &str) -> Vec<Option<&str>> {
        let index = self.column_index(name);
        self.records
            .iter()
            .map(|record| index.and_then(|i| record.get(i).map(String::as_str)))
            .collect()
    }

    /// Replaces column `name` or appends it when missing. `None` becomes an
    /// empty cell.
    pub fn set_column(&mut self, name: &str, values: Vec<Option<String>>) -> Result<()> {
        if values.len() != self.records.len() {
            return Err(HarvestError::Validation(format!(
                "column '{}' has {} values for {} rows",
                name,
                values.len(),
                self.records.len()
            )));
        }

        let index = match self.column_index(name) {
            Some(index) => index,
            None => {
                self.headers.push(name.to_string());
                self.headers.len() - 1
            }
        };

        for (record, value) in self.records.iter_mut().zip(values) {
            if record.len() <= index {
                record.resize(index + 1, String::new());
            }
            record[index] = value.unwrap_or_default();
        }

        Ok(())
    }
}
