//! Tabular-query layer.
//!
//! A [`TableSource`] loads a named table once; a [`Catalog`] caches the
//! loaded tables and runs typed [`Query`] values against them.

pub mod csv_source;
pub mod query;

pub use csv_source::CsvSource;
pub use query::{AiUsageImpact, Correlation, Describe, HighPerformers, Query};

use crate::error::PipelineError;
use crate::models::Record;
use std::collections::HashMap;
use tracing::debug;

/// An immutable, named sequence of session records.
#[derive(Debug, Clone)]
pub struct Dataset {
    name: String,
    origin: String,
    records: Vec<Record>,
}

impl Dataset {
    /// Create a dataset from already-parsed records.
    pub fn new(name: impl Into<String>, origin: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            name: name.into(),
            origin: origin.into(),
            records,
        }
    }

    /// Table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Human-readable description of where the data came from.
    pub fn origin(&self) -> &str {
        &self.origin
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Something that can produce a dataset by name.
pub trait TableSource {
    /// Load the named table. Schema problems are reported here, once.
    fn load_table(&self, name: &str) -> Result<Dataset, PipelineError>;
}

/// Loaded tables plus the source they came from.
pub struct Catalog<S: TableSource> {
    source: S,
    tables: HashMap<String, Dataset>,
}

impl<S: TableSource> Catalog<S> {
    pub fn new(source: S) -> Self {
        Self {
            source,
            tables: HashMap::new(),
        }
    }

    /// Load a table, reusing it if it was already loaded this run.
    pub fn load_table(&mut self, name: &str) -> Result<&Dataset, PipelineError> {
        if !self.tables.contains_key(name) {
            let dataset = self.source.load_table(name)?;
            self.tables.insert(name.to_string(), dataset);
        } else {
            debug!("Table `{}` already loaded", name);
        }

        self.tables
            .get(name)
            .ok_or_else(|| PipelineError::UnknownSource(name.to_string()))
    }

    /// Run a query against a previously loaded table.
    pub fn run_query<Q: Query>(&self, query: &Q, source_name: &str) -> Result<Q::Output, PipelineError> {
        let dataset = self
            .tables
            .get(source_name)
            .ok_or_else(|| PipelineError::UnknownSource(source_name.to_string()))?;

        debug!("Running query `{}` on `{}`", query.name(), source_name);
        Ok(query.execute(dataset.records()))
    }
}
