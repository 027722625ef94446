//! Records and the record store.
//!
//! A record is anything that can answer "what is your value for facet
//! `key`" and "what is your number for attribute `key`". Catalog entries
//! and GeoJSON features both qualify, so the cascade and the classifier
//! run unchanged over either.

use std::collections::BTreeMap;

use geofacet_interchange::{CatalogEntry, Feature};

/// Read-only view of a filterable record.
///
/// `facet` must return `None` for absent or empty values. `number` must
/// return `None` for anything that is not numeric.
pub trait Record {
    fn facet(&self, key: &str) -> Option<&str>;

    fn number(&self, key: &str) -> Option<f64>;
}

impl Record for CatalogEntry {
    fn facet(&self, key: &str) -> Option<&str> {
        self.field(key)
    }

    fn number(&self, _key: &str) -> Option<f64> {
        None
    }
}

impl Record for Feature {
    fn facet(&self, key: &str) -> Option<&str> {
        self.property_str(key)
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.property_number(key)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn facet(&self, key: &str) -> Option<&str> {
        (**self).facet(key)
    }

    fn number(&self, key: &str) -> Option<f64> {
        (**self).number(key)
    }
}

/// A plain map-backed record.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FlatRecord {
    facets: BTreeMap<String, String>,
    numbers: BTreeMap<String, f64>,
}

impl FlatRecord {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a facet value. Empty values are not stored.
    pub fn with_facet(mut self, key: &str, value: &str) -> Self {
        if !value.is_empty() {
            self.facets.insert(key.to_string(), value.to_string());
        }
        self
    }

    pub fn with_number(mut self, key: &str, value: f64) -> Self {
        self.numbers.insert(key.to_string(), value);
        self
    }
}

impl Record for FlatRecord {
    fn facet(&self, key: &str) -> Option<&str> {
        self.facets.get(key).map(|s| s.as_str())
    }

    fn number(&self, key: &str) -> Option<f64> {
        self.numbers.get(key).copied()
    }
}

/// The flat collection of records from one data load.
///
/// Built once from every source batch, in source order, and replaced
/// wholesale on the next load.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordStore<R> {
    records: Vec<R>,
}

impl<R> Default for RecordStore<R> {
    fn default() -> Self {
        RecordStore {
            records: Vec::new(),
        }
    }
}

impl<R: Record> RecordStore<R> {
    pub fn new(records: Vec<R>) -> Self {
        RecordStore { records }
    }

    /// Concatenate source batches in the order given.
    pub fn from_batches(batches: Vec<Vec<R>>) -> Self {
        RecordStore {
            records: batches.into_iter().flatten().collect(),
        }
    }

    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn get(&self, index: usize) -> Option<&R> {
        self.records.get(index)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// The numeric attribute `key` of every record, `None` where absent.
    pub fn numbers(&self, key: &str) -> Vec<Option<f64>> {
        self.records.iter().map(|r| r.number(key)).collect()
    }
}
