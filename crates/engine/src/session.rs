//! A filtering session over one record store.
//!
//! The session owns everything that changes while a user works the page:
//! facet selections, the option lists on offer, the filtered subset and the
//! current page. Changing a facet cascades into the facets after it, then
//! re-filters and returns to page 1. [`Session::apply`] re-filters without
//! touching any selection.

use std::time::Duration;

use crate::cascade::{compute_dependent_options, initial_options};
use crate::error::EngineError;
use crate::facet::{FacetDefinition, FacetOptions, Selections};
use crate::filter::filter_indices;
use crate::page::Page;
use crate::record::{Record, RecordStore};

pub struct Session<R> {
    store: RecordStore<R>,
    facets: Vec<FacetDefinition>,
    selections: Selections,
    options: Vec<FacetOptions>,
    filtered: Vec<usize>,
    page: Page,
}

impl<R: Record> Session<R> {
    /// Start a session with every facet at "all" and every record shown.
    pub fn new(
        store: RecordStore<R>,
        facets: Vec<FacetDefinition>,
        page_size: usize,
    ) -> Result<Self, EngineError> {
        let page = Page::first(store.len(), page_size)?;
        let options = initial_options(store.records(), &facets);
        let selections = Selections::empty(facets.len());
        let filtered = (0..store.len()).collect();
        Ok(Session {
            store,
            facets,
            selections,
            options,
            filtered,
            page,
        })
    }

    pub fn facets(&self) -> &[FacetDefinition] {
        &self.facets
    }

    pub fn selections(&self) -> &Selections {
        &self.selections
    }

    pub fn options(&self) -> &[FacetOptions] {
        &self.options
    }

    pub fn store(&self) -> &RecordStore<R> {
        &self.store
    }

    pub fn facet_index(&self, id: &str) -> Result<usize, EngineError> {
        self.facets
            .iter()
            .position(|f| f.id == id)
            .ok_or_else(|| EngineError::UnknownFacetId { id: id.to_string() })
    }

    /// Set facet `id`, cascade and re-filter. An empty value selects "all".
    pub fn select(&mut self, id: &str, value: &str) -> Result<(), EngineError> {
        let index = self.facet_index(id)?;
        self.select_index(index, value)
    }

    pub fn select_index(&mut self, index: usize, value: &str) -> Result<(), EngineError> {
        if index >= self.facets.len() {
            return Err(EngineError::UnknownFacet {
                index,
                count: self.facets.len(),
            });
        }
        self.selections.set(index, value);
        let update =
            compute_dependent_options(self.store.records(), &self.facets, &self.selections, index)?;
        self.selections = update.selections;
        for (offset, options) in update.options.into_iter().enumerate() {
            self.options[index + 1 + offset] = options;
        }
        self.apply();
        Ok(())
    }

    /// Filter by the current selections and go back to page 1.
    pub fn apply(&mut self) {
        self.filtered = filter_indices(self.store.records(), &self.facets, &self.selections);
        self.page = self.page.restart(self.filtered.len());
        tracing::debug!(
            active = self.selections.active_count(),
            matched = self.filtered.len(),
            "applied filters"
        );
    }

    /// [`apply`](Self::apply) after waiting `latency`, for front ends that
    /// show a loading state first.
    pub fn apply_with_latency(&mut self, latency: Duration) {
        if !latency.is_zero() {
            std::thread::sleep(latency);
        }
        self.apply();
    }

    /// Back to "all" on every facet, with every record shown.
    pub fn reset(&mut self) {
        self.selections = Selections::empty(self.facets.len());
        self.options = initial_options(self.store.records(), &self.facets);
        self.apply();
    }

    pub fn filtered(&self) -> Vec<&R> {
        self.filtered
            .iter()
            .filter_map(|&i| self.store.get(i))
            .collect()
    }

    pub fn filtered_len(&self) -> usize {
        self.filtered.len()
    }

    pub fn page(&self) -> Page {
        self.page
    }

    pub fn page_items(&self) -> Vec<&R> {
        self.page
            .slice(&self.filtered)
            .iter()
            .filter_map(|&i| self.store.get(i))
            .collect()
    }

    pub fn goto_page(&mut self, number: usize) -> Page {
        self.page = self.page.goto(number);
        self.page
    }

    pub fn next_page(&mut self) -> Page {
        self.page = self.page.next();
        self.page
    }

    pub fn prev_page(&mut self) -> Page {
        self.page = self.page.prev();
        self.page
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::facet::catalog_facets;
    use crate::record::FlatRecord;

    fn entry(t: &str, level: &str, city: &str, time: &str) -> FlatRecord {
        FlatRecord::new()
            .with_facet("type", t)
            .with_facet("level", level)
            .with_facet("city", city)
            .with_facet("updateTime", time)
    }

    fn session(page_size: usize) -> Session<FlatRecord> {
        let records = vec![
            entry("POI", "国家级", "全国", "2020-01-01"),
            entry("POI", "省级", "四川", "2021-03-01"),
            entry("POI", "市级", "成都", "2022-05-01"),
            entry("AOI", "市级", "成都", "2019-07-01"),
            entry("OD流", "市级", "成都", "2023-02-01"),
            entry("AOI", "省级", "四川", "2020-11-01"),
        ];
        Session::new(RecordStore::new(records), catalog_facets(), page_size).unwrap()
    }

    #[test]
    fn starts_with_everything_shown() {
        let s = session(5);
        assert_eq!(s.filtered_len(), 6);
        assert_eq!(s.page().total_pages(), 2);
        assert_eq!(s.page_items().len(), 5);
        assert_eq!(s.options()[0].values(), vec!["", "AOI", "OD流", "POI"]);
    }

    #[test]
    fn select_cascades_and_refilters() {
        let mut s = session(5);
        s.select("type", "POI").unwrap();
        assert_eq!(s.filtered_len(), 3);
        assert_eq!(s.page().total_items(), 3);
        assert_eq!(s.options()[1].values(), vec!["", "国家级", "省级", "市级"]);
        s.select("level", "省级").unwrap();
        assert_eq!(s.options()[2].values(), vec!["", "四川"]);
        assert_eq!(s.filtered_len(), 1);
        assert_eq!(s.page().number(), 1);
        assert!(s.page().window().is_empty());
    }

    #[test]
    fn select_returns_to_first_page() {
        let mut s = session(2);
        assert_eq!(s.goto_page(3).number(), 3);
        s.select("type", "POI").unwrap();
        assert_eq!(s.page().number(), 1);
        assert_eq!(s.page().total_pages(), 2);
        let items = s.page_items();
        let levels: Vec<Option<&str>> = items.iter().map(|r| r.facet("level")).collect();
        assert_eq!(levels, vec![Some("国家级"), Some("省级")]);
    }

    #[test]
    fn clearing_a_facet_widens_the_subset() {
        let mut s = session(5);
        s.select("type", "AOI").unwrap();
        assert_eq!(s.filtered_len(), 2);
        s.select("type", "").unwrap();
        assert_eq!(s.filtered_len(), 6);
    }

    #[test]
    fn changing_an_earlier_facet_clears_later_ones() {
        let mut s = session(5);
        s.select("type", "POI").unwrap();
        s.select("level", "市级").unwrap();
        s.select("type", "AOI").unwrap();
        assert_eq!(s.selections().get(1), None);
        assert_eq!(s.options()[1].values(), vec!["", "省级", "市级"]);
    }

    #[test]
    fn apply_resets_to_first_page() {
        let mut s = session(2);
        assert_eq!(s.goto_page(3).number(), 3);
        s.select("city", "成都").unwrap();
        s.apply();
        assert_eq!(s.page().number(), 1);
        assert_eq!(s.page().total_pages(), 2);
        assert_eq!(s.next_page().number(), 2);
        assert_eq!(s.next_page().number(), 2);
        assert_eq!(s.prev_page().number(), 1);
    }

    #[test]
    fn time_range_filters_on_apply() {
        let mut s = session(5);
        s.select("time", "2020-2021").unwrap();
        s.apply();
        assert_eq!(s.filtered_len(), 3);
    }

    #[test]
    fn unknown_facet_is_an_error() {
        let mut s = session(5);
        assert_eq!(
            s.select("owner", "x").unwrap_err(),
            EngineError::UnknownFacetId {
                id: "owner".to_string()
            }
        );
        assert_eq!(
            s.select_index(9, "x").unwrap_err(),
            EngineError::UnknownFacet { index: 9, count: 4 }
        );
    }

    #[test]
    fn reset_shows_everything_again() {
        let mut s = session(5);
        s.select("type", "AOI").unwrap();
        s.apply();
        assert_eq!(s.filtered_len(), 2);
        s.reset();
        assert_eq!(s.filtered_len(), 6);
        assert_eq!(s.selections().active_count(), 0);
    }

    #[test]
    fn zero_page_size_rejected() {
        let store: RecordStore<FlatRecord> = RecordStore::default();
        assert_eq!(
            Session::new(store, catalog_facets(), 0).err(),
            Some(EngineError::InvalidPageSize)
        );
    }
}
