//! Cascading facet filters and value classification.
//!
//! The engine has two halves sharing one record abstraction:
//!
//! - **Faceting**: an ordered chain of [`FacetDefinition`]s over a
//!   [`RecordStore`]. Changing one facet rebuilds the option lists of the
//!   facets after it ([`compute_dependent_options`]); applying filters
//!   narrows the store to the records matching every selection. A
//!   [`Session`] ties this to pagination.
//! - **Classification**: breakpoints from a numeric attribute (quantile or
//!   ckmeans natural breaks), paired with palettes and widths in a
//!   [`ClassificationScheme`] that maps any value to a class and a style.
//!
//! Nothing here does I/O. Records arrive already parsed; see the
//! `geofacet-loader` crate for fetching them.

pub mod cascade;
pub mod classify;
pub mod error;
pub mod facet;
pub mod filter;
pub mod item;
pub mod layer;
pub mod map_catalog;
pub mod page;
pub mod record;
pub mod scheme;
pub mod session;
pub mod style;

pub use cascade::{compute_dependent_options, facet_options, initial_options, CascadeUpdate};
pub use classify::{
    ckmeans, classify, compute_breaks, natural_breaks, quantile_breaks, width_for_color,
    BreakMethod,
};
pub use error::EngineError;
pub use facet::{
    catalog_facets, FacetDefinition, FacetOption, FacetOptions, FacetOrdering, MatchRule,
    Selections,
};
pub use filter::{apply_filters, derive_year, filter_indices, matches, year_in_range};
pub use item::{Badge, CatalogItem, DownloadAction};
pub use layer::{flow_layer, province_choropleth, ChoroplethLayer, FlowLayer};
pub use map_catalog::{resolve_layer, LayerRequest, MapCatalog, MapSelection};
pub use page::Page;
pub use record::{FlatRecord, Record, RecordStore};
pub use scheme::{palettes, ClassStyle, ClassificationScheme, TRANSPARENT};
pub use session::Session;
pub use style::{highlight_matches, DataKind, Style};
