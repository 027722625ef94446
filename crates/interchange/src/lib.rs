//! geofacet-interchange: typed input documents and their deserialization.
//!
//! Provides typed structs for every static document the catalog and map
//! pages consume (catalog sources, GeoJSON feature collections, the map
//! dataset catalog, provincial count tables) and one `from_*` entry point
//! per document kind that turns a `serde_json::Value` into those structs.
//!
//! Consumers (the engine, the loader, the CLI) never parse raw JSON
//! themselves; they depend on this crate for the first typed view of the
//! data and build their own domain representations on top of it.

pub mod deserialize;
pub mod types;

pub use deserialize::{
    from_catalog, from_feature_collection, from_map_catalog, from_province_counts,
    InterchangeError,
};
pub use types::*;
