//! Loading geofacet documents from a data root.
//!
//! Loading is the only asynchronous part of geofacet. Catalog sources are
//! fetched concurrently and concatenated in declared order once all of
//! them have arrived; one failed source fails the load.

pub mod adapter;
pub mod error;
pub mod load;

pub use adapter::file::FileAdapter;
pub use adapter::http::HttpAdapter;
pub use adapter::{adapter_for, SourceAdapter};
pub use error::LoadError;
pub use load::{
    fetch_json, load_catalog, load_features, load_map_catalog, load_province_counts,
};
