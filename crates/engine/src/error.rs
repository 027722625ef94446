/// Errors returned by the facet and classification engine.
///
/// Missing fields and non-numeric attributes are never errors; they only
/// fail to match or fall into the sentinel class. These variants cover
/// caller mistakes and configuration that cannot be honored.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum EngineError {
    /// A facet index outside the declared chain.
    #[error("facet index {index} out of range for a chain of {count} facets")]
    UnknownFacet { index: usize, count: usize },

    /// A facet id that is not part of the declared chain.
    #[error("unknown facet: {id}")]
    UnknownFacetId { id: String },

    /// Pages must hold at least one item.
    #[error("page size must be at least 1")]
    InvalidPageSize,

    /// A classification scheme needs at least one color.
    #[error("classification palette is empty")]
    EmptyPalette,

    /// The width table must be parallel to the color palette.
    #[error("width table has {widths} entries but the palette has {colors} colors")]
    SchemeMismatch { colors: usize, widths: usize },

    /// ckmeans was asked for more clusters than there are values.
    #[error("cannot generate {clusters} clusters from {values} values")]
    TooManyClusters { clusters: usize, values: usize },

    /// ckmeans was asked for zero clusters.
    #[error("cluster count must be at least 1")]
    ZeroClusters,

    /// A layer was requested without both a data type and a dataset.
    #[error("data type and dataset must both be selected")]
    IncompleteSelection,

    /// A provincial dataset title without a `(YYYY)` year.
    #[error("could not extract a year from dataset '{title}'")]
    MissingYear { title: String },
}
