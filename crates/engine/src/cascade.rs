//! The filter cascade: recomputing dependent facet options after a change.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::error::EngineError;
use crate::facet::{FacetDefinition, FacetOption, FacetOptions, Selections};
use crate::filter::matches_through;
use crate::record::Record;

/// Outcome of a facet change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CascadeUpdate {
    /// Selections after the downstream reset.
    pub selections: Selections,
    /// Fresh option lists for every facet after the changed one, in chain order.
    pub options: Vec<FacetOptions>,
    /// Ids of the facets whose selection was reset.
    pub reset: Vec<String>,
}

/// Build one facet's option list from a record subset.
///
/// Unique non-empty values, sorted per the facet's ordering, labelled per
/// its formatter, behind the synthetic "all" option.
pub fn facet_options<'a, R, I>(facet: &FacetDefinition, records: I) -> FacetOptions
where
    R: Record + 'a + ?Sized,
    I: IntoIterator<Item = &'a R>,
{
    let unique: BTreeSet<String> = records
        .into_iter()
        .filter_map(|r| r.facet(&facet.key))
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
        .collect();

    let mut values: Vec<String> = unique.into_iter().collect();
    facet.sort_values(&mut values);

    let mut options = Vec::with_capacity(values.len() + 1);
    options.push(FacetOption::all(&facet.all_label));
    options.extend(values.into_iter().map(|value| FacetOption {
        label: facet.label(&value),
        value,
    }));

    FacetOptions {
        facet: facet.id.clone(),
        options,
    }
}

/// Recompute the facets downstream of `changed`.
///
/// Every facet after `changed` has its selection reset and its options
/// rebuilt from the records matching the selections at or above `changed`.
/// Facets at or above `changed` are left alone.
pub fn compute_dependent_options<R: Record>(
    records: &[R],
    facets: &[FacetDefinition],
    selections: &Selections,
    changed: usize,
) -> Result<CascadeUpdate, EngineError> {
    if changed >= facets.len() {
        return Err(EngineError::UnknownFacet {
            index: changed,
            count: facets.len(),
        });
    }

    let mut next = selections.clone();
    if next.len() < facets.len() {
        next.set(facets.len() - 1, "");
    }

    let subset: Vec<&R> = records
        .iter()
        .filter(|r| matches_through(*r, facets, selections, changed))
        .collect();

    let mut options = Vec::new();
    let mut reset = Vec::new();
    for (index, facet) in facets.iter().enumerate().skip(changed + 1) {
        next.clear(index);
        reset.push(facet.id.clone());
        options.push(facet_options(facet, subset.iter().copied()));
    }

    tracing::debug!(
        changed = %facets[changed].id,
        matched = subset.len(),
        reset = reset.len(),
        "recomputed dependent facet options"
    );

    Ok(CascadeUpdate {
        selections: next,
        options,
        reset,
    })
}

/// Option lists for every facet over the whole record set, as shown right
/// after a load.
pub fn initial_options<R: Record>(records: &[R], facets: &[FacetDefinition]) -> Vec<FacetOptions> {
    facets
        .iter()
        .map(|facet| facet_options(facet, records.iter()))
        .collect()
}
