//! Selection matching.
//!
//! Every active selection is ANDed. Exact facets compare strings; the
//! year-range facet compares the year taken from the first four characters
//! of the record's value against `"YYYY"` or `"YYYY-YYYY"`.

use crate::facet::{FacetDefinition, MatchRule, Selections};
use crate::record::Record;

/// Parse the leading integer of `s`: optional whitespace, optional sign,
/// then at least one ASCII digit. Trailing text is ignored.
pub(crate) fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.as_bytes().first() {
        Some(b'-') => (-1, &s[1..]),
        Some(b'+') => (1, &s[1..]),
        _ => (1, s),
    };
    let digits_len = rest.bytes().take_while(|b| b.is_ascii_digit()).count();
    if digits_len == 0 {
        return None;
    }
    rest[..digits_len].parse::<i64>().ok().map(|n| sign * n)
}

/// Year of a date-bearing value: the integer at the start of its first
/// four characters.
pub fn derive_year(stamp: &str) -> Option<i64> {
    let head: String = stamp.chars().take(4).collect();
    parse_leading_int(&head)
}

/// Whether a record's date-bearing value falls in a time selection.
///
/// A selection containing `-` is an inclusive `[start, end]` year range;
/// otherwise it must equal the derived year. A missing stamp, an
/// unparseable stamp, or an unparseable selection never matches.
pub fn year_in_range(stamp: Option<&str>, selection: &str) -> bool {
    let Some(year) = stamp.and_then(derive_year) else {
        return false;
    };
    match selection.split_once('-') {
        Some((start, end)) => match (parse_leading_int(start), parse_leading_int(end)) {
            (Some(start), Some(end)) => year >= start && year <= end,
            _ => false,
        },
        None => parse_leading_int(selection) == Some(year),
    }
}

/// Whether `record` satisfies one facet's selection. "No selection" always
/// matches; an absent value never matches an active selection.
pub fn matches<R: Record + ?Sized>(
    record: &R,
    facet: &FacetDefinition,
    selection: Option<&str>,
) -> bool {
    let Some(selected) = selection else {
        return true;
    };
    match facet.matcher {
        MatchRule::Exact => record.facet(&facet.key) == Some(selected),
        MatchRule::YearRange => year_in_range(record.facet(&facet.key), selected),
    }
}

/// Whether `record` satisfies the selections of facets `0..=upto`.
pub(crate) fn matches_through<R: Record + ?Sized>(
    record: &R,
    facets: &[FacetDefinition],
    selections: &Selections,
    upto: usize,
) -> bool {
    facets
        .iter()
        .enumerate()
        .take(upto.saturating_add(1))
        .all(|(i, facet)| matches(record, facet, selections.get(i)))
}

/// Records satisfying every active selection, in store order.
pub fn apply_filters<'a, R: Record>(
    records: &'a [R],
    facets: &[FacetDefinition],
    selections: &Selections,
) -> Vec<&'a R> {
    records
        .iter()
        .filter(|r| matches_through(*r, facets, selections, facets.len()))
        .collect()
}

/// Positions of the records satisfying every active selection.
pub fn filter_indices<R: Record>(
    records: &[R],
    facets: &[FacetDefinition],
    selections: &Selections,
) -> Vec<usize> {
    records
        .iter()
        .enumerate()
        .filter(|(_, r)| matches_through(*r, facets, selections, facets.len()))
        .map(|(i, _)| i)
        .collect()
}
