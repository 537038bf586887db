//! Facet derivation and the filtering predicate.

use std::collections::HashSet;

use crate::models::{Badge, FacetOptions, FilterState};

/// Distinct non-null facet values across the collection, in order of first appearance.
pub fn derive_facets(badges: &[Badge]) -> FacetOptions {
    let mut seen_costs = HashSet::new();
    let costs = badges
        .iter()
        .filter_map(|b| b.cost)
        .filter(|c| seen_costs.insert(c.to_string()))
        .collect();

    FacetOptions {
        costs,
        levels: distinct(badges.iter().filter_map(|b| b.level.as_deref())),
        type_categories: distinct(badges.iter().filter_map(|b| b.type_category.as_deref())),
    }
}

fn distinct<'a>(values: impl Iterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    values
        .filter(|v| seen.insert(*v))
        .map(str::to_string)
        .collect()
}

/// True when the badge passes every clause of the filter.
pub fn matches(badge: &Badge, filter: &FilterState) -> bool {
    let name_matches = filter.search.is_empty()
        || badge
            .name
            .to_lowercase()
            .contains(&filter.search.to_lowercase());

    let cost_matches = match filter.cost.as_deref() {
        None => true,
        Some(selected) => badge.cost_text().as_deref() == Some(selected),
    };

    let level_matches = match filter.level.as_deref() {
        None => true,
        Some(selected) => badge.level.as_deref() == Some(selected),
    };

    let type_category_matches = match filter.type_category.as_deref() {
        None => true,
        Some(selected) => badge.type_category.as_deref() == Some(selected),
    };

    name_matches && cost_matches && level_matches && type_category_matches
}

/// Positions of the visible badges, in collection order.
pub fn filter_indices(badges: &[Badge], filter: &FilterState) -> Vec<usize> {
    badges
        .iter()
        .enumerate()
        .filter(|(_, b)| matches(b, filter))
        .map(|(i, _)| i)
        .collect()
}

/// The visible badges, in collection order.
pub fn filter_badges<'a>(badges: &'a [Badge], filter: &FilterState) -> Vec<&'a Badge> {
    badges.iter().filter(|b| matches(b, filter)).collect()
}
