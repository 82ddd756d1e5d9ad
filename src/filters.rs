//! Row predicates distinguishing country rows from aggregate rows.
//!
//! The dataset mixes per-country rows with aggregate rows ("World",
//! "Asia", income groups). The published reports use two different
//! exclusions for their country-only views, and the two do not agree on
//! every row, so they stay separate named predicates here. Each report
//! documents which one it applies.

/// Keeps rows that carry a continent. Aggregate rows such as "World" or
/// "Upper middle income" leave the continent column empty, so this is
/// the stricter country-only view.
pub fn has_continent(continent: Option<&str>) -> bool {
    continent.is_some_and(|c| !c.trim().is_empty())
}

/// Keeps rows whose location differs from their continent. Only drops
/// the self-labelled continent aggregate rows (location "Europe" with
/// continent "Europe"); rows with an empty continent pass, so "World"
/// style aggregates survive this view.
pub fn distinct_from_continent(location: &str, continent: Option<&str>) -> bool {
    match continent {
        Some(c) => c != location,
        None => true,
    }
}
