//! The ordered merge pipeline behind [`SearchEngine::search`](super::SearchEngine::search).
//!
//! Stages run in [`PIPELINE`] order. Merge stages union their matches into the running
//! set; the area stage runs last and only removes places. Reordering the stages changes
//! results.

use std::fmt;

use ahash::AHashSet;
use placefinder_data::Place;
use rayon::prelude::*;
use tracing::debug;

use crate::{
    config::CategoryMatch,
    extract::{SearchCriteria, fold},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    /// Text search on the query, or the whole catalog when there is no query
    TextBase,
    /// Union places tagged with any requested category
    MergeCategories,
    /// Union places whose bucket equals any requested price range
    MergePriceRanges,
    /// Union places rated at least the minimum rating
    MergeMinRating,
    /// Keep only places in one of the requested areas
    NarrowAreas,
}

pub const PIPELINE: [Stage; 5] = [
    Stage::TextBase,
    Stage::MergeCategories,
    Stage::MergePriceRanges,
    Stage::MergeMinRating,
    Stage::NarrowAreas,
];

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TextBase => "text_base",
            Self::MergeCategories => "merge_categories",
            Self::MergePriceRanges => "merge_price_ranges",
            Self::MergeMinRating => "merge_min_rating",
            Self::NarrowAreas => "narrow_areas",
        };
        f.write_str(name)
    }
}

/// Order-preserving set of catalog places, keyed by place id.
#[derive(Debug, Default)]
pub(crate) struct MergeSet<'a> {
    places: Vec<&'a Place>,
    seen: AHashSet<&'a str>,
}

impl<'a> MergeSet<'a> {
    /// Append places not already present. Returns how many were added.
    pub(crate) fn union(&mut self, candidates: impl IntoIterator<Item = &'a Place>) -> usize {
        let before = self.places.len();
        for place in candidates {
            if self.seen.insert(place.id.as_str()) {
                self.places.push(place);
            }
        }
        self.places.len() - before
    }

    /// Keep only places for which `keep` holds. Returns how many were removed.
    pub(crate) fn narrow(&mut self, keep: impl Fn(&Place) -> bool + Sync) -> usize {
        let before = self.places.len();
        self.places = std::mem::take(&mut self.places)
            .into_par_iter()
            .filter(|place| keep(place))
            .collect();
        self.seen = self.places.iter().map(|place| place.id.as_str()).collect();
        before - self.places.len()
    }

    pub(crate) fn len(&self) -> usize {
        self.places.len()
    }

    pub(crate) fn into_places(self) -> Vec<&'a Place> {
        self.places
    }
}

/// Places in `catalog` for which `predicate` holds, in catalog order.
pub(crate) fn scan<'a>(
    catalog: &'a [Place],
    predicate: impl Fn(&Place) -> bool + Sync,
) -> Vec<&'a Place> {
    catalog.par_iter().filter(|place| predicate(place)).collect()
}

/// Substring match of an already [`fold`]ed `needle` against the folded name, tags,
/// district and city of a place.
pub(crate) fn matches_text(place: &Place, needle: &str) -> bool {
    let contains = |haystack: &str| fold(haystack).contains(needle);
    place.name.as_deref().is_some_and(contains)
        || place.tags().any(contains)
        || contains(&place.address.district)
        || contains(&place.address.city)
}

pub(crate) fn matches_category(place: &Place, category: &str, mode: CategoryMatch) -> bool {
    match mode {
        CategoryMatch::Exact => place.has_tag(category),
        CategoryMatch::CaseInsensitive => {
            let category = fold(category);
            place.tags().any(|tag| fold(tag) == category)
        }
    }
}

/// `folded_areas` must already be [`fold`]ed.
pub(crate) fn matches_any_area(place: &Place, folded_areas: &[String]) -> bool {
    let district = fold(&place.address.district);
    let city = fold(&place.address.city);
    folded_areas
        .iter()
        .any(|area| district.contains(area.as_str()) || city.contains(area.as_str()))
}

pub(crate) fn meets_rating(place: &Place, min_rating: f64) -> bool {
    place.rating_value().is_some_and(|rating| rating >= min_rating)
}

/// Run every stage of [`PIPELINE`] over `catalog` and return the merged, narrowed set.
pub(crate) fn run<'a>(
    catalog: &'a [Place],
    criteria: &SearchCriteria,
    category_match: CategoryMatch,
) -> Vec<&'a Place> {
    let mut set = MergeSet::default();

    for stage in PIPELINE {
        let before = set.len();
        match stage {
            Stage::TextBase => {
                if criteria.has_query() {
                    let needle = fold(&criteria.query);
                    set.union(scan(catalog, |place| matches_text(place, &needle)));
                } else {
                    set.union(catalog);
                }
            }
            Stage::MergeCategories => {
                for category in &criteria.categories {
                    set.union(scan(catalog, |place| {
                        matches_category(place, category, category_match)
                    }));
                }
            }
            Stage::MergePriceRanges => {
                for range in &criteria.price_ranges {
                    set.union(scan(catalog, |place| {
                        place.price_range.as_deref() == Some(range.as_str())
                    }));
                }
            }
            Stage::MergeMinRating => {
                if let Some(min_rating) = criteria.min_rating {
                    set.union(scan(catalog, |place| meets_rating(place, min_rating)));
                }
            }
            Stage::NarrowAreas => {
                if !criteria.areas.is_empty() {
                    let areas = criteria
                        .areas
                        .iter()
                        .map(|area| fold(area))
                        .collect::<Vec<_>>();
                    set.narrow(|place| matches_any_area(place, &areas));
                }
            }
        }
        debug!(%stage, before, after = set.len(), "Search stage complete");
    }

    set.into_places()
}
