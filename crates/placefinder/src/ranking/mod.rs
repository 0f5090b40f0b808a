//! Popularity ranking.

use std::{cmp::Ordering, sync::Arc};

use placefinder_data::Place;
use tracing::{debug, instrument};
use unicode_normalization::{UnicodeNormalization, char::is_combining_mark};

use crate::{
    catalog::{CatalogError, PlaceCatalog},
    config::SearchConfig,
};

#[derive(Debug, Clone)]
pub struct RankingService {
    catalog: Arc<PlaceCatalog>,
    limit: usize,
}

impl RankingService {
    pub fn new(catalog: Arc<PlaceCatalog>) -> Self {
        Self::from_config(catalog, &SearchConfig::default())
    }

    pub fn from_config(catalog: Arc<PlaceCatalog>, config: &SearchConfig) -> Self {
        Self {
            catalog,
            limit: config.popular_limit,
        }
    }

    /// The configured number of popular places.
    pub fn popular(&self) -> Result<Vec<Place>, CatalogError> {
        self.get_popular(self.limit)
    }

    /// Up to `limit` places, highest rating first.
    ///
    /// Ratings that do not parse count as zero. Equal ratings are ordered by name,
    /// ignoring case and Vietnamese diacritics.
    #[instrument(name = "Popular places", level = "debug", skip(self))]
    pub fn get_popular(&self, limit: usize) -> Result<Vec<Place>, CatalogError> {
        let catalog = self.catalog.snapshot()?;

        let mut ranked = catalog
            .iter()
            .map(|place| {
                let rating = place.rating_value().unwrap_or(0.0);
                (rating, collation_key(place.display_name()), place)
            })
            .collect::<Vec<_>>();
        ranked.sort_by(|(rating_a, key_a, a), (rating_b, key_b, b)| {
            rating_b
                .total_cmp(rating_a)
                .then_with(|| key_a.cmp(key_b))
                .then_with(|| a.display_name().cmp(b.display_name()))
        });

        let popular = ranked
            .into_iter()
            .take(limit)
            .map(|(_, _, place)| place.clone())
            .collect::<Vec<_>>();
        debug!(count = popular.len(), "Ranked popular places");
        Ok(popular)
    }
}

/// Sort key for names: decomposed, combining marks removed, `đ` folded to `d`, lower-cased.
pub(crate) fn collation_key(name: &str) -> String {
    name.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'đ' | 'Đ' => 'd',
            c => c,
        })
        .collect::<String>()
        .to_lowercase()
}

/// Compare two names the way [`RankingService::get_popular`] orders ties.
pub fn compare_names(a: &str, b: &str) -> Ordering {
    collation_key(a)
        .cmp(&collation_key(b))
        .then_with(|| a.cmp(b))
}
