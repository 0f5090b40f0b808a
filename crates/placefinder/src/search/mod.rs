//! Criteria-driven search over a [`PlaceCatalog`].
//!
//! [`SearchEngine::search`] runs the stage list in [`pipeline::PIPELINE`] and paginates the
//! result. The single-criterion lookups (`search_by_text`, `get_places_by_*`) share the
//! same matchers but are independent of the pipeline.

use std::sync::Arc;

use placefinder_data::Place;
use tracing::{debug, instrument};

use crate::{
    catalog::PlaceCatalog,
    config::{CategoryMatch, SearchConfig},
    extract::{SearchCriteria, fold},
};

pub mod pipeline;
mod price;

pub use error::SearchError;
use error::Result;
pub use price::PriceBand;

/// One page of search results.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchResult {
    /// Places on the requested page only
    pub places: Vec<Place>,
    /// Number of matches across all pages
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    /// `ceil(total_count / page_size)`, zero when nothing matched
    pub total_pages: usize,
}

impl SearchResult {
    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }

    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}

#[derive(Debug, Clone)]
pub struct SearchEngine {
    catalog: Arc<PlaceCatalog>,
    category_match: CategoryMatch,
    page_size: usize,
}

impl SearchEngine {
    pub fn new(catalog: Arc<PlaceCatalog>) -> Self {
        Self::from_config(catalog, &SearchConfig::default())
    }

    pub fn from_config(catalog: Arc<PlaceCatalog>, config: &SearchConfig) -> Self {
        Self {
            catalog,
            category_match: config.category_match,
            page_size: config.page_size.max(1),
        }
    }

    pub fn with_category_match(mut self, category_match: CategoryMatch) -> Self {
        self.category_match = category_match;
        self
    }

    /// Default page size used by [`search`](Self::search).
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// First page of results using the configured page size.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult> {
        self.search_page(criteria, 1, self.page_size)
    }

    /// Run the full pipeline and return page `page` (1-based) of `page_size` places.
    ///
    /// A page past the end is empty, not an error.
    #[instrument(name = "Search", level = "info", skip(self, criteria), fields(query = %criteria.query))]
    pub fn search_page(
        &self,
        criteria: &SearchCriteria,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResult> {
        check_page(page, page_size)?;
        let catalog = self.catalog.snapshot()?;

        let t_search = std::time::Instant::now();
        let merged = pipeline::run(catalog, criteria, self.category_match);
        let total_count = merged.len();
        let places = cloned(page_slice(&merged, page, page_size).to_vec());

        debug!(
            total_count,
            page,
            elapsed_seconds = ?t_search.elapsed(),
            "Search complete"
        );
        Ok(SearchResult {
            places,
            total_count,
            page,
            page_size,
            total_pages: total_count.div_ceil(page_size),
        })
    }

    /// Places whose name, tags, district or city contain `query`, ignoring case and
    /// Unicode composition.
    ///
    /// A blank query matches nothing.
    pub fn search_by_text(&self, query: &str) -> Result<Vec<Place>> {
        let catalog = self.catalog.snapshot()?;
        let needle = fold(query);
        if needle.is_empty() {
            return Ok(Vec::new());
        }
        Ok(cloned(pipeline::scan(catalog, |place| {
            pipeline::matches_text(place, &needle)
        })))
    }

    /// Places tagged with any of `categories`, in catalog order.
    pub fn get_places_by_categories<S: AsRef<str> + Sync>(
        &self,
        categories: &[S],
    ) -> Result<Vec<Place>> {
        if categories.is_empty() {
            return Ok(Vec::new());
        }
        let catalog = self.catalog.snapshot()?;
        let mode = self.category_match;
        Ok(cloned(pipeline::scan(catalog, |place| {
            categories
                .iter()
                .any(|category| pipeline::matches_category(place, category.as_ref(), mode))
        })))
    }

    /// Places whose price bucket overlaps `[min, max]`.
    ///
    /// Places without a bucket, or whose bucket has no amount in it, never match.
    pub fn get_places_by_price_range(&self, min: u64, max: u64) -> Result<Vec<Place>> {
        let catalog = self.catalog.snapshot()?;
        if min > max {
            return Ok(Vec::new());
        }
        Ok(cloned(pipeline::scan(catalog, |place| {
            place
                .price_range
                .as_deref()
                .and_then(PriceBand::parse)
                .is_some_and(|band| band.overlaps(min, max))
        })))
    }

    /// Places whose bucket text equals `bucket` exactly.
    pub fn get_places_by_price_bucket(&self, bucket: &str) -> Result<Vec<Place>> {
        let catalog = self.catalog.snapshot()?;
        Ok(cloned(pipeline::scan(catalog, |place| {
            place.price_range.as_deref() == Some(bucket)
        })))
    }

    /// Places with a parsable rating of at least `min_rating`.
    pub fn get_places_by_min_rating(&self, min_rating: f64) -> Result<Vec<Place>> {
        let catalog = self.catalog.snapshot()?;
        Ok(cloned(pipeline::scan(catalog, |place| {
            pipeline::meets_rating(place, min_rating)
        })))
    }
}

/// Page `page` (1-based) of `items`, `page_size` items per page.
///
/// Out-of-range pages yield an empty vector. `page` or `page_size` of zero is an error.
pub fn paginate<T: Clone>(items: &[T], page: usize, page_size: usize) -> Result<Vec<T>> {
    check_page(page, page_size)?;
    Ok(page_slice(items, page, page_size).to_vec())
}

fn check_page(page: usize, page_size: usize) -> Result<()> {
    if page < 1 || page_size < 1 {
        return Err(SearchError::InvalidPage { page, page_size });
    }
    Ok(())
}

fn page_slice<T>(items: &[T], page: usize, page_size: usize) -> &[T] {
    let start = (page - 1).saturating_mul(page_size).min(items.len());
    let end = start.saturating_add(page_size).min(items.len());
    &items[start..end]
}

fn cloned(places: Vec<&Place>) -> Vec<Place> {
    places.into_iter().cloned().collect()
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum SearchError {
        #[error(transparent)]
        Catalog(#[from] crate::catalog::CatalogError),
        #[error("Invalid page {page} with page size {page_size} (both must be at least 1)")]
        InvalidPage { page: usize, page_size: usize },
    }
    pub type Result<T> = std::result::Result<T, SearchError>;
}
