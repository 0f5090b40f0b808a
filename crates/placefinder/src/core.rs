//! The [`PlaceSearcher`] facade.
//!
//! A `PlaceSearcher` owns one shared [`PlaceCatalog`] and every component that reads from
//! it, all configured from a single [`SearchConfig`].
//!
//! ```rust
//! use placefinder::{PlaceSearcher, SearchCriteria, data::InMemoryLoader};
//!
//! let searcher = PlaceSearcher::new(InMemoryLoader::from_places(
//!     placefinder::data::sample_places(),
//! ));
//! searcher.initialize()?;
//!
//! let results = searcher.search(&SearchCriteria::from_query("nhà hàng"))?;
//! assert_eq!(results.total_count, 2);
//!
//! if let Some(clarification) = searcher.check_ambiguous("ăn gì") {
//!     println!("{}", clarification.message());
//! }
//! # Ok::<(), placefinder::error::PlaceFinderError>(())
//! ```

use std::sync::Arc;

use chrono::{DateTime, Utc};
use placefinder_data::{JsonFileLoader, Place, PlaceLoader};
use tracing::{info, instrument};

use crate::{
    ambiguity::{AmbiguityGuard, Clarification},
    catalog::PlaceCatalog,
    config::SearchConfig,
    error::PlaceFinderError,
    extract::{CriteriaExtractor, SearchCriteria},
    prompt::{PromptOrchestrator, PromptResult},
    ranking::RankingService,
    search::{SearchEngine, SearchResult},
};

/// Search, ranking and prompt handling over one shared place catalog.
///
/// Cloning is cheap: clones share the catalog, so initializing one initializes all.
#[derive(Debug, Clone)]
pub struct PlaceSearcher {
    catalog: Arc<PlaceCatalog>,
    config: SearchConfig,
    extractor: CriteriaExtractor,
    engine: SearchEngine,
    ranking: RankingService,
    guard: AmbiguityGuard,
    orchestrator: PromptOrchestrator,
}

impl PlaceSearcher {
    /// Create an uninitialized searcher with the default configuration.
    pub fn new(loader: impl PlaceLoader + 'static) -> Self {
        Self::with_config(loader, SearchConfig::default())
    }

    pub fn with_config(loader: impl PlaceLoader + 'static, config: SearchConfig) -> Self {
        Self::from_catalog(Arc::new(PlaceCatalog::new(loader)), config)
    }

    /// Build a searcher over an existing, possibly already initialized, catalog.
    pub fn from_catalog(catalog: Arc<PlaceCatalog>, config: SearchConfig) -> Self {
        Self {
            extractor: CriteriaExtractor::from_config(&config),
            engine: SearchEngine::from_config(Arc::clone(&catalog), &config),
            ranking: RankingService::from_config(Arc::clone(&catalog), &config),
            guard: AmbiguityGuard::from_config(&config),
            orchestrator: PromptOrchestrator::from_config(Arc::clone(&catalog), &config),
            catalog,
            config,
        }
    }

    /// Create a searcher reading `places.json` from the data directory and load it.
    ///
    /// The directory is `./places_data` unless the `DATA_DIR` environment variable is set.
    #[instrument(name = "Create PlaceSearcher from data dir", level = "info")]
    pub fn from_data_dir() -> Result<Self, PlaceFinderError> {
        let searcher = Self::new(JsonFileLoader::from_data_dir());
        searcher.initialize()?;
        Ok(searcher)
    }

    /// Load the catalog. Safe to call repeatedly and from many threads.
    pub fn initialize(&self) -> Result<(), PlaceFinderError> {
        let t_init = std::time::Instant::now();
        self.catalog.initialize()?;
        info!(
            elapsed_seconds = ?t_init.elapsed(),
            "PlaceSearcher ready"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.catalog.is_initialized()
    }

    /// First page of results for structured criteria.
    pub fn search(&self, criteria: &SearchCriteria) -> Result<SearchResult, PlaceFinderError> {
        self.engine.search(criteria).map_err(From::from)
    }

    pub fn search_page(
        &self,
        criteria: &SearchCriteria,
        page: usize,
        page_size: usize,
    ) -> Result<SearchResult, PlaceFinderError> {
        self.engine
            .search_page(criteria, page, page_size)
            .map_err(From::from)
    }

    /// Parse `prompt` and return the first page of results.
    pub fn search_prompt(&self, prompt: &str) -> Result<PromptResult, PlaceFinderError> {
        self.orchestrator.run(prompt).map_err(From::from)
    }

    pub fn search_prompt_page(
        &self,
        prompt: &str,
        page: usize,
        page_size: usize,
    ) -> Result<PromptResult, PlaceFinderError> {
        self.orchestrator
            .run_page(prompt, page, page_size)
            .map_err(From::from)
    }

    /// Extract criteria from `prompt` without searching.
    pub fn parse_prompt(&self, prompt: &str) -> SearchCriteria {
        self.extractor.parse(prompt)
    }

    /// The configured number of highest-rated places.
    pub fn popular(&self) -> Result<Vec<Place>, PlaceFinderError> {
        self.ranking.popular().map_err(From::from)
    }

    pub fn check_ambiguous(&self, prompt: &str) -> Option<Clarification> {
        self.guard.check_ambiguous(prompt)
    }

    pub fn catalog(&self) -> &Arc<PlaceCatalog> {
        &self.catalog
    }

    pub fn config(&self) -> &SearchConfig {
        &self.config
    }

    pub fn engine(&self) -> &SearchEngine {
        &self.engine
    }

    pub fn ranking(&self) -> &RankingService {
        &self.ranking
    }

    pub fn orchestrator(&self) -> &PromptOrchestrator {
        &self.orchestrator
    }

    /// Get information about the searcher's catalog and configuration.
    pub fn info(&self) -> Result<SearcherInfo, PlaceFinderError> {
        let catalog = self.catalog.info()?;
        Ok(SearcherInfo {
            source: catalog.source,
            places: catalog.places,
            loaded_at: catalog.loaded_at,
            lexicon_version: self.config.lexicon.version.clone(),
            page_size: self.config.page_size,
        })
    }
}

/// Information about a `PlaceSearcher`'s catalog and configuration.
#[derive(Debug, Clone)]
pub struct SearcherInfo {
    pub source: String,
    pub places: usize,
    pub loaded_at: DateTime<Utc>,
    pub lexicon_version: String,
    pub page_size: usize,
}

impl SearcherInfo {
    /// Get a human-readable summary of the searcher.
    pub fn summary(&self) -> String {
        format!(
            "PlaceSearcher over {} places from {} (lexicon {}, {} per page)",
            self.places, self.source, self.lexicon_version, self.page_size
        )
    }
}

// === Builder Pattern ===

/// Builder for creating a `PlaceSearcher` with custom configuration.
pub struct PlaceSearcherBuilder {
    loader: Option<Box<dyn PlaceLoader>>,
    config: SearchConfig,
    eager: bool,
}

impl PlaceSearcherBuilder {
    /// Create a new builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            loader: None,
            config: SearchConfig::default(),
            eager: true,
        }
    }

    /// Set the loader. Defaults to `places.json` in the data directory.
    #[must_use]
    pub fn loader(mut self, loader: impl PlaceLoader + 'static) -> Self {
        self.loader = Some(Box::new(loader));
        self
    }

    #[must_use]
    pub fn config(mut self, config: SearchConfig) -> Self {
        self.config = config;
        self
    }

    /// Load the catalog in [`build`](Self::build). Enabled by default.
    #[must_use]
    pub fn eager(mut self, eager: bool) -> Self {
        self.eager = eager;
        self
    }

    /// Build the `PlaceSearcher`, loading the catalog first if eager.
    pub fn build(self) -> Result<PlaceSearcher, PlaceFinderError> {
        let loader: Box<dyn PlaceLoader> = match self.loader {
            Some(loader) => loader,
            None => Box::new(JsonFileLoader::from_data_dir()),
        };
        let searcher =
            PlaceSearcher::from_catalog(Arc::new(PlaceCatalog::from_boxed(loader)), self.config);
        if self.eager {
            searcher.initialize()?;
        }
        Ok(searcher)
    }
}

impl Default for PlaceSearcherBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use placefinder_data::{InMemoryLoader, JsonStrLoader, sample_places};

    use super::*;
    use crate::{catalog::CatalogError, config::SearchConfigBuilder};

    fn searcher() -> PlaceSearcher {
        let searcher = PlaceSearcher::new(InMemoryLoader::from_places(sample_places()));
        searcher.initialize().unwrap();
        searcher
    }

    #[test]
    fn test_clones_share_the_catalog() {
        let searcher = PlaceSearcher::new(InMemoryLoader::from_places(sample_places()));
        let clone = searcher.clone();
        assert!(!clone.is_initialized());

        searcher.initialize().unwrap();
        assert!(clone.is_initialized());
        assert!(Arc::ptr_eq(searcher.catalog(), clone.catalog()));
    }

    #[test]
    fn test_config_flows_to_components() {
        let config = SearchConfigBuilder::compact().page_size(2).build();
        let searcher =
            PlaceSearcher::with_config(InMemoryLoader::from_places(sample_places()), config);
        searcher.initialize().unwrap();

        let result = searcher.search(&SearchCriteria::default()).unwrap();
        assert_eq!(result.page_size, 2);
        assert_eq!(result.total_pages, 2);
        assert_eq!(searcher.popular().unwrap().len(), 3);
        assert_eq!(searcher.search_prompt("nhà hàng").unwrap().page_size, 2);
    }

    #[test]
    fn test_search_prompt() {
        let result = searcher().search_prompt("nhà hàng").unwrap();
        assert_eq!(result.total_count, 2);
        assert_eq!(result.criteria.categories, vec!["nhà hàng"]);
        assert_eq!(searcher().parse_prompt("nhà hàng"), result.criteria);
    }

    #[test]
    fn test_uninitialized_errors_are_catalog_errors() {
        let searcher = PlaceSearcher::new(InMemoryLoader::from_places(sample_places()));
        assert!(matches!(
            searcher.popular(),
            Err(PlaceFinderError::CatalogError(CatalogError::NotInitialized))
        ));
        assert!(matches!(
            searcher.search(&SearchCriteria::default()),
            Err(PlaceFinderError::SearchError(_))
        ));
        assert!(matches!(
            searcher.search_prompt("nhà hàng"),
            Err(PlaceFinderError::PromptError(_))
        ));
        assert!(searcher.info().is_err());
    }

    #[test]
    fn test_info() {
        let info = searcher().info().unwrap();
        assert_eq!(info.places, 3);
        assert_eq!(info.page_size, 10);
        assert_eq!(info.source, "in-memory (3 records)");
        assert!(info.summary().contains("3 places"));
    }

    #[test]
    fn test_builder() {
        let searcher = PlaceSearcherBuilder::new()
            .loader(JsonStrLoader::new(r#"[{"id": "a", "name": "Quán ốc"}]"#))
            .build()
            .unwrap();
        assert!(searcher.is_initialized());
        assert_eq!(searcher.catalog().len().unwrap(), 1);

        let lazy = PlaceSearcherBuilder::new()
            .loader(JsonStrLoader::new("not json"))
            .eager(false)
            .build()
            .unwrap();
        assert!(!lazy.is_initialized());
        assert!(lazy.initialize().is_err());
    }

    #[test]
    fn test_builder_surfaces_load_failure() {
        let result = PlaceSearcherBuilder::new()
            .loader(JsonStrLoader::new("[{"))
            .build();
        assert!(matches!(
            result,
            Err(PlaceFinderError::CatalogError(CatalogError::LoadFailed(_)))
        ));
    }
}
