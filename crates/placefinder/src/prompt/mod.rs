//! Free-text prompt to search results, in one call.

use std::sync::Arc;

use placefinder_data::Place;
use tracing::{error, info, instrument};

use crate::{
    catalog::PlaceCatalog,
    config::SearchConfig,
    extract::{CriteriaExtractor, SearchCriteria},
    ranking::RankingService,
    search::{SearchEngine, SearchError, SearchResult},
};

pub use error::PromptError;
use error::Result;

/// Search results for a prompt, together with the criteria extracted from it.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PromptResult {
    pub places: Vec<Place>,
    pub criteria: SearchCriteria,
    pub total_count: usize,
    pub page: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl PromptResult {
    fn new(criteria: SearchCriteria, result: SearchResult) -> Self {
        Self {
            places: result.places,
            criteria,
            total_count: result.total_count,
            page: result.page,
            page_size: result.page_size,
            total_pages: result.total_pages,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.places.is_empty()
    }
}

/// Parses prompts and runs the resulting criteria through a [`SearchEngine`].
///
/// Does not check prompts for ambiguity; callers that want that consult an
/// [`AmbiguityGuard`](crate::AmbiguityGuard) first.
#[derive(Debug, Clone)]
pub struct PromptOrchestrator {
    extractor: CriteriaExtractor,
    engine: SearchEngine,
    ranking: RankingService,
}

impl PromptOrchestrator {
    pub fn new(
        extractor: CriteriaExtractor,
        engine: SearchEngine,
        ranking: RankingService,
    ) -> Self {
        Self {
            extractor,
            engine,
            ranking,
        }
    }

    pub fn from_config(catalog: Arc<PlaceCatalog>, config: &SearchConfig) -> Self {
        Self::new(
            CriteriaExtractor::from_config(config),
            SearchEngine::from_config(Arc::clone(&catalog), config),
            RankingService::from_config(catalog, config),
        )
    }

    /// First page of results for `prompt`.
    pub fn run(&self, prompt: &str) -> Result<PromptResult> {
        self.run_page(prompt, 1, self.engine.page_size())
    }

    #[instrument(name = "Process prompt", level = "info", skip(self))]
    pub fn run_page(&self, prompt: &str, page: usize, page_size: usize) -> Result<PromptResult> {
        let criteria = self.extractor.parse(prompt);
        let result = self
            .engine
            .search_page(&criteria, page, page_size)
            .map_err(processing_failed)?;

        info!(
            total_count = result.total_count,
            page = result.page,
            "Prompt processed"
        );
        Ok(PromptResult::new(criteria, result))
    }

    /// Popular places to suggest when a prompt finds nothing.
    pub fn fallback_places(&self) -> Result<Vec<Place>> {
        self.ranking
            .popular()
            .map_err(|e| processing_failed(SearchError::from(e)))
    }
}

fn processing_failed(source: SearchError) -> PromptError {
    error!(error = %source, "Failed to process prompt");
    PromptError::ProcessingFailed { source }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum PromptError {
        #[error("Failed to process prompt: {source}")]
        ProcessingFailed {
            #[source]
            source: crate::search::SearchError,
        },
    }
    pub type Result<T> = std::result::Result<T, PromptError>;
}
