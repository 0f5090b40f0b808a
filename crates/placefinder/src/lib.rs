//! placefinder - Keyword-driven place search
//!
//! placefinder turns a free-text request such as *"Tìm nhà hàng Việt Nam ở quận 1"* into
//! structured [`SearchCriteria`], runs those criteria against an in-memory catalog of
//! places, merges and deduplicates the partial matches and returns one page of results.
//! Prompts too vague or too short to search on are flagged with a [`Clarification`].
//!
//! # Quick Start
//!
//! ```rust
//! use placefinder::{PlaceSearcher, data::{InMemoryLoader, sample_places}};
//!
//! let searcher = PlaceSearcher::new(InMemoryLoader::from_places(sample_places()));
//! searcher.initialize()?;
//!
//! let prompt = "Nhật";
//! match searcher.check_ambiguous(prompt) {
//!     Some(clarification) => println!("{clarification}"),
//!     None => {
//!         let result = searcher.search_prompt(prompt)?;
//!         for place in &result.places {
//!             println!("{} ({})", place.display_name(), place.rating);
//!         }
//!     }
//! }
//!
//! // Highest rated first
//! let popular = searcher.popular()?;
//! assert_eq!(popular[0].id, "3");
//! # Ok::<(), placefinder::error::PlaceFinderError>(())
//! ```
//!
//! # Features
//!
//! - **Dictionary extraction**: categories, districts, cities, price sentiment and rating
//!   intent come from a swappable [`Lexicon`]
//! - **Merge pipeline**: text, category, price and rating matches are unioned, then
//!   narrowed by area
//! - **Load once**: the catalog is loaded at most once, even under concurrent callers
//! - **Loaders**: JSON file, JSON string, in-memory, or HTTP with the `download_data`
//!   feature
use once_cell::sync::OnceCell;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::{EnvFilter, fmt::format::FmtSpan};

mod ambiguity;
mod catalog;
mod config;
mod core;
pub mod error;
mod extract;
mod prompt;
mod ranking;
mod search;

pub use crate::core::{PlaceSearcher, PlaceSearcherBuilder, SearcherInfo};

pub use ambiguity::{AmbiguityGuard, Clarification};
pub use catalog::{CatalogError, CatalogInfo, PlaceCatalog};
pub use config::{CategoryMatch, MAX_RATING, SearchConfig, SearchConfigBuilder};
pub use extract::{CriteriaExtractor, Lexicon, SearchCriteria};
pub use placefinder_data as data;
pub use placefinder_data::{Place, PlaceLoader};
pub use prompt::{PromptError, PromptOrchestrator, PromptResult};
pub use ranking::{RankingService, compare_names};
pub use search::{
    PriceBand, SearchEngine, SearchError, SearchResult, paginate,
    pipeline::{PIPELINE, Stage},
};

static LOGGER_INIT: OnceCell<()> = OnceCell::new();

/// Initialize logging for placefinder.
///
/// Installs a `tracing` fmt subscriber that reports span durations. `RUST_LOG` takes
/// precedence over `level` when set. After the first successful call, later calls do
/// nothing. A call that fails, for example because another subscriber is already
/// installed, is attempted again on the next call.
///
/// ```rust
/// use placefinder::init_logging;
/// use tracing::Level;
///
/// init_logging(Level::INFO)?;
/// # Ok::<(), placefinder::error::PlaceFinderError>(())
/// ```
pub fn init_logging(level: impl Into<LevelFilter>) -> Result<&'static (), error::PlaceFinderError> {
    LOGGER_INIT.get_or_try_init(|| {
        let filter = EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(level.into().to_string()))?
            .add_directive("hyper_util=warn".parse()?)
            .add_directive("reqwest=warn".parse()?);

        tracing_subscriber::fmt::fmt()
            .with_env_filter(filter)
            .with_span_events(FmtSpan::CLOSE)
            .try_init()
            .map_err(|e| anyhow::anyhow!(e))?;
        Ok(())
    })
}
