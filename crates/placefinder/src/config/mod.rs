use crate::{error::PlaceFinderError, extract::Lexicon};

/// How the category merge step compares requested categories with place tags.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CategoryMatch {
    /// Tag must equal the requested category exactly
    #[default]
    Exact,
    /// Tag must equal the requested category ignoring case
    CaseInsensitive,
}

/// Configuration shared by every component of a [`PlaceSearcher`](crate::PlaceSearcher).
///
/// Use [`SearchConfigBuilder`] to create one with sensible defaults.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct SearchConfig {
    /// Page size used when a caller does not pass one
    pub page_size: usize,
    /// Number of places returned by popular/fallback listings
    pub popular_limit: usize,
    /// Minimum rating implied by "high rating" phrases
    pub high_rating_threshold: f64,
    /// Prompts shorter than this many characters ask for clarification
    pub min_prompt_chars: usize,
    pub category_match: CategoryMatch,
    /// Keyword tables for extraction and ambiguity checks
    pub lexicon: Lexicon,
}

impl SearchConfig {
    pub fn builder() -> SearchConfigBuilder {
        SearchConfigBuilder::default()
    }
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            page_size: 10,
            popular_limit: 10,
            high_rating_threshold: 8.0,
            min_prompt_chars: 3,
            category_match: CategoryMatch::Exact,
            lexicon: Lexicon::default(),
        }
    }
}

/// Highest rating a place can carry.
pub const MAX_RATING: f64 = 10.0;

/// Builder for creating search configurations with ergonomic defaults
#[derive(Debug, Clone, Default)]
pub struct SearchConfigBuilder {
    config: SearchConfig,
}

impl SearchConfigBuilder {
    /// Create a new builder with sensible defaults
    pub fn new() -> Self {
        Self {
            config: SearchConfig::default(),
        }
    }

    /// Small pages and short popular lists, for narrow screens
    pub fn compact() -> Self {
        let mut builder = Self::new();
        builder.config.page_size = 5;
        builder.config.popular_limit = 5;
        builder
    }

    /// Large pages for browsing the whole catalog
    pub fn browse() -> Self {
        let mut builder = Self::new();
        builder.config.page_size = 50;
        builder.config.popular_limit = 20;
        builder
    }

    /// Set the default page size (at least 1)
    pub fn page_size(mut self, page_size: usize) -> Self {
        self.config.page_size = page_size.max(1);
        self
    }

    /// Set how many places popular listings return
    pub fn popular_limit(mut self, limit: usize) -> Self {
        self.config.popular_limit = limit;
        self
    }

    /// Set the minimum prompt length, in characters
    pub fn min_prompt_chars(mut self, chars: usize) -> Self {
        self.config.min_prompt_chars = chars;
        self
    }

    pub fn category_match(mut self, mode: CategoryMatch) -> Self {
        self.config.category_match = mode;
        self
    }

    /// Replace the keyword tables
    pub fn lexicon(mut self, lexicon: Lexicon) -> Self {
        self.config.lexicon = lexicon.normalized();
        self
    }

    /// Set the rating implied by "high rating" phrases (must be within `0..=10`)
    pub fn high_rating_threshold(mut self, threshold: f64) -> Result<Self, PlaceFinderError> {
        if !(0.0..=MAX_RATING).contains(&threshold) {
            return Err(PlaceFinderError::ConfigError(format!(
                "High rating threshold must be between 0 and {MAX_RATING}, got {threshold}"
            )));
        }
        self.config.high_rating_threshold = threshold;
        Ok(self)
    }

    /// Build the final configuration
    pub fn build(self) -> SearchConfig {
        self.config
    }
}
