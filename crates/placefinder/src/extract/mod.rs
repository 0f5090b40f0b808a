//! Dictionary-based extraction of search criteria from free-text prompts.
//!
//! There is no statistical language model here: a prompt is folded (trimmed, NFC,
//! lower-cased) and every [`Lexicon`] entry it contains becomes a criterion.

use itertools::Itertools;
use tracing::{debug, instrument};

mod lexicon;
pub(crate) use lexicon::fold;
pub use lexicon::Lexicon;

use crate::config::SearchConfig;

/// Structured, filterable form of a user's search intent.
///
/// Produced by [`CriteriaExtractor::parse`], but callers may build one by hand.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Category or cuisine tags, matched exactly against a place's tags
    pub categories: Vec<String>,
    /// District or city fragments
    pub areas: Vec<String>,
    /// Exact `price_range` bucket values
    pub price_ranges: Vec<String>,
    /// The raw original text, verbatim
    pub query: String,
    pub min_rating: Option<f64>,
}

impl SearchCriteria {
    pub fn from_query(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_categories<S: Into<String>>(mut self, categories: impl IntoIterator<Item = S>) -> Self {
        self.categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_areas<S: Into<String>>(mut self, areas: impl IntoIterator<Item = S>) -> Self {
        self.areas = areas.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_price_ranges<S: Into<String>>(mut self, ranges: impl IntoIterator<Item = S>) -> Self {
        self.price_ranges = ranges.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_min_rating(mut self, min_rating: f64) -> Self {
        self.min_rating = Some(min_rating);
        self
    }

    /// True when the trimmed query is non-empty.
    pub fn has_query(&self) -> bool {
        !self.query.trim().is_empty()
    }
}

/// Turns prompts into [`SearchCriteria`] using a [`Lexicon`].
#[derive(Debug, Clone)]
pub struct CriteriaExtractor {
    lexicon: Lexicon,
    high_rating_threshold: f64,
}

impl Default for CriteriaExtractor {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl CriteriaExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self {
            lexicon: config.lexicon.clone().normalized(),
            high_rating_threshold: config.high_rating_threshold,
        }
    }

    /// Use a different set of keyword tables. The tables are normalized first.
    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon.normalized();
        self
    }

    pub fn with_high_rating_threshold(mut self, threshold: f64) -> Self {
        self.high_rating_threshold = threshold;
        self
    }

    pub fn lexicon(&self) -> &Lexicon {
        &self.lexicon
    }

    /// Collect every keyword the prompt contains. Never fails.
    pub fn extract(&self, prompt: &str) -> SearchCriteria {
        let text = fold(prompt);
        let contained = |entries: &[String]| -> Vec<String> {
            entries
                .iter()
                .filter(|entry| text.contains(entry.as_str()))
                .cloned()
                .collect()
        };

        let categories = contained(&self.lexicon.categories)
            .into_iter()
            .unique()
            .collect();
        let areas = contained(&self.lexicon.districts)
            .into_iter()
            .chain(contained(&self.lexicon.cities))
            .unique()
            .collect();
        let price_ranges = contained(&self.lexicon.price_indicators);
        let min_rating = self
            .lexicon
            .high_rating_phrases
            .iter()
            .any(|phrase| text.contains(phrase.as_str()))
            .then_some(self.high_rating_threshold);

        SearchCriteria {
            categories,
            areas,
            price_ranges,
            query: prompt.to_string(),
            min_rating,
        }
    }

    /// Drop stop words from `categories` and `areas` and dedupe them.
    ///
    /// Leaves `price_ranges`, `query` and `min_rating` untouched. Idempotent.
    pub fn refine(&self, criteria: SearchCriteria) -> SearchCriteria {
        let keep = |values: Vec<String>| -> Vec<String> {
            values
                .into_iter()
                .filter(|value| !self.lexicon.is_stop_word(value))
                .unique()
                .collect()
        };

        SearchCriteria {
            categories: keep(criteria.categories),
            areas: keep(criteria.areas),
            ..criteria
        }
    }

    /// `refine(extract(prompt))`.
    #[instrument(name = "Parse prompt", level = "debug", skip(self))]
    pub fn parse(&self, prompt: &str) -> SearchCriteria {
        let criteria = self.refine(self.extract(prompt));
        debug!(
            categories = ?criteria.categories,
            areas = ?criteria.areas,
            price_indicators = ?criteria.price_ranges,
            min_rating = ?criteria.min_rating,
            "Extracted criteria"
        );
        criteria
    }
}
