//! Keyword tables used by [`CriteriaExtractor`](super::CriteriaExtractor) and
//! [`AmbiguityGuard`](crate::AmbiguityGuard).

use itertools::Itertools;
use unicode_normalization::UnicodeNormalization;

const VIETNAMESE_VERSION: &str = "vi-2024.1";

const CATEGORY_KEYWORDS: &[&str] = &[
    "nhà hàng",
    "quán ăn",
    "quán cà phê",
    "cà phê",
    "bar",
    "pub",
    "nhà hàng nhật",
    "nhà hàng hàn",
    "nhà hàng trung",
    "ăn vặt",
    "buffet",
    "lẩu",
    "nướng",
    "hải sản",
];

const DISTRICT_KEYWORDS: &[&str] = &[
    "quận 1",
    "quận 2",
    "quận 3",
    "quận 4",
    "quận 5",
    "quận 6",
    "quận 7",
    "quận 8",
    "quận 9",
    "quận 10",
    "quận 11",
    "quận 12",
    "quận bình thạnh",
    "quận phú nhuận",
    "quận tân bình",
    "quận tân phú",
    "quận gò vấp",
    "quận bình tân",
    "thủ đức",
    "bình chánh",
    "củ chi",
    "hóc môn",
    "nhà bè",
];

const CITY_KEYWORDS: &[&str] = &[
    "tp hcm",
    "tp. hcm",
    "hồ chí minh",
    "hcm",
    "hà nội",
    "đà nẵng",
    "huế",
    "nha trang",
    "đà lạt",
];

const PRICE_INDICATORS: &[&str] = &[
    "giá rẻ",
    "giá thấp",
    "rẻ",
    "thấp",
    "giá cao",
    "đắt",
    "cao",
    "tiết kiệm",
];

const HIGH_RATING_PHRASES: &[&str] = &["đánh giá cao", "rating cao", "sao cao"];

const VAGUE_PHRASES: &[&str] = &["ăn gì", "chơi đâu", "đi chơi", "gì cũng được", "bất kỳ"];

const STOP_WORDS: &[&str] = &[
    "tôi", "muốn", "cần", "tìm", "ở", "tại", "với", "cho", "và", "hoặc", "nhưng", "thì", "là",
    "có", "được", "bị", "do", "bởi", "theo", "vào", "ra", "lên", "xuống", "đi", "đến", "về",
    "trên", "dưới", "trong", "ngoài", "giữa", "trước", "sau", "khi", "nếu", "mà", "như", "bằng",
    "cùng", "khác", "nhiều", "ít", "một", "hai", "ba", "bốn", "năm", "sáu", "bảy", "tám", "chín",
    "mười", "của", "các", "những", "cái", "con", "người", "ông", "bà", "chị", "anh", "em",
];

/// Lower-case, NFC-composed form used for every keyword comparison.
pub(crate) fn fold(text: &str) -> String {
    text.trim().nfc().collect::<String>().to_lowercase()
}

/// A versioned set of keyword tables.
///
/// All matching is substring containment against the folded prompt, so entries are
/// folded the same way once, by [`Lexicon::normalized`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct Lexicon {
    pub version: String,
    /// Cafés, restaurants, cuisines and food styles
    pub categories: Vec<String>,
    pub districts: Vec<String>,
    pub cities: Vec<String>,
    /// Price sentiment phrases ("cheap", "expensive", ...)
    pub price_indicators: Vec<String>,
    /// Phrases that imply the user wants highly rated places
    pub high_rating_phrases: Vec<String>,
    /// Phrases too vague to search on
    pub vague_phrases: Vec<String>,
    pub stop_words: Vec<String>,
}

fn owned(words: &[&str]) -> Vec<String> {
    words.iter().map(ToString::to_string).collect()
}

fn fold_all(words: Vec<String>) -> Vec<String> {
    words
        .into_iter()
        .map(|w| fold(&w))
        .filter(|w| !w.is_empty())
        .unique()
        .collect()
}

impl Lexicon {
    /// Built-in tables for Vietnamese food and venue queries in Vietnamese cities.
    pub fn vietnamese() -> Self {
        Self {
            version: VIETNAMESE_VERSION.to_string(),
            categories: owned(CATEGORY_KEYWORDS),
            districts: owned(DISTRICT_KEYWORDS),
            cities: owned(CITY_KEYWORDS),
            price_indicators: owned(PRICE_INDICATORS),
            high_rating_phrases: owned(HIGH_RATING_PHRASES),
            vague_phrases: owned(VAGUE_PHRASES),
            stop_words: owned(STOP_WORDS),
        }
    }

    /// Fold every entry, drop empty entries and duplicates, keep table order.
    pub fn normalized(self) -> Self {
        Self {
            version: self.version,
            categories: fold_all(self.categories),
            districts: fold_all(self.districts),
            cities: fold_all(self.cities),
            price_indicators: fold_all(self.price_indicators),
            high_rating_phrases: fold_all(self.high_rating_phrases),
            vague_phrases: fold_all(self.vague_phrases),
            stop_words: fold_all(self.stop_words),
        }
    }

    pub fn is_stop_word(&self, word: &str) -> bool {
        let word = fold(word);
        self.stop_words.iter().any(|stop| *stop == word)
    }

    /// Parse a lexicon from JSON and normalize it.
    #[cfg(feature = "serde")]
    pub fn from_json_str(json: &str) -> Result<Self, crate::error::PlaceFinderError> {
        let lexicon: Self = serde_json::from_str(json)
            .map_err(|e| crate::error::PlaceFinderError::ConfigError(format!("Invalid lexicon: {e}")))?;
        Ok(lexicon.normalized())
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        Self::vietnamese().normalized()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fold_lowercases_and_composes() {
        // "Quận" in decomposed form
        let decomposed = "Qua\u{0302}\u{0323}n 1";
        assert_eq!(fold(decomposed), "quận 1");
        assert_eq!(fold("  NHÀ HÀNG "), "nhà hàng");
    }

    #[test]
    fn test_normalized_drops_empty_and_duplicate_entries() {
        let lexicon = Lexicon {
            categories: vec!["Bar".into(), "".into(), "bar".into(), " Lẩu ".into()],
            ..Lexicon::vietnamese()
        }
        .normalized();
        assert_eq!(lexicon.categories, vec!["bar", "lẩu"]);
    }

    #[test]
    fn test_default_is_normalized_vietnamese() {
        let lexicon = Lexicon::default();
        assert_eq!(lexicon.version, VIETNAMESE_VERSION);
        assert_eq!(lexicon, Lexicon::vietnamese().normalized());
        assert!(lexicon.districts.contains(&"quận bình thạnh".to_string()));
    }

    #[test]
    fn test_is_stop_word_is_case_insensitive() {
        let lexicon = Lexicon::default();
        assert!(lexicon.is_stop_word("Tôi"));
        assert!(lexicon.is_stop_word("ở"));
        assert!(!lexicon.is_stop_word("nhà hàng"));
    }

    #[cfg(feature = "serde")]
    #[test]
    fn test_from_json_str() {
        let json = serde_json::to_string(&Lexicon::vietnamese()).unwrap();
        let lexicon = Lexicon::from_json_str(&json).unwrap();
        assert_eq!(lexicon, Lexicon::default());

        assert!(Lexicon::from_json_str("{}").is_err());
    }
}
