//! Detection of prompts too vague or too short to search on.

use std::fmt;

use tracing::debug;

use crate::{
    config::SearchConfig,
    extract::{Lexicon, fold},
};

/// Why a prompt needs clarification before searching.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clarification {
    /// The prompt contains a vague phrase and names no kind of place
    NeedsPlaceType,
    /// The trimmed prompt is shorter than the configured minimum
    TooShort { min_chars: usize },
}

impl Clarification {
    /// User-facing request for more detail.
    pub fn message(&self) -> String {
        match self {
            Self::NeedsPlaceType => "Xin vui lòng cung cấp thêm thông tin chi tiết về loại địa điểm bạn muốn tìm (ví dụ: nhà hàng, quán cà phê, công viên, v.v.)".to_string(),
            Self::TooShort { min_chars } => {
                format!("Xin vui lòng nhập yêu cầu chi tiết hơn (ít nhất {min_chars} ký tự)")
            }
        }
    }
}

impl fmt::Display for Clarification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message())
    }
}

#[derive(Debug, Clone)]
pub struct AmbiguityGuard {
    vague_phrases: Vec<String>,
    min_chars: usize,
}

impl Default for AmbiguityGuard {
    fn default() -> Self {
        Self::from_config(&SearchConfig::default())
    }
}

impl AmbiguityGuard {
    pub fn new(lexicon: &Lexicon, min_chars: usize) -> Self {
        Self {
            vague_phrases: lexicon.clone().normalized().vague_phrases,
            min_chars,
        }
    }

    pub fn from_config(config: &SearchConfig) -> Self {
        Self::new(&config.lexicon, config.min_prompt_chars)
    }

    /// `None` when the prompt is specific enough to search. Vague phrases are checked
    /// before length.
    pub fn check_ambiguous(&self, prompt: &str) -> Option<Clarification> {
        let text = fold(prompt);
        let clarification = if self
            .vague_phrases
            .iter()
            .any(|phrase| text.contains(phrase.as_str()))
        {
            Some(Clarification::NeedsPlaceType)
        } else if text.chars().count() < self.min_chars {
            Some(Clarification::TooShort {
                min_chars: self.min_chars,
            })
        } else {
            None
        };

        if let Some(clarification) = clarification {
            debug!(?clarification, "Prompt needs clarification");
        }
        clarification
    }

    pub fn is_ambiguous(&self, prompt: &str) -> bool {
        self.check_ambiguous(prompt).is_some()
    }
}
