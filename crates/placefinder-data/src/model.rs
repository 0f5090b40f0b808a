//! Normalized place records.
//!
//! Every optional container on a [`Place`] is present after ingest: collections are empty
//! vectors and address parts are empty strings, so consumers never branch on presence.
//! See [`crate::raw::RawPlaceRecord::normalize`] for the ingest rules.

use serde::{Deserialize, Serialize};

/// Street address of a place. Missing parts are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Address {
    pub street: String,
    /// District fragment, e.g. `"Quận 1"`
    pub district: String,
    /// City fragment, e.g. `"TP. HCM"`
    pub city: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct MenuItem {
    pub name: String,
    pub price: String,
    pub image: String,
}

/// A user review attached to a place. Carried through for presentation only.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Review {
    pub title: String,
    pub content: String,
    pub score: String,
    pub photos: Vec<String>,
    pub username: String,
    pub time: String,
    pub device: String,
    pub options: Vec<String>,
    pub hashtags: Vec<String>,
}

/// A venue in the catalog (restaurant, café, street-food stall, ...).
///
/// Records are immutable once the catalog has loaded them. Two places are the same
/// place only if their [`id`](Self::id) is the same; structural equality between
/// distinct records carries no meaning for search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Place {
    /// Unique within a catalog
    pub id: String,
    /// Passed through from the source record; `None` when the source had no name
    pub name: Option<String>,
    pub category_items: Vec<String>,
    pub category_cuisines: Vec<String>,
    pub address: Address,
    /// Free-text price bucket such as `"30.000đ - 100.000đ"`
    pub price_range: Option<String>,
    /// Numeric rating kept as text; `"0"` when the source had none
    pub rating: String,
    pub open_times: Vec<String>,
    pub url: String,
    pub reviews: Vec<Review>,
    pub photos: Vec<String>,
    pub professional_photos: Vec<String>,
    pub community_photos: Vec<String>,
    pub videos: Vec<String>,
    pub menu: Vec<MenuItem>,
    pub menu_album_images: Vec<String>,
}

impl Place {
    /// Name to show or sort by, empty when the record has none.
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or_default()
    }

    /// Rating read from the leading number of the text, so `"9.5/10"` is 9.5. `None`
    /// when the text does not start with a finite number.
    pub fn rating_value(&self) -> Option<f64> {
        let text = self.rating.trim_start();
        let end = text
            .find(|c: char| !(c.is_ascii_digit() || matches!(c, '+' | '-' | '.' | 'e' | 'E')))
            .unwrap_or(text.len());
        let prefix = &text[..end];
        (1..=prefix.len())
            .rev()
            .find_map(|len| prefix[..len].parse::<f64>().ok())
            .filter(|rating| rating.is_finite())
    }

    /// True if any category tag or cuisine tag equals `tag` exactly.
    pub fn has_tag(&self, tag: &str) -> bool {
        self.category_items
            .iter()
            .chain(&self.category_cuisines)
            .any(|t| t == tag)
    }

    /// Iterate over category tags followed by cuisine tags.
    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.category_items
            .iter()
            .chain(&self.category_cuisines)
            .map(String::as_str)
    }
}
