use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};

use ahash::AHashSet;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument, warn};

use crate::{
    DataError,
    model::{Address, MenuItem, Place, Review},
};

#[cfg(feature = "download_data")]
pub mod fetch;

pub use super::error::Result;

/// File name of the catalog inside the data directory.
pub const PLACES_FILE_NAME: &str = "places.json";

/// A JSON scalar that may arrive either as a string or as a number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Scalar {
    Text(String),
    Number(serde_json::Number),
}

impl Scalar {
    /// Text form of the scalar, `None` when it is an empty string.
    fn into_non_empty_text(self) -> Option<String> {
        match self {
            Self::Text(text) if text.is_empty() => None,
            Self::Text(text) => Some(text),
            Self::Number(number) => Some(number.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawAddress {
    pub street: Option<String>,
    pub district: Option<String>,
    pub city: Option<String>,
}

/// A place record exactly as the source delivered it. Any field may be missing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawPlaceRecord {
    pub id: Option<Scalar>,
    pub name: Option<String>,
    pub category_items: Option<Vec<String>>,
    pub category_cuisines: Option<Vec<String>>,
    pub address: Option<RawAddress>,
    pub price_range: Option<String>,
    pub rating: Option<Scalar>,
    pub open_times: Option<Vec<String>>,
    pub url: Option<String>,
    pub reviews: Option<Vec<Review>>,
    pub photos: Option<Vec<String>>,
    pub professional_photos: Option<Vec<String>>,
    pub community_photos: Option<Vec<String>>,
    pub videos: Option<Vec<String>>,
    pub menu: Option<Vec<MenuItem>>,
    pub menu_album_images: Option<Vec<String>>,
}

impl RawPlaceRecord {
    /// Normalize the record found at zero-based position `index` of its batch.
    ///
    /// - missing or empty `id` becomes the stringified `index`
    /// - `name` passes through untouched
    /// - missing lists become empty, missing address parts become `""`
    /// - missing or empty `price_range` becomes `None`
    /// - missing or empty `rating` becomes `"0"`
    /// - missing `url` becomes `""`
    pub fn normalize(self, index: usize) -> Place {
        let address = self.address.unwrap_or_default();
        Place {
            id: self
                .id
                .and_then(Scalar::into_non_empty_text)
                .unwrap_or_else(|| index.to_string()),
            name: self.name,
            category_items: self.category_items.unwrap_or_default(),
            category_cuisines: self.category_cuisines.unwrap_or_default(),
            address: Address {
                street: address.street.unwrap_or_default(),
                district: address.district.unwrap_or_default(),
                city: address.city.unwrap_or_default(),
            },
            price_range: self.price_range.filter(|range| !range.is_empty()),
            rating: self
                .rating
                .and_then(Scalar::into_non_empty_text)
                .unwrap_or_else(|| "0".to_string()),
            open_times: self.open_times.unwrap_or_default(),
            url: self.url.unwrap_or_default(),
            reviews: self.reviews.unwrap_or_default(),
            photos: self.photos.unwrap_or_default(),
            professional_photos: self.professional_photos.unwrap_or_default(),
            community_photos: self.community_photos.unwrap_or_default(),
            videos: self.videos.unwrap_or_default(),
            menu: self.menu.unwrap_or_default(),
            menu_album_images: self.menu_album_images.unwrap_or_default(),
        }
    }
}

impl From<Place> for RawPlaceRecord {
    fn from(place: Place) -> Self {
        Self {
            id: Some(Scalar::Text(place.id)),
            name: place.name,
            category_items: Some(place.category_items),
            category_cuisines: Some(place.category_cuisines),
            address: Some(RawAddress {
                street: Some(place.address.street),
                district: Some(place.address.district),
                city: Some(place.address.city),
            }),
            price_range: place.price_range,
            rating: Some(Scalar::Text(place.rating)),
            open_times: Some(place.open_times),
            url: Some(place.url),
            reviews: Some(place.reviews),
            photos: Some(place.photos),
            professional_photos: Some(place.professional_photos),
            community_photos: Some(place.community_photos),
            videos: Some(place.videos),
            menu: Some(place.menu),
            menu_album_images: Some(place.menu_album_images),
        }
    }
}

/// Normalize a whole batch, rejecting it if two records end up with the same id.
#[instrument(name = "Normalize place records", skip_all, level = "debug")]
pub fn normalize_records(records: Vec<RawPlaceRecord>) -> Result<Vec<Place>> {
    let places = records
        .into_iter()
        .enumerate()
        .map(|(index, record)| record.normalize(index))
        .collect::<Vec<_>>();

    let mut seen = AHashSet::with_capacity(places.len());
    for place in &places {
        if !seen.insert(place.id.as_str()) {
            warn!(id = %place.id, "Duplicate place id in source data");
            return Err(DataError::DuplicateId(place.id.clone()));
        }
    }

    debug!(count = places.len(), "Normalized place records");
    Ok(places)
}

/// Parse a JSON array of raw place records.
pub fn parse_records(json: &str) -> Result<Vec<RawPlaceRecord>> {
    serde_json::from_str(json).map_err(From::from)
}

/// Supplies raw place records to a catalog.
///
/// Implementations may be slow (disk, network); the catalog calls [`load`](Self::load)
/// at most once per successful initialization.
pub trait PlaceLoader: Send + Sync {
    fn load(&self) -> Result<Vec<RawPlaceRecord>>;

    /// Short human-readable description of where records come from.
    fn describe(&self) -> String {
        std::any::type_name::<Self>().to_string()
    }
}

impl<F> PlaceLoader for F
where
    F: Fn() -> Result<Vec<RawPlaceRecord>> + Send + Sync,
{
    fn load(&self) -> Result<Vec<RawPlaceRecord>> {
        self()
    }

    fn describe(&self) -> String {
        "closure".to_string()
    }
}

/// Reads a JSON array of place records from a file.
#[derive(Debug, Clone)]
pub struct JsonFileLoader {
    path: PathBuf,
}

impl JsonFileLoader {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Loader for `places.json` inside the configured data directory.
    pub fn from_data_dir() -> Self {
        Self::new(crate::get_data_dir().join(PLACES_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PlaceLoader for JsonFileLoader {
    #[instrument(name = "Load places from JSON file", skip_all, fields(path = %self.path.display()), level = "info")]
    fn load(&self) -> Result<Vec<RawPlaceRecord>> {
        if !self.path.exists() {
            warn!("Place data file not found");
            return Err(DataError::MissingDataFile(self.path.clone()));
        }
        let reader = BufReader::new(File::open(&self.path)?);
        let records: Vec<RawPlaceRecord> = serde_json::from_reader(reader)?;
        info!(count = records.len(), "Read raw place records");
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("file:{}", self.path.display())
    }
}

/// Parses records from a JSON string held in memory.
#[derive(Debug, Clone)]
pub struct JsonStrLoader {
    json: String,
}

impl JsonStrLoader {
    pub fn new(json: impl Into<String>) -> Self {
        Self { json: json.into() }
    }
}

impl PlaceLoader for JsonStrLoader {
    fn load(&self) -> Result<Vec<RawPlaceRecord>> {
        parse_records(&self.json)
    }

    fn describe(&self) -> String {
        format!("json string ({} bytes)", self.json.len())
    }
}

/// Hands out a fixed set of records. Useful for embedding and tests.
#[derive(Debug, Clone, Default)]
pub struct InMemoryLoader {
    records: Vec<RawPlaceRecord>,
}

impl InMemoryLoader {
    pub fn new(records: Vec<RawPlaceRecord>) -> Self {
        Self { records }
    }

    pub fn from_places(places: impl IntoIterator<Item = Place>) -> Self {
        Self::new(places.into_iter().map(From::from).collect())
    }
}

impl PlaceLoader for InMemoryLoader {
    fn load(&self) -> Result<Vec<RawPlaceRecord>> {
        Ok(self.records.clone())
    }

    fn describe(&self) -> String {
        format!("in-memory ({} records)", self.records.len())
    }
}
