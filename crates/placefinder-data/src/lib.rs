//! Place records and the loaders that feed them into a catalog.
//!
//! Raw records come from a [`PlaceLoader`] as [`RawPlaceRecord`]s, where any field may be
//! missing, and are turned into fully populated [`Place`]s by [`normalize_records`].
use once_cell::sync::Lazy;
use std::path::PathBuf;

mod error;
pub mod model;
pub mod raw;
pub mod test_data;

pub use error::{DataError, Result};
pub use model::{Address, MenuItem, Place, Review};
#[cfg(feature = "download_data")]
pub use raw::fetch::UrlLoader;
pub use raw::{
    InMemoryLoader, JsonFileLoader, JsonStrLoader, PLACES_FILE_NAME, PlaceLoader, RawAddress,
    RawPlaceRecord, Scalar, normalize_records, parse_records,
};
pub use test_data::{TestDataConfig, create_test_json_file, create_test_places, sample_places};

pub const DATA_DIR_DEFAULT: &str = "./places_data";

/// Data directory, taken from the `DATA_DIR` environment variable on first use.
pub static DATA_DIR: Lazy<PathBuf> = Lazy::new(|| {
    let dir = std::env::var("DATA_DIR").unwrap_or_else(|_| DATA_DIR_DEFAULT.to_string());
    PathBuf::from(dir)
});

pub fn get_data_dir() -> &'static std::path::Path {
    DATA_DIR.as_path()
}
