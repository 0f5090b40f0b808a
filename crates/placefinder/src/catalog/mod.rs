//! The load-once, in-memory place catalog.
//!
//! A [`PlaceCatalog`] starts out empty. [`PlaceCatalog::initialize`] runs its loader and
//! publishes the normalized records; until that succeeds every read fails with
//! [`CatalogError::NotInitialized`]. Initialization is guarded so that concurrent callers
//! trigger a single load, and a failed load leaves the catalog empty for a later retry.

use std::fmt;

use chrono::{DateTime, Utc};
use once_cell::sync::OnceCell;
use placefinder_data::{Place, PlaceLoader, normalize_records};
use tracing::{info, instrument, warn};

pub use error::CatalogError;
use error::Result;

struct Loaded {
    places: Vec<Place>,
    loaded_at: DateTime<Utc>,
}

/// Read-only collection of every known [`Place`].
pub struct PlaceCatalog {
    loader: Box<dyn PlaceLoader>,
    loaded: OnceCell<Loaded>,
}

impl fmt::Debug for PlaceCatalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PlaceCatalog")
            .field("source", &self.loader.describe())
            .field("initialized", &self.is_initialized())
            .finish_non_exhaustive()
    }
}

impl PlaceCatalog {
    /// Create an uninitialized catalog backed by `loader`.
    pub fn new(loader: impl PlaceLoader + 'static) -> Self {
        Self::from_boxed(Box::new(loader))
    }

    pub fn from_boxed(loader: Box<dyn PlaceLoader>) -> Self {
        Self {
            loader,
            loaded: OnceCell::new(),
        }
    }

    /// Load the catalog if it is not loaded yet.
    ///
    /// Calling this on an initialized catalog is a no-op. If another thread is loading,
    /// this blocks until that load finishes and, on success, returns without loading again.
    #[instrument(name = "Initialize PlaceCatalog", level = "info", skip_all)]
    pub fn initialize(&self) -> Result<()> {
        self.loaded
            .get_or_try_init(|| {
                info!(source = %self.loader.describe(), "Loading places");
                let t_load = std::time::Instant::now();

                let places = self
                    .loader
                    .load()
                    .and_then(normalize_records)
                    .map_err(|e| {
                        warn!(error = %e, "Failed to load places");
                        CatalogError::LoadFailed(e)
                    })?;

                info!(
                    count = places.len(),
                    elapsed_seconds = ?t_load.elapsed(),
                    "Place catalog loaded"
                );
                Ok(Loaded {
                    places,
                    loaded_at: Utc::now(),
                })
            })
            .map(|_| ())
    }

    pub fn is_initialized(&self) -> bool {
        self.loaded.get().is_some()
    }

    /// Borrow the loaded places without copying them.
    pub fn snapshot(&self) -> Result<&[Place]> {
        self.loaded
            .get()
            .map(|loaded| loaded.places.as_slice())
            .ok_or(CatalogError::NotInitialized)
    }

    /// Copy of every place. Mutating the returned vector does not affect the catalog.
    pub fn all(&self) -> Result<Vec<Place>> {
        self.snapshot().map(<[Place]>::to_vec)
    }

    pub fn by_id(&self, id: &str) -> Result<Place> {
        self.snapshot()?
            .iter()
            .find(|place| place.id == id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(id.to_string()))
    }

    pub fn len(&self) -> Result<usize> {
        self.snapshot().map(<[Place]>::len)
    }

    pub fn is_empty(&self) -> Result<bool> {
        self.snapshot().map(<[Place]>::is_empty)
    }

    /// Information about where the catalog came from and what it holds.
    pub fn info(&self) -> Result<CatalogInfo> {
        let loaded = self.loaded.get().ok_or(CatalogError::NotInitialized)?;
        Ok(CatalogInfo {
            source: self.loader.describe(),
            places: loaded.places.len(),
            loaded_at: loaded.loaded_at,
        })
    }
}

/// Information about a loaded catalog.
#[derive(Debug, Clone)]
pub struct CatalogInfo {
    pub source: String,
    pub places: usize,
    pub loaded_at: DateTime<Utc>,
}

impl CatalogInfo {
    /// Get a human-readable summary of the catalog.
    pub fn summary(&self) -> String {
        format!(
            "PlaceCatalog from {} with {} places (loaded {})",
            self.source,
            self.places,
            self.loaded_at.to_rfc3339()
        )
    }
}

mod error {
    use thiserror::Error;

    #[derive(Error, Debug)]
    pub enum CatalogError {
        #[error("Place catalog not initialized")]
        NotInitialized,
        #[error("Failed to load places data: {0}")]
        LoadFailed(#[source] placefinder_data::DataError),
        #[error("Place not found: {0}")]
        NotFound(String),
    }
    pub type Result<T> = std::result::Result<T, CatalogError>;
}

#[cfg(test)]
mod tests {
    use std::sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    };

    use placefinder_data::{DataError, InMemoryLoader, RawPlaceRecord, sample_places};

    use super::*;

    fn sample_catalog() -> PlaceCatalog {
        PlaceCatalog::new(InMemoryLoader::from_places(sample_places()))
    }

    #[test]
    fn test_reads_fail_before_initialize() {
        let catalog = sample_catalog();
        assert!(!catalog.is_initialized());
        assert!(matches!(catalog.all(), Err(CatalogError::NotInitialized)));
        assert!(matches!(catalog.by_id("1"), Err(CatalogError::NotInitialized)));
        assert!(matches!(catalog.snapshot(), Err(CatalogError::NotInitialized)));
        assert!(matches!(catalog.info(), Err(CatalogError::NotInitialized)));
    }

    #[test]
    fn test_initialize_loads_places() {
        let catalog = sample_catalog();
        catalog.initialize().unwrap();

        assert!(catalog.is_initialized());
        assert_eq!(catalog.len().unwrap(), 3);
        assert_eq!(catalog.all().unwrap(), sample_places());

        let info = catalog.info().unwrap();
        assert_eq!(info.places, 3);
        assert!(info.summary().contains("3 places"));
    }

    #[test]
    fn test_initialize_is_idempotent() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let catalog = PlaceCatalog::new(move || -> placefinder_data::Result<Vec<RawPlaceRecord>> {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(vec![RawPlaceRecord::default()])
        });

        catalog.initialize().unwrap();
        catalog.initialize().unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_failed_load_stays_uninitialized_and_can_retry() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let catalog = PlaceCatalog::new(move || -> placefinder_data::Result<Vec<RawPlaceRecord>> {
            if counter.fetch_add(1, Ordering::SeqCst) == 0 {
                Err(DataError::Source("network unreachable".to_string()))
            } else {
                Ok(vec![RawPlaceRecord::default(), RawPlaceRecord::default()])
            }
        });

        let err = catalog.initialize().unwrap_err();
        assert!(matches!(err, CatalogError::LoadFailed(_)));
        assert!(!catalog.is_initialized());
        assert!(matches!(catalog.all(), Err(CatalogError::NotInitialized)));

        catalog.initialize().unwrap();
        assert!(catalog.is_initialized());
        assert_eq!(catalog.len().unwrap(), 2);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn test_duplicate_ids_fail_the_load() {
        let mut places = sample_places();
        places[1].id = "1".to_string();
        let catalog = PlaceCatalog::new(InMemoryLoader::from_places(places));

        let err = catalog.initialize().unwrap_err();
        assert!(matches!(
            err,
            CatalogError::LoadFailed(DataError::DuplicateId(_))
        ));
        assert!(!catalog.is_initialized());
    }

    #[test]
    fn test_concurrent_initialize_loads_once() {
        let calls = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&calls);
        let catalog = PlaceCatalog::new(move || -> placefinder_data::Result<Vec<RawPlaceRecord>> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(20));
            Ok(sample_places().into_iter().map(RawPlaceRecord::from).collect())
        });

        std::thread::scope(|scope| {
            for _ in 0..8 {
                scope.spawn(|| {
                    catalog.initialize().unwrap();
                    // Every caller sees the complete catalog once initialize returns
                    assert_eq!(catalog.len().unwrap(), 3);
                });
            }
        });

        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_all_returns_a_copy() {
        let catalog = sample_catalog();
        catalog.initialize().unwrap();

        let mut copy = catalog.all().unwrap();
        copy.clear();
        assert_eq!(catalog.len().unwrap(), 3);
    }

    #[test]
    fn test_by_id() {
        let catalog = sample_catalog();
        catalog.initialize().unwrap();

        let place = catalog.by_id("2").unwrap();
        assert_eq!(place.display_name(), "Quán cà phê Paris");
        assert!(matches!(catalog.by_id("missing"), Err(CatalogError::NotFound(id)) if id == "missing"));
    }
}
