use std::io::Write;

use tempfile::NamedTempFile;
use tracing::info;

use super::error::Result;
use crate::model::{Address, Place};

/// Configuration for test catalog generation
#[derive(Debug, Clone)]
pub struct TestDataConfig {
    /// Number of places to generate
    pub places: usize,
    /// Whether to start from the hand-written reference places
    pub realistic_data: bool,
}

impl Default for TestDataConfig {
    fn default() -> Self {
        Self {
            places: 25,
            realistic_data: true,
        }
    }
}

impl TestDataConfig {
    /// Minimal data for unit tests: exactly the three reference places
    pub fn minimal() -> Self {
        Self {
            places: 3,
            realistic_data: true,
        }
    }

    /// Sample data for integration tests
    pub fn sample() -> Self {
        Self {
            places: 25,
            realistic_data: true,
        }
    }
}

fn place(
    id: &str,
    name: &str,
    category: &str,
    cuisine: &str,
    district: &str,
    price_range: Option<&str>,
    rating: &str,
) -> Place {
    Place {
        id: id.to_string(),
        name: Some(name.to_string()),
        category_items: vec![category.to_string()],
        category_cuisines: vec![cuisine.to_string()],
        address: Address {
            street: format!("{id} Đường Lê Lợi"),
            district: district.to_string(),
            city: "TP. HCM".to_string(),
        },
        price_range: price_range.map(ToString::to_string),
        rating: rating.to_string(),
        open_times: vec!["08:00 - 22:00".to_string()],
        url: "https://example.com".to_string(),
        ..Default::default()
    }
}

/// The three reference places used across the test suites.
pub fn sample_places() -> Vec<Place> {
    vec![
        place(
            "1",
            "Nhà hàng Việt Nam",
            "Nhà hàng",
            "Món Việt",
            "Quận 1",
            Some("50.000đ - 200.000đ"),
            "8.5",
        ),
        place(
            "2",
            "Quán cà phê Paris",
            "Quán cà phê",
            "Âu",
            "Quận 3",
            Some("30.000đ - 100.000đ"),
            "7.2",
        ),
        place(
            "3",
            "Nhà hàng Nhật Bản",
            "Nhà hàng",
            "Nhật",
            "Quận 2",
            Some("200.000đ - 500.000đ"),
            "9.1",
        ),
    ]
}

const GENERATED_CATEGORIES: [(&str, &str); 4] = [
    ("Ăn vặt/vỉa hè", "Món Việt"),
    ("Quán cà phê", "Quốc tế"),
    ("Nhà hàng", "Hàn Quốc"),
    ("Buffet", "Hải sản"),
];
const GENERATED_DISTRICTS: [&str; 5] = ["Quận 1", "Quận 3", "Quận 5", "Quận 7", "Quận Bình Thạnh"];
const GENERATED_PRICES: [Option<&str>; 3] = [None, Some("30.000đ - 100.000đ"), Some("100.000đ - 300.000đ")];

/// Build a catalog of `config.places` places with deterministic, varied attributes.
pub fn create_test_places(config: &TestDataConfig) -> Vec<Place> {
    info!("Creating test places with config: {:?}", config);

    let mut places = if config.realistic_data {
        sample_places()
    } else {
        Vec::new()
    };
    places.truncate(config.places);

    let start = places.len();
    for i in start..config.places {
        let (category, cuisine) = GENERATED_CATEGORIES[i % GENERATED_CATEGORIES.len()];
        let district = GENERATED_DISTRICTS[i % GENERATED_DISTRICTS.len()];
        let price = GENERATED_PRICES[i % GENERATED_PRICES.len()];
        // Ratings between 5.0 and 9.9, with every seventh place unrated
        let rating = if i % 7 == 6 {
            "0".to_string()
        } else {
            format!("{:.1}", 5.0 + (i * 37 % 50) as f64 / 10.0)
        };
        places.push(place(
            &format!("gen-{i}"),
            &format!("{category} số {i}"),
            category,
            cuisine,
            district,
            price,
            &rating,
        ));
    }
    places
}

/// Write the generated catalog as a JSON array into a temporary file.
pub fn create_test_json_file(config: &TestDataConfig) -> Result<NamedTempFile> {
    let places = create_test_places(config);
    let mut file = NamedTempFile::with_suffix(".json")?;
    serde_json::to_writer(&mut file, &places)?;
    file.flush()?;
    Ok(file)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_is_reference_places() {
        let places = create_test_places(&TestDataConfig::minimal());
        assert_eq!(places, sample_places());
    }

    #[test]
    fn test_sample_generates_requested_count_with_unique_ids() {
        let places = create_test_places(&TestDataConfig::sample());
        assert_eq!(places.len(), 25);

        let mut ids: Vec<_> = places.iter().map(|p| p.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 25);
    }

    #[test]
    fn test_json_file_is_loadable() {
        let file = create_test_json_file(&TestDataConfig::sample()).unwrap();
        let text = std::fs::read_to_string(file.path()).unwrap();
        let records = crate::raw::parse_records(&text).unwrap();
        assert_eq!(records.len(), 25);
    }
}
