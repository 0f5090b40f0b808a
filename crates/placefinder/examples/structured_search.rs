//! Structured search and configuration
//!
//! This example builds criteria by hand and compares configurations:
//! - Merging categories, price buckets and ratings, then narrowing by area
//! - Paging through results
//! - Numeric price ranges and exact category matching versus case-insensitive

use placefinder::{
    CategoryMatch, PlaceSearcher, SearchConfigBuilder, SearchCriteria,
    data::{InMemoryLoader, TestDataConfig, create_test_places},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = SearchConfigBuilder::compact().build();
    let searcher = PlaceSearcher::with_config(
        InMemoryLoader::from_places(create_test_places(&TestDataConfig::sample())),
        config,
    );
    searcher.initialize()?;

    let criteria = SearchCriteria::from_query("buffet")
        .with_categories(["Buffet", "Hàn Quốc"])
        .with_price_ranges(["30.000đ - 100.000đ"])
        .with_min_rating(9.0)
        .with_areas(["Quận 1", "Quận 7"]);

    println!("Paging through merged results (page size 5):");
    let mut page = 1;
    loop {
        let result = searcher.search_page(&criteria, page, 5)?;
        if result.is_empty() {
            break;
        }
        println!("  Page {page}/{}:", result.total_pages);
        for place in &result.places {
            println!("    {} ({})", place.display_name(), place.address.district);
        }
        page += 1;
    }

    println!("\nPlaces priced between 50.000đ and 120.000đ:");
    let affordable = searcher
        .engine()
        .get_places_by_price_range(50_000, 120_000)?;
    println!("  {} places", affordable.len());

    let exact = searcher.engine().get_places_by_categories(&["nhà hàng"])?;
    let relaxed = searcher
        .engine()
        .clone()
        .with_category_match(CategoryMatch::CaseInsensitive)
        .get_places_by_categories(&["nhà hàng"])?;
    println!(
        "\nCategory 'nhà hàng': {} results exact, {} case-insensitive",
        exact.len(),
        relaxed.len()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = placefinder::init_logging(tracing::Level::WARN);
    }
    #[test]
    fn test_structured_search_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Structured search example should run successfully"
        );
    }
}
