//! Prompt-driven search
//!
//! This example demonstrates the free-text workflow:
//! - Checking a prompt for ambiguity before searching
//! - Turning a prompt into search criteria
//! - Falling back to popular places when nothing matches

use placefinder::{
    PlaceSearcher,
    data::{InMemoryLoader, TestDataConfig, create_test_places},
};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let places = create_test_places(&TestDataConfig::sample());
    let searcher = PlaceSearcher::new(InMemoryLoader::from_places(places));
    searcher.initialize()?;
    println!("{}\n", searcher.info()?.summary());

    let prompts = [
        "Ăn",
        "Tôi muốn đi chơi gì đó",
        "Quận Bình Thạnh",
        "Tìm nhà hàng ở quận 1 đánh giá cao",
        "Tìm bún bò giá rẻ",
    ];

    for prompt in prompts {
        println!("Prompt: {prompt:?}");
        if let Some(clarification) = searcher.check_ambiguous(prompt) {
            println!("  Needs clarification: {clarification}\n");
            continue;
        }

        let result = searcher.search_prompt(prompt)?;
        let criteria = &result.criteria;
        println!(
            "  Criteria: categories={:?} areas={:?} price={:?} min_rating={:?}",
            criteria.categories, criteria.areas, criteria.price_ranges, criteria.min_rating
        );

        if result.is_empty() {
            println!("  No matches, popular places instead:");
            print_places(&searcher.orchestrator().fallback_places()?, 3);
        } else {
            println!(
                "  {} matches over {} page(s):",
                result.total_count, result.total_pages
            );
            print_places(&result.places, 5);
        }
        println!();
    }

    Ok(())
}

fn print_places(places: &[placefinder::Place], limit: usize) {
    for (i, place) in places.iter().take(limit).enumerate() {
        println!(
            "    {}. {} - {}, rating {}, price {}",
            i + 1,
            place.display_name(),
            place.address.district,
            place.rating,
            place.price_range.as_deref().unwrap_or("n/a")
        );
    }

    if places.len() > limit {
        println!("    ... and {} more", places.len() - limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup_test_env() {
        let _ = placefinder::init_logging(tracing::Level::WARN);
    }
    #[test]
    fn test_prompt_search_example() {
        setup_test_env();
        assert!(
            main().is_ok(),
            "Prompt search example should run successfully"
        );
    }
}
