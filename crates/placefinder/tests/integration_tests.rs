//! Integration tests for placefinder
//!
//! These tests run against the public API only, using the fixtures shipped in
//! `placefinder::data::test_data`.

use std::{
    io::Write,
    sync::{
        Arc,
        atomic::{AtomicUsize, Ordering},
    },
};

use placefinder::{
    CatalogError, CategoryMatch, Clarification, PlaceCatalog, PlaceSearcher, PlaceSearcherBuilder,
    SearchConfigBuilder, SearchCriteria,
    data::{
        InMemoryLoader, JsonFileLoader, RawPlaceRecord, TestDataConfig, create_test_json_file,
        sample_places,
    },
    error::PlaceFinderError,
};

fn setup_test_env() {
    let _ = placefinder::init_logging(tracing::Level::WARN);
}

fn sample_searcher() -> PlaceSearcher {
    let searcher = PlaceSearcher::new(InMemoryLoader::from_places(sample_places()));
    searcher.initialize().expect("Sample catalog should load");
    searcher
}

fn ids(places: &[placefinder::Place]) -> Vec<&str> {
    places.iter().map(|place| place.id.as_str()).collect()
}

#[test]
fn test_full_workflow() {
    setup_test_env();

    let searcher = sample_searcher();

    // 1. Text query
    let restaurants = searcher
        .search(&SearchCriteria::from_query("nhà hàng"))
        .expect("Search should work");
    assert_eq!(ids(&restaurants.places), vec!["1", "3"]);
    assert_eq!(restaurants.total_count, 2);
    assert_eq!(restaurants.total_pages, 1);

    // 2. Area only
    let district_one = searcher
        .search(&SearchCriteria::default().with_areas(["Quận 1"]))
        .expect("Area search should work");
    assert_eq!(ids(&district_one.places), vec!["1"]);

    // 3. Popular
    let popular = searcher
        .ranking()
        .get_popular(2)
        .expect("Ranking should work");
    assert_eq!(ids(&popular), vec!["3", "1"]);

    // 4. Guard
    assert_eq!(
        searcher.check_ambiguous("Ăn"),
        Some(Clarification::TooShort { min_chars: 3 })
    );
    assert_eq!(
        searcher.check_ambiguous("Tôi muốn đi chơi gì đó"),
        Some(Clarification::NeedsPlaceType)
    );
    assert_eq!(searcher.check_ambiguous("Tìm nhà hàng Việt Nam ở quận 1"), None);
}

#[test]
fn test_prompt_extraction_feeds_search() {
    setup_test_env();

    let searcher = sample_searcher();
    let prompt = "Tìm nhà hàng ở quận 1 đánh giá cao";
    let criteria = searcher.parse_prompt(prompt);
    assert_eq!(criteria.query, prompt);
    assert_eq!(criteria.categories, vec!["nhà hàng"]);
    assert_eq!(criteria.areas, vec!["quận 1"]);
    assert_eq!(criteria.min_rating, Some(8.0));

    // The rating merge adds 1 and 3, then the area keeps 1
    let result = searcher.search_prompt(prompt).expect("Prompt should run");
    assert_eq!(ids(&result.places), vec!["1"]);
    assert_eq!(result.criteria, criteria);
}

#[test]
fn test_case_insensitive_categories_match_extracted_terms() {
    setup_test_env();

    let config = SearchConfigBuilder::new()
        .category_match(CategoryMatch::CaseInsensitive)
        .build();
    let searcher =
        PlaceSearcher::with_config(InMemoryLoader::from_places(sample_places()), config);
    searcher.initialize().unwrap();

    let result = searcher
        .search_prompt("Cho tôi một quán cà phê nhé")
        .expect("Prompt should run");
    assert_eq!(ids(&result.places), vec!["2"]);
}

#[test]
fn test_load_from_json_file() {
    setup_test_env();

    let file = create_test_json_file(&TestDataConfig::sample()).expect("Should write fixture");
    let searcher = PlaceSearcherBuilder::new()
        .loader(JsonFileLoader::new(file.path()))
        .build()
        .expect("Should load from file");

    let info = searcher.info().expect("Info should be available");
    assert_eq!(info.places, 25);
    assert!(info.source.starts_with("file:"));

    let everything = searcher
        .search_page(&SearchCriteria::default(), 1, 100)
        .unwrap();
    assert_eq!(everything.total_count, 25);
}

#[test]
fn test_missing_file_leaves_searcher_uninitialized() {
    setup_test_env();

    let searcher = PlaceSearcher::new(JsonFileLoader::new("/definitely/not/here/places.json"));
    let err = searcher.initialize().unwrap_err();
    assert!(matches!(err, PlaceFinderError::CatalogError(_)));
    assert!(!searcher.is_initialized());
}

#[test]
fn test_malformed_json_file_fails_to_load() {
    setup_test_env();

    let mut file = tempfile::NamedTempFile::new().expect("Should create temp file");
    file.write_all(r#"[{"id": "1", "name": "Quán ốc""#.as_bytes())
        .expect("Should write temp file");

    let searcher = PlaceSearcher::new(JsonFileLoader::new(file.path()));
    let err = searcher.initialize().unwrap_err();
    assert!(matches!(
        err,
        PlaceFinderError::CatalogError(CatalogError::LoadFailed(_))
    ));
    assert!(!searcher.is_initialized());
}

#[test]
fn test_pagination_reassembles() {
    setup_test_env();

    let searcher = PlaceSearcher::new(InMemoryLoader::from_places(
        placefinder::data::create_test_places(&TestDataConfig::sample()),
    ));
    searcher.initialize().unwrap();

    let criteria = SearchCriteria::from_query("quận");
    let all = searcher.search_page(&criteria, 1, 1000).unwrap();
    assert_eq!(all.total_count, 25);

    for page_size in [1, 4, 10, 25, 30] {
        let mut pages = Vec::new();
        let mut page = 1;
        loop {
            let result = searcher.search_page(&criteria, page, page_size).unwrap();
            assert_eq!(result.total_pages, all.total_count.div_ceil(page_size));
            if result.places.is_empty() {
                break;
            }
            pages.extend(result.places);
            page += 1;
        }
        assert_eq!(pages, all.places, "page size {page_size}");
    }

    assert!(searcher.search_page(&criteria, 0, 10).is_err());
}

#[test]
fn test_concurrent_initialization_through_clones() {
    setup_test_env();

    let calls = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&calls);
    let catalog = Arc::new(PlaceCatalog::new(
        move || -> placefinder::data::Result<Vec<RawPlaceRecord>> {
            counter.fetch_add(1, Ordering::SeqCst);
            std::thread::sleep(std::time::Duration::from_millis(10));
            Ok(sample_places().into_iter().map(RawPlaceRecord::from).collect())
        },
    ));
    let searcher = PlaceSearcher::from_catalog(catalog, SearchConfigBuilder::new().build());

    let handles = (0..16)
        .map(|_| {
            let searcher = searcher.clone();
            std::thread::spawn(move || {
                searcher.initialize().unwrap();
                searcher.popular().unwrap().len()
            })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        assert_eq!(handle.join().unwrap(), 3);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[cfg(feature = "serde")]
#[test]
fn test_custom_lexicon_from_json() {
    setup_test_env();

    let lexicon = placefinder::Lexicon::from_json_str(
        r#"{
            "version": "test",
            "categories": ["SUSHI"],
            "districts": ["Quận 2"],
            "cities": [],
            "price_indicators": [],
            "high_rating_phrases": [],
            "vague_phrases": ["sao cũng được"],
            "stop_words": []
        }"#,
    )
    .expect("Lexicon JSON should parse");
    let config = SearchConfigBuilder::new().lexicon(lexicon).build();
    let searcher =
        PlaceSearcher::with_config(InMemoryLoader::from_places(sample_places()), config);
    searcher.initialize().unwrap();

    let criteria = searcher.parse_prompt("sushi quận 2");
    assert_eq!(criteria.categories, vec!["sushi"]);
    assert_eq!(criteria.areas, vec!["quận 2"]);
    assert_eq!(
        searcher.check_ambiguous("Sao cũng được"),
        Some(Clarification::NeedsPlaceType)
    );
    assert_eq!(searcher.info().unwrap().lexicon_version, "test");

    let json = serde_json::to_string(&searcher.search_prompt("nhật").unwrap()).unwrap();
    assert!(json.contains("\"total_count\":1"));
}
