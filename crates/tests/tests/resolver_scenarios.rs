use globalbot_catalog::CatalogStore;
use globalbot_core::planner::{BUDGET_GUIDE, CAPABILITIES};
use globalbot_core::{
    normalize_catalog, resolve, resolve_detailed, Attraction, DestinationRecord,
    NormalizedDestination, ResponseBranch,
};

fn japan_record() -> DestinationRecord {
    DestinationRecord {
        name: Some("Japan".to_string()),
        region: "Asia".to_string(),
        best_time: "Apr-May".to_string(),
        avg_cost: "₹2,50,000".to_string(),
        rating: 4.9,
        reviews: 2340,
        highlights: Some(vec![
            "Fushimi Inari".to_string(),
            "Mount Fuji".to_string(),
            "Bamboo Grove".to_string(),
        ]),
        attractions: Some(vec![
            Attraction::named("Fushimi Inari Shrine"),
            Attraction::named("Mount Fuji"),
        ]),
        ..DestinationRecord::default()
    }
}

fn catalog(records: &[DestinationRecord]) -> Vec<NormalizedDestination> {
    normalize_catalog(records).0
}

fn named(name: &str, region: &str) -> DestinationRecord {
    DestinationRecord {
        name: Some(name.to_string()),
        region: region.to_string(),
        ..DestinationRecord::default()
    }
}

#[test]
fn japan_food_picks_scenario() {
    let catalog = catalog(&[japan_record()]);
    let answer = resolve("3-day Japan with food picks", &catalog);

    assert!(answer.contains("3-day"));
    assert!(answer.contains("Japan (Asia)"));
    assert!(answer.contains("Fushimi Inari, Mount Fuji, Bamboo Grove"));
    assert!(answer.contains("Fushimi Inari Shrine and Mount Fuji"));
    assert!(answer.contains("⭐ 4.9 (2340"));
}

#[test]
fn empty_catalog_budget_question_gets_allocation_guide() {
    let answer = resolve("What's a good budget for a trip?", &[]);
    assert_eq!(answer, BUDGET_GUIDE);
    assert!(answer.contains("flights at ~45%, stays 30%, food 15%, experiences 10%"));
}

#[test]
fn empty_query_gets_capabilities() {
    let catalog = catalog(&[japan_record()]);
    assert_eq!(resolve("", &catalog), CAPABILITIES);
}

#[test]
fn resolution_is_deterministic() {
    let store = CatalogStore::bundled().unwrap();
    let snapshot = store.snapshot();

    for query in [
        "5-day Italy for a family",
        "best time for Greece?",
        "plan a weekend",
        "",
        "budget",
    ] {
        assert_eq!(
            resolve_detailed(query, &snapshot.destinations),
            resolve_detailed(query, &snapshot.destinations)
        );
    }
}

#[test]
fn header_references_the_matched_destination() {
    let catalog = catalog(&[named("Peru", "South America"), named("Jordan", "Middle East")]);
    let answer = resolve("thinking about JORDAN next spring", &catalog);
    assert!(answer.starts_with("Here is a 3-day take for Jordan (Middle East):"));
}

#[test]
fn explicit_day_count_is_used_in_header() {
    let catalog = catalog(&[japan_record()]);
    assert!(resolve("a 5-day japan loop", &catalog).starts_with("Here is a 5-day take"));
    assert!(resolve("japan for 7 days", &catalog).starts_with("Here is a 7-day take"));
    assert!(resolve("japan in a week", &catalog).starts_with("Here is a 3-day take"));
    assert!(resolve("5000000000-day japan", &catalog)
        .starts_with("Here is a 5000000000-day take for Japan (Asia):"));
}

#[test]
fn destination_match_beats_budget_cue() {
    let catalog = catalog(&[japan_record()]);
    let resolution = resolve_detailed("budget for Japan", &catalog);

    assert_eq!(resolution.branch, ResponseBranch::Destination);
    assert!(resolution.cues.budget);
    assert_ne!(resolution.text, BUDGET_GUIDE);
    assert!(resolution
        .text
        .contains("- Day flow: balanced mornings + 1 anchor per half-day"));
}

#[test]
fn empty_catalog_never_answers_with_a_destination() {
    for query in [
        "3-day Japan with food picks",
        "best time for Iceland",
        "itinerary for Peru",
        "anything at all",
    ] {
        assert_ne!(resolve_detailed(query, &[]).branch, ResponseBranch::Destination);
    }
}

#[test]
fn duplicate_names_resolve_to_first_entry() {
    let catalog = catalog(&[named("Spain", "Europe"), named("Spain", "Elsewhere")]);
    let answer = resolve("spain please", &catalog);
    assert!(answer.contains("Spain (Europe)"));
}

#[test]
fn bundled_catalog_answers_each_seed_destination() {
    let store = CatalogStore::bundled().unwrap();
    let snapshot = store.snapshot();

    for destination in &snapshot.destinations {
        let query = format!("Tell me about {}", destination.name);
        let resolution = resolve_detailed(&query, &snapshot.destinations);
        assert_eq!(resolution.branch, ResponseBranch::Destination);
        assert_eq!(resolution.destination.as_deref(), Some(destination.name.as_str()));
    }
}
