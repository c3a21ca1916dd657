use once_cell::sync::Lazy;
use regex::Regex;

use crate::models::QueryCues;

pub const DEFAULT_DAYS: u64 = 3;

const BUDGET_WORDS: &[&str] = &["budget", "cost", "price"];
const SEASON_WORDS: &[&str] = &["season", "best time", "weather"];
const RISK_WORDS: &[&str] = &["family", "kids", "remote", "work", "budget", "luxury"];
const ITINERARY_WORDS: &[&str] = &["itinerary", "plan", "schedule"];

static DAY_COUNT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"([0-9]+)[- ]?day").expect("valid day-count regex"));

/// Expects already lowercased text.
pub fn detect_cues(lower: &str) -> QueryCues {
    QueryCues {
        budget: contains_any(lower, BUDGET_WORDS),
        season: contains_any(lower, SEASON_WORDS),
        risk: contains_any(lower, RISK_WORDS),
        itinerary: contains_any(lower, ITINERARY_WORDS),
    }
}

/// First `N day`, `N-day` or `Nday` in the text; 3 when absent. Only ASCII
/// digits count. A run too long for `u64` saturates.
pub fn extract_day_count(lower: &str) -> u64 {
    DAY_COUNT
        .captures(lower)
        .and_then(|captures| captures.get(1))
        .map(|digits| digits.as_str().parse::<u64>().unwrap_or(u64::MAX))
        .unwrap_or(DEFAULT_DAYS)
}

fn contains_any(input: &str, needles: &[&str]) -> bool {
    needles.iter().any(|needle| input.contains(needle))
}
