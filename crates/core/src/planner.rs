use crate::models::{NormalizedDestination, QueryCues};

pub const BUDGET_GUIDE: &str = "For most trips, set flights at ~45%, stays 30%, food 15%, experiences 10%. Share the destination and month, and I will size a realistic daily range.";

pub const SEASON_GUIDE: &str = "Shoulder months are usually best (spring/fall). Drop the destination, and I will give the exact months plus packing hints.";

pub const ITINERARY_SKELETON: &str = "I can sketch day-by-day: Day 1 city core + food crawl, Day 2 icons + sunset viewpoint, Day 3 nature or museum + local dinner. Tell me the city and pacing (slow/balanced/fast).";

pub const CAPABILITIES: &str = "I can help with destinations, seasons, budgets, and 3-7 day plans. Ask about a place or give me dates and vibe (budget, adventure, remote work).";

const SEASON_QUALIFIER: &str = "(best weather + lighter crowds)";
const BUDGET_QUALIFIER: &str = "with mid-range stays and metros";
const GENERIC_HIGHLIGHTS: &str = "culture, food, and scenery";
const GENERIC_MUST_SEE: &str = "historic core";
const BALANCED_FLOW: &str = "balanced mornings + 1 anchor per half-day";
const CLASSIC_FLOW: &str = "city core day, icon day, nature/food day";
const FOLLOW_UP: &str = "- Next: want stays vs food picks? Ask and I will tailor.";

pub fn compose_destination_answer(
    destination: &NormalizedDestination,
    days: u64,
    cues: QueryCues,
) -> String {
    [
        header_line(destination, days),
        best_window_line(destination, cues.season),
        budget_line(destination, cues.budget),
        highlights_line(destination),
        day_flow_line(cues.risk),
        must_sees_line(destination),
        quality_line(destination),
        FOLLOW_UP.to_string(),
    ]
    .join("\n")
}

fn header_line(destination: &NormalizedDestination, days: u64) -> String {
    format!(
        "Here is a {}-day take for {} ({}):",
        days, destination.name, destination.region
    )
}

/// Without the season cue the line ends at the best time, no trailing space.
fn best_window_line(destination: &NormalizedDestination, season_cue: bool) -> String {
    if season_cue {
        format!("- Best window: {} {}", destination.best_time, SEASON_QUALIFIER)
    } else {
        format!("- Best window: {}", destination.best_time)
    }
}

fn budget_line(destination: &NormalizedDestination, budget_cue: bool) -> String {
    if budget_cue {
        format!("- Budget guide: {} {}", destination.avg_cost, BUDGET_QUALIFIER)
    } else {
        format!("- Budget guide: {}", destination.avg_cost)
    }
}

fn highlights_line(destination: &NormalizedDestination) -> String {
    let top = destination
        .highlights
        .iter()
        .take(3)
        .map(String::as_str)
        .collect::<Vec<_>>();

    if top.is_empty() {
        format!("- Highlights: {}", GENERIC_HIGHLIGHTS)
    } else {
        format!("- Highlights: {}", top.join(", "))
    }
}

fn day_flow_line(risk_cue: bool) -> String {
    let pace = if risk_cue { BALANCED_FLOW } else { CLASSIC_FLOW };
    format!("- Day flow: {}", pace)
}

fn must_sees_line(destination: &NormalizedDestination) -> String {
    let mut names = destination.attractions.iter().map(|a| a.name.as_str());
    let hero = names.next().unwrap_or(GENERIC_MUST_SEE);

    match names.next() {
        Some(second) => format!("- Must-sees: {} and {}", hero, second),
        None => format!("- Must-sees: {}", hero),
    }
}

fn quality_line(destination: &NormalizedDestination) -> String {
    format!(
        "- Quality check: ⭐ {} ({} reviews)",
        destination.rating, destination.reviews
    )
}
