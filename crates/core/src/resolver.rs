use crate::intent::{detect_cues, extract_day_count, DEFAULT_DAYS};
use crate::models::{NormalizedDestination, QueryCues, Resolution, ResponseBranch};
use crate::planner::{
    compose_destination_answer, BUDGET_GUIDE, CAPABILITIES, ITINERARY_SKELETON, SEASON_GUIDE,
};

pub fn resolve(query: &str, catalog: &[NormalizedDestination]) -> String {
    resolve_detailed(query, catalog).text
}

pub fn resolve_detailed(query: &str, catalog: &[NormalizedDestination]) -> Resolution {
    if query.trim().is_empty() {
        return Resolution {
            text: CAPABILITIES.to_string(),
            branch: ResponseBranch::Fallback,
            days: DEFAULT_DAYS,
            destination: None,
            cues: QueryCues::default(),
        };
    }

    let lower = query.to_lowercase();
    let destination = find_destination(&lower, catalog);
    let days = extract_day_count(&lower);
    let cues = detect_cues(&lower);

    let branch = select_branch(destination.is_some(), cues);
    let text = match (branch, destination) {
        (ResponseBranch::Destination, Some(destination)) => {
            compose_destination_answer(destination, days, cues)
        }
        (ResponseBranch::BudgetGuide, _) => BUDGET_GUIDE.to_string(),
        (ResponseBranch::SeasonGuide, _) => SEASON_GUIDE.to_string(),
        (ResponseBranch::ItinerarySkeleton, _) => ITINERARY_SKELETON.to_string(),
        _ => CAPABILITIES.to_string(),
    };

    Resolution {
        text,
        branch,
        days,
        destination: destination.map(|d| d.name.clone()),
        cues,
    }
}

/// First entry, in catalog order, whose key occurs anywhere in the text.
pub fn find_destination<'a>(
    lower: &str,
    catalog: &'a [NormalizedDestination],
) -> Option<&'a NormalizedDestination> {
    catalog
        .iter()
        .find(|destination| lower.contains(destination.key.as_str()))
}

fn select_branch(has_destination: bool, cues: QueryCues) -> ResponseBranch {
    if has_destination {
        ResponseBranch::Destination
    } else if cues.budget {
        ResponseBranch::BudgetGuide
    } else if cues.season {
        ResponseBranch::SeasonGuide
    } else if cues.itinerary {
        ResponseBranch::ItinerarySkeleton
    } else {
        ResponseBranch::Fallback
    }
}
