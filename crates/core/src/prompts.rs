use crate::models::NormalizedDestination;

pub const GREETING: &str =
    "Hi, I am Globalbot · AI Assistant. Ask about any place, budget, best season, or a 3-7 day plan.";

const FALLBACK_NAMES: [&str; 3] = ["Japan", "Iceland", "Bali"];

/// Suggestion chips shown under the chat input.
pub fn quick_prompts(catalog: &[NormalizedDestination]) -> Vec<String> {
    let name = |slot: usize| {
        catalog
            .get(slot)
            .map(|destination| destination.name.as_str())
            .unwrap_or(FALLBACK_NAMES[slot])
    };

    vec![
        format!("3-day {} with food picks", name(0)),
        format!("Best time to visit {}", name(1)),
        format!("Budget for {} in summer", name(2)),
        "Weekend plan: top 5 must-dos".to_string(),
    ]
}
