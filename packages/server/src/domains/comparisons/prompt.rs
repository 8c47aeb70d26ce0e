//! Prompt construction for the comparison completion.
//!
//! The system prompt pins the exact output schema and forbids markdown or
//! commentary; the user prompt embeds the two items plus the criteria and
//! tone instructions. Tone and mode are fixed mappings - anything outside
//! the known values falls back to the professional / concise variants.

/// Composed system + user prompt pair.
#[derive(Debug, Clone, PartialEq)]
pub struct ComparisonPrompt {
    pub system: String,
    pub user: String,
}

const SCHEMA_BLOCK: &str = r#"{
  "summary": string,
  "aspects": [{ "name": string, "itemA": string, "itemB": string }],
  "prosA": [string],
  "consA": [string],
  "prosB": [string],
  "consB": [string],
  "verdict": string,
  "funTitle": string
}"#;

const CONCISE_INSTRUCTION: &str =
    "Be concise: 3-4 aspects and 3-5 bullets per pros/cons list.";

const EXPERT_INSTRUCTION: &str = "Be thorough: cover more aspects and more \
pros/cons bullets with richer detail, still under the exact same schema.";

fn tone_instruction(tone: Option<&str>) -> &'static str {
    match tone {
        Some("chaotic") => {
            "Use a playful, slightly unhinged, comedic tone with witty jabs, \
             but stay respectful and not offensive."
        }
        Some("balanced") => "Use a friendly, conversational tone with a bit of light humour.",
        // "serious" and anything unrecognized get the professional register
        _ => "Use a clear, professional tone with minimal humour.",
    }
}

fn criteria_instruction(criteria: Option<&str>) -> String {
    match criteria {
        Some(criteria) => format!(
            "The user cares about: {}. Focus the comparison on those aspects.",
            criteria
        ),
        None => "Choose the most relevant aspects to compare based on common sense.".to_string(),
    }
}

fn depth_instruction(mode: Option<&str>) -> &'static str {
    match mode {
        Some("expert") => EXPERT_INSTRUCTION,
        _ => CONCISE_INSTRUCTION,
    }
}

/// Build the prompt pair for one comparison request.
pub fn build_prompt(
    item_a: &str,
    item_b: &str,
    criteria: Option<&str>,
    tone: Option<&str>,
    mode: Option<&str>,
) -> ComparisonPrompt {
    let system = format!(
        "You are CompareAnything, an AI that compares any two things.\n\
         \n\
         You must respond as strict JSON matching this shape:\n\
         \n\
         {}\n\
         \n\
         Rules:\n\
         - Do NOT include backticks or markdown.\n\
         - Do NOT add commentary before or after the JSON.\n\
         - Make sure the JSON is valid and parseable.\n\
         - {}",
        SCHEMA_BLOCK,
        depth_instruction(mode),
    );

    let user = format!(
        "Compare the following two items.\n\
         \n\
         Item A:\n\
         {}\n\
         \n\
         Item B:\n\
         {}\n\
         \n\
         {}\n\
         \n\
         {}",
        item_a,
        item_b,
        criteria_instruction(criteria),
        tone_instruction(tone),
    );

    ComparisonPrompt { system, user }
}
