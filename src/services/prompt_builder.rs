use crate::{
    constants::prompts::{ROOM_SYSTEM_PROMPT, STUDY_SYSTEM_PROMPT, VARIATION_LENSES},
    errors::{AppError, AppResult},
    models::domain::{DocumentFlavor, GenerationMode, GenerationRequest},
};

/// Per-section length ceiling instructed in compact mode. Compact prompts
/// exist to reduce truncation risk after a failed first attempt.
const COMPACT_WORD_CAP: usize = 50;

/// Prior-context excerpts are clipped so a long earlier document cannot
/// blow up the second request's token budget.
const PRIOR_CONTEXT_EXCERPT_CHARS: usize = 280;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PromptText {
    pub system: String,
    pub user: String,
}

fn preamble_for(flavor: DocumentFlavor) -> &'static str {
    match flavor {
        DocumentFlavor::Study => STUDY_SYSTEM_PROMPT,
        DocumentFlavor::Rooms => ROOM_SYSTEM_PROMPT,
    }
}

/// Build the prompt for one generation attempt.
///
/// The compact variant keeps the same enumerated section list but caps
/// per-section length and drops the elaboration instructions; it is only
/// ever used as the second attempt.
pub fn build(request: &GenerationRequest, compact: bool) -> AppResult<PromptText> {
    if request.sections.is_empty() {
        return Err(AppError::InvalidSchema(
            "cannot build a prompt for an empty section schema".into(),
        ));
    }

    let mut user = String::new();

    user.push_str(&format!("Topic: {}\n\n", request.topic.trim()));

    if let Some(difficulty) = request.difficulty {
        user.push_str(difficulty.register());
        user.push_str("\n\n");
    }

    user.push_str("Sections to cover, in order:\n");
    for section in &request.sections {
        user.push_str(&format!(
            "- {} ({}): {}\n",
            section.id, section.label, section.core_question
        ));
    }
    user.push('\n');

    match request.mode {
        GenerationMode::Single => {
            user.push_str("Produce exactly 1 variation covering every section above.\n");
        }
        GenerationMode::AutoMulti => {
            user.push_str(
                "Produce exactly 3 variations. Each variation must cover every section above \
                 and must take a clearly distinct angle so the three are not near-duplicates:\n",
            );
            for (index, lens) in VARIATION_LENSES.iter().enumerate() {
                user.push_str(&format!(
                    "- Variation {}: primary lens '{}'\n",
                    index + 1,
                    lens
                ));
            }
        }
    }
    user.push('\n');

    if !request.prior_context.is_empty() {
        user.push_str(
            "Earlier material already exists for this topic. Build on it without repeating it:\n",
        );
        for prior in &request.prior_context {
            user.push_str(&format!(
                "- {}: {}\n",
                prior.section_id,
                excerpt(&prior.content, PRIOR_CONTEXT_EXCERPT_CHARS)
            ));
        }
        user.push('\n');
    }

    if compact {
        user.push_str(&format!(
            "Keep every section under {} words. Answer each core question directly and stop; \
             no elaboration.\n",
            COMPACT_WORD_CAP
        ));
    } else {
        user.push_str(
            "Answer each section's core question directly, then elaborate with supporting \
             references and one concrete illustration per section.\n",
        );
    }

    user.push_str("Respond with the JSON structure described in your instructions, and nothing else.");

    Ok(PromptText {
        system: preamble_for(request.flavor).to_string(),
        user,
    })
}

fn excerpt(content: &str, max_chars: usize) -> String {
    if content.chars().count() <= max_chars {
        return content.to_string();
    }
    let clipped: String = content.chars().take(max_chars).collect();
    format!("{}…", clipped)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::domain::{Difficulty, SectionDefinition, SectionResult};

    fn request(mode: GenerationMode) -> GenerationRequest {
        GenerationRequest {
            flavor: DocumentFlavor::Study,
            topic: "the parable of the sower".to_string(),
            mode,
            sections: vec![
                SectionDefinition::new("sr", "Scripture", "What does the passage say?"),
                SectionDefinition::new("ir", "Interpretation", "What did it mean then?"),
            ],
            difficulty: None,
            prior_context: vec![],
        }
    }

    #[test]
    fn test_empty_schema_fails_fast() {
        let mut req = request(GenerationMode::Single);
        req.sections.clear();

        let err = build(&req, false).unwrap_err();
        assert!(matches!(err, AppError::InvalidSchema(_)));
    }

    #[test]
    fn test_full_prompt_lists_every_core_question() {
        let prompt = build(&request(GenerationMode::Single), false).unwrap();

        assert!(prompt.user.contains("What does the passage say?"));
        assert!(prompt.user.contains("What did it mean then?"));
        assert!(prompt.user.contains("exactly 1 variation"));
    }

    #[test]
    fn test_multi_mode_rotates_a_lens_per_variation() {
        let prompt = build(&request(GenerationMode::AutoMulti), false).unwrap();

        assert!(prompt.user.contains("exactly 3 variations"));
        for lens in VARIATION_LENSES {
            assert!(prompt.user.contains(lens), "missing lens '{}'", lens);
        }
    }

    #[test]
    fn test_compact_prompt_caps_length_and_drops_elaboration() {
        let full = build(&request(GenerationMode::Single), false).unwrap();
        let compact = build(&request(GenerationMode::Single), true).unwrap();

        assert!(compact.user.contains("under 50 words"));
        assert!(!compact.user.contains("concrete illustration"));
        assert!(full.user.contains("concrete illustration"));

        // Same enumerated schema in both variants
        assert!(compact.user.contains("- sr (Scripture)"));
        assert!(compact.user.contains("- ir (Interpretation)"));
    }

    #[test]
    fn test_difficulty_register_is_included() {
        let mut req = request(GenerationMode::Single);
        req.difficulty = Some(Difficulty::Beginner);

        let prompt = build(&req, false).unwrap();
        assert!(prompt.user.contains("newcomer"));
    }

    #[test]
    fn test_prior_context_is_woven_in_and_clipped() {
        let mut req = request(GenerationMode::Single);
        req.prior_context = vec![SectionResult {
            section_id: "sr".into(),
            content: "x".repeat(600),
        }];

        let prompt = build(&req, false).unwrap();
        assert!(prompt.user.contains("Build on it"));
        assert!(prompt.user.contains('…'));
        assert!(!prompt.user.contains(&"x".repeat(300)));
    }

    #[test]
    fn test_rooms_flavor_uses_the_room_preamble() {
        let mut req = request(GenerationMode::Single);
        req.flavor = DocumentFlavor::Rooms;

        let prompt = build(&req, false).unwrap();
        assert!(prompt.system.contains("narrative designer"));
    }
}
