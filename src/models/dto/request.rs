use serde::Deserialize;
use std::collections::HashSet;
use validator::Validate;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{
        Difficulty, DocumentFlavor, GenerationMode, GenerationRequest, SectionDefinition,
        SectionResult,
    },
};

/// Body of `POST /api/studies/generate` and `POST /api/rooms/generate`.
///
/// `sections` overrides the endpoint's static schema when present. An
/// explicitly empty list is rejected rather than silently falling back.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateRequest {
    #[validate(length(min = 1, max = 500))]
    pub topic: String,

    #[serde(default)]
    pub mode: GenerationMode,

    pub sections: Option<Vec<SectionDefinition>>,

    pub difficulty: Option<Difficulty>,

    #[serde(default)]
    pub prior_context: Vec<SectionResult>,
}

impl GenerateRequest {
    /// Validate the body and resolve the effective section schema,
    /// producing the pipeline's input.
    pub fn resolve(
        self,
        flavor: DocumentFlavor,
        default_sections: &[SectionDefinition],
    ) -> AppResult<GenerationRequest> {
        self.validate()?;

        if self.topic.trim().is_empty() {
            return Err(AppError::InvalidRequest("topic must not be blank".into()));
        }

        let sections = match self.sections {
            None => default_sections.to_vec(),
            Some(list) => {
                if list.is_empty() {
                    return Err(AppError::InvalidRequest(
                        "sections must not be empty".into(),
                    ));
                }
                list
            }
        };

        let mut seen = HashSet::new();
        for section in &sections {
            if section.id.trim().is_empty() {
                return Err(AppError::InvalidSchema("section id must not be blank".into()));
            }
            if !seen.insert(section.id.as_str()) {
                return Err(AppError::InvalidSchema(format!(
                    "duplicate section id '{}'",
                    section.id
                )));
            }
        }

        Ok(GenerationRequest {
            flavor,
            topic: self.topic,
            mode: self.mode,
            sections,
            difficulty: self.difficulty,
            prior_context: self.prior_context,
        })
    }
}
