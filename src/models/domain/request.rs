use serde::{Deserialize, Serialize};

use crate::models::domain::{SectionDefinition, SectionResult};

/// Which of the two sibling endpoints a request came through. The
/// pipeline is identical for both; only the default schema and the
/// system preamble differ.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DocumentFlavor {
    Study,
    Rooms,
}

/// Whether a request asks for one pass over the sections or three
/// independently framed passes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub enum GenerationMode {
    #[default]
    #[serde(rename = "single")]
    Single,
    #[serde(rename = "auto-multi")]
    AutoMulti,
}

impl GenerationMode {
    pub fn expected_variations(&self) -> usize {
        match self {
            GenerationMode::Single => 1,
            GenerationMode::AutoMulti => 3,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Pro,
}

impl Difficulty {
    /// Register instruction woven into the prompt.
    pub fn register(&self) -> &'static str {
        match self {
            Difficulty::Beginner => {
                "Write for a newcomer: plain language, no untranslated technical terms."
            }
            Difficulty::Intermediate => {
                "Write for a regular student: assume familiarity with the basic vocabulary."
            }
            Difficulty::Pro => {
                "Write for a teacher preparing material: cite primary references and engage counterarguments."
            }
        }
    }
}

/// Fully resolved input to the generation pipeline. Created fresh per
/// HTTP call and never persisted by this service.
#[derive(Clone, Debug)]
pub struct GenerationRequest {
    pub flavor: DocumentFlavor,
    pub topic: String,
    pub mode: GenerationMode,
    pub sections: Vec<SectionDefinition>,
    pub difficulty: Option<Difficulty>,
    pub prior_context: Vec<SectionResult>,
}
