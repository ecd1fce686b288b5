use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::models::domain::SectionDefinition;

/// Sentinel content used when a section had to be synthesized because the
/// model never produced it. The presentation layer matches on this string
/// to offer a "regenerate" affordance.
pub const PLACEHOLDER_CONTENT: &str = "Analysis pending — retry requested";

/// Content for one section inside one variation.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionResult {
    pub section_id: String,
    pub content: String,
}

impl SectionResult {
    pub fn placeholder(section: &SectionDefinition) -> Self {
        SectionResult {
            section_id: section.id.clone(),
            content: PLACEHOLDER_CONTENT.to_string(),
        }
    }

    pub fn is_placeholder(&self) -> bool {
        self.content == PLACEHOLDER_CONTENT
    }
}

/// One complete, independent pass over all sections.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub theme: String,
    pub description: String,
    pub results: Vec<SectionResult>,
}

impl Variation {
    pub fn placeholder_count(&self) -> usize {
        self.results.iter().filter(|r| r.is_placeholder()).count()
    }
}

/// Final pipeline result handed back to the endpoint.
///
/// `degraded` is true exactly when at least one result is a synthesized
/// placeholder. `raw_fallback` carries the unsalvageable raw text so the
/// caller can still show the user something to copy.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationOutcome {
    pub variations: Vec<Variation>,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_fallback: Option<String>,
}

impl GenerationOutcome {
    pub fn placeholder_count(&self) -> usize {
        self.variations.iter().map(|v| v.placeholder_count()).sum()
    }
}
