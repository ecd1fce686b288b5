use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One named sub-topic every generated variation must address exactly once.
///
/// Definitions are static configuration (see `constants::sections`) or
/// caller-supplied overrides; identity is `id` and ids must be unique
/// within one schema.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize, JsonSchema)]
#[serde(rename_all = "camelCase")]
pub struct SectionDefinition {
    pub id: String,
    pub label: String,
    pub core_question: String,
}

impl SectionDefinition {
    pub fn new(id: &str, label: &str, core_question: &str) -> Self {
        SectionDefinition {
            id: id.to_string(),
            label: label.to_string(),
            core_question: core_question.to_string(),
        }
    }
}
