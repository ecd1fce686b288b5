use serde::Serialize;

use crate::models::domain::{GenerationOutcome, Variation};

/// 200 body for the generate endpoints.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateResponse {
    pub variations: Vec<Variation>,
    pub degraded: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub raw_fallback: Option<String>,
}

impl From<GenerationOutcome> for GenerateResponse {
    fn from(outcome: GenerationOutcome) -> Self {
        GenerateResponse {
            variations: outcome.variations,
            degraded: outcome.degraded,
            raw_fallback: outcome.raw_fallback,
        }
    }
}
