use serde_json::Value;

use crate::models::domain::{GenerationOutcome, SectionDefinition, SectionResult, Variation};

/// Variation content as the model actually supplied it, before any
/// invariant is enforced. Extracted by value-walking so one malformed
/// entry never poisons its siblings.
#[derive(Debug, Default)]
struct SuppliedVariation {
    theme: Option<String>,
    description: Option<String>,
    results: Vec<SectionResult>,
}

fn supplied_variations(value: &Value) -> Vec<SuppliedVariation> {
    match value.get("variations").and_then(Value::as_array) {
        Some(list) if !list.is_empty() => list.iter().map(supplied_variation).collect(),
        // Legacy single-object shape: the document itself is the one
        // variation. Accepted rather than rejected.
        _ => vec![supplied_variation(value)],
    }
}

fn supplied_variation(value: &Value) -> SuppliedVariation {
    let results = value
        .get("results")
        .or_else(|| value.get("sections"))
        .and_then(Value::as_array)
        .map(|list| list.iter().filter_map(supplied_result).collect())
        .unwrap_or_default();

    SuppliedVariation {
        theme: non_empty_str(value.get("theme")),
        description: non_empty_str(value.get("description")),
        results,
    }
}

fn supplied_result(value: &Value) -> Option<SectionResult> {
    let section_id = value
        .get("sectionId")
        .or_else(|| value.get("section_id"))
        .or_else(|| value.get("id"))?
        .as_str()?
        .to_string();

    let content = value
        .get("content")
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string();

    Some(SectionResult { section_id, content })
}

fn non_empty_str(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

/// Pure placeholder synthesis: align whatever the model produced with
/// the section schema, one result per section in schema order. A
/// duplicate `sectionId` inside one variation resolves to the last entry
/// supplied. Returns the completed list and how many entries had to be
/// synthesized.
pub fn complete_sections(
    sections: &[SectionDefinition],
    partial: &[SectionResult],
) -> (Vec<SectionResult>, usize) {
    let mut synthesized = 0;

    let results = sections
        .iter()
        .map(|section| {
            let found = partial
                .iter()
                .rev()
                .find(|r| r.section_id == section.id)
                .filter(|r| !r.content.trim().is_empty());

            match found {
                Some(result) => result.clone(),
                None => {
                    synthesized += 1;
                    SectionResult::placeholder(section)
                }
            }
        })
        .collect();

    (results, synthesized)
}

/// Enforce the pipeline's one hard guarantee: exactly `expected`
/// variations, each with exactly one result per section. Missing
/// variations and sections become placeholders; `raw` survives as the
/// fallback only when parsing failed entirely.
pub fn reconcile(
    parsed: Option<&Value>,
    sections: &[SectionDefinition],
    expected: usize,
    raw: Option<&str>,
) -> GenerationOutcome {
    let supplied = parsed.map(supplied_variations).unwrap_or_default();

    if supplied.len() > expected {
        log::debug!(
            "model supplied {} variations where {} were expected, dropping the extras",
            supplied.len(),
            expected
        );
    }

    let mut total_synthesized = 0;
    let mut variations = Vec::with_capacity(expected);

    for slot in 0..expected {
        let this = supplied.get(slot);
        let partial: &[SectionResult] = this.map(|v| v.results.as_slice()).unwrap_or(&[]);

        let (results, synthesized) = complete_sections(sections, partial);
        total_synthesized += synthesized;

        variations.push(Variation {
            theme: this
                .and_then(|v| v.theme.clone())
                .unwrap_or_else(|| format!("Variation {}", slot + 1)),
            description: this.and_then(|v| v.description.clone()).unwrap_or_default(),
            results,
        });
    }

    GenerationOutcome {
        variations,
        degraded: total_synthesized > 0,
        raw_fallback: match parsed {
            None => raw.map(str::to_string),
            Some(_) => None,
        },
    }
}
