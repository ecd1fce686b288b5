use std::sync::Arc;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::{GenerationOutcome, GenerationRequest},
    services::{
        gateway_client::{variations_tool, CompletionBackend, GatewayError},
        normalizer::{self, Normalized},
        prompt_builder, reconciler,
    },
};

/// The two attempts the pipeline will ever make for one request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Attempt {
    Full,
    Compact,
}

impl Attempt {
    const ORDER: [Attempt; 2] = [Attempt::Full, Attempt::Compact];

    fn is_compact(self) -> bool {
        matches!(self, Attempt::Compact)
    }
}

/// Ties the prompt builder, gateway client, normalizer, and reconciler
/// into the full-then-compact control loop. Stateless between requests.
pub struct GenerationPipeline {
    backend: Arc<dyn CompletionBackend>,
}

impl GenerationPipeline {
    pub fn new(backend: Arc<dyn CompletionBackend>) -> Self {
        Self { backend }
    }

    /// Run one request to completion. The gateway is called at most
    /// twice; a clean first attempt returns immediately. Rate-limit and
    /// quota denials abort outright, everything else degrades.
    pub async fn run(&self, request: &GenerationRequest) -> AppResult<GenerationOutcome> {
        let correlation = Uuid::new_v4().to_string();
        let expected = request.mode.expected_variations();
        let tool = variations_tool();

        let mut best: Option<GenerationOutcome> = None;
        let mut last_gateway_failure: Option<String> = None;

        for attempt in Attempt::ORDER {
            let prompt = prompt_builder::build(request, attempt.is_compact())?;

            let reply = match self.backend.complete(prompt, Some(tool.clone())).await {
                Ok(reply) => reply,
                Err(GatewayError::RateLimited) => return Err(AppError::UpstreamRateLimited),
                Err(GatewayError::QuotaExhausted) => return Err(AppError::UpstreamQuotaExhausted),
                Err(err) => {
                    log::warn!("[{}] {:?} attempt failed at the gateway: {}", correlation, attempt, err);
                    last_gateway_failure = Some(err.to_string());
                    continue;
                }
            };

            let raw = reply.text.clone().or_else(|| reply.tool_args.clone());
            let normalized = normalizer::normalize(&reply);
            if matches!(normalized, Normalized::Salvaged(_)) {
                log::info!("[{}] {:?} attempt was truncated; salvaged a JSON prefix", correlation, attempt);
            }

            let outcome =
                reconciler::reconcile(normalized.value(), &request.sections, expected, raw.as_deref());

            log::info!(
                "[{}] {:?} attempt produced {} placeholder section(s)",
                correlation,
                attempt,
                outcome.placeholder_count()
            );

            if outcome.placeholder_count() == 0 {
                return Ok(outcome);
            }

            best = Some(merge_attempts(best.take(), outcome));
        }

        best.ok_or_else(|| {
            AppError::Unexpected(format!(
                "both generation attempts failed before yielding a reply: {}",
                last_gateway_failure.unwrap_or_else(|| "no gateway failure recorded".to_string())
            ))
        })
    }
}

/// Keep the outcome with fewer placeholders; on a tie the earlier (full,
/// richer) attempt wins. When both attempts were total parse failures the
/// retained raw fallback is the later attempt's, since that is the text
/// the user would want to retry from.
fn merge_attempts(
    previous: Option<GenerationOutcome>,
    current: GenerationOutcome,
) -> GenerationOutcome {
    match previous {
        None => current,
        Some(prev) => {
            if current.placeholder_count() < prev.placeholder_count() {
                current
            } else {
                let mut kept = prev;
                if kept.raw_fallback.is_some() && current.raw_fallback.is_some() {
                    kept.raw_fallback = current.raw_fallback;
                }
                kept
            }
        }
    }
}
