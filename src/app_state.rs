use std::sync::Arc;

use crate::{
    config::Config,
    errors::{AppError, AppResult},
    services::{
        archive_service::{HttpOutcomeArchive, NoopOutcomeArchive, OutcomeArchive},
        gateway_client::{CompletionBackend, HttpGatewayClient},
        orchestrator::GenerationPipeline,
    },
};

#[derive(Clone)]
pub struct AppState {
    pub pipeline: Arc<GenerationPipeline>,
    pub archive: Arc<dyn OutcomeArchive>,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let backend = HttpGatewayClient::from_config(&config)
            .map_err(|e| AppError::Unexpected(format!("failed to build gateway client: {}", e)))?;

        let archive: Arc<dyn OutcomeArchive> = match &config.archive_url {
            Some(url) => Arc::new(HttpOutcomeArchive::new(url.clone())?),
            None => Arc::new(NoopOutcomeArchive),
        };

        Ok(Self::with_parts(config, Arc::new(backend), archive))
    }

    /// Assemble state from explicit collaborators. Production wiring goes
    /// through `new`; tests inject stub backends here.
    pub fn with_parts(
        config: Config,
        backend: Arc<dyn CompletionBackend>,
        archive: Arc<dyn OutcomeArchive>,
    ) -> Self {
        Self {
            pipeline: Arc::new(GenerationPipeline::new(backend)),
            archive,
            config: Arc::new(config),
        }
    }
}
