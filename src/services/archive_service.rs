use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::time::Duration;
use uuid::Uuid;

use crate::{
    errors::{AppError, AppResult},
    models::domain::GenerationOutcome,
};

/// Record handed to the external persistence collaborator. The service
/// never reads these back; retrieval is entirely the collaborator's side.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OutcomeRecord {
    pub id: String,
    pub topic: String,
    pub generated_at: DateTime<Utc>,
    pub outcome: GenerationOutcome,
}

impl OutcomeRecord {
    pub fn new(topic: &str, outcome: GenerationOutcome) -> Self {
        OutcomeRecord {
            id: Uuid::new_v4().to_string(),
            topic: topic.to_string(),
            generated_at: Utc::now(),
            outcome,
        }
    }
}

/// Interface to the persistence collaborator. Callers fire-and-forget;
/// the HTTP response to the user never waits on this.
#[async_trait]
pub trait OutcomeArchive: Send + Sync {
    async fn store(&self, record: OutcomeRecord) -> AppResult<()>;
}

/// POSTs each record to a configured collaborator URL.
pub struct HttpOutcomeArchive {
    http: reqwest::Client,
    url: String,
}

impl HttpOutcomeArchive {
    pub fn new(url: String) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Unexpected(format!("failed to build archive client: {}", e)))?;

        Ok(Self { http, url })
    }
}

#[async_trait]
impl OutcomeArchive for HttpOutcomeArchive {
    async fn store(&self, record: OutcomeRecord) -> AppResult<()> {
        let response = self
            .http
            .post(&self.url)
            .json(&record)
            .send()
            .await
            .map_err(|e| AppError::Unexpected(format!("archive POST failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Unexpected(format!(
                "archive collaborator answered {}",
                response.status()
            )));
        }

        log::debug!("archived outcome {} for topic '{}'", record.id, record.topic);
        Ok(())
    }
}

/// Used when no archive URL is configured.
pub struct NoopOutcomeArchive;

#[async_trait]
impl OutcomeArchive for NoopOutcomeArchive {
    async fn store(&self, record: OutcomeRecord) -> AppResult<()> {
        log::debug!(
            "no archive configured, dropping outcome {} for topic '{}'",
            record.id,
            record.topic
        );
        Ok(())
    }
}
