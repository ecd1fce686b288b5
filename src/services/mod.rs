pub mod archive_service;
pub mod gateway_client;
pub mod normalizer;
pub mod orchestrator;
pub mod prompt_builder;
pub mod reconciler;
