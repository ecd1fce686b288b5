use std::sync::Arc;

use actix_web::{get, post, web, HttpResponse};

use crate::{
    app_state::AppState,
    constants::sections::{ROOM_SECTIONS, STUDY_SECTIONS},
    errors::AppError,
    models::{
        domain::{DocumentFlavor, SectionDefinition},
        dto::{request::GenerateRequest, response::GenerateResponse},
    },
    services::archive_service::OutcomeRecord,
};

#[post("/api/studies/generate")]
async fn generate_study(
    state: web::Data<AppState>,
    request: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    run_generation(&state, request.into_inner(), DocumentFlavor::Study, &STUDY_SECTIONS).await
}

#[post("/api/rooms/generate")]
async fn generate_rooms(
    state: web::Data<AppState>,
    request: web::Json<GenerateRequest>,
) -> Result<HttpResponse, AppError> {
    run_generation(&state, request.into_inner(), DocumentFlavor::Rooms, &ROOM_SECTIONS).await
}

async fn run_generation(
    state: &AppState,
    body: GenerateRequest,
    flavor: DocumentFlavor,
    default_sections: &[SectionDefinition],
) -> Result<HttpResponse, AppError> {
    let request = body.resolve(flavor, default_sections)?;
    let outcome = state.pipeline.run(&request).await?;

    // Fire-and-forget: the response never waits on the collaborator.
    let archive = Arc::clone(&state.archive);
    let record = OutcomeRecord::new(&request.topic, outcome.clone());
    tokio::spawn(async move {
        if let Err(err) = archive.store(record).await {
            log::warn!("failed to archive outcome: {}", err);
        }
    });

    Ok(HttpResponse::Ok().json(GenerateResponse::from(outcome)))
}

#[get("/health")]
async fn health_check() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "version": env!("CARGO_PKG_VERSION")
    }))
}
