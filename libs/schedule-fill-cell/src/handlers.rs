use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use serde_json::{json, Value};

use shared_config::AppConfig;
use shared_gateway::PracticeClient;
use shared_models::error::AppError;

use crate::models::{
    EditOutreachRequest, FetchCandidatesParams, OpenOutreachRequest, OutreachTargetRequest,
    PreviewRequest,
};
use crate::services::candidates::{CandidateBoard, CandidateService};
use crate::services::enrich::enrich_candidate;
use crate::services::outreach::OutreachService;
use crate::services::preview::PreviewService;

/// Shared state for the gap-fill screen: stateless upstream services plus
/// the screen's mutable session state (result board, outreach machine).
pub struct ScheduleFillState {
    pub config: Arc<AppConfig>,
    pub candidates: CandidateService,
    pub board: CandidateBoard,
    pub outreach: OutreachService,
    pub preview: PreviewService,
}

impl ScheduleFillState {
    pub fn new(config: Arc<AppConfig>) -> Self {
        let gateway = Arc::new(PracticeClient::new(&config));
        Self {
            candidates: CandidateService::new(Arc::clone(&gateway)),
            board: CandidateBoard::new(),
            outreach: OutreachService::new(Arc::clone(&gateway), config.deployment_mode),
            preview: PreviewService::new(gateway),
            config,
        }
    }
}

#[axum::debug_handler]
pub async fn fetch_candidates(
    State(state): State<Arc<ScheduleFillState>>,
    Json(params): Json<FetchCandidatesParams>,
) -> Result<Json<Value>, AppError> {
    let ticket = state.board.begin_fetch().await;

    let response = state
        .candidates
        .fetch_candidates(
            params.provider_id,
            params.target_date,
            params.ignore_reserve_blocks,
        )
        .await?;

    let views: Vec<_> = response
        .candidates
        .into_iter()
        .map(enrich_candidate)
        .collect();

    state
        .board
        .apply(ticket, views.clone(), response.stats.clone())
        .await;

    Ok(Json(json!({
        "candidates": views,
        "stats": response.stats,
        "message": response.message,
    })))
}

#[axum::debug_handler]
pub async fn open_outreach(
    State(state): State<Arc<ScheduleFillState>>,
    Json(request): Json<OpenOutreachRequest>,
) -> Result<Json<Value>, AppError> {
    let message = state
        .outreach
        .open(&request.candidate, request.override_non_prod)
        .await?;

    Ok(Json(json!({
        "client_id": request.candidate.client_id,
        "message": message,
    })))
}

#[axum::debug_handler]
pub async fn edit_outreach(
    State(state): State<Arc<ScheduleFillState>>,
    Json(request): Json<EditOutreachRequest>,
) -> Result<Json<Value>, AppError> {
    state.outreach.edit(&request.client_id, request.message).await?;
    Ok(Json(json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn confirm_outreach(
    State(state): State<Arc<ScheduleFillState>>,
    Json(request): Json<OutreachTargetRequest>,
) -> Result<Json<Value>, AppError> {
    let status = state.outreach.confirm(&request.client_id).await?;
    Ok(Json(json!({ "status": status })))
}

#[axum::debug_handler]
pub async fn cancel_outreach(
    State(state): State<Arc<ScheduleFillState>>,
    Json(request): Json<OutreachTargetRequest>,
) -> Result<Json<Value>, AppError> {
    state.outreach.cancel(&request.client_id).await?;
    Ok(Json(json!({ "ok": true })))
}

#[axum::debug_handler]
pub async fn outreach_status(
    State(state): State<Arc<ScheduleFillState>>,
    Path(client_id): Path<String>,
) -> Result<Json<Value>, AppError> {
    let status = state.outreach.status(&client_id).await;
    Ok(Json(json!({ "status": status })))
}

#[axum::debug_handler]
pub async fn resolve_preview(
    State(state): State<Arc<ScheduleFillState>>,
    Json(request): Json<PreviewRequest>,
) -> Result<Json<Value>, AppError> {
    let preview = state.preview.resolve_preview(&request.candidate).await?;
    Ok(Json(json!(preview)))
}

#[axum::debug_handler]
pub async fn leave_screen(
    State(state): State<Arc<ScheduleFillState>>,
) -> Result<Json<Value>, AppError> {
    state.board.invalidate().await;
    Ok(Json(json!({ "ok": true })))
}
