use std::sync::Arc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::handlers::{self, ScheduleFillState};

pub fn schedule_fill_routes(state: Arc<ScheduleFillState>) -> Router {
    Router::new()
        .route("/candidates", post(handlers::fetch_candidates))
        .route("/outreach/open", post(handlers::open_outreach))
        .route("/outreach/edit", post(handlers::edit_outreach))
        .route("/outreach/confirm", post(handlers::confirm_outreach))
        .route("/outreach/cancel", post(handlers::cancel_outreach))
        .route("/outreach/status/{client_id}", get(handlers::outreach_status))
        .route("/preview", post(handlers::resolve_preview))
        .route("/leave", post(handlers::leave_screen))
        .with_state(state)
}
