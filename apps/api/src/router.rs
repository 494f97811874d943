use std::sync::Arc;

use axum::{
    Router,
    routing::get,
};

use schedule_fill_cell::handlers::ScheduleFillState;
use schedule_fill_cell::router::schedule_fill_routes;
use shared_config::AppConfig;

pub fn create_router(config: Arc<AppConfig>) -> Router {
    let fill_state = Arc::new(ScheduleFillState::new(config));

    Router::new()
        .route("/", get(|| async { "HomeVet schedule API is running!" }))
        .nest("/fill", schedule_fill_routes(fill_state))
}
