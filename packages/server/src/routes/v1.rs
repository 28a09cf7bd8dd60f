use utoipa_axum::{router::OpenApiRouter, routes};

use crate::handlers;
use crate::state::AppState;

pub fn routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .nest("/students", student_routes())
        .nest("/retry-events", retry_event_routes())
}

fn student_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::student::create_student))
        .routes(routes!(handlers::student::get_student))
}

fn retry_event_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(handlers::retry_event::list_retry_events))
        .routes(routes!(handlers::retry_event::get_retry_event))
}
