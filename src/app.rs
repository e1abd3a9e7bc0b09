use crate::handlers;
use crate::state::AppState;
use axum::{routing::{delete, get, post, put}, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/health", get(handlers::health))
        .route("/api/groups", get(handlers::list_groups).post(handlers::create_group))
        .route("/api/groups/:name", get(handlers::get_group).delete(handlers::delete_group))
        .route("/api/groups/:name/edit", post(handlers::edit_group))
        .route(
            "/api/groups/:name/session",
            get(handlers::get_session_form).post(handlers::record_session),
        )
        .route("/api/groups/:name/trend", get(handlers::group_trend))
        .route("/api/groups/:name/export.csv", get(handlers::export_group))
        .route("/api/trends", get(handlers::all_trends))
        .route("/api/entries", get(handlers::list_entries))
        .route("/api/entries/:id", delete(handlers::delete_entry))
        .route("/api/sessions", post(handlers::create_session))
        .route(
            "/api/sessions/:id",
            get(handlers::get_session).delete(handlers::close_session),
        )
        .route("/api/sessions/:id/selection", put(handlers::select_group))
        .route("/api/sessions/:id/edit", post(handlers::edit_session))
        .route("/api/sessions/:id/drafts/:exercise", put(handlers::put_draft))
        .route("/api/sessions/:id/finish", post(handlers::finish_session))
        .route("/api/vaccines", get(handlers::get_vaccines))
        .route("/api/vaccines/summary", get(handlers::vaccine_summary))
        .route("/api/vaccines/:visit/:vaccine", put(handlers::set_vaccine_status))
        .with_state(state)
}
