mod handlers;
mod helpers;

use axum::{routing::get, routing::post, Router};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/create", post(handlers::create_exam))
        .route("/my-exams", get(handlers::my_exams))
        .route("/pending-review", get(handlers::pending_review))
        .route("/:exam_id", get(handlers::get_exam))
        .route("/:exam_id/submit", post(handlers::submit_exam))
}
