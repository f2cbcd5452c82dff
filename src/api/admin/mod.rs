mod superuser;
mod teacher;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        // Teacher endpoints
        .route("/grade-exam", post(teacher::grade_exam))
        .route("/students/:student_id/exams", get(teacher::student_exams))
        .route("/stats", get(teacher::stats))
        // Superuser endpoints
        .route("/super/all-users", get(superuser::all_users))
        .route("/super/users/:user_id", get(superuser::user_detail))
        .route("/super/users/:user_id/toggle-status", patch(superuser::toggle_status))
        .route("/super/users/:user_id/change-role", patch(superuser::change_role))
        .route("/super/stats", get(superuser::system_stats))
}
