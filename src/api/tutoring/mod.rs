mod messages;
mod tasks;

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::core::state::AppState;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/messages", get(messages::list_messages))
        .route("/messages/conversation/:user_id", get(messages::get_conversation))
        .route("/messages/send", post(messages::send_message))
        .route("/messages/:message_id/read", put(messages::mark_message_read))
        .route("/tasks", get(tasks::list_tasks))
        .route("/tasks/create", post(tasks::create_task))
        .route("/tasks/:task_id", put(tasks::update_task).delete(tasks::delete_task))
}
