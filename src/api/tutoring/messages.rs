use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use crate::api::errors::ApiError;
use crate::api::guards::CurrentUser;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::tutoring::{MessageResponse, SendMessageRequest};
use crate::services::tutoring_policy;

pub(super) async fn list_messages(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let received = repositories::messages::list_received(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list received messages"))?;

    let sent = repositories::messages::list_sent(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list sent messages"))?;

    let unread_count = repositories::messages::unread_count(state.db(), user.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to count unread messages"))?;

    Ok(Json(serde_json::json!({
        "received": received.into_iter().map(MessageResponse::from_row).collect::<Vec<_>>(),
        "sent": sent.into_iter().map(MessageResponse::from_row).collect::<Vec<_>>(),
        "unread_count": unread_count
    })))
}

/// Full exchange with one user, oldest first. Opening the conversation
/// counts as reading it, so unread messages from the other side are marked
/// before listing.
pub(super) async fn get_conversation(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(other_user_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    repositories::messages::mark_conversation_read(
        state.db(),
        user.id,
        other_user_id,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to mark conversation read"))?;

    let messages = repositories::messages::conversation(state.db(), user.id, other_user_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load conversation"))?;

    Ok(Json(serde_json::json!({
        "total": messages.len(),
        "messages": messages.into_iter().map(MessageResponse::from_row).collect::<Vec<_>>()
    })))
}

pub(super) async fn send_message(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Json(payload): Json<SendMessageRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ApiError> {
    let (Some(receiver_id), Some(message)) = (
        payload.receiver_id,
        payload.message.as_deref().filter(|text| !text.is_empty()),
    ) else {
        return Err(ApiError::BadRequest("Se requiere destinatario y mensaje".to_string()));
    };

    let receiver = repositories::users::find_by_id(state.db(), receiver_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load receiver"))?
        .ok_or(ApiError::NotFound("Destinatario no encontrado"))?;

    tutoring_policy::can_message(&user, &receiver).map_err(ApiError::Forbidden)?;

    let message_id = repositories::messages::create(
        state.db(),
        repositories::messages::CreateMessage {
            sender_id: user.id,
            receiver_id: receiver.id,
            subject: payload.subject.as_deref(),
            message,
            now: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store message"))?;

    let row = repositories::messages::fetch_detail_by_id(state.db(), message_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload message"))?;

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "message": "Mensaje enviado exitosamente",
            "data": MessageResponse::from_row(row)
        })),
    ))
}

pub(super) async fn mark_message_read(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(message_id): Path<i64>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let message = repositories::messages::find_by_id(state.db(), message_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load message"))?
        .ok_or(ApiError::NotFound("Mensaje no encontrado"))?;

    if message.receiver_id != user.id {
        return Err(ApiError::Forbidden("No tienes permiso para marcar este mensaje"));
    }

    repositories::messages::mark_read(state.db(), message.id, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to mark message read"))?;

    let row = repositories::messages::fetch_detail_by_id(state.db(), message.id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to reload message"))?;

    Ok(Json(serde_json::json!({
        "message": "Mensaje marcado como leído",
        "data": MessageResponse::from_row(row)
    })))
}
