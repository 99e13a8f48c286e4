use axum::{
    Extension, Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;
use tracing::warn;
use uuid::Uuid;

use fairway_types::api::{Claims, MessagesQuery, SendMessageRequest};

use crate::error::ApiError;
use crate::{AppState, blocking};

pub async fn send_message(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<SendMessageRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = req.recipient_id.trim();
    if recipient.is_empty() {
        return Err(ApiError::InvalidInput(
            "Recipient ID and message are required".into(),
        ));
    }
    let recipient: Uuid = recipient
        .parse()
        .map_err(|_| ApiError::InvalidInput("Recipient ID is not a valid user id".into()))?;

    let body = req.message.trim().to_string();
    if body.is_empty() {
        return Err(ApiError::InvalidInput(
            "Recipient ID and message are required".into(),
        ));
    }

    let sender_id = claims.sub.to_string();
    let recipient_id = recipient.to_string();

    if state.require_connection {
        let db = state.clone();
        let (a, b) = (sender_id.clone(), recipient_id.clone());
        let connected = blocking(move || {
            db.db.accepted_connection_exists(&a, &b).map_err(ApiError::from)
        })
        .await?;
        if !connected {
            return Err(ApiError::NotConnected(
                "You must be connected to send messages".into(),
            ));
        }
    }

    let id = Uuid::new_v4();
    let db = state.clone();
    let row = blocking(move || {
        db.db
            .insert_message(&id.to_string(), &sender_id, &recipient_id, &body)
            .map_err(ApiError::from)
    })
    .await?;

    state.notifier.dispatch(
        recipient,
        "new_message",
        "New Message",
        &format!("You have a new message from {}", claims.username),
    );

    Ok(Json(json!({
        "message": "Message sent successfully",
        "sentMessage": row.into_model(),
    })))
}

/// Fetch the conversation with another user, newest first. As a side effect,
/// everything they sent to the caller is marked read, detached from the
/// response so a marking failure can never fail the read.
pub async fn fetch_messages(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<MessagesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let other = query
        .user
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("User ID parameter is required".into()))?;
    let other: Uuid = other
        .parse()
        .map_err(|_| ApiError::InvalidInput("User ID parameter is not a valid user id".into()))?;

    let limit = query.limit.min(200);
    let offset = query.offset;

    let db = state.clone();
    let user_id = claims.sub.to_string();
    let other_id = other.to_string();
    let rows = blocking(move || {
        db.db
            .get_messages_between(&user_id, &other_id, limit, offset)
            .map_err(ApiError::from)
    })
    .await?;

    let db = state.clone();
    let recipient_id = claims.sub.to_string();
    let sender_id = other.to_string();
    tokio::task::spawn_blocking(move || {
        if let Err(e) = db.db.mark_messages_read(&recipient_id, &sender_id) {
            warn!(
                "Failed to mark messages from {} to {} as read: {:#}",
                sender_id, recipient_id, e
            );
        }
    });

    let messages: Vec<_> = rows.into_iter().map(|r| r.into_model()).collect();

    Ok(Json(json!({ "messages": messages })))
}
