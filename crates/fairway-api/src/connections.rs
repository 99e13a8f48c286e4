use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use fairway_db::queries::RespondOutcome;
use fairway_types::api::{Claims, ConnectionsQuery, CreateConnectionRequest, RespondConnectionRequest};
use fairway_types::models::ConnectionStatus;

use crate::error::ApiError;
use crate::{AppState, blocking};

pub async fn create_connection(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let recipient = req.recipient_id.trim();
    if recipient.is_empty() {
        return Err(ApiError::InvalidInput("Recipient ID is required".into()));
    }
    let recipient: Uuid = recipient
        .parse()
        .map_err(|_| ApiError::InvalidInput("Recipient ID is not a valid user id".into()))?;
    if recipient == claims.sub {
        return Err(ApiError::InvalidInput(
            "You cannot send a connection request to yourself".into(),
        ));
    }

    let id = Uuid::new_v4();
    let db = state.clone();
    let requester_id = claims.sub.to_string();
    let recipient_id = recipient.to_string();
    let row = blocking(move || {
        db.db
            .create_connection(&id.to_string(), &requester_id, &recipient_id)
            .map_err(ApiError::from)
    })
    .await?;

    let Some(row) = row else {
        return Err(ApiError::Conflict(
            "A connection already exists between these users".into(),
        ));
    };

    state.notifier.dispatch(
        recipient,
        "connection_request",
        "New Connection Request",
        &format!("{} wants to connect with you!", claims.username),
    );

    Ok(Json(json!({
        "message": "Connection request sent successfully",
        "connection": row.into_model(),
    })))
}

pub async fn list_connections(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ConnectionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match query.status.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(
            raw.parse::<ConnectionStatus>()
                .map_err(ApiError::InvalidInput)?,
        ),
    };

    let db = state.clone();
    let user_id = claims.sub.to_string();
    let rows = blocking(move || {
        db.db
            .list_connections(&user_id, status.map(|s| s.as_str()))
            .map_err(ApiError::from)
    })
    .await?;

    let connections: Vec<_> = rows.into_iter().map(|r| r.into_model()).collect();

    Ok(Json(json!({ "connections": connections })))
}

/// The recipient answers a pending request: `pending -> accepted | declined`.
pub async fn respond_connection(
    State(state): State<AppState>,
    Path(connection_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<RespondConnectionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = req
        .status
        .parse::<ConnectionStatus>()
        .map_err(ApiError::InvalidInput)?;
    if status == ConnectionStatus::Pending {
        return Err(ApiError::InvalidInput(
            "Status must be 'accepted' or 'declined'".into(),
        ));
    }

    let db = state.clone();
    let responder_id = claims.sub.to_string();
    let outcome = blocking(move || {
        db.db
            .respond_connection(&connection_id.to_string(), &responder_id, status.as_str())
            .map_err(ApiError::from)
    })
    .await?;

    let row = match outcome {
        RespondOutcome::Updated(row) => row,
        RespondOutcome::NotFound => {
            return Err(ApiError::NotFound("Connection request not found".into()));
        }
        RespondOutcome::NotRecipient => {
            return Err(ApiError::Conflict(
                "Only the recipient can respond to a connection request".into(),
            ));
        }
        RespondOutcome::NotPending(current) => {
            return Err(ApiError::Conflict(format!(
                "Connection request is already {}",
                current
            )));
        }
    };

    let connection = row.into_model();
    if status == ConnectionStatus::Accepted {
        state.notifier.dispatch(
            connection.requester_id,
            "connection_accepted",
            "Connection Accepted",
            &format!("{} accepted your connection request!", claims.username),
        );
    }

    Ok(Json(json!({
        "message": "Connection updated successfully",
        "connection": connection,
    })))
}
