use axum::{
    Extension, Json,
    extract::{Path, Query, State},
    response::IntoResponse,
};
use serde_json::json;
use uuid::Uuid;

use fairway_db::queries::{DecisionOutcome, NewTeeTime};
use fairway_types::api::{ApplicationDecisionRequest, Claims, CreateTeeTimeRequest, TeeTimesQuery};
use fairway_types::models::{ApplicationStatus, TeeTimeStatus};

use crate::error::ApiError;
use crate::{AppState, blocking};

pub async fn create_tee_time(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<CreateTeeTimeRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let course = req.course.trim().to_string();
    let date = req.date.trim().to_string();
    let time = req.time.trim().to_string();
    if course.is_empty() || date.is_empty() || time.is_empty() {
        return Err(ApiError::InvalidInput("Missing required fields".into()));
    }
    if req.max_players < 1 {
        return Err(ApiError::InvalidInput(
            "maxPlayers must be at least 1".into(),
        ));
    }

    let id = Uuid::new_v4();
    let application_id = Uuid::new_v4();
    let creator_id = claims.sub.to_string();
    let max_players = req.max_players;
    let handicap = req.handicap.unwrap_or_else(|| "Any level".to_string());
    let description = req.description.unwrap_or_default();

    let db = state.clone();
    let row = blocking(move || {
        db.db
            .create_tee_time(
                &NewTeeTime {
                    id: &id.to_string(),
                    course_name: &course,
                    tee_time_date: &date,
                    tee_time_time: &time,
                    max_players,
                    handicap_requirement: &handicap,
                    description: &description,
                    creator_id: &creator_id,
                },
                &application_id.to_string(),
            )
            .map_err(ApiError::from)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "tee_time": row.into_model(),
    })))
}

pub async fn search_tee_times(
    State(state): State<AppState>,
    Query(query): Query<TeeTimesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let status = match query.status.as_deref() {
        None => TeeTimeStatus::Active,
        Some(raw) => raw.parse::<TeeTimeStatus>().map_err(ApiError::InvalidInput)?,
    };

    let db = state.clone();
    let rows = blocking(move || {
        db.db
            .search_tee_times(
                query.course.as_deref(),
                query.date.as_deref(),
                status.as_str(),
            )
            .map_err(ApiError::from)
    })
    .await?;

    let tee_times: Vec<_> = rows.into_iter().map(|r| r.into_model()).collect();

    Ok(Json(json!({
        "success": true,
        "tee_times": tee_times,
    })))
}

pub async fn apply_to_tee_time(
    State(state): State<AppState>,
    Path(tee_time_id): Path<Uuid>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse, ApiError> {
    let db = state.clone();
    let tid = tee_time_id.to_string();
    let applicant = claims.sub.to_string();
    let (tee, existing) = blocking(move || {
        let tee = db.db.get_tee_time(&tid).map_err(ApiError::from)?;
        let existing = db.db.get_application(&tid, &applicant).map_err(ApiError::from)?;
        Ok((tee, existing))
    })
    .await?;
    let tee = tee.ok_or_else(|| ApiError::NotFound("Tee time not found".into()))?;

    if existing.is_some() {
        return Err(ApiError::Conflict(
            "You have already applied to this tee time".into(),
        ));
    }
    if tee.available_spots == 0 {
        return Err(ApiError::Capacity("This tee time is already full".into()));
    }

    let id = Uuid::new_v4();
    let db = state.clone();
    let tid = tee_time_id.to_string();
    let applicant_id = claims.sub.to_string();
    let row = blocking(move || {
        db.db
            .insert_application(&id.to_string(), &tid, &applicant_id)
            .map_err(ApiError::from)
    })
    .await?;

    let Some(row) = row else {
        return Err(ApiError::Conflict(
            "You have already applied to this tee time".into(),
        ));
    };

    let application = row.into_model();
    let creator = tee.into_model().creator_id;
    state.notifier.dispatch(
        creator,
        "tee_time_application",
        "New Tee Time Application",
        &format!("{} wants to join your tee time", claims.username),
    );

    Ok(Json(json!({
        "success": true,
        "application": application,
    })))
}

/// The slot creator approves or declines a pending application. Approval is
/// the only place a seat is taken.
pub async fn decide_application(
    State(state): State<AppState>,
    Path((tee_time_id, applicant_id)): Path<(Uuid, Uuid)>,
    Extension(claims): Extension<Claims>,
    Json(req): Json<ApplicationDecisionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let status = req
        .status
        .parse::<ApplicationStatus>()
        .map_err(ApiError::InvalidInput)?;
    let approve = match status {
        ApplicationStatus::Approved => true,
        ApplicationStatus::Declined => false,
        ApplicationStatus::Pending => {
            return Err(ApiError::InvalidInput(
                "Status must be 'approved' or 'declined'".into(),
            ));
        }
    };

    let db = state.clone();
    let tid = tee_time_id.to_string();
    let tee = blocking(move || db.db.get_tee_time(&tid).map_err(ApiError::from))
        .await?
        .ok_or_else(|| ApiError::NotFound("Tee time not found".into()))?;

    if tee.creator_id != claims.sub.to_string() {
        return Err(ApiError::Conflict(
            "Only the tee time creator can decide applications".into(),
        ));
    }

    let db = state.clone();
    let tid = tee_time_id.to_string();
    let aid = applicant_id.to_string();
    let outcome = blocking(move || {
        db.db
            .decide_application(&tid, &aid, approve)
            .map_err(ApiError::from)
    })
    .await?;

    let (application, available_spots) = match outcome {
        DecisionOutcome::Decided {
            application,
            available_spots,
        } => (application.into_model(), available_spots),
        DecisionOutcome::SlotFull => {
            return Err(ApiError::Capacity("This tee time is already full".into()));
        }
        DecisionOutcome::NotFound => {
            return Err(ApiError::NotFound(
                "No application from this player".into(),
            ));
        }
        DecisionOutcome::AlreadyDecided(current) => {
            return Err(ApiError::Conflict(format!(
                "Application is already {}",
                current
            )));
        }
    };

    if approve {
        state.notifier.dispatch(
            applicant_id,
            "application_approved",
            "Application Approved",
            "You're in! Your tee time application was approved",
        );
    }

    Ok(Json(json!({
        "success": true,
        "application": application,
        "available_spots": available_spots,
    })))
}
