use axum::{
    Json,
    extract::{Query, State},
    response::IntoResponse,
};
use serde_json::json;
use std::collections::HashMap;
use tracing::error;
use uuid::Uuid;

use fairway_db::Database;
use fairway_db::queries::NewRound;
use fairway_types::api::{RecordRoundRequest, RoundsQuery};
use fairway_types::models::HoleDetail;

use crate::error::ApiError;
use crate::{AppState, blocking};

pub async fn record_round(
    State(state): State<AppState>,
    Json(req): Json<RecordRoundRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = req.user_id.as_deref().map(str::trim).unwrap_or_default();
    let course_name = req.course_name.as_deref().map(str::trim).unwrap_or_default();
    let date_played = req.date_played.as_deref().map(str::trim).unwrap_or_default();
    if user_id.is_empty() || course_name.is_empty() || date_played.is_empty() {
        return Err(ApiError::InvalidInput("Missing required fields".into()));
    }
    let user_id: Uuid = user_id
        .parse()
        .map_err(|_| ApiError::InvalidInput("user_id is not a valid user id".into()))?;

    let holes: Vec<HoleDetail> = req
        .hole_details
        .unwrap_or_default()
        .into_iter()
        .map(|h| HoleDetail {
            hole_number: h.hole_number,
            par: h.par,
            score: h.score,
            putts: h.putts,
            fairway_hit: h.fairway_hit,
            green_in_regulation: h.green_in_regulation,
            sand_saves: h.sand_saves.unwrap_or(0),
        })
        .collect();

    let id = Uuid::new_v4();
    let uid = user_id.to_string();
    let course_name = course_name.to_string();
    let date_played = date_played.to_string();
    let db = state.clone();

    let round = blocking(move || {
        let round = db
            .db
            .insert_round(&NewRound {
                id: &id.to_string(),
                user_id: &uid,
                course_id: req.course_id.as_deref(),
                course_name: &course_name,
                date_played: &date_played,
                total_score: req.total_score,
                par: req.par,
                holes_played: req.holes_played,
                weather_conditions: req.weather_conditions.as_deref(),
                notes: req.notes.as_deref(),
            })
            .map_err(ApiError::from)?;

        // Hole details are an enrichment: a failure here is logged and the
        // round stands on its own.
        let mut stored_holes = holes;
        if !stored_holes.is_empty() {
            if let Err(e) = db.db.insert_round_details(&round.id, &stored_holes) {
                error!("Failed to store hole details for round {}: {:#}", round.id, e);
                stored_holes = vec![];
            }
        }

        // Achievements are derived state; the round is the source of truth
        // and this must never fail the request.
        if let Err(e) = update_achievements(&db.db, &uid, &stored_holes) {
            error!("Failed to update achievements for {}: {:#}", uid, e);
        }

        Ok(round.into_model(stored_holes))
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "round": round,
        "message": "Golf round recorded successfully",
    })))
}

pub async fn list_rounds(
    State(state): State<AppState>,
    Query(query): Query<RoundsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let user_id = query
        .user_id
        .as_deref()
        .map(str::trim)
        .filter(|u| !u.is_empty())
        .ok_or_else(|| ApiError::InvalidInput("User ID is required".into()))?
        .to_string();

    let db = state.clone();
    let rounds = blocking(move || {
        let rows = db.db.get_rounds(&user_id).map_err(ApiError::from)?;

        let round_ids: Vec<String> = rows.iter().map(|r| r.id.clone()).collect();
        let detail_rows = db
            .db
            .get_details_for_rounds(&round_ids)
            .map_err(ApiError::from)?;

        // Group details by round_id (single batch query, no N+1)
        let mut details_map: HashMap<String, Vec<_>> = HashMap::new();
        for d in detail_rows {
            details_map
                .entry(d.round_id.clone())
                .or_default()
                .push(d.into_model());
        }

        let rounds: Vec<_> = rows
            .into_iter()
            .map(|row| {
                let details = details_map.remove(&row.id).unwrap_or_default();
                row.into_model(details)
            })
            .collect();

        Ok(rounds)
    })
    .await?;

    Ok(Json(json!({
        "success": true,
        "rounds": rounds,
    })))
}

#[derive(Debug, Default, PartialEq, Eq)]
struct ScoringCounters {
    hole_in_ones: i64,
    eagles: i64,
    birdies: i64,
}

/// One pass over the hole details. A hole counts for at most one category,
/// checked in priority order: ace, then eagle, then birdie.
fn scoring_counters(holes: &[HoleDetail]) -> ScoringCounters {
    let mut counters = ScoringCounters::default();
    for hole in holes {
        if hole.score == 1 {
            counters.hole_in_ones += 1;
        } else if hole.score == hole.par - 2 {
            counters.eagles += 1;
        } else if hole.score == hole.par - 1 {
            counters.birdies += 1;
        }
    }
    counters
}

/// Recompute rounds_played and add this round's scoring milestones.
/// `rounds_played` is an upsert to the recomputed total (monotonic);
/// the milestone counters are additive.
fn update_achievements(db: &Database, user_id: &str, holes: &[HoleDetail]) -> anyhow::Result<()> {
    let total_rounds = db.count_rounds(user_id)?;
    db.raise_achievement(user_id, "rounds_played", total_rounds)?;

    let counters = scoring_counters(holes);
    if counters.hole_in_ones > 0 {
        db.add_achievement(user_id, "hole_in_one", counters.hole_in_ones)?;
    }
    if counters.eagles > 0 {
        db.add_achievement(user_id, "eagles", counters.eagles)?;
    }
    if counters.birdies > 0 {
        db.add_achievement(user_id, "birdies", counters.birdies)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hole(par: i64, score: i64) -> HoleDetail {
        HoleDetail {
            hole_number: 1,
            par,
            score,
            putts: None,
            fairway_hit: false,
            green_in_regulation: false,
            sand_saves: 0,
        }
    }

    #[test]
    fn counters_classify_each_hole_once() {
        let counters = scoring_counters(&[
            hole(4, 1), // ace
            hole(4, 2), // eagle
            hole(4, 3), // birdie
            hole(4, 4), // par, uncounted
            hole(5, 6), // bogey, uncounted
        ]);
        assert_eq!(
            counters,
            ScoringCounters {
                hole_in_ones: 1,
                eagles: 1,
                birdies: 1,
            }
        );
    }

    #[test]
    fn an_ace_on_a_par_three_is_not_an_eagle() {
        // score 1 == par - 2 here, but the ace check wins
        let counters = scoring_counters(&[hole(3, 1)]);
        assert_eq!(counters.hole_in_ones, 1);
        assert_eq!(counters.eagles, 0);
    }

    #[test]
    fn no_holes_means_no_milestones() {
        assert_eq!(scoring_counters(&[]), ScoringCounters::default());
    }

    #[test]
    fn aggregation_updates_rounds_and_milestones() {
        let db = Database::open_in_memory().unwrap();
        let user = uuid::Uuid::new_v4().to_string();

        db.insert_round(&NewRound {
            id: &uuid::Uuid::new_v4().to_string(),
            user_id: &user,
            course_id: None,
            course_name: "Links",
            date_played: "2026-08-01",
            total_score: None,
            par: None,
            holes_played: None,
            weather_conditions: None,
            notes: None,
        })
        .unwrap();

        update_achievements(&db, &user, &[hole(4, 1)]).unwrap();
        assert_eq!(db.get_achievement(&user, "rounds_played").unwrap(), Some(1));
        assert_eq!(db.get_achievement(&user, "hole_in_one").unwrap(), Some(1));

        // a second round with no hole details only moves the total
        db.insert_round(&NewRound {
            id: &uuid::Uuid::new_v4().to_string(),
            user_id: &user,
            course_id: None,
            course_name: "Links",
            date_played: "2026-08-02",
            total_score: None,
            par: None,
            holes_played: None,
            weather_conditions: None,
            notes: None,
        })
        .unwrap();
        update_achievements(&db, &user, &[]).unwrap();

        assert_eq!(db.get_achievement(&user, "rounds_played").unwrap(), Some(2));
        assert_eq!(db.get_achievement(&user, "hole_in_one").unwrap(), Some(1));
    }
}
