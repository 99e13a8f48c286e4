use serde::{Deserialize, Serialize};
use uuid::Uuid;

// -- JWT Claims --

/// JWT claims resolved by the identity middleware. Canonical definition lives
/// here in fairway-types so every crate shares one shape.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub username: String,
    pub exp: usize,
}

// -- Connections --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateConnectionRequest {
    pub recipient_id: String,
}

#[derive(Debug, Deserialize)]
pub struct ConnectionsQuery {
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct RespondConnectionRequest {
    pub status: String,
}

// -- Messages --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct SendMessageRequest {
    pub recipient_id: String,
    pub message: String,
}

#[derive(Debug, Deserialize)]
pub struct MessagesQuery {
    pub user: Option<String>,
    #[serde(default = "default_limit")]
    pub limit: u32,
    #[serde(default)]
    pub offset: u32,
}

fn default_limit() -> u32 {
    50
}

// -- Tee times --

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "camelCase")]
pub struct CreateTeeTimeRequest {
    pub course: String,
    pub date: String,
    pub time: String,
    pub max_players: i64,
    pub handicap: Option<String>,
    pub description: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TeeTimesQuery {
    pub course: Option<String>,
    pub date: Option<String>,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ApplicationDecisionRequest {
    pub status: String,
}

// -- Golf rounds --

#[derive(Debug, Deserialize)]
pub struct RecordRoundRequest {
    pub user_id: Option<String>,
    pub course_id: Option<String>,
    pub course_name: Option<String>,
    pub date_played: Option<String>,
    pub total_score: Option<i64>,
    pub par: Option<i64>,
    pub holes_played: Option<i64>,
    pub weather_conditions: Option<String>,
    pub notes: Option<String>,
    pub hole_details: Option<Vec<HoleDetailInput>>,
}

#[derive(Debug, Deserialize)]
pub struct HoleDetailInput {
    pub hole_number: i64,
    pub par: i64,
    pub score: i64,
    pub putts: Option<i64>,
    #[serde(default)]
    pub fairway_hit: bool,
    #[serde(default)]
    pub green_in_regulation: bool,
    pub sand_saves: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RoundsQuery {
    pub user_id: Option<String>,
}
