use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

/// Lifecycle of a pairwise connection. Only the recipient may move a
/// connection out of `Pending`; `Accepted` and `Declined` are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Declined,
}

impl ConnectionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Accepted => "accepted",
            ConnectionStatus::Declined => "declined",
        }
    }
}

impl FromStr for ConnectionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ConnectionStatus::Pending),
            "accepted" => Ok(ConnectionStatus::Accepted),
            "declined" => Ok(ConnectionStatus::Declined),
            other => Err(format!("unknown connection status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Connection {
    pub id: Uuid,
    pub requester_id: Uuid,
    pub recipient_id: Uuid,
    pub status: ConnectionStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DirectMessage {
    pub id: Uuid,
    pub sender_id: Uuid,
    pub recipient_id: Uuid,
    pub message: String,
    pub is_read: bool,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TeeTimeStatus {
    Active,
    Full,
    Cancelled,
}

impl TeeTimeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TeeTimeStatus::Active => "active",
            TeeTimeStatus::Full => "full",
            TeeTimeStatus::Cancelled => "cancelled",
        }
    }
}

impl FromStr for TeeTimeStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(TeeTimeStatus::Active),
            "full" => Ok(TeeTimeStatus::Full),
            "cancelled" => Ok(TeeTimeStatus::Cancelled),
            other => Err(format!("unknown tee time status: {other}")),
        }
    }
}

/// A bookable slot. `available_spots` counts seats not yet taken by an
/// approved application; the creator's own seat is taken at creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeTime {
    pub id: Uuid,
    pub course_name: String,
    pub tee_time_date: String,
    pub tee_time_time: String,
    pub max_players: i64,
    pub available_spots: i64,
    pub handicap_requirement: String,
    pub description: String,
    pub creator_id: Uuid,
    pub status: TeeTimeStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    Pending,
    Approved,
    Declined,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Pending => "pending",
            ApplicationStatus::Approved => "approved",
            ApplicationStatus::Declined => "declined",
        }
    }
}

impl FromStr for ApplicationStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(ApplicationStatus::Pending),
            "approved" => Ok(ApplicationStatus::Approved),
            "declined" => Ok(ApplicationStatus::Declined),
            other => Err(format!("unknown application status: {other}")),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TeeTimeApplication {
    pub id: Uuid,
    pub tee_time_id: Uuid,
    pub applicant_id: Uuid,
    pub status: ApplicationStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GolfRound {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Option<String>,
    pub course_name: String,
    pub date_played: String,
    pub total_score: Option<i64>,
    pub par: Option<i64>,
    pub holes_played: Option<i64>,
    pub weather_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub details: Vec<HoleDetail>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HoleDetail {
    pub hole_number: i64,
    pub par: i64,
    pub score: i64,
    pub putts: Option<i64>,
    pub fairway_hit: bool,
    pub green_in_regulation: bool,
    pub sand_saves: i64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Achievement {
    pub user_id: Uuid,
    #[serde(rename = "type")]
    pub kind: String,
    pub value: i64,
}
