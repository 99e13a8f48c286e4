//! Database row types that map directly to SQLite rows.
//! Distinct from the fairway-types API models to keep the DB layer
//! independent; `into_model` converts at the boundary.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use fairway_types::models::{
    ApplicationStatus, Connection, ConnectionStatus, DirectMessage, GolfRound, HoleDetail, TeeTime,
    TeeTimeApplication, TeeTimeStatus,
};

pub struct ConnectionRow {
    pub id: String,
    pub requester_id: String,
    pub recipient_id: String,
    pub status: String,
    pub created_at: String,
}

impl ConnectionRow {
    pub fn into_model(self) -> Connection {
        Connection {
            id: parse_uuid(&self.id, "connection id"),
            requester_id: parse_uuid(&self.requester_id, "requester_id"),
            recipient_id: parse_uuid(&self.recipient_id, "recipient_id"),
            status: parse_status(&self.status, ConnectionStatus::Pending),
            created_at: parse_timestamp(&self.created_at, &self.id),
        }
    }
}

pub struct MessageRow {
    pub id: String,
    pub sender_id: String,
    pub recipient_id: String,
    pub message: String,
    pub is_read: bool,
    pub created_at: String,
}

impl MessageRow {
    pub fn into_model(self) -> DirectMessage {
        DirectMessage {
            id: parse_uuid(&self.id, "message id"),
            sender_id: parse_uuid(&self.sender_id, "sender_id"),
            recipient_id: parse_uuid(&self.recipient_id, "recipient_id"),
            message: self.message,
            is_read: self.is_read,
            created_at: parse_timestamp(&self.created_at, &self.id),
        }
    }
}

pub struct TeeTimeRow {
    pub id: String,
    pub course_name: String,
    pub tee_time_date: String,
    pub tee_time_time: String,
    pub max_players: i64,
    pub available_spots: i64,
    pub handicap_requirement: String,
    pub description: String,
    pub creator_id: String,
    pub status: String,
    pub created_at: String,
}

impl TeeTimeRow {
    pub fn into_model(self) -> TeeTime {
        TeeTime {
            id: parse_uuid(&self.id, "tee time id"),
            course_name: self.course_name,
            tee_time_date: self.tee_time_date,
            tee_time_time: self.tee_time_time,
            max_players: self.max_players,
            available_spots: self.available_spots,
            handicap_requirement: self.handicap_requirement,
            description: self.description,
            creator_id: parse_uuid(&self.creator_id, "creator_id"),
            status: parse_status(&self.status, TeeTimeStatus::Active),
            created_at: parse_timestamp(&self.created_at, &self.id),
        }
    }
}

pub struct ApplicationRow {
    pub id: String,
    pub tee_time_id: String,
    pub applicant_id: String,
    pub status: String,
    pub created_at: String,
}

impl ApplicationRow {
    pub fn into_model(self) -> TeeTimeApplication {
        TeeTimeApplication {
            id: parse_uuid(&self.id, "application id"),
            tee_time_id: parse_uuid(&self.tee_time_id, "tee_time_id"),
            applicant_id: parse_uuid(&self.applicant_id, "applicant_id"),
            status: parse_status(&self.status, ApplicationStatus::Pending),
            created_at: parse_timestamp(&self.created_at, &self.id),
        }
    }
}

pub struct RoundRow {
    pub id: String,
    pub user_id: String,
    pub course_id: Option<String>,
    pub course_name: String,
    pub date_played: String,
    pub total_score: Option<i64>,
    pub par: Option<i64>,
    pub holes_played: Option<i64>,
    pub weather_conditions: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
}

impl RoundRow {
    pub fn into_model(self, details: Vec<HoleDetail>) -> GolfRound {
        GolfRound {
            id: parse_uuid(&self.id, "round id"),
            user_id: parse_uuid(&self.user_id, "user_id"),
            course_id: self.course_id,
            course_name: self.course_name,
            date_played: self.date_played,
            total_score: self.total_score,
            par: self.par,
            holes_played: self.holes_played,
            weather_conditions: self.weather_conditions,
            notes: self.notes,
            created_at: parse_timestamp(&self.created_at, &self.id),
            details,
        }
    }
}

pub struct RoundDetailRow {
    pub round_id: String,
    pub hole_number: i64,
    pub par: i64,
    pub score: i64,
    pub putts: Option<i64>,
    pub fairway_hit: bool,
    pub green_in_regulation: bool,
    pub sand_saves: i64,
}

impl RoundDetailRow {
    pub fn into_model(self) -> HoleDetail {
        HoleDetail {
            hole_number: self.hole_number,
            par: self.par,
            score: self.score,
            putts: self.putts,
            fairway_hit: self.fairway_hit,
            green_in_regulation: self.green_in_regulation,
            sand_saves: self.sand_saves,
        }
    }
}

fn parse_uuid(raw: &str, field: &str) -> Uuid {
    raw.parse().unwrap_or_else(|e| {
        warn!("Corrupt {} '{}': {}", field, raw, e);
        Uuid::default()
    })
}

fn parse_status<S: FromStr<Err = String> + Copy>(raw: &str, fallback: S) -> S {
    raw.parse().unwrap_or_else(|e: String| {
        warn!("{}", e);
        fallback
    })
}

fn parse_timestamp(raw: &str, row_id: &str) -> DateTime<Utc> {
    raw.parse::<DateTime<Utc>>()
        .or_else(|_| {
            // SQLite stores timestamps as "YYYY-MM-DD HH:MM:SS" without timezone.
            // Parse as naive UTC and convert.
            NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S").map(|ndt| ndt.and_utc())
        })
        .unwrap_or_else(|e| {
            warn!("Corrupt created_at '{}' on row '{}': {}", raw, row_id, e);
            DateTime::default()
        })
}
