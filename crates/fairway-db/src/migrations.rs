use anyhow::Result;
use rusqlite::Connection;
use tracing::info;

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS user_connections (
            id              TEXT PRIMARY KEY,
            requester_id    TEXT NOT NULL,
            recipient_id    TEXT NOT NULL,
            -- canonical unordered pair, pair_lo < pair_hi; at most one
            -- connection per pair in any status
            pair_lo         TEXT NOT NULL,
            pair_hi         TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'accepted', 'declined')),
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(pair_lo, pair_hi)
        );

        CREATE INDEX IF NOT EXISTS idx_connections_requester
            ON user_connections(requester_id, created_at);
        CREATE INDEX IF NOT EXISTS idx_connections_recipient
            ON user_connections(recipient_id, created_at);

        CREATE TABLE IF NOT EXISTS direct_messages (
            id              TEXT PRIMARY KEY,
            sender_id       TEXT NOT NULL,
            recipient_id    TEXT NOT NULL,
            message         TEXT NOT NULL CHECK (length(message) > 0),
            is_read         INTEGER NOT NULL DEFAULT 0,
            created_at      TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_messages_pair
            ON direct_messages(sender_id, recipient_id, created_at);

        CREATE TABLE IF NOT EXISTS tee_times (
            id                      TEXT PRIMARY KEY,
            course_name             TEXT NOT NULL,
            tee_time_date           TEXT NOT NULL,
            tee_time_time           TEXT NOT NULL,
            max_players             INTEGER NOT NULL CHECK (max_players >= 1),
            available_spots         INTEGER NOT NULL CHECK (available_spots >= 0),
            handicap_requirement    TEXT NOT NULL DEFAULT 'Any level',
            description             TEXT NOT NULL DEFAULT '',
            creator_id              TEXT NOT NULL,
            status                  TEXT NOT NULL DEFAULT 'active'
                                    CHECK (status IN ('active', 'full', 'cancelled')),
            created_at              TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_tee_times_search
            ON tee_times(status, tee_time_date);

        CREATE TABLE IF NOT EXISTS tee_time_applications (
            id              TEXT PRIMARY KEY,
            tee_time_id     TEXT NOT NULL REFERENCES tee_times(id),
            applicant_id    TEXT NOT NULL,
            status          TEXT NOT NULL DEFAULT 'pending'
                            CHECK (status IN ('pending', 'approved', 'declined')),
            created_at      TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(tee_time_id, applicant_id)
        );

        CREATE TABLE IF NOT EXISTS golf_rounds (
            id                  TEXT PRIMARY KEY,
            user_id             TEXT NOT NULL,
            course_id           TEXT,
            course_name         TEXT NOT NULL,
            date_played         TEXT NOT NULL,
            total_score         INTEGER,
            par                 INTEGER,
            holes_played        INTEGER,
            weather_conditions  TEXT,
            notes               TEXT,
            created_at          TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_rounds_user
            ON golf_rounds(user_id, date_played);

        CREATE TABLE IF NOT EXISTS golf_round_details (
            id                  TEXT PRIMARY KEY,
            round_id            TEXT NOT NULL REFERENCES golf_rounds(id),
            hole_number         INTEGER NOT NULL,
            par                 INTEGER NOT NULL,
            score               INTEGER NOT NULL,
            putts               INTEGER,
            fairway_hit         INTEGER NOT NULL DEFAULT 0,
            green_in_regulation INTEGER NOT NULL DEFAULT 0,
            sand_saves          INTEGER NOT NULL DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_round_details_round
            ON golf_round_details(round_id);

        CREATE TABLE IF NOT EXISTS achievements (
            user_id     TEXT NOT NULL,
            type        TEXT NOT NULL,
            value       INTEGER NOT NULL DEFAULT 0,
            updated_at  TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE(user_id, type)
        );
        ",
    )?;

    info!("Database migrations complete");
    Ok(())
}
