use crate::models::{ApplicationRow, ConnectionRow, MessageRow, RoundDetailRow, RoundRow, TeeTimeRow};
use crate::Database;
use anyhow::{anyhow, Result};
use fairway_types::models::HoleDetail;
use rusqlite::{Connection, Row};

/// Outcome of a recipient's answer to a pending connection request.
pub enum RespondOutcome {
    Updated(ConnectionRow),
    NotFound,
    NotRecipient,
    NotPending(String),
}

/// Outcome of the roster owner's decision on an application.
pub enum DecisionOutcome {
    Decided {
        application: ApplicationRow,
        available_spots: Option<i64>,
    },
    SlotFull,
    NotFound,
    AlreadyDecided(String),
}

pub struct NewTeeTime<'a> {
    pub id: &'a str,
    pub course_name: &'a str,
    pub tee_time_date: &'a str,
    pub tee_time_time: &'a str,
    pub max_players: i64,
    pub handicap_requirement: &'a str,
    pub description: &'a str,
    pub creator_id: &'a str,
}

pub struct NewRound<'a> {
    pub id: &'a str,
    pub user_id: &'a str,
    pub course_id: Option<&'a str>,
    pub course_name: &'a str,
    pub date_played: &'a str,
    pub total_score: Option<i64>,
    pub par: Option<i64>,
    pub holes_played: Option<i64>,
    pub weather_conditions: Option<&'a str>,
    pub notes: Option<&'a str>,
}

impl Database {
    // -- Connections --

    /// Insert a pending connection for the unordered pair. Returns `None`
    /// when a connection already exists between the two users in any status
    /// (the UNIQUE(pair_lo, pair_hi) constraint fired).
    pub fn create_connection(
        &self,
        id: &str,
        requester_id: &str,
        recipient_id: &str,
    ) -> Result<Option<ConnectionRow>> {
        let (lo, hi) = canonical_pair(requester_id, recipient_id);

        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO user_connections (id, requester_id, recipient_id, pair_lo, pair_hi, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, 'pending')",
                rusqlite::params![id, requester_id, recipient_id, lo, hi],
            );

            match inserted {
                Ok(_) => Ok(query_connection_by_id(conn, id)?),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_connection(&self, id: &str) -> Result<Option<ConnectionRow>> {
        self.with_conn(|conn| query_connection_by_id(conn, id))
    }

    /// All connections where the user is either side, newest first.
    pub fn list_connections(&self, user_id: &str, status: Option<&str>) -> Result<Vec<ConnectionRow>> {
        self.with_conn(|conn| {
            let mut sql = String::from(
                "SELECT id, requester_id, recipient_id, status, created_at
                 FROM user_connections
                 WHERE (requester_id = ?1 OR recipient_id = ?1)",
            );
            let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&user_id];
            if let Some(s) = &status {
                sql.push_str(" AND status = ?2");
                params.push(s);
            }
            sql.push_str(" ORDER BY created_at DESC, id DESC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), map_connection)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Recipient answers a pending request. The transition is a single
    /// conditional UPDATE; when it matches nothing, the row is inspected to
    /// tell the caller why.
    pub fn respond_connection(
        &self,
        id: &str,
        responder_id: &str,
        new_status: &str,
    ) -> Result<RespondOutcome> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE user_connections SET status = ?3
                 WHERE id = ?1 AND recipient_id = ?2 AND status = 'pending'",
                rusqlite::params![id, responder_id, new_status],
            )?;

            if changed == 1 {
                let row = query_connection_by_id(conn, id)?
                    .ok_or_else(|| anyhow!("Connection vanished after update: {}", id))?;
                return Ok(RespondOutcome::Updated(row));
            }

            match query_connection_by_id(conn, id)? {
                None => Ok(RespondOutcome::NotFound),
                Some(row) if row.recipient_id != responder_id => Ok(RespondOutcome::NotRecipient),
                Some(row) => Ok(RespondOutcome::NotPending(row.status)),
            }
        })
    }

    /// Whether an accepted connection exists between the unordered pair.
    /// Used by the connection-required messaging policy.
    pub fn accepted_connection_exists(&self, a: &str, b: &str) -> Result<bool> {
        let (lo, hi) = canonical_pair(a, b);
        self.with_conn(|conn| {
            let found: Option<i64> = conn
                .query_row(
                    "SELECT 1 FROM user_connections
                     WHERE pair_lo = ?1 AND pair_hi = ?2 AND status = 'accepted'",
                    rusqlite::params![lo, hi],
                    |row| row.get(0),
                )
                .optional()?;
            Ok(found.is_some())
        })
    }

    // -- Messages --

    pub fn insert_message(
        &self,
        id: &str,
        sender_id: &str,
        recipient_id: &str,
        message: &str,
    ) -> Result<MessageRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO direct_messages (id, sender_id, recipient_id, message)
                 VALUES (?1, ?2, ?3, ?4)",
                rusqlite::params![id, sender_id, recipient_id, message],
            )?;
            query_message_by_id(conn, id)?.ok_or_else(|| anyhow!("Message vanished after insert: {}", id))
        })
    }

    /// Messages between the pair in either direction, newest first.
    pub fn get_messages_between(
        &self,
        user_id: &str,
        other_user_id: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Vec<MessageRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, sender_id, recipient_id, message, is_read, created_at
                 FROM direct_messages
                 WHERE (sender_id = ?1 AND recipient_id = ?2)
                    OR (sender_id = ?2 AND recipient_id = ?1)
                 ORDER BY created_at DESC, id DESC
                 LIMIT ?3 OFFSET ?4",
            )?;

            let rows = stmt
                .query_map(
                    rusqlite::params![user_id, other_user_id, limit, offset],
                    map_message,
                )?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Mark everything the sender addressed to the recipient as read.
    /// Idempotent: already-read rows are excluded by the WHERE clause.
    pub fn mark_messages_read(&self, recipient_id: &str, sender_id: &str) -> Result<usize> {
        self.with_conn(|conn| {
            let changed = conn.execute(
                "UPDATE direct_messages SET is_read = 1
                 WHERE recipient_id = ?1 AND sender_id = ?2 AND is_read = 0",
                rusqlite::params![recipient_id, sender_id],
            )?;
            Ok(changed)
        })
    }

    // -- Tee times --

    /// Insert the slot and the creator's auto-approved application as one
    /// transaction. The slot never exists without its creator on the roster.
    pub fn create_tee_time(&self, tee: &NewTeeTime<'_>, application_id: &str) -> Result<TeeTimeRow> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            tx.execute(
                "INSERT INTO tee_times
                   (id, course_name, tee_time_date, tee_time_time, max_players,
                    available_spots, handicap_requirement, description, creator_id, status)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, 'active')",
                rusqlite::params![
                    tee.id,
                    tee.course_name,
                    tee.tee_time_date,
                    tee.tee_time_time,
                    tee.max_players,
                    tee.max_players - 1,
                    tee.handicap_requirement,
                    tee.description,
                    tee.creator_id,
                ],
            )?;

            tx.execute(
                "INSERT INTO tee_time_applications (id, tee_time_id, applicant_id, status)
                 VALUES (?1, ?2, ?3, 'approved')",
                rusqlite::params![application_id, tee.id, tee.creator_id],
            )?;

            tx.commit()?;

            query_tee_time_by_id(conn, tee.id)?
                .ok_or_else(|| anyhow!("Tee time vanished after insert: {}", tee.id))
        })
    }

    pub fn get_tee_time(&self, id: &str) -> Result<Option<TeeTimeRow>> {
        self.with_conn(|conn| query_tee_time_by_id(conn, id))
    }

    /// Filtered listing, ascending by date then time.
    pub fn search_tee_times(
        &self,
        course: Option<&str>,
        date: Option<&str>,
        status: &str,
    ) -> Result<Vec<TeeTimeRow>> {
        self.with_conn(|conn| {
            let mut sql = String::from(
                "SELECT id, course_name, tee_time_date, tee_time_time, max_players,
                        available_spots, handicap_requirement, description, creator_id,
                        status, created_at
                 FROM tee_times
                 WHERE status = ?1",
            );
            let mut params: Vec<&dyn rusqlite::types::ToSql> = vec![&status];
            if let Some(c) = &course {
                params.push(c);
                sql.push_str(&format!(
                    " AND course_name LIKE '%' || ?{} || '%'",
                    params.len()
                ));
            }
            if let Some(d) = &date {
                params.push(d);
                sql.push_str(&format!(" AND tee_time_date >= ?{}", params.len()));
            }
            sql.push_str(" ORDER BY tee_time_date ASC, tee_time_time ASC");

            let mut stmt = conn.prepare(&sql)?;
            let rows = stmt
                .query_map(params.as_slice(), map_tee_time)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Insert a pending application. Returns `None` when the applicant
    /// already has one for this slot (UNIQUE(tee_time_id, applicant_id)).
    pub fn insert_application(
        &self,
        id: &str,
        tee_time_id: &str,
        applicant_id: &str,
    ) -> Result<Option<ApplicationRow>> {
        self.with_conn(|conn| {
            let inserted = conn.execute(
                "INSERT INTO tee_time_applications (id, tee_time_id, applicant_id, status)
                 VALUES (?1, ?2, ?3, 'pending')",
                rusqlite::params![id, tee_time_id, applicant_id],
            );

            match inserted {
                Ok(_) => Ok(query_application(conn, tee_time_id, applicant_id)?),
                Err(e) if is_unique_violation(&e) => Ok(None),
                Err(e) => Err(e.into()),
            }
        })
    }

    pub fn get_application(
        &self,
        tee_time_id: &str,
        applicant_id: &str,
    ) -> Result<Option<ApplicationRow>> {
        self.with_conn(|conn| query_application(conn, tee_time_id, applicant_id))
    }

    /// Approve or decline a pending application. Approval takes a seat with
    /// a guarded decrement (`available_spots > 0`) and flips the slot to
    /// `full` when the last seat goes, all inside one transaction. Two
    /// concurrent approvals can never drive the count negative.
    pub fn decide_application(
        &self,
        tee_time_id: &str,
        applicant_id: &str,
        approve: bool,
    ) -> Result<DecisionOutcome> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;

            if approve {
                let seated = tx.execute(
                    "UPDATE tee_times
                     SET available_spots = available_spots - 1,
                         status = CASE WHEN available_spots = 1 THEN 'full' ELSE status END
                     WHERE id = ?1 AND available_spots > 0",
                    [tee_time_id],
                )?;

                if seated == 0 {
                    return if query_tee_time_by_id(&tx, tee_time_id)?.is_none() {
                        Ok(DecisionOutcome::NotFound)
                    } else {
                        Ok(DecisionOutcome::SlotFull)
                    };
                }
            }

            let new_status = if approve { "approved" } else { "declined" };
            let changed = tx.execute(
                "UPDATE tee_time_applications SET status = ?3
                 WHERE tee_time_id = ?1 AND applicant_id = ?2 AND status = 'pending'",
                rusqlite::params![tee_time_id, applicant_id, new_status],
            )?;

            if changed == 0 {
                // tx dropped here, rolling back the seat decrement
                return match query_application(&tx, tee_time_id, applicant_id)? {
                    None => Ok(DecisionOutcome::NotFound),
                    Some(row) => Ok(DecisionOutcome::AlreadyDecided(row.status)),
                };
            }

            tx.commit()?;

            let application = query_application(conn, tee_time_id, applicant_id)?
                .ok_or_else(|| anyhow!("Application vanished after update"))?;
            let available_spots = if approve {
                query_tee_time_by_id(conn, tee_time_id)?.map(|t| t.available_spots)
            } else {
                None
            };

            Ok(DecisionOutcome::Decided {
                application,
                available_spots,
            })
        })
    }

    // -- Golf rounds --

    pub fn insert_round(&self, round: &NewRound<'_>) -> Result<RoundRow> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO golf_rounds
                   (id, user_id, course_id, course_name, date_played, total_score,
                    par, holes_played, weather_conditions, notes)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
                rusqlite::params![
                    round.id,
                    round.user_id,
                    round.course_id,
                    round.course_name,
                    round.date_played,
                    round.total_score,
                    round.par,
                    round.holes_played,
                    round.weather_conditions,
                    round.notes,
                ],
            )?;
            query_round_by_id(conn, round.id)?
                .ok_or_else(|| anyhow!("Round vanished after insert: {}", round.id))
        })
    }

    pub fn insert_round_details(&self, round_id: &str, details: &[HoleDetail]) -> Result<()> {
        self.with_conn(|conn| {
            let tx = conn.unchecked_transaction()?;
            {
                let mut stmt = tx.prepare(
                    "INSERT INTO golf_round_details
                       (id, round_id, hole_number, par, score, putts,
                        fairway_hit, green_in_regulation, sand_saves)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                )?;
                for hole in details {
                    stmt.execute(rusqlite::params![
                        uuid::Uuid::new_v4().to_string(),
                        round_id,
                        hole.hole_number,
                        hole.par,
                        hole.score,
                        hole.putts,
                        hole.fairway_hit,
                        hole.green_in_regulation,
                        hole.sand_saves,
                    ])?;
                }
            }
            tx.commit()?;
            Ok(())
        })
    }

    /// Rounds for a user, most recent first.
    pub fn get_rounds(&self, user_id: &str) -> Result<Vec<RoundRow>> {
        self.with_conn(|conn| {
            let mut stmt = conn.prepare(
                "SELECT id, user_id, course_id, course_name, date_played, total_score,
                        par, holes_played, weather_conditions, notes, created_at
                 FROM golf_rounds
                 WHERE user_id = ?1
                 ORDER BY date_played DESC, created_at DESC",
            )?;
            let rows = stmt
                .query_map([user_id], map_round)?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    /// Batch-fetch hole details for a set of round IDs.
    pub fn get_details_for_rounds(&self, round_ids: &[String]) -> Result<Vec<RoundDetailRow>> {
        if round_ids.is_empty() {
            return Ok(vec![]);
        }

        self.with_conn(|conn| {
            let placeholders: Vec<String> = (1..=round_ids.len()).map(|i| format!("?{}", i)).collect();
            let sql = format!(
                "SELECT round_id, hole_number, par, score, putts,
                        fairway_hit, green_in_regulation, sand_saves
                 FROM golf_round_details
                 WHERE round_id IN ({})
                 ORDER BY hole_number ASC",
                placeholders.join(", ")
            );

            let mut stmt = conn.prepare(&sql)?;
            let params: Vec<&dyn rusqlite::types::ToSql> = round_ids
                .iter()
                .map(|id| id as &dyn rusqlite::types::ToSql)
                .collect();

            let rows = stmt
                .query_map(params.as_slice(), |row| {
                    Ok(RoundDetailRow {
                        round_id: row.get(0)?,
                        hole_number: row.get(1)?,
                        par: row.get(2)?,
                        score: row.get(3)?,
                        putts: row.get(4)?,
                        fairway_hit: row.get(5)?,
                        green_in_regulation: row.get(6)?,
                        sand_saves: row.get(7)?,
                    })
                })?
                .collect::<std::result::Result<Vec<_>, _>>()?;
            Ok(rows)
        })
    }

    pub fn count_rounds(&self, user_id: &str) -> Result<i64> {
        self.with_conn(|conn| {
            let count = conn.query_row(
                "SELECT COUNT(*) FROM golf_rounds WHERE user_id = ?1",
                [user_id],
                |row| row.get(0),
            )?;
            Ok(count)
        })
    }

    // -- Achievements --

    /// Upsert to the larger of the stored and supplied value. Used for
    /// recomputed totals such as rounds_played.
    pub fn raise_achievement(&self, user_id: &str, kind: &str, value: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO achievements (user_id, type, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, type)
                 DO UPDATE SET value = MAX(value, excluded.value),
                               updated_at = datetime('now')",
                rusqlite::params![user_id, kind, value],
            )?;
            Ok(())
        })
    }

    /// Add a delta to the stored value. Used for event counters such as
    /// hole_in_one; the addition happens inside the statement.
    pub fn add_achievement(&self, user_id: &str, kind: &str, delta: i64) -> Result<()> {
        self.with_conn(|conn| {
            conn.execute(
                "INSERT INTO achievements (user_id, type, value) VALUES (?1, ?2, ?3)
                 ON CONFLICT(user_id, type)
                 DO UPDATE SET value = value + excluded.value,
                               updated_at = datetime('now')",
                rusqlite::params![user_id, kind, delta],
            )?;
            Ok(())
        })
    }

    pub fn get_achievement(&self, user_id: &str, kind: &str) -> Result<Option<i64>> {
        self.with_conn(|conn| {
            conn.query_row(
                "SELECT value FROM achievements WHERE user_id = ?1 AND type = ?2",
                rusqlite::params![user_id, kind],
                |row| row.get(0),
            )
            .optional()
        })
    }
}

/// Canonical ordered form of an unordered user pair.
fn canonical_pair<'a>(a: &'a str, b: &'a str) -> (&'a str, &'a str) {
    if a <= b { (a, b) } else { (b, a) }
}

fn is_unique_violation(e: &rusqlite::Error) -> bool {
    matches!(
        e,
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation
    )
}

fn map_connection(row: &Row) -> rusqlite::Result<ConnectionRow> {
    Ok(ConnectionRow {
        id: row.get(0)?,
        requester_id: row.get(1)?,
        recipient_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_message(row: &Row) -> rusqlite::Result<MessageRow> {
    Ok(MessageRow {
        id: row.get(0)?,
        sender_id: row.get(1)?,
        recipient_id: row.get(2)?,
        message: row.get(3)?,
        is_read: row.get(4)?,
        created_at: row.get(5)?,
    })
}

fn map_tee_time(row: &Row) -> rusqlite::Result<TeeTimeRow> {
    Ok(TeeTimeRow {
        id: row.get(0)?,
        course_name: row.get(1)?,
        tee_time_date: row.get(2)?,
        tee_time_time: row.get(3)?,
        max_players: row.get(4)?,
        available_spots: row.get(5)?,
        handicap_requirement: row.get(6)?,
        description: row.get(7)?,
        creator_id: row.get(8)?,
        status: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn map_application(row: &Row) -> rusqlite::Result<ApplicationRow> {
    Ok(ApplicationRow {
        id: row.get(0)?,
        tee_time_id: row.get(1)?,
        applicant_id: row.get(2)?,
        status: row.get(3)?,
        created_at: row.get(4)?,
    })
}

fn map_round(row: &Row) -> rusqlite::Result<RoundRow> {
    Ok(RoundRow {
        id: row.get(0)?,
        user_id: row.get(1)?,
        course_id: row.get(2)?,
        course_name: row.get(3)?,
        date_played: row.get(4)?,
        total_score: row.get(5)?,
        par: row.get(6)?,
        holes_played: row.get(7)?,
        weather_conditions: row.get(8)?,
        notes: row.get(9)?,
        created_at: row.get(10)?,
    })
}

fn query_connection_by_id(conn: &Connection, id: &str) -> Result<Option<ConnectionRow>> {
    conn.query_row(
        "SELECT id, requester_id, recipient_id, status, created_at
         FROM user_connections WHERE id = ?1",
        [id],
        map_connection,
    )
    .optional()
}

fn query_message_by_id(conn: &Connection, id: &str) -> Result<Option<MessageRow>> {
    conn.query_row(
        "SELECT id, sender_id, recipient_id, message, is_read, created_at
         FROM direct_messages WHERE id = ?1",
        [id],
        map_message,
    )
    .optional()
}

fn query_tee_time_by_id(conn: &Connection, id: &str) -> Result<Option<TeeTimeRow>> {
    conn.query_row(
        "SELECT id, course_name, tee_time_date, tee_time_time, max_players,
                available_spots, handicap_requirement, description, creator_id,
                status, created_at
         FROM tee_times WHERE id = ?1",
        [id],
        map_tee_time,
    )
    .optional()
}

fn query_application(
    conn: &Connection,
    tee_time_id: &str,
    applicant_id: &str,
) -> Result<Option<ApplicationRow>> {
    conn.query_row(
        "SELECT id, tee_time_id, applicant_id, status, created_at
         FROM tee_time_applications
         WHERE tee_time_id = ?1 AND applicant_id = ?2",
        rusqlite::params![tee_time_id, applicant_id],
        map_application,
    )
    .optional()
}

fn query_round_by_id(conn: &Connection, id: &str) -> Result<Option<RoundRow>> {
    conn.query_row(
        "SELECT id, user_id, course_id, course_name, date_played, total_score,
                par, holes_played, weather_conditions, notes, created_at
         FROM golf_rounds WHERE id = ?1",
        [id],
        map_round,
    )
    .optional()
}

/// Extension trait for optional query results
trait OptionalExt<T> {
    fn optional(self) -> Result<Option<T>>;
}

impl<T> OptionalExt<T> for std::result::Result<T, rusqlite::Error> {
    fn optional(self) -> Result<Option<T>> {
        match self {
            Ok(val) => Ok(Some(val)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn test_db() -> Database {
        Database::open_in_memory().expect("in-memory db")
    }

    fn uid() -> String {
        Uuid::new_v4().to_string()
    }

    fn make_tee_time(db: &Database, creator: &str, max_players: i64) -> TeeTimeRow {
        let tee = NewTeeTime {
            id: &uid(),
            course_name: "Pebble Creek",
            tee_time_date: "2026-09-01",
            tee_time_time: "08:30",
            max_players,
            handicap_requirement: "Any level",
            description: "",
            creator_id: creator,
        };
        db.create_tee_time(&tee, &uid()).expect("create tee time")
    }

    #[test]
    fn connection_pair_is_unique_in_both_directions() {
        let db = test_db();
        let (a, b) = (uid(), uid());

        let first = db.create_connection(&uid(), &a, &b).unwrap();
        assert!(first.is_some());

        // same pair again, same direction
        assert!(db.create_connection(&uid(), &a, &b).unwrap().is_none());
        // same pair, roles swapped
        assert!(db.create_connection(&uid(), &b, &a).unwrap().is_none());

        // an unrelated pair sharing one side is fine
        let c = uid();
        assert!(db.create_connection(&uid(), &a, &c).unwrap().is_some());
    }

    #[test]
    fn declined_connection_still_blocks_a_rerequest() {
        let db = test_db();
        let (a, b) = (uid(), uid());

        let conn = db.create_connection(&uid(), &a, &b).unwrap().unwrap();
        let outcome = db.respond_connection(&conn.id, &b, "declined").unwrap();
        assert!(matches!(outcome, RespondOutcome::Updated(_)));

        assert!(db.create_connection(&uid(), &a, &b).unwrap().is_none());
    }

    #[test]
    fn only_the_recipient_may_answer_and_only_once() {
        let db = test_db();
        let (a, b) = (uid(), uid());
        let conn = db.create_connection(&uid(), &a, &b).unwrap().unwrap();

        // requester cannot answer their own request
        assert!(matches!(
            db.respond_connection(&conn.id, &a, "accepted").unwrap(),
            RespondOutcome::NotRecipient
        ));

        assert!(matches!(
            db.respond_connection(&conn.id, &b, "accepted").unwrap(),
            RespondOutcome::Updated(_)
        ));

        // terminal states stay terminal
        assert!(matches!(
            db.respond_connection(&conn.id, &b, "declined").unwrap(),
            RespondOutcome::NotPending(s) if s == "accepted"
        ));

        assert!(matches!(
            db.respond_connection(&uid(), &b, "accepted").unwrap(),
            RespondOutcome::NotFound
        ));
    }

    #[test]
    fn list_connections_sees_both_sides_and_filters_by_status() {
        let db = test_db();
        let (a, b, c) = (uid(), uid(), uid());

        db.create_connection(&uid(), &a, &b).unwrap().unwrap();
        let inbound = db.create_connection(&uid(), &c, &a).unwrap().unwrap();
        db.respond_connection(&inbound.id, &a, "accepted").unwrap();

        assert_eq!(db.list_connections(&a, None).unwrap().len(), 2);
        assert_eq!(db.list_connections(&a, Some("accepted")).unwrap().len(), 1);
        assert_eq!(db.list_connections(&b, None).unwrap().len(), 1);
    }

    #[test]
    fn message_fetch_is_pairwise_and_newest_first() {
        let db = test_db();
        let (a, b, c) = (uid(), uid(), uid());

        db.insert_message(&uid(), &a, &b, "first").unwrap();
        db.insert_message(&uid(), &b, &a, "second").unwrap();
        db.insert_message(&uid(), &a, &c, "other thread").unwrap();

        let thread = db.get_messages_between(&a, &b, 50, 0).unwrap();
        assert_eq!(thread.len(), 2);
        // same-second timestamps fall back to id ordering, so just check membership
        let bodies: Vec<_> = thread.iter().map(|m| m.message.as_str()).collect();
        assert!(bodies.contains(&"first") && bodies.contains(&"second"));

        let paged = db.get_messages_between(&a, &b, 1, 0).unwrap();
        assert_eq!(paged.len(), 1);
    }

    #[test]
    fn empty_message_bodies_are_rejected_by_the_store() {
        let db = test_db();
        let (a, b) = (uid(), uid());

        // the handlers trim and reject first; the CHECK constraint is the backstop
        assert!(db.insert_message(&uid(), &a, &b, "").is_err());
        assert_eq!(db.get_messages_between(&a, &b, 50, 0).unwrap().len(), 0);
    }

    #[test]
    fn mark_read_only_touches_inbound_and_is_idempotent() {
        let db = test_db();
        let (a, b) = (uid(), uid());

        db.insert_message(&uid(), &a, &b, "hello").unwrap();
        db.insert_message(&uid(), &b, &a, "hi back").unwrap();

        // b reads the thread with a
        assert_eq!(db.mark_messages_read(&b, &a).unwrap(), 1);
        assert_eq!(db.mark_messages_read(&b, &a).unwrap(), 0);

        let thread = db.get_messages_between(&a, &b, 50, 0).unwrap();
        for msg in thread {
            if msg.recipient_id == b {
                assert!(msg.is_read);
            } else {
                assert!(!msg.is_read, "a's inbound message must stay unread");
            }
        }
    }

    #[test]
    fn creating_a_tee_time_seats_the_creator() {
        let db = test_db();
        let creator = uid();

        let tee = make_tee_time(&db, &creator, 4);
        assert_eq!(tee.max_players, 4);
        assert_eq!(tee.available_spots, 3);
        assert_eq!(tee.status, "active");

        let app = db
            .with_conn(|conn| query_application(conn, &tee.id, &creator))
            .unwrap()
            .expect("creator application");
        assert_eq!(app.status, "approved");
    }

    #[test]
    fn duplicate_applications_are_rejected() {
        let db = test_db();
        let (creator, applicant) = (uid(), uid());
        let tee = make_tee_time(&db, &creator, 4);

        assert!(db.insert_application(&uid(), &tee.id, &applicant).unwrap().is_some());
        assert!(db.insert_application(&uid(), &tee.id, &applicant).unwrap().is_none());
        // the creator's auto-approved seat also blocks a self-application
        assert!(db.insert_application(&uid(), &tee.id, &creator).unwrap().is_none());
    }

    #[test]
    fn approving_the_last_seat_fills_the_slot() {
        let db = test_db();
        let (creator, x) = (uid(), uid());
        let tee = make_tee_time(&db, &creator, 2);
        assert_eq!(tee.available_spots, 1);

        db.insert_application(&uid(), &tee.id, &x).unwrap().unwrap();
        let outcome = db.decide_application(&tee.id, &x, true).unwrap();
        match outcome {
            DecisionOutcome::Decided {
                application,
                available_spots,
            } => {
                assert_eq!(application.status, "approved");
                assert_eq!(available_spots, Some(0));
            }
            _ => panic!("expected approval"),
        }

        let after = db.get_tee_time(&tee.id).unwrap().unwrap();
        assert_eq!(after.available_spots, 0);
        assert_eq!(after.status, "full");
    }

    #[test]
    fn seats_never_go_negative() {
        let db = test_db();
        let (creator, x, y) = (uid(), uid(), uid());
        let tee = make_tee_time(&db, &creator, 2);

        db.insert_application(&uid(), &tee.id, &x).unwrap().unwrap();
        db.insert_application(&uid(), &tee.id, &y).unwrap().unwrap();

        assert!(matches!(
            db.decide_application(&tee.id, &x, true).unwrap(),
            DecisionOutcome::Decided { .. }
        ));
        // second approval finds no seat and must not touch the application
        assert!(matches!(
            db.decide_application(&tee.id, &y, true).unwrap(),
            DecisionOutcome::SlotFull
        ));

        let after = db.get_tee_time(&tee.id).unwrap().unwrap();
        assert_eq!(after.available_spots, 0);
        let y_app = db
            .with_conn(|conn| query_application(conn, &tee.id, &y))
            .unwrap()
            .unwrap();
        assert_eq!(y_app.status, "pending");
    }

    #[test]
    fn declining_frees_no_seat_and_is_terminal() {
        let db = test_db();
        let (creator, x) = (uid(), uid());
        let tee = make_tee_time(&db, &creator, 3);

        db.insert_application(&uid(), &tee.id, &x).unwrap().unwrap();
        assert!(matches!(
            db.decide_application(&tee.id, &x, false).unwrap(),
            DecisionOutcome::Decided { available_spots: None, .. }
        ));

        let after = db.get_tee_time(&tee.id).unwrap().unwrap();
        assert_eq!(after.available_spots, 2);

        assert!(matches!(
            db.decide_application(&tee.id, &x, true).unwrap(),
            DecisionOutcome::AlreadyDecided(s) if s == "declined"
        ));
    }

    #[test]
    fn seat_accounting_balances_against_approvals() {
        let db = test_db();
        let creator = uid();
        let tee = make_tee_time(&db, &creator, 4);

        let applicants: Vec<String> = (0..3).map(|_| uid()).collect();
        for a in &applicants {
            db.insert_application(&uid(), &tee.id, a).unwrap().unwrap();
        }
        for a in applicants.iter().take(2) {
            db.decide_application(&tee.id, a, true).unwrap();
        }

        let after = db.get_tee_time(&tee.id).unwrap().unwrap();
        let approved: i64 = db
            .with_conn(|conn| {
                let n = conn.query_row(
                    "SELECT COUNT(*) FROM tee_time_applications
                     WHERE tee_time_id = ?1 AND status = 'approved'",
                    [&tee.id],
                    |row| row.get(0),
                )?;
                Ok(n)
            })
            .unwrap();

        // creator + 2 approvals
        assert_eq!(approved, 3);
        assert_eq!(approved + after.available_spots, after.max_players);
    }

    #[test]
    fn rounds_and_details_round_trip() {
        let db = test_db();
        let user = uid();

        let round = db
            .insert_round(&NewRound {
                id: &uid(),
                user_id: &user,
                course_id: None,
                course_name: "Augusta Municipal",
                date_played: "2026-07-04",
                total_score: Some(82),
                par: Some(72),
                holes_played: Some(18),
                weather_conditions: Some("windy"),
                notes: None,
            })
            .unwrap();

        db.insert_round_details(
            &round.id,
            &[
                HoleDetail {
                    hole_number: 1,
                    par: 4,
                    score: 4,
                    putts: Some(2),
                    fairway_hit: true,
                    green_in_regulation: true,
                    sand_saves: 0,
                },
                HoleDetail {
                    hole_number: 2,
                    par: 3,
                    score: 2,
                    putts: Some(1),
                    fairway_hit: false,
                    green_in_regulation: true,
                    sand_saves: 0,
                },
            ],
        )
        .unwrap();

        assert_eq!(db.count_rounds(&user).unwrap(), 1);
        let rounds = db.get_rounds(&user).unwrap();
        assert_eq!(rounds.len(), 1);

        let details = db.get_details_for_rounds(&[round.id.clone()]).unwrap();
        assert_eq!(details.len(), 2);
        assert_eq!(details[0].hole_number, 1);
    }

    #[test]
    fn raise_achievement_is_monotonic() {
        let db = test_db();
        let user = uid();

        db.raise_achievement(&user, "rounds_played", 3).unwrap();
        assert_eq!(db.get_achievement(&user, "rounds_played").unwrap(), Some(3));

        // a stale lower total cannot pull the value back down
        db.raise_achievement(&user, "rounds_played", 2).unwrap();
        assert_eq!(db.get_achievement(&user, "rounds_played").unwrap(), Some(3));

        db.raise_achievement(&user, "rounds_played", 5).unwrap();
        assert_eq!(db.get_achievement(&user, "rounds_played").unwrap(), Some(5));
    }

    #[test]
    fn add_achievement_accumulates() {
        let db = test_db();
        let user = uid();

        db.add_achievement(&user, "birdies", 2).unwrap();
        db.add_achievement(&user, "birdies", 1).unwrap();
        assert_eq!(db.get_achievement(&user, "birdies").unwrap(), Some(3));

        assert_eq!(db.get_achievement(&user, "eagles").unwrap(), None);
    }
}
