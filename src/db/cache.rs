//! Last-attendance display cache.
//!
//! Written after each successful action, read only to render a hint.

use crate::errors::AppResult;
use crate::models::attendance::parse_timestamp;
use crate::models::coordinate::Coordinate;
use crate::models::last_attendance::{AttendanceAction, LastAttendance};
use rusqlite::{Connection, OptionalExtension, params};

/// Overwrite the cached entry.
pub fn store(conn: &Connection, entry: &LastAttendance) -> AppResult<()> {
    conn.execute(
        "INSERT INTO last_attendance
            (slot, action, timestamp, asset_id, asset_name, latitude, longitude)
         VALUES (1, ?1, ?2, ?3, ?4, ?5, ?6)
         ON CONFLICT(slot) DO UPDATE SET
            action = excluded.action,
            timestamp = excluded.timestamp,
            asset_id = excluded.asset_id,
            asset_name = excluded.asset_name,
            latitude = excluded.latitude,
            longitude = excluded.longitude",
        params![
            entry.action.to_db_str(),
            entry.timestamp.to_rfc3339(),
            entry.asset_id,
            entry.asset_name,
            entry.position.latitude,
            entry.position.longitude,
        ],
    )?;
    Ok(())
}

/// Best effort: an unreadable row reads as "nothing cached".
pub fn load(conn: &Connection) -> AppResult<Option<LastAttendance>> {
    let row = conn
        .query_row(
            "SELECT action, timestamp, asset_id, asset_name, latitude, longitude
             FROM last_attendance WHERE slot = 1",
            [],
            |row| {
                Ok((
                    row.get::<_, String>(0)?,
                    row.get::<_, String>(1)?,
                    row.get::<_, String>(2)?,
                    row.get::<_, String>(3)?,
                    row.get::<_, f64>(4)?,
                    row.get::<_, f64>(5)?,
                ))
            },
        )
        .optional()?;

    Ok(row.and_then(|(action, ts, asset_id, asset_name, lat, lon)| {
        Some(LastAttendance {
            action: AttendanceAction::from_db_str(&action)?,
            timestamp: parse_timestamp(&ts)?,
            asset_id,
            asset_name,
            position: Coordinate::new(lat, lon),
        })
    }))
}

pub fn clear(conn: &Connection) -> AppResult<()> {
    conn.execute("DELETE FROM last_attendance", [])?;
    Ok(())
}
