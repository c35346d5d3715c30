//! `users` queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::{NewUser, User};
use crate::error::Result;

const COLUMNS: &str = "id, email, name, color";

fn map_row(row: &Row<'_>) -> rusqlite::Result<User> {
    Ok(User {
        id: row.get("id")?,
        email: row.get("email")?,
        name: row.get("name")?,
        color: row.get("color")?,
    })
}

/// All users, ordered by name
pub fn find_all(conn: &Connection) -> Result<Vec<User>> {
    let mut stmt = conn.prepare(&format!("SELECT {COLUMNS} FROM users ORDER BY name, id"))?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// id = ?; optional single
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()?)
}

/// email = ? (unique); optional single
pub fn find_by_email(conn: &Connection, email: &str) -> Result<Option<User>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM users WHERE email = ?1"),
            params![email],
            map_row,
        )
        .optional()?)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM users", [], |r| r.get(0))?)
}

pub fn insert(conn: &Connection, user: &NewUser) -> Result<User> {
    conn.execute(
        "INSERT INTO users(email, name, color) VALUES (?1, ?2, ?3)",
        params![user.email, user.name, user.color],
    )?;
    Ok(User {
        id: conn.last_insert_rowid(),
        email: user.email.clone(),
        name: user.name.clone(),
        color: user.color.clone(),
    })
}
