//! `expense_types` queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::db::models::ExpenseType;
use crate::error::Result;

fn map_row(row: &Row<'_>) -> rusqlite::Result<ExpenseType> {
    Ok(ExpenseType {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

/// All expense types, ordered by name
pub fn find_all(conn: &Connection) -> Result<Vec<ExpenseType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM expense_types ORDER BY name, id")?;
    let rows = stmt.query_map([], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// id = ?; optional single
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<ExpenseType>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM expense_types WHERE id = ?1",
            params![id],
            map_row,
        )
        .optional()?)
}

/// name = ? (unique); optional single
pub fn find_by_name(conn: &Connection, name: &str) -> Result<Option<ExpenseType>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM expense_types WHERE name = ?1",
            params![name],
            map_row,
        )
        .optional()?)
}

pub fn count(conn: &Connection) -> Result<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM expense_types", [], |r| r.get(0))?)
}

pub fn insert(conn: &Connection, name: &str) -> Result<ExpenseType> {
    conn.execute("INSERT INTO expense_types(name) VALUES (?1)", params![name])?;
    Ok(ExpenseType {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;

    #[test]
    fn test_lookup_by_name_and_order() {
        let conn = fixtures::conn();
        insert(&conn, "Mercado").unwrap();
        let aluguel = insert(&conn, "Aluguel").unwrap();

        assert_eq!(find_by_name(&conn, "Aluguel").unwrap(), Some(aluguel.clone()));
        assert_eq!(find_by_id(&conn, aluguel.id).unwrap(), Some(aluguel));
        assert_eq!(find_by_name(&conn, "Viagem").unwrap(), None);

        let names: Vec<_> = find_all(&conn).unwrap().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["Aluguel", "Mercado"]);
    }
}
