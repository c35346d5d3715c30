//! Per-table query functions
//!
//! Every query has a fixed predicate, ordering and cardinality, documented
//! on the function. Single-row lookups return `Option`, multi-row lookups
//! return `Vec`, bulk writes return the number of rows touched.

pub mod analysis;
pub mod expense;
pub mod expense_type;
pub mod extract;
pub mod holdings;
pub mod portfolio;
pub mod recurring;
pub mod salary;
pub mod user;

use rusqlite::Row;
use rust_decimal::Decimal;

use super::Amount;

/// Read a decimal TEXT column
pub(crate) fn decimal(row: &Row<'_>, column: &str) -> rusqlite::Result<Decimal> {
    row.get::<_, Amount>(column).map(|a| a.0)
}

/// Read a nullable decimal TEXT column
pub(crate) fn optional_decimal(row: &Row<'_>, column: &str) -> rusqlite::Result<Option<Decimal>> {
    row.get::<_, Option<Amount>>(column)
        .map(|a| a.map(|a| a.0))
}

#[cfg(test)]
pub(crate) mod fixtures {
    //! Shared setup for repository tests

    use rusqlite::{params, Connection};

    use crate::db::schema;

    pub fn conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        schema::init_schema(&conn).unwrap();
        conn
    }

    pub fn user(conn: &Connection, email: &str) -> i64 {
        conn.execute(
            "INSERT INTO users(email, name, color) VALUES (?1, ?2, '#000000')",
            params![email, email],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn expense_type(conn: &Connection, name: &str) -> i64 {
        conn.execute("INSERT INTO expense_types(name) VALUES (?1)", params![name])
            .unwrap();
        conn.last_insert_rowid()
    }

    pub fn extract_type(conn: &Connection, name: &str) -> i64 {
        conn.execute(
            "INSERT INTO extract_expense_types(name) VALUES (?1)",
            params![name],
        )
        .unwrap();
        conn.last_insert_rowid()
    }

    pub fn portfolio(conn: &Connection, user_id: i64) -> i64 {
        conn.execute(
            "INSERT INTO user_portfolios(user_id, name, risk_profile, monthly_contribution)
             VALUES (?1, 'Principal', 'MODERATE', '1000')",
            params![user_id],
        )
        .unwrap();
        conn.last_insert_rowid()
    }
}
