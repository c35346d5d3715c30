//! `expenses` queries
//!
//! At most one row per (year, month, expense type, user). Writes go through
//! [`upsert`], which checks and writes inside one immediate transaction.

use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::decimal;
use crate::db::models::{Expense, NewExpense};
use crate::error::Result;

const COLUMNS: &str = "id, year, month, expense_type_id, user_id, amount";

fn map_row(row: &Row<'_>) -> rusqlite::Result<Expense> {
    Ok(Expense {
        id: row.get("id")?,
        year: row.get("year")?,
        month: row.get("month")?,
        expense_type_id: row.get("expense_type_id")?,
        user_id: row.get("user_id")?,
        amount: decimal(row, "amount")?,
    })
}

/// year = Y; list
pub fn find_by_year(conn: &Connection, year: i32) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM expenses WHERE year = ?1 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![year], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// year = Y and month = M; list
pub fn find_by_year_and_month(conn: &Connection, year: i32, month: u32) -> Result<Vec<Expense>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {COLUMNS} FROM expenses WHERE year = ?1 AND month = ?2 ORDER BY id"
    ))?;
    let rows = stmt.query_map(params![year, month], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Exact match on all four keys; optional single
pub fn find_by_year_month_type_user(
    conn: &Connection,
    year: i32,
    month: u32,
    expense_type_id: i64,
    user_id: i64,
) -> Result<Option<Expense>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM expenses
                 WHERE year = ?1 AND month = ?2 AND expense_type_id = ?3 AND user_id = ?4"
            ),
            params![year, month, expense_type_id, user_id],
            map_row,
        )
        .optional()?)
}

/// Exact match on year, month and type, any user; optional single.
///
/// Several users may share a period and type; the lowest id wins so
/// repeated calls return the same row.
pub fn find_by_year_month_type(
    conn: &Connection,
    year: i32,
    month: u32,
    expense_type_id: i64,
) -> Result<Option<Expense>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {COLUMNS} FROM expenses
                 WHERE year = ?1 AND month = ?2 AND expense_type_id = ?3
                 ORDER BY id LIMIT 1"
            ),
            params![year, month, expense_type_id],
            map_row,
        )
        .optional()?)
}

/// id = ?; optional single
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<Expense>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM expenses WHERE id = ?1"),
            params![id],
            map_row,
        )
        .optional()?)
}

/// Insert or update the row keyed by (year, month, type, user)
pub fn upsert(conn: &mut Connection, expense: &NewExpense) -> Result<Expense> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    let existing = find_by_year_month_type_user(
        &tx,
        expense.year,
        expense.month,
        expense.expense_type_id,
        expense.user_id,
    )?;
    let amount = expense.amount.to_string();
    let id = match existing {
        Some(found) => {
            tx.execute(
                "UPDATE expenses SET amount = ?1 WHERE id = ?2",
                params![amount, found.id],
            )?;
            found.id
        }
        None => {
            tx.execute(
                "INSERT INTO expenses(year, month, expense_type_id, user_id, amount)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![
                    expense.year,
                    expense.month,
                    expense.expense_type_id,
                    expense.user_id,
                    amount
                ],
            )?;
            tx.last_insert_rowid()
        }
    };
    tx.commit()?;

    Ok(Expense {
        id,
        year: expense.year,
        month: expense.month,
        expense_type_id: expense.expense_type_id,
        user_id: expense.user_id,
        amount: expense.amount,
    })
}

/// Returns whether a row was removed
pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    Ok(conn.execute("DELETE FROM expenses WHERE id = ?1", params![id])? > 0)
}
