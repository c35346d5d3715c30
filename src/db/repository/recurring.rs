//! `recurring_expenses` queries

use rusqlite::{params, Connection, Row};

use super::decimal;
use crate::db::models::{NewRecurringExpense, RecurringExpense};
use crate::error::Result;

fn map_row(row: &Row<'_>) -> rusqlite::Result<RecurringExpense> {
    Ok(RecurringExpense {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        description: row.get("description")?,
        amount: decimal(row, "amount")?,
        day_of_month: row.get("day_of_month")?,
        expense_type_id: row.get("expense_type_id")?,
        active: row.get("active")?,
    })
}

/// user = U; dayOfMonth asc; list
pub fn find_by_user(conn: &Connection, user_id: i64) -> Result<Vec<RecurringExpense>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, description, amount, day_of_month, expense_type_id, active
         FROM recurring_expenses
         WHERE user_id = ?1
         ORDER BY day_of_month, id",
    )?;
    let rows = stmt.query_map(params![user_id], map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert(conn: &Connection, expense: &NewRecurringExpense) -> Result<RecurringExpense> {
    conn.execute(
        "INSERT INTO recurring_expenses(user_id, description, amount, day_of_month, expense_type_id, active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            expense.user_id,
            expense.description,
            expense.amount.to_string(),
            expense.day_of_month,
            expense.expense_type_id,
            expense.active
        ],
    )?;
    Ok(RecurringExpense {
        id: conn.last_insert_rowid(),
        user_id: expense.user_id,
        description: expense.description.clone(),
        amount: expense.amount,
        day_of_month: expense.day_of_month,
        expense_type_id: expense.expense_type_id,
        active: expense.active,
    })
}

pub fn delete(conn: &Connection, id: i64) -> Result<bool> {
    Ok(conn.execute("DELETE FROM recurring_expenses WHERE id = ?1", params![id])? > 0)
}
