//! `extract_expense_types` and `extract_transactions` queries

use chrono::NaiveDate;
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::decimal;
use crate::db::models::{ExtractExpenseType, ExtractTransaction, NewExtractTransaction};
use crate::error::{AppError, Result};

const TX_COLUMNS: &str = "id, user_id, expense_type_id, transaction_date, description, amount";

fn map_type(row: &Row<'_>) -> rusqlite::Result<ExtractExpenseType> {
    Ok(ExtractExpenseType {
        id: row.get("id")?,
        name: row.get("name")?,
    })
}

fn map_transaction(row: &Row<'_>) -> rusqlite::Result<ExtractTransaction> {
    Ok(ExtractTransaction {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        expense_type_id: row.get("expense_type_id")?,
        transaction_date: row.get("transaction_date")?,
        description: row.get("description")?,
        amount: decimal(row, "amount")?,
    })
}

/// All extract expense types, ordered by name
pub fn find_all_types(conn: &Connection) -> Result<Vec<ExtractExpenseType>> {
    let mut stmt = conn.prepare("SELECT id, name FROM extract_expense_types ORDER BY name, id")?;
    let rows = stmt.query_map([], map_type)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// id = ?; optional single
pub fn find_type_by_id(conn: &Connection, id: i64) -> Result<Option<ExtractExpenseType>> {
    Ok(conn
        .query_row(
            "SELECT id, name FROM extract_expense_types WHERE id = ?1",
            params![id],
            map_type,
        )
        .optional()?)
}

pub fn insert_type(conn: &Connection, name: &str) -> Result<ExtractExpenseType> {
    conn.execute(
        "INSERT INTO extract_expense_types(name) VALUES (?1)",
        params![name],
    )?;
    Ok(ExtractExpenseType {
        id: conn.last_insert_rowid(),
        name: name.to_string(),
    })
}

/// Delete a type unless transactions still reference it.
///
/// Returns whether a row was removed; a referenced type is a `Conflict`.
pub fn delete_type(conn: &mut Connection, id: i64) -> Result<bool> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let in_use = count_by_expense_type(&tx, id)?;
    if in_use > 0 {
        return Err(AppError::Conflict(format!(
            "extract expense type {id} is used by {in_use} transaction(s)"
        )));
    }
    let removed = tx.execute("DELETE FROM extract_expense_types WHERE id = ?1", params![id])?;
    tx.commit()?;
    Ok(removed > 0)
}

/// user = U; transactionDate desc; list
pub fn find_by_user(conn: &Connection, user_id: i64) -> Result<Vec<ExtractTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TX_COLUMNS} FROM extract_transactions
         WHERE user_id = ?1
         ORDER BY transaction_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_transaction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// user = U and start <= transactionDate <= end; transactionDate desc; list
pub fn find_by_user_between(
    conn: &Connection,
    user_id: i64,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<ExtractTransaction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TX_COLUMNS} FROM extract_transactions
         WHERE user_id = ?1 AND transaction_date BETWEEN ?2 AND ?3
         ORDER BY transaction_date DESC, id DESC"
    ))?;
    let rows = stmt.query_map(params![user_id, start, end], map_transaction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// expenseType = T; scalar count
pub fn count_by_expense_type(conn: &Connection, expense_type_id: i64) -> Result<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM extract_transactions WHERE expense_type_id = ?1",
        params![expense_type_id],
        |r| r.get(0),
    )?)
}

pub fn insert_transaction(
    conn: &Connection,
    transaction: &NewExtractTransaction,
) -> Result<ExtractTransaction> {
    conn.execute(
        "INSERT INTO extract_transactions(user_id, expense_type_id, transaction_date, description, amount)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            transaction.user_id,
            transaction.expense_type_id,
            transaction.transaction_date,
            transaction.description,
            transaction.amount.to_string()
        ],
    )?;
    Ok(ExtractTransaction {
        id: conn.last_insert_rowid(),
        user_id: transaction.user_id,
        expense_type_id: transaction.expense_type_id,
        transaction_date: transaction.transaction_date,
        description: transaction.description.clone(),
        amount: transaction.amount,
    })
}

pub fn delete_transaction(conn: &Connection, id: i64) -> Result<bool> {
    Ok(conn.execute("DELETE FROM extract_transactions WHERE id = ?1", params![id])? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use rust_decimal::Decimal;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn add(conn: &Connection, user_id: i64, type_id: i64, on: NaiveDate) -> ExtractTransaction {
        insert_transaction(
            conn,
            &NewExtractTransaction {
                user_id,
                expense_type_id: type_id,
                transaction_date: on,
                description: format!("compra {on}"),
                amount: Decimal::new(4_250, 2),
            },
        )
        .unwrap()
    }

    #[test]
    fn test_by_user_is_date_descending() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let other = fixtures::user(&conn, "b@lar.local");
        let kind = fixtures::extract_type(&conn, "Mercado");
        add(&conn, user, kind, date(2024, 1, 10));
        add(&conn, user, kind, date(2024, 3, 2));
        add(&conn, user, kind, date(2023, 12, 31));
        add(&conn, other, kind, date(2024, 2, 1));

        let dates: Vec<_> = find_by_user(&conn, user)
            .unwrap()
            .into_iter()
            .map(|t| t.transaction_date)
            .collect();
        assert_eq!(
            dates,
            vec![date(2024, 3, 2), date(2024, 1, 10), date(2023, 12, 31)]
        );
    }

    #[test]
    fn test_date_range_is_inclusive_and_descending() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let kind = fixtures::extract_type(&conn, "Mercado");
        for on in [
            date(2023, 12, 31),
            date(2024, 1, 1),
            date(2024, 1, 15),
            date(2024, 1, 31),
            date(2024, 2, 1),
        ] {
            add(&conn, user, kind, on);
        }

        let found = find_by_user_between(&conn, user, date(2024, 1, 1), date(2024, 1, 31)).unwrap();
        let dates: Vec<_> = found.iter().map(|t| t.transaction_date).collect();
        assert_eq!(
            dates,
            vec![date(2024, 1, 31), date(2024, 1, 15), date(2024, 1, 1)]
        );
        assert!(dates.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_type_delete_is_guarded_by_usage() {
        let mut conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let used = insert_type(&conn, "Farmácia").unwrap();
        let unused = insert_type(&conn, "Pet").unwrap();
        let t = add(&conn, user, used.id, date(2024, 1, 5));

        assert_eq!(count_by_expense_type(&conn, used.id).unwrap(), 1);
        assert_eq!(count_by_expense_type(&conn, unused.id).unwrap(), 0);
        assert!(matches!(
            delete_type(&mut conn, used.id),
            Err(AppError::Conflict(_))
        ));
        assert!(delete_type(&mut conn, unused.id).unwrap());

        assert!(delete_transaction(&conn, t.id).unwrap());
        assert!(delete_type(&mut conn, used.id).unwrap());
        assert_eq!(find_type_by_id(&conn, used.id).unwrap(), None);
        assert!(find_all_types(&conn).unwrap().is_empty());
    }
}
