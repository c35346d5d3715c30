//! `salaries`, `salary_conversions` and `salary_deductions` queries

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::decimal;
use crate::db::models::{
    NewSalaryConversion, NewSalaryDeduction, Salary, SalaryConversion, SalaryDeduction,
    SalaryInput,
};
use crate::error::{AppError, Result};

const DEDUCTION_COLUMNS: &str = "id, user_id, month, year, description, amount, due_date";

fn map_salary(row: &Row<'_>) -> rusqlite::Result<Salary> {
    Ok(Salary {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        gross_amount: decimal(row, "gross_amount")?,
        net_amount: decimal(row, "net_amount")?,
        currency: row.get("currency")?,
    })
}

fn map_conversion(row: &Row<'_>) -> rusqlite::Result<SalaryConversion> {
    Ok(SalaryConversion {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        month: row.get("month")?,
        year: row.get("year")?,
        original_amount: decimal(row, "original_amount")?,
        currency: row.get("currency")?,
        exchange_rate: decimal(row, "exchange_rate")?,
        converted_amount: decimal(row, "converted_amount")?,
    })
}

fn map_deduction(row: &Row<'_>) -> rusqlite::Result<SalaryDeduction> {
    Ok(SalaryDeduction {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        month: row.get("month")?,
        year: row.get("year")?,
        description: row.get("description")?,
        amount: decimal(row, "amount")?,
        due_date: row.get("due_date")?,
    })
}

/// user = U (unique); optional single
pub fn find_by_user(conn: &Connection, user_id: i64) -> Result<Option<Salary>> {
    Ok(conn
        .query_row(
            "SELECT id, user_id, gross_amount, net_amount, currency
             FROM salaries WHERE user_id = ?1",
            params![user_id],
            map_salary,
        )
        .optional()?)
}

/// Insert or replace the single salary row of a user
pub fn upsert(conn: &Connection, user_id: i64, salary: &SalaryInput) -> Result<Salary> {
    conn.execute(
        "INSERT INTO salaries(user_id, gross_amount, net_amount, currency)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             gross_amount = excluded.gross_amount,
             net_amount = excluded.net_amount,
             currency = excluded.currency",
        params![
            user_id,
            salary.gross_amount.to_string(),
            salary.net_amount.to_string(),
            salary.currency
        ],
    )?;
    let id = conn.query_row(
        "SELECT id FROM salaries WHERE user_id = ?1",
        params![user_id],
        |r| r.get(0),
    )?;
    Ok(Salary {
        id,
        user_id,
        gross_amount: salary.gross_amount,
        net_amount: salary.net_amount,
        currency: salary.currency.clone(),
    })
}

/// user = U, month = M, year = Y; list
pub fn find_conversions(
    conn: &Connection,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<SalaryConversion>> {
    let mut stmt = conn.prepare(
        "SELECT id, user_id, month, year, original_amount, currency, exchange_rate, converted_amount
         FROM salary_conversions
         WHERE user_id = ?1 AND month = ?2 AND year = ?3
         ORDER BY id",
    )?;
    let rows = stmt.query_map(params![user_id, month, year], map_conversion)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Record a conversion; the converted amount is original times rate
pub fn insert_conversion(
    conn: &Connection,
    conversion: &NewSalaryConversion,
) -> Result<SalaryConversion> {
    let converted = conversion
        .original_amount
        .checked_mul(conversion.exchange_rate)
        .ok_or_else(|| AppError::Validation("converted amount overflows".into()))?
        .round_dp(2);
    conn.execute(
        "INSERT INTO salary_conversions(user_id, month, year, original_amount, currency, exchange_rate, converted_amount)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            conversion.user_id,
            conversion.month,
            conversion.year,
            conversion.original_amount.to_string(),
            conversion.currency,
            conversion.exchange_rate.to_string(),
            converted.to_string()
        ],
    )?;
    Ok(SalaryConversion {
        id: conn.last_insert_rowid(),
        user_id: conversion.user_id,
        month: conversion.month,
        year: conversion.year,
        original_amount: conversion.original_amount,
        currency: conversion.currency.clone(),
        exchange_rate: conversion.exchange_rate,
        converted_amount: converted,
    })
}

/// user = U, month = M, year = Y; dueDate asc; list
pub fn find_deductions_by_period(
    conn: &Connection,
    user_id: i64,
    month: u32,
    year: i32,
) -> Result<Vec<SalaryDeduction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DEDUCTION_COLUMNS} FROM salary_deductions
         WHERE user_id = ?1 AND month = ?2 AND year = ?3
         ORDER BY due_date ASC, id"
    ))?;
    let rows = stmt.query_map(params![user_id, month, year], map_deduction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// user = U; year desc, month desc, dueDate asc; list
pub fn find_deductions_by_user(conn: &Connection, user_id: i64) -> Result<Vec<SalaryDeduction>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DEDUCTION_COLUMNS} FROM salary_deductions
         WHERE user_id = ?1
         ORDER BY year DESC, month DESC, due_date ASC, id"
    ))?;
    let rows = stmt.query_map(params![user_id], map_deduction)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert_deduction(
    conn: &Connection,
    deduction: &NewSalaryDeduction,
) -> Result<SalaryDeduction> {
    conn.execute(
        "INSERT INTO salary_deductions(user_id, month, year, description, amount, due_date)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            deduction.user_id,
            deduction.month,
            deduction.year,
            deduction.description,
            deduction.amount.to_string(),
            deduction.due_date
        ],
    )?;
    Ok(SalaryDeduction {
        id: conn.last_insert_rowid(),
        user_id: deduction.user_id,
        month: deduction.month,
        year: deduction.year,
        description: deduction.description.clone(),
        amount: deduction.amount,
        due_date: deduction.due_date,
    })
}

pub fn delete_deduction(conn: &Connection, id: i64) -> Result<bool> {
    Ok(conn.execute("DELETE FROM salary_deductions WHERE id = ?1", params![id])? > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn deduction(user_id: i64, month: u32, year: i32, day: u32) -> NewSalaryDeduction {
        NewSalaryDeduction {
            user_id,
            month,
            year,
            description: format!("parcela {year}-{month}-{day}"),
            amount: Decimal::new(25_000, 2),
            due_date: NaiveDate::from_ymd_opt(year, month, day).unwrap(),
        }
    }

    #[test]
    fn test_salary_upsert_keeps_one_row() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let first = upsert(
            &conn,
            user,
            &SalaryInput {
                gross_amount: Decimal::from(10_000),
                net_amount: Decimal::from(7_800),
                currency: "BRL".to_string(),
            },
        )
        .unwrap();
        let second = upsert(
            &conn,
            user,
            &SalaryInput {
                gross_amount: Decimal::from(12_000),
                net_amount: Decimal::from(9_100),
                currency: "BRL".to_string(),
            },
        )
        .unwrap();

        assert_eq!(first.id, second.id);
        let found = find_by_user(&conn, user).unwrap().unwrap();
        assert_eq!(found.net_amount, Decimal::from(9_100));
        assert_eq!(find_by_user(&conn, user + 1).unwrap(), None);
    }

    #[test]
    fn test_conversion_computes_converted_amount() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let saved = insert_conversion(
            &conn,
            &NewSalaryConversion {
                user_id: user,
                month: 4,
                year: 2024,
                original_amount: Decimal::from(2_000),
                currency: "USD".to_string(),
                exchange_rate: Decimal::new(5_1234, 4),
            },
        )
        .unwrap();
        assert_eq!(saved.converted_amount, Decimal::new(10_246_80, 2));

        assert_eq!(find_conversions(&conn, user, 4, 2024).unwrap(), vec![saved]);
        assert!(find_conversions(&conn, user, 5, 2024).unwrap().is_empty());
    }

    #[test]
    fn test_conversion_overflow_is_rejected() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        let err = insert_conversion(
            &conn,
            &NewSalaryConversion {
                user_id: user,
                month: 4,
                year: 2024,
                original_amount: Decimal::MAX,
                currency: "USD".to_string(),
                exchange_rate: Decimal::new(525, 2),
            },
        )
        .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
        assert!(find_conversions(&conn, user, 4, 2024).unwrap().is_empty());
    }

    #[test]
    fn test_deductions_by_period_order_by_due_date() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        insert_deduction(&conn, &deduction(user, 6, 2024, 20)).unwrap();
        insert_deduction(&conn, &deduction(user, 6, 2024, 5)).unwrap();
        insert_deduction(&conn, &deduction(user, 7, 2024, 1)).unwrap();

        let days: Vec<_> = find_deductions_by_period(&conn, user, 6, 2024)
            .unwrap()
            .into_iter()
            .map(|d| d.due_date.to_string())
            .collect();
        assert_eq!(days, vec!["2024-06-05", "2024-06-20"]);
    }

    #[test]
    fn test_deductions_across_periods() {
        let conn = fixtures::conn();
        let user = fixtures::user(&conn, "a@lar.local");
        insert_deduction(&conn, &deduction(user, 12, 2023, 10)).unwrap();
        insert_deduction(&conn, &deduction(user, 2, 2024, 15)).unwrap();
        insert_deduction(&conn, &deduction(user, 2, 2024, 3)).unwrap();
        insert_deduction(&conn, &deduction(user, 11, 2023, 28)).unwrap();

        let order: Vec<_> = find_deductions_by_user(&conn, user)
            .unwrap()
            .into_iter()
            .map(|d| d.due_date.to_string())
            .collect();
        assert_eq!(
            order,
            vec!["2024-02-03", "2024-02-15", "2023-12-10", "2023-11-28"]
        );
    }
}
