//! `user_portfolios` and `user_real_portfolios` queries

use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};

use super::decimal;
use crate::db::models::{NewUserRealPortfolio, UserPortfolio, UserPortfolioInput, UserRealPortfolio};
use crate::error::{AppError, Result};

const PORTFOLIO_COLUMNS: &str = "id, user_id, name, risk_profile, monthly_contribution";
const REAL_COLUMNS: &str = "id, user_id, report_month, report_year, total_value, report";

fn map_portfolio(row: &Row<'_>) -> rusqlite::Result<UserPortfolio> {
    Ok(UserPortfolio {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        name: row.get("name")?,
        risk_profile: row.get("risk_profile")?,
        monthly_contribution: decimal(row, "monthly_contribution")?,
    })
}

fn map_real(row: &Row<'_>) -> rusqlite::Result<UserRealPortfolio> {
    let raw: String = row.get("report")?;
    let report = serde_json::from_str(&raw)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(5, Type::Text, Box::new(e)))?;
    Ok(UserRealPortfolio {
        id: row.get("id")?,
        user_id: row.get("user_id")?,
        report_month: row.get("report_month")?,
        report_year: row.get("report_year")?,
        total_value: decimal(row, "total_value")?,
        report,
    })
}

/// user = U (unique); optional single
pub fn find_by_user(conn: &Connection, user_id: i64) -> Result<Option<UserPortfolio>> {
    Ok(conn
        .query_row(
            &format!("SELECT {PORTFOLIO_COLUMNS} FROM user_portfolios WHERE user_id = ?1"),
            params![user_id],
            map_portfolio,
        )
        .optional()?)
}

/// user = U and riskProfile = R; optional single
pub fn find_by_user_and_risk_profile(
    conn: &Connection,
    user_id: i64,
    risk_profile: &str,
) -> Result<Option<UserPortfolio>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {PORTFOLIO_COLUMNS} FROM user_portfolios
                 WHERE user_id = ?1 AND risk_profile = ?2"
            ),
            params![user_id, risk_profile],
            map_portfolio,
        )
        .optional()?)
}

/// id = ?; optional single
pub fn find_by_id(conn: &Connection, id: i64) -> Result<Option<UserPortfolio>> {
    Ok(conn
        .query_row(
            &format!("SELECT {PORTFOLIO_COLUMNS} FROM user_portfolios WHERE id = ?1"),
            params![id],
            map_portfolio,
        )
        .optional()?)
}

/// Insert or replace the single portfolio configuration of a user
pub fn upsert(conn: &Connection, user_id: i64, input: &UserPortfolioInput) -> Result<UserPortfolio> {
    conn.execute(
        "INSERT INTO user_portfolios(user_id, name, risk_profile, monthly_contribution)
         VALUES (?1, ?2, ?3, ?4)
         ON CONFLICT(user_id) DO UPDATE SET
             name = excluded.name,
             risk_profile = excluded.risk_profile,
             monthly_contribution = excluded.monthly_contribution",
        params![
            user_id,
            input.name,
            input.risk_profile,
            input.monthly_contribution.to_string()
        ],
    )?;
    find_by_user(conn, user_id)?
        .ok_or_else(|| AppError::ResourceNotFound(format!("portfolio of user {user_id}")))
}

/// user = U; reportYear desc, reportMonth desc; optional single (top 1)
pub fn find_latest_real_by_user(
    conn: &Connection,
    user_id: i64,
) -> Result<Option<UserRealPortfolio>> {
    Ok(conn
        .query_row(
            &format!(
                "SELECT {REAL_COLUMNS} FROM user_real_portfolios
                 WHERE user_id = ?1
                 ORDER BY report_year DESC, report_month DESC
                 LIMIT 1"
            ),
            params![user_id],
            map_real,
        )
        .optional()?)
}

/// user = U; reportYear desc, reportMonth desc; list
pub fn find_real_by_user(conn: &Connection, user_id: i64) -> Result<Vec<UserRealPortfolio>> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {REAL_COLUMNS} FROM user_real_portfolios
         WHERE user_id = ?1
         ORDER BY report_year DESC, report_month DESC"
    ))?;
    let rows = stmt.query_map(params![user_id], map_real)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// Record the snapshot for (user, month, year), replacing an earlier one
pub fn upsert_real(conn: &Connection, snapshot: &NewUserRealPortfolio) -> Result<UserRealPortfolio> {
    let report = serde_json::to_string(&snapshot.report)
        .map_err(|e| AppError::Validation(format!("report: {e}")))?;
    conn.execute(
        "INSERT INTO user_real_portfolios(user_id, report_month, report_year, total_value, report)
         VALUES (?1, ?2, ?3, ?4, ?5)
         ON CONFLICT(user_id, report_month, report_year) DO UPDATE SET
             total_value = excluded.total_value,
             report = excluded.report",
        params![
            snapshot.user_id,
            snapshot.report_month,
            snapshot.report_year,
            snapshot.total_value.to_string(),
            report
        ],
    )?;
    let id = conn.query_row(
        "SELECT id FROM user_real_portfolios
         WHERE user_id = ?1 AND report_month = ?2 AND report_year = ?3",
        params![snapshot.user_id, snapshot.report_month, snapshot.report_year],
        |r| r.get(0),
    )?;
    Ok(UserRealPortfolio {
        id,
        user_id: snapshot.user_id,
        report_month: snapshot.report_month,
        report_year: snapshot.report_year,
        total_value: snapshot.total_value,
        report: snapshot.report.clone(),
    })
}
