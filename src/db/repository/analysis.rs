//! `portfolio_analyses` queries
//!
//! At most one active row per ticker, backed by a partial unique index.
//! New analyses enter through [`activate`], which deactivates the previous
//! active row and inserts the new one inside a single transaction.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};

use super::optional_decimal;
use crate::db::models::{NewPortfolioAnalysis, PortfolioAnalysis};
use crate::error::Result;

const COLUMNS: &str = "id, ticker, portfolio_name, recommendation, summary, target_price, \
                       analysis_date, next_review_date, is_active";

fn map_row(row: &Row<'_>) -> rusqlite::Result<PortfolioAnalysis> {
    Ok(PortfolioAnalysis {
        id: row.get("id")?,
        ticker: row.get("ticker")?,
        portfolio_name: row.get("portfolio_name")?,
        recommendation: row.get("recommendation")?,
        summary: row.get("summary")?,
        target_price: optional_decimal(row, "target_price")?,
        analysis_date: row.get("analysis_date")?,
        next_review_date: row.get("next_review_date")?,
        is_active: row.get("is_active")?,
    })
}

fn query_list<P: rusqlite::Params>(
    conn: &Connection,
    sql: &str,
    params: P,
) -> Result<Vec<PortfolioAnalysis>> {
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map(params, map_row)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

/// ticker = T, active; optional single
pub fn find_active_by_ticker(conn: &Connection, ticker: &str) -> Result<Option<PortfolioAnalysis>> {
    Ok(conn
        .query_row(
            &format!("SELECT {COLUMNS} FROM portfolio_analyses WHERE ticker = ?1 AND is_active = 1"),
            params![ticker],
            map_row,
        )
        .optional()?)
}

/// portfolioName = P, active; analysisDate desc; list
pub fn find_active_by_portfolio(conn: &Connection, portfolio_name: &str) -> Result<Vec<PortfolioAnalysis>> {
    query_list(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM portfolio_analyses
             WHERE portfolio_name = ?1 AND is_active = 1
             ORDER BY analysis_date DESC, id DESC"
        ),
        params![portfolio_name],
    )
}

/// active and nextReviewDate <= now; list.
///
/// Rows without a review date are never due.
pub fn find_due_for_review(conn: &Connection, now: DateTime<Utc>) -> Result<Vec<PortfolioAnalysis>> {
    query_list(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM portfolio_analyses
             WHERE is_active = 1 AND next_review_date IS NOT NULL AND next_review_date <= ?1
             ORDER BY next_review_date, id"
        ),
        params![now],
    )
}

/// ticker = T; analysisDate desc; list
pub fn find_history_by_ticker(conn: &Connection, ticker: &str) -> Result<Vec<PortfolioAnalysis>> {
    query_list(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM portfolio_analyses
             WHERE ticker = ?1
             ORDER BY analysis_date DESC, id DESC"
        ),
        params![ticker],
    )
}

/// active; analysisDate desc; list
pub fn find_all_active(conn: &Connection) -> Result<Vec<PortfolioAnalysis>> {
    query_list(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM portfolio_analyses
             WHERE is_active = 1
             ORDER BY analysis_date DESC, id DESC"
        ),
        params![],
    )
}

/// recommendation = R, active; analysisDate desc; list
pub fn find_active_by_recommendation(
    conn: &Connection,
    recommendation: &str,
) -> Result<Vec<PortfolioAnalysis>> {
    query_list(
        conn,
        &format!(
            "SELECT {COLUMNS} FROM portfolio_analyses
             WHERE recommendation = ?1 AND is_active = 1
             ORDER BY analysis_date DESC, id DESC"
        ),
        params![recommendation],
    )
}

/// ticker = T, active -> set inactive; bulk, returns rows touched
pub fn deactivate_previous(conn: &Connection, ticker: &str) -> Result<usize> {
    Ok(conn.execute(
        "UPDATE portfolio_analyses SET is_active = 0 WHERE ticker = ?1 AND is_active = 1",
        params![ticker],
    )?)
}

/// Make `analysis` the single active analysis of its ticker
pub fn activate(
    conn: &mut Connection,
    analysis: &NewPortfolioAnalysis,
    now: DateTime<Utc>,
) -> Result<PortfolioAnalysis> {
    let analysis_date = analysis.analysis_date.unwrap_or(now);
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;

    deactivate_previous(&tx, &analysis.ticker)?;
    tx.execute(
        "INSERT INTO portfolio_analyses(ticker, portfolio_name, recommendation, summary,
                                        target_price, analysis_date, next_review_date, is_active)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 1)",
        params![
            analysis.ticker,
            analysis.portfolio_name,
            analysis.recommendation,
            analysis.summary,
            analysis.target_price.map(|p| p.to_string()),
            analysis_date,
            analysis.next_review_date
        ],
    )?;
    let id = tx.last_insert_rowid();
    tx.commit()?;

    Ok(PortfolioAnalysis {
        id,
        ticker: analysis.ticker.clone(),
        portfolio_name: analysis.portfolio_name.clone(),
        recommendation: analysis.recommendation.clone(),
        summary: analysis.summary.clone(),
        target_price: analysis.target_price,
        analysis_date,
        next_review_date: analysis.next_review_date,
        is_active: true,
    })
}
