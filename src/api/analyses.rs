// Portfolio analyses: one active analysis per ticker

use chrono::Utc;
use hyper::StatusCode;

use super::request::Query;
use super::response::json_response;
use super::{found, ApiResult};
use crate::db::models::NewPortfolioAnalysis;
use crate::db::repository::analysis;
use crate::db::Database;
use crate::error::AppError;

/// All active analyses, or those matching `?recommendation=` / `?portfolio=`
pub async fn list_active(db: &Database, query: &Query) -> ApiResult {
    let recommendation = query.get("recommendation").map(ToString::to_string);
    let portfolio = query.get("portfolio").map(ToString::to_string);

    let analyses = db
        .run(move |conn| match (recommendation, portfolio) {
            (Some(_), Some(_)) => Err(AppError::Validation(
                "filter by recommendation or portfolio, not both".into(),
            )),
            (Some(r), None) => analysis::find_active_by_recommendation(conn, &r),
            (None, Some(p)) => analysis::find_active_by_portfolio(conn, &p),
            (None, None) => analysis::find_all_active(conn),
        })
        .await?;
    Ok(json_response(StatusCode::OK, &analyses))
}

/// Active analyses whose review date has passed at request time
pub async fn list_due(db: &Database) -> ApiResult {
    let now = Utc::now();
    let due = db
        .run(move |conn| analysis::find_due_for_review(conn, now))
        .await?;
    Ok(json_response(StatusCode::OK, &due))
}

pub async fn active_for_ticker(db: &Database, ticker: &str) -> ApiResult {
    let ticker = ticker.to_string();
    let label = format!("active analysis for {ticker}");
    let current = found(
        db.run(move |conn| analysis::find_active_by_ticker(conn, &ticker))
            .await?,
        || label,
    )?;
    Ok(json_response(StatusCode::OK, &current))
}

pub async fn history_for_ticker(db: &Database, ticker: &str) -> ApiResult {
    let ticker = ticker.to_string();
    let history = db
        .run(move |conn| analysis::find_history_by_ticker(conn, &ticker))
        .await?;
    Ok(json_response(StatusCode::OK, &history))
}

/// Store a new analysis and make it the active one for its ticker
pub async fn activate(db: &Database, body: NewPortfolioAnalysis) -> ApiResult {
    if body.ticker.trim().is_empty() {
        return Err(AppError::Validation("ticker is required".into()));
    }
    let now = Utc::now();
    let created = db
        .run(move |conn| analysis::activate(conn, &body, now))
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}
