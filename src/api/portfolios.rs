// Portfolio configuration, monthly snapshots, positions and dividends

use hyper::StatusCode;
use serde_json::json;

use super::request::{check_month, Query};
use super::response::json_response;
use super::{found, ApiResult};
use crate::db::models::{
    NewPortfolioDividend, NewPortfolioPosition, NewUserRealPortfolio, UserPortfolioInput,
};
use crate::db::repository::{holdings, portfolio};
use crate::db::Database;
use crate::error::{AppError, Result};

/// `?riskProfile=R` only matches a configuration with that profile
pub async fn get_portfolio(db: &Database, user_id: i64, query: &Query) -> ApiResult {
    let risk_profile = query.get("riskProfile").map(ToString::to_string);
    let config = found(
        db.run(move |conn| match risk_profile {
            Some(r) => portfolio::find_by_user_and_risk_profile(conn, user_id, &r),
            None => portfolio::find_by_user(conn, user_id),
        })
        .await?,
        || format!("portfolio of user {user_id}"),
    )?;
    Ok(json_response(StatusCode::OK, &config))
}

pub async fn put_portfolio(db: &Database, user_id: i64, body: UserPortfolioInput) -> ApiResult {
    let saved = db
        .run(move |conn| portfolio::upsert(conn, user_id, &body))
        .await?;
    Ok(json_response(StatusCode::OK, &saved))
}

pub async fn latest_snapshot(db: &Database, user_id: i64) -> ApiResult {
    let latest = found(
        db.run(move |conn| portfolio::find_latest_real_by_user(conn, user_id))
            .await?,
        || format!("real portfolio of user {user_id}"),
    )?;
    Ok(json_response(StatusCode::OK, &latest))
}

/// Every monthly snapshot of a user, newest period first
pub async fn snapshot_history(db: &Database, user_id: i64) -> ApiResult {
    let history = db
        .run(move |conn| portfolio::find_real_by_user(conn, user_id))
        .await?;
    Ok(json_response(StatusCode::OK, &history))
}

pub async fn record_snapshot(db: &Database, body: NewUserRealPortfolio) -> ApiResult {
    check_month(body.report_month)?;
    let saved = db
        .run(move |conn| portfolio::upsert_real(conn, &body))
        .await?;
    Ok(json_response(StatusCode::OK, &saved))
}

fn require_portfolio(conn: &rusqlite::Connection, portfolio_id: i64) -> Result<()> {
    portfolio::find_by_id(conn, portfolio_id)?
        .map(|_| ())
        .ok_or_else(|| AppError::ResourceNotFound(format!("portfolio {portfolio_id}")))
}

pub async fn list_positions(db: &Database, portfolio_id: i64) -> ApiResult {
    let positions = db
        .run(move |conn| holdings::find_positions(conn, portfolio_id))
        .await?;
    Ok(json_response(StatusCode::OK, &positions))
}

pub async fn add_position(db: &Database, portfolio_id: i64, body: NewPortfolioPosition) -> ApiResult {
    let created = db
        .run(move |conn| {
            require_portfolio(conn, portfolio_id)?;
            holdings::insert_position(conn, portfolio_id, &body)
        })
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn clear_positions(db: &Database, portfolio_id: i64) -> ApiResult {
    let removed = db
        .run(move |conn| holdings::delete_positions(conn, portfolio_id))
        .await?;
    Ok(json_response(StatusCode::OK, &json!({ "deleted": removed })))
}

pub async fn list_dividends(db: &Database, portfolio_id: i64) -> ApiResult {
    let dividends = db
        .run(move |conn| holdings::find_dividends(conn, portfolio_id))
        .await?;
    Ok(json_response(StatusCode::OK, &dividends))
}

pub async fn add_dividend(db: &Database, portfolio_id: i64, body: NewPortfolioDividend) -> ApiResult {
    let created = db
        .run(move |conn| {
            require_portfolio(conn, portfolio_id)?;
            holdings::insert_dividend(conn, portfolio_id, &body)
        })
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn clear_dividends(db: &Database, portfolio_id: i64) -> ApiResult {
    let removed = db
        .run(move |conn| holdings::delete_dividends(conn, portfolio_id))
        .await?;
    Ok(json_response(StatusCode::OK, &json!({ "deleted": removed })))
}
