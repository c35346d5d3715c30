// JSON API entry
// Routes `/api/...` requests to per-entity handlers

mod analyses;
mod expenses;
mod extract;
mod portfolios;
mod request;
mod response;
mod salaries;
mod users;

use http_body_util::Full;
use hyper::body::{Body, Bytes};
use hyper::{Method, Request, Response};
use std::fmt::Display;

use crate::config::AppState;
use crate::db::Database;
use crate::error::{AppError, Result};
use crate::logger;

pub use request::Query;
pub use response::{error_response, json_response};

use request::{parse_id, read_json};

type ApiResult = Result<Response<Full<Bytes>>>;

/// True when the first path segment is `api`
pub fn is_api_path(path: &str) -> bool {
    path.trim_start_matches('/').split('/').next() == Some("api")
}

/// Turn an empty lookup into a 404
fn found<T>(value: Option<T>, what: impl FnOnce() -> String) -> Result<T> {
    value.ok_or_else(|| AppError::ResourceNotFound(what()))
}

/// 204 when a row was removed, 404 otherwise
fn deleted(removed: bool, what: impl FnOnce() -> String) -> ApiResult {
    if removed {
        Ok(response::no_content())
    } else {
        Err(AppError::ResourceNotFound(what()))
    }
}

/// API route handler
///
/// Returns `None` when no route matches, so the caller can try static files
/// and then the error/fallback controller.
pub async fn handle_api<B>(req: Request<B>, state: &AppState) -> Option<Response<Full<Bytes>>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let (parts, body) = req.into_parts();
    let path = parts.uri.path();
    let query = Query::parse(parts.uri.query());
    let segments: Vec<&str> = path
        .split('/')
        .filter(|s| !s.is_empty())
        .skip(1)
        .collect();

    let outcome = route(&parts.method, &segments, &query, body, &state.db).await;
    let response = match outcome {
        Ok(Some(resp)) => resp,
        Ok(None) => return None,
        Err(e) => error_response(&e),
    };

    logger::log_api_request(parts.method.as_str(), path, response.status().as_u16());
    Some(response)
}

#[allow(clippy::too_many_lines)]
async fn route<B>(
    method: &Method,
    segments: &[&str],
    query: &Query,
    body: B,
    db: &Database,
) -> Result<Option<Response<Full<Bytes>>>>
where
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let resp = match (method.clone(), segments) {
        // Users and expense types
        (Method::GET, ["users"]) => users::list_users(db).await?,
        (Method::POST, ["users"]) => users::create_user(db, read_json(body).await?).await?,
        (Method::GET, ["users", id]) => users::get_user(db, parse_id(id)?).await?,
        (Method::GET, ["expense-types"]) => users::list_expense_types(db).await?,
        (Method::POST, ["expense-types"]) => {
            users::create_expense_type(db, read_json(body).await?).await?
        }

        // Expenses
        (Method::GET, ["expenses"]) => expenses::list(db, query).await?,
        (Method::PUT, ["expenses"]) => expenses::upsert(db, read_json(body).await?).await?,
        (Method::DELETE, ["expenses", id]) => expenses::delete(db, parse_id(id)?).await?,

        // Recurring expenses
        (Method::GET, ["users", id, "recurring-expenses"]) => {
            expenses::list_recurring(db, parse_id(id)?).await?
        }
        (Method::POST, ["recurring-expenses"]) => {
            expenses::create_recurring(db, read_json(body).await?).await?
        }
        (Method::DELETE, ["recurring-expenses", id]) => {
            expenses::delete_recurring(db, parse_id(id)?).await?
        }

        // Extract types and transactions
        (Method::GET, ["extract-expense-types"]) => extract::list_types(db).await?,
        (Method::POST, ["extract-expense-types"]) => {
            extract::create_type(db, read_json(body).await?).await?
        }
        (Method::GET, ["extract-expense-types", id]) => {
            extract::get_type(db, parse_id(id)?).await?
        }
        (Method::DELETE, ["extract-expense-types", id]) => {
            extract::delete_type(db, parse_id(id)?).await?
        }
        (Method::GET, ["users", id, "transactions"]) => {
            extract::list_transactions(db, parse_id(id)?, query).await?
        }
        (Method::POST, ["transactions"]) => {
            extract::create_transaction(db, read_json(body).await?).await?
        }
        (Method::DELETE, ["transactions", id]) => {
            extract::delete_transaction(db, parse_id(id)?).await?
        }

        // Salary
        (Method::GET, ["users", id, "salary"]) => salaries::get_salary(db, parse_id(id)?).await?,
        (Method::PUT, ["users", id, "salary"]) => {
            salaries::put_salary(db, parse_id(id)?, read_json(body).await?).await?
        }
        (Method::GET, ["users", id, "salary-conversions"]) => {
            salaries::list_conversions(db, parse_id(id)?, query).await?
        }
        (Method::POST, ["salary-conversions"]) => {
            salaries::create_conversion(db, read_json(body).await?).await?
        }
        (Method::GET, ["users", id, "salary-deductions"]) => {
            salaries::list_deductions(db, parse_id(id)?, query).await?
        }
        (Method::POST, ["salary-deductions"]) => {
            salaries::create_deduction(db, read_json(body).await?).await?
        }
        (Method::DELETE, ["salary-deductions", id]) => {
            salaries::delete_deduction(db, parse_id(id)?).await?
        }

        // Portfolio configuration and snapshots
        (Method::GET, ["users", id, "portfolio"]) => {
            portfolios::get_portfolio(db, parse_id(id)?, query).await?
        }
        (Method::PUT, ["users", id, "portfolio"]) => {
            portfolios::put_portfolio(db, parse_id(id)?, read_json(body).await?).await?
        }
        (Method::GET, ["users", id, "real-portfolio"]) => {
            portfolios::snapshot_history(db, parse_id(id)?).await?
        }
        (Method::GET, ["users", id, "real-portfolio", "latest"]) => {
            portfolios::latest_snapshot(db, parse_id(id)?).await?
        }
        (Method::POST, ["real-portfolio"]) => {
            portfolios::record_snapshot(db, read_json(body).await?).await?
        }

        // Positions and dividends
        (Method::GET, ["portfolios", id, "positions"]) => {
            portfolios::list_positions(db, parse_id(id)?).await?
        }
        (Method::POST, ["portfolios", id, "positions"]) => {
            portfolios::add_position(db, parse_id(id)?, read_json(body).await?).await?
        }
        (Method::DELETE, ["portfolios", id, "positions"]) => {
            portfolios::clear_positions(db, parse_id(id)?).await?
        }
        (Method::GET, ["portfolios", id, "dividends"]) => {
            portfolios::list_dividends(db, parse_id(id)?).await?
        }
        (Method::POST, ["portfolios", id, "dividends"]) => {
            portfolios::add_dividend(db, parse_id(id)?, read_json(body).await?).await?
        }
        (Method::DELETE, ["portfolios", id, "dividends"]) => {
            portfolios::clear_dividends(db, parse_id(id)?).await?
        }

        // Analyses
        (Method::GET, ["portfolio-analyses"]) => analyses::list_active(db, query).await?,
        (Method::GET, ["portfolio-analyses", "due"]) => analyses::list_due(db).await?,
        (Method::GET, ["portfolio-analyses", "ticker", ticker]) => {
            analyses::active_for_ticker(db, ticker).await?
        }
        (Method::GET, ["portfolio-analyses", "ticker", ticker, "history"]) => {
            analyses::history_for_ticker(db, ticker).await?
        }
        (Method::POST, ["portfolio-analyses"]) => {
            analyses::activate(db, read_json(body).await?).await?
        }

        // Unknown route
        _ => return Ok(None),
    };
    Ok(Some(resp))
}
