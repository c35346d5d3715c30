// Monthly expenses and recurring expenses

use hyper::StatusCode;

use super::request::{check_month, Query};
use super::response::json_response;
use super::{deleted, ApiResult};
use crate::db::models::{NewExpense, NewRecurringExpense};
use crate::db::repository::{expense, recurring};
use crate::db::Database;
use crate::error::AppError;

/// `?year=Y` lists the year, `?year=Y&month=M` one month
pub async fn list(db: &Database, query: &Query) -> ApiResult {
    let year: i32 = query.require("year")?;
    let month: Option<u32> = query.parse_opt("month")?;
    if let Some(m) = month {
        check_month(m)?;
    }

    let expenses = db
        .run(move |conn| match month {
            Some(m) => expense::find_by_year_and_month(conn, year, m),
            None => expense::find_by_year(conn, year),
        })
        .await?;
    Ok(json_response(StatusCode::OK, &expenses))
}

pub async fn upsert(db: &Database, body: NewExpense) -> ApiResult {
    check_month(body.month)?;
    let saved = db.run(move |conn| expense::upsert(conn, &body)).await?;
    Ok(json_response(StatusCode::OK, &saved))
}

pub async fn delete(db: &Database, id: i64) -> ApiResult {
    deleted(db.run(move |conn| expense::delete(conn, id)).await?, || {
        format!("expense {id}")
    })
}

pub async fn list_recurring(db: &Database, user_id: i64) -> ApiResult {
    let items = db
        .run(move |conn| recurring::find_by_user(conn, user_id))
        .await?;
    Ok(json_response(StatusCode::OK, &items))
}

pub async fn create_recurring(db: &Database, body: NewRecurringExpense) -> ApiResult {
    if !(1..=31).contains(&body.day_of_month) {
        return Err(AppError::Validation(format!(
            "dayOfMonth must be 1-31, got {}",
            body.day_of_month
        )));
    }
    let created = db.run(move |conn| recurring::insert(conn, &body)).await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn delete_recurring(db: &Database, id: i64) -> ApiResult {
    deleted(db.run(move |conn| recurring::delete(conn, id)).await?, || {
        format!("recurring expense {id}")
    })
}
