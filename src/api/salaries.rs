// Salary, foreign-currency conversions and deductions

use hyper::StatusCode;

use super::request::{check_month, Query};
use super::response::json_response;
use super::{deleted, found, ApiResult};
use crate::db::models::{NewSalaryConversion, NewSalaryDeduction, SalaryInput};
use crate::db::repository::salary;
use crate::db::Database;
use crate::error::AppError;

pub async fn get_salary(db: &Database, user_id: i64) -> ApiResult {
    let current = found(
        db.run(move |conn| salary::find_by_user(conn, user_id)).await?,
        || format!("salary of user {user_id}"),
    )?;
    Ok(json_response(StatusCode::OK, &current))
}

pub async fn put_salary(db: &Database, user_id: i64, body: SalaryInput) -> ApiResult {
    let saved = db
        .run(move |conn| salary::upsert(conn, user_id, &body))
        .await?;
    Ok(json_response(StatusCode::OK, &saved))
}

/// Requires `?month=&year=`
pub async fn list_conversions(db: &Database, user_id: i64, query: &Query) -> ApiResult {
    let month: u32 = query.require("month")?;
    let year: i32 = query.require("year")?;
    check_month(month)?;

    let conversions = db
        .run(move |conn| salary::find_conversions(conn, user_id, month, year))
        .await?;
    Ok(json_response(StatusCode::OK, &conversions))
}

pub async fn create_conversion(db: &Database, body: NewSalaryConversion) -> ApiResult {
    check_month(body.month)?;
    if body.exchange_rate.is_sign_negative() || body.exchange_rate.is_zero() {
        return Err(AppError::Validation("exchangeRate must be positive".into()));
    }
    let created = db
        .run(move |conn| salary::insert_conversion(conn, &body))
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

/// One period when `?month=&year=` is given, otherwise every period
pub async fn list_deductions(db: &Database, user_id: i64, query: &Query) -> ApiResult {
    let month: Option<u32> = query.parse_opt("month")?;
    let year: Option<i32> = query.parse_opt("year")?;

    let period = match (month, year) {
        (Some(m), Some(y)) => {
            check_month(m)?;
            Some((m, y))
        }
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "month and year must be given together".into(),
            ));
        }
    };

    let deductions = db
        .run(move |conn| match period {
            Some((m, y)) => salary::find_deductions_by_period(conn, user_id, m, y),
            None => salary::find_deductions_by_user(conn, user_id),
        })
        .await?;
    Ok(json_response(StatusCode::OK, &deductions))
}

pub async fn create_deduction(db: &Database, body: NewSalaryDeduction) -> ApiResult {
    check_month(body.month)?;
    let created = db
        .run(move |conn| salary::insert_deduction(conn, &body))
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn delete_deduction(db: &Database, id: i64) -> ApiResult {
    deleted(
        db.run(move |conn| salary::delete_deduction(conn, id)).await?,
        || format!("salary deduction {id}"),
    )
}
