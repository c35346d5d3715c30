// Imported bank-statement transactions and their categories

use chrono::NaiveDate;
use hyper::StatusCode;

use super::request::Query;
use super::response::json_response;
use super::users::NewExpenseType;
use super::{deleted, found, ApiResult};
use crate::db::models::NewExtractTransaction;
use crate::db::repository::extract;
use crate::db::Database;
use crate::error::AppError;

pub async fn list_types(db: &Database) -> ApiResult {
    let types = db.run(|conn| extract::find_all_types(conn)).await?;
    Ok(json_response(StatusCode::OK, &types))
}

pub async fn get_type(db: &Database, id: i64) -> ApiResult {
    let extract_type = found(
        db.run(move |conn| extract::find_type_by_id(conn, id)).await?,
        || format!("extract expense type {id}"),
    )?;
    Ok(json_response(StatusCode::OK, &extract_type))
}

pub async fn create_type(db: &Database, body: NewExpenseType) -> ApiResult {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let created = db.run(move |conn| extract::insert_type(conn, &name)).await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

/// Refused with 409 while any transaction still uses the type
pub async fn delete_type(db: &Database, id: i64) -> ApiResult {
    deleted(db.run(move |conn| extract::delete_type(conn, id)).await?, || {
        format!("extract expense type {id}")
    })
}

/// Newest first; `?start=&end=` narrows to an inclusive date range
pub async fn list_transactions(db: &Database, user_id: i64, query: &Query) -> ApiResult {
    let start: Option<NaiveDate> = query.parse_opt("start")?;
    let end: Option<NaiveDate> = query.parse_opt("end")?;

    let range = match (start, end) {
        (Some(s), Some(e)) if s > e => {
            return Err(AppError::Validation(format!("start {s} is after end {e}")));
        }
        (Some(s), Some(e)) => Some((s, e)),
        (None, None) => None,
        _ => {
            return Err(AppError::Validation(
                "start and end must be given together".into(),
            ));
        }
    };

    let transactions = db
        .run(move |conn| match range {
            Some((s, e)) => extract::find_by_user_between(conn, user_id, s, e),
            None => extract::find_by_user(conn, user_id),
        })
        .await?;
    Ok(json_response(StatusCode::OK, &transactions))
}

pub async fn create_transaction(db: &Database, body: NewExtractTransaction) -> ApiResult {
    let created = db
        .run(move |conn| extract::insert_transaction(conn, &body))
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn delete_transaction(db: &Database, id: i64) -> ApiResult {
    deleted(
        db.run(move |conn| extract::delete_transaction(conn, id)).await?,
        || format!("transaction {id}"),
    )
}
