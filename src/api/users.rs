// Users and expense type catalog

use hyper::StatusCode;
use serde::Deserialize;

use super::response::json_response;
use super::{found, ApiResult};
use crate::db::models::NewUser;
use crate::db::repository::{expense_type, user};
use crate::db::Database;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
pub struct NewExpenseType {
    pub name: String,
}

pub async fn list_users(db: &Database) -> ApiResult {
    let users = db.run(|conn| user::find_all(conn)).await?;
    Ok(json_response(StatusCode::OK, &users))
}

pub async fn get_user(db: &Database, id: i64) -> ApiResult {
    let found_user = found(
        db.run(move |conn| user::find_by_id(conn, id)).await?,
        || format!("user {id}"),
    )?;
    Ok(json_response(StatusCode::OK, &found_user))
}

pub async fn create_user(db: &Database, new_user: NewUser) -> ApiResult {
    if new_user.email.trim().is_empty() || new_user.name.trim().is_empty() {
        return Err(AppError::Validation("email and name are required".into()));
    }
    let created = db.run(move |conn| user::insert(conn, &new_user)).await?;
    Ok(json_response(StatusCode::CREATED, &created))
}

pub async fn list_expense_types(db: &Database) -> ApiResult {
    let types = db.run(|conn| expense_type::find_all(conn)).await?;
    Ok(json_response(StatusCode::OK, &types))
}

pub async fn create_expense_type(db: &Database, body: NewExpenseType) -> ApiResult {
    let name = body.name.trim().to_string();
    if name.is_empty() {
        return Err(AppError::Validation("name is required".into()));
    }
    let created = db
        .run(move |conn| {
            if expense_type::find_by_name(conn, &name)?.is_some() {
                return Err(AppError::Conflict(format!("expense type '{name}' exists")));
            }
            expense_type::insert(conn, &name)
        })
        .await?;
    Ok(json_response(StatusCode::CREATED, &created))
}
