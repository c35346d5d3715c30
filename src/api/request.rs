// API request helpers: JSON bodies, query strings, path ids

use http_body_util::BodyExt;
use hyper::body::{Body, Bytes};
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;

use crate::error::{AppError, Result};

/// Collect the whole body and parse it as JSON
pub async fn read_json<T, B>(body: B) -> Result<T>
where
    T: DeserializeOwned,
    B: Body<Data = Bytes>,
    B::Error: Display,
{
    let whole_body = body
        .collect()
        .await
        .map_err(|e| AppError::Validation(format!("failed to read request body: {e}")))?
        .to_bytes();

    serde_json::from_slice(&whole_body)
        .map_err(|e| AppError::Validation(format!("invalid JSON body: {e}")))
}

/// Parse a numeric path segment
pub fn parse_id(segment: &str) -> Result<i64> {
    segment
        .parse()
        .map_err(|_| AppError::Validation(format!("invalid id '{segment}'")))
}

/// Reject months outside 1..=12 before they reach the store
pub fn check_month(month: u32) -> Result<()> {
    if (1..=12).contains(&month) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("month must be 1-12, got {month}")))
    }
}

/// Decoded query string parameters
#[derive(Debug, Default)]
pub struct Query {
    params: HashMap<String, String>,
}

impl Query {
    pub fn parse(raw: Option<&str>) -> Self {
        let params = raw
            .map(|q| url::form_urlencoded::parse(q.as_bytes()).into_owned().collect())
            .unwrap_or_default();
        Self { params }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    /// Parse an optional parameter, rejecting malformed values
    pub fn parse_opt<T: FromStr>(&self, key: &str) -> Result<Option<T>> {
        self.get(key)
            .map(|raw| {
                raw.parse()
                    .map_err(|_| AppError::Validation(format!("invalid value for '{key}': {raw}")))
            })
            .transpose()
    }

    pub fn require<T: FromStr>(&self, key: &str) -> Result<T> {
        self.parse_opt(key)?
            .ok_or_else(|| AppError::Validation(format!("missing query parameter '{key}'")))
    }
}
