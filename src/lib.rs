//! Household finance backend
//!
//! Serves the bundled single-page frontend and a JSON API over a SQLite
//! store of users, expenses, salaries and portfolio records.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod handler;
pub mod http;
pub mod logger;
pub mod server;
pub mod spa;

pub use error::{AppError, Result};
