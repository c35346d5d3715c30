//! Database schema
//!
//! Created idempotently at startup. Child rows of a portfolio are removed
//! by explicit bulk deletes, so no foreign key cascades.

use rusqlite::Connection;

use crate::error::Result;

const SCHEMA_SQL: &str = r"
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS users(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    email TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    color TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS expense_types(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS expenses(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    year INTEGER NOT NULL,
    month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
    expense_type_id INTEGER NOT NULL REFERENCES expense_types(id),
    user_id INTEGER NOT NULL REFERENCES users(id),
    amount TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS ux_expenses_period_type_user
    ON expenses(year, month, expense_type_id, user_id);

CREATE TABLE IF NOT EXISTS extract_expense_types(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS extract_transactions(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    expense_type_id INTEGER NOT NULL REFERENCES extract_expense_types(id),
    transaction_date TEXT NOT NULL,
    description TEXT NOT NULL,
    amount TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_extract_transactions_user_date
    ON extract_transactions(user_id, transaction_date);

CREATE TABLE IF NOT EXISTS recurring_expenses(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    description TEXT NOT NULL,
    amount TEXT NOT NULL,
    day_of_month INTEGER NOT NULL CHECK(day_of_month BETWEEN 1 AND 31),
    expense_type_id INTEGER REFERENCES expense_types(id),
    active INTEGER NOT NULL DEFAULT 1
);

CREATE TABLE IF NOT EXISTS salaries(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
    gross_amount TEXT NOT NULL,
    net_amount TEXT NOT NULL,
    currency TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS salary_conversions(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    original_amount TEXT NOT NULL,
    currency TEXT NOT NULL,
    exchange_rate TEXT NOT NULL,
    converted_amount TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS salary_deductions(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    month INTEGER NOT NULL CHECK(month BETWEEN 1 AND 12),
    year INTEGER NOT NULL,
    description TEXT NOT NULL,
    amount TEXT NOT NULL,
    due_date TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_portfolios(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
    name TEXT NOT NULL,
    risk_profile TEXT NOT NULL,
    monthly_contribution TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS user_real_portfolios(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    user_id INTEGER NOT NULL REFERENCES users(id),
    report_month INTEGER NOT NULL CHECK(report_month BETWEEN 1 AND 12),
    report_year INTEGER NOT NULL,
    total_value TEXT NOT NULL,
    report TEXT NOT NULL,
    UNIQUE(user_id, report_month, report_year)
);

CREATE TABLE IF NOT EXISTS portfolio_analyses(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    ticker TEXT NOT NULL,
    portfolio_name TEXT NOT NULL,
    recommendation TEXT NOT NULL,
    summary TEXT NOT NULL,
    target_price TEXT,
    analysis_date TEXT NOT NULL,
    next_review_date TEXT,
    is_active INTEGER NOT NULL DEFAULT 1
);
CREATE INDEX IF NOT EXISTS idx_portfolio_analyses_ticker
    ON portfolio_analyses(ticker, analysis_date);
CREATE UNIQUE INDEX IF NOT EXISTS ux_portfolio_analyses_active_ticker
    ON portfolio_analyses(ticker) WHERE is_active = 1;

CREATE TABLE IF NOT EXISTS portfolio_positions(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    portfolio_id INTEGER NOT NULL REFERENCES user_portfolios(id),
    ticker TEXT NOT NULL,
    quantity TEXT NOT NULL,
    average_price TEXT NOT NULL
);

CREATE TABLE IF NOT EXISTS portfolio_dividends(
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    portfolio_id INTEGER NOT NULL REFERENCES user_portfolios(id),
    ticker TEXT NOT NULL,
    amount TEXT NOT NULL,
    payment_date TEXT NOT NULL
);
";

pub fn init_schema(conn: &Connection) -> Result<()> {
    conn.execute_batch(SCHEMA_SQL)?;
    Ok(())
}
