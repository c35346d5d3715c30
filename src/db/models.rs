//! Entity records
//!
//! Plain data with surrogate ids. `New*` structs are the write-side shapes
//! accepted by the API; they carry no id.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub color: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub email: String,
    pub name: String,
    pub color: String,
}

/// Category of a monthly expense
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: i64,
    pub year: i32,
    pub month: u32,
    pub expense_type_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    pub year: i32,
    pub month: u32,
    pub expense_type_id: i64,
    pub user_id: i64,
    pub amount: Decimal,
}

/// Category of an imported bank-statement transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractExpenseType {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractTransaction {
    pub id: i64,
    pub user_id: i64,
    pub expense_type_id: i64,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExtractTransaction {
    pub user_id: i64,
    pub expense_type_id: i64,
    pub transaction_date: NaiveDate,
    pub description: String,
    pub amount: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RecurringExpense {
    pub id: i64,
    pub user_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    pub expense_type_id: Option<i64>,
    pub active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRecurringExpense {
    pub user_id: i64,
    pub description: String,
    pub amount: Decimal,
    pub day_of_month: u32,
    #[serde(default)]
    pub expense_type_id: Option<i64>,
    #[serde(default = "default_true")]
    pub active: bool,
}

const fn default_true() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Salary {
    pub id: i64,
    pub user_id: i64,
    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryInput {
    pub gross_amount: Decimal,
    pub net_amount: Decimal,
    pub currency: String,
}

/// Salary received in a foreign currency, converted for one month
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryConversion {
    pub id: i64,
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    pub original_amount: Decimal,
    pub currency: String,
    pub exchange_rate: Decimal,
    pub converted_amount: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalaryConversion {
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    pub original_amount: Decimal,
    pub currency: String,
    pub exchange_rate: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SalaryDeduction {
    pub id: i64,
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSalaryDeduction {
    pub user_id: i64,
    pub month: u32,
    pub year: i32,
    pub description: String,
    pub amount: Decimal,
    pub due_date: NaiveDate,
}

/// Investment plan of one user
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPortfolio {
    pub id: i64,
    pub user_id: i64,
    pub name: String,
    pub risk_profile: String,
    pub monthly_contribution: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserPortfolioInput {
    pub name: String,
    pub risk_profile: String,
    pub monthly_contribution: Decimal,
}

/// Monthly snapshot of what a user actually holds
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserRealPortfolio {
    pub id: i64,
    pub user_id: i64,
    pub report_month: u32,
    pub report_year: i32,
    pub total_value: Decimal,
    /// Free-form report body as produced by the frontend
    pub report: serde_json::Value,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUserRealPortfolio {
    pub user_id: i64,
    pub report_month: u32,
    pub report_year: i32,
    pub total_value: Decimal,
    #[serde(default)]
    pub report: serde_json::Value,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioAnalysis {
    pub id: i64,
    pub ticker: String,
    pub portfolio_name: String,
    pub recommendation: String,
    pub summary: String,
    pub target_price: Option<Decimal>,
    pub analysis_date: DateTime<Utc>,
    pub next_review_date: Option<DateTime<Utc>>,
    pub is_active: bool,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioAnalysis {
    pub ticker: String,
    pub portfolio_name: String,
    pub recommendation: String,
    pub summary: String,
    #[serde(default)]
    pub target_price: Option<Decimal>,
    /// Defaults to the time of activation
    #[serde(default)]
    pub analysis_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub next_review_date: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioPosition {
    pub id: i64,
    pub portfolio_id: i64,
    pub ticker: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioPosition {
    pub ticker: String,
    pub quantity: Decimal,
    pub average_price: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioDividend {
    pub id: i64,
    pub portfolio_id: i64,
    pub ticker: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPortfolioDividend {
    pub ticker: String,
    pub amount: Decimal,
    pub payment_date: NaiveDate,
}
