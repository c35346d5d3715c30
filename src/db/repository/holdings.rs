//! `portfolio_positions` and `portfolio_dividends` queries
//!
//! Both are children of a user portfolio and are removed in bulk by
//! portfolio id rather than by a foreign key cascade.

use rusqlite::{params, Connection, Row};

use super::decimal;
use crate::db::models::{
    NewPortfolioDividend, NewPortfolioPosition, PortfolioDividend, PortfolioPosition,
};
use crate::error::Result;

fn map_position(row: &Row<'_>) -> rusqlite::Result<PortfolioPosition> {
    Ok(PortfolioPosition {
        id: row.get("id")?,
        portfolio_id: row.get("portfolio_id")?,
        ticker: row.get("ticker")?,
        quantity: decimal(row, "quantity")?,
        average_price: decimal(row, "average_price")?,
    })
}

fn map_dividend(row: &Row<'_>) -> rusqlite::Result<PortfolioDividend> {
    Ok(PortfolioDividend {
        id: row.get("id")?,
        portfolio_id: row.get("portfolio_id")?,
        ticker: row.get("ticker")?,
        amount: decimal(row, "amount")?,
        payment_date: row.get("payment_date")?,
    })
}

/// portfolio = P; ticker asc; list
pub fn find_positions(conn: &Connection, portfolio_id: i64) -> Result<Vec<PortfolioPosition>> {
    let mut stmt = conn.prepare(
        "SELECT id, portfolio_id, ticker, quantity, average_price
         FROM portfolio_positions
         WHERE portfolio_id = ?1
         ORDER BY ticker, id",
    )?;
    let rows = stmt.query_map(params![portfolio_id], map_position)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert_position(
    conn: &Connection,
    portfolio_id: i64,
    position: &NewPortfolioPosition,
) -> Result<PortfolioPosition> {
    conn.execute(
        "INSERT INTO portfolio_positions(portfolio_id, ticker, quantity, average_price)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            portfolio_id,
            position.ticker,
            position.quantity.to_string(),
            position.average_price.to_string()
        ],
    )?;
    Ok(PortfolioPosition {
        id: conn.last_insert_rowid(),
        portfolio_id,
        ticker: position.ticker.clone(),
        quantity: position.quantity,
        average_price: position.average_price,
    })
}

/// portfolio = P -> delete; bulk, returns rows removed
pub fn delete_positions(conn: &Connection, portfolio_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM portfolio_positions WHERE portfolio_id = ?1",
        params![portfolio_id],
    )?)
}

/// portfolio = P; paymentDate desc; list
pub fn find_dividends(conn: &Connection, portfolio_id: i64) -> Result<Vec<PortfolioDividend>> {
    let mut stmt = conn.prepare(
        "SELECT id, portfolio_id, ticker, amount, payment_date
         FROM portfolio_dividends
         WHERE portfolio_id = ?1
         ORDER BY payment_date DESC, id DESC",
    )?;
    let rows = stmt.query_map(params![portfolio_id], map_dividend)?;
    Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
}

pub fn insert_dividend(
    conn: &Connection,
    portfolio_id: i64,
    dividend: &NewPortfolioDividend,
) -> Result<PortfolioDividend> {
    conn.execute(
        "INSERT INTO portfolio_dividends(portfolio_id, ticker, amount, payment_date)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            portfolio_id,
            dividend.ticker,
            dividend.amount.to_string(),
            dividend.payment_date
        ],
    )?;
    Ok(PortfolioDividend {
        id: conn.last_insert_rowid(),
        portfolio_id,
        ticker: dividend.ticker.clone(),
        amount: dividend.amount,
        payment_date: dividend.payment_date,
    })
}

/// portfolio = P -> delete; bulk, returns rows removed
pub fn delete_dividends(conn: &Connection, portfolio_id: i64) -> Result<usize> {
    Ok(conn.execute(
        "DELETE FROM portfolio_dividends WHERE portfolio_id = ?1",
        params![portfolio_id],
    )?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::fixtures;
    use chrono::NaiveDate;
    use rust_decimal::Decimal;

    fn position(ticker: &str) -> NewPortfolioPosition {
        NewPortfolioPosition {
            ticker: ticker.to_string(),
            quantity: Decimal::from(100),
            average_price: Decimal::new(3_512, 2),
        }
    }

    fn dividend(ticker: &str, day: u32) -> NewPortfolioDividend {
        NewPortfolioDividend {
            ticker: ticker.to_string(),
            amount: Decimal::new(12_345, 2),
            payment_date: NaiveDate::from_ymd_opt(2024, 5, day).unwrap(),
        }
    }

    #[test]
    fn test_bulk_delete_only_touches_one_portfolio() {
        let conn = fixtures::conn();
        let a = fixtures::portfolio(&conn, fixtures::user(&conn, "a@lar.local"));
        let b = fixtures::portfolio(&conn, fixtures::user(&conn, "b@lar.local"));
        insert_position(&conn, a, &position("VALE3")).unwrap();
        insert_position(&conn, a, &position("ITUB4")).unwrap();
        insert_position(&conn, b, &position("PETR4")).unwrap();
        insert_dividend(&conn, a, &dividend("VALE3", 10)).unwrap();
        insert_dividend(&conn, b, &dividend("PETR4", 10)).unwrap();

        let tickers: Vec<_> = find_positions(&conn, a)
            .unwrap()
            .into_iter()
            .map(|p| p.ticker)
            .collect();
        assert_eq!(tickers, vec!["ITUB4", "VALE3"]);

        assert_eq!(delete_positions(&conn, a).unwrap(), 2);
        assert_eq!(delete_dividends(&conn, a).unwrap(), 1);
        assert!(find_positions(&conn, a).unwrap().is_empty());
        assert!(find_dividends(&conn, a).unwrap().is_empty());
        assert_eq!(find_positions(&conn, b).unwrap().len(), 1);
        assert_eq!(find_dividends(&conn, b).unwrap().len(), 1);
    }

    #[test]
    fn test_dividends_latest_first() {
        let conn = fixtures::conn();
        let p = fixtures::portfolio(&conn, fixtures::user(&conn, "a@lar.local"));
        insert_dividend(&conn, p, &dividend("TAEE11", 2)).unwrap();
        insert_dividend(&conn, p, &dividend("TAEE11", 28)).unwrap();

        let days: Vec<_> = find_dividends(&conn, p)
            .unwrap()
            .into_iter()
            .map(|d| d.payment_date.to_string())
            .collect();
        assert_eq!(days, vec!["2024-05-28", "2024-05-02"]);
    }
}
