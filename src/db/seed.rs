//! First-start data
//!
//! Each table is seeded only while it is empty, so running this twice is a
//! no-op the second time.

use rusqlite::{Connection, TransactionBehavior};

use super::models::NewUser;
use super::repository::{expense_type, user};
use crate::error::Result;
use crate::logger;

/// Category catalog, in display order
pub const EXPENSE_TYPES: [&str; 14] = [
    "Aluguel",
    "Condomínio",
    "Energia",
    "Água",
    "Internet",
    "Telefone",
    "Supermercado",
    "Transporte",
    "Saúde",
    "Educação",
    "Lazer",
    "Restaurantes",
    "Vestuário",
    "Outros",
];

fn default_users() -> [NewUser; 2] {
    [
        NewUser {
            email: "joao@casa.local".to_string(),
            name: "João".to_string(),
            color: "#3B82F6".to_string(),
        },
        NewUser {
            email: "maria@casa.local".to_string(),
            name: "Maria".to_string(),
            color: "#EC4899".to_string(),
        },
    ]
}

/// Rows inserted by one seeding pass
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SeedReport {
    pub users: usize,
    pub expense_types: usize,
}

pub fn run(conn: &mut Connection) -> Result<SeedReport> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)?;
    let mut report = SeedReport::default();

    if user::count(&tx)? == 0 {
        for u in &default_users() {
            user::insert(&tx, u)?;
            report.users += 1;
        }
    }

    if expense_type::count(&tx)? == 0 {
        for name in EXPENSE_TYPES {
            expense_type::insert(&tx, name)?;
            report.expense_types += 1;
        }
    }

    tx.commit()?;

    for (table, inserted) in [("users", report.users), ("expense_types", report.expense_types)] {
        if inserted > 0 {
            logger::log_seed_inserted(table, inserted);
        } else {
            logger::log_seed_skipped(table);
        }
    }
    Ok(report)
}
