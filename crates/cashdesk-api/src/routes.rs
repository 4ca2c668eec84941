//! Paths of the record store API
//!
//! Ids are percent-encoded so they always form a single path segment.

pub const CATEGORIES: &str = "/categories";
pub const BANK_ACCOUNTS: &str = "/bank-accounts";
pub const TRANSACTIONS: &str = "/transactions";
pub const ACCOUNTS: &str = "/accounts";

pub fn bank_account(id: &str) -> String {
    format!("{}/{}", BANK_ACCOUNTS, urlencoding::encode(id))
}

pub fn transaction(id: &str) -> String {
    format!("{}/{}", TRANSACTIONS, urlencoding::encode(id))
}

pub fn account(id: &str) -> String {
    format!("{}/{}", ACCOUNTS, urlencoding::encode(id))
}
