//! Terminal output: notices on stderr, records on stdout

use cashdesk_core::{
    BankAccount, BankAccountDetail, Category, NoticeId, NoticeLevel, Notifier, Transaction,
};
use cashdesk_utils::format_number;
use std::sync::atomic::{AtomicU64, Ordering};

/// Notifier that prints notices to stderr
#[derive(Debug, Default)]
pub struct ConsoleNotifier {
    next_id: AtomicU64,
}

impl ConsoleNotifier {
    pub fn new() -> Self {
        Self::default()
    }
}

fn prefix(level: NoticeLevel) -> &'static str {
    match level {
        NoticeLevel::Loading => "..",
        NoticeLevel::Success => "ok",
        NoticeLevel::Error => "!!",
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) -> NoticeId {
        eprintln!("[{}] {}", prefix(level), message);
        NoticeId(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    fn update(&self, _id: NoticeId, level: NoticeLevel, message: &str) {
        eprintln!("[{}] {}", prefix(level), message);
    }
}

pub fn transaction_line(transaction: &Transaction) -> String {
    let date = transaction
        .date_naive()
        .map(cashdesk_core::time::format_input_date)
        .unwrap_or_else(|| transaction.date.clone());
    let sign = if transaction.is_credit() { "+" } else { "-" };
    let mut line = format!(
        "{}  {:<6}  {:>14}  {:<16}  {:<16}  {}",
        date,
        transaction.kind.as_str(),
        format!("{}{}", sign, format_number(transaction.amount)),
        transaction.category_name(),
        transaction.bank_account_name(),
        transaction.description
    );
    if let Some(id) = &transaction.id {
        line.push_str(&format!("  [{}]", id));
    }
    if !transaction.attachments.is_empty() {
        let names: Vec<&str> = transaction.attachments.iter().map(|a| a.display_name()).collect();
        line.push_str(&format!("  ({})", names.join(", ")));
    }
    line
}

pub fn print_transactions(transactions: &[Transaction]) {
    if transactions.is_empty() {
        println!("No transactions.");
        return;
    }
    for transaction in transactions {
        println!("{}", transaction_line(transaction));
    }
}

pub fn print_categories(categories: &[Category]) {
    for category in categories {
        println!("{}  {}", category.id, category.name);
    }
}

pub fn print_bank_accounts(accounts: &[BankAccount]) {
    for account in accounts {
        println!("{}  {}", account.id, account.name);
    }
}

pub fn print_bank_account(detail: &BankAccountDetail) {
    println!("{} ({})", detail.name, detail.id);
    if let Some(balance) = detail.balance {
        println!("  balance: {}", format_number(balance));
    }
    if let Some(account) = &detail.account {
        println!("  account: {}", account.name);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transaction_line() {
        let transaction: Transaction = serde_json::from_str(
            r#"{"id":"t-1","date":"2023-05-10T00:00:00.000Z","description":"Groceries",
                "amount":"1234.50","type":"debit","category_id":"c-1","bank_account_id":"b-1",
                "category":{"id":"c-1","name":"Food"}}"#,
        )
        .unwrap();

        let line = transaction_line(&transaction);

        assert!(line.starts_with("2023-05-10  debit"));
        assert!(line.contains("-1,234.50"));
        assert!(line.contains("Food"));
        assert!(line.contains("b-1"));
        assert!(line.ends_with("Groceries  [t-1]"));
    }

    #[test]
    fn test_console_notifier_ids() {
        let notifier = ConsoleNotifier::new();
        let first = notifier.loading("Deleting...");
        let second = notifier.error("Could not delete this record!");
        assert_ne!(first, second);
    }
}
