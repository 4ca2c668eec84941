//! In-memory fakes shared by the unit tests

use async_trait::async_trait;
use rust_decimal::Decimal;
use std::collections::{HashMap, HashSet};
use std::str::FromStr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tokio::sync::Semaphore;

use crate::error::{CoreError, CoreResult};
use crate::models::{BankAccount, BankAccountDetail, Category, Transaction};
use crate::notify::{NoticeId, NoticeLevel, Notifier};
use crate::payload::{TransportPayload, ACCOUNT_FIELD, TYPE_FIELD};
use crate::store::{operations, RecordStore};
use crate::types::TransactionKind;

pub fn transaction(id: &str, description: &str) -> Transaction {
    Transaction {
        id: Some(id.to_string()),
        date: "2024-01-15T00:00:00.000Z".to_string(),
        description: description.to_string(),
        amount: Decimal::new(1250, 2),
        kind: TransactionKind::Debit,
        category_id: "c-1".to_string(),
        bank_account_id: "b-1".to_string(),
        account_id: "acc-1".to_string(),
        user_id: None,
        created_at: None,
        updated_at: None,
        category: None,
        bank_account: None,
        attachments: Vec::new(),
    }
}

/// Record store fake with call counters, injectable failures and a gate
/// that holds selected operations pending until released
///
/// Listed transactions carry category and bank account summaries joined from
/// the reference lists, as a real store does; saved echoes do not.
pub struct FakeStore {
    pub categories: Mutex<Vec<Category>>,
    pub bank_accounts: Mutex<Vec<BankAccount>>,
    pub transactions: Mutex<Vec<Transaction>>,
    pub detail: Mutex<Option<BankAccountDetail>>,
    pub payloads: Mutex<Vec<(Option<String>, TransportPayload)>>,
    calls: Mutex<HashMap<&'static str, usize>>,
    failing: Mutex<HashSet<&'static str>>,
    gated: Mutex<HashSet<&'static str>>,
    gate: Semaphore,
    silent: AtomicBool,
}

impl Default for FakeStore {
    fn default() -> Self {
        Self {
            categories: Mutex::default(),
            bank_accounts: Mutex::default(),
            transactions: Mutex::default(),
            detail: Mutex::default(),
            payloads: Mutex::default(),
            calls: Mutex::default(),
            failing: Mutex::default(),
            gated: Mutex::default(),
            gate: Semaphore::new(0),
            silent: AtomicBool::new(false),
        }
    }
}

impl FakeStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_transactions(transactions: Vec<Transaction>) -> Self {
        let store = Self::default();
        *store.transactions.lock().unwrap() = transactions;
        store
    }

    pub fn with_reference_data(self) -> Self {
        *self.categories.lock().unwrap() = vec![Category {
            id: "c-1".to_string(),
            name: "Food".to_string(),
        }];
        *self.bank_accounts.lock().unwrap() = vec![BankAccount {
            id: "b-1".to_string(),
            name: "Checking".to_string(),
        }];
        self
    }

    pub fn fail(&self, operation: &'static str) {
        self.failing.lock().unwrap().insert(operation);
    }

    pub fn recover(&self, operation: &'static str) {
        self.failing.lock().unwrap().remove(operation);
    }

    /// Accept creates and updates without echoing the stored record
    pub fn accept_silently(&self) {
        self.silent.store(true, Ordering::SeqCst);
    }

    /// Hold calls of this operation pending until `release` is called
    pub fn hold(&self, operation: &'static str) {
        self.gated.lock().unwrap().insert(operation);
    }

    /// Let one held call proceed
    pub fn release(&self) {
        self.gate.add_permits(1);
    }

    pub fn calls(&self, operation: &str) -> usize {
        self.calls.lock().unwrap().get(operation).copied().unwrap_or(0)
    }

    pub fn mutation_calls(&self) -> usize {
        self.calls(operations::CREATE_TRANSACTION) + self.calls(operations::UPDATE_TRANSACTION)
    }

    async fn enter(&self, operation: &'static str) -> CoreResult<()> {
        *self.calls.lock().unwrap().entry(operation).or_insert(0) += 1;
        let held = self.gated.lock().unwrap().contains(operation);
        if held {
            self.gate.acquire().await.unwrap().forget();
        }
        if self.failing.lock().unwrap().contains(operation) {
            return Err(CoreError::request_failed(operation, "simulated failure"));
        }
        Ok(())
    }

    fn echo(&self, saved: Transaction) -> Option<Transaction> {
        if self.silent.load(Ordering::SeqCst) {
            None
        } else {
            Some(saved)
        }
    }

    fn joined(&self, mut transaction: Transaction) -> Transaction {
        transaction.category = self
            .categories
            .lock()
            .unwrap()
            .iter()
            .find(|c| c.id == transaction.category_id)
            .cloned();
        transaction.bank_account = self
            .bank_accounts
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == transaction.bank_account_id)
            .cloned();
        transaction
    }

    fn saved(&self, id: String, payload: &TransportPayload) -> Transaction {
        let text = |name: &str| payload.text(name).unwrap_or_default().to_string();
        Transaction {
            id: Some(id),
            date: text("date"),
            description: text("description"),
            amount: Decimal::from_str(&text("amount")).unwrap(),
            kind: TransactionKind::from_str(&text(TYPE_FIELD)).unwrap(),
            category_id: text("category_id"),
            bank_account_id: text("bank_account_id"),
            account_id: text(ACCOUNT_FIELD),
            user_id: None,
            created_at: None,
            updated_at: None,
            category: None,
            bank_account: None,
            attachments: Vec::new(),
        }
    }
}

#[async_trait]
impl RecordStore for FakeStore {
    async fn list_categories(&self) -> CoreResult<Vec<Category>> {
        self.enter(operations::LIST_CATEGORIES).await?;
        Ok(self.categories.lock().unwrap().clone())
    }

    async fn list_bank_accounts(&self) -> CoreResult<Vec<BankAccount>> {
        self.enter(operations::LIST_BANK_ACCOUNTS).await?;
        Ok(self.bank_accounts.lock().unwrap().clone())
    }

    async fn get_bank_account(&self, id: &str) -> CoreResult<BankAccountDetail> {
        self.enter(operations::GET_BANK_ACCOUNT).await?;
        self.detail
            .lock()
            .unwrap()
            .clone()
            .filter(|detail| detail.id == id)
            .ok_or_else(|| CoreError::request_failed(operations::GET_BANK_ACCOUNT, "404 Not Found"))
    }

    async fn list_transactions(&self) -> CoreResult<Vec<Transaction>> {
        self.enter(operations::LIST_TRANSACTIONS).await?;
        let stored = self.transactions.lock().unwrap().clone();
        Ok(stored.into_iter().map(|t| self.joined(t)).collect())
    }

    async fn create_transaction(&self, payload: TransportPayload) -> CoreResult<Option<Transaction>> {
        self.enter(operations::CREATE_TRANSACTION).await?;
        let saved = {
            let mut transactions = self.transactions.lock().unwrap();
            let saved = self.saved(format!("t-{}", transactions.len() + 1), &payload);
            transactions.push(saved.clone());
            saved
        };
        self.payloads.lock().unwrap().push((None, payload));
        Ok(self.echo(saved))
    }

    async fn update_transaction(
        &self,
        id: &str,
        payload: TransportPayload,
    ) -> CoreResult<Option<Transaction>> {
        self.enter(operations::UPDATE_TRANSACTION).await?;
        let saved = self.saved(id.to_string(), &payload);
        if let Some(existing) = self.transactions.lock().unwrap().iter_mut().find(|t| t.has_id(id)) {
            *existing = saved.clone();
        }
        self.payloads.lock().unwrap().push((Some(id.to_string()), payload));
        Ok(self.echo(saved))
    }

    async fn delete_transaction(&self, id: &str) -> CoreResult<()> {
        self.enter(operations::DELETE_TRANSACTION).await?;
        self.transactions.lock().unwrap().retain(|t| !t.has_id(id));
        Ok(())
    }

    async fn delete_account(&self, _id: &str) -> CoreResult<()> {
        self.enter(operations::DELETE_ACCOUNT).await?;
        Ok(())
    }
}

/// Notifier that records every notice and keeps in-place updates
#[derive(Default)]
pub struct RecordingNotifier {
    notices: Mutex<Vec<(NoticeLevel, String)>>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current state of every notice shown, in order
    pub fn notices(&self) -> Vec<(NoticeLevel, String)> {
        self.notices.lock().unwrap().clone()
    }

    pub fn messages(&self) -> Vec<String> {
        self.notices().into_iter().map(|(_, message)| message).collect()
    }

    pub fn errors(&self) -> Vec<String> {
        self.notices()
            .into_iter()
            .filter(|(level, _)| *level == NoticeLevel::Error)
            .map(|(_, message)| message)
            .collect()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, level: NoticeLevel, message: &str) -> NoticeId {
        let mut notices = self.notices.lock().unwrap();
        notices.push((level, message.to_string()));
        NoticeId(notices.len() as u64 - 1)
    }

    fn update(&self, id: NoticeId, level: NoticeLevel, message: &str) {
        if let Some(notice) = self.notices.lock().unwrap().get_mut(id.0 as usize) {
            *notice = (level, message.to_string());
        }
    }
}
