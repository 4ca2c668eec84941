//! The remote record store seam

use async_trait::async_trait;
use std::sync::Arc;

use crate::error::CoreResult;
use crate::models::{BankAccount, BankAccountDetail, Category, Transaction};
use crate::payload::TransportPayload;

/// Store reference type
pub type StoreRef = Arc<dyn RecordStore>;

/// Operations of the remote record store
///
/// Every failure (transport, timeout, non-success status, undecodable list
/// body) is reported as `CoreError::RequestFailed`. Create and update succeed
/// on any accepted call and return the stored record only when the store
/// echoed one.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// `GET /categories`
    async fn list_categories(&self) -> CoreResult<Vec<Category>>;

    /// `GET /bank-accounts`
    async fn list_bank_accounts(&self) -> CoreResult<Vec<BankAccount>>;

    /// `GET /bank-accounts/{id}`
    async fn get_bank_account(&self, id: &str) -> CoreResult<BankAccountDetail>;

    /// `GET /transactions`
    async fn list_transactions(&self) -> CoreResult<Vec<Transaction>>;

    /// `POST /transactions` with a multipart body
    async fn create_transaction(&self, payload: TransportPayload) -> CoreResult<Option<Transaction>>;

    /// `PUT /transactions/{id}` with a multipart body
    async fn update_transaction(
        &self,
        id: &str,
        payload: TransportPayload,
    ) -> CoreResult<Option<Transaction>>;

    /// `DELETE /transactions/{id}`
    async fn delete_transaction(&self, id: &str) -> CoreResult<()>;

    /// `DELETE /accounts/{id}`
    async fn delete_account(&self, id: &str) -> CoreResult<()>;
}

/// Operation names used in errors and logs
pub mod operations {
    pub const LIST_CATEGORIES: &str = "list_categories";
    pub const LIST_BANK_ACCOUNTS: &str = "list_bank_accounts";
    pub const GET_BANK_ACCOUNT: &str = "get_bank_account";
    pub const LIST_TRANSACTIONS: &str = "list_transactions";
    pub const CREATE_TRANSACTION: &str = "create_transaction";
    pub const UPDATE_TRANSACTION: &str = "update_transaction";
    pub const DELETE_TRANSACTION: &str = "delete_transaction";
    pub const DELETE_ACCOUNT: &str = "delete_account";
}
