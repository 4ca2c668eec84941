//! The displayed transaction list
//!
//! Replaced wholesale on every load; removals are applied optimistically
//! before the store confirms them.

use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::Transaction;
use crate::notify::{messages, NoticeLevel, NotifierRef};
use crate::store::{operations, StoreRef};

/// Keeps the displayed collection in line with the store
pub struct ListReconciler {
    store: StoreRef,
    notifier: NotifierRef,
    items: RwLock<Vec<Transaction>>,
    reload_on_delete_failure: bool,
    logger: DefaultErrorLogger,
}

impl ListReconciler {
    pub fn new(store: StoreRef, notifier: NotifierRef) -> Self {
        Self {
            store,
            notifier,
            items: RwLock::new(Vec::new()),
            reload_on_delete_failure: false,
            logger: DefaultErrorLogger,
        }
    }

    /// Re-fetch the list when a delete is rejected instead of leaving the
    /// optimistic removal in place
    pub fn reload_on_delete_failure(mut self, enabled: bool) -> Self {
        self.reload_on_delete_failure = enabled;
        self
    }

    /// Fetch the full collection and replace the displayed one
    ///
    /// On failure the current collection is kept and a generic notice shown.
    pub async fn load(&self) -> CoreResult<usize> {
        match self.store.list_transactions().await {
            Ok(transactions) => {
                let count = transactions.len();
                *self.write() = transactions;
                log::debug!("transaction list loaded: {} item(s)", count);
                Ok(count)
            }
            Err(error) => {
                self.logger
                    .log_error(&error, &ErrorContext::new(operations::LIST_TRANSACTIONS));
                self.notifier.error(messages::LOAD_FAILED);
                Err(error)
            }
        }
    }

    /// A record was created or updated elsewhere; reload from the store
    pub async fn notify_changed(&self) -> CoreResult<usize> {
        self.load().await
    }

    /// Remove a record, updating the display before the store answers
    pub async fn remove(&self, id: &str) -> CoreResult<()> {
        let removed = {
            let mut items = self.write();
            let before = items.len();
            items.retain(|t| !t.has_id(id));
            before - items.len()
        };
        if removed == 0 {
            log::debug!("transaction {} was not displayed", id);
        }

        let notice = self.notifier.loading(messages::DELETING);
        match self.store.delete_transaction(id).await {
            Ok(()) => {
                self.notifier
                    .update(notice, NoticeLevel::Success, messages::DELETED);
                Ok(())
            }
            Err(error) => {
                self.logger.log_error(
                    &error,
                    &ErrorContext::new(operations::DELETE_TRANSACTION).with_record_id(id),
                );
                self.notifier
                    .update(notice, NoticeLevel::Error, messages::DELETE_FAILED);
                if self.reload_on_delete_failure {
                    // load reports its own failure
                    let _ = self.load().await;
                }
                Err(error)
            }
        }
    }

    /// Snapshot of the displayed collection
    pub fn items(&self) -> Vec<Transaction> {
        self.read().clone()
    }

    pub fn find(&self, id: &str) -> Option<Transaction> {
        self.read().iter().find(|t| t.has_id(id)).cloned()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Transaction>> {
        self.items.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Transaction>> {
        self.items.write().unwrap_or_else(PoisonError::into_inner)
    }
}
