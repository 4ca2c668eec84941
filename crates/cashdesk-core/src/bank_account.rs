//! Bank account detail page

use std::sync::{PoisonError, RwLock};

use crate::error::{CoreResult, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::BankAccountDetail;
use crate::notify::{messages, NoticeLevel, NotifierRef};
use crate::store::{operations, StoreRef};

pub struct BankAccountView {
    store: StoreRef,
    notifier: NotifierRef,
    detail: RwLock<Option<BankAccountDetail>>,
    logger: DefaultErrorLogger,
}

impl BankAccountView {
    pub fn new(store: StoreRef, notifier: NotifierRef) -> Self {
        Self {
            store,
            notifier,
            detail: RwLock::new(None),
            logger: DefaultErrorLogger,
        }
    }

    /// Fetch and keep the detail of one bank account
    pub async fn load(&self, id: &str) -> CoreResult<BankAccountDetail> {
        match self.store.get_bank_account(id).await {
            Ok(detail) => {
                *self.detail.write().unwrap_or_else(PoisonError::into_inner) = Some(detail.clone());
                Ok(detail)
            }
            Err(error) => {
                self.logger.log_error(
                    &error,
                    &ErrorContext::new(operations::GET_BANK_ACCOUNT).with_record_id(id),
                );
                self.notifier.error(messages::LOAD_FAILED);
                Err(error)
            }
        }
    }

    pub fn detail(&self) -> Option<BankAccountDetail> {
        self.detail.read().unwrap_or_else(PoisonError::into_inner).clone()
    }

    /// Delete an account, with a progress notice updated in place
    pub async fn delete_account(&self, id: &str) -> CoreResult<()> {
        let notice = self.notifier.loading(messages::DELETING);
        match self.store.delete_account(id).await {
            Ok(()) => {
                self.notifier.update(notice, NoticeLevel::Success, messages::DELETED);
                Ok(())
            }
            Err(error) => {
                self.logger.log_error(
                    &error,
                    &ErrorContext::new(operations::DELETE_ACCOUNT).with_record_id(id),
                );
                self.notifier.update(notice, NoticeLevel::Error, messages::DELETE_FAILED);
                Err(error)
            }
        }
    }
}
