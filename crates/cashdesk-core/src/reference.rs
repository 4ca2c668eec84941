//! Reference data shown in the form's select inputs

use crate::error::{ErrorContext, ErrorLogger, DefaultErrorLogger};
use crate::models::{BankAccount, Category};
use crate::notify::{messages, Notifier};
use crate::store::{operations, RecordStore};

/// Categories and bank accounts available to the form
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReferenceData {
    pub categories: Vec<Category>,
    pub bank_accounts: Vec<BankAccount>,
}

impl ReferenceData {
    /// Fetch both lists concurrently
    ///
    /// A list that fails to load is reported once and left empty; the other
    /// list is still used.
    pub async fn fetch(store: &dyn RecordStore, notifier: &dyn Notifier) -> Self {
        let (categories, bank_accounts) =
            tokio::join!(store.list_categories(), store.list_bank_accounts());

        let logger = DefaultErrorLogger;
        let mut failed = false;

        let categories = categories.unwrap_or_else(|e| {
            logger.log_error(&e, &ErrorContext::new(operations::LIST_CATEGORIES));
            failed = true;
            Vec::new()
        });
        let bank_accounts = bank_accounts.unwrap_or_else(|e| {
            logger.log_error(&e, &ErrorContext::new(operations::LIST_BANK_ACCOUNTS));
            failed = true;
            Vec::new()
        });

        if failed {
            notifier.error(messages::LOAD_FAILED);
        }

        log::debug!(
            "reference data: {} categories, {} bank accounts",
            categories.len(),
            bank_accounts.len()
        );

        Self {
            categories,
            bank_accounts,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeStore, RecordingNotifier};

    #[tokio::test]
    async fn test_fetch_both_lists() {
        let store = FakeStore::new().with_reference_data();
        let notifier = RecordingNotifier::new();

        let data = ReferenceData::fetch(&store, &notifier).await;

        assert_eq!(data.categories.len(), 1);
        assert_eq!(data.bank_accounts[0].name, "Checking");
        assert_eq!(store.calls(operations::LIST_CATEGORIES), 1);
        assert_eq!(store.calls(operations::LIST_BANK_ACCOUNTS), 1);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_failed_list_is_empty_and_reported_once() {
        let store = FakeStore::new().with_reference_data();
        store.fail(operations::LIST_CATEGORIES);
        let notifier = RecordingNotifier::new();

        let data = ReferenceData::fetch(&store, &notifier).await;

        assert!(data.categories.is_empty());
        assert_eq!(data.bank_accounts.len(), 1);
        assert_eq!(notifier.errors(), vec![messages::LOAD_FAILED.to_string()]);
    }
}
