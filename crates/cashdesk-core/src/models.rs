//! Core data models exchanged with the record store

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::time::{parse_calendar_date, to_input_date};
use super::types::{FormField, TransactionKind};

/// Category reference entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
}

/// Bank account reference entity
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: String,
    pub name: String,
}

/// Owning account summary, as nested in a bank account detail
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
}

/// Bank account detail returned by `GET /bank-accounts/{id}`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BankAccountDetail {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub balance: Option<Decimal>,
    #[serde(default)]
    pub account: Option<AccountSummary>,
}

/// Stored file metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredFile {
    pub id: String,
    #[serde(default)]
    pub content_type: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub original_name: String,
}

/// A file already linked to a transaction on the server
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistedAttachment {
    pub id: String,
    #[serde(default)]
    pub file_id: String,
    pub file: StoredFile,
}

impl PersistedAttachment {
    /// Name to show for this attachment
    pub fn display_name(&self) -> &str {
        if self.file.original_name.is_empty() {
            &self.file.name
        } else {
            &self.file.original_name
        }
    }
}

/// Transaction information
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier, absent until persisted
    #[serde(default)]
    pub id: Option<String>,
    /// Date or timestamp as sent by the store
    pub date: String,
    pub description: String,
    pub amount: Decimal,
    #[serde(rename = "type")]
    pub kind: TransactionKind,
    pub category_id: String,
    pub bank_account_id: String,
    /// Owning account
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub user_id: Option<String>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default, rename = "updatedAt")]
    pub updated_at: Option<String>,
    #[serde(default)]
    pub category: Option<Category>,
    #[serde(default, rename = "bankAccount")]
    pub bank_account: Option<BankAccount>,
    #[serde(default, rename = "fileOnTransaction")]
    pub attachments: Vec<PersistedAttachment>,
}

impl Transaction {
    /// Get the transaction date as NaiveDate
    pub fn date_naive(&self) -> Option<NaiveDate> {
        parse_calendar_date(&self.date)
    }

    pub fn is_credit(&self) -> bool {
        self.kind == TransactionKind::Credit
    }

    /// Check whether this record has the given id
    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    /// Category display name, falling back to the reference id
    pub fn category_name(&self) -> &str {
        self.category
            .as_ref()
            .map(|c| c.name.as_str())
            .unwrap_or(&self.category_id)
    }

    /// Bank account display name, falling back to the reference id
    pub fn bank_account_name(&self) -> &str {
        self.bank_account
            .as_ref()
            .map(|b| b.name.as_str())
            .unwrap_or(&self.bank_account_id)
    }
}

/// Immutable snapshot of the editable form fields
///
/// Values are kept as entered; validation decides whether they are usable.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormValues {
    pub date: String,
    pub category_id: String,
    pub description: String,
    pub amount: String,
    pub bank_account_id: String,
}

impl FormValues {
    /// Seed values from an existing record, date in editor format
    pub fn from_transaction(transaction: &Transaction) -> Self {
        Self {
            date: to_input_date(&transaction.date),
            category_id: transaction.category_id.clone(),
            description: transaction.description.clone(),
            amount: transaction.amount.to_string(),
            bank_account_id: transaction.bank_account_id.clone(),
        }
    }

    pub fn get(&self, field: FormField) -> &str {
        match field {
            FormField::Date => &self.date,
            FormField::CategoryId => &self.category_id,
            FormField::Description => &self.description,
            FormField::Amount => &self.amount,
            FormField::BankAccountId => &self.bank_account_id,
        }
    }

    pub fn set(&mut self, field: FormField, value: impl Into<String>) {
        let value = value.into();
        match field {
            FormField::Date => self.date = value,
            FormField::CategoryId => self.category_id = value,
            FormField::Description => self.description = value,
            FormField::Amount => self.amount = value,
            FormField::BankAccountId => self.bank_account_id = value,
        }
    }

    /// Builder-style setter
    pub fn with(mut self, field: FormField, value: impl Into<String>) -> Self {
        self.set(field, value);
        self
    }

    pub fn is_blank(&self) -> bool {
        FormField::ALL.iter().all(|field| self.get(*field).is_empty())
    }
}
