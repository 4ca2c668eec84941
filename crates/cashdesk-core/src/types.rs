//! Basic types for the transaction editor

use serde::{Deserialize, Serialize};

/// Transaction kind enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionKind {
    /// Incoming money
    Credit,
    /// Outgoing money
    Debit,
}

impl TransactionKind {
    /// Wire value sent in the `type` field
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionKind::Credit => "credit",
            TransactionKind::Debit => "debit",
        }
    }
}

impl std::str::FromStr for TransactionKind {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "credit" => Ok(TransactionKind::Credit),
            "debit" => Ok(TransactionKind::Debit),
            _ => Err(format!("Invalid transaction kind: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Editable fields of the transaction form
///
/// The string form of each variant is the field key used on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FormField {
    Date,
    CategoryId,
    Description,
    Amount,
    BankAccountId,
}

impl FormField {
    /// All fields in form order
    pub const ALL: [FormField; 5] = [
        FormField::Date,
        FormField::CategoryId,
        FormField::Description,
        FormField::Amount,
        FormField::BankAccountId,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            FormField::Date => "date",
            FormField::CategoryId => "category_id",
            FormField::Description => "description",
            FormField::Amount => "amount",
            FormField::BankAccountId => "bank_account_id",
        }
    }
}

impl std::str::FromStr for FormField {
    type Err = String;
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FormField::ALL
            .iter()
            .copied()
            .find(|field| field.as_str() == s)
            .ok_or_else(|| format!("Unknown form field: {}", s))
    }
}

impl std::fmt::Display for FormField {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Identifies one opening of the form
///
/// Responses that arrive for an older token are stale and get dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SessionToken(pub u64);

impl std::fmt::Display for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "session-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_kind_from_str() {
        assert_eq!(TransactionKind::from_str("credit").unwrap(), TransactionKind::Credit);
        assert_eq!(TransactionKind::from_str(" DEBIT ").unwrap(), TransactionKind::Debit);
        assert!(TransactionKind::from_str("transfer").is_err());
    }

    #[test]
    fn test_kind_serde_uses_wire_names() {
        let json = serde_json::to_string(&TransactionKind::Debit).unwrap();
        assert_eq!(json, "\"debit\"");
        let kind: TransactionKind = serde_json::from_str("\"credit\"").unwrap();
        assert_eq!(kind, TransactionKind::Credit);
    }

    #[test]
    fn test_form_field_names() {
        let names: Vec<&str> = FormField::ALL.iter().map(|f| f.as_str()).collect();
        assert_eq!(
            names,
            vec!["date", "category_id", "description", "amount", "bank_account_id"]
        );
        assert_eq!(FormField::from_str("bank_account_id").unwrap(), FormField::BankAccountId);
        assert!(FormField::from_str("type").is_err());
    }
}
