//! Declarative validation of the transaction form
//!
//! A schema is a list of fields, each with an ordered list of rules. The first
//! rule a field fails produces its message; fields are independent.

use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::str::FromStr;

use crate::models::FormValues;
use crate::time::parse_calendar_date;
use crate::types::FormField;

/// Smallest accepted amount
pub const MIN_AMOUNT: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

/// Maximum number of decimal places in an amount
pub const AMOUNT_SCALE: u32 = 2;

/// Per-field error messages
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(BTreeMap<FormField, String>);

impl FieldErrors {
    pub fn insert(&mut self, field: FormField, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }

    pub fn get(&self, field: FormField) -> Option<&str> {
        self.0.get(&field).map(|m| m.as_str())
    }

    pub fn remove(&mut self, field: FormField) -> Option<String> {
        self.0.remove(&field)
    }

    pub fn contains(&self, field: FormField) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Errors in form field order
    pub fn iter(&self) -> impl Iterator<Item = (FormField, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }
}

/// A single validation rule
#[derive(Debug, Clone, PartialEq)]
pub enum Rule {
    /// Value must not be blank
    Required,
    /// Value must be a calendar date
    CalendarDate,
    /// Value must be a decimal number
    Numeric,
    /// Number must be greater than or equal to the bound
    Min(Decimal),
    /// Number must not have more decimal places than this
    MaxScale(u32),
}

impl Rule {
    /// Check a trimmed value, returning the error message on failure
    fn check(&self, field: FormField, value: &str) -> Option<String> {
        match self {
            Rule::Required => {
                if value.is_empty() {
                    Some(format!("{} is required", field))
                } else {
                    None
                }
            }
            Rule::CalendarDate => match parse_calendar_date(value) {
                Some(_) => None,
                None => Some(format!("{} must be a valid date (YYYY-MM-DD)", field)),
            },
            Rule::Numeric => match parse_amount(value) {
                Some(_) => None,
                None => Some(format!("{} must be a number", field)),
            },
            Rule::Min(min) => match parse_amount(value) {
                Some(number) if number < *min => {
                    Some(format!("{} must be at least {}", field, min))
                }
                _ => None,
            },
            Rule::MaxScale(scale) => match parse_amount(value) {
                Some(number) if number.normalize().scale() > *scale => Some(format!(
                    "{} must have at most {} decimal places",
                    field, scale
                )),
                _ => None,
            },
        }
    }
}

/// Parse an amount as typed into the form
pub fn parse_amount(value: &str) -> Option<Decimal> {
    Decimal::from_str(value.trim()).ok()
}

/// Rules for one field
#[derive(Debug, Clone, PartialEq)]
pub struct FieldSchema {
    pub field: FormField,
    pub rules: Vec<Rule>,
}

impl FieldSchema {
    pub fn new(field: FormField, rules: Vec<Rule>) -> Self {
        Self { field, rules }
    }
}

/// Evaluates a schema against form values
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationEngine {
    schema: Vec<FieldSchema>,
}

impl Default for ValidationEngine {
    fn default() -> Self {
        Self::transaction_schema()
    }
}

impl ValidationEngine {
    pub fn new(schema: Vec<FieldSchema>) -> Self {
        Self { schema }
    }

    /// Schema of the transaction form
    pub fn transaction_schema() -> Self {
        Self::new(vec![
            FieldSchema::new(FormField::Date, vec![Rule::Required, Rule::CalendarDate]),
            FieldSchema::new(FormField::CategoryId, vec![Rule::Required]),
            FieldSchema::new(FormField::Description, vec![Rule::Required]),
            FieldSchema::new(
                FormField::Amount,
                vec![
                    Rule::Required,
                    Rule::Numeric,
                    Rule::Min(MIN_AMOUNT),
                    Rule::MaxScale(AMOUNT_SCALE),
                ],
            ),
            FieldSchema::new(FormField::BankAccountId, vec![Rule::Required]),
        ])
    }

    /// Validate a snapshot, returning one message per invalid field
    pub fn validate(&self, values: &FormValues) -> FieldErrors {
        let mut errors = FieldErrors::default();
        for entry in &self.schema {
            let value = values.get(entry.field).trim();
            if let Some(message) = entry.rules.iter().find_map(|rule| rule.check(entry.field, value)) {
                errors.insert(entry.field, message);
            }
        }
        errors
    }
}
