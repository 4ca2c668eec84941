//! Transport payload of a create/update request
//!
//! A transport-neutral list of named parts; the HTTP store turns it into a
//! multipart body.

use bytes::Bytes;

use crate::attachments::AttachedFile;
use crate::models::FormValues;
use crate::time::{format_input_date, parse_calendar_date};
use crate::types::{FormField, TransactionKind};

pub const TYPE_FIELD: &str = "type";
pub const ACCOUNT_FIELD: &str = "account_id";
pub const FILES_FIELD: &str = "files";

/// Value of a payload part
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartValue {
    Text(String),
    File {
        file_name: String,
        content_type: String,
        bytes: Bytes,
    },
}

/// One named part
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadPart {
    pub name: String,
    pub value: PartValue,
}

impl PayloadPart {
    pub fn text(name: &str, value: impl Into<String>) -> Self {
        Self {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        }
    }

    pub fn file(attached: &AttachedFile) -> Self {
        Self {
            name: FILES_FIELD.to_string(),
            value: PartValue::File {
                file_name: attached.name.clone(),
                content_type: attached.content_type.clone(),
                bytes: attached.file.bytes.clone(),
            },
        }
    }
}

/// Ordered parts of a create/update request
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransportPayload {
    parts: Vec<PayloadPart>,
}

impl TransportPayload {
    /// Build the payload for a validated snapshot
    ///
    /// Scalar fields come first in form order, then `type`, `account_id` and
    /// one `files` part per attachment in drop order.
    pub fn build(
        values: &FormValues,
        kind: TransactionKind,
        attachments: &[AttachedFile],
        account_id: &str,
    ) -> Self {
        let mut parts = Vec::with_capacity(FormField::ALL.len() + 2 + attachments.len());

        for field in FormField::ALL {
            let raw = values.get(field).trim();
            let value = match field {
                FormField::Date => parse_calendar_date(raw)
                    .map(format_input_date)
                    .unwrap_or_else(|| raw.to_string()),
                _ => raw.to_string(),
            };
            parts.push(PayloadPart::text(field.as_str(), value));
        }

        parts.push(PayloadPart::text(TYPE_FIELD, kind.as_str()));
        parts.push(PayloadPart::text(ACCOUNT_FIELD, account_id.trim()));
        parts.extend(attachments.iter().map(PayloadPart::file));

        Self { parts }
    }

    /// Text value of the first part with this name
    pub fn text(&self, name: &str) -> Option<&str> {
        self.parts.iter().find_map(|part| match &part.value {
            PartValue::Text(value) if part.name == name => Some(value.as_str()),
            _ => None,
        })
    }

    /// File parts in order
    pub fn files(&self) -> impl Iterator<Item = &PayloadPart> {
        self.parts
            .iter()
            .filter(|part| matches!(part.value, PartValue::File { .. }))
    }

    pub fn iter(&self) -> impl Iterator<Item = &PayloadPart> {
        self.parts.iter()
    }

    pub fn len(&self) -> usize {
        self.parts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }
}

impl IntoIterator for TransportPayload {
    type Item = PayloadPart;
    type IntoIter = std::vec::IntoIter<PayloadPart>;

    fn into_iter(self) -> Self::IntoIter {
        self.parts.into_iter()
    }
}
