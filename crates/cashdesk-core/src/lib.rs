//! Core of the cashdesk transaction editor
//!
//! Form state, validation, attachment tracking, submission and list
//! reconciliation, written against the `RecordStore` and `Notifier` seams so
//! the transport and the user-facing surface can be swapped.

pub mod attachments;
pub mod bank_account;
pub mod error;
pub mod form;
pub mod models;
pub mod notify;
pub mod payload;
pub mod reconciler;
pub mod reference;
pub mod store;
pub mod submission;
pub mod time;
pub mod types;
pub mod validation;
pub mod workspace;

#[cfg(test)]
mod testing;

pub use attachments::{
    AttachedFile, DropFilter, FileAttachmentManager, InMemoryPreviewRegistry, PreviewHandle,
    PreviewRegistry, PreviewRegistryRef, RawFile,
};
pub use bank_account::BankAccountView;
pub use error::{CoreError, CoreResult, ErrorCode};
pub use form::{FormPhase, FormStateController};
pub use models::{BankAccount, BankAccountDetail, Category, FormValues, PersistedAttachment, Transaction};
pub use notify::{LogNotifier, NoticeId, NoticeLevel, Notifier, NotifierRef};
pub use payload::{PartValue, PayloadPart, TransportPayload};
pub use reconciler::ListReconciler;
pub use reference::ReferenceData;
pub use store::{RecordStore, StoreRef};
pub use submission::{SubmissionPipeline, SubmitMode, SubmitOutcome, SubmitRequest};
pub use types::{FormField, SessionToken, TransactionKind};
pub use validation::{FieldErrors, ValidationEngine};
pub use workspace::{TransactionWorkspace, WorkspaceOptions};
