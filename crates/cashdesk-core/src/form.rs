//! Working state of one transaction edit session
//!
//! Phases: `Closed -> KindUnselected -> KindSelected -> Submitting`, and from
//! `Submitting` back to `KindSelected` on failure or to `Closed` on success.
//! Detail fields and attachments can only be edited once a kind is chosen.

use crate::attachments::{AttachedFile, FileAttachmentManager, PreviewRegistryRef, RawFile};
use crate::error::{CoreError, CoreResult};
use crate::models::{BankAccount, Category, FormValues, PersistedAttachment, Transaction};
use crate::reference::ReferenceData;
use crate::types::{FormField, SessionToken, TransactionKind};
use crate::validation::FieldErrors;

/// Form phase
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormPhase {
    Closed,
    KindUnselected,
    KindSelected(TransactionKind),
    Submitting(TransactionKind),
}

impl FormPhase {
    pub fn is_open(&self) -> bool {
        !matches!(self, FormPhase::Closed)
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        match self {
            FormPhase::KindSelected(kind) | FormPhase::Submitting(kind) => Some(*kind),
            _ => None,
        }
    }
}

impl std::fmt::Display for FormPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FormPhase::Closed => write!(f, "closed"),
            FormPhase::KindUnselected => write!(f, "kind unselected"),
            FormPhase::KindSelected(kind) => write!(f, "editing {}", kind),
            FormPhase::Submitting(kind) => write!(f, "submitting {}", kind),
        }
    }
}

/// Everything a submission attempt needs, detached from the controller
#[derive(Debug, Clone)]
pub struct SubmissionDraft {
    pub token: SessionToken,
    pub values: FormValues,
    pub kind: TransactionKind,
    pub attachments: Vec<AttachedFile>,
    pub existing_id: Option<String>,
}

/// Owns the working copy of one edit session
#[derive(Debug)]
pub struct FormStateController {
    phase: FormPhase,
    values: FormValues,
    existing_id: Option<String>,
    persisted: Vec<PersistedAttachment>,
    attachments: FileAttachmentManager,
    errors: FieldErrors,
    token: Option<SessionToken>,
    issued: u64,
    categories: Vec<Category>,
    bank_accounts: Vec<BankAccount>,
}

impl FormStateController {
    pub fn new(registry: PreviewRegistryRef) -> Self {
        Self {
            phase: FormPhase::Closed,
            values: FormValues::default(),
            existing_id: None,
            persisted: Vec::new(),
            attachments: FileAttachmentManager::new(registry),
            errors: FieldErrors::default(),
            token: None,
            issued: 0,
            categories: Vec::new(),
            bank_accounts: Vec::new(),
        }
    }

    /// Start a session, blank or seeded from an existing record
    pub fn open(&mut self, existing: Option<&Transaction>) -> SessionToken {
        self.discard();
        self.categories.clear();
        self.bank_accounts.clear();

        self.issued += 1;
        let token = SessionToken(self.issued);
        self.token = Some(token);

        match existing {
            Some(transaction) => {
                self.values = FormValues::from_transaction(transaction);
                self.existing_id = transaction.id.clone();
                self.persisted = transaction.attachments.clone();
                self.phase = FormPhase::KindSelected(transaction.kind);
            }
            None => self.phase = FormPhase::KindUnselected,
        }

        log::debug!("form opened ({}, {})", token, self.phase);
        token
    }

    /// Choose the kind; entered values are kept
    pub fn set_kind(&mut self, kind: TransactionKind) -> CoreResult<()> {
        match self.phase {
            FormPhase::KindUnselected | FormPhase::KindSelected(_) => {
                self.phase = FormPhase::KindSelected(kind);
                Ok(())
            }
            FormPhase::Submitting(_) => Err(CoreError::SubmissionInProgress),
            FormPhase::Closed => Err(CoreError::invalid_state("the form is not open")),
        }
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> CoreResult<()> {
        self.ensure_editable()?;
        self.values.set(field, value);
        self.errors.remove(field);
        Ok(())
    }

    /// Replace the pending attachment set
    pub fn attach_files(&mut self, files: Vec<RawFile>) -> CoreResult<()> {
        self.ensure_editable()?;
        self.attachments.add_files(files);
        Ok(())
    }

    /// Install reference data fetched for a session
    ///
    /// Returns false when the token is not the current session's.
    pub fn apply_reference_data(&mut self, token: SessionToken, data: ReferenceData) -> bool {
        if !self.phase.is_open() || self.token != Some(token) {
            log::debug!("discarding reference data for stale {}", token);
            return false;
        }
        self.categories = data.categories;
        self.bank_accounts = data.bank_accounts;
        true
    }

    /// Enter `Submitting` and hand out a snapshot of the session
    pub fn begin_submit(&mut self) -> CoreResult<SubmissionDraft> {
        let kind = match self.phase {
            FormPhase::KindSelected(kind) => kind,
            FormPhase::Submitting(_) => return Err(CoreError::SubmissionInProgress),
            FormPhase::KindUnselected => {
                return Err(CoreError::invalid_state("choose credit or debit before saving"))
            }
            FormPhase::Closed => return Err(CoreError::invalid_state("the form is not open")),
        };
        let token = self
            .token
            .ok_or_else(|| CoreError::invalid_state("the form has no session"))?;

        self.phase = FormPhase::Submitting(kind);
        Ok(SubmissionDraft {
            token,
            values: self.values.clone(),
            kind,
            attachments: self.attachments.files().to_vec(),
            existing_id: self.existing_id.clone(),
        })
    }

    /// Return to editing after a failed attempt, values intact
    pub fn submit_failed(&mut self, errors: Option<FieldErrors>) {
        if let FormPhase::Submitting(kind) = self.phase {
            self.phase = FormPhase::KindSelected(kind);
        }
        if let Some(errors) = errors {
            self.errors = errors;
        }
    }

    /// Discard all working state and close
    pub fn close(&mut self) {
        self.discard();
        self.categories.clear();
        self.bank_accounts.clear();
        self.token = None;
        self.phase = FormPhase::Closed;
    }

    /// Discard all working state, including the link to an existing record
    ///
    /// An open form stays open with no kind chosen.
    pub fn reset(&mut self) {
        self.discard();
        if self.phase.is_open() {
            self.phase = FormPhase::KindUnselected;
        }
    }

    pub fn phase(&self) -> FormPhase {
        self.phase
    }

    pub fn is_open(&self) -> bool {
        self.phase.is_open()
    }

    pub fn kind(&self) -> Option<TransactionKind> {
        self.phase.kind()
    }

    pub fn token(&self) -> Option<SessionToken> {
        self.token
    }

    pub fn values(&self) -> &FormValues {
        &self.values
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Id of the record being edited, if any
    pub fn existing_id(&self) -> Option<&str> {
        self.existing_id.as_deref()
    }

    pub fn persisted_attachments(&self) -> &[PersistedAttachment] {
        &self.persisted
    }

    pub fn attachments(&self) -> &[AttachedFile] {
        self.attachments.files()
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn bank_accounts(&self) -> &[BankAccount] {
        &self.bank_accounts
    }

    fn ensure_editable(&self) -> CoreResult<()> {
        match self.phase {
            FormPhase::KindSelected(_) => Ok(()),
            FormPhase::KindUnselected => {
                Err(CoreError::invalid_state("choose credit or debit first"))
            }
            FormPhase::Submitting(_) => Err(CoreError::SubmissionInProgress),
            FormPhase::Closed => Err(CoreError::invalid_state("the form is not open")),
        }
    }

    fn discard(&mut self) {
        self.values = FormValues::default();
        self.existing_id = None;
        self.persisted.clear();
        self.attachments.clear();
        self.errors = FieldErrors::default();
    }
}
