//! Transactions page: the list plus the edit form
//!
//! Wires the form controller, the submission pipeline and the list together
//! for one active account.

use cashdesk_config::Config;

use crate::attachments::{PreviewRegistryRef, RawFile};
use crate::error::{CoreError, CoreResult};
use crate::form::{FormPhase, FormStateController};
use crate::models::Transaction;
use crate::notify::NotifierRef;
use crate::reconciler::ListReconciler;
use crate::reference::ReferenceData;
use crate::store::StoreRef;
use crate::submission::{SubmissionPipeline, SubmitOutcome, SubmitRequest};
use crate::types::{FormField, SessionToken, TransactionKind};

/// Options of a workspace
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkspaceOptions {
    /// Account that owns created and edited records
    pub account_id: String,
    pub reload_on_delete_failure: bool,
}

impl WorkspaceOptions {
    pub fn from_config(config: &Config) -> Self {
        Self {
            account_id: config.account_id().unwrap_or_default().to_string(),
            reload_on_delete_failure: config.list.reload_on_delete_failure,
        }
    }
}

/// Puts a submitting form back to editing when a save is dropped mid-request
struct SubmitGuard<'a>(&'a mut FormStateController);

impl Drop for SubmitGuard<'_> {
    fn drop(&mut self) {
        if let FormPhase::Submitting(kind) = self.0.phase() {
            log::debug!("save of {} transaction abandoned, back to editing", kind);
            self.0.submit_failed(None);
        }
    }
}

pub struct TransactionWorkspace {
    store: StoreRef,
    notifier: NotifierRef,
    account_id: String,
    list: ListReconciler,
    form: FormStateController,
    pipeline: SubmissionPipeline,
}

impl TransactionWorkspace {
    pub fn new(
        store: StoreRef,
        notifier: NotifierRef,
        registry: PreviewRegistryRef,
        options: WorkspaceOptions,
    ) -> CoreResult<Self> {
        let account_id = options.account_id.trim().to_string();
        if account_id.is_empty() {
            return Err(CoreError::ConfigError {
                message: "Set session.account_id in the configuration or pass --account".to_string(),
            });
        }

        let list = ListReconciler::new(store.clone(), notifier.clone())
            .reload_on_delete_failure(options.reload_on_delete_failure);
        let pipeline = SubmissionPipeline::new(store.clone(), notifier.clone());

        Ok(Self {
            store,
            notifier,
            account_id,
            list,
            form: FormStateController::new(registry),
            pipeline,
        })
    }

    pub fn account_id(&self) -> &str {
        &self.account_id
    }

    pub async fn load_list(&self) -> CoreResult<usize> {
        self.list.load().await
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.list.items()
    }

    pub fn list(&self) -> &ListReconciler {
        &self.list
    }

    pub fn form(&self) -> &FormStateController {
        &self.form
    }

    /// Open the form, blank or for a record in the displayed list, and
    /// fetch its reference data
    pub async fn open_form(&mut self, existing_id: Option<&str>) -> CoreResult<SessionToken> {
        let existing = match existing_id {
            Some(id) => Some(self.list.find(id).ok_or_else(|| CoreError::TransactionNotFound {
                id: id.to_string(),
            })?),
            None => None,
        };

        let token = self.form.open(existing.as_ref());
        let data = ReferenceData::fetch(self.store.as_ref(), self.notifier.as_ref()).await;
        self.form.apply_reference_data(token, data);
        Ok(token)
    }

    pub fn set_kind(&mut self, kind: TransactionKind) -> CoreResult<()> {
        self.form.set_kind(kind)
    }

    pub fn set_field(&mut self, field: FormField, value: impl Into<String>) -> CoreResult<()> {
        self.form.set_field(field, value)
    }

    pub fn attach_files(&mut self, files: Vec<RawFile>) -> CoreResult<()> {
        self.form.attach_files(files)
    }

    /// Submit the form
    ///
    /// On success the form is closed and the list reloaded from the store;
    /// otherwise the form stays open with its values.
    pub async fn save(&mut self) -> CoreResult<SubmitOutcome> {
        let draft = self.form.begin_submit()?;
        let mut form = SubmitGuard(&mut self.form);
        let outcome = self
            .pipeline
            .submit(SubmitRequest {
                values: &draft.values,
                kind: draft.kind,
                attachments: &draft.attachments,
                account_id: &self.account_id,
                existing_id: draft.existing_id.as_deref(),
            })
            .await;

        match &outcome {
            SubmitOutcome::Saved { .. } => {
                form.0.close();
                drop(form);
                if let Err(e) = self.list.notify_changed().await {
                    log::warn!("list reload after save failed: {}", e);
                }
            }
            SubmitOutcome::ValidationFailed(errors) => form.0.submit_failed(Some(errors.clone())),
            SubmitOutcome::RequestFailed { .. } | SubmitOutcome::AlreadySubmitting => {
                form.0.submit_failed(None)
            }
        }
        Ok(outcome)
    }

    pub fn cancel(&mut self) {
        self.form.close();
    }

    pub async fn delete(&self, id: &str) -> CoreResult<()> {
        self.list.remove(id).await
    }
}
