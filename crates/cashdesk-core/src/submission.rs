//! Validate, build and send one create/update request

use std::sync::atomic::{AtomicBool, Ordering};

use crate::attachments::AttachedFile;
use crate::error::{CoreError, DefaultErrorLogger, ErrorContext, ErrorLogger};
use crate::models::{FormValues, Transaction};
use crate::notify::{messages, NotifierRef};
use crate::payload::TransportPayload;
use crate::store::{operations, StoreRef};
use crate::types::TransactionKind;
use crate::validation::{FieldErrors, ValidationEngine};

/// Whether an attempt creates or updates a record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitMode {
    Create,
    Update,
}

impl SubmitMode {
    pub fn success_message(&self) -> &'static str {
        match self {
            SubmitMode::Create => messages::CREATED,
            SubmitMode::Update => messages::UPDATED,
        }
    }

    pub fn failure_message(&self) -> &'static str {
        match self {
            SubmitMode::Create => messages::CREATE_FAILED,
            SubmitMode::Update => messages::UPDATE_FAILED,
        }
    }

    fn operation(&self) -> &'static str {
        match self {
            SubmitMode::Create => operations::CREATE_TRANSACTION,
            SubmitMode::Update => operations::UPDATE_TRANSACTION,
        }
    }
}

/// Input of one submission attempt
#[derive(Debug, Clone, Copy)]
pub struct SubmitRequest<'a> {
    pub values: &'a FormValues,
    pub kind: TransactionKind,
    pub attachments: &'a [AttachedFile],
    pub account_id: &'a str,
    pub existing_id: Option<&'a str>,
}

impl SubmitRequest<'_> {
    pub fn mode(&self) -> SubmitMode {
        match self.existing_id {
            Some(_) => SubmitMode::Update,
            None => SubmitMode::Create,
        }
    }
}

/// Result of one submission attempt
#[derive(Debug)]
pub enum SubmitOutcome {
    /// The store accepted the record; `transaction` is its echo, if any
    Saved {
        mode: SubmitMode,
        transaction: Option<Transaction>,
    },
    /// Local validation failed; nothing was sent
    ValidationFailed(FieldErrors),
    /// The store call failed; the user has been notified
    RequestFailed { mode: SubmitMode, error: CoreError },
    /// Another attempt is still in flight; this one was ignored
    AlreadySubmitting,
}

impl SubmitOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SubmitOutcome::Saved { .. })
    }
}

struct InFlight<'a>(&'a AtomicBool);

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

/// Sends validated snapshots to the record store
pub struct SubmissionPipeline {
    store: StoreRef,
    notifier: NotifierRef,
    validator: ValidationEngine,
    in_flight: AtomicBool,
    logger: DefaultErrorLogger,
}

impl SubmissionPipeline {
    pub fn new(store: StoreRef, notifier: NotifierRef) -> Self {
        Self::with_validator(store, notifier, ValidationEngine::default())
    }

    pub fn with_validator(store: StoreRef, notifier: NotifierRef, validator: ValidationEngine) -> Self {
        Self {
            store,
            notifier,
            validator,
            in_flight: AtomicBool::new(false),
            logger: DefaultErrorLogger,
        }
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Submit one snapshot
    ///
    /// At most one store call per attempt, never retried.
    pub async fn submit(&self, request: SubmitRequest<'_>) -> SubmitOutcome {
        if self.in_flight.swap(true, Ordering::AcqRel) {
            log::debug!("submit ignored, another attempt is in flight");
            return SubmitOutcome::AlreadySubmitting;
        }
        let _in_flight = InFlight(&self.in_flight);

        let errors = self.validator.validate(request.values);
        if !errors.is_empty() {
            log::debug!("submit rejected locally: {} invalid field(s)", errors.len());
            return SubmitOutcome::ValidationFailed(errors);
        }

        let mode = request.mode();
        let payload = TransportPayload::build(
            request.values,
            request.kind,
            request.attachments,
            request.account_id,
        );
        log::info!(
            "{} {} transaction with {} attachment(s)",
            match mode {
                SubmitMode::Create => "creating",
                SubmitMode::Update => "updating",
            },
            request.kind,
            request.attachments.len()
        );

        let result = match request.existing_id {
            Some(id) => self.store.update_transaction(id, payload).await,
            None => self.store.create_transaction(payload).await,
        };

        match result {
            Ok(transaction) => {
                self.notifier.success(mode.success_message());
                SubmitOutcome::Saved { mode, transaction }
            }
            Err(error) => {
                let mut context = ErrorContext::new(mode.operation());
                if let Some(id) = request.existing_id {
                    context = context.with_record_id(id);
                }
                self.logger.log_error(&error, &context);
                self.notifier.error(mode.failure_message());
                SubmitOutcome::RequestFailed { mode, error }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attachments::{FileAttachmentManager, InMemoryPreviewRegistry, RawFile};
    use crate::notify::NoticeLevel;
    use crate::payload::{PartValue, FILES_FIELD};
    use crate::testing::{FakeStore, RecordingNotifier};
    use crate::types::FormField;
    use std::sync::Arc;

    fn valid_values() -> FormValues {
        FormValues {
            date: "2024-03-01".to_string(),
            category_id: "c-1".to_string(),
            description: "Office chair".to_string(),
            amount: "149.90".to_string(),
            bank_account_id: "b-1".to_string(),
        }
    }

    fn setup() -> (Arc<FakeStore>, Arc<RecordingNotifier>, SubmissionPipeline) {
        let store = Arc::new(FakeStore::new());
        let notifier = Arc::new(RecordingNotifier::new());
        let pipeline = SubmissionPipeline::new(store.clone(), notifier.clone());
        (store, notifier, pipeline)
    }

    fn request(values: &FormValues) -> SubmitRequest<'_> {
        SubmitRequest {
            values,
            kind: TransactionKind::Debit,
            attachments: &[],
            account_id: "acc-1",
            existing_id: None,
        }
    }

    #[tokio::test]
    async fn test_missing_field_makes_no_network_call() {
        let (store, notifier, pipeline) = setup();
        for field in FormField::ALL {
            let values = valid_values().with(field, " ");
            match pipeline.submit(request(&values)).await {
                SubmitOutcome::ValidationFailed(errors) => assert!(errors.contains(field)),
                other => panic!("unexpected outcome {:?}", other),
            }
        }
        assert_eq!(store.mutation_calls(), 0);
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_amount_below_minimum_is_rejected() {
        let (store, _, pipeline) = setup();
        let values = valid_values().with(FormField::Amount, "0.05");
        let outcome = pipeline.submit(request(&values)).await;
        assert!(matches!(outcome, SubmitOutcome::ValidationFailed(_)));
        assert_eq!(store.mutation_calls(), 0);
    }

    #[tokio::test]
    async fn test_create_sends_payload_and_notifies() {
        let (store, notifier, pipeline) = setup();
        let mut manager = FileAttachmentManager::new(Arc::new(InMemoryPreviewRegistry::new()));
        manager.add_files(vec![
            RawFile::new("one.png", "image/png", vec![1u8]),
            RawFile::new("two.pdf", "application/pdf", vec![2u8]),
        ]);
        let values = valid_values();
        let outcome = pipeline
            .submit(SubmitRequest {
                attachments: manager.files(),
                ..request(&values)
            })
            .await;

        match outcome {
            SubmitOutcome::Saved { mode, transaction } => {
                assert_eq!(mode, SubmitMode::Create);
                assert_eq!(transaction.unwrap().description, "Office chair");
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(store.calls(operations::CREATE_TRANSACTION), 1);
        assert_eq!(store.calls(operations::UPDATE_TRANSACTION), 0);

        let payloads = store.payloads.lock().unwrap();
        let (target, payload) = &payloads[0];
        assert!(target.is_none());
        assert_eq!(payload.len(), 5 + 2 + 2);
        let file_names: Vec<&str> = payload
            .files()
            .map(|part| match &part.value {
                PartValue::File { file_name, .. } => file_name.as_str(),
                PartValue::Text(_) => "",
            })
            .collect();
        assert_eq!(file_names, vec!["one.png", "two.pdf"]);
        assert!(payload.files().all(|part| part.name == FILES_FIELD));

        assert_eq!(
            notifier.notices(),
            vec![(NoticeLevel::Success, messages::CREATED.to_string())]
        );
    }

    #[tokio::test]
    async fn test_update_targets_existing_id() {
        let (store, notifier, pipeline) = setup();
        let values = valid_values();
        let outcome = pipeline
            .submit(SubmitRequest {
                existing_id: Some("t-7"),
                kind: TransactionKind::Credit,
                ..request(&values)
            })
            .await;

        assert!(outcome.is_saved());
        assert_eq!(store.calls(operations::UPDATE_TRANSACTION), 1);
        assert_eq!(store.calls(operations::CREATE_TRANSACTION), 0);
        let payloads = store.payloads.lock().unwrap();
        assert_eq!(payloads[0].0.as_deref(), Some("t-7"));
        assert_eq!(payloads[0].1.text("type"), Some("credit"));
        assert_eq!(notifier.messages(), vec![messages::UPDATED.to_string()]);
    }

    #[tokio::test]
    async fn test_accepted_update_without_echo_is_saved() {
        let (store, notifier, pipeline) = setup();
        store.accept_silently();
        let values = valid_values();

        let outcome = pipeline
            .submit(SubmitRequest {
                existing_id: Some("t-1"),
                ..request(&values)
            })
            .await;

        match outcome {
            SubmitOutcome::Saved { mode, transaction } => {
                assert_eq!(mode, SubmitMode::Update);
                assert!(transaction.is_none());
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(notifier.messages(), vec![messages::UPDATED.to_string()]);
        assert!(notifier.errors().is_empty());
    }

    #[tokio::test]
    async fn test_request_failure_notifies_once() {
        let (store, notifier, pipeline) = setup();
        store.fail(operations::CREATE_TRANSACTION);
        let values = valid_values();

        let outcome = pipeline.submit(request(&values)).await;

        match outcome {
            SubmitOutcome::RequestFailed { mode, error } => {
                assert_eq!(mode, SubmitMode::Create);
                assert_eq!(error.code(), crate::error::ErrorCode::RequestFailed);
            }
            other => panic!("unexpected outcome {:?}", other),
        }
        assert_eq!(store.calls(operations::CREATE_TRANSACTION), 1);
        assert_eq!(notifier.errors(), vec![messages::CREATE_FAILED.to_string()]);
        assert!(!pipeline.is_submitting());
    }

    #[tokio::test]
    async fn test_second_submit_while_pending_is_ignored() {
        let (store, _, pipeline) = setup();
        store.hold(operations::CREATE_TRANSACTION);
        let values = valid_values();

        let (first, second) = tokio::join!(pipeline.submit(request(&values)), async {
            assert!(pipeline.is_submitting());
            let second = pipeline.submit(request(&values)).await;
            store.release();
            second
        });

        assert!(first.is_saved());
        assert!(matches!(second, SubmitOutcome::AlreadySubmitting));
        assert_eq!(store.mutation_calls(), 1);
        assert!(!pipeline.is_submitting());
    }
}
