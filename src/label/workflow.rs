//! Orchestration of the label purchase.
//!
//! Sequences the asynchronous steps of the workflow around the store:
//! normalization when the dialog opens, the normalization join before a
//! purchase, the purchase call itself and its reconciliation, printing
//! and the error notice.

use std::sync::Arc;

use serde_json::Value;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;

use crate::config::{Config, StoreOptions};
use crate::label::action::LabelAction;
use crate::label::error::PurchaseError;
use crate::label::normalize::normalize_address;
use crate::label::payload::{build_purchase_payload, parse_labels};
use crate::label::state::{AddressFields, AddressRole, PurchasedLabel, WorkflowState};
use crate::label::store::LabelStore;
use crate::label::validation::{FormErrors, FormValidator};
use crate::services::{
    pdf_data_uri, AddressNormalizer, DocumentPrinter, LabelPersistence, SaveRequest,
    ServiceError,
};

/// Endpoints, credentials and store settings the orchestrator runs with.
#[derive(Debug, Clone)]
pub struct DispatchContext {
    pub store_options: StoreOptions,
    pub address_normalization_url: String,
    pub purchase_url: String,
    /// Auth token sent with every request.
    pub nonce: String,
}

impl DispatchContext {
    pub fn from_config(config: &Config) -> Self {
        Self {
            store_options: config.store_options.clone(),
            address_normalization_url: config.endpoints.address_normalization_url.clone(),
            purchase_url: config.endpoints.purchase_url.clone(),
            nonce: config.auth.resolve_nonce().unwrap_or_default(),
        }
    }
}

/// Injected collaborators of the workflow.
#[derive(Clone)]
pub struct Capabilities {
    pub normalizer: Arc<dyn AddressNormalizer>,
    pub persistence: Arc<dyn LabelPersistence>,
    pub printer: Arc<dyn DocumentPrinter>,
    pub validator: Arc<dyn FormValidator>,
}

/// The label workflow as seen by a host page.
#[derive(Clone)]
pub struct LabelWorkflow {
    store: LabelStore,
    context: Arc<DispatchContext>,
    capabilities: Capabilities,
}

impl LabelWorkflow {
    pub fn new(store: LabelStore, context: DispatchContext, capabilities: Capabilities) -> Self {
        Self {
            store,
            context: Arc::new(context),
            capabilities,
        }
    }

    pub fn store(&self) -> &LabelStore {
        &self.store
    }

    pub fn state(&self) -> Arc<WorkflowState> {
        self.store.state()
    }

    pub fn dispatch(&self, action: LabelAction) -> Arc<WorkflowState> {
        self.store.dispatch(action)
    }

    /// Current field errors according to the configured validator.
    pub fn errors(&self) -> FormErrors {
        self.capabilities
            .validator
            .validate(&self.store.state().form, &self.context.store_options)
    }

    /// Opens the purchase dialog.
    ///
    /// Every address group that validates cleanly and is neither normalized
    /// nor being normalized gets a normalization request first. Those run
    /// detached: failures are dropped, and the returned handles may be
    /// awaited or ignored (dropping them does not cancel the requests).
    ///
    /// Outside a tokio runtime no normalization is started; the dialog
    /// still opens.
    pub fn open_printing_flow(&self) -> Vec<JoinHandle<()>> {
        let handles = match Handle::try_current() {
            Ok(runtime) => self.spawn_open_normalizations(&runtime),
            Err(err) => {
                tracing::warn!(error = %err, "No async runtime, skipping address normalization");
                Vec::new()
            }
        };

        self.store.dispatch(LabelAction::OpenPrintingFlow);
        handles
    }

    fn spawn_open_normalizations(&self, runtime: &Handle) -> Vec<JoinHandle<()>> {
        let state = self.store.state();
        let errors = self
            .capabilities
            .validator
            .validate(&state.form, &self.context.store_options);

        AddressRole::ALL
            .into_iter()
            .filter(|role| {
                errors.group_is_clean(*role) && state.form.group(*role).awaits_normalization()
            })
            .map(|role| {
                let task = self.normalization_task(role, state.form.group(role).values.clone());
                runtime.spawn(async move {
                    if let Err(err) = task.await {
                        tracing::debug!(group = %role, error = %err, "Normalization failed");
                    }
                })
            })
            .collect()
    }

    pub fn exit_printing_flow(&self) {
        self.store.dispatch(LabelAction::ExitPrintingFlow);
    }

    /// Buys labels for every package of the form.
    ///
    /// Pending normalizations are joined before anything is sent; their
    /// failures are ignored and the typed address is used instead. The
    /// outcome is reconciled into the store (and a failure announced
    /// through an error notice) before it is returned.
    ///
    /// Normalizations and the purchase request run as spawned tasks:
    /// dropping the returned future stops waiting but does not cancel
    /// them, and their completions still reach the store.
    pub async fn purchase_label(&self) -> Result<Vec<PurchasedLabel>, PurchaseError> {
        let state = self.store.state();

        let pending: Vec<_> = AddressRole::ALL
            .into_iter()
            .filter(|role| !state.form.group(*role).is_normalized)
            .map(|role| {
                let values = state.form.group(role).values.clone();
                tokio::spawn(self.normalization_task(role, values))
            })
            .collect();
        for handle in pending {
            match handle.await {
                Ok(Ok(_)) => {}
                Ok(Err(err)) => tracing::debug!(error = %err, "Normalization failed"),
                Err(err) => tracing::debug!(error = %err, "Normalization task aborted"),
            }
        }

        // Normalization may have just replaced the addresses.
        let form = self.store.state().form.clone();
        let payload = match serde_json::to_value(build_purchase_payload(&form)) {
            Ok(payload) => payload,
            Err(err) => return Err(self.report_failure(PurchaseError::Encode(err))),
        };

        tracing::info!(
            packages = form.packages.values.len(),
            url = %self.context.purchase_url,
            "Purchasing labels"
        );
        tokio::spawn(self.clone().submit(payload)).await?
    }

    /// Sends the purchase and reconciles its outcome.
    ///
    /// `PurchaseLabelRequest` and `PurchaseLabelResponse` are always
    /// dispatched as a pair.
    async fn submit(self, payload: Value) -> Result<Vec<PurchasedLabel>, PurchaseError> {
        self.store.dispatch(LabelAction::PurchaseLabelRequest);

        let request = SaveRequest::post(
            self.context.purchase_url.clone(),
            self.context.nonce.clone(),
            payload,
        );
        let outcome = self
            .capabilities
            .persistence
            .save(request)
            .await
            .and_then(parse_labels);

        match outcome {
            Ok(labels) => {
                self.store.dispatch(LabelAction::PurchaseLabelResponse {
                    result: Ok(labels.clone()),
                });
                self.print_first(&labels);
                self.store.dispatch(LabelAction::ExitPrintingFlow);
                tracing::info!(labels = labels.len(), "Labels purchased");
                Ok(labels)
            }
            Err(err) => {
                let err = PurchaseError::Save(err);
                self.store.dispatch(LabelAction::PurchaseLabelResponse {
                    result: Err(err.to_string()),
                });
                Err(self.report_failure(err))
            }
        }
    }

    fn normalization_task(
        &self,
        group: AddressRole,
        values: AddressFields,
    ) -> impl std::future::Future<Output = Result<AddressFields, ServiceError>> + Send + 'static
    {
        let store = self.store.clone();
        let normalizer = Arc::clone(&self.capabilities.normalizer);
        let context = Arc::clone(&self.context);
        async move { normalize_address(&store, normalizer.as_ref(), &context, values, group).await }
    }

    // TODO: print every label once the printer can take several documents.
    fn print_first(&self, labels: &[PurchasedLabel]) {
        let Some(first) = labels.first() else {
            tracing::warn!("Purchase succeeded without any label document");
            return;
        };
        if let Err(err) = self.capabilities.printer.print(&pdf_data_uri(&first.image)) {
            tracing::warn!(error = %err, "Failed to print label");
        }
    }

    fn report_failure(&self, err: PurchaseError) -> PurchaseError {
        tracing::warn!(error = %err, "Label purchase failed");
        self.store.dispatch(LabelAction::ErrorNotice {
            message: err.to_string(),
        });
        err
    }
}
