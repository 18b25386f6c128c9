//! Shared fixtures and recording fakes for the label workflow capabilities.

#![allow(dead_code, unused_imports)]

pub mod mock_endpoints;

use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{json, Value};
use shipping_label::config::StoreOptions;
use shipping_label::label::{
    AddressFields, AddressGroup, AddressRole, Capabilities, DispatchContext, LabelForm,
    LabelStore, LabelWorkflow, PackageEntry, PackageItem, RequiredFieldsValidator, WorkflowState,
};
use shipping_label::services::{
    AddressNormalizer, DocumentPrinter, LabelPersistence, NormalizeRequest, Notifier,
    SaveRequest, ServiceError,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

pub const NORMALIZE_URL: &str = "https://shop.test/normalize-address";
pub const PURCHASE_URL: &str = "https://shop.test/label/purchase";
pub const NONCE: &str = "nonce-123";

/// A complete, valid US address whose street carries `street`.
pub fn address(street: &str) -> AddressFields {
    [
        ("name", "Jane Doe"),
        ("address", street),
        ("city", "Springfield"),
        ("postcode", "62701"),
        ("country", "US"),
        ("state", "IL"),
    ]
    .iter()
    .map(|(k, v)| (k.to_string(), v.to_string()))
    .collect()
}

/// `raw` with the street upper-cased, as a normalizer would answer.
pub fn normalized(raw: &AddressFields) -> AddressFields {
    let mut fields = raw.clone();
    if let Some(street) = fields.get_mut("address") {
        *street = street.to_uppercase();
    }
    fields
}

/// Group that already went through a successful normalization.
pub fn normalized_group(raw: AddressFields) -> AddressGroup {
    AddressGroup {
        normalized: Some(normalized(&raw)),
        is_normalized: true,
        select_normalized: true,
        ..AddressGroup::new(raw)
    }
}

pub fn item(product_id: &str, quantity: u32) -> PackageItem {
    PackageItem {
        product_id: product_id.to_string(),
        quantity,
    }
}

pub fn package(id: &str, weight: f64, items: Vec<PackageItem>) -> PackageEntry {
    PackageEntry::new(id, weight, items)
}

pub fn two_packages() -> Vec<PackageEntry> {
    vec![
        package("pkg-1", 2.0, vec![item("A", 2), item("B", 1)]),
        package("pkg-2", 4.5, vec![item("C", 1)]),
    ]
}

pub fn context() -> DispatchContext {
    DispatchContext {
        store_options: StoreOptions::default(),
        address_normalization_url: NORMALIZE_URL.to_string(),
        purchase_url: PURCHASE_URL.to_string(),
        nonce: NONCE.to_string(),
    }
}

/// Normalizer answering from a per-group script.
#[derive(Default)]
pub struct FakeNormalizer {
    outcomes: Mutex<HashMap<AddressRole, Result<AddressFields, String>>>,
    calls: Mutex<Vec<NormalizeRequest>>,
    delay: Mutex<Duration>,
}

impl FakeNormalizer {
    pub fn succeed(&self, group: AddressRole, fields: AddressFields) {
        self.outcomes.lock().insert(group, Ok(fields));
    }

    pub fn fail(&self, group: AddressRole, message: &str) {
        self.outcomes.lock().insert(group, Err(message.to_string()));
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    pub fn calls(&self) -> Vec<NormalizeRequest> {
        self.calls.lock().clone()
    }

    pub fn called_groups(&self) -> Vec<AddressRole> {
        let mut groups: Vec<_> = self.calls.lock().iter().map(|c| c.group).collect();
        groups.sort_by_key(|g| g.as_str());
        groups
    }
}

#[async_trait]
impl AddressNormalizer for FakeNormalizer {
    async fn normalize(&self, request: NormalizeRequest) -> Result<AddressFields, ServiceError> {
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let outcome = self.outcomes.lock().get(&request.group).cloned();
        self.calls.lock().push(request);
        match outcome {
            Some(Ok(fields)) => Ok(fields),
            Some(Err(message)) => Err(ServiceError::Rejected(message)),
            None => Err(ServiceError::Rejected("unscripted".to_string())),
        }
    }
}

/// Persistence recording every request and answering with a scripted body.
pub struct RecordingPersistence {
    response: Mutex<Result<Value, String>>,
    requests: Mutex<Vec<SaveRequest>>,
    probe: Mutex<Option<LabelStore>>,
    submitting_during_save: Mutex<Vec<bool>>,
    delay: Mutex<Duration>,
}

impl Default for RecordingPersistence {
    fn default() -> Self {
        Self {
            response: Mutex::new(Ok(json!([{ "image": "JVBERi0xLjQ=", "label_id": 1 }]))),
            requests: Mutex::new(Vec::new()),
            probe: Mutex::new(None),
            submitting_during_save: Mutex::new(Vec::new()),
            delay: Mutex::new(Duration::ZERO),
        }
    }
}

impl RecordingPersistence {
    pub fn respond(&self, body: Value) {
        *self.response.lock() = Ok(body);
    }

    pub fn fail(&self, message: &str) {
        *self.response.lock() = Err(message.to_string());
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock() = delay;
    }

    /// Record `is_submitting` of `store` whenever a save starts.
    pub fn watch(&self, store: LabelStore) {
        *self.probe.lock() = Some(store);
    }

    pub fn requests(&self) -> Vec<SaveRequest> {
        self.requests.lock().clone()
    }

    pub fn submitting_during_save(&self) -> Vec<bool> {
        self.submitting_during_save.lock().clone()
    }
}

#[async_trait]
impl LabelPersistence for RecordingPersistence {
    async fn save(&self, request: SaveRequest) -> Result<Value, ServiceError> {
        if let Some(store) = self.probe.lock().as_ref() {
            self.submitting_during_save
                .lock()
                .push(store.state().form.is_submitting);
        }
        self.requests.lock().push(request);
        let delay = *self.delay.lock();
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match self.response.lock().clone() {
            Ok(body) => Ok(body),
            Err(message) => Err(ServiceError::Status {
                status: 500,
                message,
            }),
        }
    }
}

#[derive(Default)]
pub struct RecordingPrinter {
    documents: Mutex<Vec<String>>,
}

impl RecordingPrinter {
    pub fn documents(&self) -> Vec<String> {
        self.documents.lock().clone()
    }
}

impl DocumentPrinter for RecordingPrinter {
    fn print(&self, data_uri: &str) -> Result<(), ServiceError> {
        self.documents.lock().push(data_uri.to_string());
        Ok(())
    }
}

#[derive(Default)]
pub struct RecordingNotifier {
    messages: Mutex<Vec<String>>,
}

impl RecordingNotifier {
    pub fn messages(&self) -> Vec<String> {
        self.messages.lock().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn error(&self, message: &str) {
        self.messages.lock().push(message.to_string());
    }
}

/// A workflow wired to recording fakes.
pub struct Harness {
    pub workflow: LabelWorkflow,
    pub normalizer: Arc<FakeNormalizer>,
    pub persistence: Arc<RecordingPersistence>,
    pub printer: Arc<RecordingPrinter>,
    pub notifier: Arc<RecordingNotifier>,
}

impl Harness {
    pub fn new(form: LabelForm) -> Self {
        let normalizer = Arc::new(FakeNormalizer::default());
        let persistence = Arc::new(RecordingPersistence::default());
        let printer = Arc::new(RecordingPrinter::default());
        let notifier = Arc::new(RecordingNotifier::default());

        let store = LabelStore::new(WorkflowState::with_form(form), notifier.clone());
        let capabilities = Capabilities {
            normalizer: normalizer.clone(),
            persistence: persistence.clone(),
            printer: printer.clone(),
            validator: Arc::new(RequiredFieldsValidator),
        };

        Self {
            workflow: LabelWorkflow::new(store, context(), capabilities),
            normalizer,
            persistence,
            printer,
            notifier,
        }
    }

    pub fn state(&self) -> Arc<WorkflowState> {
        self.workflow.state()
    }

    /// The body of the only purchase request sent.
    pub fn single_payload(&self) -> Value {
        let requests = self.persistence.requests();
        assert_eq!(requests.len(), 1, "expected exactly one purchase request");
        requests[0].payload.clone()
    }
}
