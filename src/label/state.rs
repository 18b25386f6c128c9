//! State tree of the shipping-label workflow.
//!
//! Every section lives behind an `Arc` so that a transition copies only
//! the path it touches. Untouched sections keep their pointer identity
//! across snapshots, which views use to skip work.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::label::validation::FormErrors;
use crate::mvi::FlowState;

/// Address field name → entered value.
pub type AddressFields = BTreeMap<String, String>;

/// Field whose change invalidates the dependent [`STATE_FIELD`].
pub const COUNTRY_FIELD: &str = "country";

/// State/province field; its valid values depend on the country.
pub const STATE_FIELD: &str = "state";

/// Which address a group describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressRole {
    Origin,
    Destination,
}

impl AddressRole {
    pub const ALL: [AddressRole; 2] = [AddressRole::Origin, AddressRole::Destination];

    pub fn as_str(self) -> &'static str {
        match self {
            AddressRole::Origin => "origin",
            AddressRole::Destination => "destination",
        }
    }
}

impl fmt::Display for AddressRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Collapsible sections of the label form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FormStep {
    Origin,
    Destination,
    Packages,
    Rates,
}

/// One address (origin or destination) and its normalization status.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AddressGroup {
    pub values: AddressFields,
    /// A normalization round-trip succeeded for the current `values`.
    #[serde(default)]
    pub is_normalized: bool,
    #[serde(default)]
    pub normalization_in_progress: bool,
    #[serde(default)]
    pub normalized: Option<AddressFields>,
    /// User prefers the normalized suggestion over the typed address.
    #[serde(default)]
    pub select_normalized: bool,
    #[serde(default)]
    pub expanded: bool,
}

impl AddressGroup {
    pub fn new(values: AddressFields) -> Self {
        Self {
            values,
            ..Self::default()
        }
    }

    /// Whether a normalization request may be started for this group now.
    pub fn awaits_normalization(&self) -> bool {
        !self.is_normalized && !self.normalization_in_progress
    }

    /// The address that a purchase would ship with.
    ///
    /// Falls back to the typed values when the normalized suggestion is
    /// deselected or missing (e.g. after a failed normalization).
    pub fn effective_address(&self) -> &AddressFields {
        match (&self.normalized, self.select_normalized) {
            (Some(normalized), true) => normalized,
            _ => &self.values,
        }
    }
}

/// A line item packed into a package.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PackageItem {
    pub product_id: String,
    pub quantity: u32,
}

/// A package to buy a label for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PackageEntry {
    pub id: String,
    /// `NaN` when the user typed something that is not a number.
    #[serde(default = "unset_weight", deserialize_with = "weight_or_nan")]
    pub weight: f64,
    #[serde(default)]
    pub items: Vec<PackageItem>,
    /// Remaining package fields (dimensions, box id, ...) carried verbatim.
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

fn unset_weight() -> f64 {
    f64::NAN
}

fn weight_or_nan<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(f64::NAN))
}

impl PackageEntry {
    pub fn new(id: impl Into<String>, weight: f64, items: Vec<PackageItem>) -> Self {
        Self {
            id: id.into(),
            weight,
            items,
            fields: Map::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct PackagesStep {
    pub values: Vec<Arc<PackageEntry>>,
    pub expanded: bool,
}

/// Selected service per package; index `i` belongs to package `i`.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct RatesStep {
    pub values: Vec<Option<String>>,
    pub expanded: bool,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LabelForm {
    pub origin: Arc<AddressGroup>,
    pub destination: Arc<AddressGroup>,
    pub packages: Arc<PackagesStep>,
    pub rates: Arc<RatesStep>,
    pub is_submitting: bool,
}

impl Default for LabelForm {
    fn default() -> Self {
        Self::new(AddressGroup::default(), AddressGroup::default(), Vec::new())
    }
}

impl LabelForm {
    /// Builds a form with one unset rate slot per package.
    pub fn new(
        origin: AddressGroup,
        destination: AddressGroup,
        packages: Vec<PackageEntry>,
    ) -> Self {
        let rates = vec![None; packages.len()];
        Self {
            origin: Arc::new(origin),
            destination: Arc::new(destination),
            packages: Arc::new(PackagesStep {
                values: packages.into_iter().map(Arc::new).collect(),
                expanded: false,
            }),
            rates: Arc::new(RatesStep {
                values: rates,
                expanded: false,
            }),
            is_submitting: false,
        }
    }

    /// Replaces the rate selections, padded or truncated to the package count.
    pub fn with_rates(mut self, mut rates: Vec<Option<String>>) -> Self {
        rates.resize(self.packages.values.len(), None);
        Arc::make_mut(&mut self.rates).values = rates;
        self
    }

    pub fn group(&self, role: AddressRole) -> &AddressGroup {
        match role {
            AddressRole::Origin => &self.origin,
            AddressRole::Destination => &self.destination,
        }
    }

    pub(crate) fn group_mut(&mut self, role: AddressRole) -> &mut Arc<AddressGroup> {
        match role {
            AddressRole::Origin => &mut self.origin,
            AddressRole::Destination => &mut self.destination,
        }
    }

    pub fn package(&self, index: usize) -> Option<&PackageEntry> {
        self.packages.values.get(index).map(Arc::as_ref)
    }

    pub fn rate(&self, index: usize) -> Option<&str> {
        self.rates.values.get(index).and_then(|rate| rate.as_deref())
    }
}

/// A purchased label as returned by the purchase endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchasedLabel {
    /// Base64-encoded PDF document.
    #[serde(default)]
    pub image: String,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Root of the workflow state.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct WorkflowState {
    pub show_dialog: bool,
    pub form: LabelForm,
    /// Result of the last successful purchase.
    pub labels: Option<Arc<Vec<PurchasedLabel>>>,
}

impl FlowState for WorkflowState {}

impl WorkflowState {
    pub fn with_form(form: LabelForm) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    /// Purchase button availability: nothing in flight and no field errors.
    pub fn can_purchase(&self, errors: &FormErrors) -> bool {
        !self.form.is_submitting && errors.is_empty()
    }
}

/// Serializable seed for a [`LabelForm`], e.g. loaded from a JSON file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LabelFormSnapshot {
    pub origin: AddressGroup,
    pub destination: AddressGroup,
    #[serde(default)]
    pub packages: Vec<PackageEntry>,
    #[serde(default)]
    pub rates: Vec<Option<String>>,
}

impl From<LabelFormSnapshot> for LabelForm {
    fn from(snapshot: LabelFormSnapshot) -> Self {
        LabelForm::new(snapshot.origin, snapshot.destination, snapshot.packages)
            .with_rates(snapshot.rates)
    }
}
