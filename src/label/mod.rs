//! Shipping-label workflow: state, actions, reducer and the purchase
//! orchestration built on top of them.

mod action;
mod error;
mod normalize;
mod payload;
mod reducer;
mod state;
mod store;
pub mod validation;
mod workflow;

pub use action::LabelAction;
pub use error::PurchaseError;
pub use normalize::normalize_address;
pub use payload::{
    build_purchase_payload, expand_products, parse_labels, PurchasePackage, PurchasePayload,
};
pub use reducer::{parse_weight, LabelReducer};
pub use state::{
    AddressFields, AddressGroup, AddressRole, FormStep, LabelForm, LabelFormSnapshot,
    PackageEntry, PackageItem, PackagesStep, PurchasedLabel, RatesStep, WorkflowState,
    COUNTRY_FIELD, STATE_FIELD,
};
pub use store::LabelStore;
pub use validation::{FormErrors, FormValidator, RequiredFieldsValidator};
pub use workflow::{Capabilities, DispatchContext, LabelWorkflow};
