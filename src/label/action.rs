//! Actions of the shipping-label workflow.

use crate::label::state::{AddressFields, AddressRole, FormStep, PurchasedLabel};
use crate::mvi::Action;

/// Every change that can be dispatched into the label store.
#[derive(Debug, Clone, PartialEq)]
pub enum LabelAction {
    /// Show the purchase dialog.
    OpenPrintingFlow,

    /// Hide the purchase dialog.
    ExitPrintingFlow,

    /// Expand or collapse a form section.
    ToggleStep { step: FormStep },

    /// User edited one address field.
    UpdateAddressValue {
        group: AddressRole,
        field: String,
        value: String,
    },

    /// A normalization request for `group` was issued.
    AddressNormalizationInProgress { group: AddressRole },

    /// The normalization service answered for `group`.
    AddressNormalizationCompleted {
        group: AddressRole,
        normalized: AddressFields,
    },

    /// User chose between the normalized suggestion and the typed address.
    PickNormalizedAddress {
        group: AddressRole,
        select_normalized: bool,
    },

    /// User went back to editing the typed address after normalization.
    EditOriginalAddress { group: AddressRole },

    /// Raw weight text typed for the package at `index`.
    UpdatePackageWeight { index: usize, value: String },

    /// Service chosen for the package at `index`.
    UpdateRate { index: usize, value: Option<String> },

    /// The purchase request was sent.
    PurchaseLabelRequest,

    /// The purchase request settled; the error is its display text.
    PurchaseLabelResponse {
        result: Result<Vec<PurchasedLabel>, String>,
    },

    /// User-visible error for the notification channel.
    ErrorNotice { message: String },
}

impl Action for LabelAction {}

impl LabelAction {
    pub fn update_address_value(
        group: AddressRole,
        field: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        Self::UpdateAddressValue {
            group,
            field: field.into(),
            value: value.into(),
        }
    }

    pub fn update_package_weight(index: usize, value: impl Into<String>) -> Self {
        Self::UpdatePackageWeight {
            index,
            value: value.into(),
        }
    }

    pub fn update_rate(index: usize, value: impl Into<String>) -> Self {
        Self::UpdateRate {
            index,
            value: Some(value.into()),
        }
    }

    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            Self::OpenPrintingFlow => "open_printing_flow",
            Self::ExitPrintingFlow => "exit_printing_flow",
            Self::ToggleStep { .. } => "toggle_step",
            Self::UpdateAddressValue { .. } => "update_address_value",
            Self::AddressNormalizationInProgress { .. } => "address_normalization_in_progress",
            Self::AddressNormalizationCompleted { .. } => "address_normalization_completed",
            Self::PickNormalizedAddress { .. } => "pick_normalized_address",
            Self::EditOriginalAddress { .. } => "edit_original_address",
            Self::UpdatePackageWeight { .. } => "update_package_weight",
            Self::UpdateRate { .. } => "update_rate",
            Self::PurchaseLabelRequest => "purchase_label_request",
            Self::PurchaseLabelResponse { .. } => "purchase_label_response",
            Self::ErrorNotice { .. } => "error_notice",
        }
    }
}
