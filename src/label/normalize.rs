//! Best-effort address normalization round-trip.

use crate::label::action::LabelAction;
use crate::label::state::{AddressFields, AddressRole};
use crate::label::store::LabelStore;
use crate::label::workflow::DispatchContext;
use crate::services::{AddressNormalizer, NormalizeRequest, ServiceError};

/// Normalizes `values` for `group` and records the result in the store.
///
/// `AddressNormalizationInProgress` is dispatched before the request goes
/// out and `AddressNormalizationCompleted` when it succeeds. A failure
/// dispatches nothing and is returned to the caller, which decides
/// whether to care.
pub async fn normalize_address(
    store: &LabelStore,
    normalizer: &dyn AddressNormalizer,
    context: &DispatchContext,
    values: AddressFields,
    group: AddressRole,
) -> Result<AddressFields, ServiceError> {
    store.dispatch(LabelAction::AddressNormalizationInProgress { group });

    let request = NormalizeRequest {
        values,
        group,
        url: context.address_normalization_url.clone(),
        nonce: context.nonce.clone(),
    };
    let normalized = normalizer.normalize(request).await?;

    tracing::debug!(group = %group, "Address normalized");
    store.dispatch(LabelAction::AddressNormalizationCompleted {
        group,
        normalized: normalized.clone(),
    });
    Ok(normalized)
}
