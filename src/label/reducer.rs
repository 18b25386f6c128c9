//! Reducer for the shipping-label workflow.

use std::sync::Arc;

use crate::label::action::LabelAction;
use crate::label::state::{
    AddressGroup, AddressRole, FormStep, WorkflowState, COUNTRY_FIELD, STATE_FIELD,
};
use crate::mvi::Reducer;

/// Pure state transitions of the label workflow.
pub struct LabelReducer;

impl Reducer for LabelReducer {
    type State = WorkflowState;
    type Action = LabelAction;

    fn reduce(state: Arc<Self::State>, action: &Self::Action) -> Arc<Self::State> {
        match action {
            LabelAction::OpenPrintingFlow => update(&state, |next| next.show_dialog = true),

            LabelAction::ExitPrintingFlow => update(&state, |next| next.show_dialog = false),

            LabelAction::ToggleStep { step } => update(&state, |next| match step {
                FormStep::Origin => toggle_group(next, AddressRole::Origin),
                FormStep::Destination => toggle_group(next, AddressRole::Destination),
                FormStep::Packages => {
                    let packages = Arc::make_mut(&mut next.form.packages);
                    packages.expanded = !packages.expanded;
                }
                FormStep::Rates => {
                    let rates = Arc::make_mut(&mut next.form.rates);
                    rates.expanded = !rates.expanded;
                }
            }),

            LabelAction::UpdateAddressValue {
                group,
                field,
                value,
            } => update_group(&state, *group, |address| {
                set_address_value(address, field, value);
                if field == COUNTRY_FIELD {
                    // Provinces are per country.
                    set_address_value(address, STATE_FIELD, "");
                }
            }),

            LabelAction::AddressNormalizationInProgress { group } => {
                update_group(&state, *group, |address| {
                    address.normalization_in_progress = true;
                })
            }

            LabelAction::AddressNormalizationCompleted { group, normalized } => {
                update_group(&state, *group, |address| {
                    address.normalization_in_progress = false;
                    address.is_normalized = true;
                    address.select_normalized = true;
                    address.normalized = Some(normalized.clone());
                })
            }

            LabelAction::PickNormalizedAddress {
                group,
                select_normalized,
            } => update_group(&state, *group, |address| {
                address.select_normalized = *select_normalized;
            }),

            LabelAction::EditOriginalAddress { group } => {
                update_group(&state, *group, |address| {
                    address.select_normalized = false;
                    address.normalized = None;
                    address.is_normalized = false;
                })
            }

            LabelAction::UpdatePackageWeight { index, value } => {
                if *index >= state.form.packages.values.len() {
                    return state;
                }
                update(&state, |next| {
                    let packages = Arc::make_mut(&mut next.form.packages);
                    Arc::make_mut(&mut packages.values[*index]).weight = parse_weight(value);
                })
            }

            LabelAction::UpdateRate { index, value } => {
                if *index >= state.form.rates.values.len() {
                    return state;
                }
                update(&state, |next| {
                    Arc::make_mut(&mut next.form.rates).values[*index] = value.clone();
                })
            }

            LabelAction::PurchaseLabelRequest => {
                update(&state, |next| next.form.is_submitting = true)
            }

            LabelAction::PurchaseLabelResponse { result } => update(&state, |next| {
                next.form.is_submitting = false;
                if let Ok(labels) = result {
                    next.labels = Some(Arc::new(labels.clone()));
                    next.show_dialog = false;
                }
            }),

            // Routed to the notification channel by the store.
            LabelAction::ErrorNotice { .. } => state,
        }
    }
}

/// Shallow-copies the root and applies `edit`; sections are shared until
/// `Arc::make_mut` detaches the one being changed.
fn update(state: &WorkflowState, edit: impl FnOnce(&mut WorkflowState)) -> Arc<WorkflowState> {
    let mut next = state.clone();
    edit(&mut next);
    Arc::new(next)
}

fn update_group(
    state: &WorkflowState,
    role: AddressRole,
    edit: impl FnOnce(&mut AddressGroup),
) -> Arc<WorkflowState> {
    update(state, |next| edit(Arc::make_mut(next.form.group_mut(role))))
}

fn toggle_group(state: &mut WorkflowState, role: AddressRole) {
    let group = Arc::make_mut(state.form.group_mut(role));
    group.expanded = !group.expanded;
}

/// Any edit invalidates a previous normalization result.
fn set_address_value(group: &mut AddressGroup, field: &str, value: &str) {
    group.values.insert(field.to_owned(), value.to_owned());
    group.is_normalized = false;
    group.normalized = None;
}

/// Parses the longest numeric prefix of `text`, `NaN` when there is none.
///
/// Accepts what a browser number field hands over: surrounding blanks,
/// trailing units (`"2.5 kg"`), a bare fraction (`".5"`), an exponent.
pub fn parse_weight(text: &str) -> f64 {
    let text = text.trim_start();
    let bytes = text.as_bytes();

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+' | b'-')) {
        end = 1;
    }
    if text[end..].starts_with("Infinity") {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = count_digits(&bytes[end..]);
    end += int_digits;

    let mut frac_digits = 0;
    if bytes.get(end) == Some(&b'.') {
        frac_digits = count_digits(&bytes[end + 1..]);
        if int_digits > 0 || frac_digits > 0 {
            end += 1 + frac_digits;
        }
    }
    if int_digits == 0 && frac_digits == 0 {
        return f64::NAN;
    }

    if matches!(bytes.get(end), Some(b'e' | b'E')) {
        let mut exp_end = end + 1;
        if matches!(bytes.get(exp_end), Some(b'+' | b'-')) {
            exp_end += 1;
        }
        let exp_digits = count_digits(&bytes[exp_end..]);
        if exp_digits > 0 {
            end = exp_end + exp_digits;
        }
    }

    text[..end].parse().unwrap_or(f64::NAN)
}

fn count_digits(bytes: &[u8]) -> usize {
    bytes.iter().take_while(|b| b.is_ascii_digit()).count()
}
