//! Per-field validation of the label form.
//!
//! The workflow only consumes the [`FormErrors`] shape; hosts may plug in
//! their own [`FormValidator`]. [`RequiredFieldsValidator`] covers the
//! checks the purchase endpoint would otherwise reject.

use std::collections::BTreeMap;

use crate::config::StoreOptions;
use crate::label::state::{AddressGroup, AddressRole, LabelForm, COUNTRY_FIELD, STATE_FIELD};

/// Field name → message. An empty message means "no error".
pub type FieldErrors = BTreeMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct FormErrors {
    pub origin: FieldErrors,
    pub destination: FieldErrors,
    /// Keyed by package index.
    pub packages: BTreeMap<usize, FieldErrors>,
    /// Keyed by package index.
    pub rates: BTreeMap<usize, String>,
}

impl FormErrors {
    pub fn group(&self, role: AddressRole) -> &FieldErrors {
        match role {
            AddressRole::Origin => &self.origin,
            AddressRole::Destination => &self.destination,
        }
    }

    /// No non-empty message for the address group.
    pub fn group_is_clean(&self, role: AddressRole) -> bool {
        all_blank(self.group(role).values())
    }

    pub fn is_empty(&self) -> bool {
        AddressRole::ALL.iter().all(|role| self.group_is_clean(*role))
            && self.packages.values().all(|fields| all_blank(fields.values()))
            && all_blank(self.rates.values())
    }
}

fn all_blank<'a>(mut messages: impl Iterator<Item = &'a String>) -> bool {
    messages.all(|message| message.is_empty())
}

/// Computes the error map for the current form.
pub trait FormValidator: Send + Sync {
    fn validate(&self, form: &LabelForm, options: &StoreOptions) -> FormErrors;
}

/// Address fields every label needs.
pub const REQUIRED_ADDRESS_FIELDS: [&str; 5] = ["name", "address", "city", "postcode", "country"];

const REQUIRED_MESSAGE: &str = "This field is required";
const WEIGHT_MESSAGE: &str = "Invalid weight";
const RATE_MESSAGE: &str = "Please choose a rate";

/// Required address fields, positive package weights, a rate per package.
#[derive(Debug, Clone, Copy, Default)]
pub struct RequiredFieldsValidator;

impl FormValidator for RequiredFieldsValidator {
    fn validate(&self, form: &LabelForm, options: &StoreOptions) -> FormErrors {
        let mut errors = FormErrors {
            origin: address_errors(&form.origin, options),
            destination: address_errors(&form.destination, options),
            ..FormErrors::default()
        };

        for (index, package) in form.packages.values.iter().enumerate() {
            if !package.weight.is_finite() || package.weight <= 0.0 {
                errors
                    .packages
                    .entry(index)
                    .or_default()
                    .insert("weight".to_string(), WEIGHT_MESSAGE.to_string());
            }
        }

        for (index, rate) in form.rates.values.iter().enumerate() {
            if rate.as_deref().map_or(true, str::is_empty) {
                errors.rates.insert(index, RATE_MESSAGE.to_string());
            }
        }

        errors
    }
}

fn address_errors(group: &AddressGroup, options: &StoreOptions) -> FieldErrors {
    let is_blank = |field: &str| {
        group
            .values
            .get(field)
            .map_or(true, |value| value.trim().is_empty())
    };

    let mut errors: FieldErrors = REQUIRED_ADDRESS_FIELDS
        .iter()
        .filter(|field| is_blank(field))
        .map(|field| (field.to_string(), REQUIRED_MESSAGE.to_string()))
        .collect();

    let needs_state = group
        .values
        .get(COUNTRY_FIELD)
        .is_some_and(|country| options.country_has_states(country));
    if needs_state && is_blank(STATE_FIELD) {
        errors.insert(STATE_FIELD.to_string(), REQUIRED_MESSAGE.to_string());
    }

    errors
}
