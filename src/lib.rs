//! Client-side core of a shipping-label purchase flow.
//!
//! Address entry, normalization, package/rate selection and label
//! purchase are modelled as a single state tree driven by
//! [`label::LabelAction`]s through [`label::LabelStore`].
//! [`label::LabelWorkflow`] sequences the asynchronous parts against
//! injected [`services`].

pub mod config;
pub mod label;
pub mod logging;
pub mod mvi;
pub mod services;
