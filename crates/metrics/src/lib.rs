//! Error metrics and cost functions for comparing model and reference data.
//!
//! Error metrics turn a reference array and a model array of the same shape
//! into per-element deviations. Cost functions reduce weighted deviations to
//! a single value.
//!
//! # Modules
//!
//! - [`deviation`]: [`absolute_error`] and [`relative_error`]
//! - [`cost`]: [`weighted_rms`] and the [`CostFunction`] trait
//! - [`registry`]: name-keyed lookup of metrics and cost functions
//!
//! [`absolute_error`]: deviation::absolute_error
//! [`relative_error`]: deviation::relative_error
//! [`weighted_rms`]: cost::weighted_rms
//! [`CostFunction`]: cost::CostFunction

pub mod cost;
pub mod deviation;
pub mod registry;

mod error;

pub use cost::{Cost, CostFunction, WeightedRms, weighted_rms, weighted_rms_with};
pub use deviation::{ErrorFn, absolute_error, relative_error};
pub use error::MetricError;
pub use registry::{
    CostFactory, CostRegistry, DEFAULT_COST, DEFAULT_ERROR, ErrorRegistry, RegistryError,
};
