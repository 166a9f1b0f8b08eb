//! Name-keyed lookup of error metrics and cost functions.
//!
//! Registries are plain values: build one at startup (usually with
//! `standard()`), extend it if needed, and pass it to whatever resolves names
//! from configuration. Keys are stored lowercase; callers parsing user input
//! are expected to lowercase names before lookup.

use std::collections::BTreeMap;

use ndarray::IxDyn;
use thiserror::Error;

use crate::{CostFunction, ErrorFn, WeightedRms, absolute_error, relative_error};

/// Key of the cost function used when none is configured.
pub const DEFAULT_COST: &str = "rms";

/// Key of the error metric used when none is configured.
pub const DEFAULT_ERROR: &str = "abs";

/// Builds a cost function around a deviation metric.
pub type CostFactory = fn(ErrorFn) -> Box<dyn CostFunction + Send + Sync>;

/// Errors that can occur when resolving a name in a registry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown cost function `{name}` (available: {available})")]
    UnknownCost { name: String, available: String },

    #[error("unknown error metric `{name}` (available: {available})")]
    UnknownError { name: String, available: String },
}

/// Registry of error metrics.
#[derive(Clone, Default)]
pub struct ErrorRegistry {
    entries: BTreeMap<String, ErrorFn>,
}

impl ErrorRegistry {
    /// Creates a registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in metrics.
    ///
    /// `abs` and `abserr` map to [`absolute_error`], `rel` and `relerr` to
    /// [`relative_error`].
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register("abs", absolute_error::<IxDyn>);
        registry.register("abserr", absolute_error::<IxDyn>);
        registry.register("rel", relative_error::<IxDyn>);
        registry.register("relerr", relative_error::<IxDyn>);
        registry
    }

    /// Registers `metric` under `name`, returning the entry it replaces.
    pub fn register(&mut self, name: &str, metric: ErrorFn) -> Option<ErrorFn> {
        self.entries.insert(name.to_lowercase(), metric)
    }

    /// Looks up the metric registered under `name`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownError`] if no metric has that name.
    pub fn get(&self, name: &str) -> Result<ErrorFn, RegistryError> {
        self.entries
            .get(name)
            .copied()
            .ok_or_else(|| RegistryError::UnknownError {
                name: name.to_string(),
                available: join_names(self.entries.keys()),
            })
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

/// Registry of cost functions.
#[derive(Clone, Default)]
pub struct CostRegistry {
    entries: BTreeMap<String, CostFactory>,
}

impl CostRegistry {
    /// Creates a registry with no entries.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in cost functions.
    ///
    /// `rms` maps to [`WeightedRms`].
    #[must_use]
    pub fn standard() -> Self {
        let mut registry = Self::empty();
        registry.register(DEFAULT_COST, weighted_rms_factory);
        registry
    }

    /// Registers `factory` under `name`, returning the entry it replaces.
    pub fn register(&mut self, name: &str, factory: CostFactory) -> Option<CostFactory> {
        self.entries.insert(name.to_lowercase(), factory)
    }

    /// Builds the cost function registered under `name` around `error`.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownCost`] if no cost function has that name.
    pub fn build(
        &self,
        name: &str,
        error: ErrorFn,
    ) -> Result<Box<dyn CostFunction + Send + Sync>, RegistryError> {
        self.entries
            .get(name)
            .map(|factory| factory(error))
            .ok_or_else(|| RegistryError::UnknownCost {
                name: name.to_string(),
                available: join_names(self.entries.keys()),
            })
    }

    /// Returns the registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

fn weighted_rms_factory(error: ErrorFn) -> Box<dyn CostFunction + Send + Sync> {
    Box::new(WeightedRms::new(error))
}

fn join_names<'a>(names: impl Iterator<Item = &'a String>) -> String {
    names.map(String::as_str).collect::<Vec<_>>().join(", ")
}
