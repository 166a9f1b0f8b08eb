//! Core traits and types for the Skein framework.
//!
//! This crate defines the shared abstractions that the evaluator, metrics,
//! and observers build on:
//!
//! - [`Objective`]: a weighted unit that reports how far one model observable
//!   is from its reference
//! - [`Task`]: one step of the evaluation pipeline, either a [`Configure`]
//!   step that injects parameters or an [`Execute`] step that runs a model
//! - [`Parameters`] and [`Iteration`]: the candidate point and its position
//!   in the optimizer's search, forwarded to the configure step
//! - [`Observer`]: receives pipeline events and optionally returns control
//!   actions

mod objective;
mod observer;
mod parameters;
mod task;

pub use objective::{FnObjective, Objective};
pub use observer::Observer;
pub use parameters::{Iteration, Parameters};
pub use task::{Configure, Execute, Named, Task};

/// Boxed error returned by user-supplied tasks and objectives.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Returns the last path segment of a type name.
///
/// Used as the default human-readable name for tasks and objectives.
#[must_use]
pub fn short_type_name<T: ?Sized>() -> &'static str {
    let full = std::any::type_name::<T>();
    let without_generics = full.split('<').next().unwrap_or(full);
    without_generics
        .rsplit("::")
        .next()
        .unwrap_or(without_generics)
}
