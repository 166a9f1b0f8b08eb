//! The evaluator: the single entry point an optimizer sees.
//!
//! An [`Evaluator`] turns a candidate parameter vector into a fitness value
//! in five steps:
//!
//! 1. **Configure**: if the first task is a configure task, hand it the
//!    parameters (or skip it when there are none)
//! 2. **Execute**: run the remaining tasks strictly in order, aborting on the
//!    first failure
//! 3. **Collect**: ask every objective for its fitness, in order
//! 4. **Aggregate**: apply the cost function to the fitness vector against
//!    the utopia point, using the normalized objective weights
//! 5. **Return**: the cost as an array of length one or more
//!
//! # Observer Events
//!
//! The evaluator reports progress through an [`Observer`] receiving
//! [`Event`]s. Observers cannot change the course of an evaluation: the action
//! type is [`Infallible`](std::convert::Infallible). A failing task is
//! reported with [`Event::TaskFailed`] and then returned as
//! [`EvalError::Task`], so logging stays a side channel of the result.
//!
//! [`Observer`]: skein_core::Observer

mod config;
mod error;
mod evaluator;
mod event;
mod objectives;
mod weights;

#[cfg(test)]
mod tests;

pub use config::EvaluatorConfig;
pub use error::{ConfigError, EvalError, ObjectiveFailure, TaskFailure};
pub use evaluator::{Evaluation, Evaluator};
pub use event::Event;
pub use objectives::evaluate_objectives;
pub use weights::Weights;
