use skein_core::BoxError;
use skein_metrics::{MetricError, RegistryError};
use thiserror::Error;

/// Errors that can occur when constructing an [`Evaluator`](crate::Evaluator).
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("at least one objective is required")]
    NoObjectives,

    #[error("weight of objective {position} must be finite and non-negative, got {weight}")]
    InvalidWeight { position: usize, weight: f64 },

    #[error("objective weights sum to zero")]
    ZeroWeightSum,

    #[error("utopia has {utopia} entries but there are {objectives} objectives")]
    UtopiaLength { utopia: usize, objectives: usize },

    #[error("configure task at position {position}; only the first task may configure")]
    MisplacedConfigure { position: usize },

    #[error(transparent)]
    Registry(#[from] RegistryError),
}

/// A task failed while the pipeline was running.
///
/// `source` is the error returned by the task, unchanged, so callers can
/// downcast it to the task's own error type.
#[derive(Debug, Error)]
#[error("evaluation failed at task {position}: {task}")]
pub struct TaskFailure {
    /// 1-based position of the failing task in the pipeline.
    pub position: usize,

    /// Name of the failing task.
    pub task: String,

    /// The task's error.
    pub source: BoxError,
}

impl TaskFailure {
    /// Consumes the failure and returns the task's original error.
    #[must_use]
    pub fn into_source(self) -> BoxError {
        self.source
    }
}

/// An objective could not compute its fitness.
#[derive(Debug, Error)]
#[error("objective {position} ({objective}) failed")]
pub struct ObjectiveFailure {
    /// 1-based position of the failing objective.
    pub position: usize,

    /// Name of the failing objective.
    pub objective: String,

    /// The objective's error.
    pub source: BoxError,
}

/// Errors that can occur during [`Evaluator::evaluate`](crate::Evaluator::evaluate).
#[derive(Debug, Error)]
pub enum EvalError {
    #[error(transparent)]
    Task(#[from] TaskFailure),

    #[error(transparent)]
    Objective(#[from] ObjectiveFailure),

    #[error("cost function failed")]
    Cost(#[from] MetricError),

    #[error("cost function returned an empty result")]
    EmptyCost,
}
