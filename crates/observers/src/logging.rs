use std::{borrow::Cow, convert::Infallible};

use skein_core::Observer;
use skein_evaluator::Event;
use tracing::{debug, error, warn};

/// Forwards evaluator events to [`tracing`].
///
/// | Event | Level |
/// |---|---|
/// | `ConfigureSkipped` | `warn`, naming the task |
/// | `Configured`, `TaskCompleted`, `ObjectivesEvaluated`, `Evaluated` | `debug` |
/// | `TaskFailed`, `ObjectiveFailed` | `error` |
///
/// Every record carries an `evaluator` field holding the observer's label, so
/// output from evaluators running side by side can be told apart.
///
/// ```
/// use skein_observers::TracingObserver;
///
/// let observer = TracingObserver::labeled("member-3");
/// assert_eq!(observer.label(), "member-3");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TracingObserver {
    label: Cow<'static, str>,
}

impl Default for TracingObserver {
    fn default() -> Self {
        Self::labeled("evaluator")
    }
}

impl TracingObserver {
    /// Creates an observer labeled `"evaluator"`.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates an observer whose records carry `label`.
    #[must_use]
    pub fn labeled(label: impl Into<Cow<'static, str>>) -> Self {
        Self {
            label: label.into(),
        }
    }

    /// Returns the label attached to every record.
    #[must_use]
    pub fn label(&self) -> &str {
        &self.label
    }
}

impl<'a> Observer<Event<'a>, Infallible> for TracingObserver {
    fn observe(&mut self, event: &Event<'a>) -> Option<Infallible> {
        let evaluator: &str = &self.label;

        match event {
            Event::ConfigureSkipped { task } => {
                warn!(
                    evaluator,
                    position = 1,
                    task,
                    "no parameters given, skipping configure task"
                );
            }
            Event::Configured {
                task,
                parameters,
                iteration,
            } => {
                let iteration = iteration.map(ToString::to_string);
                debug!(evaluator, task, ?parameters, ?iteration, "configured");
            }
            Event::TaskCompleted { position, task } => {
                debug!(evaluator, position, task, "task completed");
            }
            Event::TaskFailed {
                position,
                task,
                error,
            } => {
                error!(evaluator, position, task, %error, "task failed, evaluation aborted");
            }
            Event::ObjectiveFailed {
                position,
                objective,
                error,
            } => {
                error!(evaluator, position, objective, %error, "objective failed, evaluation aborted");
            }
            Event::ObjectivesEvaluated { fitness } => {
                debug!(evaluator, %fitness, "objectives evaluated");
            }
            Event::Evaluated { cost } => {
                debug!(evaluator, %cost, "evaluated");
            }
        }

        None
    }
}
