use ndarray::ArrayView1;
use skein_core::{BoxError, Iteration, Parameters};

/// Events emitted by the evaluator while it processes one candidate.
///
/// Events borrow from the evaluation in progress. Observers that need to keep
/// anything must copy it out.
#[derive(Debug)]
pub enum Event<'a> {
    /// The configure task was skipped because no parameters were given.
    ConfigureSkipped {
        /// Name of the skipped task.
        task: &'a str,
    },

    /// The configure task accepted the parameters.
    Configured {
        /// Name of the configure task.
        task: &'a str,

        /// The parameters handed to the task.
        parameters: &'a Parameters,

        /// The iteration handed to the task.
        iteration: Option<&'a Iteration>,
    },

    /// An execute task finished.
    TaskCompleted {
        /// 1-based position of the task in the pipeline.
        position: usize,

        /// Name of the task.
        task: &'a str,
    },

    /// A task failed. The evaluation stops after this event.
    TaskFailed {
        /// 1-based position of the task in the pipeline.
        position: usize,

        /// Name of the task.
        task: &'a str,

        /// The task's error.
        error: &'a BoxError,
    },

    /// An objective failed. The evaluation stops after this event.
    ObjectiveFailed {
        /// 1-based position of the objective.
        position: usize,

        /// Name of the objective.
        objective: &'a str,

        /// The objective's error.
        error: &'a BoxError,
    },

    /// All objectives reported their fitness.
    ObjectivesEvaluated {
        /// Per-objective fitness, in objective order.
        fitness: ArrayView1<'a, f64>,
    },

    /// The evaluation finished.
    Evaluated {
        /// The aggregated cost.
        cost: ArrayView1<'a, f64>,
    },
}
