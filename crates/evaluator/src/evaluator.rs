use std::{convert::Infallible, fmt};

use ndarray::{Array1, ArrayView1};
use skein_core::{
    BoxError, Configure, Execute, Iteration, Objective, Observer, Parameters, Task,
};
use skein_metrics::{CostFunction, CostRegistry, ErrorRegistry};

use crate::{
    ConfigError, EvalError, EvaluatorConfig, Event, ObjectiveFailure, TaskFailure, Weights,
    evaluate_objectives,
};

/// The outcome of a successful evaluation.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    /// Per-objective fitness, in objective order.
    pub objectives: Array1<f64>,

    /// The aggregated cost. Always holds at least one value.
    pub cost: Array1<f64>,
}

/// Evaluates candidate parameter vectors for an optimizer.
///
/// An evaluator is built once per optimization run and reused for every
/// candidate. It owns its tasks and objectives exclusively; `evaluate` takes
/// `&mut self`, so one instance never runs two evaluations at once. Run
/// independent instances in parallel to evaluate several candidates
/// concurrently.
pub struct Evaluator<Obs = ()> {
    objectives: Vec<Box<dyn Objective + Send>>,
    weights: Weights,
    configure: Option<Box<dyn Configure + Send>>,
    execute: Vec<Box<dyn Execute + Send>>,
    cost: Box<dyn CostFunction + Send + Sync>,
    utopia: Array1<f64>,
    observer: Obs,
}

impl Evaluator {
    /// Creates an evaluator.
    ///
    /// Objective weights are normalized to sum to one. `utopia` defaults to
    /// zero for every objective. Only the first task may be
    /// [`Task::Configure`].
    ///
    /// # Errors
    ///
    /// Returns an error if there are no objectives, if the weights cannot be
    /// normalized, if `utopia` does not have one entry per objective, or if a
    /// configure task appears after the first position.
    pub fn new(
        objectives: Vec<Box<dyn Objective + Send>>,
        tasks: Vec<Task>,
        cost: Box<dyn CostFunction + Send + Sync>,
        utopia: Option<Vec<f64>>,
    ) -> Result<Self, ConfigError> {
        if objectives.is_empty() {
            return Err(ConfigError::NoObjectives);
        }
        let weights = Weights::normalize(objectives.iter().map(|objective| objective.weight()))?;

        let utopia = match utopia {
            Some(utopia) if utopia.len() != objectives.len() => {
                return Err(ConfigError::UtopiaLength {
                    utopia: utopia.len(),
                    objectives: objectives.len(),
                });
            }
            Some(utopia) => Array1::from(utopia),
            None => Array1::zeros(objectives.len()),
        };

        let (configure, execute) = split_tasks(tasks)?;

        Ok(Self {
            objectives,
            weights,
            configure,
            execute,
            cost,
            utopia,
            observer: (),
        })
    }

    /// Creates an evaluator whose cost function is resolved by name.
    ///
    /// # Errors
    ///
    /// Returns an error if a name in `config` is not registered, or for any
    /// reason listed under [`Evaluator::new`].
    pub fn from_config(
        objectives: Vec<Box<dyn Objective + Send>>,
        tasks: Vec<Task>,
        config: &EvaluatorConfig,
        costs: &CostRegistry,
        errors: &ErrorRegistry,
    ) -> Result<Self, ConfigError> {
        let error = errors.get(&config.error)?;
        let cost = costs.build(&config.cost, error)?;
        Self::new(objectives, tasks, cost, config.utopia.clone())
    }
}

impl<Obs> Evaluator<Obs> {
    /// Replaces the observer that receives evaluation [`Event`]s.
    pub fn with_observer<O>(self, observer: O) -> Evaluator<O> {
        Evaluator {
            objectives: self.objectives,
            weights: self.weights,
            configure: self.configure,
            execute: self.execute,
            cost: self.cost,
            utopia: self.utopia,
            observer,
        }
    }

    /// Returns the normalized objective weights.
    #[must_use]
    pub fn weights(&self) -> ArrayView1<'_, f64> {
        self.weights.view()
    }

    /// Returns the utopia point.
    #[must_use]
    pub fn utopia(&self) -> ArrayView1<'_, f64> {
        self.utopia.view()
    }

    /// Returns the objectives, in evaluation order.
    #[must_use]
    pub fn objectives(&self) -> &[Box<dyn Objective + Send>] {
        &self.objectives
    }

    /// Returns the number of tasks, including a configure task.
    #[must_use]
    pub fn task_count(&self) -> usize {
        self.execute.len() + usize::from(self.configure.is_some())
    }

    /// Returns the observer.
    pub fn observer(&self) -> &Obs {
        &self.observer
    }

    /// Consumes the evaluator and returns its observer.
    pub fn into_observer(self) -> Obs {
        self.observer
    }
}

impl<Obs> Evaluator<Obs>
where
    Obs: for<'a> Observer<Event<'a>, Infallible>,
{
    /// Evaluates the global fitness of a point in parameter space.
    ///
    /// Pass `None` for `parameters` to evaluate the models as currently
    /// configured: the configure task is skipped with a
    /// [`Event::ConfigureSkipped`] notice. `iteration` is forwarded to the
    /// configure task unchanged.
    ///
    /// Returns the cost as an array with at least one element.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::Task`] for the first failing task, without
    /// running later tasks or computing any fitness. Objective and cost
    /// failures are returned as the corresponding [`EvalError`] variants.
    pub fn evaluate(
        &mut self,
        parameters: Option<&Parameters>,
        iteration: Option<Iteration>,
    ) -> Result<Array1<f64>, EvalError> {
        self.evaluate_detailed(parameters, iteration)
            .map(|evaluation| evaluation.cost)
    }

    /// Same as [`evaluate`](Self::evaluate), also returning per-objective
    /// fitness.
    ///
    /// # Errors
    ///
    /// See [`evaluate`](Self::evaluate).
    pub fn evaluate_detailed(
        &mut self,
        parameters: Option<&Parameters>,
        iteration: Option<Iteration>,
    ) -> Result<Evaluation, EvalError> {
        let Self {
            objectives,
            weights,
            configure,
            execute,
            cost,
            utopia,
            observer,
        } = self;

        let mut position = 0;

        if let Some(task) = configure {
            position += 1;
            match parameters {
                None => notify(observer, &Event::ConfigureSkipped { task: &task.name() }),
                Some(parameters) => {
                    if let Err(error) = task.configure(parameters, iteration.as_ref()) {
                        return Err(fail_task(observer, position, &task.name(), error).into());
                    }
                    notify(
                        observer,
                        &Event::Configured {
                            task: &task.name(),
                            parameters,
                            iteration: iteration.as_ref(),
                        },
                    );
                }
            }
        }

        for task in execute.iter_mut() {
            position += 1;
            if let Err(error) = task.execute() {
                return Err(fail_task(observer, position, &task.name(), error).into());
            }
            notify(
                observer,
                &Event::TaskCompleted {
                    position,
                    task: &task.name(),
                },
            );
        }

        let fitness = match evaluate_objectives(objectives) {
            Ok(fitness) => fitness,
            Err(failure) => return Err(fail_objective(observer, failure).into()),
        };
        notify(
            observer,
            &Event::ObjectivesEvaluated {
                fitness: fitness.view(),
            },
        );

        let cost = cost
            .cost(utopia.view(), fitness.view(), weights.view())?
            .into_array();
        if cost.is_empty() {
            return Err(EvalError::EmptyCost);
        }
        notify(observer, &Event::Evaluated { cost: cost.view() });

        Ok(Evaluation {
            objectives: fitness,
            cost,
        })
    }
}

impl<Obs> fmt::Debug for Evaluator<Obs> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let objectives: Vec<_> = self.objectives.iter().map(|o| o.name()).collect();
        let configure = self.configure.as_ref().map(|task| task.name());
        let execute: Vec<_> = self.execute.iter().map(|task| task.name()).collect();

        f.debug_struct("Evaluator")
            .field("objectives", &objectives)
            .field("weights", &self.weights.view())
            .field("configure", &configure)
            .field("execute", &execute)
            .field("utopia", &self.utopia)
            .finish_non_exhaustive()
    }
}

/// Splits the pipeline into the optional leading configure task and the
/// execute tasks that follow it.
fn split_tasks(
    tasks: Vec<Task>,
) -> Result<(Option<Box<dyn Configure + Send>>, Vec<Box<dyn Execute + Send>>), ConfigError> {
    let mut configure = None;
    let mut execute = Vec::with_capacity(tasks.len());

    for (index, task) in tasks.into_iter().enumerate() {
        match task {
            Task::Configure(task) if index == 0 => configure = Some(task),
            Task::Configure(_) => {
                return Err(ConfigError::MisplacedConfigure {
                    position: index + 1,
                });
            }
            Task::Execute(task) => execute.push(task),
        }
    }

    Ok((configure, execute))
}

fn notify<Obs>(observer: &mut Obs, event: &Event<'_>)
where
    Obs: for<'a> Observer<Event<'a>, Infallible>,
{
    if let Some(never) = observer.observe(event) {
        match never {}
    }
}

/// Reports a failed task and packages it for the caller.
fn fail_task<Obs>(
    observer: &mut Obs,
    position: usize,
    task: &str,
    source: BoxError,
) -> TaskFailure
where
    Obs: for<'a> Observer<Event<'a>, Infallible>,
{
    notify(
        observer,
        &Event::TaskFailed {
            position,
            task,
            error: &source,
        },
    );
    TaskFailure {
        position,
        task: task.to_string(),
        source,
    }
}

fn fail_objective<Obs>(observer: &mut Obs, failure: ObjectiveFailure) -> ObjectiveFailure
where
    Obs: for<'a> Observer<Event<'a>, Infallible>,
{
    notify(
        observer,
        &Event::ObjectiveFailed {
            position: failure.position,
            objective: &failure.objective,
            error: &failure.source,
        },
    );
    failure
}
