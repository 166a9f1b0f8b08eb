use std::{
    convert::Infallible,
    fmt, io,
    sync::{Arc, Mutex},
};

use approx::assert_relative_eq;
use ndarray::{Array1, ArrayView1, array};
use skein_core::{
    BoxError, Configure, FnObjective, Iteration, Named, Objective, Observer, Parameters, Task,
};
use skein_metrics::{
    Cost, CostFunction, CostRegistry, ErrorRegistry, MetricError, RegistryError, WeightedRms,
};

use super::{ConfigError, EvalError, Evaluator, EvaluatorConfig, Event};

/// Model state shared between the tasks and objectives of one evaluator.
#[derive(Debug, Default)]
struct Line {
    slope: f64,
    offset: f64,
    predictions: Vec<f64>,
    calls: Vec<String>,
}

type Shared = Arc<Mutex<Line>>;

const XS: [f64; 3] = [0.0, 1.0, 2.0];

/// Configure task: reads slope and offset from ordered parameters.
struct SetLine(Shared);

impl Configure for SetLine {
    fn configure(
        &mut self,
        parameters: &Parameters,
        iteration: Option<&Iteration>,
    ) -> Result<(), BoxError> {
        let mut line = self.0.lock().unwrap();
        line.slope = parameters.at(0).ok_or("missing slope")?;
        line.offset = parameters.at(1).ok_or("missing offset")?;
        let label = iteration.map_or_else(|| "-".to_string(), ToString::to_string);
        line.calls.push(format!("configure {label}"));
        Ok(())
    }
}

/// Execute task: evaluates the line at `XS`.
fn predict(state: &Shared) -> Task {
    let state = Arc::clone(state);
    Task::execute(Named::new("predict", move || {
        let mut line = state.lock().unwrap();
        let (slope, offset) = (line.slope, line.offset);
        line.predictions = XS.iter().map(|x| slope * x + offset).collect();
        line.calls.push("predict".into());
        Ok::<(), io::Error>(())
    }))
}

/// Execute task that only records that it ran.
fn mark(state: &Shared, name: &'static str) -> Task {
    let state = Arc::clone(state);
    Task::execute(Named::new(name, move || {
        state.lock().unwrap().calls.push(name.into());
        Ok::<(), io::Error>(())
    }))
}

#[derive(Debug)]
struct SolverDiverged;

impl fmt::Display for SolverDiverged {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "solver diverged")
    }
}

impl std::error::Error for SolverDiverged {}

/// Execute task that always fails.
fn diverge(state: &Shared) -> Task {
    let state = Arc::clone(state);
    Task::execute(Named::new("diverge", move || {
        state.lock().unwrap().calls.push("diverge".into());
        Err::<(), _>(SolverDiverged)
    }))
}

/// Objective: absolute deviation of the prediction at `XS[index]` from `target`.
fn point(state: &Shared, index: usize, target: f64, weight: f64) -> Box<dyn Objective + Send> {
    let state = Arc::clone(state);
    Box::new(FnObjective::new(format!("y{index}"), weight, move || {
        let line = state.lock().unwrap();
        let y = line.predictions.get(index).ok_or("no prediction")?;
        Ok((y - target).abs())
    }))
}

/// Records a one-line summary of every event.
#[derive(Debug, Default)]
struct Recorder(Vec<String>);

impl<'a> Observer<Event<'a>, Infallible> for Recorder {
    fn observe(&mut self, event: &Event<'a>) -> Option<Infallible> {
        let line = match event {
            Event::ConfigureSkipped { task } => format!("skipped {task}"),
            Event::Configured { task, .. } => format!("configured {task}"),
            Event::TaskCompleted { position, task } => format!("completed {position} {task}"),
            Event::TaskFailed {
                position,
                task,
                error,
            } => format!("failed {position} {task}: {error}"),
            Event::ObjectiveFailed {
                position,
                objective,
                ..
            } => format!("objective failed {position} {objective}"),
            Event::ObjectivesEvaluated { fitness } => format!("fitness {fitness}"),
            Event::Evaluated { cost } => format!("cost {cost}"),
        };
        self.0.push(line);
        None
    }
}

fn rms() -> Box<dyn CostFunction + Send + Sync> {
    Box::new(WeightedRms::default())
}

fn calls(state: &Shared) -> Vec<String> {
    state.lock().unwrap().calls.clone()
}

/// Line through (0, 1), (1, 3), (2, 5): slope 2, offset 1.
fn line_evaluator(state: &Shared) -> Evaluator {
    Evaluator::new(
        vec![
            point(state, 0, 1.0, 1.0),
            point(state, 1, 3.0, 1.0),
            point(state, 2, 5.0, 2.0),
        ],
        vec![Task::configure(SetLine(Arc::clone(state))), predict(state)],
        rms(),
        None,
    )
    .unwrap()
}

#[test]
fn exact_parameters_have_zero_cost() {
    let state = Shared::default();
    let mut evaluator = line_evaluator(&state);

    let cost = evaluator
        .evaluate(Some(&Parameters::from([2.0, 1.0])), Some(Iteration::Step(0)))
        .unwrap();

    assert_eq!(cost, array![0.0]);
    assert_eq!(calls(&state), vec!["configure 0", "predict"]);
}

#[test]
fn cost_is_weighted_rms_of_objective_fitness() {
    let state = Shared::default();
    let mut evaluator = line_evaluator(&state);

    // Predictions 1, 2, 3 against 1, 3, 5: fitness 0, 1, 2.
    let evaluation = evaluator
        .evaluate_detailed(Some(&Parameters::from([1.0, 1.0])), None)
        .unwrap();

    assert_eq!(evaluation.objectives, array![0.0, 1.0, 2.0]);
    assert_eq!(evaluation.cost.len(), 1);
    // Weights normalize to 0.25, 0.25, 0.5.
    assert_relative_eq!(evaluation.cost[0], (0.25_f64 * 1.0 + 0.5 * 4.0).sqrt());
}

#[test]
fn weights_are_normalized_at_construction() {
    let state = Shared::default();
    let evaluator = line_evaluator(&state);

    assert_eq!(evaluator.weights(), array![0.25, 0.25, 0.5]);
    assert_eq!(evaluator.utopia(), array![0.0, 0.0, 0.0]);
    assert_eq!(evaluator.task_count(), 2);
}

#[test]
fn each_call_recomputes_fitness() {
    let state = Shared::default();
    let mut evaluator = line_evaluator(&state);

    let first = evaluator
        .evaluate_detailed(Some(&Parameters::from([1.0, 1.0])), None)
        .unwrap();
    let second = evaluator
        .evaluate_detailed(Some(&Parameters::from([2.0, 1.0])), None)
        .unwrap();

    assert_eq!(first.objectives, array![0.0, 1.0, 2.0]);
    assert_eq!(second.objectives, array![0.0, 0.0, 0.0]);
}

#[test]
fn missing_parameters_skip_configure_and_run_the_rest() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 0.0, 1.0)],
        vec![
            Task::configure(SetLine(Arc::clone(&state))),
            mark(&state, "first"),
            predict(&state),
            mark(&state, "last"),
        ],
        rms(),
        None,
    )
    .unwrap()
    .with_observer(Recorder::default());

    let cost = evaluator.evaluate(None, Some(Iteration::from(4))).unwrap();

    assert_eq!(cost, array![0.0]);
    assert_eq!(calls(&state), vec!["first", "predict", "last"]);
    assert_eq!(
        evaluator.into_observer().0,
        vec![
            "skipped SetLine",
            "completed 2 first",
            "completed 3 predict",
            "completed 4 last",
            "fitness [0]",
            "cost [0]",
        ]
    );
}

#[test]
fn failing_task_stops_the_pipeline() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 0.0, 1.0)],
        vec![
            Task::configure(SetLine(Arc::clone(&state))),
            predict(&state),
            diverge(&state),
            mark(&state, "never"),
        ],
        rms(),
        None,
    )
    .unwrap()
    .with_observer(Recorder::default());

    let error = evaluator
        .evaluate(Some(&Parameters::from([1.0, 0.0])), Some(Iteration::from((1, 2))))
        .unwrap_err();

    let EvalError::Task(failure) = error else {
        panic!("expected a task failure, got {error:?}");
    };
    assert_eq!(failure.position, 3);
    assert_eq!(failure.task, "diverge");
    assert_eq!(failure.to_string(), "evaluation failed at task 3: diverge");
    assert!(failure.into_source().downcast::<SolverDiverged>().is_ok());

    assert_eq!(calls(&state), vec!["configure (1, 2)", "predict", "diverge"]);
    assert_eq!(
        evaluator.into_observer().0,
        vec![
            "configured SetLine",
            "completed 2 predict",
            "failed 3 diverge: solver diverged",
        ]
    );
}

#[test]
fn failing_configure_is_position_one() {
    let state = Shared::default();
    let mut evaluator = line_evaluator(&state);

    let error = evaluator
        .evaluate(Some(&Parameters::from([2.0])), None)
        .unwrap_err();

    let EvalError::Task(failure) = error else {
        panic!("expected a task failure, got {error:?}");
    };
    assert_eq!(failure.position, 1);
    assert_eq!(failure.task, "SetLine");
    assert_eq!(failure.source.to_string(), "missing offset");
    assert!(calls(&state).is_empty());
}

#[test]
fn pipeline_without_configure_ignores_parameters() {
    let state = Shared::default();
    {
        let mut line = state.lock().unwrap();
        line.slope = 2.0;
        line.offset = 1.0;
    }
    let mut evaluator = Evaluator::new(
        vec![point(&state, 2, 5.0, 1.0)],
        vec![diverge(&state), predict(&state)],
        rms(),
        None,
    )
    .unwrap();

    let Err(EvalError::Task(failure)) = evaluator.evaluate(Some(&Parameters::from([9.0])), None)
    else {
        panic!("first task should fail");
    };

    assert_eq!(failure.position, 1);
    assert_eq!(calls(&state), vec!["diverge"]);
}

#[test]
fn failing_objective_is_reported() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 0.0, 1.0), point(&state, 1, 0.0, 1.0)],
        vec![mark(&state, "noop")],
        rms(),
        None,
    )
    .unwrap()
    .with_observer(Recorder::default());

    let error = evaluator.evaluate(None, None).unwrap_err();

    let EvalError::Objective(failure) = error else {
        panic!("expected an objective failure, got {error:?}");
    };
    assert_eq!(failure.position, 1);
    assert_eq!(failure.objective, "y0");
    assert_eq!(
        evaluator.into_observer().0,
        vec!["completed 1 noop", "objective failed 1 y0"]
    );
}

#[test]
fn utopia_shifts_the_target() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 1.0, 1.0), point(&state, 1, 3.0, 1.0)],
        vec![Task::configure(SetLine(Arc::clone(&state))), predict(&state)],
        rms(),
        Some(vec![1.0, 1.0]),
    )
    .unwrap();

    // Fitness 0 and 1 against utopia 1 and 1.
    let cost = evaluator
        .evaluate(Some(&Parameters::from([1.0, 1.0])), None)
        .unwrap();

    assert_relative_eq!(cost[0], 0.5_f64.sqrt());
}

fn worst_and_rms(
    reference: ArrayView1<'_, f64>,
    model: ArrayView1<'_, f64>,
    weights: ArrayView1<'_, f64>,
) -> Result<Cost, MetricError> {
    let rms = skein_metrics::weighted_rms(reference, model, weights)?;
    let worst = (&model - &reference)
        .iter()
        .fold(0.0_f64, |acc, e| acc.max(e.abs()));
    Ok(Cost::Vector(array![rms, worst]))
}

fn no_cost(
    _reference: ArrayView1<'_, f64>,
    _model: ArrayView1<'_, f64>,
    _weights: ArrayView1<'_, f64>,
) -> Result<Cost, MetricError> {
    Ok(Cost::Vector(Array1::zeros(0)))
}

#[test]
fn vector_cost_is_returned_whole() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 1.0, 1.0), point(&state, 1, 3.0, 1.0)],
        vec![Task::configure(SetLine(Arc::clone(&state))), predict(&state)],
        Box::new(worst_and_rms),
        None,
    )
    .unwrap();

    let cost = evaluator
        .evaluate(Some(&Parameters::from([0.0, 1.0])), None)
        .unwrap();

    assert_eq!(cost.len(), 2);
    assert_relative_eq!(cost[0], 2.0_f64.sqrt());
    assert_relative_eq!(cost[1], 2.0);
}

#[test]
fn empty_cost_is_an_error() {
    let state = Shared::default();
    let mut evaluator = Evaluator::new(
        vec![point(&state, 0, 1.0, 1.0)],
        vec![predict(&state)],
        Box::new(no_cost),
        None,
    )
    .unwrap();

    assert!(matches!(
        evaluator.evaluate(None, None),
        Err(EvalError::EmptyCost)
    ));
}

#[test]
fn rejects_utopia_of_wrong_length() {
    let state = Shared::default();

    let error = Evaluator::new(
        vec![point(&state, 0, 1.0, 1.0)],
        vec![predict(&state)],
        rms(),
        Some(vec![0.0, 0.0]),
    )
    .unwrap_err();

    assert_eq!(
        error,
        ConfigError::UtopiaLength {
            utopia: 2,
            objectives: 1,
        }
    );
}

#[test]
fn rejects_misplaced_configure() {
    let state = Shared::default();

    let error = Evaluator::new(
        vec![point(&state, 0, 1.0, 1.0)],
        vec![predict(&state), Task::configure(SetLine(Arc::clone(&state)))],
        rms(),
        None,
    )
    .unwrap_err();

    assert_eq!(error, ConfigError::MisplacedConfigure { position: 2 });
}

#[test]
fn rejects_empty_objectives() {
    let error = Evaluator::new(Vec::new(), Vec::new(), rms(), None).unwrap_err();

    assert_eq!(error, ConfigError::NoObjectives);
}

#[test]
fn rejects_zero_weights() {
    let state = Shared::default();

    let error = Evaluator::new(
        vec![point(&state, 0, 1.0, 0.0), point(&state, 1, 1.0, 0.0)],
        Vec::new(),
        rms(),
        None,
    )
    .unwrap_err();

    assert_eq!(error, ConfigError::ZeroWeightSum);
}

#[test]
fn from_config_resolves_relative_error() {
    let state = Shared::default();
    let config = EvaluatorConfig::new("RMS", "RelErr");
    let mut evaluator = Evaluator::from_config(
        vec![point(&state, 1, 3.0, 1.0)],
        vec![Task::configure(SetLine(Arc::clone(&state))), predict(&state)],
        &config.with_utopia(vec![2.0]),
        &CostRegistry::standard(),
        &ErrorRegistry::standard(),
    )
    .unwrap();

    // Fitness |1 - 3| = 2 against utopia 2 is an exact match.
    let exact = evaluator
        .evaluate(Some(&Parameters::from([0.0, 1.0])), None)
        .unwrap();
    // Fitness |4 - 3| = 1 against utopia 2: relative error -0.5.
    let off = evaluator
        .evaluate(Some(&Parameters::from([2.0, 2.0])), None)
        .unwrap();

    assert_eq!(exact, array![0.0]);
    assert_relative_eq!(off[0], 0.5);
}

#[test]
fn from_config_rejects_unknown_names() {
    let state = Shared::default();
    let config = EvaluatorConfig::new("mae", "abs");

    let error = Evaluator::from_config(
        vec![point(&state, 0, 1.0, 1.0)],
        Vec::new(),
        &config,
        &CostRegistry::standard(),
        &ErrorRegistry::standard(),
    )
    .unwrap_err();

    assert!(matches!(
        error,
        ConfigError::Registry(RegistryError::UnknownCost { .. })
    ));
}

#[test]
fn debug_lists_pipeline() {
    let state = Shared::default();
    let evaluator = line_evaluator(&state);

    let debug = format!("{evaluator:?}");

    assert!(debug.contains(r#"objectives: ["y0", "y1", "y2"]"#), "{debug}");
    assert!(debug.contains(r#"configure: Some("SetLine")"#), "{debug}");
    assert!(debug.contains(r#"execute: ["predict"]"#), "{debug}");
}
