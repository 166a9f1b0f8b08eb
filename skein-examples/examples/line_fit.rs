//! # Line Fit
//!
//! This example fits the slope and intercept of a straight line to a handful
//! of reference points by scanning a parameter grid.
//!
//! - A **configure task** copies the candidate slope and intercept into the
//!   shared model state.
//! - An **execute task** evaluates the line at every reference abscissa.
//! - One **objective** per reference point reports how far the prediction is
//!   from the observed value.
//!
//! The grid is split across worker threads. Each worker owns its own model
//! state and evaluator, the way a population-based optimizer would run one
//! evaluator per member.
//!
//! ## Running the Example
//!
//! ```sh
//! RUST_LOG=skein=debug cargo run --example line_fit
//! ```

use std::{
    sync::{Arc, Mutex, PoisonError},
    thread,
};

use serde::Deserialize;
use skein_core::{BoxError, Configure, FnObjective, Iteration, Named, Objective, Parameters, Task};
use skein_evaluator::{Evaluator, EvaluatorConfig};
use skein_metrics::{CostRegistry, ErrorRegistry};
use skein_observers::{TracingObserver, init_tracing};
use tracing::info;

/// Run settings, with the evaluator section embedded as a table.
const SETTINGS: &str = r#"
workers = 4

[grid]
slope = [0.0, 4.0]
intercept = [-2.0, 2.0]
steps = 41

[evaluator]
cost = "RMS"
error = "abs"
"#;

/// Observed `(x, y, weight)` triples, scattered around `y = 2x + 1`.
const REFERENCE: [(f64, f64, f64); 5] = [
    (0.0, 1.1, 1.0),
    (1.0, 2.9, 1.0),
    (2.0, 5.2, 1.0),
    (3.0, 6.8, 1.0),
    (4.0, 9.1, 2.0),
];

#[derive(Debug, Deserialize)]
struct Settings {
    workers: usize,
    grid: Grid,
    evaluator: EvaluatorConfig,
}

#[derive(Debug, Deserialize)]
struct Grid {
    slope: [f64; 2],
    intercept: [f64; 2],
    steps: usize,
}

impl Grid {
    fn value(range: [f64; 2], steps: usize, index: usize) -> f64 {
        let [low, high] = range;
        if steps < 2 {
            return low;
        }
        low + (high - low) * index as f64 / (steps - 1) as f64
    }

    /// Returns the candidate at `index` in row-major order.
    fn point(&self, index: usize) -> Parameters {
        let slope = Self::value(self.slope, self.steps, index / self.steps);
        let intercept = Self::value(self.intercept, self.steps, index % self.steps);
        Parameters::from_iter([("slope", slope), ("intercept", intercept)])
    }

    fn len(&self) -> usize {
        self.steps * self.steps
    }
}

/// Model state shared by the tasks and objectives of one evaluator.
#[derive(Debug, Default)]
struct LineModel {
    slope: f64,
    intercept: f64,
    predictions: Vec<f64>,
}

type SharedModel = Arc<Mutex<LineModel>>;

/// Copies named parameters into the model.
struct SetLine(SharedModel);

impl Configure for SetLine {
    fn configure(
        &mut self,
        parameters: &Parameters,
        _iteration: Option<&Iteration>,
    ) -> Result<(), BoxError> {
        let mut model = self.0.lock().map_err(|_| "line model lock poisoned")?;
        model.slope = parameters.get("slope").ok_or("missing parameter `slope`")?;
        model.intercept = parameters
            .get("intercept")
            .ok_or("missing parameter `intercept`")?;
        Ok(())
    }
}

fn build_evaluator(
    settings: &Settings,
    worker: usize,
) -> Result<Evaluator<TracingObserver>, BoxError> {
    let model = SharedModel::default();

    let predict = {
        let model = Arc::clone(&model);
        Named::new("predict", move || -> Result<(), BoxError> {
            let mut model = model.lock().map_err(|_| "line model lock poisoned")?;
            let (slope, intercept) = (model.slope, model.intercept);
            model.predictions = REFERENCE
                .iter()
                .map(|(x, _, _)| slope * x + intercept)
                .collect();
            Ok(())
        })
    };

    let objectives = REFERENCE
        .iter()
        .enumerate()
        .map(|(index, &(x, y, weight))| {
            let model = Arc::clone(&model);
            let objective = FnObjective::new(format!("y({x})"), weight, move || {
                let model = model.lock().unwrap_or_else(PoisonError::into_inner);
                let predicted = model.predictions.get(index).ok_or("line not evaluated")?;
                Ok(predicted - y)
            });
            Box::new(objective) as Box<dyn Objective + Send>
        })
        .collect();

    let tasks = vec![Task::configure(SetLine(model)), Task::execute(predict)];

    let evaluator = Evaluator::from_config(
        objectives,
        tasks,
        &settings.evaluator,
        &CostRegistry::standard(),
        &ErrorRegistry::standard(),
    )?;

    Ok(evaluator.with_observer(TracingObserver::labeled(format!("worker-{worker}"))))
}

/// Best candidate found by one worker.
#[derive(Debug)]
struct Best {
    cost: f64,
    parameters: Parameters,
}

/// Evaluates every `workers`-th grid point starting at `worker`.
fn scan(settings: &Settings, worker: usize) -> Result<Option<Best>, BoxError> {
    let mut evaluator = build_evaluator(settings, worker)?;
    let mut best: Option<Best> = None;

    for index in (worker..settings.grid.len()).step_by(settings.workers) {
        let parameters = settings.grid.point(index);
        let cost = evaluator.evaluate(Some(&parameters), Some(Iteration::Step(index)))?[0];

        if best.as_ref().is_none_or(|best| cost < best.cost) {
            best = Some(Best { cost, parameters });
        }
    }

    Ok(best)
}

fn main() -> Result<(), BoxError> {
    init_tracing()?;

    let settings: Settings = toml::from_str(SETTINGS)?;
    if settings.workers == 0 {
        return Err("at least one worker is required".into());
    }
    info!(
        points = settings.grid.len(),
        workers = settings.workers,
        cost = %settings.evaluator.cost,
        error = %settings.evaluator.error,
        "scanning grid"
    );

    let results: Vec<Result<Option<Best>, BoxError>> = thread::scope(|scope| {
        let handles: Vec<_> = (0..settings.workers)
            .map(|worker| {
                let settings = &settings;
                scope.spawn(move || scan(settings, worker))
            })
            .collect();

        handles
            .into_iter()
            .map(|handle| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err("worker panicked".into()))
            })
            .collect()
    });

    let mut best: Option<Best> = None;
    for result in results {
        if let Some(candidate) = result? {
            if best.as_ref().is_none_or(|best| candidate.cost < best.cost) {
                best = Some(candidate);
            }
        }
    }

    let best = best.ok_or("grid is empty")?;
    let slope = best.parameters.get("slope").unwrap_or(f64::NAN);
    let intercept = best.parameters.get("intercept").unwrap_or(f64::NAN);
    info!(cost = best.cost, slope, intercept, "best fit");
    println!(
        "best fit: y = {slope:.2} x + {intercept:.2} (weighted RMS {:.4})",
        best.cost
    );

    Ok(())
}
