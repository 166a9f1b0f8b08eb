//! Shared fixtures for the Skein integration tests.

pub mod quadratic {
    use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

    use skein_core::{
        BoxError, Configure, FnObjective, Iteration, Named, Objective, Parameters, Task,
    };

    /// A mock model of a quadratic response `y = a x² + b x + c`.
    #[derive(Debug, Default)]
    pub struct Quadratic {
        pub a: f64,
        pub b: f64,
        pub c: f64,
        pub xs: Vec<f64>,
        pub ys: Vec<f64>,

        /// Every configure call, as `(a, b, c, iteration)`.
        pub history: Vec<(f64, f64, f64, Option<Iteration>)>,

        /// Number of completed solves.
        pub solves: usize,
    }

    /// Model state shared by a pipeline's tasks and objectives.
    #[derive(Debug, Clone, Default)]
    pub struct Shared(Arc<Mutex<Quadratic>>);

    impl Shared {
        /// Creates a model sampled at `xs`.
        pub fn sampled_at(xs: &[f64]) -> Self {
            let model = Quadratic {
                xs: xs.to_vec(),
                ..Quadratic::default()
            };
            Self(Arc::new(Mutex::new(model)))
        }

        /// Locks the model, ignoring poisoning from a failed test thread.
        pub fn lock(&self) -> MutexGuard<'_, Quadratic> {
            self.0.lock().unwrap_or_else(PoisonError::into_inner)
        }
    }

    /// Configure task reading `a`, `b`, `c` by name or by position.
    #[derive(Debug)]
    pub struct SetCoefficients(pub Shared);

    impl Configure for SetCoefficients {
        fn configure(
            &mut self,
            parameters: &Parameters,
            iteration: Option<&Iteration>,
        ) -> Result<(), BoxError> {
            let read = |name: &str, index: usize| {
                parameters
                    .get(name)
                    .or_else(|| parameters.at(index))
                    .ok_or_else(|| format!("missing coefficient `{name}`"))
            };
            let (a, b, c) = (read("a", 0)?, read("b", 1)?, read("c", 2)?);

            let mut model = self.0.lock();
            model.a = a;
            model.b = b;
            model.c = c;
            model.history.push((a, b, c, iteration.copied()));
            Ok(())
        }
    }

    /// Execute task evaluating the quadratic at every sample point.
    pub fn solve(shared: &Shared) -> Task {
        let shared = shared.clone();
        Task::execute(Named::new("solve", move || {
            let mut model = shared.lock();
            let (a, b, c) = (model.a, model.b, model.c);
            model.ys = model.xs.iter().map(|x| a * x * x + b * x + c).collect();
            model.solves += 1;
            Ok::<(), BoxError>(())
        }))
    }

    /// The standard pipeline: configure, then solve.
    pub fn pipeline(shared: &Shared) -> Vec<Task> {
        vec![Task::configure(SetCoefficients(shared.clone())), solve(shared)]
    }

    /// One objective per sample, reporting the solved value at that sample.
    ///
    /// Pair with a utopia holding the reference values to measure deviation.
    pub fn observables(shared: &Shared, weights: &[f64]) -> Vec<Box<dyn Objective + Send>> {
        weights
            .iter()
            .enumerate()
            .map(|(index, &weight)| {
                let shared = shared.clone();
                let objective = FnObjective::new(format!("y{index}"), weight, move || {
                    let model = shared.lock();
                    let y = model.ys.get(index).ok_or("model has not been solved")?;
                    Ok(*y)
                });
                Box::new(objective) as Box<dyn Objective + Send>
            })
            .collect()
    }
}
