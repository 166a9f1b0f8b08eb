use std::{borrow::Cow, fmt};

use crate::{BoxError, Iteration, Parameters, short_type_name};

/// A pipeline step that injects a candidate parameter vector into model state.
///
/// Closures taking `(&Parameters, Option<&Iteration>)` implement this trait.
pub trait Configure {
    /// Updates the associated model state with new parameter values.
    ///
    /// `iteration` is forwarded from the optimizer without interpretation.
    ///
    /// # Errors
    ///
    /// Returns an error if the parameters cannot be applied.
    fn configure(
        &mut self,
        parameters: &Parameters,
        iteration: Option<&Iteration>,
    ) -> Result<(), BoxError>;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }
}

/// A pipeline step that runs a model and leaves its results for objectives.
///
/// Closures taking no arguments implement this trait.
pub trait Execute {
    /// Runs the model.
    ///
    /// # Errors
    ///
    /// Returns an error if the model run fails. Any error aborts the
    /// evaluation in progress.
    fn execute(&mut self) -> Result<(), BoxError>;

    /// Human-readable name used in diagnostics.
    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(short_type_name::<Self>())
    }
}

impl<F, E> Configure for F
where
    F: FnMut(&Parameters, Option<&Iteration>) -> Result<(), E>,
    E: Into<BoxError>,
{
    fn configure(
        &mut self,
        parameters: &Parameters,
        iteration: Option<&Iteration>,
    ) -> Result<(), BoxError> {
        self(parameters, iteration).map_err(Into::into)
    }
}

impl<F, E> Execute for F
where
    F: FnMut() -> Result<(), E>,
    E: Into<BoxError>,
{
    fn execute(&mut self) -> Result<(), BoxError> {
        self().map_err(Into::into)
    }
}

/// One step of the evaluation pipeline.
///
/// Only the first task of a pipeline may be [`Task::Configure`].
pub enum Task {
    /// Injects parameters into model state.
    Configure(Box<dyn Configure + Send>),

    /// Runs a model.
    Execute(Box<dyn Execute + Send>),
}

impl Task {
    /// Wraps a configure step.
    pub fn configure(task: impl Configure + Send + 'static) -> Self {
        Self::Configure(Box::new(task))
    }

    /// Wraps an execute step.
    pub fn execute(task: impl Execute + Send + 'static) -> Self {
        Self::Execute(Box::new(task))
    }

    /// Returns `true` for the configure variant.
    #[must_use]
    pub fn is_configure(&self) -> bool {
        matches!(self, Self::Configure(_))
    }

    /// Returns the name of the wrapped step.
    #[must_use]
    pub fn name(&self) -> Cow<'_, str> {
        match self {
            Self::Configure(task) => task.name(),
            Self::Execute(task) => task.name(),
        }
    }
}

impl fmt::Debug for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Configure(task) => f.debug_tuple("Configure").field(&task.name()).finish(),
            Self::Execute(task) => f.debug_tuple("Execute").field(&task.name()).finish(),
        }
    }
}

/// Attaches a display name to a task, typically a closure.
///
/// ```
/// use skein_core::{Execute, Named, Task};
///
/// let run = Named::new("dftb+", || Ok::<(), std::io::Error>(()));
/// assert_eq!(Execute::name(&run), "dftb+");
///
/// let task = Task::execute(run);
/// assert_eq!(task.name(), "dftb+");
/// ```
pub struct Named<T> {
    name: String,
    inner: T,
}

impl<T> Named<T> {
    /// Wraps `inner` under `name`.
    pub fn new(name: impl Into<String>, inner: T) -> Self {
        Self {
            name: name.into(),
            inner,
        }
    }
}

impl<T: Configure> Configure for Named<T> {
    fn configure(
        &mut self,
        parameters: &Parameters,
        iteration: Option<&Iteration>,
    ) -> Result<(), BoxError> {
        self.inner.configure(parameters, iteration)
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}

impl<T: Execute> Execute for Named<T> {
    fn execute(&mut self) -> Result<(), BoxError> {
        self.inner.execute()
    }

    fn name(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.name)
    }
}
