use std::{collections::BTreeMap, fmt};

/// A candidate point in parameter space, as handed over by the optimizer.
///
/// Optimizers either work with an ordered vector of values or with named
/// values. The evaluator never inspects parameters; it forwards them verbatim
/// to the configure task, which decides how to map them onto model state.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(untagged))]
pub enum Parameters {
    /// Values in the order the optimizer defines its search dimensions.
    Ordered(Vec<f64>),

    /// Values keyed by parameter name.
    Named(BTreeMap<String, f64>),
}

impl Parameters {
    /// Returns the number of parameter values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Ordered(values) => values.len(),
            Self::Named(values) => values.len(),
        }
    }

    /// Returns `true` if there are no parameter values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns the value at `index` for ordered parameters.
    #[must_use]
    pub fn at(&self, index: usize) -> Option<f64> {
        match self {
            Self::Ordered(values) => values.get(index).copied(),
            Self::Named(_) => None,
        }
    }

    /// Returns the value named `name` for named parameters.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<f64> {
        match self {
            Self::Ordered(_) => None,
            Self::Named(values) => values.get(name).copied(),
        }
    }
}

impl From<Vec<f64>> for Parameters {
    fn from(values: Vec<f64>) -> Self {
        Self::Ordered(values)
    }
}

impl<const N: usize> From<[f64; N]> for Parameters {
    fn from(values: [f64; N]) -> Self {
        Self::Ordered(values.to_vec())
    }
}

impl From<BTreeMap<String, f64>> for Parameters {
    fn from(values: BTreeMap<String, f64>) -> Self {
        Self::Named(values)
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for Parameters {
    fn from_iter<T: IntoIterator<Item = (K, f64)>>(iter: T) -> Self {
        Self::Named(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

/// Position of an evaluation within the optimizer's search.
///
/// The evaluator forwards this uninterpreted to the configure task, which may
/// use it to label output directories or log files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Iteration {
    /// A plain iteration counter.
    Step(usize),

    /// A member of a population-based search.
    Member {
        /// Generation (or swarm iteration) number.
        generation: usize,

        /// Index of the individual within its generation.
        index: usize,
    },
}

impl From<usize> for Iteration {
    fn from(step: usize) -> Self {
        Self::Step(step)
    }
}

impl From<(usize, usize)> for Iteration {
    fn from((generation, index): (usize, usize)) -> Self {
        Self::Member { generation, index }
    }
}

impl fmt::Display for Iteration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Step(step) => write!(f, "{step}"),
            Self::Member { generation, index } => write!(f, "({generation}, {index})"),
        }
    }
}
