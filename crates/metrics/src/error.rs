use thiserror::Error;

/// Errors that can occur when computing deviations or costs.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MetricError {
    #[error("model shape {model:?} does not match reference shape {reference:?}")]
    ShapeMismatch {
        reference: Vec<usize>,
        model: Vec<usize>,
    },

    #[error("weights shape {weights:?} does not match reference shape {reference:?}")]
    WeightsShapeMismatch {
        reference: Vec<usize>,
        weights: Vec<usize>,
    },
}

impl MetricError {
    /// Checks that `model` has the same shape as `reference`.
    pub(crate) fn check_model(reference: &[usize], model: &[usize]) -> Result<(), Self> {
        if reference == model {
            Ok(())
        } else {
            Err(Self::ShapeMismatch {
                reference: reference.to_vec(),
                model: model.to_vec(),
            })
        }
    }

    /// Checks that `weights` has the same shape as `reference`.
    pub(crate) fn check_weights(reference: &[usize], weights: &[usize]) -> Result<(), Self> {
        if reference == weights {
            Ok(())
        } else {
            Err(Self::WeightsShapeMismatch {
                reference: reference.to_vec(),
                weights: weights.to_vec(),
            })
        }
    }
}
