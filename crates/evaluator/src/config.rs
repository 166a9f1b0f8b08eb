use serde::{Deserialize, Deserializer, Serialize};
use skein_metrics::{DEFAULT_COST, DEFAULT_ERROR};

/// Names the cost function, error metric, and utopia point of an evaluator.
///
/// Designed to be embedded in a larger configuration document. Names are
/// lowercased while parsing, so `"RMS"` and `"rms"` select the same entry.
///
/// ```
/// use skein_evaluator::EvaluatorConfig;
///
/// let config: EvaluatorConfig = serde_json::from_str(r#"{ "error": "RelErr" }"#).unwrap();
///
/// assert_eq!(config.cost, "rms");
/// assert_eq!(config.error, "relerr");
/// assert_eq!(config.utopia, None);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EvaluatorConfig {
    /// Registry key of the cost function.
    #[serde(deserialize_with = "lowercase")]
    pub cost: String,

    /// Registry key of the per-element error metric used by the cost function.
    #[serde(deserialize_with = "lowercase")]
    pub error: String,

    /// Target fitness per objective. All zeros when absent.
    pub utopia: Option<Vec<f64>>,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self::new(DEFAULT_COST, DEFAULT_ERROR)
    }
}

impl EvaluatorConfig {
    /// Creates a config selecting `cost` and `error` by name.
    #[must_use]
    pub fn new(cost: &str, error: &str) -> Self {
        Self {
            cost: cost.to_lowercase(),
            error: error.to_lowercase(),
            utopia: None,
        }
    }

    /// Sets the utopia point.
    #[must_use]
    pub fn with_utopia(mut self, utopia: Vec<f64>) -> Self {
        self.utopia = Some(utopia);
        self
    }
}

fn lowercase<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    String::deserialize(deserializer).map(|name| name.to_lowercase())
}
