//! YAML scenario files
//!
//! A scenario lists the parameters to simulate and, optionally, run settings:
//!
//! ```yaml
//! name: Greenhouse
//! iterations: 5000
//! seed: 42
//! interaction: weight_affinity
//! parameters:
//!   - name: Temperature
//!     min: 10
//!     max: 30
//!     weight: 7
//!   - name: Humidity
//!     min: 20
//!     max: 80
//! ```
//!
//! Missing parameter fields fall back to the same defaults as a blank entry
//! form: `"Unnamed Parameter"` over `[0, 100]` with weight 5.

use std::path::Path;

use color_eyre::eyre::WrapErr;
use paramsim_core::config::{DEFAULT_ITERATIONS, RunConfig};
use paramsim_core::interaction::InteractionModel;
use paramsim_core::model::{DEFAULT_WEIGHT, Parameter};
use serde::{Deserialize, Serialize};

pub const UNNAMED_PARAMETER: &str = "Unnamed Parameter";
pub const DEFAULT_MIN: f64 = 0.0;
pub const DEFAULT_MAX: f64 = 100.0;

/// One entry of the `parameters:` list, exactly as written in the file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ParameterEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u8>,
}

impl ParameterEntry {
    /// Fill in defaults. Blank names count as missing.
    pub fn into_parameter(self) -> Parameter {
        let name = self
            .name
            .filter(|n| !n.trim().is_empty())
            .unwrap_or_else(|| UNNAMED_PARAMETER.to_string());
        Parameter::new(
            name,
            self.min.unwrap_or(DEFAULT_MIN),
            self.max.unwrap_or(DEFAULT_MAX),
        )
        .with_weight(self.weight.unwrap_or(DEFAULT_WEIGHT))
    }
}

/// On-disk shape of a scenario file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFile {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sensitivity_iterations: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub interaction: Option<InteractionModel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_sensitivity: Option<bool>,
}

impl ScenarioFile {
    pub fn from_yaml(yaml: &str) -> Result<Self, serde_saphyr::Error> {
        serde_saphyr::from_str(yaml)
    }

    pub fn to_yaml(&self) -> Result<String, serde_saphyr::ser::Error> {
        serde_saphyr::to_string(self)
    }
}

/// A scenario ready to run
#[derive(Debug, Clone, PartialEq)]
pub struct Scenario {
    pub name: Option<String>,
    pub parameters: Vec<Parameter>,
    pub config: RunConfig,
}

impl From<ScenarioFile> for Scenario {
    fn from(file: ScenarioFile) -> Self {
        let defaults = RunConfig::default();
        let config = RunConfig {
            iterations: file.iterations.unwrap_or(DEFAULT_ITERATIONS),
            sensitivity_iterations: file.sensitivity_iterations,
            seed: file.seed,
            interaction: file.interaction.unwrap_or(defaults.interaction),
            run_sensitivity: file.run_sensitivity.unwrap_or(defaults.run_sensitivity),
        };

        Scenario {
            name: file.name,
            parameters: file
                .parameters
                .into_iter()
                .map(ParameterEntry::into_parameter)
                .collect(),
            config,
        }
    }
}

/// Command-line settings that take precedence over the file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub iterations: Option<usize>,
    pub sensitivity_iterations: Option<usize>,
    pub seed: Option<u64>,
    pub interaction: Option<InteractionModel>,
    pub no_sensitivity: bool,
}

impl Scenario {
    pub fn from_yaml(yaml: &str) -> color_eyre::Result<Self> {
        let file = ScenarioFile::from_yaml(yaml).wrap_err("invalid scenario YAML")?;
        Ok(file.into())
    }

    #[must_use]
    pub fn with_overrides(mut self, overrides: &Overrides) -> Self {
        if let Some(iterations) = overrides.iterations {
            self.config.iterations = iterations;
        }
        if let Some(iterations) = overrides.sensitivity_iterations {
            self.config.sensitivity_iterations = Some(iterations);
        }
        if let Some(seed) = overrides.seed {
            self.config.seed = Some(seed);
        }
        if let Some(model) = overrides.interaction {
            self.config.interaction = model;
        }
        if overrides.no_sensitivity {
            self.config.run_sensitivity = false;
        }
        self
    }
}

/// Read and parse a scenario file
pub fn load_scenario(path: &Path) -> color_eyre::Result<Scenario> {
    let content = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read scenario {}", path.display()))?;
    let scenario = Scenario::from_yaml(&content)
        .wrap_err_with(|| format!("failed to parse scenario {}", path.display()))?;

    tracing::debug!(
        path = %path.display(),
        parameters = scenario.parameters.len(),
        "loaded scenario"
    );
    Ok(scenario)
}
