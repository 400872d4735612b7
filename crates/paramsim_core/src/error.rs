use std::fmt;

/// Errors detected while validating a run before any sampling happens
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// No parameters were supplied
    NoParameters,
    /// An iteration count of zero was requested
    ZeroIterations,
    /// Parameter at `index` has an empty (or whitespace-only) name
    EmptyName { index: usize },
    /// Bounds are NaN or infinite
    NonFiniteBounds { name: String, min: f64, max: f64 },
    /// `min >= max`
    InvertedRange { name: String, min: f64, max: f64 },
    /// A bound is too large for rounded draws to stay exact integers
    BoundsTooLarge {
        name: String,
        min: f64,
        max: f64,
        limit: f64,
    },
    /// Weight outside `1..=10`
    WeightOutOfRange { name: String, weight: u8 },
    /// Two parameters share a name, which would make outcome values ambiguous
    DuplicateName { name: String },
    /// Interaction matrix dimension differs from the parameter count
    MatrixSizeMismatch { matrix: usize, parameters: usize },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NoParameters => write!(f, "at least one parameter is required"),
            ConfigError::ZeroIterations => write!(f, "iteration count must be at least 1"),
            ConfigError::EmptyName { index } => {
                write!(f, "parameter #{} has an empty name", index + 1)
            }
            ConfigError::NonFiniteBounds { name, min, max } => {
                write!(f, "parameter '{name}' has non-numeric bounds (min={min}, max={max})")
            }
            ConfigError::InvertedRange { name, min, max } => {
                write!(
                    f,
                    "parameter '{name}' has invalid range: min ({min}) must be less than max ({max})"
                )
            }
            ConfigError::BoundsTooLarge {
                name,
                min,
                max,
                limit,
            } => {
                write!(
                    f,
                    "parameter '{name}' range [{min}, {max}] is too large: bounds must lie within ±{limit}"
                )
            }
            ConfigError::WeightOutOfRange { name, weight } => {
                write!(f, "parameter '{name}' has weight {weight}, expected 1..=10")
            }
            ConfigError::DuplicateName { name } => {
                write!(f, "parameter name '{name}' is used more than once")
            }
            ConfigError::MatrixSizeMismatch { matrix, parameters } => {
                write!(
                    f,
                    "interaction matrix is {matrix}x{matrix} but there are {parameters} parameters"
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Errors surfaced by a complete simulation run
#[derive(Debug, Clone, PartialEq)]
pub enum SimulationError {
    /// The run was rejected before sampling began
    Config(ConfigError),
    /// Cancellation was requested through the run's progress handle
    Cancelled,
    /// The heavy computation phase failed unexpectedly
    Failed(String),
}

impl fmt::Display for SimulationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SimulationError::Config(e) => write!(f, "configuration error: {e}"),
            SimulationError::Cancelled => write!(f, "simulation cancelled"),
            SimulationError::Failed(msg) => write!(f, "simulation failed: {msg}"),
        }
    }
}

impl std::error::Error for SimulationError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            SimulationError::Config(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigError> for SimulationError {
    fn from(err: ConfigError) -> Self {
        SimulationError::Config(err)
    }
}

pub type Result<T> = std::result::Result<T, SimulationError>;
