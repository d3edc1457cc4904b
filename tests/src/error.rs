//! Scenario error types.

use relink_mutation::{BuildError, MutationError};
use thiserror::Error;

/// Result type for scenario runs.
pub type ScenarioResult<T> = Result<T, ScenarioError>;

/// Errors raised while running a scenario.
#[derive(Debug, Error)]
pub enum ScenarioError {
    #[error("scenario '{scenario}' failed to build its registry: {source}")]
    Build {
        scenario: String,
        #[source]
        source: BuildError,
    },

    #[error("step '{step}' failed: {source}")]
    StepFailed {
        step: String,
        #[source]
        source: MutationError,
    },

    #[error("step '{step}' expected an error but succeeded")]
    ExpectedError { step: String },

    #[error("step '{step}' failed with an unexpected error: {source}")]
    WrongError {
        step: String,
        #[source]
        source: MutationError,
    },

    #[error("step '{step}' check failed: {message}")]
    CheckFailed { step: String, message: String },
}

impl ScenarioError {
    pub fn build(scenario: impl Into<String>, source: impl Into<BuildError>) -> Self {
        Self::Build {
            scenario: scenario.into(),
            source: source.into(),
        }
    }

    pub fn step_failed(step: impl Into<String>, source: MutationError) -> Self {
        Self::StepFailed {
            step: step.into(),
            source,
        }
    }

    pub fn check_failed(step: impl Into<String>, message: impl Into<String>) -> Self {
        Self::CheckFailed {
            step: step.into(),
            message: message.into(),
        }
    }
}
