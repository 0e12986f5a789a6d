//! Error taxonomy for the challenge image pipeline.

use thiserror::Error;

use crate::types::Stage;

/// Result alias used throughout Scrawl
pub type Result<T> = std::result::Result<T, ScrawlError>;

/// Errors raised while building or running the pipeline
#[derive(Debug, Error)]
pub enum ScrawlError {
    /// A collaborator could not be resolved or instantiated
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A pipeline stage failed
    #[error("Render error in {stage} stage: {message}")]
    Render { stage: Stage, message: String },

    /// The canvas could not be serialized or the sink rejected the bytes
    #[error("Encoding error: {0}")]
    Encoding(String),
}

impl ScrawlError {
    /// Shorthand for a render failure in `stage`
    pub fn render(stage: Stage, message: impl Into<String>) -> Self {
        Self::Render {
            stage,
            message: message.into(),
        }
    }

    /// Re-tag an error raised by a collaborator as a failure of `stage`.
    ///
    /// Render errors keep the stage they already carry. Encoding errors stay
    /// encoding errors.
    pub fn in_stage(self, stage: Stage) -> Self {
        match self {
            Self::Configuration(message) => Self::Render { stage, message },
            other => other,
        }
    }

    /// The stage that failed, for render errors
    pub fn stage(&self) -> Option<Stage> {
        match self {
            Self::Render { stage, .. } => Some(*stage),
            _ => None,
        }
    }

    /// Returns true if this error happened before any image was produced
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::Configuration(_))
    }

    /// Process exit code for this error
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Configuration(_) => 78,
            Self::Render { .. } => 70,
            Self::Encoding(_) => 74,
        }
    }
}

impl From<std::io::Error> for ScrawlError {
    fn from(err: std::io::Error) -> Self {
        Self::Encoding(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_in_stage_keeps_existing_stage() {
        let err = ScrawlError::render(Stage::Render, "font missing").in_stage(Stage::Distort);
        assert_eq!(err.stage(), Some(Stage::Render));

        let err = ScrawlError::Configuration("bad".into()).in_stage(Stage::Background);
        assert_eq!(err.stage(), Some(Stage::Background));
    }

    #[test]
    fn test_display() {
        let err = ScrawlError::render(Stage::Distort, "boom");
        assert_eq!(err.to_string(), "Render error in distort stage: boom");
    }
}
