use ferrosignal_core::{ConfigError, PipelineError, ValidationError};
use thiserror::Error;

/// CLI-level error categories mapped to exit codes.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Pipeline(#[from] PipelineError),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    pub const fn exit_code(&self) -> u8 {
        match self {
            Self::Validation(_) => 2,
            Self::Config(_) => 2,
            Self::Pipeline(PipelineError::Validation(_)) => 2,
            Self::Pipeline(PipelineError::DataUnavailable { .. }) => 3,
            Self::Pipeline(PipelineError::Source(_)) => 4,
            Self::Serialization(_) => 4,
            Self::Io(_) => 10,
        }
    }
}

#[cfg(test)]
mod tests {
    use ferrosignal_core::SourceError;

    use super::*;

    #[test]
    fn exit_codes_follow_error_class() {
        assert_eq!(CliError::from(ValidationError::EmptySymbol).exit_code(), 2);
        assert_eq!(
            CliError::from(PipelineError::DataUnavailable {
                symbol: "IUSA.L".to_owned(),
                reason: "empty".to_owned(),
            })
            .exit_code(),
            3
        );
        assert_eq!(
            CliError::from(PipelineError::Source(SourceError::unavailable("down"))).exit_code(),
            4
        );
        assert_eq!(
            CliError::from(std::io::Error::other("closed")).exit_code(),
            10
        );
    }
}
