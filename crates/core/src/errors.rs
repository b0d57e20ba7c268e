use thiserror::Error;

use crate::source::SourceError;

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("insight is missing required field `{0}`")]
    MissingInsightField(&'static str),
    #[error("invalid employee record `{record}`: {reason}")]
    InvalidRecord { record: String, reason: String },
    #[error("domain invariant violation: {0}")]
    InvariantViolation(String),
}

#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ApplicationError {
    #[error(transparent)]
    Domain(#[from] DomainError),
    #[error("employee source failure: {0}")]
    Source(String),
}

impl ApplicationError {
    /// Stable label used in operator-facing output.
    pub fn error_class(&self) -> &'static str {
        match self {
            Self::Domain(DomainError::MissingInsightField(_)) => "insight_build",
            Self::Domain(DomainError::InvalidRecord { .. }) => "record_validation",
            Self::Domain(DomainError::InvariantViolation(_)) => "invariant",
            Self::Source(_) => "source",
        }
    }
}

impl From<SourceError> for ApplicationError {
    fn from(value: SourceError) -> Self {
        Self::Source(value.to_string())
    }
}
