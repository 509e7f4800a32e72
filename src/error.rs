use std::time::Duration;
use thiserror::Error;

/// Failure modes of the external model-invocation boundary.
#[derive(Debug, Clone, Error)]
pub enum InvokeError {
    #[error("model endpoint unavailable: {0}")]
    ModelUnavailable(String),

    #[error("model call exceeded deadline of {0:?}")]
    Timeout(Duration),

    #[error("model response withheld by content filter")]
    ContentFiltered,
}

/// Rejected coordination graph shapes.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum GraphError {
    #[error("duplicate advisor role name: {0}")]
    DuplicateRole(String),

    #[error("root role '{0}' cannot appear in its own advisor set")]
    SelfConsultation(String),

    #[error("coordination graph requires at least one advisor")]
    NoAdvisors,
}

/// Errors surfaced to the caller of a consultation.
///
/// Partial advisor failure is not represented here: the coordinator recovers
/// from it locally and flags the missing perspective in the plan text.
#[derive(Debug, Clone, Error)]
pub enum ConsultError {
    #[error("business context too thin to dispatch: {question}")]
    AmbiguousContext { question: String },

    #[error("all advisors failed to return a result")]
    TotalAdvisorFailure,
}
