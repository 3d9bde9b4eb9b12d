use serde::{Deserialize, Serialize};
use validator::ValidationErrors;

/// A single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

/// Error contract for request error types flowing through the pipeline.
///
/// Behaviors construct errors through the constructors and classify them with
/// [`is_transient`](RequestError::is_transient); only transient errors are
/// retried by the resiliency stage; business failures (validation, missing
/// entities, conflicts) propagate on the first attempt.
pub trait RequestError: std::error::Error + Send + Sync + 'static {
    /// One or more field-level rule violations, accumulated
    fn validation(failures: Vec<FieldError>) -> Self;

    /// The request's cancellation signal fired before this stage ran
    fn cancelled() -> Self;

    /// No handler was registered for the request type
    fn unhandled(request_name: &'static str) -> Self;

    /// Whether the resiliency stage may retry after this error
    fn is_transient(&self) -> bool;
}

/// Flatten `validator` output into accumulated field errors.
///
/// Every failing rule contributes one entry; nothing is dropped, so a request
/// violating several independent rules reports all of them at once.
pub fn collect_failures(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut failures: Vec<FieldError> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, field_errors)| {
            field_errors.iter().map(|e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string());
                FieldError::new(field.to_string(), message)
            })
        })
        .collect();

    // HashMap iteration order is unstable; keep output deterministic
    failures.sort_by(|a, b| a.field.cmp(&b.field).then(a.message.cmp(&b.message)));
    failures
}
