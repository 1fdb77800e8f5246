use crate::model::Span;
use crate::validate::ValidationError;

#[derive(Debug)]
pub enum EngineError {
    Validation(ValidationError),
    NotFound(String),
    OutOfHours { open: Span },
    Internal(String),
}

impl EngineError {
    /// Short label for metrics and logs.
    pub fn kind(&self) -> &'static str {
        match self {
            EngineError::Validation(_) => "invalid",
            EngineError::NotFound(_) => "not_found",
            EngineError::OutOfHours { .. } => "out_of_hours",
            EngineError::Internal(_) => "internal",
        }
    }
}

impl std::fmt::Display for EngineError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EngineError::Validation(e) => write!(f, "invalid request: {e}"),
            EngineError::NotFound(id) => write!(f, "resource not found: {id}"),
            EngineError::OutOfHours { open } => {
                write!(f, "requested window is outside open hours {open}")
            }
            EngineError::Internal(e) => write!(f, "internal error: {e}"),
        }
    }
}

impl std::error::Error for EngineError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            EngineError::Validation(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ValidationError> for EngineError {
    fn from(e: ValidationError) -> Self {
        EngineError::Validation(e)
    }
}
