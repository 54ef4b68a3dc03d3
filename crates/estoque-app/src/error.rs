use estoque_core::errors::{StoreError, ValidationError};

/// Failures a workflow operation can surface. Validation and precondition
/// failures fire before any request; store failures cross the boundary.
#[derive(Clone, Debug, thiserror::Error)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("search for a product first")]
    NoProductResolved,

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl WorkflowError {
    pub fn error_kind(&self) -> &'static str {
        match self {
            Self::Validation(_) => "validation",
            Self::NoProductResolved => "precondition",
            Self::Store(e) => e.error_kind(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn precondition_message() {
        assert_eq!(
            WorkflowError::NoProductResolved.to_string(),
            "search for a product first"
        );
    }

    #[test]
    fn validation_is_transparent() {
        let err: WorkflowError = ValidationError::MissingCountFields.into();
        assert_eq!(err.to_string(), "all count fields are required");
        assert_eq!(err.error_kind(), "validation");
    }

    #[test]
    fn store_kind_passes_through() {
        let err: WorkflowError = StoreError::Http { status: 500 }.into();
        assert_eq!(err.error_kind(), "http");
    }
}
