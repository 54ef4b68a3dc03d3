pub mod error;
pub mod ui;
pub mod views;
pub mod workflow;

pub use error::WorkflowError;
pub use ui::{Modal, ModalKind, Shell, UiState};
pub use workflow::{ReportFormat, Workflow};
