use crate::interview::generator::InterviewGenerator;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Pipeline with its model client, document store and cover picker already wired.
    pub generator: InterviewGenerator,
}
