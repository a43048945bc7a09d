//! Shared application state.
//!
//! DESIGN
//! ======
//! `AppState` is injected into Axum handlers via the `State` extractor. It
//! holds only the generation client, so concurrent requests share nothing
//! mutable. The client is optional: without an API key the server still
//! starts and transform requests fail with a configuration error.

use std::sync::Arc;

use crate::llm::GenerateContent;

/// Shared application state, injected into Axum handlers via State extractor.
#[derive(Clone, Default)]
pub struct AppState {
    /// Generation client. `None` if `GOOGLE_AI_API_KEY` is not configured.
    pub generator: Option<Arc<dyn GenerateContent>>,
}

impl AppState {
    #[must_use]
    pub fn new(generator: Option<Arc<dyn GenerateContent>>) -> Self {
        Self { generator }
    }
}

// =============================================================================
// TEST HELPERS
// =============================================================================
