//! LLM adapter for the external image generation service.
//!
//! DESIGN
//! ======
//! The pipeline depends only on the `GenerateContent` trait. `GeminiClient`
//! is the production implementation; tests substitute a mock. The client is
//! built once at startup and injected through `AppState`.

pub mod config;
pub mod gemini;
pub mod types;

pub use gemini::GeminiClient;
pub use types::GenerateContent;
