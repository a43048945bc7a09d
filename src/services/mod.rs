//! Domain services used by HTTP routes.
//!
//! ARCHITECTURE
//! ============
//! Service modules own the transform pipeline so route handlers can stay
//! focused on multipart parsing and JSON response shapes.

pub mod transform;
