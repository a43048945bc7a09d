//! Networking modules for the transform endpoints.
//!
//! SYSTEM CONTEXT
//! ==============
//! `api` performs the multipart POST and `types` decodes the JSON reply
//! into the result the workflow consumes.

pub mod api;
pub mod types;
