//! Browser side-effect helpers.

pub mod download;
