//! # client
//!
//! Browser-side workflow for the Wheelz upload page.
//!
//! `state` holds the upload slots and the workflow state machine, `net`
//! talks to the transform endpoints, and `util` wraps browser side effects.
//! Everything outside the `hydrate` feature is plain Rust so the state
//! machine is testable natively.
//!
//! A page drives one round trip as:
//!
//! ```text
//! let submission = workflow.submit()?;
//! let result = net::api::submit_transform(&submission).await;
//! workflow.complete(submission.id, result);
//! ```

pub mod net;
pub mod state;
pub mod util;

/// Install the panic hook and console logger. Call once at startup.
#[cfg(feature = "hydrate")]
pub fn init_logging() {
    console_error_panic_hook::set_once();
    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        log::warn!("console logger already installed: {e}");
    }
}
