//! Client-side state modules.
//!
//! DESIGN
//! ======
//! `slot` models one upload target; `workflow` owns every slot for a page
//! and the upload → submit → result/error → reset state machine.

pub mod slot;
pub mod workflow;
