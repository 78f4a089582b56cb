//! CLI command implementations
//!
//! Every hardware command follows the same shape: select the target (reset,
//! halt, identify, validate geometry), run the operation, then deselect so
//! the part returns to running firmware even when the operation failed.

pub mod fuse;
mod list;
pub mod signature;

pub use list::{list_devices, list_probes};
