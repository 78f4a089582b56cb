//! samsig-core - Core library for SAM E70/S70/V70/V71 user signature programming
//!
//! This crate drives the Enhanced Embedded Flash Controller (EEFC) of SAM
//! E70/S70/V70/V71 parts through a debug probe: it identifies the exact
//! silicon variant from the CHIPID registers, cross-checks the flash geometry
//! the controller reports against a static device table, and programs the
//! one-page "user signature" flash region plus the 9-bit GPNVM fuse field.
//!
//! The debug transport itself (SWD/JTAG wire protocol, USB framing) is not
//! implemented here; callers supply it through the [`dap::DapAccess`] trait.
//! The crate is `no_std` compatible so the same code can back embedded probe
//! firmware.
//!
//! # Example
//!
//! ```ignore
//! use samsig_core::{options::TargetOptions, session, signature};
//!
//! fn flash_signature<P: samsig_core::dap::DapAccess>(
//!     port: &mut P,
//!     payload: &[u8],
//! ) -> samsig_core::Result<()> {
//!     let options = TargetOptions::new(payload, "signature.bin");
//!     let session = session::select(port, options)?;
//!     signature::erase(port, &session)?;
//!     signature::program(port, &session)?;
//!     signature::verify(port, &session)?;
//!     session::deselect(port, session)
//! }
//! ```

#![no_std]
#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

#[cfg(feature = "std")]
extern crate std;

pub mod dap;
pub mod device;
pub mod eefc;
pub mod error;
pub mod gpnvm;
pub mod options;
pub mod session;
pub mod signature;

pub use error::{Error, Result};
