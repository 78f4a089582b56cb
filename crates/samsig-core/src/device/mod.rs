//! Device descriptors and the static device table
//!
//! This module provides the descriptor type for SAM E70/S70/V70/V71 variants
//! and the identity-keyed catalog used to match silicon to a known part.

mod table;
mod types;

pub use table::{enumerate, lookup, DEVICES};
pub use types::Device;

/// Base address of the embedded flash in the target memory map
pub const FLASH_START: u32 = 0x0040_0000;

/// Flash page size, fixed for this family
pub const FLASH_PAGE_SIZE: usize = 512;

/// Number of pages covered by one erase block (EPA granularity)
pub const PAGES_IN_ERASE_BLOCK: usize = 16;
