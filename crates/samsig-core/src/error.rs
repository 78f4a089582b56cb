//! Error types for samsig-core
//!
//! This module provides a no_std compatible error type that can be used
//! throughout the crate.

use core::fmt;

/// Core error type - no_std compatible, Copy for efficiency
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    // Debug port errors
    /// Debug port register or memory access failed
    Port,
    /// Re-establishing the debug link after reset failed
    Reconnect,

    // Identification errors
    /// Chip identity pair not present in the device table
    UnknownDevice {
        /// Raw CHIPID_CIDR value read from the target
        chip_id: u32,
    },
    /// Flash descriptor could not be read (zero flash id)
    DescriptorReadFailed,
    /// Reported flash size disagrees with the device table
    FlashSizeMismatch {
        /// Flash size reported by the controller
        reported: u32,
        /// Flash size expected for the matched device
        expected: u32,
    },
    /// Reported page size disagrees with the fixed family page size
    PageSizeMismatch {
        /// Page size reported by the controller
        reported: u32,
    },

    // Operation errors
    /// Byte mismatch after programming the user signature
    VerifyFailed {
        /// Address of the first differing byte
        addr: u32,
        /// Byte expected at that address
        expected: u8,
        /// Byte actually read back
        found: u8,
    },
    /// Fuse operation addressed a section this family does not have
    InvalidFuseSection {
        /// The offending section index
        section: u32,
    },
    /// Flash controller never reported ready within the poll budget
    ControllerTimeout,

    // Option errors
    /// Supplied image does not fit the device flash
    ImageTooLarge {
        /// Image size in bytes
        size: u32,
        /// Total flash size of the matched device
        flash_size: u32,
    },
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Port => write!(f, "debug port access failed"),
            Self::Reconnect => write!(f, "failed to re-establish debug link"),
            Self::UnknownDevice { chip_id } => {
                write!(f, "unknown target device (CHIP_ID = 0x{:08x})", chip_id)
            }
            Self::DescriptorReadFailed => {
                write!(f, "cannot read flash descriptor, check Erase pin state")
            }
            Self::FlashSizeMismatch { reported, expected } => {
                write!(
                    f,
                    "invalid reported flash size ({} bytes, expected {})",
                    reported, expected
                )
            }
            Self::PageSizeMismatch { reported } => {
                write!(f, "invalid reported page size ({} bytes)", reported)
            }
            Self::VerifyFailed {
                addr,
                expected,
                found,
            } => {
                write!(
                    f,
                    "verification failed at 0x{:08x}: expected 0x{:02x}, read 0x{:02x}",
                    addr, expected, found
                )
            }
            Self::InvalidFuseSection { section } => {
                write!(f, "incorrect fuse section index ({})", section)
            }
            Self::ControllerTimeout => write!(f, "flash controller unresponsive"),
            Self::ImageTooLarge { size, flash_size } => {
                write!(
                    f,
                    "image size ({} bytes) exceeds flash size ({} bytes)",
                    size, flash_size
                )
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

/// Result type alias using the core Error type
pub type Result<T> = core::result::Result<T, Error>;
