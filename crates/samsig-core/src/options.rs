//! Caller-supplied operation options
//!
//! The payload and output name are owned by the caller for the whole session;
//! the session only borrows them, so "releasing" the options is plain
//! ownership and needs no explicit call.

use crate::error::{Error, Result};

/// Input/output parameters for one tool invocation
#[derive(Debug, Clone, Copy)]
pub struct TargetOptions<'a> {
    /// Payload for program/verify operations (may be empty for read/erase)
    pub file_data: &'a [u8],
    /// Output name used when persisting a read-back image
    pub name: &'a str,
}

impl<'a> TargetOptions<'a> {
    /// Create options around a borrowed payload and output name
    pub fn new(file_data: &'a [u8], name: &'a str) -> Self {
        Self { file_data, name }
    }

    /// Payload size in bytes
    pub fn file_size(&self) -> u32 {
        self.file_data.len() as u32
    }
}

/// Validate options against the geometry of the matched device
///
/// `erase_size` is the erase-block granularity a whole-flash operation would
/// use; the one-page signature region itself is bound-checked per operation.
pub fn check_options(options: &TargetOptions<'_>, flash_size: u32, erase_size: u32) -> Result<()> {
    let size = options.file_size();

    if size > flash_size {
        return Err(Error::ImageTooLarge { size, flash_size });
    }

    if size > 0 && !size.is_multiple_of(erase_size) {
        log::debug!(
            "payload of {} bytes is not erase-block aligned ({} bytes)",
            size,
            erase_size
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_payload_within_flash() {
        let data = [0u8; 512];
        let options = TargetOptions::new(&data, "out.bin");
        assert!(check_options(&options, 2 * 1024 * 1024, 8192).is_ok());
    }

    #[test]
    fn rejects_payload_beyond_flash() {
        let data = [0u8; 64];
        let options = TargetOptions::new(&data, "out.bin");
        let err = check_options(&options, 32, 8192).unwrap_err();
        assert_eq!(
            err,
            Error::ImageTooLarge {
                size: 64,
                flash_size: 32
            }
        );
    }

    #[test]
    fn empty_payload_is_fine() {
        let options = TargetOptions::new(&[], "out.bin");
        assert!(check_options(&options, 512 * 1024, 8192).is_ok());
    }
}
