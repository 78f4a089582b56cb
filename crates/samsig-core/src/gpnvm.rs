//! GPNVM fuse operations
//!
//! The family carries a single 9-bit field of general-purpose non-volatile
//! bits, always addressed as fuse section 0. There is no other section; reads
//! of any other index yield nothing, writes to any other index are a caller
//! contract violation.

use crate::dap::DapAccess;
use crate::eefc::{self, FlashCommand};
use crate::error::{Error, Result};
use crate::session::TargetSession;

/// Size of the serialized GPNVM field in bytes (little-endian)
pub const GPNVM_SIZE: usize = 2;
/// Number of significant GPNVM bits
pub const GPNVM_SIZE_BITS: u32 = 9;

/// Read the GPNVM bits of fuse section `section`
///
/// Only section 0 exists; any other index returns `Ok(0)` without issuing a
/// controller command. On success the bits are stored little-endian in `data`
/// and the number of bytes written is returned.
pub fn fuse_read<P: DapAccess + ?Sized>(
    port: &mut P,
    session: &TargetSession<'_>,
    section: u32,
    data: &mut [u8; GPNVM_SIZE],
) -> Result<usize> {
    if section != 0 {
        return Ok(0);
    }

    eefc::command(port, FlashCommand::GetGpnvmBits, session.policy)?;
    let gpnvm = eefc::read_result(port)?;

    data[0] = gpnvm as u8;
    data[1] = (gpnvm >> 8) as u8;

    Ok(GPNVM_SIZE)
}

/// Write the GPNVM bits of fuse section `section`
///
/// Only section 0 exists; any other index is fatal and issues no command.
/// The controller has no bulk GPNVM write: each of the 9 bit positions gets
/// its own set or clear command, completing before the next. Bits 9 and up of
/// the input are never transmitted.
pub fn fuse_write<P: DapAccess + ?Sized>(
    port: &mut P,
    session: &TargetSession<'_>,
    section: u32,
    data: &[u8; GPNVM_SIZE],
) -> Result<()> {
    if section != 0 {
        return Err(Error::InvalidFuseSection { section });
    }

    let gpnvm = u16::from_le_bytes(*data);

    for bit in 0..GPNVM_SIZE_BITS {
        let cmd = if gpnvm & (1 << bit) != 0 {
            FlashCommand::SetGpnvmBit(bit as u8)
        } else {
            FlashCommand::ClearGpnvmBit(bit as u8)
        };
        eefc::command(port, cmd, session.policy)?;
    }

    Ok(())
}

/// Static fuse help text exposed by the CLI
pub fn help() -> &'static str {
    "Fuses:\n  This device has one fuses section, which represents GPNVM bits.\n"
}
