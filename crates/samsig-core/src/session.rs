//! Target session - selection, identification and teardown
//!
//! A [`TargetSession`] value is the proof that identification succeeded:
//! every region operation takes one by reference, so nothing can touch the
//! flash controller before the device table and the reported geometry agree.
//! Consuming the session in [`deselect`] makes use-after-teardown impossible.

use crate::dap::DapAccess;
use crate::device::{self, Device, FLASH_PAGE_SIZE, PAGES_IN_ERASE_BLOCK};
use crate::eefc::{self, PollPolicy};
use crate::error::{Error, Result};
use crate::options::{self, TargetOptions};

/// Debug halting control and status register
pub const DHCSR: u32 = 0xe000_edf0;
/// DHCSR debug key, required in bits 31:16 of every write
pub const DHCSR_DBGKEY: u32 = 0xa05f << 16;
/// Enable halting debug
pub const DHCSR_C_DEBUGEN: u32 = 1 << 0;
/// Halt the core
pub const DHCSR_C_HALT: u32 = 1 << 1;

/// Debug exception and monitor control register
pub const DEMCR: u32 = 0xe000_edfc;
/// Catch the core at the reset vector
pub const DEMCR_VC_CORERESET: u32 = 1 << 0;

/// Application interrupt and reset control register
pub const AIRCR: u32 = 0xe000_ed0c;
/// AIRCR vector key, required in bits 31:16 of every write
pub const AIRCR_VECTKEY: u32 = 0x05fa << 16;
/// Request a system reset
pub const AIRCR_SYSRESETREQ: u32 = 1 << 2;

/// Chip identification register
pub const CHIPID_CIDR: u32 = 0x400e_0940;
/// Chip identification extension register
pub const CHIPID_EXID: u32 = 0x400e_0944;

/// State of one selected target
///
/// Exists only after a successful identification. Data-only: operations take
/// the debug port and the session separately, the way every region operation
/// is written.
#[derive(Debug)]
pub struct TargetSession<'a> {
    /// The matched device table entry
    pub device: &'static Device,
    /// Caller-supplied payload and output name, borrowed for the session
    pub options: TargetOptions<'a>,
    /// Poll policy applied to every controller command in this session
    pub policy: PollPolicy,
}

/// Select the target with the default poll policy
pub fn select<'a, P: DapAccess + ?Sized>(
    port: &mut P,
    options: TargetOptions<'a>,
) -> Result<TargetSession<'a>> {
    select_with_policy(port, options, PollPolicy::default())
}

/// Reset, halt and identify the target, validating flash geometry
///
/// The halt sequence is order-sensitive: enable halting debug first, arm the
/// reset-vector catch, then request the reset, so the core comes up halted at
/// the reset vector instead of running firmware.
pub fn select_with_policy<'a, P: DapAccess + ?Sized>(
    port: &mut P,
    options: TargetOptions<'a>,
    policy: PollPolicy,
) -> Result<TargetSession<'a>> {
    port.reset_target_hw(true)?;
    port.reconnect()?;

    // Stop the core
    port.write_word(DHCSR, DHCSR_DBGKEY | DHCSR_C_DEBUGEN | DHCSR_C_HALT)?;
    port.write_word(DEMCR, DEMCR_VC_CORERESET)?;
    port.write_word(AIRCR, AIRCR_VECTKEY | AIRCR_SYSRESETREQ)?;

    let chip_id = port.read_word(CHIPID_CIDR)?;
    let chip_exid = port.read_word(CHIPID_EXID)?;
    log::debug!("CHIPID_CIDR = 0x{:08x}, CHIPID_EXID = 0x{:08x}", chip_id, chip_exid);

    let device = device::lookup(chip_id, chip_exid).ok_or(Error::UnknownDevice { chip_id })?;
    log::info!("Target: {}", device.name);

    let descriptor = eefc::read_descriptor(port, policy)?;

    if descriptor.total_size != device.flash_size {
        return Err(Error::FlashSizeMismatch {
            reported: descriptor.total_size,
            expected: device.flash_size,
        });
    }

    if descriptor.page_size != FLASH_PAGE_SIZE as u32 {
        return Err(Error::PageSizeMismatch {
            reported: descriptor.page_size,
        });
    }

    log::debug!(
        "flash descriptor: id 0x{:08x}, {} planes, {} lock regions",
        descriptor.id,
        descriptor.plane_count,
        descriptor.lock_count
    );

    options::check_options(
        &options,
        device.flash_size,
        (FLASH_PAGE_SIZE * PAGES_IN_ERASE_BLOCK) as u32,
    )?;

    Ok(TargetSession {
        device,
        options,
        policy,
    })
}

/// Tear the session down and let the part run normal firmware again
///
/// Disables the reset-vector catch and requests a system reset. Consumes the
/// session so no region operation can run against a deselected target.
pub fn deselect<P: DapAccess + ?Sized>(port: &mut P, session: TargetSession<'_>) -> Result<()> {
    drop(session);

    port.write_word(DEMCR, 0)?;
    port.write_word(AIRCR, AIRCR_VECTKEY | AIRCR_SYSRESETREQ)
}
