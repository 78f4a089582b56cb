//! User signature region operations
//!
//! The user signature is a single 512-byte flash page outside the normal
//! address space. It is only visible while a "start read" command is active,
//! which is why verify and read bracket their block reads with STUS/SPUS.
//! All operations bound-check the payload before touching hardware; an
//! oversized payload is a logged no-op, not a fatal error.

use crate::dap::DapAccess;
use crate::device::{FLASH_PAGE_SIZE, FLASH_START};
use crate::eefc::{self, FlashCommand};
use crate::error::{Error, Result};
use crate::session::TargetSession;

/// Returns the payload padded to one page, or `None` (logged) if it does not fit
fn padded_payload(session: &TargetSession<'_>) -> Option<[u8; FLASH_PAGE_SIZE]> {
    let data = session.options.file_data;
    if data.len() > FLASH_PAGE_SIZE {
        log::error!(
            "file size ({} bytes) cannot exceed {} bytes, nothing done",
            data.len(),
            FLASH_PAGE_SIZE
        );
        return None;
    }

    let mut page = [0u8; FLASH_PAGE_SIZE];
    page[..data.len()].copy_from_slice(data);
    Some(page)
}

/// Erase the user signature page
pub fn erase<P: DapAccess + ?Sized>(port: &mut P, session: &TargetSession<'_>) -> Result<()> {
    eefc::command(port, FlashCommand::EraseUserSignature, session.policy)?;
    log::info!("User signature erased");
    Ok(())
}

/// Lock the user signature region
///
/// The region has no lock bit; this is a diagnostic no-op so callers are not
/// misled into believing the region is protected.
pub fn lock<P: DapAccess + ?Sized>(_port: &mut P, _session: &TargetSession<'_>) -> Result<()> {
    log::warn!("User signature area cannot be locked");
    Ok(())
}

/// Unlock the user signature region
///
/// There is no separate lock state to clear; unlocking is an erase.
pub fn unlock<P: DapAccess + ?Sized>(port: &mut P, session: &TargetSession<'_>) -> Result<()> {
    erase(port, session)
}

/// Program the session payload into the user signature page
pub fn program<P: DapAccess + ?Sized>(port: &mut P, session: &TargetSession<'_>) -> Result<()> {
    let Some(page) = padded_payload(session) else {
        return Ok(());
    };

    port.write_block(FLASH_START, &page)?;
    eefc::command(port, FlashCommand::WriteUserSignature, session.policy)?;

    log::info!(
        "User signature programmed ({} bytes)",
        session.options.file_size()
    );
    Ok(())
}

/// Read the user signature back and compare against the session payload
///
/// The comparison covers the full padded page, matching what [`program`]
/// wrote. The first differing byte is fatal and reported with its address.
pub fn verify<P: DapAccess + ?Sized>(port: &mut P, session: &TargetSession<'_>) -> Result<()> {
    let Some(expected) = padded_payload(session) else {
        return Ok(());
    };

    let mut actual = [0u8; FLASH_PAGE_SIZE];
    read_page(port, session, &mut actual)?;

    for (i, (want, got)) in expected.iter().zip(actual.iter()).enumerate() {
        if want != got {
            return Err(Error::VerifyFailed {
                addr: FLASH_START + i as u32,
                expected: *want,
                found: *got,
            });
        }
    }

    log::info!("User signature verified");
    Ok(())
}

/// Read the user signature page into the caller's buffer
///
/// Persisting the result under the session's output name is the caller's
/// side of the contract; the core only fills the buffer.
pub fn read<P: DapAccess + ?Sized>(
    port: &mut P,
    session: &TargetSession<'_>,
    buf: &mut [u8; FLASH_PAGE_SIZE],
) -> Result<()> {
    log::info!("Reading {} bytes of user signature", FLASH_PAGE_SIZE);
    read_page(port, session, buf)
}

/// STUS/SPUS-bracketed page read
///
/// STUS keeps the signature mapped while active and signals readiness by
/// *clearing* FRDY, so its wait polarity is inverted relative to every other
/// command. SPUS waits normally.
fn read_page<P: DapAccess + ?Sized>(
    port: &mut P,
    session: &TargetSession<'_>,
    buf: &mut [u8; FLASH_PAGE_SIZE],
) -> Result<()> {
    eefc::command_start_read(port, session.policy)?;

    port.read_block(FLASH_START, buf)?;

    eefc::command(port, FlashCommand::StopReadUserSignature, session.policy)?;
    Ok(())
}
