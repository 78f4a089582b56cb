//! User signature commands

use std::fs;
use std::path::Path;

use samsig_core::dap::DapAccess;
use samsig_core::device::{FLASH_PAGE_SIZE, FLASH_START};
use samsig_core::gpnvm::GPNVM_SIZE_BITS;
use samsig_core::options::TargetOptions;
use samsig_core::{session, signature};

/// Identify the target and print device information
pub fn run_info(port: &mut dyn DapAccess) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::select(port, TargetOptions::new(&[], ""))?;
    let device = session.device;

    println!("Target Information");
    println!("==================");
    println!();
    println!("Family:          {}", device.family);
    println!("Name:            {}", device.name);
    println!("CHIP_ID:         0x{:08x}", device.chip_id);
    println!("CHIP_EXID:       0x{:08x}", device.chip_exid);
    println!(
        "Flash:           {} bytes ({} KiB) at 0x{:08x}",
        device.flash_size,
        device.flash_size / 1024,
        FLASH_START
    );
    println!("Page size:       {} bytes", FLASH_PAGE_SIZE);
    println!("User signature:  {} bytes (one page)", FLASH_PAGE_SIZE);
    println!("GPNVM bits:      {}", GPNVM_SIZE_BITS);

    session::deselect(port, session)?;
    Ok(())
}

/// Erase the user signature page
pub fn run_erase(port: &mut dyn DapAccess) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::select(port, TargetOptions::new(&[], ""))?;
    let result = signature::erase(port, &session);
    let teardown = session::deselect(port, session);
    result?;
    teardown?;
    Ok(())
}

/// Unlock the user signature region
pub fn run_unlock(port: &mut dyn DapAccess) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::select(port, TargetOptions::new(&[], ""))?;
    let result = signature::unlock(port, &session);
    let teardown = session::deselect(port, session);
    result?;
    teardown?;
    Ok(())
}

/// Lock the user signature region
pub fn run_lock(port: &mut dyn DapAccess) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::select(port, TargetOptions::new(&[], ""))?;
    let result = signature::lock(port, &session);
    let teardown = session::deselect(port, session);
    result?;
    teardown?;
    Ok(())
}

/// Program a file into the user signature page, optionally verifying
pub fn run_program(
    port: &mut dyn DapAccess,
    input: &Path,
    verify: bool,
    no_erase: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    log::info!("Read {} bytes from {}", data.len(), input.display());

    let session = session::select(port, TargetOptions::new(&data, ""))?;
    let result = (|| -> samsig_core::Result<()> {
        if !no_erase {
            signature::erase(port, &session)?;
        }
        signature::program(port, &session)?;
        if verify {
            signature::verify(port, &session)?;
        }
        Ok(())
    })();
    let teardown = session::deselect(port, session);
    result?;
    teardown?;
    Ok(())
}

/// Verify the user signature page against a file
pub fn run_verify(
    port: &mut dyn DapAccess,
    input: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let data = fs::read(input)?;
    log::info!("Read {} bytes from {}", data.len(), input.display());

    let session = session::select(port, TargetOptions::new(&data, ""))?;
    let result = signature::verify(port, &session);
    let teardown = session::deselect(port, session);
    result?;
    teardown?;
    Ok(())
}

/// Read the user signature page and write it to a file
pub fn run_read(
    port: &mut dyn DapAccess,
    output: &Path,
) -> Result<(), Box<dyn std::error::Error>> {
    let name = output.display().to_string();
    let session = session::select(port, TargetOptions::new(&[], &name))?;

    let mut page = [0u8; FLASH_PAGE_SIZE];
    let result = signature::read(port, &session, &mut page);
    let teardown = session::deselect(port, session);
    result?;
    teardown?;

    fs::write(output, page)?;
    log::info!("Wrote {} bytes to {}", page.len(), name);
    Ok(())
}
