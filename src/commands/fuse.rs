//! GPNVM fuse commands

use samsig_core::dap::DapAccess;
use samsig_core::gpnvm::{self, GPNVM_SIZE, GPNVM_SIZE_BITS};
use samsig_core::options::TargetOptions;
use samsig_core::session;

/// Read and display the GPNVM bits
pub fn run_read(
    port: &mut dyn DapAccess,
    section: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    let session = session::select(port, TargetOptions::new(&[], ""))?;

    let mut data = [0u8; GPNVM_SIZE];
    let result = gpnvm::fuse_read(port, &session, section, &mut data);
    let teardown = session::deselect(port, session);
    let len = result?;
    teardown?;

    if len == 0 {
        println!("Fuse section {} does not exist on this family", section);
        return Ok(());
    }

    print_gpnvm(u16::from_le_bytes(data));
    Ok(())
}

/// Write the GPNVM bits and read them back
pub fn run_write(
    port: &mut dyn DapAccess,
    value: u32,
    section: u32,
) -> Result<(), Box<dyn std::error::Error>> {
    if value >> GPNVM_SIZE_BITS != 0 {
        return Err(format!(
            "GPNVM value 0x{:x} does not fit in {} bits",
            value, GPNVM_SIZE_BITS
        )
        .into());
    }

    let session = session::select(port, TargetOptions::new(&[], ""))?;

    let data = (value as u16).to_le_bytes();
    let mut readback = [0u8; GPNVM_SIZE];
    let result = gpnvm::fuse_write(port, &session, section, &data)
        .and_then(|_| gpnvm::fuse_read(port, &session, section, &mut readback));
    let teardown = session::deselect(port, session);
    result?;
    teardown?;

    print_gpnvm(u16::from_le_bytes(readback));
    Ok(())
}

/// Print the static fuse description
pub fn print_help() {
    print!("{}", gpnvm::help());
}

fn print_gpnvm(value: u16) {
    println!("GPNVM = 0x{:03x} (0b{:09b})", value, value);
    for bit in 0..GPNVM_SIZE_BITS {
        println!("  GPNVM{}: {}", bit, (value >> bit) & 1);
    }
}
