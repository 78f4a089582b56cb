//! List commands implementation

use crate::probes;
use samsig_core::device;

/// List all available debug probes
pub fn list_probes() {
    println!("Supported probes:");
    println!();

    for probe in probes::available_probes() {
        let status = if probe.implemented {
            ""
        } else {
            " (not yet implemented)"
        };
        println!("  {:10} - {}{}", probe.name, probe.description, status);
        for alias in probe.aliases {
            println!("  {:10}   (alias of {})", alias, probe.name);
        }
    }
}

/// List all supported devices
pub fn list_devices(family_filter: Option<&str>) {
    println!("Supported devices:");
    println!();
    println!(
        "{:<8} {:<20} {:>10} {:>10} {:>10}",
        "Family", "Name", "CHIP_ID", "EXID", "Flash"
    );
    println!("{}", "-".repeat(64));

    for device in device::DEVICES {
        // Apply family filter if specified
        if let Some(family) = family_filter {
            if !device.family.to_lowercase().contains(&family.to_lowercase()) {
                continue;
            }
        }

        println!(
            "{:<8} {:<20} 0x{:08x} 0x{:08x} {:>10}",
            device.family,
            device.name,
            device.chip_id,
            device.chip_exid,
            format_size(device.flash_size)
        );
    }
}

fn format_size(bytes: u32) -> String {
    if bytes >= 1024 * 1024 {
        format!("{} MiB", bytes / (1024 * 1024))
    } else if bytes >= 1024 {
        format!("{} KiB", bytes / 1024)
    } else {
        format!("{} B", bytes)
    }
}
