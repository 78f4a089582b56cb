//! Debug probe registration and dispatch
//!
//! This module provides a centralized registry for all debug probes, with
//! support for feature-gated inclusion and dynamic help text generation.

use samsig_core::dap::DapAccess;

/// Information about a debug probe
pub struct ProbeInfo {
    /// Primary name (used for matching)
    pub name: &'static str,
    /// Alternative names/aliases
    pub aliases: &'static [&'static str],
    /// Short description
    pub description: &'static str,
    /// Whether this probe is currently implemented
    pub implemented: bool,
}

/// Get information about all available probes (enabled at compile time)
#[allow(unused_mut, clippy::vec_init_then_push)]
pub fn available_probes() -> Vec<ProbeInfo> {
    let mut probes = Vec::new();

    #[cfg(feature = "sim")]
    probes.push(ProbeInfo {
        name: "sim",
        aliases: &[],
        description: "In-memory SAM x7x target emulator for testing",
        implemented: true,
    });

    probes.push(ProbeInfo {
        name: "edbg",
        aliases: &["cmsis-dap"],
        description: "On-board EDBG / CMSIS-DAP debug probe",
        implemented: false,
    });

    probes
}

/// Generate help text listing all available probes
pub fn probe_help() -> String {
    let probes = available_probes();

    if probes.is_empty() {
        return "No probes available (recompile with probe features enabled)".to_string();
    }

    let mut help = String::from("Available probes:\n");

    for p in &probes {
        let status = if p.implemented {
            ""
        } else {
            " [not yet implemented]"
        };
        help.push_str(&format!("  {:12} - {}{}\n", p.name, p.description, status));
    }

    help
}

/// Generate a short list of probe names for CLI help
pub fn probe_names_short() -> String {
    let probes = available_probes();
    let names: Vec<&str> = probes.iter().map(|p| p.name).collect();
    names.join(", ")
}

/// Check if a probe name matches any available probe
#[allow(unused_variables)]
pub fn find_probe(name: &str) -> Option<&'static str> {
    #[cfg(feature = "sim")]
    if name == "sim" {
        return Some("sim");
    }

    None
}

/// Execute a function with the specified probe
///
/// The probe string can be just the name (e.g., "sim") or include parameters
/// (e.g., "sim:chip_id=0xa1020e00").
#[allow(unused_variables)]
pub fn with_probe<F>(probe: &str, f: F) -> Result<(), Box<dyn std::error::Error>>
where
    F: FnOnce(&mut dyn DapAccess) -> Result<(), Box<dyn std::error::Error>>,
{
    let (name, options) = parse_probe_string(probe);

    let canonical_name = match find_probe(name) {
        Some(n) => n,
        None => {
            return Err(unknown_probe_error(name));
        }
    };

    match canonical_name {
        #[cfg(feature = "sim")]
        "sim" => {
            let mut config = samsig_sim::SimConfig::default();
            for (key, value) in &options {
                match *key {
                    "chip_id" => config.chip_id = parse_u32(value)?,
                    "chip_exid" => config.chip_exid = parse_u32(value)?,
                    _ => log::warn!("Ignoring unknown sim option '{}'", key),
                }
            }
            let mut port = samsig_sim::SimTarget::new(config);
            f(&mut port)
        }

        _ => Err(unknown_probe_error(name)),
    }
}

/// Parse a probe string into name and options
///
/// Format: "name" or "name:option1=value1,option2=value2"
pub fn parse_probe_string(s: &str) -> (&str, Vec<(&str, &str)>) {
    if let Some((name, opts)) = s.split_once(':') {
        let options: Vec<_> = opts
            .split(',')
            .filter_map(|opt| opt.split_once('='))
            .collect();
        (name, options)
    } else {
        (s, Vec::new())
    }
}

#[allow(dead_code)]
fn parse_u32(s: &str) -> Result<u32, Box<dyn std::error::Error>> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Ok(u32::from_str_radix(hex, 16)?)
    } else {
        Ok(s.parse()?)
    }
}

fn unknown_probe_error(name: &str) -> Box<dyn std::error::Error> {
    let mut msg = format!("Unknown probe: {}\n\n", name);
    msg.push_str(&probe_help());
    msg.push_str("\nUse 'samsig list-probes' for more details");
    msg.into()
}
