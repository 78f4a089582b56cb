//! CLI argument parsing

use crate::probes;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Parse a string as a hex or decimal u32
fn parse_hex_u32(s: &str) -> Result<u32, String> {
    if let Some(hex) = s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        u32::from_str_radix(hex, 16).map_err(|e| format!("Invalid hex value: {}", e))
    } else {
        s.parse::<u32>().map_err(|e| format!("Invalid number: {}", e))
    }
}

/// Generate dynamic help text for the probe argument
fn probe_help() -> String {
    format!("Debug probe to use [available: {}]", probes::probe_names_short())
}

#[derive(Parser)]
#[command(name = "samsig")]
#[command(author, version, about = "SAM E70/S70/V70/V71 user signature and GPNVM programmer", long_about = None)]
pub struct Cli {
    /// Verbosity level (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Identify the connected target and show its flash geometry
    Info {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,
    },

    /// Erase the user signature page
    Erase {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,
    },

    /// Unlock the user signature region
    Unlock {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,
    },

    /// Lock the user signature region
    Lock {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,
    },

    /// Program a file into the user signature page
    Program {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,

        /// Input file path (at most 512 bytes, zero-padded to a full page)
        #[arg(short, long)]
        input: PathBuf,

        /// Verify after programming
        #[arg(long, default_value = "true")]
        verify: bool,

        /// Don't erase before programming
        #[arg(long)]
        no_erase: bool,
    },

    /// Verify the user signature page against a file
    Verify {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,

        /// Input file path to verify against
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Read the user signature page to a file
    Read {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,

        /// Output file path
        #[arg(short, long)]
        output: PathBuf,
    },

    /// GPNVM fuse operations
    #[command(subcommand)]
    Fuse(FuseCommands),

    /// List supported devices
    ListDevices {
        /// Filter by family (e.g. SAME70, SAMV71)
        #[arg(long)]
        family: Option<String>,
    },

    /// List supported debug probes
    ListProbes,
}

/// Fuse-related subcommands
#[derive(Subcommand)]
pub enum FuseCommands {
    /// Read the GPNVM bits
    Read {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,

        /// Fuse section index
        #[arg(long, default_value_t = 0, value_parser = parse_hex_u32)]
        section: u32,
    },

    /// Write the GPNVM bits
    Write {
        /// Debug probe to use
        #[arg(short, long, help = probe_help())]
        probe: String,

        /// New GPNVM value (hex or decimal, 9 significant bits)
        #[arg(value_parser = parse_hex_u32)]
        value: u32,

        /// Fuse section index
        #[arg(long, default_value_t = 0, value_parser = parse_hex_u32)]
        section: u32,
    },

    /// Describe the fuse sections of this family
    Help,
}
