//! samsig - SAM E70/S70/V70/V71 user signature and GPNVM programmer
//!
//! Programs the one-page "user signature" flash region and the 9-bit GPNVM
//! fuse field of SAM E70/S70/V70/V71 (Cortex-M7) parts through a debug probe.
//!
//! # Architecture
//!
//! All target access goes through the `DapAccess` trait from `samsig-core`:
//! - **samsig-core** identifies the silicon from the CHIPID registers,
//!   validates the flash geometry the EEFC controller reports against a
//!   static device table, and drives the EEFC command protocol.
//! - **Probe backends** supply the debug transport. The in-tree `sim` backend
//!   is an in-memory target emulator; real SWD probes plug in the same way.
//!
//! This allows the same command implementations (erase, program, verify,
//! read, fuse) to work regardless of the underlying probe.

mod cli;
mod commands;
mod probes;

use clap::Parser;
use cli::{Cli, Commands, FuseCommands};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logger
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    // Set log level based on verbosity
    match cli.verbose {
        0 => {} // default (info)
        1 => log::set_max_level(log::LevelFilter::Debug),
        _ => log::set_max_level(log::LevelFilter::Trace),
    }

    match cli.command {
        Commands::Info { probe } => {
            probes::with_probe(&probe, |port| commands::signature::run_info(port))
        }
        Commands::Erase { probe } => {
            probes::with_probe(&probe, |port| commands::signature::run_erase(port))
        }
        Commands::Unlock { probe } => {
            probes::with_probe(&probe, |port| commands::signature::run_unlock(port))
        }
        Commands::Lock { probe } => {
            probes::with_probe(&probe, |port| commands::signature::run_lock(port))
        }
        Commands::Program {
            probe,
            input,
            verify,
            no_erase,
        } => probes::with_probe(&probe, |port| {
            commands::signature::run_program(port, &input, verify, no_erase)
        }),
        Commands::Verify { probe, input } => probes::with_probe(&probe, |port| {
            commands::signature::run_verify(port, &input)
        }),
        Commands::Read { probe, output } => probes::with_probe(&probe, |port| {
            commands::signature::run_read(port, &output)
        }),
        Commands::Fuse(subcmd) => match subcmd {
            FuseCommands::Read { probe, section } => {
                probes::with_probe(&probe, |port| commands::fuse::run_read(port, section))
            }
            FuseCommands::Write {
                probe,
                value,
                section,
            } => probes::with_probe(&probe, |port| {
                commands::fuse::run_write(port, value, section)
            }),
            FuseCommands::Help => {
                commands::fuse::print_help();
                Ok(())
            }
        },
        Commands::ListDevices { family } => {
            commands::list_devices(family.as_deref());
            Ok(())
        }
        Commands::ListProbes => {
            commands::list_probes();
            Ok(())
        }
    }
}
