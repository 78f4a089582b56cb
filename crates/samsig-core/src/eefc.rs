//! Enhanced Embedded Flash Controller (EEFC) command driver
//!
//! Every flash operation in this crate reduces to the same primitive: write
//! a keyed command word to FCR, then poll FSR until the controller reports
//! ready. Descriptor-read commands additionally leave a variable-length
//! result stream in FRR that must be drained completely, otherwise the next
//! command observes stale result words.

use bitflags::bitflags;

use crate::dap::DapAccess;
use crate::error::{Error, Result};

/// EEFC flash mode register
pub const EEFC_FMR: u32 = 0x400e_0c00;
/// EEFC flash command register
pub const EEFC_FCR: u32 = 0x400e_0c04;
/// EEFC flash status register
pub const EEFC_FSR: u32 = 0x400e_0c08;
/// EEFC flash result register
pub const EEFC_FRR: u32 = 0x400e_0c0c;

/// Command protection key, required in bits 31:24 of every FCR write
pub const FCR_FKEY: u32 = 0x5a << 24;

bitflags! {
    /// EEFC flash status register bits
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Fsr: u32 {
        /// Flash ready for a new command
        const FRDY = 1 << 0;
        /// Invalid command or bad keyword
        const FCMDE = 1 << 1;
        /// Programming of a locked region was attempted
        const FLOCKE = 1 << 2;
        /// Flash memory error
        const FLERR = 1 << 3;
    }
}

/// EEFC commands used by this tool
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashCommand {
    /// GETD - read the flash descriptor result stream
    GetDescriptor,
    /// SGPB - set one GPNVM bit (argument is the bit number)
    SetGpnvmBit(u8),
    /// CGPB - clear one GPNVM bit (argument is the bit number)
    ClearGpnvmBit(u8),
    /// GGPB - read all GPNVM bits into the result register
    GetGpnvmBits,
    /// WUS - write the page latch into the user signature
    WriteUserSignature,
    /// EUS - erase the user signature
    EraseUserSignature,
    /// STUS - map the user signature into the address space for reading
    StartReadUserSignature,
    /// SPUS - unmap the user signature again
    StopReadUserSignature,
}

impl FlashCommand {
    /// Encode the command into an FCR command word (FKEY | FARG | FCMD)
    pub fn encode(self) -> u32 {
        let (fcmd, farg) = match self {
            Self::GetDescriptor => (0x00, 0),
            Self::SetGpnvmBit(bit) => (0x0b, bit as u32),
            Self::ClearGpnvmBit(bit) => (0x0c, bit as u32),
            Self::GetGpnvmBits => (0x0d, 0),
            Self::WriteUserSignature => (0x12, 0),
            Self::EraseUserSignature => (0x13, 0),
            Self::StartReadUserSignature => (0x14, 0),
            Self::StopReadUserSignature => (0x15, 0),
        };
        FCR_FKEY | (farg << 8) | fcmd
    }
}

/// Polling policy for command completion
///
/// The controller has no abort command and gives no completion deadline; a
/// locked or misconfigured part could keep FRDY low forever. The default is
/// a bound large enough to never trip on working silicon with no inter-poll
/// delay, while still turning a genuinely dead controller into
/// [`Error::ControllerTimeout`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    /// Delay in microseconds between status polls (0 = busy-wait)
    pub poll_delay_us: u32,
    /// Maximum number of polls before giving up
    pub max_polls: u32,
}

impl Default for PollPolicy {
    fn default() -> Self {
        Self {
            poll_delay_us: 0,
            max_polls: u32::MAX,
        }
    }
}

/// Wait until the FRDY bit sets
pub fn wait_ready<P: DapAccess + ?Sized>(port: &mut P, policy: PollPolicy) -> Result<()> {
    for _ in 0..policy.max_polls {
        let fsr = Fsr::from_bits_retain(port.read_word(EEFC_FSR)?);
        if fsr.contains(Fsr::FRDY) {
            return Ok(());
        }
        if policy.poll_delay_us > 0 {
            port.delay_us(policy.poll_delay_us);
        }
    }
    Err(Error::ControllerTimeout)
}

/// Wait while the FRDY bit stays set (inverted polarity)
///
/// Only STUS uses this: the command keeps the signature region mapped for as
/// long as it is active, and readiness is signalled by FRDY *clearing*.
pub fn wait_busy<P: DapAccess + ?Sized>(port: &mut P, policy: PollPolicy) -> Result<()> {
    for _ in 0..policy.max_polls {
        let fsr = Fsr::from_bits_retain(port.read_word(EEFC_FSR)?);
        if !fsr.contains(Fsr::FRDY) {
            return Ok(());
        }
        if policy.poll_delay_us > 0 {
            port.delay_us(policy.poll_delay_us);
        }
    }
    Err(Error::ControllerTimeout)
}

/// Issue a command and wait for the controller to become ready
pub fn command<P: DapAccess + ?Sized>(
    port: &mut P,
    cmd: FlashCommand,
    policy: PollPolicy,
) -> Result<()> {
    log::trace!("EEFC command {:?} (0x{:08x})", cmd, cmd.encode());
    port.write_word(EEFC_FCR, cmd.encode())?;
    wait_ready(port, policy)
}

/// Issue STUS and wait for the signature region to become mapped
pub fn command_start_read<P: DapAccess + ?Sized>(port: &mut P, policy: PollPolicy) -> Result<()> {
    let cmd = FlashCommand::StartReadUserSignature;
    log::trace!("EEFC command {:?} (0x{:08x})", cmd, cmd.encode());
    port.write_word(EEFC_FCR, cmd.encode())?;
    wait_busy(port, policy)
}

/// Read one word from the result register
pub fn read_result<P: DapAccess + ?Sized>(port: &mut P) -> Result<u32> {
    port.read_word(EEFC_FRR)
}

/// Flash descriptor as reported by the GETD command
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlashDescriptor {
    /// Flash interface id (zero means the descriptor is unreadable)
    pub id: u32,
    /// Total flash size in bytes
    pub total_size: u32,
    /// Page size in bytes
    pub page_size: u32,
    /// Number of planes reported
    pub plane_count: u32,
    /// Number of lock regions reported
    pub lock_count: u32,
}

/// Issue GETD and drain its full result stream
///
/// The stream is: id, total size, page size, plane count, one word per plane,
/// lock-region count, one word per lock region. Plane and lock words are
/// discarded but must still be consumed so the result register is clean for
/// the next command.
pub fn read_descriptor<P: DapAccess + ?Sized>(
    port: &mut P,
    policy: PollPolicy,
) -> Result<FlashDescriptor> {
    command(port, FlashCommand::GetDescriptor, policy)?;

    let id = read_result(port)?;
    if id == 0 {
        return Err(Error::DescriptorReadFailed);
    }

    let total_size = read_result(port)?;
    let page_size = read_result(port)?;

    let plane_count = read_result(port)?;
    for _ in 0..plane_count {
        read_result(port)?;
    }

    let lock_count = read_result(port)?;
    for _ in 0..lock_count {
        read_result(port)?;
    }

    Ok(FlashDescriptor {
        id,
        total_size,
        page_size,
        plane_count,
        lock_count,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn command_encoding() {
        assert_eq!(FlashCommand::GetDescriptor.encode(), 0x5a000000);
        assert_eq!(FlashCommand::WriteUserSignature.encode(), 0x5a000012);
        assert_eq!(FlashCommand::EraseUserSignature.encode(), 0x5a000013);
        assert_eq!(FlashCommand::StartReadUserSignature.encode(), 0x5a000014);
        assert_eq!(FlashCommand::StopReadUserSignature.encode(), 0x5a000015);
        assert_eq!(FlashCommand::GetGpnvmBits.encode(), 0x5a00000d);
    }

    #[test]
    fn gpnvm_bit_number_lands_in_farg() {
        assert_eq!(FlashCommand::SetGpnvmBit(0).encode(), 0x5a00000b);
        assert_eq!(FlashCommand::SetGpnvmBit(8).encode(), 0x5a00080b);
        assert_eq!(FlashCommand::ClearGpnvmBit(5).encode(), 0x5a00050c);
    }

    #[test]
    fn default_policy_is_effectively_unbounded() {
        let policy = PollPolicy::default();
        assert_eq!(policy.max_polls, u32::MAX);
        assert_eq!(policy.poll_delay_us, 0);
    }
}
