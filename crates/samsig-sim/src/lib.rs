//! samsig-sim - In-memory SAM x7x target emulator
//!
//! This crate provides a simulated target that emulates the register space a
//! real SAM E70/S70/V70/V71 exposes through a debug probe: the CHIPID
//! identity registers, the Cortex-M core debug registers used for halting,
//! and the EEFC flash controller with its user signature page and GPNVM
//! bits. It's useful for testing and development without real hardware.

use std::collections::VecDeque;

use samsig_core::dap::DapAccess;
use samsig_core::device::{FLASH_PAGE_SIZE, FLASH_START};
use samsig_core::eefc::{Fsr, EEFC_FCR, EEFC_FMR, EEFC_FRR, EEFC_FSR};
use samsig_core::error::Result;
use samsig_core::session::{
    AIRCR, AIRCR_SYSRESETREQ, AIRCR_VECTKEY, CHIPID_CIDR, CHIPID_EXID, DEMCR, DEMCR_VC_CORERESET,
    DHCSR, DHCSR_C_DEBUGEN, DHCSR_C_HALT, DHCSR_DBGKEY,
};

/// Configuration for the simulated target
#[derive(Debug, Clone)]
pub struct SimConfig {
    /// CHIPID_CIDR value the target reports
    pub chip_id: u32,
    /// CHIPID_EXID value the target reports
    pub chip_exid: u32,
    /// Flash id word reported by GETD (zero simulates an unreadable descriptor)
    pub flash_id: u32,
    /// Total flash size reported by GETD
    pub flash_size: u32,
    /// Page size reported by GETD
    pub page_size: u32,
    /// Number of plane words in the GETD result stream
    pub plane_count: u32,
    /// Number of lock-region words in the GETD result stream
    pub lock_count: u32,
    /// When false the status register reads as never-ready
    pub respond: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            chip_id: 0xa1020e00, // SAM E70Q21
            chip_exid: 0x00000002,
            flash_id: 0x00000105,
            flash_size: 2 * 1024 * 1024,
            page_size: FLASH_PAGE_SIZE as u32,
            plane_count: 1,
            lock_count: 128,
            respond: true,
        }
    }
}

/// Simulated SAM x7x target
///
/// Emulates the flash controller protocol faithfully enough for the full
/// select/program/verify/fuse flow, including the STUS mapping window with
/// its inverted ready polarity, and counts hardware traffic so tests can
/// assert that an operation never touched the controller.
pub struct SimTarget {
    config: SimConfig,
    signature: [u8; FLASH_PAGE_SIZE],
    latch: [u8; FLASH_PAGE_SIZE],
    gpnvm: u16,
    results: VecDeque<u32>,
    frdy: bool,
    sig_mapped: bool,
    halted: bool,
    reset_catch: bool,
    resets: u32,
    hw_resets: u32,
    reconnects: u32,
    commands_issued: u32,
    blocks_written: u32,
    blocks_read: u32,
}

impl SimTarget {
    /// Create a new simulated target with the given configuration
    pub fn new(config: SimConfig) -> Self {
        Self {
            config,
            signature: [0xff; FLASH_PAGE_SIZE],
            latch: [0xff; FLASH_PAGE_SIZE],
            gpnvm: 0,
            results: VecDeque::new(),
            frdy: true,
            sig_mapped: false,
            halted: false,
            reset_catch: false,
            resets: 0,
            hw_resets: 0,
            reconnects: 0,
            commands_issued: 0,
            blocks_written: 0,
            blocks_read: 0,
        }
    }

    /// Create a simulated SAM E70Q21 with default configuration
    pub fn new_default() -> Self {
        Self::new(SimConfig::default())
    }

    /// Current contents of the user signature page
    pub fn signature(&self) -> &[u8; FLASH_PAGE_SIZE] {
        &self.signature
    }

    /// Pre-fill the user signature page
    pub fn set_signature(&mut self, data: &[u8]) {
        let len = data.len().min(FLASH_PAGE_SIZE);
        self.signature[..len].copy_from_slice(&data[..len]);
    }

    /// Current GPNVM bits
    pub fn gpnvm(&self) -> u16 {
        self.gpnvm
    }

    /// Pre-set the GPNVM bits
    pub fn set_gpnvm(&mut self, value: u16) {
        self.gpnvm = value;
    }

    /// Number of EEFC commands issued so far
    pub fn commands_issued(&self) -> u32 {
        self.commands_issued
    }

    /// Number of block writes received so far
    pub fn blocks_written(&self) -> u32 {
        self.blocks_written
    }

    /// Number of block reads served so far
    pub fn blocks_read(&self) -> u32 {
        self.blocks_read
    }

    /// Words still pending in the result register
    pub fn pending_results(&self) -> usize {
        self.results.len()
    }

    /// Whether the core is currently halted
    pub fn halted(&self) -> bool {
        self.halted
    }

    /// Whether the reset-vector catch is armed
    pub fn reset_catch(&self) -> bool {
        self.reset_catch
    }

    /// Number of system resets requested via AIRCR
    pub fn resets(&self) -> u32 {
        self.resets
    }

    /// Number of hardware reset-line assertions
    pub fn hw_resets(&self) -> u32 {
        self.hw_resets
    }

    fn handle_command(&mut self, value: u32) {
        if value >> 24 != 0x5a {
            log::warn!("FCR write without FKEY: 0x{:08x}", value);
            return;
        }

        self.commands_issued += 1;
        let fcmd = value & 0xff;
        let farg = (value >> 8) & 0xffff;
        self.frdy = true;

        match fcmd {
            // GETD
            0x00 => {
                self.results.clear();
                self.results.push_back(self.config.flash_id);
                self.results.push_back(self.config.flash_size);
                self.results.push_back(self.config.page_size);
                self.results.push_back(self.config.plane_count);
                for _ in 0..self.config.plane_count {
                    self.results.push_back(self.config.flash_size / self.config.plane_count.max(1));
                }
                self.results.push_back(self.config.lock_count);
                for _ in 0..self.config.lock_count {
                    self.results
                        .push_back(self.config.flash_size / self.config.lock_count.max(1));
                }
            }
            // SGPB
            0x0b => {
                if farg < 16 {
                    self.gpnvm |= 1 << farg;
                }
            }
            // CGPB
            0x0c => {
                if farg < 16 {
                    self.gpnvm &= !(1 << farg);
                }
            }
            // GGPB
            0x0d => {
                self.results.push_back(self.gpnvm as u32);
            }
            // WUS
            0x12 => {
                self.signature = self.latch;
            }
            // EUS
            0x13 => {
                self.signature = [0xff; FLASH_PAGE_SIZE];
            }
            // STUS - region stays mapped, ready stays low until SPUS
            0x14 => {
                self.sig_mapped = true;
                self.frdy = false;
            }
            // SPUS
            0x15 => {
                self.sig_mapped = false;
            }
            _ => {
                log::warn!("unhandled EEFC command 0x{:02x}", fcmd);
            }
        }
    }
}

impl DapAccess for SimTarget {
    fn reset_target_hw(&mut self, _assert: bool) -> Result<()> {
        self.hw_resets += 1;
        Ok(())
    }

    fn reconnect(&mut self) -> Result<()> {
        self.reconnects += 1;
        Ok(())
    }

    fn read_word(&mut self, addr: u32) -> Result<u32> {
        let value = match addr {
            CHIPID_CIDR => self.config.chip_id,
            CHIPID_EXID => self.config.chip_exid,
            EEFC_FSR => {
                if self.config.respond && self.frdy {
                    Fsr::FRDY.bits()
                } else {
                    0
                }
            }
            EEFC_FRR => self.results.pop_front().unwrap_or(0),
            DHCSR => {
                let mut v = 0;
                if self.halted {
                    v |= DHCSR_C_DEBUGEN | DHCSR_C_HALT;
                }
                v
            }
            _ => {
                log::trace!("read of unmodeled register 0x{:08x}", addr);
                0
            }
        };
        Ok(value)
    }

    fn write_word(&mut self, addr: u32, value: u32) -> Result<()> {
        match addr {
            DHCSR => {
                if value >> 16 == DHCSR_DBGKEY >> 16 {
                    self.halted =
                        value & DHCSR_C_DEBUGEN != 0 && value & DHCSR_C_HALT != 0;
                }
            }
            DEMCR => {
                self.reset_catch = value & DEMCR_VC_CORERESET != 0;
            }
            AIRCR => {
                if value >> 16 == AIRCR_VECTKEY >> 16 && value & AIRCR_SYSRESETREQ != 0 {
                    self.resets += 1;
                    // Without the reset-vector catch the core runs away
                    if !self.reset_catch {
                        self.halted = false;
                    }
                }
            }
            EEFC_FCR => self.handle_command(value),
            EEFC_FMR => {}
            _ => {
                log::trace!("write to unmodeled register 0x{:08x}", addr);
            }
        }
        Ok(())
    }

    fn read_block(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        self.blocks_read += 1;

        let start = addr.wrapping_sub(FLASH_START) as usize;
        if self.sig_mapped && start < FLASH_PAGE_SIZE {
            let len = buf.len().min(FLASH_PAGE_SIZE - start);
            buf[..len].copy_from_slice(&self.signature[start..start + len]);
            for byte in &mut buf[len..] {
                *byte = 0xff;
            }
        } else {
            buf.fill(0xff);
        }
        Ok(())
    }

    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        self.blocks_written += 1;

        let start = addr.wrapping_sub(FLASH_START) as usize;
        if start < FLASH_PAGE_SIZE {
            let len = data.len().min(FLASH_PAGE_SIZE - start);
            self.latch[start..start + len].copy_from_slice(&data[..len]);
        }
        Ok(())
    }

    fn delay_us(&mut self, _us: u32) {
        // No delay needed for in-memory operations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use samsig_core::eefc::{self, PollPolicy};
    use samsig_core::error::Error;
    use samsig_core::gpnvm;
    use samsig_core::options::TargetOptions;
    use samsig_core::session;
    use samsig_core::signature;

    fn select_default(sim: &mut SimTarget) -> session::TargetSession<'static> {
        session::select(sim, TargetOptions::new(&[], "out.bin")).unwrap()
    }

    #[test]
    fn identity_registers() {
        let mut sim = SimTarget::new_default();
        assert_eq!(sim.read_word(CHIPID_CIDR).unwrap(), 0xa1020e00);
        assert_eq!(sim.read_word(CHIPID_EXID).unwrap(), 0x00000002);
    }

    #[test]
    fn select_halts_the_core_at_reset() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);
        assert_eq!(session.device.name, "SAM E70Q21");
        assert!(sim.halted());
        assert!(sim.reset_catch());
        assert_eq!(sim.hw_resets(), 1);
        assert_eq!(sim.resets(), 1);
        session::deselect(&mut sim, session).unwrap();
    }

    #[test]
    fn deselect_releases_the_core() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);
        session::deselect(&mut sim, session).unwrap();
        assert!(!sim.reset_catch());
        assert!(!sim.halted());
        assert_eq!(sim.resets(), 2);
    }

    #[test]
    fn select_unknown_device_is_fatal() {
        let mut sim = SimTarget::new(SimConfig {
            chip_id: 0x12345678,
            ..SimConfig::default()
        });
        let err = session::select(&mut sim, TargetOptions::new(&[], "")).unwrap_err();
        assert_eq!(
            err,
            Error::UnknownDevice {
                chip_id: 0x12345678
            }
        );
    }

    #[test]
    fn select_rejects_wrong_flash_size() {
        let mut sim = SimTarget::new(SimConfig {
            flash_size: 1024 * 1024, // E70Q21 expects 2 MiB
            ..SimConfig::default()
        });
        let err = session::select(&mut sim, TargetOptions::new(&[], "")).unwrap_err();
        assert_eq!(
            err,
            Error::FlashSizeMismatch {
                reported: 1024 * 1024,
                expected: 2 * 1024 * 1024,
            }
        );
    }

    #[test]
    fn select_rejects_wrong_page_size() {
        let mut sim = SimTarget::new(SimConfig {
            page_size: 256,
            ..SimConfig::default()
        });
        let err = session::select(&mut sim, TargetOptions::new(&[], "")).unwrap_err();
        assert_eq!(err, Error::PageSizeMismatch { reported: 256 });
    }

    #[test]
    fn select_rejects_zero_flash_id() {
        let mut sim = SimTarget::new(SimConfig {
            flash_id: 0,
            ..SimConfig::default()
        });
        let err = session::select(&mut sim, TargetOptions::new(&[], "")).unwrap_err();
        assert_eq!(err, Error::DescriptorReadFailed);
    }

    #[test]
    fn descriptor_drain_consumes_every_plane_and_lock_word() {
        // 3 planes and 7 lock regions -> exactly 3 + 7 extra words
        let mut sim = SimTarget::new(SimConfig {
            plane_count: 3,
            lock_count: 7,
            ..SimConfig::default()
        });
        let descriptor = eefc::read_descriptor(&mut sim, PollPolicy::default()).unwrap();
        assert_eq!(descriptor.plane_count, 3);
        assert_eq!(descriptor.lock_count, 7);
        assert_eq!(sim.pending_results(), 0);
    }

    #[test]
    fn unresponsive_controller_times_out() {
        let mut sim = SimTarget::new(SimConfig {
            respond: false,
            ..SimConfig::default()
        });
        let policy = PollPolicy {
            poll_delay_us: 0,
            max_polls: 100,
        };
        let err = eefc::read_descriptor(&mut sim, policy).unwrap_err();
        assert_eq!(err, Error::ControllerTimeout);
    }

    #[test]
    fn program_and_verify_round_trip() {
        let mut payload = [0u8; FLASH_PAGE_SIZE];
        for (i, byte) in payload.iter_mut().enumerate() {
            *byte = i as u8;
        }

        let mut sim = SimTarget::new_default();
        let session = session::select(&mut sim, TargetOptions::new(&payload, "")).unwrap();

        signature::erase(&mut sim, &session).unwrap();
        signature::program(&mut sim, &session).unwrap();
        signature::verify(&mut sim, &session).unwrap();

        session::deselect(&mut sim, session).unwrap();
        assert_eq!(&sim.signature()[..], &payload[..]);
    }

    #[test]
    fn verify_reports_first_mismatch() {
        let payload = [0x5a_u8; FLASH_PAGE_SIZE];

        let mut sim = SimTarget::new_default();
        let session = session::select(&mut sim, TargetOptions::new(&payload, "")).unwrap();
        signature::program(&mut sim, &session).unwrap();

        // Flip one byte behind the tool's back
        sim.signature[17] = 0xa5;

        let err = signature::verify(&mut sim, &session).unwrap_err();
        assert_eq!(
            err,
            Error::VerifyFailed {
                addr: FLASH_START + 17,
                expected: 0x5a,
                found: 0xa5,
            }
        );
    }

    #[test]
    fn short_payload_is_zero_padded() {
        let payload = [0xee_u8; 16];

        let mut sim = SimTarget::new_default();
        let session = session::select(&mut sim, TargetOptions::new(&payload, "")).unwrap();
        signature::program(&mut sim, &session).unwrap();
        signature::verify(&mut sim, &session).unwrap();

        assert_eq!(&sim.signature()[..16], &payload[..]);
        assert!(sim.signature()[16..].iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_payload_never_reaches_hardware() {
        let payload = [0u8; FLASH_PAGE_SIZE + 1];

        let mut sim = SimTarget::new_default();
        let session = session::select(&mut sim, TargetOptions::new(&payload, "")).unwrap();

        let commands_before = sim.commands_issued();
        signature::program(&mut sim, &session).unwrap();
        signature::verify(&mut sim, &session).unwrap();

        assert_eq!(sim.commands_issued(), commands_before);
        assert_eq!(sim.blocks_written(), 0);
        assert_eq!(sim.blocks_read(), 0);
    }

    #[test]
    fn read_sees_programmed_signature() {
        let mut sim = SimTarget::new_default();
        sim.set_signature(&[0xab; FLASH_PAGE_SIZE]);

        let session = select_default(&mut sim);
        let mut buf = [0u8; FLASH_PAGE_SIZE];
        signature::read(&mut sim, &session, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xab));
    }

    #[test]
    fn signature_is_unmapped_outside_read_window() {
        let mut sim = SimTarget::new_default();
        sim.set_signature(&[0xab; FLASH_PAGE_SIZE]);

        // Without STUS the region reads as erased flash
        let mut buf = [0u8; FLASH_PAGE_SIZE];
        sim.read_block(FLASH_START, &mut buf).unwrap();
        assert!(buf.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn erase_resets_signature_to_ff() {
        let mut sim = SimTarget::new_default();
        sim.set_signature(&[0x11; FLASH_PAGE_SIZE]);

        let session = select_default(&mut sim);
        signature::erase(&mut sim, &session).unwrap();
        assert!(sim.signature().iter().all(|&b| b == 0xff));
    }

    #[test]
    fn unlock_behaves_like_erase() {
        let mut sim = SimTarget::new_default();
        sim.set_signature(&[0x22; FLASH_PAGE_SIZE]);

        let session = select_default(&mut sim);
        signature::unlock(&mut sim, &session).unwrap();
        assert!(sim.signature().iter().all(|&b| b == 0xff));
    }

    #[test]
    fn lock_is_a_diagnostic_noop() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);

        let commands_before = sim.commands_issued();
        signature::lock(&mut sim, &session).unwrap();
        assert_eq!(sim.commands_issued(), commands_before);
    }

    #[test]
    fn fuse_round_trip() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);

        let value: u16 = 0b1_0110_1001;
        let mut data = value.to_le_bytes();
        gpnvm::fuse_write(&mut sim, &session, 0, &data).unwrap();
        assert_eq!(sim.gpnvm(), value);

        data = [0; 2];
        let len = gpnvm::fuse_read(&mut sim, &session, 0, &mut data).unwrap();
        assert_eq!(len, gpnvm::GPNVM_SIZE);
        assert_eq!(u16::from_le_bytes(data), value);
    }

    #[test]
    fn fuse_write_never_transmits_bits_above_nine() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);

        let commands_before = sim.commands_issued();
        gpnvm::fuse_write(&mut sim, &session, 0, &0xffff_u16.to_le_bytes()).unwrap();

        // One command per significant bit, nothing for bits 9..16
        assert_eq!(
            sim.commands_issued() - commands_before,
            gpnvm::GPNVM_SIZE_BITS
        );
        assert_eq!(sim.gpnvm(), 0x01ff);
    }

    #[test]
    fn fuse_read_other_section_is_empty() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);

        let commands_before = sim.commands_issued();
        let mut data = [0u8; 2];
        let len = gpnvm::fuse_read(&mut sim, &session, 1, &mut data).unwrap();
        assert_eq!(len, 0);
        assert_eq!(sim.commands_issued(), commands_before);
    }

    #[test]
    fn fuse_write_other_section_is_fatal() {
        let mut sim = SimTarget::new_default();
        let session = select_default(&mut sim);

        let commands_before = sim.commands_issued();
        let err = gpnvm::fuse_write(&mut sim, &session, 3, &[0, 0]).unwrap_err();
        assert_eq!(err, Error::InvalidFuseSection { section: 3 });
        assert_eq!(sim.commands_issued(), commands_before);
    }

    #[test]
    fn oversized_image_fails_option_check() {
        let payload = vec![0u8; 3 * 1024 * 1024];
        let mut sim = SimTarget::new_default();
        let err = session::select(&mut sim, TargetOptions::new(&payload, "")).unwrap_err();
        assert_eq!(
            err,
            Error::ImageTooLarge {
                size: 3 * 1024 * 1024,
                flash_size: 2 * 1024 * 1024,
            }
        );
    }
}
