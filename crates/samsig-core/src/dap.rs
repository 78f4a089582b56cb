//! Debug port access trait
//!
//! Everything this crate does with the target goes through [`DapAccess`]:
//! single 32-bit register accesses, bulk memory transfers, and the physical
//! reset line. Probe backends (USB adapters, a network bridge, the in-memory
//! simulator) implement this trait; the core never talks to hardware any
//! other way.

use crate::error::Result;

/// Word-addressable debug port with bulk memory access
///
/// All addresses are target memory-map addresses. Implementations are
/// expected to be connected to exactly one halted target; the core issues no
/// locking because the tool is single-threaded by construction.
pub trait DapAccess {
    /// Assert or release the physical target reset line
    fn reset_target_hw(&mut self, assert: bool) -> Result<()>;

    /// Re-establish the debug link after a hardware reset
    fn reconnect(&mut self) -> Result<()>;

    /// Read a single 32-bit word from the target
    fn read_word(&mut self, addr: u32) -> Result<u32>;

    /// Write a single 32-bit word to the target
    fn write_word(&mut self, addr: u32, value: u32) -> Result<()>;

    /// Read a byte range from target memory
    fn read_block(&mut self, addr: u32, buf: &mut [u8]) -> Result<()>;

    /// Write a byte range to target memory
    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<()>;

    /// Delay for the specified number of microseconds
    fn delay_us(&mut self, us: u32);
}

// Blanket impl for boxed ports to allow trait objects
#[cfg(feature = "std")]
impl DapAccess for std::boxed::Box<dyn DapAccess + Send> {
    fn reset_target_hw(&mut self, assert: bool) -> Result<()> {
        (**self).reset_target_hw(assert)
    }

    fn reconnect(&mut self) -> Result<()> {
        (**self).reconnect()
    }

    fn read_word(&mut self, addr: u32) -> Result<u32> {
        (**self).read_word(addr)
    }

    fn write_word(&mut self, addr: u32, value: u32) -> Result<()> {
        (**self).write_word(addr, value)
    }

    fn read_block(&mut self, addr: u32, buf: &mut [u8]) -> Result<()> {
        (**self).read_block(addr, buf)
    }

    fn write_block(&mut self, addr: u32, data: &[u8]) -> Result<()> {
        (**self).write_block(addr, data)
    }

    fn delay_us(&mut self, us: u32) {
        (**self).delay_us(us)
    }
}
