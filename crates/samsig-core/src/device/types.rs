//! Device descriptor type

/// Device definition for one silicon variant
///
/// The identity key is the (chip_id, chip_exid) pair: several variants share
/// a `chip_id` and differ only in `chip_exid` (package variants report the
/// same die). `flash_size` is a cross-check against what the flash controller
/// reports at runtime, never a source of truth for addressing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Device {
    /// CHIPID_CIDR value identifying the die and revision
    pub chip_id: u32,
    /// CHIPID_EXID value identifying the package variant
    pub chip_exid: u32,
    /// Lowercase family tag (e.g. "same70"), used for enumeration
    pub family: &'static str,
    /// Human-readable variant name (e.g. "SAM E70Q21")
    pub name: &'static str,
    /// Expected total flash size in bytes
    pub flash_size: u32,
}

impl Device {
    /// Check if this device matches the given identity pair
    pub fn matches(&self, chip_id: u32, chip_exid: u32) -> bool {
        self.chip_id == chip_id && self.chip_exid == chip_exid
    }
}
