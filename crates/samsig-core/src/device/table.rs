//! Static device table and lookup
//!
//! The table is ordered: `lookup` returns the first exact match on the
//! (chip_id, chip_exid) pair, so declaration order is part of the contract.

use super::types::Device;

const KIB: u32 = 1024;
const MIB: u32 = 1024 * 1024;

/// All known SAM E70/S70/V70/V71 variants
pub static DEVICES: &[Device] = &[
    Device { chip_id: 0xa1020e00, chip_exid: 0x00000002, family: "same70", name: "SAM E70Q21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1020e01, chip_exid: 0x00000002, family: "same70", name: "SAM E70Q21 (Rev B)", flash_size: 2 * MIB },
    Device { chip_id: 0xa1020c00, chip_exid: 0x00000002, family: "same70", name: "SAM E70Q20",         flash_size: MIB },
    Device { chip_id: 0xa10d0a00, chip_exid: 0x00000002, family: "same70", name: "SAM E70Q19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1020e00, chip_exid: 0x00000001, family: "same70", name: "SAM E70N21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1020e01, chip_exid: 0x00000001, family: "same70", name: "SAM E70N21 (Rev B)", flash_size: 2 * MIB },
    Device { chip_id: 0xa1020c00, chip_exid: 0x00000001, family: "same70", name: "SAM E70N20",         flash_size: MIB },
    Device { chip_id: 0xa1020c01, chip_exid: 0x00000001, family: "same70", name: "SAM E70N20 (Rev B)", flash_size: MIB },
    Device { chip_id: 0xa10d0a00, chip_exid: 0x00000001, family: "same70", name: "SAM E70N19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1020e00, chip_exid: 0x00000000, family: "same70", name: "SAM E70J21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1020c00, chip_exid: 0x00000000, family: "same70", name: "SAM E70J20",         flash_size: MIB },
    Device { chip_id: 0xa10d0a00, chip_exid: 0x00000000, family: "same70", name: "SAM E70J19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1120e00, chip_exid: 0x00000002, family: "sams70", name: "SAM S70Q21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1120c00, chip_exid: 0x00000002, family: "sams70", name: "SAM S70Q20",         flash_size: MIB },
    Device { chip_id: 0xa11d0a00, chip_exid: 0x00000002, family: "sams70", name: "SAM S70Q19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1120e00, chip_exid: 0x00000001, family: "sams70", name: "SAM S70N21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1120c00, chip_exid: 0x00000001, family: "sams70", name: "SAM S70N20",         flash_size: MIB },
    Device { chip_id: 0xa11d0a00, chip_exid: 0x00000001, family: "sams70", name: "SAM S70N19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1120e00, chip_exid: 0x00000000, family: "sams70", name: "SAM S70J21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1120c00, chip_exid: 0x00000000, family: "sams70", name: "SAM S70J20",         flash_size: MIB },
    Device { chip_id: 0xa11d0a00, chip_exid: 0x00000000, family: "sams70", name: "SAM S70J19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1220e00, chip_exid: 0x00000002, family: "samv71", name: "SAM V71Q21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1220e01, chip_exid: 0x00000002, family: "samv71", name: "SAM V71Q21 (Rev B)", flash_size: 2 * MIB },
    Device { chip_id: 0xa1220c00, chip_exid: 0x00000002, family: "samv71", name: "SAM V71Q20",         flash_size: MIB },
    Device { chip_id: 0xa1320c01, chip_exid: 0x00000002, family: "samv71", name: "SAM V71Q20 (Rev B)", flash_size: MIB },
    Device { chip_id: 0xa12d0a00, chip_exid: 0x00000002, family: "samv71", name: "SAM V71Q19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1220e00, chip_exid: 0x00000001, family: "samv71", name: "SAM V71N21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1220e01, chip_exid: 0x00000001, family: "samv71", name: "SAM V71N21 (Rev B)", flash_size: 2 * MIB },
    Device { chip_id: 0xa1220c00, chip_exid: 0x00000001, family: "samv71", name: "SAM V71N20",         flash_size: MIB },
    Device { chip_id: 0xa12d0a00, chip_exid: 0x00000001, family: "samv71", name: "SAM V71N19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa12d0a01, chip_exid: 0x00000001, family: "samv71", name: "SAM V71N19 (Rev B)", flash_size: 512 * KIB },
    Device { chip_id: 0xa1220e00, chip_exid: 0x00000000, family: "samv71", name: "SAM V71J21",         flash_size: 2 * MIB },
    Device { chip_id: 0xa1220c00, chip_exid: 0x00000000, family: "samv71", name: "SAM V71J20",         flash_size: MIB },
    Device { chip_id: 0xa12d0a00, chip_exid: 0x00000000, family: "samv71", name: "SAM V71J19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1320c00, chip_exid: 0x00000002, family: "samv70", name: "SAM V70Q20",         flash_size: MIB },
    Device { chip_id: 0xa13d0a00, chip_exid: 0x00000002, family: "samv70", name: "SAM V70Q19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1320c00, chip_exid: 0x00000001, family: "samv70", name: "SAM V70N20",         flash_size: MIB },
    Device { chip_id: 0xa13d0a00, chip_exid: 0x00000001, family: "samv70", name: "SAM V70N19",         flash_size: 512 * KIB },
    Device { chip_id: 0xa1320c00, chip_exid: 0x00000000, family: "samv70", name: "SAM V70J20",         flash_size: MIB },
    Device { chip_id: 0xa13d0a00, chip_exid: 0x00000000, family: "samv70", name: "SAM V70J19",         flash_size: 512 * KIB },
];

/// Find the first device matching the given identity pair
pub fn lookup(chip_id: u32, chip_exid: u32) -> Option<&'static Device> {
    DEVICES.iter().find(|d| d.matches(chip_id, chip_exid))
}

/// Get the family tag of the device at the given table position
///
/// Returns `None` once `index` runs past the end of the table, which
/// terminates enumeration.
pub fn enumerate(index: usize) -> Option<&'static str> {
    DEVICES.get(index).map(|d| d.family)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_returns_matching_descriptor() {
        for device in DEVICES {
            let found = lookup(device.chip_id, device.chip_exid).unwrap();
            assert_eq!(found.flash_size, device.flash_size);
        }
    }

    #[test]
    fn lookup_is_first_match() {
        // E70Q21 and E70N21 share a chip_id; exid must disambiguate
        let q21 = lookup(0xa1020e00, 0x00000002).unwrap();
        assert_eq!(q21.name, "SAM E70Q21");
        let n21 = lookup(0xa1020e00, 0x00000001).unwrap();
        assert_eq!(n21.name, "SAM E70N21");
    }

    #[test]
    fn lookup_unknown_pair() {
        assert!(lookup(0xdeadbeef, 0).is_none());
        // Known chip_id with an exid no entry carries
        assert!(lookup(0xa1020e00, 0x00000007).is_none());
    }

    #[test]
    fn enumerate_terminates() {
        assert_eq!(enumerate(0), Some("same70"));
        assert_eq!(enumerate(DEVICES.len() - 1), Some("samv70"));
        assert_eq!(enumerate(DEVICES.len()), None);
        assert_eq!(enumerate(usize::MAX), None);
    }
}
