//! Interpretation of raw property values
//!
//! Values carry no type information. The helpers in here interpret them according to the
//! conventions used by iBoot, which stores integers in little-endian byte order.

use core::mem;

/// Read a little-endian unsigned integer of 1, 2, 4 or 8 bytes
pub fn read_uint(bytes: &[u8]) -> Option<u64> {
    match bytes.len() {
        1 => Some(bytes[0] as u64),
        2 => Some(u16::from_le_bytes(bytes.try_into().ok()?) as u64),
        4 => Some(u32::from_le_bytes(bytes.try_into().ok()?) as u64),
        8 => Some(u64::from_le_bytes(bytes.try_into().ok()?)),
        _ => None,
    }
}

/// Length of the NUL-terminated string at the start of `bytes`, or the length of `bytes` if it
/// contains no NUL
pub fn c_str_len(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| b == 0).unwrap_or(bytes.len())
}

/// Whether `byte` is printable in the C locale (space through tilde)
#[inline]
pub const fn is_printable(byte: u8) -> bool {
    matches!(byte, 0x20..=0x7e)
}

fn u64_at(bytes: &[u8], offset: usize) -> u64 {
    let mut raw = [0u8; mem::size_of::<u64>()];
    raw.copy_from_slice(&bytes[offset..offset + mem::size_of::<u64>()]);
    u64::from_le_bytes(raw)
}

fn u32_at(bytes: &[u8], offset: usize) -> u32 {
    let mut raw = [0u8; mem::size_of::<u32>()];
    raw.copy_from_slice(&bytes[offset..offset + mem::size_of::<u32>()]);
    u32::from_le_bytes(raw)
}

/// Iterate over fixed size records, but only if `bytes` consists of a positive number of them
fn records(bytes: &[u8], record_size: usize) -> core::slice::ChunksExact<'_, u8> {
    if bytes.is_empty() || bytes.len() % record_size != 0 {
        return bytes[..0].chunks_exact(record_size);
    }
    bytes.chunks_exact(record_size)
}

/// A physical memory range as used in `reg` properties
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct PhysRange {
    pub phys: u64,
    pub size: u64,
}

impl PhysRange {
    /// Size of one encoded range
    pub const SIZE: usize = 16;

    /// Highest physical address that is considered plausible for a range start
    pub const MAX_PHYS: u64 = 0x9_8000_0000;
    /// Largest size that is considered plausible for a range
    pub const MAX_SIZE: u64 = 0x8000_0000;
    /// Ranges start on page boundaries
    pub const ALIGNMENT: u64 = 0x1000;

    /// Decode a range from exactly [`PhysRange::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            phys: u64_at(bytes, 0),
            size: u64_at(bytes, 8),
        })
    }

    /// Decode all ranges in `bytes`.
    ///
    /// Yields nothing unless `bytes` is a positive multiple of [`PhysRange::SIZE`] long.
    pub fn iter(bytes: &[u8]) -> impl Iterator<Item = PhysRange> + '_ {
        records(bytes, Self::SIZE).filter_map(Self::from_bytes)
    }

    /// Whether this looks like a real physical memory range rather than arbitrary data
    pub fn is_plausible(&self) -> bool {
        self.phys <= Self::MAX_PHYS
            && self.phys & (Self::ALIGNMENT - 1) == 0
            && self.size <= Self::MAX_SIZE
    }
}

/// A memory segment description as used in `segment-ranges` properties
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct SegmentRange {
    pub phys: u64,
    pub virt: u64,
    pub remap: u64,
    pub size: u32,
    pub flags: u32,
}

impl SegmentRange {
    /// Size of one encoded segment range
    pub const SIZE: usize = 32;

    /// Decode a segment range from exactly [`SegmentRange::SIZE`] bytes
    pub fn from_bytes(bytes: &[u8]) -> Option<Self> {
        if bytes.len() != Self::SIZE {
            return None;
        }
        Some(Self {
            phys: u64_at(bytes, 0),
            virt: u64_at(bytes, 8),
            remap: u64_at(bytes, 16),
            size: u32_at(bytes, 24),
            flags: u32_at(bytes, 28),
        })
    }

    /// Decode all segment ranges in `bytes`.
    ///
    /// Yields nothing unless `bytes` is a positive multiple of [`SegmentRange::SIZE`] long.
    pub fn iter(bytes: &[u8]) -> impl Iterator<Item = SegmentRange> + '_ {
        records(bytes, Self::SIZE).filter_map(Self::from_bytes)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use alloc::vec::Vec;

    #[test]
    fn read_uint_supports_integer_sizes() {
        assert_eq!(read_uint(&[0x05]), Some(5));
        assert_eq!(read_uint(&[0x34, 0x12]), Some(0x1234));
        assert_eq!(read_uint(&[0x78, 0x56, 0x34, 0x12]), Some(0x1234_5678));
        assert_eq!(read_uint(&[1, 0, 0, 0, 0, 0, 0, 0x80]), Some(0x8000_0000_0000_0001));
        assert_eq!(read_uint(&[1, 2, 3]), None);
        assert_eq!(read_uint(&[]), None);
    }

    #[test]
    fn c_str_len_stops_at_nul() {
        assert_eq!(c_str_len(b"abc\0def"), 3);
        assert_eq!(c_str_len(b"abc"), 3);
        assert_eq!(c_str_len(b"\0"), 0);
    }

    #[test]
    fn printable_matches_c_locale() {
        assert!(is_printable(b' '));
        assert!(is_printable(b'~'));
        assert!(!is_printable(0x7f));
        assert!(!is_printable(b'\n'));
        assert!(!is_printable(0xe9));
    }

    #[test]
    fn phys_range_iter_decodes_records() {
        let mut buf = Vec::new();
        buf.extend_from_slice(&0x2_0000_0000u64.to_le_bytes());
        buf.extend_from_slice(&0x4000u64.to_le_bytes());
        buf.extend_from_slice(&0x1000u64.to_le_bytes());
        buf.extend_from_slice(&0x10u64.to_le_bytes());
        let ranges: Vec<_> = PhysRange::iter(&buf).collect();
        assert_eq!(
            ranges,
            [
                PhysRange {
                    phys: 0x2_0000_0000,
                    size: 0x4000
                },
                PhysRange {
                    phys: 0x1000,
                    size: 0x10
                }
            ]
        );
        assert_eq!(PhysRange::iter(&buf[..24]).count(), 0);
        assert_eq!(PhysRange::iter(&[]).count(), 0);
    }

    #[test]
    fn phys_range_plausibility_limits() {
        let ok = PhysRange {
            phys: PhysRange::MAX_PHYS,
            size: PhysRange::MAX_SIZE,
        };
        assert!(ok.is_plausible());
        assert!(!PhysRange {
            phys: PhysRange::MAX_PHYS + 0x1000,
            ..ok
        }
        .is_plausible());
        assert!(!PhysRange { phys: 0x800, ..ok }.is_plausible());
        assert!(!PhysRange {
            size: PhysRange::MAX_SIZE + 1,
            ..ok
        }
        .is_plausible());
    }

    #[test]
    fn segment_range_from_bytes() {
        let mut buf = [0u8; 32];
        buf[0..8].copy_from_slice(&0x8_0000_0000u64.to_le_bytes());
        buf[8..16].copy_from_slice(&0xffff_fff0_0000_0000u64.to_le_bytes());
        buf[16..24].copy_from_slice(&0x1234u64.to_le_bytes());
        buf[24..28].copy_from_slice(&0x4000u32.to_le_bytes());
        buf[28..32].copy_from_slice(&3u32.to_le_bytes());
        assert_eq!(
            SegmentRange::from_bytes(&buf),
            Some(SegmentRange {
                phys: 0x8_0000_0000,
                virt: 0xffff_fff0_0000_0000,
                remap: 0x1234,
                size: 0x4000,
                flags: 3,
            })
        );
        assert_eq!(SegmentRange::from_bytes(&buf[1..]), None);
    }
}
