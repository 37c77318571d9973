//! Guessing how a property value is best displayed
//!
//! Values carry no type information, so the decision is made from the property name and some
//! statistics about the bytes. The rules are checked in a fixed order and the first one that
//! matches wins.

use crate::tree::values::{is_printable, PhysRange, SegmentRange};

/// The ways in which a property value can be displayed
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum DisplayType {
    /// Space separated hex bytes
    HexDump,
    /// A little-endian integer in hex
    HexInt,
    /// A little-endian integer in decimal
    DecInt,
    /// A NUL-terminated string
    String,
    /// Mostly printable data, displayed as an escaped string
    HexString,
    /// A `function-*` reference: a 4 byte handle followed by a printable tag
    FunctionProp,
    /// A list of [`PhysRange`]s
    PhysRanges,
    /// A list of [`SegmentRange`]s
    SegmentRanges,
}

/// Printable runs shorter than this do not count towards [`StringStats::printable_run_total`]
const MIN_PRINTABLE_RUN: usize = 8;

/// Statistics about the bytes of a value
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct StringStats {
    /// Number of printable bytes
    pub printable: usize,
    /// Index of the first NUL byte, or the value length if there is none
    pub first_nul: usize,
    /// Number of non-NUL bytes after the first NUL byte
    pub after_nul: usize,
    /// Number of NUL bytes
    pub nul_count: usize,
    /// Total length of all printable runs of at least 8 bytes
    pub printable_run_total: usize,
}

impl StringStats {
    pub fn measure(bytes: &[u8]) -> Self {
        let mut stats = StringStats {
            first_nul: bytes.len(),
            ..Default::default()
        };
        let mut run = 0;
        for (i, &byte) in bytes.iter().enumerate() {
            if byte == 0 {
                stats.nul_count += 1;
            }
            if is_printable(byte) {
                stats.printable += 1;
                run += 1;
            } else {
                if run >= MIN_PRINTABLE_RUN {
                    stats.printable_run_total += run;
                }
                run = 0;
            }
            if stats.first_nul != bytes.len() && byte != 0 {
                stats.after_nul += 1;
            }
            if byte == 0 && stats.first_nul == bytes.len() {
                stats.first_nul = i;
            }
        }
        if run >= MIN_PRINTABLE_RUN {
            stats.printable_run_total += run;
        }
        stats
    }
}

/// Whether `count` is at least `ratio` of `size`, compared the way a C `double` comparison would
fn at_least(count: usize, ratio: f64, size: usize) -> bool {
    count as f64 >= ratio * size as f64
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

/// Decide how the value `bytes` of the property called `name` should be displayed
pub fn classify(name: &[u8], bytes: &[u8]) -> DisplayType {
    let size = bytes.len();

    if size == 1 || size == 2 {
        return DisplayType::HexInt;
    }
    if name.first() == Some(&b'#') {
        return DisplayType::DecInt;
    }
    if size > 0 && size % SegmentRange::SIZE == 0 && name == b"segment-ranges" {
        return DisplayType::SegmentRanges;
    }

    let stats = StringStats::measure(bytes);
    if stats.printable == stats.first_nul
        && stats.after_nul == 0
        && ((size != 4 && size != 8) || stats.printable + 1 >= size)
    {
        return DisplayType::String;
    }

    if name.starts_with(b"function-")
        && size >= 8
        && size % 4 == 0
        && bytes[4..8].iter().all(|&b| is_printable(b))
    {
        return DisplayType::FunctionProp;
    }

    if at_least(stats.printable, 0.75, size) {
        return DisplayType::HexString;
    }

    if size > 0
        && size % PhysRange::SIZE == 0
        && (contains(name, b"reg") || PhysRange::iter(bytes).all(|r| r.is_plausible()))
    {
        return DisplayType::PhysRanges;
    }

    if stats.printable >= 2 && size >= 24 && at_least(stats.printable + stats.nul_count, 0.90, size)
    {
        return DisplayType::HexString;
    }
    if stats.printable_run_total > 0
        && size >= 24
        && at_least(stats.printable_run_total + stats.nul_count, 0.60, size)
    {
        return DisplayType::HexString;
    }

    if size == 4 || size == 8 {
        return DisplayType::HexInt;
    }
    DisplayType::HexDump
}
