//! Formatting of property values according to their [`DisplayType`]
//!
//! Every renderer returns whether the value was written completely. When the buffer runs out of
//! width, the text written so far stays intact and the caller decides how to mark the cut.

use crate::display::classify::{classify, DisplayType};
use crate::display::strbuf::BoundedBuf;
use crate::tree::values::{c_str_len, is_printable, read_uint, PhysRange, SegmentRange};

/// Separator between records of range lists
const RECORD_SEPARATOR: &str = "; ";

fn hex_dump(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    for (i, byte) in bytes.iter().enumerate() {
        let sep = if i + 1 == bytes.len() { "" } else { " " };
        if !buf.append_fmt(format_args!("{:02x}{}", byte, sep)).is_written() {
            return false;
        }
    }
    true
}

fn hex_int(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    // values of unexpected length display as all ones
    match read_uint(bytes).unwrap_or(u64::MAX) {
        0 => buf.append_str("0").is_written(),
        value => buf.append_fmt(format_args!("{:#x}", value)).is_written(),
    }
}

fn dec_int(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    let value = read_uint(bytes).map_or(-1, |v| v as i64);
    buf.append_fmt(format_args!("{}", value)).is_written()
}

fn escaped_byte(buf: &mut BoundedBuf, byte: u8) -> bool {
    let append = match byte {
        b'\\' | b'"' => buf.append_fmt(format_args!("\\{}", byte as char)),
        0 => buf.append_str("\\0"),
        b if is_printable(b) => buf.append_fmt(format_args!("{}", b as char)),
        b => buf.append_fmt(format_args!("\\x{:02x}", b)),
    };
    append.is_written()
}

fn hex_string(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    buf.append_str("\"").is_written()
        && bytes.iter().all(|&b| escaped_byte(buf, b))
        && buf.append_str("\"").is_written()
}

fn string(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    hex_string(buf, &bytes[..c_str_len(bytes)])
}

fn phys_ranges(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    let count = bytes.len() / PhysRange::SIZE;
    PhysRange::iter(bytes).enumerate().all(|(i, range)| {
        let sep = if i + 1 == count { "" } else { RECORD_SEPARATOR };
        buf.append_fmt(format_args!("{:#x},{:x}{}", range.phys, range.size, sep))
            .is_written()
    })
}

fn segment_ranges(buf: &mut BoundedBuf, bytes: &[u8]) -> bool {
    let count = bytes.len() / SegmentRange::SIZE;
    SegmentRange::iter(bytes).enumerate().all(|(i, range)| {
        let sep = if i + 1 == count { "" } else { RECORD_SEPARATOR };
        buf.append_fmt(format_args!(
            "{{ phys={:#x}, virt={:#x}, remap={:#x}, size={:#x}, flags={:#x} }}{}",
            range.phys, range.virt, range.remap, range.size, range.flags, sep
        ))
        .is_written()
    })
}

/// Append `bytes` to `buf` formatted as `display_type`.
///
/// Returns `false` if the buffer ran out of width before the value was written completely.
pub fn render(buf: &mut BoundedBuf, display_type: DisplayType, bytes: &[u8]) -> bool {
    match display_type {
        DisplayType::HexDump => hex_dump(buf, bytes),
        DisplayType::HexInt => hex_int(buf, bytes),
        DisplayType::DecInt => dec_int(buf, bytes),
        DisplayType::String => string(buf, bytes),
        DisplayType::HexString | DisplayType::FunctionProp => hex_string(buf, bytes),
        DisplayType::PhysRanges => phys_ranges(buf, bytes),
        DisplayType::SegmentRanges => segment_ranges(buf, bytes),
    }
}

/// [`classify()`] the value of a property and [`render()`] it accordingly
pub fn render_property(buf: &mut BoundedBuf, name: &[u8], bytes: &[u8]) -> bool {
    let display_type = classify(name, bytes);
    log::trace!("displaying {} byte value as {:?}", bytes.len(), display_type);
    render(buf, display_type, bytes)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::display::strbuf::Width;
    use alloc::string::{String, ToString};
    use alloc::vec::Vec;

    fn rendered(name: &str, bytes: &[u8]) -> (String, bool) {
        let mut buf = BoundedBuf::new(Width::Unbounded);
        let complete = render_property(&mut buf, name.as_bytes(), bytes);
        (buf.as_str().to_string(), complete)
    }

    fn text(name: &str, bytes: &[u8]) -> String {
        let (text, complete) = rendered(name, bytes);
        assert!(complete);
        text
    }

    #[test]
    fn integers() {
        assert_eq!(text("x", &[0x05]), "0x5");
        assert_eq!(text("x", &[0, 0]), "0");
        assert_eq!(text("#size-cells", &[1, 0, 0, 0]), "1");
        assert_eq!(text("x", &[0xef, 0xbe, 0xad, 0xde]), "0xdeadbeef");
        assert_eq!(
            text("#x", &[0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff, 0xff]),
            "-1"
        );
        assert_eq!(text("#x", &[0xff, 0xff, 0xff]), "-1");
    }

    #[test]
    fn strings_stop_at_nul() {
        assert_eq!(text("name", b"root\0"), "\"root\"");
        assert_eq!(text("name", b"abc"), "\"abc\"");
        assert_eq!(text("empty", &[0; 12]), "\"\"");
    }

    #[test]
    fn hex_strings_are_escaped() {
        let mut buf = BoundedBuf::new(Width::Unbounded);
        assert!(render(&mut buf, DisplayType::HexString, b"a\"b\\c\x07\0~"));
        assert_eq!(buf.as_str(), r#""a\"b\\c\x07\0~""#);
    }

    #[test]
    fn function_props_render_whole_value() {
        assert_eq!(
            text("function-power", &[1, 0, 0, 0, b'G', b'P', b'I', b'O']),
            r#""\x01\0\0\0GPIO""#
        );
    }

    #[test]
    fn hex_dump() {
        assert_eq!(text("x", &[1, 0xab, 3]), "01 ab 03");
    }

    #[test]
    fn phys_ranges_are_joined() {
        let mut value = Vec::new();
        value.extend_from_slice(&0x2_0000_0000u64.to_le_bytes());
        value.extend_from_slice(&0x4000u64.to_le_bytes());
        value.extend_from_slice(&0x1000u64.to_le_bytes());
        value.extend_from_slice(&0x10u64.to_le_bytes());
        assert_eq!(text("reg", &value), "0x200000000,4000; 0x1000,10");
    }

    #[test]
    fn segment_ranges() {
        let mut value = [0u8; 32];
        value[0..8].copy_from_slice(&0x8_0000_0000u64.to_le_bytes());
        value[8..16].copy_from_slice(&0xffff_fff0_0000_0000u64.to_le_bytes());
        value[24..28].copy_from_slice(&0x4000u32.to_le_bytes());
        value[28..32].copy_from_slice(&3u32.to_le_bytes());
        assert_eq!(
            text("segment-ranges", &value),
            "{ phys=0x800000000, virt=0xfffffff000000000, remap=0x0, size=0x4000, flags=0x3 }"
        );
    }

    #[test]
    fn truncated_dump_keeps_prefix() {
        let mut buf = BoundedBuf::new(Width::DEFAULT);
        assert!(!render_property(&mut buf, b"x", &[1; 30]));
        assert_eq!(buf.as_str().len(), 63);
        assert!(buf.as_str().starts_with("01 01 01"));
        assert!(!buf.is_complete());
    }

    #[test]
    fn truncated_string_has_no_closing_quote() {
        let mut buf = BoundedBuf::new(Width::Bounded(4));
        assert!(!render(&mut buf, DisplayType::HexString, b"abcdef"));
        assert_eq!(buf.as_str(), "\"abc");
    }

    #[test]
    fn rendering_is_repeatable() {
        let value = b"compatible\0strings\0";
        let first = rendered("compatible", value);
        let second = rendered("compatible", value);
        assert_eq!(first, second);
    }
}
