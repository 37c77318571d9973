use core::mem;

/// Properties are padded to a multiple of this many bytes
pub(crate) const PADDING_ALIGNMENT: usize = mem::align_of::<u32>();

/// Align a number (typically a buffer index) to the padding of property values
#[inline]
pub(crate) const fn align_to_word(n: usize) -> usize {
    (n + PADDING_ALIGNMENT - 1) & !(PADDING_ALIGNMENT - 1)
}

/// Read-only position inside a device tree buffer.
///
/// All reads go through [`take()`](Cursor::take) which never hands out bytes beyond the end of
/// the buffer.
#[derive(Debug, Eq, PartialEq, Clone)]
pub(crate) struct Cursor<'buf> {
    buf: &'buf [u8],
    pos: usize,
}

impl<'buf> Cursor<'buf> {
    pub(crate) fn new(buf: &'buf [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// The offset of the next unread byte
    pub(crate) fn pos(&self) -> usize {
        self.pos
    }

    /// Everything from `offset` to the end of the underlying buffer
    pub(crate) fn tail_from(&self, offset: usize) -> &'buf [u8] {
        self.buf.get(offset..).unwrap_or(&[])
    }

    /// Take exactly `n` bytes and advance past them, or return `None` without moving if fewer
    /// than `n` bytes remain.
    pub(crate) fn take(&mut self, n: usize) -> Option<&'buf [u8]> {
        let end = self.pos.checked_add(n)?;
        let bytes = self.buf.get(self.pos..end)?;
        self.pos = end;
        Some(bytes)
    }

    /// Take a property value of `size` bytes followed by its padding.
    ///
    /// A value that ends exactly at the end of the buffer is accepted even when there is no room
    /// left for its padding.
    pub(crate) fn take_padded(&mut self, size: usize) -> Option<&'buf [u8]> {
        let value_end = self.pos.checked_add(size)?;
        let value = self.buf.get(self.pos..value_end)?;
        let padded_end = align_to_word(value_end);
        if padded_end <= self.buf.len() {
            self.pos = padded_end;
        } else if value_end == self.buf.len() {
            self.pos = value_end;
        } else {
            return None;
        }
        Some(value)
    }

    pub(crate) fn read_u32_le(&mut self) -> Option<u32> {
        let bytes = self.take(mem::size_of::<u32>())?;
        Some(u32::from_le_bytes(bytes.try_into().ok()?))
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn align_to_word_rounds_up() {
        assert_eq!(align_to_word(0), 0);
        assert_eq!(align_to_word(1), 4);
        assert_eq!(align_to_word(4), 4);
        assert_eq!(align_to_word(5), 8);
    }

    #[test]
    fn take_does_not_move_on_failure() {
        let buf = [1u8, 2, 3];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.take(2), Some(&buf[0..2]));
        assert_eq!(cursor.take(2), None);
        assert_eq!(cursor.pos(), 2);
        assert_eq!(cursor.take(1), Some(&buf[2..3]));
        assert_eq!(cursor.take(0), Some(&buf[3..3]));
    }

    #[test]
    fn take_padded_skips_padding() {
        let buf = [0xaau8, 0xbb, 0, 0, 0xcc];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.take_padded(2), Some(&buf[0..2]));
        assert_eq!(cursor.pos(), 4);
    }

    #[test]
    fn take_padded_accepts_missing_padding_at_buffer_end() {
        let buf = [0xaau8, 0xbb, 0xcc, 0xdd, 0xee];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.take_padded(5), Some(&buf[..]));
        assert_eq!(cursor.pos(), 5);
    }

    #[test]
    fn take_padded_rejects_partial_padding_before_buffer_end() {
        // value ends one byte before the buffer does, but padding would need three
        let buf = [0xaau8, 0xbb, 0xcc, 0xdd, 0xee, 0];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.take_padded(5), None);
        assert_eq!(cursor.pos(), 0);
    }

    #[test]
    fn take_padded_rejects_overrun() {
        let buf = [0u8; 4];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.take_padded(5), None);
        assert_eq!(cursor.take_padded(usize::MAX), None);
    }

    #[test]
    fn read_u32_is_little_endian() {
        let buf = [0x78u8, 0x56, 0x34, 0x12];
        let mut cursor = Cursor::new(&buf);
        assert_eq!(cursor.read_u32_le(), Some(0x1234_5678));
        assert_eq!(cursor.read_u32_le(), None);
    }
}
