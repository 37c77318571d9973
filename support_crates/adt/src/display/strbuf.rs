//! A text buffer that stops growing at a configurable width
//!
//! Property values can be arbitrarily large, but are normally printed on a single line. Instead
//! of failing once the width is exhausted, appends are cut off and the buffer remembers how long
//! the text would have become.

use alloc::string::String;
use core::fmt;
use core::fmt::Write;

/// Initial allocation of a buffer, unless its width is smaller
const INITIAL_CAPACITY: usize = 0x4000;

/// How much text a [`BoundedBuf`] may hold
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Width {
    /// At most this many bytes
    Bounded(usize),
    Unbounded,
}

impl Width {
    /// Width used for one-line-per-property output, 64 bytes including a terminator
    pub const DEFAULT: Width = Width::Bounded(63);

    fn limit(self) -> usize {
        match self {
            Width::Bounded(n) => n,
            Width::Unbounded => usize::MAX,
        }
    }
}

impl Default for Width {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Outcome of appending to a [`BoundedBuf`]
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub enum Append {
    /// The text was appended completely
    Written,
    /// Only a prefix of the text fit before the width was reached
    Truncated,
    /// Nothing was appended because the buffer was already full
    Full,
}

impl Append {
    pub fn is_written(self) -> bool {
        self == Append::Written
    }
}

/// Writes into `text` until it reaches `limit` bytes and counts what would have been written
struct Limited<'a> {
    text: &'a mut String,
    limit: usize,
    attempted: usize,
}

impl Write for Limited<'_> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        self.attempted += s.len();
        let room = self.limit.saturating_sub(self.text.len());
        if s.len() <= room {
            self.text.push_str(s);
        } else {
            let mut cut = room;
            while !s.is_char_boundary(cut) {
                cut -= 1;
            }
            self.text.push_str(&s[..cut]);
        }
        Ok(())
    }
}

#[derive(Debug, Eq, PartialEq, Clone)]
pub struct BoundedBuf {
    text: String,
    /// Length the text would have if the width was unlimited
    logical_len: usize,
    /// Currently usable capacity, grows up to the width
    capacity: usize,
    width: Width,
}

impl BoundedBuf {
    pub fn new(width: Width) -> Self {
        let capacity = INITIAL_CAPACITY.min(width.limit());
        Self {
            text: String::with_capacity(capacity),
            logical_len: 0,
            capacity,
            width,
        }
    }

    /// Remove all text but keep the allocation
    pub fn reset(&mut self) {
        self.text.clear();
        self.logical_len = 0;
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Whether nothing has been cut off since the last reset
    pub fn is_complete(&self) -> bool {
        self.logical_len == self.text.len()
    }

    /// How long the text would be if nothing had been cut off
    pub fn logical_len(&self) -> usize {
        self.logical_len
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn width(&self) -> Width {
        self.width
    }

    fn write_limited(&mut self, args: fmt::Arguments<'_>, limit: usize) -> usize {
        let mut writer = Limited {
            text: &mut self.text,
            limit,
            attempted: 0,
        };
        // Limited never fails, only a misbehaving Display impl could
        let _ = writer.write_fmt(args);
        writer.attempted
    }

    fn grow_to(&mut self, required: usize) {
        let capacity = required
            .max(self.capacity.saturating_mul(2))
            .min(self.width.limit());
        self.text.reserve_exact(capacity.saturating_sub(self.text.len()));
        self.capacity = capacity;
    }

    /// Append formatted text.
    ///
    /// Text that does not fit into the current capacity makes the buffer grow, up to its width.
    /// Beyond that, only the part that fits is kept.
    pub fn append_fmt(&mut self, args: fmt::Arguments<'_>) -> Append {
        let start = self.text.len();
        if !self.is_complete() {
            let attempted = self.write_limited(args, start);
            self.logical_len = self.logical_len.saturating_add(attempted);
            return Append::Full;
        }

        let attempted = self.write_limited(args, self.capacity);
        let required = start.saturating_add(attempted);
        if required <= self.capacity {
            self.logical_len = required;
            return Append::Written;
        }

        self.text.truncate(start);
        self.grow_to(required);
        self.write_limited(args, self.capacity);
        self.logical_len = required;
        if required <= self.capacity {
            Append::Written
        } else if self.text.len() > start {
            Append::Truncated
        } else {
            Append::Full
        }
    }

    pub fn append_str(&mut self, s: &str) -> Append {
        self.append_fmt(format_args!("{}", s))
    }
}
