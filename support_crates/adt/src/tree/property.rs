//! Handling of properties inside nodes

use crate::tree::buf_tools::Cursor;
use core::ffi::CStr;
use core::mem;

/// Length of the fixed size name field of a property
pub const NAME_LEN: usize = 32;

/// Bit 31 of the size field is set by iBoot templates for values that should be replaced (e.g.
/// from syscfg) before handing the tree to the kernel. It is not part of the value length.
pub const REPLACEMENT_FLAG: u32 = 0x8000_0000;

/// Ways in which a single property header can be invalid
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub(crate) enum PropertyParseError {
    HeaderTooSmall,
    UnterminatedName,
    ValueTooLarge { size: usize },
}

/// The fixed size header that precedes every property value
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct PropertyHeader<'buf> {
    pub name: &'buf CStr,
    /// The raw size field including [`REPLACEMENT_FLAG`]
    pub raw_size: u32,
}

impl<'buf> PropertyHeader<'buf> {
    /// Size of the header in its encoded form
    pub const SIZE: usize = NAME_LEN + mem::size_of::<u32>();

    /// Length of the value that follows the header
    pub fn size(&self) -> usize {
        (self.raw_size & !REPLACEMENT_FLAG) as usize
    }

    pub fn replacement_flag(&self) -> bool {
        self.raw_size & REPLACEMENT_FLAG != 0
    }

    pub(crate) fn read(cursor: &mut Cursor<'buf>) -> Result<Self, PropertyParseError> {
        let header = cursor
            .take(Self::SIZE)
            .ok_or(PropertyParseError::HeaderTooSmall)?;
        let (name_field, size_field) = header.split_at(NAME_LEN);

        // the name field must end in a NUL byte, whatever comes before it
        if name_field[NAME_LEN - 1] != 0 {
            return Err(PropertyParseError::UnterminatedName);
        }
        let name = CStr::from_bytes_until_nul(name_field)
            .map_err(|_| PropertyParseError::UnterminatedName)?;
        let raw_size = u32::from_le_bytes(
            size_field
                .try_into()
                .map_err(|_| PropertyParseError::HeaderTooSmall)?,
        );

        Ok(Self { name, raw_size })
    }
}

/// A single property inside a node
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct NodeProperty<'buf> {
    /// Depth of the owning node plus one
    pub depth: u32,
    /// Offset of the property header inside the walked buffer
    pub offset: usize,
    pub name: &'buf CStr,
    /// Value of the property without padding
    pub value: &'buf [u8],
    /// Whether [`REPLACEMENT_FLAG`] was set in the size field
    pub replacement_flag: bool,
}

impl<'buf> NodeProperty<'buf> {
    /// Parse a property (header, value and padding) at the cursor position
    pub(crate) fn read(
        cursor: &mut Cursor<'buf>,
        depth: u32,
    ) -> Result<Self, PropertyParseError> {
        let offset = cursor.pos();
        let header = PropertyHeader::read(cursor)?;
        let value = cursor
            .take_padded(header.size())
            .ok_or(PropertyParseError::ValueTooLarge {
                size: header.size(),
            })?;

        Ok(Self {
            depth,
            offset,
            name: header.name,
            value,
            replacement_flag: header.replacement_flag(),
        })
    }
}
