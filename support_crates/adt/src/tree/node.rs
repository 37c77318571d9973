//! Handling of node headers

use crate::tree::buf_tools::Cursor;
use core::mem;

/// The fixed size header at the start of every node
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
#[repr(C)]
pub struct NodeHeader {
    /// How many properties directly follow the header
    pub property_count: u32,
    /// How many child nodes follow the last property
    pub child_count: u32,
}

impl NodeHeader {
    /// Size of the header in its encoded form
    pub const SIZE: usize = mem::size_of::<NodeHeader>();

    /// Parse a header from the start of `buf`
    pub fn from_buffer(buf: &[u8]) -> Option<Self> {
        Self::read(&mut Cursor::new(buf))
    }

    pub(crate) fn read(cursor: &mut Cursor<'_>) -> Option<Self> {
        let mut header = Cursor::new(cursor.take(Self::SIZE)?);
        Some(Self {
            property_count: header.read_u32_le()?,
            child_count: header.read_u32_le()?,
        })
    }
}

/// A node as it is encountered while walking a device tree.
///
/// The node's own byte extent is not known when it is reported because its properties have not
/// been decoded yet. `bytes` therefore starts at the node header and reaches until the end of the
/// walked buffer, which is exactly what [`scan_node_properties()`](super::scan_node_properties)
/// needs.
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Node<'buf> {
    /// Distance from the root node (which has depth 0)
    pub depth: u32,
    /// Offset of the node header inside the walked buffer
    pub offset: usize,
    /// The walked buffer starting at the node header
    pub bytes: &'buf [u8],
    pub property_count: u32,
    pub child_count: u32,
}
