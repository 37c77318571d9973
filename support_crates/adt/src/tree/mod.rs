//! Decoding of the device tree image structure
//!
//! An image is a single node, the root, encoded as follows (all integers are little-endian):
//!
//! ```text
//! ┌──────────────────────────────────────┐
//! │ u32 property_count                   │ node header
//! │ u32 child_count                      │
//! ├──────────────────────────────────────┤
//! │ [u8; 32] name (NUL-terminated)       │ property header  ┐
//! │ u32 size (bit 31 is a flag)          │                  │
//! ├──────────────────────────────────────┤                  │ repeated
//! │ value (size bytes)                   │                  │ property_count
//! │ zero padding to a multiple of 4      │                  │ times
//! ├──────────────────────────────────────┤                  ┘
//! │ child nodes, encoded the same way    │ child_count times
//! └──────────────────────────────────────┘
//! ```
//!
//! There are no end markers or offsets, so the only way to find a node is to decode everything
//! that comes before it. The [`Walker`] does exactly that and reports what it finds to a
//! [`Visitor`].
//!
//! The padding of the very last property may be missing when the image ends right after its
//! value.

mod buf_tools;
pub(crate) mod node;
pub(crate) mod property;
pub mod values;
mod walk;

pub use node::{Node, NodeHeader};
pub use property::{NodeProperty, PropertyHeader, NAME_LEN, REPLACEMENT_FLAG};
pub use walk::{
    find_property, scan_node_properties, walk, Visitor, Walk, WalkError, Walker,
    DEFAULT_MAX_DEPTH,
};
