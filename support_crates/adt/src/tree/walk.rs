//! Depth-first traversal of a device tree buffer

use crate::tree::buf_tools::Cursor;
use crate::tree::node::{Node, NodeHeader};
use crate::tree::property::{NodeProperty, PropertyParseError};
use core::ffi::CStr;
use core::ops::ControlFlow;
use thiserror_no_std::Error;

/// Trees nested deeper than this are rejected by [`Walker::default()`]
pub const DEFAULT_MAX_DEPTH: u32 = 128;

/// The reasons for which a walk can fail.
///
/// Each variant carries the offset into the walked buffer at which the offending item starts.
#[derive(Debug, Error, Eq, PartialEq, Copy, Clone)]
pub enum WalkError {
    #[error("The node header at offset {0:#x} extends past the end of the buffer")]
    TruncatedNodeHeader(usize),
    #[error("The property header at offset {0:#x} extends past the end of the buffer")]
    TruncatedPropertyHeader(usize),
    #[error("The name of the property at offset {0:#x} is not NUL-terminated")]
    UnterminatedName(usize),
    #[error("The value of the property at offset {offset:#x} ({size} bytes) extends past the end of the buffer")]
    PropertyOverrun { offset: usize, size: usize },
    #[error("The node at offset {offset:#x} is nested deeper than the allowed {max_depth} levels")]
    TooDeep { offset: usize, max_depth: u32 },
}

/// Receives the events of a walk in depth-first order.
///
/// For every node, [`on_node()`](Visitor::on_node) is called first, then
/// [`on_property()`](Visitor::on_property) for each of its properties, then the same sequence for
/// each of its children and finally [`on_node_end()`](Visitor::on_node_end).
///
/// Returning [`ControlFlow::Break`] from any of them ends the walk immediately. That is not an
/// error; the walk still reports success.
pub trait Visitor<'buf> {
    fn on_node(&mut self, node: &Node<'buf>) -> ControlFlow<()>;

    fn on_property(&mut self, property: &NodeProperty<'buf>) -> ControlFlow<()>;

    /// Called after all properties and children of the node at `depth` have been visited
    fn on_node_end(&mut self, depth: u32) -> ControlFlow<()> {
        let _ = depth;
        ControlFlow::Continue(())
    }
}

/// Result of a successful walk
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Walk {
    /// Offset up to which the buffer was decoded
    pub consumed: usize,
    /// Whether a visitor ended the walk early
    pub stopped: bool,
}

/// Configuration for walking a device tree
#[derive(Debug, Eq, PartialEq, Copy, Clone)]
pub struct Walker {
    pub max_depth: u32,
}

impl Default for Walker {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

impl Walker {
    pub const fn with_max_depth(max_depth: u32) -> Self {
        Self { max_depth }
    }

    /// Walk the tree whose root node starts at the beginning of `buf`.
    ///
    /// On success, [`Walk::consumed`] tells how far the decoding got. For a well-formed image that
    /// is not stopped early this is exactly `buf.len()`.
    pub fn walk<'buf, V: Visitor<'buf> + ?Sized>(
        &self,
        buf: &'buf [u8],
        visitor: &mut V,
    ) -> Result<Walk, WalkError> {
        let mut cursor = Cursor::new(buf);
        let flow = self.walk_node(&mut cursor, 0, visitor).map_err(|e| {
            log::debug!("device tree walk failed: {}", e);
            e
        })?;
        Ok(Walk {
            consumed: cursor.pos(),
            stopped: flow.is_break(),
        })
    }

    fn walk_node<'buf, V: Visitor<'buf> + ?Sized>(
        &self,
        cursor: &mut Cursor<'buf>,
        depth: u32,
        visitor: &mut V,
    ) -> Result<ControlFlow<()>, WalkError> {
        let offset = cursor.pos();
        if depth > self.max_depth {
            return Err(WalkError::TooDeep {
                offset,
                max_depth: self.max_depth,
            });
        }

        let header =
            NodeHeader::read(cursor).ok_or(WalkError::TruncatedNodeHeader(offset))?;
        log::trace!(
            "node at {:#x}: depth={} properties={} children={}",
            offset,
            depth,
            header.property_count,
            header.child_count
        );

        let node = Node {
            depth,
            offset,
            bytes: cursor.tail_from(offset),
            property_count: header.property_count,
            child_count: header.child_count,
        };
        if visitor.on_node(&node).is_break() {
            return Ok(ControlFlow::Break(()));
        }

        for _ in 0..header.property_count {
            let prop_offset = cursor.pos();
            let property = NodeProperty::read(cursor, depth + 1).map_err(|e| match e {
                PropertyParseError::HeaderTooSmall => {
                    WalkError::TruncatedPropertyHeader(prop_offset)
                }
                PropertyParseError::UnterminatedName => WalkError::UnterminatedName(prop_offset),
                PropertyParseError::ValueTooLarge { size } => WalkError::PropertyOverrun {
                    offset: prop_offset,
                    size,
                },
            })?;
            log::trace!(
                "property at {:#x}: {:?} ({} bytes)",
                prop_offset,
                property.name,
                property.value.len()
            );
            if visitor.on_property(&property).is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        for _ in 0..header.child_count {
            if self.walk_node(cursor, depth + 1, visitor)?.is_break() {
                return Ok(ControlFlow::Break(()));
            }
        }

        Ok(visitor.on_node_end(depth))
    }
}

/// Walk the tree at the start of `buf` with the default configuration
pub fn walk<'buf, V: Visitor<'buf> + ?Sized>(
    buf: &'buf [u8],
    visitor: &mut V,
) -> Result<Walk, WalkError> {
    Walker::default().walk(buf, visitor)
}

/// Adapter that only forwards the properties of the node at depth 0
struct OwnProperties<'v, V: ?Sized> {
    inner: &'v mut V,
}

impl<'buf, 'v, V: Visitor<'buf> + ?Sized> Visitor<'buf> for OwnProperties<'v, V> {
    fn on_node(&mut self, node: &Node<'buf>) -> ControlFlow<()> {
        if node.depth != 0 {
            return ControlFlow::Break(());
        }
        ControlFlow::Continue(())
    }

    fn on_property(&mut self, property: &NodeProperty<'buf>) -> ControlFlow<()> {
        self.inner.on_property(property)
    }
}

/// Visit the properties of the node at the start of `node_bytes` without descending into its
/// children.
///
/// `node_bytes` is typically [`Node::bytes`]. The node callbacks of `visitor` are not invoked.
pub fn scan_node_properties<'buf, V: Visitor<'buf> + ?Sized>(
    node_bytes: &'buf [u8],
    visitor: &mut V,
) -> Result<Walk, WalkError> {
    Walker::default().walk(node_bytes, &mut OwnProperties { inner: visitor })
}

struct FindProperty<'buf, 'n> {
    name: &'n CStr,
    found: Option<NodeProperty<'buf>>,
}

impl<'buf, 'n> Visitor<'buf> for FindProperty<'buf, 'n> {
    fn on_node(&mut self, _node: &Node<'buf>) -> ControlFlow<()> {
        ControlFlow::Continue(())
    }

    fn on_property(&mut self, property: &NodeProperty<'buf>) -> ControlFlow<()> {
        // later duplicates replace earlier ones
        if property.name == self.name {
            self.found = Some(*property);
        }
        ControlFlow::Continue(())
    }
}

/// Look up the property called `name` of the node at the start of `node_bytes`.
///
/// If the node carries the name more than once, the last occurrence is returned.
pub fn find_property<'buf>(
    node_bytes: &'buf [u8],
    name: &CStr,
) -> Result<Option<NodeProperty<'buf>>, WalkError> {
    let mut finder = FindProperty { name, found: None };
    scan_node_properties(node_bytes, &mut finder)?;
    Ok(finder.found)
}
