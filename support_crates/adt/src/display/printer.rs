//! Printing a whole device tree as indented text

use crate::display::render::render_property;
use crate::display::strbuf::{BoundedBuf, Width};
use crate::tree::values::c_str_len;
use crate::tree::{find_property, Node, NodeProperty, Visitor, WalkError, Walker};
use alloc::borrow::Cow;
use alloc::string::String;
use core::fmt;
use core::ops::ControlFlow;
use thiserror_no_std::Error;

/// Displayed for nodes whose name cannot be determined
const UNNAMED_NODE: &str = "NODE";

/// Marker appended to values that did not fit into the output width
const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub enum IndentStyle {
    /// Four spaces per level
    #[default]
    Spaces,
    /// ASCII tree lines
    Tree,
}

/// Settings that influence how a tree is printed
#[derive(Debug, Eq, PartialEq, Copy, Clone, Default)]
pub struct DisplayOptions {
    /// Maximum length of a rendered property value
    pub width: Width,
    pub indent: IndentStyle,
}

#[derive(Debug, Error, Eq, PartialEq, Copy, Clone)]
pub enum PrintError {
    #[error("Could not decode the device tree: {0}")]
    Decode(#[from] WalkError),
    #[error("The device tree ends at offset {consumed:#x} but the input is {size:#x} bytes long")]
    TrailingBytes { consumed: usize, size: usize },
    #[error("Could not write the output")]
    Write,
}

fn write_indent<W: fmt::Write + ?Sized>(out: &mut W, style: IndentStyle, depth: u32) -> fmt::Result {
    match style {
        IndentStyle::Spaces => {
            for _ in 0..depth {
                out.write_str("    ")?;
            }
        }
        IndentStyle::Tree => {
            if depth > 0 {
                for _ in 0..depth - 1 {
                    out.write_str("|   ")?;
                }
                out.write_str("|-- ")?;
            }
        }
    }
    Ok(())
}

/// The value of the `name` property of a node, if it can be found
fn node_name<'buf>(node: &Node<'buf>) -> Option<Cow<'buf, str>> {
    match find_property(node.bytes, c"name") {
        Ok(Some(property)) => {
            let value = property.value;
            Some(String::from_utf8_lossy(&value[..c_str_len(value)]))
        }
        Ok(None) => None,
        Err(e) => {
            log::debug!("could not scan node at {:#x} for its name: {}", node.offset, e);
            None
        }
    }
}

/// A [`Visitor`] that prints every node and property it sees into `out`
pub struct TreePrinter<'o, W: fmt::Write + ?Sized> {
    out: &'o mut W,
    options: DisplayOptions,
    value_buf: BoundedBuf,
    write_failed: bool,
}

impl<'o, W: fmt::Write + ?Sized> TreePrinter<'o, W> {
    pub fn new(out: &'o mut W, options: DisplayOptions) -> Self {
        Self {
            out,
            options,
            value_buf: BoundedBuf::new(options.width),
            write_failed: false,
        }
    }

    /// Whether writing to the output failed, which ends the walk early
    pub fn write_failed(&self) -> bool {
        self.write_failed
    }

    fn print_node(&mut self, node: &Node<'_>) -> fmt::Result {
        let name = node_name(node).unwrap_or(Cow::Borrowed(UNNAMED_NODE));
        write_indent(self.out, self.options.indent, node.depth)?;
        writeln!(self.out, "{}:", name)
    }

    fn print_property(&mut self, property: &NodeProperty<'_>) -> fmt::Result {
        let size = property.value.len();
        write_indent(self.out, self.options.indent, property.depth)?;
        write!(self.out, "{} ({})", property.name.to_string_lossy(), size)?;
        if size > 0 {
            self.value_buf.reset();
            let complete = render_property(
                &mut self.value_buf,
                property.name.to_bytes(),
                property.value,
            );
            write!(
                self.out,
                ": {}{}",
                self.value_buf.as_str(),
                if complete { "" } else { TRUNCATION_MARKER }
            )?;
        }
        writeln!(self.out)
    }

    fn flow(&mut self, result: fmt::Result) -> ControlFlow<()> {
        match result {
            Ok(()) => ControlFlow::Continue(()),
            Err(_) => {
                self.write_failed = true;
                ControlFlow::Break(())
            }
        }
    }
}

impl<'buf, 'o, W: fmt::Write + ?Sized> Visitor<'buf> for TreePrinter<'o, W> {
    fn on_node(&mut self, node: &Node<'buf>) -> ControlFlow<()> {
        let result = self.print_node(node);
        self.flow(result)
    }

    fn on_property(&mut self, property: &NodeProperty<'buf>) -> ControlFlow<()> {
        let result = self.print_property(property);
        self.flow(result)
    }
}

/// Print the device tree in `buf` into `out`.
///
/// Fails if the tree cannot be decoded or if it does not span the whole buffer.
pub fn print_tree<W: fmt::Write + ?Sized>(
    buf: &[u8],
    options: &DisplayOptions,
    out: &mut W,
) -> Result<(), PrintError> {
    let mut printer = TreePrinter::new(out, *options);
    let walk = Walker::default().walk(buf, &mut printer)?;
    if printer.write_failed() {
        return Err(PrintError::Write);
    }
    if walk.consumed != buf.len() {
        return Err(PrintError::TrailingBytes {
            consumed: walk.consumed,
            size: buf.len(),
        });
    }
    Ok(())
}
