//! Human readable rendering of device trees
//!
//! [`classify()`] guesses the [`DisplayType`] of a property value, [`render()`] formats it into a
//! [`BoundedBuf`] and [`print_tree()`] does both for every property of a tree.

mod classify;
mod printer;
mod render;
mod strbuf;

pub use classify::{classify, DisplayType, StringStats};
pub use printer::{print_tree, DisplayOptions, IndentStyle, PrintError, TreePrinter};
pub use render::{render, render_property};
pub use strbuf::{Append, BoundedBuf, Width};
