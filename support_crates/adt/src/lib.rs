//! Library for decoding Apple device tree images (as handed to XNU by iBoot) and rendering them as
//! human readable text.
//!
//! Unlike the [flattened device tree](https://devicetree-specification.readthedocs.io/en/latest/chapter5-flattened-format.html)
//! format, these images carry no strings block and no type information. Every property is just a
//! name and a blob of bytes, so the [`display`] module guesses how each value is best rendered.
#![no_std]

extern crate alloc;

pub mod display;
pub mod tree;
