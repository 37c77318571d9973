//! Read-only access to the device tree image

use crate::error::CliError;
use memmap2::Mmap;
use std::fs::File;
use std::ops::Deref;
use std::path::Path;

/// The bytes of an input file, kept alive for as long as the tree is printed
pub enum Input {
    /// Zero-length files cannot be mapped
    Empty,
    Mapped(Mmap),
}

impl Input {
    /// Open `path` and map it into memory
    pub fn open(path: &Path) -> Result<Self, CliError> {
        let file = File::open(path).map_err(|error| CliError::Open {
            path: path.display().to_string(),
            error,
        })?;
        let len = file
            .metadata()
            .map_err(|error| CliError::Open {
                path: path.display().to_string(),
                error,
            })?
            .len();
        if len == 0 {
            return Ok(Input::Empty);
        }

        // SAFETY: the mapping is private and read-only. Another process may still modify the
        // file underneath it, which only changes the bytes the decoder sees since every read is
        // bounds-checked against the mapping length.
        let mmap = unsafe { Mmap::map(&file) }.map_err(|error| CliError::Map {
            path: path.display().to_string(),
            error,
        })?;
        Ok(Input::Mapped(mmap))
    }
}

impl Deref for Input {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        match self {
            Input::Empty => &[],
            Input::Mapped(mmap) => mmap,
        }
    }
}
