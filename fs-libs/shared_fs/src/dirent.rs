use core::ffi::CStr;

use alloc::{borrow::Cow, string::String};
use io_error::IOError;

use crate::{DIRENTRY_SIZE, DIRNAMELEN};

/// A fixed-size directory entry: `inum: i16` followed by a NUL padded name.
///
/// An entry whose `inum` is 0 is a free slot that may be reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DirEntry {
    pub inum: u16,
    name: [u8; DIRNAMELEN],
}

impl DirEntry {
    pub const EMPTY: Self = Self {
        inum: 0,
        name: [0; DIRNAMELEN],
    };

    /// Builds a live entry. The name must be non-empty, at most
    /// [`DIRNAMELEN`] bytes, and contain neither `/` nor NUL.
    pub fn new(inum: u16, name: &str) -> Result<Self, IOError> {
        let bytes = name.as_bytes();
        if bytes.is_empty() || bytes.len() > DIRNAMELEN || bytes.iter().any(|&b| b == b'/' || b == 0)
        {
            return Err(IOError::InvalidArgument);
        }

        let mut entry = Self::EMPTY;
        entry.inum = inum;
        entry.name[..bytes.len()].copy_from_slice(bytes);
        Ok(entry)
    }

    pub fn decode(bytes: &[u8]) -> Self {
        let mut name = [0; DIRNAMELEN];
        name.copy_from_slice(&bytes[2..DIRENTRY_SIZE]);
        Self {
            inum: u16::from_le_bytes([bytes[0], bytes[1]]),
            name,
        }
    }

    pub fn encode(&self, out: &mut [u8]) {
        out[0..2].copy_from_slice(&self.inum.to_le_bytes());
        out[2..DIRENTRY_SIZE].copy_from_slice(&self.name);
    }

    pub const fn is_free(&self) -> bool {
        self.inum == 0
    }

    /// Returns the stored name, stopping at the first NUL. A name that fills
    /// the whole field has no terminator and is used in full.
    pub fn name(&self) -> Cow<'_, str> {
        CStr::from_bytes_until_nul(&self.name).map_or_else(
            |_| String::from_utf8_lossy(&self.name),
            |cstr| cstr.to_string_lossy(),
        )
    }

    /// Compares the stored name against the first component of `path`.
    ///
    /// The component ends at the first `/`, NUL or the end of the slice; it
    /// matches when every byte agrees up to that point and the stored name is
    /// terminated there too. Only the first [`DIRNAMELEN`] bytes are compared.
    pub fn matches(&self, path: &[u8]) -> bool {
        for (i, &stored) in self.name.iter().enumerate() {
            let wanted = path.get(i).copied().unwrap_or(0);
            if (wanted == b'/' || wanted == 0) && stored == 0 {
                return true;
            }
            if wanted != stored {
                return false;
            }
        }
        true
    }
}
