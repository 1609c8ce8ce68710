#![no_std]

extern crate alloc;

use core::{borrow::Borrow, ops::Deref};

use alloc::{borrow::ToOwned, boxed::Box};
use itertools::Itertools;
use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathError {
    Empty,
    ContainsNul,
}

/// A borrowed, already split path.
///
/// An absolute path starts with an empty component standing for the root,
/// so `/a/b` is `["", "a", "b"]` and `/` is `[""]`.
#[repr(transparent)]
#[derive(PartialEq, Eq, PartialOrd, Ord)]
pub struct Path {
    components: [Box<str>],
}

impl Path {
    fn from_slice(slice: &[Box<str>]) -> &Self {
        // SAFETY: `Path` is a transparent wrapper over the slice.
        unsafe { &*(slice as *const [Box<str>] as *const Self) }
    }

    pub fn is_absolute(&self) -> bool {
        !self.components.is_empty() && self.components[0].is_empty()
    }

    /// The same path without its root marker.
    pub fn strip_root(&self) -> &Self {
        if self.is_absolute() {
            Self::from_slice(&self.components[1..])
        } else {
            self
        }
    }

    /// Splits off the first component. The root marker is returned as `""`.
    pub fn split_first(&self) -> Option<(&str, &Self)> {
        let (first, rest) = self.components.split_first()?;
        Some((first.as_ref(), Self::from_slice(rest)))
    }

    /// Splits the path into its containing directory and final name.
    ///
    /// Returns `None` for paths without a final name (the root or an empty
    /// path). The parent of a single relative component is the empty path.
    pub fn split_last(&self) -> Option<(&Self, &str)> {
        let (last, parent) = self.components.split_last()?;
        if last.is_empty() {
            None
        } else {
            Some((Self::from_slice(parent), last.as_ref()))
        }
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.components.is_empty()
    }
}

impl ToOwned for Path {
    type Owned = PathBuf;

    fn to_owned(&self) -> Self::Owned {
        PathBuf {
            components: self.components.iter().cloned().collect(),
        }
    }
}

impl core::fmt::Display for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        if self.components.len() == 1 && self.components[0].as_ref() == "" {
            return write!(f, "/");
        }
        for c in Itertools::intersperse(self.components.iter().map(AsRef::as_ref), "/") {
            write!(f, "{c}")?;
        }
        Ok(())
    }
}

impl core::fmt::Debug for Path {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self, f)
    }
}

#[derive(Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct PathBuf {
    components: SmallVec<[Box<str>; 4]>,
}

impl PathBuf {
    pub const fn new() -> Self {
        Self {
            components: SmallVec::new_const(),
        }
    }

    pub fn root() -> Self {
        let mut path = Self::new();
        path.components.push("".into());
        path
    }

    /// Splits a slash separated path. Repeated slashes collapse and a
    /// trailing slash is dropped without a trace, so `/f/` names the same
    /// entry as `/f` whatever its type; creating `/f/` makes a regular file.
    pub fn parse(path: &str) -> Result<Self, PathError> {
        if path.is_empty() {
            return Err(PathError::Empty);
        }
        if path.contains('\0') {
            return Err(PathError::ContainsNul);
        }

        let mut buf = if path.starts_with('/') {
            Self::root()
        } else {
            Self::new()
        };
        buf.components
            .extend(path.split('/').filter(|c| !c.is_empty()).map(Box::from));
        Ok(buf)
    }

    pub fn as_path(&self) -> &Path {
        Path::from_slice(&self.components)
    }
}

impl Default for PathBuf {
    fn default() -> Self {
        Self::new()
    }
}

impl Deref for PathBuf {
    type Target = Path;

    fn deref(&self) -> &Self::Target {
        self.as_path()
    }
}

impl Borrow<Path> for PathBuf {
    fn borrow(&self) -> &Path {
        self
    }
}

impl core::fmt::Display for PathBuf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(self.as_path(), f)
    }
}

impl core::fmt::Debug for PathBuf {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Debug::fmt(self.as_path(), f)
    }
}
