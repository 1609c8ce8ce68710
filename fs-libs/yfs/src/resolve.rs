use io_error::{IOError, IOResult};
use log::{debug, trace};
use path::{Path, PathBuf};
use shared_fs::{InodeType, MAXPATHNAMELEN, MAXSYMLINKS, ROOTINODE};

use crate::{BlockDevice, Filesystem};

/// Whether a symbolic link in the last component is expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Follow {
    Final,
    NoFinal,
}

/// Symbolic link expansions left for one resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SymlinkBudget(usize);

impl SymlinkBudget {
    pub const fn new() -> Self {
        Self(MAXSYMLINKS)
    }

    pub const fn remaining(&self) -> usize {
        self.0
    }

    fn spend(&mut self) -> IOResult<()> {
        self.0 = self.0.checked_sub(1).ok_or(IOError::SymlinkLoop)?;
        Ok(())
    }
}

impl Default for SymlinkBudget {
    fn default() -> Self {
        Self::new()
    }
}

/// Validates and splits a client supplied path.
pub fn parse_path(path: &str) -> IOResult<PathBuf> {
    if path.len() >= MAXPATHNAMELEN {
        return Err(IOError::InvalidArgument);
    }
    PathBuf::parse(path).map_err(|_| IOError::InvalidArgument)
}

impl<D: BlockDevice> Filesystem<D> {
    /// Resolves `path` to an inode number, starting at `cwd` for relative
    /// paths.
    pub fn resolve(&mut self, path: &Path, cwd: u32, follow: Follow) -> IOResult<u32> {
        self.resolve_with(path, cwd, follow, &mut SymlinkBudget::new())
    }

    pub fn resolve_with(
        &mut self,
        path: &Path,
        cwd: u32,
        follow: Follow,
        budget: &mut SymlinkBudget,
    ) -> IOResult<u32> {
        let start = if path.is_absolute() { ROOTINODE } else { cwd };
        self.walk(path.strip_root(), start, follow, budget)
    }

    fn walk(
        &mut self,
        path: &Path,
        dir: u32,
        follow: Follow,
        budget: &mut SymlinkBudget,
    ) -> IOResult<u32> {
        let Some((name, rest)) = path.split_first() else {
            return Ok(dir);
        };

        let slot = self.find_entry(dir, name, false)?.ok_or(IOError::NotFound)?;
        let mut inum = u32::from(slot.entry.inum);
        let inode = self.live_inode(inum)?;
        trace!("{name} -> {inum} ({:?})", inode.kind);

        if inode.kind == InodeType::Symlink && (!rest.is_empty() || follow == Follow::Final) {
            budget.spend()?;
            let target = self.symlink_target(inum)?;
            debug!("Following {name} -> {target} ({} expansions left)", budget.remaining());
            inum = self.resolve_with(&target, dir, Follow::Final, budget)?;
        }

        self.walk(rest, inum, follow, budget)
    }

    pub(crate) fn symlink_target(&mut self, inum: u32) -> IOResult<PathBuf> {
        let inode = self.live_inode(inum)?;
        let data = self.read(inum, 0, inode.size as usize)?;
        let target = core::str::from_utf8(&data).map_err(|_| IOError::Corrupted)?;
        PathBuf::parse(target).map_err(|_| IOError::Corrupted)
    }

    /// Splits `path` into the directory that holds its last component and the
    /// component itself.
    pub(crate) fn split_parent(&mut self, path: &str, cwd: u32) -> IOResult<(u32, String)> {
        let path = parse_path(path)?;
        let (parent, name) = path.split_last().ok_or(IOError::InvalidArgument)?;
        let dir = if parent.is_empty() && !path.is_absolute() {
            cwd
        } else {
            self.resolve(parent, cwd, Follow::Final)?
        };

        if self.live_inode(dir)?.kind != InodeType::Directory {
            return Err(IOError::NotADirectory);
        }
        Ok((dir, name.into()))
    }
}
