//! Client side of YFS: file descriptors, the current directory and request
//! marshalling on top of any [`Call`] implementation.

use io_error::{IOError, IOResult};
use log::debug;
use shared_fs::{MAXPATHNAMELEN, ROOTINODE, Stat, Whence};
use yfs_protocol::{Call, Payload, Request};
use yfs_utils::simple_slotmap::SimpleSlotmap;

pub const MAX_OPEN_FILES: usize = 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OpenFile {
    pub inode: u32,
    pub position: u64,
}

pub struct Client<C> {
    conn: C,
    cwd: u32,
    files: SimpleSlotmap<OpenFile>,
}

fn check_path(path: &str) -> IOResult<()> {
    if path.is_empty() || path.len() >= MAXPATHNAMELEN || path.contains('\0') {
        Err(IOError::InvalidArgument)
    } else {
        Ok(())
    }
}

fn to_wire(value: u64) -> IOResult<i64> {
    i64::try_from(value).map_err(|_| IOError::InvalidArgument)
}

fn to_count(result: i64) -> IOResult<usize> {
    usize::try_from(result).map_err(|_| IOError::Protocol)
}

fn to_inum(result: i64) -> IOResult<u32> {
    u32::try_from(result).map_err(|_| IOError::Protocol)
}

impl<C: Call> Client<C> {
    pub fn new(conn: C) -> Self {
        Self {
            conn,
            cwd: ROOTINODE,
            files: SimpleSlotmap::with_limit(MAX_OPEN_FILES),
        }
    }

    /// Inode of the current directory.
    pub const fn cwd(&self) -> u32 {
        self.cwd
    }

    pub fn file(&self, fd: usize) -> Option<&OpenFile> {
        self.files.get(fd)
    }

    pub fn open_files(&self) -> usize {
        self.files.len()
    }

    fn request(&mut self, request: Request) -> IOResult<(i64, Payload)> {
        let kind = request.kind();
        let result = self.conn.call(request)?.into_result();
        debug!("{kind:?} -> {result:?}");
        result
    }

    fn open_fd(&mut self, inode: u32) -> IOResult<usize> {
        self.files
            .insert(OpenFile { inode, position: 0 })
            .map_err(|_| IOError::NoSpace)
    }

    fn descriptor(&self, fd: usize) -> IOResult<OpenFile> {
        self.files.get(fd).copied().ok_or(IOError::InvalidArgument)
    }

    fn ensure_free_fd(&self) -> IOResult<()> {
        if self.files.len() >= MAX_OPEN_FILES {
            Err(IOError::NoSpace)
        } else {
            Ok(())
        }
    }

    pub fn open(&mut self, path: &str) -> IOResult<usize> {
        check_path(path)?;
        self.ensure_free_fd()?;
        let (inode, _) = self.request(Request::Open {
            cwd: self.cwd,
            path: path.into(),
        })?;
        self.open_fd(to_inum(inode)?)
    }

    /// Creates (or truncates) a regular file and opens it.
    pub fn create(&mut self, path: &str) -> IOResult<usize> {
        check_path(path)?;
        self.ensure_free_fd()?;
        let (inode, _) = self.request(Request::Create {
            cwd: self.cwd,
            path: path.into(),
        })?;
        self.open_fd(to_inum(inode)?)
    }

    pub fn close(&mut self, fd: usize) -> IOResult<()> {
        self.files
            .remove(fd)
            .map(|_| ())
            .ok_or(IOError::InvalidArgument)
    }

    /// Reads at the descriptor's position and advances it by the number of
    /// bytes read.
    pub fn read(&mut self, fd: usize, buf: &mut [u8]) -> IOResult<usize> {
        let file = self.descriptor(fd)?;
        let (_, payload) = self.request(Request::Read {
            inode: file.inode,
            offset: to_wire(file.position)?,
            len: to_wire(buf.len() as u64)?,
        })?;

        let data = match payload {
            Payload::Bytes(data) if data.len() <= buf.len() => data,
            Payload::None => Vec::new(),
            _ => return Err(IOError::Protocol),
        };
        buf[..data.len()].copy_from_slice(&data);
        self.advance(fd, data.len());
        Ok(data.len())
    }

    pub fn write(&mut self, fd: usize, buf: &[u8]) -> IOResult<usize> {
        let file = self.descriptor(fd)?;
        let (written, _) = self.request(Request::Write {
            inode: file.inode,
            offset: to_wire(file.position)?,
            data: buf.to_vec(),
        })?;

        let written = to_count(written)?;
        self.advance(fd, written);
        Ok(written)
    }

    fn advance(&mut self, fd: usize, by: usize) {
        if let Some(file) = self.files.get_mut(fd) {
            file.position += by as u64;
        }
    }

    /// Moves the descriptor's position. The server checks the result lies
    /// within the file.
    pub fn seek(&mut self, fd: usize, offset: i64, whence: Whence) -> IOResult<u64> {
        let file = self.descriptor(fd)?;
        let (position, _) = self.request(Request::Seek {
            inode: file.inode,
            position: to_wire(file.position)?,
            offset,
            whence,
        })?;

        let position = u64::try_from(position).map_err(|_| IOError::Protocol)?;
        if let Some(file) = self.files.get_mut(fd) {
            file.position = position;
        }
        Ok(position)
    }

    pub fn link(&mut self, old: &str, new: &str) -> IOResult<()> {
        check_path(old)?;
        check_path(new)?;
        self.request(Request::Link {
            cwd: self.cwd,
            old: old.into(),
            new: new.into(),
        })
        .map(|_| ())
    }

    pub fn unlink(&mut self, path: &str) -> IOResult<()> {
        check_path(path)?;
        self.request(Request::Unlink {
            cwd: self.cwd,
            path: path.into(),
        })
        .map(|_| ())
    }

    pub fn symlink(&mut self, target: &str, path: &str) -> IOResult<()> {
        check_path(target)?;
        check_path(path)?;
        self.request(Request::SymLink {
            cwd: self.cwd,
            target: target.into(),
            path: path.into(),
        })
        .map(|_| ())
    }

    /// Copies at most `buf.len()` bytes of the link target into `buf`.
    pub fn read_link(&mut self, path: &str, buf: &mut [u8]) -> IOResult<usize> {
        check_path(path)?;
        let (_, payload) = self.request(Request::ReadLink {
            cwd: self.cwd,
            path: path.into(),
            len: to_wire(buf.len() as u64)?,
        })?;

        match payload {
            Payload::Bytes(target) if target.len() <= buf.len() => {
                buf[..target.len()].copy_from_slice(&target);
                Ok(target.len())
            }
            _ => Err(IOError::Protocol),
        }
    }

    pub fn mkdir(&mut self, path: &str) -> IOResult<()> {
        check_path(path)?;
        self.request(Request::MkDir {
            cwd: self.cwd,
            path: path.into(),
        })
        .map(|_| ())
    }

    pub fn rmdir(&mut self, path: &str) -> IOResult<()> {
        check_path(path)?;
        self.request(Request::RmDir {
            cwd: self.cwd,
            path: path.into(),
        })
        .map(|_| ())
    }

    pub fn chdir(&mut self, path: &str) -> IOResult<()> {
        check_path(path)?;
        let (inode, _) = self.request(Request::ChDir {
            cwd: self.cwd,
            path: path.into(),
        })?;
        self.cwd = to_inum(inode)?;
        Ok(())
    }

    pub fn stat(&mut self, path: &str) -> IOResult<Stat> {
        check_path(path)?;
        match self.request(Request::Stat {
            cwd: self.cwd,
            path: path.into(),
        })? {
            (_, Payload::Stat(stat)) => Ok(stat),
            _ => Err(IOError::Protocol),
        }
    }

    pub fn sync(&mut self) -> IOResult<()> {
        self.request(Request::Sync).map(|_| ())
    }

    /// Asks the server to flush everything and exit.
    pub fn shutdown(&mut self) -> IOResult<()> {
        self.request(Request::Shutdown).map(|_| ())
    }
}
