//! Messages exchanged between YFS clients and the server.
//!
//! Every request carries the paths and buffers it needs by value, so the
//! server never reaches into client memory. Replies reuse the result slot
//! convention: a non-negative `result` is success, a negative one is an
//! [`IOError`] code.

use io_error::{IOError, enum_with_max};
use num_enum::{IntoPrimitive, TryFromPrimitive};
use serde::{Deserialize, Serialize};
pub use shared_fs::{Stat, Whence};

pub mod codec;

pub use codec::{Connection, MAX_FRAME, read_message, write_message};

enum_with_max! {
    #[derive(IntoPrimitive, TryFromPrimitive, Debug, Clone, Copy, PartialEq, Eq)]
    #[allow(non_camel_case_types)]
    pub enum MessageKind : usize {
        OPEN = 0,
        CREATE,
        READ,
        WRITE,
        SEEK,
        LINK,
        UNLINK,
        SYMLINK,
        READLINK,
        MKDIR,
        RMDIR,
        CHDIR,
        STAT,
        SYNC,
        SHUTDOWN,
    }
}

/// A client request. Path operations carry the client's current directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "op")]
pub enum Request {
    Open { cwd: u32, path: String },
    Create { cwd: u32, path: String },
    Read { inode: u32, offset: i64, len: i64 },
    Write { inode: u32, offset: i64, data: Vec<u8> },
    Seek { inode: u32, position: i64, offset: i64, whence: Whence },
    Link { cwd: u32, old: String, new: String },
    Unlink { cwd: u32, path: String },
    SymLink { cwd: u32, target: String, path: String },
    ReadLink { cwd: u32, path: String, len: i64 },
    MkDir { cwd: u32, path: String },
    RmDir { cwd: u32, path: String },
    ChDir { cwd: u32, path: String },
    Stat { cwd: u32, path: String },
    Sync,
    Shutdown,
}

impl Request {
    pub const fn kind(&self) -> MessageKind {
        match self {
            Self::Open { .. } => MessageKind::OPEN,
            Self::Create { .. } => MessageKind::CREATE,
            Self::Read { .. } => MessageKind::READ,
            Self::Write { .. } => MessageKind::WRITE,
            Self::Seek { .. } => MessageKind::SEEK,
            Self::Link { .. } => MessageKind::LINK,
            Self::Unlink { .. } => MessageKind::UNLINK,
            Self::SymLink { .. } => MessageKind::SYMLINK,
            Self::ReadLink { .. } => MessageKind::READLINK,
            Self::MkDir { .. } => MessageKind::MKDIR,
            Self::RmDir { .. } => MessageKind::RMDIR,
            Self::ChDir { .. } => MessageKind::CHDIR,
            Self::Stat { .. } => MessageKind::STAT,
            Self::Sync => MessageKind::SYNC,
            Self::Shutdown => MessageKind::SHUTDOWN,
        }
    }
}

/// Data copied back to the client alongside the result code.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    #[default]
    None,
    Bytes(Vec<u8>),
    Stat(Stat),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reply {
    pub result: i64,
    #[serde(default)]
    pub payload: Payload,
}

impl Reply {
    pub const fn ok(result: i64) -> Self {
        Self {
            result,
            payload: Payload::None,
        }
    }

    pub fn error(error: IOError) -> Self {
        Self::ok(error.to_result_code())
    }

    /// A reply carrying `bytes`; the result is their length.
    pub fn bytes(bytes: Vec<u8>) -> Self {
        Self {
            result: bytes.len() as i64,
            payload: Payload::Bytes(bytes),
        }
    }

    pub const fn stat(stat: Stat) -> Self {
        Self {
            result: 0,
            payload: Payload::Stat(stat),
        }
    }

    /// Splits the reply into its payload, or the error it encodes.
    pub fn into_result(self) -> Result<(i64, Payload), IOError> {
        match IOError::from_result_code(self.result) {
            Some(err) => Err(err),
            None if self.result < 0 => Err(IOError::Protocol),
            None => Ok((self.result, self.payload)),
        }
    }
}

impl From<Result<Reply, IOError>> for Reply {
    fn from(value: Result<Reply, IOError>) -> Self {
        value.unwrap_or_else(Self::error)
    }
}

/// One synchronous request/reply exchange with the server.
pub trait Call {
    fn call(&mut self, request: Request) -> Result<Reply, IOError>;
}
