use std::ops::{Index, IndexMut};

use io_error::IOError;
use log::{debug, error, warn};
use yfs::{BlockDevice, Filesystem};
use yfs_protocol::{MessageKind, Reply, Request};

mod chdir;
mod create;
mod link;
mod mkdir;
mod open;
mod read;
mod readlink;
mod rmdir;
mod seek;
mod shutdown;
mod stat;
mod symlink;
mod sync;
mod unlink;
mod write;

type Handler<D> = fn(&mut Filesystem<D>, &Request) -> Reply;

struct Handlers<D>([Handler<D>; MessageKind::MAX_PRIMITIVE + 1]);

impl<D> Index<MessageKind> for Handlers<D> {
    type Output = Handler<D>;

    fn index(&self, index: MessageKind) -> &Self::Output {
        &self.0[usize::from(index)]
    }
}

impl<D> IndexMut<MessageKind> for Handlers<D> {
    fn index_mut(&mut self, index: MessageKind) -> &mut Self::Output {
        &mut self.0[usize::from(index)]
    }
}

impl<D: BlockDevice> Handlers<D> {
    fn new() -> Self {
        let mut handlers = Self([unexpected::<D>; MessageKind::MAX_PRIMITIVE + 1]);

        handlers[MessageKind::OPEN] = open::open;
        handlers[MessageKind::CREATE] = create::create;
        handlers[MessageKind::READ] = read::read;
        handlers[MessageKind::WRITE] = write::write;
        handlers[MessageKind::SEEK] = seek::seek;
        handlers[MessageKind::LINK] = link::link;
        handlers[MessageKind::UNLINK] = unlink::unlink;
        handlers[MessageKind::SYMLINK] = symlink::symlink;
        handlers[MessageKind::READLINK] = readlink::readlink;
        handlers[MessageKind::MKDIR] = mkdir::mkdir;
        handlers[MessageKind::RMDIR] = rmdir::rmdir;
        handlers[MessageKind::CHDIR] = chdir::chdir;
        handlers[MessageKind::STAT] = stat::stat;
        handlers[MessageKind::SYNC] = sync::sync;
        handlers[MessageKind::SHUTDOWN] = shutdown::shutdown;

        handlers
    }
}

fn unexpected<D>(_: &mut Filesystem<D>, request: &Request) -> Reply {
    warn!("No handler for {:?}", request.kind());
    Reply::error(IOError::Protocol)
}

/// Converts a wire offset or length, which must not be negative.
fn unsigned(value: i64) -> Result<u64, IOError> {
    u64::try_from(value).map_err(|_| IOError::InvalidArgument)
}

/// Owns the filesystem and routes each request to its handler.
pub struct Dispatcher<D> {
    fs: Filesystem<D>,
    handlers: Handlers<D>,
    fatal: Option<IOError>,
    shut_down: bool,
}

impl<D: BlockDevice> Dispatcher<D> {
    pub fn new(fs: Filesystem<D>) -> Self {
        Self {
            fs,
            handlers: Handlers::new(),
            fatal: None,
            shut_down: false,
        }
    }

    pub fn dispatch(&mut self, request: &Request) -> Reply {
        let kind = request.kind();
        debug!("Request: {kind:?}");
        let reply = self.handlers[kind](&mut self.fs, request);

        match IOError::from_result_code(reply.result) {
            Some(err) if err.is_fatal() => {
                error!("{kind:?} failed with {err}; no further requests will be served");
                self.fatal = Some(err);
            }
            Some(err) => warn!("{kind:?} rejected: {err}"),
            None => {}
        }
        if kind == MessageKind::SHUTDOWN {
            self.shut_down = true;
        }
        reply
    }

    /// The error that made the server unusable, if any.
    pub const fn fatal(&self) -> Option<IOError> {
        self.fatal
    }

    pub const fn is_shut_down(&self) -> bool {
        self.shut_down
    }

    pub const fn filesystem(&self) -> &Filesystem<D> {
        &self.fs
    }

    pub fn filesystem_mut(&mut self) -> &mut Filesystem<D> {
        &mut self.fs
    }

    pub fn into_filesystem(self) -> Filesystem<D> {
        self.fs
    }
}
