//! Ways requests reach the dispatcher.
//!
//! Every transport hands the server loop one [`Envelope`] at a time, so the
//! filesystem is only ever touched from the thread running [`serve`].
//!
//! [`serve`]: crate::serve

use std::{
    io::{self, BufReader},
    os::unix::net::{UnixListener, UnixStream},
    path::{Path, PathBuf},
    sync::mpsc::{self, Receiver, Sender},
    thread,
};

use io_error::IOError;
use log::{debug, error, info, warn};
use yfs_protocol::{Call, Reply, Request, read_message, write_message};

/// A request together with the way back to its sender.
pub struct Envelope {
    pub request: Request,
    reply_to: Sender<Reply>,
}

impl Envelope {
    pub fn new(request: Request) -> (Self, Receiver<Reply>) {
        let (reply_to, reply) = mpsc::channel();
        (Self { request, reply_to }, reply)
    }

    pub fn reply(self, reply: Reply) {
        if self.reply_to.send(reply).is_err() {
            warn!("Client left before its {:?} reply", self.request.kind());
        }
    }
}

pub trait Transport {
    /// Blocks until the next request. `None` means no request can arrive
    /// anymore.
    fn receive(&mut self) -> Option<Envelope>;
}

/// An in-process transport; see [`channel`].
pub struct ChannelTransport {
    requests: Receiver<Envelope>,
}

/// The client end of a [`ChannelTransport`].
#[derive(Clone)]
pub struct ChannelClient {
    requests: Sender<Envelope>,
}

pub fn channel() -> (ChannelTransport, ChannelClient) {
    let (tx, rx) = mpsc::channel();
    (
        ChannelTransport { requests: rx },
        ChannelClient { requests: tx },
    )
}

impl Transport for ChannelTransport {
    fn receive(&mut self) -> Option<Envelope> {
        self.requests.recv().ok()
    }
}

impl Call for ChannelClient {
    fn call(&mut self, request: Request) -> Result<Reply, IOError> {
        let (envelope, reply) = Envelope::new(request);
        self.requests
            .send(envelope)
            .map_err(|_| IOError::Protocol)?;
        reply.recv().map_err(|_| IOError::Protocol)
    }
}

/// Serves clients connecting to a Unix socket. Each connection is read on
/// its own thread and every request is forwarded into one queue.
pub struct UnixTransport {
    path: PathBuf,
    requests: Receiver<Envelope>,
}

impl UnixTransport {
    pub fn bind(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let listener = UnixListener::bind(&path)?;
        let (tx, rx) = mpsc::channel();
        info!("Listening on {}", path.display());

        thread::Builder::new()
            .name("yfs-accept".into())
            .spawn(move || accept_loop(&listener, &tx))?;

        Ok(Self { path, requests: rx })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Transport for UnixTransport {
    fn receive(&mut self) -> Option<Envelope> {
        self.requests.recv().ok()
    }
}

impl Drop for UnixTransport {
    fn drop(&mut self) {
        if let Err(e) = std::fs::remove_file(&self.path) {
            warn!("Could not remove {}: {e}", self.path.display());
        }
    }
}

fn accept_loop(listener: &UnixListener, requests: &Sender<Envelope>) {
    for (id, stream) in listener.incoming().enumerate() {
        let stream = match stream {
            Ok(stream) => stream,
            Err(e) => {
                error!("Accept failed: {e}");
                continue;
            }
        };

        let requests = requests.clone();
        let spawned = thread::Builder::new()
            .name(format!("yfs-client-{id}"))
            .spawn(move || {
                debug!("Client {id} connected");
                if let Err(e) = connection(stream, &requests) {
                    warn!("Client {id}: {e}");
                }
                debug!("Client {id} disconnected");
            });
        if let Err(e) = spawned {
            error!("Could not start a thread for client {id}: {e}");
        }
    }
}

fn connection(stream: UnixStream, requests: &Sender<Envelope>) -> io::Result<()> {
    let mut reader = BufReader::new(stream.try_clone()?);
    let mut writer = stream;

    loop {
        let request = match read_message::<_, Request>(&mut reader) {
            Ok(Some(request)) => request,
            Ok(None) => return Ok(()),
            Err(e) if e.kind() == io::ErrorKind::InvalidData => {
                warn!("Malformed request: {e}");
                write_message(&mut writer, &Reply::error(IOError::Protocol))?;
                continue;
            }
            Err(e) => return Err(e),
        };

        let (envelope, reply) = Envelope::new(request);
        if requests.send(envelope).is_err() {
            // the server loop is gone
            return Ok(());
        }
        match reply.recv() {
            Ok(reply) => write_message(&mut writer, &reply)?,
            Err(_) => return Ok(()),
        }
    }
}
