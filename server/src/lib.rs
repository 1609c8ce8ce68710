//! The YFS server: a request loop in front of one [`yfs::Filesystem`].

use io_error::IOError;
use log::{error, info};
use yfs::BlockDevice;

pub mod dispatch;
pub mod logger;
pub mod transport;

pub use dispatch::Dispatcher;
pub use transport::{ChannelClient, ChannelTransport, Envelope, Transport, UnixTransport, channel};

/// Serves requests one at a time until a shutdown request, a fatal error or
/// the end of the transport.
///
/// Each request runs to completion and is replied to before the next one is
/// received. Losing the transport before a shutdown is an error.
pub fn serve<D: BlockDevice, T: Transport>(
    dispatcher: &mut Dispatcher<D>,
    transport: &mut T,
) -> Result<(), IOError> {
    info!("Serving requests");
    while let Some(envelope) = transport.receive() {
        let reply = dispatcher.dispatch(&envelope.request);
        envelope.reply(reply);

        if let Some(err) = dispatcher.fatal() {
            return Err(err);
        }
        if dispatcher.is_shut_down() {
            info!("Server stopped");
            return Ok(());
        }
    }

    error!("Request transport closed");
    Err(IOError::Protocol)
}
