//! Newline-delimited JSON framing.

use std::io::{self, BufRead, BufReader, Read, Write};

use io_error::IOError;
use log::warn;
use serde::{Serialize, de::DeserializeOwned};
use shared_fs::{BLOCKSIZE, MAX_FILE_BLOCKS, MAXPATHNAMELEN};

use crate::{Call, Reply, Request};

/// Longest accepted line, newline included. Bytes are sent as JSON arrays
/// (at most 4 characters per byte) and a NUL-free path escapes to at most 6
/// characters per byte; the rest is field names and numbers.
pub const MAX_FRAME: u64 =
    (4 * MAX_FILE_BLOCKS * BLOCKSIZE + 2 * 6 * MAXPATHNAMELEN + 1024) as u64;

/// Writes `message` as one JSON line and flushes the writer.
pub fn write_message<W: Write, T: Serialize>(writer: &mut W, message: &T) -> io::Result<()> {
    serde_json::to_writer(&mut *writer, message)?;
    writer.write_all(b"\n")?;
    writer.flush()
}

/// Reads the next JSON line. Returns `Ok(None)` at end of stream.
///
/// A line longer than [`MAX_FRAME`] is skipped without being buffered and
/// reported as [`io::ErrorKind::InvalidData`]; the stream stays usable.
pub fn read_message<R: BufRead, T: DeserializeOwned>(reader: &mut R) -> io::Result<Option<T>> {
    let mut line = Vec::new();
    loop {
        line.clear();
        let read = reader
            .by_ref()
            .take(MAX_FRAME)
            .read_until(b'\n', &mut line)?;
        if read == 0 {
            return Ok(None);
        }
        if read as u64 == MAX_FRAME && line.last() != Some(&b'\n') {
            reader.skip_until(b'\n')?;
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("frame longer than {MAX_FRAME} bytes"),
            ));
        }
        if !line.trim_ascii().is_empty() {
            break;
        }
    }

    serde_json::from_slice(&line)
        .map(Some)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
}

/// A client connection over any byte stream.
pub struct Connection<R, W> {
    reader: BufReader<R>,
    writer: W,
}

impl<R: Read, W: Write> Connection<R, W> {
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            reader: BufReader::new(reader),
            writer,
        }
    }
}

impl<R: Read, W: Write> Call for Connection<R, W> {
    fn call(&mut self, request: Request) -> Result<Reply, IOError> {
        write_message(&mut self.writer, &request).map_err(|e| {
            warn!("Sending {:?} failed: {e}", request.kind());
            IOError::Protocol
        })?;

        match read_message(&mut self.reader) {
            Ok(Some(reply)) => Ok(reply),
            Ok(None) => {
                warn!("Server closed the connection");
                Err(IOError::Protocol)
            }
            Err(e) => {
                warn!("Bad reply: {e}");
                Err(IOError::Protocol)
            }
        }
    }
}
