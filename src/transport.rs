//! Byte transport the chat engine drives.

use std::io::{Read, Write};
use std::time::Duration;

use crate::error::TransportError;

/// Result of one bounded read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReadOutcome {
    /// Bytes arrived.
    Data(Vec<u8>),
    /// The stream ended or the read timed out with nothing available.
    EndOfStream,
}

/// Capability the chat engine needs from the modem connection.
///
/// The engine owns the transport exclusively; nothing else may touch it
/// while a chat run is active.
///
/// Contract: one `read_chunk` call is assumed to return one complete
/// logical modem response. An implementation over a transport that can
/// fragment responses across reads must buffer and rescan internally
/// before surfacing `Data`; the engine compares whole chunks against
/// expected strings and prefixes.
pub trait ModemTransport: Send {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError>;

    /// One read, bounded by the transport's configured timeout.
    fn read_chunk(&mut self) -> Result<ReadOutcome, TransportError>;
}

/// Serial-port transport over a GSM modem device node.
pub struct SerialTransport {
    port: Box<dyn serialport::SerialPort>,
}

impl SerialTransport {
    pub fn open(device: &str, baud: u32, timeout: Duration) -> Result<Self, TransportError> {
        let port = serialport::new(device, baud)
            .timeout(timeout)
            .open()
            .map_err(|source| TransportError::Open {
                device: device.to_string(),
                source,
            })?;
        Ok(Self { port })
    }
}

impl ModemTransport for SerialTransport {
    fn write_all(&mut self, data: &[u8]) -> Result<(), TransportError> {
        self.port.write_all(data)?;
        Ok(())
    }

    fn read_chunk(&mut self) -> Result<ReadOutcome, TransportError> {
        let mut buf = [0u8; 4096];
        match self.port.read(&mut buf) {
            Ok(0) => Ok(ReadOutcome::EndOfStream),
            Ok(n) => Ok(ReadOutcome::Data(buf[..n].to_vec())),
            // A timed-out read carries no data; the engine treats it
            // the same as end-of-stream and retries after a pause.
            Err(e) if e.kind() == std::io::ErrorKind::TimedOut => Ok(ReadOutcome::EndOfStream),
            Err(e) => Err(TransportError::Io(e)),
        }
    }
}
