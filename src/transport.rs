//! Serial transport behind a minimal capability trait.
//!
//! The protocol itself never touches a port directly; the controller drives
//! any [`Transport`], which lets the full command/response state machine run
//! against a scripted mock in tests.

use crate::constants::BAUD_RATE;
use crate::error::Result;
use log::debug;
use serialport::SerialPort;
use std::io::{Read, Write};
use std::time::Duration;

/// Byte-oriented half-duplex link to the treadmill.
pub trait Transport {
    /// Write a complete frame to the device.
    fn send(&mut self, frame: &[u8]) -> Result<()>;

    /// Read up to `buf.len()` bytes, blocking until they arrive or the
    /// configured timeout elapses. Returns the count actually read; fewer
    /// than requested means the timeout fired mid-read.
    fn receive(&mut self, buf: &mut [u8]) -> Result<usize>;
}

/// [`Transport`] over a real serial port at the treadmill's fixed 4800 baud.
pub struct SerialTransport {
    port: Box<dyn SerialPort>,
}

impl SerialTransport {
    /// Open `port_name` at 4800 baud with the given read timeout.
    pub fn open(port_name: &str, timeout: Duration) -> Result<Self> {
        let port = serialport::new(port_name, BAUD_RATE)
            .timeout(timeout)
            .open()?;
        Ok(SerialTransport { port })
    }
}

impl Transport for SerialTransport {
    fn send(&mut self, frame: &[u8]) -> Result<()> {
        // Stale bytes from an earlier timed-out exchange must not be
        // mistaken for this frame's acknowledgment.
        self.port.clear(serialport::ClearBuffer::Input)?;
        debug!("TX {:02X?}", frame);
        self.port.write_all(frame)?;
        Ok(())
    }

    fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
        let mut filled = 0;
        while filled < buf.len() {
            match self.port.read(&mut buf[filled..]) {
                Ok(0) => break,
                Ok(n) => filled += n,
                Err(e) if e.kind() == std::io::ErrorKind::TimedOut => break,
                Err(e) => return Err(e.into()),
            }
        }
        debug!("RX {:02X?}", &buf[..filled]);
        Ok(filled)
    }
}
