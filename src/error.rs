//! Error types for Trackmaster protocol operations.

use thiserror::Error;

/// Result type alias for Trackmaster operations.
pub type Result<T> = std::result::Result<T, TrackmasterError>;

/// Error types for Trackmaster treadmill communication.
#[derive(Error, Debug)]
pub enum TrackmasterError {
    /// Serial port communication error
    #[error("Serial port error: {0}")]
    SerialPort(#[from] serialport::Error),

    /// General I/O error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Device rejected a numeric payload as outside its accepted bounds
    #[error("Input command data out of range")]
    OutOfRange,

    /// Device did not recognize the command code
    #[error("Illegal command or command not recognized")]
    UnrecognizedCommand,

    /// Acknowledgment bytes did not match the expected code
    #[error("Expected acknowledgment code {expected}, received {actual}")]
    ProtocolMismatch {
        /// Acknowledgment bytes the protocol requires
        expected: String,
        /// Bytes actually received from the device
        actual: String,
    },

    /// Status payload was not the expected ASCII-digit format
    #[error("Malformed status payload: {payload:?}")]
    MalformedPayload {
        /// Raw payload bytes as received
        payload: Vec<u8>,
    },

    /// Transport did not deliver the expected byte count within the timeout
    #[error("Timed out: expected {expected} bytes, received {received}")]
    Timeout {
        /// Number of bytes the protocol requires
        expected: usize,
        /// Number of bytes actually received
        received: usize,
    },
}
