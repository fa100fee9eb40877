//! Protocol constants for Trackmaster treadmill communication.
//!
//! This module defines all the constants used in the Trackmaster serial
//! protocol, including frame prefixes, reserved acknowledgment codes,
//! serial port configuration, and device limits.

/// Prefix byte for an input command frame (host to device)
pub const COMMAND_PREFIX: u8 = b'A';

/// Prefix byte for a command acknowledgment (device to host)
pub const ACK_PREFIX: u8 = b'B';

/// Prefix byte for a status request frame (host to device)
pub const STATUS_PREFIX: u8 = b'C';

/// Prefix byte for a status response (device to host)
pub const STATUS_RESPONSE_PREFIX: u8 = b'D';

/// Reserved reply: input command data out of range
pub const ACK_OUT_OF_RANGE: &[u8] = b"BE";

/// Reserved reply: illegal command or command not recognized
pub const ACK_UNRECOGNIZED: &[u8] = b"BF";

/// Length of every acknowledgment and status response code
pub const ACK_LEN: usize = 2;

/// Width of the numeric payload field (zero-padded ASCII tenths)
pub const PAYLOAD_WIDTH: usize = 4;

/// Baud rate (4800 bps)
pub const BAUD_RATE: u32 = 4800;

/// Default read timeout in milliseconds
pub const TIMEOUT_MS: u64 = 500;

/// Maximum belt speed in mph
pub const MAX_SPEED_MPH: f64 = 15.0;

/// Default minimum belt speed in mph (some units accept 0.1)
pub const DEFAULT_MIN_SPEED_MPH: f64 = 0.2;

/// Maximum incline in percent
pub const MAX_INCLINE_PERCENT: f64 = 25.0;

/// Smallest speed adjustment the device accepts, in mph
pub const SPEED_STEP_MPH: f64 = 0.1;

/// Smallest incline adjustment the device accepts, in percent
pub const INCLINE_STEP_PERCENT: f64 = 0.5;

/// Belt status value reported while the belt is running
pub const BELT_RUNNING_SENTINEL: u32 = 33;
