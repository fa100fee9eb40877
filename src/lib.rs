//! # Trackmaster Protocol Library
//!
//! A Rust library for controlling Trackmaster treadmills over their RS-232
//! serial interface (4800 baud). Commands and status requests are single
//! ASCII frames with fixed-size acknowledgments; this crate implements the
//! codec, the command/response state machine, and the speed/incline policy
//! on top of it.
//!
//! ## Features
//!
//! - Start, stop, auto-stop, and cool-down belt commands
//! - Set speed and incline with explicit clamp-and-warn policy
//! - Poll belt status, actual and commanded speed/incline
//! - Typed errors distinguishing device rejections, protocol mismatches,
//!   and timeouts
//! - Transport trait for driving the protocol against a simulated device
//!
//! ## Example
//!
//! ```no_run
//! use trackmaster_protocol::Treadmill;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut treadmill = Treadmill::open("/dev/ttyUSB0")?;
//!     treadmill.start_belt()?;
//!     let outcome = treadmill.set_speed(6.0)?;
//!     println!("Belt at {} mph", outcome.applied);
//!     Ok(())
//! }
//! ```

pub mod constants;
pub mod error;
pub mod protocol;
pub mod transport;
pub mod treadmill;
pub mod types;

pub use error::{Result, TrackmasterError};
pub use transport::{SerialTransport, Transport};
pub use treadmill::Treadmill;
pub use types::*;
