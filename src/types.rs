use crate::constants::{DEFAULT_MIN_SPEED_MPH, TIMEOUT_MS};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Input commands from the device's documented command table.
///
/// Each command `A<hex>` is acknowledged by the device with `B<hex>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommandCode {
    /// Start the belt (`A1`)
    StartBelt,
    /// Stop the belt (`A2`)
    StopBelt,
    /// Set belt speed, 4-digit tenths-of-mph payload (`A3`)
    SetSpeed,
    /// Set incline, 4-digit tenths-of-percent payload (`A4`)
    SetIncline,
    /// Immediately set speed and incline to zero (`AA`)
    AutoStop,
    /// Enter the cool-down program (`AB`)
    CoolDown,
}

impl CommandCode {
    /// ASCII hex digit identifying this command on the wire.
    pub fn digit(self) -> u8 {
        match self {
            CommandCode::StartBelt => b'1',
            CommandCode::StopBelt => b'2',
            CommandCode::SetSpeed => b'3',
            CommandCode::SetIncline => b'4',
            CommandCode::AutoStop => b'A',
            CommandCode::CoolDown => b'B',
        }
    }

    /// All commands in the closed set.
    pub const ALL: [CommandCode; 6] = [
        CommandCode::StartBelt,
        CommandCode::StopBelt,
        CommandCode::SetSpeed,
        CommandCode::SetIncline,
        CommandCode::AutoStop,
        CommandCode::CoolDown,
    ];
}

/// Status requests from the device's documented status table.
///
/// Each request `C<hex>` is answered with `D<hex>` followed by a
/// fixed-length payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StatusCode {
    /// Belt running status, single raw byte payload (`C0`)
    BeltStatus,
    /// Actual belt speed, 4-byte tenths payload (`C1`)
    ActualSpeed,
    /// Actual incline, 4-byte tenths payload (`C2`)
    ActualIncline,
    /// Commanded belt speed, 4-byte tenths payload (`C3`)
    SetSpeed,
    /// Commanded incline, 4-byte tenths payload (`C4`)
    SetIncline,
}

impl StatusCode {
    /// ASCII hex digit identifying this status request on the wire.
    pub fn digit(self) -> u8 {
        match self {
            StatusCode::BeltStatus => b'0',
            StatusCode::ActualSpeed => b'1',
            StatusCode::ActualIncline => b'2',
            StatusCode::SetSpeed => b'3',
            StatusCode::SetIncline => b'4',
        }
    }

    /// Number of payload bytes following the `D<hex>` response code.
    pub fn response_len(self) -> usize {
        match self {
            StatusCode::BeltStatus => 1,
            _ => 4,
        }
    }
}

/// Non-fatal event raised when a requested value is adjusted before
/// being sent to the device.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Warning {
    /// Requested speed exceeded the maximum and was clamped
    SpeedClampedToMax {
        /// Speed the caller asked for, in mph
        requested: f64,
        /// Maximum the device accepts, in mph
        max: f64,
    },
    /// Requested speed fell below the minimum; the belt was stopped and
    /// must be restarted explicitly
    SpeedBelowMinimum {
        /// Speed the caller asked for, in mph
        requested: f64,
        /// Configured minimum, in mph
        min: f64,
    },
    /// Requested incline exceeded the maximum and was clamped
    InclineClampedToMax {
        /// Incline the caller asked for, in percent
        requested: f64,
        /// Maximum the device accepts, in percent
        max: f64,
    },
    /// Requested incline was negative and was clamped to zero
    InclineClampedToZero {
        /// Incline the caller asked for, in percent
        requested: f64,
    },
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SpeedClampedToMax { requested, max } => {
                write!(f, "Too fast! Requested {requested} mph, set to {max} mph instead")
            }
            Warning::SpeedBelowMinimum { requested, min } => {
                write!(
                    f,
                    "Too slow! Requested {requested} mph, set to {min} mph and stopped the belt; it must be restarted"
                )
            }
            Warning::InclineClampedToMax { requested, max } => {
                write!(f, "Too steep! Requested {requested}%, set to {max}% instead")
            }
            Warning::InclineClampedToZero { requested } => {
                write!(f, "Incline cannot be negative! Requested {requested}%, set to 0% instead")
            }
        }
    }
}

/// Result of a set-speed or set-incline operation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SetOutcome {
    /// Value actually transmitted to the device, after rounding and clamping
    pub applied: f64,
    /// Clamp event, if the requested value was adjusted
    pub warning: Option<Warning>,
}

/// Controller policy configuration.
///
/// Historical treadmill firmware variants disagree on the minimum speed
/// threshold and on whether setting a speed starts a stopped belt; both
/// behaviors are explicit options here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TreadmillConfig {
    /// Smallest speed the belt will run at, in mph (0.1 or 0.2 depending
    /// on the unit)
    pub min_speed_mph: f64,
    /// Start the belt after a successful in-range set-speed if it is not
    /// already running
    pub auto_start_on_set_speed: bool,
    /// Serial read timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for TreadmillConfig {
    fn default() -> Self {
        TreadmillConfig {
            min_speed_mph: DEFAULT_MIN_SPEED_MPH,
            auto_start_on_set_speed: false,
            timeout_ms: TIMEOUT_MS,
        }
    }
}
