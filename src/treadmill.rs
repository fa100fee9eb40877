use crate::constants::*;
use crate::error::Result;
use crate::protocol;
use crate::transport::{SerialTransport, Transport};
use crate::types::{CommandCode, SetOutcome, StatusCode, TreadmillConfig, Warning};
use log::warn;
use std::time::Duration;

/// Main treadmill control interface.
///
/// Owns its transport exclusively: the device speaks a strict half-duplex
/// request/response protocol with no request identifiers, so a second
/// command must not be issued until the prior acknowledgment (or timeout)
/// has resolved. Callers sharing a treadmill across threads must wrap it in
/// a mutex.
///
/// [`speed`](Treadmill::speed) and [`incline`](Treadmill::incline) are the
/// last *commanded* values, updated only after a verified acknowledgment.
/// The device never echoes values back, so these can drift from hardware
/// truth; use the `get_actual_*` queries to read the hardware directly.
pub struct Treadmill<T: Transport = SerialTransport> {
    transport: T,
    config: TreadmillConfig,
    speed: f64,
    incline: f64,
}

impl Treadmill<SerialTransport> {
    /// Connect to the treadmill on `port_name` with the default policy.
    pub fn open(port_name: &str) -> Result<Self> {
        Self::open_with_config(port_name, TreadmillConfig::default())
    }

    /// Connect with an explicit policy configuration.
    pub fn open_with_config(port_name: &str, config: TreadmillConfig) -> Result<Self> {
        let transport =
            SerialTransport::open(port_name, Duration::from_millis(config.timeout_ms))?;
        Ok(Self::with_transport(transport, config))
    }

    /// List available serial ports
    pub fn list_ports() -> Result<Vec<serialport::SerialPortInfo>> {
        Ok(serialport::available_ports()?)
    }
}

impl<T: Transport> Treadmill<T> {
    /// Build a controller over any [`Transport`], real or simulated.
    pub fn with_transport(transport: T, config: TreadmillConfig) -> Self {
        Treadmill {
            transport,
            config,
            speed: 0.0,
            incline: 0.0,
        }
    }

    /// Last commanded belt speed in mph.
    pub fn speed(&self) -> f64 {
        self.speed
    }

    /// Last commanded incline in percent.
    pub fn incline(&self) -> f64 {
        self.incline
    }

    /// Start the belt.
    pub fn start_belt(&mut self) -> Result<()> {
        self.command(CommandCode::StartBelt, b"")
    }

    /// Stop the belt.
    pub fn stop_belt(&mut self) -> Result<()> {
        self.command(CommandCode::StopBelt, b"")
    }

    /// Immediately set speed and incline to zero.
    pub fn auto_stop(&mut self) -> Result<()> {
        self.command(CommandCode::AutoStop, b"")
    }

    /// Enter the device's cool-down program.
    pub fn cool_down(&mut self) -> Result<()> {
        self.command(CommandCode::CoolDown, b"")
    }

    /// Set the belt speed in mph, rounded to one decimal place.
    ///
    /// Requests above 15 mph are clamped to 15. Requests below the
    /// configured minimum are clamped to the minimum and the belt is then
    /// stopped; it must be restarted explicitly. Either adjustment is
    /// reported in the returned [`SetOutcome`]. With
    /// `auto_start_on_set_speed` enabled, an in-range set also starts the
    /// belt if it is not running.
    pub fn set_speed(&mut self, mph: f64) -> Result<SetOutcome> {
        let mut rounded = round_to_step(mph, SPEED_STEP_MPH);
        let mut warning = None;

        if rounded > MAX_SPEED_MPH {
            warning = Some(Warning::SpeedClampedToMax {
                requested: mph,
                max: MAX_SPEED_MPH,
            });
            rounded = MAX_SPEED_MPH;
        }

        let stop_after = rounded < self.config.min_speed_mph;
        if stop_after {
            rounded = round_to_step(self.config.min_speed_mph, SPEED_STEP_MPH);
            warning = Some(Warning::SpeedBelowMinimum {
                requested: mph,
                min: rounded,
            });
        }

        if let Some(w) = &warning {
            warn!("{w}");
        }

        self.command(CommandCode::SetSpeed, &protocol::format_tenths(rounded))?;
        self.speed = rounded;

        if stop_after {
            self.stop_belt()?;
        } else if self.config.auto_start_on_set_speed && !self.get_belt_running()? {
            self.start_belt()?;
        }

        Ok(SetOutcome {
            applied: rounded,
            warning,
        })
    }

    /// Set the incline in percent, rounded to the nearest half unit and
    /// clamped to [0, 25]. Adjustments are reported in the returned
    /// [`SetOutcome`].
    pub fn set_incline(&mut self, percent: f64) -> Result<SetOutcome> {
        let mut rounded = round_to_step(percent, INCLINE_STEP_PERCENT);
        let mut warning = None;

        if rounded > MAX_INCLINE_PERCENT {
            warning = Some(Warning::InclineClampedToMax {
                requested: percent,
                max: MAX_INCLINE_PERCENT,
            });
            rounded = MAX_INCLINE_PERCENT;
        }
        if rounded < 0.0 {
            warning = Some(Warning::InclineClampedToZero { requested: percent });
            rounded = 0.0;
        }

        if let Some(w) = &warning {
            warn!("{w}");
        }

        self.command(CommandCode::SetIncline, &protocol::format_tenths(rounded))?;
        self.incline = rounded;

        Ok(SetOutcome {
            applied: rounded,
            warning,
        })
    }

    /// Increase speed by `by` mph (device granularity 0.1).
    pub fn increment_speed(&mut self, by: f64) -> Result<SetOutcome> {
        self.set_speed(self.speed + by)
    }

    /// Decrease speed by `by` mph (device granularity 0.1).
    pub fn decrement_speed(&mut self, by: f64) -> Result<SetOutcome> {
        self.set_speed(self.speed - by)
    }

    /// Increase incline by `by` percent (device granularity 0.5).
    pub fn increment_incline(&mut self, by: f64) -> Result<SetOutcome> {
        self.set_incline(self.incline + by)
    }

    /// Decrease incline by `by` percent (device granularity 0.5).
    pub fn decrement_incline(&mut self, by: f64) -> Result<SetOutcome> {
        self.set_incline(self.incline - by)
    }

    /// Check whether the belt is running.
    pub fn get_belt_running(&mut self) -> Result<bool> {
        Ok(self.status_request(StatusCode::BeltStatus)? == BELT_RUNNING_SENTINEL)
    }

    /// Read the current belt speed from the hardware, in mph.
    ///
    /// Note: the device's reading is not very accurate or responsive.
    pub fn get_actual_speed(&mut self) -> Result<f64> {
        Ok(self.status_request(StatusCode::ActualSpeed)? as f64 / 10.0)
    }

    /// Read the current incline from the hardware, in percent.
    ///
    /// Note: the device's reading is not very accurate or responsive.
    pub fn get_actual_elevation(&mut self) -> Result<f64> {
        Ok(self.status_request(StatusCode::ActualIncline)? as f64 / 10.0)
    }

    /// Read the speed the belt is currently set to, refreshing the local
    /// cache. Mostly useful for troubleshooting; [`speed`](Treadmill::speed)
    /// covers the common case.
    pub fn get_set_speed(&mut self) -> Result<f64> {
        let value = self.status_request(StatusCode::SetSpeed)? as f64 / 10.0;
        self.speed = value;
        Ok(value)
    }

    /// Read the incline the treadmill is currently set to, refreshing the
    /// local cache.
    pub fn get_set_incline(&mut self) -> Result<f64> {
        let value = self.status_request(StatusCode::SetIncline)? as f64 / 10.0;
        self.incline = value;
        Ok(value)
    }

    /// One command round-trip: frame out, acknowledgment back, classify.
    fn command(&mut self, code: CommandCode, payload: &[u8]) -> Result<()> {
        let frame = protocol::encode_command(code, payload);
        self.transport.send(&frame)?;

        let mut ack = [0u8; ACK_LEN];
        let n = self.transport.receive(&mut ack)?;
        protocol::decode_acknowledgment(&ack[..n], code)
    }

    /// One status round-trip: request out, response code plus fixed-length
    /// payload back.
    fn status_request(&mut self, code: StatusCode) -> Result<u32> {
        let frame = protocol::encode_status_request(code);
        self.transport.send(&frame)?;

        let mut ack = [0u8; ACK_LEN];
        let n = self.transport.receive(&mut ack)?;

        let mut payload = vec![0u8; code.response_len()];
        let m = self.transport.receive(&mut payload)?;

        // Error classification of the ack wins over a short payload read.
        protocol::decode_status_response(&ack[..n], code, &payload[..m])
    }
}

/// Round to the nearest multiple of `step` (0.1 for speed, 0.5 for incline).
fn round_to_step(value: f64, step: f64) -> f64 {
    (value / step).round() * step
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackmasterError;
    use std::collections::VecDeque;

    /// Scripted transport: each `receive` call consumes one queued reply
    /// chunk, mimicking the device answering one read at a time.
    struct MockTransport {
        replies: VecDeque<Vec<u8>>,
        writes: Vec<Vec<u8>>,
    }

    impl MockTransport {
        fn new(replies: &[&[u8]]) -> Self {
            MockTransport {
                replies: replies.iter().map(|r| r.to_vec()).collect(),
                writes: Vec::new(),
            }
        }
    }

    impl Transport for MockTransport {
        fn send(&mut self, frame: &[u8]) -> Result<()> {
            self.writes.push(frame.to_vec());
            Ok(())
        }

        fn receive(&mut self, buf: &mut [u8]) -> Result<usize> {
            let chunk = self.replies.pop_front().unwrap_or_default();
            let n = chunk.len().min(buf.len());
            buf[..n].copy_from_slice(&chunk[..n]);
            Ok(n)
        }
    }

    fn treadmill(replies: &[&[u8]]) -> Treadmill<MockTransport> {
        Treadmill::with_transport(MockTransport::new(replies), TreadmillConfig::default())
    }

    #[test]
    fn start_belt_round_trip() {
        let mut t = treadmill(&[b"B1"]);
        t.start_belt().unwrap();
        assert_eq!(t.transport.writes, vec![b"A1".to_vec()]);
    }

    #[test]
    fn fixed_commands_use_documented_codes() {
        let mut t = treadmill(&[b"B2", b"BA", b"BB"]);
        t.stop_belt().unwrap();
        t.auto_stop().unwrap();
        t.cool_down().unwrap();
        assert_eq!(
            t.transport.writes,
            vec![b"A2".to_vec(), b"AA".to_vec(), b"AB".to_vec()]
        );
    }

    #[test]
    fn set_speed_sends_tenths_payload_and_caches() {
        let mut t = treadmill(&[b"B3"]);
        let outcome = t.set_speed(6.0).unwrap();
        assert_eq!(t.transport.writes, vec![b"A30060".to_vec()]);
        assert_eq!(outcome.applied, 6.0);
        assert!(outcome.warning.is_none());
        assert_eq!(t.speed(), 6.0);
    }

    #[test]
    fn set_speed_clamps_to_maximum_with_warning() {
        let mut t = treadmill(&[b"B3"]);
        let outcome = t.set_speed(16.0).unwrap();
        assert_eq!(t.transport.writes, vec![b"A30150".to_vec()]);
        assert_eq!(outcome.applied, 15.0);
        assert_eq!(
            outcome.warning,
            Some(Warning::SpeedClampedToMax {
                requested: 16.0,
                max: 15.0
            })
        );
        assert_eq!(t.speed(), 15.0);
    }

    #[test]
    fn set_speed_below_minimum_stops_the_belt() {
        let mut t = treadmill(&[b"B3", b"B2"]);
        let outcome = t.set_speed(0.05).unwrap();
        assert_eq!(
            t.transport.writes,
            vec![b"A30002".to_vec(), b"A2".to_vec()]
        );
        assert_eq!(outcome.applied, 0.2);
        assert!(matches!(
            outcome.warning,
            Some(Warning::SpeedBelowMinimum { .. })
        ));
        assert_eq!(t.speed(), 0.2);
    }

    #[test]
    fn minimum_speed_threshold_is_configurable() {
        let config = TreadmillConfig {
            min_speed_mph: 0.1,
            ..TreadmillConfig::default()
        };
        let mut t = Treadmill::with_transport(MockTransport::new(&[b"B3"]), config);
        // 0.05 rounds to 0.1, which this unit accepts, so no stop follows.
        let outcome = t.set_speed(0.05).unwrap();
        assert_eq!(t.transport.writes, vec![b"A30001".to_vec()]);
        assert!(outcome.warning.is_none());
    }

    #[test]
    fn auto_start_policy_starts_a_stopped_belt() {
        let config = TreadmillConfig {
            auto_start_on_set_speed: true,
            ..TreadmillConfig::default()
        };
        let replies: &[&[u8]] = &[b"B3", b"D0", &[0], b"B1"];
        let mut t = Treadmill::with_transport(MockTransport::new(replies), config);
        t.set_speed(3.0).unwrap();
        assert_eq!(
            t.transport.writes,
            vec![b"A30030".to_vec(), b"C0".to_vec(), b"A1".to_vec()]
        );
    }

    #[test]
    fn failed_acknowledgment_leaves_cache_unchanged() {
        let mut t = treadmill(&[b"BE"]);
        let err = t.set_speed(5.0).unwrap_err();
        assert!(matches!(err, TrackmasterError::OutOfRange));
        assert_eq!(t.speed(), 0.0);
    }

    #[test]
    fn short_acknowledgment_read_is_a_timeout() {
        let mut t = treadmill(&[b"B"]);
        let err = t.start_belt().unwrap_err();
        assert!(matches!(
            err,
            TrackmasterError::Timeout {
                expected: 2,
                received: 1
            }
        ));
    }

    #[test]
    fn set_incline_rounds_to_nearest_half_unit() {
        let mut t = treadmill(&[b"B4"]);
        let outcome = t.set_incline(2.3).unwrap();
        assert_eq!(t.transport.writes, vec![b"A40025".to_vec()]);
        assert_eq!(outcome.applied, 2.5);
        assert!(outcome.warning.is_none());
        assert_eq!(t.incline(), 2.5);
    }

    #[test]
    fn set_incline_clamps_negative_to_zero() {
        let mut t = treadmill(&[b"B4"]);
        let outcome = t.set_incline(-1.0).unwrap();
        assert_eq!(t.transport.writes, vec![b"A40000".to_vec()]);
        assert_eq!(outcome.applied, 0.0);
        assert_eq!(
            outcome.warning,
            Some(Warning::InclineClampedToZero { requested: -1.0 })
        );
    }

    #[test]
    fn set_incline_clamps_to_maximum() {
        let mut t = treadmill(&[b"B4"]);
        let outcome = t.set_incline(30.0).unwrap();
        assert_eq!(t.transport.writes, vec![b"A40250".to_vec()]);
        assert_eq!(outcome.applied, 25.0);
        assert!(matches!(
            outcome.warning,
            Some(Warning::InclineClampedToMax { .. })
        ));
    }

    #[test]
    fn belt_running_matches_sentinel_only() {
        let mut t = treadmill(&[b"D0", &[33], b"D0", &[0]]);
        assert!(t.get_belt_running().unwrap());
        assert!(!t.get_belt_running().unwrap());
        assert_eq!(t.transport.writes, vec![b"C0".to_vec(), b"C0".to_vec()]);
    }

    #[test]
    fn actual_readings_are_tenths() {
        let mut t = treadmill(&[b"D1", b"0065", b"D2", b"0125"]);
        assert_eq!(t.get_actual_speed().unwrap(), 6.5);
        assert_eq!(t.get_actual_elevation().unwrap(), 12.5);
    }

    #[test]
    fn get_set_values_refresh_the_cache() {
        let mut t = treadmill(&[b"D3", b"0100", b"D4", b"0050"]);
        assert_eq!(t.get_set_speed().unwrap(), 10.0);
        assert_eq!(t.speed(), 10.0);
        assert_eq!(t.get_set_incline().unwrap(), 5.0);
        assert_eq!(t.incline(), 5.0);
    }

    #[test]
    fn increments_apply_to_cached_values() {
        let mut t = treadmill(&[b"B3", b"B3", b"B4", b"B4"]);
        t.set_speed(5.0).unwrap();
        t.increment_speed(0.1).unwrap();
        assert!((t.speed() - 5.1).abs() < 1e-9);

        t.set_incline(2.0).unwrap();
        t.decrement_incline(0.5).unwrap();
        assert_eq!(t.incline(), 1.5);
        assert_eq!(
            t.transport.writes,
            vec![
                b"A30050".to_vec(),
                b"A30051".to_vec(),
                b"A40020".to_vec(),
                b"A40015".to_vec()
            ]
        );
    }

    #[test]
    fn status_timeout_on_missing_payload() {
        let mut t = treadmill(&[b"D1", b"00"]);
        let err = t.get_actual_speed().unwrap_err();
        assert!(matches!(
            err,
            TrackmasterError::Timeout {
                expected: 4,
                received: 2
            }
        ));
    }
}
