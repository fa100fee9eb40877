//! Workout Example
//!
//! Ramps the belt up in small increments, holds a working pace, then runs
//! the device's cool-down program. Demonstrates the increment helpers and
//! the clamp-and-warn outcome handling.
//!
//! Usage:
//!   cargo run --example workout -- /dev/ttyUSB0

use log::{info, warn};
use std::thread;
use std::time::Duration;
use trackmaster_protocol::{Result, Treadmill};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let port_name = std::env::args().nth(1).unwrap_or_else(|| {
        eprintln!("Usage: workout <serial-port>");
        std::process::exit(1);
    });

    info!("Connecting to treadmill on {}...", port_name);
    let mut treadmill = Treadmill::open(&port_name)?;

    treadmill.start_belt()?;
    info!("Warming up...");
    treadmill.set_speed(2.0)?;
    thread::sleep(Duration::from_secs(30));

    // Ramp to a working pace in 0.5 mph steps.
    while treadmill.speed() < 6.0 {
        let outcome = treadmill.increment_speed(0.5)?;
        if let Some(warning) = &outcome.warning {
            warn!("{}", warning);
            break;
        }
        info!("Speed now {} mph", outcome.applied);
        thread::sleep(Duration::from_secs(10));
    }

    info!("Adding some incline...");
    treadmill.set_incline(1.5)?;

    info!("Holding pace for 2 minutes");
    thread::sleep(Duration::from_secs(120));

    info!("Cooling down");
    treadmill.set_incline(0.0)?;
    treadmill.cool_down()?;

    Ok(())
}
