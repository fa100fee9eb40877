//! Basic Usage Example
//!
//! This example demonstrates the core functionality of the Trackmaster
//! protocol library:
//! - Listing and selecting serial ports
//! - Starting and stopping the belt
//! - Setting speed and incline with clamp warnings
//! - Polling device status
//!
//! Usage:
//!   cargo run --example basic_usage                  # Interactive mode
//!   cargo run --example basic_usage -- COM3          # Specify port
//!   cargo run --example basic_usage -- /dev/ttyUSB0
//!
//! Set RUST_LOG environment variable to control logging:
//!   RUST_LOG=debug cargo run --example basic_usage
//!   RUST_LOG=info cargo run --example basic_usage

use inquire::Select;
use log::info;
use trackmaster_protocol::{Result, Treadmill};

/// Interactive serial port selection using inquire
fn select_port() -> Result<String> {
    let ports = Treadmill::list_ports()?;

    if ports.is_empty() {
        eprintln!("No serial ports found!");
        std::process::exit(1);
    }

    let port_names: Vec<String> = ports
        .iter()
        .map(|p| format!("{} - {:?}", p.port_name, p.port_type))
        .collect();

    let selection = Select::new("Select a serial port:", port_names)
        .prompt()
        .map_err(|e| {
            std::io::Error::new(
                std::io::ErrorKind::Other,
                format!("Selection cancelled: {}", e),
            )
        })?;

    // Extract just the port name (before " - ")
    let port_name = selection.split(" - ").next().unwrap().to_string();
    Ok(port_name)
}

fn main() -> Result<()> {
    // Initialize logger with default info level if RUST_LOG is not set
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // Get port name from command line argument or interactive selection
    let port_name = std::env::args()
        .nth(1)
        .map(Ok)
        .unwrap_or_else(select_port)?;

    info!("Connecting to treadmill on {}...", port_name);
    let mut treadmill = Treadmill::open(&port_name)?;

    info!("=== Belt Control ===");
    treadmill.start_belt()?;
    info!("Belt started");

    let outcome = treadmill.set_speed(3.0)?;
    info!("Speed set to {} mph", outcome.applied);

    let outcome = treadmill.set_incline(2.3)?;
    if let Some(warning) = &outcome.warning {
        info!("Note: {}", warning);
    }
    info!("Incline set to {}%", outcome.applied);

    info!("=== Device Status ===");
    info!("Belt running: {}", treadmill.get_belt_running()?);
    info!("Actual speed: {} mph", treadmill.get_actual_speed()?);
    info!("Actual incline: {}%", treadmill.get_actual_elevation()?);

    info!("=== Stopping ===");
    treadmill.stop_belt()?;
    info!("Belt stopped");

    Ok(())
}
