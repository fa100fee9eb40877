//! Pure encode/decode logic for the Trackmaster wire protocol.
//!
//! A command frame is `A<hex>` plus an optional ASCII-digit payload; the
//! device acknowledges with `B<hex>`. A status request is `C<hex>`,
//! answered by `D<hex>` plus a fixed-length payload. Two reserved replies,
//! `BE` (data out of range) and `BF` (unrecognized command), are
//! device-reported errors rather than transport failures.
//!
//! Everything in this module is I/O-free; the round-trips live in
//! [`crate::treadmill`].

use crate::constants::*;
use crate::error::{Result, TrackmasterError};
use crate::types::{CommandCode, StatusCode};

/// Build an input command frame: `A<hex>` followed by `payload`.
///
/// `payload` must already be formatted to the width the command requires
/// (see [`format_tenths`]); range checking is the controller's job, and the
/// device itself answers `BE` for values it will not accept.
pub fn encode_command(code: CommandCode, payload: &[u8]) -> Vec<u8> {
    let mut frame = Vec::with_capacity(2 + payload.len());
    frame.push(COMMAND_PREFIX);
    frame.push(code.digit());
    frame.extend_from_slice(payload);
    frame
}

/// Build a status request frame: `C<hex>`.
pub fn encode_status_request(code: StatusCode) -> Vec<u8> {
    vec![STATUS_PREFIX, code.digit()]
}

/// Classify the device's reply to a command.
///
/// Success requires byte-for-byte equality with `B<hex>` for the expected
/// code; there is no partial-match recovery. A reply shorter than two bytes
/// means the read timed out and is reported as such, never compared.
pub fn decode_acknowledgment(response: &[u8], expected: CommandCode) -> Result<()> {
    check_reply(response, ACK_PREFIX, expected.digit())
}

/// Classify a status reply and decode its payload to an integer.
///
/// The acknowledgment bytes are checked against `D<hex>` exactly as command
/// acknowledgments are checked against `B<hex>`. Belt status (code 0) is a
/// single raw byte; all other payloads are fixed-width ASCII digits.
pub fn decode_status_response(ack: &[u8], expected: StatusCode, payload: &[u8]) -> Result<u32> {
    check_reply(ack, STATUS_RESPONSE_PREFIX, expected.digit())?;

    let want = expected.response_len();
    if payload.len() < want {
        return Err(TrackmasterError::Timeout {
            expected: want,
            received: payload.len(),
        });
    }
    let payload = &payload[..want];

    if expected == StatusCode::BeltStatus {
        return Ok(u32::from(payload[0]));
    }

    let digits = std::str::from_utf8(payload)
        .ok()
        .filter(|s| s.bytes().all(|b| b.is_ascii_digit()))
        .ok_or_else(|| TrackmasterError::MalformedPayload {
            payload: payload.to_vec(),
        })?;
    digits
        .parse::<u32>()
        .map_err(|_| TrackmasterError::MalformedPayload {
            payload: payload.to_vec(),
        })
}

/// Format a one-decimal-place quantity as the 4-digit zero-padded ASCII
/// tenths field used by set-speed and set-incline.
pub fn format_tenths(value: f64) -> Vec<u8> {
    let tenths = (value * 10.0).round() as u32;
    format!("{:0width$}", tenths, width = PAYLOAD_WIDTH).into_bytes()
}

/// Shared three-way classification: success, device-reported error, or
/// protocol mismatch. Every command and status path goes through here so a
/// missed byte is caught identically everywhere.
fn check_reply(response: &[u8], prefix: u8, digit: u8) -> Result<()> {
    if response.len() < ACK_LEN {
        return Err(TrackmasterError::Timeout {
            expected: ACK_LEN,
            received: response.len(),
        });
    }
    let response = &response[..ACK_LEN];

    if response == ACK_OUT_OF_RANGE {
        return Err(TrackmasterError::OutOfRange);
    }
    if response == ACK_UNRECOGNIZED {
        return Err(TrackmasterError::UnrecognizedCommand);
    }

    let expected = [prefix, digit];
    if response != expected {
        return Err(TrackmasterError::ProtocolMismatch {
            expected: String::from_utf8_lossy(&expected).into_owned(),
            actual: String::from_utf8_lossy(response).into_owned(),
        });
    }
    Ok(())
}
