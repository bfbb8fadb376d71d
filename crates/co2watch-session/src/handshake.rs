use co2watch_frame::FRAME_SIZE;
use co2watch_hid::DeviceTransport;
use tracing::debug;

use crate::error::{Result, SessionError};

/// Size of the init feature report: one report-id byte plus one frame's
/// worth of payload.
pub const INIT_REPORT_LEN: usize = FRAME_SIZE + 1;

/// Perform the one-time init handshake.
///
/// The device starts streaming frames only after it accepts a zero-filled
/// feature report of exactly [`INIT_REPORT_LEN`] bytes. Any other accepted
/// count means the device is not in a usable state.
pub fn handshake<T: DeviceTransport>(transport: &mut T) -> Result<()> {
    let report = [0u8; INIT_REPORT_LEN];
    let written = transport.send_feature_report(&report)?;

    if written != INIT_REPORT_LEN {
        return Err(SessionError::HandshakeFailed {
            written,
            expected: INIT_REPORT_LEN,
        });
    }

    debug!(written, "init feature report accepted");
    Ok(())
}
