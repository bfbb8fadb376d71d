//! Frame validation and decoding for the co2watch sensor protocol.
//!
//! The device emits fixed 8-byte frames:
//! - byte 0: channel code (0x50 = CO2, 0x42 = temperature)
//! - bytes 1-2: big-endian 16-bit payload
//! - byte 3: checksum (8-bit wrapping sum of bytes 0-2)
//! - byte 4: sentinel 0x0d
//! - bytes 5-7: padding
//!
//! This crate is pure: no I/O, no state. Decode failures come back as
//! classified error values, never panics.

pub mod codec;
pub mod error;

pub use codec::{
    check_crc, decode_frame, Decoded, RawFrame, ABS_ZERO_CELSIUS, CO2_CODE, FRAME_SIZE,
    MAX_CO2_PPM, MIN_CO2_PPM, MIN_FRAME_LEN, SENTINEL, TEMP_CODE, TEMP_FACTOR,
};
pub use error::{FrameError, Result};
