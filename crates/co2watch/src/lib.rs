//! Stream CO2 and temperature readings from a USB HID monitor.
//!
//! # Crate Structure
//!
//! - [`hid`] — USB HID transport (device discovery, feature reports, reads)
//! - [`frame`] — Pure validation and decoding of the 8-byte sensor frames
//! - [`session`] — Handshake, cancellable polling loop, reading stream
//!
//! The `co2watch` binary (behind the `cli` feature) wires these together:
//! it starts a session, converts ctrl-c into cancellation, and prints each
//! reading until the stream closes.

/// Re-export HID transport types.
pub mod hid {
    pub use co2watch_hid::*;
}

/// Re-export frame codec types.
pub mod frame {
    pub use co2watch_frame::*;
}

/// Re-export session types.
pub mod session {
    pub use co2watch_session::*;
}
