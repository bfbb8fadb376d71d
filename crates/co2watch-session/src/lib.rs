//! Device session management for co2watch.
//!
//! A [`Session`] owns the open device, performs the one-time init
//! handshake, and runs a polling loop on a background thread. The caller
//! consumes [`Reading`] values one at a time, in capture order, until the
//! [`CancelToken`] fires; the stream then closes and the device is
//! released.
//!
//! Decode-time problems (read timeouts, checksum mismatches, out-of-range
//! values) are data, not faults: they surface as
//! [`Measurement::Malformed`] readings and the loop keeps going. The only
//! errors a caller handles directly are the ones [`Session::start`] can
//! return.

pub mod cancel;
pub mod error;
pub mod handshake;
pub mod reading;
pub mod session;

pub use cancel::CancelToken;
pub use error::{Result, SessionError};
pub use handshake::{handshake, INIT_REPORT_LEN};
pub use reading::{Measurement, Reading};
pub use session::{Session, SessionConfig, DEFAULT_POLL_INTERVAL, READ_TIMEOUT};
