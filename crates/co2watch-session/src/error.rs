/// Errors that can occur while starting a session.
///
/// All of these are fatal to session creation; once a session is running,
/// problems surface as [`crate::Measurement::Malformed`] readings instead.
#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    /// Transport-level error.
    #[error("hid error: {0}")]
    Hid(#[from] co2watch_hid::HidError),

    /// The device did not accept the full init report.
    #[error("handshake failed: device accepted {written} of {expected} bytes")]
    HandshakeFailed { written: usize, expected: usize },

    /// The polling thread could not be spawned.
    #[error("failed to spawn polling thread: {0}")]
    Spawn(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SessionError>;
