use std::fmt;

use co2watch_hid::HidError;
use co2watch_session::SessionError;

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1;
pub const DEVICE_ERROR: i32 = 3;
pub const USAGE: i32 = 64;
pub const TIMEOUT: i32 = 124;
pub const INTERNAL: i32 = 125;

pub type CliResult<T> = Result<T, CliError>;

#[derive(Debug)]
pub struct CliError {
    pub code: i32,
    pub message: String,
}

impl CliError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for CliError {}

pub fn hid_error(context: &str, err: HidError) -> CliError {
    let code = match err {
        HidError::NotFound { .. } => DEVICE_ERROR,
        HidError::Init(_) | HidError::Open { .. } => DEVICE_ERROR,
        HidError::ReadTimeout(_) => TIMEOUT,
        HidError::FeatureReport(_) | HidError::Read(_) => FAILURE,
    };
    CliError::new(code, format!("{context}: {err}"))
}

pub fn session_error(context: &str, err: SessionError) -> CliError {
    match err {
        SessionError::Hid(err) => hid_error(context, err),
        SessionError::HandshakeFailed { .. } => CliError::new(FAILURE, format!("{context}: {err}")),
        SessionError::Spawn(_) => CliError::new(INTERNAL, format!("{context}: {err}")),
    }
}
