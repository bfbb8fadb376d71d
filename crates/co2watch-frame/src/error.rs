/// Errors that can occur while validating or decoding a sensor frame.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum FrameError {
    /// The sentinel byte or checksum does not match.
    #[error("bad crc")]
    BadCrc,

    /// The frame is too short to decode.
    #[error("wrong data length {len} but must be >= 5")]
    TooShort { len: usize },

    /// The decoded CO2 value is below the protocol minimum.
    #[error("co2 ppm {ppm} is below minimum")]
    BelowMinimum { ppm: i32 },
}

pub type Result<T> = std::result::Result<T, FrameError>;
