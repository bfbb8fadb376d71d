use std::time::Duration;

/// Errors that can occur in HID transport operations.
#[derive(Debug, thiserror::Error)]
pub enum HidError {
    /// Failed to initialize the HID subsystem.
    #[error("failed to initialize HID subsystem: {0}")]
    Init(#[source] hidapi::HidError),

    /// No device with the requested identity is attached.
    #[error("no HID device matching {vendor_id:04x}:{product_id:04x}")]
    NotFound { vendor_id: u16, product_id: u16 },

    /// A matching device is attached but could not be opened.
    #[error("failed to open HID device {vendor_id:04x}:{product_id:04x}: {source}")]
    Open {
        vendor_id: u16,
        product_id: u16,
        source: hidapi::HidError,
    },

    /// The device rejected a feature report write.
    #[error("feature report write failed: {0}")]
    FeatureReport(#[source] hidapi::HidError),

    /// A device read failed.
    #[error("device read failed: {0}")]
    Read(#[source] hidapi::HidError),

    /// No frame arrived within the read timeout.
    #[error("device read timed out after {0:?}")]
    ReadTimeout(Duration),
}

pub type Result<T> = std::result::Result<T, HidError>;
