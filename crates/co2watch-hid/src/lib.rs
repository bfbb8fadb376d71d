//! USB HID transport for the co2watch sensor.
//!
//! Wraps `hidapi` behind the [`DeviceTransport`] trait so the session layer
//! and its tests can run against fake devices. [`SensorDevice`] is the real
//! thing: it owns both the HID subsystem handle and the open device, and
//! releases them exactly once when dropped.

pub mod device;
pub mod error;

pub use device::{DeviceTransport, SensorDevice, PRODUCT_ID, VENDOR_ID};
pub use error::{HidError, Result};
