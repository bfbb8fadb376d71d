use std::fmt;
use std::time::{SystemTime, UNIX_EPOCH};

/// The semantic payload of one reading.
#[derive(Debug, Clone, PartialEq)]
pub enum Measurement {
    /// CO2 concentration in parts per million.
    Co2 { ppm: u16 },
    /// Temperature in degrees Celsius, one decimal place.
    Temperature { celsius: f64 },
    /// A frame or read that could not be turned into a value. Still
    /// delivered downstream so the consumer sees gaps, not silence.
    Malformed { message: String },
}

/// One timestamped reading from the device.
#[derive(Debug, Clone, PartialEq)]
pub struct Reading {
    pub measurement: Measurement,
    /// Capture time, assigned at decode or at failure detection.
    pub timestamp: SystemTime,
}

impl Reading {
    pub fn co2(ppm: u16) -> Self {
        Self::now(Measurement::Co2 { ppm })
    }

    pub fn temperature(celsius: f64) -> Self {
        Self::now(Measurement::Temperature { celsius })
    }

    pub fn malformed(message: impl Into<String>) -> Self {
        Self::now(Measurement::Malformed {
            message: message.into(),
        })
    }

    fn now(measurement: Measurement) -> Self {
        Self {
            measurement,
            timestamp: SystemTime::now(),
        }
    }

    /// Capture time as whole seconds since the Unix epoch.
    pub fn unix_timestamp(&self) -> u64 {
        self.timestamp
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0)
    }
}

impl fmt::Display for Measurement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Measurement::Co2 { ppm } => write!(f, "CO2: {ppm} ppm"),
            Measurement::Temperature { celsius } => write!(f, "TEMPERATURE: {celsius:.1}"),
            Measurement::Malformed { message } => write!(f, "ERROR: {message}"),
        }
    }
}

impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.unix_timestamp(), self.measurement)
    }
}
