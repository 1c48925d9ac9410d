use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

/// Number of wavemeter channels in every frame
pub const CHANNEL_COUNT: usize = 8;

/// Reading the wavemeter reports when a channel is underexposed
pub const UNDEREXPOSED: f64 = -3000.0;

/// Reading the wavemeter reports when a channel is overexposed
pub const OVEREXPOSED: f64 = -4000.0;

/// Readings at or below this are not frequencies
pub const MIN_VALID_READING: f64 = 100.0;

/// Error type for malformed upstream messages
#[derive(Debug, Error)]
pub enum FrameError {
    #[error("Invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Expected {expected} values, got {actual}")]
    WrongLength { expected: usize, actual: usize },
}

/// One upstream message: a frequency (GHz) and a power (uW) per channel.
///
/// On the wire this is a flat JSON array, all readings first, then all
/// powers. `null` entries are kept as NaN and classify as "no data".
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub readings: [f64; CHANNEL_COUNT],
    pub powers: [f64; CHANNEL_COUNT],
    pub received_at: DateTime<Utc>,
}

impl Frame {
    pub fn new(readings: [f64; CHANNEL_COUNT], powers: [f64; CHANNEL_COUNT]) -> Self {
        Self {
            readings,
            powers,
            received_at: Utc::now(),
        }
    }

    /// Parse the upstream JSON array
    pub fn parse(text: &str) -> Result<Self, FrameError> {
        let values: Vec<Option<f64>> = serde_json::from_str(text)?;
        Self::from_values(&values)
    }

    fn from_values(values: &[Option<f64>]) -> Result<Self, FrameError> {
        if values.len() != 2 * CHANNEL_COUNT {
            return Err(FrameError::WrongLength {
                expected: 2 * CHANNEL_COUNT,
                actual: values.len(),
            });
        }
        let mut readings = [f64::NAN; CHANNEL_COUNT];
        let mut powers = [f64::NAN; CHANNEL_COUNT];
        for ch in 0..CHANNEL_COUNT {
            readings[ch] = values[ch].unwrap_or(f64::NAN);
            powers[ch] = values[ch + CHANNEL_COUNT].unwrap_or(f64::NAN);
        }
        Ok(Self::new(readings, powers))
    }

    /// The flat wire form, as received
    pub fn to_values(&self) -> Vec<f64> {
        self.readings.iter().chain(self.powers.iter()).copied().collect()
    }

    /// The wire form as JSON text (NaN becomes `null`)
    pub fn to_json(&self) -> String {
        serde_json::to_string(&self.to_values()).unwrap_or_else(|_| "[]".to_string())
    }

    /// Classified reading for one channel
    pub fn channel(&self, index: usize) -> ChannelReading {
        ChannelReading::classify(self.readings[index], self.powers[index])
    }
}

/// What a single channel reports
#[derive(Debug, Clone, Copy, PartialEq, Serialize, ToSchema)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelReading {
    /// A frequency (GHz) with optical power (uW)
    Measured { frequency: f64, power: f64 },
    Underexposed,
    Overexposed,
    NoData,
}

impl ChannelReading {
    pub fn classify(reading: f64, power: f64) -> Self {
        if reading > MIN_VALID_READING {
            Self::Measured {
                frequency: reading,
                power,
            }
        } else if reading == UNDEREXPOSED {
            Self::Underexposed
        } else if reading == OVEREXPOSED {
            Self::Overexposed
        } else {
            Self::NoData
        }
    }

    /// Readout text for non-measurements
    pub fn status_text(&self) -> Option<&'static str> {
        match self {
            Self::Measured { .. } => None,
            Self::Underexposed => Some("Underexposed"),
            Self::Overexposed => Some("Overexposed"),
            Self::NoData => Some("No data"),
        }
    }
}
