//! Canned upstream messages.

use wlm_display::models::{Frame, CHANNEL_COUNT};

/// 450 nm expressed as a frequency in GHz
pub const F_450NM: f64 = 3.0e8 / 450.0;

/// 700 nm expressed as a frequency in GHz
pub const F_700NM: f64 = 3.0e8 / 700.0;

/// Upstream message: channel 0 at 450 nm, 1 underexposed, 2 overexposed,
/// 3 at 700 nm, the rest without signal
pub fn mixed_message() -> String {
    let readings = [F_450NM, -3000.0, -4000.0, F_700NM, 0.0, 0.0, 0.0, 0.0];
    let powers = [12.5, 0.0, 0.0, 3.25, 0.0, 0.0, 0.0, 0.0];
    let values: Vec<f64> = readings.iter().chain(powers.iter()).copied().collect();
    serde_json::to_string(&values).unwrap()
}

pub fn mixed_frame() -> Frame {
    Frame::parse(&mixed_message()).unwrap()
}

/// Every channel reporting the same frequency
pub fn uniform_frame(frequency: f64) -> Frame {
    Frame::new([frequency; CHANNEL_COUNT], [1.0; CHANNEL_COUNT])
}
