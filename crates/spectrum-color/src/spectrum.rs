//! Visible spectrum mapping
//!
//! Piecewise-linear approximation of the hue of monochromatic light, with an
//! intensity fall-off towards the edges of human vision and a fixed gamma.
//! The band edges and constants are part of the output contract: displays
//! built on this mapping expect the exact same integer triples, including
//! the hard jump from orange to pure red at 645 nm.

use crate::error::SpectrumError;
use crate::rgb::Rgb;

/// Numerator of `wavelength = LIGHT_SPEED / frequency`.
///
/// With frequencies in GHz this yields wavelengths in nanometers.
pub const LIGHT_SPEED: f64 = 3.0e8;

/// Exponent applied to the scaled channel intensity.
pub const GAMMA: f64 = 0.80;

/// Output value of a fully lit channel.
pub const INTENSITY_MAX: f64 = 255.0;

/// Convert a frequency to a wavelength in nanometers.
///
/// Zero, negative and non-finite frequencies have no meaningful wavelength
/// and are rejected, as is a quotient that overflows to infinity.
///
/// # Example
/// ```
/// use spectrum_color::frequency_to_wavelength;
/// let nm = frequency_to_wavelength(400_000.0).unwrap();
/// assert_eq!(nm, 750.0);
/// ```
pub fn frequency_to_wavelength(frequency: f64) -> Result<f64, SpectrumError> {
    if !frequency.is_finite() || frequency <= 0.0 {
        return Err(SpectrumError::InvalidFrequency(frequency));
    }
    let wavelength = LIGHT_SPEED / frequency;
    if !wavelength.is_finite() {
        return Err(SpectrumError::InvalidWavelength(wavelength));
    }
    Ok(wavelength)
}

/// Unscaled red, green and blue components (each in 0.0..=1.0).
///
/// Everything below 380 nm and from 645 nm upwards is pure red.
pub fn raw_components(wavelength: f64) -> [f64; 3] {
    let w = wavelength;
    if (380.0..440.0).contains(&w) {
        [-(w - 440.0) / (440.0 - 380.0), 0.0, 1.0]
    } else if (440.0..490.0).contains(&w) {
        [0.0, (w - 440.0) / (490.0 - 440.0), 1.0]
    } else if (490.0..510.0).contains(&w) {
        [0.0, 1.0, -(w - 510.0) / (510.0 - 490.0)]
    } else if (510.0..580.0).contains(&w) {
        [(w - 510.0) / (580.0 - 510.0), 1.0, 0.0]
    } else if (580.0..645.0).contains(&w) {
        [1.0, -(w - 645.0) / (645.0 - 580.0), 0.0]
    } else {
        [1.0, 0.0, 0.0]
    }
}

/// Brightness multiplier dimming deep violet and deep red.
///
/// The upper ramp starts at 701 nm but is computed against 700 nm, so it
/// begins slightly below 1.0. Outside 380..781 nm the factor is 0.5.
pub fn intensity_factor(wavelength: f64) -> f64 {
    let w = wavelength;
    if (380.0..420.0).contains(&w) {
        0.3 + 0.7 * (w - 380.0) / (420.0 - 380.0)
    } else if (420.0..701.0).contains(&w) {
        1.0
    } else if (701.0..781.0).contains(&w) {
        0.3 + 0.7 * (780.0 - w) / (780.0 - 700.0)
    } else {
        0.5
    }
}

fn scale_channel(raw: f64, factor: f64) -> u8 {
    // a zero channel stays zero instead of going through powf
    if raw == 0.0 {
        return 0;
    }
    (INTENSITY_MAX * (raw * factor).powf(GAMMA))
        .round()
        .clamp(0.0, INTENSITY_MAX) as u8
}

/// Map a wavelength in nanometers to an 8-bit color.
///
/// # Example
/// ```
/// use spectrum_color::{wavelength_to_rgb, Rgb};
/// assert_eq!(wavelength_to_rgb(450.0).unwrap(), Rgb::new(0, 70, 255));
/// ```
pub fn wavelength_to_rgb(wavelength: f64) -> Result<Rgb, SpectrumError> {
    if !wavelength.is_finite() {
        return Err(SpectrumError::InvalidWavelength(wavelength));
    }
    let [r, g, b] = raw_components(wavelength);
    let factor = intensity_factor(wavelength);
    Ok(Rgb::new(
        scale_channel(r, factor),
        scale_channel(g, factor),
        scale_channel(b, factor),
    ))
}

/// Map a frequency (GHz) to the color of its wavelength.
///
/// # Example
/// ```
/// use spectrum_color::{frequency_to_rgb, Rgb, SpectrumError};
/// assert_eq!(frequency_to_rgb(400_000.0).unwrap(), Rgb::new(161, 0, 0));
/// assert!(matches!(frequency_to_rgb(0.0), Err(SpectrumError::InvalidFrequency(_))));
/// ```
pub fn frequency_to_rgb(frequency: f64) -> Result<Rgb, SpectrumError> {
    wavelength_to_rgb(frequency_to_wavelength(frequency)?)
}
