//! spectrum-color: colors for monochromatic light
//!
//! Maps a laser frequency (GHz) or wavelength (nm) to an 8-bit RGB color that
//! approximates what the light looks like, dimmed towards the limits of human
//! vision. Used to tint wavelength meter readouts.
//!
//! ```
//! use spectrum_color::{frequency_to_rgb, Rgb};
//!
//! // 666 666.67 GHz is 450 nm
//! let color = frequency_to_rgb(3.0e8 / 450.0).unwrap();
//! assert_eq!(color, Rgb::new(0, 70, 255));
//! assert_eq!(color.to_hex(), "#0046ff");
//! ```
//!
//! The mapping is pure and allocation free, so it can be called from any
//! number of threads.

mod error;
mod rgb;
mod spectrum;

pub use error::SpectrumError;
pub use rgb::Rgb;
pub use spectrum::{
    frequency_to_rgb, frequency_to_wavelength, intensity_factor, raw_components,
    wavelength_to_rgb, GAMMA, INTENSITY_MAX, LIGHT_SPEED,
};
