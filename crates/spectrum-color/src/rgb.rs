//! 8-bit RGB color and the CSS renderings the live display needs.

use std::fmt;

/// Brightness step used by [`Rgb::darker`], matching common charting libraries.
const DARKER_STEP: f64 = 0.7;

/// An 8-bit per channel RGB color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[inline]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }

    /// Lowercase `#rrggbb` notation.
    ///
    /// # Example
    /// ```
    /// use spectrum_color::Rgb;
    /// assert_eq!(Rgb::new(0, 70, 255).to_hex(), "#0046ff");
    /// ```
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// A darker copy, each channel scaled by `0.7^k`.
    ///
    /// Negative `k` brightens; results are rounded and clamped to 0..=255.
    ///
    /// # Example
    /// ```
    /// use spectrum_color::Rgb;
    /// assert_eq!(Rgb::new(255, 100, 0).darker(2.0), Rgb::new(125, 49, 0));
    /// ```
    pub fn darker(self, k: f64) -> Self {
        let scale = DARKER_STEP.powf(k);
        let apply = |c: u8| (c as f64 * scale).round().clamp(0.0, 255.0) as u8;
        Self::new(apply(self.r), apply(self.g), apply(self.b))
    }

    /// Diagonal CSS gradient from a darker shade to this color.
    ///
    /// # Example
    /// ```
    /// use spectrum_color::Rgb;
    /// assert_eq!(
    ///     Rgb::new(255, 0, 0).gradient_css(),
    ///     "linear-gradient(135deg, rgb(125, 0, 0) 0%, rgb(255, 0, 0) 100%)"
    /// );
    /// ```
    pub fn gradient_css(self) -> String {
        format!("linear-gradient(135deg, {} 0%, {} 100%)", self.darker(2.0), self)
    }
}

impl From<[u8; 3]> for Rgb {
    fn from(c: [u8; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }
}

impl fmt::Display for Rgb {
    /// CSS functional notation, `rgb(r, g, b)`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "rgb({}, {}, {})", self.r, self.g, self.b)
    }
}
