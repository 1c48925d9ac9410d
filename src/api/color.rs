use axum::{
    extract::{rejection::QueryRejection, Query},
    response::Json,
};
use serde::{Deserialize, Serialize};
use spectrum_color::{frequency_to_wavelength, wavelength_to_rgb};
use utoipa::{IntoParams, ToSchema};

use crate::error::ApiError;

/// Query parameters for the color endpoint; exactly one must be given
#[derive(Debug, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ColorQuery {
    /// Frequency in GHz
    pub frequency: Option<f64>,
    /// Wavelength in nm
    pub wavelength: Option<f64>,
}

/// Color of a frequency or wavelength
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ColorResponse {
    /// Wavelength the color was computed for (nm)
    pub wavelength_nm: f64,
    /// Red, green, blue (0-255)
    pub rgb: [u8; 3],
    /// `#rrggbb`
    pub hex: String,
    /// Gradient used as tile background
    pub gradient: String,
}

/// Map a frequency or wavelength to its display color
///
/// Frequencies must be finite and positive; wavelengths finite.
#[utoipa::path(
    get,
    path = "/api/color",
    params(ColorQuery),
    responses(
        (status = 200, description = "Mapped color", body = ColorResponse),
        (status = 400, description = "Missing, ambiguous or invalid input"),
    ),
    tag = "Color"
)]
pub async fn handle_color(
    query: Result<Query<ColorQuery>, QueryRejection>,
) -> Result<Json<ColorResponse>, ApiError> {
    let Query(query) = query.map_err(|e| ApiError::InvalidInput(e.body_text()))?;

    let wavelength = match (query.frequency, query.wavelength) {
        (Some(frequency), None) => frequency_to_wavelength(frequency)?,
        (None, Some(wavelength)) => wavelength,
        _ => {
            return Err(ApiError::InvalidInput(
                "give exactly one of frequency or wavelength".to_string(),
            ))
        }
    };

    let rgb = wavelength_to_rgb(wavelength)?;
    tracing::debug!(wavelength, hex = %rgb.to_hex(), "Color computed");

    Ok(Json(ColorResponse {
        wavelength_nm: wavelength,
        rgb: rgb.to_array(),
        hex: rgb.to_hex(),
        gradient: rgb.gradient_css(),
    }))
}
