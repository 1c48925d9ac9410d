//! wlm-display - live wavemeter display
//!
//! Serves a browser page showing per-channel wavemeter readings, each tile
//! tinted with the visible color of the laser's wavelength.
//! This library exposes modules for integration testing.

pub mod api;
pub mod assets;
pub mod error;
pub mod models;
pub mod server;
pub mod services;
