//! Asset loading with embedded fallbacks
//!
//! The display page, its script and stylesheet are always served from the
//! binary. The configuration file follows this behavior:
//!
//! - If `CONFIG_FILE` is NOT set: use the embedded `config.yaml`
//! - If `CONFIG_FILE` IS set and the file exists: read it from disk
//! - If `CONFIG_FILE` IS set and the file is missing: fall back to embedded

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded web assets (page template, script, stylesheet)
#[derive(RustEmbed)]
#[folder = "static/"]
#[include = "*.html"]
#[include = "*.js"]
#[include = "*.css"]
struct EmbeddedStatic;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "config.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "config.yaml";

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override for the config
pub struct AssetLoader {
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader.
    ///
    /// `config_file` should be `Some` only if the env var was set.
    pub fn new(config_file: Option<PathBuf>) -> Self {
        Self { config_file }
    }

    /// Path of the external config, if one is configured.
    pub fn config_file(&self) -> Option<&Path> {
        self.config_file.as_deref()
    }

    /// Whether the config is read from disk rather than the binary.
    pub fn config_is_external(&self) -> bool {
        self.config_file.as_ref().is_some_and(|p| p.exists())
    }

    /// Read the configuration as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return fs::read_to_string(path);
            }
            tracing::debug!(path = %path.display(), "Config file missing, using embedded");
        }

        Self::embedded_config()
    }

    fn embedded_config() -> io::Result<String> {
        let file = EmbeddedConfig::get(CONFIG_NAME).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, "Embedded config not found")
        })?;
        String::from_utf8(file.data.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Read an embedded web asset by file name
    pub fn read_static(name: &str) -> Option<Cow<'static, [u8]>> {
        EmbeddedStatic::get(name).map(|f| f.data)
    }

    /// Read an embedded web asset as a UTF-8 string
    pub fn read_static_string(name: &str) -> io::Result<String> {
        let bytes = Self::read_static(name).ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("Asset not found: {name}"))
        })?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// List embedded web assets
    pub fn list_static() -> Vec<String> {
        let mut files: Vec<String> = EmbeddedStatic::iter().map(|s| s.to_string()).collect();
        files.sort();
        files
    }

    /// Write the embedded config to `CONFIG_FILE` (or `./config.yaml`).
    ///
    /// Existing files are skipped unless `force` is set.
    pub fn init(&self, force: bool) -> io::Result<InitReport> {
        let target = self
            .config_file
            .clone()
            .unwrap_or_else(|| PathBuf::from(CONFIG_NAME));
        let mut report = InitReport::default();
        let label = target.display().to_string();

        if target.exists() && !force {
            report.skipped.push(label);
            return Ok(report);
        }

        if let Some(parent) = target.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        fs::write(&target, Self::embedded_config()?)?;
        tracing::info!(path = %label, "Extracted config");
        report.written.push(label);
        Ok(report)
    }
}
