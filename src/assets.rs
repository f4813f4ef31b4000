//! Asset loading with embedded fallbacks
//!
//! Site files (template, sample profile), card templates and the config are
//! embedded in the binary:
//!
//! - If an env var is NOT set: use embedded assets only (no filesystem access)
//! - If an env var IS set: use the filesystem, falling back to embedded files
//!   that do not exist there

use rust_embed::RustEmbed;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Embedded starter site (HTML template and sample profile)
#[derive(RustEmbed)]
#[folder = "site/"]
#[include = "*.html"]
#[include = "*.json"]
struct EmbeddedSite;

/// Embedded default card templates
#[derive(RustEmbed)]
#[folder = "cards/"]
#[include = "*.html"]
struct EmbeddedCards;

/// Embedded default config
#[derive(RustEmbed)]
#[folder = "."]
#[include = "folio.yaml"]
struct EmbeddedConfig;

const CONFIG_NAME: &str = "folio.yaml";
const CARDS_DIR: &str = "cards";

/// Asset category for selective operations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AssetCategory {
    Site,
    Cards,
    Config,
}

/// Report of init (extraction) operations
#[derive(Debug, Default)]
pub struct InitReport {
    pub written: Vec<String>,
    pub skipped: Vec<String>,
}

/// Asset loader with optional filesystem override
pub struct AssetLoader {
    /// External site directory (from SITE_DIR env var)
    site_dir: Option<PathBuf>,
    /// External config file path (from CONFIG_FILE env var)
    config_file: Option<PathBuf>,
}

impl AssetLoader {
    /// Create a new asset loader
    ///
    /// Paths should be `Some` only if the corresponding env var was set.
    /// If `None`, embedded assets are used exclusively.
    pub fn new(site_dir: Option<PathBuf>, config_file: Option<PathBuf>) -> Self {
        Self {
            site_dir,
            config_file,
        }
    }

    /// External site directory, if configured
    pub fn site_dir(&self) -> Option<&Path> {
        self.site_dir.as_deref()
    }

    /// Read a site file (template, profile, card override)
    ///
    /// Absolute paths are read from the filesystem as-is. Relative paths
    /// try the site directory first, then the embedded copy.
    pub fn read_site(&self, relative_path: &Path) -> io::Result<Cow<'static, [u8]>> {
        if relative_path.is_absolute() {
            return Ok(Cow::Owned(fs::read(relative_path)?));
        }

        if let Some(ref dir) = self.site_dir {
            let full_path = dir.join(relative_path);
            if full_path.exists() {
                tracing::trace!(path = %full_path.display(), "Loading site file from filesystem");
                return Ok(Cow::Owned(fs::read(&full_path)?));
            }
        }

        let path_str = relative_path.to_string_lossy();
        EmbeddedSite::get(&path_str)
            .map(|f| {
                tracing::trace!(path = %path_str, "Loading site file from embedded assets");
                f.data
            })
            .ok_or_else(|| {
                io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("Site file not found: {path_str}"),
                )
            })
    }

    /// Read a site file as a UTF-8 string
    pub fn read_site_string(&self, relative_path: &Path) -> io::Result<String> {
        let bytes = self.read_site(relative_path)?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// List all site files (merged view of embedded + external)
    pub fn list_site(&self) -> Vec<String> {
        let mut files: BTreeSet<String> = EmbeddedSite::iter().map(|s| s.to_string()).collect();

        if let Some(ref dir) = self.site_dir {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    if let Some(name) = entry.file_name().to_str() {
                        if name.ends_with(".html") || name.ends_with(".json") {
                            files.insert(name.to_string());
                        }
                    }
                }
            }
        }

        files.into_iter().collect()
    }

    /// Read the config file
    ///
    /// If an external path is configured and exists, uses that.
    /// Otherwise falls back to embedded config.
    pub fn read_config(&self) -> io::Result<Cow<'static, [u8]>> {
        if let Some(ref path) = self.config_file {
            if path.exists() {
                tracing::trace!(path = %path.display(), "Loading config from filesystem");
                return Ok(Cow::Owned(fs::read(path)?));
            }
        }

        EmbeddedConfig::get(CONFIG_NAME)
            .map(|f| {
                tracing::trace!("Loading config from embedded assets");
                f.data
            })
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "Embedded folio.yaml not found"))
    }

    /// Read config as a UTF-8 string
    pub fn read_config_string(&self) -> io::Result<String> {
        let bytes = self.read_config()?;
        String::from_utf8(bytes.into_owned())
            .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))
    }

    /// Extract embedded assets to filesystem (init command)
    ///
    /// Uses the configured paths (or defaults if not set).
    pub fn init(&self, categories: &[AssetCategory], force: bool) -> io::Result<InitReport> {
        let mut report = InitReport::default();

        for category in categories {
            match category {
                AssetCategory::Site => {
                    let dir = self
                        .site_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./site"));
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedSite::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedSite::get(&file) {
                            if let Some(parent) = path.parent() {
                                fs::create_dir_all(parent)?;
                            }
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Cards => {
                    let dir = self
                        .site_dir
                        .clone()
                        .unwrap_or_else(|| PathBuf::from("./site"))
                        .join(CARDS_DIR);
                    fs::create_dir_all(&dir)?;

                    for file in EmbeddedCards::iter() {
                        let path = dir.join(file.as_ref());
                        if !force && path.exists() {
                            report.skipped.push(path.display().to_string());
                            continue;
                        }
                        if let Some(data) = EmbeddedCards::get(&file) {
                            fs::write(&path, &*data.data)?;
                            report.written.push(path.display().to_string());
                        }
                    }
                }
                AssetCategory::Config => {
                    let path = self
                        .config_file
                        .clone()
                        .unwrap_or_else(|| PathBuf::from(format!("./{CONFIG_NAME}")));

                    if !force && path.exists() {
                        report.skipped.push(path.display().to_string());
                        continue;
                    }
                    if let Some(parent) = path.parent() {
                        fs::create_dir_all(parent)?;
                    }
                    if let Some(data) = EmbeddedConfig::get(CONFIG_NAME) {
                        fs::write(&path, &*data.data)?;
                        report.written.push(path.display().to_string());
                    }
                }
            }
        }

        Ok(report)
    }

    /// Built-in card template by file name
    pub fn embedded_card(name: &str) -> Option<String> {
        EmbeddedCards::get(name).and_then(|f| String::from_utf8(f.data.into_owned()).ok())
    }

    /// List embedded assets by category (for display)
    pub fn list_embedded(category: AssetCategory) -> Vec<String> {
        match category {
            AssetCategory::Site => EmbeddedSite::iter().map(|s| s.to_string()).collect(),
            AssetCategory::Cards => EmbeddedCards::iter()
                .map(|s| format!("{CARDS_DIR}/{s}"))
                .collect(),
            AssetCategory::Config => vec![CONFIG_NAME.to_string()],
        }
    }
}
