use crate::assets::AssetLoader;
use crate::rendering::{default_anchors, AnchorSpec};
use crate::services::renderer::DEFAULT_TITLE_SUFFIX;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Application configuration loaded from folio.yaml
#[derive(Debug, Deserialize, Clone)]
pub struct AppConfig {
    /// HTML template (relative to the site directory)
    #[serde(default = "default_template")]
    pub template: PathBuf,

    /// Profile location: a path relative to the site directory or an http(s) URL
    #[serde(default = "default_data")]
    pub data: String,

    /// Where `folio render` writes the page
    #[serde(default = "default_output")]
    pub output: PathBuf,

    /// Appended to the owner's name in the page title
    #[serde(default = "default_title_suffix")]
    pub title_suffix: String,

    /// Directory with card template overrides
    #[serde(default)]
    pub cards_dir: Option<PathBuf>,

    /// Anchor overrides, merged over the built-in anchors
    #[serde(default)]
    pub anchors: BTreeMap<String, AnchorSpec>,
}

fn default_template() -> PathBuf {
    PathBuf::from("index.html")
}

fn default_data() -> String {
    "data.json".to_string()
}

fn default_output() -> PathBuf {
    PathBuf::from("dist/index.html")
}

fn default_title_suffix() -> String {
    DEFAULT_TITLE_SUFFIX.to_string()
}

impl AppConfig {
    /// Load configuration from AssetLoader (embedded or external)
    pub fn load_from_assets(loader: &AssetLoader) -> Self {
        match loader.read_config_string() {
            Ok(content) => match serde_yaml::from_str(&content) {
                Ok(config) => {
                    let config: Self = config;
                    tracing::info!(
                        template = %config.template.display(),
                        data = %config.data,
                        anchor_overrides = config.anchors.len(),
                        "Loaded configuration"
                    );
                    config
                }
                Err(e) => {
                    tracing::warn!(%e, "Failed to parse config, using defaults");
                    Self::default()
                }
            },
            Err(e) => {
                tracing::warn!(%e, "Failed to read config, using defaults");
                Self::default()
            }
        }
    }

    /// Built-in anchors with the configured overrides applied
    pub fn anchor_specs(&self) -> BTreeMap<String, AnchorSpec> {
        let mut specs = default_anchors();
        for (name, spec) in &self.anchors {
            specs.insert(name.clone(), spec.clone());
        }
        specs
    }

    /// Where `folio render` writes the page.
    ///
    /// A path given on the command line wins over `output`. Neither is
    /// resolved against the site directory.
    pub fn render_output(&self, requested: Option<PathBuf>) -> PathBuf {
        requested.unwrap_or_else(|| self.output.clone())
    }

    /// Whether the profile comes from a remote URL
    pub fn data_is_remote(&self) -> bool {
        self.data.starts_with("http://") || self.data.starts_with("https://")
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            template: default_template(),
            data: default_data(),
            output: default_output(),
            title_suffix: default_title_suffix(),
            cards_dir: None,
            anchors: BTreeMap::new(),
        }
    }
}
