use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

/// Root configuration structure, deserialized from `.license-catalog/config.toml`.
///
/// Every section is optional; missing fields take the built-in defaults.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    pub filter: FilterConfig,
    pub archive: ArchiveConfig,
    pub classifier: ClassifierConfig,
    pub output: OutputConfig,
    pub resolver: ResolverConfig,
}

/// Which coordinates are opened as aggregated license containers.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Allow-listed groups, compared case-insensitively.
    pub groups: Vec<String>,
    /// Leading version component from which artifacts use the granular format.
    pub granular_base_version: u64,
    /// Artifact-name suffix that marks a dedicated license artifact.
    pub license_suffix: String,
}

impl Default for FilterConfig {
    fn default() -> Self {
        FilterConfig {
            groups: vec![
                "com.google.android.gms".to_string(),
                "com.google.firebase".to_string(),
            ],
            granular_base_version: 14,
            license_suffix: "-license".to_string(),
        }
    }
}

/// Names of the two entries inside a license container archive.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub index_entry: String,
    pub text_entry: String,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        ArchiveConfig {
            index_entry: "third_party_licenses.json".to_string(),
            text_entry: "third_party_licenses.txt".to_string(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Extra signatures, tried after the built-in ones.
    pub patterns: Vec<PatternConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PatternConfig {
    pub name: String,
    pub regex: String,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Filename prefix marking a file as machine-generated and replaceable.
    pub generated_prefix: String,
    /// Prefix of every library `unique_id`.
    pub namespace: String,
    /// Also write a `.txt` copy of each license body.
    pub write_plain_text: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        OutputConfig {
            generated_prefix: "gen_".to_string(),
            namespace: "bundled".to_string(),
            write_plain_text: true,
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Maven-layout repository roots, searched in order.
    pub repositories: Vec<PathBuf>,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        let repositories = dirs::home_dir()
            .map(|home| vec![home.join(".m2").join("repository")])
            .unwrap_or_default();
        ResolverConfig { repositories }
    }
}

/// Load the configuration, searching in order:
///
/// 1. `config_override` — path passed via `--config`
/// 2. `<project_path>/.license-catalog/config.toml`
/// 3. `~/.config/license-catalog/config.toml`
/// 4. Built-in [`Config::default`]
pub fn load_config(project_path: &Path, config_override: Option<&Path>) -> Result<Config> {
    if let Some(path) = config_override {
        let content = std::fs::read_to_string(path)?;
        return Ok(toml::from_str(&content)?);
    }

    let project_config = project_path.join(".license-catalog").join("config.toml");
    if project_config.exists() {
        let content = std::fs::read_to_string(&project_config)?;
        return Ok(toml::from_str(&content)?);
    }

    if let Some(home) = dirs::home_dir() {
        let home_config = home
            .join(".config")
            .join("license-catalog")
            .join("config.toml");
        if home_config.exists() {
            let content = std::fs::read_to_string(&home_config)?;
            return Ok(toml::from_str(&content)?);
        }
    }

    Ok(Config::default())
}
