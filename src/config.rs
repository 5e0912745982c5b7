//! Configuration for schema generation
//!
//! Supports loading configuration from:
//! - Default values
//! - Config file (tsoas.toml)
//! - Environment variables (TSOAS__*)
//!
//! The loaded value is handed to [`crate::SchemaGenerator::new`]; nothing is
//! kept in process-wide state.
//!
//! ## Example config file (tsoas.toml):
//! ```toml
//! [schema]
//! ref_prefix = "#/components/schemas/"
//!
//! [output]
//! format = "pretty"
//! layout = "components"
//!
//! [analysis]
//! warn_dangling = true
//! ```

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration for the generator
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Schema shape settings
    #[serde(default)]
    pub schema: SchemaSettings,

    /// Rendering settings
    #[serde(default)]
    pub output: OutputConfig,

    /// Reference analysis settings
    #[serde(default)]
    pub analysis: AnalysisConfig,
}

/// Schema shape settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SchemaSettings {
    /// Prefix of every `$ref`
    #[serde(default = "default_ref_prefix")]
    pub ref_prefix: String,
}

/// Rendering settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Output format (pretty or compact)
    #[serde(default)]
    pub format: OutputFormat,

    /// Bare schema map, or wrapped under `components.schemas`
    #[serde(default)]
    pub layout: DocumentLayout,
}

/// Output format for JSON
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Pretty,
    Compact,
}

/// Shape of the rendered document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum DocumentLayout {
    /// `{"Name": {...}}`
    #[default]
    Schemas,
    /// `{"components": {"schemas": {"Name": {...}}}}`
    Components,
}

/// Reference analysis settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Log properties whose type names no definition
    #[serde(default = "default_true")]
    pub warn_dangling: bool,
}

// Default value functions
fn default_ref_prefix() -> String {
    "#/components/schemas/".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SchemaSettings {
    fn default() -> Self {
        Self {
            ref_prefix: default_ref_prefix(),
        }
    }
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            warn_dangling: true,
        }
    }
}

impl GeneratorConfig {
    /// Load configuration from the default locations, then `config_path`
    /// when given
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        // Load from default locations
        let config_locations = ["tsoas.toml", ".tsoas.toml", "config/tsoas.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        // Load from XDG config directory
        if let Some(config_dir) = directories::ProjectDirs::from("dev", "tsoas", "ts-openapi") {
            let xdg_config = config_dir.config_dir().join("tsoas.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        // Load from specified path
        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // Load from environment variables (TSOAS__*)
        builder = builder.add_source(
            Environment::with_prefix("TSOAS")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = GeneratorConfig::default();
        assert_eq!(config.schema.ref_prefix, "#/components/schemas/");
        assert_eq!(config.output.format, OutputFormat::Pretty);
        assert_eq!(config.output.layout, DocumentLayout::Schemas);
        assert!(config.analysis.warn_dangling);
    }

    #[test]
    fn test_serialize_config() {
        let config = GeneratorConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[schema]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains("layout = \"schemas\""));
    }

    #[test]
    fn test_load_explicit_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[schema]\nref_prefix = \"#/definitions/\"\n\n[output]\nformat = \"compact\"\n",
        )
        .unwrap();

        let config = GeneratorConfig::load_from(path.to_str()).unwrap();
        assert_eq!(config.schema.ref_prefix, "#/definitions/");
        assert_eq!(config.output.format, OutputFormat::Compact);
        assert!(config.analysis.warn_dangling);
    }

    #[test]
    fn test_save_then_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = GeneratorConfig::default();
        config.output.layout = DocumentLayout::Components;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = GeneratorConfig::load_from(path.to_str()).unwrap();
        assert_eq!(loaded.output.layout, DocumentLayout::Components);
    }
}
