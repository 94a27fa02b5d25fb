//! Generator configuration loaded via OrthoConfig.

use std::path::PathBuf;

use ortho_config::OrthoConfig;
use serde::Deserialize;

const DEFAULT_LOCALE: &str = "en";
const DEFAULT_KIND: &str = "person";
const DEFAULT_COUNT: usize = 1;

/// Settings for the `example-entities` generator binary.
///
/// Values come from command-line flags, `EXAMPLE_ENTITIES_*` environment
/// variables, or a configuration file, in that order of precedence.
#[derive(Debug, Clone, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "EXAMPLE_ENTITIES")]
pub struct GeneratorSettings {
    /// Locale tag to generate for.
    pub locale: Option<String>,
    /// Entity kind to generate (`person`, `company`, or `address`).
    pub kind: Option<String>,
    /// RNG seed; a random seed is drawn when absent.
    pub seed: Option<u64>,
    /// Number of entities to generate.
    #[ortho_config(default = DEFAULT_COUNT)]
    pub count: usize,
    /// Optional data table file replacing the locale's built-in tables.
    pub tables_path: Option<PathBuf>,
    /// Field overrides as `field=value` pairs.
    ///
    /// The environment variable takes a comma-separated list; the flag may
    /// be repeated.
    #[serde(default)]
    pub overrides: Vec<String>,
}

impl GeneratorSettings {
    /// Return the configured locale tag, falling back to `en`.
    #[must_use]
    pub fn locale(&self) -> &str {
        self.locale.as_deref().unwrap_or(DEFAULT_LOCALE)
    }

    /// Return the configured entity kind name, falling back to `person`.
    #[must_use]
    pub fn kind(&self) -> &str {
        self.kind.as_deref().unwrap_or(DEFAULT_KIND)
    }

    /// Return the configured overrides as `(field, value)` pairs.
    ///
    /// Entries without `=` are ignored.
    pub fn override_pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.overrides
            .iter()
            .filter_map(|pair| pair.split_once('='))
            .map(|(field, value)| (field.trim(), value.trim()))
    }
}
