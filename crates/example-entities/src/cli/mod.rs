//! Library side of the `example-entities` binary.
//!
//! The binary only loads settings, installs logging, and writes output; the
//! provider wiring and generation live here so they can be tested without
//! spawning a process.

mod error;

#[cfg(test)]
mod tests;

pub use error::CliError;

use std::path::Path;

use camino::Utf8Path;
use cap_std::ambient_authority;
use cap_std::fs::Dir;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use tracing::info;

use crate::entity::{Entity, EntityKind};
use crate::locale::{Locale, LocaleBundle, LocaleRegistry};
use crate::overrides::Overrides;
use crate::provider::EntityProvider;
use crate::settings::GeneratorSettings;
use crate::store::DataStore;

/// Builds a provider over the built-in registry, replacing the configured
/// locale's tables when a tables file is set.
///
/// # Errors
///
/// Returns [`CliError`] if the locale is unknown or the tables file cannot be
/// read or does not satisfy the locale's field specs.
pub fn build_provider(settings: &GeneratorSettings) -> Result<EntityProvider, CliError> {
    let mut registry = LocaleRegistry::builtin()?;
    if let Some(path) = settings.tables_path.as_deref() {
        let locale: Locale = settings.locale().parse()?;
        let store = load_tables(path)?;
        registry = registry.with_bundle(LocaleBundle::new(locale, store)?);
    }
    Ok(EntityProvider::new(registry))
}

/// Generates `settings.count` entities from a ChaCha RNG seeded with
/// `seed`.
///
/// # Errors
///
/// Returns [`CliError`] if the kind is unknown or any entity fails to
/// generate.
///
/// # Example
///
/// ```
/// use example_entities::{Entity, GeneratorSettings};
/// use example_entities::cli::{build_provider, generate};
///
/// let settings = GeneratorSettings {
///     locale: Some("pl".to_owned()),
///     kind: Some("company".to_owned()),
///     seed: None,
///     count: 2,
///     tables_path: None,
///     overrides: vec!["domain=acme.pl".to_owned()],
/// };
///
/// let provider = build_provider(&settings).expect("provider");
/// let first = generate(&provider, &settings, 11).expect("entities");
/// let again = generate(&provider, &settings, 11).expect("entities");
/// assert_eq!(first.len(), 2);
/// assert_eq!(first, again);
/// assert!(first.iter().all(|entity| {
///     matches!(entity, Entity::Company(company) if company.domain() == "acme.pl")
/// }));
/// ```
pub fn generate(
    provider: &EntityProvider,
    settings: &GeneratorSettings,
    seed: u64,
) -> Result<Vec<Entity>, CliError> {
    let kind: EntityKind = settings
        .kind()
        .parse()
        .map_err(|message| CliError::InvalidKind {
            value: settings.kind().to_owned(),
            message,
        })?;
    let overrides: Overrides = settings.override_pairs().collect();
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    info!(
        locale = settings.locale(),
        %kind,
        seed,
        count = settings.count,
        "generating entities"
    );
    (0..settings.count)
        .map(|_| Ok(provider.get(kind, settings.locale(), &overrides, &mut rng)?))
        .collect()
}

/// Renders an entity as one line of JSON.
///
/// # Errors
///
/// Returns [`CliError::Serialize`] if serialization fails.
pub fn render(entity: &Entity) -> Result<String, CliError> {
    serde_json::to_string(entity).map_err(|e| CliError::Serialize {
        message: e.to_string(),
    })
}

fn load_tables(path: &Path) -> Result<DataStore, CliError> {
    let utf8 = Utf8Path::from_path(path).ok_or_else(|| CliError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    let file_name = utf8.file_name().ok_or_else(|| CliError::NonUtf8Path {
        path: path.to_path_buf(),
    })?;
    let parent = utf8
        .parent()
        .filter(|parent| !parent.as_str().is_empty())
        .unwrap_or_else(|| Utf8Path::new("."));
    let dir = Dir::open_ambient_dir(parent, ambient_authority()).map_err(|e| {
        CliError::TablesDirectory {
            path: parent.as_std_path().to_path_buf(),
            message: e.to_string(),
        }
    })?;
    Ok(DataStore::from_file(&dir, Utf8Path::new(file_name))?)
}
