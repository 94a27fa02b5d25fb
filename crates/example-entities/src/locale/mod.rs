//! Locale registry.
//!
//! A locale tag selects a [`LocaleBundle`]: the locale's data store, its
//! checksum codecs, and one resolution plan per entity kind. Bundles are
//! validated when built, so a registry that constructs successfully can only
//! fail at request time on caller input.

mod rules;

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::checksum::IdentifierCodec;
use crate::entity::EntityKind;
use crate::error::ConfigurationError;
use crate::plan::{FieldRule, FieldSpec, ResolutionPlan};
use crate::store::DataStore;

/// The locales with built-in rules.
///
/// Each variant carries its own address layout, name order, and field specs;
/// the variant is chosen once when a bundle is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    /// Polish.
    Pl,
    /// Chinese (mainland).
    Zh,
    /// English (United States layout).
    En,
}

impl Locale {
    /// All built-in locales.
    pub const ALL: [Self; 3] = [Self::Pl, Self::Zh, Self::En];

    /// Returns the short tag, e.g. `"pl"`.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::Pl => "pl",
            Self::Zh => "zh",
            Self::En => "en",
        }
    }

    /// Returns the built-in field specs for `kind`.
    #[must_use]
    pub const fn field_specs(self, kind: EntityKind) -> &'static [FieldSpec] {
        rules::field_specs(self, kind)
    }

    /// Returns the checksum codecs the built-in specs use.
    #[must_use]
    pub const fn checksum_codecs(self) -> &'static [IdentifierCodec] {
        match self {
            Self::Pl => &[IdentifierCodec::Pesel, IdentifierCodec::Nip],
            Self::Zh => &[IdentifierCodec::ResidentId, IdentifierCodec::CreditCode],
            Self::En => &[],
        }
    }

    const fn builtin_tables(self) -> &'static str {
        match self {
            Self::Pl => include_str!("../../data/pl.json"),
            Self::Zh => include_str!("../../data/zh.json"),
            Self::En => include_str!("../../data/en.json"),
        }
    }
}

impl fmt::Display for Locale {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for Locale {
    type Err = ConfigurationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tag = s.trim();
        Self::ALL
            .into_iter()
            .find(|locale| locale.tag().eq_ignore_ascii_case(tag))
            .ok_or_else(|| ConfigurationError::UnknownLocale {
                tag: s.to_owned(),
            })
    }
}

/// Everything needed to generate entities for one locale.
#[derive(Debug, Clone)]
pub struct LocaleBundle {
    locale: Locale,
    store: Arc<DataStore>,
    codecs: Vec<IdentifierCodec>,
    plans: BTreeMap<EntityKind, ResolutionPlan>,
}

impl LocaleBundle {
    /// Builds a bundle from the locale's built-in specs and codecs over the
    /// supplied store.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the store lacks a table the specs
    /// read.
    pub fn new(locale: Locale, store: DataStore) -> Result<Self, ConfigurationError> {
        let specs = EntityKind::ALL
            .into_iter()
            .map(|kind| (kind, locale.field_specs(kind).to_vec()))
            .collect();
        Self::with_specs(locale, store, specs, locale.checksum_codecs().to_vec())
    }

    /// Builds a bundle from the locale's embedded data tables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the embedded tables are invalid.
    pub fn builtin(locale: Locale) -> Result<Self, ConfigurationError> {
        Self::new(locale, DataStore::from_json(locale.builtin_tables())?)
    }

    /// Builds a bundle from explicit specs.
    ///
    /// Kinds absent from `specs` are unsupported by the bundle. Each present
    /// kind must declare every field of the kind, form an acyclic plan, read
    /// only tables the store holds, and nest only kinds the bundle supports.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] describing the first problem found.
    pub fn with_specs(
        locale: Locale,
        store: DataStore,
        specs: BTreeMap<EntityKind, Vec<FieldSpec>>,
        codecs: Vec<IdentifierCodec>,
    ) -> Result<Self, ConfigurationError> {
        let plans = specs
            .into_iter()
            .map(|(kind, kind_specs)| Ok((kind, ResolutionPlan::new(kind, kind_specs)?)))
            .collect::<Result<BTreeMap<_, _>, ConfigurationError>>()?;

        for plan in plans.values() {
            validate_plan(plan, &plans, &store, &codecs)?;
        }

        Ok(Self {
            locale,
            store: Arc::new(store),
            codecs,
            plans,
        })
    }

    /// Returns the bundle's locale.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the shared data store.
    #[must_use]
    pub fn store(&self) -> &DataStore {
        &self.store
    }

    /// Returns the checksum codecs available in this locale.
    #[must_use]
    pub fn checksum_codecs(&self) -> &[IdentifierCodec] {
        &self.codecs
    }

    /// Returns `true` when the bundle can generate `kind`.
    #[must_use]
    pub fn supports(&self, kind: EntityKind) -> bool {
        self.plans.contains_key(&kind)
    }

    /// Returns the resolution plan for `kind`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::MissingFieldSpec`] for an unsupported
    /// kind.
    pub fn plan(&self, kind: EntityKind) -> Result<&ResolutionPlan, ConfigurationError> {
        self.plans
            .get(&kind)
            .ok_or(ConfigurationError::MissingFieldSpec { kind, field: None })
    }
}

fn validate_plan(
    plan: &ResolutionPlan,
    plans: &BTreeMap<EntityKind, ResolutionPlan>,
    store: &DataStore,
    codecs: &[IdentifierCodec],
) -> Result<(), ConfigurationError> {
    let kind = plan.kind();
    if let Some(field) = kind
        .field_names()
        .iter()
        .find(|field| plan.spec(field).is_none())
    {
        return Err(ConfigurationError::MissingFieldSpec {
            kind,
            field: Some((*field).to_owned()),
        });
    }

    for spec in plan.order() {
        let rule = spec.rule();
        let picked = match rule {
            FieldRule::Pick { table } => Some(table),
            _ => None,
        };
        if let Some(table) = picked
            .into_iter()
            .chain(rule.tables().iter().copied())
            .find(|table| !store.contains(table))
        {
            return Err(ConfigurationError::UnknownTableKey {
                key: table.to_owned(),
            });
        }
        match rule {
            FieldRule::Nested(nested) if !plans.contains_key(&nested) => {
                return Err(ConfigurationError::MissingFieldSpec {
                    kind: nested,
                    field: None,
                });
            }
            FieldRule::Checksum(codec) if !codecs.contains(&codec) => {
                return Err(ConfigurationError::UnavailableCodec {
                    kind,
                    field: spec.name().to_owned(),
                    codec,
                });
            }
            _ => {}
        }
    }
    Ok(())
}

/// Locale tag → bundle lookup.
///
/// Built once at startup and shared read-only afterwards.
///
/// # Example
///
/// ```
/// use example_entities::{ConfigurationError, Locale, LocaleRegistry};
///
/// let registry = LocaleRegistry::builtin().expect("embedded tables are valid");
///
/// assert_eq!(registry.bundle("PL").map(|b| b.locale()), Ok(Locale::Pl));
/// assert_eq!(
///     registry.bundle("de").map(|b| b.locale()),
///     Err(ConfigurationError::UnknownLocale { tag: "de".to_owned() })
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct LocaleRegistry {
    bundles: BTreeMap<Locale, Arc<LocaleBundle>>,
}

impl LocaleRegistry {
    /// Creates a registry with no bundles.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding every built-in locale.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if any embedded bundle is invalid.
    pub fn builtin() -> Result<Self, ConfigurationError> {
        Locale::ALL
            .into_iter()
            .try_fold(Self::new(), |registry, locale| {
                Ok(registry.with_bundle(LocaleBundle::builtin(locale)?))
            })
    }

    /// Adds or replaces the bundle for its locale.
    #[must_use]
    pub fn with_bundle(mut self, bundle: LocaleBundle) -> Self {
        info!(
            locale = %bundle.locale(),
            tables = bundle.store().keys().count(),
            kinds = bundle.plans.len(),
            "locale bundle registered"
        );
        self.bundles.insert(bundle.locale(), Arc::new(bundle));
        self
    }

    /// Returns the registered locales.
    pub fn locales(&self) -> impl Iterator<Item = Locale> + '_ {
        self.bundles.keys().copied()
    }

    /// Looks up the bundle for a locale tag.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownLocale`] when the tag is not a
    /// known locale or has no registered bundle. There is no fallback locale.
    pub fn bundle(&self, tag: &str) -> Result<&LocaleBundle, ConfigurationError> {
        let locale: Locale = tag.parse()?;
        self.bundles
            .get(&locale)
            .map(AsRef::as_ref)
            .ok_or_else(|| ConfigurationError::UnknownLocale {
                tag: tag.to_owned(),
            })
    }
}
