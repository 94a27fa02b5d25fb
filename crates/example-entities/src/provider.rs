//! Entity resolution.
//!
//! The provider looks up the bundle for the requested locale, seeds the
//! caller's overrides, and walks the kind's resolution plan so that every
//! field is derived after the fields it reads. Nested entities are resolved
//! with their own plan and the overrides under their dotted prefix.

use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::entity::{Address, Company, Entity, EntityKind, FieldValue, FieldValues, Person};
use crate::error::{ConfigurationError, GenerationError};
use crate::locale::{LocaleBundle, LocaleRegistry};
use crate::overrides::{Overrides, PATH_SEPARATOR};
use crate::plan::FieldRule;
use crate::store::DataStore;

/// Per-field view handed to formatters and codecs while a field resolves.
///
/// Exposes the sibling values resolved so far, the locale's data store, and
/// the request's random source.
pub struct Resolution<'a> {
    kind: EntityKind,
    field: &'static str,
    values: &'a FieldValues,
    store: &'a DataStore,
    rng: &'a mut dyn RngCore,
}

impl<'a> Resolution<'a> {
    /// Returns the field being resolved.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        self.field
    }

    /// Returns the resolved text value of a sibling field.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownDependency`] when the sibling has
    /// not been resolved yet, which means the field spec does not list it as
    /// a dependency.
    pub fn text(&self, field: &str) -> Result<&'a str, GenerationError> {
        self.values.text(field).ok_or_else(|| {
            ConfigurationError::UnknownDependency {
                kind: self.kind,
                field: self.field.to_owned(),
                dependency: field.to_owned(),
            }
            .into()
        })
    }

    /// Picks a random entry from a data table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownTableKey`] for an unknown table.
    pub fn pick(&mut self, table: &str) -> Result<&'a str, GenerationError> {
        Ok(self.store.pick(table, &mut *self.rng)?)
    }

    /// Returns the request's random source.
    pub fn rng(&mut self) -> &mut dyn RngCore {
        &mut *self.rng
    }
}

/// Generates entities for any registered locale.
///
/// The provider holds no per-request state; one instance may serve requests
/// from many threads, each supplying its own random source.
///
/// # Example
///
/// ```
/// use example_entities::{EntityProvider, LocaleRegistry, Overrides};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let provider = EntityProvider::new(LocaleRegistry::builtin().expect("registry"));
/// let mut rng = ChaCha8Rng::seed_from_u64(42);
/// let overrides = Overrides::new().pin("name", "Acme Corp");
///
/// let company = provider.company("en", &overrides, &mut rng).expect("company");
/// assert_eq!(company.name(), "Acme Corp");
/// assert!(company.domain().starts_with("acmecorp."));
/// assert!(company.email().ends_with(&format!("@{}", company.domain())));
/// ```
#[derive(Debug, Clone)]
pub struct EntityProvider {
    registry: Arc<LocaleRegistry>,
}

impl EntityProvider {
    /// Creates a provider over `registry`.
    #[must_use]
    pub fn new(registry: LocaleRegistry) -> Self {
        Self::from_shared(Arc::new(registry))
    }

    /// Creates a provider over an already shared registry.
    #[must_use]
    pub const fn from_shared(registry: Arc<LocaleRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry backing this provider.
    #[must_use]
    pub fn registry(&self) -> &LocaleRegistry {
        &self.registry
    }

    /// Generates an entity of `kind` for the locale `tag`.
    ///
    /// Pinned fields are used verbatim; fields derived from them read the
    /// pinned values. Fields of a nested entity are pinned as
    /// `<field>.<nested field>`.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError`] when the locale is unknown, an override
    /// names a field the kind does not have, a pinned value cannot be
    /// interpreted, or the bundle is misconfigured.
    pub fn get<R: RngCore>(
        &self,
        kind: EntityKind,
        tag: &str,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<Entity, GenerationError> {
        match kind {
            EntityKind::Person => self.person(tag, overrides, rng).map(Entity::Person),
            EntityKind::Company => self.company(tag, overrides, rng).map(Entity::Company),
            EntityKind::Address => self.address(tag, overrides, rng).map(Entity::Address),
        }
    }

    /// Generates a person.
    ///
    /// # Errors
    ///
    /// See [`EntityProvider::get`].
    pub fn person<R: RngCore>(
        &self,
        tag: &str,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<Person, GenerationError> {
        let bundle = self.registry.bundle(tag)?;
        let values = resolve_logged(bundle, EntityKind::Person, overrides, rng)?;
        Person::from_fields(bundle.locale(), values)
    }

    /// Generates a company.
    ///
    /// # Errors
    ///
    /// See [`EntityProvider::get`].
    pub fn company<R: RngCore>(
        &self,
        tag: &str,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<Company, GenerationError> {
        let bundle = self.registry.bundle(tag)?;
        let values = resolve_logged(bundle, EntityKind::Company, overrides, rng)?;
        Company::from_fields(values)
    }

    /// Generates a postal address.
    ///
    /// # Errors
    ///
    /// See [`EntityProvider::get`].
    pub fn address<R: RngCore>(
        &self,
        tag: &str,
        overrides: &Overrides,
        rng: &mut R,
    ) -> Result<Address, GenerationError> {
        let bundle = self.registry.bundle(tag)?;
        let values = resolve_logged(bundle, EntityKind::Address, overrides, rng)?;
        Address::from_fields(bundle.locale(), values)
    }
}

fn resolve_logged(
    bundle: &LocaleBundle,
    kind: EntityKind,
    overrides: &Overrides,
    rng: &mut dyn RngCore,
) -> Result<FieldValues, GenerationError> {
    let values = resolve(bundle, kind, overrides, rng)?;
    debug!(
        locale = %bundle.locale(),
        %kind,
        pinned = overrides.len(),
        "entity resolved"
    );
    Ok(values)
}

fn resolve(
    bundle: &LocaleBundle,
    kind: EntityKind,
    overrides: &Overrides,
    rng: &mut dyn RngCore,
) -> Result<FieldValues, GenerationError> {
    check_overrides(bundle, kind, overrides)?;
    let plan = bundle.plan(kind)?;

    let mut values = FieldValues::default();
    for spec in plan.order() {
        let name = spec.name();
        let value = match spec.rule() {
            FieldRule::Nested(nested) => FieldValue::Nested(resolve(
                bundle,
                nested,
                &overrides.nested(name),
                &mut *rng,
            )?),
            rule => {
                if let Some(pinned) = overrides.get(name) {
                    FieldValue::Text(pinned.to_owned())
                } else {
                    let mut resolution = Resolution {
                        kind,
                        field: name,
                        values: &values,
                        store: bundle.store(),
                        rng: &mut *rng,
                    };
                    FieldValue::Text(derive(rule, &mut resolution)?)
                }
            }
        };
        values.insert(name, value);
    }
    Ok(values)
}

fn derive(rule: FieldRule, resolution: &mut Resolution<'_>) -> Result<String, GenerationError> {
    match rule {
        FieldRule::Pick { table } => Ok(resolution.pick(table)?.to_owned()),
        FieldRule::Format { format, .. } => format(resolution),
        FieldRule::Checksum(codec) => codec.generate(resolution.field(), resolution),
        FieldRule::Nested(kind) => Err(GenerationError::NestedOverride {
            kind,
            field: resolution.field().to_owned(),
        }),
    }
}

/// Rejects overrides naming fields the kind lacks or pinning a nested entity
/// as a whole.
fn check_overrides(
    bundle: &LocaleBundle,
    kind: EntityKind,
    overrides: &Overrides,
) -> Result<(), GenerationError> {
    let plan = bundle.plan(kind)?;
    for (field, _) in overrides.iter() {
        let (head, is_path) = field
            .split_once(PATH_SEPARATOR)
            .map_or((field, false), |(head, _)| (head, true));
        let nested = match plan.spec(head).map(|spec| spec.rule()) {
            Some(FieldRule::Nested(_)) => true,
            Some(_) => false,
            None => {
                return Err(GenerationError::UnknownField {
                    kind,
                    field: field.to_owned(),
                });
            }
        };
        match (nested, is_path) {
            (true, false) => {
                return Err(GenerationError::NestedOverride {
                    kind,
                    field: field.to_owned(),
                });
            }
            (false, true) => {
                return Err(GenerationError::UnknownField {
                    kind,
                    field: field.to_owned(),
                });
            }
            _ => {}
        }
    }
    Ok(())
}
