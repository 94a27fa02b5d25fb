//! Field specs and resolution plans.
//!
//! A field spec names one field of an entity kind, the rule that derives it,
//! and the sibling fields that must hold values first. A resolution plan is
//! the kind's specs in a dependency-respecting order, computed once when a
//! locale bundle is built so that cycles surface before any request runs.

use std::collections::{BTreeMap, BTreeSet, VecDeque};

use crate::checksum::IdentifierCodec;
use crate::entity::EntityKind;
use crate::error::{ConfigurationError, GenerationError};
use crate::provider::Resolution;

/// Derives a field value from already-resolved siblings, the data store, and
/// the request's random source.
pub type FormatFn = fn(&mut Resolution<'_>) -> Result<String, GenerationError>;

/// How a single field is derived.
#[derive(Debug, Clone, Copy)]
pub enum FieldRule {
    /// Uniform pick from one data table.
    Pick {
        /// Table key.
        table: &'static str,
    },
    /// Composition by a locale formatter.
    Format {
        /// The formatter.
        format: FormatFn,
        /// Tables the formatter reads, checked when the bundle is built.
        tables: &'static [&'static str],
    },
    /// A self-validating identifier.
    Checksum(IdentifierCodec),
    /// A nested entity resolved with its own plan.
    Nested(EntityKind),
}

impl FieldRule {
    /// Tables the rule reads.
    pub(crate) const fn tables(&self) -> &'static [&'static str] {
        match self {
            Self::Pick { .. } | Self::Nested(_) => &[],
            Self::Format { tables, .. } => *tables,
            Self::Checksum(codec) => codec.tables(),
        }
    }
}

/// Declaration of one entity field.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    name: &'static str,
    rule: FieldRule,
    depends_on: &'static [&'static str],
}

impl FieldSpec {
    /// A field picked from `table`.
    #[must_use]
    pub const fn pick(name: &'static str, table: &'static str) -> Self {
        Self {
            name,
            rule: FieldRule::Pick { table },
            depends_on: &[],
        }
    }

    /// A field composed by `format`, reading `tables` and the fields in
    /// `depends_on`.
    #[must_use]
    pub const fn format(
        name: &'static str,
        format: FormatFn,
        tables: &'static [&'static str],
        depends_on: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            rule: FieldRule::Format { format, tables },
            depends_on,
        }
    }

    /// A field generated by an identifier codec from the fields in
    /// `depends_on`.
    #[must_use]
    pub const fn checksum(
        name: &'static str,
        codec: IdentifierCodec,
        depends_on: &'static [&'static str],
    ) -> Self {
        Self {
            name,
            rule: FieldRule::Checksum(codec),
            depends_on,
        }
    }

    /// A field holding a nested entity of `kind`.
    #[must_use]
    pub const fn nested(name: &'static str, kind: EntityKind) -> Self {
        Self {
            name,
            rule: FieldRule::Nested(kind),
            depends_on: &[],
        }
    }

    /// Returns the field name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the derivation rule.
    #[must_use]
    pub const fn rule(&self) -> FieldRule {
        self.rule
    }

    /// Returns the fields that must resolve first.
    #[must_use]
    pub const fn depends_on(&self) -> &'static [&'static str] {
        self.depends_on
    }
}

/// The specs of one entity kind in resolution order.
#[derive(Debug, Clone)]
pub struct ResolutionPlan {
    kind: EntityKind,
    order: Vec<FieldSpec>,
}

impl ResolutionPlan {
    /// Orders `specs` so every field follows its dependencies.
    ///
    /// Among fields whose dependencies are satisfied, declaration order wins,
    /// so the plan is stable for a given spec list.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] for duplicate names, dependencies on
    /// undeclared fields, or dependency cycles.
    pub fn new(kind: EntityKind, specs: Vec<FieldSpec>) -> Result<Self, ConfigurationError> {
        let mut positions = BTreeMap::new();
        for (index, spec) in specs.iter().enumerate() {
            if positions.insert(spec.name, index).is_some() {
                return Err(ConfigurationError::DuplicateFieldSpec {
                    kind,
                    field: spec.name.to_owned(),
                });
            }
        }

        let mut pending = vec![0usize; specs.len()];
        let mut dependents: Vec<Vec<usize>> = vec![Vec::new(); specs.len()];
        for (index, spec) in specs.iter().enumerate() {
            for dependency in spec.depends_on {
                let Some(&parent) = positions.get(dependency) else {
                    return Err(ConfigurationError::UnknownDependency {
                        kind,
                        field: spec.name.to_owned(),
                        dependency: (*dependency).to_owned(),
                    });
                };
                if let Some(count) = pending.get_mut(index) {
                    *count += 1;
                }
                if let Some(children) = dependents.get_mut(parent) {
                    children.push(index);
                }
            }
        }

        let mut ready: BTreeSet<usize> = pending
            .iter()
            .enumerate()
            .filter(|(_, count)| **count == 0)
            .map(|(index, _)| index)
            .collect();
        let mut ordered = VecDeque::with_capacity(specs.len());
        while let Some(index) = ready.pop_first() {
            ordered.push_back(index);
            for child in dependents.get(index).into_iter().flatten() {
                if let Some(count) = pending.get_mut(*child) {
                    *count -= 1;
                    if *count == 0 {
                        ready.insert(*child);
                    }
                }
            }
        }

        if ordered.len() != specs.len() {
            let fields = specs
                .iter()
                .enumerate()
                .filter(|(index, _)| !ordered.contains(index))
                .map(|(_, spec)| spec.name.to_owned())
                .collect();
            return Err(ConfigurationError::DependencyCycle { kind, fields });
        }

        let order = ordered
            .into_iter()
            .filter_map(|index| specs.get(index).copied())
            .collect();
        Ok(Self { kind, order })
    }

    /// Returns the entity kind the plan resolves.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        self.kind
    }

    /// Returns the specs in resolution order.
    #[must_use]
    pub fn order(&self) -> &[FieldSpec] {
        &self.order
    }

    /// Looks up the spec for `field`.
    #[must_use]
    pub fn spec(&self, field: &str) -> Option<&FieldSpec> {
        self.order.iter().find(|spec| spec.name == field)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn constant(_: &mut Resolution<'_>) -> Result<String, GenerationError> {
        Ok("x".to_owned())
    }

    fn names(plan: &ResolutionPlan) -> Vec<&'static str> {
        plan.order().iter().map(FieldSpec::name).collect()
    }

    #[test]
    fn dependencies_resolve_before_dependents() {
        let plan = ResolutionPlan::new(
            EntityKind::Company,
            vec![
                FieldSpec::format("email", constant, &[], &["domain"]),
                FieldSpec::format("domain", constant, &[], &["name"]),
                FieldSpec::pick("name", "companyNames"),
                FieldSpec::pick("taxId", "taxIds"),
            ],
        )
        .expect("acyclic specs");

        assert_eq!(names(&plan), vec!["name", "domain", "email", "taxId"]);
    }

    #[test]
    fn independent_fields_keep_declaration_order() {
        let plan = ResolutionPlan::new(
            EntityKind::Address,
            vec![
                FieldSpec::pick("street", "streets"),
                FieldSpec::pick("city", "cities"),
                FieldSpec::pick("postalCode", "postalCodes"),
            ],
        )
        .expect("acyclic specs");

        assert_eq!(names(&plan), vec!["street", "city", "postalCode"]);
    }

    #[test]
    fn cycles_are_rejected_with_the_fields_involved() {
        let result = ResolutionPlan::new(
            EntityKind::Company,
            vec![
                FieldSpec::pick("taxId", "taxIds"),
                FieldSpec::format("name", constant, &[], &["domain"]),
                FieldSpec::format("domain", constant, &[], &["name"]),
            ],
        );

        match result {
            Err(ConfigurationError::DependencyCycle { kind, fields }) => {
                assert_eq!(kind, EntityKind::Company);
                assert_eq!(fields, vec!["name".to_owned(), "domain".to_owned()]);
            }
            other => panic!("expected a cycle error, got {other:?}"),
        }
    }

    #[test]
    fn self_dependency_is_a_cycle() {
        let result = ResolutionPlan::new(
            EntityKind::Company,
            vec![FieldSpec::format("name", constant, &[], &["name"])],
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::DependencyCycle { .. })
        ));
    }

    #[test]
    fn undeclared_dependencies_are_rejected() {
        let result = ResolutionPlan::new(
            EntityKind::Company,
            vec![FieldSpec::format("email", constant, &[], &["domain"])],
        );
        assert_eq!(
            result.map(|plan| names(&plan)),
            Err(ConfigurationError::UnknownDependency {
                kind: EntityKind::Company,
                field: "email".to_owned(),
                dependency: "domain".to_owned(),
            })
        );
    }

    #[test]
    fn duplicate_fields_are_rejected() {
        let result = ResolutionPlan::new(
            EntityKind::Address,
            vec![
                FieldSpec::pick("city", "cities"),
                FieldSpec::pick("city", "towns"),
            ],
        );
        assert!(matches!(
            result,
            Err(ConfigurationError::DuplicateFieldSpec { .. })
        ));
    }
}
