//! Caller-pinned field values.

use std::collections::BTreeMap;

/// Separates a nested entity field from one of its own fields.
pub const PATH_SEPARATOR: char = '.';

/// Field values pinned by the caller before resolution.
///
/// Pinned values are used verbatim: they are never re-derived and never
/// checked against the fields derived from them. Fields of a nested entity
/// are pinned with a dotted path such as `address.city`.
///
/// # Example
///
/// ```
/// use example_entities::{Overrides, Person};
///
/// let overrides = Overrides::new()
///     .pin(Person::SEX, "female")
///     .pin("address.city", "Gdańsk");
///
/// assert_eq!(overrides.get("sex"), Some("female"));
/// assert_eq!(overrides.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Overrides {
    values: BTreeMap<String, String>,
}

impl Overrides {
    /// Creates an empty set of overrides.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Pins `field` to `value`, replacing any earlier pin of the same field.
    #[must_use]
    pub fn pin(mut self, field: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(field.into(), value.into());
        self
    }

    /// Returns the pinned value for `field`.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.values.get(field).map(String::as_str)
    }

    /// Returns the number of pinned fields.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` when nothing is pinned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over pinned `(field, value)` pairs in field order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the overrides under `field.`, with that prefix removed.
    pub(crate) fn nested(&self, field: &str) -> Self {
        self.values
            .iter()
            .filter_map(|(name, value)| {
                let (head, tail) = name.split_once(PATH_SEPARATOR)?;
                (head == field).then(|| (tail.to_owned(), value.clone()))
            })
            .collect()
    }
}

impl<K, V> FromIterator<(K, V)> for Overrides
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            values: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_pins_replace_earlier_ones() {
        let overrides = Overrides::new().pin("name", "Acme").pin("name", "Initech");
        assert_eq!(overrides.get("name"), Some("Initech"));
        assert_eq!(overrides.len(), 1);
    }

    #[test]
    fn nested_strips_the_prefix() {
        let overrides: Overrides = [
            ("address.city", "Gdańsk"),
            ("address.street", "Długa"),
            ("addressee", "nobody"),
            ("firstName", "Anna"),
        ]
        .into_iter()
        .collect();

        let nested = overrides.nested("address");
        assert_eq!(
            nested.iter().collect::<Vec<_>>(),
            vec![("city", "Gdańsk"), ("street", "Długa")]
        );
    }

    #[test]
    fn empty_overrides_report_empty() {
        assert!(Overrides::new().is_empty());
        assert!(Overrides::new().nested("address").is_empty());
    }
}
