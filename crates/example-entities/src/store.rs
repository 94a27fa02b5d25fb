//! Locale word lists.
//!
//! A data store maps table keys to non-empty candidate lists and hands out
//! uniformly random entries. Stores are built once, wrapped in an `Arc` by the
//! locale bundle, and only read afterwards.

use std::collections::BTreeMap;

use camino::Utf8Path;
use cap_std::fs::Dir;
use rand::RngCore;
use rand::seq::IndexedRandom;
use serde::Deserialize;

use crate::error::ConfigurationError;

/// Current supported data table document version.
const SUPPORTED_VERSION: u32 = 1;

/// Read-only key → word-list store for one locale.
///
/// # Example
///
/// ```
/// use example_entities::DataStore;
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let store = DataStore::from_json(r#"{
///     "version": 1,
///     "tables": { "domains": ["com", "net"] }
/// }"#).expect("valid tables");
///
/// let mut rng = ChaCha8Rng::seed_from_u64(1);
/// let suffix = store.pick("domains", &mut rng).expect("known table");
/// assert!(["com", "net"].contains(&suffix));
/// assert!(store.pick("cities", &mut rng).is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DataStore {
    tables: BTreeMap<String, Vec<String>>,
}

impl DataStore {
    /// Builds a store from key/list pairs.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::EmptyTable`] if any list is empty.
    pub fn from_tables<I, K, V>(tables: I) -> Result<Self, ConfigurationError>
    where
        I: IntoIterator<Item = (K, Vec<V>)>,
        K: Into<String>,
        V: Into<String>,
    {
        let tables = tables
            .into_iter()
            .map(|(key, values)| {
                let key = key.into();
                if values.is_empty() {
                    return Err(ConfigurationError::EmptyTable { key });
                }
                Ok((key, values.into_iter().map(Into::into).collect()))
            })
            .collect::<Result<BTreeMap<_, _>, _>>()?;

        Ok(Self { tables })
    }

    /// Parses a store from a JSON document.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the JSON is malformed, the version is
    /// unsupported, or a table is empty.
    pub fn from_json(json: &str) -> Result<Self, ConfigurationError> {
        let raw: RawDataTables =
            serde_json::from_str(json).map_err(|e| ConfigurationError::TableParse {
                message: e.to_string(),
            })?;

        if raw.version != SUPPORTED_VERSION {
            return Err(ConfigurationError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        Self::from_tables(raw.tables)
    }

    /// Loads a store from a JSON file inside `dir`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError`] if the file cannot be read or parsed.
    pub fn from_file(dir: &Dir, path: &Utf8Path) -> Result<Self, ConfigurationError> {
        let contents = dir
            .read_to_string(path)
            .map_err(|e| ConfigurationError::TableRead {
                path: path.as_std_path().to_path_buf(),
                message: e.to_string(),
            })?;

        Self::from_json(&contents)
    }

    /// Returns `true` when the store holds a table for `key`.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.tables.contains_key(key)
    }

    /// Returns the table keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    /// Returns the full candidate list for `key`.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownTableKey`] for an unknown key.
    pub fn table(&self, key: &str) -> Result<&[String], ConfigurationError> {
        self.tables
            .get(key)
            .map(Vec::as_slice)
            .ok_or_else(|| ConfigurationError::UnknownTableKey {
                key: key.to_owned(),
            })
    }

    /// Picks one entry of `key` uniformly at random.
    ///
    /// Draws are independent; the same entry may come up repeatedly.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigurationError::UnknownTableKey`] for an unknown key.
    pub fn pick<R>(&self, key: &str, rng: &mut R) -> Result<&str, ConfigurationError>
    where
        R: RngCore + ?Sized,
    {
        self.table(key)?
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| ConfigurationError::EmptyTable {
                key: key.to_owned(),
            })
    }
}

/// Raw JSON representation for deserialization.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawDataTables {
    version: u32,
    tables: BTreeMap<String, Vec<String>>,
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::{fixture, rstest};

    use super::*;

    const VALID_JSON: &str = r#"{
        "version": 1,
        "tables": {
            "cities": ["Kraków", "Gdańsk", "Poznań"],
            "domains": ["pl"]
        }
    }"#;

    #[fixture]
    fn store() -> DataStore {
        DataStore::from_json(VALID_JSON).expect("valid test tables")
    }

    #[rstest]
    fn parses_valid_tables(store: DataStore) {
        assert_eq!(store.keys().collect::<Vec<_>>(), vec!["cities", "domains"]);
        assert_eq!(store.table("domains"), Ok(&["pl".to_owned()][..]));
    }

    #[rstest]
    fn picks_only_listed_values(store: DataStore) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let seen: HashSet<_> = (0..200)
            .map(|_| store.pick("cities", &mut rng).expect("known key"))
            .collect();

        assert_eq!(seen.len(), 3, "uniform picks should reach every entry");
    }

    #[rstest]
    fn unknown_keys_are_configuration_errors(store: DataStore) {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        assert_eq!(
            store.pick("streets", &mut rng),
            Err(ConfigurationError::UnknownTableKey {
                key: "streets".to_owned()
            })
        );
    }

    #[rstest]
    #[case::malformed("not json")]
    #[case::missing_tables(r#"{"version": 1}"#)]
    fn rejects_json_with_parse_error(#[case] json: &str) {
        assert!(matches!(
            DataStore::from_json(json),
            Err(ConfigurationError::TableParse { .. })
        ));
    }

    #[rstest]
    #[case::unsupported_version(
        r#"{"version": 2, "tables": {}}"#,
        ConfigurationError::UnsupportedVersion { expected: 1, actual: 2 }
    )]
    #[case::empty_table(
        r#"{"version": 1, "tables": {"streets": []}}"#,
        ConfigurationError::EmptyTable { key: "streets".to_owned() }
    )]
    fn rejects_invalid_tables(#[case] json: &str, #[case] expected: ConfigurationError) {
        assert_eq!(DataStore::from_json(json), Err(expected));
    }

    #[test]
    fn builds_from_pairs() {
        let store = DataStore::from_tables([("domains", vec!["com"])]).expect("valid pairs");
        assert!(store.contains("domains"));
        assert!(!store.contains("cities"));
    }
}
