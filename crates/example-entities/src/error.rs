//! Error types for the example-entities crate.
//!
//! Configuration failures are fatal and surface as soon as a registry, bundle,
//! or data store is built. Generation failures cover problems with a single
//! request, and identifier failures cover malformed validator input.

use std::path::PathBuf;

use thiserror::Error;

use crate::checksum::IdentifierCodec;
use crate::entity::EntityKind;

/// Fatal errors in the locale data or field definitions.
///
/// None of these are retried or defaulted; they indicate that the registry or
/// the caller's configuration is wrong.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConfigurationError {
    /// The locale tag is not known or has no registered bundle.
    #[error("unknown locale '{tag}'")]
    UnknownLocale {
        /// The tag that was requested.
        tag: String,
    },

    /// A data table was requested that the store does not hold.
    #[error("unknown data table '{key}'")]
    UnknownTableKey {
        /// The missing table key.
        key: String,
    },

    /// A data table was supplied with no candidate values.
    #[error("data table '{key}' is empty")]
    EmptyTable {
        /// The empty table key.
        key: String,
    },

    /// The field specs for an entity kind depend on each other in a loop.
    #[error("dependency cycle among {kind} fields: {}", fields.join(", "))]
    DependencyCycle {
        /// Entity kind whose specs are cyclic.
        kind: EntityKind,
        /// Fields that could not be ordered.
        fields: Vec<String>,
    },

    /// A field spec depends on a field the kind does not declare.
    #[error("{kind} field '{field}' depends on undeclared field '{dependency}'")]
    UnknownDependency {
        /// Entity kind being planned.
        kind: EntityKind,
        /// The field carrying the dependency.
        field: String,
        /// The dependency that does not exist.
        dependency: String,
    },

    /// The same field name was declared twice for one kind.
    #[error("{kind} field '{field}' is declared more than once")]
    DuplicateFieldSpec {
        /// Entity kind being planned.
        kind: EntityKind,
        /// The repeated field name.
        field: String,
    },

    /// A kind, or one of its fields, has no field spec in the bundle.
    #[error("missing field spec for {kind}{}", field.as_deref().map(|f| format!(" field '{f}'")).unwrap_or_default())]
    MissingFieldSpec {
        /// Entity kind lacking a spec.
        kind: EntityKind,
        /// The specific field, when the kind is present but incomplete.
        field: Option<String>,
    },

    /// A field is derived with a checksum codec the bundle does not carry.
    #[error("{kind} field '{field}' uses the {codec:?} codec, which the bundle does not carry")]
    UnavailableCodec {
        /// Entity kind being planned.
        kind: EntityKind,
        /// The field using the codec.
        field: String,
        /// The codec that is not available.
        codec: IdentifierCodec,
    },

    /// The data table document version is not supported.
    #[error("unsupported data table version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Version found in the document.
        actual: u32,
    },

    /// The data table JSON is malformed.
    #[error("invalid data table JSON: {message}")]
    TableParse {
        /// Description of the parse error.
        message: String,
    },

    /// The data table file could not be read.
    #[error("failed to read data table file at '{path}': {message}")]
    TableRead {
        /// Path to the table file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },
}

/// Errors raised while resolving a single entity request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerationError {
    /// The locale bundle is misconfigured.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    /// An override names a field the entity kind does not have.
    #[error("{kind} has no field '{field}'")]
    UnknownField {
        /// Entity kind that was requested.
        kind: EntityKind,
        /// The unrecognised field name.
        field: String,
    },

    /// An override targets a nested entity as a whole instead of one of its
    /// fields.
    #[error("{kind} field '{field}' is a nested entity; pin its fields as '{field}.<name>'")]
    NestedOverride {
        /// Entity kind that was requested.
        kind: EntityKind,
        /// The nested field name.
        field: String,
    },

    /// A field value could not be interpreted as its typed form.
    #[error("invalid value '{value}' for field '{field}': {message}")]
    InvalidFieldValue {
        /// Field holding the value.
        field: String,
        /// The raw value.
        value: String,
        /// Why it was rejected.
        message: String,
    },
}

/// Errors raised when validating a candidate identifier.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// The candidate contains a character outside the identifier alphabet.
    #[error("invalid character '{character}' at position {position}")]
    InvalidCharacter {
        /// Zero-based character position.
        position: usize,
        /// The offending character.
        character: char,
    },

    /// An encoding input has the wrong number of characters.
    #[error("expected {expected} characters, found {actual}")]
    InvalidLength {
        /// Required length.
        expected: usize,
        /// Length supplied.
        actual: usize,
    },
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case(
        ConfigurationError::UnknownLocale { tag: "xx".to_owned() },
        "unknown locale 'xx'"
    )]
    #[case(
        ConfigurationError::UnknownTableKey { key: "cities".to_owned() },
        "unknown data table 'cities'"
    )]
    #[case(
        ConfigurationError::EmptyTable { key: "streets".to_owned() },
        "data table 'streets' is empty"
    )]
    #[case(
        ConfigurationError::DependencyCycle {
            kind: EntityKind::Company,
            fields: vec!["domain".to_owned(), "name".to_owned()],
        },
        "dependency cycle among company fields: domain, name"
    )]
    #[case(
        ConfigurationError::UnknownDependency {
            kind: EntityKind::Person,
            field: "email".to_owned(),
            dependency: "nickname".to_owned(),
        },
        "person field 'email' depends on undeclared field 'nickname'"
    )]
    #[case(
        ConfigurationError::MissingFieldSpec { kind: EntityKind::Address, field: None },
        "missing field spec for address"
    )]
    #[case(
        ConfigurationError::MissingFieldSpec {
            kind: EntityKind::Address,
            field: Some("city".to_owned()),
        },
        "missing field spec for address field 'city'"
    )]
    #[case(
        ConfigurationError::UnavailableCodec {
            kind: EntityKind::Company,
            field: "taxId".to_owned(),
            codec: IdentifierCodec::Nip,
        },
        "company field 'taxId' uses the Nip codec, which the bundle does not carry"
    )]
    #[case(
        ConfigurationError::UnsupportedVersion { expected: 1, actual: 3 },
        "unsupported data table version: expected 1, found 3"
    )]
    fn configuration_error_formats_correctly(
        #[case] err: ConfigurationError,
        #[case] expected: &str,
    ) {
        assert_eq!(err.to_string(), expected);
    }

    #[test]
    fn table_read_error_formats_correctly() {
        let err = ConfigurationError::TableRead {
            path: PathBuf::from("/tmp/pl.json"),
            message: "file not found".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "failed to read data table file at '/tmp/pl.json': file not found"
        );
    }

    #[test]
    fn generation_error_is_transparent_over_configuration() {
        let err = GenerationError::from(ConfigurationError::UnknownLocale {
            tag: "fr".to_owned(),
        });
        assert_eq!(err.to_string(), "unknown locale 'fr'");
    }

    #[test]
    fn nested_override_error_names_the_dotted_form() {
        let err = GenerationError::NestedOverride {
            kind: EntityKind::Person,
            field: "address".to_owned(),
        };
        assert_eq!(
            err.to_string(),
            "person field 'address' is a nested entity; pin its fields as 'address.<name>'"
        );
    }

    #[test]
    fn identifier_error_formats_correctly() {
        let err = IdentifierError::InvalidCharacter {
            position: 4,
            character: 'x',
        };
        assert_eq!(err.to_string(), "invalid character 'x' at position 4");
    }
}
