//! Locale-aware generation of fictitious people, companies, and addresses.
//!
//! Entities are assembled field by field from per-locale word lists, formatting
//! rules, and self-validating identifier codecs. Each locale declares how every
//! field is derived and which sibling fields it reads; the declarations are
//! ordered once into resolution plans so a derived field always sees the final
//! values of its inputs, including values pinned by the caller.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Built-in `pl`, `zh`, and `en` locales with embedded data tables
//! - PESEL, NIP, resident identity number, and unified social credit code
//!   generation and validation
//! - Caller overrides, including dotted paths into nested entities
//! - Locale address layouts and company domain sanitising
//! - Replacing a locale's tables with a JSON file
//!
//! # Example
//!
//! ```
//! use example_entities::{
//!     ChecksumCodec, EntityProvider, LocaleRegistry, Overrides, Person, Pesel,
//! };
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//!
//! let provider = EntityProvider::new(LocaleRegistry::builtin().expect("registry"));
//! let mut rng = ChaCha8Rng::seed_from_u64(2024);
//! let overrides = Overrides::new()
//!     .pin(Person::DATE_OF_BIRTH, "1995-06-15")
//!     .pin(Person::SEX, "female");
//!
//! let person = provider.person("pl", &overrides, &mut rng).expect("person");
//! assert!(person.national_id().starts_with("950615"));
//! assert_eq!(Pesel.is_valid(person.national_id()), Ok(true));
//! ```

mod checksum;
pub mod cli;
mod entity;
mod error;
mod format;
mod locale;
mod overrides;
mod plan;
mod provider;
mod settings;
mod store;

pub use checksum::{ChecksumCodec, CreditCode, IdentifierCodec, Nip, Pesel, ResidentId};
pub use entity::{
    Address, Company, DATE_FORMAT, Entity, EntityKind, FieldValue, FieldValues, Person, Sex,
};
pub use error::{ConfigurationError, GenerationError, IdentifierError};
pub use format::{ESCAPED_HOST_MAX, LINE_SEPARATOR, company_domain, host_label, numerify};
pub use locale::{Locale, LocaleBundle, LocaleRegistry};
pub use overrides::{Overrides, PATH_SEPARATOR};
pub use provider::{EntityProvider, Resolution};
pub use plan::{FieldRule, FieldSpec, FormatFn, ResolutionPlan};
pub use settings::GeneratorSettings;
pub use store::DataStore;
