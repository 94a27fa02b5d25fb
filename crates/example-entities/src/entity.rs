//! Generated entity types.
//!
//! Every entity kind has a fixed set of field names shared by all locales;
//! only the values and their formatting differ. Entities are assembled once by
//! the provider from fully resolved field values and expose read-only
//! accessors afterwards.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::GenerationError;
use crate::format;
use crate::locale::Locale;

/// Date layout used for `dateOfBirth` values, pinned or generated.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// The kinds of entity the provider can generate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A fictitious person with a nested address.
    Person,
    /// A fictitious company.
    Company,
    /// A postal address.
    Address,
}

impl EntityKind {
    /// All kinds, in declaration order.
    pub const ALL: [Self; 3] = [Self::Person, Self::Company, Self::Address];

    /// Returns the field names every bundle must provide for this kind.
    #[must_use]
    pub const fn field_names(self) -> &'static [&'static str] {
        match self {
            Self::Person => &[
                Person::FIRST_NAME,
                Person::LAST_NAME,
                Person::EMAIL,
                Person::SEX,
                Person::DATE_OF_BIRTH,
                Person::NATIONAL_ID,
                Person::TELEPHONE_NUMBER,
                Person::ADDRESS,
            ],
            Self::Company => &[
                Company::NAME,
                Company::DOMAIN,
                Company::EMAIL,
                Company::TAX_ID,
            ],
            Self::Address => &[
                Address::STREET_NUMBER,
                Address::STREET,
                Address::APARTMENT_NUMBER,
                Address::CITY,
                Address::POSTAL_CODE,
            ],
        }
    }

    const fn as_str(self) -> &'static str {
        match self {
            Self::Person => "person",
            Self::Company => "company",
            Self::Address => "address",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EntityKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown entity kind '{s}'"))
    }
}

/// Biological sex marker used by gendered name tables and identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sex {
    /// Male.
    Male,
    /// Female.
    Female,
}

impl Sex {
    /// Returns the lowercase name used in table keys and overrides.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Male => "male",
            Self::Female => "female",
        }
    }

    /// Returns `true` for [`Sex::Male`].
    #[must_use]
    pub const fn is_male(self) -> bool {
        matches!(self, Self::Male)
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sex {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "male" => Ok(Self::Male),
            "female" => Ok(Self::Female),
            _ => Err("expected 'male' or 'female'".to_owned()),
        }
    }
}

/// A resolved field value: plain text, or the fields of a nested entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// A scalar value.
    Text(String),
    /// The resolved fields of a nested entity.
    Nested(FieldValues),
}

/// Working map of resolved field values for one entity.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldValues {
    values: BTreeMap<&'static str, FieldValue>,
}

impl FieldValues {
    /// Returns the text value of a field, if resolved.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<&str> {
        match self.values.get(field) {
            Some(FieldValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub(crate) fn insert(&mut self, field: &'static str, value: FieldValue) {
        self.values.insert(field, value);
    }

    fn take_text(&mut self, field: &str) -> Result<String, GenerationError> {
        match self.values.remove(field) {
            Some(FieldValue::Text(value)) => Ok(value),
            _ => Err(missing(field)),
        }
    }

    fn take_nested(&mut self, field: &str) -> Result<Self, GenerationError> {
        match self.values.remove(field) {
            Some(FieldValue::Nested(values)) => Ok(values),
            _ => Err(missing(field)),
        }
    }
}

fn missing(field: &str) -> GenerationError {
    GenerationError::InvalidFieldValue {
        field: field.to_owned(),
        value: String::new(),
        message: "field was not resolved".to_owned(),
    }
}

/// Parses a `dateOfBirth` value.
///
/// Only the canonical `YYYY-MM-DD` spelling is accepted, so a pinned date
/// renders back exactly as given.
pub(crate) fn parse_date(field: &str, value: &str) -> Result<NaiveDate, GenerationError> {
    let invalid = |message: String| GenerationError::InvalidFieldValue {
        field: field.to_owned(),
        value: value.to_owned(),
        message,
    };
    let date =
        NaiveDate::parse_from_str(value, DATE_FORMAT).map_err(|err| invalid(err.to_string()))?;
    if date.format(DATE_FORMAT).to_string() != value {
        return Err(invalid("expected a zero-padded YYYY-MM-DD date".to_owned()));
    }
    Ok(date)
}

/// Parses a `sex` value.
///
/// Only the lowercase names are accepted, so a pinned value renders back
/// exactly as given.
pub(crate) fn parse_sex(field: &str, value: &str) -> Result<Sex, GenerationError> {
    let invalid = |message: String| GenerationError::InvalidFieldValue {
        field: field.to_owned(),
        value: value.to_owned(),
        message,
    };
    let sex: Sex = value.parse().map_err(invalid)?;
    if sex.as_str() != value {
        return Err(invalid(format!("expected '{sex}'")));
    }
    Ok(sex)
}

/// A generated postal address.
///
/// Rendering follows the layout of the locale the address was generated for.
///
/// # Example
///
/// ```
/// use example_entities::{EntityProvider, LocaleRegistry, Overrides};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let provider = EntityProvider::new(LocaleRegistry::builtin().expect("registry"));
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let overrides = Overrides::new()
///     .pin("city", "上海")
///     .pin("street", "南京路")
///     .pin("streetNumber", "12")
///     .pin("apartmentNumber", "")
///     .pin("postalCode", "200000");
/// let address = provider.address("zh", &overrides, &mut rng).expect("address");
///
/// assert_eq!(address.address_line1(), "上海市南京路12号");
/// assert_eq!(address.address_line2(), "邮编 200000");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(skip)]
    locale: Locale,
    street_number: String,
    street: String,
    apartment_number: String,
    city: String,
    postal_code: String,
}

impl Address {
    /// Field name of the street number.
    pub const STREET_NUMBER: &'static str = "streetNumber";
    /// Field name of the street.
    pub const STREET: &'static str = "street";
    /// Field name of the apartment number; may resolve to an empty string.
    pub const APARTMENT_NUMBER: &'static str = "apartmentNumber";
    /// Field name of the city.
    pub const CITY: &'static str = "city";
    /// Field name of the postal code.
    pub const POSTAL_CODE: &'static str = "postalCode";

    pub(crate) fn from_fields(
        locale: Locale,
        mut values: FieldValues,
    ) -> Result<Self, GenerationError> {
        Ok(Self {
            locale,
            street_number: values.take_text(Self::STREET_NUMBER)?,
            street: values.take_text(Self::STREET)?,
            apartment_number: values.take_text(Self::APARTMENT_NUMBER)?,
            city: values.take_text(Self::CITY)?,
            postal_code: values.take_text(Self::POSTAL_CODE)?,
        })
    }

    /// Returns the locale whose layout renders this address.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the street number.
    #[must_use]
    pub fn street_number(&self) -> &str {
        &self.street_number
    }

    /// Returns the street name.
    #[must_use]
    pub fn street(&self) -> &str {
        &self.street
    }

    /// Returns the apartment number, empty when the address has none.
    #[must_use]
    pub fn apartment_number(&self) -> &str {
        &self.apartment_number
    }

    /// Returns the city.
    #[must_use]
    pub fn city(&self) -> &str {
        &self.city
    }

    /// Returns the postal code.
    #[must_use]
    pub fn postal_code(&self) -> &str {
        &self.postal_code
    }

    /// Renders the first address line in the locale's layout.
    #[must_use]
    pub fn address_line1(&self) -> String {
        format::address_line1(self)
    }

    /// Renders the second address line in the locale's layout.
    #[must_use]
    pub fn address_line2(&self) -> String {
        format::address_line2(self)
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}{}{}",
            self.address_line1(),
            format::LINE_SEPARATOR,
            self.address_line2()
        )
    }
}

/// A generated person.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Person {
    #[serde(skip)]
    locale: Locale,
    first_name: String,
    last_name: String,
    email: String,
    sex: Sex,
    date_of_birth: NaiveDate,
    national_id: String,
    telephone_number: String,
    address: Address,
}

impl Person {
    /// Field name of the given name.
    pub const FIRST_NAME: &'static str = "firstName";
    /// Field name of the family name.
    pub const LAST_NAME: &'static str = "lastName";
    /// Field name of the personal email address.
    pub const EMAIL: &'static str = "email";
    /// Field name of the sex marker (`male` or `female`).
    pub const SEX: &'static str = "sex";
    /// Field name of the birth date (`YYYY-MM-DD`).
    pub const DATE_OF_BIRTH: &'static str = "dateOfBirth";
    /// Field name of the national identifier.
    pub const NATIONAL_ID: &'static str = "nationalId";
    /// Field name of the telephone number.
    pub const TELEPHONE_NUMBER: &'static str = "telephoneNumber";
    /// Field name of the nested address; pin its parts as `address.<field>`.
    pub const ADDRESS: &'static str = "address";

    pub(crate) fn from_fields(
        locale: Locale,
        mut values: FieldValues,
    ) -> Result<Self, GenerationError> {
        let sex = values.take_text(Self::SEX)?;
        let date_of_birth = values.take_text(Self::DATE_OF_BIRTH)?;
        Ok(Self {
            locale,
            first_name: values.take_text(Self::FIRST_NAME)?,
            last_name: values.take_text(Self::LAST_NAME)?,
            email: values.take_text(Self::EMAIL)?,
            sex: parse_sex(Self::SEX, &sex)?,
            date_of_birth: parse_date(Self::DATE_OF_BIRTH, &date_of_birth)?,
            national_id: values.take_text(Self::NATIONAL_ID)?,
            telephone_number: values.take_text(Self::TELEPHONE_NUMBER)?,
            address: Address::from_fields(locale, values.take_nested(Self::ADDRESS)?)?,
        })
    }

    /// Returns the locale the person was generated for.
    #[must_use]
    pub const fn locale(&self) -> Locale {
        self.locale
    }

    /// Returns the given name.
    #[must_use]
    pub fn first_name(&self) -> &str {
        &self.first_name
    }

    /// Returns the family name.
    #[must_use]
    pub fn last_name(&self) -> &str {
        &self.last_name
    }

    /// Returns the full name in the locale's name order.
    #[must_use]
    pub fn full_name(&self) -> String {
        format::full_name(self.locale, &self.first_name, &self.last_name)
    }

    /// Returns the personal email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the sex marker.
    #[must_use]
    pub const fn sex(&self) -> Sex {
        self.sex
    }

    /// Returns the birth date.
    #[must_use]
    pub const fn date_of_birth(&self) -> NaiveDate {
        self.date_of_birth
    }

    /// Returns the national identifier.
    #[must_use]
    pub fn national_id(&self) -> &str {
        &self.national_id
    }

    /// Returns the telephone number.
    #[must_use]
    pub fn telephone_number(&self) -> &str {
        &self.telephone_number
    }

    /// Returns the home address.
    #[must_use]
    pub const fn address(&self) -> &Address {
        &self.address
    }
}

/// A generated company.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Company {
    name: String,
    domain: String,
    email: String,
    tax_id: String,
}

impl Company {
    /// Field name of the company name.
    pub const NAME: &'static str = "name";
    /// Field name of the internet domain derived from the name.
    pub const DOMAIN: &'static str = "domain";
    /// Field name of the contact email address.
    pub const EMAIL: &'static str = "email";
    /// Field name of the tax identifier.
    pub const TAX_ID: &'static str = "taxId";

    pub(crate) fn from_fields(mut values: FieldValues) -> Result<Self, GenerationError> {
        Ok(Self {
            name: values.take_text(Self::NAME)?,
            domain: values.take_text(Self::DOMAIN)?,
            email: values.take_text(Self::EMAIL)?,
            tax_id: values.take_text(Self::TAX_ID)?,
        })
    }

    /// Returns the company name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the internet domain.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the contact email address.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the tax identifier.
    #[must_use]
    pub fn tax_id(&self) -> &str {
        &self.tax_id
    }
}

/// Any generated entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum Entity {
    /// A generated person.
    Person(Person),
    /// A generated company.
    Company(Company),
    /// A generated address.
    Address(Address),
}

impl Entity {
    /// Returns the kind of this entity.
    #[must_use]
    pub const fn kind(&self) -> EntityKind {
        match self {
            Self::Person(_) => EntityKind::Person,
            Self::Company(_) => EntityKind::Company,
            Self::Address(_) => EntityKind::Address,
        }
    }
}
