//! Built-in field specs for each locale.
//!
//! Specs are static tables; the formatter functions below read resolved
//! sibling fields through [`Resolution`] and draw from the locale's data
//! tables.

use chrono::NaiveDate;
use rand::Rng;

use super::Locale;
use crate::checksum::IdentifierCodec;
use crate::entity::{Address, Company, DATE_FORMAT, EntityKind, Person, Sex, parse_sex};
use crate::error::GenerationError;
use crate::format::{company_domain, host_label, numerify};
use crate::provider::Resolution;
use crate::plan::FieldSpec;

const FIRST_NAMES_MALE: &str = "firstNames.male";
const FIRST_NAMES_FEMALE: &str = "firstNames.female";
const LAST_NAMES: &str = "lastNames";
const LAST_NAMES_MALE: &str = "lastNames.male";
const LAST_NAMES_FEMALE: &str = "lastNames.female";
const PERSONAL_EMAIL_DOMAINS: &str = "personalEmailDomains";
const TELEPHONE_FORMATS: &str = "telephoneFormats";
const NATIONAL_ID_FORMATS: &str = "nationalIdFormats";
const STREETS: &str = "streets";
const CITIES: &str = "cities";
const POSTAL_CODE_FORMATS: &str = "postalCodeFormats";
const COMPANY_NAMES: &str = "companyNames";
const COMPANY_SUFFIXES: &str = "companySuffixes";
const COMPANY_EMAILS: &str = "companyEmails";
const DOMAINS: &str = "domains";
const TAX_ID_FORMATS: &str = "taxIdFormats";

/// Birth years are drawn from this inclusive range.
const BIRTH_YEARS: (i32, i32) = (1940, 2005);
const MAX_STREET_NUMBER: u32 = 200;
const MAX_APARTMENT_NUMBER: u32 = 350;

const PERSON_DEPENDS_ON_SEX: &[&str] = &[Person::SEX];
const PERSON_DEPENDS_ON_NAMES: &[&str] = &[Person::FIRST_NAME, Person::LAST_NAME];
const PERSON_DEPENDS_ON_BIRTH: &[&str] = &[Person::DATE_OF_BIRTH, Person::SEX];

const PL_PERSON: &[FieldSpec] = &[
    FieldSpec::format(Person::SEX, sex, &[], &[]),
    FieldSpec::format(
        Person::FIRST_NAME,
        first_name,
        &[FIRST_NAMES_MALE, FIRST_NAMES_FEMALE],
        PERSON_DEPENDS_ON_SEX,
    ),
    FieldSpec::format(
        Person::LAST_NAME,
        gendered_last_name,
        &[LAST_NAMES_MALE, LAST_NAMES_FEMALE],
        PERSON_DEPENDS_ON_SEX,
    ),
    FieldSpec::format(
        Person::EMAIL,
        person_email,
        &[PERSONAL_EMAIL_DOMAINS],
        PERSON_DEPENDS_ON_NAMES,
    ),
    FieldSpec::format(Person::DATE_OF_BIRTH, date_of_birth, &[], &[]),
    FieldSpec::checksum(
        Person::NATIONAL_ID,
        IdentifierCodec::Pesel,
        PERSON_DEPENDS_ON_BIRTH,
    ),
    FieldSpec::format(
        Person::TELEPHONE_NUMBER,
        telephone_number,
        &[TELEPHONE_FORMATS],
        &[],
    ),
    FieldSpec::nested(Person::ADDRESS, EntityKind::Address),
];

const ZH_PERSON: &[FieldSpec] = &[
    FieldSpec::format(Person::SEX, sex, &[], &[]),
    FieldSpec::format(
        Person::FIRST_NAME,
        first_name,
        &[FIRST_NAMES_MALE, FIRST_NAMES_FEMALE],
        PERSON_DEPENDS_ON_SEX,
    ),
    FieldSpec::pick(Person::LAST_NAME, LAST_NAMES),
    FieldSpec::format(
        Person::EMAIL,
        person_email,
        &[PERSONAL_EMAIL_DOMAINS],
        PERSON_DEPENDS_ON_NAMES,
    ),
    FieldSpec::format(Person::DATE_OF_BIRTH, date_of_birth, &[], &[]),
    FieldSpec::checksum(
        Person::NATIONAL_ID,
        IdentifierCodec::ResidentId,
        PERSON_DEPENDS_ON_BIRTH,
    ),
    FieldSpec::format(
        Person::TELEPHONE_NUMBER,
        telephone_number,
        &[TELEPHONE_FORMATS],
        &[],
    ),
    FieldSpec::nested(Person::ADDRESS, EntityKind::Address),
];

const EN_PERSON: &[FieldSpec] = &[
    FieldSpec::format(Person::SEX, sex, &[], &[]),
    FieldSpec::format(
        Person::FIRST_NAME,
        first_name,
        &[FIRST_NAMES_MALE, FIRST_NAMES_FEMALE],
        PERSON_DEPENDS_ON_SEX,
    ),
    FieldSpec::pick(Person::LAST_NAME, LAST_NAMES),
    FieldSpec::format(
        Person::EMAIL,
        person_email,
        &[PERSONAL_EMAIL_DOMAINS],
        PERSON_DEPENDS_ON_NAMES,
    ),
    FieldSpec::format(Person::DATE_OF_BIRTH, date_of_birth, &[], &[]),
    FieldSpec::format(
        Person::NATIONAL_ID,
        national_id_pattern,
        &[NATIONAL_ID_FORMATS],
        &[],
    ),
    FieldSpec::format(
        Person::TELEPHONE_NUMBER,
        telephone_number,
        &[TELEPHONE_FORMATS],
        &[],
    ),
    FieldSpec::nested(Person::ADDRESS, EntityKind::Address),
];

/// Addresses share one spec list; only the layout differs per locale.
const ADDRESS: &[FieldSpec] = &[
    FieldSpec::format(Address::STREET_NUMBER, street_number, &[], &[]),
    FieldSpec::pick(Address::STREET, STREETS),
    FieldSpec::format(Address::APARTMENT_NUMBER, apartment_number, &[], &[]),
    FieldSpec::pick(Address::CITY, CITIES),
    FieldSpec::format(
        Address::POSTAL_CODE,
        postal_code,
        &[POSTAL_CODE_FORMATS],
        &[],
    ),
];

const COMPANY_NAME: FieldSpec = FieldSpec::format(
    Company::NAME,
    company_name,
    &[COMPANY_NAMES, COMPANY_SUFFIXES],
    &[],
);
const COMPANY_DOMAIN: FieldSpec =
    FieldSpec::format(Company::DOMAIN, domain, &[DOMAINS], &[Company::NAME]);
const COMPANY_EMAIL: FieldSpec = FieldSpec::format(
    Company::EMAIL,
    company_email,
    &[COMPANY_EMAILS],
    &[Company::DOMAIN],
);

const PL_COMPANY: &[FieldSpec] = &[
    COMPANY_NAME,
    COMPANY_DOMAIN,
    COMPANY_EMAIL,
    FieldSpec::checksum(Company::TAX_ID, IdentifierCodec::Nip, &[]),
];

const ZH_COMPANY: &[FieldSpec] = &[
    COMPANY_NAME,
    COMPANY_DOMAIN,
    COMPANY_EMAIL,
    FieldSpec::checksum(Company::TAX_ID, IdentifierCodec::CreditCode, &[]),
];

const EN_COMPANY: &[FieldSpec] = &[
    COMPANY_NAME,
    COMPANY_DOMAIN,
    COMPANY_EMAIL,
    FieldSpec::format(Company::TAX_ID, tax_id_pattern, &[TAX_ID_FORMATS], &[]),
];

pub(super) const fn field_specs(locale: Locale, kind: EntityKind) -> &'static [FieldSpec] {
    match (locale, kind) {
        (Locale::Pl, EntityKind::Person) => PL_PERSON,
        (Locale::Zh, EntityKind::Person) => ZH_PERSON,
        (Locale::En, EntityKind::Person) => EN_PERSON,
        (Locale::Pl, EntityKind::Company) => PL_COMPANY,
        (Locale::Zh, EntityKind::Company) => ZH_COMPANY,
        (Locale::En, EntityKind::Company) => EN_COMPANY,
        (_, EntityKind::Address) => ADDRESS,
    }
}

fn sex(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let sex = if r.rng().random_bool(0.5) {
        Sex::Male
    } else {
        Sex::Female
    };
    Ok(sex.as_str().to_owned())
}

fn resolved_sex(r: &Resolution<'_>) -> Result<Sex, GenerationError> {
    parse_sex(Person::SEX, r.text(Person::SEX)?)
}

fn first_name(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let table = match resolved_sex(r)? {
        Sex::Male => FIRST_NAMES_MALE,
        Sex::Female => FIRST_NAMES_FEMALE,
    };
    Ok(r.pick(table)?.to_owned())
}

fn gendered_last_name(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let table = match resolved_sex(r)? {
        Sex::Male => LAST_NAMES_MALE,
        Sex::Female => LAST_NAMES_FEMALE,
    };
    Ok(r.pick(table)?.to_owned())
}

fn person_email(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let first = host_label(r.text(Person::FIRST_NAME)?);
    let last = host_label(r.text(Person::LAST_NAME)?);
    let domain = r.pick(PERSONAL_EMAIL_DOMAINS)?;
    Ok(format!("{first}.{last}@{domain}"))
}

fn date_of_birth(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let (first, last) = BIRTH_YEARS;
    let year = r.rng().random_range(first..=last);
    // Every year has at least 365 days, so any ordinal up to 365 is valid.
    let ordinal = r.rng().random_range(1..=365);
    NaiveDate::from_yo_opt(year, ordinal)
        .map(|date| date.format(DATE_FORMAT).to_string())
        .ok_or_else(|| GenerationError::InvalidFieldValue {
            field: r.field().to_owned(),
            value: format!("{year}-{ordinal:03}"),
            message: "not a calendar day".to_owned(),
        })
}

fn pattern(r: &mut Resolution<'_>, table: &str) -> Result<String, GenerationError> {
    let format = r.pick(table)?;
    Ok(numerify(format, r.rng()))
}

fn telephone_number(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    pattern(r, TELEPHONE_FORMATS)
}

fn national_id_pattern(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    pattern(r, NATIONAL_ID_FORMATS)
}

fn tax_id_pattern(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    pattern(r, TAX_ID_FORMATS)
}

fn postal_code(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    pattern(r, POSTAL_CODE_FORMATS)
}

fn street_number(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    Ok(r.rng().random_range(1..=MAX_STREET_NUMBER).to_string())
}

/// Roughly half of generated addresses have no apartment.
fn apartment_number(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    if r.rng().random_bool(0.5) {
        Ok(String::new())
    } else {
        Ok(r.rng().random_range(1..=MAX_APARTMENT_NUMBER).to_string())
    }
}

fn company_name(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let name = r.pick(COMPANY_NAMES)?;
    if r.rng().random_bool(0.5) {
        let suffix = r.pick(COMPANY_SUFFIXES)?;
        Ok(format!("{name} {suffix}"))
    } else {
        Ok(name.to_owned())
    }
}

fn domain(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let name = r.text(Company::NAME)?;
    let suffix = r.pick(DOMAINS)?;
    Ok(company_domain(name, suffix))
}

fn company_email(r: &mut Resolution<'_>) -> Result<String, GenerationError> {
    let domain = r.text(Company::DOMAIN)?;
    let mailbox = r.pick(COMPANY_EMAILS)?;
    Ok(format!("{mailbox}@{domain}"))
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;
    use crate::plan::ResolutionPlan;

    #[rstest]
    #[case(Locale::Pl)]
    #[case(Locale::Zh)]
    #[case(Locale::En)]
    fn builtin_specs_form_acyclic_plans(#[case] locale: Locale) {
        for kind in EntityKind::ALL {
            let plan = ResolutionPlan::new(kind, field_specs(locale, kind).to_vec())
                .expect("built-in specs are acyclic");
            for field in kind.field_names() {
                assert!(plan.spec(field).is_some(), "{locale} {kind} lacks {field}");
            }
        }
    }

    #[test]
    fn national_id_follows_birth_date_and_sex() {
        let plan = ResolutionPlan::new(EntityKind::Person, PL_PERSON.to_vec()).expect("plan");
        let order: Vec<_> = plan.order().iter().map(FieldSpec::name).collect();
        let position = |name| order.iter().position(|field| *field == name);

        assert!(position(Person::SEX) < position(Person::NATIONAL_ID));
        assert!(position(Person::DATE_OF_BIRTH) < position(Person::NATIONAL_ID));
        assert!(position(Person::SEX) < position(Person::FIRST_NAME));
    }
}
