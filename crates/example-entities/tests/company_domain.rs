//! Property tests for company domain sanitising.
//!
//! Arbitrary company names come from `fake`; generated Chinese companies come
//! from the built-in registry.

#![expect(
    clippy::expect_used,
    reason = "test code uses expect for clear failure messages"
)]

use example_entities::{
    ESCAPED_HOST_MAX, EntityProvider, LocaleRegistry, Overrides, company_domain, host_label,
};
use fake::Fake;
use fake::faker::company::raw::{CompanyName, CompanySuffix};
use fake::locales::{EN, FR_FR};
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rstest::rstest;

const SAMPLES: usize = 200;

#[rstest]
#[case::seed_one(1)]
#[case::seed_two(2)]
#[case::seed_three(3)]
fn latin_company_names_become_lowercase_ascii_hosts(#[case] seed: u64) {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for _ in 0..SAMPLES {
        let name: String = CompanyName(EN).fake_with_rng(&mut rng);
        let suffix: String = CompanySuffix(EN).fake_with_rng(&mut rng);
        let full = format!("{name} {suffix}");
        let label = host_label(&full);

        assert!(label.is_ascii(), "{full} -> {label}");
        assert!(!label.chars().any(char::is_whitespace), "{full} -> {label}");
        assert!(!label.contains('/'), "{full} -> {label}");
        assert!(!label.starts_with('.'), "{full} -> {label}");
        assert!(!label.ends_with('.'), "{full} -> {label}");
        assert_eq!(label, label.to_lowercase(), "{full} -> {label}");
    }
}

#[test]
fn accented_company_names_become_ascii_hosts() {
    let mut rng = ChaCha8Rng::seed_from_u64(11);
    for _ in 0..SAMPLES {
        let name: String = CompanyName(FR_FR).fake_with_rng(&mut rng);
        let label = host_label(&name);

        assert!(label.is_ascii(), "{name} -> {label}");
        assert!(!label.chars().any(char::is_whitespace), "{name} -> {label}");
    }
}

#[test]
fn company_domain_always_ends_with_the_suffix() {
    let mut rng = ChaCha8Rng::seed_from_u64(5);
    for _ in 0..SAMPLES {
        let name: String = CompanyName(EN).fake_with_rng(&mut rng);
        let domain = company_domain(&name, "com");
        assert_eq!(domain, format!("{}.com", host_label(&name)));
    }
}

#[test]
fn chinese_company_hosts_are_truncated_hex() {
    let provider = EntityProvider::new(LocaleRegistry::builtin().expect("registry"));
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    for _ in 0..SAMPLES {
        let company = provider
            .company("zh", &Overrides::new(), &mut rng)
            .expect("company");
        let (label, _) = company
            .domain()
            .split_once('.')
            .expect("domain has a suffix");

        assert_eq!(label.chars().count(), ESCAPED_HOST_MAX, "{}", company.name());
        assert!(
            label
                .chars()
                .all(|c| c.is_ascii_digit() || ('A'..='F').contains(&c)),
            "{} -> {label}",
            company.name()
        );
        assert_eq!(label, host_label(company.name()));
    }
}
