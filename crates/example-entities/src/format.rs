//! Locale-specific string composition.
//!
//! These rules build derived field values (domains, email addresses, postal
//! codes) and render address lines. The host sanitizer is lossy for non-Latin
//! scripts: it produces something hostname-shaped, not a canonical IDNA label.

use rand::{Rng, RngCore};
use unicode_normalization::UnicodeNormalization;
use unicode_normalization::char::is_combining_mark;

use crate::entity::Address;
use crate::locale::Locale;

/// Line separator used when rendering multi-line values.
#[cfg(windows)]
pub const LINE_SEPARATOR: &str = "\r\n";

/// Line separator used when rendering multi-line values.
#[cfg(not(windows))]
pub const LINE_SEPARATOR: &str = "\n";

/// Escaped hosts longer than this are truncated when escaping grew them.
pub const ESCAPED_HOST_MAX: usize = 10;

/// Placeholder replaced with a random digit by [`numerify`].
const DIGIT_PLACEHOLDER: char = '#';

/// Derives a hostname-like label from free text.
///
/// The text is lowercased, stripped of whitespace, leading and trailing
/// periods, slashes, and diacritics. Characters outside printable ASCII are
/// then written as upper-case hex code units. When that escaping lengthens the
/// label beyond [`ESCAPED_HOST_MAX`] characters, only the first
/// [`ESCAPED_HOST_MAX`] are kept.
///
/// # Examples
///
/// ```
/// use example_entities::host_label;
///
/// assert_eq!(host_label("Kowalski & Syn Sp. z o.o."), "kowalski&synsp.zo.o");
/// assert_eq!(host_label("Żółw"), "zolw");
/// assert_eq!(host_label("中国"), "4E2D56FD");
/// assert_eq!(host_label("北京科技"), "53174EAC79");
/// ```
#[must_use]
pub fn host_label(text: &str) -> String {
    let lowered: String = text
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let host = strip_accents(&lowered.trim_matches('.').replace('/', ""));
    let plain_len = host.chars().count();

    let escaped = escape_literal(&host).replace("\\u", "");
    if escaped.chars().count() > plain_len && escaped.chars().count() > ESCAPED_HOST_MAX {
        escaped.chars().take(ESCAPED_HOST_MAX).collect()
    } else {
        escaped
    }
}

/// Builds a company domain from its name and a domain suffix.
#[must_use]
pub fn company_domain(name: &str, suffix: &str) -> String {
    format!("{}.{suffix}", host_label(name))
}

/// Replaces each `#` in the pattern with a random decimal digit.
pub fn numerify<R>(pattern: &str, rng: &mut R) -> String
where
    R: RngCore + ?Sized,
{
    pattern
        .chars()
        .map(|c| {
            if c == DIGIT_PLACEHOLDER {
                char::from(b'0' + rng.random_range(0..10u8))
            } else {
                c
            }
        })
        .collect()
}

/// Removes combining marks after canonical decomposition.
///
/// `ł` has no decomposition, so it is mapped explicitly.
fn strip_accents(text: &str) -> String {
    text.nfd()
        .filter(|c| !is_combining_mark(*c))
        .map(|c| match c {
            'ł' => 'l',
            'Ł' => 'L',
            other => other,
        })
        .collect()
}

/// Escapes text the way a string literal escaper does.
///
/// Quotes and backslashes gain a backslash, the common control characters use
/// their short forms, and anything else outside printable ASCII becomes
/// `\uXXXX` per UTF-16 code unit.
fn escape_literal(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\u{8}' => out.push_str("\\b"),
            '\n' => out.push_str("\\n"),
            '\t' => out.push_str("\\t"),
            '\u{c}' => out.push_str("\\f"),
            '\r' => out.push_str("\\r"),
            ' '..='\u{7f}' => out.push(c),
            _ => {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    out.push_str(&format!("\\u{unit:04X}"));
                }
            }
        }
    }
    out
}

/// Renders a full name in the locale's name order.
pub(crate) fn full_name(locale: Locale, first_name: &str, last_name: &str) -> String {
    match locale {
        Locale::Zh => format!("{last_name}{first_name}"),
        Locale::Pl | Locale::En => format!("{first_name} {last_name}"),
    }
}

pub(crate) fn address_line1(address: &Address) -> String {
    let apartment = address.apartment_number();
    match address.locale() {
        Locale::Zh => {
            let line = format!(
                "{}市{}{}号",
                address.city(),
                address.street(),
                address.street_number()
            );
            if apartment.is_empty() {
                line
            } else {
                format!("{line} {apartment}房")
            }
        }
        Locale::Pl => {
            let line = format!("{} {}", address.street(), address.street_number());
            if apartment.is_empty() {
                line
            } else {
                format!("{line}/{apartment}")
            }
        }
        Locale::En => {
            let line = format!("{} {}", address.street_number(), address.street());
            if apartment.is_empty() {
                line
            } else {
                format!("{line} APT {apartment}")
            }
        }
    }
}

pub(crate) fn address_line2(address: &Address) -> String {
    match address.locale() {
        Locale::Zh => format!("邮编 {}", address.postal_code()),
        Locale::Pl => format!("{} {}", address.postal_code(), address.city()),
        Locale::En => format!("{} {}", address.city(), address.postal_code()),
    }
}

#[cfg(test)]
mod tests {
    //! Covers host sanitisation boundaries, pattern filling, and layouts.

    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    use super::*;
    use crate::entity::{FieldValue, FieldValues};

    fn address(locale: Locale, apartment: &str) -> Address {
        let mut values = FieldValues::default();
        for (field, value) in [
            (Address::STREET_NUMBER, "12"),
            (Address::STREET, "Main"),
            (Address::APARTMENT_NUMBER, apartment),
            (Address::CITY, "Town"),
            (Address::POSTAL_CODE, "00-950"),
        ] {
            values.insert(field, FieldValue::Text(value.to_owned()));
        }
        Address::from_fields(locale, values).expect("complete address")
    }

    #[rstest]
    #[case("Acme Corp", "acmecorp")]
    #[case("  .Dotted Name.  ", "dottedname")]
    #[case("Smith/Jones", "smithjones")]
    #[case("Café Crème", "cafecreme")]
    #[case("Łódź Trans", "lodztrans")]
    fn host_label_normalises_latin_names(#[case] name: &str, #[case] expected: &str) {
        assert_eq!(host_label(name), expected);
    }

    #[test]
    fn long_latin_names_are_never_truncated() {
        // Escaping leaves ASCII untouched, so the length does not grow.
        assert_eq!(
            host_label("International Business Machines"),
            "internationalbusinessmachines"
        );
    }

    #[test]
    fn escaped_names_within_the_limit_are_kept_whole() {
        let label = host_label("中国");
        assert_eq!(label, "4E2D56FD");
        assert!(label.chars().count() <= ESCAPED_HOST_MAX);
    }

    #[test]
    fn escaped_names_at_exactly_the_limit_are_kept_whole() {
        // Two CJK characters plus two ASCII letters escape to ten characters.
        assert_eq!(host_label("中国ab"), "4E2D56FDab");
    }

    #[test]
    fn escaped_names_over_the_limit_are_truncated() {
        let label = host_label("北京科技有限公司");
        assert_eq!(label, "53174EAC79");
        assert_eq!(label.chars().count(), ESCAPED_HOST_MAX);
    }

    #[test]
    fn quotes_grow_the_label_and_can_trigger_truncation() {
        assert_eq!(host_label("\"quoted\"name\""), "\\\"quoted\\\"");
    }

    #[test]
    fn company_domain_appends_the_suffix() {
        assert_eq!(company_domain("Acme Corp", "com"), "acmecorp.com");
        assert_eq!(company_domain("北京科技有限公司", "cn"), "53174EAC79.cn");
    }

    #[test]
    fn numerify_replaces_only_placeholders() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let value = numerify("##-###", &mut rng);

        assert_eq!(value.len(), 6);
        assert_eq!(value.chars().nth(2), Some('-'));
        assert!(
            value
                .chars()
                .enumerate()
                .all(|(i, c)| i == 2 || c.is_ascii_digit())
        );
    }

    #[rstest]
    #[case(Locale::Zh, "明", "王", "王明")]
    #[case(Locale::Pl, "Jan", "Kowalski", "Jan Kowalski")]
    #[case(Locale::En, "Ada", "Lovelace", "Ada Lovelace")]
    fn full_name_follows_locale_order(
        #[case] locale: Locale,
        #[case] first: &str,
        #[case] last: &str,
        #[case] expected: &str,
    ) {
        assert_eq!(full_name(locale, first, last), expected);
    }

    #[rstest]
    #[case(Locale::Zh, "", "Town市Main12号", "邮编 00-950")]
    #[case(Locale::Zh, "3", "Town市Main12号 3房", "邮编 00-950")]
    #[case(Locale::Pl, "", "Main 12", "00-950 Town")]
    #[case(Locale::Pl, "3", "Main 12/3", "00-950 Town")]
    #[case(Locale::En, "", "12 Main", "Town 00-950")]
    #[case(Locale::En, "3", "12 Main APT 3", "Town 00-950")]
    fn address_lines_follow_locale_layout(
        #[case] locale: Locale,
        #[case] apartment: &str,
        #[case] line1: &str,
        #[case] line2: &str,
    ) {
        let rendered = address(locale, apartment);
        assert_eq!(address_line1(&rendered), line1);
        assert_eq!(address_line2(&rendered), line2);
        assert_eq!(
            rendered.to_string(),
            format!("{line1}{LINE_SEPARATOR}{line2}")
        );
    }
}
