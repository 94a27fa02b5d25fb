//! Unit tests for the generator binary helpers.

use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};

use camino::{Utf8Path, Utf8PathBuf};
use cap_std::{ambient_authority, fs::Dir};
use rstest::{fixture, rstest};

use super::*;
use crate::error::{ConfigurationError, GenerationError};

const CITY_ONLY_TABLES: &str = r#"{
    "version": 1,
    "tables": {
        "streets": ["Długa"],
        "cities": ["Hel"],
        "postalCodeFormats": ["84-150"]
    }
}"#;

struct TablesFixture {
    path: Utf8PathBuf,
}

impl Drop for TablesFixture {
    fn drop(&mut self) {
        cleanup_path(&self.path);
    }
}

#[fixture]
fn settings() -> GeneratorSettings {
    GeneratorSettings {
        locale: None,
        kind: None,
        seed: None,
        count: 1,
        tables_path: None,
        overrides: Vec::new(),
    }
}

#[rstest]
fn defaults_generate_one_english_person(settings: GeneratorSettings) {
    let provider = build_provider(&settings).expect("provider");
    let entities = generate(&provider, &settings, 1).expect("entities");

    assert_eq!(entities.len(), 1);
    assert!(entities.iter().all(|e| e.kind() == EntityKind::Person));
}

#[rstest]
fn overrides_are_applied_to_every_entity(mut settings: GeneratorSettings) {
    settings.kind = Some("company".to_owned());
    settings.count = 3;
    settings.overrides = vec!["name=Acme Corp".to_owned(), "junk".to_owned()];

    let provider = build_provider(&settings).expect("provider");
    for entity in generate(&provider, &settings, 5).expect("entities") {
        let Entity::Company(company) = entity else {
            panic!("expected a company");
        };
        assert_eq!(company.name(), "Acme Corp");
    }
}

#[rstest]
fn unknown_kinds_are_reported(mut settings: GeneratorSettings) {
    settings.kind = Some("invoice".to_owned());
    let provider = build_provider(&settings).expect("provider");

    assert!(matches!(
        generate(&provider, &settings, 1),
        Err(CliError::InvalidKind { ref value, .. }) if value == "invoice"
    ));
}

#[rstest]
fn unknown_locales_are_reported(mut settings: GeneratorSettings) {
    settings.locale = Some("xx".to_owned());
    let provider = build_provider(&settings).expect("provider");

    assert_eq!(
        generate(&provider, &settings, 1),
        Err(CliError::Generation(GenerationError::Configuration(
            ConfigurationError::UnknownLocale {
                tag: "xx".to_owned()
            }
        )))
    );
}

#[rstest]
fn tables_file_missing_a_key_is_rejected(mut settings: GeneratorSettings) {
    let fixture = TablesFixture {
        path: write_tables(CITY_ONLY_TABLES),
    };
    settings.locale = Some("pl".to_owned());
    settings.tables_path = Some(fixture.path.clone().into_std_path_buf());

    assert!(matches!(
        build_provider(&settings),
        Err(CliError::Configuration(
            ConfigurationError::UnknownTableKey { .. }
        ))
    ));
}

#[rstest]
fn tables_file_replaces_the_locale_store(mut settings: GeneratorSettings) {
    let builtin = LocaleRegistry::builtin().expect("registry");
    let mut json: serde_json::Value =
        serde_json::from_str(CITY_ONLY_TABLES).expect("fixture json");
    let tables = builtin
        .bundle("pl")
        .expect("bundle")
        .store()
        .keys()
        .filter(|key| !["streets", "cities", "postalCodeFormats"].contains(key))
        .map(|key| {
            let values = builtin
                .bundle("pl")
                .and_then(|bundle| bundle.store().table(key))
                .expect("table");
            (key.to_owned(), serde_json::json!(values))
        })
        .collect::<serde_json::Map<_, _>>();
    if let Some(object) = json.get_mut("tables").and_then(|t| t.as_object_mut()) {
        object.extend(tables);
    }
    let fixture = TablesFixture {
        path: write_tables(&json.to_string()),
    };
    settings.locale = Some("pl".to_owned());
    settings.kind = Some("address".to_owned());
    settings.tables_path = Some(fixture.path.clone().into_std_path_buf());

    let provider = build_provider(&settings).expect("provider");
    let entities = generate(&provider, &settings, 3).expect("entities");
    let Some(Entity::Address(address)) = entities.first() else {
        panic!("expected an address");
    };
    assert_eq!(address.city(), "Hel");
    assert_eq!(address.street(), "Długa");
    assert_eq!(address.postal_code(), "84-150");
    assert_eq!(address.locale(), Locale::Pl);
}

#[rstest]
fn missing_tables_file_is_a_read_error(mut settings: GeneratorSettings) {
    let path = unique_temp_path("absent.json");
    settings.tables_path = Some(path.clone().into_std_path_buf());

    assert!(matches!(
        build_provider(&settings),
        Err(CliError::Configuration(ConfigurationError::TableRead { .. }))
    ));
    cleanup_path(&path);
}

#[test]
fn render_produces_tagged_json() {
    let registry = LocaleRegistry::builtin().expect("registry");
    let provider = EntityProvider::new(registry);
    let mut rng = ChaCha8Rng::seed_from_u64(3);
    let entity = provider
        .get(EntityKind::Address, "zh", &Overrides::new(), &mut rng)
        .expect("address");

    let line = render(&entity).expect("json");
    assert!(line.starts_with(r#"{"kind":"address""#), "{line}");
    assert!(!line.contains('\n'));
}

#[rstest]
#[case(
    CliError::InvalidKind { value: "x".to_owned(), message: "unknown entity kind 'x'".to_owned() },
    "invalid entity kind 'x': unknown entity kind 'x'"
)]
#[case(
    CliError::NonUtf8Path { path: PathBuf::from("/") },
    "tables path '/' must be a UTF-8 file path"
)]
fn cli_errors_display(#[case] err: CliError, #[case] expected: &str) {
    assert_eq!(err.to_string(), expected);
}

fn write_tables(json: &str) -> Utf8PathBuf {
    let path = unique_temp_path("tables.json");
    let dir = open_tables_dir(&path);
    let file_name = path.file_name().expect("tables file name");
    dir.write(file_name, json).expect("write tables");
    path
}

fn cleanup_path(path: &Utf8Path) {
    if let Some(parent) = path.parent() {
        let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open workspace dir");
        drop(root.remove_dir_all(parent));
    }
}

fn unique_temp_path(file_name: &str) -> Utf8PathBuf {
    static TEMP_COUNTER: AtomicUsize = AtomicUsize::new(0);
    let counter = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
    let process_id = std::process::id();
    let dir_name = format!("generator-cli-{process_id}-{counter}");
    let dir = Utf8PathBuf::from("target")
        .join("example-entities-tests")
        .join(dir_name);
    let root = Dir::open_ambient_dir(".", ambient_authority()).expect("open workspace dir");
    root.create_dir_all(&dir).expect("create temp dir");
    dir.join(file_name)
}

fn open_tables_dir(path: &Utf8Path) -> Dir {
    let parent = path.parent().unwrap_or_else(|| Utf8Path::new("."));
    Dir::open_ambient_dir(parent, ambient_authority()).expect("open tables dir")
}
