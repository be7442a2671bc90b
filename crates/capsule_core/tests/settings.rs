use capsule_core::{
    KeyValueStore, KvSettingsRepository, MemoryKeyValueStore, RepoError, SettingsRepository,
    StorageKeys, StoreError, Theme,
};

fn repo(store: &MemoryKeyValueStore) -> KvSettingsRepository<&MemoryKeyValueStore> {
    KvSettingsRepository::new(store, &StorageKeys::default())
}

#[test]
fn theme_defaults_to_dark_when_absent_or_unknown() {
    let store = MemoryKeyValueStore::new();
    assert_eq!(repo(&store).theme(), Theme::Dark);

    store.set("netflixTheme", "sepia").unwrap();
    assert_eq!(repo(&store).theme(), Theme::Dark);
}

#[test]
fn set_theme_persists_plain_string() {
    let store = MemoryKeyValueStore::new();
    repo(&store).set_theme(Theme::Light).unwrap();

    assert_eq!(store.get("netflixTheme").unwrap().as_deref(), Some("light"));
    assert_eq!(repo(&store).theme(), Theme::Light);
}

#[test]
fn visit_count_over_n_loads_equals_n() {
    let store = MemoryKeyValueStore::new();

    for expected in 1..=5_u64 {
        let count = repo(&store).increment_visit_count().unwrap();
        assert_eq!(count, expected);
    }

    assert_eq!(store.get("visitCount").unwrap().as_deref(), Some("5"));
    assert_eq!(repo(&store).visit_count(), 5);
}

#[test]
fn non_decimal_visit_count_restarts_from_zero() {
    let store = MemoryKeyValueStore::new();
    store.set("visitCount", "many").unwrap();

    assert_eq!(repo(&store).visit_count(), 0);
    assert_eq!(repo(&store).increment_visit_count().unwrap(), 1);
}

#[test]
fn visit_count_accepts_only_plain_decimal_digits() {
    for raw in ["+7", " 7", "7 ", "", "-1", "7.0", "18446744073709551616"] {
        let store = MemoryKeyValueStore::new();
        store.set("visitCount", raw).unwrap();

        assert_eq!(repo(&store).visit_count(), 0, "raw value {raw:?}");
        assert_eq!(repo(&store).increment_visit_count().unwrap(), 1);
        assert_eq!(store.get("visitCount").unwrap().as_deref(), Some("1"));
    }

    let store = MemoryKeyValueStore::new();
    store.set("visitCount", "007").unwrap();
    assert_eq!(repo(&store).increment_visit_count().unwrap(), 8);
}

#[test]
fn settings_are_independent_of_each_other() {
    let store = MemoryKeyValueStore::new();
    let settings = repo(&store);

    settings.set_theme(Theme::Light).unwrap();
    settings.increment_visit_count().unwrap();

    assert_eq!(
        store.keys().unwrap(),
        vec!["netflixTheme".to_string(), "visitCount".to_string()]
    );
    assert_eq!(settings.theme(), Theme::Light);
}

#[test]
fn refused_write_leaves_count_unchanged() {
    let store = MemoryKeyValueStore::with_quota(11);
    let settings = repo(&store);
    assert_eq!(settings.increment_visit_count().unwrap(), 1);

    let err = settings.set_theme(Theme::Light).unwrap_err();

    assert!(matches!(
        err,
        RepoError::Store(StoreError::QuotaExceeded { .. })
    ));
    assert_eq!(settings.visit_count(), 1);
    assert_eq!(settings.theme(), Theme::Dark);
}
