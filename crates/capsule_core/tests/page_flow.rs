use capsule_core::view::template::placeholder_count;
use capsule_core::{
    default_document, dynamic_cards, static_cards, CapsulePage, Document, Element, EventStatus,
    KeyValueStore, LogState, MemoryKeyValueStore, PageBindings, PageEvent, Record, RecordField,
    RecordValidationError, RepoError, StatusKind, StoreError, Theme,
};

fn page(store: &MemoryKeyValueStore) -> CapsulePage<
    capsule_core::KvRecordLogRepository<&MemoryKeyValueStore>,
    capsule_core::KvSettingsRepository<&MemoryKeyValueStore>,
> {
    CapsulePage::open(store, default_document(&PageBindings::default()))
}

fn grid(document: &Document) -> &Element {
    document.element_by_id("capsuleGrid").unwrap()
}

fn dynamic_titles(document: &Document) -> Vec<String> {
    dynamic_cards(grid(document))
        .iter()
        .map(|card| card.child_elements().next().unwrap().text_content())
        .collect()
}

fn input_value(document: &Document, id: &str) -> String {
    document
        .element_by_id(id)
        .unwrap()
        .attr("value")
        .unwrap_or_default()
        .to_string()
}

#[test]
fn submit_two_capsules_then_clear() {
    let store = MemoryKeyValueStore::new();
    let mut page = page(&store);

    page.fill_form("Arrival", "2016", "Watched it alone.");
    assert_eq!(
        page.dispatch(PageEvent::SubmitCapsule).status,
        EventStatus::Applied
    );
    page.fill_form("Her", "2013", "Still thinking about it.");
    page.dispatch(PageEvent::SubmitCapsule);

    assert_eq!(dynamic_titles(page.document()), ["Her", "Arrival"]);
    assert_eq!(static_cards(grid(page.document())).len(), placeholder_count());

    assert_eq!(
        page.dispatch(PageEvent::ClearCapsules).status,
        EventStatus::Applied
    );
    assert!(dynamic_titles(page.document()).is_empty());
    assert_eq!(static_cards(grid(page.document())).len(), placeholder_count());
    assert!(page.records().is_empty());
    assert_eq!(page.log_state(), LogState::Absent);
}

#[test]
fn capsules_are_restored_on_next_page_load() {
    let store = MemoryKeyValueStore::new();
    {
        let mut first = page(&store);
        first.fill_form("Arrival", "2016", "Watched it alone.");
        first.dispatch(PageEvent::SubmitCapsule);
        first.fill_form("Her", "2013", "Still thinking about it.");
        first.dispatch(PageEvent::SubmitCapsule);
    }

    let second = page(&store);
    assert_eq!(
        second.records(),
        [
            Record::new("Arrival", "2016", "Watched it alone.").unwrap(),
            Record::new("Her", "2013", "Still thinking about it.").unwrap(),
        ]
    );
    assert_eq!(dynamic_titles(second.document()), ["Her", "Arrival"]);
}

#[test]
fn successful_submit_resets_form_and_schedules_dismiss() {
    let store = MemoryKeyValueStore::new();
    let mut page = page(&store);
    page.fill_form(" Heat ", "1995", "Diner scene.");

    let outcome = page.dispatch(PageEvent::SubmitCapsule);

    let (delay, token) = outcome.dismiss_after.unwrap();
    assert_eq!(delay.as_secs(), 3);
    assert_eq!(input_value(page.document(), "capsuleTitle"), "");
    assert_eq!(page.status().unwrap().kind, StatusKind::Success);
    assert!(page
        .document()
        .element_by_id("capsuleMessage")
        .unwrap()
        .has_class("is-success"));

    assert_eq!(
        page.dispatch(PageEvent::DismissStatus(token)).status,
        EventStatus::Applied
    );
    assert!(page.status().is_none());
    assert_eq!(
        page.document()
            .element_by_id("capsuleMessage")
            .unwrap()
            .text_content(),
        ""
    );
}

#[test]
fn stale_dismiss_does_not_clear_newer_message() {
    let store = MemoryKeyValueStore::new();
    let mut page = page(&store);
    page.fill_form("Heat", "1995", "Diner scene.");
    let (_, stale) = page
        .dispatch(PageEvent::SubmitCapsule)
        .dismiss_after
        .unwrap();

    page.fill_form("", "", "");
    page.dispatch(PageEvent::SubmitCapsule);

    assert_eq!(
        page.dispatch(PageEvent::DismissStatus(stale)).status,
        EventStatus::Ignored
    );
    assert_eq!(page.status().unwrap().kind, StatusKind::Invalid);
}

#[test]
fn invalid_submit_shows_message_and_keeps_form_and_storage() {
    let store = MemoryKeyValueStore::new();
    let mut page = page(&store);
    page.fill_form("Alien", "  ", "Chestburster.");

    let outcome = page.dispatch(PageEvent::SubmitCapsule);

    assert_eq!(
        outcome.status,
        EventStatus::Rejected(RecordValidationError::EmptyField(RecordField::Year))
    );
    assert!(outcome.dismiss_after.is_none());
    assert_eq!(input_value(page.document(), "capsuleTitle"), "Alien");
    assert_eq!(page.status().unwrap().kind, StatusKind::Invalid);
    assert_eq!(store.get("filmCapsules").unwrap(), None);
    assert!(dynamic_titles(page.document()).is_empty());
}

#[test]
fn storage_refusal_keeps_capsule_for_this_visit_with_warning() {
    let store = MemoryKeyValueStore::with_quota(90);
    let mut page = page(&store);
    page.fill_form("Heat", "1995", &"a very long memory ".repeat(10));

    let outcome = page.dispatch(PageEvent::SubmitCapsule);

    assert!(matches!(
        outcome.status,
        EventStatus::Degraded(RepoError::Store(StoreError::QuotaExceeded { .. }))
    ));
    assert_eq!(page.status().unwrap().kind, StatusKind::StorageWarning);
    assert_eq!(dynamic_titles(page.document()), ["Heat"]);
    assert_eq!(store.get("filmCapsules").unwrap(), None);
}

#[test]
fn each_page_load_counts_one_visit_and_shows_it() {
    let store = MemoryKeyValueStore::new();
    for expected in 1..=4_u64 {
        let page = page(&store);
        assert_eq!(page.visit_count(), expected);
        assert_eq!(
            page.document()
                .element_by_id("visitCounter")
                .unwrap()
                .text_content(),
            expected.to_string()
        );
    }
    assert_eq!(store.get("visitCount").unwrap().as_deref(), Some("4"));
}

#[test]
fn theme_toggle_persists_and_is_restored() {
    let store = MemoryKeyValueStore::new();
    {
        let mut page = page(&store);
        assert_eq!(page.theme(), Theme::Dark);
        assert!(!page.document().body().has_class("light-mode"));

        page.dispatch(PageEvent::ToggleTheme);
        assert_eq!(page.theme(), Theme::Light);
        assert!(page.document().body().has_class("light-mode"));
        assert_eq!(
            page.document()
                .element_by_id("themeToggle")
                .unwrap()
                .text_content(),
            "Dark mode"
        );
    }

    let page = page(&store);
    assert_eq!(page.theme(), Theme::Light);
    assert!(page.document().body().has_class("light-mode"));
    assert_eq!(store.get("netflixTheme").unwrap().as_deref(), Some("light"));
}

#[test]
fn persisted_theme_wins_over_stale_body_class() {
    let store = MemoryKeyValueStore::new();
    store.set("netflixTheme", "light").unwrap();
    let mut page = page(&store);

    page.document_mut().body_mut().remove_class("light-mode");
    page.dispatch(PageEvent::ToggleTheme);

    assert_eq!(page.theme(), Theme::Light);
    assert!(page.document().body().has_class("light-mode"));
}

#[test]
fn missing_elements_disable_features_without_errors() {
    let store = MemoryKeyValueStore::new();
    store
        .set(
            "filmCapsules",
            r#"[{"title":"Up","year":"2009","memory":"Balloons."}]"#,
        )
        .unwrap();
    let mut page = CapsulePage::open(&store, Document::new(Element::new("body")));

    assert_eq!(page.records().len(), 1);
    assert_eq!(page.visit_count(), 1);
    for event in [
        PageEvent::SubmitCapsule,
        PageEvent::ClearCapsules,
        PageEvent::ToggleTheme,
    ] {
        assert_eq!(page.dispatch(event).status, EventStatus::Ignored);
    }
    assert_eq!(page.records().len(), 1);
    assert_eq!(page.document().to_html(), "<body></body>");
}
