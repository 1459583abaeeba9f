use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use rstest::rstest;

use hubdeck::managers::shortcut_manager::{
    ShortcutDispatcher, ShortcutManagerTrait, ShortcutRegistry, DEFAULT_SHORTCUTS, OPEN_SEARCH,
    OPEN_SETTINGS,
};
use hubdeck::types::errors::ShortcutError;
use hubdeck::types::shortcut::{
    DispatchOutcome, KeyChord, KeyEvent, ModifierPlatform, ShortcutDefinition,
};

fn counter() -> (Arc<AtomicUsize>, Box<dyn FnMut() + Send>) {
    let count = Arc::new(AtomicUsize::new(0));
    let inner = Arc::clone(&count);
    (count, Box::new(move || {
        inner.fetch_add(1, Ordering::SeqCst);
    }))
}

// ─── Registry ───

#[test]
fn test_default_registry_lists_all_shortcuts() {
    let registry = ShortcutRegistry::default();
    assert_eq!(registry.list_shortcuts().len(), DEFAULT_SHORTCUTS.len());
    assert_eq!(registry.get_shortcut(OPEN_SEARCH).unwrap().key, "k");
    assert!(registry.get_shortcut("launch_rockets").is_none());
}

#[test]
fn test_duplicate_chord_is_rejected() {
    let result = ShortcutRegistry::new(vec![
        ShortcutDefinition::new("a", "k", "first").with_modifier(),
        ShortcutDefinition::new("b", "K", "second").with_modifier(),
    ]);
    assert!(matches!(result, Err(ShortcutError::Conflict(_))));
}

#[test]
fn test_same_key_with_different_flags_is_allowed() {
    let registry = ShortcutRegistry::new(vec![
        ShortcutDefinition::new("a", "a", "plain").with_modifier(),
        ShortcutDefinition::new("b", "a", "shifted").with_modifier().with_shift(),
        ShortcutDefinition::new("c", "a", "alted").with_modifier().with_alt(),
    ])
    .unwrap();
    let chord = KeyChord::new("A", true, true, false);
    assert_eq!(registry.find_by_chord(&chord).unwrap().id, "b");
}

#[test]
fn test_duplicate_id_is_rejected() {
    let result = ShortcutRegistry::new(vec![
        ShortcutDefinition::new("a", "x", "one"),
        ShortcutDefinition::new("a", "y", "two"),
    ]);
    assert!(matches!(result, Err(ShortcutError::Conflict(_))));
}

#[test]
fn test_empty_key_is_rejected() {
    let result = ShortcutRegistry::new(vec![ShortcutDefinition::new("a", " ", "blank")]);
    assert!(matches!(result, Err(ShortcutError::InvalidKey(_))));
}

// ─── Dispatch ───

#[test]
fn test_open_settings_fires_once_and_prevents_default() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let (count, action) = counter();
    dispatcher.bind(OPEN_SETTINGS, action).unwrap();

    let outcome = dispatcher.dispatch(&KeyEvent::new(",").ctrl());
    assert_eq!(
        outcome,
        DispatchOutcome::Handled {
            id: OPEN_SETTINGS,
            prevent_default: true
        }
    );
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[test]
fn test_escape_allows_default() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let outcome = dispatcher.dispatch(&KeyEvent::new("Escape"));
    assert!(outcome.is_handled());
    assert!(!outcome.prevent_default());
}

#[rstest]
#[case(ModifierPlatform::Mac, KeyEvent::new("k").meta(), true)]
#[case(ModifierPlatform::Mac, KeyEvent::new("k").ctrl(), false)]
#[case(ModifierPlatform::Other, KeyEvent::new("k").ctrl(), true)]
#[case(ModifierPlatform::Other, KeyEvent::new("k").meta(), false)]
#[case(ModifierPlatform::Other, KeyEvent::new("K").ctrl(), true)]
#[case(ModifierPlatform::Other, KeyEvent::new("k").ctrl().shift(), false)]
#[case(ModifierPlatform::Other, KeyEvent::new("k"), false)]
fn test_modifier_resolution(
    #[case] platform: ModifierPlatform,
    #[case] event: KeyEvent,
    #[case] fires: bool,
) {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), platform);
    let (count, action) = counter();
    dispatcher.bind(OPEN_SEARCH, action).unwrap();

    dispatcher.dispatch(&event);
    assert_eq!(count.load(Ordering::SeqCst), usize::from(fires));
}

#[test]
fn test_unmatched_event_passes_through() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let outcome = dispatcher.dispatch(&KeyEvent::new("q").ctrl());
    assert_eq!(outcome, DispatchOutcome::Unhandled);
    assert!(!outcome.prevent_default());
}

#[test]
fn test_only_the_matching_action_runs() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let (settings, settings_action) = counter();
    let (search, search_action) = counter();
    dispatcher.bind(OPEN_SETTINGS, settings_action).unwrap();
    dispatcher.bind(OPEN_SEARCH, search_action).unwrap();

    dispatcher.dispatch(&KeyEvent::new("k").ctrl());
    assert_eq!(settings.load(Ordering::SeqCst), 0);
    assert_eq!(search.load(Ordering::SeqCst), 1);
}

#[test]
fn test_bind_unknown_id_fails() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let (_, action) = counter();
    assert!(matches!(
        dispatcher.bind("launch_rockets", action),
        Err(ShortcutError::NotFound(_))
    ));
}

#[test]
fn test_rebinding_replaces_action() {
    let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), ModifierPlatform::Other);
    let (first, first_action) = counter();
    let (second, second_action) = counter();
    dispatcher.bind(OPEN_SEARCH, first_action).unwrap();
    dispatcher.bind(OPEN_SEARCH, second_action).unwrap();

    dispatcher.dispatch(&KeyEvent::new("k").ctrl());
    assert_eq!(first.load(Ordering::SeqCst), 0);
    assert_eq!(second.load(Ordering::SeqCst), 1);
}
