//! Property-based tests for shortcut chord matching.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use hubdeck::managers::shortcut_manager::{
    ShortcutDispatcher, ShortcutManagerTrait, ShortcutRegistry, DEFAULT_SHORTCUTS,
};
use hubdeck::types::shortcut::{KeyEvent, ModifierPlatform, ShortcutDefinition};
use proptest::prelude::*;

fn arb_platform() -> impl Strategy<Value = ModifierPlatform> {
    prop_oneof![Just(ModifierPlatform::Mac), Just(ModifierPlatform::Other)]
}

fn event_for(def: &ShortcutDefinition, platform: ModifierPlatform, upper: bool) -> KeyEvent {
    let key = if upper && def.key.chars().count() == 1 {
        def.key.to_uppercase()
    } else {
        def.key.to_string()
    };
    let mut event = KeyEvent::new(key);
    if def.use_modifier {
        event = match platform {
            ModifierPlatform::Mac => event.meta(),
            ModifierPlatform::Other => event.ctrl(),
        };
    }
    if def.shift {
        event = event.shift();
    }
    if def.alt {
        event = event.alt();
    }
    event
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    /// Every built-in shortcut fires exactly its own action, once.
    #[test]
    fn each_builtin_fires_only_itself(
        index in 0..DEFAULT_SHORTCUTS.len(),
        platform in arb_platform(),
        upper in any::<bool>(),
    ) {
        let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), platform);
        let counts: Vec<Arc<AtomicUsize>> =
            DEFAULT_SHORTCUTS.iter().map(|_| Arc::new(AtomicUsize::new(0))).collect();
        for (def, count) in DEFAULT_SHORTCUTS.iter().zip(&counts) {
            let count = Arc::clone(count);
            dispatcher
                .bind(def.id, Box::new(move || {
                    count.fetch_add(1, Ordering::SeqCst);
                }))
                .unwrap();
        }

        let def = &DEFAULT_SHORTCUTS[index];
        let outcome = dispatcher.dispatch(&event_for(def, platform, upper));
        prop_assert!(outcome.is_handled());
        prop_assert_eq!(outcome.prevent_default(), def.prevent_default);

        for (i, count) in counts.iter().enumerate() {
            let expected = usize::from(i == index);
            prop_assert_eq!(count.load(Ordering::SeqCst), expected);
        }
    }

    /// Letters without any modifier never match a built-in shortcut.
    #[test]
    fn bare_letters_pass_through(key in "[a-z]", platform in arb_platform()) {
        let mut dispatcher = ShortcutDispatcher::new(ShortcutRegistry::default(), platform);
        prop_assert!(!dispatcher.dispatch(&KeyEvent::new(key)).is_handled());
    }

    /// A registry accepts a table only when all chords are distinct.
    #[test]
    fn registry_rejects_any_repeated_chord(
        keys in prop::collection::vec(
            (prop::sample::select(vec!["a", "b", "c"]), any::<bool>(), any::<bool>()),
            1..8,
        ),
    ) {
        let ids = ["s0", "s1", "s2", "s3", "s4", "s5", "s6", "s7"];
        let defs: Vec<ShortcutDefinition> = keys
            .iter()
            .enumerate()
            .map(|(i, (key, shift, alt))| {
                let mut def = ShortcutDefinition::new(ids[i], *key, "generated").with_modifier();
                def.shift = *shift;
                def.alt = *alt;
                def
            })
            .collect();

        let chords: std::collections::HashSet<_> = defs.iter().map(|d| d.chord()).collect();
        match ShortcutRegistry::new(defs.clone()) {
            Ok(registry) => {
                prop_assert_eq!(chords.len(), defs.len());
                for def in &defs {
                    prop_assert_eq!(registry.find_by_chord(&def.chord()).unwrap().id, def.id);
                }
            }
            Err(_) => prop_assert!(chords.len() < defs.len()),
        }
    }
}
