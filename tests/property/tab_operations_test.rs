//! Property-based tests for tab registry operations.
//!
//! For any sequence of opens (some carrying resource ids), focus changes and
//! closes, the registry keeps unique ids, at most one tab per resource, and a
//! focused tab that is always one of the open tabs.

use std::collections::HashSet;

use hubdeck::managers::tab_manager::{TabManager, TabManagerTrait};
use hubdeck::types::tab::{AppType, OpenTabRequest, TabProps};
use proptest::prelude::*;

/// Operations that can be performed on the TabManager.
#[derive(Debug, Clone)]
enum TabOp {
    Open(usize),
    OpenResource(u8),
    Focus(usize),
    Close(usize), // index into the current tab list
}

fn arb_tab_ops() -> impl Strategy<Value = Vec<TabOp>> {
    prop::collection::vec(
        prop_oneof![
            2 => (0..AppType::ALL.len()).prop_map(TabOp::Open),
            3 => (0..6u8).prop_map(TabOp::OpenResource),
            1 => (0..20usize).prop_map(TabOp::Focus),
            2 => (0..20usize).prop_map(TabOp::Close),
        ],
        1..60,
    )
}

fn assert_invariants(manager: &TabManager) {
    let tabs = manager.get_all_tabs();

    let ids: HashSet<&str> = tabs.iter().map(|t| t.id.as_str()).collect();
    assert_eq!(ids.len(), tabs.len(), "tab ids must be unique");

    let resources: Vec<&str> = tabs.iter().filter_map(|t| t.resource_id.as_deref()).collect();
    let distinct: HashSet<&&str> = resources.iter().collect();
    assert_eq!(distinct.len(), resources.len(), "one tab per resource");

    match manager.active_tab_id() {
        Some(active) => assert!(ids.contains(active), "focused tab must be open"),
        None => assert!(tabs.is_empty(), "a non-empty workspace always has focus"),
    }
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(20))]

    #[test]
    fn tab_registry_invariants_hold(ops in arb_tab_ops()) {
        let mut manager = TabManager::new();

        for op in &ops {
            match op {
                TabOp::Open(kind) => {
                    let id = manager.open_tab(OpenTabRequest::launch(AppType::ALL[*kind]));
                    prop_assert_eq!(manager.active_tab_id(), Some(id.as_str()));
                }
                TabOp::OpenResource(n) => {
                    let resource_id = format!("r{}", n);
                    let before = manager.tab_count();
                    let existing = manager
                        .find_tab_by_resource_id(&resource_id)
                        .map(|t| t.id.clone());
                    let id = manager.open_tab(
                        OpenTabRequest::new("res", TabProps::empty(AppType::WebView))
                            .with_resource(resource_id),
                    );
                    match existing {
                        Some(existing) => {
                            prop_assert_eq!(&id, &existing);
                            prop_assert_eq!(manager.tab_count(), before);
                        }
                        None => prop_assert_eq!(manager.tab_count(), before + 1),
                    }
                    prop_assert_eq!(manager.active_tab_id(), Some(id.as_str()));
                }
                TabOp::Focus(idx) => {
                    let target = manager.get_all_tabs().get(*idx).map(|t| t.id.clone());
                    if let Some(id) = target {
                        let order_before: Vec<String> =
                            manager.get_all_tabs().iter().map(|t| t.id.clone()).collect();
                        manager.set_active_tab(&id).unwrap();
                        let order_after: Vec<String> =
                            manager.get_all_tabs().iter().map(|t| t.id.clone()).collect();
                        prop_assert_eq!(order_before, order_after);
                    }
                }
                TabOp::Close(idx) => {
                    let target = manager.get_all_tabs().get(*idx).map(|t| t.id.clone());
                    if let Some(id) = target {
                        let before = manager.tab_count();
                        manager.close_tab(&id).unwrap();
                        prop_assert_eq!(manager.tab_count(), before - 1);
                        prop_assert!(manager.get_tab(&id).is_none());
                    }
                }
            }
            assert_invariants(&manager);
        }
    }

    #[test]
    fn reopening_a_resource_never_grows_the_registry(repeats in 1..10usize) {
        let mut manager = TabManager::new();
        let first = manager.open_tab(
            OpenTabRequest::new("r", TabProps::empty(AppType::PdfViewer)).with_resource("same"),
        );
        for _ in 0..repeats {
            manager.open_tab(OpenTabRequest::launch(AppType::Search));
            let again = manager.open_tab(
                OpenTabRequest::new("r", TabProps::empty(AppType::PdfViewer)).with_resource("same"),
            );
            prop_assert_eq!(&again, &first);
        }
        prop_assert_eq!(manager.tab_count(), repeats + 1);
    }
}
