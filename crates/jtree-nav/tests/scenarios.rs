use jtree_core::{Path, Step, eval};
use jtree_nav::NavState;
use serde_json::json;

#[test]
fn basic_navigation_expands_array_and_walks_into_nested_object() {
    let root = json!({"a": [1, 2, 3], "b": {"c": "d"}});
    let mut nav = NavState::new(root);

    // Root is always considered expanded for display without being in
    // the expansion set; its two children ("a" and "b") are the only
    // visible rows beyond it.
    let before = nav.items.len();

    let a_idx = nav
        .items
        .iter()
        .position(|i| i.key.as_deref() == Some("a"))
        .expect("\"a\" is visible under the root");
    nav.cursor = a_idx;
    nav.toggle_expand().expect("\"a\" is a container");
    nav.rebuild();

    assert_eq!(
        nav.items.len(),
        before + 3,
        "expanding a 3-element array adds exactly 3 rows"
    );

    let b_idx = nav
        .items
        .iter()
        .position(|i| i.key.as_deref() == Some("b"))
        .expect("\"b\" is visible under the root");
    nav.cursor = b_idx;
    nav.toggle_expand().expect("\"b\" is a container");
    nav.rebuild();

    let c_idx = nav
        .items
        .iter()
        .position(|i| i.key.as_deref() == Some("c"))
        .expect("\"c\" is visible once \"b\" is expanded");
    nav.cursor = c_idx;

    let item = nav.current_item().expect("cursor on a real row");
    assert_eq!(
        item.path,
        Path::new(vec![Step::Key("b".into()), Step::Key("c".into())])
    );
    assert_eq!(nav.current_value(), Some(&json!("d")));
}

#[test]
fn path_round_trip_holds_for_every_visible_item() {
    let root = json!({"a": [1, [2, 3], {"x": 4}], "b": 5});
    let mut nav = NavState::new(root.clone());
    nav.cursor = 0;
    nav.expand_recursive().expect("root is a container");
    nav.rebuild();

    for item in &nav.items {
        if item.is_flat() {
            continue;
        }
        let resolved = eval(&root, &item.path);
        let viewed = eval(&nav.root, &item.path);
        assert_eq!(resolved, viewed, "path {:?} should round-trip", item.path);
    }
}

#[test]
fn expansion_is_monotonic() {
    let root = json!({"a": [1, 2, 3, 4, 5]});
    let mut nav = NavState::new(root);
    let a_idx = nav
        .items
        .iter()
        .position(|i| i.key.as_deref() == Some("a"))
        .unwrap();
    nav.cursor = a_idx;

    let collapsed_count = nav.items.len();
    nav.toggle_expand().unwrap();
    nav.rebuild();
    let expanded_count = nav.items.len();
    assert!(expanded_count >= collapsed_count);

    nav.cursor = a_idx;
    nav.toggle_expand().unwrap();
    nav.rebuild();
    let recollapsed_count = nav.items.len();
    assert!(recollapsed_count <= expanded_count);
    assert_eq!(recollapsed_count, collapsed_count);
}

#[test]
fn focus_then_unfocus_restores_root_and_cursor_path() {
    // "b" sits directly under the root, so it stays visible across the
    // `expansion.clear()` that `focus`/`unfocus` perform (that only hides
    // a container's *children*, never the container's own row).
    let root = json!({"a": 1, "b": [1, 2, 3]});
    let mut nav = NavState::new(root);

    let b_idx = nav
        .items
        .iter()
        .position(|i| i.key.as_deref() == Some("b"))
        .unwrap();
    nav.cursor = b_idx;

    let root_before = nav.root.clone();
    let path_before = nav.current_item().unwrap().path.clone();

    nav.focus().expect("\"b\" is a container, focusable");
    nav.rebuild();
    nav.unfocus().expect("focus stack is non-empty");
    nav.rebuild();

    assert_eq!(nav.root, root_before);
    assert_eq!(nav.current_item().unwrap().path, path_before);
}
