//! Depth-first flatten of the focused document into [`NavItem`] rows,
//! respecting expansion state and packing long arrays into flat-view
//! runs. Grounded on `core-render/src/viewport.rs`'s visible-window
//! abstraction, generalized from "lines of a text buffer" to "rows of a
//! flattened JSON tree".

use jtree_core::{BitSet, Path, Step, container_id, is_container};
use serde_json::Value;

use crate::item::NavItem;

pub const FLAT_THRESHOLD: usize = 20;
pub const FLAT_WIDTH: usize = 10;

/// Tuning knobs for the big-array flattening rule (spec.md §9): arrays
/// longer than `threshold` are packed into fixed-`width` rows instead of
/// one row per element. Defaults to [`FLAT_THRESHOLD`]/[`FLAT_WIDTH`];
/// overridable at runtime from `jtree-config`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatLayout {
    pub width: usize,
    pub threshold: usize,
}

impl Default for FlatLayout {
    fn default() -> Self {
        FlatLayout {
            width: FLAT_WIDTH,
            threshold: FLAT_THRESHOLD,
        }
    }
}

pub fn rebuild_items(root: &Value, expansion: &BitSet) -> Vec<NavItem> {
    rebuild_items_with_layout(root, expansion, FlatLayout::default())
}

pub fn rebuild_items_with_layout(root: &Value, expansion: &BitSet, layout: FlatLayout) -> Vec<NavItem> {
    let mut items = vec![NavItem::root()];
    walk(root, &Path::default(), 0, expansion, layout, &mut items);
    items
}

fn child_is_expanded_container(value: &Value, expansion: &BitSet) -> bool {
    is_container(value) && expansion.contains(container_id(value))
}

fn walk(
    container: &Value,
    path: &Path,
    depth: usize,
    expansion: &BitSet,
    layout: FlatLayout,
    items: &mut Vec<NavItem>,
) {
    match container {
        Value::Object(map) => {
            for (key, child) in map {
                let mut child_path = path.clone();
                child_path.push(Step::Key(key.clone()));
                items.push(NavItem::normal(
                    child_path.clone(),
                    depth + 1,
                    Some(key.clone()),
                    None,
                ));
                if child_is_expanded_container(child, expansion) {
                    walk(child, &child_path, depth + 1, expansion, layout, items);
                }
            }
        }
        Value::Array(arr) => {
            if arr.len() > layout.threshold {
                walk_flat_array(arr, path, depth, expansion, layout, items);
            } else {
                for (idx, child) in arr.iter().enumerate() {
                    let mut child_path = path.clone();
                    child_path.push(Step::Index(idx));
                    items.push(NavItem::normal(child_path.clone(), depth + 1, None, Some(idx)));
                    if child_is_expanded_container(child, expansion) {
                        walk(child, &child_path, depth + 1, expansion, layout, items);
                    }
                }
            }
        }
        _ => {}
    }
}

fn walk_flat_array(
    arr: &[Value],
    path: &Path,
    depth: usize,
    expansion: &BitSet,
    layout: FlatLayout,
    items: &mut Vec<NavItem>,
) {
    let mut i = 0;
    while i < arr.len() {
        let mut run_end = i;
        while run_end < arr.len() && !child_is_expanded_container(&arr[run_end], expansion) {
            run_end += 1;
        }
        let mut row_start = i;
        while row_start < run_end {
            let row_len = (run_end - row_start).min(layout.width);
            items.push(NavItem::flat_row(path.clone(), depth + 1, row_start, row_len));
            row_start += row_len;
        }
        if run_end < arr.len() {
            let mut child_path = path.clone();
            child_path.push(Step::Index(run_end));
            items.push(NavItem::normal(
                child_path.clone(),
                depth + 1,
                None,
                Some(run_end),
            ));
            walk(&arr[run_end], &child_path, depth + 1, expansion, layout, items);
            i = run_end + 1;
        } else {
            i = run_end;
        }
    }
}

/// Number of leading steps two paths share.
pub fn common_prefix_len(a: &Path, b: &Path) -> usize {
    a.steps()
        .iter()
        .zip(b.steps().iter())
        .take_while(|(x, y)| x == y)
        .count()
}
