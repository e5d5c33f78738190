//! Navigation Engine: flattened view of the focused document, expansion
//! state, cursor movement, and the focus stack.
//!
//! Rebuild/cursor-preservation grounded on `core-render/src/viewport.rs`
//! (visible-window abstraction) and `core-model`'s `View`/cursor
//! `Position`. Focus push/pop grounded on `core-state`'s buffer-switch
//! pattern (an `active` index plus a stack of stored buffers).
//!
//! The full "Navigation State" data model (§3) also bundles the command
//! and search line editors and the message buffer with the item vector;
//! those live one layer up (in the dispatcher-facing aggregate state)
//! so this crate's dependency stays `jtree-core` + `jtree-search` only,
//! matching the rest of the workspace's narrow per-crate dependency
//! discipline.

mod error;
mod item;
mod rebuild;

pub use error::NavError;
pub use item::{FlatRun, NavItem};
pub use rebuild::{
    FLAT_THRESHOLD, FLAT_WIDTH, FlatLayout, common_prefix_len, rebuild_items,
    rebuild_items_with_layout,
};

use jtree_core::{ContainerId, Path, Step, container_id, eval, is_container};
use jtree_search::PatternCache;
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDir {
    Up,
    Down,
}

pub struct NavState {
    pub root: Value,
    pub focus_stack: Vec<Value>,
    pub items: Vec<NavItem>,
    pub cursor: usize,
    pub scroll_offset: usize,
    pub expansion: jtree_core::BitSet,
    pub needs_rebuild: bool,
    pub layout: rebuild::FlatLayout,
    last_cursor_path: Path,
    /// Cursor path to restore on the matching `unfocus`, one entry per
    /// `focus_stack` entry. Kept separate from `last_cursor_path` (which
    /// `rebuild` overwrites on every call) so `focus`/`unfocus` round-trip
    /// the cursor exactly rather than falling back to prefix-matching.
    focus_return_paths: Vec<Path>,
}

impl NavState {
    pub fn new(root: Value) -> Self {
        Self::with_layout(root, rebuild::FlatLayout::default())
    }

    pub fn with_layout(root: Value, layout: rebuild::FlatLayout) -> Self {
        let mut state = NavState {
            root,
            focus_stack: Vec::new(),
            items: Vec::new(),
            cursor: 0,
            scroll_offset: 0,
            expansion: jtree_core::BitSet::new(),
            needs_rebuild: true,
            layout,
            last_cursor_path: Path::default(),
            focus_return_paths: Vec::new(),
        };
        state.rebuild();
        state
    }

    /// Regenerate `items` from `root`/`expansion`, preserving the cursor's
    /// logical position via longest-prefix match on the old path.
    pub fn rebuild(&mut self) {
        if let Some(current) = self.items.get(self.cursor) {
            self.last_cursor_path = current.path.clone();
        }
        self.items = rebuild_items_with_layout(&self.root, &self.expansion, self.layout);
        self.cursor = self.restore_cursor();
        self.needs_rebuild = false;
    }

    fn restore_cursor(&self) -> usize {
        if self.items.is_empty() {
            return 0;
        }
        let mut best_idx = 0;
        let mut best_len = 0;
        for (i, item) in self.items.iter().enumerate() {
            let len = common_prefix_len(&item.path, &self.last_cursor_path);
            if len > best_len {
                best_len = len;
                best_idx = i;
            }
        }
        best_idx
    }

    pub fn current_item(&self) -> Option<&NavItem> {
        self.items.get(self.cursor)
    }

    pub fn current_value(&self) -> Option<&Value> {
        eval(&self.root, &self.items.get(self.cursor)?.path)
    }

    /// Whether the cursor sits on a container that is currently expanded;
    /// `false` for scalars and for collapsed containers alike.
    pub fn current_is_expanded(&self) -> bool {
        self.container_id_at(self.cursor)
            .is_some_and(|id| self.expansion.contains(id))
    }

    fn container_id_at(&self, idx: usize) -> Option<ContainerId> {
        let item = self.items.get(idx)?;
        let value = eval(&self.root, &item.path)?;
        is_container(value).then(|| container_id(value))
    }

    pub fn move_cursor(&mut self, delta: isize) {
        let len = self.items.len().max(1) as isize;
        let next = (self.cursor as isize + delta).clamp(0, len - 1);
        self.cursor = next as usize;
    }

    pub fn page(&mut self, dir: PageDir, visible_height: usize) {
        let delta = visible_height.max(1) as isize;
        match dir {
            PageDir::Up => self.move_cursor(-delta),
            PageDir::Down => self.move_cursor(delta),
        }
    }

    pub fn jump_home(&mut self) {
        self.cursor = 0;
    }

    pub fn jump_end(&mut self) {
        self.cursor = self.items.len().saturating_sub(1);
    }

    pub fn find_parent(&self, i: usize) -> Option<usize> {
        let depth = self.items.get(i)?.depth;
        if depth == 0 {
            return None;
        }
        (0..i).rev().find(|&j| self.items[j].depth < depth)
    }

    pub fn jump_next_sibling(&mut self) {
        let Some(depth) = self.items.get(self.cursor).map(|i| i.depth) else {
            return;
        };
        for j in (self.cursor + 1)..self.items.len() {
            if self.items[j].depth < depth {
                break;
            }
            if self.items[j].depth == depth {
                self.cursor = j;
                break;
            }
        }
    }

    pub fn jump_prev_sibling(&mut self) {
        let Some(depth) = self.items.get(self.cursor).map(|i| i.depth) else {
            return;
        };
        for j in (0..self.cursor).rev() {
            if self.items[j].depth < depth {
                break;
            }
            if self.items[j].depth == depth {
                self.cursor = j;
                break;
            }
        }
    }

    pub fn jump_parent(&mut self, collapse: bool) {
        let Some(parent_idx) = self.find_parent(self.cursor) else {
            return;
        };
        self.cursor = parent_idx;
        if collapse {
            if let Some(id) = self.container_id_at(parent_idx) {
                if self.expansion.contains(id) {
                    self.expansion.remove(id);
                    self.needs_rebuild = true;
                }
            }
        }
    }

    pub fn jump_nth_child(&mut self, n: usize) {
        let Some(depth) = self.items.get(self.cursor).map(|i| i.depth) else {
            return;
        };
        let mut children = Vec::new();
        for j in (self.cursor + 1)..self.items.len() {
            if self.items[j].depth <= depth {
                break;
            }
            if self.items[j].depth == depth + 1 {
                children.push(j);
            }
        }
        if let Some(&last) = children.last() {
            let clamped = n.min(children.len() - 1);
            self.cursor = children.get(clamped).copied().unwrap_or(last);
        }
    }

    pub fn toggle_expand(&mut self) -> Result<(), NavError> {
        let id = self
            .container_id_at(self.cursor)
            .ok_or(NavError::NotAContainer)?;
        self.expansion.toggle(id);
        self.needs_rebuild = true;
        Ok(())
    }

    pub fn expand_recursive(&mut self) -> Result<(), NavError> {
        let path = self.items[self.cursor].path.clone();
        let value = eval(&self.root, &path).ok_or(NavError::NotAContainer)?;
        if !is_container(value) {
            return Err(NavError::NotAContainer);
        }
        let mut ids = Vec::new();
        collect_container_ids(value, &mut ids);
        for id in ids {
            self.expansion.add(id);
        }
        self.needs_rebuild = true;
        Ok(())
    }

    pub fn collapse_all(&mut self) {
        self.expansion.clear();
        self.needs_rebuild = true;
    }

    pub fn focus(&mut self) -> Result<(), NavError> {
        let path = self.items[self.cursor].path.clone();
        let value = eval(&self.root, &path).ok_or(NavError::NotAContainer)?.clone();
        if !is_container(&value) {
            return Err(NavError::NotAContainer);
        }
        let previous_root = std::mem::replace(&mut self.root, value);
        self.focus_stack.push(previous_root);
        self.focus_return_paths.push(path);
        self.expansion.clear();
        self.last_cursor_path = Path::default();
        self.needs_rebuild = true;
        Ok(())
    }

    pub fn unfocus(&mut self) -> Result<(), NavError> {
        let previous_root = self.focus_stack.pop().ok_or(NavError::AlreadyAtTop)?;
        let return_path = self.focus_return_paths.pop().unwrap_or_default();
        self.root = previous_root;
        self.expansion.clear();
        self.last_cursor_path = return_path;
        self.needs_rebuild = true;
        Ok(())
    }

    /// Follow `path` from the root, expanding every container along the
    /// way, and land the cursor on the deepest step that still resolves.
    pub fn navigate_to_path(&mut self, path: &Path) {
        let mut resolvable = Path::default();
        let mut current = &self.root;
        for step in path.steps() {
            if is_container(current) {
                self.expansion.add(container_id(current));
            }
            let next = match (step, current) {
                (Step::Key(k), Value::Object(m)) => m.get(k),
                (Step::Index(i), Value::Array(a)) => a.get(*i),
                _ => None,
            };
            match next {
                Some(v) => {
                    resolvable.push(step.clone());
                    current = v;
                }
                None => break,
            }
        }
        self.last_cursor_path = resolvable;
        self.rebuild();
    }

    fn jump_to_match(&mut self, path: &Path) {
        for prefix in jtree_search::prefixes(path) {
            if let Some(v) = eval(&self.root, &prefix) {
                if is_container(v) {
                    self.expansion.add(container_id(v));
                }
            }
        }
        self.last_cursor_path = path.clone();
        self.rebuild();
    }

    fn collect_hits(&self, pattern: &PatternCache, query: Option<&Path>) -> Vec<Path> {
        match query {
            Some(q) => jtree_search::query_search(&self.root, q, pattern).collect(),
            None => jtree_search::recursive_search(&self.root, pattern)
                .map(|hit| hit.path)
                .collect(),
        }
    }

    /// Cycle to the next match in document order, wrapping around.
    /// Returns `false` if there are no matches. The underlying walk is
    /// still streamed (see `jtree_search`); materializing it here is the
    /// cost of supporting wraparound relative to the current cursor.
    pub fn search_next(&mut self, pattern: &PatternCache, query: Option<&Path>) -> bool {
        let hits = self.collect_hits(pattern, query);
        let Some(target) = cycle(&hits, self.current_item().map(|i| &i.path), 1) else {
            return false;
        };
        self.jump_to_match(&target);
        true
    }

    pub fn search_prev(&mut self, pattern: &PatternCache, query: Option<&Path>) -> bool {
        let hits = self.collect_hits(pattern, query);
        let Some(target) = cycle(&hits, self.current_item().map(|i| &i.path), -1) else {
            return false;
        };
        self.jump_to_match(&target);
        true
    }
}

fn cycle(hits: &[Path], current: Option<&Path>, direction: isize) -> Option<Path> {
    if hits.is_empty() {
        return None;
    }
    let start = current
        .and_then(|p| hits.iter().position(|h| h == p))
        .map(|i| i as isize)
        .unwrap_or(-1);
    let len = hits.len() as isize;
    let next = (start + direction).rem_euclid(len);
    Some(hits[next as usize].clone())
}

fn collect_container_ids(value: &Value, out: &mut Vec<ContainerId>) {
    if is_container(value) {
        out.push(container_id(value));
        match value {
            Value::Array(items) => {
                for item in items {
                    collect_container_ids(item, out);
                }
            }
            Value::Object(map) => {
                for child in map.values() {
                    collect_container_ids(child, out);
                }
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn cursor_starts_at_root() {
        let nav = NavState::new(json!({"a": 1}));
        assert_eq!(nav.cursor, 0);
    }

    #[test]
    fn toggle_expand_then_rebuild_reveals_children() {
        let mut nav = NavState::new(json!({"a": {"b": 1}}));
        nav.move_cursor(1);
        nav.toggle_expand().unwrap();
        nav.rebuild();
        assert_eq!(nav.items.len(), 3);
    }

    #[test]
    fn toggle_expand_on_leaf_errors() {
        let mut nav = NavState::new(json!({"a": 1}));
        nav.move_cursor(1);
        assert_eq!(nav.toggle_expand(), Err(NavError::NotAContainer));
    }

    #[test]
    fn current_is_expanded_tracks_toggle() {
        let mut nav = NavState::new(json!({"a": {"b": 1}}));
        nav.move_cursor(1);
        assert!(!nav.current_is_expanded());
        nav.toggle_expand().unwrap();
        assert!(nav.current_is_expanded());
    }

    #[test]
    fn focus_then_unfocus_round_trips() {
        let mut nav = NavState::new(json!({"a": {"b": 1}}));
        nav.move_cursor(1);
        nav.focus().unwrap();
        assert_eq!(nav.root, json!({"b": 1}));
        nav.unfocus().unwrap();
        assert_eq!(nav.root, json!({"a": {"b": 1}}));
    }

    #[test]
    fn unfocus_with_empty_stack_errors() {
        let mut nav = NavState::new(json!({"a": 1}));
        assert_eq!(nav.unfocus(), Err(NavError::AlreadyAtTop));
    }

    #[test]
    fn focus_on_leaf_errors() {
        let mut nav = NavState::new(json!({"a": 1}));
        nav.move_cursor(1);
        assert_eq!(nav.focus(), Err(NavError::NotAContainer));
    }

    #[test]
    fn jump_nth_child_clamps_out_of_range() {
        let mut nav = NavState::new(json!({"a": 1, "b": 2}));
        nav.jump_nth_child(99);
        // clamps to the last (2nd) child rather than erroring.
        assert_eq!(nav.items[nav.cursor].key.as_deref(), Some("b"));
    }

    #[test]
    fn siblings_move_within_same_parent() {
        let mut nav = NavState::new(json!({"a": 1, "b": 2, "c": 3}));
        nav.jump_nth_child(0);
        assert_eq!(nav.items[nav.cursor].key.as_deref(), Some("a"));
        nav.jump_next_sibling();
        assert_eq!(nav.items[nav.cursor].key.as_deref(), Some("b"));
        nav.jump_prev_sibling();
        assert_eq!(nav.items[nav.cursor].key.as_deref(), Some("a"));
    }

    #[test]
    fn navigate_to_path_expands_ancestors_and_lands_deepest() {
        let mut nav = NavState::new(json!({"a": {"b": {"c": 1}}}));
        let (path, _) = jtree_core::parse_path("a.b.c");
        nav.navigate_to_path(&path);
        assert_eq!(nav.items[nav.cursor].path.display(), "a.b.c");
    }

    #[test]
    fn navigate_to_missing_path_lands_on_deepest_resolvable_prefix() {
        let mut nav = NavState::new(json!({"a": {"b": 1}}));
        let (path, _) = jtree_core::parse_path("a.missing.c");
        nav.navigate_to_path(&path);
        assert_eq!(nav.items[nav.cursor].path.display(), "a");
    }

    #[test]
    fn search_next_wraps_around() {
        let mut nav = NavState::new(json!({"a": 1, "b": 1, "c": 1}));
        let pattern = PatternCache::new("1");
        assert!(nav.search_next(&pattern, None));
        let first = nav.items[nav.cursor].path.display();
        assert!(nav.search_next(&pattern, None));
        assert!(nav.search_next(&pattern, None));
        assert!(nav.search_next(&pattern, None));
        let wrapped = nav.items[nav.cursor].path.display();
        assert_eq!(first, wrapped);
    }

    #[test]
    fn search_match_in_collapsed_container_expands_ancestors() {
        let mut nav = NavState::new(json!({"a": {"b": "needle"}}));
        let pattern = PatternCache::new("needle");
        assert_eq!(nav.items.len(), 2); // root + "a" row, "b" hidden
        assert!(nav.search_next(&pattern, None));
        assert_eq!(nav.items[nav.cursor].path.display(), "a.b");
    }
}
