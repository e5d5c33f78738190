//! Aggregate session state: the navigation engine plus the two line
//! editors (command line, search line), their histories, the status
//! message, and the search mode/query/pattern cache.
//!
//! spec.md §3 describes these as one bundled "Navigation State" record;
//! `jtree-nav::NavState` only covers the core navigation subset so its
//! own dependency stays narrow, and this crate composes the rest on top,
//! the way `core-state::EditorState` composes a `View` with a command
//! line buffer and an ephemeral-status slot.

use serde_json::Value;

use jtree_core::Path;
use jtree_edit::{History, LineEditorState};
use jtree_nav::NavState;
use jtree_search::PatternCache;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchMode {
    Recursive,
    QueryScoped(Path),
}

pub struct AppState {
    pub nav: NavState,
    /// The as-loaded document, kept aside so `reset` can undo structural
    /// transformations (`sort`, `filter`) without re-reading the source.
    pub original_root: Value,
    pub command_editor: LineEditorState,
    pub command_history: History,
    pub search_editor: LineEditorState,
    pub search_history: History,
    pub message: Option<String>,
    pub search_mode: Option<SearchMode>,
    pub pattern: Option<PatternCache>,
    pub indent: usize,
    pub braceless: bool,
    pub quit: bool,
}

impl AppState {
    pub fn new(root: Value) -> Self {
        Self::with_options(root, jtree_nav::FlatLayout::default(), jtree_edit::DEFAULT_HISTORY_MAX)
    }

    /// Construct with a non-default flat-view layout and history limit,
    /// the two session knobs `jtree-config` can override at startup.
    pub fn with_options(root: Value, layout: jtree_nav::FlatLayout, history_limit: usize) -> Self {
        AppState {
            nav: NavState::with_layout(root.clone(), layout),
            original_root: root,
            command_editor: LineEditorState::new(),
            command_history: History::new(history_limit),
            search_editor: LineEditorState::new(),
            search_history: History::new(history_limit),
            message: None,
            search_mode: None,
            pattern: None,
            indent: 0,
            braceless: false,
            quit: false,
        }
    }

    pub fn set_message(&mut self, text: impl Into<String>) {
        self.message = Some(text.into());
    }

    /// Set (or replace) the active search pattern, eagerly parsing its
    /// typed-numeric cache once rather than on every candidate test.
    pub fn set_search_pattern(&mut self, pattern: &str, mode: SearchMode) {
        self.pattern = Some(PatternCache::new(pattern));
        self.search_mode = Some(mode);
    }

    pub fn advance_search(&mut self, forward: bool) -> bool {
        let Some(pattern) = &self.pattern else {
            return false;
        };
        let query = match &self.search_mode {
            Some(SearchMode::QueryScoped(p)) => Some(p),
            _ => None,
        };
        if forward {
            self.nav.search_next(pattern, query)
        } else {
            self.nav.search_prev(pattern, query)
        }
    }
}
