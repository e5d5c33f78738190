//! Single-line raw-mode editor: keystroke table, history browsing,
//! tab-completion cycling, and a redisplay contract.
//!
//! Keystroke handling grounded on `core-input/src/key_token.rs`'s key
//! normalization shape (one small enum, one dispatch `match`).

mod history;
mod width;

pub use history::{DEFAULT_MAX as DEFAULT_HISTORY_MAX, History};
pub use width::display_width;

/// Input event the editor reacts to, decoupled from any particular
/// terminal backend's raw key representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Printable(char),
    Backspace,
    Delete,
    Left,
    Right,
    Home,
    End,
    CtrlA,
    CtrlE,
    CtrlK,
    CtrlU,
    CtrlW,
    CtrlL,
    Up,
    Down,
    CtrlP,
    CtrlN,
    CtrlR,
    Tab,
    ShiftTab,
    CtrlC,
    CtrlD,
    CtrlZ,
    Enter,
}

/// Result of feeding one key into the editor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// Keep editing; buffer may or may not have changed.
    Continue,
    /// Enter: the submitted line (also pushed to history by the caller).
    Submit(String),
    /// Ctrl-C: cancel, editor contract is "return length 0".
    Cancelled,
    /// Ctrl-D on an empty buffer: EOF, editor contract is "return -1".
    Eof,
    /// Ctrl-Z (POSIX only): suspend the process.
    Suspend,
    /// Ctrl-L: redisplay only, buffer unchanged.
    Redisplay,
}

/// Snapshot of cursor and buffer length taken at the first Tab press of
/// a completion cycle, handed to the completion callback on every
/// subsequent press in the same cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompletionSnapshot {
    pub cursor: usize,
    pub length: usize,
}

/// The completion callback owns the decision to rewrite buffer contents
/// and reposition the cursor; it returns `0` on success, negative on
/// error, mirroring the spec's C-flavored completion contract.
pub trait CompletionCallback {
    fn complete(
        &mut self,
        editor: &mut LineEditorState,
        snapshot: CompletionSnapshot,
        tab_count: u32,
    ) -> i32;
}

#[derive(Debug, Default)]
pub struct LineEditorState {
    buffer: String,
    cursor: usize,
    history_depth: Option<usize>,
    saved_input: Option<String>,
    tab_count: u32,
    tab_snapshot: Option<CompletionSnapshot>,
}

impl LineEditorState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn set_buffer(&mut self, text: &str) {
        self.buffer = text.to_string();
        self.cursor = self.buffer.len();
    }

    fn prev_char_boundary(&self) -> usize {
        let mut i = self.cursor;
        if i == 0 {
            return 0;
        }
        i -= 1;
        while i > 0 && !self.buffer.is_char_boundary(i) {
            i -= 1;
        }
        i
    }

    fn next_char_boundary(&self) -> usize {
        let mut i = self.cursor + 1;
        while i < self.buffer.len() && !self.buffer.is_char_boundary(i) {
            i += 1;
        }
        i.min(self.buffer.len())
    }

    fn reset_tab_cycle(&mut self) {
        self.tab_count = 0;
        self.tab_snapshot = None;
    }

    /// Feed one key into the editor. `history` supplies previous/next
    /// lines for Up/Down/Ctrl-P/Ctrl-N/Ctrl-R; `completion`, if present,
    /// is invoked on Tab/Shift-Tab.
    pub fn handle_key(
        &mut self,
        key: Key,
        history: &History,
        mut completion: Option<&mut dyn CompletionCallback>,
    ) -> Outcome {
        if !matches!(key, Key::Tab | Key::ShiftTab) {
            self.reset_tab_cycle();
        }
        match key {
            Key::Printable(c) => {
                self.buffer.insert(self.cursor, c);
                self.cursor += c.len_utf8();
                Outcome::Continue
            }
            Key::Backspace => {
                if self.cursor > 0 {
                    let start = self.prev_char_boundary();
                    self.buffer.drain(start..self.cursor);
                    self.cursor = start;
                }
                Outcome::Continue
            }
            Key::Delete => {
                if self.cursor < self.buffer.len() {
                    let end = self.next_char_boundary();
                    self.buffer.drain(self.cursor..end);
                }
                Outcome::Continue
            }
            Key::Left => {
                self.cursor = self.prev_char_boundary();
                Outcome::Continue
            }
            Key::Right => {
                self.cursor = self.next_char_boundary();
                Outcome::Continue
            }
            Key::Home | Key::CtrlA => {
                self.cursor = 0;
                Outcome::Continue
            }
            Key::End | Key::CtrlE => {
                self.cursor = self.buffer.len();
                Outcome::Continue
            }
            Key::CtrlK => {
                self.buffer.truncate(self.cursor);
                Outcome::Continue
            }
            Key::CtrlU => {
                self.buffer.clear();
                self.cursor = 0;
                Outcome::Continue
            }
            Key::CtrlW => {
                self.delete_word_backward();
                Outcome::Continue
            }
            Key::CtrlL => Outcome::Redisplay,
            Key::Up | Key::CtrlP | Key::CtrlR => {
                self.history_previous(history);
                Outcome::Continue
            }
            Key::Down | Key::CtrlN => {
                self.history_next(history);
                Outcome::Continue
            }
            Key::Tab | Key::ShiftTab => {
                self.tab_count += 1;
                let snapshot = *self.tab_snapshot.get_or_insert(CompletionSnapshot {
                    cursor: self.cursor,
                    length: self.buffer.len(),
                });
                if let Some(cb) = completion.as_deref_mut() {
                    cb.complete(self, snapshot, self.tab_count);
                }
                Outcome::Continue
            }
            Key::CtrlC => {
                self.buffer.clear();
                self.cursor = 0;
                Outcome::Cancelled
            }
            Key::CtrlD => {
                if self.buffer.is_empty() {
                    Outcome::Eof
                } else {
                    if self.cursor < self.buffer.len() {
                        let end = self.next_char_boundary();
                        self.buffer.drain(self.cursor..end);
                    }
                    Outcome::Continue
                }
            }
            Key::CtrlZ => Outcome::Suspend,
            Key::Enter => Outcome::Submit(std::mem::take(&mut self.buffer)),
        }
    }

    fn delete_word_backward(&mut self) {
        let before = &self.buffer[..self.cursor];
        let trimmed_end = before.trim_end_matches(' ').len();
        let word_start = before[..trimmed_end]
            .rfind(' ')
            .map(|i| i + 1)
            .unwrap_or(0);
        self.buffer.drain(word_start..self.cursor);
        self.cursor = word_start;
    }

    fn history_previous(&mut self, history: &History) {
        if history.is_empty() {
            return;
        }
        let next_depth = match self.history_depth {
            None => {
                self.saved_input = Some(self.buffer.clone());
                0
            }
            Some(d) => (d + 1).min(history.len() - 1),
        };
        if let Some(line) = history.get(next_depth) {
            self.set_buffer(line);
        }
        self.history_depth = Some(next_depth);
    }

    fn history_next(&mut self, history: &History) {
        match self.history_depth {
            None => {}
            Some(0) => {
                self.history_depth = None;
                if let Some(saved) = self.saved_input.take() {
                    self.set_buffer(&saved);
                }
            }
            Some(d) => {
                self.history_depth = Some(d - 1);
                if let Some(line) = history.get(d - 1) {
                    self.set_buffer(line);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(editor: &mut LineEditorState, k: Key, h: &History) -> Outcome {
        editor.handle_key(k, h, None)
    }

    #[test]
    fn insert_and_backspace() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        key(&mut e, Key::Printable('a'), &h);
        key(&mut e, Key::Printable('b'), &h);
        assert_eq!(e.buffer(), "ab");
        key(&mut e, Key::Backspace, &h);
        assert_eq!(e.buffer(), "a");
    }

    #[test]
    fn ctrl_k_truncates_to_cursor() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("hello");
        e.cursor = 2;
        key(&mut e, Key::CtrlK, &h);
        assert_eq!(e.buffer(), "he");
    }

    #[test]
    fn ctrl_u_clears() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("hello");
        key(&mut e, Key::CtrlU, &h);
        assert_eq!(e.buffer(), "");
        assert_eq!(e.cursor(), 0);
    }

    #[test]
    fn ctrl_w_deletes_word_backward() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("foo bar baz");
        key(&mut e, Key::CtrlW, &h);
        assert_eq!(e.buffer(), "foo bar ");
    }

    #[test]
    fn ctrl_c_cancels_with_empty_buffer() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("partial");
        let outcome = key(&mut e, Key::CtrlC, &h);
        assert_eq!(outcome, Outcome::Cancelled);
        assert_eq!(e.buffer(), "");
    }

    #[test]
    fn ctrl_d_on_empty_is_eof() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        let outcome = key(&mut e, Key::CtrlD, &h);
        assert_eq!(outcome, Outcome::Eof);
    }

    #[test]
    fn enter_submits_and_clears() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("hello");
        let outcome = key(&mut e, Key::Enter, &h);
        assert_eq!(outcome, Outcome::Submit("hello".to_string()));
        assert_eq!(e.buffer(), "");
    }

    #[test]
    fn history_up_loads_most_recent_then_older() {
        let mut e = LineEditorState::new();
        let mut h = History::new(10);
        h.push("first".into());
        h.push("second".into());
        key(&mut e, Key::Up, &h);
        assert_eq!(e.buffer(), "second");
        key(&mut e, Key::Up, &h);
        assert_eq!(e.buffer(), "first");
    }

    #[test]
    fn history_down_past_most_recent_restores_saved_input() {
        let mut e = LineEditorState::new();
        let mut h = History::new(10);
        h.push("first".into());
        e.set_buffer("typing");
        key(&mut e, Key::Up, &h);
        assert_eq!(e.buffer(), "first");
        key(&mut e, Key::Down, &h);
        assert_eq!(e.buffer(), "typing");
    }

    #[test]
    fn left_right_are_char_boundary_aware() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("café");
        e.cursor = e.buffer().len();
        key(&mut e, Key::Left, &h);
        assert!(e.buffer().is_char_boundary(e.cursor()));
        key(&mut e, Key::Backspace, &h);
        assert_eq!(e.buffer(), "caf");
    }

    struct CountingCompletion {
        calls: Vec<u32>,
    }

    impl CompletionCallback for CountingCompletion {
        fn complete(
            &mut self,
            _editor: &mut LineEditorState,
            _snapshot: CompletionSnapshot,
            tab_count: u32,
        ) -> i32 {
            self.calls.push(tab_count);
            0
        }
    }

    #[test]
    fn tab_cycles_with_stable_snapshot() {
        let mut e = LineEditorState::new();
        let h = History::new(10);
        e.set_buffer("foo");
        let mut cb = CountingCompletion { calls: Vec::new() };
        e.handle_key(Key::Tab, &h, Some(&mut cb));
        e.handle_key(Key::Tab, &h, Some(&mut cb));
        assert_eq!(cb.calls, vec![1, 2]);
    }
}
