//! Pending-key chord composition for the navigation mode's multi-key
//! sequences (`gg`, `zR`, `zM`, a leading count before `g`).
//!
//! Grounded directly on `core-keymap/src/lib.rs`'s `PendingContext` /
//! `compose_with_context` state machine: a small amount of buffered
//! state (an optional leading digit-count, an optional pending first
//! key) that either resolves to an action or asks the caller for one
//! more key.

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NavAction {
    Move(isize),
    CollapseOrParent,
    ExpandOrEnter,
    JumpHome,
    JumpEnd,
    PrevSibling,
    NextSibling,
    ExpandRecursive,
    CollapseAll,
    OpenSearchRecursive,
    OpenSearchQueryScoped,
    NextMatch,
    PrevMatch,
    OpenCommand,
    ToggleExpand,
    JumpNthChild(usize),
    Quit,
}

#[derive(Debug, Default)]
pub struct PendingContext {
    count: Option<usize>,
    pending: Option<char>,
}

impl PendingContext {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.count = None;
        self.pending = None;
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some() || self.count.is_some()
    }

    /// Feed one decoded key character through the composer. Returns
    /// `Some(action)` once a full chord resolves, `None` while more keys
    /// are awaited (a leading count, or the first half of `gg`/`zR`/`zM`).
    pub fn compose_with_context(&mut self, c: char) -> Option<NavAction> {
        if let Some(first) = self.pending.take() {
            let resolved = match (first, c) {
                ('g', 'g') => Some(NavAction::JumpHome),
                ('z', 'R') => Some(NavAction::ExpandRecursive),
                ('z', 'M') => Some(NavAction::CollapseAll),
                _ => None,
            };
            self.count = None;
            return resolved.or_else(|| self.compose_fresh(c));
        }
        if c.is_ascii_digit() && !(c == '0' && self.count.is_none()) {
            let digit = c.to_digit(10).unwrap() as usize;
            self.count = Some(self.count.unwrap_or(0) * 10 + digit);
            return None;
        }
        self.compose_fresh(c)
    }

    fn finish(&mut self, action: NavAction) -> Option<NavAction> {
        self.count = None;
        Some(action)
    }

    fn compose_fresh(&mut self, c: char) -> Option<NavAction> {
        match c {
            'g' => {
                if let Some(n) = self.count.take() {
                    Some(NavAction::JumpNthChild(n))
                } else {
                    self.pending = Some('g');
                    None
                }
            }
            'z' => {
                self.pending = Some('z');
                None
            }
            'j' => self.finish(NavAction::Move(1)),
            'k' => self.finish(NavAction::Move(-1)),
            'h' => self.finish(NavAction::CollapseOrParent),
            'l' => self.finish(NavAction::ExpandOrEnter),
            'G' => self.finish(NavAction::JumpEnd),
            '{' => self.finish(NavAction::PrevSibling),
            '}' => self.finish(NavAction::NextSibling),
            '/' => self.finish(NavAction::OpenSearchRecursive),
            '?' => self.finish(NavAction::OpenSearchQueryScoped),
            'n' => self.finish(NavAction::NextMatch),
            'N' => self.finish(NavAction::PrevMatch),
            ':' => self.finish(NavAction::OpenCommand),
            '\r' | '\n' => self.finish(NavAction::ToggleExpand),
            'q' => self.finish(NavAction::Quit),
            _ => {
                self.count = None;
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_keys_resolve_immediately() {
        let mut ctx = PendingContext::new();
        assert_eq!(ctx.compose_with_context('j'), Some(NavAction::Move(1)));
        assert_eq!(ctx.compose_with_context('k'), Some(NavAction::Move(-1)));
    }

    #[test]
    fn gg_resolves_to_home() {
        let mut ctx = PendingContext::new();
        assert_eq!(ctx.compose_with_context('g'), None);
        assert_eq!(ctx.compose_with_context('g'), Some(NavAction::JumpHome));
    }

    #[test]
    fn zr_and_zm_chords() {
        let mut ctx = PendingContext::new();
        assert_eq!(ctx.compose_with_context('z'), None);
        assert_eq!(ctx.compose_with_context('R'), Some(NavAction::ExpandRecursive));
        assert_eq!(ctx.compose_with_context('z'), None);
        assert_eq!(ctx.compose_with_context('M'), Some(NavAction::CollapseAll));
    }

    #[test]
    fn count_then_g_jumps_to_nth_child() {
        let mut ctx = PendingContext::new();
        assert_eq!(ctx.compose_with_context('1'), None);
        assert_eq!(ctx.compose_with_context('0'), None);
        assert_eq!(
            ctx.compose_with_context('g'),
            Some(NavAction::JumpNthChild(10))
        );
    }

    #[test]
    fn unrecognized_second_key_still_dispatches_fresh() {
        let mut ctx = PendingContext::new();
        assert_eq!(ctx.compose_with_context('g'), None);
        // 'j' doesn't complete a `g` chord, so it's interpreted fresh.
        assert_eq!(ctx.compose_with_context('j'), Some(NavAction::Move(1)));
    }

    #[test]
    fn clear_drops_any_pending_state() {
        let mut ctx = PendingContext::new();
        ctx.compose_with_context('g');
        assert!(ctx.has_pending());
        ctx.clear();
        assert!(!ctx.has_pending());
    }
}
