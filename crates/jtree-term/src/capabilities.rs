//! Terminal capability probing, grounded on `core-terminal/src/capabilities.rs`:
//! a small struct of booleans the render loop consults before choosing
//! styled VT100 output versus a plain degrade.

use std::io::IsTerminal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub struct TerminalCapabilities {
    /// False when stdout isn't a TTY (piped/redirected) — the render
    /// layer degrades to plain output in that case per spec.md §4 (ambient
    /// "Terminal output" section): styles are skipped, not substituted.
    pub is_tty: bool,
    pub supports_color: bool,
}

impl TerminalCapabilities {
    pub fn detect() -> Self {
        let is_tty = std::io::stdout().is_terminal();
        Self {
            is_tty,
            supports_color: is_tty,
        }
    }

    /// Force the plain/no-color degrade regardless of TTY status, for
    /// `--plain` and non-interactive CLI modes.
    pub fn plain() -> Self {
        Self {
            is_tty: false,
            supports_color: false,
        }
    }
}
