//! Batched terminal writer, grounded on `core-render/src/writer.rs`: a
//! thin command queue so a frame's worth of cursor moves, line clears,
//! and text is built up, then flushed in one `queue!`/`flush` pass
//! rather than making a syscall per primitive.
//!
//! Extended with `SetStyle`/`ResetStyle` commands for the SGR sequences
//! spec.md's ambient "Terminal output" section calls for; `Writer::plain`
//! degrades every style command to a no-op, matching "styles degrade to
//! plain output when stdout is not a TTY or `--plain` is in effect."

use std::io::{Write, stdout};

use anyhow::Result;
use crossterm::queue;
use crossterm::style::{Attribute, Print, SetAttribute, SetForegroundColor};
use crossterm::{cursor::MoveTo, style::Color, terminal::{Clear, ClearType}};

use crate::style::StyleAttr;

#[derive(Debug)]
pub enum Command {
    MoveTo(u16, u16),
    ClearLine,
    ClearScreen,
    Print(String),
    SetStyle(StyleAttr),
    ResetStyle,
}

#[derive(Default)]
pub struct Writer {
    cmds: Vec<Command>,
    plain: bool,
}

impl Writer {
    pub fn new() -> Self {
        Self { cmds: Vec::new(), plain: false }
    }

    pub fn plain() -> Self {
        Self { cmds: Vec::new(), plain: true }
    }

    pub fn move_to(&mut self, x: u16, y: u16) {
        self.cmds.push(Command::MoveTo(x, y));
    }

    pub fn clear_line(&mut self) {
        self.cmds.push(Command::ClearLine);
    }

    pub fn clear_screen(&mut self) {
        self.cmds.push(Command::ClearScreen);
    }

    pub fn print<S: Into<String>>(&mut self, s: S) {
        let s: String = s.into();
        if !s.is_empty() {
            self.cmds.push(Command::Print(s));
        }
    }

    pub fn set_style(&mut self, attr: StyleAttr) {
        if !self.plain {
            self.cmds.push(Command::SetStyle(attr));
        }
    }

    pub fn reset_style(&mut self) {
        if !self.plain {
            self.cmds.push(Command::ResetStyle);
        }
    }

    pub fn len(&self) -> usize {
        self.cmds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cmds.is_empty()
    }

    pub fn flush(self) -> Result<()> {
        let mut out = stdout();
        for c in self.cmds {
            match c {
                Command::MoveTo(x, y) => queue!(out, MoveTo(x, y))?,
                Command::ClearLine => queue!(out, Clear(ClearType::CurrentLine))?,
                Command::ClearScreen => queue!(out, Clear(ClearType::All))?,
                Command::Print(s) => queue!(out, Print(s))?,
                Command::SetStyle(attr) => match attr {
                    StyleAttr::Cursor => queue!(out, SetAttribute(Attribute::Reverse))?,
                    StyleAttr::Bold => queue!(out, SetAttribute(Attribute::Bold))?,
                    StyleAttr::Italic => queue!(out, SetAttribute(Attribute::Italic))?,
                    StyleAttr::Dim => queue!(out, SetAttribute(Attribute::Dim))?,
                    StyleAttr::MatchHighlight => queue!(out, SetForegroundColor(Color::Yellow))?,
                },
                Command::ResetStyle => queue!(out, SetAttribute(Attribute::Reset))?,
            }
        }
        out.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_writer_drops_style_commands() {
        let mut w = Writer::plain();
        w.set_style(StyleAttr::Bold);
        w.reset_style();
        w.print("hi");
        assert_eq!(w.len(), 1);
    }

    #[test]
    fn styled_writer_queues_style_commands() {
        let mut w = Writer::new();
        w.set_style(StyleAttr::Bold);
        w.reset_style();
        assert_eq!(w.len(), 2);
    }

    #[test]
    fn empty_print_is_skipped() {
        let mut w = Writer::new();
        w.print("");
        assert!(w.is_empty());
    }
}
