//! Render loop: style spans, a batched terminal writer, viewport
//! scrolling, and row layout for the flattened document view.
//!
//! `render_frame` composes the three pieces the way `core-render`'s
//! `render_engine.rs` composes `Viewport`/`Writer`/`StyleLayer` into one
//! frame: clamp the viewport to the cursor, lay out each visible row,
//! and queue move/clear/print/style commands for a single flush.

pub mod layout;
pub mod style;
pub mod viewport;
pub mod writer;

pub use layout::{Row, flat_sub_column, layout_row};
pub use style::{StyleAttr, StyleLayer, StyleSpan};
pub use viewport::Viewport;
pub use writer::{Command, Writer};

use jtree_nav::NavItem;
use serde_json::Value;

/// Lay out and queue one frame's worth of writer commands for `items`,
/// given the current cursor row and terminal width. Does not flush.
pub fn render_frame(
    root: &Value,
    items: &[NavItem],
    cursor: usize,
    viewport: &mut Viewport,
    width: u16,
    plain: bool,
) -> Writer {
    viewport.clamp_cursor_into_view(cursor);
    let mut writer = if plain { Writer::plain() } else { Writer::new() };
    writer.clear_screen();
    for (screen_row, idx) in viewport.visible_range(items.len()).enumerate() {
        let row = layout_row(root, &items[idx]);
        let mut text = row.text;
        if text.len() > width as usize {
            text.truncate(width as usize);
        }
        writer.move_to(0, screen_row as u16);
        writer.clear_line();
        if idx == cursor {
            writer.set_style(StyleAttr::Cursor);
            writer.print(text);
            writer.reset_style();
        } else {
            writer.print(text);
        }
    }
    writer
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtree_core::BitSet;
    use jtree_nav::rebuild_items;
    use serde_json::json;

    #[test]
    fn render_frame_queues_one_row_per_visible_item() {
        let root = json!({"a": 1, "b": 2, "c": 3});
        let items = rebuild_items(&root, &BitSet::new());
        let mut vp = Viewport::new(2);
        let writer = render_frame(&root, &items, 0, &mut vp, 80, true);
        // clear_screen + (move, clear_line, print) per visible row, 2 rows visible.
        assert_eq!(writer.len(), 1 + 2 * 3);
    }

    #[test]
    fn render_frame_scrolls_viewport_to_cursor() {
        let root = json!({"a": 1, "b": 2, "c": 3, "d": 4});
        let items = rebuild_items(&root, &BitSet::new());
        let mut vp = Viewport::new(2);
        render_frame(&root, &items, 3, &mut vp, 80, true);
        assert_eq!(vp.first_row, 2);
    }
}
