//! Turns one [`jtree_nav::NavItem`] into a displayable row of text, and
//! resolves which sub-column within a packed flat-view row an absolute
//! array index lands on — the flat-view "which cell is highlighted"
//! question spec.md leaves to the render layer rather than the
//! navigation engine, since `NavState`'s cursor only tracks whole rows.

use jtree_core::{Step, eval, kind_label};
use jtree_nav::NavItem;
use serde_json::Value;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub depth: usize,
    pub text: String,
}

pub fn layout_row(root: &Value, item: &NavItem) -> Row {
    let indent = "  ".repeat(item.depth);
    if let Some(run) = item.flat {
        let cells: Vec<String> = (run.first_index..run.first_index + run.count)
            .filter_map(|i| {
                let mut p = item.path.clone();
                p.push(Step::Index(i));
                eval(root, &p).map(kind_label)
            })
            .collect();
        return Row {
            depth: item.depth,
            text: format!("{indent}{}", cells.join(", ")),
        };
    }
    let label = match (&item.key, item.index) {
        (Some(k), _) => format!("{k}: "),
        (None, Some(i)) => format!("[{i}]: "),
        (None, None) => String::new(),
    };
    let value_text = eval(root, &item.path).map(kind_label).unwrap_or_default();
    Row {
        depth: item.depth,
        text: format!("{indent}{label}{value_text}"),
    }
}

/// For a flat-view row, the zero-based offset of `target_index` within the
/// packed run, or `None` if `item` isn't a flat row or doesn't cover it.
pub fn flat_sub_column(item: &NavItem, target_index: usize) -> Option<usize> {
    let run = item.flat?;
    if target_index >= run.first_index && target_index < run.first_index + run.count {
        Some(target_index - run.first_index)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jtree_core::BitSet;
    use jtree_nav::rebuild_items;
    use serde_json::json;

    #[test]
    fn layout_normal_object_row() {
        let root = json!({"a": 1});
        let items = rebuild_items(&root, &BitSet::new());
        let row = layout_row(&root, &items[1]);
        assert_eq!(row.text, "  a: 1");
    }

    #[test]
    fn layout_flat_row_joins_cells() {
        let arr: Vec<Value> = (0..25).map(Value::from).collect();
        let root = Value::Array(arr);
        let items = rebuild_items(&root, &BitSet::new());
        let flat = items.iter().find(|i| i.is_flat()).unwrap();
        let row = layout_row(&root, flat);
        assert!(row.text.contains("0, 1, 2"));
    }

    #[test]
    fn flat_sub_column_resolves_offset() {
        let arr: Vec<Value> = (0..25).map(Value::from).collect();
        let root = Value::Array(arr);
        let items = rebuild_items(&root, &BitSet::new());
        let flat = items.iter().find(|i| i.is_flat()).unwrap();
        let run = flat.flat.unwrap();
        assert_eq!(flat_sub_column(flat, run.first_index + 3), Some(3));
        assert_eq!(flat_sub_column(flat, run.first_index + run.count + 5), None);
    }
}
