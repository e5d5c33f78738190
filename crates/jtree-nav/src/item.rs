use jtree_core::Path;

/// A flat-view packed row: `count` consecutive array elements starting at
/// `first_index`, rendered as one compact line instead of `count` rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlatRun {
    pub first_index: usize,
    pub count: usize,
}

/// One visible row in the flattened tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NavItem {
    /// Path from the (possibly focused) root to this row's value. For a
    /// flat-view row this is the path of the *parent array*; the row's
    /// anchor position is carried in `flat`.
    pub path: Path,
    pub depth: usize,
    pub key: Option<String>,
    pub index: Option<usize>,
    pub flat: Option<FlatRun>,
}

impl NavItem {
    pub fn root() -> Self {
        NavItem {
            path: Path::default(),
            depth: 0,
            key: None,
            index: None,
            flat: None,
        }
    }

    pub fn normal(path: Path, depth: usize, key: Option<String>, index: Option<usize>) -> Self {
        NavItem {
            path,
            depth,
            key,
            index,
            flat: None,
        }
    }

    pub fn flat_row(parent_path: Path, depth: usize, first_index: usize, count: usize) -> Self {
        NavItem {
            path: parent_path,
            depth,
            key: None,
            index: Some(first_index),
            flat: Some(FlatRun { first_index, count }),
        }
    }

    pub fn is_flat(&self) -> bool {
        self.flat.is_some()
    }
}
