/// One directory level in the lazy navigation tree.
use compact_str::CompactString;
use std::path::PathBuf;

/// Either the not-yet-expanded sentinel or the complete listing of a
/// node's immediate children. Never partially populated.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Children {
    #[default]
    NotExpanded,
    Expanded(Vec<TreeNode>),
}

impl Children {
    pub fn is_expanded(&self) -> bool {
        matches!(self, Children::Expanded(_))
    }

    /// The listing, or `None` if this node has not been expanded.
    pub fn as_slice(&self) -> Option<&[TreeNode]> {
        match self {
            Children::NotExpanded => None,
            Children::Expanded(nodes) => Some(nodes),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TreeNode {
    pub path: PathBuf,
    /// Final path component only.
    pub name: CompactString,
    pub size_bytes: u64,
    pub file_count: u64,
    pub is_dir: bool,
    pub children: Children,
    /// Distance from the navigation root.
    pub depth: usize,
}

impl TreeNode {
    /// A leaf or unexpanded directory.
    pub fn unexpanded(
        path: PathBuf,
        name: CompactString,
        is_dir: bool,
        size_bytes: u64,
        file_count: u64,
        depth: usize,
    ) -> Self {
        Self {
            path,
            name,
            size_bytes,
            file_count,
            is_dir,
            children: Children::NotExpanded,
            depth,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_expansion_is_distinct_from_not_expanded() {
        let none = Children::NotExpanded;
        let empty = Children::Expanded(Vec::new());
        assert!(!none.is_expanded());
        assert!(none.as_slice().is_none());
        assert!(empty.is_expanded());
        assert_eq!(empty.as_slice().map(<[TreeNode]>::len), Some(0));
    }
}
