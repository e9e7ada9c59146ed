/// Bounded least-recently-used map of expanded nodes, keyed by absolute path.
///
/// A capacity of 0 means unbounded. Eviction scans for the oldest stamp,
/// which is O(n) but only runs on insert into a full cache.
use super::node::TreeNode;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

pub(crate) struct LruNodes {
    capacity: usize,
    clock: u64,
    entries: HashMap<PathBuf, (Arc<TreeNode>, u64)>,
}

impl LruNodes {
    pub(crate) fn new(capacity: usize) -> Self {
        Self {
            capacity,
            clock: 0,
            entries: HashMap::new(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    pub(crate) fn get(&mut self, path: &Path) -> Option<Arc<TreeNode>> {
        let stamp = self.tick();
        let (node, last_used) = self.entries.get_mut(path)?;
        *last_used = stamp;
        Some(Arc::clone(node))
    }

    pub(crate) fn insert(&mut self, node: Arc<TreeNode>) {
        if self.capacity > 0
            && self.entries.len() >= self.capacity
            && !self.entries.contains_key(&node.path)
        {
            self.evict_oldest();
        }
        let stamp = self.tick();
        self.entries.insert(node.path.clone(), (node, stamp));
    }

    fn evict_oldest(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, (_, stamp))| *stamp)
            .map(|(path, _)| path.clone());
        if let Some(path) = oldest {
            self.entries.remove(&path);
        }
    }

    pub(crate) fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn contains(&self, path: &Path) -> bool {
        self.entries.contains_key(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use compact_str::CompactString;

    fn node(path: &str) -> Arc<TreeNode> {
        Arc::new(TreeNode::unexpanded(
            PathBuf::from(path),
            CompactString::new(path),
            true,
            0,
            0,
            0,
        ))
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut lru = LruNodes::new(2);
        lru.insert(node("/a"));
        lru.insert(node("/b"));
        assert!(lru.get(Path::new("/a")).is_some());
        lru.insert(node("/c"));

        assert!(lru.contains(Path::new("/a")));
        assert!(!lru.contains(Path::new("/b")));
        assert!(lru.contains(Path::new("/c")));
        assert_eq!(lru.len(), 2);
    }

    #[test]
    fn reinserting_a_key_does_not_evict() {
        let mut lru = LruNodes::new(2);
        lru.insert(node("/a"));
        lru.insert(node("/b"));
        lru.insert(node("/a"));
        assert_eq!(lru.len(), 2);
        assert!(lru.contains(Path::new("/b")));
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let mut lru = LruNodes::new(0);
        for i in 0..100 {
            lru.insert(node(&format!("/n{i}")));
        }
        assert_eq!(lru.len(), 100);
        lru.clear();
        assert_eq!(lru.len(), 0);
    }
}
