/// Tree cache service — lazy, memoised, one-level directory expansion for
/// drill-down navigation.
///
/// Unlike the scan orchestrator nothing is walked up front. `get_node`
/// lists one directory, measures each child (in parallel on the rayon pool),
/// and leaves every child in the not-expanded state. The result is cached by
/// absolute path until [`TreeCache::clear_cache`] or LRU eviction; there is no
/// time-based invalidation, so external changes show up only after a refresh.
///
/// The cache mutex is held for lookups and inserts only. Two threads asking
/// for the same uncached path may both list it; the second insert wins.
mod lru;
pub mod node;
pub mod probe;

pub use node::{Children, TreeNode};
pub use probe::{EntryKind, FsProbe, ListedEntry, OsProbe};

use crate::cancel::CancelToken;
use crate::config::TreeConfig;
use crate::error::{CoreError, Result};
use crate::size::SizeSummary;
use compact_str::CompactString;
use self::lru::LruNodes;
use parking_lot::Mutex;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{debug, trace};

/// Answer to a navigation request.
#[derive(Debug, Clone)]
pub enum NodeLookup {
    Node(Arc<TreeNode>),
    /// `depth` exceeds the configured maximum. Not an error: the UI can warn
    /// and retry through [`TreeCache::get_node_unbounded`].
    DepthLimitReached {
        path: PathBuf,
        depth: usize,
        max_depth: usize,
    },
}

impl NodeLookup {
    pub fn node(&self) -> Option<&Arc<TreeNode>> {
        match self {
            NodeLookup::Node(node) => Some(node),
            NodeLookup::DepthLimitReached { .. } => None,
        }
    }
}

pub struct TreeCache {
    probe: Arc<dyn FsProbe>,
    max_depth: usize,
    nodes: Mutex<LruNodes>,
}

impl TreeCache {
    /// A cache over the real filesystem.
    pub fn new(config: &TreeConfig) -> Self {
        Self::with_probe(Arc::new(OsProbe), config)
    }

    pub fn with_probe(probe: Arc<dyn FsProbe>, config: &TreeConfig) -> Self {
        Self {
            probe,
            max_depth: config.max_depth,
            nodes: Mutex::new(LruNodes::new(config.cache_capacity)),
        }
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The expanded node for `path`, or `DepthLimitReached` past the maximum depth.
    pub fn get_node(&self, path: &Path, depth: usize) -> Result<NodeLookup> {
        self.get_node_with_cancel(path, depth, &CancelToken::new())
    }

    pub fn get_node_with_cancel(
        &self,
        path: &Path,
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<NodeLookup> {
        if depth > self.max_depth {
            debug!(
                "Depth limit reached at {} ({depth} > {})",
                path.display(),
                self.max_depth
            );
            return Ok(NodeLookup::DepthLimitReached {
                path: path.to_path_buf(),
                depth,
                max_depth: self.max_depth,
            });
        }
        self.lookup_or_expand(path, depth, cancel)
            .map(NodeLookup::Node)
    }

    /// Expand `path` regardless of the depth limit, after the user opted in.
    pub fn get_node_unbounded(&self, path: &Path, depth: usize) -> Result<Arc<TreeNode>> {
        self.lookup_or_expand(path, depth, &CancelToken::new())
    }

    /// Drop every cached node.
    pub fn clear_cache(&self) {
        self.nodes.lock().clear();
        debug!("Tree cache cleared");
    }

    pub fn cached_len(&self) -> usize {
        self.nodes.lock().len()
    }

    pub fn is_cached(&self, path: &Path) -> bool {
        self.nodes.lock().contains(path)
    }

    fn lookup_or_expand(
        &self,
        path: &Path,
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<Arc<TreeNode>> {
        if !path.is_absolute() {
            return Err(CoreError::NotAbsolute(path.to_path_buf()));
        }
        if let Some(hit) = self.nodes.lock().get(path) {
            trace!("Tree cache hit: {}", path.display());
            return Ok(hit);
        }

        let node = Arc::new(self.expand(path, depth, cancel)?);
        self.nodes.lock().insert(Arc::clone(&node));
        Ok(node)
    }

    /// List `path` once and measure each child; children stay unexpanded.
    fn expand(&self, path: &Path, depth: usize, cancel: &CancelToken) -> Result<TreeNode> {
        let listing = self
            .probe
            .list_dir(path)
            .map_err(|e| CoreError::root_access(path, e))?;

        let child_depth = depth + 1;
        let mut children: Vec<TreeNode> = listing
            .into_par_iter()
            .map(|entry| self.measure_child(entry, child_depth, cancel))
            .collect::<Result<_>>()?;

        // Largest first; name breaks ties so the order is reproducible.
        children.sort_by(|a, b| {
            b.size_bytes
                .cmp(&a.size_bytes)
                .then_with(|| a.name.cmp(&b.name))
        });

        let mut total = SizeSummary::default();
        for child in &children {
            total += SizeSummary {
                size_bytes: child.size_bytes,
                file_count: child.file_count,
            };
        }

        Ok(TreeNode {
            path: path.to_path_buf(),
            name: display_name(path),
            size_bytes: total.size_bytes,
            file_count: total.file_count,
            is_dir: true,
            children: Children::Expanded(children),
            depth,
        })
    }

    fn measure_child(
        &self,
        entry: ListedEntry,
        depth: usize,
        cancel: &CancelToken,
    ) -> Result<TreeNode> {
        cancel.check()?;
        let summary = match entry.kind {
            EntryKind::File => SizeSummary::single_file(entry.len),
            EntryKind::Other => SizeSummary::default(),
            EntryKind::Dir => match self.probe.measure(&entry.path, cancel) {
                Ok(summary) => summary,
                Err(CoreError::Cancelled) => return Err(CoreError::Cancelled),
                Err(err) => {
                    // Unreadable child: keep it visible with zero size.
                    debug!("Cannot measure {}: {err}", entry.path.display());
                    SizeSummary::default()
                }
            },
        };
        Ok(TreeNode::unexpanded(
            entry.path,
            entry.name,
            entry.kind == EntryKind::Dir,
            summary.size_bytes,
            summary.file_count,
            depth,
        ))
    }
}

fn display_name(path: &Path) -> CompactString {
    match path.file_name() {
        Some(name) => CompactString::new(name.to_string_lossy()),
        None => CompactString::new(path.to_string_lossy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::fs;
    use std::io;
    use tempfile::TempDir;

    /// Wraps the real filesystem and counts listings per path.
    #[derive(Default)]
    struct CountingProbe {
        listings: Mutex<HashMap<PathBuf, usize>>,
    }

    impl CountingProbe {
        fn listings_of(&self, path: &Path) -> usize {
            self.listings.lock().get(path).copied().unwrap_or(0)
        }
    }

    impl FsProbe for CountingProbe {
        fn list_dir(&self, dir: &Path) -> io::Result<Vec<ListedEntry>> {
            *self.listings.lock().entry(dir.to_path_buf()).or_default() += 1;
            OsProbe.list_dir(dir)
        }

        fn measure(&self, dir: &Path, cancel: &CancelToken) -> Result<SizeSummary> {
            OsProbe.measure(dir, cancel)
        }
    }

    fn config(max_depth: usize, cache_capacity: usize) -> TreeConfig {
        TreeConfig {
            max_depth,
            cache_capacity,
        }
    }

    fn sample_tree() -> TempDir {
        let tmp = TempDir::new().unwrap();
        let big = tmp.path().join("big");
        let small = tmp.path().join("small");
        fs::create_dir_all(big.join("nested")).unwrap();
        fs::create_dir_all(&small).unwrap();
        fs::write(big.join("a.bin"), vec![0u8; 1_000]).unwrap();
        fs::write(big.join("nested").join("b.bin"), vec![0u8; 500]).unwrap();
        fs::write(small.join("c.bin"), vec![0u8; 10]).unwrap();
        fs::write(tmp.path().join("loose.txt"), vec![0u8; 100]).unwrap();
        tmp
    }

    #[test]
    fn expands_one_level_with_measured_children() {
        let tmp = sample_tree();
        let cache = TreeCache::new(&config(8, 16));
        let lookup = cache.get_node(tmp.path(), 0).unwrap();
        let node = lookup.node().unwrap();

        assert_eq!(node.size_bytes, 1_610);
        assert_eq!(node.file_count, 4);
        assert_eq!(node.depth, 0);

        let children = node.children.as_slice().unwrap();
        let names: Vec<_> = children.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["big", "loose.txt", "small"]);
        assert_eq!(children[0].size_bytes, 1_500);
        assert_eq!(children[0].file_count, 2);
        assert!(children[0].is_dir);
        assert!(!children[1].is_dir);
        assert!(children.iter().all(|c| c.depth == 1));
        assert!(children.iter().all(|c| !c.children.is_expanded()));
    }

    #[test]
    fn empty_directory_expands_to_zero_children() {
        let tmp = TempDir::new().unwrap();
        let cache = TreeCache::new(&config(8, 16));
        let lookup = cache.get_node(tmp.path(), 0).unwrap();
        let node = lookup.node().unwrap();
        assert_eq!(node.children, Children::Expanded(Vec::new()));
    }

    #[test]
    fn second_request_is_a_cache_hit() {
        let tmp = sample_tree();
        let probe = Arc::new(CountingProbe::default());
        let cache = TreeCache::with_probe(probe.clone(), &config(8, 16));

        let first = cache.get_node(tmp.path(), 0).unwrap();
        let second = cache.get_node(tmp.path(), 0).unwrap();
        assert_eq!(probe.listings_of(tmp.path()), 1);
        assert!(Arc::ptr_eq(first.node().unwrap(), second.node().unwrap()));

        cache.clear_cache();
        assert_eq!(cache.cached_len(), 0);
        cache.get_node(tmp.path(), 0).unwrap();
        assert_eq!(probe.listings_of(tmp.path()), 2);
    }

    #[test]
    fn drilling_down_lists_only_the_requested_child() {
        let tmp = sample_tree();
        let probe = Arc::new(CountingProbe::default());
        let cache = TreeCache::with_probe(probe.clone(), &config(8, 16));

        cache.get_node(tmp.path(), 0).unwrap();
        assert_eq!(probe.listings_of(&tmp.path().join("big")), 0);

        let big = cache.get_node(&tmp.path().join("big"), 1).unwrap();
        assert_eq!(big.node().unwrap().depth, 1);
        assert_eq!(probe.listings_of(&tmp.path().join("big")), 1);
        assert_eq!(probe.listings_of(&tmp.path().join("small")), 0);
    }

    #[test]
    fn depth_limit_is_a_soft_result() {
        let tmp = sample_tree();
        let probe = Arc::new(CountingProbe::default());
        let cache = TreeCache::with_probe(probe.clone(), &config(2, 16));

        match cache.get_node(tmp.path(), 3).unwrap() {
            NodeLookup::DepthLimitReached {
                depth, max_depth, ..
            } => {
                assert_eq!(depth, 3);
                assert_eq!(max_depth, 2);
            }
            NodeLookup::Node(_) => panic!("expected the depth guard to trip"),
        }
        assert_eq!(probe.listings_of(tmp.path()), 0);

        let node = cache.get_node_unbounded(tmp.path(), 3).unwrap();
        assert_eq!(node.depth, 3);
    }

    #[test]
    fn missing_path_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let cache = TreeCache::new(&config(8, 16));
        let err = cache.get_node(&tmp.path().join("gone"), 0).unwrap_err();
        assert!(matches!(err, CoreError::RootAccess { .. }));
        assert_eq!(cache.cached_len(), 0);
    }

    #[test]
    fn relative_path_is_rejected() {
        let cache = TreeCache::new(&config(8, 16));
        let err = cache.get_node(Path::new("relative/dir"), 0).unwrap_err();
        assert!(matches!(err, CoreError::NotAbsolute(_)));
    }

    #[test]
    fn capacity_bounds_the_cache() {
        let tmp = sample_tree();
        let cache = TreeCache::new(&config(8, 2));
        cache.get_node(tmp.path(), 0).unwrap();
        cache.get_node(&tmp.path().join("big"), 1).unwrap();
        cache.get_node(&tmp.path().join("small"), 1).unwrap();
        assert_eq!(cache.cached_len(), 2);
        assert!(!cache.is_cached(tmp.path()));
    }
}
