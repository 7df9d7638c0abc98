//! Critical path length per work item via a memoized dependency walk.

use rustc_hash::FxHashMap;

use crate::interner::{ItemIdx, ItemIndex};
use crate::log_debug;
use crate::models::WorkItem;

/// Dependency graph over work item ids.
///
/// Ids that appear only as dependency targets are indexed without a duration
/// and contribute nothing to any path.
pub struct DependencyGraph {
    index: ItemIndex,
    durations: Vec<Option<i64>>,
    deps: Vec<Vec<ItemIdx>>,
}

impl DependencyGraph {
    /// Build the graph from already-merged item dependency lists.
    pub fn build(items: &[WorkItem]) -> Self {
        let mut index = ItemIndex::with_capacity(items.len());
        for item in items {
            index.intern(&item.id);
        }

        let mut durations = vec![None; index.len()];
        let mut deps: Vec<Vec<ItemIdx>> = vec![Vec::new(); index.len()];

        for item in items {
            let idx = index.intern(&item.id) as usize;
            durations[idx] = Some(item.duration);
            for dep_id in &item.dependencies {
                let dep_idx = index.intern(dep_id);
                if dep_idx as usize >= durations.len() {
                    durations.push(None);
                    deps.push(Vec::new());
                }
                if !deps[idx].contains(&dep_idx) {
                    deps[idx].push(dep_idx);
                }
            }
        }

        Self {
            index,
            durations,
            deps,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Critical path length for every work item in the graph.
    pub fn critical_paths(&self) -> FxHashMap<String, i64> {
        let n = self.len();
        let mut memo: Vec<Option<i64>> = vec![None; n];
        let mut visiting = vec![false; n];
        let mut result = FxHashMap::with_capacity_and_hasher(n, Default::default());

        for idx in 0..n as ItemIdx {
            if self.durations[idx as usize].is_none() {
                continue;
            }
            let length = self.resolve(idx, &mut memo, &mut visiting);
            if let Some(id) = self.index.resolve(idx) {
                result.insert(id.to_string(), length);
            }
        }

        result
    }

    /// Post-order walk with an explicit stack so deep chains cannot overflow.
    fn resolve(&self, root: ItemIdx, memo: &mut [Option<i64>], visiting: &mut [bool]) -> i64 {
        let root = root as usize;
        if let Some(length) = memo[root] {
            return length;
        }
        if self.durations[root].is_none() {
            return 0;
        }

        // (item, next dependency position, longest dependency path so far)
        let mut stack: Vec<(usize, usize, i64)> = vec![(root, 0, 0)];
        visiting[root] = true;

        while let Some(&(i, pos, longest)) = stack.last() {
            let top = stack.len() - 1;
            if let Some(&dep) = self.deps[i].get(pos) {
                stack[top].1 += 1;
                let d = dep as usize;
                if let Some(length) = memo[d] {
                    stack[top].2 = longest.max(length);
                } else if self.durations[d].is_some() && !visiting[d] {
                    visiting[d] = true;
                    stack.push((d, 0, 0));
                }
                // Unknown ids and back edges contribute nothing
                continue;
            }

            stack.pop();
            visiting[i] = false;
            let length = self.durations[i].unwrap_or(0) + longest;
            memo[i] = Some(length);
            match stack.last_mut() {
                Some(parent) => parent.2 = parent.2.max(length),
                None => return length,
            }
        }

        0
    }
}

/// Compute the critical path map for a set of work items.
pub fn compute_critical_paths(items: &[WorkItem], verbosity: u8) -> FxHashMap<String, i64> {
    let graph = DependencyGraph::build(items);
    let paths = graph.critical_paths();
    log_debug!(
        verbosity,
        "Critical paths computed for {} items ({} ids indexed)",
        paths.len(),
        graph.len()
    );
    paths
}

/// Longest critical path in the map, 0 when empty.
pub fn critical_path_length(paths: &FxHashMap<String, i64>) -> i64 {
    paths.values().copied().max().unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{WorkItemKind, DEFAULT_PRIORITY};

    fn make_item(id: &str, duration: i64, deps: &[&str]) -> WorkItem {
        WorkItem {
            id: id.to_string(),
            name: id.to_string(),
            kind: WorkItemKind::Task,
            duration,
            priority: DEFAULT_PRIORITY,
            deadline: None,
            dependencies: deps.iter().map(|d| d.to_string()).collect(),
            async_wait: None,
            critical_path: 0,
            cognitive_complexity: None,
        }
    }

    #[test]
    fn test_independent_items_equal_own_duration() {
        let items = vec![make_item("a", 30, &[]), make_item("b", 90, &[])];
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get("a"), Some(&30));
        assert_eq!(paths.get("b"), Some(&90));
        assert_eq!(critical_path_length(&paths), 90);
    }

    #[test]
    fn test_chain_accumulates() {
        let items = vec![
            make_item("c", 10, &["b"]),
            make_item("b", 20, &["a"]),
            make_item("a", 30, &[]),
        ];
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get("a"), Some(&30));
        assert_eq!(paths.get("b"), Some(&50));
        assert_eq!(paths.get("c"), Some(&60));
    }

    #[test]
    fn test_diamond_takes_longest_branch() {
        let items = vec![
            make_item("a", 10, &[]),
            make_item("b", 20, &["a"]),
            make_item("c", 50, &["a"]),
            make_item("d", 5, &["b", "c"]),
        ];
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get("d"), Some(&65));
    }

    #[test]
    fn test_missing_dependency_contributes_nothing() {
        let items = vec![make_item("a", 40, &["deleted-task"])];
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get("a"), Some(&40));
        assert!(!paths.contains_key("deleted-task"));
    }

    #[test]
    fn test_cycle_is_truncated() {
        let items = vec![make_item("a", 10, &["b"]), make_item("b", 20, &["a"])];
        let paths = compute_critical_paths(&items, 0);
        // a -> b -> (a again, contributes 0) = 10 + 20
        assert_eq!(paths.get("a"), Some(&30));
        // b was memoized while resolving a
        assert_eq!(paths.get("b"), Some(&20));
    }

    #[test]
    fn test_self_dependency() {
        let items = vec![make_item("a", 25, &["a"])];
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get("a"), Some(&25));
    }

    #[test]
    fn test_duplicate_dependency_ids_collapse() {
        let graph = DependencyGraph::build(&[make_item("a", 5, &[]), make_item("b", 5, &["a", "a"])]);
        assert_eq!(graph.len(), 2);
        assert_eq!(graph.critical_paths().get("b"), Some(&10));
    }

    #[test]
    fn test_deep_chain_does_not_overflow_stack() {
        let depth = 200_000;
        let items: Vec<WorkItem> = (0..depth)
            .map(|i| {
                let deps = if i == 0 { vec![] } else { vec![format!("s{}", i - 1)] };
                WorkItem {
                    dependencies: deps,
                    ..make_item(&format!("s{i}"), 1, &[])
                }
            })
            .rev()
            .collect();
        let paths = compute_critical_paths(&items, 0);
        assert_eq!(paths.get(&format!("s{}", depth - 1)), Some(&(depth as i64)));
        assert_eq!(paths.get("s0"), Some(&1));
    }
}
