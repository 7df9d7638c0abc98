//! Dense integer indexing for work item ids.
//!
//! The critical-path walk keeps its memo and visited flags in plain vectors
//! addressed through this index.

use rustc_hash::FxHashMap;

/// Position of an id in the index.
pub type ItemIdx = u32;

#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    positions: FxHashMap<String, ItemIdx>,
    ids: Vec<String>,
}

impl ItemIndex {
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            positions: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            ids: Vec::with_capacity(capacity),
        }
    }

    /// Return the index for `id`, assigning the next slot on first sight.
    pub fn intern(&mut self, id: &str) -> ItemIdx {
        if let Some(&idx) = self.positions.get(id) {
            return idx;
        }
        let idx = self.ids.len() as ItemIdx;
        self.ids.push(id.to_string());
        self.positions.insert(id.to_string(), idx);
        idx
    }

    #[cfg(test)]
    pub fn get(&self, id: &str) -> Option<ItemIdx> {
        self.positions.get(id).copied()
    }

    #[inline]
    pub fn resolve(&self, idx: ItemIdx) -> Option<&str> {
        self.ids.get(idx as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}
