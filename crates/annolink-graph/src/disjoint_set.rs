//! Disjoint-set forest over dense node ids.
//!
//! Thin wrapper over [`petgraph::unionfind::UnionFind`] (array-backed
//! parent/rank with path compression and union by rank) that also tracks
//! the number of remaining components, so Kruskal can stop as soon as the
//! tree is complete.

use petgraph::unionfind::UnionFind;

/// Union-find structure scoped to a single spanning-tree build.
#[derive(Debug, Clone)]
pub struct DisjointSetForest {
    sets: UnionFind<usize>,
    len: usize,
    components: usize,
}

impl DisjointSetForest {
    /// Create `n` singleton sets `{0}, {1}, ..., {n-1}`.
    #[must_use]
    pub fn new(n: usize) -> Self {
        Self {
            sets: UnionFind::new(n),
            len: n,
            components: n,
        }
    }

    /// Number of elements.
    #[must_use]
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Whether the forest has no elements.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Number of disjoint sets remaining.
    #[must_use]
    pub const fn component_count(&self) -> usize {
        self.components
    }

    /// Root of the set containing `x`, compressing the path on the way.
    ///
    /// # Panics
    ///
    /// Panics if `x >= self.len()`.
    pub fn find(&mut self, x: usize) -> usize {
        self.sets.find_mut(x)
    }

    /// Merge the sets containing `x` and `y`.
    ///
    /// Returns `true` if a merge happened, `false` if they were already in
    /// the same set.
    ///
    /// # Panics
    ///
    /// Panics if either element is out of range.
    pub fn union(&mut self, x: usize, y: usize) -> bool {
        let merged = self.sets.union(x, y);
        if merged {
            self.components -= 1;
        }
        merged
    }

    /// Whether `x` and `y` are in the same set.
    pub fn same_set(&mut self, x: usize, y: usize) -> bool {
        self.find(x) == self.find(y)
    }
}
