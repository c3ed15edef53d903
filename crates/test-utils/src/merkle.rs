use airclaim_core::base::{Hash, combine};

/// Reference Merkle tree over already hashed leaves.
///
/// Levels with an odd number of nodes are padded with a zero hash. The tree
/// is built eagerly, so keep it small.
#[derive(Debug, Clone)]
pub struct MerkleTree {
    levels: Vec<Vec<Hash>>,
}

const PADDING: Hash = [0; 32];

impl MerkleTree {
    /// Build the tree.
    ///
    /// # Panics
    /// Panics if `leaves` is empty.
    #[must_use]
    pub fn new(leaves: Vec<Hash>) -> Self {
        assert!(!leaves.is_empty(), "Merkle tree needs at least one leaf");

        let mut levels = vec![leaves];
        while let Some(level) = levels.last().filter(|level| level.len() > 1) {
            let next = level
                .chunks(2)
                .map(|pair| match pair {
                    [left, right] => combine(left, right),
                    [left] => combine(left, &PADDING),
                    _ => unreachable!("chunks(2) yields one or two nodes"),
                })
                .collect();
            levels.push(next);
        }
        Self { levels }
    }

    /// Number of sibling hashes in every path.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len().saturating_sub(1)
    }

    /// Number of leaves.
    #[must_use]
    pub fn len(&self) -> usize {
        self.levels.first().map_or(0, Vec::len)
    }

    /// Whether the tree has no leaves. Always `false` for a built tree.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Root hash.
    #[must_use]
    pub fn root(&self) -> Hash {
        self.levels
            .last()
            .and_then(|level| level.first())
            .copied()
            .unwrap_or(PADDING)
    }

    /// Sibling path from leaf `index` to the root.
    ///
    /// # Panics
    /// Panics if `index` is out of range.
    #[must_use]
    pub fn path(&self, index: usize) -> Vec<Hash> {
        assert!(index < self.len(), "leaf index {index} out of range");

        let mut position = index;
        let mut path = Vec::with_capacity(self.depth());
        for level in self.levels.iter().take(self.depth()) {
            let sibling = level.get(position ^ 1).copied().unwrap_or(PADDING);
            path.push(sibling);
            position >>= 1;
        }
        path
    }
}
