//! Merkle inclusion verification over `BLAKE2b-256`.
//!
//! Interior nodes are `BLAKE2b-256(left || right)`. Leaves are supplied by the
//! caller already hashed.

use super::hash::{HASH_SIZE, Hash, blake2b256};

/// Combine two children into their parent node.
#[must_use]
pub fn combine(left: &Hash, right: &Hash) -> Hash {
    let mut preimage = [0_u8; HASH_SIZE * 2];
    let (lhs, rhs) = preimage.split_at_mut(HASH_SIZE);
    lhs.copy_from_slice(left);
    rhs.copy_from_slice(right);
    blake2b256(&preimage)
}

/// Recompute a root from a leaf, its ordered sibling path and its position.
///
/// At level `i`, bit `i` of `index` selects whether the running value is the
/// left (`0`) or right (`1`) child. Returns `None` without hashing when the
/// path is longer than `max_depth`.
#[must_use]
pub fn derive_root(leaf: &Hash, siblings: &[Hash], index: u64, max_depth: usize) -> Option<Hash> {
    if siblings.len() > max_depth {
        return None;
    }

    let mut node = *leaf;
    let mut position = index;

    for sibling in siblings {
        node = if position & 1 == 0 {
            combine(&node, sibling)
        } else {
            combine(sibling, &node)
        };
        position >>= 1;
    }

    Some(node)
}

/// Check that `leaf` at `index` is included under `root`.
#[must_use]
pub fn verify_inclusion(
    leaf: &Hash,
    siblings: &[Hash],
    index: u64,
    max_depth: usize,
    root: &Hash,
) -> bool {
    derive_root(leaf, siblings, index, max_depth).is_some_and(|derived| &derived == root)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(v: u8) -> Hash {
        blake2b256(&[v])
    }

    #[test]
    fn empty_path_returns_leaf() {
        let l = leaf(1);
        assert_eq!(derive_root(&l, &[], 0, 0), Some(l));
    }

    #[test]
    fn index_bits_select_child_side() {
        let (a, b, c, d) = (leaf(0), leaf(1), leaf(2), leaf(3));
        let ab = combine(&a, &b);
        let cd = combine(&c, &d);
        let root = combine(&ab, &cd);

        assert_eq!(derive_root(&a, &[b, cd], 0, 2), Some(root));
        assert_eq!(derive_root(&b, &[a, cd], 1, 2), Some(root));
        assert_eq!(derive_root(&c, &[d, ab], 2, 2), Some(root));
        assert_eq!(derive_root(&d, &[c, ab], 3, 2), Some(root));
        assert_ne!(derive_root(&d, &[c, ab], 2, 2), Some(root));
    }

    #[test]
    fn overlong_path_is_rejected() {
        let l = leaf(9);
        let path = [leaf(1), leaf(2), leaf(3)];
        assert_eq!(derive_root(&l, &path, 0, 2), None);
        assert!(!verify_inclusion(&l, &path, 0, 2, &l));
    }

    #[test]
    fn order_matters() {
        let (a, b) = (leaf(1), leaf(2));
        assert_ne!(combine(&a, &b), combine(&b, &a));
    }
}
