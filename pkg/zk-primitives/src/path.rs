use crate::{hash_merge, Element};

/// Fold a leaf up to a root along an authentication path
///
/// `siblings` yields `(sibling, index_bit)` pairs in leaf-to-root order, where `index_bit` is the
/// corresponding bit of the leaf index (the `pathIndices` signal of the circuits):
///  - `false`: the current node is a left child, so the next node is `hash_merge([node, sibling])`
///  - `true`: the current node is a right child, so the next node is `hash_merge([sibling, node])`
///
/// ```rust
/// # use zk_primitives::*;
/// let a = hash_merge([Element::new(0), Element::new(1)]);
/// let b = hash_merge([Element::new(2), Element::new(3)]);
/// let root = hash_merge([a, b]);
///
/// // leaf 2 has index 0b10
/// let siblings = [(Element::new(3), false), (a, true)];
///
/// assert_eq!(compute_merkle_root(Element::new(2), siblings), root);
/// assert_ne!(compute_merkle_root(Element::new(4), siblings), root);
/// ```
pub fn compute_merkle_root<I: IntoIterator<Item = (Element, bool)>>(
    mut node: Element,
    siblings: I,
) -> Element {
    for (sibling, bit) in siblings {
        node = match bit {
            false => hash_merge([node, sibling]),
            true => hash_merge([sibling, node]),
        };
    }

    node
}
