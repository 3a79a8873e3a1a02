use std::sync::OnceLock;

use zk_primitives::{hash_merge, Element, ZERO_VALUE};

/// The deepest tree supported, so that the leaf count always fits in a `u32`
pub const MAX_DEPTH: usize = 31;

/// The root of an empty subtree whose root sits at `level`
///
/// This function can be defined recursively:
///  - `empty_tree_hash(0) = ZERO_VALUE`
///  - `empty_tree_hash(n) = hash_merge([empty_tree_hash(n - 1), empty_tree_hash(n - 1)])`
///
/// All `MAX_DEPTH + 1` values are computed once and cached, so calls are essentially free after
/// the first.
///
/// ```rust
/// # use accumulator::*;
/// assert_eq!(empty_tree_hash(0), ZERO_VALUE);
/// assert_eq!(empty_tree_hash(1), hash_merge([ZERO_VALUE, ZERO_VALUE]));
///
/// // the root of an empty tree is the empty digest at its depth
/// assert_eq!(Tree::<20>::new().root(), empty_tree_hash(20));
/// ```
///
/// # Panics
///
/// Panics if `level` is greater than [`MAX_DEPTH`]
#[inline]
#[must_use]
pub fn empty_tree_hash(level: usize) -> Element {
    assert!(
        level <= MAX_DEPTH,
        "level {level} is deeper than the maximum supported depth {MAX_DEPTH}"
    );

    get_cache()[level]
}

fn get_cache() -> &'static [Element; MAX_DEPTH + 1] {
    static CACHE: OnceLock<[Element; MAX_DEPTH + 1]> = OnceLock::new();

    CACHE.get_or_init(|| {
        let mut cache = [ZERO_VALUE; MAX_DEPTH + 1];

        for level in 1..=MAX_DEPTH {
            let below = cache[level - 1];
            cache[level] = hash_merge([below, below]);
        }

        cache
    })
}
