use ::proptest::{collection::vec, prelude::*};
use test_strategy::proptest;

use crate::{Element, Error, Tree};

const DEPTH: usize = 6;

fn leaf_sequence() -> impl Strategy<Value = Vec<Element>> {
    vec(any::<Element>(), 0..=64)
}

#[proptest(cases = 64)]
fn incremental_root_matches_rebuild(#[strategy(leaf_sequence())] leaves: Vec<Element>) {
    let mut incremental = Tree::<DEPTH>::new();
    for leaf in &leaves {
        incremental.insert(*leaf).unwrap();
    }

    let rebuilt = Tree::<DEPTH>::from_leaves(leaves).unwrap();

    prop_assert_eq!(incremental.root(), rebuilt.root());
}

#[proptest(cases = 32)]
fn every_inserted_leaf_has_a_sound_path(#[strategy(leaf_sequence())] leaves: Vec<Element>) {
    let tree = Tree::<DEPTH>::from_leaves(leaves.iter().copied()).unwrap();

    for leaf in &leaves {
        let path = tree.proof(*leaf).unwrap();

        prop_assert_eq!(path.leaf, *leaf);
        prop_assert_eq!(path.compute_root(), tree.root());
        prop_assert_eq!(tree.leaf(path.leaf_index), Some(*leaf));
    }
}

#[proptest(cases = 64)]
fn missing_leaf_is_unknown(
    #[strategy(leaf_sequence())] leaves: Vec<Element>,
    missing: Element,
) {
    prop_assume!(!leaves.contains(&missing));

    let tree = Tree::<DEPTH>::from_leaves(leaves).unwrap();

    prop_assert_eq!(tree.proof(missing), Err(Error::UnknownElement(missing)));
}

#[proptest(cases = 32)]
fn path_bits_are_the_leaf_index(
    #[strategy(1..=64usize)] len: usize,
    #[strategy(0..#len)] index: usize,
) {
    let tree = Tree::<DEPTH>::from_leaves((0..len as u64).map(Element::new)).unwrap();
    let path = tree.path_for_index(index as u32).unwrap();

    let from_bits = path
        .indices
        .iter()
        .enumerate()
        .fold(0, |acc, (bit, set)| acc | (usize::from(*set) << bit));

    prop_assert_eq!(from_bits, index);
}
