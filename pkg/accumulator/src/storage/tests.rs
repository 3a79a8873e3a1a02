use std::path::PathBuf;

use ::proptest::collection::vec;
use tempdir::TempDir;
use test_strategy::proptest;

use super::*;

fn setup_path() -> (TempDir, PathBuf) {
    let dir = TempDir::new("accumulator_db_test").unwrap();
    let file = dir.path().join("db");

    (dir, file)
}

#[test]
fn simple_storage_test() {
    let (_dir, path) = setup_path();
    let mut persistent = Persistent::<20>::open(&path).unwrap();

    assert!(persistent.tree().is_empty());

    assert_eq!(persistent.insert(Element::ONE).unwrap(), 0);
    assert_eq!(persistent.tree().len(), 1);
    let root = persistent.tree().root();

    drop(persistent);

    // now load it again
    let persistent = Persistent::<20>::open(&path).unwrap();
    assert!(persistent.tree().contains(Element::ONE));
    assert_eq!(persistent.tree().root(), root);
}

#[test]
fn full_tree_writes_nothing() {
    let (_dir, path) = setup_path();
    let mut persistent = Persistent::<2>::open(&path).unwrap();

    persistent
        .insert_batch((1..=3).map(Element::new))
        .unwrap();

    let result = persistent.insert_batch((4..=5).map(Element::new));
    assert!(matches!(
        result,
        Err(Error::Tree(crate::Error::TreeFull { capacity: 4 }))
    ));

    drop(persistent);

    let persistent = Persistent::<2>::open(&path).unwrap();
    assert_eq!(persistent.tree().len(), 3);
}

#[test]
fn replay_persists_events() {
    let (_dir, path) = setup_path();
    let mut persistent = Persistent::<8>::open(&path).unwrap();

    let events: Vec<_> = (0..4u32)
        .map(|i| CommitEvent {
            commitment: Element::new(u64::from(i) + 10),
            leaf_index: i,
            timestamp: 1_700_000_000,
        })
        .collect();

    assert_eq!(persistent.replay(events.iter().rev().copied()).unwrap(), 4);
    assert_eq!(persistent.replay(events.iter().copied()).unwrap(), 0);

    let (tree, db) = persistent.into_parts();
    let record = db.get(leaf_key(2)).unwrap().unwrap();
    assert_eq!(
        LeafRecord::from_bytes(&record).unwrap(),
        LeafRecord::V1 {
            commitment: Element::new(12),
            timestamp: Some(1_700_000_000),
        }
    );

    drop(db);

    let persistent = Persistent::<8>::open(&path).unwrap();
    assert_eq!(persistent.tree(), &tree);
}

#[test]
fn inconsistent_replay_writes_nothing() {
    let (_dir, path) = setup_path();
    let mut persistent = Persistent::<8>::open(&path).unwrap();

    let events = [
        CommitEvent {
            commitment: Element::new(1),
            leaf_index: 0,
            timestamp: 0,
        },
        CommitEvent {
            commitment: Element::new(3),
            leaf_index: 2,
            timestamp: 0,
        },
    ];

    assert!(matches!(
        persistent.replay(events),
        Err(Error::Tree(crate::Error::OutOfOrder {
            expected: 1,
            found: 2
        }))
    ));
    assert!(persistent.tree().is_empty());

    drop(persistent);

    let persistent = Persistent::<8>::open(&path).unwrap();
    assert!(persistent.tree().is_empty());
}

#[test]
fn missing_leaf_is_a_consistency_error() {
    let (_dir, path) = setup_path();
    let mut persistent = Persistent::<8>::open(&path).unwrap();
    persistent.insert_batch((0..4).map(Element::new)).unwrap();

    let (_, db) = persistent.into_parts();
    db.delete(leaf_key(1)).unwrap();
    drop(db);

    let result = Persistent::<8>::open(&path);
    assert!(matches!(
        result,
        Err(Error::DatabaseConsistency {
            expected: 1,
            found: 2
        })
    ));
}

// rocksdb makes these slow, so keep the case count low
#[proptest(cases = 10)]
fn reload_gives_same_tree(
    #[strategy(vec(::proptest::prelude::any::<Element>(), 0..50))] first: Vec<Element>,
    #[strategy(vec(::proptest::prelude::any::<Element>(), 0..50))] second: Vec<Element>,
) {
    let (_dir, path) = setup_path();

    let mut persistent = Persistent::<16>::open(&path).unwrap();
    persistent.insert_batch(first.iter().copied()).unwrap();
    for element in &second {
        persistent.insert(*element).unwrap();
    }
    let (tree, db) = persistent.into_parts();
    drop(db);

    let reloaded = Persistent::<16>::open(&path).unwrap();

    let expected = Tree::<16>::from_leaves(first.into_iter().chain(second)).unwrap();
    assert_eq!(reloaded.tree(), &tree);
    assert_eq!(reloaded.tree().root(), expected.root());
}
