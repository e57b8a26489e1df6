use proptest::prelude::*;
use tilegrid_core::mirror::{ChangeHandler, CollectionChange, PrefixMirror};
use tilegrid_core::{ListEdit, PreviewedList};

/// Raw operation; indices are reduced modulo the current length when applied
#[derive(Debug, Clone)]
enum Op {
    Insert(usize, u32),
    Move(usize, usize),
    Remove(usize),
    Replace(usize, u32),
    Reset(Vec<u32>),
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        4 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Insert(i, v)),
        3 => (any::<usize>(), any::<usize>()).prop_map(|(a, b)| Op::Move(a, b)),
        3 => any::<usize>().prop_map(Op::Remove),
        2 => (any::<usize>(), any::<u32>()).prop_map(|(i, v)| Op::Replace(i, v)),
        1 => prop::collection::vec(any::<u32>(), 0..30).prop_map(Op::Reset),
    ]
}

/// Mutate `source` and return the notification it would raise, if any
fn mutate(source: &mut Vec<u32>, op: Op) -> Option<CollectionChange> {
    match op {
        Op::Insert(i, v) => {
            let index = i % (source.len() + 1);
            source.insert(index, v);
            Some(CollectionChange::Insert { index })
        }
        Op::Move(a, b) => {
            if source.len() < 2 {
                return None;
            }
            let old_index = a % source.len();
            let new_index = b % source.len();
            if old_index == new_index {
                return None;
            }
            let element = source.remove(old_index);
            source.insert(new_index, element);
            Some(CollectionChange::Move {
                old_index,
                new_index,
            })
        }
        Op::Remove(i) => {
            if source.is_empty() {
                return None;
            }
            let index = i % source.len();
            source.remove(index);
            Some(CollectionChange::Remove { index })
        }
        Op::Replace(i, v) => {
            if source.is_empty() {
                return None;
            }
            let index = i % source.len();
            source[index] = v;
            Some(CollectionChange::Replace { index })
        }
        Op::Reset(items) => {
            *source = items;
            Some(CollectionChange::Reset)
        }
    }
}

fn naive_prefix(source: &[u32], capacity: usize) -> Vec<u32> {
    source[..capacity.min(source.len())].to_vec()
}

proptest! {
    /// Property: incremental mirror always equals a full recompute of the prefix
    #[test]
    fn prop_mirror_matches_recompute(
        capacity in 1usize..8,
        initial in prop::collection::vec(any::<u32>(), 0..20),
        ops in prop::collection::vec(arb_op(), 0..200),
    ) {
        let mut source = initial;
        let mut mirror = PrefixMirror::bound_to(capacity, &source).unwrap();
        prop_assert_eq!(mirror.to_vec(), naive_prefix(&source, capacity));

        for op in ops {
            if let Some(change) = mutate(&mut source, op) {
                mirror.apply(&source, &change).unwrap();
            }
            prop_assert_eq!(mirror.to_vec(), naive_prefix(&source, capacity));
            prop_assert!(mirror.len() <= capacity);
        }
    }

    /// Property: PreviewedList keeps its preview in step through edit commands
    #[test]
    fn prop_previewed_list_matches_recompute(
        capacity in 1usize..6,
        ops in prop::collection::vec(arb_op(), 0..150),
    ) {
        let mut list = PreviewedList::new(capacity).unwrap();

        for op in ops {
            let len = list.len();
            let edit = match op {
                Op::Insert(i, v) => ListEdit::Insert { index: i % (len + 1), item: v },
                Op::Move(a, b) if len > 0 => ListEdit::Move { from: a % len, to: b % len },
                Op::Remove(i) if len > 0 => ListEdit::Remove { index: i % len },
                Op::Replace(i, v) if len > 0 => ListEdit::Replace { index: i % len, item: v },
                Op::Reset(items) => ListEdit::Reset { items },
                _ => ListEdit::Push { item: 0 },
            };
            list.apply_edit(edit).unwrap();

            prop_assert_eq!(list.top_items(), &naive_prefix(list.items(), capacity)[..]);
        }
    }

    /// Property: out-of-range insert notifications are rejected and change nothing
    #[test]
    fn prop_bad_insert_rejected(
        source in prop::collection::vec(any::<u32>(), 0..10),
        extra in 0usize..10,
    ) {
        let mut mirror = PrefixMirror::bound_to(4, &source).unwrap();
        let before = mirror.to_vec();

        let result = mirror.on_insert(&source, source.len() + extra);

        prop_assert!(result.is_err());
        prop_assert_eq!(mirror.to_vec(), before);
    }
}

#[test]
fn test_reference_capacity_twelve() {
    let mut source: Vec<u32> = (0..20).collect();
    let mut mirror = PrefixMirror::bound_to(12, &source).unwrap();
    assert_eq!(mirror.len(), 12);

    source.remove(3);
    mirror.on_remove(&source, 3).unwrap();
    assert_eq!(mirror.to_vec(), naive_prefix(&source, 12));
    assert_eq!(mirror.get(11), Some(&12));
}

#[test]
fn test_move_into_window_from_far_end() {
    let mut source: Vec<u32> = (0..6).collect();
    let mut mirror = PrefixMirror::bound_to(3, &source).unwrap();

    let element = source.remove(5);
    source.insert(0, element);
    mirror
        .apply(
            &source,
            &CollectionChange::Move {
                old_index: 5,
                new_index: 0,
            },
        )
        .unwrap();

    assert_eq!(mirror.to_vec(), vec![5, 0, 1]);
}
