use std::collections::{BTreeSet, HashSet};
use std::ops::Bound;

use index::NodeIndex;
use node::{Color, Node};
use rand::{rngs::StdRng, seq::SliceRandom, Rng, SeedableRng};
use simplelog::{Config, LevelFilter, TestLogger};

use super::*;

struct ValueGenerator {
    rng: StdRng,
    unique: HashSet<i32>,
    limit: i32,
}

impl ValueGenerator {
    fn new(seed: [u8; 32]) -> Self {
        const LIMIT: i32 = 100_000;
        Self {
            rng: SeedableRng::from_seed(seed),
            unique: HashSet::new(),
            limit: LIMIT,
        }
    }

    fn next(&mut self) -> i32 {
        self.rng.gen_range(0..self.limit)
    }

    fn next_unique(&mut self) -> i32 {
        let mut value = self.next();
        while self.unique.contains(&value) {
            value = self.next();
        }
        self.unique.insert(value);
        value
    }
}

impl<C: Compare<i32>> RbTree<i32, C> {
    /// 1. Every node is either red or black.
    /// 2. The root is black.
    /// 3. Every leaf (NIL) is black.
    /// 4. If a node is red, then both its children are black.
    /// 5. For each node, all simple paths from the node to descendant leaves contain the
    /// same number of black nodes.
    fn check_rb_properties(&self) {
        if let Some(root) = self.root {
            assert!(matches!(
                self.arena.node_ref(root, Node::color),
                Color::Black
            ));
        }
        self.check_children_color(self.root);
        self.check_black_height(self.root);
        assert_eq!(self.validate(), Ok(()));
    }

    fn check_children_color(&self, x: Option<NodeIndex<u32>>) {
        let Some(x) = x else {
            return;
        };
        let (left, right) = self.arena.node_ref(x, |xn| (xn.left(), xn.right()));
        self.check_children_color(left);
        self.check_children_color(right);
        if self.arena.node_ref(x, Node::is_red) {
            assert!(!self.arena.is_red(left));
            assert!(!self.arena.is_red(right));
        }
    }

    fn check_black_height(&self, x: Option<NodeIndex<u32>>) -> usize {
        let Some(x) = x else {
            return 0;
        };
        let lefth = self.check_black_height(self.arena.node_ref(x, Node::left));
        let righth = self.check_black_height(self.arena.node_ref(x, Node::right));
        assert_eq!(lefth, righth);
        if self.arena.node_ref(x, Node::is_black) {
            return lefth + 1;
        }
        lefth
    }

    fn height(&self) -> usize {
        fn height_inner<C>(tree: &RbTree<i32, C>, x: Option<NodeIndex<u32>>) -> usize {
            x.map_or(0, |x| {
                let (left, right) = tree.arena.node_ref(x, |xn| (xn.left(), xn.right()));
                1 + height_inner(tree, left).max(height_inner(tree, right))
            })
        }
        height_inner(self, self.root)
    }
}

fn init_logger() {
    let _ignore = TestLogger::init(LevelFilter::Debug, Config::default());
}

fn with_tree_and_generator(test_fn: impl Fn(RbTree<i32>, ValueGenerator)) {
    init_logger();
    let seeds = vec![[0; 32], [1; 32], [2; 32]];
    for seed in seeds {
        let gen = ValueGenerator::new(seed);
        let tree = RbTree::new();
        test_fn(tree, gen);
    }
}

fn values(tree: &RbTree<i32>) -> Vec<i32> {
    tree.iter().copied().collect()
}

#[test]
fn red_black_tree_properties_is_satisfied() {
    with_tree_and_generator(|mut tree, mut gen| {
        let values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for v in values.clone() {
            let _ignore = tree.insert(v);
        }
        tree.check_rb_properties();
        for v in values.iter().step_by(2) {
            assert_eq!(tree.remove(v), Some(*v));
        }
        tree.check_rb_properties();
        assert_eq!(tree.len(), 500);
    });
}

#[test]
fn tree_len_will_update() {
    with_tree_and_generator(|mut tree, mut gen| {
        let values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(100)
            .collect();
        for v in values.clone() {
            let _ignore = tree.insert(v);
        }
        assert_eq!(tree.len(), 100);
        for v in values {
            let _ignore = tree.remove(&v);
        }
        assert_eq!(tree.len(), 0);
        assert!(tree.is_empty());
        assert_eq!(tree.begin(), tree.end());
    });
}

#[test]
fn duplicate_insert_keeps_the_tree_unchanged() {
    with_tree_and_generator(|mut tree, mut gen| {
        let values: Vec<_> = std::iter::repeat_with(|| gen.next()).take(1000).collect();
        let mut expect = BTreeSet::new();
        for v in values {
            let (pos, inserted) = tree.insert(v);
            assert_eq!(inserted, expect.insert(v));
            assert_eq!(tree.get(pos), Some(&v));
        }
        assert_eq!(tree.len(), expect.len());
        assert!(tree.iter().eq(expect.iter()));
        tree.check_rb_properties();
    });
}

#[test]
fn remove_non_exist_value_will_do_nothing() {
    with_tree_and_generator(|mut tree, mut gen| {
        let values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for v in values {
            let _ignore = tree.insert(v);
        }
        assert_eq!(tree.len(), 1000);
        let to_remove: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for v in to_remove {
            assert_eq!(tree.remove(&v), None);
            assert!(tree.find(&v).is_end());
        }
        assert_eq!(tree.len(), 1000);
        tree.check_rb_properties();
    });
}

#[test]
fn iterate_through_tree_is_sorted() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for v in values.clone() {
            let _ignore = tree.insert(v);
        }
        values.sort_unstable();

        assert!(tree.iter().eq(values.iter()));
        assert!(tree.iter().rev().eq(values.iter().rev()));
        assert_eq!(tree.iter().len(), 1000);

        let mut walked = Vec::new();
        let mut pos = tree.begin();
        while pos != tree.end() {
            walked.extend(tree.get(pos).copied());
            pos = tree.next(pos);
        }
        assert_eq!(walked, values);

        let mut walked_back = Vec::new();
        let mut pos = tree.prev(tree.end());
        while pos != tree.end() {
            walked_back.extend(tree.get(pos).copied());
            pos = tree.prev(pos);
        }
        walked_back.reverse();
        assert_eq!(walked_back, values);
    });
}

#[test]
fn bounds_agree_with_btree_set() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut expect = BTreeSet::new();
        for _ in 0..500 {
            let v = gen.next();
            let _ignore = tree.insert(v);
            expect.insert(v);
        }
        for _ in 0..1000 {
            let probe = gen.next();
            let lower = expect.range(probe..).next();
            let upper = expect
                .range((Bound::Excluded(probe), Bound::Unbounded))
                .next();
            assert_eq!(tree.get(tree.lower_bound(&probe)), lower);
            assert_eq!(tree.get(tree.upper_bound(&probe)), upper);
            assert_eq!(tree.contains(&probe), expect.contains(&probe));
            assert_eq!(tree.count(&probe), usize::from(expect.contains(&probe)));

            let (first, last) = tree.equal_range(&probe);
            let found: Vec<_> = tree.range(first, last).copied().collect();
            let wanted: Vec<_> = expect.get(&probe).copied().into_iter().collect();
            assert_eq!(found, wanted);
        }
    });
}

#[test]
fn positions_survive_other_removals() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(500)
            .collect();
        let positions: Vec<_> = values.iter().map(|&v| (v, tree.insert(v).0)).collect();
        values.shuffle(&mut gen.rng);
        let removed: HashSet<_> = values[..250].iter().copied().collect();
        for v in &values[..250] {
            let _ignore = tree.remove(v);
        }
        for (v, pos) in positions {
            if removed.contains(&v) {
                assert_eq!(tree.get(pos), None);
                assert_eq!(tree.erase(pos), None);
            } else {
                assert_eq!(tree.get(pos), Some(&v));
            }
        }
        assert_eq!(tree.len(), 250);
        tree.check_rb_properties();
    });
}

#[test]
fn erase_by_position_keeps_the_tree_balanced() {
    with_tree_and_generator(|mut tree, mut gen| {
        let values: Vec<_> = std::iter::repeat_with(|| gen.next_unique())
            .take(1000)
            .collect();
        for v in values.clone() {
            let _ignore = tree.insert(v);
        }
        let mut expect: BTreeSet<_> = values.into_iter().collect();
        while !tree.is_empty() {
            let nth = gen.rng.gen_range(0..tree.len());
            let pos = (0..nth).fold(tree.begin(), |pos, _| tree.next(pos));
            let value = tree.erase(pos);
            assert!(value.is_some_and(|v| expect.remove(&v)));
            if tree.len() % 100 == 0 {
                tree.check_rb_properties();
                assert!(tree.iter().eq(expect.iter()));
            }
        }
        assert!(expect.is_empty());
    });
}

#[test]
fn insert_with_hint_matches_plain_insert() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut expect = BTreeSet::new();
        let mut hints = vec![tree.end()];
        for _ in 0..1000 {
            let v = gen.next() % 2000;
            let hint = hints[gen.rng.gen_range(0..hints.len())];
            let (pos, inserted) = tree.insert_with_hint(hint, v);
            assert_eq!(inserted, expect.insert(v));
            assert_eq!(tree.get(pos), Some(&v));
            hints.push(pos);
        }
        assert!(tree.iter().eq(expect.iter()));
        tree.check_rb_properties();
    });
}

#[test]
fn erase_root_of_small_tree() {
    init_logger();
    let mut tree: RbTree<_> = [5, 3, 8, 1, 4, 7, 9].into_iter().collect();
    tree.check_rb_properties();
    let seven = tree.find(&7);
    assert_eq!(tree.erase(tree.find(&5)), Some(5));
    assert_eq!(values(&tree), vec![1, 3, 4, 7, 8, 9]);
    assert_eq!(tree.get(seven), Some(&7));
    tree.check_rb_properties();
}

#[test]
fn ascending_inserts_stay_shallow() {
    init_logger();
    let tree: RbTree<_> = (1..=7).collect();
    tree.check_rb_properties();
    assert!(tree.height() <= 4);

    let big: RbTree<_> = (0..(1 << 16)).collect();
    assert!(big.height() <= 2 * 17);
    assert_eq!(big.validate(), Ok(()));
}

#[test]
fn removing_every_element_leaves_an_empty_tree() {
    let mut tree: RbTree<_> = (0..64).collect();
    for v in (0..64).rev() {
        assert_eq!(tree.remove(&v), Some(v));
        tree.check_rb_properties();
    }
    assert!(tree.root.is_none());
    assert_eq!(tree.arena.live(), 0);
    assert_eq!(tree.pop_first(), None);
    assert_eq!(tree.pop_last(), None);
}

#[test]
fn empty_tree_begin_is_end() {
    let mut tree: RbTree<i32> = RbTree::new();
    assert_eq!(tree.begin(), tree.end());
    assert_eq!(tree.next(tree.end()), tree.end());
    assert_eq!(tree.prev(tree.end()), tree.end());
    assert_eq!(tree.first(), None);
    assert_eq!(tree.last(), None);
    assert_eq!(tree.erase(tree.end()), None);
    assert_eq!(tree.erase_range(tree.begin(), tree.end()), 0);
    assert!(tree.lower_bound(&1).is_end());
    assert!(tree.upper_bound(&1).is_end());
    assert_eq!(tree.iter().next(), None);
}

#[test]
fn erase_range_removes_half_open_interval() {
    init_logger();
    let mut tree: RbTree<_> = (0..100).collect();
    let removed = tree.erase_range(tree.lower_bound(&10), tree.lower_bound(&90));
    assert_eq!(removed, 80);
    assert_eq!(values(&tree), (0..10).chain(90..100).collect::<Vec<_>>());
    tree.check_rb_properties();

    assert_eq!(tree.erase_range(tree.find(&5), tree.find(&5)), 0);
    assert_eq!(tree.erase_range(tree.begin(), tree.end()), 20);
    assert!(tree.is_empty());
    tree.check_rb_properties();
}

#[test]
fn pop_from_both_ends() {
    let mut tree: RbTree<_> = [4, 1, 3, 2, 5].into_iter().collect();
    assert_eq!(tree.first(), Some(&1));
    assert_eq!(tree.last(), Some(&5));
    assert_eq!(tree.pop_first(), Some(1));
    assert_eq!(tree.pop_last(), Some(5));
    assert_eq!(values(&tree), vec![2, 3, 4]);
    tree.check_rb_properties();
}

#[test]
fn next_and_prev_wrap_through_the_end() {
    let tree: RbTree<_> = [10, 20, 30].into_iter().collect();
    let last = tree.prev(tree.end());
    assert_eq!(tree.get(last), Some(&30));
    assert_eq!(tree.next(last), tree.end());
    assert_eq!(tree.prev(tree.begin()), tree.end());
    assert_eq!(tree.get(tree.next(tree.end())), Some(&10));
}

#[test]
fn clone_mirrors_shape_and_is_independent() {
    with_tree_and_generator(|mut tree, mut gen| {
        for _ in 0..300 {
            let _ignore = tree.insert(gen.next());
        }
        let mut copy = tree.clone();
        assert_eq!(copy, tree);
        assert_eq!(copy.height(), tree.height());
        copy.check_rb_properties();

        let mut src = vec![tree.root];
        let mut dst = vec![copy.root];
        while let (Some(s), Some(d)) = (src.pop(), dst.pop()) {
            assert_eq!(s.is_some(), d.is_some());
            let (Some(s), Some(d)) = (s, d) else {
                continue;
            };
            let (sv, sc, [sl, sr]) = tree.arena.node_ref(s, |n| (*n.value(), n.color, n.children));
            let (dv, dc, [dl, dr]) = copy.arena.node_ref(d, |n| (*n.value(), n.color, n.children));
            assert_eq!(sv, dv);
            assert_eq!(sc, dc);
            src.extend([sl, sr]);
            dst.extend([dl, dr]);
        }

        let first = *copy.first().unwrap();
        let _ignore = copy.remove(&first);
        assert!(tree.contains(&first));
        assert_eq!(tree.len(), copy.len() + 1);
    });
}

#[test]
fn clone_from_replaces_previous_contents() {
    let source: RbTree<_> = (0..40).collect();
    let mut target: RbTree<_> = (100..200).collect();
    target.clone_from(&source);
    assert_eq!(target, source);
    assert_eq!(target.arena.live(), 40);
    target.check_rb_properties();
}

#[test]
fn clear_then_reuse() {
    let mut tree: RbTree<_> = (0..50).collect();
    let stale = tree.find(&10);
    tree.clear();
    assert!(tree.is_empty());
    assert_eq!(tree.get(stale), None);
    assert_eq!(tree.begin(), tree.end());
    tree.extend([3, 1, 2]);
    assert_eq!(values(&tree), vec![1, 2, 3]);
    tree.check_rb_properties();
}

#[test]
fn swap_exchanges_contents() {
    let mut a: RbTree<_> = [1, 2].into_iter().collect();
    let mut b: RbTree<_> = [7].into_iter().collect();
    let one = a.find(&1);
    a.swap(&mut b);
    assert_eq!(values(&a), vec![7]);
    assert_eq!(values(&b), vec![1, 2]);
    assert_eq!(b.get(one), Some(&1));
}

#[test]
fn custom_comparator_orders_descending() {
    init_logger();
    let mut tree = RbTree::with_comparator(|a: &i32, b: &i32| b.cmp(a));
    tree.extend(0..200);
    assert!(tree.iter().copied().eq((0..200).rev()));
    assert_eq!(tree.get(tree.lower_bound(&150)), Some(&150));
    assert_eq!(tree.get(tree.upper_bound(&150)), Some(&149));
    for v in (0..200).step_by(3) {
        assert_eq!(tree.remove(&v), Some(v));
    }
    tree.check_rb_properties();
}

#[test]
fn into_iter_and_from_iter() {
    let tree: RbTree<_> = [3, 1, 2, 3, 1].into_iter().collect();
    assert_eq!(tree.len(), 3);
    assert_eq!(tree.into_iter().rev().collect::<Vec<_>>(), vec![3, 2, 1]);

    let mut tree: RbTree<i32> = RbTree::default();
    tree.extend(&[5, 4]);
    assert_eq!(format!("{tree:?}"), "{4, 5}");
}

#[test]
fn full_arena_rejects_insert_and_keeps_the_tree() {
    init_logger();
    let mut tree = RbTree::new_in(Natural, NodeArena::<i32, u8>::new());
    for v in 0..255 {
        assert!(tree.try_insert(v).is_ok());
    }
    let err = tree.try_insert(1000).unwrap_err();
    assert_eq!(err.error, AllocError::CapacityExhausted { limit: 255 });
    assert_eq!(err.into_value(), 1000);
    assert_eq!(tree.len(), 255);
    assert!(tree.validate().is_ok());

    // an existing value never needs a node
    assert_eq!(tree.try_insert(7).map(|(_, inserted)| inserted).ok(), Some(false));

    assert_eq!(tree.remove(&0), Some(0));
    assert!(tree.try_insert(1000).is_ok());
    assert_eq!(tree.last(), Some(&1000));
    assert!(tree.validate().is_ok());
}

#[test]
#[should_panic(expected = "reached maximum number of nodes")]
fn full_arena_panics_on_plain_insert() {
    let mut tree = RbTree::new_in(Natural, NodeArena::<u8, u8>::new());
    for v in 0..=255 {
        let _ignore = tree.insert(v);
    }
}

#[test]
fn test_logger_records_debug_events() {
    init_logger();
    assert!(log::log_enabled!(log::Level::Debug));
    let mut tree: RbTree<_> = (0..10).collect();
    assert_eq!(tree.erase_range(tree.begin(), tree.find(&5)), 5);
    tree.clear();
    assert!(tree.is_empty());
}

#[test]
fn mixed_operations_agree_with_btree_set() {
    with_tree_and_generator(|mut tree, mut gen| {
        let mut expect = BTreeSet::new();
        let mut hint = tree.end();
        for round in 0..2000 {
            let v = gen.next() % 500;
            match gen.rng.gen_range(0..4) {
                0 | 1 => {
                    let (pos, inserted) = tree.insert_with_hint(hint, v);
                    assert_eq!(inserted, expect.insert(v));
                    hint = pos;
                }
                2 => {
                    if tree.find(&v) == hint {
                        hint = tree.end();
                    }
                    assert_eq!(tree.remove(&v), expect.take(&v));
                }
                _ => {
                    let hi = v + 10;
                    let removed = tree.erase_range(tree.lower_bound(&v), tree.lower_bound(&hi));
                    let wanted: Vec<_> = expect.range(v..hi).copied().collect();
                    assert_eq!(removed, wanted.len());
                    for w in wanted {
                        expect.remove(&w);
                    }
                    hint = tree.end();
                }
            }
            assert_eq!(tree.len(), expect.len());
            assert_eq!(tree.arena.live(), tree.len());
            if round % 250 == 0 {
                let copy = tree.clone();
                copy.check_rb_properties();
                assert!(copy.iter().eq(expect.iter()));
            }
        }
        tree.check_rb_properties();
        assert!(tree.iter().eq(expect.iter()));
    });
}

#[test]
fn cursor_walk_matches_iter() {
    let tree: RbTree<_> = (0..100).map(|v| v * 3).collect();
    let mut cursor = tree.cursor_front();
    let mut walked = Vec::new();
    while let Some(v) = cursor.get() {
        walked.push(*v);
        cursor.move_next();
    }
    assert!(walked.iter().eq(tree.iter()));
    assert_eq!(cursor.position(), tree.end());
    assert_eq!(tree.cursor(tree.find(&30)).peek_next(), Some(&33));
}

mod proptests {
    use proptest::prelude::*;

    use super::*;

    const TREE_SIZE: usize = 300;

    proptest!(
        #![proptest_config(ProptestConfig::with_cases(64))]

        #[test]
        fn operations_agree_with_btree_set(
            ops in proptest::collection::vec((any::<bool>(), 0..500i32), 0..TREE_SIZE)
        ) {
            let mut tree = RbTree::new();
            let mut expect = BTreeSet::new();
            for (insert, v) in ops {
                if insert {
                    prop_assert_eq!(tree.insert(v).1, expect.insert(v));
                } else {
                    prop_assert_eq!(tree.remove(&v), expect.take(&v));
                }
            }
            prop_assert_eq!(tree.len(), expect.len());
            prop_assert!(tree.iter().eq(expect.iter()));
            prop_assert_eq!(tree.validate(), Ok(()));
        }

        #[test]
        fn bounds_agree_with_btree_set(
            inserts in proptest::collection::hash_set(0..1000i32, 0..TREE_SIZE),
            probes in proptest::collection::vec(-10..1010i32, 1..50)
        ) {
            let tree: RbTree<_> = inserts.iter().copied().collect();
            let expect: BTreeSet<_> = inserts.into_iter().collect();
            for probe in probes {
                prop_assert_eq!(tree.get(tree.lower_bound(&probe)), expect.range(probe..).next());
                prop_assert_eq!(
                    tree.get(tree.upper_bound(&probe)),
                    expect.range((Bound::Excluded(probe), Bound::Unbounded)).next()
                );
            }
        }
    );
}
