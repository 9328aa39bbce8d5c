// Copyright (c) 2024-present, the flightql authors
// This source code is licensed under both the Apache 2.0 and MIT License
// (found in the LICENSE-* files in the repository)

use crate::flight::FlightId;
use std::cmp::Ordering;
use std::ops::Bound;

/// A height-balanced ordered multimap from keys to flights.
///
/// Every distinct key owns a non-empty bag of flight ids; inserting an
/// existing key grows its bag. There is no delete operation, so a bag never
/// becomes empty. Trees are populated during the load phase and only read
/// afterwards.
pub struct AvlTree<K> {
    root: Option<Box<Node<K>>>,
    len: usize,
}

struct Node<K> {
    key: K,
    bag: Vec<FlightId>,
    height: u16,
    left: Option<Box<Node<K>>>,
    right: Option<Box<Node<K>>>,
}

impl<K> Node<K> {
    fn new(key: K, id: FlightId) -> Box<Self> {
        Box::new(Self {
            key,
            bag: vec![id],
            height: 1,
            left: None,
            right: None,
        })
    }
}

fn height<K>(node: Option<&Node<K>>) -> u16 {
    node.map_or(0, |n| n.height)
}

fn balance_factor<K>(node: &Node<K>) -> i32 {
    i32::from(height(node.left.as_deref())) - i32::from(height(node.right.as_deref()))
}

fn update_height<K>(node: &mut Node<K>) {
    node.height = 1 + height(node.left.as_deref()).max(height(node.right.as_deref()));
}

fn rotate_right<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut pivot = node.left.take().expect("rotation requires a left child");
    node.left = pivot.right.take();
    update_height(&mut node);
    pivot.right = Some(node);
    update_height(&mut pivot);
    pivot
}

fn rotate_left<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    let mut pivot = node.right.take().expect("rotation requires a right child");
    node.right = pivot.left.take();
    update_height(&mut node);
    pivot.left = Some(node);
    update_height(&mut pivot);
    pivot
}

/// Restores the AVL invariant at `node` after an insertion below it.
///
/// The four classic cases (LL, RR, LR, RL), resolved with one or two
/// rotations. Rotations preserve in-order traversal.
fn rebalance<K>(mut node: Box<Node<K>>) -> Box<Node<K>> {
    update_height(&mut node);

    let balance = balance_factor(&node);

    if balance > 1 {
        let left = node.left.take().expect("left-heavy node has a left child");

        node.left = if balance_factor(&left) < 0 {
            Some(rotate_left(left))
        } else {
            Some(left)
        };

        return rotate_right(node);
    }

    if balance < -1 {
        let right = node.right.take().expect("right-heavy node has a right child");

        node.right = if balance_factor(&right) > 0 {
            Some(rotate_right(right))
        } else {
            Some(right)
        };

        return rotate_left(node);
    }

    node
}

fn insert_node<K: Ord>(node: Option<Box<Node<K>>>, key: K, id: FlightId) -> Box<Node<K>> {
    let Some(mut node) = node else {
        return Node::new(key, id);
    };

    match key.cmp(&node.key) {
        Ordering::Equal => {
            node.bag.push(id);
            node
        }
        Ordering::Less => {
            node.left = Some(insert_node(node.left.take(), key, id));
            rebalance(node)
        }
        Ordering::Greater => {
            node.right = Some(insert_node(node.right.take(), key, id));
            rebalance(node)
        }
    }
}

fn collect_range<K: Ord>(
    node: Option<&Node<K>>,
    lower: Bound<&K>,
    upper: Bound<&K>,
    out: &mut Vec<FlightId>,
) {
    let Some(node) = node else {
        return;
    };

    let above_lower = match lower {
        Bound::Unbounded => true,
        Bound::Included(key) => node.key >= *key,
        Bound::Excluded(key) => node.key > *key,
    };
    let below_upper = match upper {
        Bound::Unbounded => true,
        Bound::Included(key) => node.key <= *key,
        Bound::Excluded(key) => node.key < *key,
    };

    // Subtrees wholly outside the bounds are pruned
    if above_lower {
        collect_range(node.left.as_deref(), lower, upper, out);
    }
    if above_lower && below_upper {
        out.extend_from_slice(&node.bag);
    }
    if below_upper {
        collect_range(node.right.as_deref(), lower, upper, out);
    }
}

impl<K: Ord> AvlTree<K> {
    /// Creates an empty tree.
    #[must_use]
    pub fn new() -> Self {
        Self { root: None, len: 0 }
    }

    /// Number of flights stored, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if nothing has been inserted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Inserts a flight under the given key.
    ///
    /// An existing key grows its bag; a new key adds a node and rebalances
    /// the insertion path. Bag order is unspecified to callers.
    pub fn insert(&mut self, key: K, id: FlightId) {
        let root = self.root.take();
        self.root = Some(insert_node(root, key, id));
        self.len += 1;
    }

    /// Collects every flight stored under a key within the given bounds.
    ///
    /// Keys are visited in ascending order; within one bag, emission order is
    /// the bag's internal order, which callers must treat as unspecified.
    /// An empty tree yields an empty vector.
    #[must_use]
    pub fn range(&self, lower: Bound<&K>, upper: Bound<&K>) -> Vec<FlightId> {
        let mut out = Vec::new();
        collect_range(self.root.as_deref(), lower, upper, &mut out);
        out
    }
}

impl<K: Ord> Default for AvlTree<K> {
    fn default() -> Self {
        Self::new()
    }
}
