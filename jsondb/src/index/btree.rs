use std::cmp::Ordering;
use std::mem;
use std::ops::Bound;

use crate::common::{compare_values, Value};

/// Returns true if the value can be used as an index key.
///
/// Only scalars take part in an ordering; `null`, arrays, objects and NaN
/// are indexed as if the field were absent.
pub fn is_indexable(value: &Value) -> bool {
    match value {
        Value::Float(v) => !v.is_nan(),
        Value::Bool(_) | Value::Integer(_) | Value::String(_) => true,
        _ => false,
    }
}

fn class_rank(value: &Value) -> u8 {
    match value {
        Value::Bool(_) => 0,
        Value::Integer(_) | Value::Float(_) => 1,
        Value::String(_) => 2,
        _ => 3,
    }
}

/// Total order over index keys.
///
/// Pairs of different classes order `bool < number < string`. Within a
/// class the order follows [compare_values], except that an integer and a
/// float are compared exactly instead of widening the integer, and NaN sorts
/// after every other number.
pub fn compare_index_keys(left: &Value, right: &Value) -> Ordering {
    match class_rank(left).cmp(&class_rank(right)) {
        Ordering::Equal => match (left, right) {
            (Value::Float(a), Value::Float(b)) => compare_floats(*a, *b),
            (Value::Integer(a), Value::Float(b)) => compare_integer_float(*a, *b),
            (Value::Float(a), Value::Integer(b)) => compare_integer_float(*b, *a).reverse(),
            _ => compare_values(left, right),
        },
        other => other,
    }
}

fn compare_floats(left: f64, right: f64) -> Ordering {
    match (left.is_nan(), right.is_nan()) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => left.partial_cmp(&right).unwrap_or(Ordering::Equal),
    }
}

fn compare_integer_float(integer: i64, float: f64) -> Ordering {
    if float.is_nan() {
        return Ordering::Less;
    }
    match (integer as f64).partial_cmp(&float) {
        // `float` is integral here and at most 2^63, the only such value outside i64
        Some(Ordering::Equal) if float >= 9_223_372_036_854_775_808.0 => Ordering::Less,
        Some(Ordering::Equal) => integer.cmp(&(float as i64)),
        Some(other) => other,
        None => Ordering::Equal,
    }
}

/// Shape of a [BTree] at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BTreeStats {
    /// Number of levels, 1 for a tree that is a single leaf.
    pub depth: usize,
    pub node_count: usize,
    pub key_count: usize,
    /// Largest number of keys found in any node.
    pub max_keys_in_node: usize,
    /// Smallest number of keys found in any non-root node (0 if there is none).
    pub min_keys_in_node: usize,
    /// Whether every leaf sits at the same depth.
    pub balanced: bool,
}

#[derive(Debug, Clone)]
struct Entry<V> {
    key: Value,
    value: V,
}

#[derive(Debug, Clone)]
struct Node<V> {
    entries: Vec<Entry<V>>,
    children: Vec<Node<V>>,
}

impl<V> Node<V> {
    fn leaf() -> Self {
        Node {
            entries: Vec::new(),
            children: Vec::new(),
        }
    }

    #[inline]
    fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }

    #[inline]
    fn search(&self, key: &Value) -> Result<usize, usize> {
        self.entries
            .binary_search_by(|entry| compare_index_keys(&entry.key, key))
    }

    /// Splits an overfull node around its median; `self` keeps the lower half.
    fn split(&mut self) -> (Entry<V>, Node<V>) {
        let mid = self.entries.len() / 2;
        let mut right_entries = self.entries.split_off(mid);
        let median = right_entries.remove(0);
        let right_children = if self.is_leaf() {
            Vec::new()
        } else {
            self.children.split_off(mid + 1)
        };
        (
            median,
            Node {
                entries: right_entries,
                children: right_children,
            },
        )
    }
}

/// An ordered map from [Value] keys to `V`, balanced as a B-tree.
///
/// Every node holds at most `order` keys. An insert that pushes a node to
/// `order + 1` keys splits it around the median, and the median moves up to
/// the parent; splitting the root adds a level. A remove that leaves a
/// non-root node with fewer than `order / 2` keys borrows a key from a
/// sibling through the parent, or merges with the sibling when neither can
/// spare one. An internal root emptied by a merge is replaced by its only
/// child. All leaves therefore stay at the same depth.
#[derive(Debug, Clone)]
pub struct BTree<V> {
    root: Node<V>,
    order: usize,
    len: usize,
}

impl<V> BTree<V> {
    /// Creates an empty tree. `order` must be at least 2; callers validate it.
    pub fn new(order: usize) -> Self {
        BTree {
            root: Node::leaf(),
            order,
            len: 0,
        }
    }

    pub fn order(&self) -> usize {
        self.order
    }

    /// Number of distinct keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn get(&self, key: &Value) -> Option<&V> {
        let mut node = &self.root;
        loop {
            match node.search(key) {
                Ok(index) => return Some(&node.entries[index].value),
                Err(index) => {
                    if node.is_leaf() {
                        return None;
                    }
                    node = &node.children[index];
                }
            }
        }
    }

    /// Inserts or replaces the value stored under `key`, returning the previous value.
    pub fn upsert(&mut self, key: Value, value: V) -> Option<V> {
        let (previous, split) = Self::insert_into(&mut self.root, key, value, self.order);
        if let Some((median, right)) = split {
            let left = mem::replace(&mut self.root, Node::leaf());
            self.root.entries.push(median);
            self.root.children.push(left);
            self.root.children.push(right);
            log::debug!("B-tree root split, depth is now {}", self.depth());
        }

        if previous.is_none() {
            self.len += 1;
        }
        previous
    }

    /// Removes `key`, returning its value if it was present.
    pub fn delete(&mut self, key: &Value) -> Option<V> {
        let min_keys = self.order / 2;
        let removed = Self::delete_from(&mut self.root, key, min_keys);

        if self.root.entries.is_empty() && !self.root.is_leaf() {
            self.root = self.root.children.remove(0);
            log::debug!("B-tree root collapsed, depth is now {}", self.depth());
        }

        if removed.is_some() {
            self.len -= 1;
        }
        removed
    }

    /// Returns the entries whose keys lie within the bounds, in ascending key order.
    pub fn range(&self, lower: Bound<&Value>, upper: Bound<&Value>) -> Vec<(&Value, &V)> {
        let mut result = Vec::new();
        Self::collect_range(&self.root, lower, upper, &mut result);
        result
    }

    /// Every entry in ascending key order.
    pub fn iter(&self) -> Vec<(&Value, &V)> {
        self.range(Bound::Unbounded, Bound::Unbounded)
    }

    pub fn depth(&self) -> usize {
        let mut depth = 1;
        let mut node = &self.root;
        while let Some(child) = node.children.first() {
            depth += 1;
            node = child;
        }
        depth
    }

    pub fn stats(&self) -> BTreeStats {
        let mut stats = BTreeStats {
            depth: self.depth(),
            node_count: 0,
            key_count: 0,
            max_keys_in_node: 0,
            min_keys_in_node: 0,
            balanced: true,
        };
        let mut leaf_depth = None;
        let mut min_keys = usize::MAX;
        Self::walk(&self.root, 1, true, &mut stats, &mut leaf_depth, &mut min_keys);
        if min_keys != usize::MAX {
            stats.min_keys_in_node = min_keys;
        }
        stats
    }

    fn walk(
        node: &Node<V>,
        depth: usize,
        is_root: bool,
        stats: &mut BTreeStats,
        leaf_depth: &mut Option<usize>,
        min_keys: &mut usize,
    ) {
        stats.node_count += 1;
        stats.key_count += node.entries.len();
        stats.max_keys_in_node = stats.max_keys_in_node.max(node.entries.len());
        if !is_root {
            *min_keys = (*min_keys).min(node.entries.len());
        }

        if node.is_leaf() {
            match *leaf_depth {
                Some(expected) => {
                    if expected != depth {
                        stats.balanced = false;
                    }
                }
                None => *leaf_depth = Some(depth),
            }
            return;
        }

        for child in &node.children {
            Self::walk(child, depth + 1, false, stats, leaf_depth, min_keys);
        }
    }

    fn insert_into(
        node: &mut Node<V>,
        key: Value,
        value: V,
        order: usize,
    ) -> (Option<V>, Option<(Entry<V>, Node<V>)>) {
        match node.search(&key) {
            Ok(index) => (Some(mem::replace(&mut node.entries[index].value, value)), None),
            Err(index) => {
                if node.is_leaf() {
                    node.entries.insert(index, Entry { key, value });
                } else {
                    let (previous, split) =
                        Self::insert_into(&mut node.children[index], key, value, order);
                    if previous.is_some() {
                        return (previous, None);
                    }
                    if let Some((median, right)) = split {
                        node.entries.insert(index, median);
                        node.children.insert(index + 1, right);
                    }
                }

                if node.entries.len() > order {
                    (None, Some(node.split()))
                } else {
                    (None, None)
                }
            }
        }
    }

    fn delete_from(node: &mut Node<V>, key: &Value, min_keys: usize) -> Option<V> {
        match node.search(key) {
            Ok(index) if node.is_leaf() => Some(node.entries.remove(index).value),
            Ok(index) => {
                // replace with the in-order predecessor, the largest key of the left subtree
                let predecessor = Self::pop_last(&mut node.children[index], min_keys)?;
                let removed = mem::replace(&mut node.entries[index], predecessor);
                Self::rebalance(node, index, min_keys);
                Some(removed.value)
            }
            Err(_) if node.is_leaf() => None,
            Err(index) => {
                let removed = Self::delete_from(&mut node.children[index], key, min_keys);
                if removed.is_some() {
                    Self::rebalance(node, index, min_keys);
                }
                removed
            }
        }
    }

    fn pop_last(node: &mut Node<V>, min_keys: usize) -> Option<Entry<V>> {
        if node.is_leaf() {
            return node.entries.pop();
        }
        let last = node.children.len() - 1;
        let entry = Self::pop_last(&mut node.children[last], min_keys);
        Self::rebalance(node, last, min_keys);
        entry
    }

    /// Restores the minimum key count of `node.children[index]`.
    fn rebalance(node: &mut Node<V>, index: usize, min_keys: usize) {
        if node.children[index].entries.len() >= min_keys {
            return;
        }

        if index > 0 && node.children[index - 1].entries.len() > min_keys {
            Self::borrow_from_left(node, index);
        } else if index + 1 < node.children.len()
            && node.children[index + 1].entries.len() > min_keys
        {
            Self::borrow_from_right(node, index);
        } else if index > 0 {
            Self::merge(node, index - 1);
        } else if index + 1 < node.children.len() {
            Self::merge(node, index);
        }
    }

    fn borrow_from_left(node: &mut Node<V>, index: usize) {
        let (left_part, right_part) = node.children.split_at_mut(index);
        let left = &mut left_part[index - 1];
        let child = &mut right_part[0];

        if let Some(borrowed) = left.entries.pop() {
            let separator = mem::replace(&mut node.entries[index - 1], borrowed);
            child.entries.insert(0, separator);
            if let Some(grandchild) = left.children.pop() {
                child.children.insert(0, grandchild);
            }
        }
    }

    fn borrow_from_right(node: &mut Node<V>, index: usize) {
        let (left_part, right_part) = node.children.split_at_mut(index + 1);
        let child = &mut left_part[index];
        let right = &mut right_part[0];

        if right.entries.is_empty() {
            return;
        }
        let borrowed = right.entries.remove(0);
        let separator = mem::replace(&mut node.entries[index], borrowed);
        child.entries.push(separator);
        if !right.is_leaf() {
            child.children.push(right.children.remove(0));
        }
    }

    /// Merges `children[index + 1]` and the separator between them into `children[index]`.
    fn merge(node: &mut Node<V>, index: usize) {
        let right = node.children.remove(index + 1);
        let separator = node.entries.remove(index);
        let left = &mut node.children[index];
        left.entries.push(separator);
        left.entries.extend(right.entries);
        left.children.extend(right.children);
    }

    fn collect_range<'a>(
        node: &'a Node<V>,
        lower: Bound<&Value>,
        upper: Bound<&Value>,
        result: &mut Vec<(&'a Value, &'a V)>,
    ) {
        let count = node.entries.len();
        for index in 0..=count {
            if !node.is_leaf() {
                // child `index` holds keys between entries[index - 1] and entries[index]
                let reaches_lower =
                    index == count || satisfies_lower(&node.entries[index].key, lower);
                let reaches_upper =
                    index == 0 || satisfies_upper(&node.entries[index - 1].key, upper);
                if reaches_lower && reaches_upper {
                    Self::collect_range(&node.children[index], lower, upper, result);
                }
            }

            if index < count {
                let entry = &node.entries[index];
                if !satisfies_upper(&entry.key, upper) {
                    return;
                }
                if satisfies_lower(&entry.key, lower) {
                    result.push((&entry.key, &entry.value));
                }
            }
        }
    }
}

fn satisfies_lower(key: &Value, lower: Bound<&Value>) -> bool {
    match lower {
        Bound::Included(bound) => compare_index_keys(key, bound) != Ordering::Less,
        Bound::Excluded(bound) => compare_index_keys(key, bound) == Ordering::Greater,
        Bound::Unbounded => true,
    }
}

fn satisfies_upper(key: &Value, upper: Bound<&Value>) -> bool {
    match upper {
        Bound::Included(bound) => compare_index_keys(key, bound) != Ordering::Greater,
        Bound::Excluded(bound) => compare_index_keys(key, bound) == Ordering::Less,
        Bound::Unbounded => true,
    }
}
