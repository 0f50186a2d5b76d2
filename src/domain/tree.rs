//! Unbalanced binary search tree and its JSON form.
//!
//! Values are inserted by plain comparison: strictly smaller values go left,
//! strictly larger values go right, and equal values are ignored. There is no
//! rebalancing, so ascending input produces a right-leaning chain.

use std::cmp::Ordering;
use std::fmt;

use serde_json::{Map, Value as Json};
use tracing::instrument;

use crate::domain::{TreeJson, Value};

type Link = Option<Box<Node>>;

/// A tree position. Each node exclusively owns its children.
#[derive(Debug)]
pub struct Node {
    pub value: Value,
    pub left: Link,
    pub right: Link,
}

impl Node {
    fn leaf(value: Value) -> Box<Self> {
        Box::new(Self {
            value,
            left: None,
            right: None,
        })
    }

    fn is_leaf(&self) -> bool {
        self.left.is_none() && self.right.is_none()
    }
}

/// Binary search tree over finite values.
#[derive(Debug, Default)]
pub struct Tree {
    root: Link,
    len: usize,
}

impl Tree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a tree by inserting `values` in order.
    ///
    /// Non-finite numbers are skipped. Duplicates keep the first insertion.
    #[instrument(level = "trace", skip(values))]
    pub fn build<I>(values: I) -> Self
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter_map(Value::new)
            .fold(Self::new(), |mut tree, v| {
                tree.insert(v);
                tree
            })
    }

    /// Build a tree from already validated values.
    pub fn from_values(values: &[Value]) -> Self {
        Self::build(values.iter().map(|v| v.get()))
    }

    /// Build a height-balanced tree over the distinct values.
    ///
    /// Values are sorted and deduplicated, then the middle element of each
    /// range becomes the subtree root.
    #[instrument(level = "trace", skip(values))]
    pub fn balanced(values: &[Value]) -> Self {
        let mut sorted = values.to_vec();
        sorted.sort_by(|a, b| a.compare(*b));
        sorted.dedup_by(|a, b| a.compare(*b) == Ordering::Equal);

        Self {
            root: Self::build_range(&sorted),
            len: sorted.len(),
        }
    }

    fn build_range(sorted: &[Value]) -> Link {
        if sorted.is_empty() {
            return None;
        }
        // lower middle, so even-length ranges lean right
        let mid = (sorted.len() - 1) / 2;
        Some(Box::new(Node {
            value: sorted[mid],
            left: Self::build_range(&sorted[..mid]),
            right: Self::build_range(&sorted[mid + 1..]),
        }))
    }

    /// Insert a value. Returns `false` if an equal value is already present.
    pub fn insert(&mut self, value: Value) -> bool {
        let mut slot = &mut self.root;
        while let Some(node) = slot {
            slot = match value.compare(node.value) {
                Ordering::Less => &mut node.left,
                Ordering::Greater => &mut node.right,
                Ordering::Equal => return false,
            };
        }
        *slot = Some(Node::leaf(value));
        self.len += 1;
        true
    }

    pub fn contains(&self, value: Value) -> bool {
        let mut cur = self.root.as_deref();
        while let Some(node) = cur {
            cur = match value.compare(node.value) {
                Ordering::Less => node.left.as_deref(),
                Ordering::Greater => node.right.as_deref(),
                Ordering::Equal => return true,
            };
        }
        false
    }

    pub fn root(&self) -> Option<&Node> {
        self.root.as_deref()
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Number of nodes on the longest root-to-leaf path (0 when empty).
    #[instrument(level = "trace", skip(self))]
    pub fn height(&self) -> usize {
        let mut max_depth = 0;
        let mut stack: Vec<(&Node, usize)> = self.root().map(|r| (r, 1)).into_iter().collect();

        while let Some((node, depth)) = stack.pop() {
            max_depth = max_depth.max(depth);
            for child in [node.left.as_deref(), node.right.as_deref()].into_iter().flatten() {
                stack.push((child, depth + 1));
            }
        }
        max_depth
    }

    /// Iterate values in ascending order.
    pub fn iter(&self) -> InOrder<'_> {
        InOrder::new(self.root())
    }

    pub fn in_order(&self) -> Vec<Value> {
        self.iter().collect()
    }

    /// Nested `{value, left, right}` records with explicit `null` children;
    /// `null` for an empty tree.
    pub fn to_json(&self) -> TreeJson {
        let json = self.fold(
            || Json::Null,
            |node, children| {
                let (left, right) = children.unwrap_or((Json::Null, Json::Null));
                let mut record = Map::new();
                record.insert("value".to_string(), node.value.to_json());
                record.insert("left".to_string(), left);
                record.insert("right".to_string(), right);
                Json::Object(record)
            },
        );
        json.map(TreeJson::from).unwrap_or_default()
    }

    fn to_termtree(&self) -> Option<termtree::Tree<String>> {
        self.fold(
            || termtree::Tree::new("∅".to_string()),
            |node, children| {
                let mut t = termtree::Tree::new(node.value.to_string());
                if let Some((left, right)) = children {
                    t.push(left);
                    t.push(right);
                }
                t
            },
        )
    }

    /// Bottom-up fold over the nodes without recursion.
    ///
    /// `combine` gets each node with the results of its left and right
    /// children, or `None` for a leaf. `missing` stands in for an absent
    /// child whose sibling exists.
    fn fold<T>(
        &self,
        mut missing: impl FnMut() -> T,
        mut combine: impl FnMut(&Node, Option<(T, T)>) -> T,
    ) -> Option<T> {
        enum Step<'a> {
            Enter(Option<&'a Node>),
            Exit(&'a Node),
        }

        let mut steps = vec![Step::Enter(Some(self.root()?))];
        let mut done: Vec<T> = Vec::new();
        while let Some(step) = steps.pop() {
            match step {
                Step::Enter(None) => done.push(missing()),
                Step::Enter(Some(node)) => {
                    steps.push(Step::Exit(node));
                    if !node.is_leaf() {
                        steps.push(Step::Enter(node.right.as_deref()));
                        steps.push(Step::Enter(node.left.as_deref()));
                    }
                }
                Step::Exit(node) => {
                    let children = if node.is_leaf() {
                        None
                    } else {
                        let right = done.pop();
                        let left = done.pop();
                        left.zip(right)
                    };
                    done.push(combine(node, children));
                }
            }
        }
        done.pop()
    }
}

impl Drop for Tree {
    // iterative so long chains do not recurse through Box drops
    fn drop(&mut self) {
        let mut stack: Vec<Box<Node>> = self.root.take().into_iter().collect();
        while let Some(mut node) = stack.pop() {
            stack.extend(node.left.take());
            stack.extend(node.right.take());
        }
    }
}

impl fmt::Display for Tree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_termtree() {
            Some(t) => {
                let written = write!(f, "{t}");
                dispose_termtree(t);
                written
            }
            None => writeln!(f, "(empty)"),
        }
    }
}

fn dispose_termtree(tree: termtree::Tree<String>) {
    let mut stack = vec![tree];
    while let Some(mut t) = stack.pop() {
        stack.append(&mut t.leaves);
    }
}

/// In-order traversal using an explicit stack.
pub struct InOrder<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> InOrder<'a> {
    fn new(root: Option<&'a Node>) -> Self {
        let mut it = Self { stack: Vec::new() };
        it.push_left(root);
        it
    }

    fn push_left(&mut self, mut cur: Option<&'a Node>) {
        while let Some(node) = cur {
            self.stack.push(node);
            cur = node.left.as_deref();
        }
    }
}

impl Iterator for InOrder<'_> {
    type Item = Value;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.push_left(node.right.as_deref());
        Some(node.value)
    }
}

/// Build a tree from `values` and serialize it.
pub fn build_and_serialize(values: &[Value]) -> TreeJson {
    Tree::from_values(values).to_json()
}
