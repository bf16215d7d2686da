use std::collections::BTreeMap;
use std::fmt::Debug;

use crate::error::MarkovError;
use super::token_space::Token;

/// Accumulated weight of one observed transition.
///
/// A leaf starts at its initial weight (0, or the base weight when created
/// with smoothing enabled) and grows by `step` on every observation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Leaf {
	weight: u64,
	step: u64,
}

impl Leaf {
	pub fn new(initial: u64, step: u64) -> Self {
		Self { weight: initial, step }
	}

	pub fn weight(&self) -> u64 {
		self.weight
	}

	/// Records one more observation.
	///
	/// Unchecked: repeated training may overflow the weight.
	pub fn increment(&mut self) {
		self.weight += self.step;
	}
}

/// A node of the fixed-depth transition trie.
///
/// The root and every node above depth `order` are branches, nodes at depth
/// `order` are leaves. A path of `order` context tokens followed by one more
/// token (the leaf key) identifies a transition.
///
/// # Invariants
/// - Nodes are never removed
/// - All leaves sit at the same depth
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node<T> {
	Branch(BTreeMap<T, Node<T>>),
	Leaf(Leaf),
}

impl<T: Token> Node<T> {
	/// Creates an empty branch.
	pub fn branch() -> Self {
		Node::Branch(BTreeMap::new())
	}

	pub fn leaf(initial: u64, step: u64) -> Self {
		Node::Leaf(Leaf::new(initial, step))
	}

	pub fn is_leaf(&self) -> bool {
		matches!(self, Node::Leaf(_))
	}

	/// Returns the children of a branch, `None` for a leaf.
	pub fn children(&self) -> Option<&BTreeMap<T, Node<T>>> {
		match self {
			Node::Branch(children) => Some(children),
			Node::Leaf(_) => None,
		}
	}

	pub fn as_leaf(&self) -> Option<&Leaf> {
		match self {
			Node::Leaf(leaf) => Some(leaf),
			Node::Branch(_) => None,
		}
	}

	/// Records one observation of `next` following `context`.
	///
	/// Branches are created for the context tokens (oldest first), then the
	/// leaf keyed by `next` is created with `initial` if absent and incremented.
	///
	/// # Errors
	/// Returns `StructuralInvariant` if a leaf is met along the context or a
	/// branch is found where the leaf belongs. The trie is left as it was up to
	/// the faulty node.
	pub fn insert(&mut self, context: &[&T], next: &T, initial: u64, step: u64) -> Result<(), MarkovError> {
		let mut node = self;
		for (depth, token) in context.iter().enumerate() {
			node = match node {
				Node::Branch(children) => children.entry((*token).clone()).or_insert_with(Node::branch),
				Node::Leaf(_) => {
					return Err(MarkovError::structural(format!(
						"expected a branch at depth {}: {}",
						depth,
						chain_to_string(context.iter().copied())
					)));
				}
			};
		}

		let children = match node {
			Node::Branch(children) => children,
			Node::Leaf(_) => {
				return Err(MarkovError::structural(format!(
					"expected a branch above the leaf: {}",
					chain_to_string(context.iter().copied())
				)));
			}
		};

		match children.entry(next.clone()).or_insert_with(|| Node::leaf(initial, step)) {
			Node::Leaf(leaf) => {
				leaf.increment();
				Ok(())
			}
			Node::Branch(_) => Err(MarkovError::structural(format!(
				"expected a leaf: {}->{:?}",
				chain_to_string(context.iter().copied()),
				next
			))),
		}
	}

	/// Follows `path` from this node without creating anything.
	///
	/// Returns `Ok(None)` as soon as a step has no matching child.
	///
	/// # Errors
	/// Returns `StructuralInvariant` if a leaf is met before the path ends.
	pub fn descend<'a, I>(&self, path: I) -> Result<Option<&Node<T>>, MarkovError>
	where
		I: IntoIterator<Item = &'a T>,
		T: 'a,
	{
		let mut node = self;
		for token in path {
			node = match node {
				Node::Branch(children) => match children.get(token) {
					Some(child) => child,
					None => return Ok(None),
				},
				Node::Leaf(_) => {
					return Err(MarkovError::structural(format!("expected a branch before {:?}", token)));
				}
			};
		}
		Ok(Some(node))
	}

	/// Lists every leaf as its full path (context then key) and weight,
	/// in token order.
	pub fn leaves(&self) -> Vec<(Vec<T>, u64)> {
		let mut leaves = Vec::new();
		let mut path = Vec::new();
		self.collect_leaves(&mut path, &mut leaves);
		leaves
	}

	fn collect_leaves(&self, path: &mut Vec<T>, leaves: &mut Vec<(Vec<T>, u64)>) {
		match self {
			Node::Leaf(leaf) => leaves.push((path.clone(), leaf.weight())),
			Node::Branch(children) => {
				for (token, child) in children {
					path.push(token.clone());
					child.collect_leaves(path, leaves);
					path.pop();
				}
			}
		}
	}
}

/// Formats a chain of tokens as `a->b->c`.
pub(crate) fn chain_to_string<'a, T, I>(chain: I) -> String
where
	T: Debug + 'a,
	I: IntoIterator<Item = &'a T>,
{
	chain.into_iter().map(|token| format!("{:?}", token)).collect::<Vec<_>>().join("->")
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn insert_creates_path_and_increments() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'a', &'b'], &'c', 0, 3).unwrap();
		root.insert(&[&'a', &'b'], &'c', 0, 3).unwrap();

		let parent = root.descend(&['a', 'b']).unwrap().unwrap();
		let leaf = parent.children().unwrap().get(&'c').unwrap();
		assert!(leaf.is_leaf());
		assert_eq!(leaf.as_leaf().unwrap().weight(), 6);
	}

	#[test]
	fn initial_weight_is_counted_once() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'a'], &'b', 5, 10).unwrap();
		root.insert(&[&'a'], &'b', 5, 10).unwrap();
		assert_eq!(root.leaves(), vec![(vec!['a', 'b'], 25)]);
	}

	#[test]
	fn descend_stops_on_missing_child() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'a'], &'b', 0, 1).unwrap();
		assert!(root.descend(&['x']).unwrap().is_none());
		assert!(root.descend(&['a']).unwrap().is_some());
	}

	#[test]
	fn descend_through_leaf_is_a_violation() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'a'], &'b', 0, 1).unwrap();
		let result = root.descend(&['a', 'b', 'c']);
		assert!(matches!(result, Err(MarkovError::StructuralInvariant(_))));
	}

	#[test]
	fn insert_with_mismatched_depth_is_a_violation() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'a'], &'b', 0, 1).unwrap();

		// Deeper chain runs into the existing leaf
		let deeper = root.insert(&[&'a', &'b'], &'c', 0, 1);
		assert!(matches!(deeper, Err(MarkovError::StructuralInvariant(_))));

		// Shallower chain finds a branch where its leaf should be
		let shallower = root.insert(&[], &'a', 0, 1);
		assert!(matches!(shallower, Err(MarkovError::StructuralInvariant(_))));
	}

	#[test]
	fn leaves_are_listed_in_token_order() {
		let mut root: Node<char> = Node::branch();
		root.insert(&[&'b'], &'a', 0, 1).unwrap();
		root.insert(&[&'a'], &'c', 0, 1).unwrap();
		root.insert(&[&'a'], &'b', 0, 1).unwrap();
		assert_eq!(
			root.leaves(),
			vec![(vec!['a', 'b'], 1), (vec!['a', 'c'], 1), (vec!['b', 'a'], 1)]
		);
	}

	#[test]
	fn chain_formatting() {
		assert_eq!(chain_to_string(&['a', 'b']), "'a'->'b'");
	}
}
