use std::fmt::Debug;

/// Values a `MarkovModel` can be trained on.
///
/// Tokens need a total order so sampling scans them in a stable sequence.
pub trait Token: Ord + Clone + Debug {}

impl<T: Ord + Clone + Debug> Token for T {}

/// Ordered set of every token observed during training.
///
/// The token space fixes the width and the scan order of every sampling
/// distribution. It only grows.
///
/// # Invariants
/// - `tokens` is sorted and free of duplicates
#[derive(Clone, Debug, Default)]
pub struct TokenSpace<T> {
	tokens: Vec<T>,
}

impl<T: Token> TokenSpace<T> {
	pub fn new() -> Self {
		Self { tokens: Vec::new() }
	}

	/// Registers `token`, returns `true` if it was not known yet.
	pub fn insert(&mut self, token: &T) -> bool {
		match self.tokens.binary_search(token) {
			Ok(_) => false,
			Err(position) => {
				self.tokens.insert(position, token.clone());
				true
			}
		}
	}

	pub fn contains(&self, token: &T) -> bool {
		self.tokens.binary_search(token).is_ok()
	}

	/// Returns the token at `index` in token order.
	pub fn get(&self, index: usize) -> Option<&T> {
		self.tokens.get(index)
	}

	pub fn len(&self) -> usize {
		self.tokens.len()
	}

	pub fn is_empty(&self) -> bool {
		self.tokens.is_empty()
	}

	pub fn iter(&self) -> impl Iterator<Item = &T> {
		self.tokens.iter()
	}
}
