use std::collections::VecDeque;
use std::iter;

use log::{debug, trace};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::error::MarkovError;
use super::config::ModelConfig;
use super::node::{Leaf, Node, chain_to_string};
use super::sampling::pick_weighted;
use super::token_space::{Token, TokenSpace};

/// Order-N Markov chain over sequences of tokens.
///
/// The `MarkovModel` stores, for every context of `order` tokens seen during
/// training, how often each token followed it. Generation replays those
/// statistics: the last `order` emitted tokens select a node of the trie and
/// the next token is drawn proportionally to the weights found there.
///
/// # Responsibilities
/// - Accumulate transition weights from training sequences
/// - Track the token space (every token observed, in order)
/// - Generate new sequences by weighted sampling, with optional Laplace smoothing
///
/// # Invariants
/// - `order >= 1`
/// - Every leaf lies exactly `order + 1` edges below the root
/// - The sentinel is in the token space as soon as one sequence was trained
/// - Generation never writes to the trie
#[derive(Clone, Debug)]
pub struct MarkovModel<T, R = StdRng> {
	config: ModelConfig,

	/// Start padding and end-of-sequence marker.
	sentinel: T,

	/// Single source of randomness, one draw per sampling step.
	rng: R,

	token_space: TokenSpace<T>,

	root: Node<T>,
}

impl<T: Token> MarkovModel<T, StdRng> {
	/// Creates an empty model whose random stream is seeded from `config`.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if the configuration does not validate.
	pub fn new(sentinel: T, config: ModelConfig) -> Result<Self, MarkovError> {
		let rng = StdRng::seed_from_u64(config.seed());
		Self::with_rng(sentinel, config, rng)
	}
}

impl<T: Token, R: Rng> MarkovModel<T, R> {
	/// Creates an empty model drawing from `rng`; the configured seed is ignored.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if the configuration does not validate.
	pub fn with_rng(sentinel: T, config: ModelConfig, rng: R) -> Result<Self, MarkovError> {
		config.validate()?;
		Ok(Self {
			config,
			sentinel,
			rng,
			token_space: TokenSpace::new(),
			root: Node::branch(),
		})
	}

	pub fn order(&self) -> usize {
		self.config.order()
	}

	pub fn sentinel(&self) -> &T {
		&self.sentinel
	}

	pub fn config(&self) -> &ModelConfig {
		&self.config
	}

	pub fn token_space(&self) -> &TokenSpace<T> {
		&self.token_space
	}

	/// Adds one sequence to the model.
	///
	/// A sentinel is appended unless the sequence already ends with one. Then,
	/// for each position, the `order` preceding tokens (sentinel-padded before
	/// the start) form the context and the token at that position is recorded
	/// as following it.
	///
	/// An empty sequence is ignored.
	///
	/// # Errors
	/// Returns `StructuralInvariant` if the trie is corrupted.
	pub fn train(&mut self, sequence: &[T]) -> Result<(), MarkovError> {
		if sequence.is_empty() {
			return Ok(());
		}

		let mut tokens = sequence.to_vec();
		if tokens.last() != Some(&self.sentinel) {
			tokens.push(self.sentinel.clone());
		}

		let order = self.config.order();
		let initial = self.config.initial_weight();
		let step = self.config.step_weight();
		for (position, token) in tokens.iter().enumerate() {
			self.token_space.insert(token);
			let context = context_window(&tokens, position, order, &self.sentinel);
			self.root.insert(&context, token, initial, step)?;
		}

		debug!(
			"Trained on {} tokens, token space now holds {}",
			tokens.len(),
			self.token_space.len()
		);
		Ok(())
	}

	/// Generates one sequence, without its terminating sentinel.
	///
	/// Generation has no length bound: with smoothing enabled it may run for a
	/// long time. Use `sample` with `take` to cap it.
	///
	/// # Errors
	/// Returns `StructuralInvariant` if the trie is corrupted.
	pub fn generate(&mut self) -> Result<Vec<T>, MarkovError> {
		self.sample().collect()
	}

	/// Lazily generates one sequence, yielding each token as it is drawn.
	///
	/// The iterator ends on a drawn sentinel, on an unmatched context (without
	/// smoothing) or on an empty distribution. After an error it yields nothing
	/// more.
	pub fn sample(&mut self) -> Generation<'_, T, R> {
		let context = iter::repeat_n(self.sentinel.clone(), self.config.order()).collect();
		Generation { model: self, context, state: GenerationState::Sampling }
	}

	/// Returns the sampling distribution after `context`, paired with the token
	/// space, or `None` when the context was never seen and smoothing is off.
	///
	/// # Errors
	/// - `InvalidContext` if `context` does not hold exactly `order` tokens.
	/// - `StructuralInvariant` if the trie is corrupted.
	pub fn distribution(&self, context: &[T]) -> Result<Option<Vec<(&T, u64)>>, MarkovError> {
		self.check_context(context)?;
		Ok(self
			.weights(context)?
			.map(|weights| self.token_space.iter().zip(weights).collect()))
	}

	/// Returns the stored weight of `next` after `context`, if that transition
	/// was ever trained.
	///
	/// # Errors
	/// - `InvalidContext` if `context` does not hold exactly `order` tokens.
	/// - `StructuralInvariant` if the trie is corrupted.
	pub fn weight(&self, context: &[T], next: &T) -> Result<Option<u64>, MarkovError> {
		self.check_context(context)?;
		let Some(node) = self.root.descend(context)? else {
			return Ok(None);
		};
		Ok(node
			.children()
			.and_then(|children| children.get(next))
			.and_then(Node::as_leaf)
			.map(Leaf::weight))
	}

	/// Lists every trained transition as `(context + next, weight)`, in token order.
	pub fn leaves(&self) -> Vec<(Vec<T>, u64)> {
		self.root.leaves()
	}

	pub fn leaf_count(&self) -> usize {
		self.root.leaves().len()
	}

	fn check_context(&self, context: &[T]) -> Result<(), MarkovError> {
		if context.len() != self.config.order() {
			return Err(MarkovError::InvalidContext { expected: self.config.order(), found: context.len() });
		}
		Ok(())
	}

	/// Weights of every token-space member after `context`.
	///
	/// `None` means the context is unknown and smoothing is disabled.
	fn weights<'a, I>(&self, context: I) -> Result<Option<Vec<u64>>, MarkovError>
	where
		I: IntoIterator<Item = &'a T>,
		T: 'a,
	{
		let fallback = if self.config.smoothing() { self.config.base_weight() } else { 0 };

		let children = match self.root.descend(context)? {
			Some(node) => node
				.children()
				.ok_or_else(|| MarkovError::structural("expected a branch above the leaves"))?,
			None if self.config.smoothing() => return Ok(Some(vec![fallback; self.token_space.len()])),
			None => return Ok(None),
		};

		self.token_space
			.iter()
			.map(|token| match children.get(token) {
				Some(Node::Leaf(leaf)) => Ok(leaf.weight()),
				Some(Node::Branch(_)) => Err(MarkovError::structural(format!("expected a leaf node for {:?}", token))),
				None => Ok(fallback),
			})
			.collect::<Result<Vec<_>, _>>()
			.map(Some)
	}

	/// Draws the token following `context`, `None` meaning the sequence ends.
	fn next_token(&mut self, context: &VecDeque<T>) -> Result<Option<T>, MarkovError> {
		let Some(weights) = self.weights(context)? else {
			trace!("Unmatched context {}, stopping", chain_to_string(context));
			return Ok(None);
		};

		let total: u64 = weights.iter().sum();
		if total == 0 {
			trace!("Empty distribution after {}, stopping", chain_to_string(context));
			return Ok(None);
		}

		let draw = self.rng.random_range(0..total);
		let token = pick_weighted(&weights, draw)
			.and_then(|index| self.token_space.get(index))
			.ok_or_else(|| MarkovError::structural(format!("draw {} outside of total {}", draw, total)))?;

		if *token == self.sentinel {
			Ok(None)
		} else {
			Ok(Some(token.clone()))
		}
	}
}

/// The `order` tokens preceding `end` in `history`, oldest first, with the
/// sentinel standing in for positions before the start.
fn context_window<'a, T>(history: &'a [T], end: usize, order: usize, sentinel: &'a T) -> Vec<&'a T> {
	(0..order)
		.map(|offset| match (end + offset).checked_sub(order) {
			Some(position) => &history[position],
			None => sentinel,
		})
		.collect()
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum GenerationState {
	Sampling,
	Terminated,
}

/// Iterator over the tokens of one generated sequence.
///
/// Created by `MarkovModel::sample`. Holds the sliding context of the last
/// `order` emitted tokens, initially all sentinels.
pub struct Generation<'a, T, R> {
	model: &'a mut MarkovModel<T, R>,
	context: VecDeque<T>,
	state: GenerationState,
}

impl<T: Token, R: Rng> Iterator for Generation<'_, T, R> {
	type Item = Result<T, MarkovError>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.state == GenerationState::Terminated {
			return None;
		}

		match self.model.next_token(&self.context) {
			Ok(Some(token)) => {
				self.context.pop_front();
				self.context.push_back(token.clone());
				Some(Ok(token))
			}
			Ok(None) => {
				self.state = GenerationState::Terminated;
				None
			}
			Err(error) => {
				self.state = GenerationState::Terminated;
				Some(Err(error))
			}
		}
	}
}
