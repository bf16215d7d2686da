use serde::{Deserialize, Serialize};

use crate::error::MarkovError;

/// Construction parameters of a `MarkovModel`.
///
/// `ModelConfig` groups everything fixed for the lifetime of a model: the
/// chain order, the smoothing flag, the leaf weight parameters and the
/// random seed.
///
/// # Responsibilities
/// - Provide the defaults of the name generator (`order = 3`, no smoothing,
///   `base_weight = 0`, `step_weight = 1`, `seed = 0`)
/// - Reject an unusable order through validating setters
/// - Load from any serde format (missing fields fall back to defaults)
///
/// # Invariants
/// - `order >= 1` once `validate` succeeds; deserialized values are only
///   checked when a model is built from them
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq)]
#[serde(default)]
pub struct ModelConfig {
	/// Number of preceding tokens used to predict the next one.
	order: usize,

	/// Laplace smoothing: unseen transitions keep `base_weight`.
	smoothing: bool,

	/// Weight of a transition never observed (smoothing only).
	base_weight: u64,

	/// Weight added each time a transition is observed.
	step_weight: u64,

	/// Seed of the model's random stream.
	seed: u64,
}

impl Default for ModelConfig {
	fn default() -> Self {
		Self { order: 3, smoothing: false, base_weight: 0, step_weight: 1, seed: 0 }
	}
}

impl ModelConfig {
	/// Creates a configuration of the given order, other fields at their defaults.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `order < 1`.
	pub fn new(order: usize) -> Result<Self, MarkovError> {
		let mut config = Self::default();
		config.set_order(order)?;
		Ok(config)
	}

	/// Checks the invariants of the configuration.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `order < 1`.
	pub fn validate(&self) -> Result<(), MarkovError> {
		if self.order < 1 {
			return Err(MarkovError::InvalidConfiguration("order must be >= 1".to_owned()));
		}
		Ok(())
	}

	pub fn order(&self) -> usize {
		self.order
	}

	pub fn smoothing(&self) -> bool {
		self.smoothing
	}

	pub fn base_weight(&self) -> u64 {
		self.base_weight
	}

	pub fn step_weight(&self) -> u64 {
		self.step_weight
	}

	pub fn seed(&self) -> u64 {
		self.seed
	}

	/// Weight a freshly created leaf starts with.
	pub(crate) fn initial_weight(&self) -> u64 {
		if self.smoothing { self.base_weight } else { 0 }
	}

	/// Sets the chain order.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `order < 1`; the previous order is kept.
	pub fn set_order(&mut self, order: usize) -> Result<(), MarkovError> {
		if order < 1 {
			return Err(MarkovError::InvalidConfiguration(format!("order must be >= 1, got {}", order)));
		}
		self.order = order;
		Ok(())
	}

	pub fn set_smoothing(&mut self, smoothing: bool) {
		self.smoothing = smoothing;
	}

	pub fn set_base_weight(&mut self, base_weight: u64) {
		self.base_weight = base_weight;
	}

	pub fn set_step_weight(&mut self, step_weight: u64) {
		self.step_weight = step_weight;
	}

	pub fn set_seed(&mut self, seed: u64) {
		self.seed = seed;
	}
}
