use thiserror::Error;

/// Errors raised by the Markov chain engine and its name-generation shell.
///
/// An empty sampling distribution is not an error: it ends generation like
/// a drawn terminator does.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// The configuration cannot produce a usable model (ex. `order == 0`).
	#[error("Invalid configuration: {0}")]
	InvalidConfiguration(String),

	/// The trie holds a branch where a leaf belongs, or the reverse.
	///
	/// Not recoverable: the model is corrupted or was built incorrectly.
	#[error("Structural invariant violated: {0}")]
	StructuralInvariant(String),

	/// A lookup context does not contain exactly `order` tokens.
	#[error("Expected a context of {expected} tokens, not {found}")]
	InvalidContext { expected: usize, found: usize },

	#[error("I/O error: {0}")]
	Io(#[from] std::io::Error),
}

impl MarkovError {
	pub(crate) fn structural(message: impl Into<String>) -> Self {
		MarkovError::StructuralInvariant(message.into())
	}
}
