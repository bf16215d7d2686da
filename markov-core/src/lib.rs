//! Markov chain sequence generation library.
//!
//! This crate provides an order-N Markov chain over generic tokens including:
//! - Training from token sequences into a weighted transition trie
//! - Seeded, reproducible sequence generation
//! - Optional Laplace smoothing of unseen transitions
//! - A character-level name generator with duplicate suppression
//!
//! Example:
//! ```
//! use markov_core::model::config::ModelConfig;
//! use markov_core::model::markov_model::MarkovModel;
//!
//! let mut model = MarkovModel::new('\0', ModelConfig::new(2)?)?;
//! model.train(&['a', 'b', 'c'])?;
//! assert_eq!(model.generate()?, vec!['a', 'b', 'c']);
//! # Ok::<(), markov_core::MarkovError>(())
//! ```

/// Core Markov models and generation logic.
pub mod model;

/// I/O utilities (training file loading).
pub mod io;

mod error;

pub use error::MarkovError;
