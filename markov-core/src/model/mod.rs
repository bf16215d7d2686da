//! Top-level module for the Markov chain generation system.
//!
//! This module provides:
//! - The generic order-N chain (`MarkovModel`)
//! - Its construction parameters (`ModelConfig`)
//! - The weighted transition trie (`Node`)
//! - The ordered set of known tokens (`TokenSpace`)
//! - A character-level name generator (`Generator`)

/// Character-level name generator built on `MarkovModel<char>`.
///
/// Trains on text records and produces distinct new names with
/// a bounded number of attempts.
pub mod generator;

/// Generic order-N Markov chain.
///
/// Handles sequence training, weighted next-token sampling,
/// Laplace smoothing and inspection of the learned weights.
pub mod markov_model;

/// Construction parameters (order, smoothing, weights, seed).
pub mod config;

/// Branch/leaf nodes of the transition trie.
pub mod node;

/// Ordered set of observed tokens and the `Token` bound.
pub mod token_space;

/// Cumulative-weight bucket selection.
/// This module is not exposed publicly.
mod sampling;
