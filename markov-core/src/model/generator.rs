use std::collections::HashSet;
use std::path::Path;

use log::{info, warn};

use crate::error::MarkovError;
use crate::io;
use super::config::ModelConfig;
use super::markov_model::MarkovModel;

/// Sentinel of character sequences. Never part of a record.
pub const TERMINATOR: char = '\0';

/// Generation attempts allowed per requested name in `generate_unique`.
pub const ATTEMPT_MULTIPLIER: usize = 10;

/// High-level name generator over a character-level `MarkovModel`.
///
/// # Responsibilities
/// - Train the model on text records (one record = one sequence of characters)
/// - Remember the records so they are never returned as generated names
/// - Produce batches of distinct new names with bounded effort
#[derive(Debug)]
pub struct Generator {
	model: MarkovModel<char>,
	records: HashSet<String>,
}

impl Generator {
	/// Creates a generator with an untrained model.
	///
	/// # Errors
	/// Returns `InvalidConfiguration` if `config` does not validate.
	pub fn new(config: ModelConfig) -> Result<Self, MarkovError> {
		Ok(Self {
			model: MarkovModel::new(TERMINATOR, config)?,
			records: HashSet::new(),
		})
	}

	/// Creates a generator trained on every record of a text file.
	///
	/// # Errors
	/// - `Io` if the file cannot be read.
	/// - `InvalidConfiguration` if `config` does not validate.
	pub fn from_file<P: AsRef<Path>>(filepath: P, config: ModelConfig) -> Result<Self, MarkovError> {
		let mut generator = Self::new(config)?;
		for record in io::read_records(&filepath)? {
			generator.add_record(&record)?;
		}
		info!(
			"Loaded {} records from {} ({} distinct characters)",
			generator.records.len(),
			filepath.as_ref().display(),
			generator.model.token_space().len()
		);
		Ok(generator)
	}

	/// Trains the model on one record.
	///
	/// The record is trimmed and terminator characters are dropped; blank
	/// records are ignored.
	pub fn add_record(&mut self, record: &str) -> Result<(), MarkovError> {
		let record: String = record.trim().chars().filter(|c| *c != TERMINATOR).collect();
		if record.is_empty() {
			return Ok(());
		}

		let tokens: Vec<char> = record.chars().collect();
		self.model.train(&tokens)?;
		self.records.insert(record);
		Ok(())
	}

	pub fn model(&self) -> &MarkovModel<char> {
		&self.model
	}

	/// Returns `true` if `candidate` is one of the training records.
	pub fn is_record(&self, candidate: &str) -> bool {
		self.records.contains(candidate)
	}

	pub fn record_count(&self) -> usize {
		self.records.len()
	}

	/// Generates one name of at most `max_len` characters.
	///
	/// Returns `Ok(None)` when the sample grows past `max_len`; the sample is
	/// abandoned rather than truncated.
	pub fn generate_one(&mut self, max_len: usize) -> Result<Option<String>, MarkovError> {
		let name: String = self
			.model
			.sample()
			.take(max_len.saturating_add(1))
			.collect::<Result<_, _>>()?;

		if name.chars().count() > max_len {
			return Ok(None);
		}
		Ok(Some(name))
	}

	/// Generates up to `count` distinct names of at most `max_len` characters.
	///
	/// # Behavior
	/// - Rejects empty names, training records and names already produced.
	/// - Stops after `count * ATTEMPT_MULTIPLIER` attempts even if fewer than
	///   `count` names were found.
	///
	/// # Notes
	/// - Names are returned in generation order.
	pub fn generate_unique(&mut self, count: usize, max_len: usize) -> Result<Vec<String>, MarkovError> {
		let max_attempts = count.saturating_mul(ATTEMPT_MULTIPLIER);
		let mut names = Vec::with_capacity(count);
		let mut produced = HashSet::new();

		let mut attempts = 0;
		while names.len() < count && attempts < max_attempts {
			attempts += 1;

			let Some(name) = self.generate_one(max_len)? else {
				continue;
			};
			if name.is_empty() || self.records.contains(&name) || !produced.insert(name.clone()) {
				continue;
			}
			names.push(name);
		}

		if names.len() < count {
			warn!(
				"Only {} of {} names generated after {} attempts",
				names.len(),
				count,
				attempts
			);
		}
		Ok(names)
	}
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	fn config(order: usize, seed: u64) -> ModelConfig {
		let mut config = ModelConfig::new(order).unwrap();
		config.set_seed(seed);
		config
	}

	#[test]
	fn blank_records_are_ignored() {
		let mut generator = Generator::new(config(2, 0)).unwrap();
		generator.add_record("   ").unwrap();
		generator.add_record("").unwrap();
		assert_eq!(generator.record_count(), 0);
		assert!(generator.model().token_space().is_empty());
	}

	#[test]
	fn records_are_trimmed() {
		let mut generator = Generator::new(config(2, 0)).unwrap();
		generator.add_record("  anna ").unwrap();
		assert!(generator.is_record("anna"));
		assert!(!generator.model().token_space().contains(&' '));
	}

	#[test]
	fn long_samples_are_abandoned() {
		let mut generator = Generator::new(config(2, 0)).unwrap();
		generator.add_record("abcdef").unwrap();
		assert_eq!(generator.generate_one(3).unwrap(), None);
		assert_eq!(generator.generate_one(6).unwrap(), Some("abcdef".to_owned()));
	}

	#[test]
	fn training_records_are_never_returned() {
		// With a single record the model can only reproduce it
		let mut generator = Generator::new(config(2, 0)).unwrap();
		generator.add_record("abc").unwrap();
		assert!(generator.generate_unique(3, 10).unwrap().is_empty());
	}

	#[test]
	fn generated_names_are_new_and_distinct() {
		let mut generator = Generator::new(config(2, 42)).unwrap();
		for record in ["anna", "hannah", "joanna", "johanna", "marianne", "annabel", "bella", "isabella"] {
			generator.add_record(record).unwrap();
		}

		let names = generator.generate_unique(5, 16).unwrap();
		assert!(names.len() <= 5);

		let distinct: HashSet<&String> = names.iter().collect();
		assert_eq!(distinct.len(), names.len());
		for name in &names {
			assert!(!name.is_empty());
			assert!(name.chars().count() <= 16);
			assert!(!generator.is_record(name));
		}
	}

	#[test]
	fn zero_names_requested() {
		let mut generator = Generator::new(config(2, 0)).unwrap();
		generator.add_record("abc").unwrap();
		assert!(generator.generate_unique(0, 10).unwrap().is_empty());
	}

	#[test]
	fn from_file_trains_every_record() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("names.txt");
		fs::write(&path, "anna\nbob\n\nclara\n").unwrap();

		let generator = Generator::from_file(&path, config(3, 0)).unwrap();
		assert_eq!(generator.record_count(), 3);
		assert!(generator.is_record("clara"));
		assert!(generator.model().token_space().contains(&TERMINATOR));
	}

	#[test]
	fn from_missing_file_fails() {
		let dir = tempdir().unwrap();
		let result = Generator::from_file(dir.path().join("missing.txt"), config(3, 0));
		assert!(matches!(result, Err(MarkovError::Io(_))));
	}
}
