use std::fs::File;
use std::io;
use std::io::Read;
use std::path::Path;

/// Reads a training file and returns one record per line.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
/// - Trims every line and skips the empty ones
pub fn read_records<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents
		.lines()
		.map(str::trim)
		.filter(|line| !line.is_empty())
		.map(str::to_owned)
		.collect())
}

#[cfg(test)]
mod tests {
	use std::fs;

	use tempfile::tempdir;

	use super::*;

	#[test]
	fn records_are_trimmed_and_blank_lines_skipped() {
		let dir = tempdir().unwrap();
		let path = dir.path().join("names.txt");
		fs::write(&path, "  alice\r\nbob  \n\n   \ncarol").unwrap();

		assert_eq!(read_records(&path).unwrap(), vec!["alice", "bob", "carol"]);
	}

	#[test]
	fn missing_file_is_an_error() {
		let dir = tempdir().unwrap();
		assert!(read_records(dir.path().join("missing.txt")).is_err());
	}
}
