use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::{fs, io};

use log::debug;

use crate::error::{MarkovError, Result};

/// Characters removed from tokens when quote stripping is enabled.
const QUOTE_CHARS: &[char] = &['"', '\u{201C}', '\u{201D}', '\u{00AB}', '\u{00BB}'];

/// Reads a text file and returns all its lines as a `Vec<String>`.
///
/// - Reads the entire file into memory
/// - Splits on `\n` / `\r\n`
pub(crate) fn read_file<P: AsRef<Path>>(filename: P) -> io::Result<Vec<String>> {
	let mut contents = String::new();
	File::open(filename)?.read_to_string(&mut contents)?;
	Ok(contents.lines().map(str::to_owned).collect())
}

/// Lists the regular files directly inside `dir`, skipping excluded names.
///
/// Returns full paths in sorted order. Subdirectories are ignored.
pub(crate) fn list_files<P: AsRef<Path>>(dir: P, exclude: &[String]) -> io::Result<Vec<PathBuf>> {
	let mut files = Vec::new();

	for entry in fs::read_dir(dir)? {
		let path = entry?.path();
		if !path.is_file() {
			continue;
		}
		let excluded = path
			.file_name()
			.map(|name| exclude.iter().any(|e| name == e.as_str()))
			.unwrap_or(true);
		if !excluded {
			files.push(path);
		}
	}

	files.sort();
	Ok(files)
}

/// Splits a line on whitespace.
///
/// With `strip_quotes`, quotation marks are removed from every token and
/// tokens left empty are dropped.
pub(crate) fn tokenize(line: &str, strip_quotes: bool) -> Vec<String> {
	line.split_whitespace()
		.map(|token| {
			if strip_quotes {
				token.replace(QUOTE_CHARS, "")
			} else {
				token.to_owned()
			}
		})
		.filter(|token| !token.is_empty())
		.collect()
}

/// Reads every eligible file of a data directory into token sequences.
///
/// One sequence per non-blank line, files visited in sorted order.
///
/// # Errors
/// - `Corpus` if `dir` is not a directory.
/// - `Io` if a file cannot be read (including non UTF-8 content).
pub(crate) fn read_corpus(dir: &Path, exclude: &[String], strip_quotes: bool) -> Result<Vec<Vec<String>>> {
	if !dir.is_dir() {
		return Err(MarkovError::Corpus(format!("expected a directory, got: {}", dir.display())));
	}

	let mut sequences = Vec::new();
	for file in list_files(dir, exclude)? {
		let before = sequences.len();
		for line in read_file(&file)? {
			let tokens = tokenize(&line, strip_quotes);
			if !tokens.is_empty() {
				sequences.push(tokens);
			}
		}
		debug!("read {} lines from {}", sequences.len() - before, file.display());
	}

	Ok(sequences)
}

#[cfg(test)]
mod tests {
	use super::*;

	fn exclude() -> Vec<String> {
		vec![".gitignore".to_owned()]
	}

	#[test]
	fn tokenize_splits_on_any_whitespace() {
		assert_eq!(tokenize("  the\tcat   sat \r", false), vec!["the", "cat", "sat"]);
		assert!(tokenize("   ", false).is_empty());
	}

	#[test]
	fn tokenize_strips_quotes_when_asked() {
		let line = "\"Breaking\" news: \u{201C}aliens\u{201D} land \" here";
		assert_eq!(tokenize(line, true), vec!["Breaking", "news:", "aliens", "land", "here"]);
		assert_eq!(tokenize(line, false).len(), 6);
		assert_eq!(tokenize("it's", true), vec!["it's"]);
	}

	#[test]
	fn list_files_skips_excluded_and_directories() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("b.txt"), "b").unwrap();
		fs::write(dir.path().join("a.txt"), "a").unwrap();
		fs::write(dir.path().join(".gitignore"), "*").unwrap();
		fs::create_dir(dir.path().join("nested")).unwrap();

		let files = list_files(dir.path(), &exclude()).unwrap();
		let names: Vec<String> = files
			.iter()
			.map(|f| f.file_name().unwrap().to_string_lossy().to_string())
			.collect();
		assert_eq!(names, vec!["a.txt", "b.txt"]);
	}

	#[test]
	fn read_corpus_yields_one_sequence_per_line() {
		let dir = tempfile::tempdir().unwrap();
		fs::write(dir.path().join("one.txt"), "the cat sat\n\nthe dog ran\n").unwrap();
		fs::write(dir.path().join("two.txt"), "\"quoted\" headline\r\n").unwrap();

		let corpus = read_corpus(dir.path(), &exclude(), true).unwrap();
		assert_eq!(
			corpus,
			vec![
				vec!["the", "cat", "sat"],
				vec!["the", "dog", "ran"],
				vec!["quoted", "headline"],
			]
		);
	}

	#[test]
	fn read_corpus_requires_a_directory() {
		let dir = tempfile::tempdir().unwrap();
		let file = dir.path().join("file.txt");
		fs::write(&file, "x").unwrap();

		assert!(matches!(read_corpus(&file, &exclude(), false), Err(MarkovError::Corpus(_))));
		assert!(matches!(
			read_corpus(&dir.path().join("missing"), &exclude(), false),
			Err(MarkovError::Corpus(_))
		));
	}
}
