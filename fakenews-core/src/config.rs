use std::path::PathBuf;

use crate::error::{MarkovError, Result};

pub const DEFAULT_ORDER: usize = 2;
pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_CACHE_PATH: &str = ".cache.bin";
pub const DEFAULT_EXCLUDE: &[&str] = &[".gitignore"];

/// Settings for reading a corpus and training (or reloading) a model.
///
/// # Invariants
/// - `order` is always >= 2; it can only be changed through `set_order`
pub struct Config {
	/// Directory holding the corpus files.
	pub data_dir: PathBuf,

	/// Location of the model cache.
	pub cache_path: PathBuf,

	/// Remove quotation marks from tokens while reading the corpus.
	pub strip_quotes: bool,

	/// File names inside `data_dir` that are never read.
	pub exclude: Vec<String>,

	/// Ignore any existing cache and retrain.
	pub refresh: bool,

	/// Chain order.
	order: usize,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			data_dir: PathBuf::from(DEFAULT_DATA_DIR),
			cache_path: PathBuf::from(DEFAULT_CACHE_PATH),
			strip_quotes: true,
			exclude: DEFAULT_EXCLUDE.iter().map(|name| (*name).to_owned()).collect(),
			refresh: false,
			order: DEFAULT_ORDER,
		}
	}
}

impl Config {
	/// Chain order used for training and cache checks.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Sets the chain order.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 2`; the previous order is kept.
	pub fn set_order(&mut self, order: usize) -> Result<()> {
		if order < 2 {
			return Err(MarkovError::InvalidOrder(order));
		}
		self.order = order;
		Ok(())
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn defaults() {
		let config = Config::default();
		assert_eq!(config.order(), 2);
		assert_eq!(config.data_dir, PathBuf::from("data"));
		assert_eq!(config.cache_path, PathBuf::from(".cache.bin"));
		assert_eq!(config.exclude, vec![".gitignore"]);
		assert!(config.strip_quotes);
		assert!(!config.refresh);
	}

	#[test]
	fn set_order_validates() {
		let mut config = Config::default();
		config.set_order(4).unwrap();
		assert_eq!(config.order(), 4);

		assert!(matches!(config.set_order(1), Err(MarkovError::InvalidOrder(1))));
		assert_eq!(config.order(), 4);
	}
}
