use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while training, persisting, or sampling a Markov model.
#[derive(Error, Debug)]
pub enum MarkovError {
	/// The chain order is below the supported minimum.
	#[error("order must be >= 2, got {0}")]
	InvalidOrder(usize),

	/// A sequence handed to the frequency model contains an unusable token.
	#[error("invalid input: {0}")]
	InvalidInput(String),

	/// A `(position, state)` pair that was never observed during training.
	#[error("unknown state at position {position}: {state}")]
	UnknownState { position: usize, state: String },

	/// The cache artifact does not decode to a valid transition model.
	#[error("corrupt cache {}: {reason}", path.display())]
	CorruptCache { path: PathBuf, reason: String },

	/// A model could not be encoded for the cache.
	#[error("cannot encode model: {0}")]
	Encode(String),

	/// A distribution had no entry to sample from.
	#[error("sampling exhausted: {0}")]
	SamplingExhausted(String),

	/// Two models (or a model and a configuration) disagree on the order.
	#[error("order mismatch: expected {expected}, found {found}")]
	OrderMismatch { expected: usize, found: usize },

	/// The corpus directory cannot be used.
	#[error("corpus error: {0}")]
	Corpus(String),

	#[error("i/o error: {0}")]
	Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, MarkovError>;

impl MarkovError {
	pub(crate) fn corrupt_cache<P: Into<PathBuf>, S: ToString>(path: P, reason: S) -> Self {
		MarkovError::CorruptCache { path: path.into(), reason: reason.to_string() }
	}
}
