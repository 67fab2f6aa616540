use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::Arc;

use log::debug;

use super::token::{State, StateKey, Token};
use crate::error::{MarkovError, Result};

/// Position-aware n-gram occurrence counts.
///
/// For every window of `order` tokens in a padded sequence
/// `[ROOT] + words + [EOL]`, the leading `order - 1` tokens form the state and
/// the trailing token its successor. Counts are keyed by the state *and* the
/// window's offset in the sequence.
///
/// # Responsibilities
/// - Accumulate transition occurrences, one sequence at a time
/// - Record the initial state of every sequence
/// - Intern words so repeated words share one allocation
/// - Merge with another frequency model of the same order
///
/// # Invariants
/// - `order` is always >= 2
/// - Every stored count is strictly positive
/// - Every initial state has at least one position-0 transition
#[derive(Clone, Debug)]
pub struct FrequencyModel {
	/// The order of the model (tokens per window, including the successor)
	order: usize,

	/// `(position, state)` -> successor -> occurrences
	counts: HashMap<StateKey, BTreeMap<Token, u64>>,

	/// First `order - 1` tokens of each sequence -> occurrences
	initial: HashMap<State, u64>,

	/// Interned word storage
	vocabulary: HashSet<Arc<str>>,

	/// Number of sequences that contributed windows
	sequences: u64,
}

impl FrequencyModel {
	/// Creates an empty model of order `order`.
	///
	/// # Errors
	/// Returns `InvalidOrder` if `order < 2`.
	pub fn new(order: usize) -> Result<Self> {
		if order < 2 {
			return Err(MarkovError::InvalidOrder(order));
		}
		Ok(Self {
			order,
			counts: HashMap::new(),
			initial: HashMap::new(),
			vocabulary: HashSet::new(),
			sequences: 0,
		})
	}

	/// Tokens per window, including the successor.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of sequences recorded so far.
	pub fn sequences(&self) -> u64 {
		self.sequences
	}

	/// Number of distinct real words seen.
	pub fn vocabulary_len(&self) -> usize {
		self.vocabulary.len()
	}

	/// True until a sequence has contributed a window.
	pub fn is_empty(&self) -> bool {
		self.initial.is_empty()
	}

	/// Adds one sequence of real words to the model.
	///
	/// The sequence is padded to `[ROOT] + tokens + [EOL]`, every window of
	/// `order` tokens increments its `(position, state, successor)` count, and
	/// the first `order - 1` padded tokens count once as an initial state.
	///
	/// A padded sequence shorter than `order` holds no window and is skipped.
	/// With order 2 this never happens: even an empty sequence records
	/// `ROOT -> EOL` at position 0.
	///
	/// # Errors
	/// Returns `InvalidInput` if a token is empty or contains whitespace. The
	/// model is left untouched in that case.
	pub fn add_sequence<I, S>(&mut self, tokens: I) -> Result<()>
	where
		I: IntoIterator<Item = S>,
		S: AsRef<str>,
	{
		let words: Vec<S> = tokens.into_iter().collect();
		for (index, word) in words.iter().enumerate() {
			let word = word.as_ref();
			if word.is_empty() {
				return Err(MarkovError::InvalidInput(format!("empty token at index {}", index)));
			}
			if word.chars().any(char::is_whitespace) {
				return Err(MarkovError::InvalidInput(format!(
					"token {:?} at index {} contains whitespace",
					word, index
				)));
			}
		}

		let mut full = Vec::with_capacity(words.len() + 2);
		full.push(Token::Root);
		for word in &words {
			full.push(self.intern(word.as_ref()));
		}
		full.push(Token::Eol);

		if full.len() < self.order {
			// Sequence too short, no n-grams to compute
			debug!("skipping sequence of {} words, too short for order {}", words.len(), self.order);
			return Ok(());
		}

		for (position, window) in full.windows(self.order).enumerate() {
			let (state, successor) = window.split_at(self.order - 1);
			*self
				.counts
				.entry(StateKey::new(position, state))
				.or_default()
				.entry(successor[0].clone())
				.or_insert(0) += 1;
		}

		*self.initial.entry(full[..self.order - 1].to_vec()).or_insert(0) += 1;
		self.sequences += 1;
		Ok(())
	}

	/// Occurrences of `successor` after `state` at `position`.
	pub fn count(&self, position: usize, state: &[Token], successor: &Token) -> u64 {
		self.successor_counts(position, state)
			.and_then(|successors| successors.get(successor))
			.copied()
			.unwrap_or(0)
	}

	/// All successor counts of a `(position, state)` pair.
	pub fn successor_counts(&self, position: usize, state: &[Token]) -> Option<&BTreeMap<Token, u64>> {
		self.counts.get(&StateKey::new(position, state))
	}

	/// Occurrences of `state` as a sequence start.
	pub fn initial_count(&self, state: &[Token]) -> u64 {
		self.initial.get(state).copied().unwrap_or(0)
	}

	pub(crate) fn transitions(&self) -> impl Iterator<Item = (&StateKey, &BTreeMap<Token, u64>)> {
		self.counts.iter()
	}

	pub(crate) fn initial_states(&self) -> impl Iterator<Item = (&State, u64)> {
		self.initial.iter().map(|(state, count)| (state, *count))
	}

	/// Merges another frequency model into this one.
	///
	/// Occurrence counts for matching keys are summed, so merging is
	/// equivalent to having replayed both corpora into one model.
	///
	/// # Errors
	/// Returns `OrderMismatch` if the model orders differ.
	pub fn merge(&mut self, other: &Self) -> Result<()> {
		if self.order != other.order {
			return Err(MarkovError::OrderMismatch { expected: self.order, found: other.order });
		}

		for (key, successors) in &other.counts {
			let key = StateKey { position: key.position, state: self.intern_state(&key.state) };
			for (successor, count) in successors {
				let successor = self.intern_token(successor);
				*self.counts.entry(key.clone()).or_default().entry(successor).or_insert(0) += count;
			}
		}

		for (state, count) in &other.initial {
			let state = self.intern_state(state);
			*self.initial.entry(state).or_insert(0) += count;
		}

		self.sequences += other.sequences;
		Ok(())
	}

	fn intern(&mut self, word: &str) -> Token {
		if let Some(existing) = self.vocabulary.get(word) {
			return Token::Word(Arc::clone(existing));
		}
		let word: Arc<str> = Arc::from(word);
		self.vocabulary.insert(Arc::clone(&word));
		Token::Word(word)
	}

	fn intern_token(&mut self, token: &Token) -> Token {
		match token {
			Token::Word(w) => self.intern(w),
			sentinel => sentinel.clone(),
		}
	}

	fn intern_state(&mut self, state: &[Token]) -> State {
		state.iter().map(|token| self.intern_token(token)).collect()
	}
}
