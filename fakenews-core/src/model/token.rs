use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

/// A single element of a sequence.
///
/// Real words are stored as shared, interned strings. The two sentinels are
/// separate variants, so no word read from a corpus can ever be mistaken for
/// a sequence boundary.
///
/// The derived ordering (`Root < Eol < Word`, words by text) is the
/// deterministic order in which distributions are laid out for sampling.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
	/// Synthetic start-of-sequence marker.
	Root,
	/// Synthetic end-of-sequence marker.
	Eol,
	/// A real word.
	Word(Arc<str>),
}

impl Token {
	/// Builds a word token without interning.
	pub fn word(text: &str) -> Self {
		Token::Word(Arc::from(text))
	}

	/// Returns the word text, or `None` for a sentinel.
	pub fn as_word(&self) -> Option<&str> {
		match self {
			Token::Word(w) => Some(w),
			_ => None,
		}
	}

	/// True for `Root` and `Eol`.
	pub fn is_sentinel(&self) -> bool {
		!matches!(self, Token::Word(_))
	}
}

impl fmt::Display for Token {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Token::Root => f.write_str("<ROOT>"),
			Token::Eol => f.write_str("<EOL>"),
			Token::Word(w) => f.write_str(w),
		}
	}
}

/// The window of the previous `order - 1` tokens.
pub type State = Vec<Token>;

/// Composite lookup key of the frequency and transition tables.
///
/// The same state content at two different positions is two distinct keys.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct StateKey {
	pub position: usize,
	pub state: State,
}

impl StateKey {
	pub fn new(position: usize, state: &[Token]) -> Self {
		Self { position, state: state.to_vec() }
	}
}

/// Renders a state as `(a b c)`, used in error messages and logs.
pub fn display_state(state: &[Token]) -> String {
	let words: Vec<String> = state.iter().map(Token::to_string).collect();
	format!("({})", words.join(" "))
}
