use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::distribution::Distribution;
use super::frequency::FrequencyModel;
use super::token::{display_state, State, StateKey, Token};
use crate::error::{MarkovError, Result};

/// Read-only transition probabilities derived from a [`FrequencyModel`].
///
/// This is the unit of persistence and the only structure consulted during
/// generation. It holds no interior mutability, so a single instance can be
/// shared by any number of concurrent generators.
///
/// # Invariants
/// - `order` is always >= 2
/// - Every key and initial state holds exactly `order - 1` tokens
/// - Every stored distribution is non-empty and sums to 1.0
/// - Every initial state has a position-0 distribution
/// - Every real-word successor at position `p` has a distribution at `p + 1`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
pub struct TransitionModel {
	order: usize,
	transitions: BTreeMap<StateKey, Distribution<Token>>,
	initial: Distribution<State>,
}

impl TransitionModel {
	/// Normalizes every count vector of a completed frequency model.
	pub fn from_frequency(frequency: &FrequencyModel) -> Self {
		let transitions = frequency
			.transitions()
			.map(|(key, successors)| {
				let successors = successors.iter().map(|(token, count)| (token.clone(), *count));
				(key.clone(), Distribution::from_counts(successors))
			})
			.collect();

		let initial = Distribution::from_counts(
			frequency.initial_states().map(|(state, count)| (state.clone(), count)),
		);

		Self { order: frequency.order(), transitions, initial }
	}

	/// Order of the frequency model this was derived from.
	pub fn order(&self) -> usize {
		self.order
	}

	/// Number of `(position, state)` keys.
	pub fn len(&self) -> usize {
		self.transitions.len()
	}

	/// A model trained on no sequence at all.
	pub fn is_empty(&self) -> bool {
		self.initial.is_empty()
	}

	/// All `(position, state)` keys in ascending order.
	pub fn states(&self) -> impl Iterator<Item = &StateKey> {
		self.transitions.keys()
	}

	/// Probabilities of the tokens following `state` at `position`.
	///
	/// # Errors
	/// Returns `UnknownState` if the pair was never observed.
	pub fn successor_distribution(&self, position: usize, state: &[Token]) -> Result<&Distribution<Token>> {
		self.transitions
			.get(&StateKey::new(position, state))
			.ok_or_else(|| MarkovError::UnknownState { position, state: display_state(state) })
	}

	/// Probabilities of each sequence-opening state.
	pub fn initial_distribution(&self) -> &Distribution<State> {
		&self.initial
	}

	/// Checks the structural invariants that deserialization alone cannot.
	///
	/// Distributions already validate their own probabilities when decoded.
	/// Beyond shapes, this checks that every walk can continue: each initial
	/// state has a position-0 window, and each real-word successor at position
	/// `p` leads to a recorded window at `p + 1`.
	pub fn validate(&self) -> std::result::Result<(), String> {
		if self.order < 2 {
			return Err(format!("order {} is below 2", self.order));
		}
		let width = self.order - 1;

		for (key, distribution) in &self.transitions {
			if key.state.len() != width {
				return Err(format!(
					"state {} at position {} has {} tokens, expected {}",
					display_state(&key.state),
					key.position,
					key.state.len(),
					width
				));
			}
			if distribution.is_empty() {
				return Err(format!("state {} at position {} has no successor", display_state(&key.state), key.position));
			}
			if distribution.iter().any(|(token, _)| *token == Token::Root) {
				return Err(format!("state {} at position {} is followed by ROOT", display_state(&key.state), key.position));
			}
			// every real-word successor must lead to a recorded window
			for (successor, _) in distribution.iter().filter(|(token, _)| !token.is_sentinel()) {
				let mut next = key.state[1..].to_vec();
				next.push(successor.clone());
				let next = StateKey { position: key.position + 1, state: next };
				if !self.transitions.contains_key(&next) {
					return Err(format!(
						"state {} at position {} leads to unknown state {} at position {}",
						display_state(&key.state),
						key.position,
						display_state(&next.state),
						next.position
					));
				}
			}
		}

		for (state, _) in self.initial.iter() {
			if state.len() != width {
				return Err(format!("initial state {} has {} tokens, expected {}", display_state(state), state.len(), width));
			}
			if !self.transitions.contains_key(&StateKey::new(0, state)) {
				return Err(format!("initial state {} has no transition", display_state(state)));
			}
		}

		Ok(())
	}
}
