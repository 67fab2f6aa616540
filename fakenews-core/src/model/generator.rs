use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use super::token::{State, Token};
use super::transition::TransitionModel;
use crate::error::Result;

/// Stage of a single generation walk.
enum Phase {
	/// Drawing the opening window from the initial-state distribution.
	SamplingInitial,
	/// Extending `body` one token at a time.
	SamplingBody { body: Vec<Token>, position: usize },
	/// `EOL` was drawn; holds the full walk without the terminator.
	Done(Vec<Token>),
}

/// Samples new sequences from a [`TransitionModel`].
///
/// The generator borrows the model immutably and owns its random source, so
/// several generators can walk one shared model in parallel.
///
/// # Responsibilities
/// - Draw an opening state, then successors, until `EOL`
/// - Strip the sentinels from the result
/// - Allow seeding for reproducible output
pub struct Generator<'m, R: Rng> {
	model: &'m TransitionModel,
	rng: R,
}

impl<'m> Generator<'m, StdRng> {
	/// Creates a generator whose output is fully determined by `seed`.
	pub fn seeded(model: &'m TransitionModel, seed: u64) -> Self {
		Self::new(model, StdRng::seed_from_u64(seed))
	}

	/// Creates a generator seeded from the operating system.
	pub fn from_entropy(model: &'m TransitionModel) -> Self {
		Self::new(model, StdRng::from_os_rng())
	}
}

impl<'m, R: Rng> Generator<'m, R> {
	/// Creates a generator drawing from `rng`.
	pub fn new(model: &'m TransitionModel, rng: R) -> Self {
		Self { model, rng }
	}

	/// Generates one sequence of real words.
	///
	/// # Behavior
	/// - Draws the opening `order - 1` window from the initial distribution.
	/// - Repeatedly draws the successor of the last `order - 1` tokens at the
	///   current position, advancing the position after each draw.
	/// - Stops on `EOL`.
	///
	/// The walk always ends: a recorded transition to a real word at position
	/// `p` implies a recorded window at `p + 1`, and positions never exceed the
	/// longest training sequence.
	///
	/// # Returns
	/// The walk without its `ROOT` padding and without the final `EOL`. Real
	/// words of the opening window (order >= 3) are kept in the output.
	///
	/// # Errors
	/// - `SamplingExhausted` if the model is empty.
	/// - `UnknownState` if the model breaks its own invariants.
	pub fn generate(&mut self) -> Result<Vec<Token>> {
		let width = self.model.order() - 1;
		let mut phase = Phase::SamplingInitial;

		loop {
			phase = match phase {
				Phase::SamplingInitial => {
					let u = self.draw();
					let state: &State = self.model.initial_distribution().sample(u)?;
					Phase::SamplingBody { body: state.clone(), position: 0 }
				}
				Phase::SamplingBody { mut body, position } => {
					let state = &body[body.len() - width..];
					let u = self.draw();
					let next = self.model.successor_distribution(position, state)?.sample(u)?.clone();
					if next == Token::Eol {
						Phase::Done(body)
					} else {
						body.push(next);
						Phase::SamplingBody { body, position: position + 1 }
					}
				}
				Phase::Done(body) => {
					return Ok(body.into_iter().filter(|token| !token.is_sentinel()).collect());
				}
			};
		}
	}

	/// Generates one sequence and joins its words with single spaces.
	pub fn generate_line(&mut self) -> Result<String> {
		let words: Vec<String> = self.generate()?.iter().map(Token::to_string).collect();
		Ok(words.join(" "))
	}

	fn draw(&mut self) -> f64 {
		self.rng.random::<f64>()
	}
}
