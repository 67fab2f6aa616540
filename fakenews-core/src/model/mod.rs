//! Top-level module for the Markov chain.
//!
//! - Tokens, states and composite keys (`Token`, `StateKey`)
//! - Occurrence counting (`FrequencyModel`)
//! - Inverse-CDF sampling tables (`Distribution`)
//! - Normalized transition probabilities (`TransitionModel`)
//! - Sequence sampling (`Generator`)

/// Word and sentinel tokens, states, and table keys.
pub mod token;

/// Position-aware n-gram occurrence counts.
///
/// Built once by replaying the whole corpus, then discarded.
pub mod frequency;

/// Sorted discrete distribution with cumulative weights.
pub mod distribution;

/// Immutable transition probabilities; the persisted artifact.
pub mod transition;

/// Stochastic walk over a transition model.
pub mod generator;
