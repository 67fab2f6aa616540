//! Markov-chain headline generation library.
//!
//! This crate learns a position-aware, order-N word chain from a directory of
//! text files and samples new sequences from it:
//! - Position-aware frequency counting (`FrequencyModel`)
//! - Normalized, immutable transition probabilities (`TransitionModel`)
//! - Seedable sequence generation (`Generator`)
//! - A tagged binary cache for trained models
//!
//! Corpus reading is kept internal; it is reached through `pipeline`.

/// Core Markov models and generation logic.
pub mod model;

/// Model cache encoding and file persistence.
pub mod cache;

/// Training and cache settings.
pub mod config;

/// Error taxonomy shared by every module.
pub mod error;

/// Corpus-to-model orchestration (train, load, or both).
pub mod pipeline;

/// Corpus file discovery and tokenization.
///
/// Not exposed
pub(crate) mod io;

pub use config::Config;
pub use error::{MarkovError, Result};
pub use model::frequency::FrequencyModel;
pub use model::generator::Generator;
pub use model::token::{State, StateKey, Token};
pub use model::transition::TransitionModel;
