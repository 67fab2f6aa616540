use log::info;

use crate::cache;
use crate::config::Config;
use crate::error::{MarkovError, Result};
use crate::io::read_corpus;
use crate::model::frequency::FrequencyModel;
use crate::model::transition::TransitionModel;

/// Reads the corpus described by `config` and derives a transition model.
///
/// The intermediate frequency model is dropped once the transition model
/// has been built.
pub fn train(config: &Config) -> Result<TransitionModel> {
	let corpus = read_corpus(&config.data_dir, &config.exclude, config.strip_quotes)?;

	let mut frequency = FrequencyModel::new(config.order())?;
	for sequence in &corpus {
		frequency.add_sequence(sequence)?;
	}
	info!(
		"trained order-{} model on {} sequences ({} distinct words) from {}",
		frequency.order(),
		frequency.sequences(),
		frequency.vocabulary_len(),
		config.data_dir.display()
	);

	Ok(TransitionModel::from_frequency(&frequency))
}

/// Returns the cached model, training and caching a new one when needed.
///
/// # Behavior
/// - `refresh` set: train, then overwrite the cache.
/// - Cache present: load it. A corrupt cache is an error, never a silent
///   retrain; the caller has to ask for `refresh`.
/// - No cache: train, then write the cache.
///
/// # Errors
/// - `CorruptCache` if the cache cannot be decoded.
/// - `OrderMismatch` if the cached model was trained with another order.
/// - Any corpus or I/O error raised while training.
pub fn load_or_train(config: &Config) -> Result<TransitionModel> {
	if config.refresh {
		info!("refresh requested, ignoring {}", config.cache_path.display());
	} else if let Some(model) = cache::load_if_present(&config.cache_path)? {
		if model.order() != config.order() {
			return Err(MarkovError::OrderMismatch { expected: config.order(), found: model.order() });
		}
		return Ok(model);
	} else {
		info!("no model cache at {}", config.cache_path.display());
	}

	let model = train(config)?;
	cache::save(&model, &config.cache_path)?;
	Ok(model)
}
