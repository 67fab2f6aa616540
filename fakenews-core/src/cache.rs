//! On-disk persistence of a [`TransitionModel`].
//!
//! Layout of a cache file:
//!
//! | bytes | content                                   |
//! |-------|-------------------------------------------|
//! | 8     | magic `FKNWSMDL`                          |
//! | 2     | format version, little endian             |
//! | rest  | `postcard` encoding of the model          |
//!
//! Loading checks every layer and the model's own invariants; anything that
//! does not decode to exactly one valid model is a `CorruptCache` error.

use std::fs;
use std::io::{ErrorKind, Write};
use std::path::Path;

use log::info;
use tempfile::NamedTempFile;

use crate::error::{MarkovError, Result};
use crate::model::transition::TransitionModel;

pub const MAGIC: &[u8; 8] = b"FKNWSMDL";
pub const FORMAT_VERSION: u16 = 1;

const HEADER_LEN: usize = MAGIC.len() + 2;

/// Encodes a model with its header.
pub fn encode(model: &TransitionModel) -> Result<Vec<u8>> {
	let mut bytes = Vec::with_capacity(HEADER_LEN);
	bytes.extend_from_slice(MAGIC);
	bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
	postcard::to_extend(model, bytes).map_err(|e| MarkovError::Encode(e.to_string()))
}

/// Decodes and validates a model. `path` is only used in error messages.
pub fn decode(path: &Path, bytes: &[u8]) -> Result<TransitionModel> {
	if bytes.len() < HEADER_LEN {
		return Err(MarkovError::corrupt_cache(path, "file too short"));
	}
	let (header, payload) = bytes.split_at(HEADER_LEN);
	if &header[..MAGIC.len()] != MAGIC {
		return Err(MarkovError::corrupt_cache(path, "not a model cache"));
	}
	let version = u16::from_le_bytes([header[MAGIC.len()], header[MAGIC.len() + 1]]);
	if version != FORMAT_VERSION {
		return Err(MarkovError::corrupt_cache(
			path,
			format!("unsupported format version {} (expected {})", version, FORMAT_VERSION),
		));
	}

	let (model, rest): (TransitionModel, &[u8]) =
		postcard::take_from_bytes(payload).map_err(|e| MarkovError::corrupt_cache(path, e))?;
	if !rest.is_empty() {
		return Err(MarkovError::corrupt_cache(path, format!("{} trailing bytes", rest.len())));
	}
	model.validate().map_err(|reason| MarkovError::corrupt_cache(path, reason))?;

	Ok(model)
}

/// Writes `model` to `path`, replacing any existing file.
///
/// The file is written next to its destination and renamed into place, so a
/// crash never leaves a half-written cache behind.
pub fn save(model: &TransitionModel, path: &Path) -> Result<()> {
	let bytes = encode(model)?;

	let parent = match path.parent() {
		Some(p) if !p.as_os_str().is_empty() => p,
		_ => Path::new("."),
	};
	fs::create_dir_all(parent)?;

	let mut temp_file = NamedTempFile::new_in(parent)?;
	temp_file.write_all(&bytes)?;
	temp_file.as_file().sync_all()?;
	temp_file.persist(path).map_err(|e| MarkovError::Io(e.error))?;

	info!("saved model cache to {} ({} bytes)", path.display(), bytes.len());
	Ok(())
}

/// Loads the model stored at `path`.
///
/// # Errors
/// - `Io` if the file cannot be read.
/// - `CorruptCache` if its content is not a valid model.
pub fn load(path: &Path) -> Result<TransitionModel> {
	let bytes = fs::read(path)?;
	let model = decode(path, &bytes)?;
	info!("loaded model cache from {} ({} states)", path.display(), model.len());
	Ok(model)
}

/// Like [`load`], but a missing file is `Ok(None)`.
pub fn load_if_present(path: &Path) -> Result<Option<TransitionModel>> {
	match load(path) {
		Ok(model) => Ok(Some(model)),
		Err(MarkovError::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(None),
		Err(e) => Err(e),
	}
}

#[cfg(test)]
mod tests {
	use std::collections::BTreeMap;

	use serde::Serialize;

	use super::*;
	use crate::model::frequency::FrequencyModel;
	use crate::model::token::{State, StateKey, Token};

	/// Same wire shape as `TransitionModel`, without its guarantees.
	#[derive(Serialize)]
	struct RawModel {
		order: usize,
		transitions: BTreeMap<StateKey, Vec<(Token, f64)>>,
		initial: Vec<(State, f64)>,
	}

	fn encode_raw(raw: &RawModel) -> Vec<u8> {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(MAGIC);
		bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
		bytes.extend(postcard::to_stdvec(raw).unwrap());
		bytes
	}

	fn sample_model() -> TransitionModel {
		let mut frequency = FrequencyModel::new(2).unwrap();
		frequency.add_sequence("the cat sat".split_whitespace()).unwrap();
		frequency.add_sequence("the dog ran".split_whitespace()).unwrap();
		TransitionModel::from_frequency(&frequency)
	}

	fn is_corrupt(result: Result<TransitionModel>) -> bool {
		matches!(result, Err(MarkovError::CorruptCache { .. }))
	}

	#[test]
	fn encode_starts_with_header() {
		let bytes = encode(&sample_model()).unwrap();
		assert_eq!(&bytes[..8], MAGIC);
		assert_eq!(&bytes[8..10], &FORMAT_VERSION.to_le_bytes());
	}

	#[test]
	fn decode_restores_the_model() {
		let model = sample_model();
		let bytes = encode(&model).unwrap();
		assert_eq!(decode(Path::new("mem"), &bytes).unwrap(), model);
	}

	#[test]
	fn decode_rejects_bad_headers() {
		let path = Path::new("mem");
		let bytes = encode(&sample_model()).unwrap();

		assert!(is_corrupt(decode(path, &[])));
		assert!(is_corrupt(decode(path, &bytes[..5])));

		let mut wrong_magic = bytes.clone();
		wrong_magic[0] = b'X';
		assert!(is_corrupt(decode(path, &wrong_magic)));

		let mut wrong_version = bytes.clone();
		wrong_version[8] = 99;
		assert!(is_corrupt(decode(path, &wrong_version)));
	}

	#[test]
	fn decode_rejects_truncated_or_padded_payloads() {
		let path = Path::new("mem");
		let bytes = encode(&sample_model()).unwrap();

		assert!(is_corrupt(decode(path, &bytes[..bytes.len() - 3])));

		let mut padded = bytes.clone();
		padded.push(0);
		assert!(is_corrupt(decode(path, &padded)));
	}

	#[test]
	fn decode_rejects_a_different_payload_type() {
		let mut bytes = Vec::new();
		bytes.extend_from_slice(MAGIC);
		bytes.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
		bytes.extend(postcard::to_stdvec(&("a string", 42u32, vec![1.5f64])).unwrap());
		assert!(is_corrupt(decode(Path::new("mem"), &bytes)));
	}

	#[test]
	fn raw_model_matches_the_real_layout() {
		let mut transitions = BTreeMap::new();
		transitions.insert(StateKey::new(0, &[Token::Root]), vec![(Token::word("a"), 1.0)]);
		transitions.insert(StateKey::new(1, &[Token::word("a")]), vec![(Token::Eol, 1.0)]);
		let raw = RawModel { order: 2, transitions, initial: vec![(vec![Token::Root], 1.0)] };

		let model = decode(Path::new("mem"), &encode_raw(&raw)).unwrap();
		let mut frequency = FrequencyModel::new(2).unwrap();
		frequency.add_sequence(["a"]).unwrap();
		assert_eq!(model, TransitionModel::from_frequency(&frequency));
	}

	#[test]
	fn decode_rejects_a_successor_without_a_next_window() {
		let mut transitions = BTreeMap::new();
		transitions.insert(StateKey::new(0, &[Token::Root]), vec![(Token::word("a"), 1.0)]);
		let raw = RawModel { order: 2, transitions, initial: vec![(vec![Token::Root], 1.0)] };

		let err = decode(Path::new("mem"), &encode_raw(&raw)).unwrap_err();
		assert!(matches!(err, MarkovError::CorruptCache { .. }));
		assert!(err.to_string().contains("unknown state (a) at position 1"), "{}", err);
	}

	#[test]
	fn decode_rejects_zero_probability_successors() {
		let mut transitions = BTreeMap::new();
		transitions.insert(
			StateKey::new(0, &[Token::Root]),
			vec![(Token::Eol, 0.0), (Token::word("a"), 1.0)],
		);
		transitions.insert(StateKey::new(1, &[Token::word("a")]), vec![(Token::Eol, 1.0)]);
		let raw = RawModel { order: 2, transitions, initial: vec![(vec![Token::Root], 1.0)] };

		assert!(is_corrupt(decode(Path::new("mem"), &encode_raw(&raw))));
	}

	#[test]
	fn save_then_load() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("nested").join("model.bin");
		let model = sample_model();

		save(&model, &path).unwrap();
		assert_eq!(load(&path).unwrap(), model);

		// overwrite unconditionally
		let mut frequency = FrequencyModel::new(3).unwrap();
		frequency.add_sequence(["other", "model"]).unwrap();
		let other = TransitionModel::from_frequency(&frequency);
		save(&other, &path).unwrap();
		assert_eq!(load(&path).unwrap().order(), 3);
	}

	#[test]
	fn missing_file_is_none() {
		let dir = tempfile::tempdir().unwrap();
		assert!(load_if_present(&dir.path().join("absent.bin")).unwrap().is_none());
	}

	#[test]
	fn garbage_file_is_corrupt_not_missing() {
		let dir = tempfile::tempdir().unwrap();
		let path = dir.path().join("garbage.bin");
		fs::write(&path, b"definitely not a model").unwrap();
		assert!(matches!(load_if_present(&path), Err(MarkovError::CorruptCache { .. })));
	}
}
