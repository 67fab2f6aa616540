use serde::{Deserialize, Serialize};

use crate::error::{MarkovError, Result};

/// Accepted distance of a probability sum from 1.0.
pub const TOLERANCE: f64 = 1e-9;

/// A discrete probability distribution laid out for inverse-CDF sampling.
///
/// Entries are kept sorted by value so that a given uniform draw always
/// selects the same entry. The cumulative weights are derived data and are
/// rebuilt on deserialization rather than stored.
///
/// # Invariants
/// - Entries are sorted and unique
/// - Every probability is finite and within `(0, 1 + TOLERANCE]`
/// - A non-empty distribution sums to 1.0 within `TOLERANCE`
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(
	try_from = "Vec<(T, f64)>",
	into = "Vec<(T, f64)>",
	bound(serialize = "T: Serialize + Clone", deserialize = "T: Deserialize<'de> + Ord")
)]
pub struct Distribution<T> {
	entries: Vec<(T, f64)>,
	cumulative: Vec<f64>,
}

impl<T: Ord> Distribution<T> {
	/// Normalizes raw occurrence counts into probabilities.
	///
	/// Zero counts are dropped so that no unreachable entry is materialized.
	pub fn from_counts<I>(counts: I) -> Self
	where
		I: IntoIterator<Item = (T, u64)>,
	{
		let counts: Vec<(T, u64)> = counts.into_iter().filter(|(_, count)| *count > 0).collect();
		let total: u64 = counts.iter().map(|(_, count)| count).sum();

		let mut entries: Vec<(T, f64)> = counts
			.into_iter()
			.map(|(value, count)| (value, count as f64 / total as f64))
			.collect();
		entries.sort_by(|a, b| a.0.cmp(&b.0));

		Self::from_sorted(entries)
	}

	fn from_sorted(entries: Vec<(T, f64)>) -> Self {
		let mut sum = 0.0;
		let cumulative = entries
			.iter()
			.map(|(_, probability)| {
				sum += probability;
				sum
			})
			.collect();
		Self { entries, cumulative }
	}

	/// Picks the entry selected by the uniform draw `u` in `[0, 1)`.
	///
	/// Returns the first entry whose cumulative probability reaches `u`. When
	/// rounding leaves the final cumulative weight just short of `u`, the last
	/// entry is returned instead.
	///
	/// # Errors
	/// Returns `SamplingExhausted` if the distribution is empty.
	pub fn sample(&self, u: f64) -> Result<&T> {
		let last = match self.entries.last() {
			Some((value, _)) => value,
			None => return Err(MarkovError::SamplingExhausted("empty distribution".to_owned())),
		};
		let index = self.cumulative.partition_point(|weight| *weight < u);
		Ok(self.entries.get(index).map(|(value, _)| value).unwrap_or(last))
	}

	/// Probability of `value`, 0.0 if absent.
	pub fn probability(&self, value: &T) -> f64 {
		self.entries
			.binary_search_by(|(candidate, _)| candidate.cmp(value))
			.map(|index| self.entries[index].1)
			.unwrap_or(0.0)
	}
}

impl<T> Distribution<T> {
	/// Number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// True when there is nothing to sample.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Entries in sampling order.
	pub fn iter(&self) -> impl Iterator<Item = (&T, f64)> {
		self.entries.iter().map(|(value, probability)| (value, *probability))
	}

	/// Sum of all probabilities, 0.0 when empty.
	pub fn total(&self) -> f64 {
		self.cumulative.last().copied().unwrap_or(0.0)
	}
}

impl<T: Ord> TryFrom<Vec<(T, f64)>> for Distribution<T> {
	type Error = String;

	fn try_from(entries: Vec<(T, f64)>) -> std::result::Result<Self, Self::Error> {
		for (_, probability) in &entries {
			if !probability.is_finite() || *probability <= 0.0 || *probability > 1.0 + TOLERANCE {
				return Err(format!("probability {} out of range", probability));
			}
		}
		if entries.windows(2).any(|pair| pair[0].0 >= pair[1].0) {
			return Err("entries are not sorted and unique".to_owned());
		}

		let distribution = Self::from_sorted(entries);
		if !distribution.is_empty() && (distribution.total() - 1.0).abs() > TOLERANCE {
			return Err(format!("probabilities sum to {}", distribution.total()));
		}
		Ok(distribution)
	}
}

impl<T> From<Distribution<T>> for Vec<(T, f64)> {
	fn from(distribution: Distribution<T>) -> Self {
		distribution.entries
	}
}
