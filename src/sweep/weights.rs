//! Weight sequence generation.

// self
use crate::{_prelude::*, error::ConfigError};

/// Inclusive weight range walked by a sweep.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSweep {
	/// First weight.
	pub min: f64,
	/// Upper bound; the last sample never exceeds it.
	pub max: f64,
	/// Increment between samples; strictly positive.
	pub step: f64,
}
impl WeightSweep {
	/// Tolerance absorbing floating-point error when counting steps.
	pub const EPSILON: f64 = 1e-9;
	/// Upper bound on the samples of one sweep.
	pub const MAX_SAMPLES: usize = 10_000;

	/// Creates a validated sweep.
	pub fn new(min: f64, max: f64, step: f64) -> Result<Self, ConfigError> {
		let sweep = Self { min, max, step };

		sweep.validate()?;

		Ok(sweep)
	}

	/// Rejects non-positive or non-finite steps and ranges with more than
	/// [`WeightSweep::MAX_SAMPLES`] samples.
	pub fn validate(&self) -> Result<(), ConfigError> {
		if !(self.step.is_finite() && self.step > 0.0) {
			return Err(ConfigError::InvalidWeightStep { step: self.step });
		}
		if self.steps().is_some_and(|steps| steps >= Self::MAX_SAMPLES as f64) {
			return Err(ConfigError::TooManyWeights { limit: Self::MAX_SAMPLES });
		}

		Ok(())
	}

	/// Number of samples the sweep produces.
	pub fn len(&self) -> usize {
		if self.validate().is_err() {
			return 0;
		}

		self.steps().map_or(0, |steps| (steps as usize).saturating_add(1))
	}

	/// Returns `true` when no weight would be sampled.
	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}

	/// Weights in ascending order: `min(min + i * step, max)` for `i` in `0..len`.
	///
	/// Counting iterations instead of accumulating keeps the last sample from being dropped
	/// to rounding drift.
	pub fn weights(&self) -> Vec<f64> {
		(0..self.len()).map(|i| (self.min + i as f64 * self.step).min(self.max)).collect()
	}

	/// Whole steps between `min` and `max`, or `None` for an empty or non-finite range.
	fn steps(&self) -> Option<f64> {
		if !(self.min.is_finite() && self.max.is_finite()) || self.min > self.max {
			return None;
		}

		Some(((self.max - self.min) / self.step + Self::EPSILON).floor())
	}
}
impl Default for WeightSweep {
	fn default() -> Self {
		Self { min: 5.0, max: 30.0, step: 5.0 }
	}
}
