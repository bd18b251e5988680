//! Observability helpers for engine operations.
//!
//! Every operation runs inside a span named `rate_shopper.op` carrying the `op` (operation
//! kind) and `stage` (call site) fields. Enable the `metrics` feature to increment the
//! `rate_shopper_operation_total` counter for every attempt/success/failure, labeled by
//! `op` + `outcome`.

mod metrics;
mod tracing;

pub use self::{metrics::*, tracing::*};

// self
use crate::_prelude::*;

/// Engine operations observed by spans and counters.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationKind {
	/// Client-credentials token exchange.
	Auth,
	/// Rating or rate-shopping call, fallback included.
	Rate,
	/// Address validation call.
	AddressValidation,
	/// Full weight sweep over one route.
	WeightSweep,
	/// Single-weight quotes over every scenario of a catalog.
	ScenarioBatch,
}
impl OperationKind {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationKind::Auth => "auth",
			OperationKind::Rate => "rate",
			OperationKind::AddressValidation => "address_validation",
			OperationKind::WeightSweep => "weight_sweep",
			OperationKind::ScenarioBatch => "scenario_batch",
		}
	}
}
impl Display for OperationKind {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Outcome labels recorded for each operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OperationOutcome {
	/// Entry to an operation.
	Attempt,
	/// Successful completion.
	Success,
	/// Failure propagated back to the caller.
	Failure,
}
impl OperationOutcome {
	/// Returns a stable label suitable for span or metric fields.
	pub const fn as_str(self) -> &'static str {
		match self {
			OperationOutcome::Attempt => "attempt",
			OperationOutcome::Success => "success",
			OperationOutcome::Failure => "failure",
		}
	}

	/// Maps a result onto [`OperationOutcome::Success`] or [`OperationOutcome::Failure`].
	pub fn of<T, E>(result: &std::result::Result<T, E>) -> Self {
		if result.is_ok() { Self::Success } else { Self::Failure }
	}
}
impl Display for OperationOutcome {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}
