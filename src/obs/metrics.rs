// self
use crate::obs::{OperationKind, OperationOutcome};

/// Records an operation outcome via the global metrics recorder (when enabled).
pub fn record_operation_outcome(kind: OperationKind, outcome: OperationOutcome) {
	#[cfg(feature = "metrics")]
	{
		metrics::counter!(
			"rate_shopper_operation_total",
			"op" => kind.as_str(),
			"outcome" => outcome.as_str()
		)
		.increment(1);
	}

	#[cfg(not(feature = "metrics"))]
	{
		let _ = (kind, outcome);
	}
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn record_is_noop_without_recorder() {
		record_operation_outcome(OperationKind::WeightSweep, OperationOutcome::Failure);
		assert_eq!(OperationOutcome::of(&Ok::<_, ()>(1)), OperationOutcome::Success);
		assert_eq!(OperationOutcome::of(&Err::<(), _>("x")), OperationOutcome::Failure);
	}
}
