//! Injectable time source shared by the token cache, request builder, and sweeps.

// self
use crate::_prelude::*;

/// Shared function returning the current instant.
pub type Clock = Arc<dyn Fn() -> OffsetDateTime + Send + Sync>;

/// Clock backed by the system UTC time.
pub fn system_clock() -> Clock {
	Arc::new(OffsetDateTime::now_utc)
}

/// Clock frozen at `instant`.
pub fn fixed_clock(instant: OffsetDateTime) -> Clock {
	Arc::new(move || instant)
}

/// Manually advanced clock for tests and replays.
#[derive(Clone, Debug)]
pub struct ManualClock(Arc<Mutex<OffsetDateTime>>);
impl ManualClock {
	/// Starts the clock at `instant`.
	pub fn new(instant: OffsetDateTime) -> Self {
		Self(Arc::new(Mutex::new(instant)))
	}

	/// Moves the clock forward by `delta`.
	pub fn advance(&self, delta: Duration) {
		*self.0.lock() += delta;
	}

	/// Returns the current reading.
	pub fn now(&self) -> OffsetDateTime {
		*self.0.lock()
	}

	/// Converts the handle into a [`Clock`] sharing the same reading.
	pub fn as_clock(&self) -> Clock {
		let inner = self.0.clone();

		Arc::new(move || *inner.lock())
	}
}

#[cfg(test)]
mod tests {
	// crates.io
	use time::macros;
	// self
	use super::*;

	#[test]
	fn manual_clock_shares_its_reading() {
		let manual = ManualClock::new(macros::datetime!(2025-03-01 12:00 UTC));
		let clock = manual.as_clock();

		manual.advance(Duration::minutes(5));

		assert_eq!(clock(), macros::datetime!(2025-03-01 12:05 UTC));
		assert_eq!(fixed_clock(manual.now())(), manual.now());
	}
}
