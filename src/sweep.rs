//! Weight sweeps: rating one route across ascending package weights.
//!
//! [`WeightSweepAggregator::run`] walks the weights of a [`WeightSweep`] one at a time. A
//! rating failure or an empty answer for one weight is recorded in that weight's sample and the
//! sweep moves on; only an authentication failure aborts, since no later call could succeed
//! without a token.
//!
//! [`WeightSweepAggregator::run_scenarios`] is the orthogonal walk: one weight across every
//! scenario of a catalog, with the same abort rule.

pub mod batch;
pub mod report;
pub mod weights;

pub use batch::*;
pub use report::*;
pub use weights::*;

// self
use crate::{
	_prelude::*,
	clock::{self, Clock},
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	persist::SingleTestResult,
	provider::Environment,
	rating::{Dimensions, PackageSpec, RateGateway, RateNormalizer, ServiceRateRecord},
	scenario::{self, Catalog, Route},
};

/// Drives the gateway and normalizer across a weight range.
#[derive(Clone)]
pub struct WeightSweepAggregator {
	gateway: RateGateway,
	environment: Environment,
	validate_addresses: bool,
	clock: Clock,
}
impl WeightSweepAggregator {
	/// Creates an aggregator over `gateway`, tagging reports as CIE.
	pub fn new(gateway: RateGateway) -> Self {
		Self {
			gateway,
			environment: Environment::default(),
			validate_addresses: false,
			clock: clock::system_clock(),
		}
	}

	/// Sets the environment tag written into reports.
	pub fn with_environment(mut self, environment: Environment) -> Self {
		self.environment = environment;

		self
	}

	/// Validates both route addresses before the first weight when enabled.
	pub fn with_address_validation(mut self, enabled: bool) -> Self {
		self.validate_addresses = enabled;

		self
	}

	/// Replaces the clock stamping reports.
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;

		self
	}

	/// Underlying gateway.
	pub fn gateway(&self) -> &RateGateway {
		&self.gateway
	}

	/// Rates `route` for every weight of `sweep` with packages of `dimensions`.
	pub async fn run(
		&self,
		route: &Route,
		sweep: &WeightSweep,
		dimensions: Dimensions,
	) -> Result<ComparisonReport> {
		const KIND: OperationKind = OperationKind::WeightSweep;

		sweep.validate()?;

		let span = OperationSpan::new(KIND, "run");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.sweep(route, sweep, dimensions)).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	/// Quotes every scenario of `catalog` once with a package of `weight` and `dimensions`.
	///
	/// Address and rating failures are recorded per scenario; an authentication failure
	/// aborts the batch.
	pub async fn run_scenarios(
		&self,
		catalog: Catalog,
		weight: f64,
		dimensions: Dimensions,
	) -> Result<ScenarioBatchReport> {
		const KIND: OperationKind = OperationKind::ScenarioBatch;

		let span = OperationSpan::new(KIND, "run_scenarios");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result = span.instrument(self.batch(catalog, weight, dimensions)).await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	async fn batch(
		&self,
		catalog: Catalog,
		weight: f64,
		dimensions: Dimensions,
	) -> Result<ScenarioBatchReport> {
		let all = scenario::scenarios(catalog);
		let mut results = Vec::with_capacity(all.len());

		for (index, entry) in all.iter().enumerate() {
			tracing::info!(
				scenario = entry.name,
				index = index + 1,
				total = all.len(),
				"Quoting scenario."
			);

			let quote = match entry.route() {
				Ok(route) =>
					self.gateway.quote(&route, &[PackageSpec::new(weight, dimensions)], true).await,
				Err(e) => Err(e.into()),
			};
			let outcome = match quote {
				Ok(quote) => ScenarioOutcome::Completed(Box::new(SingleTestResult::from_quote(
					&quote,
					(self.clock)(),
				))),
				Err(Error::Auth(e)) => {
					tracing::error!(
						scenario = entry.name,
						error = %e,
						"Aborting batch, authentication failed."
					);

					return Err(e.into());
				},
				Err(e) => {
					tracing::warn!(scenario = entry.name, error = %e, "Scenario failed.");

					ScenarioOutcome::Failed(e.to_string())
				},
			};

			results.push(ScenarioResult { scenario: entry.name.to_owned(), outcome });
		}

		Ok(ScenarioBatchReport {
			catalog,
			weight,
			package_dimensions: dimensions,
			results,
			timestamp: (self.clock)(),
			environment: self.environment,
		})
	}

	async fn sweep(
		&self,
		route: &Route,
		sweep: &WeightSweep,
		dimensions: Dimensions,
	) -> Result<ComparisonReport> {
		if self.validate_addresses {
			self.validate_route(route).await;
		}

		let weights = sweep.weights();
		let total = weights.len();
		let mut results = Vec::with_capacity(total);

		tracing::info!(route = %route.name, total, "Starting weight sweep.");

		for (index, weight) in weights.into_iter().enumerate() {
			tracing::info!(weight, index = index + 1, total, "Rating weight.");

			let outcome = match self.rate_weight(route, weight, dimensions).await {
				Ok(rates) => SampleOutcome::Rated(rates),
				Err(Error::Auth(e)) => {
					tracing::error!(weight, error = %e, "Aborting sweep, authentication failed.");

					return Err(e.into());
				},
				Err(Error::EmptyResult(e)) => {
					tracing::warn!(weight, error = %e, "No service available for weight.");

					SampleOutcome::Unavailable
				},
				Err(e) => {
					tracing::warn!(weight, error = %e, "Failed to rate weight.");

					SampleOutcome::Failed(e.to_string())
				},
			};

			results.push(WeightSample { weight, outcome });
		}

		Ok(ComparisonReport {
			scenario: route.name.clone(),
			route: route.clone(),
			weight_range: *sweep,
			package_dimensions: dimensions,
			results,
			timestamp: (self.clock)(),
			environment: self.environment,
		})
	}

	async fn rate_weight(
		&self,
		route: &Route,
		weight: f64,
		dimensions: Dimensions,
	) -> Result<BTreeMap<String, ServiceRateRecord>> {
		let package = PackageSpec::new(weight, dimensions);
		let request = self.gateway.request_builder().build(route, &[package], true)?;
		let raw = self.gateway.shop(&request).await?;

		Ok(RateNormalizer::parse(&raw)?)
	}

	async fn validate_route(&self, route: &Route) {
		for (role, address) in [("origin", &route.origin), ("destination", &route.destination)] {
			match self.gateway.validate_address(address).await {
				Ok(validation) if validation.valid => {
					tracing::info!(role, %address, "Address validated.");
				},
				Ok(_) => tracing::warn!(role, %address, "Address validation reported issues."),
				Err(e) => tracing::warn!(role, %address, error = %e, "Address validation failed."),
			}
		}
	}
}
impl Debug for WeightSweepAggregator {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("WeightSweepAggregator")
			.field("gateway", &self.gateway)
			.field("environment", &self.environment)
			.field("validate_addresses", &self.validate_addresses)
			.finish()
	}
}
