//! Sweep samples and the comparison statistics derived from them.

// self
use crate::{
	_prelude::*,
	error::EmptyResultError,
	provider::Environment,
	rating::{Dimensions, ServiceRateRecord, service},
	scenario::Route,
	sweep::WeightSweep,
};

/// Result of rating one weight.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum SampleOutcome {
	/// Normalized rates keyed by service code.
	Rated(BTreeMap<String, ServiceRateRecord>),
	/// The provider offered no service for this weight.
	Unavailable,
	/// The request failed; holds the error description.
	Failed(String),
}

/// One weight paired with its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSample {
	/// Requested package weight.
	pub weight: f64,
	/// What the provider returned.
	pub outcome: SampleOutcome,
}
impl WeightSample {
	/// Rates, when the sample was rated.
	pub fn rates(&self) -> Option<&BTreeMap<String, ServiceRateRecord>> {
		match &self.outcome {
			SampleOutcome::Rated(rates) => Some(rates),
			_ => None,
		}
	}

	/// Description of a failed or unavailable sample.
	pub fn error_description(&self) -> Option<String> {
		match &self.outcome {
			SampleOutcome::Rated(_) => None,
			SampleOutcome::Unavailable => Some(EmptyResultError.to_string()),
			SampleOutcome::Failed(description) => Some(description.clone()),
		}
	}
}

/// Inclusive decimal range.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
	/// Lowest value.
	pub min: Decimal,
	/// Highest value.
	pub max: Decimal,
}
impl PriceRange {
	fn of<I>(values: I) -> Option<Self>
	where
		I: IntoIterator<Item = Decimal>,
	{
		values.into_iter().fold(None, |range, value| match range {
			None => Some(Self { min: value, max: value }),
			Some(Self { min, max }) => Some(Self { min: min.min(value), max: max.max(value) }),
		})
	}
}

/// One point of a service's price series.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeriesPoint {
	/// Package weight.
	pub weight: f64,
	/// Rate at that weight.
	pub rate: ServiceRateRecord,
}

/// Price progression of one service across the rated weights.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ServiceSeries {
	/// Service code.
	pub code: String,
	/// Service display name.
	pub service_name: String,
	/// Points in ascending weight order.
	pub points: Vec<SeriesPoint>,
	/// Range of priced points.
	pub price_range: Option<PriceRange>,
	/// Range of price divided by weight.
	pub price_per_lb_range: Option<PriceRange>,
	/// `(last - first price) / (last - first weight)` over priced points.
	pub average_increase_per_lb: Option<Decimal>,
}

/// Service and price picked out of one weight's rates.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricedService {
	/// Service code.
	pub code: String,
	/// Service display name.
	pub service_name: String,
	/// Total price.
	pub price: Decimal,
}

/// Cheapest and most expensive services for one weight.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WeightSummary {
	/// Package weight.
	pub weight: f64,
	/// Lowest priced service.
	pub cheapest: PricedService,
	/// Highest priced service.
	pub most_expensive: PricedService,
	/// `most_expensive - cheapest`; `None` when the difference overflows.
	pub spread: Option<Decimal>,
}

/// Weight that produced no rates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SampleError {
	/// Package weight.
	pub weight: f64,
	/// Failure description.
	pub description: String,
}

/// Read-only result of a weight sweep.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ComparisonReport {
	/// Scenario name.
	pub scenario: String,
	/// Route that was swept.
	pub route: Route,
	/// Weight range parameters.
	pub weight_range: WeightSweep,
	/// Package dimensions shared by every sample.
	pub package_dimensions: Dimensions,
	/// Samples in ascending weight order.
	pub results: Vec<WeightSample>,
	/// Generation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Environment the sweep ran against.
	pub environment: Environment,
}
impl ComparisonReport {
	/// Samples in ascending weight order.
	pub fn samples(&self) -> &[WeightSample] {
		&self.results
	}

	/// Number of samples that returned rates.
	pub fn rated_count(&self) -> usize {
		self.results.iter().filter(|sample| sample.rates().is_some()).count()
	}

	/// Per-service series ordered by delivery speed.
	pub fn service_series(&self) -> Vec<ServiceSeries> {
		let codes = service::speed_ordered(
			self.results
				.iter()
				.filter_map(WeightSample::rates)
				.flat_map(|rates| rates.keys())
				.map(String::as_str),
		);

		codes
			.into_iter()
			.map(|code| {
				let points = self
					.results
					.iter()
					.filter_map(|sample| {
						sample.rates()?.get(&code).map(|rate| SeriesPoint {
							weight: sample.weight,
							rate: rate.clone(),
						})
					})
					.collect::<Vec<_>>();

				build_series(code, points)
			})
			.collect()
	}

	/// Cheapest/most expensive service per rated weight, ignoring priceless records.
	pub fn weight_summaries(&self) -> Vec<WeightSummary> {
		self.results
			.iter()
			.filter_map(|sample| {
				let priced = sample
					.rates()?
					.values()
					.filter_map(|rate| {
						rate.price.map(|price| PricedService {
							code: rate.code().to_owned(),
							service_name: rate.service_name.clone(),
							price,
						})
					})
					.collect::<Vec<_>>();
				let cheapest = priced.iter().min_by_key(|service| service.price)?.clone();
				let most_expensive = priced.iter().max_by_key(|service| service.price)?.clone();

				Some(WeightSummary {
					weight: sample.weight,
					spread: most_expensive.price.checked_sub(cheapest.price),
					cheapest,
					most_expensive,
				})
			})
			.collect()
	}

	/// Weights that failed or had no available service.
	pub fn errors(&self) -> Vec<SampleError> {
		self.results
			.iter()
			.filter_map(|sample| {
				sample
					.error_description()
					.map(|description| SampleError { weight: sample.weight, description })
			})
			.collect()
	}
}

fn build_series(code: String, points: Vec<SeriesPoint>) -> ServiceSeries {
	let service_name =
		points.first().map(|point| point.rate.service_name.clone()).unwrap_or_default();
	let priced = points
		.iter()
		.filter_map(|point| point.rate.price.map(|price| (point.weight, price)))
		.collect::<Vec<_>>();
	let price_range = PriceRange::of(priced.iter().map(|(_, price)| *price));
	let price_per_lb_range = PriceRange::of(priced.iter().filter_map(|(weight, price)| {
		Some(price.checked_div(positive_decimal(*weight)?)?.round_dp(4))
	}));
	let average_increase_per_lb = match (priced.first(), priced.last()) {
		(Some((first_weight, first_price)), Some((last_weight, last_price))) if priced.len() > 1 =>
			positive_decimal(last_weight - first_weight).and_then(|delta| {
				Some(last_price.checked_sub(*first_price)?.checked_div(delta)?.round_dp(4))
			}),
		_ => None,
	};

	ServiceSeries {
		code,
		service_name,
		points,
		price_range,
		price_per_lb_range,
		average_increase_per_lb,
	}
}

fn positive_decimal(value: f64) -> Option<Decimal> {
	Decimal::try_from(value).ok().filter(|value| value.is_sign_positive() && !value.is_zero())
}
