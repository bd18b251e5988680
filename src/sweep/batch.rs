//! Single-weight quotes across every scenario of a catalog.

// self
use crate::{
	_prelude::*, persist::SingleTestResult, provider::Environment, rating::Dimensions,
	scenario::Catalog,
};

/// Result of quoting one scenario.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "detail", rename_all = "snake_case")]
pub enum ScenarioOutcome {
	/// The quote succeeded.
	Completed(Box<SingleTestResult>),
	/// The quote failed; holds the error description.
	Failed(String),
}

/// One scenario paired with its outcome.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioResult {
	/// Scenario name.
	pub scenario: String,
	/// What the provider returned.
	pub outcome: ScenarioOutcome,
}
impl ScenarioResult {
	/// Returns `true` when the scenario was quoted.
	pub fn is_success(&self) -> bool {
		matches!(self.outcome, ScenarioOutcome::Completed(_))
	}
}

/// Read-only result of [`crate::sweep::WeightSweepAggregator::run_scenarios`].
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScenarioBatchReport {
	/// Catalog that was walked.
	pub catalog: Catalog,
	/// Package weight shared by every scenario.
	pub weight: f64,
	/// Package dimensions shared by every scenario.
	pub package_dimensions: Dimensions,
	/// Results in catalog order.
	pub results: Vec<ScenarioResult>,
	/// Generation instant.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
	/// Environment the batch ran against.
	pub environment: Environment,
}
impl ScenarioBatchReport {
	/// Number of scenarios that were quoted.
	pub fn succeeded(&self) -> usize {
		self.results.iter().filter(|result| result.is_success()).count()
	}

	/// Scenarios that failed, with their descriptions.
	pub fn failures(&self) -> Vec<(&str, &str)> {
		self.results
			.iter()
			.filter_map(|result| match &result.outcome {
				ScenarioOutcome::Failed(description) =>
					Some((result.scenario.as_str(), description.as_str())),
				ScenarioOutcome::Completed(_) => None,
			})
			.collect()
	}
}
