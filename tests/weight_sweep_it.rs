// std
use std::{env, fs, process};
// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::macros;
// self
use rate_shopper::{
	_preludet::*,
	clock,
	error::ConfigError,
	persist::{self, ReportWriter},
	rating::Dimensions,
	scenario::{self, Catalog, Route},
	sweep::{
		ComparisonReport, SampleOutcome, ScenarioBatchReport, WeightSweep, WeightSweepAggregator,
	},
};

const TOKEN_PATH: &str = "/security/v1/oauth/token";
const TIME_IN_TRANSIT_PATH: &str = "/api/rating/v2409/Shoptimeintransit";
const SHOP_PATH: &str = "/api/rating/v2409/Shop";
const VALIDATION_PATH: &str = "/api/addressvalidation/v1/1";
const OAKLAND_MARKER: &str = "\"PostalCode\":\"94612\"";

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"sweep-token\",\"expires_in\":\"14399\"}");
		})
		.await
}

fn weight_marker(weight: u32) -> String {
	format!("\"Weight\":\"{weight}.0\"")
}

fn rated_response(weight: u32) -> Value {
	let ground = format!("{}.00", 10 + weight);
	let next_day = format!("{}.00", 50 + 2 * weight);

	json!({ "RateResponse": { "RatedShipment": [
		{
			"Service": { "Code": "03" },
			"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": ground },
			"TimeInTransit": { "ServiceSummary": { "EstimatedArrival": {
				"Arrival": { "Date": "20250307" },
				"BusinessDaysInTransit": "3"
			}}}
		},
		{
			"Service": { "Code": "01" },
			"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": next_day },
			"GuaranteedDelivery": { "BusinessDaysInTransit": "1" }
		},
		{
			"Service": { "Code": "02" },
			"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "N/A" }
		}
	]}})
}

fn la_to_sf() -> Route {
	scenario::resolve(Catalog::California, "la_to_sf").route().expect("Scenario should parse.")
}

fn aggregator(base: &str) -> WeightSweepAggregator {
	let (gateway, _) = build_test_gateway(base);

	WeightSweepAggregator::new(gateway)
		.with_clock(clock::fixed_clock(macros::datetime!(2025-03-04 09:30 UTC)))
}

#[tokio::test]
async fn sweep_records_rated_unavailable_and_failed_weights() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let mut rated = Vec::new();

	for weight in [5, 10, 25, 30] {
		let mock = server
			.mock_async(|when, then| {
				when.method(POST).path(TIME_IN_TRANSIT_PATH).body_includes(weight_marker(weight));
				then.status(200)
					.header("content-type", "application/json")
					.json_body(rated_response(weight));
			})
			.await;

		rated.push(mock);
	}

	let failing_transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH).body_includes(weight_marker(15));
			then.status(500).body("transit outage");
		})
		.await;
	let failing_shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH).body_includes(weight_marker(15));
			then.status(502).body("shop outage");
		})
		.await;
	let empty = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH).body_includes(weight_marker(20));
			then.status(200)
				.header("content-type", "application/json")
				.json_body(json!({ "RateResponse": { "RatedShipment": [] } }));
		})
		.await;
	let report = aggregator(&server.base_url())
		.run(&la_to_sf(), &WeightSweep::default(), Dimensions::default())
		.await
		.expect("Sweep should complete despite per-weight failures.");
	let weights = report.samples().iter().map(|sample| sample.weight).collect::<Vec<_>>();

	assert_eq!(weights, [5.0, 10.0, 15.0, 20.0, 25.0, 30.0]);
	assert_eq!(report.scenario, "la_to_sf");
	assert_eq!(report.rated_count(), 4);
	assert!(matches!(report.samples()[2].outcome, SampleOutcome::Failed(_)));
	assert_eq!(report.samples()[3].outcome, SampleOutcome::Unavailable);

	let errors = report.errors();

	assert_eq!(errors.len(), 2);
	assert_eq!(errors[0].weight, 15.0);
	assert!(errors[0].description.contains("Shop request failed with status 502"));
	assert_eq!(errors[1].description, "No shipping options available.");

	let series = report.service_series();
	let codes = series.iter().map(|series| series.code.as_str()).collect::<Vec<_>>();

	assert_eq!(codes, ["01", "02", "03"]);

	let ground = &series[2];

	assert_eq!(ground.points.len(), 4);
	assert_eq!(ground.average_increase_per_lb, Some(Decimal::ONE));
	assert_eq!(series[1].price_range, None);

	let summaries = report.weight_summaries();

	assert_eq!(summaries.len(), 4);
	assert_eq!(summaries[0].cheapest.code, "03");
	assert_eq!(summaries[0].most_expensive.code, "01");
	assert_eq!(summaries[0].spread, Some(Decimal::new(45, 0)));

	token.assert_calls_async(1).await;

	for mock in rated {
		mock.assert_calls_async(1).await;
	}

	failing_transit.assert_calls_async(1).await;
	failing_shop.assert_calls_async(1).await;
	empty.assert_calls_async(1).await;
}

#[tokio::test]
async fn authentication_failure_aborts_the_sweep() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(403).body("forbidden");
		})
		.await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(rated_response(5));
		})
		.await;
	let err = aggregator(&server.base_url())
		.run(&la_to_sf(), &WeightSweep::default(), Dimensions::default())
		.await
		.expect_err("Rejected credentials should abort the sweep.");

	assert!(err.is_auth());

	token.assert_calls_async(1).await;
	transit.assert_calls_async(0).await;
}

#[tokio::test]
async fn invalid_step_is_rejected_before_any_call() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let sweep = WeightSweep { min: 5.0, max: 30.0, step: 0.0 };
	let err = aggregator(&server.base_url())
		.run(&la_to_sf(), &sweep, Dimensions::default())
		.await
		.expect_err("Zero step should be rejected.");

	assert!(matches!(err, Error::Config(ConfigError::InvalidWeightStep { .. })));

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn inverted_range_produces_an_empty_report() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let sweep = WeightSweep::new(30.0, 5.0, 5.0).expect("Positive step should be accepted.");
	let report = aggregator(&server.base_url())
		.run(&la_to_sf(), &sweep, Dimensions::default())
		.await
		.expect("Inverted range should yield an empty report.");

	assert!(report.samples().is_empty());
	assert!(report.service_series().is_empty());

	token.assert_calls_async(0).await;
}

#[tokio::test]
async fn address_validation_runs_once_per_route_endpoint() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;

	let validation = server
		.mock_async(|when, then| {
			when.method(POST).path(VALIDATION_PATH);
			then.status(200).json_body(json!({ "AddressValidationResponse": {
				"AddressValidationResult": { "Quality": "0.95" }
			}}));
		})
		.await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(rated_response(5));
		})
		.await;
	let sweep = WeightSweep::new(5.0, 5.0, 5.0).expect("Single-weight sweep should be valid.");
	let report = aggregator(&server.base_url())
		.with_address_validation(true)
		.run(&la_to_sf(), &sweep, Dimensions::default())
		.await
		.expect("Sweep should succeed.");

	assert_eq!(report.rated_count(), 1);

	validation.assert_calls_async(2).await;
	transit.assert_calls_async(1).await;
}

#[tokio::test]
async fn finished_report_persists_and_reloads() {
	let server = MockServer::start_async().await;

	mock_token(&server).await;
	server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(rated_response(10));
		})
		.await;

	let sweep = WeightSweep::new(10.0, 12.5, 2.5).expect("Sweep should be valid.");
	let report = aggregator(&server.base_url())
		.run(&la_to_sf(), &sweep, Dimensions { length: 10.0, width: 10.0, height: 10.0 })
		.await
		.expect("Sweep should succeed.");
	let dir = env::temp_dir().join(format!("rate_shopper_sweep_it_{}", process::id()));
	let path = ReportWriter::new(&dir).write_comparison(&report).expect("Report should persist.");

	assert!(path.ends_with("ups_ca_weight_comparison_la_to_sf_20250304_093000.json"));

	let loaded: ComparisonReport = persist::read_json(&path).expect("Report should reload.");

	assert_eq!(loaded, report);
	assert_eq!(loaded.samples().len(), 2);

	fs::remove_dir_all(&dir).expect("Temp directory should be removable.");
}

#[tokio::test]
async fn scenario_batch_quotes_every_california_route() {
	let server = MockServer::start_async().await;
	let token = mock_token(&server).await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH).body_excludes(OAKLAND_MARKER);
			then.status(200)
				.header("content-type", "application/json")
				.json_body(rated_response(10));
		})
		.await;
	let failing_transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH).body_includes(OAKLAND_MARKER);
			then.status(500).body("transit outage");
		})
		.await;
	let failing_shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH).body_includes(OAKLAND_MARKER);
			then.status(503).body("shop outage");
		})
		.await;
	let report = aggregator(&server.base_url())
		.run_scenarios(Catalog::California, 10.0, Dimensions::default())
		.await
		.expect("Batch should complete despite one failing scenario.");

	assert_eq!(report.results.len(), scenario::scenarios(Catalog::California).len());
	assert_eq!(report.succeeded(), 11);
	assert_eq!(report.results[0].scenario, "la_to_sf");

	let failures = report.failures();

	assert_eq!(failures.len(), 1);
	assert_eq!(failures[0].0, "oakland_to_san_jose");
	assert!(failures[0].1.contains("Shop request failed with status 503"));

	let dir = env::temp_dir().join(format!("rate_shopper_batch_it_{}", process::id()));
	let path = ReportWriter::new(&dir).write_batch(&report).expect("Batch report should persist.");

	assert!(path.ends_with("ca_all_scenarios_10.0lb_20250304_093000.json"));

	let loaded: ScenarioBatchReport = persist::read_json(&path).expect("Batch report should reload.");

	assert_eq!(loaded, report);

	fs::remove_dir_all(&dir).expect("Temp directory should be removable.");

	token.assert_calls_async(1).await;
	transit.assert_calls_async(11).await;
	failing_transit.assert_calls_async(1).await;
	failing_shop.assert_calls_async(1).await;
}

#[tokio::test]
async fn authentication_failure_aborts_the_scenario_batch() {
	let server = MockServer::start_async().await;
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).body("unauthorized");
		})
		.await;
	let err = aggregator(&server.base_url())
		.run_scenarios(Catalog::California, 10.0, Dimensions::default())
		.await
		.expect_err("Rejected credentials should abort the batch.");

	assert!(err.is_auth());

	token.assert_calls_async(1).await;
}
