// crates.io
use httpmock::prelude::*;
use serde_json::json;
use time::macros;
// self
use rate_shopper::{
	_preludet::*,
	error::RateRequestError,
	persist::SingleTestResult,
	provider::Endpoint,
	rating::{Address, Dimensions, PackageSpec, Service},
	scenario::{self, Catalog, Route},
};

const TOKEN_PATH: &str = "/security/v1/oauth/token";
const TIME_IN_TRANSIT_PATH: &str = "/api/rating/v2409/Shoptimeintransit";
const SHOP_PATH: &str = "/api/rating/v2409/Shop";
const RATE_PATH: &str = "/api/rating/v2409/Rate";
const VALIDATION_PATH: &str = "/api/addressvalidation/v1/1";
const UNAUTHORIZED_BODY: &str = "{\"response\":{\"errors\":[{\"code\":\"250002\",\"message\":\"Invalid Authentication Information.\"}]}}";

async fn mock_token(server: &MockServer) -> httpmock::Mock<'_> {
	server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(200)
				.header("content-type", "application/json")
				.body("{\"access_token\":\"gateway-token\",\"expires_in\":\"14399\"}");
		})
		.await
}

fn rated_response() -> Value {
	json!({ "RateResponse": { "RatedShipment": [
		{
			"Service": { "Code": "03" },
			"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "18.42" },
			"TimeInTransit": { "ServiceSummary": { "EstimatedArrival": {
				"Arrival": { "Date": "20250307", "Time": "230000" },
				"BusinessDaysInTransit": "2"
			}}}
		},
		{
			"Service": { "Code": "01" },
			"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "71.10" },
			"GuaranteedDelivery": { "BusinessDaysInTransit": "1", "DeliveryByTime": "10:30 A.M." }
		}
	]}})
}

fn la_to_sf() -> Route {
	scenario::resolve(Catalog::California, "la_to_sf").route().expect("Scenario should parse.")
}

fn five_pounds() -> Vec<PackageSpec> {
	vec![PackageSpec::new(5.0, Dimensions::default())]
}

#[tokio::test]
async fn time_in_transit_success_skips_plain_shop() {
	let server = MockServer::start_async().await;
	let (gateway, tokens) = build_test_gateway(&server.base_url());
	let token = mock_token(&server).await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(TIME_IN_TRANSIT_PATH)
				.header("authorization", "Bearer gateway-token")
				.body_includes("DeliveryTimeInformation");
			then.status(200).header("content-type", "application/json").json_body(rated_response());
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH);
			then.status(200).header("content-type", "application/json").json_body(rated_response());
		})
		.await;
	let quote =
		gateway.quote(&la_to_sf(), &five_pounds(), true).await.expect("Quote should succeed.");

	assert_eq!(quote.rates.len(), 2);
	assert_eq!(quote.rates["03"].service, Service::Ground);
	assert_eq!(quote.rates["03"].price, Some(Decimal::new(1842, 2)));
	assert_eq!(quote.rates["03"].delivery, "20250307 by 230000 (2 business days)");
	assert_eq!(quote.rates["01"].delivery, "(1 business day)");
	assert!(quote.request.has_delivery_time());
	assert_eq!(tokens.exchanges(), 1);

	let result = SingleTestResult::from_quote(&quote, macros::datetime!(2025-03-04 09:30 UTC));

	assert_eq!(result.from.city, "Los Angeles");
	assert_eq!(result.to.city, "San Francisco");
	assert_eq!(result.packages, five_pounds());
	assert_eq!(result.rates, quote.rates);
	assert_eq!(result.rates_response, rated_response());

	token.assert_calls_async(1).await;
	transit.assert_calls_async(1).await;
	shop.assert_calls_async(0).await;
}

#[tokio::test]
async fn time_in_transit_failure_falls_back_once_without_delivery_time() {
	let server = MockServer::start_async().await;
	let (gateway, _) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(500).body("upstream unavailable");
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(SHOP_PATH)
				.header("authorization", "Bearer gateway-token")
				.body_includes("\"RequestOption\":\"Shop\"")
				.body_excludes("DeliveryTimeInformation");
			then.status(200).header("content-type", "application/json").json_body(rated_response());
		})
		.await;
	let quote = gateway
		.quote(&la_to_sf(), &five_pounds(), true)
		.await
		.expect("Fallback quote should succeed.");

	assert_eq!(quote.rates.len(), 2);

	transit.assert_calls_async(1).await;
	shop.assert_calls_async(1).await;
}

#[tokio::test]
async fn second_failure_is_returned_without_third_attempt() {
	let server = MockServer::start_async().await;
	let (gateway, _) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(503).body("try later");
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH);
			then.status(400).header("content-type", "application/json").body(
				"{\"response\":{\"errors\":[{\"code\":\"111210\",\"message\":\"The requested service is unavailable between the selected locations.\"}]}}",
			);
		})
		.await;
	let rate = server
		.mock_async(|when, then| {
			when.method(POST).path(RATE_PATH);
			then.status(200).json_body(rated_response());
		})
		.await;
	let request = gateway
		.request_builder()
		.build(&la_to_sf(), &five_pounds(), true)
		.expect("Request should build.");
	let err = gateway.shop(&request).await.expect_err("Both attempts should fail.");

	match err {
		Error::RateRequest(RateRequestError::Status { endpoint, status, faults, .. }) => {
			assert_eq!(endpoint, Endpoint::Shop);
			assert_eq!(status, 400);
			assert_eq!(faults[0].code.as_deref(), Some("111210"));
		},
		other => panic!("Expected a Shop status error, got {other:?}."),
	}

	transit.assert_calls_async(1).await;
	shop.assert_calls_async(1).await;
	rate.assert_calls_async(0).await;
}

#[tokio::test]
async fn single_service_requests_go_straight_to_rate() {
	let server = MockServer::start_async().await;
	let (gateway, _) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(rated_response());
		})
		.await;
	let rate = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(RATE_PATH)
				.body_includes("\"RequestOption\":\"Rate\"")
				.body_excludes("DeliveryTimeInformation");
			then.status(500).body("rate failure");
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH);
			then.status(200).json_body(rated_response());
		})
		.await;
	let err = gateway
		.quote(&la_to_sf(), &five_pounds(), false)
		.await
		.expect_err("Rate failure should not fall back.");

	assert!(matches!(
		err,
		Error::RateRequest(RateRequestError::Status { endpoint: Endpoint::Rate, status: 500, .. })
	));

	rate.assert_calls_async(1).await;
	transit.assert_calls_async(0).await;
	shop.assert_calls_async(0).await;
}

#[tokio::test]
async fn token_failure_prevents_rating_calls() {
	let server = MockServer::start_async().await;
	let (gateway, tokens) = build_test_gateway(&server.base_url());
	let token = server
		.mock_async(|when, then| {
			when.method(POST).path(TOKEN_PATH);
			then.status(401).header("content-type", "application/json").body(UNAUTHORIZED_BODY);
		})
		.await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(rated_response());
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST).path(SHOP_PATH);
			then.status(200).json_body(rated_response());
		})
		.await;
	let err = gateway
		.quote(&la_to_sf(), &five_pounds(), true)
		.await
		.expect_err("Rejected credentials should fail the quote.");

	assert!(err.is_auth());
	assert_eq!(tokens.failures(), 1);

	token.assert_calls_async(1).await;
	transit.assert_calls_async(0).await;
	shop.assert_calls_async(0).await;
}

#[tokio::test]
async fn unauthorized_rating_response_drops_cached_token() {
	let server = MockServer::start_async().await;
	let (gateway, tokens) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let rate = server
		.mock_async(|when, then| {
			when.method(POST).path(RATE_PATH);
			then.status(401).header("content-type", "application/json").body(UNAUTHORIZED_BODY);
		})
		.await;
	let err = gateway
		.quote(&la_to_sf(), &five_pounds(), false)
		.await
		.expect_err("Unauthorized rating call should fail.");

	assert_eq!(
		err.to_string(),
		"Rate request failed with status 401: [250002] Invalid Authentication Information."
	);
	assert!(tokens.peek().is_none());

	rate.assert_calls_async(1).await;
}

#[tokio::test]
async fn empty_rated_shipments_surface_as_empty_result() {
	let server = MockServer::start_async().await;
	let (gateway, _) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(200).json_body(json!({ "RateResponse": { "RatedShipment": [] } }));
		})
		.await;
	let err = gateway
		.quote(&la_to_sf(), &five_pounds(), true)
		.await
		.expect_err("Empty shipment list should fail.");

	assert!(matches!(err, Error::EmptyResult(_)));

	transit.assert_calls_async(1).await;
}

#[tokio::test]
async fn address_validation_reports_quality_candidates() {
	let server = MockServer::start_async().await;
	let (gateway, _) = build_test_gateway(&server.base_url());

	mock_token(&server).await;

	let valid = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(VALIDATION_PATH)
				.header("authorization", "Bearer gateway-token")
				.body_includes("\"PoliticalDivision2\":\"San Francisco\"");
			then.status(200).json_body(json!({ "AddressValidationResponse": {
				"Response": { "ResponseStatusCode": "1" },
				"AddressValidationResult": [{ "Rank": "1", "Quality": "1.0" }]
			}}));
		})
		.await;
	let invalid = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(VALIDATION_PATH)
				.body_includes("\"PoliticalDivision2\":\"Nowhere\"");
			then.status(200).json_body(json!({ "AddressValidationResponse": {
				"Response": { "ResponseStatusCode": "1" },
				"AddressValidationResult": []
			}}));
		})
		.await;
	let verdict = gateway
		.validate_address(&Address::new("789 Market St", "San Francisco", "CA", "94103"))
		.await
		.expect("Validation call should succeed.");

	assert!(verdict.valid);

	let verdict = gateway
		.validate_address(&Address::new("1 Unknown Rd", "Nowhere", "CA", "00000"))
		.await
		.expect("Validation call should succeed.");

	assert!(!verdict.valid);

	valid.assert_calls_async(1).await;
	invalid.assert_calls_async(1).await;
}

#[tokio::test]
async fn unauthorized_time_in_transit_refreshes_token_before_fallback() {
	let server = MockServer::start_async().await;
	let (gateway, tokens) = build_test_gateway(&server.base_url());
	let token = mock_token(&server).await;
	let transit = server
		.mock_async(|when, then| {
			when.method(POST).path(TIME_IN_TRANSIT_PATH);
			then.status(401).header("content-type", "application/json").body(UNAUTHORIZED_BODY);
		})
		.await;
	let shop = server
		.mock_async(|when, then| {
			when.method(POST)
				.path(SHOP_PATH)
				.header("authorization", "Bearer gateway-token")
				.body_excludes("DeliveryTimeInformation");
			then.status(200).header("content-type", "application/json").json_body(rated_response());
		})
		.await;
	let quote = gateway
		.quote(&la_to_sf(), &five_pounds(), true)
		.await
		.expect("Fallback should succeed with a fresh token.");

	assert_eq!(quote.rates.len(), 2);
	assert_eq!(tokens.exchanges(), 2);

	token.assert_calls_async(2).await;
	transit.assert_calls_async(1).await;
	shop.assert_calls_async(1).await;
}
