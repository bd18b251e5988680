//! Runs a weight sweep for the `la_to_sf` scenario against a mock provider, prints the
//! cheapest service per weight, and saves the comparison report to the temp directory.

// std
use std::{env, sync::Arc};
// crates.io
use color_eyre::Result;
use httpmock::prelude::*;
use serde_json::json;
use url::Url;
// self
use rate_shopper::{
	auth::{Credentials, TokenCache},
	http::ReqwestHttpClient,
	persist::ReportWriter,
	provider::ProviderEndpoints,
	rating::{Dimensions, RateGateway},
	reqwest::Client,
	scenario::{self, Catalog},
	sweep::{WeightSweep, WeightSweepAggregator},
};

#[tokio::main]
async fn main() -> Result<()> {
	color_eyre::install()?;

	let server = MockServer::start_async().await;
	let token_mock = server
		.mock_async(|when, then| {
			when.method(POST).path("/security/v1/oauth/token");
			then.status(200).header("content-type", "application/json").body(
				"{\"access_token\":\"demo-access\",\"token_type\":\"Bearer\",\"expires_in\":\"14399\"}",
			);
		})
		.await;

	server
		.mock_async(|when, then| {
			when.method(POST).path("/api/rating/v2409/Shoptimeintransit");
			then.status(200).json_body(json!({ "RateResponse": { "RatedShipment": [
				{
					"Service": { "Code": "03" },
					"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "16.85" },
					"TimeInTransit": { "ServiceSummary": { "EstimatedArrival": {
						"Arrival": { "Date": "20250307" },
						"BusinessDaysInTransit": "2"
					}}}
				},
				{
					"Service": { "Code": "01" },
					"TotalCharges": { "CurrencyCode": "USD", "MonetaryValue": "64.20" },
					"GuaranteedDelivery": { "BusinessDaysInTransit": "1", "DeliveryByTime": "10:30 A.M." }
				}
			]}}));
		})
		.await;

	let endpoints = ProviderEndpoints::from_base(&Url::parse(&server.base_url())?)?;
	let http_client = ReqwestHttpClient::with_client(
		Client::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()?,
	);
	let tokens = Arc::new(TokenCache::new(
		http_client.clone(),
		endpoints.token.clone(),
		Credentials::new("demo-client", "demo-secret"),
	));
	let gateway = RateGateway::new(http_client, endpoints, tokens.clone());
	let route = scenario::resolve(Catalog::California, "la_to_sf").route()?;
	let report = WeightSweepAggregator::new(gateway)
		.run(&route, &WeightSweep::default(), Dimensions::default())
		.await?;

	println!("{route}");

	for summary in report.weight_summaries() {
		let spread = summary.spread.map(|spread| spread.to_string()).unwrap_or_else(|| "N/A".into());

		println!(
			"{:>5.1} lbs  cheapest {} ({}), spread {spread}",
			summary.weight, summary.cheapest.service_name, summary.cheapest.price
		);
	}

	let path = ReportWriter::new(env::temp_dir()).write_comparison(&report)?;

	println!("Report saved to {}.", path.display());
	println!("Token exchanges: {}.", tokens.exchanges());

	token_mock.assert_async().await;

	Ok(())
}
