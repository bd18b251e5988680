//! Parcel rate-shopping engine for the UPS rating API.
//!
//! The engine caches an OAuth client-credentials token ([`auth::TokenCache`]), builds rate
//! requests ([`rating::RateRequestBuilder`]), sends them with a one-shot time-in-transit
//! fallback ([`rating::RateGateway`]), normalizes the nested responses
//! ([`rating::RateNormalizer`]), and compares prices across package weights
//! ([`sweep::WeightSweepAggregator`]).

#![deny(clippy::all, missing_docs, unused_crate_dependencies)]

pub mod auth;
pub mod clock;
pub mod error;
pub mod http;
pub mod obs;
pub mod persist;
pub mod provider;
pub mod rating;
pub mod scenario;
pub mod sweep;
#[cfg(any(test, feature = "test"))]
pub mod _preludet {
	//! Convenience re-exports and helpers for integration tests; enabled via `cfg(test)` or the
	//! `test` crate feature.

	pub use crate::_prelude::*;

	// self
	use crate::{
		auth::{Credentials, TokenCache},
		clock::Clock,
		http::ReqwestHttpClient,
		provider::ProviderEndpoints,
		rating::RateGateway,
	};

	/// Client identifier used by mock-provider tests.
	pub const TEST_CLIENT_ID: &str = "client-under-test";
	/// Client secret used by mock-provider tests.
	pub const TEST_CLIENT_SECRET: &str = "secret-under-test";

	/// Builds endpoints that point every provider call at `base`.
	pub fn test_endpoints(base: &str) -> ProviderEndpoints {
		let base = Url::parse(base).expect("Failed to parse mock provider base URL.");

		ProviderEndpoints::from_base(&base).expect("Failed to derive mock provider endpoints.")
	}

	/// Credentials shared by integration tests.
	pub fn test_credentials() -> Credentials {
		Credentials::new(TEST_CLIENT_ID, TEST_CLIENT_SECRET)
	}

	/// Builds a reqwest HTTP client that accepts the self-signed certificates produced by
	/// `httpmock` during tests.
	pub fn test_reqwest_http_client() -> ReqwestHttpClient {
		let client = ReqwestClient::builder()
			.danger_accept_invalid_certs(true)
			.danger_accept_invalid_hostnames(true)
			.build()
			.expect("Failed to build insecure Reqwest client for tests.");

		ReqwestHttpClient::with_client(client)
	}

	/// Constructs a [`TokenCache`] against the mock token endpoint, optionally with a custom
	/// clock.
	pub fn build_test_token_cache(endpoints: &ProviderEndpoints, clock: Option<Clock>) -> TokenCache {
		let cache =
			TokenCache::new(test_reqwest_http_client(), endpoints.token.clone(), test_credentials());

		match clock {
			Some(clock) => cache.with_clock(clock),
			None => cache,
		}
	}

	/// Constructs a [`RateGateway`] and its shared [`TokenCache`] against a mock provider.
	pub fn build_test_gateway(base: &str) -> (RateGateway, Arc<TokenCache>) {
		let endpoints = test_endpoints(base);
		let tokens = Arc::new(build_test_token_cache(&endpoints, None));
		let gateway = RateGateway::new(test_reqwest_http_client(), endpoints, tokens.clone());

		(gateway, tokens)
	}
}

mod _prelude {
	pub use std::{
		borrow::Cow,
		collections::{BTreeMap, HashMap},
		error::Error as StdError,
		fmt::{Debug, Display, Formatter, Result as FmtResult},
		future::Future,
		str::FromStr,
		sync::Arc,
	};

	pub use async_lock::Mutex as AsyncMutex;
	pub use parking_lot::{Mutex, RwLock};
	pub use reqwest::{Client as ReqwestClient, Error as ReqwestError};
	pub use rust_decimal::Decimal;
	pub use serde::{Deserialize, Serialize};
	pub use serde_json::Value;
	pub use thiserror::Error as ThisError;
	pub use time::{Date, Duration, OffsetDateTime};
	pub use url::Url;

	pub use crate::error::{Error, Result};
}

pub use reqwest;
pub use url;
#[cfg(test)] use {color_eyre as _, httpmock as _, rate_shopper as _, tokio as _};
