//! Authenticated rating and address-validation calls with the time-in-transit fallback.
//!
//! [`RateGateway::shop`] asks the time-in-transit endpoint first whenever the request carries a
//! pickup date. Any failure there (network, timeout, non-success status, unparseable body)
//! strips the delivery-time block and retries exactly once against the plain Shop endpoint.
//! A second failure is returned as-is; there is never a third attempt. Token failures are
//! returned before any rating call and never trigger the fallback.

// self
use crate::{
	_prelude::*,
	auth::TokenCache,
	error::RateRequestError,
	http::ReqwestHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::{Endpoint, ProviderEndpoints, fault},
	rating::{
		Address, AddressValidation, AddressValidationRequest, PackageSpec, RateNormalizer,
		RateRequest, RateRequestBuilder, ServiceRateRecord,
	},
	scenario::Route,
};

/// Result of [`RateGateway::quote`].
#[derive(Clone, Debug)]
pub struct Quote {
	/// Request as built, before any fallback stripping.
	pub request: RateRequest,
	/// Raw provider response.
	pub raw: Value,
	/// Normalized rates keyed by service code.
	pub rates: BTreeMap<String, ServiceRateRecord>,
}

/// Issues provider calls with tokens from a shared [`TokenCache`].
#[derive(Clone, Debug)]
pub struct RateGateway {
	http: ReqwestHttpClient,
	endpoints: ProviderEndpoints,
	tokens: Arc<TokenCache>,
	builder: RateRequestBuilder,
}
impl RateGateway {
	/// Creates a gateway sharing `tokens` with other callers.
	pub fn new(http: ReqwestHttpClient, endpoints: ProviderEndpoints, tokens: Arc<TokenCache>) -> Self {
		Self { http, endpoints, tokens, builder: RateRequestBuilder::default() }
	}

	/// Resolved provider endpoints.
	pub fn endpoints(&self) -> &ProviderEndpoints {
		&self.endpoints
	}

	/// Shared token cache.
	pub fn tokens(&self) -> &Arc<TokenCache> {
		&self.tokens
	}

	/// Request builder used by [`RateGateway::quote`].
	pub fn request_builder(&self) -> &RateRequestBuilder {
		&self.builder
	}

	/// Sends `request`, degrading once from time-in-transit to plain Shop on failure.
	pub async fn shop(&self, request: &RateRequest) -> Result<Value> {
		const KIND: OperationKind = OperationKind::Rate;

		let span = OperationSpan::new(KIND, "shop");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result: Result<Value> = span
			.instrument(async {
				let token = self.tokens.get_token().await?;
				let primary = request.primary_endpoint();

				match self.post(primary, token.expose(), request).await {
					Ok(raw) => Ok(raw),
					Err(e) if primary == Endpoint::ShopTimeInTransit => {
						tracing::warn!(
							error = %e,
							"Time-in-transit request failed, falling back to standard rating."
						);

						let fallback = request.without_delivery_time();
						// A 401 above dropped the cached token.
						let token = self.tokens.get_token().await?;

						Ok(self.post(Endpoint::Shop, token.expose(), &fallback).await?)
					},
					Err(e) => Err(e.into()),
				}
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	/// Validates one address against the provider.
	pub async fn validate_address(&self, address: &Address) -> Result<AddressValidation> {
		const KIND: OperationKind = OperationKind::AddressValidation;

		let span = OperationSpan::new(KIND, "validate_address");

		obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

		let result: Result<AddressValidation> = span
			.instrument(async {
				tracing::info!(
					city = %address.city,
					state = %address.state_province_code,
					"Validating address."
				);

				let token = self.tokens.get_token().await?;
				let raw = self
					.post(
						Endpoint::AddressValidation,
						token.expose(),
						&AddressValidationRequest::new(address),
					)
					.await?;

				Ok(AddressValidation::from_response(raw))
			})
			.await;

		obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

		result
	}

	/// Builds, sends, and normalizes a request for `route` in one call.
	pub async fn quote(
		&self,
		route: &Route,
		packages: &[PackageSpec],
		shop_all: bool,
	) -> Result<Quote> {
		let request = self.builder.build(route, packages, shop_all)?;
		let raw = self.shop(&request).await?;
		let rates = RateNormalizer::parse(&raw)?;

		Ok(Quote { request, raw, rates })
	}

	async fn post<T>(
		&self,
		endpoint: Endpoint,
		bearer: &str,
		body: &T,
	) -> Result<Value, RateRequestError>
	where
		T: ?Sized + Serialize,
	{
		let url = self.endpoints.url(endpoint);
		let response = self
			.http
			.post_json(url, bearer, body)
			.await
			.map_err(|source| RateRequestError::Transport { endpoint, source })?;

		if !response.is_success() {
			if response.status == 401 {
				self.tokens.invalidate();
			}

			tracing::error!(
				%endpoint,
				status = response.status,
				reason = %fault::summarize(&response.body),
				"Provider request failed."
			);

			return Err(RateRequestError::Status {
				endpoint,
				status: response.status,
				faults: fault::extract_faults(&response.body),
				body_preview: fault::body_preview(&response.body),
			});
		}

		let raw = serde_json::from_str(&response.body)
			.map_err(|source| RateRequestError::ResponseParse { endpoint, source })?;

		tracing::info!(%endpoint, "Provider request succeeded.");

		Ok(raw)
	}
}
