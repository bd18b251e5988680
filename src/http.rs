//! Transport primitives for token exchanges and rating calls.
//!
//! [`ReqwestHttpClient`] is the engine's only dependency on an HTTP stack. It applies the
//! per-request timeout, the JSON content negotiation headers, and turns every reply into a
//! [`ProviderResponse`] holding the status and body text, so status classification happens in
//! one place (the callers) instead of inside reqwest's error types.

// std
use std::{ops::Deref, time::Duration as StdDuration};
// crates.io
use reqwest::{
	RequestBuilder,
	header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE},
};
// self
use crate::{_prelude::*, error::TransportError};

/// Status code and body captured from a provider reply.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderResponse {
	/// HTTP status code.
	pub status: u16,
	/// Raw body text.
	pub body: String,
}
impl ProviderResponse {
	/// Returns `true` for 2xx statuses.
	pub fn is_success(&self) -> bool {
		(200..300).contains(&self.status)
	}
}

/// Thin wrapper around [`ReqwestClient`] so shared HTTP behavior lives in one place.
///
/// Every call carries [`ReqwestHttpClient::DEFAULT_TIMEOUT`] unless overridden. A timeout
/// surfaces as [`TransportError::Timeout`], which callers treat like any other network failure.
#[derive(Clone, Debug)]
pub struct ReqwestHttpClient {
	client: ReqwestClient,
	timeout: StdDuration,
}
impl ReqwestHttpClient {
	/// Per-request timeout applied when none is configured.
	pub const DEFAULT_TIMEOUT: StdDuration = StdDuration::from_secs(30);

	/// Wraps an existing reqwest [`ReqwestClient`].
	pub fn with_client(client: ReqwestClient) -> Self {
		Self { client, timeout: Self::DEFAULT_TIMEOUT }
	}

	/// Overrides the per-request timeout.
	pub fn with_timeout(mut self, timeout: StdDuration) -> Self {
		self.timeout = timeout;

		self
	}

	/// Returns the per-request timeout.
	pub fn timeout(&self) -> StdDuration {
		self.timeout
	}

	/// POSTs a form body authenticated with a pre-built `Authorization` header value.
	pub async fn post_form(
		&self,
		url: &Url,
		authorization: &str,
		form: &[(&str, &str)],
	) -> Result<ProviderResponse, TransportError> {
		let request = self
			.client
			.post(url.clone())
			.header(AUTHORIZATION, authorization)
			.header(ACCEPT, "application/json")
			.form(form);

		self.send(request).await
	}

	/// POSTs a JSON body authenticated with a bearer token.
	pub async fn post_json<T>(
		&self,
		url: &Url,
		bearer: &str,
		body: &T,
	) -> Result<ProviderResponse, TransportError>
	where
		T: ?Sized + Serialize,
	{
		let request = self
			.client
			.post(url.clone())
			.bearer_auth(bearer)
			.header(CONTENT_TYPE, "application/json")
			.header(ACCEPT, "application/json")
			.json(body);

		self.send(request).await
	}

	async fn send(&self, request: RequestBuilder) -> Result<ProviderResponse, TransportError> {
		let response = request.timeout(self.timeout).send().await?;
		let status = response.status().as_u16();
		let body = response.text().await?;

		Ok(ProviderResponse { status, body })
	}
}
impl Default for ReqwestHttpClient {
	fn default() -> Self {
		Self::with_client(ReqwestClient::default())
	}
}
impl AsRef<ReqwestClient> for ReqwestHttpClient {
	fn as_ref(&self) -> &ReqwestClient {
		&self.client
	}
}
impl Deref for ReqwestHttpClient {
	type Target = ReqwestClient;

	fn deref(&self) -> &Self::Target {
		&self.client
	}
}
