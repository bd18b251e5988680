//! Expiry-aware access token cache with a singleflight refresh guard.
//!
//! [`TokenCache::get_token`] hands out the cached token while the injected clock reads
//! strictly before its expiry. Otherwise it performs exactly one client-credentials exchange,
//! even when many callers arrive at once: the refresh runs under an async mutex and re-checks
//! the cache after acquiring it, so late arrivals reuse the token fetched by the first caller.
//! The cache is written only after a complete, successful exchange, so a failed or dropped
//! exchange leaves the previous state untouched.

// std
use std::sync::atomic::{AtomicU64, Ordering};
// self
use crate::{
	_prelude::*,
	auth::{AccessToken, Credentials, TokenResponse},
	clock::{self, Clock},
	error::AuthError,
	http::ReqwestHttpClient,
	obs::{self, OperationKind, OperationOutcome, OperationSpan},
	provider::fault,
};

/// Thread-safe counters for token exchanges.
#[derive(Debug, Default)]
pub struct ExchangeCounters {
	exchanges: AtomicU64,
	failures: AtomicU64,
}
impl ExchangeCounters {
	/// Returns the number of exchanges sent to the token endpoint.
	pub fn exchanges(&self) -> u64 {
		self.exchanges.load(Ordering::Relaxed)
	}

	/// Returns the number of exchanges that failed.
	pub fn failures(&self) -> u64 {
		self.failures.load(Ordering::Relaxed)
	}

	fn record_exchange(&self) {
		self.exchanges.fetch_add(1, Ordering::Relaxed);
	}

	fn record_failure(&self) {
		self.failures.fetch_add(1, Ordering::Relaxed);
	}
}

/// Sole owner of the current [`AccessToken`].
pub struct TokenCache {
	http: ReqwestHttpClient,
	token_url: Url,
	credentials: Credentials,
	clock: Clock,
	current: RwLock<Option<AccessToken>>,
	refresh_guard: AsyncMutex<()>,
	counters: ExchangeCounters,
}
impl TokenCache {
	/// Creates an empty cache exchanging `credentials` at `token_url`.
	pub fn new(http: ReqwestHttpClient, token_url: Url, credentials: Credentials) -> Self {
		Self {
			http,
			token_url,
			credentials,
			clock: clock::system_clock(),
			current: RwLock::new(None),
			refresh_guard: AsyncMutex::new(()),
			counters: ExchangeCounters::default(),
		}
	}

	/// Replaces the time source used for expiry checks.
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;

		self
	}

	/// Returns a valid token, exchanging credentials only when none is cached or it expired.
	pub async fn get_token(&self) -> Result<AccessToken, AuthError> {
		const KIND: OperationKind = OperationKind::Auth;

		if let Some(token) = self.cached_at((self.clock)()) {
			return Ok(token);
		}

		let span = OperationSpan::new(KIND, "get_token");

		span.instrument(async {
			let _singleflight = self.refresh_guard.lock().await;

			if let Some(token) = self.cached_at((self.clock)()) {
				return Ok(token);
			}

			obs::record_operation_outcome(KIND, OperationOutcome::Attempt);

			let result = self.exchange().await;

			obs::record_operation_outcome(KIND, OperationOutcome::of(&result));

			match result {
				Ok(token) => {
					*self.current.write() = Some(token.clone());

					Ok(token)
				},
				Err(e) => {
					self.counters.record_failure();

					Err(e)
				},
			}
		})
		.await
	}

	/// Discards the cached token so the next call performs a fresh exchange.
	pub fn invalidate(&self) {
		if self.current.write().take().is_some() {
			tracing::debug!("Discarded cached access token.");
		}
	}

	/// Returns the cached token without contacting the provider, if still valid.
	pub fn peek(&self) -> Option<AccessToken> {
		self.cached_at((self.clock)())
	}

	/// Returns the number of exchanges sent to the token endpoint.
	pub fn exchanges(&self) -> u64 {
		self.counters.exchanges()
	}

	/// Returns the number of failed exchanges.
	pub fn failures(&self) -> u64 {
		self.counters.failures()
	}

	fn cached_at(&self, now: OffsetDateTime) -> Option<AccessToken> {
		self.current.read().as_ref().filter(|token| token.is_valid_at(now)).cloned()
	}

	async fn exchange(&self) -> Result<AccessToken, AuthError> {
		self.counters.record_exchange();

		tracing::info!(
			token_url = %self.token_url,
			client_id = self.credentials.client_id(),
			"Requesting access token."
		);

		let response = self
			.http
			.post_form(
				&self.token_url,
				&self.credentials.basic_authorization(),
				&[("grant_type", "client_credentials")],
			)
			.await
			.map_err(AuthError::Transport)?;

		if !response.is_success() {
			let reason = fault::summarize(&response.body);

			tracing::error!(status = response.status, %reason, "Token endpoint rejected credentials.");

			return Err(AuthError::Rejected { status: response.status, reason });
		}

		let mut deserializer = serde_json::Deserializer::from_str(&response.body);
		let payload: TokenResponse = serde_path_to_error::deserialize(&mut deserializer)
			.map_err(|source| AuthError::TokenResponseParse { source, status: response.status })?;
		let token = payload.into_access_token((self.clock)()).inspect_err(|e| {
			tracing::error!(error = %e, "Token endpoint returned an unusable lifetime.");
		})?;

		tracing::info!(expires_at = %token.expires_at, "Access token obtained.");

		Ok(token)
	}
}
impl Debug for TokenCache {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.debug_struct("TokenCache")
			.field("token_url", &self.token_url.as_str())
			.field("credentials", &self.credentials)
			.field("cached", &self.current.read().is_some())
			.field("exchanges", &self.exchanges())
			.finish()
	}
}
