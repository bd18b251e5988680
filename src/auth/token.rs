//! Access token value and the token endpoint's response shape.

// crates.io
use serde::{Deserializer, de::Error as _};
// self
use crate::{_prelude::*, auth::Secret, error::AuthError};

/// Bearer token paired with the instant after which it must not be handed out.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AccessToken {
	/// Redacted token value.
	pub secret: Secret,
	/// Absolute expiry, already reduced by [`AccessToken::EXPIRY_MARGIN`].
	pub expires_at: OffsetDateTime,
}
impl AccessToken {
	/// Safety margin subtracted from the provider-reported lifetime.
	pub const EXPIRY_MARGIN: Duration = Duration::seconds(60);

	/// Creates a token expiring at `now + max(lifetime - margin, 0)`.
	///
	/// Returns `None` when the expiry falls outside the representable date range.
	pub fn from_lifetime(
		secret: impl Into<Secret>,
		now: OffsetDateTime,
		lifetime: Duration,
	) -> Option<Self> {
		let remaining = lifetime.checked_sub(Self::EXPIRY_MARGIN)?.max(Duration::ZERO);

		Some(Self { secret: secret.into(), expires_at: now.checked_add(remaining)? })
	}

	/// Returns `true` while `now` is strictly before the expiry.
	pub fn is_valid_at(&self, now: OffsetDateTime) -> bool {
		now < self.expires_at
	}

	/// Returns the bearer value. Callers must avoid logging this string.
	pub fn expose(&self) -> &str {
		self.secret.expose()
	}
}

/// Successful token endpoint payload.
#[derive(Clone, Debug, Deserialize)]
pub struct TokenResponse {
	/// Issued bearer token.
	pub access_token: String,
	/// Lifetime in seconds; UPS sends it as a numeric string.
	#[serde(default = "TokenResponse::default_lifetime", deserialize_with = "lifetime_seconds")]
	pub expires_in: i64,
}
impl TokenResponse {
	/// Lifetime assumed when the provider omits `expires_in`.
	pub const DEFAULT_LIFETIME_SECS: i64 = 3_600;

	fn default_lifetime() -> i64 {
		Self::DEFAULT_LIFETIME_SECS
	}

	/// Converts the payload into a cached token anchored at `now`.
	pub fn into_access_token(self, now: OffsetDateTime) -> Result<AccessToken, AuthError> {
		let expires_in = self.expires_in;

		AccessToken::from_lifetime(self.access_token, now, Duration::seconds(expires_in))
			.ok_or(AuthError::ExpiresInOutOfRange { expires_in })
	}
}

#[derive(Deserialize)]
#[serde(untagged)]
enum Lifetime {
	Seconds(i64),
	Fractional(f64),
	Text(String),
}

fn lifetime_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
	D: Deserializer<'de>,
{
	match Lifetime::deserialize(deserializer)? {
		Lifetime::Seconds(secs) => Ok(secs),
		Lifetime::Fractional(secs) if secs.is_finite() => Ok(secs as i64),
		Lifetime::Fractional(secs) =>
			Err(D::Error::custom(format!("expires_in `{secs}` is not a finite number"))),
		Lifetime::Text(text) => text
			.trim()
			.parse::<i64>()
			.map_err(|_| D::Error::custom(format!("expires_in `{text}` is not a whole number"))),
	}
}
