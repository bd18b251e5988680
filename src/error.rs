//! Engine-level error types shared across authentication, rating, sweeps, and persistence.

// self
use crate::{
	_prelude::*,
	provider::{Endpoint, ProviderFault},
};

/// Engine-wide result type alias returning [`Error`] by default.
pub type Result<T, E = Error> = std::result::Result<T, E>;

type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Canonical engine error exposed by public APIs.
#[derive(Debug, ThisError)]
pub enum Error {
	/// Local configuration problem.
	#[error(transparent)]
	Config(#[from] ConfigError),
	/// The token exchange failed; no provider call can proceed.
	#[error(transparent)]
	Auth(#[from] AuthError),
	/// A rating or address-validation call failed after its fallback, if any.
	#[error(transparent)]
	RateRequest(#[from] RateRequestError),
	/// The provider answered without any rated shipment.
	#[error(transparent)]
	EmptyResult(#[from] EmptyResultError),
	/// An address string could not be parsed.
	#[error(transparent)]
	AddressFormat(#[from] AddressFormatError),
	/// Report persistence failed.
	#[error("{0}")]
	Persist(
		#[from]
		#[source]
		crate::persist::PersistError,
	),
}
impl Error {
	/// Returns `true` when the failure came from the token endpoint.
	pub fn is_auth(&self) -> bool {
		matches!(self, Self::Auth(_))
	}
}

/// Configuration and validation failures raised before any provider call.
#[derive(Debug, ThisError)]
pub enum ConfigError {
	/// HTTP client could not be constructed.
	#[error("HTTP client could not be constructed.")]
	HttpClientBuild {
		/// Underlying transport builder failure.
		#[source]
		source: BoxError,
	},
	/// A provider endpoint could not be derived from the base URL.
	#[error("Provider endpoint `{path}` is invalid.")]
	InvalidEndpoint {
		/// Relative path that failed to join.
		path: String,
		/// Underlying parsing failure.
		#[source]
		source: url::ParseError,
	},
	/// A required credential variable is unset or blank.
	#[error("Environment variable {name} is required.")]
	MissingCredential {
		/// Variable name.
		name: &'static str,
	},
	/// Rate requests need at least one package.
	#[error("Rate request must contain at least one package.")]
	NoPackages,
	/// Weight sweeps need a strictly positive, finite step.
	#[error("Weight step must be positive and finite, got {step}.")]
	InvalidWeightStep {
		/// Rejected step value.
		step: f64,
	},
	/// The weight range would produce more samples than a sweep allows.
	#[error("Weight sweep would produce more than {limit} samples.")]
	TooManyWeights {
		/// Maximum number of samples per sweep.
		limit: usize,
	},
}
impl ConfigError {
	/// Wraps a transport's builder failure inside [`ConfigError`].
	pub fn http_client_build(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::HttpClientBuild { source: Box::new(src) }
	}
}
impl From<ReqwestError> for ConfigError {
	fn from(e: ReqwestError) -> Self {
		Self::http_client_build(e)
	}
}

/// Failures raised by the OAuth client-credentials exchange.
#[derive(Debug, ThisError)]
pub enum AuthError {
	/// Provider answered the exchange with a non-success status.
	#[error("Token endpoint rejected the credentials with status {status}: {reason}.")]
	Rejected {
		/// HTTP status code.
		status: u16,
		/// Provider fault message or body preview.
		reason: String,
	},
	/// Network failure (DNS, TCP, TLS, timeout) while calling the token endpoint.
	#[error("Network error occurred while calling the token endpoint.")]
	Transport(#[source] TransportError),
	/// Token endpoint responded with malformed JSON that could not be parsed.
	#[error("Token endpoint returned malformed JSON.")]
	TokenResponseParse {
		/// Structured parsing failure.
		#[source]
		source: serde_path_to_error::Error<serde_json::Error>,
		/// HTTP status code.
		status: u16,
	},
	/// Token lifetime cannot be represented as an expiry instant.
	#[error("Token endpoint returned an out-of-range lifetime of {expires_in} seconds.")]
	ExpiresInOutOfRange {
		/// Lifetime reported by the provider.
		expires_in: i64,
	},
}

/// Failures raised by rating and address-validation calls.
#[derive(Debug, ThisError)]
pub enum RateRequestError {
	/// Endpoint answered with a non-success status.
	#[error("{endpoint} request failed with status {status}{}", describe_faults(.faults))]
	Status {
		/// Endpoint that produced the failure.
		endpoint: Endpoint,
		/// HTTP status code.
		status: u16,
		/// Structured faults reported in the body.
		faults: Vec<ProviderFault>,
		/// Truncated response body.
		body_preview: Option<String>,
	},
	/// Network failure (DNS, TCP, TLS, timeout) while calling the endpoint.
	#[error("Network error occurred while calling the {endpoint} endpoint.")]
	Transport {
		/// Endpoint that produced the failure.
		endpoint: Endpoint,
		/// Underlying transport failure.
		#[source]
		source: TransportError,
	},
	/// Endpoint answered successfully but the body was not JSON.
	#[error("{endpoint} endpoint returned malformed JSON.")]
	ResponseParse {
		/// Endpoint that produced the failure.
		endpoint: Endpoint,
		/// Underlying parsing failure.
		#[source]
		source: serde_json::Error,
	},
}
impl RateRequestError {
	/// Endpoint associated with the failure.
	pub fn endpoint(&self) -> Endpoint {
		match self {
			Self::Status { endpoint, .. }
			| Self::Transport { endpoint, .. }
			| Self::ResponseParse { endpoint, .. } => *endpoint,
		}
	}

	/// HTTP status code, when the provider answered at all.
	pub fn status(&self) -> Option<u16> {
		match self {
			Self::Status { status, .. } => Some(*status),
			_ => None,
		}
	}
}

/// The provider reported zero rated options for the shipment.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
#[error("No shipping options available.")]
pub struct EmptyResultError;

/// Errors produced while parsing `"Street, City, ST 12345"` address strings.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum AddressFormatError {
	/// Fewer than three comma-separated components.
	#[error("Address `{input}` must include at least street, city, and state/zip.")]
	MissingComponents {
		/// Rejected input.
		input: String,
	},
	/// Last component did not contain both a region code and a postal code.
	#[error("Could not parse state and postal code from `{input}`.")]
	MissingRegionOrPostal {
		/// Rejected input.
		input: String,
	},
}

/// Transport-level failures (network, IO).
#[derive(Debug, ThisError)]
pub enum TransportError {
	/// Underlying HTTP client reported a network failure.
	#[error("Network error: {source}")]
	Network {
		/// Transport-specific network error.
		#[source]
		source: BoxError,
	},
	/// The request exceeded the configured timeout.
	#[error("Request timed out.")]
	Timeout {
		/// Transport-specific timeout error.
		#[source]
		source: BoxError,
	},
}
impl TransportError {
	/// Wraps a transport-specific network error.
	pub fn network(src: impl 'static + Send + Sync + std::error::Error) -> Self {
		Self::Network { source: Box::new(src) }
	}
}
impl From<ReqwestError> for TransportError {
	fn from(e: ReqwestError) -> Self {
		if e.is_timeout() { Self::Timeout { source: Box::new(e) } } else { Self::network(e) }
	}
}

fn describe_faults(faults: &[ProviderFault]) -> String {
	if faults.is_empty() {
		return String::new();
	}

	let joined = faults.iter().map(ToString::to_string).collect::<Vec<_>>().join("; ");

	format!(": {joined}")
}
