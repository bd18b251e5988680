//! Environment selection and endpoint layout for the UPS APIs.

// self
use crate::{_prelude::*, error::ConfigError};

/// Provider environment selecting the base URL.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Environment {
	/// Customer Integration Environment, isolated from billed operations.
	#[default]
	#[serde(rename = "CIE")]
	Cie,
	/// Live services.
	Production,
}
impl Environment {
	/// Base URL of the CIE test environment.
	pub const CIE_BASE_URL: &'static str = "https://wwwcie.ups.com";
	/// Base URL of the production environment.
	pub const PRODUCTION_BASE_URL: &'static str = "https://onlinetools.ups.com";

	/// Returns the base URL for the environment.
	pub const fn base_url(self) -> &'static str {
		match self {
			Environment::Cie => Self::CIE_BASE_URL,
			Environment::Production => Self::PRODUCTION_BASE_URL,
		}
	}

	/// Returns a stable label used in reports and spans.
	pub const fn as_str(self) -> &'static str {
		match self {
			Environment::Cie => "CIE",
			Environment::Production => "Production",
		}
	}
}
impl Display for Environment {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Provider endpoints addressed by the rating gateway.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Endpoint {
	/// Rate shopping annotated with time-in-transit estimates.
	ShopTimeInTransit,
	/// Rate shopping across every service.
	Shop,
	/// Rating for a single named service.
	Rate,
	/// Address validation and classification.
	AddressValidation,
}
impl Endpoint {
	/// Returns a stable label suitable for logs and error messages.
	pub const fn as_str(self) -> &'static str {
		match self {
			Endpoint::ShopTimeInTransit => "Shoptimeintransit",
			Endpoint::Shop => "Shop",
			Endpoint::Rate => "Rate",
			Endpoint::AddressValidation => "AddressValidation",
		}
	}
}
impl Display for Endpoint {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Fully resolved endpoint set.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ProviderEndpoints {
	/// OAuth client-credentials token endpoint.
	pub token: Url,
	/// Rating endpoint with time-in-transit annotations.
	pub shop_time_in_transit: Url,
	/// Plain rate-shopping endpoint.
	pub shop: Url,
	/// Single-service rating endpoint.
	pub rate: Url,
	/// Address validation endpoint.
	pub address_validation: Url,
}
impl ProviderEndpoints {
	/// Rating API version used unless overridden.
	pub const DEFAULT_RATING_VERSION: &'static str = "v2409";

	/// Resolves the endpoints of a named environment.
	pub fn for_environment(environment: Environment) -> Result<Self, ConfigError> {
		let base = Url::parse(environment.base_url()).map_err(|source| {
			ConfigError::InvalidEndpoint { path: environment.base_url().into(), source }
		})?;

		Self::from_base(&base)
	}

	/// Resolves the endpoints below an arbitrary base URL (mock servers, proxies).
	pub fn from_base(base: &Url) -> Result<Self, ConfigError> {
		Self::builder(base.clone()).build()
	}

	/// Creates a builder rooted at `base`.
	pub fn builder(base: Url) -> ProviderEndpointsBuilder {
		ProviderEndpointsBuilder::new(base)
	}

	/// Returns the URL of a rating or validation endpoint.
	pub fn url(&self, endpoint: Endpoint) -> &Url {
		match endpoint {
			Endpoint::ShopTimeInTransit => &self.shop_time_in_transit,
			Endpoint::Shop => &self.shop,
			Endpoint::Rate => &self.rate,
			Endpoint::AddressValidation => &self.address_validation,
		}
	}
}

/// Builder for [`ProviderEndpoints`].
#[derive(Clone, Debug)]
pub struct ProviderEndpointsBuilder {
	/// Base URL every path is joined onto.
	pub base: Url,
	/// Rating API version segment.
	pub rating_version: String,
}
impl ProviderEndpointsBuilder {
	/// Creates a builder seeded with `base` and the default rating version.
	pub fn new(base: Url) -> Self {
		Self { base, rating_version: ProviderEndpoints::DEFAULT_RATING_VERSION.into() }
	}

	/// Overrides the rating API version segment.
	pub fn rating_version(mut self, version: impl Into<String>) -> Self {
		self.rating_version = version.into();

		self
	}

	/// Consumes the builder and joins every endpoint path.
	pub fn build(self) -> Result<ProviderEndpoints, ConfigError> {
		let mut base = self.base;

		if !base.path().ends_with('/') {
			let path = format!("{}/", base.path());

			base.set_path(&path);
		}

		let version = self.rating_version;

		Ok(ProviderEndpoints {
			token: join(&base, "security/v1/oauth/token")?,
			shop_time_in_transit: join(&base, &format!("api/rating/{version}/Shoptimeintransit"))?,
			shop: join(&base, &format!("api/rating/{version}/Shop"))?,
			rate: join(&base, &format!("api/rating/{version}/Rate"))?,
			address_validation: join(&base, "api/addressvalidation/v1/1")?,
		})
	}
}

fn join(base: &Url, path: &str) -> Result<Url, ConfigError> {
	base.join(path).map_err(|source| ConfigError::InvalidEndpoint { path: path.into(), source })
}
