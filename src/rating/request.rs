//! Rate request construction and the provider wire format.
//!
//! [`RateRequestBuilder`] is pure apart from the injected clock: the same route, packages, and
//! instant always produce the same request. The wire envelope is produced by serializing
//! [`RateRequest`] directly, so the gateway never manipulates JSON by hand.

// crates.io
use time::{Weekday, format_description::well_known::Rfc3339};
// self
use crate::{
	_prelude::*,
	clock::{self, Clock},
	error::ConfigError,
	provider::Endpoint,
	rating::{Address, PackageSpec},
	scenario::Route,
};

/// Name sent for the shipper and ship-from parties.
pub const SHIPPER_NAME: &str = "Test Shipper";
/// Name sent for the recipient party.
pub const RECIPIENT_NAME: &str = "Test Recipient";

/// Request mode selecting one service or every available service.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RequestOption {
	/// Price a single named service.
	Rate,
	/// Price every available service.
	Shop,
}
impl RequestOption {
	/// Wire label.
	pub const fn as_str(self) -> &'static str {
		match self {
			RequestOption::Rate => "Rate",
			RequestOption::Shop => "Shop",
		}
	}
}
impl Display for RequestOption {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Ephemeral rate request; serializes to the `{"RateRequest": ...}` envelope.
#[derive(Clone, Debug, PartialEq)]
pub struct RateRequest {
	/// Request mode.
	pub option: RequestOption,
	/// Shipper and ship-from address.
	pub shipper: Address,
	/// Recipient address.
	pub recipient: Address,
	/// Packages in the shipment; never empty.
	pub packages: Vec<PackageSpec>,
	/// Pickup date asking the provider for delivery-time estimates (Shop mode only).
	pub pickup_date: Option<Date>,
	/// Free-text transaction reference.
	pub customer_context: String,
}
impl RateRequest {
	/// Returns `true` when the request asks for delivery-time estimates.
	pub fn has_delivery_time(&self) -> bool {
		self.pickup_date.is_some()
	}

	/// Returns a copy with the delivery-time estimate removed.
	pub fn without_delivery_time(&self) -> Self {
		Self { pickup_date: None, ..self.clone() }
	}

	/// Endpoint tried first for this request.
	pub fn primary_endpoint(&self) -> Endpoint {
		match (self.has_delivery_time(), self.option) {
			(true, _) => Endpoint::ShopTimeInTransit,
			(false, RequestOption::Shop) => Endpoint::Shop,
			(false, RequestOption::Rate) => Endpoint::Rate,
		}
	}

	/// Pickup date formatted `YYYYMMDD`.
	pub fn pickup_date_label(&self) -> Option<String> {
		self.pickup_date.map(compact_date)
	}
}
impl Serialize for RateRequest {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		let shipper = WireAddress::from(&self.shipper);
		let envelope = WireEnvelope {
			rate_request: WireRateRequest {
				request: WireRequest {
					request_option: self.option.as_str(),
					transaction_reference: WireTransactionReference {
						customer_context: &self.customer_context,
					},
				},
				shipment: WireShipment {
					shipper: WireParty { name: SHIPPER_NAME, address: shipper.clone() },
					ship_to: WireParty {
						name: RECIPIENT_NAME,
						address: WireAddress::from(&self.recipient),
					},
					ship_from: WireParty { name: SHIPPER_NAME, address: shipper },
					package: self.packages.iter().map(WirePackage::from).collect(),
					delivery_time_information: self
						.pickup_date_label()
						.map(|pickup_date| WireDeliveryTime { pickup_date }),
				},
			},
		};

		envelope.serialize(serializer)
	}
}

/// Builds [`RateRequest`]s against an injectable clock.
#[derive(Clone)]
pub struct RateRequestBuilder {
	clock: Clock,
}
impl RateRequestBuilder {
	/// Creates a builder reading the system clock.
	pub fn new() -> Self {
		Self { clock: clock::system_clock() }
	}

	/// Replaces the time source.
	pub fn with_clock(mut self, clock: Clock) -> Self {
		self.clock = clock;

		self
	}

	/// Builds a request for `route`; `shop_all` selects Shop mode with a pickup date.
	pub fn build(
		&self,
		route: &Route,
		packages: &[PackageSpec],
		shop_all: bool,
	) -> Result<RateRequest, ConfigError> {
		if packages.is_empty() {
			return Err(ConfigError::NoPackages);
		}

		let now = (self.clock)();
		let option = if shop_all { RequestOption::Shop } else { RequestOption::Rate };
		let timestamp = now.format(&Rfc3339).unwrap_or_else(|_| now.unix_timestamp().to_string());

		Ok(RateRequest {
			option,
			shipper: route.origin.clone(),
			recipient: route.destination.clone(),
			packages: packages.to_vec(),
			pickup_date: shop_all.then(|| pickup_date(now)),
			customer_context: format!("Rate Request {timestamp}"),
		})
	}
}
impl Default for RateRequestBuilder {
	fn default() -> Self {
		Self::new()
	}
}
impl Debug for RateRequestBuilder {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str("RateRequestBuilder(..)")
	}
}

/// Next business day after `now`: tomorrow, skipping Saturday and Sunday.
pub fn pickup_date(now: OffsetDateTime) -> Date {
	let mut date = now.date().saturating_add(Duration::DAY);

	while matches!(date.weekday(), Weekday::Saturday | Weekday::Sunday) {
		date = date.saturating_add(Duration::DAY);
	}

	date
}

/// Formats a measurement the way the provider expects (`5.0`, `12.5`).
pub fn format_measurement(value: f64) -> String {
	if value.is_finite() && value.fract() == 0.0 { format!("{value:.1}") } else { value.to_string() }
}

fn compact_date(date: Date) -> String {
	format!("{:04}{:02}{:02}", date.year(), u8::from(date.month()), date.day())
}

#[derive(Serialize)]
struct WireEnvelope<'a> {
	#[serde(rename = "RateRequest")]
	rate_request: WireRateRequest<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireRateRequest<'a> {
	request: WireRequest<'a>,
	shipment: WireShipment<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireRequest<'a> {
	request_option: &'a str,
	transaction_reference: WireTransactionReference<'a>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireTransactionReference<'a> {
	customer_context: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireShipment<'a> {
	shipper: WireParty<'a>,
	ship_to: WireParty<'a>,
	ship_from: WireParty<'a>,
	package: Vec<WirePackage<'a>>,
	#[serde(skip_serializing_if = "Option::is_none")]
	delivery_time_information: Option<WireDeliveryTime>,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireParty<'a> {
	name: &'a str,
	address: WireAddress<'a>,
}

#[derive(Clone, Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireAddress<'a> {
	address_line: &'a [String],
	city: &'a str,
	state_province_code: &'a str,
	postal_code: &'a str,
	country_code: &'a str,
}
impl<'a> From<&'a Address> for WireAddress<'a> {
	fn from(address: &'a Address) -> Self {
		let lines = address.address_lines.len().min(Address::MAX_LINES);

		Self {
			address_line: &address.address_lines[..lines],
			city: &address.city,
			state_province_code: &address.state_province_code,
			postal_code: &address.postal_code,
			country_code: &address.country_code,
		}
	}
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WirePackage<'a> {
	packaging_type: WireCode<'a>,
	dimensions: WireDimensions<'a>,
	package_weight: WireWeight<'a>,
}
impl<'a> From<&'a PackageSpec> for WirePackage<'a> {
	fn from(package: &'a PackageSpec) -> Self {
		Self {
			packaging_type: WireCode { code: &package.packaging_type },
			dimensions: WireDimensions {
				unit_of_measurement: WireCode { code: package.dimension_unit.as_str() },
				length: format_measurement(package.dimensions.length),
				width: format_measurement(package.dimensions.width),
				height: format_measurement(package.dimensions.height),
			},
			package_weight: WireWeight {
				unit_of_measurement: WireCode { code: package.weight_unit.as_str() },
				weight: format_measurement(package.weight),
			},
		}
	}
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireCode<'a> {
	code: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireDimensions<'a> {
	unit_of_measurement: WireCode<'a>,
	length: String,
	width: String,
	height: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireWeight<'a> {
	unit_of_measurement: WireCode<'a>,
	weight: String,
}

#[derive(Serialize)]
#[serde(rename_all = "PascalCase")]
struct WireDeliveryTime {
	pickup_date: String,
}
