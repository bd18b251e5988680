//! Normalization of raw rating responses into per-service records.
//!
//! Provider payloads stay `serde_json::Value` trees at the boundary; the functions here are a
//! total mapping from those trees to [`ServiceRateRecord`]s. Missing keys, the literal `"N/A"`,
//! and empty strings are treated alike as absent, and scalars may arrive as strings or numbers.

// self
use crate::{_prelude::*, error::EmptyResultError, rating::Service};

/// Currency assumed when the provider omits one.
pub const DEFAULT_CURRENCY: &str = "USD";
/// Placeholder for missing delivery information.
pub const NOT_AVAILABLE: &str = "N/A";

/// Normalized rate for one service.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceRateRecord {
	/// Service the rate applies to.
	pub service: Service,
	/// Display name of the service.
	pub service_name: String,
	/// Total charge; `None` when absent or unparseable.
	pub price: Option<Decimal>,
	/// Currency code of [`ServiceRateRecord::price`].
	pub currency: String,
	/// Estimated delivery description.
	pub delivery: String,
}
impl ServiceRateRecord {
	/// Provider service code.
	pub fn code(&self) -> &str {
		self.service.code()
	}

	/// `"USD 12.34"`, or `"USD N/A"` without a price.
	pub fn price_formatted(&self) -> String {
		match self.price {
			Some(price) => format!("{} {price}", self.currency),
			None => format!("{} {NOT_AVAILABLE}", self.currency),
		}
	}
}

/// Maps raw rating responses onto [`ServiceRateRecord`]s.
#[derive(Clone, Copy, Debug, Default)]
pub struct RateNormalizer;
impl RateNormalizer {
	/// Parses every rated shipment, keyed by service code.
	///
	/// `RateResponse.RatedShipment` may be a single object or an array. Later entries for an
	/// already seen code replace earlier ones.
	pub fn parse(raw: &Value) -> Result<BTreeMap<String, ServiceRateRecord>, EmptyResultError> {
		let shipments = match raw.pointer("/RateResponse/RatedShipment") {
			Some(Value::Array(items)) => items.iter().collect::<Vec<_>>(),
			Some(item @ Value::Object(_)) => vec![item],
			_ => Vec::new(),
		};
		let records = shipments
			.into_iter()
			.filter(|shipment| shipment.is_object())
			.map(|shipment| {
				let record = Self::parse_shipment(shipment);

				(record.code().to_owned(), record)
			})
			.collect::<BTreeMap<_, _>>();

		if records.is_empty() {
			return Err(EmptyResultError);
		}

		Ok(records)
	}

	/// Normalizes one `RatedShipment` entry.
	pub fn parse_shipment(shipment: &Value) -> ServiceRateRecord {
		let code = text_at(shipment, "/Service/Code").unwrap_or_else(|| Service::UNKNOWN_CODE.into());
		let service = Service::from_code(&code);
		let currency =
			text_at(shipment, "/TotalCharges/CurrencyCode").unwrap_or_else(|| DEFAULT_CURRENCY.into());
		let price = text_at(shipment, "/TotalCharges/MonetaryValue")
			.and_then(|amount| Decimal::from_str(&amount).ok());

		ServiceRateRecord {
			service_name: service.name().into_owned(),
			service,
			price,
			currency,
			delivery: delivery_description(shipment),
		}
	}
}

/// Builds the delivery description of one rated shipment.
///
/// Precedence: guaranteed date (with `by {time}` when known), else the time-in-transit
/// arrival under the same rule, then a business-days suffix from the guaranteed delivery or
/// the estimated arrival. Nothing known yields `"N/A"`.
pub fn delivery_description(shipment: &Value) -> String {
	let guaranteed_date = text_at(shipment, "/GuaranteedDelivery/DeliveryDate");
	let guaranteed_time = text_at(shipment, "/GuaranteedDelivery/DeliveryByTime");
	let arrival = "/TimeInTransit/ServiceSummary/EstimatedArrival";
	let arrival_date = text_at(shipment, &format!("{arrival}/Arrival/Date"));
	let arrival_time = text_at(shipment, &format!("{arrival}/Arrival/Time"));
	let business_days = text_at(shipment, "/GuaranteedDelivery/BusinessDaysInTransit")
		.or_else(|| text_at(shipment, &format!("{arrival}/BusinessDaysInTransit")));
	let mut parts = Vec::new();

	match (guaranteed_date, arrival_date) {
		(Some(date), _) => parts.push(date_by_time(date, guaranteed_time)),
		(None, Some(date)) => parts.push(date_by_time(date, arrival_time)),
		(None, None) => (),
	}

	if let Some(days) = business_days {
		if days == "1" {
			parts.push("(1 business day)".into());
		} else {
			parts.push(format!("({days} business days)"));
		}
	}

	if parts.is_empty() { NOT_AVAILABLE.into() } else { parts.join(" ") }
}

fn date_by_time(date: String, time: Option<String>) -> String {
	match time {
		Some(time) => format!("{date} by {time}"),
		None => date,
	}
}

/// Reads a scalar at `pointer`; `"N/A"`, blanks, and non-scalars count as absent.
fn text_at(value: &Value, pointer: &str) -> Option<String> {
	match value.pointer(pointer)? {
		Value::String(text) => {
			let text = text.trim();

			(!text.is_empty() && text != NOT_AVAILABLE).then(|| text.to_owned())
		},
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	}
}
