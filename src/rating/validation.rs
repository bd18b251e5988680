//! Address validation request envelope and verdict.

// self
use crate::{_prelude::*, rating::Address};

/// Request option asking for validation plus classification.
pub const VALIDATION_REQUEST_OPTION: &str = "3";

/// `{"AddressValidationRequest": ...}` envelope for one address.
#[derive(Debug, Serialize)]
pub struct AddressValidationRequest<'a> {
	#[serde(rename = "AddressValidationRequest")]
	body: ValidationBody<'a>,
}
impl<'a> AddressValidationRequest<'a> {
	/// Wraps `address` in the provider envelope.
	pub fn new(address: &'a Address) -> Self {
		Self {
			body: ValidationBody {
				request: ValidationOption { request_option: VALIDATION_REQUEST_OPTION },
				address_key_format: AddressKeyFormat {
					address_line: &address.address_lines,
					political_division2: &address.city,
					political_division1: &address.state_province_code,
					postcode_primary_low: &address.postal_code,
					country_code: &address.country_code,
				},
			},
		}
	}
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ValidationBody<'a> {
	request: ValidationOption,
	address_key_format: AddressKeyFormat<'a>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct ValidationOption {
	request_option: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "PascalCase")]
struct AddressKeyFormat<'a> {
	address_line: &'a [String],
	political_division2: &'a str,
	political_division1: &'a str,
	postcode_primary_low: &'a str,
	country_code: &'a str,
}

/// Provider verdict for one address, with the raw response kept for reporting.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct AddressValidation {
	/// Whether the provider returned a quality-rated candidate and no error.
	pub valid: bool,
	/// Raw provider response.
	pub raw: Value,
}
impl AddressValidation {
	/// Interprets a raw `AddressValidationResponse`.
	pub fn from_response(raw: Value) -> Self {
		Self { valid: Self::is_valid(&raw), raw }
	}

	/// Returns `true` when the response carries no `Error` and its first result has a
	/// `Quality` field.
	pub fn is_valid(raw: &Value) -> bool {
		let Some(response) = raw.get("AddressValidationResponse") else {
			return false;
		};

		if response.get("Error").is_some() {
			return false;
		}

		let first = match response.get("AddressValidationResult") {
			Some(Value::Array(results)) => results.first(),
			Some(result @ Value::Object(_)) => Some(result),
			_ => None,
		};

		first.and_then(|result| result.get("Quality")).is_some_and(|quality| !quality.is_null())
	}
}
