//! Postal addresses and the free-text `"Street, City, ST 12345"` parser.

// self
use crate::{_prelude::*, error::AddressFormatError};

/// Immutable postal address.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Address {
	/// Street lines; the first is required, at most three are sent.
	pub address_lines: Vec<String>,
	/// City name.
	pub city: String,
	/// State or province code.
	pub state_province_code: String,
	/// Postal code.
	pub postal_code: String,
	/// ISO country code.
	pub country_code: String,
}
impl Address {
	/// Country applied when none is supplied.
	pub const DEFAULT_COUNTRY: &'static str = "US";
	/// Maximum street lines accepted by the provider.
	pub const MAX_LINES: usize = 3;

	/// Creates a single-line domestic address.
	pub fn new(
		street: impl Into<String>,
		city: impl Into<String>,
		state_province_code: impl Into<String>,
		postal_code: impl Into<String>,
	) -> Self {
		Self {
			address_lines: vec![street.into()],
			city: city.into(),
			state_province_code: state_province_code.into(),
			postal_code: postal_code.into(),
			country_code: Self::DEFAULT_COUNTRY.into(),
		}
	}

	/// Appends a street line; lines past [`Address::MAX_LINES`] are ignored.
	pub fn with_line(mut self, line: impl Into<String>) -> Self {
		if self.address_lines.len() < Self::MAX_LINES {
			self.address_lines.push(line.into());
		}

		self
	}

	/// Overrides the country code.
	pub fn with_country(mut self, country_code: impl Into<String>) -> Self {
		self.country_code = country_code.into();

		self
	}

	/// Parses `"Street, City, ST 12345"`.
	///
	/// Components are comma separated and trimmed. The first two are the street and city;
	/// the last must hold the region code and postal code separated by whitespace.
	pub fn parse(input: &str) -> Result<Self, AddressFormatError> {
		let parts = input.split(',').map(str::trim).collect::<Vec<_>>();

		if parts.len() < 3 {
			return Err(AddressFormatError::MissingComponents { input: input.into() });
		}

		let mut region_postal = parts[parts.len() - 1].split_whitespace();
		let (Some(region), Some(postal)) = (region_postal.next(), region_postal.next()) else {
			return Err(AddressFormatError::MissingRegionOrPostal { input: input.into() });
		};

		Ok(Self::new(parts[0], parts[1], region, postal))
	}

	/// First street line.
	pub fn street(&self) -> &str {
		self.address_lines.first().map(String::as_str).unwrap_or_default()
	}
}
impl FromStr for Address {
	type Err = AddressFormatError;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		Self::parse(s)
	}
}
impl Display for Address {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(
			f,
			"{}, {}, {} {}",
			self.address_lines.join(" "),
			self.city,
			self.state_province_code,
			self.postal_code
		)
	}
}
