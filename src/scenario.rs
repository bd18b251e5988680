//! Named routes and the predefined test scenario catalogs.
//!
//! Two catalogs ship with the crate: general cross-country routes and California intra-state
//! routes grouped by distance. Addresses are kept as the same `"Street, City, ST 12345"`
//! strings a user would type, and parsed on demand.

// self
use crate::{_prelude::*, error::AddressFormatError, rating::Address};

/// Named origin/destination pair.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Route {
	/// Route or scenario name.
	pub name: String,
	/// Shipper address.
	pub origin: Address,
	/// Recipient address.
	pub destination: Address,
}
impl Route {
	/// Creates a route.
	pub fn new(name: impl Into<String>, origin: Address, destination: Address) -> Self {
		Self { name: name.into(), origin, destination }
	}

	/// Parses both free-text addresses into a route.
	pub fn parse(
		name: impl Into<String>,
		origin: &str,
		destination: &str,
	) -> Result<Self, AddressFormatError> {
		Ok(Self::new(name, Address::parse(origin)?, Address::parse(destination)?))
	}
}
impl Display for Route {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}: {} -> {}", self.name, self.origin, self.destination)
	}
}

/// Catalog a scenario belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Catalog {
	/// Cross-country routes.
	General,
	/// California intra-state routes.
	California,
}

/// Rough distance grouping of the California routes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DistanceBand {
	/// 200+ miles.
	Long,
	/// 100 to 200 miles.
	Medium,
	/// Under 100 miles.
	Short,
}

/// Predefined scenario referencing two catalog addresses by key.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scenario {
	/// Lookup name.
	pub name: &'static str,
	/// Human-readable summary.
	pub description: &'static str,
	/// Catalog holding both address keys.
	pub catalog: Catalog,
	/// Origin address key.
	pub origin: &'static str,
	/// Destination address key.
	pub destination: &'static str,
	/// Distance grouping, for California routes.
	pub band: Option<DistanceBand>,
}
impl Scenario {
	/// Free-text origin address.
	pub fn origin_address(&self) -> &'static str {
		address_for(self.catalog, self.origin)
	}

	/// Free-text destination address.
	pub fn destination_address(&self) -> &'static str {
		address_for(self.catalog, self.destination)
	}

	/// Parses the scenario into a [`Route`].
	pub fn route(&self) -> Result<Route, AddressFormatError> {
		Route::parse(self.name, self.origin_address(), self.destination_address())
	}
}

/// Addresses known to work against the CIE environment.
pub const GENERAL_ADDRESSES: [(&str, &str); 6] = [
	("origin_ny", "123 Main St, New York, NY 10001"),
	("destination_ca", "456 Oak Ave, Los Angeles, CA 90001"),
	("origin_ga", "100 Peachtree St, Atlanta, GA 30309"),
	("destination_tx", "200 Main St, Dallas, TX 75201"),
	("origin_fl", "300 Ocean Dr, Miami, FL 33139"),
	("destination_wa", "400 Pine St, Seattle, WA 98101"),
];

/// California addresses for intra-state comparisons.
pub const CALIFORNIA_ADDRESSES: [(&str, &str); 12] = [
	("la_downtown", "123 Spring St, Los Angeles, CA 90012"),
	("la_westside", "456 Wilshire Blvd, Los Angeles, CA 90036"),
	("sf_downtown", "789 Market St, San Francisco, CA 94103"),
	("sf_mission", "321 Valencia St, San Francisco, CA 94110"),
	("san_diego", "654 Broadway, San Diego, CA 92101"),
	("sacramento", "987 J St, Sacramento, CA 95814"),
	("fresno", "147 Fresno St, Fresno, CA 93721"),
	("oakland", "258 Oakland Ave, Oakland, CA 94612"),
	("san_jose", "369 San Carlos St, San Jose, CA 95112"),
	("long_beach", "741 Ocean Blvd, Long Beach, CA 90802"),
	("bakersfield", "852 Chester Ave, Bakersfield, CA 93301"),
	("anaheim", "963 Lincoln Ave, Anaheim, CA 92805"),
];

/// Cross-country scenarios; the first entry is the default.
pub const GENERAL_SCENARIOS: [Scenario; 5] = [
	general("default", "New York -> Los Angeles", "origin_ny", "destination_ca"),
	general("east_west", "New York -> Los Angeles", "origin_ny", "destination_ca"),
	general("south_north", "Atlanta -> Seattle", "origin_ga", "destination_wa"),
	general("southeast", "Miami -> Dallas", "origin_fl", "destination_tx"),
	general("cross_country", "New York -> Seattle", "origin_ny", "destination_wa"),
];

/// California scenarios; the first entry is the default.
pub const CALIFORNIA_SCENARIOS: [Scenario; 12] = [
	california(
		"la_to_sf",
		"Los Angeles Downtown -> San Francisco Downtown",
		"la_downtown",
		"sf_downtown",
		DistanceBand::Long,
	),
	california(
		"sf_to_la",
		"San Francisco Downtown -> Los Angeles Downtown",
		"sf_downtown",
		"la_downtown",
		DistanceBand::Long,
	),
	california(
		"la_to_san_diego",
		"Los Angeles -> San Diego",
		"la_downtown",
		"san_diego",
		DistanceBand::Long,
	),
	california(
		"sf_to_sacramento",
		"San Francisco -> Sacramento",
		"sf_downtown",
		"sacramento",
		DistanceBand::Long,
	),
	california("la_to_fresno", "Los Angeles -> Fresno", "la_downtown", "fresno", DistanceBand::Medium),
	california(
		"oakland_to_san_jose",
		"Oakland -> San Jose",
		"oakland",
		"san_jose",
		DistanceBand::Medium,
	),
	california(
		"la_metro",
		"LA Downtown -> LA Westside (Metro)",
		"la_downtown",
		"la_westside",
		DistanceBand::Short,
	),
	california(
		"sf_metro",
		"SF Downtown -> SF Mission (Metro)",
		"sf_downtown",
		"sf_mission",
		DistanceBand::Short,
	),
	california(
		"socal_central",
		"Los Angeles -> Bakersfield",
		"la_downtown",
		"bakersfield",
		DistanceBand::Medium,
	),
	california(
		"norcal_central",
		"San Francisco -> Fresno",
		"sf_downtown",
		"fresno",
		DistanceBand::Medium,
	),
	california("coast_to_inland", "Long Beach -> Fresno", "long_beach", "fresno", DistanceBand::Medium),
	california("orange_county", "Anaheim -> Long Beach", "anaheim", "long_beach", DistanceBand::Short),
];

/// Finds a scenario by catalog and name.
pub fn lookup(catalog: Catalog, name: &str) -> Option<&'static Scenario> {
	scenarios(catalog).iter().find(|scenario| scenario.name == name)
}

/// Resolves a scenario, falling back to the catalog default for unknown names.
pub fn resolve(catalog: Catalog, name: &str) -> &'static Scenario {
	let all = scenarios(catalog);

	lookup(catalog, name).unwrap_or_else(|| {
		tracing::warn!(scenario = name, fallback = all[0].name, "Unknown scenario, using default.");

		&all[0]
	})
}

/// Every scenario of a catalog, default first.
pub fn scenarios(catalog: Catalog) -> &'static [Scenario] {
	match catalog {
		Catalog::General => &GENERAL_SCENARIOS,
		Catalog::California => &CALIFORNIA_SCENARIOS,
	}
}

fn address_for(catalog: Catalog, key: &str) -> &'static str {
	let addresses: &'static [(&'static str, &'static str)] = match catalog {
		Catalog::General => &GENERAL_ADDRESSES,
		Catalog::California => &CALIFORNIA_ADDRESSES,
	};

	addresses.iter().find(|(k, _)| *k == key).map(|(_, address)| *address).unwrap_or_default()
}

const fn general(
	name: &'static str,
	description: &'static str,
	origin: &'static str,
	destination: &'static str,
) -> Scenario {
	Scenario { name, description, catalog: Catalog::General, origin, destination, band: None }
}

const fn california(
	name: &'static str,
	description: &'static str,
	origin: &'static str,
	destination: &'static str,
	band: DistanceBand,
) -> Scenario {
	Scenario { name, description, catalog: Catalog::California, origin, destination, band: Some(band) }
}
