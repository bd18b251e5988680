//! UPS service catalog.

// self
use crate::_prelude::*;

/// Shipping product identified by a provider service code.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Service {
	/// `01`
	NextDayAir,
	/// `02`
	SecondDayAir,
	/// `03`
	Ground,
	/// `07`
	WorldwideExpress,
	/// `08`
	WorldwideExpedited,
	/// `11`
	Standard,
	/// `12`
	ThreeDaySelect,
	/// `13`
	NextDayAirSaver,
	/// `14`
	NextDayAirEarly,
	/// `54`
	WorldwideExpressPlus,
	/// `59`
	SecondDayAirAm,
	/// `65`
	WorldwideSaver,
	/// Code absent from the catalog.
	Other(String),
}
impl Service {
	/// Service codes ordered from fastest to slowest domestic delivery.
	pub const SPEED_ORDER: [&'static str; 8] = ["01", "14", "13", "02", "59", "12", "03", "11"];
	/// Code used when the provider omits one.
	pub const UNKNOWN_CODE: &'static str = "Unknown";

	/// Maps a provider code onto the catalog.
	pub fn from_code(code: &str) -> Self {
		match code {
			"01" => Self::NextDayAir,
			"02" => Self::SecondDayAir,
			"03" => Self::Ground,
			"07" => Self::WorldwideExpress,
			"08" => Self::WorldwideExpedited,
			"11" => Self::Standard,
			"12" => Self::ThreeDaySelect,
			"13" => Self::NextDayAirSaver,
			"14" => Self::NextDayAirEarly,
			"54" => Self::WorldwideExpressPlus,
			"59" => Self::SecondDayAirAm,
			"65" => Self::WorldwideSaver,
			other => Self::Other(other.to_owned()),
		}
	}

	/// Provider service code.
	pub fn code(&self) -> &str {
		match self {
			Self::NextDayAir => "01",
			Self::SecondDayAir => "02",
			Self::Ground => "03",
			Self::WorldwideExpress => "07",
			Self::WorldwideExpedited => "08",
			Self::Standard => "11",
			Self::ThreeDaySelect => "12",
			Self::NextDayAirSaver => "13",
			Self::NextDayAirEarly => "14",
			Self::WorldwideExpressPlus => "54",
			Self::SecondDayAirAm => "59",
			Self::WorldwideSaver => "65",
			Self::Other(code) => code,
		}
	}

	/// Display name; uncatalogued codes render as `"Service {code}"`.
	pub fn name(&self) -> Cow<'static, str> {
		let name = match self {
			Self::NextDayAir => "UPS Next Day Air",
			Self::SecondDayAir => "UPS 2nd Day Air",
			Self::Ground => "UPS Ground",
			Self::WorldwideExpress => "UPS Worldwide Express",
			Self::WorldwideExpedited => "UPS Worldwide Expedited",
			Self::Standard => "UPS Standard",
			Self::ThreeDaySelect => "UPS 3 Day Select",
			Self::NextDayAirSaver => "UPS Next Day Air Saver",
			Self::NextDayAirEarly => "UPS Next Day Air Early",
			Self::WorldwideExpressPlus => "UPS Worldwide Express Plus",
			Self::SecondDayAirAm => "UPS 2nd Day Air A.M.",
			Self::WorldwideSaver => "UPS Worldwide Saver",
			Self::Other(code) => return Cow::Owned(format!("Service {code}")),
		};

		Cow::Borrowed(name)
	}

	/// Position in [`Service::SPEED_ORDER`], if ranked.
	pub fn speed_rank(&self) -> Option<usize> {
		Self::SPEED_ORDER.iter().position(|code| *code == self.code())
	}
}
impl Display for Service {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(&self.name())
	}
}
impl Serialize for Service {
	fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
	where
		S: serde::Serializer,
	{
		serializer.serialize_str(self.code())
	}
}
impl<'de> Deserialize<'de> for Service {
	fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
	where
		D: serde::Deserializer<'de>,
	{
		let code = String::deserialize(deserializer)?;

		Ok(Self::from_code(&code))
	}
}

/// Orders service codes by delivery speed, then the rest ascending.
pub fn speed_ordered<'a, I>(codes: I) -> Vec<String>
where
	I: IntoIterator<Item = &'a str>,
{
	let mut codes = codes.into_iter().map(str::to_owned).collect::<Vec<_>>();

	codes.sort_by(|a, b| {
		let rank = |code: &str| Service::from_code(code).speed_rank().unwrap_or(usize::MAX);

		rank(a).cmp(&rank(b)).then_with(|| a.cmp(b))
	});
	codes.dedup();

	codes
}

#[cfg(test)]
mod tests {
	// self
	use super::*;

	#[test]
	fn catalog_round_trips_codes_and_names() {
		assert_eq!(Service::from_code("03"), Service::Ground);
		assert_eq!(Service::from_code("59").name(), "UPS 2nd Day Air A.M.");
		assert_eq!(Service::from_code("96"), Service::Other("96".into()));
		assert_eq!(Service::from_code("96").name(), "Service 96");
		assert_eq!(Service::from_code("96").code(), "96");
	}

	#[test]
	fn speed_ordering_puts_unranked_codes_last() {
		let ordered = speed_ordered(["03", "96", "01", "65", "12", "03"]);

		assert_eq!(ordered, ["01", "12", "03", "65", "96"]);
	}
}
