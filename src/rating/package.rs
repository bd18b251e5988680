//! Package specifications.

// self
use crate::_prelude::*;

/// Unit applied to package weights.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeightUnit {
	/// Pounds.
	#[default]
	#[serde(rename = "LBS")]
	Pounds,
	/// Kilograms.
	#[serde(rename = "KGS")]
	Kilograms,
}
impl WeightUnit {
	/// Provider unit code.
	pub const fn as_str(self) -> &'static str {
		match self {
			WeightUnit::Pounds => "LBS",
			WeightUnit::Kilograms => "KGS",
		}
	}
}
impl Display for WeightUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Unit applied to package dimensions.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DimensionUnit {
	/// Inches.
	#[default]
	#[serde(rename = "IN")]
	Inches,
	/// Centimeters.
	#[serde(rename = "CM")]
	Centimeters,
}
impl DimensionUnit {
	/// Provider unit code.
	pub const fn as_str(self) -> &'static str {
		match self {
			DimensionUnit::Inches => "IN",
			DimensionUnit::Centimeters => "CM",
		}
	}
}
impl Display for DimensionUnit {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		f.write_str(self.as_str())
	}
}

/// Package length, width, and height.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Dimensions {
	/// Length.
	pub length: f64,
	/// Width.
	pub width: f64,
	/// Height.
	pub height: f64,
}
impl Dimensions {
	/// Creates a dimension triple.
	pub const fn new(length: f64, width: f64, height: f64) -> Self {
		Self { length, width, height }
	}
}
impl Default for Dimensions {
	fn default() -> Self {
		Self::new(12.0, 8.0, 6.0)
	}
}
impl Display for Dimensions {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		write!(f, "{}x{}x{}", self.length, self.width, self.height)
	}
}

/// Immutable package description sent with every rate request.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PackageSpec {
	/// Package weight.
	pub weight: f64,
	/// Package dimensions.
	pub dimensions: Dimensions,
	/// Unit for [`PackageSpec::weight`].
	pub weight_unit: WeightUnit,
	/// Unit for [`PackageSpec::dimensions`].
	pub dimension_unit: DimensionUnit,
	/// Provider packaging type code.
	pub packaging_type: String,
}
impl PackageSpec {
	/// Customer supplied package.
	pub const DEFAULT_PACKAGING_TYPE: &'static str = "02";

	/// Creates a package in pounds and inches with the default packaging type.
	pub fn new(weight: f64, dimensions: Dimensions) -> Self {
		Self {
			weight,
			dimensions,
			weight_unit: WeightUnit::default(),
			dimension_unit: DimensionUnit::default(),
			packaging_type: Self::DEFAULT_PACKAGING_TYPE.into(),
		}
	}

	/// Overrides the weight unit.
	pub fn with_weight_unit(mut self, unit: WeightUnit) -> Self {
		self.weight_unit = unit;

		self
	}

	/// Overrides the dimension unit.
	pub fn with_dimension_unit(mut self, unit: DimensionUnit) -> Self {
		self.dimension_unit = unit;

		self
	}

	/// Overrides the packaging type code.
	pub fn with_packaging_type(mut self, code: impl Into<String>) -> Self {
		self.packaging_type = code.into();

		self
	}
}
