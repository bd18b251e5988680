//! JSON persistence of comparison reports and single rate tests.
//!
//! Files are written to a temporary sibling, synced, then renamed over the destination so a
//! crash never leaves a half-written report behind.

// std
use std::{
	fs::{self, File},
	io::Write,
	path::{Path, PathBuf},
};
// self
use crate::{
	_prelude::*,
	rating::{self, Address, PackageSpec, Quote, ServiceRateRecord},
	sweep::{ComparisonReport, ScenarioBatchReport},
};

/// Errors emitted while persisting reports.
#[derive(Clone, Debug, PartialEq, Eq, ThisError)]
pub enum PersistError {
	/// The report could not be serialized.
	#[error("Serialization error: {message}.")]
	Serialization {
		/// Human-readable error payload.
		message: String,
	},
	/// The filesystem rejected a read, write, or rename.
	#[error("I/O failure: {message}.")]
	Io {
		/// Human-readable error payload.
		message: String,
	},
}

/// Addresses, package, and provider answer of one rate test.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SingleTestResult {
	/// Shipper address.
	pub from: Address,
	/// Recipient address.
	pub to: Address,
	/// Packages that were rated.
	pub packages: Vec<PackageSpec>,
	/// Raw provider response.
	pub rates_response: Value,
	/// Normalized rates keyed by service code.
	pub rates: BTreeMap<String, ServiceRateRecord>,
	/// Time the test finished.
	#[serde(with = "time::serde::rfc3339")]
	pub timestamp: OffsetDateTime,
}
impl SingleTestResult {
	/// Captures a [`Quote`] finished at `timestamp`.
	pub fn from_quote(quote: &Quote, timestamp: OffsetDateTime) -> Self {
		Self {
			from: quote.request.shipper.clone(),
			to: quote.request.recipient.clone(),
			packages: quote.request.packages.clone(),
			rates_response: quote.raw.clone(),
			rates: quote.rates.clone(),
			timestamp,
		}
	}
}

/// Writes indented JSON reports into a directory.
#[derive(Clone, Debug)]
pub struct ReportWriter {
	dir: PathBuf,
}
impl ReportWriter {
	/// Creates a writer targeting `dir`; the directory is created on first write.
	pub fn new(dir: impl Into<PathBuf>) -> Self {
		Self { dir: dir.into() }
	}

	/// Target directory.
	pub fn dir(&self) -> &Path {
		&self.dir
	}

	/// Path a comparison report is written to.
	pub fn comparison_path(&self, report: &ComparisonReport) -> PathBuf {
		self.dir.join(format!(
			"ups_ca_weight_comparison_{}_{}.json",
			report.scenario,
			file_stamp(report.timestamp)
		))
	}

	/// Path a single test result is written to.
	pub fn single_test_path(&self, result: &SingleTestResult) -> PathBuf {
		self.dir.join(format!("ups_test_results_{}.json", file_stamp(result.timestamp)))
	}

	/// Path a scenario batch report is written to.
	pub fn batch_path(&self, report: &ScenarioBatchReport) -> PathBuf {
		self.dir.join(format!(
			"ca_all_scenarios_{}lb_{}.json",
			rating::format_measurement(report.weight),
			file_stamp(report.timestamp)
		))
	}

	/// Writes `report` and returns the file path.
	pub fn write_comparison(&self, report: &ComparisonReport) -> Result<PathBuf, PersistError> {
		let path = self.comparison_path(report);

		write_json(&path, report)?;

		Ok(path)
	}

	/// Writes `result` and returns the file path.
	pub fn write_single_test(&self, result: &SingleTestResult) -> Result<PathBuf, PersistError> {
		let path = self.single_test_path(result);

		write_json(&path, result)?;

		Ok(path)
	}

	/// Writes a scenario batch `report` and returns the file path.
	pub fn write_batch(&self, report: &ScenarioBatchReport) -> Result<PathBuf, PersistError> {
		let path = self.batch_path(report);

		write_json(&path, report)?;

		Ok(path)
	}
}

/// Loads a JSON document written by [`ReportWriter`].
pub fn read_json<T>(path: &Path) -> Result<T, PersistError>
where
	T: for<'de> Deserialize<'de>,
{
	let bytes = fs::read(path).map_err(|e| PersistError::Io {
		message: format!("Failed to read {}: {e}", path.display()),
	})?;

	serde_json::from_slice(&bytes).map_err(|e| PersistError::Serialization {
		message: format!("Failed to parse {}: {e}", path.display()),
	})
}

fn write_json<T>(path: &Path, value: &T) -> Result<(), PersistError>
where
	T: ?Sized + Serialize,
{
	if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
		fs::create_dir_all(parent).map_err(|e| PersistError::Io {
			message: format!("Failed to create report directory {}: {e}", parent.display()),
		})?;
	}

	let serialized = serde_json::to_vec_pretty(value).map_err(|e| PersistError::Serialization {
		message: format!("Failed to serialize report: {e}"),
	})?;
	let mut tmp_path = path.to_path_buf();

	tmp_path.set_extension("json.tmp");

	{
		let mut file = File::create(&tmp_path).map_err(|e| PersistError::Io {
			message: format!("Failed to create {}: {e}", tmp_path.display()),
		})?;

		file.write_all(&serialized).map_err(|e| PersistError::Io {
			message: format!("Failed to write {}: {e}", tmp_path.display()),
		})?;
		file.sync_all().map_err(|e| PersistError::Io {
			message: format!("Failed to sync {}: {e}", tmp_path.display()),
		})?;
	}

	fs::rename(&tmp_path, path).map_err(|e| PersistError::Io {
		message: format!("Failed to replace {}: {e}", path.display()),
	})?;

	tracing::info!(path = %path.display(), "Report saved.");

	Ok(())
}

fn file_stamp(instant: OffsetDateTime) -> String {
	format!(
		"{:04}{:02}{:02}_{:02}{:02}{:02}",
		instant.year(),
		u8::from(instant.month()),
		instant.day(),
		instant.hour(),
		instant.minute(),
		instant.second()
	)
}
