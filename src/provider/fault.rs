//! Provider error-body inspection.
//!
//! UPS reports failures as `{"response": {"errors": [{"code", "message"}]}}` on both the
//! token and the API endpoints, while some gateways answer with OAuth-style `error` /
//! `error_description` fields or plain text. The helpers here keep only primitive data
//! (codes, messages, a bounded preview) so error types stay decoupled from reqwest.

// self
use crate::_prelude::*;

/// Maximum number of characters kept from an error body.
pub const BODY_PREVIEW_LIMIT: usize = 256;

/// Single fault entry reported by the provider.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProviderFault {
	/// Provider fault code, when supplied.
	pub code: Option<String>,
	/// Human-readable message.
	pub message: String,
}
impl Display for ProviderFault {
	fn fmt(&self, f: &mut Formatter) -> FmtResult {
		match &self.code {
			Some(code) => write!(f, "[{code}] {}", self.message),
			None => f.write_str(&self.message),
		}
	}
}

/// Extracts structured faults from an error body, returning an empty list for non-JSON bodies.
pub fn extract_faults(body: &str) -> Vec<ProviderFault> {
	let Ok(value) = serde_json::from_str::<Value>(body) else {
		return Vec::new();
	};

	if let Some(errors) = value.pointer("/response/errors").and_then(Value::as_array) {
		return errors.iter().filter_map(fault_from_entry).collect();
	}
	if let Some(error) = value.get("error").and_then(Value::as_str) {
		let message = value
			.get("error_description")
			.and_then(Value::as_str)
			.map(str::to_owned)
			.unwrap_or_else(|| error.to_owned());

		return vec![ProviderFault { code: Some(error.to_owned()), message }];
	}

	Vec::new()
}

/// Truncates `body` to [`BODY_PREVIEW_LIMIT`] characters, returning `None` for blank bodies.
pub fn body_preview(body: &str) -> Option<String> {
	let trimmed = body.trim();

	if trimmed.is_empty() {
		return None;
	}
	if trimmed.chars().count() <= BODY_PREVIEW_LIMIT {
		return Some(trimmed.to_owned());
	}

	let mut buf = trimmed.chars().take(BODY_PREVIEW_LIMIT).collect::<String>();

	buf.push('…');

	Some(buf)
}

/// One-line description of an error body: the first fault, else the preview.
pub fn summarize(body: &str) -> String {
	extract_faults(body)
		.first()
		.map(ToString::to_string)
		.or_else(|| body_preview(body))
		.unwrap_or_else(|| "empty response body".into())
}

fn fault_from_entry(entry: &Value) -> Option<ProviderFault> {
	let message = entry.get("message").and_then(Value::as_str)?.to_owned();
	let code = entry.get("code").and_then(|code| match code {
		Value::String(text) => Some(text.clone()),
		Value::Number(number) => Some(number.to_string()),
		_ => None,
	});

	Some(ProviderFault { code, message })
}
