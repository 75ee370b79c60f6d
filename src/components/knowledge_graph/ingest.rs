//! Normalizes raw record payloads into a flat, ordered triple list.

use log::{debug, warn};
use serde_json::Value;

use super::error::{IngestError, RecordError};
use super::types::{Triple, looks_like_uri};

#[derive(Clone, Debug, Default)]
pub struct IngestReport {
	pub triples: Vec<Triple>,
	pub rejected: Vec<RecordError>,
}

/// Flatten a payload of the form `{"data": {key: record, ..}}` (or an array of
/// records) into triples, in input order. Bad records are skipped.
pub fn ingest(payload: &Value) -> Result<IngestReport, IngestError> {
	let data = match payload {
		Value::Array(_) => payload,
		_ => payload.get("data").ok_or(IngestError::MissingData)?,
	};

	let records: Vec<(String, &Value)> = match data {
		Value::Object(map) => map.iter().map(|(k, v)| (k.clone(), v)).collect(),
		Value::Array(items) => items
			.iter()
			.enumerate()
			.map(|(i, v)| (i.to_string(), v))
			.collect(),
		_ => return Err(IngestError::InvalidData),
	};

	let mut report = IngestReport::default();
	for (key, record) in records {
		match normalize_record(&key, record) {
			Ok(triples) => report.triples.extend(triples),
			Err(err) => {
				warn!("skipping malformed record: {err}");
				report.rejected.push(err);
			}
		}
	}
	debug!(
		"ingested {} triples, rejected {} records",
		report.triples.len(),
		report.rejected.len()
	);
	Ok(report)
}

fn normalize_record(key: &str, record: &Value) -> Result<Vec<Triple>, RecordError> {
	match record {
		Value::Array(items) => {
			let [subject, predicate, object] = items.as_slice() else {
				return Err(RecordError::WrongArity {
					key: key.into(),
					len: items.len(),
				});
			};
			let subject = require_str(key, "subject", subject)?;
			let predicate = require_str(key, "predicate", predicate)?;
			expand(key, subject, predicate, object, false)
		}
		Value::Object(map) => {
			let term = |field: &'static str| {
				map.get(field).ok_or(RecordError::MissingField {
					key: key.into(),
					field,
				})
			};
			let subject = require_str(key, "subject", term_value(key, term("s")?)?)?;
			let predicate = require_str(key, "predicate", term_value(key, term("p")?)?)?;
			let object = term("o")?;
			let declared_uri = object.get("type").and_then(Value::as_str) == Some("uri");
			expand(key, subject, predicate, term_value(key, object)?, declared_uri)
		}
		_ => Err(RecordError::UnsupportedShape { key: key.into() }),
	}
}

/// `{type, value}` terms yield their value; bare values pass through.
fn term_value<'a>(key: &str, term: &'a Value) -> Result<&'a Value, RecordError> {
	match term {
		Value::Object(map) => map.get("value").ok_or(RecordError::MissingField {
			key: key.into(),
			field: "value",
		}),
		other => Ok(other),
	}
}

fn require_str<'a>(key: &str, field: &'static str, value: &'a Value) -> Result<&'a str, RecordError> {
	value.as_str().ok_or(RecordError::NonStringField {
		key: key.into(),
		field,
	})
}

fn expand(
	key: &str,
	subject: &str,
	predicate: &str,
	object: &Value,
	declared_uri: bool,
) -> Result<Vec<Triple>, RecordError> {
	match object {
		Value::String(s) => Ok(vec![Triple {
			subject: subject.into(),
			predicate: predicate.into(),
			object: s.clone(),
			object_is_uri: declared_uri || looks_like_uri(s),
		}]),
		// multi-valued objects (keyword lists) explode into literal triples
		Value::Array(items) => items
			.iter()
			.map(|item| {
				scalar_text(item)
					.map(|text| Triple::literal(subject, predicate, text))
					.ok_or(RecordError::UnsupportedShape { key: key.into() })
			})
			.collect(),
		other => scalar_text(other)
			.map(|text| vec![Triple::literal(subject, predicate, text)])
			.ok_or(RecordError::UnsupportedShape { key: key.into() }),
	}
}

fn scalar_text(value: &Value) -> Option<String> {
	match value {
		Value::String(s) => Some(s.clone()),
		Value::Number(n) => Some(n.to_string()),
		Value::Bool(b) => Some(b.to_string()),
		_ => None,
	}
}
