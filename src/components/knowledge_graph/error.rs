use thiserror::Error;

/// A single input record that could not be turned into triples.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
	#[error("record {key}: expected 3 elements, found {len}")]
	WrongArity { key: String, len: usize },

	#[error("record {key}: {field} is not a string")]
	NonStringField { key: String, field: &'static str },

	#[error("record {key}: missing field {field}")]
	MissingField { key: String, field: &'static str },

	#[error("record {key}: unsupported shape")]
	UnsupportedShape { key: String },
}

/// The payload as a whole was unusable; the current graph is kept.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IngestError {
	#[error("payload has no `data` field")]
	MissingData,

	#[error("`data` must be an object or an array")]
	InvalidData,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
	#[error("no browser window available")]
	NoWindow,

	#[error("request failed: {0}")]
	Network(String),

	#[error("server responded with status {0}")]
	Status(u16),

	#[error("invalid JSON payload: {0}")]
	Decode(String),
}
