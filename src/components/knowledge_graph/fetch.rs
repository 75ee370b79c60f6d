use log::info;
use serde_json::Value;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::Response;

use super::error::FetchError;

/// GET a triple payload. Never touches graph state; the caller decides what
/// to do with either outcome.
pub async fn fetch_triples(url: &str) -> Result<Value, FetchError> {
	info!("fetching triples from {url}");
	let window = web_sys::window().ok_or(FetchError::NoWindow)?;

	let response = JsFuture::from(window.fetch_with_str(url))
		.await
		.map_err(|e| FetchError::Network(format!("{e:?}")))?;
	let response: Response = response
		.dyn_into()
		.map_err(|e| FetchError::Network(format!("{e:?}")))?;
	if !response.ok() {
		return Err(FetchError::Status(response.status()));
	}

	let body = response
		.text()
		.map_err(|e| FetchError::Network(format!("{e:?}")))?;
	let text = JsFuture::from(body)
		.await
		.map_err(|e| FetchError::Network(format!("{e:?}")))?
		.as_string()
		.unwrap_or_default();
	serde_json::from_str(&text).map_err(|e| FetchError::Decode(e.to_string()))
}
