use serde::Deserialize;

/// Tunables for layout, viewport and highlighting.
///
/// Every field has a default, so a partial JSON object deserializes into a
/// complete config.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
	/// Model-space width.
	pub width: f64,
	/// Model-space height.
	pub height: f64,
	pub node_radius: f64,
	/// Fixed number of de-overlap passes.
	pub relaxation_passes: usize,
	/// Pairs closer than this are pushed apart. `None` means three radii.
	pub min_distance: Option<f64>,
	/// Max random offset applied to non-primary nodes before relaxation.
	pub jitter: Option<f64>,
	pub faded_opacity: f64,
	pub min_zoom: f64,
	pub max_zoom: f64,
	pub zoom_step_in: f64,
	pub zoom_step_out: f64,
}

impl Default for GraphConfig {
	fn default() -> Self {
		Self {
			width: 800.0,
			height: 600.0,
			node_radius: 20.0,
			relaxation_passes: 10,
			min_distance: None,
			jitter: None,
			faded_opacity: 0.2,
			min_zoom: 0.1,
			max_zoom: 4.0,
			zoom_step_in: 1.1,
			zoom_step_out: 0.9,
		}
	}
}

impl GraphConfig {
	pub fn min_distance(&self) -> f64 {
		self.min_distance.unwrap_or(3.0 * self.node_radius)
	}

	pub fn jitter(&self) -> f64 {
		self.jitter.unwrap_or(0.25 * self.node_radius)
	}
}

#[cfg(test)]
impl GraphConfig {
	pub fn with_size(mut self, width: f64, height: f64) -> Self {
		self.width = width;
		self.height = height;
		self
	}

	pub fn with_passes(mut self, passes: usize) -> Self {
		self.relaxation_passes = passes;
		self
	}
}
