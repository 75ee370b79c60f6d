use super::config::GraphConfig;

/// Zoom/pan transform between model space and the screen.
///
/// The visible window ("viewbox") starts at `origin` in model coordinates and
/// spans `(width / zoom, height / zoom)`.
#[derive(Clone, Debug, PartialEq)]
pub struct ViewportController {
	pub zoom: f64,
	pub origin_x: f64,
	pub origin_y: f64,
	width: f64,
	height: f64,
	screen_width: f64,
	screen_height: f64,
	min_zoom: f64,
	max_zoom: f64,
	step_in: f64,
	step_out: f64,
}

impl ViewportController {
	pub fn new(config: &GraphConfig) -> Self {
		let (min_zoom, max_zoom) = zoom_bounds(config.min_zoom, config.max_zoom);
		Self {
			zoom: 1.0,
			origin_x: 0.0,
			origin_y: 0.0,
			width: config.width,
			height: config.height,
			screen_width: config.width,
			screen_height: config.height,
			min_zoom,
			max_zoom,
			step_in: config.zoom_step_in,
			step_out: config.zoom_step_out,
		}
	}

	pub fn viewbox(&self) -> (f64, f64, f64, f64) {
		(
			self.origin_x,
			self.origin_y,
			self.width / self.zoom,
			self.height / self.zoom,
		)
	}

	/// Zoom around a model-space focal point. Positive `delta` magnifies.
	/// Returns whether the zoom changed.
	pub fn zoom(&mut self, delta: f64, focal_x: f64, focal_y: f64) -> bool {
		let factor = if delta > 0.0 { self.step_in } else { self.step_out };
		let new_zoom = (self.zoom * factor).clamp(self.min_zoom, self.max_zoom);
		if !new_zoom.is_finite() || new_zoom == self.zoom {
			return false;
		}

		// effective ratio differs from `factor` only when clamped
		let ratio = new_zoom / self.zoom;
		self.origin_x += (focal_x - self.origin_x) * (1.0 - 1.0 / ratio);
		self.origin_y += (focal_y - self.origin_y) * (1.0 - 1.0 / ratio);
		self.zoom = new_zoom;
		true
	}

	pub fn zoom_at_screen(&mut self, delta: f64, screen_x: f64, screen_y: f64) -> bool {
		let (fx, fy) = self.screen_to_model(screen_x, screen_y);
		self.zoom(delta, fx, fy)
	}

	pub fn zoom_in(&mut self) -> bool {
		let (cx, cy) = self.center();
		self.zoom(1.0, cx, cy)
	}

	pub fn zoom_out(&mut self) -> bool {
		let (cx, cy) = self.center();
		self.zoom(-1.0, cx, cy)
	}

	pub fn pan(&mut self, screen_dx: f64, screen_dy: f64) {
		self.origin_x -= screen_dx / self.zoom;
		self.origin_y -= screen_dy / self.zoom;
	}

	pub fn reset(&mut self) {
		self.zoom = 1.0;
		self.origin_x = 0.0;
		self.origin_y = 0.0;
	}

	pub fn resize(&mut self, screen_width: f64, screen_height: f64) {
		if screen_width > 0.0 && screen_height > 0.0 {
			self.screen_width = screen_width;
			self.screen_height = screen_height;
		}
	}

	/// Model units per screen pixel, used to scale drag deltas.
	pub fn drag_scale(&self) -> f64 {
		self.width / self.screen_width / self.zoom
	}

	/// Screen pixels per model unit.
	pub fn screen_scale(&self) -> f64 {
		1.0 / self.drag_scale()
	}

	pub fn screen_to_model(&self, screen_x: f64, screen_y: f64) -> (f64, f64) {
		let scale = self.drag_scale();
		(
			self.origin_x + screen_x * scale,
			self.origin_y + screen_y * scale,
		)
	}

	pub fn model_to_screen(&self, x: f64, y: f64) -> (f64, f64) {
		let scale = self.screen_scale();
		((x - self.origin_x) * scale, (y - self.origin_y) * scale)
	}

	fn center(&self) -> (f64, f64) {
		let (x, y, w, h) = self.viewbox();
		(x + w / 2.0, y + h / 2.0)
	}
}

/// Positive, finite and ordered zoom limits; unusable values fall back to
/// the defaults.
fn zoom_bounds(min: f64, max: f64) -> (f64, f64) {
	let defaults = GraphConfig::default();
	let usable = |v: f64| v.is_finite() && v > 0.0;
	let min = if usable(min) { min } else { defaults.min_zoom };
	let max = if usable(max) { max } else { defaults.max_zoom };
	if min <= max { (min, max) } else { (max, min) }
}
