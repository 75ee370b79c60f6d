//! Pointer-driven drag/pan/hover state machine.

use super::config::GraphConfig;
use super::filter::VisibleSubgraph;
use super::layout::clamp_axis;
use super::types::Graph;
use super::viewport::ViewportController;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerButton {
	Primary,
	Auxiliary,
	Secondary,
	Other,
}

impl PointerButton {
	/// Map a DOM `MouseEvent.button` index.
	pub fn from_index(index: i16) -> Self {
		match index {
			0 => Self::Primary,
			1 => Self::Auxiliary,
			2 => Self::Secondary,
			_ => Self::Other,
		}
	}
}

/// Input queued by the render surface, in screen coordinates.
#[derive(Clone, Debug, PartialEq)]
pub enum InputEvent {
	PointerDown { button: PointerButton, x: f64, y: f64 },
	PointerMove { x: f64, y: f64 },
	PointerUp,
	PointerLeave,
	Wheel { delta: f64, x: f64, y: f64 },
	HoverEnter(String),
	HoverLeave(String),
}

#[derive(Clone, Debug, Default, PartialEq)]
pub enum Interaction {
	#[default]
	Idle,
	Dragging {
		node_id: String,
		anchor: (f64, f64),
	},
	Panning {
		anchor: (f64, f64),
	},
}

/// What the owner has to do after an event was handled.
#[derive(Clone, Debug, PartialEq)]
pub enum Outcome {
	Redraw,
	HoverChanged(Option<String>),
	Highlight(String),
	ClearHighlight,
}

/// Mutable surroundings an event is applied to.
pub struct Surface<'a> {
	pub graph: &'a mut Graph,
	pub viewport: &'a mut ViewportController,
	pub visible: &'a VisibleSubgraph,
	/// Hover-leave keeps the highlight while search results are shown.
	pub has_search_results: bool,
}

#[derive(Clone, Debug)]
pub struct InteractionController {
	state: Interaction,
	hovered: Option<String>,
	node_radius: f64,
	width: f64,
	height: f64,
}

impl InteractionController {
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			state: Interaction::Idle,
			hovered: None,
			node_radius: config.node_radius,
			width: config.width,
			height: config.height,
		}
	}

	pub fn state(&self) -> &Interaction {
		&self.state
	}

	pub fn hovered(&self) -> Option<&str> {
		self.hovered.as_deref()
	}

	pub fn is_dragging(&self) -> bool {
		matches!(self.state, Interaction::Dragging { .. })
	}

	/// Drop any reference into the current graph.
	pub fn reset(&mut self) {
		self.state = Interaction::Idle;
		self.hovered = None;
	}

	pub fn handle(&mut self, event: InputEvent, surface: &mut Surface<'_>) -> Vec<Outcome> {
		match event {
			InputEvent::PointerDown { button, x, y } => self.pointer_down(button, x, y, surface),
			InputEvent::PointerMove { x, y } => self.pointer_move(x, y, surface),
			InputEvent::PointerUp => self.release(),
			InputEvent::PointerLeave => {
				let mut outcomes = self.release();
				if let Some(id) = self.hovered.clone() {
					outcomes.extend(self.hover_leave(id, surface.has_search_results));
				}
				outcomes
			}
			InputEvent::Wheel { delta, x, y } => {
				if surface.viewport.zoom_at_screen(delta, x, y) {
					vec![Outcome::Redraw]
				} else {
					Vec::new()
				}
			}
			InputEvent::HoverEnter(id) => self.hover_enter(id),
			InputEvent::HoverLeave(id) => self.hover_leave(id, surface.has_search_results),
		}
	}

	fn pointer_down(&mut self, button: PointerButton, x: f64, y: f64, surface: &Surface<'_>) -> Vec<Outcome> {
		if self.state != Interaction::Idle {
			return Vec::new();
		}
		let hit = self.hit_test(x, y, surface);
		self.state = match (button, hit) {
			(PointerButton::Primary, Some(node_id)) => Interaction::Dragging {
				node_id,
				anchor: (x, y),
			},
			(PointerButton::Auxiliary | PointerButton::Secondary, None) => {
				Interaction::Panning { anchor: (x, y) }
			}
			_ => return Vec::new(),
		};
		vec![Outcome::Redraw]
	}

	fn pointer_move(&mut self, x: f64, y: f64, surface: &mut Surface<'_>) -> Vec<Outcome> {
		if self.state == Interaction::Idle {
			return self.track_hover(x, y, surface);
		}
		match &mut self.state {
			Interaction::Dragging { node_id, anchor } => {
				let scale = surface.viewport.drag_scale();
				let (dx, dy) = ((x - anchor.0) * scale, (y - anchor.1) * scale);
				let r = self.node_radius;
				let Some(node) = surface.graph.node_mut(node_id) else {
					self.state = Interaction::Idle;
					return vec![Outcome::Redraw];
				};
				node.x = clamp_axis(node.x + dx, r, self.width - r);
				node.y = clamp_axis(node.y + dy, r, self.height - r);
				*anchor = (x, y);
				vec![Outcome::Redraw]
			}
			Interaction::Panning { anchor } => {
				surface.viewport.pan(x - anchor.0, y - anchor.1);
				*anchor = (x, y);
				vec![Outcome::Redraw]
			}
			Interaction::Idle => Vec::new(),
		}
	}

	/// Synthesize hover enter/leave from pointer motion while idle.
	fn track_hover(&mut self, x: f64, y: f64, surface: &Surface<'_>) -> Vec<Outcome> {
		let hit = self.hit_test(x, y, surface);
		if hit == self.hovered {
			return Vec::new();
		}
		let mut outcomes = Vec::new();
		if let Some(previous) = self.hovered.clone() {
			outcomes.extend(self.hover_leave(previous, surface.has_search_results));
		}
		if let Some(id) = hit {
			outcomes.extend(self.hover_enter(id));
		}
		outcomes
	}

	fn release(&mut self) -> Vec<Outcome> {
		if self.state == Interaction::Idle {
			return Vec::new();
		}
		self.state = Interaction::Idle;
		vec![Outcome::Redraw]
	}

	fn hover_enter(&mut self, id: String) -> Vec<Outcome> {
		if self.state != Interaction::Idle {
			return Vec::new();
		}
		self.hovered = Some(id.clone());
		vec![Outcome::HoverChanged(Some(id.clone())), Outcome::Highlight(id)]
	}

	fn hover_leave(&mut self, id: String, has_search_results: bool) -> Vec<Outcome> {
		if self.state != Interaction::Idle || self.hovered.as_deref() != Some(id.as_str()) {
			return Vec::new();
		}
		self.hovered = None;
		let mut outcomes = vec![Outcome::HoverChanged(None)];
		if !has_search_results {
			outcomes.push(Outcome::ClearHighlight);
		}
		outcomes
	}

	/// Topmost visible node under a screen point.
	fn hit_test(&self, x: f64, y: f64, surface: &Surface<'_>) -> Option<String> {
		let (mx, my) = surface.viewport.screen_to_model(x, y);
		let r2 = self.node_radius * self.node_radius;
		surface
			.visible
			.node_indices()
			.iter()
			.rev()
			.map(|&i| &surface.graph.nodes()[i])
			.find(|node| {
				let (dx, dy) = (node.x - mx, node.y - my);
				dx * dx + dy * dy <= r2
			})
			.map(|node| node.id.clone())
	}
}
