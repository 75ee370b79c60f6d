//! Random placement followed by a bounded pairwise de-overlap pass.

use log::debug;
use rand::Rng;

use super::config::GraphConfig;
use super::types::{Graph, Node, NodeType};

/// Separations below this are treated as coincident.
const EPSILON: f64 = 1e-6;

#[derive(Clone, Debug)]
pub struct LayoutEngine {
	width: f64,
	height: f64,
	node_radius: f64,
	passes: usize,
	min_distance: f64,
	jitter: f64,
}

impl LayoutEngine {
	pub fn new(config: &GraphConfig) -> Self {
		Self {
			width: config.width,
			height: config.height,
			node_radius: config.node_radius,
			passes: config.relaxation_passes,
			min_distance: config.min_distance(),
			jitter: config.jitter(),
		}
	}

	pub fn layout<R: Rng + ?Sized>(&self, graph: &mut Graph, rng: &mut R) {
		self.place_random(graph, rng);
		self.jitter(graph, rng);
		let pushes = self.relax(graph);
		debug!(
			"layout: {} nodes, {} passes, {} pushes",
			graph.node_count(),
			self.passes,
			pushes
		);
	}

	/// Uniform draw inside `[r, dim - r]` on both axes.
	pub fn place_random<R: Rng + ?Sized>(&self, graph: &mut Graph, rng: &mut R) {
		let r = self.node_radius;
		for node in graph.nodes_mut() {
			node.x = sample(rng, r, self.width - r);
			node.y = sample(rng, r, self.height - r);
		}
	}

	/// Nudge secondary nodes; articles and keywords stay on their first draw.
	pub fn jitter<R: Rng + ?Sized>(&self, graph: &mut Graph, rng: &mut R) {
		if self.jitter <= 0.0 {
			return;
		}
		let r = self.node_radius;
		for node in graph.nodes_mut() {
			if is_anchored(node.node_type) {
				continue;
			}
			node.x = clamp_axis(node.x + sample(rng, -self.jitter, self.jitter), r, self.width - r);
			node.y = clamp_axis(node.y + sample(rng, -self.jitter, self.jitter), r, self.height - r);
		}
	}

	/// Returns the number of pair pushes performed.
	pub fn relax(&self, graph: &mut Graph) -> usize {
		let nodes = graph.nodes_mut();
		let margin = 2.0 * self.node_radius;
		let mut pushes = 0;

		for _ in 0..self.passes {
			for i in 0..nodes.len() {
				let (head, tail) = nodes.split_at_mut(i + 1);
				let a = &mut head[i];
				for b in tail.iter_mut() {
					if self.separate(a, b, margin) {
						pushes += 1;
					}
				}
			}
		}
		pushes
	}

	fn separate(&self, a: &mut Node, b: &mut Node, margin: f64) -> bool {
		let (dx, dy) = (b.x - a.x, b.y - a.y);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist >= self.min_distance {
			return false;
		}

		let (ux, uy) = if dist < EPSILON {
			(1.0, 0.0)
		} else {
			(dx / dist, dy / dist)
		};
		let push = (self.min_distance - dist) / 2.0;

		a.x = clamp_axis(a.x - ux * push, margin, self.width - margin);
		a.y = clamp_axis(a.y - uy * push, margin, self.height - margin);
		b.x = clamp_axis(b.x + ux * push, margin, self.width - margin);
		b.y = clamp_axis(b.y + uy * push, margin, self.height - margin);
		true
	}
}

fn is_anchored(node_type: NodeType) -> bool {
	matches!(node_type, NodeType::Article | NodeType::Keyword)
}

fn sample<R: Rng + ?Sized>(rng: &mut R, lo: f64, hi: f64) -> f64 {
	if hi <= lo {
		return (lo + hi) / 2.0;
	}
	rng.gen_range(lo..hi)
}

/// Like `f64::clamp`, but an inverted range collapses to its midpoint
/// instead of panicking.
pub fn clamp_axis(value: f64, lo: f64, hi: f64) -> f64 {
	if hi < lo {
		return (lo + hi) / 2.0;
	}
	value.max(lo).min(hi)
}
