//! Render-facing projection of the model.
//!
//! Each frame the model, viewport and highlight state are projected into a
//! [`Scene`]: one flat record per visible node and link. Render targets never
//! read model state back; they receive [`SceneChange`]s produced by [`diff`].

use std::collections::HashMap;

use super::config::GraphConfig;
use super::filter::VisibleSubgraph;
use super::search::HighlightState;
use super::types::{Graph, NodeType};
use super::viewport::ViewportController;

const FULL_OPACITY: f64 = 1.0;
const LINK_WIDTH: f64 = 2.0;
const LIT_LINK_WIDTH: f64 = 3.0;

#[derive(Clone, Debug, PartialEq)]
pub struct NodeScene {
	pub id: String,
	pub label: String,
	pub node_type: NodeType,
	pub x: f64,
	pub y: f64,
	pub radius: f64,
	pub opacity: f64,
	pub stroked: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct LinkScene {
	pub key: String,
	pub label: String,
	pub from: (f64, f64),
	pub to: (f64, f64),
	pub opacity: f64,
	pub width: f64,
}

/// Everything a render target needs to draw one frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
	/// `(x, y, width, height)` of the visible model window.
	pub viewbox: (f64, f64, f64, f64),
	pub nodes: Vec<NodeScene>,
	pub links: Vec<LinkScene>,
	pub dragging: bool,
}

pub struct SceneInputs<'a> {
	pub graph: &'a Graph,
	pub visible: &'a VisibleSubgraph,
	pub highlight: &'a HighlightState,
	pub viewport: &'a ViewportController,
	pub config: &'a GraphConfig,
	pub dragging: bool,
}

impl Scene {
	pub fn project(inputs: &SceneInputs<'_>) -> Self {
		let SceneInputs {
			graph,
			visible,
			highlight,
			viewport,
			config,
			dragging,
		} = *inputs;
		// highlight is suppressed while a node is being dragged
		let lit = highlight.is_active() && !dragging;
		let faded = config.faded_opacity;

		let nodes = visible
			.node_indices()
			.iter()
			.map(|&i| {
				let node = &graph.nodes()[i];
				let opacity = if !lit || highlight.is_node_lit(&node.id) {
					FULL_OPACITY
				} else {
					faded
				};
				NodeScene {
					id: node.id.clone(),
					label: node.label.clone(),
					node_type: node.node_type,
					x: node.x,
					y: node.y,
					radius: config.node_radius,
					opacity,
					stroked: lit && highlight.is_focus(&node.id),
				}
			})
			.collect();

		let links = visible
			.link_indices()
			.iter()
			.filter_map(|&i| {
				let link = &graph.links()[i];
				let (source, target) = (graph.node(&link.source_id)?, graph.node(&link.target_id)?);
				let on = lit && highlight.is_link_lit(i);
				Some(LinkScene {
					key: link.key(),
					label: link.predicate_label.clone(),
					from: (source.x, source.y),
					to: (target.x, target.y),
					opacity: if !lit || on { FULL_OPACITY } else { faded },
					width: if on { LIT_LINK_WIDTH } else { LINK_WIDTH },
				})
			})
			.collect();

		Self {
			viewbox: viewport.viewbox(),
			nodes,
			links,
			dragging,
		}
	}
}

#[derive(Clone, Debug, PartialEq)]
pub enum SceneChange {
	Viewbox((f64, f64, f64, f64)),
	Dragging(bool),
	UpsertNode(NodeScene),
	RemoveNode(String),
	UpsertLink(LinkScene),
	RemoveLink(String),
}

/// Changes that turn `old` into `new`.
pub fn diff(old: &Scene, new: &Scene) -> Vec<SceneChange> {
	let mut changes = Vec::new();
	if old.viewbox != new.viewbox {
		changes.push(SceneChange::Viewbox(new.viewbox));
	}
	if old.dragging != new.dragging {
		changes.push(SceneChange::Dragging(new.dragging));
	}

	let old_nodes: HashMap<&str, &NodeScene> = old.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
	let new_ids: HashMap<&str, ()> = new.nodes.iter().map(|n| (n.id.as_str(), ())).collect();
	changes.extend(
		old.nodes
			.iter()
			.filter(|n| !new_ids.contains_key(n.id.as_str()))
			.map(|n| SceneChange::RemoveNode(n.id.clone())),
	);
	changes.extend(
		new.nodes
			.iter()
			.filter(|n| old_nodes.get(n.id.as_str()) != Some(n))
			.map(|n| SceneChange::UpsertNode(n.clone())),
	);

	let old_links: HashMap<&str, &LinkScene> = old.links.iter().map(|l| (l.key.as_str(), l)).collect();
	let new_keys: HashMap<&str, ()> = new.links.iter().map(|l| (l.key.as_str(), ())).collect();
	changes.extend(
		old.links
			.iter()
			.filter(|l| !new_keys.contains_key(l.key.as_str()))
			.map(|l| SceneChange::RemoveLink(l.key.clone())),
	);
	changes.extend(
		new.links
			.iter()
			.filter(|l| old_links.get(l.key.as_str()) != Some(l))
			.map(|l| SceneChange::UpsertLink(l.clone())),
	);
	changes
}

/// Anything that can consume scene changes.
pub trait RenderTarget {
	fn apply(&mut self, changes: &[SceneChange]);
}

/// A retained scene is itself a render target.
impl RenderTarget for Scene {
	fn apply(&mut self, changes: &[SceneChange]) {
		for change in changes {
			match change {
				SceneChange::Viewbox(viewbox) => self.viewbox = *viewbox,
				SceneChange::Dragging(dragging) => self.dragging = *dragging,
				SceneChange::UpsertNode(node) => match self.nodes.iter_mut().find(|n| n.id == node.id) {
					Some(existing) => *existing = node.clone(),
					None => self.nodes.push(node.clone()),
				},
				SceneChange::RemoveNode(id) => self.nodes.retain(|n| &n.id != id),
				SceneChange::UpsertLink(link) => match self.links.iter_mut().find(|l| l.key == link.key) {
					Some(existing) => *existing = link.clone(),
					None => self.links.push(link.clone()),
				},
				SceneChange::RemoveLink(key) => self.links.retain(|l| &l.key != key),
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::components::knowledge_graph::builder::build_graph;
	use crate::components::knowledge_graph::filter::FilterIndex;
	use crate::components::knowledge_graph::types::{Link, Triple};

	struct World {
		graph: Graph,
		filter: FilterIndex,
		highlight: HighlightState,
		viewport: ViewportController,
		config: GraphConfig,
	}

	impl World {
		fn new() -> Self {
			let config = GraphConfig::default();
			let mut graph = build_graph(&[
				Triple::new("art1", "headline", "Hello"),
				Triple::new("art1", "author", "auth1"),
				Triple::new("auth1", "name", "Jane"),
				Triple::literal("art2", "keywords", "ai"),
			]);
			for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
				node.x = 100.0 + 50.0 * i as f64;
				node.y = 100.0;
			}
			Self {
				filter: FilterIndex::for_graph(&graph),
				graph,
				highlight: HighlightState::default(),
				viewport: ViewportController::new(&config),
				config,
			}
		}

		fn scene(&self, dragging: bool) -> Scene {
			let visible = self.filter.apply(&self.graph);
			Scene::project(&SceneInputs {
				graph: &self.graph,
				visible: &visible,
				highlight: &self.highlight,
				viewport: &self.viewport,
				config: &self.config,
				dragging,
			})
		}
	}

	#[test]
	fn test_highlight_fades_outside_neighborhood() {
		let mut world = World::new();
		world.highlight.highlight_node(&world.graph, "auth1");
		let scene = world.scene(false);

		let by_id: HashMap<_, _> = scene.nodes.iter().map(|n| (n.id.as_str(), n)).collect();
		assert_eq!(by_id["art1"].opacity, 1.0);
		assert_eq!(by_id["auth1"].opacity, 1.0);
		assert!(by_id["auth1"].stroked);
		assert!(!by_id["art1"].stroked);
		assert_eq!(by_id["art2"].opacity, 0.2);

		let author_link = scene.links.iter().find(|l| l.label == "author").unwrap();
		assert_eq!((author_link.opacity, author_link.width), (1.0, 3.0));
		let keyword_link = scene.links.iter().find(|l| l.label == "has keyword").unwrap();
		assert_eq!((keyword_link.opacity, keyword_link.width), (0.2, 2.0));
	}

	#[test]
	fn test_dragging_suppresses_highlight() {
		let mut world = World::new();
		world.highlight.highlight_node(&world.graph, "auth1");
		let scene = world.scene(true);
		assert!(scene.nodes.iter().all(|n| n.opacity == 1.0 && !n.stroked));
	}

	#[test]
	fn test_diff_reports_only_changes() {
		let mut world = World::new();
		let before = world.scene(false);
		assert!(diff(&before, &before).is_empty());

		world.graph.node_mut("art1").unwrap().x = 500.0;
		let after = world.scene(false);
		let changes = diff(&before, &after);
		assert!(changes.contains(&SceneChange::UpsertNode(after.nodes[0].clone())));
		// the author link moved with its source
		assert!(changes.iter().any(|c| matches!(c, SceneChange::UpsertLink(l) if l.label == "author")));
		assert!(!changes.iter().any(|c| matches!(c, SceneChange::UpsertNode(n) if n.id == "art2")));
	}

	#[test]
	fn test_links_with_separator_ids_stay_distinct() {
		let link = |l: Link| LinkScene {
			key: l.key(),
			label: l.predicate_label.clone(),
			from: (0.0, 0.0),
			to: (1.0, 1.0),
			opacity: 1.0,
			width: 2.0,
		};
		let scene = Scene {
			links: vec![link(Link::new("a|b", "c", "d")), link(Link::new("a", "c", "b|d"))],
			..Scene::default()
		};
		let mut retained = Scene::default();
		retained.apply(&diff(&Scene::default(), &scene));
		assert_eq!(retained.links.len(), 2);
	}

	#[test]
	fn test_applying_diff_reconciles_retained_scene() {
		let mut world = World::new();
		let before = world.scene(false);
		world.filter.set_type(NodeType::Keyword, false);
		world.viewport.zoom_in();
		let after = world.scene(false);

		let mut retained = before.clone();
		retained.apply(&diff(&before, &after));
		assert_eq!(retained, after);
		assert!(!retained.nodes.iter().any(|n| n.id == "keyword_ai"));
	}
}
