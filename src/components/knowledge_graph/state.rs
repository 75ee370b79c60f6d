use std::collections::VecDeque;
use std::fmt::Display;

use log::{info, warn};
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde_json::Value;

use super::builder::build_graph;
use super::config::GraphConfig;
use super::filter::{FilterIndex, VisibleSubgraph};
use super::ingest::ingest;
use super::interaction::{InputEvent, Interaction, InteractionController, Outcome, Surface};
use super::layout::LayoutEngine;
use super::scene::{Scene, SceneInputs};
use super::search::{HighlightState, SearchIndex};
use super::types::{Graph, NodeType};
use super::viewport::ViewportController;

/// Notifications for the UI shell.
#[derive(Clone, Debug, PartialEq)]
pub enum GraphEvent {
	GraphLoaded { nodes: usize, links: usize },
	NodeHoverChanged(Option<String>),
	FilterChanged,
	SearchResultsChanged(Vec<String>),
	LoadFailed(String),
}

/// Owns the graph and every controller acting on it.
///
/// All mutation goes through this type on a single thread. Pointer input is
/// queued with [`push_input`](Self::push_input) and applied in order by
/// [`process_inputs`](Self::process_inputs).
pub struct KnowledgeGraphState {
	config: GraphConfig,
	graph: Graph,
	layout: LayoutEngine,
	viewport: ViewportController,
	interaction: InteractionController,
	filter: FilterIndex,
	visible: VisibleSubgraph,
	search: SearchIndex,
	highlight: HighlightState,
	inbox: VecDeque<InputEvent>,
	outbox: Vec<GraphEvent>,
	rng: StdRng,
	dirty: bool,
}

impl KnowledgeGraphState {
	/// `seed` drives the randomized initial placement.
	pub fn new(config: GraphConfig, seed: u64) -> Self {
		Self {
			layout: LayoutEngine::new(&config),
			viewport: ViewportController::new(&config),
			interaction: InteractionController::new(&config),
			config,
			graph: Graph::default(),
			filter: FilterIndex::default(),
			visible: VisibleSubgraph::default(),
			search: SearchIndex::default(),
			highlight: HighlightState::default(),
			inbox: VecDeque::new(),
			outbox: Vec::new(),
			rng: StdRng::seed_from_u64(seed),
			dirty: true,
		}
	}

	/// Ingest, build and lay out a payload, replacing the current graph.
	/// An unusable payload leaves the current graph in place.
	pub fn load_triples(&mut self, raw: &Value) -> bool {
		let report = match ingest(raw) {
			Ok(report) => report,
			Err(err) => {
				self.report_load_failure(&err);
				return false;
			}
		};
		let mut graph = build_graph(&report.triples);
		self.layout.layout(&mut graph, &mut self.rng);
		info!(
			"graph loaded: {} nodes, {} links ({} records skipped)",
			graph.node_count(),
			graph.link_count(),
			report.rejected.len()
		);
		self.install(graph);
		true
	}

	/// Swap in a graph whose positions are already assigned.
	pub fn install(&mut self, graph: Graph) {
		if self.interaction.hovered().is_some() {
			self.outbox.push(GraphEvent::NodeHoverChanged(None));
		}
		if self.search.has_results() {
			self.outbox.push(GraphEvent::SearchResultsChanged(Vec::new()));
		}
		// queued input refers to the old layout
		self.inbox.clear();
		self.interaction.reset();
		self.highlight.reset();
		self.search.clear();

		self.filter = FilterIndex::for_graph(&graph);
		self.visible = self.filter.apply(&graph);
		self.outbox.push(GraphEvent::GraphLoaded {
			nodes: graph.node_count(),
			links: graph.link_count(),
		});
		self.graph = graph;
		self.dirty = true;
	}

	pub fn report_load_failure(&mut self, err: &impl Display) {
		warn!("graph load failed: {err}");
		self.outbox.push(GraphEvent::LoadFailed(err.to_string()));
	}

	pub fn set_type_filter(&mut self, node_type: NodeType, enabled: bool) {
		if self.filter.set_type(node_type, enabled) {
			self.refilter();
		}
	}

	pub fn set_article_filter(&mut self, id: &str, enabled: bool) {
		if self.filter.set_article(id, enabled) {
			self.refilter();
		}
	}

	pub fn select_all_articles(&mut self) {
		if self.filter.select_all_articles() {
			self.refilter();
		}
	}

	pub fn clear_all_articles(&mut self) {
		if self.filter.clear_all_articles() {
			self.refilter();
		}
	}

	pub fn toggle_all_types(&mut self) {
		self.filter.toggle_all();
		self.refilter();
	}

	fn refilter(&mut self) {
		self.visible = self.filter.apply(&self.graph);
		self.outbox.push(GraphEvent::FilterChanged);
		self.dirty = true;
	}

	/// Match nodes and light the union of their neighborhoods.
	pub fn search(&mut self, term: &str) -> Vec<String> {
		let results = self.search.search(&self.graph, term).to_vec();
		self.show_search_highlight();
		self.outbox.push(GraphEvent::SearchResultsChanged(results.clone()));
		self.dirty = true;
		results
	}

	fn show_search_highlight(&mut self) {
		let results = self.search.results();
		self.highlight
			.highlight_all(&self.graph, results.iter().map(String::as_str));
	}

	pub fn highlight_node(&mut self, id: &str) {
		self.highlight.highlight_node(&self.graph, id);
		self.dirty = true;
	}

	pub fn reset_highlighting(&mut self) {
		self.highlight.reset();
		self.dirty = true;
	}

	pub fn zoom_in(&mut self) {
		self.dirty |= self.viewport.zoom_in();
	}

	pub fn zoom_out(&mut self) {
		self.dirty |= self.viewport.zoom_out();
	}

	pub fn reset_view(&mut self) {
		self.viewport.reset();
		self.dirty = true;
	}

	pub fn resize(&mut self, screen_width: f64, screen_height: f64) {
		self.viewport.resize(screen_width, screen_height);
		self.dirty = true;
	}

	pub fn push_input(&mut self, event: InputEvent) {
		self.inbox.push_back(event);
	}

	/// Apply all queued input in arrival order.
	pub fn process_inputs(&mut self) {
		while let Some(event) = self.inbox.pop_front() {
			let mut surface = Surface {
				graph: &mut self.graph,
				viewport: &mut self.viewport,
				visible: &self.visible,
				has_search_results: self.search.has_results(),
			};
			let outcomes = self.interaction.handle(event, &mut surface);
			for outcome in outcomes {
				self.apply(outcome);
			}
		}
	}

	fn apply(&mut self, outcome: Outcome) {
		match outcome {
			Outcome::Redraw => {}
			Outcome::HoverChanged(id) => {
				// leaving a node while results are listed brings their highlight back
				if id.is_none() && self.search.has_results() {
					self.show_search_highlight();
				}
				self.outbox.push(GraphEvent::NodeHoverChanged(id));
			}
			Outcome::Highlight(id) => self.highlight.highlight_node(&self.graph, &id),
			Outcome::ClearHighlight => self.highlight.reset(),
		}
		self.dirty = true;
	}

	pub fn scene(&self) -> Scene {
		Scene::project(&SceneInputs {
			graph: &self.graph,
			visible: &self.visible,
			highlight: &self.highlight,
			viewport: &self.viewport,
			config: &self.config,
			dragging: self.interaction.is_dragging(),
		})
	}

	pub fn drain_events(&mut self) -> Vec<GraphEvent> {
		std::mem::take(&mut self.outbox)
	}

	/// Whether anything visible changed since the last call.
	pub fn take_dirty(&mut self) -> bool {
		std::mem::replace(&mut self.dirty, false)
	}

	pub fn config(&self) -> &GraphConfig {
		&self.config
	}

	pub fn graph(&self) -> &Graph {
		&self.graph
	}

	pub fn visible(&self) -> &VisibleSubgraph {
		&self.visible
	}

	pub fn viewport(&self) -> &ViewportController {
		&self.viewport
	}

	pub fn interaction(&self) -> &Interaction {
		self.interaction.state()
	}

	pub fn filter(&self) -> &FilterIndex {
		&self.filter
	}

	pub fn highlight(&self) -> &HighlightState {
		&self.highlight
	}

	pub fn search_results(&self) -> &[String] {
		self.search.results()
	}

	/// `(id, label)` of every article, for the article filter list.
	pub fn articles(&self) -> Vec<(String, String)> {
		self.graph
			.articles()
			.map(|n| (n.id.clone(), n.label.clone()))
			.collect()
	}
}

#[cfg(test)]
mod tests {
	use serde_json::json;

	use super::*;
	use crate::components::knowledge_graph::interaction::PointerButton;

	fn payload() -> Value {
		json!({
			"data": {
				"0": ["art1", "headline", "Hello"],
				"1": ["art1", "author", "auth1"],
				"2": ["auth1", "name", "Jane"],
				"3": ["art1", "keywords", ["ai", "news"]],
				"4": ["broken"],
			}
		})
	}

	fn loaded() -> KnowledgeGraphState {
		let mut state = KnowledgeGraphState::new(GraphConfig::default(), 42);
		assert!(state.load_triples(&payload()));
		state.drain_events();
		state
	}

	/// Same graph with fixed, well separated positions.
	fn placed() -> KnowledgeGraphState {
		let mut state = loaded();
		let mut graph = state.graph().clone();
		for (i, node) in graph.nodes_mut().iter_mut().enumerate() {
			node.x = 100.0 + 150.0 * i as f64;
			node.y = 300.0;
		}
		state.install(graph);
		state.drain_events();
		state
	}

	fn screen_of(state: &KnowledgeGraphState, id: &str) -> (f64, f64) {
		let node = state.graph().node(id).unwrap();
		state.viewport().model_to_screen(node.x, node.y)
	}

	#[test]
	fn test_load_builds_and_lays_out() {
		let mut state = KnowledgeGraphState::new(GraphConfig::default(), 1);
		assert!(state.load_triples(&payload()));
		assert_eq!(state.graph().node_count(), 4);
		assert_eq!(state.visible().node_count(), 4);
		for node in state.graph().nodes() {
			assert!(node.x >= 20.0 && node.x <= 780.0);
			assert!(node.y >= 20.0 && node.y <= 580.0);
		}
		assert_eq!(
			state.drain_events(),
			vec![GraphEvent::GraphLoaded { nodes: 4, links: 3 }]
		);
	}

	#[test]
	fn test_bad_payload_keeps_graph() {
		let mut state = loaded();
		assert!(!state.load_triples(&json!({"error": "boom"})));
		assert_eq!(state.graph().node_count(), 4);
		assert!(matches!(state.drain_events().as_slice(), [GraphEvent::LoadFailed(_)]));
	}

	#[test]
	fn test_rebuild_resets_interaction_and_search() {
		let mut state = placed();
		state.search("jane");
		let (x, y) = screen_of(&state, "art1");
		state.push_input(InputEvent::PointerDown {
			button: PointerButton::Primary,
			x,
			y,
		});
		state.process_inputs();
		assert!(matches!(state.interaction(), Interaction::Dragging { .. }));

		state.push_input(InputEvent::PointerMove { x: 0.0, y: 0.0 });
		state.load_triples(&payload());
		state.process_inputs();
		assert_eq!(state.interaction(), &Interaction::Idle);
		assert!(state.search_results().is_empty());
		assert!(!state.highlight().is_active());
	}

	#[test]
	fn test_search_highlights_union_and_emits() {
		let mut state = loaded();
		let results = state.search("keyword");
		assert_eq!(results, ["keyword_ai", "keyword_news"]);
		assert!(state.highlight().is_focus("keyword_ai"));
		assert!(state.highlight().is_focus("keyword_news"));
		assert!(state.highlight().is_node_lit("art1"));
		assert!(!state.highlight().is_node_lit("auth1"));
		assert_eq!(
			state.drain_events(),
			vec![GraphEvent::SearchResultsChanged(results)]
		);

		state.search("");
		assert!(!state.highlight().is_active());
	}

	#[test]
	fn test_hover_leave_restores_search_highlight() {
		let mut state = loaded();
		state.search("jane");
		state.push_input(InputEvent::HoverEnter("keyword_ai".into()));
		state.push_input(InputEvent::HoverLeave("keyword_ai".into()));
		state.process_inputs();
		assert!(state.highlight().is_focus("auth1"));
		assert!(!state.highlight().is_focus("keyword_ai"));
	}

	#[test]
	fn test_type_filter_updates_scene() {
		let mut state = loaded();
		state.set_type_filter(NodeType::Keyword, false);
		let scene = state.scene();
		assert_eq!(scene.nodes.len(), 2);
		assert_eq!(scene.links.len(), 1);
		assert_eq!(state.drain_events(), vec![GraphEvent::FilterChanged]);

		// no-op changes do not notify
		state.set_type_filter(NodeType::Keyword, false);
		assert!(state.drain_events().is_empty());
	}

	#[test]
	fn test_article_filter_hides_article() {
		let mut state = loaded();
		assert_eq!(state.articles(), vec![("art1".to_string(), "Hello".to_string())]);
		state.clear_all_articles();
		assert!(!state.visible().contains("art1"));
		assert_eq!(state.scene().links.len(), 0);
		state.select_all_articles();
		assert!(state.visible().contains("art1"));
	}

	#[test]
	fn test_view_operations() {
		let mut state = loaded();
		state.take_dirty();
		state.zoom_in();
		assert!(state.take_dirty());
		state.zoom_out();
		state.zoom_out();
		state.push_input(InputEvent::PointerDown {
			button: PointerButton::Secondary,
			x: -500.0,
			y: -500.0,
		});
		state.push_input(InputEvent::PointerMove { x: -450.0, y: -480.0 });
		state.push_input(InputEvent::PointerUp);
		state.process_inputs();
		assert_ne!(state.viewport().origin_x, 0.0);

		state.reset_view();
		assert_eq!(state.viewport().zoom, 1.0);
		assert_eq!((state.viewport().origin_x, state.viewport().origin_y), (0.0, 0.0));
	}

	#[test]
	fn test_hover_emits_events() {
		let mut state = placed();
		let (x, y) = screen_of(&state, "auth1");
		state.push_input(InputEvent::PointerMove { x, y });
		state.process_inputs();
		let events = state.drain_events();
		assert!(events.contains(&GraphEvent::NodeHoverChanged(Some("auth1".into()))));
		assert!(state.highlight().is_node_lit("art1"));
	}
}
