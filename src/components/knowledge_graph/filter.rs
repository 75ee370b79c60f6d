use std::collections::HashSet;

use super::types::{Graph, NodeType};

/// Indices into the graph that survive the current filter.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VisibleSubgraph {
	nodes: Vec<usize>,
	links: Vec<usize>,
	ids: HashSet<String>,
}

impl VisibleSubgraph {
	pub fn node_indices(&self) -> &[usize] {
		&self.nodes
	}

	pub fn link_indices(&self) -> &[usize] {
		&self.links
	}

	pub fn contains(&self, id: &str) -> bool {
		self.ids.contains(id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}
}

/// Type and article selection.
#[derive(Clone, Debug, Default)]
pub struct FilterIndex {
	selected_types: HashSet<NodeType>,
	selected_articles: HashSet<String>,
	known_articles: HashSet<String>,
}

impl FilterIndex {
	/// Everything selected, as after a fresh build.
	pub fn for_graph(graph: &Graph) -> Self {
		let known_articles: HashSet<String> = graph.articles().map(|n| n.id.clone()).collect();
		Self {
			selected_types: NodeType::ALL.into_iter().collect(),
			selected_articles: known_articles.clone(),
			known_articles,
		}
	}

	pub fn is_type_selected(&self, node_type: NodeType) -> bool {
		self.selected_types.contains(&node_type)
	}

	pub fn is_article_selected(&self, id: &str) -> bool {
		self.selected_articles.contains(id)
	}

	pub fn all_types_selected(&self) -> bool {
		NodeType::ALL.iter().all(|t| self.selected_types.contains(t))
	}

	/// Returns whether the selection changed.
	pub fn set_type(&mut self, node_type: NodeType, enabled: bool) -> bool {
		if enabled {
			self.selected_types.insert(node_type)
		} else {
			self.selected_types.remove(&node_type)
		}
	}

	/// Unknown article ids are ignored.
	pub fn set_article(&mut self, id: &str, enabled: bool) -> bool {
		if !self.known_articles.contains(id) {
			return false;
		}
		if enabled {
			self.selected_articles.insert(id.to_string())
		} else {
			self.selected_articles.remove(id)
		}
	}

	pub fn select_all_articles(&mut self) -> bool {
		let changed = self.selected_articles.len() != self.known_articles.len();
		self.selected_articles = self.known_articles.clone();
		changed
	}

	pub fn clear_all_articles(&mut self) -> bool {
		let changed = !self.selected_articles.is_empty();
		self.selected_articles.clear();
		changed
	}

	/// Select every type unless all already are, in which case clear them.
	pub fn toggle_all(&mut self) {
		if self.all_types_selected() {
			self.selected_types.clear();
		} else {
			self.selected_types = NodeType::ALL.into_iter().collect();
		}
	}

	pub fn apply(&self, graph: &Graph) -> VisibleSubgraph {
		let mut visible = VisibleSubgraph::default();
		for (i, node) in graph.nodes().iter().enumerate() {
			let article_ok = node.node_type != NodeType::Article || self.selected_articles.contains(&node.id);
			if self.selected_types.contains(&node.node_type) && article_ok {
				visible.nodes.push(i);
				visible.ids.insert(node.id.clone());
			}
		}
		for (i, link) in graph.links().iter().enumerate() {
			if visible.ids.contains(&link.source_id) && visible.ids.contains(&link.target_id) {
				visible.links.push(i);
			}
		}
		visible
	}
}

#[cfg(test)]
mod tests {
	use proptest::prelude::*;

	use super::*;
	use crate::components::knowledge_graph::builder::build_graph;
	use crate::components::knowledge_graph::types::Triple;

	fn sample() -> Graph {
		build_graph(&[
			Triple::new("art1", "headline", "Hello"),
			Triple::new("art1", "author", "auth1"),
			Triple::new("auth1", "name", "Jane"),
			Triple::literal("art1", "keywords", "ai"),
			Triple::new("art2", "headline", "World"),
			Triple::literal("art2", "keywords", "ai"),
			Triple::new("art2", "publisher", "pub1"),
		])
	}

	#[test]
	fn test_defaults_to_everything_visible() {
		let graph = sample();
		let visible = FilterIndex::for_graph(&graph).apply(&graph);
		assert_eq!(visible.node_count(), graph.node_count());
		assert_eq!(visible.link_count(), graph.link_count());
	}

	#[test]
	fn test_type_filter_drops_incident_links() {
		let graph = sample();
		let mut filter = FilterIndex::for_graph(&graph);
		assert!(filter.set_type(NodeType::Keyword, false));
		assert!(!filter.set_type(NodeType::Keyword, false));
		let visible = filter.apply(&graph);
		assert!(!visible.contains("keyword_ai"));
		assert!(visible.contains("art1"));
		for &i in visible.link_indices() {
			assert_ne!(graph.links()[i].target_id, "keyword_ai");
		}
	}

	#[test]
	fn test_article_filter() {
		let graph = sample();
		let mut filter = FilterIndex::for_graph(&graph);
		assert!(filter.set_article("art1", false));
		assert!(!filter.set_article("auth1", false));
		let visible = filter.apply(&graph);
		assert!(!visible.contains("art1"));
		assert!(visible.contains("art2"));
		assert!(visible.contains("auth1"));

		assert!(filter.clear_all_articles());
		assert!(!filter.apply(&graph).contains("art2"));
		assert!(filter.select_all_articles());
		assert!(filter.apply(&graph).contains("art1"));
	}

	#[test]
	fn test_toggle_all() {
		let graph = sample();
		let mut filter = FilterIndex::for_graph(&graph);
		filter.toggle_all();
		assert_eq!(filter.apply(&graph).node_count(), 0);
		filter.set_type(NodeType::Author, true);
		filter.toggle_all();
		assert!(filter.all_types_selected());
	}

	proptest! {
		#[test]
		fn prop_filtered_subgraph_is_closed(
			types in prop::collection::vec(any::<bool>(), 9),
			articles in prop::collection::vec(any::<bool>(), 2),
		) {
			let graph = sample();
			let mut filter = FilterIndex::for_graph(&graph);
			for (t, on) in NodeType::ALL.iter().zip(types) {
				filter.set_type(*t, on);
			}
			for (id, on) in ["art1", "art2"].iter().zip(articles) {
				filter.set_article(id, on);
			}
			let visible = filter.apply(&graph);
			for &i in visible.node_indices() {
				prop_assert!(i < graph.node_count());
				prop_assert!(filter.is_type_selected(graph.nodes()[i].node_type));
			}
			for &i in visible.link_indices() {
				let link = &graph.links()[i];
				prop_assert!(visible.contains(&link.source_id));
				prop_assert!(visible.contains(&link.target_id));
			}
		}
	}
}
