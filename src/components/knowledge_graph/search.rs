//! Substring search over nodes and the neighborhood highlight overlay.

use std::collections::HashSet;

use super::types::Graph;

#[derive(Clone, Debug, Default)]
pub struct SearchIndex {
	results: Vec<String>,
}

impl SearchIndex {
	/// Case-insensitive match against label and type name. The term is used
	/// as typed, surrounding whitespace included; only an empty term clears
	/// the results.
	pub fn search(&mut self, graph: &Graph, term: &str) -> &[String] {
		let term = term.to_lowercase();
		self.results = if term.is_empty() {
			Vec::new()
		} else {
			graph
				.nodes()
				.iter()
				.filter(|node| {
					node.label.to_lowercase().contains(&term)
						|| node.node_type.name().to_lowercase().contains(&term)
				})
				.map(|node| node.id.clone())
				.collect()
		};
		&self.results
	}

	pub fn clear(&mut self) {
		self.results.clear();
	}

	pub fn results(&self) -> &[String] {
		&self.results
	}

	pub fn has_results(&self) -> bool {
		!self.results.is_empty()
	}
}

/// Focus nodes plus the derived set of lit nodes and links.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct HighlightState {
	focus: HashSet<String>,
	nodes: HashSet<String>,
	links: HashSet<usize>,
}

impl HighlightState {
	pub fn is_active(&self) -> bool {
		!self.focus.is_empty()
	}

	pub fn is_focus(&self, id: &str) -> bool {
		self.focus.contains(id)
	}

	pub fn is_node_lit(&self, id: &str) -> bool {
		self.nodes.contains(id)
	}

	pub fn is_link_lit(&self, index: usize) -> bool {
		self.links.contains(&index)
	}

	pub fn neighborhood(&self) -> &HashSet<String> {
		&self.nodes
	}

	pub fn reset(&mut self) {
		self.focus.clear();
		self.nodes.clear();
		self.links.clear();
	}

	/// Light `id`, its incident links and their endpoints; everything else fades.
	pub fn highlight_node(&mut self, graph: &Graph, id: &str) {
		self.reset();
		self.extend(graph, id);
	}

	/// Union of the neighborhoods of every id.
	pub fn highlight_all<'a>(&mut self, graph: &Graph, ids: impl IntoIterator<Item = &'a str>) {
		self.reset();
		for id in ids {
			self.extend(graph, id);
		}
	}

	fn extend(&mut self, graph: &Graph, id: &str) {
		if !graph.contains(id) {
			return;
		}
		self.focus.insert(id.to_string());
		self.nodes.insert(id.to_string());
		for (i, link) in graph.links().iter().enumerate() {
			if link.touches(id) {
				self.links.insert(i);
				self.nodes.insert(link.source_id.clone());
				self.nodes.insert(link.target_id.clone());
			}
		}
	}
}
