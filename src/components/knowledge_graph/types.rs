use std::collections::HashMap;
use std::fmt;

/// A normalized subject-predicate-object fact.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Triple {
	pub subject: String,
	pub predicate: String,
	pub object: String,
	pub object_is_uri: bool,
}

impl Triple {
	pub fn new(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
		let object = object.into();
		Self {
			subject: subject.into(),
			predicate: predicate.into(),
			object_is_uri: looks_like_uri(&object),
			object,
		}
	}

	pub fn literal(subject: impl Into<String>, predicate: impl Into<String>, object: impl Into<String>) -> Self {
		Self {
			subject: subject.into(),
			predicate: predicate.into(),
			object: object.into(),
			object_is_uri: false,
		}
	}
}

pub fn looks_like_uri(value: &str) -> bool {
	value.starts_with("http://") || value.starts_with("https://")
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum NodeType {
	Article,
	Publisher,
	Author,
	Language,
	Nationality,
	JobTitle,
	Section,
	Keyword,
	Resource,
}

impl NodeType {
	pub const ALL: [NodeType; 9] = [
		NodeType::Article,
		NodeType::Publisher,
		NodeType::Author,
		NodeType::Language,
		NodeType::Nationality,
		NodeType::JobTitle,
		NodeType::Section,
		NodeType::Keyword,
		NodeType::Resource,
	];

	pub fn name(self) -> &'static str {
		match self {
			NodeType::Article => "Article",
			NodeType::Publisher => "Publisher",
			NodeType::Author => "Author",
			NodeType::Language => "Language",
			NodeType::Nationality => "Nationality",
			NodeType::JobTitle => "JobTitle",
			NodeType::Section => "Section",
			NodeType::Keyword => "Keyword",
			NodeType::Resource => "Resource",
		}
	}

	pub fn color(self) -> &'static str {
		match self {
			NodeType::Article => "#ed8936",
			NodeType::Publisher => "#48bb78",
			NodeType::Author => "#4299e1",
			NodeType::Language => "#9f7aea",
			NodeType::Nationality => "#f56565",
			NodeType::JobTitle => "#38b2ac",
			NodeType::Section => "#ecc94b",
			NodeType::Keyword => "#ed64a6",
			NodeType::Resource => "#a0aec0",
		}
	}
}

impl fmt::Display for NodeType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name())
	}
}

#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub node_type: NodeType,
	pub x: f64,
	pub y: f64,
	pub literal_value: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct Link {
	pub source_id: String,
	pub target_id: String,
	pub predicate_label: String,
}

impl Link {
	pub fn new(source: impl Into<String>, target: impl Into<String>, label: impl Into<String>) -> Self {
		Self {
			source_id: source.into(),
			target_id: target.into(),
			predicate_label: label.into(),
		}
	}

	/// Stable identity used by the scene diff. Separators inside the parts
	/// are escaped so distinct links never share a key.
	pub fn key(&self) -> String {
		let escape = |part: &str| part.replace('\\', "\\\\").replace('|', "\\|");
		format!(
			"{}|{}|{}",
			escape(&self.source_id),
			escape(&self.predicate_label),
			escape(&self.target_id)
		)
	}

	pub fn touches(&self, id: &str) -> bool {
		self.source_id == id || self.target_id == id
	}
}

/// Typed node/link graph. Nodes keep insertion order.
#[derive(Clone, Debug, Default)]
pub struct Graph {
	nodes: Vec<Node>,
	index: HashMap<String, usize>,
	links: Vec<Link>,
}

impl Graph {
	/// Assemble a graph, keeping the first node per id and dropping links
	/// whose endpoints are missing or that repeat an earlier link.
	pub fn from_parts(nodes: Vec<Node>, links: Vec<Link>) -> Self {
		let mut graph = Self::default();
		for node in nodes {
			if graph.index.contains_key(&node.id) {
				continue;
			}
			graph.index.insert(node.id.clone(), graph.nodes.len());
			graph.nodes.push(node);
		}

		let mut seen = std::collections::HashSet::new();
		for link in links {
			if !graph.contains(&link.source_id) || !graph.contains(&link.target_id) {
				continue;
			}
			if seen.insert(link.key()) {
				graph.links.push(link);
			}
		}
		graph
	}

	pub fn nodes(&self) -> &[Node] {
		&self.nodes
	}

	pub fn nodes_mut(&mut self) -> &mut [Node] {
		&mut self.nodes
	}

	pub fn links(&self) -> &[Link] {
		&self.links
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.index.get(id).map(|&i| &self.nodes[i])
	}

	pub fn node_mut(&mut self, id: &str) -> Option<&mut Node> {
		self.index.get(id).map(|&i| &mut self.nodes[i])
	}

	pub fn contains(&self, id: &str) -> bool {
		self.index.contains_key(id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	pub fn link_count(&self) -> usize {
		self.links.len()
	}

	pub fn articles(&self) -> impl Iterator<Item = &Node> {
		self.nodes.iter().filter(|n| n.node_type == NodeType::Article)
	}
}
