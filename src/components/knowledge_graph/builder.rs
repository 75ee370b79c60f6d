//! Triple → typed graph conversion.
//!
//! Building happens in two pure steps: triples are folded into [`Facts`],
//! then the facts are mapped onto typed nodes. Nothing is mutated through
//! shared references along the way.

use std::borrow::Cow;
use std::collections::{HashMap, HashSet};

use log::debug;

use super::types::{Graph, Link, Node, NodeType, Triple};

/// Literal-valued predicates that synthesize a shared category node.
#[derive(Clone, Copy, Debug)]
struct Category {
	prefix: &'static str,
	node_type: NodeType,
	relation: &'static str,
}

const CATEGORIES: &[(&str, Category)] = &[
	(
		"inLanguage",
		Category {
			prefix: "language",
			node_type: NodeType::Language,
			relation: "in language",
		},
	),
	(
		"nationality",
		Category {
			prefix: "nationality",
			node_type: NodeType::Nationality,
			relation: "has nationality",
		},
	),
	(
		"jobTitle",
		Category {
			prefix: "job_title",
			node_type: NodeType::JobTitle,
			relation: "has job title",
		},
	),
	(
		"articleSection",
		Category {
			prefix: "section",
			node_type: NodeType::Section,
			relation: "in section",
		},
	),
	(
		"keywords",
		Category {
			prefix: "keyword",
			node_type: NodeType::Keyword,
			relation: "has keyword",
		},
	),
];

fn category_for(predicate: &str) -> Option<Category> {
	CATEGORIES
		.iter()
		.find(|(name, _)| *name == predicate)
		.map(|(_, category)| *category)
}

#[derive(Clone, Debug)]
enum Slot {
	Entity(String),
	Category {
		id: String,
		node_type: NodeType,
		label: String,
	},
}

/// Everything learned from one pass over the triples.
#[derive(Clone, Debug, Default)]
pub struct Facts {
	slots: Vec<Slot>,
	seen: HashSet<String>,
	links: Vec<Link>,
	headlines: HashMap<String, String>,
	publishers: HashSet<String>,
	authors: HashSet<String>,
	names: HashMap<String, String>,
}

impl Facts {
	pub fn collect(triples: &[Triple]) -> Self {
		triples.iter().fold(Self::default(), Self::absorb)
	}

	fn absorb(mut self, triple: &Triple) -> Self {
		let subject = triple.subject.as_str();
		self.entity(subject);

		let predicate = local_name(&triple.predicate);
		match predicate {
			"headline" => {
				self.headlines
					.insert(subject.into(), clean_literal(&triple.object));
			}
			"name" => {
				self.names
					.entry(subject.into())
					.or_insert_with(|| clean_literal(&triple.object));
			}
			"publisher" | "author" => {
				let object = triple.object.as_str();
				self.entity(object);
				let relation = if predicate == "publisher" {
					&mut self.publishers
				} else {
					&mut self.authors
				};
				relation.insert(object.into());
				self.links.push(Link::new(subject, object, predicate));
			}
			other => {
				if let Some(category) = category_for(other) {
					let value = if triple.object_is_uri {
						derive_label(&triple.object)
					} else {
						clean_literal(&triple.object)
					};
					let id = format!("{}_{}", category.prefix, value);
					if self.seen.insert(id.clone()) {
						self.slots.push(Slot::Category {
							id: id.clone(),
							node_type: category.node_type,
							label: value,
						});
					}
					self.links.push(Link::new(subject, id, category.relation));
				} else if triple.object_is_uri {
					self.entity(&triple.object);
					self.links.push(Link::new(subject, triple.object.as_str(), other));
				}
			}
		}
		self
	}

	fn entity(&mut self, id: &str) {
		if self.seen.insert(id.into()) {
			self.slots.push(Slot::Entity(id.into()));
		}
	}

	/// Resolve the final type and label of every collected node.
	pub fn into_graph(self) -> Graph {
		let Facts {
			slots,
			links,
			headlines,
			publishers,
			authors,
			names,
			..
		} = self;

		let nodes = slots
			.into_iter()
			.map(|slot| match slot {
				Slot::Category {
					id,
					node_type,
					label,
				} => Node {
					id,
					literal_value: Some(label.clone()),
					label,
					node_type,
					x: 0.0,
					y: 0.0,
				},
				Slot::Entity(id) => {
					let (node_type, label, literal_value) = if let Some(headline) = headlines.get(&id) {
						(NodeType::Article, headline.clone(), Some(headline.clone()))
					} else if let Some(name) = names.get(&id).filter(|_| publishers.contains(&id)) {
						(NodeType::Publisher, name.clone(), None)
					} else if let Some(name) = names.get(&id).filter(|_| authors.contains(&id)) {
						(NodeType::Author, name.clone(), None)
					} else {
						(NodeType::Resource, derive_label(&id), None)
					};
					Node {
						id,
						label,
						node_type,
						x: 0.0,
						y: 0.0,
						literal_value,
					}
				}
			})
			.collect();

		Graph::from_parts(nodes, links)
	}
}

pub fn build_graph(triples: &[Triple]) -> Graph {
	let graph = Facts::collect(triples).into_graph();
	debug!(
		"built graph: {} nodes, {} links from {} triples",
		graph.node_count(),
		graph.link_count(),
		triples.len()
	);
	graph
}

fn local_name(predicate: &str) -> &str {
	predicate.rsplit(['/', '#']).next().unwrap_or(predicate)
}

/// Unwrap an RDF-serialized literal; any other text is kept verbatim.
fn clean_literal(raw: &str) -> String {
	serialized_literal(raw.trim()).unwrap_or(raw).to_string()
}

/// Inner text of `"text"`, `"text"@lang` or `"text"^^<datatype>`.
fn serialized_literal(text: &str) -> Option<&str> {
	let (inner, suffix) = text.strip_prefix('"')?.rsplit_once('"')?;
	let tagged = match suffix.strip_prefix('@') {
		Some(lang) => !lang.is_empty() && lang.chars().all(|c| c.is_ascii_alphanumeric() || c == '-'),
		None => suffix.is_empty() || suffix.starts_with("^^"),
	};
	tagged.then_some(inner)
}

/// Human-readable label for an identifier that has no better name.
pub fn derive_label(raw: &str) -> String {
	if let Some(inner) = serialized_literal(raw.trim()) {
		return inner.to_string();
	}
	let unquoted = raw.trim().trim_matches('"');
	let segment = unquoted
		.trim_end_matches(['/', '#'])
		.rsplit(['/', '#'])
		.next()
		.unwrap_or(unquoted);
	if segment.is_empty() {
		return unquoted.to_string();
	}
	let decoded = urlencoding::decode(segment).unwrap_or(Cow::Borrowed(segment));
	decoded.replace('_', " ")
}

#[cfg(test)]
mod tests {
	use std::collections::HashSet;

	use super::*;

	fn t(s: &str, p: &str, o: &str) -> Triple {
		Triple::new(s, p, o)
	}

	#[test]
	fn test_article_author_example() {
		let graph = build_graph(&[
			t("art1", "headline", "Hello"),
			t("art1", "author", "auth1"),
			t("auth1", "name", "Jane"),
		]);

		assert_eq!(graph.node_count(), 2);
		let art = graph.node("art1").unwrap();
		assert_eq!(art.node_type, NodeType::Article);
		assert_eq!(art.label, "Hello");
		assert_eq!(art.literal_value.as_deref(), Some("Hello"));

		let auth = graph.node("auth1").unwrap();
		assert_eq!(auth.node_type, NodeType::Author);
		assert_eq!(auth.label, "Jane");

		assert_eq!(graph.links(), &[Link::new("art1", "auth1", "author")]);
	}

	#[test]
	fn test_keywords_create_shared_category_nodes() {
		let graph = build_graph(&[
			Triple::literal("art1", "keywords", "ai"),
			Triple::literal("art1", "keywords", "news"),
			Triple::literal("art2", "http://schema.org/keywords", "ai"),
		]);

		for id in ["keyword_ai", "keyword_news"] {
			let node = graph.node(id).unwrap();
			assert_eq!(node.node_type, NodeType::Keyword);
		}
		assert_eq!(graph.node("keyword_ai").unwrap().label, "ai");
		let keyword_links = graph
			.links()
			.iter()
			.filter(|l| l.predicate_label == "has keyword")
			.count();
		assert_eq!(keyword_links, 3);
		assert_eq!(graph.nodes().iter().filter(|n| n.node_type == NodeType::Keyword).count(), 2);
	}

	#[test]
	fn test_category_predicates() {
		let graph = build_graph(&[
			Triple::literal("art1", "inLanguage", "en"),
			Triple::literal("art1", "articleSection", "World"),
			Triple::literal("auth1", "nationality", "Romanian"),
			Triple::literal("auth1", "jobTitle", "Reporter"),
		]);
		assert_eq!(graph.node("language_en").unwrap().node_type, NodeType::Language);
		assert_eq!(graph.node("section_World").unwrap().node_type, NodeType::Section);
		assert_eq!(graph.node("nationality_Romanian").unwrap().node_type, NodeType::Nationality);
		assert_eq!(graph.node("job_title_Reporter").unwrap().node_type, NodeType::JobTitle);
		let labels: HashSet<_> = graph.links().iter().map(|l| l.predicate_label.as_str()).collect();
		assert!(labels.contains("in language"));
		assert!(labels.contains("has job title"));
	}

	#[test]
	fn test_publisher_needs_a_name() {
		let graph = build_graph(&[
			t("art1", "publisher", "pub1"),
			t("pub1", "name", "Daily"),
			t("art1", "publisher", "https://example.org/org/Unnamed_Press"),
		]);
		let named = graph.node("pub1").unwrap();
		assert_eq!(named.node_type, NodeType::Publisher);
		assert_eq!(named.label, "Daily");

		let unnamed = graph.node("https://example.org/org/Unnamed_Press").unwrap();
		assert_eq!(unnamed.node_type, NodeType::Resource);
		assert_eq!(unnamed.label, "Unnamed Press");
	}

	#[test]
	fn test_headline_takes_precedence() {
		let graph = build_graph(&[
			t("x", "author", "y"),
			t("y", "headline", "Also an article"),
			t("y", "name", "Y"),
		]);
		assert_eq!(graph.node("y").unwrap().node_type, NodeType::Article);
	}

	#[test]
	fn test_other_uri_objects_link_placeholders() {
		let graph = build_graph(&[
			t("art1", "http://schema.org/image", "https://cdn.example.org/img/Cover%20Photo.jpg"),
			t("art1", "datePublished", "2024-01-01"),
		]);
		assert_eq!(graph.node_count(), 2);
		let image = graph.node("https://cdn.example.org/img/Cover%20Photo.jpg").unwrap();
		assert_eq!(image.label, "Cover Photo.jpg");
		assert_eq!(graph.links()[0].predicate_label, "image");
	}

	#[test]
	fn test_ids_unique_and_links_closed() {
		let graph = build_graph(&[
			t("a", "author", "b"),
			t("a", "author", "b"),
			t("b", "author", "a"),
			Triple::literal("a", "keywords", "k"),
			Triple::literal("b", "keywords", "k"),
		]);
		let ids: HashSet<_> = graph.nodes().iter().map(|n| &n.id).collect();
		assert_eq!(ids.len(), graph.node_count());
		for link in graph.links() {
			assert!(graph.contains(&link.source_id));
			assert!(graph.contains(&link.target_id));
		}
		assert_eq!(graph.link_count(), 4);
	}

	#[test]
	fn test_derive_label() {
		assert_eq!(derive_label("http://example.org/people/Jane_Doe"), "Jane Doe");
		assert_eq!(derive_label("http://example.org/ns#Topic_A"), "Topic A");
		assert_eq!(derive_label("http://example.org/trailing/"), "trailing");
		assert_eq!(derive_label("\"2024\"^^<http://www.w3.org/2001/XMLSchema#gYear>"), "2024");
		assert_eq!(derive_label("caf%C3%A9_au_lait"), "café au lait");
		assert_eq!(derive_label("auth1"), "auth1");
	}

	#[test]
	fn test_clean_literal() {
		assert_eq!(clean_literal("\"Hello\"@en"), "Hello");
		assert_eq!(clean_literal("\"42\"^^xsd:integer"), "42");
		assert_eq!(clean_literal("plain"), "plain");
		assert_eq!(clean_literal("\"quoted\""), "quoted");
	}

	#[test]
	fn test_plain_literals_keep_quotes_and_carets() {
		let graph = build_graph(&[
			t("art1", "headline", "\"Yes\" vote wins in landslide"),
			t("art2", "headline", "Emoticons ^^ are back"),
			t("p1", "name", "\"Weird Al\" Yankovic"),
			t("art1", "author", "p1"),
			t("art3", "headline", "\"Quoted\"@en"),
		]);
		let art1 = graph.node("art1").unwrap();
		assert_eq!(art1.label, "\"Yes\" vote wins in landslide");
		assert_eq!(art1.literal_value.as_deref(), Some("\"Yes\" vote wins in landslide"));
		assert_eq!(graph.node("art2").unwrap().label, "Emoticons ^^ are back");
		assert_eq!(graph.node("p1").unwrap().label, "\"Weird Al\" Yankovic");
		assert_eq!(graph.node("art3").unwrap().label, "Quoted");
	}
}
