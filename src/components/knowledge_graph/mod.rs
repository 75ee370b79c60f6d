//! Knowledge-graph engine and its canvas component.
//!
//! Raw triple payloads flow through [`ingest`] and [`build_graph`] into a
//! [`Graph`], get placed by the [`LayoutEngine`], and are then driven by
//! [`KnowledgeGraphState`]: filtering, search highlighting, viewport and
//! pointer interaction. Each frame the state is projected into a [`Scene`]
//! whose diffs feed the canvas.

mod builder;
mod component;
mod config;
mod error;
mod fetch;
mod filter;
mod ingest;
mod interaction;
mod layout;
mod render;
mod scene;
mod search;
mod state;
mod types;
mod viewport;

pub use builder::{build_graph, derive_label};
pub use component::{GraphHandle, KnowledgeGraphCanvas};
pub use config::GraphConfig;
pub use error::{FetchError, IngestError, RecordError};
pub use fetch::fetch_triples;
pub use filter::{FilterIndex, VisibleSubgraph};
pub use ingest::{IngestReport, ingest};
pub use interaction::{InputEvent, Interaction, InteractionController, PointerButton};
pub use layout::LayoutEngine;
pub use render::CanvasTarget;
pub use scene::{RenderTarget, Scene, SceneChange, diff};
pub use search::{HighlightState, SearchIndex};
pub use state::{GraphEvent, KnowledgeGraphState};
pub use types::{Graph, Link, Node, NodeType, Triple};
pub use viewport::ViewportController;
