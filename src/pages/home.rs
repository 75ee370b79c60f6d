use leptos::callback::UnsyncCallback;
use leptos::prelude::*;
use leptos::task::spawn_local;
use leptos_router::hooks::use_query_map;
use serde_json::{Value, json};
use web_sys::{Event, MouseEvent};

use crate::components::knowledge_graph::{
	GraphConfig, GraphEvent, GraphHandle, KnowledgeGraphCanvas, NodeType, fetch_triples,
};

const SCHEMA: &str = "http://schema.org/";

/// A couple of news articles in the `{"data": {key: [s, p, o]}}` shape.
fn sample_triples() -> Value {
	let p = |name: &str| format!("{SCHEMA}{name}");
	let art1 = "http://example.org/article/1";
	let art2 = "http://example.org/article/2";
	let jane = "http://example.org/person/jane_doe";
	let omar = "http://example.org/person/omar_haddad";
	let daily = "http://example.org/org/the_daily";

	json!({
		"data": {
			"0": [art1, p("headline"), "Rivers rise across the valley"],
			"1": [art1, p("author"), jane],
			"2": [art1, p("publisher"), daily],
			"3": [art1, p("inLanguage"), "en"],
			"4": [art1, p("articleSection"), "Environment"],
			"5": [art1, p("keywords"), ["flood", "climate", "weather"]],
			"6": [jane, p("name"), "Jane Doe"],
			"7": [jane, p("jobTitle"), "Science Correspondent"],
			"8": [jane, p("nationality"), "http://example.org/country/Ireland"],
			"9": [daily, p("name"), "The Daily"],
			"10": [art2, p("headline"), "New treaty on water sharing"],
			"11": [art2, p("author"), omar],
			"12": [art2, p("author"), jane],
			"13": [art2, p("publisher"), daily],
			"14": [art2, p("inLanguage"), "en"],
			"15": [art2, p("articleSection"), "Politics"],
			"16": [art2, p("keywords"), ["climate", "diplomacy"]],
			"17": [omar, p("name"), "Omar Haddad"],
			"18": [omar, p("jobTitle"), "Political Editor"],
			"19": [omar, p("nationality"), "http://example.org/country/Jordan"],
			"20": [art2, p("mentions"), "http://example.org/place/Jordan_River"],
		}
	})
}

/// Default Home Page
#[component]
pub fn Home() -> impl IntoView {
	let handle = GraphHandle::new(GraphConfig::default(), js_sys::Date::now() as u64);
	let graph = StoredValue::new_local(handle.clone());

	let status = RwSignal::new(String::new());
	let hovered = RwSignal::new(None::<String>);
	let results = RwSignal::new(Vec::<(String, String)>::new());
	let type_flags = RwSignal::new(Vec::<(NodeType, bool)>::new());
	let articles = RwSignal::new(Vec::<(String, String, bool)>::new());

	// mirror filter state into the controls
	let sync_filters = move || {
		graph.with_value(|g| {
			g.read(|s| {
				let filter = s.filter();
				type_flags.set(
					NodeType::ALL
						.iter()
						.map(|&t| (t, filter.is_type_selected(t)))
						.collect(),
				);
				articles.set(
					s.articles()
						.into_iter()
						.map(|(id, label)| {
							let on = filter.is_article_selected(&id);
							(id, label, on)
						})
						.collect(),
				);
			})
		})
	};

	let describe = move |id: &str| {
		graph.with_value(|g| {
			g.read(|s| {
				s.graph()
					.node(id)
					.map(|n| format!("{} ({})", n.label, n.node_type))
			})
		})
	};

	let on_event = UnsyncCallback::new(move |event: GraphEvent| match event {
		GraphEvent::GraphLoaded { nodes, links } => {
			status.set(format!("{nodes} nodes, {links} links"));
			sync_filters();
		}
		GraphEvent::FilterChanged => sync_filters(),
		GraphEvent::NodeHoverChanged(id) => {
			hovered.set(id.and_then(|id| describe(&id)));
		}
		GraphEvent::SearchResultsChanged(ids) => {
			results.set(
				ids.into_iter()
					.filter_map(|id| describe(&id).map(|text| (id, text)))
					.collect(),
			);
		}
		GraphEvent::LoadFailed(reason) => status.set(format!("Load failed: {reason}")),
	});

	handle.update(|s| s.load_triples(&sample_triples()));

	// `?src=<url>` swaps the sample for a remote payload
	if let Some(src) = use_query_map().get_untracked().get("src") {
		status.set(format!("Loading {src}..."));
		let remote = handle.clone();
		spawn_local(async move {
			match fetch_triples(&src).await {
				Ok(payload) => {
					remote.update(|s| s.load_triples(&payload));
				}
				Err(err) => remote.update(|s| s.report_load_failure(&err)),
			}
		});
	}

	let on_search = move |ev: Event| {
		let term = event_target_value(&ev);
		graph.with_value(|g| {
			g.update(|s| {
				s.search(&term);
			})
		});
	};
	let zoom_in = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.zoom_in()));
	let zoom_out = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.zoom_out()));
	let reset_view = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.reset_view()));
	let clear_highlight = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.reset_highlighting()));
	let toggle_types = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.toggle_all_types()));
	let select_articles = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.select_all_articles()));
	let clear_articles = move |_: MouseEvent| graph.with_value(|g| g.update(|s| s.clear_all_articles()));

	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>

			<div class="fullscreen-graph">
				<KnowledgeGraphCanvas handle=graph.get_value() on_event=on_event fullscreen=true />
				<div class="graph-overlay">
					<h1>"Knowledge Graph"</h1>
					<p class="subtitle">
						"Drag nodes to reposition. Scroll to zoom. Right-drag to pan."
					</p>
					<p class="status">{move || status.get()}</p>

					<section class="search">
						<input type="search" placeholder="Search nodes" on:input=on_search />
						<ul>
							{move || {
								results
									.get()
									.into_iter()
									.map(|(id, text)| {
										view! {
											<li>
												<button on:click=move |_| {
													graph.with_value(|g| g.update(|s| s.highlight_node(&id)))
												}>{text}</button>
											</li>
										}
									})
									.collect_view()
							}}
						</ul>
						<button on:click=clear_highlight>"Clear highlight"</button>
					</section>

					<section class="zoom">
						<button on:click=zoom_in>"+"</button>
						<button on:click=zoom_out>"-"</button>
						<button on:click=reset_view>"Reset"</button>
					</section>

					<section class="types">
						<h2>"Node types"</h2>
						<button on:click=toggle_types>"Toggle all"</button>
						{move || {
							type_flags
								.get()
								.into_iter()
								.map(|(node_type, on)| {
									view! {
										<label>
											<input
												type="checkbox"
												prop:checked=on
												on:change=move |ev| {
													let enabled = event_target_checked(&ev);
													graph.with_value(|g| {
														g.update(|s| s.set_type_filter(node_type, enabled))
													})
												}
											/>
											{node_type.name()}
										</label>
									}
								})
								.collect_view()
						}}
					</section>

					<section class="articles">
						<h2>"Articles"</h2>
						<button on:click=select_articles>"Select all"</button>
						<button on:click=clear_articles>"Clear all"</button>
						{move || {
							articles
								.get()
								.into_iter()
								.map(|(id, label, on)| {
									view! {
										<label>
											<input
												type="checkbox"
												prop:checked=on
												on:change=move |ev| {
													let enabled = event_target_checked(&ev);
													graph.with_value(|g| {
														g.update(|s| s.set_article_filter(&id, enabled))
													})
												}
											/>
											{label}
										</label>
									}
								})
								.collect_view()
						}}
					</section>

					<p class="hovered">
						{move || hovered.get().unwrap_or_else(|| "Hover a node for details".into())}
					</p>

					<ul class="legend">
						{NodeType::ALL
							.iter()
							.map(|&node_type| {
								view! {
									<li>
										<span style=format!(
											"display: inline-block; width: 10px; height: 10px; border-radius: 50%; background: {};",
											node_type.color(),
										) />
										" "
										{node_type.name()}
									</li>
								}
							})
							.collect_view()}
					</ul>
				</div>
			</div>
		</ErrorBoundary>
	}
}
