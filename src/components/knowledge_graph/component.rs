use std::cell::RefCell;
use std::rc::Rc;

use leptos::callback::{Callable, UnsyncCallback};
use leptos::prelude::*;
use log::warn;
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, MouseEvent, WheelEvent, Window};

use super::config::GraphConfig;
use super::interaction::{InputEvent, PointerButton};
use super::render::CanvasTarget;
use super::scene::{RenderTarget, diff};
use super::state::{GraphEvent, KnowledgeGraphState};

/// Shared, single-threaded access to the graph state.
#[derive(Clone)]
pub struct GraphHandle(Rc<RefCell<KnowledgeGraphState>>);

impl GraphHandle {
	pub fn new(config: GraphConfig, seed: u64) -> Self {
		Self(Rc::new(RefCell::new(KnowledgeGraphState::new(config, seed))))
	}

	pub fn update<R>(&self, f: impl FnOnce(&mut KnowledgeGraphState) -> R) -> R {
		f(&mut self.0.borrow_mut())
	}

	pub fn read<R>(&self, f: impl FnOnce(&KnowledgeGraphState) -> R) -> R {
		f(&self.0.borrow())
	}
}

#[component]
pub fn KnowledgeGraphCanvas(
	handle: GraphHandle,
	#[prop(optional)] on_event: Option<UnsyncCallback<GraphEvent>>,
	#[prop(default = false)] fullscreen: bool,
	#[prop(default = None)] width: Option<f64>,
	#[prop(default = None)] height: Option<f64>,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let target = Rc::new(RefCell::new(CanvasTarget::new(
		handle.read(|s| s.config().node_radius),
	)));
	let animate: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let resize_cb: Rc<RefCell<Option<Closure<dyn FnMut()>>>> = Rc::new(RefCell::new(None));
	let (state_init, animate_init, resize_cb_init) =
		(handle.clone(), animate.clone(), resize_cb.clone());

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = if fullscreen {
			window_size(&window).unwrap_or((800.0, 600.0))
		} else {
			let parent = canvas.parent_element();
			(
				width.unwrap_or_else(|| parent.as_ref().map(|p| p.client_width() as f64).unwrap_or(800.0)),
				height.unwrap_or_else(|| parent.as_ref().map(|p| p.client_height() as f64).unwrap_or(600.0)),
			)
		};
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		state_init.update(|s| s.resize(w, h));

		let Some(ctx) = context_2d(&canvas) else {
			warn!("canvas 2d context unavailable");
			return;
		};

		if fullscreen {
			let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
			*resize_cb_init.borrow_mut() = Some(Closure::new(move || {
				let Some((nw, nh)) = web_sys::window().as_ref().and_then(window_size) else {
					return;
				};
				canvas_resize.set_width(nw as u32);
				canvas_resize.set_height(nh as u32);
				state_resize.update(|s| s.resize(nw, nh));
			}));
			if let Some(ref cb) = *resize_cb_init.borrow() {
				let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
			}
		}

		let (state_anim, target_anim, animate_inner) =
			(state_init.clone(), target.clone(), animate_init.clone());
		let on_event = on_event.clone();
		*animate_init.borrow_mut() = Some(Closure::new(move || {
			let (events, next) = state_anim.update(|s| {
				s.process_inputs();
				let next = s.take_dirty().then(|| s.scene());
				(s.drain_events(), next)
			});

			// resizing marks the state dirty, so an unchanged scene needs no repaint
			if let Some(next) = next {
				let mut target = target_anim.borrow_mut();
				let changes = diff(target.scene(), &next);
				target.apply(&changes);
				target.draw(&ctx, canvas.width() as f64, canvas.height() as f64);
				target.sync_cursor(&canvas);
			}

			// callbacks may reach back into the state, so the borrow is released first
			if let Some(cb) = on_event.as_ref() {
				for event in events {
					cb.run(event);
				}
			}

			if let Some(ref cb) = *animate_inner.borrow() {
				if let Some(win) = web_sys::window() {
					let _ = win.request_animation_frame(cb.as_ref().unchecked_ref());
				}
			}
		}));
		if let Some(ref cb) = *animate_init.borrow() {
			let _ = window.request_animation_frame(cb.as_ref().unchecked_ref());
		}
	});

	let state_md = handle.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_point(canvas_ref, &ev) else {
			return;
		};
		let button = PointerButton::from_index(ev.button());
		if button != PointerButton::Primary {
			ev.prevent_default();
		}
		state_md.update(|s| s.push_input(InputEvent::PointerDown { button, x, y }));
	};

	let state_mm = handle.clone();
	let on_mousemove = move |ev: MouseEvent| {
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			state_mm.update(|s| s.push_input(InputEvent::PointerMove { x, y }));
		}
	};

	let state_mu = handle.clone();
	let on_mouseup = move |_: MouseEvent| {
		state_mu.update(|s| s.push_input(InputEvent::PointerUp));
	};

	let state_ml = handle.clone();
	let on_mouseleave = move |_: MouseEvent| {
		state_ml.update(|s| s.push_input(InputEvent::PointerLeave));
	};

	let state_wh = handle;
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		if let Some((x, y)) = local_point(canvas_ref, &ev) {
			// scrolling up magnifies
			let delta = -ev.delta_y();
			state_wh.update(|s| s.push_input(InputEvent::Wheel { delta, x, y }));
		}
	};

	let on_contextmenu = |ev: MouseEvent| ev.prevent_default();

	view! {
		<canvas
			node_ref=canvas_ref
			class="knowledge-graph-canvas"
			on:mousedown=on_mousedown
			on:mousemove=on_mousemove
			on:mouseup=on_mouseup
			on:mouseleave=on_mouseleave
			on:wheel=on_wheel
			on:contextmenu=on_contextmenu
			style="display: block; cursor: grab;"
		/>
	}
}

fn window_size(window: &Window) -> Option<(f64, f64)> {
	Some((
		window.inner_width().ok()?.as_f64()?,
		window.inner_height().ok()?.as_f64()?,
	))
}

fn context_2d(canvas: &HtmlCanvasElement) -> Option<CanvasRenderingContext2d> {
	canvas.get_context("2d").ok()??.dyn_into().ok()
}

/// Pointer position relative to the canvas' top-left corner.
fn local_point(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}
