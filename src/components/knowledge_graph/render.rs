use std::f64::consts::PI;

use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, HtmlElement};

use super::scene::{LinkScene, NodeScene, RenderTarget, Scene, SceneChange};

const BACKGROUND: &str = "#1a1a2e";
const LINK_RGB: &str = "153, 153, 153";
const LABEL_RGB: &str = "255, 255, 255";

/// Canvas render target: keeps a retained scene fed by diffs and repaints
/// it on demand.
pub struct CanvasTarget {
	scene: Scene,
	node_radius: f64,
}

impl RenderTarget for CanvasTarget {
	fn apply(&mut self, changes: &[SceneChange]) {
		self.scene.apply(changes);
	}
}

impl CanvasTarget {
	pub fn new(node_radius: f64) -> Self {
		Self {
			scene: Scene::default(),
			node_radius,
		}
	}

	pub fn scene(&self) -> &Scene {
		&self.scene
	}

	/// `grabbing` while a node is dragged, `grab` otherwise.
	pub fn sync_cursor(&self, canvas: &HtmlCanvasElement) {
		let cursor = if self.scene.dragging { "grabbing" } else { "grab" };
		let _ = HtmlElement::style(canvas).set_property("cursor", cursor);
	}

	pub fn draw(&self, ctx: &CanvasRenderingContext2d, width: f64, height: f64) {
		let (vx, vy, vw, _) = self.scene.viewbox;
		let k = if vw > 0.0 { width / vw } else { 1.0 };

		ctx.set_fill_style_str(BACKGROUND);
		ctx.fill_rect(0.0, 0.0, width, height);
		ctx.save();
		let _ = ctx.scale(k, k);
		let _ = ctx.translate(-vx, -vy);
		for link in &self.scene.links {
			draw_link(ctx, link, self.node_radius, k);
		}
		for node in &self.scene.nodes {
			draw_node(ctx, node, k);
		}
		ctx.restore();
	}
}

fn draw_link(ctx: &CanvasRenderingContext2d, link: &LinkScene, rim: f64, k: f64) {
	let ((x1, y1), (x2, y2)) = (link.from, link.to);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	ctx.set_stroke_style_str(&format!("rgba({LINK_RGB}, {})", link.opacity));
	ctx.set_line_width(link.width);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();

	// arrow head stops at the target's rim
	let (ux, uy) = (dx / dist, dy / dist);
	let arrow_size = 8.0 + link.width;
	let (tip_x, tip_y) = (x2 - ux * rim, y2 - uy * rim);
	let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
	let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
	ctx.set_fill_style_str(&format!("rgba({LINK_RGB}, {})", link.opacity));
	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();

	ctx.set_fill_style_str(&format!("rgba({LABEL_RGB}, {})", 0.7 * link.opacity));
	ctx.set_font(&format!("{}px sans-serif", 10.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&link.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0);
}

fn draw_node(ctx: &CanvasRenderingContext2d, node: &NodeScene, k: f64) {
	ctx.set_global_alpha(node.opacity);
	ctx.begin_path();
	let _ = ctx.arc(node.x, node.y, node.radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(node.node_type.color());
	ctx.fill();

	if node.stroked {
		ctx.set_stroke_style_str("#000");
		ctx.set_line_width(3.0);
		ctx.stroke();
	}

	ctx.set_fill_style_str(&format!("rgb({LABEL_RGB})"));
	ctx.set_font(&format!("{}px sans-serif", 12.0 / k.max(0.5)));
	ctx.set_text_align("center");
	let _ = ctx.fill_text(&node.label, node.x, node.y + node.radius + 12.0);
	ctx.set_global_alpha(1.0);
}
