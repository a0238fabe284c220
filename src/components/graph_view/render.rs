use std::collections::HashSet;
use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ViewerState;
use super::types::{Edge, Node};

const BACKGROUND: &str = "#fafafa";
const ARROW_LENGTH: f64 = 10.0;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeStyle {
	pub fill: &'static str,
	pub border: &'static str,
	pub line_width: f64,
	pub text: &'static str,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct EdgeStyle {
	pub stroke: &'static str,
	pub line_width: f64,
	pub dashed: bool,
}

/// Fill: scheduled > highlighted > hovered > default. Border: selected > default.
pub fn node_style(node: &Node) -> NodeStyle {
	let fill = if node.scheduled {
		"#4CAF50"
	} else if node.highlighted {
		"#FFD700"
	} else if node.hovered {
		"#BBBBBB"
	} else {
		"#e0e0e0"
	};
	let (border, line_width) = if node.selected {
		("#2196F3", 3.0)
	} else {
		("#666", 2.0)
	};
	NodeStyle {
		fill,
		border,
		line_width,
		text: "#333",
	}
}

/// Selected > highlighted > touches a scheduled node > default.
pub fn edge_style(edge: &Edge, from: &Node, to: &Node) -> EdgeStyle {
	if edge.selected {
		EdgeStyle {
			stroke: "#2196F3",
			line_width: 3.0,
			dashed: false,
		}
	} else if edge.highlighted {
		EdgeStyle {
			stroke: "#FF6B35",
			line_width: 2.0,
			dashed: true,
		}
	} else if from.scheduled || to.scheduled {
		EdgeStyle {
			stroke: "#4CAF50",
			line_width: 3.0,
			dashed: false,
		}
	} else {
		EdgeStyle {
			stroke: "#999",
			line_width: 2.0,
			dashed: false,
		}
	}
}

pub fn render(state: &ViewerState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);

	let visible = state.visible_nodes();
	ctx.save();
	let _ = ctx.translate(state.camera.x, state.camera.y);
	let _ = ctx.scale(state.camera.zoom(), state.camera.zoom());
	draw_edges(state, &visible, ctx);
	draw_nodes(&visible, ctx);
	ctx.restore();
}

/// Edges with at least one visible endpoint. Dangling edges are skipped.
fn draw_edges(state: &ViewerState, visible: &[&Node], ctx: &CanvasRenderingContext2d) {
	let visible: HashSet<&str> = visible.iter().map(|n| n.id.as_str()).collect();

	for edge in state.model.edges() {
		if !visible.contains(edge.from_id.as_str()) && !visible.contains(edge.to_id.as_str()) {
			continue;
		}
		let (Some(from), Some(to)) = (state.model.node(&edge.from_id), state.model.node(&edge.to_id))
		else {
			continue;
		};

		let style = edge_style(edge, from, to);
		let (x1, y1) = (from.x, from.y + from.height() / 2.0);
		let (x2, y2) = (to.x, to.y - to.height() / 2.0);

		ctx.set_stroke_style_str(style.stroke);
		ctx.set_line_width(style.line_width);
		if style.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(&6.0.into(), &4.0.into()));
		}
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2, y2);
		ctx.stroke();
		if style.dashed {
			let _ = ctx.set_line_dash(&js_sys::Array::new());
		}

		let angle = (y2 - y1).atan2(x2 - x1);
		ctx.begin_path();
		for side in [-PI / 6.0, PI / 6.0] {
			ctx.move_to(x2, y2);
			ctx.line_to(
				x2 - ARROW_LENGTH * (angle + side).cos(),
				y2 - ARROW_LENGTH * (angle + side).sin(),
			);
		}
		ctx.stroke();
	}
}

fn draw_nodes(visible: &[&Node], ctx: &CanvasRenderingContext2d) {
	ctx.set_font("12px Arial");
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");

	for node in visible {
		let style = node_style(node);
		let bounds = node.bounds();

		ctx.set_fill_style_str(style.fill);
		ctx.fill_rect(bounds.left, bounds.top, node.width(), node.height());
		ctx.set_stroke_style_str(style.border);
		ctx.set_line_width(style.line_width);
		ctx.stroke_rect(bounds.left, bounds.top, node.width(), node.height());

		ctx.set_fill_style_str(style.text);
		let _ = ctx.fill_text(&node.label, node.x, node.y);
	}
}
