use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{CanvasState, HANDLE_RADIUS, node_size};
use crate::editor::Selection;
use crate::topology::{DeviceNode, Topology};

const BACKGROUND: &str = "#f8fafc";
const GRID_DOT: &str = "#cbd5e1";
const GRID_GAP: f64 = 12.0;
const ACCENT: &str = "#2563eb";
const EDGE_COLOR: &str = "#94a3b8";
const CARD_BORDER: &str = "#e2e8f0";
const TEXT: &str = "#0f172a";
const MUTED_TEXT: &str = "#64748b";
const MUTED_FILL: &str = "#f1f5f9";
const NOTES_LINE_CHARS: usize = 28;
const MINIMAP_W: f64 = 200.0;
const MINIMAP_H: f64 = 140.0;
const MINIMAP_MARGIN: f64 = 12.0;

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(
	state: &CanvasState,
	graph: &Topology,
	selection: &Selection,
	ctx: &CanvasRenderingContext2d,
) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx);
	draw_edges(state, graph, selection, ctx);
	draw_connection_preview(state, graph, ctx);
	for node in &graph.nodes {
		let selected = selection.node_id() == Some(node.id.as_str());
		draw_device(state, node, selected, ctx);
	}
	ctx.restore();
	draw_minimap(state, graph, ctx);
}

fn draw_grid(state: &CanvasState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	// Too dense to be useful when zoomed far out.
	if GRID_GAP * k < 4.0 {
		return;
	}
	let (x0, y0) = state.screen_to_graph(0.0, 0.0);
	let (x1, y1) = state.screen_to_graph(state.width, state.height);
	let size = 1.0 / k;
	ctx.set_fill_style_str(GRID_DOT);
	let mut gx = (x0 / GRID_GAP).floor() * GRID_GAP;
	while gx <= x1 {
		let mut gy = (y0 / GRID_GAP).floor() * GRID_GAP;
		while gy <= y1 {
			ctx.fill_rect(gx - size / 2.0, gy - size / 2.0, size, size);
			gy += GRID_GAP;
		}
		gx += GRID_GAP;
	}
}

fn draw_edges(
	state: &CanvasState,
	graph: &Topology,
	selection: &Selection,
	ctx: &CanvasRenderingContext2d,
) {
	let k = state.transform.k;
	let (dash, gap, arrow_size) = (5.0, 5.0, 8.0);
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let t = ease_out_cubic(state.hover.highlight_t);

	for edge in &graph.edges {
		// Dangling links have nowhere to be drawn.
		let Some(((x1, y1), (x2, y2))) = state.edge_endpoints(graph, edge) else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = dx.hypot(dy);
		if dist < 0.001 {
			continue;
		}

		let selected = selection.edge_id() == Some(edge.id.as_str());
		let highlighted = state.is_highlighted(&edge.source) && state.is_highlighted(&edge.target);
		let (color, alpha, width) = if selected {
			(ACCENT, 1.0, 2.5)
		} else if highlighted {
			(ACCENT, 0.6 + 0.4 * t, 1.5 + 0.5 * t)
		} else {
			(EDGE_COLOR, 1.0 - 0.5 * t, 1.5)
		};

		ctx.set_global_alpha(alpha);
		ctx.set_stroke_style_str(color);
		ctx.set_line_width(width);
		if edge.animated {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * arrow_size, y2 - uy * arrow_size);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(color);
		let (back_x, back_y) = (x2 - ux * arrow_size, y2 - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();
		ctx.set_global_alpha(1.0);

		let label = edge.label_text();
		if !label.is_empty() {
			let (mx, my) = ((x1 + x2) / 2.0, (y1 + y2) / 2.0);
			ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
			let text_w = ctx.measure_text(label).map(|m| m.width()).unwrap_or(0.0);
			ctx.set_fill_style_str("white");
			ctx.fill_rect(mx - text_w / 2.0 - 4.0, my - 9.0, text_w + 8.0, 16.0);
			ctx.set_fill_style_str(TEXT);
			let _ = ctx.fill_text(label, mx - text_w / 2.0, my + 3.0);
		}
	}
}

fn draw_connection_preview(state: &CanvasState, graph: &Topology, ctx: &CanvasRenderingContext2d) {
	let Some(source) = state.connect.source.as_deref().and_then(|id| graph.node(id)) else {
		return;
	};
	let (x1, y1) = state.source_handle(source);
	let (x2, y2) = state.screen_to_graph(state.connect.cursor_x, state.connect.cursor_y);
	ctx.set_stroke_style_str(ACCENT);
	ctx.set_line_width(1.5 / state.transform.k);
	ctx.begin_path();
	ctx.move_to(x1, y1);
	ctx.line_to(x2, y2);
	ctx.stroke();
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}

fn draw_device(state: &CanvasState, node: &DeviceNode, selected: bool, ctx: &CanvasRenderingContext2d) {
	let p = state.node_position(node);
	let (w, h) = node_size(node);
	let t = ease_out_cubic(state.hover.highlight_t);
	let dimmed = state.hover.node.is_some() && !state.is_highlighted(&node.id);

	ctx.set_global_alpha(if dimmed { 1.0 - 0.4 * t } else { 1.0 });
	rounded_rect(ctx, p.x, p.y, w, h, 6.0);
	ctx.set_fill_style_str("white");
	ctx.fill();
	ctx.set_stroke_style_str(if selected { ACCENT } else { CARD_BORDER });
	ctx.set_line_width(if selected { 2.0 } else { 1.0 });
	ctx.stroke();

	// icon badge and label
	let (icon_x, icon_y) = (p.x + 28.0, p.y + 26.0);
	ctx.begin_path();
	let _ = ctx.arc(icon_x, icon_y, 16.0, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(MUTED_FILL);
	ctx.fill();
	ctx.set_font("16px sans-serif");
	ctx.set_fill_style_str(TEXT);
	let _ = ctx.fill_text(node.data.kind.icon(), icon_x - 9.0, icon_y + 6.0);
	ctx.set_font("600 14px sans-serif");
	let _ = ctx.fill_text_with_max_width(&node.data.label, p.x + 52.0, p.y + 31.0, w - 62.0);

	let mut y = p.y + 52.0;
	if !node.data.ip.is_empty() {
		rounded_rect(ctx, p.x + 12.0, y - 4.0, w - 24.0, 20.0, 3.0);
		ctx.set_fill_style_str(MUTED_FILL);
		ctx.fill();
		ctx.set_font("12px sans-serif");
		ctx.set_fill_style_str(TEXT);
		let _ = ctx.fill_text(&format!("IP: {}", node.data.ip), p.x + 20.0, y + 10.0);
		y += 26.0;
	}
	if !node.data.notes.is_empty() {
		ctx.set_font("12px sans-serif");
		ctx.set_fill_style_str(MUTED_TEXT);
		for (i, line) in notes_preview(&node.data.notes, NOTES_LINE_CHARS).iter().enumerate() {
			let _ = ctx.fill_text(line, p.x + 12.0, y + 8.0 + i as f64 * 14.0);
		}
	}

	for (hx, hy) in [state.target_handle(node), state.source_handle(node)] {
		ctx.begin_path();
		let _ = ctx.arc(hx, hy, HANDLE_RADIUS, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(TEXT);
		ctx.fill();
	}
	ctx.set_global_alpha(1.0);
}

/// First two lines of the notes, cut at `per_line` characters, with an
/// ellipsis when anything was dropped.
fn notes_preview(notes: &str, per_line: usize) -> Vec<String> {
	let flat = notes.split_whitespace().collect::<Vec<_>>().join(" ");
	let chars: Vec<char> = flat.chars().collect();
	let mut lines: Vec<String> = chars.chunks(per_line).take(2).map(|c| c.iter().collect()).collect();
	if chars.len() > per_line * 2 {
		if let Some(last) = lines.last_mut() {
			last.pop();
			last.push('\u{2026}');
		}
	}
	lines
}

fn draw_minimap(state: &CanvasState, graph: &Topology, ctx: &CanvasRenderingContext2d) {
	let Some((x0, y0, x1, y1)) = state.bounds(graph) else {
		return;
	};
	// include the visible area so the viewport frame always fits
	let (vx0, vy0) = state.screen_to_graph(0.0, 0.0);
	let (vx1, vy1) = state.screen_to_graph(state.width, state.height);
	let (bx0, by0, bx1, by1) = (x0.min(vx0), y0.min(vy0), x1.max(vx1), y1.max(vy1));
	let scale = (MINIMAP_W / (bx1 - bx0)).min(MINIMAP_H / (by1 - by0));
	let (ox, oy) = (
		state.width - MINIMAP_W - MINIMAP_MARGIN,
		state.height - MINIMAP_H - MINIMAP_MARGIN,
	);
	let map = |x: f64, y: f64| (ox + (x - bx0) * scale, oy + (y - by0) * scale);

	ctx.set_fill_style_str("rgba(255, 255, 255, 0.9)");
	ctx.fill_rect(ox, oy, MINIMAP_W, MINIMAP_H);
	ctx.set_stroke_style_str(CARD_BORDER);
	ctx.set_line_width(1.0);
	ctx.stroke_rect(ox, oy, MINIMAP_W, MINIMAP_H);

	ctx.set_fill_style_str(EDGE_COLOR);
	for node in &graph.nodes {
		let p = state.node_position(node);
		let (w, h) = node_size(node);
		let (mx, my) = map(p.x, p.y);
		ctx.fill_rect(mx, my, w * scale, h * scale);
	}

	let (fx, fy) = map(vx0, vy0);
	ctx.set_stroke_style_str(ACCENT);
	ctx.stroke_rect(fx, fy, (vx1 - vx0) * scale, (vy1 - vy0) * scale);
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn notes_are_clamped_to_two_lines() {
		assert_eq!(notes_preview("Default gateway", 28), ["Default gateway"]);
		let lines = notes_preview("abcdefghij", 4);
		assert_eq!(lines, ["abcd", "efg\u{2026}"]);
		assert_eq!(notes_preview("one\n\ntwo", 28), ["one two"]);
		assert!(notes_preview("", 28).is_empty());
	}
}
