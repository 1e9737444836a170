use std::collections::HashSet;

use super::types::{CanvasEvent, Hit};
use crate::topology::{DeviceNode, Link, Position, Topology};

pub const NODE_WIDTH: f64 = 180.0;
const NODE_BASE_HEIGHT: f64 = 52.0;
const IP_BADGE_HEIGHT: f64 = 26.0;
const NOTES_HEIGHT: f64 = 32.0;
pub const HANDLE_RADIUS: f64 = 5.0;
const HANDLE_HIT: f64 = 10.0;
const EDGE_HIT: f64 = 6.0;
/// Screen pixels the pointer may travel before a press stops being a click.
const CLICK_SLOP: f64 = 3.0;
pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 4.0;
const FIT_PADDING: f64 = 40.0;

/// Size of a device card in world units; it grows with the badges it shows.
pub fn node_size(node: &DeviceNode) -> (f64, f64) {
	let mut h = NODE_BASE_HEIGHT;
	if !node.data.ip.is_empty() {
		h += IP_BADGE_HEIGHT;
	}
	if !node.data.notes.is_empty() {
		h += NOTES_HEIGHT;
	}
	(NODE_WIDTH, h)
}

#[derive(Clone, Debug)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	pub k: f64,
}

impl Default for ViewTransform {
	fn default() -> Self {
		Self {
			x: 0.0,
			y: 0.0,
			k: 1.0,
		}
	}
}

#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	pub node_id: Option<String>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start: Position,
	pub current: Position,
	pub moved: bool,
}

#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
	pub moved: bool,
	/// Edge or pane the press started on; clicked if the pan never moves.
	pub pressed: Option<Hit>,
}

#[derive(Clone, Debug, Default)]
pub struct ConnectState {
	pub source: Option<String>,
	pub cursor_x: f64,
	pub cursor_y: f64,
}

#[derive(Clone, Debug, Default)]
pub struct HoverState {
	pub node: Option<String>,
	pub neighbors: HashSet<String>,
	pub highlight_t: f64,
}

pub struct CanvasState {
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub connect: ConnectState,
	pub hover: HoverState,
	pub width: f64,
	pub height: f64,
	pub flow_time: f64,
	pub snap_grid: f64,
}

impl CanvasState {
	pub fn new(graph: &Topology, width: f64, height: f64, snap_grid: f64) -> Self {
		let mut state = Self {
			transform: ViewTransform::default(),
			drag: DragState::default(),
			pan: PanState::default(),
			connect: ConnectState::default(),
			hover: HoverState::default(),
			width,
			height,
			flow_time: 0.0,
			snap_grid,
		};
		state.fit_view(graph);
		state
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	/// Where a node is drawn, which differs from the graph while it is dragged.
	pub fn node_position(&self, node: &DeviceNode) -> Position {
		if self.drag.active && self.drag.node_id.as_deref() == Some(node.id.as_str()) {
			self.drag.current
		} else {
			node.position
		}
	}

	pub fn source_handle(&self, node: &DeviceNode) -> (f64, f64) {
		let p = self.node_position(node);
		let (w, h) = node_size(node);
		(p.x + w / 2.0, p.y + h)
	}

	pub fn target_handle(&self, node: &DeviceNode) -> (f64, f64) {
		let p = self.node_position(node);
		(p.x + node_size(node).0 / 2.0, p.y)
	}

	/// Endpoints of a link in world space, or `None` if either node is missing.
	pub fn edge_endpoints(&self, graph: &Topology, edge: &Link) -> Option<((f64, f64), (f64, f64))> {
		let source = graph.node(&edge.source)?;
		let target = graph.node(&edge.target)?;
		Some((self.source_handle(source), self.target_handle(target)))
	}

	fn node_within<'a>(&self, graph: &'a Topology, gx: f64, gy: f64, margin: f64) -> Option<&'a DeviceNode> {
		// Last drawn is on top.
		graph.nodes.iter().rev().find(|node| {
			let p = self.node_position(node);
			let (w, h) = node_size(node);
			gx >= p.x - margin && gx <= p.x + w + margin && gy >= p.y - margin && gy <= p.y + h + margin
		})
	}

	pub fn node_at_position<'a>(&self, graph: &'a Topology, sx: f64, sy: f64) -> Option<&'a DeviceNode> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		self.node_within(graph, gx, gy, 0.0)
	}

	pub fn hit_test(&self, graph: &Topology, sx: f64, sy: f64) -> Hit {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let reach = HANDLE_HIT / self.transform.k.max(MIN_ZOOM);

		let handle = graph.nodes.iter().rev().find(|node| {
			let (hx, hy) = self.source_handle(node);
			(hx - gx).hypot(hy - gy) <= reach
		});
		if let Some(node) = handle {
			return Hit::SourceHandle(node.id.clone());
		}
		if let Some(node) = self.node_within(graph, gx, gy, 0.0) {
			return Hit::Node(node.id.clone());
		}
		let tolerance = EDGE_HIT / self.transform.k.max(MIN_ZOOM);
		let edge = graph.edges.iter().rev().find(|edge| {
			self.edge_endpoints(graph, edge)
				.is_some_and(|(a, b)| distance_to_segment((gx, gy), a, b) <= tolerance)
		});
		match edge {
			Some(edge) => Hit::Edge(edge.id.clone()),
			None => Hit::Pane,
		}
	}

	pub fn pointer_down(&mut self, graph: &Topology, x: f64, y: f64) {
		match self.hit_test(graph, x, y) {
			Hit::SourceHandle(id) => {
				self.connect = ConnectState {
					source: Some(id),
					cursor_x: x,
					cursor_y: y,
				};
			}
			Hit::Node(id) => {
				let start = graph.node(&id).map(|n| n.position).unwrap_or_default();
				self.drag = DragState {
					active: true,
					node_id: Some(id),
					start_x: x,
					start_y: y,
					node_start: start,
					current: start,
					moved: false,
				};
			}
			hit => {
				self.pan = PanState {
					active: true,
					start_x: x,
					start_y: y,
					transform_start_x: self.transform.x,
					transform_start_y: self.transform.y,
					moved: false,
					pressed: Some(hit),
				};
			}
		}
	}

	pub fn pointer_move(&mut self, graph: &Topology, x: f64, y: f64) {
		if self.connect.source.is_some() {
			self.connect.cursor_x = x;
			self.connect.cursor_y = y;
		} else if self.drag.active {
			let (dx, dy) = (x - self.drag.start_x, y - self.drag.start_y);
			if dx.hypot(dy) > CLICK_SLOP {
				self.drag.moved = true;
			}
			if self.drag.moved {
				let k = self.transform.k;
				self.drag.current = Position::new(
					self.drag.node_start.x + dx / k,
					self.drag.node_start.y + dy / k,
				)
				.snapped(self.snap_grid);
			}
		} else if self.pan.active {
			let (dx, dy) = (x - self.pan.start_x, y - self.pan.start_y);
			if dx.hypot(dy) > CLICK_SLOP {
				self.pan.moved = true;
			}
			if self.pan.moved {
				self.transform.x = self.pan.transform_start_x + dx;
				self.transform.y = self.pan.transform_start_y + dy;
			}
		} else {
			let hovered = self.node_at_position(graph, x, y).map(|n| n.id.clone());
			self.set_hover(graph, hovered);
		}
	}

	/// Ends the current gesture and reports what it amounted to.
	pub fn pointer_up(&mut self, graph: &Topology, x: f64, y: f64) -> Option<CanvasEvent> {
		if let Some(source) = self.connect.source.take() {
			let (gx, gy) = self.screen_to_graph(x, y);
			let reach = HANDLE_HIT / self.transform.k.max(MIN_ZOOM);
			return self
				.node_within(graph, gx, gy, reach)
				.map(|target| CanvasEvent::Connect {
					source,
					target: target.id.clone(),
				});
		}
		if self.drag.active {
			let drag = std::mem::take(&mut self.drag);
			let id = drag.node_id?;
			return Some(if drag.moved {
				CanvasEvent::NodeMoved {
					id,
					position: drag.current,
				}
			} else {
				CanvasEvent::NodeClicked(id)
			});
		}
		if self.pan.active {
			let pan = std::mem::take(&mut self.pan);
			if pan.moved {
				return None;
			}
			return match pan.pressed? {
				Hit::Edge(id) => Some(CanvasEvent::EdgeClicked(id)),
				_ => Some(CanvasEvent::PaneClicked),
			};
		}
		None
	}

	/// Abandons any gesture without reporting it.
	pub fn pointer_leave(&mut self) {
		self.drag = DragState::default();
		self.pan = PanState::default();
		self.connect = ConnectState::default();
		self.hover.node = None;
		self.hover.neighbors.clear();
	}

	pub fn set_hover(&mut self, graph: &Topology, node: Option<String>) {
		if self.hover.node == node {
			return;
		}
		self.hover.neighbors.clear();
		if let Some(id) = &node {
			for edge in &graph.edges {
				if &edge.source == id {
					self.hover.neighbors.insert(edge.target.clone());
				} else if &edge.target == id {
					self.hover.neighbors.insert(edge.source.clone());
				}
			}
		}
		self.hover.node = node;
	}

	pub fn is_highlighted(&self, id: &str) -> bool {
		self.hover.node.as_deref() == Some(id) || self.hover.neighbors.contains(id)
	}

	pub fn tick(&mut self, dt: f64) {
		self.flow_time += dt;
		let (target, speed) = if self.hover.node.is_some() {
			(1.0, 6.0)
		} else {
			(0.0, 4.0)
		};
		self.hover.highlight_t += (target - self.hover.highlight_t) * (speed * dt).min(1.0);
		if self.hover.highlight_t < 0.01 {
			self.hover.highlight_t = 0.0;
		}
	}

	/// Zooms by `factor` keeping the screen point (x, y) fixed.
	pub fn zoom_at(&mut self, x: f64, y: f64, factor: f64) {
		let new_k = (self.transform.k * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let ratio = new_k / self.transform.k;
		self.transform.x = x - (x - self.transform.x) * ratio;
		self.transform.y = y - (y - self.transform.y) * ratio;
		self.transform.k = new_k;
	}

	pub fn zoom_center(&mut self, factor: f64) {
		self.zoom_at(self.width / 2.0, self.height / 2.0, factor);
	}

	/// Frames every node in the viewport, never zooming in past 1:1.
	pub fn fit_view(&mut self, graph: &Topology) {
		let Some((min_x, min_y, max_x, max_y)) = self.bounds(graph) else {
			self.transform = ViewTransform::default();
			return;
		};
		let (bw, bh) = (max_x - min_x + 2.0 * FIT_PADDING, max_y - min_y + 2.0 * FIT_PADDING);
		let k = (self.width / bw).min(self.height / bh).clamp(MIN_ZOOM, 1.0);
		let (cx, cy) = ((min_x + max_x) / 2.0, (min_y + max_y) / 2.0);
		self.transform = ViewTransform {
			x: self.width / 2.0 - cx * k,
			y: self.height / 2.0 - cy * k,
			k,
		};
	}

	/// World-space bounding box of all nodes.
	pub fn bounds(&self, graph: &Topology) -> Option<(f64, f64, f64, f64)> {
		graph.nodes.iter().fold(None, |acc, node| {
			let p = self.node_position(node);
			let (w, h) = node_size(node);
			Some(match acc {
				None => (p.x, p.y, p.x + w, p.y + h),
				Some((x0, y0, x1, y1)) => (x0.min(p.x), y0.min(p.y), x1.max(p.x + w), y1.max(p.y + h)),
			})
		})
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}
}

fn distance_to_segment(p: (f64, f64), a: (f64, f64), b: (f64, f64)) -> f64 {
	let (dx, dy) = (b.0 - a.0, b.1 - a.1);
	let len2 = dx * dx + dy * dy;
	if len2 < f64::EPSILON {
		return (p.0 - a.0).hypot(p.1 - a.1);
	}
	let t = (((p.0 - a.0) * dx + (p.1 - a.1) * dy) / len2).clamp(0.0, 1.0);
	(p.0 - (a.0 + t * dx)).hypot(p.1 - (a.1 + t * dy))
}

#[cfg(test)]
mod tests {
	use super::*;

	// Identity transform so screen and world coordinates coincide.
	fn state(graph: &Topology) -> CanvasState {
		let mut s = CanvasState::new(graph, 800.0, 600.0, 15.0);
		s.transform = ViewTransform::default();
		s
	}

	#[test]
	fn hit_priority_is_handle_node_edge_pane() {
		let graph = Topology::sample();
		let s = state(&graph);
		let router = graph.node("1").unwrap();
		let (hx, hy) = s.source_handle(router);
		assert_eq!(s.hit_test(&graph, hx, hy), Hit::SourceHandle("1".into()));
		assert_eq!(s.hit_test(&graph, 260.0, 110.0), Hit::Node("1".into()));

		let ((ax, ay), (bx, by)) = s.edge_endpoints(&graph, &graph.edges[0]).unwrap();
		let (mx, my) = ((ax + bx) / 2.0, (ay + by) / 2.0);
		assert_eq!(s.hit_test(&graph, mx, my), Hit::Edge("e1-2".into()));
		assert_eq!(s.hit_test(&graph, 700.0, 580.0), Hit::Pane);
	}

	#[test]
	fn press_without_moving_is_a_click() {
		let graph = Topology::sample();
		let mut s = state(&graph);
		s.pointer_down(&graph, 260.0, 110.0);
		s.pointer_move(&graph, 261.0, 111.0);
		assert_eq!(
			s.pointer_up(&graph, 261.0, 111.0),
			Some(CanvasEvent::NodeClicked("1".into()))
		);

		s.pointer_down(&graph, 700.0, 580.0);
		assert_eq!(s.pointer_up(&graph, 700.0, 580.0), Some(CanvasEvent::PaneClicked));
	}

	#[test]
	fn dragging_a_node_reports_snapped_position() {
		let graph = Topology::sample();
		let mut s = state(&graph);
		s.pointer_down(&graph, 260.0, 110.0);
		s.pointer_move(&graph, 300.0, 127.0);
		assert_eq!(s.node_position(graph.node("1").unwrap()), Position::new(285.0, 120.0));
		assert_eq!(
			s.pointer_up(&graph, 300.0, 127.0),
			Some(CanvasEvent::NodeMoved {
				id: "1".into(),
				position: Position::new(285.0, 120.0),
			})
		);
		assert!(!s.drag.active);
	}

	#[test]
	fn panning_does_not_click() {
		let graph = Topology::sample();
		let mut s = state(&graph);
		s.pointer_down(&graph, 700.0, 580.0);
		s.pointer_move(&graph, 650.0, 560.0);
		assert_eq!(s.pointer_up(&graph, 650.0, 560.0), None);
		assert_eq!((s.transform.x, s.transform.y), (-50.0, -20.0));
	}

	#[test]
	fn connecting_from_handle_to_node() {
		let graph = Topology::sample();
		let mut s = state(&graph);
		let web = graph.node("2").unwrap();
		let (hx, hy) = s.source_handle(web);
		s.pointer_down(&graph, hx, hy);
		s.pointer_move(&graph, 300.0, 120.0);
		assert_eq!(
			s.pointer_up(&graph, 300.0, 120.0),
			Some(CanvasEvent::Connect {
				source: "2".into(),
				target: "1".into(),
			})
		);

		s.pointer_down(&graph, hx, hy);
		assert_eq!(s.pointer_up(&graph, 700.0, 580.0), None);
	}

	#[test]
	fn hover_marks_neighbors() {
		let graph = Topology::sample();
		let mut s = state(&graph);
		s.pointer_move(&graph, 260.0, 110.0);
		assert!(s.is_highlighted("1"));
		assert!(s.is_highlighted("2"));
		s.pointer_leave();
		assert!(!s.is_highlighted("2"));
	}

	#[test]
	fn zoom_keeps_anchor_point() {
		let graph = Topology::default();
		let mut s = state(&graph);
		let before = s.screen_to_graph(200.0, 150.0);
		s.zoom_at(200.0, 150.0, 2.0);
		let after = s.screen_to_graph(200.0, 150.0);
		assert!((before.0 - after.0).abs() < 1e-9 && (before.1 - after.1).abs() < 1e-9);
		s.zoom_at(0.0, 0.0, 1000.0);
		assert_eq!(s.transform.k, MAX_ZOOM);
	}

	#[test]
	fn fit_view_centers_nodes() {
		let graph = Topology::sample();
		let s = CanvasState::new(&graph, 800.0, 600.0, 15.0);
		let (x0, y0, x1, y1) = s.bounds(&graph).unwrap();
		let (cx, cy) = ((x0 + x1) / 2.0, (y0 + y1) / 2.0);
		assert!((cx * s.transform.k + s.transform.x - 400.0).abs() < 1e-9);
		assert!((cy * s.transform.k + s.transform.y - 300.0).abs() < 1e-9);
		assert!(s.transform.k <= 1.0);
	}

	#[test]
	fn segment_distance() {
		assert_eq!(distance_to_segment((5.0, 3.0), (0.0, 0.0), (10.0, 0.0)), 3.0);
		assert_eq!(distance_to_segment((13.0, 4.0), (0.0, 0.0), (10.0, 0.0)), 5.0);
		assert_eq!(distance_to_segment((3.0, 4.0), (0.0, 0.0), (0.0, 0.0)), 5.0);
	}
}
