//! Pure transitions over a [`Topology`].
//!
//! Every mutation the editor performs is expressed as a [`GraphAction`] and
//! applied with [`Topology::apply`], which consumes the old graph and returns the
//! new one. Nothing here validates references: removing a node leaves the edges
//! that point at it in place, and links may be duplicated or self-looping.

use log::{debug, warn};

use super::types::{DeviceData, DeviceNode, Link, Position, Topology};

/// One change to a [`Topology`].
#[derive(Clone, Debug, PartialEq)]
pub enum GraphAction {
	/// Append a node; its id is not checked.
	AddNode(DeviceNode),
	/// Merge the editable fields of `data` into the node's metadata.
	UpdateDevice {
		/// Target node.
		id: String,
		/// New values for the editable fields.
		data: DeviceData,
	},
	/// Set a node's position.
	MoveNode {
		/// Target node.
		id: String,
		/// New top-left corner.
		position: Position,
	},
	/// Append a link; endpoints are not checked.
	AddLink(Link),
	/// Store a label on a link.
	SetLinkLabel {
		/// Target link.
		id: String,
		/// Stored as given, empty included.
		label: String,
	},
	/// Remove the first node with this id. Its links stay.
	RemoveNode(String),
	/// Remove the first link with this id.
	RemoveLink(String),
	/// Swap in a whole new graph, as an import does.
	Replace(Topology),
}

impl Topology {
	/// Consumes the graph and returns it with `action` applied. Actions naming
	/// missing ids leave it unchanged.
	pub fn apply(mut self, action: GraphAction) -> Self {
		debug!("graph action: {}", action_name(&action));
		match action {
			GraphAction::AddNode(node) => self.nodes.push(node),
			GraphAction::UpdateDevice { id, data } => {
				if let Some(node) = self.node_mut(&id) {
					node.data.merge_fields(&data);
				}
			}
			GraphAction::MoveNode { id, position } => {
				if let Some(node) = self.node_mut(&id) {
					node.position = position;
				}
			}
			GraphAction::AddLink(link) => self.edges.push(link),
			GraphAction::SetLinkLabel { id, label } => {
				if let Some(edge) = self.edge_mut(&id) {
					edge.label = Some(label);
				}
			}
			// Imported files may repeat an id; only the entry `node`/`edge` resolves to goes.
			GraphAction::RemoveNode(id) => {
				if let Some(index) = self.nodes.iter().position(|n| n.id == id) {
					self.nodes.remove(index);
				}
			}
			GraphAction::RemoveLink(id) => {
				if let Some(index) = self.edges.iter().position(|e| e.id == id) {
					self.edges.remove(index);
				}
			}
			GraphAction::Replace(graph) => return graph,
		}
		self
	}

	/// Id for a new link between `source` and `target`, unique among current edges.
	pub fn next_link_id(&self, source: &str, target: &str) -> String {
		let base = format!("e{source}-{target}");
		if self.edge(&base).is_none() {
			return base;
		}
		(2..)
			.map(|n| format!("{base}-{n}"))
			.find(|id| self.edge(id).is_none())
			.unwrap_or(base)
	}
}

fn action_name(action: &GraphAction) -> &'static str {
	match action {
		GraphAction::AddNode(_) => "add-node",
		GraphAction::UpdateDevice { .. } => "update-device",
		GraphAction::MoveNode { .. } => "move-node",
		GraphAction::AddLink(_) => "add-link",
		GraphAction::SetLinkLabel { .. } => "set-link-label",
		GraphAction::RemoveNode(_) => "remove-node",
		GraphAction::RemoveLink(_) => "remove-link",
		GraphAction::Replace(_) => "replace",
	}
}

/// Hands out sequential node ids that stay unique across deletions.
///
/// The counter only moves forward; it is reseeded from the graph when the whole
/// graph is replaced.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IdAllocator {
	next: u64,
}

impl IdAllocator {
	/// Starts past the highest numeric id in `graph` (or its node count, if larger).
	/// An id of `u64::MAX` cannot be followed and is left out.
	pub fn seeded_from(graph: &Topology) -> Self {
		let highest = graph
			.nodes
			.iter()
			.filter_map(|n| n.id.parse::<u64>().ok())
			.filter(|&n| n < u64::MAX)
			.max()
			.unwrap_or(0);
		Self {
			next: highest.max(graph.nodes.len() as u64).saturating_add(1),
		}
	}

	/// Next free id. Once the counter is exhausted the lowest free id is handed
	/// out instead.
	pub fn next_node_id(&mut self, graph: &Topology) -> String {
		while self.next < u64::MAX {
			let id = self.next.to_string();
			self.next += 1;
			if !graph.contains_node(&id) {
				return id;
			}
		}
		warn!("node id counter exhausted, reusing the lowest free id");
		(1..=u64::MAX)
			.map(|n| n.to_string())
			.find(|id| !graph.contains_node(id))
			.unwrap_or_default()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn node(id: &str) -> DeviceNode {
		DeviceNode::new(id, Position::default(), DeviceData::default())
	}

	#[test]
	fn remove_node_leaves_edges() {
		let graph = Topology::sample().apply(GraphAction::RemoveNode("2".into()));
		assert_eq!(graph.nodes.len(), 1);
		assert_eq!(graph.edges.len(), 1);
	}

	#[test]
	fn removing_a_repeated_id_takes_only_the_first() {
		let mut graph = Topology::sample();
		graph.nodes.push(node("1"));
		let mut backup = graph.edges[0].clone();
		backup.label = Some("backup".into());
		graph.edges.push(backup);

		let graph = graph
			.apply(GraphAction::RemoveNode("1".into()))
			.apply(GraphAction::RemoveLink("e1-2".into()));
		let ids: Vec<_> = graph.nodes.iter().map(|n| n.id.as_str()).collect();
		assert_eq!(ids, ["2", "1"]);
		assert_eq!(graph.edges.len(), 1);
		assert_eq!(graph.edges[0].label.as_deref(), Some("backup"));
	}

	#[test]
	fn updates_to_missing_ids_are_ignored() {
		let before = Topology::sample();
		let after = before.clone().apply(GraphAction::MoveNode {
			id: "42".into(),
			position: Position::new(1.0, 1.0),
		});
		assert_eq!(before, after);
	}

	#[test]
	fn link_ids_never_collide() {
		let mut graph = Topology::sample();
		assert_eq!(graph.next_link_id("1", "2"), "e1-2-2");
		graph = graph.apply(GraphAction::AddLink(Link {
			id: "e1-2-2".into(),
			source: "1".into(),
			target: "2".into(),
			label: None,
			animated: true,
		}));
		assert_eq!(graph.next_link_id("1", "2"), "e1-2-3");
		assert_eq!(graph.next_link_id("2", "1"), "e2-1");
	}

	#[test]
	fn allocator_starts_at_one_and_skips_taken_ids() {
		let mut graph = Topology::default();
		let mut ids = IdAllocator::seeded_from(&graph);
		assert_eq!(ids.next_node_id(&graph), "1");

		graph.nodes.push(node("2"));
		assert_eq!(ids.next_node_id(&graph), "3");
	}

	#[test]
	fn allocator_seeds_past_highest_numeric_id() {
		let graph = Topology {
			nodes: vec![node("7"), node("router-a")],
			edges: vec![],
		};
		assert_eq!(IdAllocator::seeded_from(&graph).next_node_id(&graph), "8");

		let named = Topology {
			nodes: vec![node("a"), node("b")],
			edges: vec![],
		};
		assert_eq!(IdAllocator::seeded_from(&named).next_node_id(&named), "3");
	}

	#[test]
	fn allocator_survives_the_largest_ids() {
		let max = Topology {
			nodes: vec![node("18446744073709551615")],
			edges: vec![],
		};
		assert_eq!(IdAllocator::seeded_from(&max).next_node_id(&max), "2");

		let near_max = Topology {
			nodes: vec![node("18446744073709551614"), node("1")],
			edges: vec![],
		};
		assert_eq!(IdAllocator::seeded_from(&near_max).next_node_id(&near_max), "2");
	}
}
