use log::{debug, info, warn};
use rand::Rng;

use super::selection::{FormBuffer, FormField, Selection};
use crate::config::{EditorConfig, ExitPolicy, SpawnArea};
use crate::error::{ExportError, ImportError};
use crate::topology::{
	self, DeviceData, DeviceNode, GraphAction, IdAllocator, Link, Position, Topology,
};

/// What `delete_selected` took out of the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum Removed {
	/// A device; its links are still in the graph.
	Node(DeviceNode),
	/// A link.
	Link(Link),
}

/// Outcome of a successful import.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ImportSummary {
	/// Devices now in the graph.
	pub nodes: usize,
	/// Links now in the graph.
	pub edges: usize,
	/// Ids of imported edges whose endpoints are missing from the file.
	pub dangling_edges: Vec<String>,
}

/// Owns the graph, the selection and the form buffer, and keeps them consistent.
///
/// The form buffer exists exactly while something is selected and is rebuilt
/// from the graph on every selection change.
#[derive(Clone, Debug, PartialEq)]
pub struct Editor {
	graph: Topology,
	selection: Selection,
	form: Option<FormBuffer>,
	ids: IdAllocator,
	exit_policy: ExitPolicy,
	spawn_area: SpawnArea,
}

impl Editor {
	/// Starts idle on `graph`.
	pub fn new(graph: Topology, config: &EditorConfig) -> Self {
		Self {
			ids: IdAllocator::seeded_from(&graph),
			graph,
			selection: Selection::Idle,
			form: None,
			exit_policy: config.exit_policy,
			spawn_area: config.spawn_area,
		}
	}

	/// The authoritative graph.
	pub fn graph(&self) -> &Topology {
		&self.graph
	}

	/// What the side panel is showing.
	pub fn selection(&self) -> &Selection {
		&self.selection
	}

	/// The form buffer; `Some` exactly while something is selected.
	pub fn form(&self) -> Option<&FormBuffer> {
		self.form.as_ref()
	}

	/// Policy applied when the selection moves without a commit.
	pub fn exit_policy(&self) -> ExitPolicy {
		self.exit_policy
	}

	/// Buffered text of `field`, empty when the field is not being edited.
	pub fn field_value(&self, field: FormField) -> String {
		self.form
			.as_ref()
			.and_then(|form| form.value(field))
			.unwrap_or_default()
			.to_owned()
	}

	fn dispatch(&mut self, action: GraphAction) {
		self.graph = std::mem::take(&mut self.graph).apply(action);
	}

	/// Leaves the current selection, committing or dropping its buffer according
	/// to the exit policy.
	fn leave_selection(&mut self) {
		if self.exit_policy == ExitPolicy::Commit {
			self.commit();
			self.commit_link_label();
		}
		self.selection = Selection::Idle;
		self.form = None;
	}

	/// Selects a device and loads its fields into the form. Returns false if
	/// there is no such node.
	pub fn select_node(&mut self, id: &str) -> bool {
		if !self.graph.contains_node(id) {
			return false;
		}
		self.leave_selection();
		self.form = self.graph.node(id).map(FormBuffer::for_node);
		self.selection = Selection::Node(id.to_owned());
		debug!("selected node {id}");
		true
	}

	/// Selects a link and loads its label into the form. Returns false if there
	/// is no such link.
	pub fn select_edge(&mut self, id: &str) -> bool {
		if self.graph.edge(id).is_none() {
			return false;
		}
		self.leave_selection();
		self.form = self.graph.edge(id).map(FormBuffer::for_link);
		self.selection = Selection::Edge(id.to_owned());
		debug!("selected edge {id}");
		true
	}

	/// Updates the form buffer only. The graph is untouched until a commit.
	pub fn edit_field(&mut self, field: FormField, value: impl Into<String>) -> bool {
		match self.form.as_mut() {
			Some(form) => form.set(field, value.into()),
			None => false,
		}
	}

	/// Writes the whole device buffer into the selected node. Returns false
	/// when no node is selected.
	pub fn commit(&mut self) -> bool {
		let (Some(id), Some(FormBuffer::Device(data))) = (self.selection.node_id(), &self.form)
		else {
			return false;
		};
		let action = GraphAction::UpdateDevice {
			id: id.to_owned(),
			data: data.clone(),
		};
		self.dispatch(action);
		true
	}

	/// The edge label's own blur trigger.
	pub fn commit_link_label(&mut self) -> bool {
		let (Some(id), Some(FormBuffer::Link { label })) = (self.selection.edge_id(), &self.form)
		else {
			return false;
		};
		let action = GraphAction::SetLinkLabel {
			id: id.to_owned(),
			label: label.clone(),
		};
		self.dispatch(action);
		true
	}

	/// Background click. A selected device is always committed first; a
	/// selected edge's label follows the exit policy.
	pub fn deselect(&mut self) {
		self.commit();
		self.leave_selection();
	}

	/// Removes the selected entity only. Edges of a removed node stay in place.
	pub fn delete_selected(&mut self) -> Option<Removed> {
		let removed = match std::mem::take(&mut self.selection) {
			Selection::Idle => None,
			Selection::Node(id) => self.graph.node(&id).cloned().map(|node| {
				self.dispatch(GraphAction::RemoveNode(id));
				Removed::Node(node)
			}),
			Selection::Edge(id) => self.graph.edge(&id).cloned().map(|link| {
				self.dispatch(GraphAction::RemoveLink(id));
				Removed::Link(link)
			}),
		};
		self.form = None;
		removed
	}

	/// Adds a server at a random spot in the spawn area and returns its id.
	pub fn add_node(&mut self, rng: &mut impl Rng) -> String {
		let position = self.spawn_area.sample(rng);
		self.add_node_at(position)
	}

	/// Adds a server named `Device {id}` at `position`.
	pub fn add_node_at(&mut self, position: Position) -> String {
		let id = self.ids.next_node_id(&self.graph);
		let data = DeviceData {
			label: format!("Device {id}"),
			..Default::default()
		};
		self.dispatch(GraphAction::AddNode(DeviceNode::new(id.clone(), position, data)));
		debug!("added node {id}");
		id
	}

	/// Adds an animated, unlabeled link. Duplicates and self-loops are allowed.
	pub fn connect(&mut self, source: &str, target: &str) -> String {
		let id = self.graph.next_link_id(source, target);
		self.dispatch(GraphAction::AddLink(Link {
			id: id.clone(),
			source: source.to_owned(),
			target: target.to_owned(),
			label: None,
			animated: true,
		}));
		debug!("connected {source} -> {target} as {id}");
		id
	}

	/// Stores a dragged node's final position. Selection and buffer are untouched.
	pub fn move_node(&mut self, id: &str, position: Position) {
		self.dispatch(GraphAction::MoveNode {
			id: id.to_owned(),
			position,
		});
	}

	/// Serializes the graph after flushing pending edits of the selection.
	pub fn export(&mut self) -> Result<String, ExportError> {
		self.commit();
		if self.exit_policy == ExitPolicy::Commit {
			self.commit_link_label();
		}
		let json = topology::to_json(&self.graph)?;
		info!(
			"exported {} nodes and {} edges",
			self.graph.nodes.len(),
			self.graph.edges.len()
		);
		Ok(json)
	}

	/// Replaces the whole graph with a saved configuration.
	///
	/// On error nothing changes. On success the selection is cleared and the id
	/// counter is reseeded from the new graph.
	pub fn import(&mut self, text: &str) -> Result<ImportSummary, ImportError> {
		let graph = match topology::from_json(text) {
			Ok(graph) => graph,
			Err(err) => {
				warn!("import rejected: {err}");
				return Err(err);
			}
		};
		let summary = ImportSummary {
			nodes: graph.nodes.len(),
			edges: graph.edges.len(),
			dangling_edges: graph.dangling_edges().map(|e| e.id.clone()).collect(),
		};
		if !summary.dangling_edges.is_empty() {
			warn!(
				"imported edges reference missing nodes: {}",
				summary.dangling_edges.join(", ")
			);
		}
		self.ids = IdAllocator::seeded_from(&graph);
		self.dispatch(GraphAction::Replace(graph));
		self.selection = Selection::Idle;
		self.form = None;
		info!("imported {} nodes and {} edges", summary.nodes, summary.edges);
		Ok(summary)
	}
}

#[cfg(test)]
mod tests {
	use rand::SeedableRng;
	use rand::rngs::StdRng;

	use super::*;

	fn editor(policy: ExitPolicy) -> Editor {
		Editor::new(
			Topology::sample(),
			&EditorConfig::default().with_exit_policy(policy),
		)
	}

	#[test]
	fn commit_writes_all_fields_and_keeps_unedited_ones() {
		let mut ed = editor(ExitPolicy::Commit);
		assert!(ed.select_node("2"));
		assert!(ed.edit_field(FormField::Ip, "10.0.0.10"));
		assert!(ed.edit_field(FormField::Ip, "10.0.0.11"));
		assert!(ed.edit_field(FormField::Kind, "storage"));
		assert_eq!(ed.graph().node("2").unwrap().data.ip, "192.168.1.10");

		assert!(ed.commit());
		let data = &ed.graph().node("2").unwrap().data;
		assert_eq!(data.ip, "10.0.0.11");
		assert_eq!(data.kind.as_str(), "storage");
		assert_eq!(data.label, "Web server");
		assert_eq!(data.containers, "web-app, database");
	}

	#[test]
	fn edits_need_a_selection() {
		let mut ed = editor(ExitPolicy::Commit);
		assert!(!ed.edit_field(FormField::Label, "x"));
		assert!(!ed.commit());
		assert!(!ed.commit_link_label());
		assert_eq!(ed.field_value(FormField::Label), "");
	}

	#[test]
	fn selecting_unknown_ids_changes_nothing() {
		let mut ed = editor(ExitPolicy::Commit);
		ed.select_node("1");
		assert!(!ed.select_node("77"));
		assert!(!ed.select_edge("e9-9"));
		assert_eq!(ed.selection(), &Selection::Node("1".into()));
	}

	#[test]
	fn background_click_commits_device() {
		for policy in [ExitPolicy::Commit, ExitPolicy::Discard] {
			let mut ed = editor(policy);
			ed.select_node("1");
			ed.edit_field(FormField::Notes, "rack 4");
			ed.deselect();
			assert!(ed.selection().is_idle());
			assert!(ed.form().is_none());
			assert_eq!(ed.graph().node("1").unwrap().data.notes, "rack 4");
		}
	}

	#[test]
	fn background_click_on_edge_follows_policy() {
		let mut ed = editor(ExitPolicy::Discard);
		ed.select_edge("e1-2");
		ed.edit_field(FormField::LinkLabel, "10Gbps");
		ed.deselect();
		assert_eq!(ed.graph().edge("e1-2").unwrap().label_text(), "1Gbps");

		let mut ed = editor(ExitPolicy::Commit);
		ed.select_edge("e1-2");
		ed.edit_field(FormField::LinkLabel, "10Gbps");
		ed.deselect();
		assert_eq!(ed.graph().edge("e1-2").unwrap().label_text(), "10Gbps");
	}

	#[test]
	fn link_label_commits_on_its_own_blur() {
		let mut ed = editor(ExitPolicy::Discard);
		ed.select_edge("e1-2");
		ed.edit_field(FormField::LinkLabel, "WiFi");
		assert!(!ed.commit());
		assert!(ed.commit_link_label());
		assert_eq!(ed.graph().edge("e1-2").unwrap().label.as_deref(), Some("WiFi"));
	}

	#[test]
	fn selecting_edge_clears_node_selection() {
		let mut ed = editor(ExitPolicy::Commit);
		ed.select_node("1");
		ed.select_edge("e1-2");
		assert_eq!(ed.selection(), &Selection::Edge("e1-2".into()));
		assert_eq!(ed.form().and_then(FormBuffer::link_label), Some("1Gbps"));
	}

	#[test]
	fn delete_removes_only_the_target() {
		let mut ed = editor(ExitPolicy::Commit);
		assert_eq!(ed.delete_selected(), None);

		ed.select_node("1");
		let removed = ed.delete_selected();
		assert!(matches!(removed, Some(Removed::Node(ref n)) if n.id == "1"));
		assert!(ed.selection().is_idle());
		assert_eq!(ed.graph().nodes.len(), 1);
		assert_eq!(ed.graph().edges.len(), 1);

		ed.select_edge("e1-2");
		assert!(matches!(ed.delete_selected(), Some(Removed::Link(_))));
		assert!(ed.graph().edges.is_empty());
		assert_eq!(ed.graph().nodes.len(), 1);
	}

	#[test]
	fn added_nodes_are_servers_in_the_spawn_area() {
		let mut ed = Editor::new(Topology::default(), &EditorConfig::default());
		let mut rng = StdRng::seed_from_u64(1);
		let id = ed.add_node(&mut rng);
		let node = ed.graph().node(&id).unwrap();
		assert_eq!(node.data.label, "Device 1");
		assert_eq!(node.data.kind.as_str(), "server");
		assert!(SpawnArea::default().contains(node.position));
		assert!(ed.selection().is_idle());
	}

	#[test]
	fn import_clears_selection() {
		let mut ed = editor(ExitPolicy::Commit);
		ed.select_node("1");
		ed.edit_field(FormField::Label, "never saved");
		let json = topology::to_json(&Topology::default()).unwrap();
		let summary = ed.import(&json).unwrap();
		assert_eq!(summary, ImportSummary::default());
		assert!(ed.selection().is_idle());
		assert!(ed.form().is_none());
		assert!(ed.graph().nodes.is_empty());
	}

	#[test]
	fn failed_import_keeps_everything() {
		let mut ed = editor(ExitPolicy::Commit);
		ed.select_node("1");
		ed.edit_field(FormField::Label, "pending");
		let before = ed.clone();
		assert!(ed.import("not json").is_err());
		assert!(ed.import(r#"{"edges": []}"#).is_err());
		assert_eq!(ed, before);
	}
}
