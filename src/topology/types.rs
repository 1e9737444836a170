use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Renderer key every device node is registered under.
pub const DEVICE_NODE_TYPE: &str = "device";

/// What kind of device a node stands for. Drives the icon only.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DeviceKind {
	/// What "Add device" creates.
	#[default]
	Server,
	/// Gateways and switches.
	Router,
	/// Shown as "Computer" in the panel.
	Laptop,
	/// Database hosts.
	Database,
	/// NAS and backup boxes.
	Storage,
	/// Anything this editor does not recognize.
	Generic,
}

impl DeviceKind {
	/// Kinds offered in the device panel's type select.
	pub const SELECTABLE: [DeviceKind; 5] = [
		DeviceKind::Server,
		DeviceKind::Router,
		DeviceKind::Laptop,
		DeviceKind::Database,
		DeviceKind::Storage,
	];

	/// Value stored in the file's `data.type`.
	pub fn as_str(self) -> &'static str {
		match self {
			DeviceKind::Server => "server",
			DeviceKind::Router => "router",
			DeviceKind::Laptop => "laptop",
			DeviceKind::Database => "database",
			DeviceKind::Storage => "storage",
			DeviceKind::Generic => "generic",
		}
	}

	/// Human-readable name for the type select.
	pub fn display_name(self) -> &'static str {
		match self {
			DeviceKind::Server => "Server",
			DeviceKind::Router => "Router",
			DeviceKind::Laptop => "Computer",
			DeviceKind::Database => "Database",
			DeviceKind::Storage => "Storage",
			DeviceKind::Generic => "Generic",
		}
	}

	/// Glyph drawn inside the node badge and next to the type select.
	pub fn icon(self) -> &'static str {
		match self {
			DeviceKind::Server => "\u{1F5A5}",
			DeviceKind::Router => "\u{1F4E1}",
			DeviceKind::Laptop => "\u{1F4BB}",
			DeviceKind::Database => "\u{1F6E2}",
			DeviceKind::Storage | DeviceKind::Generic => "\u{1F4BE}",
		}
	}
}

// Unknown kinds from hand-edited files render with the fallback icon.
impl From<String> for DeviceKind {
	fn from(value: String) -> Self {
		match value.as_str() {
			"server" => DeviceKind::Server,
			"router" => DeviceKind::Router,
			"laptop" => DeviceKind::Laptop,
			"database" => DeviceKind::Database,
			"storage" => DeviceKind::Storage,
			_ => DeviceKind::Generic,
		}
	}
}

impl From<DeviceKind> for String {
	fn from(kind: DeviceKind) -> Self {
		kind.as_str().to_owned()
	}
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
	D: Deserializer<'de>,
	T: Default + Deserialize<'de>,
{
	Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Metadata bag of a device. None of the text fields are validated.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceData {
	/// Display name.
	#[serde(deserialize_with = "null_as_default")]
	pub label: String,
	/// Stored as `type`.
	#[serde(rename = "type", deserialize_with = "null_as_default")]
	pub kind: DeviceKind,
	/// Free text; not checked to be an address.
	#[serde(deserialize_with = "null_as_default")]
	pub ip: String,
	/// Free text; the first two lines show on the canvas.
	#[serde(deserialize_with = "null_as_default")]
	pub notes: String,
	/// Free text.
	#[serde(deserialize_with = "null_as_default")]
	pub services: String,
	/// Free text.
	#[serde(deserialize_with = "null_as_default")]
	pub containers: String,
	/// Keys this editor does not know about, kept so a save does not drop them.
	#[serde(flatten)]
	pub extra: Map<String, Value>,
}

impl DeviceData {
	/// Overwrites the six editable fields with `other`'s, leaving `extra` alone.
	pub fn merge_fields(&mut self, other: &DeviceData) {
		self.label.clone_from(&other.label);
		self.kind = other.kind;
		self.ip.clone_from(&other.ip);
		self.notes.clone_from(&other.notes);
		self.services.clone_from(&other.services);
		self.containers.clone_from(&other.containers);
	}
}

/// Top-left corner of a device card in graph coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Position {
	/// Horizontal, growing right.
	pub x: f64,
	/// Vertical, growing down.
	pub y: f64,
}

impl Position {
	/// A point at `(x, y)`.
	pub fn new(x: f64, y: f64) -> Self {
		Self { x, y }
	}

	/// Rounds both coordinates to the nearest multiple of `grid`.
	pub fn snapped(self, grid: f64) -> Self {
		if grid <= 0.0 {
			return self;
		}
		Self {
			x: (self.x / grid).round() * grid,
			y: (self.y / grid).round() * grid,
		}
	}
}

fn device_node_type() -> String {
	DEVICE_NODE_TYPE.to_owned()
}

/// A device placed on the canvas.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeviceNode {
	/// Unique within a graph built by this editor; imported files are not checked.
	pub id: String,
	/// Always [`DEVICE_NODE_TYPE`] for nodes created here.
	#[serde(rename = "type", default = "device_node_type")]
	pub node_type: String,
	/// Where the card sits; set by dragging.
	#[serde(default)]
	pub position: Position,
	/// Everything the side panel edits.
	#[serde(default)]
	pub data: DeviceData,
}

impl DeviceNode {
	/// A device node of the standard type.
	pub fn new(id: impl Into<String>, position: Position, data: DeviceData) -> Self {
		Self {
			id: id.into(),
			node_type: device_node_type(),
			position,
			data,
		}
	}
}

/// A directed connection from one device's outgoing point to another's incoming point.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Link {
	/// `e{source}-{target}`, suffixed for parallel links.
	pub id: String,
	/// Node id; may name a node that no longer exists.
	pub source: String,
	/// Node id; may name a node that no longer exists.
	pub target: String,
	/// `None` until a label is first committed.
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub label: Option<String>,
	/// Drawn with a moving dash.
	#[serde(default)]
	pub animated: bool,
}

impl Link {
	/// The label, or an empty string.
	pub fn label_text(&self) -> &str {
		self.label.as_deref().unwrap_or_default()
	}
}

/// The whole diagram: the authoritative node and edge lists.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Topology {
	/// Devices in insertion order.
	pub nodes: Vec<DeviceNode>,
	/// Links in insertion order.
	pub edges: Vec<Link>,
}

impl Topology {
	/// Two devices and the link between them, shown on first load.
	pub fn sample() -> Self {
		let router = DeviceNode::new(
			"1",
			Position::new(250.0, 100.0),
			DeviceData {
				label: "Main router".into(),
				kind: DeviceKind::Router,
				ip: "192.168.1.1".into(),
				notes: "Default gateway".into(),
				services: "DHCP, DNS".into(),
				..Default::default()
			},
		);
		let web = DeviceNode::new(
			"2",
			Position::new(100.0, 250.0),
			DeviceData {
				label: "Web server".into(),
				kind: DeviceKind::Server,
				ip: "192.168.1.10".into(),
				notes: "Production".into(),
				services: "Nginx, PHP".into(),
				containers: "web-app, database".into(),
				..Default::default()
			},
		);
		let uplink = Link {
			id: "e1-2".into(),
			source: "1".into(),
			target: "2".into(),
			label: Some("1Gbps".into()),
			animated: true,
		};
		Self {
			nodes: vec![router, web],
			edges: vec![uplink],
		}
	}

	/// First node with `id`. Every lookup and removal resolves to this one.
	pub fn node(&self, id: &str) -> Option<&DeviceNode> {
		self.nodes.iter().find(|n| n.id == id)
	}

	/// Mutable form of [`Topology::node`].
	pub fn node_mut(&mut self, id: &str) -> Option<&mut DeviceNode> {
		self.nodes.iter_mut().find(|n| n.id == id)
	}

	/// First link with `id`.
	pub fn edge(&self, id: &str) -> Option<&Link> {
		self.edges.iter().find(|e| e.id == id)
	}

	/// Mutable form of [`Topology::edge`].
	pub fn edge_mut(&mut self, id: &str) -> Option<&mut Link> {
		self.edges.iter_mut().find(|e| e.id == id)
	}

	/// Whether a node with `id` exists.
	pub fn contains_node(&self, id: &str) -> bool {
		self.node(id).is_some()
	}

	/// Label of a node, or the raw id when the node is missing or unnamed.
	pub fn display_label<'a>(&'a self, id: &'a str) -> &'a str {
		self.node(id)
			.map(|n| n.data.label.as_str())
			.filter(|label| !label.is_empty())
			.unwrap_or(id)
	}

	/// Edges whose source or target names a node that does not exist.
	pub fn dangling_edges(&self) -> impl Iterator<Item = &Link> {
		self.edges
			.iter()
			.filter(|e| !self.contains_node(&e.source) || !self.contains_node(&e.target))
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn unknown_kind_falls_back_to_generic() {
		let data: DeviceData = serde_json::from_str(r#"{"label":"x","type":"switch"}"#).unwrap();
		assert_eq!(data.kind, DeviceKind::Generic);
		assert_eq!(serde_json::to_value(DeviceKind::Laptop).unwrap(), "laptop");
	}

	#[test]
	fn null_and_missing_fields_become_empty() {
		let data: DeviceData =
			serde_json::from_str(r#"{"label":null,"ip":"10.0.0.1","color":"red"}"#).unwrap();
		assert_eq!(data.label, "");
		assert_eq!(data.ip, "10.0.0.1");
		assert_eq!(data.kind, DeviceKind::Server);
		assert_eq!(data.extra.get("color"), Some(&Value::from("red")));
	}

	#[test]
	fn merge_keeps_extra_keys() {
		let mut data = DeviceData::default();
		data.extra.insert("rack".into(), Value::from("A3"));
		let edited = DeviceData {
			label: "db01".into(),
			kind: DeviceKind::Database,
			..Default::default()
		};
		data.merge_fields(&edited);
		assert_eq!(data.label, "db01");
		assert_eq!(data.kind, DeviceKind::Database);
		assert_eq!(data.extra.get("rack"), Some(&Value::from("A3")));
	}

	#[test]
	fn snapping_rounds_to_grid() {
		let p = Position::new(22.0, 38.0).snapped(15.0);
		assert_eq!(p, Position::new(15.0, 45.0));
		assert_eq!(Position::new(3.3, 4.4).snapped(0.0), Position::new(3.3, 4.4));
	}

	#[test]
	fn display_label_falls_back_to_id() {
		let mut graph = Topology::sample();
		assert_eq!(graph.display_label("1"), "Main router");
		assert_eq!(graph.display_label("9"), "9");
		graph.node_mut("2").unwrap().data.label.clear();
		assert_eq!(graph.display_label("2"), "2");
	}

	#[test]
	fn dangling_edges_are_listed() {
		let mut graph = Topology::sample();
		assert_eq!(graph.dangling_edges().count(), 0);
		graph.nodes.retain(|n| n.id != "2");
		let ids: Vec<_> = graph.dangling_edges().map(|e| e.id.as_str()).collect();
		assert_eq!(ids, ["e1-2"]);
	}
}
