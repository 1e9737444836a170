use crate::topology::{DeviceData, DeviceKind, DeviceNode, Link};

/// Which single entity the side panel is editing.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum Selection {
	/// Nothing selected; no panel.
	#[default]
	Idle,
	/// A device, by node id.
	Node(String),
	/// A link, by edge id.
	Edge(String),
}

impl Selection {
	/// True when nothing is selected.
	pub fn is_idle(&self) -> bool {
		matches!(self, Selection::Idle)
	}

	/// Id of the selected device, if a device is selected.
	pub fn node_id(&self) -> Option<&str> {
		match self {
			Selection::Node(id) => Some(id.as_str()),
			_ => None,
		}
	}

	/// Id of the selected link, if a link is selected.
	pub fn edge_id(&self) -> Option<&str> {
		match self {
			Selection::Edge(id) => Some(id.as_str()),
			_ => None,
		}
	}
}

/// A field of the side panel form.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FormField {
	/// Device name.
	Label,
	/// Device type.
	Kind,
	/// IP address.
	Ip,
	/// Notes (Basic tab).
	Notes,
	/// Services tab.
	Services,
	/// Containers tab.
	Containers,
	/// The selected link's label.
	LinkLabel,
}

impl FormField {
	/// Fields of the device panel.
	pub const DEVICE: [FormField; 6] = [
		FormField::Label,
		FormField::Kind,
		FormField::Ip,
		FormField::Notes,
		FormField::Services,
		FormField::Containers,
	];

	/// Stable name, matching the file's `data` keys for device fields.
	pub fn key(self) -> &'static str {
		match self {
			FormField::Label => "label",
			FormField::Kind => "type",
			FormField::Ip => "ip",
			FormField::Notes => "notes",
			FormField::Services => "services",
			FormField::Containers => "containers",
			FormField::LinkLabel => "edge-label",
		}
	}

	/// Inverse of [`FormField::key`].
	pub fn from_key(key: &str) -> Option<Self> {
		FormField::DEVICE
			.into_iter()
			.chain([FormField::LinkLabel])
			.find(|f| f.key() == key)
	}
}

/// Editable copy of the selected entity. Only explicit commits write it back.
#[derive(Clone, Debug, PartialEq)]
pub enum FormBuffer {
	/// Copy of a device's data.
	Device(DeviceData),
	/// A link's label being edited.
	Link {
		/// Empty when the link has no label yet.
		label: String,
	},
}

impl FormBuffer {
	/// Buffer loaded from `node`.
	pub fn for_node(node: &DeviceNode) -> Self {
		FormBuffer::Device(node.data.clone())
	}

	/// Buffer loaded from `link`.
	pub fn for_link(link: &Link) -> Self {
		FormBuffer::Link {
			label: link.label_text().to_owned(),
		}
	}

	/// The device data, for device buffers.
	pub fn device(&self) -> Option<&DeviceData> {
		match self {
			FormBuffer::Device(data) => Some(data),
			FormBuffer::Link { .. } => None,
		}
	}

	/// The label text, for link buffers.
	pub fn link_label(&self) -> Option<&str> {
		match self {
			FormBuffer::Link { label } => Some(label.as_str()),
			FormBuffer::Device(_) => None,
		}
	}

	/// Current text of `field`, or `None` if the field is not part of this buffer.
	pub fn value(&self, field: FormField) -> Option<&str> {
		match (self, field) {
			(FormBuffer::Device(data), FormField::Label) => Some(data.label.as_str()),
			(FormBuffer::Device(data), FormField::Kind) => Some(data.kind.as_str()),
			(FormBuffer::Device(data), FormField::Ip) => Some(data.ip.as_str()),
			(FormBuffer::Device(data), FormField::Notes) => Some(data.notes.as_str()),
			(FormBuffer::Device(data), FormField::Services) => Some(data.services.as_str()),
			(FormBuffer::Device(data), FormField::Containers) => Some(data.containers.as_str()),
			(FormBuffer::Link { label }, FormField::LinkLabel) => Some(label.as_str()),
			_ => None,
		}
	}

	/// Writes `value` into `field`. Returns false when the field does not belong
	/// to this buffer.
	pub fn set(&mut self, field: FormField, value: String) -> bool {
		let slot = match (self, field) {
			(FormBuffer::Device(data), FormField::Kind) => {
				data.kind = DeviceKind::from(value);
				return true;
			}
			(FormBuffer::Device(data), FormField::Label) => &mut data.label,
			(FormBuffer::Device(data), FormField::Ip) => &mut data.ip,
			(FormBuffer::Device(data), FormField::Notes) => &mut data.notes,
			(FormBuffer::Device(data), FormField::Services) => &mut data.services,
			(FormBuffer::Device(data), FormField::Containers) => &mut data.containers,
			(FormBuffer::Link { label }, FormField::LinkLabel) => label,
			_ => return false,
		};
		*slot = value;
		true
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::topology::Topology;

	#[test]
	fn keys_round_trip() {
		for field in FormField::DEVICE.into_iter().chain([FormField::LinkLabel]) {
			assert_eq!(FormField::from_key(field.key()), Some(field));
		}
		assert_eq!(FormField::from_key("hostname"), None);
	}

	#[test]
	fn device_buffer_rejects_link_fields() {
		let graph = Topology::sample();
		let mut form = FormBuffer::for_node(graph.node("1").unwrap());
		assert!(!form.set(FormField::LinkLabel, "10G".into()));
		assert!(form.set(FormField::Kind, "database".into()));
		assert_eq!(form.value(FormField::Kind), Some("database"));
		assert_eq!(form.value(FormField::LinkLabel), None);
	}

	#[test]
	fn link_buffer_starts_from_label() {
		let graph = Topology::sample();
		let mut form = FormBuffer::for_link(graph.edge("e1-2").unwrap());
		assert_eq!(form.link_label(), Some("1Gbps"));
		assert!(!form.set(FormField::Ip, "10.0.0.1".into()));
		assert!(form.set(FormField::LinkLabel, "VPN".into()));
		assert_eq!(form.value(FormField::LinkLabel), Some("VPN"));
	}
}
