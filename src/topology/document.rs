//! The `{ "nodes": [...], "edges": [...] }` file format.

use serde_json::Value;

use super::types::Topology;
use crate::error::{ExportError, ImportError};

const REQUIRED_FIELDS: [&str; 2] = ["nodes", "edges"];

/// Pretty-printed JSON (two-space indent) for the whole graph.
pub fn to_json(graph: &Topology) -> Result<String, ExportError> {
	Ok(serde_json::to_string_pretty(graph)?)
}

/// Parses a saved configuration.
///
/// Both `nodes` and `edges` must be present and non-null; anything else in the
/// document is ignored. Edges are not checked against nodes.
pub fn from_json(text: &str) -> Result<Topology, ImportError> {
	let value: Value = serde_json::from_str(text).map_err(ImportError::Parse)?;
	for field in REQUIRED_FIELDS {
		if value.get(field).is_none_or(Value::is_null) {
			return Err(ImportError::MissingField(field));
		}
	}
	serde_json::from_value(value).map_err(ImportError::Shape)
}

#[cfg(test)]
mod tests {
	use rand::rngs::StdRng;
	use rand::{Rng, SeedableRng};

	use super::*;
	use crate::topology::{DeviceData, DeviceKind, DeviceNode, Position};

	#[test]
	fn export_uses_two_space_indent() {
		let json = to_json(&Topology::sample()).unwrap();
		assert!(json.starts_with("{\n  \"nodes\": [\n    {\n      \"id\": \"1\""));
		assert!(json.contains("\"type\": \"device\""));
		assert!(json.contains("\"label\": \"1Gbps\""));
	}

	#[test]
	fn round_trip_reproduces_graph() {
		let graph = Topology::sample();
		let back = from_json(&to_json(&graph).unwrap()).unwrap();
		assert_eq!(back, graph);
	}

	#[test]
	fn round_trip_keeps_fractional_positions_exact() {
		let mut rng = StdRng::seed_from_u64(3);
		let graph = Topology {
			nodes: (0..500)
				.map(|i| {
					let position = Position::new(
						50.0 + rng.r#gen::<f64>() * 300.0,
						-1e6 * rng.r#gen::<f64>(),
					);
					DeviceNode::new(i.to_string(), position, DeviceData::default())
				})
				.collect(),
			edges: vec![],
		};
		let back = from_json(&to_json(&graph).unwrap()).unwrap();
		let drifted = graph
			.nodes
			.iter()
			.zip(&back.nodes)
			.filter(|(a, b)| a.position != b.position)
			.count();
		assert_eq!(drifted, 0);
	}

	#[test]
	fn missing_edges_is_rejected() {
		let err = from_json(r#"{"nodes": []}"#).unwrap_err();
		assert!(matches!(err, ImportError::MissingField("edges")));
		let err = from_json(r#"{"nodes": [], "edges": null}"#).unwrap_err();
		assert!(matches!(err, ImportError::MissingField("edges")));
	}

	#[test]
	fn non_object_documents_are_rejected() {
		assert!(matches!(from_json("[1, 2]"), Err(ImportError::MissingField("nodes"))));
		assert!(matches!(from_json("{nodes"), Err(ImportError::Parse(_))));
		assert!(matches!(
			from_json(r#"{"nodes": "many", "edges": []}"#),
			Err(ImportError::Shape(_))
		));
	}

	#[test]
	fn accepts_files_with_renderer_fields() {
		let text = r#"{
			"nodes": [{
				"id": "1",
				"type": "device",
				"position": {"x": 250, "y": 100},
				"positionAbsolute": {"x": 250, "y": 100},
				"width": 182,
				"height": 90,
				"selected": false,
				"data": {"label": "Edge router", "type": "router", "ip": "10.0.0.1"}
			}],
			"edges": [{"id": "e1-9", "source": "1", "target": "9", "animated": true}]
		}"#;
		let graph = from_json(text).unwrap();
		assert_eq!(graph.nodes[0].data.kind, DeviceKind::Router);
		assert_eq!(graph.nodes[0].data.notes, "");
		assert_eq!(graph.edges[0].label, None);
		// the edge points at a node that is not in the file
		assert_eq!(graph.dangling_edges().count(), 1);
	}
}
