//! Devices, links and the graph that holds them.

mod document;
mod graph;
mod types;

pub use document::{from_json, to_json};
pub use graph::{GraphAction, IdAllocator};
pub use types::{DEVICE_NODE_TYPE, DeviceData, DeviceKind, DeviceNode, Link, Position, Topology};
