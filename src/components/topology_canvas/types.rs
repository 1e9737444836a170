use crate::topology::Position;

/// What the canvas reports back to whoever owns the graph.
#[derive(Clone, Debug, PartialEq)]
pub enum CanvasEvent {
	NodeClicked(String),
	EdgeClicked(String),
	PaneClicked,
	/// A drag from one device's outgoing point was released over another device.
	Connect {
		source: String,
		target: String,
	},
	/// A device was dragged and dropped at a new (already snapped) position.
	NodeMoved {
		id: String,
		position: Position,
	},
}

/// The thing under the pointer, in priority order.
#[derive(Clone, Debug, PartialEq)]
pub enum Hit {
	SourceHandle(String),
	Node(String),
	Edge(String),
	Pane,
}
