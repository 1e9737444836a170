use leptos::prelude::*;

use super::inspector::{DevicePanel, LinkPanel};
use super::toast::{Toaster, provide_toasts};
use super::toolbar::Toolbar;
use super::topology_canvas::{CanvasEvent, TopologyCanvas};
use crate::config::EditorConfig;
use crate::editor::Editor;
use crate::topology::Topology;

/// The whole editor: canvas, toolbar, side panels and notifications, all driven
/// by one [`Editor`] held in a signal.
#[component]
pub fn NetworkDiagram(#[prop(optional)] config: Option<EditorConfig>) -> impl IntoView {
	let config = config.unwrap_or_default();
	let initial = if config.start_with_sample {
		Topology::sample()
	} else {
		Topology::default()
	};
	let editor = RwSignal::new(Editor::new(initial, &config));
	provide_toasts(config.toast_duration);

	let topology = Signal::derive(move || editor.with(|e| e.graph().clone()));
	let selection = Signal::derive(move || editor.with(|e| e.selection().clone()));

	let on_canvas_event = Callback::new(move |event: CanvasEvent| {
		editor.update(|e| match event {
			CanvasEvent::NodeClicked(id) => {
				e.select_node(&id);
			}
			CanvasEvent::EdgeClicked(id) => {
				e.select_edge(&id);
			}
			CanvasEvent::PaneClicked => e.deselect(),
			CanvasEvent::Connect { source, target } => {
				e.connect(&source, &target);
			}
			CanvasEvent::NodeMoved { id, position } => e.move_node(&id, position),
		});
	});

	view! {
		<div class="network-diagram">
			<TopologyCanvas
				topology=topology
				selection=selection
				on_event=on_canvas_event
				snap_grid=config.snap_grid
			/>
			<Toolbar editor=editor export_file_name=config.export_file_name.clone() />
			<Show when=move || editor.with(|e| e.selection().node_id().is_some())>
				<DevicePanel editor=editor />
			</Show>
			<Show when=move || editor.with(|e| e.selection().edge_id().is_some())>
				<LinkPanel editor=editor />
			</Show>
			<Toaster />
		</div>
	}
}
