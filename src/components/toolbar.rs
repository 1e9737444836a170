use leptos::prelude::*;
use log::warn;
use web_sys::HtmlInputElement;

use super::file_io;
use super::toast::use_toasts;
use crate::editor::Editor;

#[component]
pub fn Toolbar(editor: RwSignal<Editor>, #[prop(into)] export_file_name: String) -> impl IntoView {
	let toasts = use_toasts();
	let file_input = NodeRef::<leptos::html::Input>::new();

	let add_device = move |_| {
		editor.update(|e| {
			e.add_node(&mut rand::thread_rng());
		});
	};

	let delete_selected = move |_| {
		editor.update(|e| {
			e.delete_selected();
		});
	};

	let save = move |_| {
		let Some(exported) = editor.try_update(|e| e.export()) else {
			return;
		};
		let saved = exported.and_then(|json| file_io::download_json(&export_file_name, &json));
		match saved {
			Ok(()) => toasts.info(
				"Configuration saved",
				format!("{export_file_name} has been downloaded"),
			),
			Err(err) => {
				warn!("save failed: {err}");
				toasts.error(format!("Could not save the configuration: {err}"));
			}
		}
	};

	let load = move |_| {
		if let Some(input) = file_input.get_untracked() {
			input.click();
		}
	};

	let on_file_change = move |ev: leptos::ev::Event| {
		let input: HtmlInputElement = event_target(&ev);
		let file = input.files().and_then(|files| files.get(0));
		// reset so picking the same file again fires another change
		input.set_value("");
		let Some(file) = file else {
			return;
		};
		let started = file_io::read_text(&file, move |text| {
			let imported = match text {
				Ok(text) => editor.try_update(|e| e.import(&text)),
				Err(err) => Some(Err(err)),
			};
			match imported {
				Some(Ok(summary)) if summary.dangling_edges.is_empty() => toasts.info(
					"Configuration loaded",
					"The configuration was loaded successfully",
				),
				Some(Ok(summary)) => toasts.info(
					"Configuration loaded",
					format!(
						"{} link(s) point at devices missing from the file",
						summary.dangling_edges.len()
					),
				),
				Some(Err(err)) => toasts.error(format!("Could not load the file: {err}")),
				None => {}
			}
		});
		if let Err(err) = started {
			toasts.error(format!("Could not load the file: {err}"));
		}
	};

	view! {
		<div class="toolbar">
			<button on:click=add_device>"+ Add device"</button>
			<button
				class="destructive"
				on:click=delete_selected
				prop:disabled=move || editor.with(|e| e.selection().is_idle())
			>
				"Delete selected"
			</button>
			<button class="outline" on:click=save>"Save"</button>
			<button class="outline" on:click=load>"Load"</button>
			<input
				type="file"
				accept=".json"
				class="hidden"
				node_ref=file_input
				on:change=on_file_change
			/>
		</div>
	}
}
