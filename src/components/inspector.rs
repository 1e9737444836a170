use leptos::prelude::*;

use crate::editor::{Editor, FormBuffer, FormField};
use crate::topology::DeviceKind;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
enum PanelTab {
	#[default]
	Basic,
	Services,
	Containers,
}

impl PanelTab {
	const ALL: [PanelTab; 3] = [PanelTab::Basic, PanelTab::Services, PanelTab::Containers];

	fn title(self) -> &'static str {
		match self {
			PanelTab::Basic => "Basic",
			PanelTab::Services => "Services",
			PanelTab::Containers => "Containers",
		}
	}
}

/// Side panel for the selected device. Inputs only touch the form buffer;
/// leaving any of them commits the whole buffer.
#[component]
pub fn DevicePanel(editor: RwSignal<Editor>) -> impl IntoView {
	let tab = RwSignal::new(PanelTab::default());
	let value = move |field: FormField| editor.with(|e| e.field_value(field));
	let edit = move |field: FormField, value: String| {
		editor.update(|e| {
			e.edit_field(field, value);
		})
	};
	let commit = move |_| {
		editor.update(|e| {
			e.commit();
		})
	};
	let kind = move || {
		editor.with(|e| {
			e.form()
				.and_then(FormBuffer::device)
				.map(|d| d.kind)
				.unwrap_or_default()
		})
	};

	view! {
		<aside class="side-panel">
			<h3>"Configure device"</h3>

			<div class="field">
				<label for="node-name">"Device name"</label>
				<input
					id="node-name"
					type="text"
					prop:value=move || value(FormField::Label)
					on:input=move |ev| edit(FormField::Label, event_target_value(&ev))
					on:blur=commit
				/>
			</div>

			<div class="field">
				<label for="node-type">"Device type"</label>
				<div class="field-row">
					<select
						id="node-type"
						prop:value=move || kind().as_str()
						on:change=move |ev| edit(FormField::Kind, event_target_value(&ev))
						on:blur=commit
					>
						{DeviceKind::SELECTABLE
							.into_iter()
							.map(|k| view! { <option value=k.as_str()>{k.display_name()}</option> })
							.collect_view()}
					</select>
					<div class="kind-icon">{move || kind().icon()}</div>
				</div>
			</div>

			<div class="tabs">
				{PanelTab::ALL
					.into_iter()
					.map(|t| {
						view! {
							<button
								class="tab"
								class:active=move || tab.get() == t
								on:click=move |_| tab.set(t)
							>
								{t.title()}
							</button>
						}
					})
					.collect_view()}
			</div>

			<div class="tab-content" prop:hidden=move || tab.get() != PanelTab::Basic>
				<div class="field">
					<label for="node-ip">"IP address"</label>
					<input
						id="node-ip"
						type="text"
						placeholder="e.g. 192.168.1.10"
						prop:value=move || value(FormField::Ip)
						on:input=move |ev| edit(FormField::Ip, event_target_value(&ev))
						on:blur=commit
					/>
				</div>
				<div class="field">
					<label for="node-notes">"Notes"</label>
					<textarea
						id="node-notes"
						rows="4"
						placeholder="Add notes about the device..."
						prop:value=move || value(FormField::Notes)
						on:input=move |ev| edit(FormField::Notes, event_target_value(&ev))
						on:blur=commit
					/>
				</div>
			</div>

			<div class="tab-content" prop:hidden=move || tab.get() != PanelTab::Services>
				<div class="field">
					<label for="node-services">"Services"</label>
					<textarea
						id="node-services"
						rows="6"
						placeholder="e.g. Nginx, MySQL, Redis..."
						prop:value=move || value(FormField::Services)
						on:input=move |ev| edit(FormField::Services, event_target_value(&ev))
						on:blur=commit
					/>
				</div>
			</div>

			<div class="tab-content" prop:hidden=move || tab.get() != PanelTab::Containers>
				<div class="field">
					<label for="node-containers">"Containers"</label>
					<textarea
						id="node-containers"
						rows="6"
						placeholder="e.g. web-app, database, cache..."
						prop:value=move || value(FormField::Containers)
						on:input=move |ev| edit(FormField::Containers, event_target_value(&ev))
						on:blur=commit
					/>
				</div>
			</div>
		</aside>
	}
}

/// Side panel for the selected link. The label has its own blur commit.
#[component]
pub fn LinkPanel(editor: RwSignal<Editor>) -> impl IntoView {
	let endpoints = move || {
		editor.with(|e| {
			let graph = e.graph();
			e.selection()
				.edge_id()
				.and_then(|id| graph.edge(id))
				.map(|link| {
					(
						graph.display_label(&link.source).to_owned(),
						graph.display_label(&link.target).to_owned(),
					)
				})
				.unwrap_or_default()
		})
	};

	view! {
		<aside class="side-panel">
			<h3>"Configure connection"</h3>

			<div class="field">
				<label for="edge-label">"Connection label"</label>
				<input
					id="edge-label"
					type="text"
					placeholder="e.g. 1Gbps, WiFi, VPN..."
					prop:value=move || editor.with(|e| e.field_value(FormField::LinkLabel))
					on:input=move |ev| {
						let value = event_target_value(&ev);
						editor.update(|e| {
							e.edit_field(FormField::LinkLabel, value);
						});
					}
					on:blur=move |_| {
						editor.update(|e| {
							e.commit_link_label();
						})
					}
				/>
			</div>

			<div class="card">
				<div class="card-title">"Details"</div>
				<div class="card-description">"Connection endpoints"</div>
				<p>"From: " {move || endpoints().0}</p>
				<p>"To: " {move || endpoints().1}</p>
			</div>
		</aside>
	}
}
