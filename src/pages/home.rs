use leptos::prelude::*;

use crate::components::NetworkDiagram;

/// The editor page: a header bar over the full-size diagram.
#[component]
pub fn Home() -> impl IntoView {
	view! {
		<ErrorBoundary fallback=|errors| {
			view! {
				<h1>"Uh oh! Something went wrong!"</h1>

				<p>"Errors: "</p>
				<ul>
					{move || {
						errors
							.get()
							.into_iter()
							.map(|(_, e)| view! { <li>{e.to_string()}</li> })
							.collect_view()
					}}
				</ul>
			}
		}>
			<main class="app">
				<header class="app-header">
					<h1>"Network Configuration Manager"</h1>
				</header>
				<NetworkDiagram />
			</main>
		</ErrorBoundary>
	}
}
