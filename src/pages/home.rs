use leptos::prelude::*;
use leptos_router::hooks::use_query_map;

use crate::components::graph_view::{DataSource, GraphViewerCanvas, LayoutConfig};

/// Default Home Page
///
/// `?demo=hourglass` or `?demo=layered` swaps the server documents for a
/// generated network.
#[component]
pub fn Home() -> impl IntoView {
	let query = use_query_map();
	let source = query
		.with_untracked(|q| q.get("demo"))
		.and_then(|name| DataSource::from_demo(&name))
		.unwrap_or_default();

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
			<div class="fullscreen-graph">
				<GraphViewerCanvas source=source layout=LayoutConfig::default() />
			</div>
		</ErrorBoundary>
	}
}
