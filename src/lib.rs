//! Leptos client-side viewer for layered execution graphs and their schedules.
//!
//! The page fetches a DOT-like network description plus a JSON schedule,
//! lays the network out top-down and replays the schedule over it.

use leptos::prelude::*;
use leptos_meta::*;
use leptos_router::components::*;
use leptos_router::path;
use log::{Level, info};

mod components;
mod pages;

use crate::pages::home::Home;
use crate::pages::not_found::NotFound;

/// Release builds only keep load, playback and failure messages.
const LOG_LEVEL: Level = if cfg!(debug_assertions) {
	Level::Debug
} else {
	Level::Info
};

/// Routes `log` to the browser console and installs the panic hook.
pub fn init_logging() {
	let _ = console_log::init_with_level(LOG_LEVEL);
	console_error_panic_hook::set_once();
	info!("schedule viewer logging at {LOG_LEVEL}");
}

/// Single-page viewer. `/` shows the graph (`?demo=hourglass` or
/// `?demo=layered` swaps in a generated network), anything else is a 404.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="light" />
		<Title text="Schedule Graph Viewer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />
		<Meta
			name="description"
			content="Layered view of an operator network with step-by-step schedule playback"
		/>

		<Router>
			<Routes fallback=|| view! { <NotFound /> }>
				<Route path=path!("/") view=Home />
			</Routes>
		</Router>
	}
}
