//! Fetches the network description and the schedule over HTTP.
//!
//! Uses `web-sys` fetch through `wasm-bindgen-futures`; JS errors are turned
//! into strings at this boundary.

use thiserror::Error;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{Request, RequestInit, RequestMode, Response};

use super::sample;
use super::schedule::ScheduleDocument;

#[derive(Debug, Error)]
pub enum LoadError {
	#[error("no window available")]
	NoWindow,
	#[error("request error: {0}")]
	Request(String),
	#[error("fetch error: {0}")]
	Fetch(String),
	#[error("HTTP {status} for {url}")]
	Status { status: u16, url: String },
	#[error("body error: {0}")]
	Body(String),
	#[error("invalid schedule document: {0}")]
	Schedule(#[from] serde_json::Error),
}

/// Where the two input documents come from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataSource {
	Remote {
		graph_url: String,
		schedule_url: String,
	},
	/// Generated in-process, see [`sample::hourglass_network`].
	Hourglass,
	/// Generated in-process, see [`sample::layered_network`].
	Layered {
		layers: usize,
		per_layer: usize,
		fanout: usize,
	},
}

impl Default for DataSource {
	fn default() -> Self {
		Self::Remote {
			graph_url: "/network.dot".to_string(),
			schedule_url: "/schedule.json".to_string(),
		}
	}
}

pub struct LoadedData {
	pub graph_text: String,
	pub schedule: ScheduleDocument,
}

impl From<(String, ScheduleDocument)> for LoadedData {
	fn from((graph_text, schedule): (String, ScheduleDocument)) -> Self {
		Self {
			graph_text,
			schedule,
		}
	}
}

impl DataSource {
	/// Maps a `?demo=` value to a generated source.
	pub fn from_demo(name: &str) -> Option<Self> {
		match name {
			"hourglass" => Some(Self::Hourglass),
			"layered" => Some(Self::Layered {
				layers: 10,
				per_layer: 100,
				fanout: 4,
			}),
			_ => None,
		}
	}

	pub async fn load(&self) -> Result<LoadedData, LoadError> {
		match self {
			Self::Remote {
				graph_url,
				schedule_url,
			} => {
				// Both requests are issued before either is awaited.
				let schedule = fetch_text(schedule_url)?;
				let graph = fetch_text(graph_url)?;
				let schedule_text = schedule.await?;
				let graph_text = graph.await?;
				Ok(LoadedData {
					graph_text,
					schedule: ScheduleDocument::from_json(&schedule_text)?,
				})
			}
			Self::Hourglass => Ok(sample::hourglass_network().into()),
			Self::Layered {
				layers,
				per_layer,
				fanout,
			} => Ok(sample::layered_network(*layers, *per_layer, *fanout).into()),
		}
	}
}

fn fetch_text(
	url: &str,
) -> Result<impl std::future::Future<Output = Result<String, LoadError>> + use<>, LoadError> {
	let opts = RequestInit::new();
	opts.set_method("GET");
	opts.set_mode(RequestMode::SameOrigin);

	let request = Request::new_with_str_and_init(url, &opts)
		.map_err(|e| LoadError::Request(format!("{e:?}")))?;
	let window = web_sys::window().ok_or(LoadError::NoWindow)?;
	let pending = JsFuture::from(window.fetch_with_request(&request));
	let url = url.to_string();

	Ok(async move {
		let value = pending
			.await
			.map_err(|e| LoadError::Fetch(format!("{e:?}")))?;
		let response: Response = value
			.dyn_into()
			.map_err(|_| LoadError::Fetch("response is not a Response".to_string()))?;
		if !response.ok() {
			return Err(LoadError::Status {
				status: response.status(),
				url,
			});
		}
		let body = response
			.text()
			.map_err(|e| LoadError::Body(format!("{e:?}")))?;
		let text = JsFuture::from(body)
			.await
			.map_err(|e| LoadError::Body(format!("{e:?}")))?;
		text.as_string()
			.ok_or_else(|| LoadError::Body("body is not a string".to_string()))
	})
}
