use std::collections::HashSet;

use log::{debug, info};

use super::camera::Camera;
use super::layout::{LayoutConfig, LayoutEngine, LayoutSummary};
use super::model::GraphModel;
use super::schedule::{ScheduleDocument, ScheduleEntry, scheduled_ids};
use super::types::{Node, Rect};

/// Manhattan distance (px) a press may travel and still count as a click.
pub const DRAG_THRESHOLD: f64 = 5.0;

#[derive(Clone, Debug, Default)]
pub struct PointerState {
	pub active: bool,
	pub down_x: f64,
	pub down_y: f64,
	pub last_x: f64,
	pub last_y: f64,
}

impl PointerState {
	fn travel(&self, x: f64, y: f64) -> f64 {
		(x - self.down_x).abs() + (y - self.down_y).abs()
	}
}

/// Selection, search and schedule playback state.
#[derive(Clone, Debug, Default)]
pub struct VizState {
	selected: HashSet<String>,
	schedule: Vec<ScheduleEntry>,
	current_index: usize,
	is_playing: bool,
	search_term: String,
}

impl VizState {
	pub fn set_schedule(&mut self, schedule: Vec<ScheduleEntry>) {
		self.schedule = schedule;
		self.update_schedule_index(self.current_index);
	}

	/// Clamps into `[0, len - 1]`; an empty schedule pins the index at 0.
	pub fn update_schedule_index(&mut self, index: usize) {
		self.current_index = index.min(self.schedule.len().saturating_sub(1));
	}

	pub fn select_node(&mut self, id: &str) {
		self.selected.insert(id.to_string());
	}

	/// Returns whether the node is selected afterwards.
	pub fn toggle_node_selection(&mut self, id: &str) -> bool {
		if self.selected.remove(id) {
			false
		} else {
			self.selected.insert(id.to_string());
			true
		}
	}

	pub fn clear_selection(&mut self) {
		self.selected.clear();
	}

	pub fn selected_nodes(&self) -> &HashSet<String> {
		&self.selected
	}
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackCommand {
	/// Arm the repeating timer.
	Start,
	/// Cancel any pending advance.
	Stop,
}

/// Everything the frame loop and the input handlers touch.
pub struct ViewerState {
	pub model: GraphModel,
	pub camera: Camera,
	pub viz: VizState,
	pub pointer: PointerState,
	layout: LayoutEngine,
	pub width: f64,
	pub height: f64,
}

impl ViewerState {
	pub fn new(layout: LayoutConfig, width: f64, height: f64) -> Self {
		Self {
			model: GraphModel::new(),
			camera: Camera::default(),
			viz: VizState::default(),
			pointer: PointerState::default(),
			layout: LayoutEngine::new(layout),
			width,
			height,
		}
	}

	/// Installs a freshly loaded graph and schedule, lays it out and centres it.
	pub fn load(&mut self, graph_text: &str, schedule: ScheduleDocument) -> LayoutSummary {
		self.model.set_graph_data(graph_text);
		let summary = self.layout.layout(&mut self.model);
		info!(
			"loaded {} nodes, {} edges, {} schedule steps in {} layers ({:.0}x{:.0})",
			self.model.node_count(),
			self.model.edges().len(),
			schedule.schedule.len(),
			summary.layer_count,
			summary.extent_width,
			summary.extent_height
		);

		self.viz.clear_selection();
		self.viz.set_schedule(schedule.schedule);
		self.refresh_schedule();
		let term = self.viz.search_term.clone();
		self.set_search_term(&term);
		self.update_selection();
		self.center_graph();
		summary
	}

	pub fn center_graph(&mut self) {
		if self.model.is_empty() {
			return;
		}
		self.camera.center_on(&self.model.bounds(), self.width, self.height);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	pub fn viewport_bounds(&self) -> Rect {
		self.camera.viewport_bounds(self.width, self.height)
	}

	pub fn visible_nodes(&self) -> Vec<&Node> {
		self.model.nodes_in_bounds(&self.viewport_bounds())
	}

	pub fn pointer_down(&mut self, x: f64, y: f64) {
		self.pointer = PointerState {
			active: true,
			down_x: x,
			down_y: y,
			last_x: x,
			last_y: y,
		};
	}

	pub fn pointer_move(&mut self, x: f64, y: f64) {
		if self.pointer.active {
			if self.pointer.travel(x, y) > DRAG_THRESHOLD {
				self.camera
					.pan_by(x - self.pointer.last_x, y - self.pointer.last_y);
			}
			self.pointer.last_x = x;
			self.pointer.last_y = y;
		} else {
			let (wx, wy) = self.camera.screen_to_world(x, y);
			self.model.update_hover(wx, wy);
		}
	}

	/// `toggle` is the Ctrl/Meta modifier state.
	pub fn pointer_up(&mut self, x: f64, y: f64, toggle: bool) {
		if self.pointer.active && self.pointer.travel(x, y) <= DRAG_THRESHOLD {
			let (wx, wy) = self.camera.screen_to_world(x, y);
			self.handle_click(wx, wy, toggle);
		}
		self.pointer.active = false;
	}

	pub fn pointer_leave(&mut self) {
		self.pointer.active = false;
		self.model.clear_hover();
	}

	pub fn wheel(&mut self, x: f64, y: f64, delta_y: f64) {
		self.camera.zoom_at(x, y, delta_y);
	}

	pub fn key_down(&mut self, key: &str) {
		if key == "Escape" {
			self.clear_selection();
		}
	}

	/// Click in world space. Without the modifier a hit node is added to the
	/// selection; clicking empty space clears it.
	pub fn handle_click(&mut self, wx: f64, wy: f64, toggle: bool) {
		let hit = self.model.node_at_position(wx, wy).map(|n| n.id.clone());
		match hit {
			Some(id) if toggle => {
				self.viz.toggle_node_selection(&id);
			}
			Some(id) => self.viz.select_node(&id),
			None => self.viz.clear_selection(),
		}
		self.update_selection();
	}

	pub fn clear_selection(&mut self) {
		self.viz.clear_selection();
		self.update_selection();
	}

	fn update_selection(&mut self) {
		self.model.update_node_selection_state(self.viz.selected_nodes());
	}

	pub fn set_schedule_index(&mut self, index: usize) {
		self.viz.update_schedule_index(index);
		self.refresh_schedule();
	}

	fn refresh_schedule(&mut self) {
		let ids = if self.viz.schedule.is_empty() {
			HashSet::new()
		} else {
			scheduled_ids(&self.viz.schedule, self.viz.current_index)
		};
		self.model.set_scheduled(&ids);
	}

	/// Highlights matches; a non-empty term also replaces the selection with them.
	pub fn set_search_term(&mut self, term: &str) {
		self.viz.search_term = term.to_string();
		let matches = self.model.set_search_highlights(term);
		if term.is_empty() {
			return;
		}
		self.viz.clear_selection();
		for id in &matches {
			self.viz.select_node(id);
		}
		self.update_selection();
		debug!("search {term:?} matched {} nodes", matches.len());
	}

	/// Flips play/pause. Starting also performs the first step immediately,
	/// so playing from the last step stops again straight away.
	pub fn toggle_playback(&mut self) -> PlaybackCommand {
		self.viz.is_playing = !self.viz.is_playing;
		if self.viz.is_playing && self.advance_playback() {
			info!("playback started at step {}", self.viz.current_index);
			PlaybackCommand::Start
		} else {
			info!("playback stopped at step {}", self.viz.current_index);
			PlaybackCommand::Stop
		}
	}

	/// One timer tick. Returns whether the timer should keep running.
	pub fn advance_playback(&mut self) -> bool {
		if !self.viz.is_playing {
			return false;
		}
		if self.viz.current_index + 1 < self.viz.schedule.len() {
			self.set_schedule_index(self.viz.current_index + 1);
			true
		} else {
			self.viz.is_playing = false;
			false
		}
	}

	pub fn schedule_len(&self) -> usize {
		self.viz.schedule.len()
	}

	pub fn schedule_index(&self) -> usize {
		self.viz.current_index
	}

	pub fn is_playing(&self) -> bool {
		self.viz.is_playing
	}

	pub fn selection_summary(&self) -> String {
		let selected = self.viz.selected_nodes();
		match selected.len() {
			0 => "No nodes selected".to_string(),
			1 => {
				let id = selected.iter().next().map(String::as_str).unwrap_or_default();
				let label = self.model.node(id).map_or(id, |n| n.label.as_str());
				let connected = self.model.connected_nodes(id).len();
				format!("Selected: {label} ({connected} connected)")
			}
			n => format!("{n} nodes selected"),
		}
	}
}
