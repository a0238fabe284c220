use std::cell::{Cell, RefCell};
use std::rc::Rc;

use leptos::prelude::*;
use log::{error, info, warn};
use wasm_bindgen::prelude::*;
use web_sys::{CanvasRenderingContext2d, HtmlCanvasElement, KeyboardEvent, MouseEvent, WheelEvent, Window};

use super::layout::LayoutConfig;
use super::loader::DataSource;
use super::render;
use super::state::{PlaybackCommand, ViewerState};

type Shared<T> = Rc<RefCell<Option<T>>>;

/// Reactive copies of the state the control bar displays.
#[derive(Clone, Copy)]
struct ControlSignals {
	schedule_len: RwSignal<usize>,
	schedule_index: RwSignal<usize>,
	playing: RwSignal<bool>,
	selection: RwSignal<String>,
}

impl ControlSignals {
	fn new() -> Self {
		Self {
			schedule_len: RwSignal::new(0),
			schedule_index: RwSignal::new(0),
			playing: RwSignal::new(false),
			selection: RwSignal::new("No nodes selected".to_string()),
		}
	}

	fn publish(&self, state: &ViewerState) {
		self.schedule_len.set(state.schedule_len());
		self.schedule_index.set(state.schedule_index());
		self.playing.set(state.is_playing());
		self.selection.set(state.selection_summary());
	}
}

/// Repeating `setInterval` driving schedule playback.
#[derive(Clone, Default)]
struct PlaybackTimer {
	handle: Rc<Cell<Option<i32>>>,
	tick: Shared<Closure<dyn FnMut()>>,
}

impl PlaybackTimer {
	fn start(&self, state: Rc<RefCell<ViewerState>>, controls: ControlSignals, interval_ms: i32) {
		self.stop();
		let Some(window) = web_sys::window() else {
			return;
		};
		// The tick only holds the handle, never its own slot.
		let handle = self.handle.clone();
		let tick = Closure::<dyn FnMut()>::new(move || {
			let keep_going = match state.try_borrow_mut() {
				Ok(mut s) => {
					let keep_going = s.advance_playback();
					controls.publish(&s);
					keep_going
				}
				Err(_) => true,
			};
			if !keep_going {
				clear_interval(&handle);
			}
		});
		match window.set_interval_with_callback_and_timeout_and_arguments_0(
			tick.as_ref().unchecked_ref(),
			interval_ms,
		) {
			Ok(id) => self.handle.set(Some(id)),
			Err(e) => error!("failed to start playback timer: {e:?}"),
		}
		*self.tick.borrow_mut() = Some(tick);
	}

	/// Clears the pending interval; the tick closure stays alive until the next start.
	fn stop(&self) {
		clear_interval(&self.handle);
	}

	fn dispose(&self) {
		self.stop();
		let _ = self.tick.borrow_mut().take();
	}
}

fn clear_interval(handle: &Cell<Option<i32>>) {
	if let (Some(id), Some(window)) = (handle.take(), web_sys::window()) {
		window.clear_interval_with_handle(id);
	}
}

/// Window listeners and the frame loop of one mounted viewer.
#[derive(Clone, Default)]
struct WindowHooks {
	animate: Shared<Closure<dyn FnMut()>>,
	frame: Rc<Cell<Option<i32>>>,
	resize: Shared<Closure<dyn FnMut()>>,
	keydown: Shared<Closure<dyn FnMut(KeyboardEvent)>>,
}

impl WindowHooks {
	fn request_frame(&self, window: &Window) {
		if let Some(cb) = self.animate.borrow().as_ref() {
			if let Ok(id) = window.request_animation_frame(cb.as_ref().unchecked_ref()) {
				self.frame.set(Some(id));
			}
		}
	}

	/// Cancels the pending frame and detaches the listeners.
	fn release(&self) {
		let Some(window) = web_sys::window() else {
			return;
		};
		if let Some(id) = self.frame.take() {
			let _ = window.cancel_animation_frame(id);
		}
		let _ = self.animate.borrow_mut().take();
		if let Some(cb) = self.resize.borrow_mut().take() {
			let _ = window.remove_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}
		if let Some(cb) = self.keydown.borrow_mut().take() {
			let _ = window.remove_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}
	}
}

fn canvas_size(window: &Window, controls_height: f64) -> (f64, f64) {
	let read = |v: Result<JsValue, JsValue>, fallback: f64| v.ok().and_then(|v| v.as_f64()).unwrap_or(fallback);
	(
		read(window.inner_width(), 800.0),
		(read(window.inner_height(), 660.0) - controls_height).max(0.0),
	)
}

fn local_position(canvas_ref: NodeRef<leptos::html::Canvas>, ev: &MouseEvent) -> Option<(f64, f64)> {
	let canvas: HtmlCanvasElement = canvas_ref.get()?.into();
	let rect = canvas.get_bounding_client_rect();
	Some((
		ev.client_x() as f64 - rect.left(),
		ev.client_y() as f64 - rect.top(),
	))
}

#[component]
pub fn GraphViewerCanvas(
	#[prop(default = DataSource::default())] source: DataSource,
	#[prop(default = LayoutConfig::default())] layout: LayoutConfig,
	#[prop(default = 1000)] playback_interval_ms: i32,
	#[prop(default = 60.0)] controls_height: f64,
) -> impl IntoView {
	let canvas_ref = NodeRef::<leptos::html::Canvas>::new();
	let state = Rc::new(RefCell::new(ViewerState::new(layout, 0.0, 0.0)));
	let controls = ControlSignals::new();
	let timer = PlaybackTimer::default();
	let hooks = WindowHooks::default();
	let state_init = state.clone();

	// Cleanup must be Send, so the Rc handles live in local arena storage.
	let owned = StoredValue::new_local((timer.clone(), hooks.clone()));
	on_cleanup(move || {
		owned.try_with_value(|(timer, hooks)| {
			timer.dispose();
			hooks.release();
		});
	});

	Effect::new(move |_| {
		let Some(canvas) = canvas_ref.get() else {
			return;
		};
		let canvas: HtmlCanvasElement = canvas.into();
		let Some(window) = web_sys::window() else {
			return;
		};

		let (w, h) = canvas_size(&window, controls_height);
		canvas.set_width(w as u32);
		canvas.set_height(h as u32);
		if let Ok(mut s) = state_init.try_borrow_mut() {
			s.resize(w, h);
		}

		let Some(ctx) = canvas
			.get_context("2d")
			.ok()
			.flatten()
			.and_then(|c| c.dyn_into::<CanvasRenderingContext2d>().ok())
		else {
			error!("canvas has no 2d context");
			return;
		};

		let (state_resize, canvas_resize) = (state_init.clone(), canvas.clone());
		*hooks.resize.borrow_mut() = Some(Closure::new(move || {
			let Some(win) = web_sys::window() else {
				return;
			};
			let (nw, nh) = canvas_size(&win, controls_height);
			canvas_resize.set_width(nw as u32);
			canvas_resize.set_height(nh as u32);
			if let Ok(mut s) = state_resize.try_borrow_mut() {
				s.resize(nw, nh);
			}
		}));
		if let Some(ref cb) = *hooks.resize.borrow() {
			let _ = window.add_event_listener_with_callback("resize", cb.as_ref().unchecked_ref());
		}

		let state_key = state_init.clone();
		*hooks.keydown.borrow_mut() = Some(Closure::new(move |ev: KeyboardEvent| {
			if let Ok(mut s) = state_key.try_borrow_mut() {
				s.key_down(&ev.key());
				controls.publish(&s);
			}
		}));
		if let Some(ref cb) = *hooks.keydown.borrow() {
			let _ = window.add_event_listener_with_callback("keydown", cb.as_ref().unchecked_ref());
		}

		let (state_anim, hooks_anim) = (state_init.clone(), hooks.clone());
		*hooks.animate.borrow_mut() = Some(Closure::new(move || {
			// A frame that finds the state busy is skipped, not fatal.
			if let Ok(s) = state_anim.try_borrow() {
				render::render(&s, &ctx);
			}
			if let Some(win) = web_sys::window() {
				hooks_anim.request_frame(&win);
			}
		}));
		hooks.request_frame(&window);

		let (state_load, source) = (state_init.clone(), source.clone());
		wasm_bindgen_futures::spawn_local(async move {
			match source.load().await {
				Ok(data) => match state_load.try_borrow_mut() {
					Ok(mut s) => {
						s.load(&data.graph_text, data.schedule);
						controls.publish(&s);
					}
					Err(_) => warn!("viewer busy, dropping loaded data"),
				},
				Err(e) => error!("Error loading data: {e}"),
			}
		});
		info!("graph viewer mounted at {w}x{h}");
	});

	let state_md = state.clone();
	let on_mousedown = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Ok(mut s) = state_md.try_borrow_mut() {
			s.pointer_down(x, y);
		}
	};

	let state_mm = state.clone();
	let on_mousemove = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Ok(mut s) = state_mm.try_borrow_mut() {
			s.pointer_move(x, y);
		}
	};

	let state_mu = state.clone();
	let on_mouseup = move |ev: MouseEvent| {
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Ok(mut s) = state_mu.try_borrow_mut() {
			s.pointer_up(x, y, ev.ctrl_key() || ev.meta_key());
			controls.publish(&s);
		}
	};

	let state_ml = state.clone();
	let on_mouseleave = move |_: MouseEvent| {
		if let Ok(mut s) = state_ml.try_borrow_mut() {
			s.pointer_leave();
		}
	};

	let state_wh = state.clone();
	let on_wheel = move |ev: WheelEvent| {
		ev.prevent_default();
		let Some((x, y)) = local_position(canvas_ref, &ev) else {
			return;
		};
		if let Ok(mut s) = state_wh.try_borrow_mut() {
			s.wheel(x, y, ev.delta_y());
		}
	};

	let state_slider = state.clone();
	let on_slider = move |ev: web_sys::Event| {
		let Ok(index) = event_target_value(&ev).parse::<usize>() else {
			return;
		};
		if let Ok(mut s) = state_slider.try_borrow_mut() {
			s.set_schedule_index(index);
			controls.publish(&s);
		}
	};

	let (state_play, timer_play) = (state.clone(), timer.clone());
	let on_play = move |_: MouseEvent| {
		let command = match state_play.try_borrow_mut() {
			Ok(mut s) => {
				let command = s.toggle_playback();
				controls.publish(&s);
				command
			}
			Err(_) => return,
		};
		match command {
			PlaybackCommand::Start => {
				timer_play.start(state_play.clone(), controls, playback_interval_ms)
			}
			PlaybackCommand::Stop => timer_play.stop(),
		}
	};

	let state_search = state.clone();
	let on_search = move |ev: web_sys::Event| {
		let term = event_target_value(&ev);
		if let Ok(mut s) = state_search.try_borrow_mut() {
			s.set_search_term(&term);
			controls.publish(&s);
		}
	};

	view! {
		<div class="graph-viewer">
			<div class="graph-controls" style=format!("height: {controls_height}px;")>
				<button id="play-pause-btn" on:click=on_play>
					{move || if controls.playing.get() { "Pause" } else { "Play" }}
				</button>
				<input
					id="schedule-slider"
					type="range"
					min="0"
					max=move || controls.schedule_len.get().saturating_sub(1).to_string()
					prop:value=move || controls.schedule_index.get().to_string()
					on:input=on_slider
				/>
				<span class="schedule-step">
					{move || {
						let len = controls.schedule_len.get();
						if len == 0 {
							"No schedule".to_string()
						} else {
							format!("Step {} / {}", controls.schedule_index.get() + 1, len)
						}
					}}
				</span>
				<input id="search-input" type="text" placeholder="Search nodes..." on:input=on_search />
				<span id="selection-info">{move || controls.selection.get()}</span>
			</div>
			<canvas
				node_ref=canvas_ref
				class="graph-viewer-canvas"
				on:mousedown=on_mousedown
				on:mousemove=on_mousemove
				on:mouseup=on_mouseup
				on:mouseleave=on_mouseleave
				on:wheel=on_wheel
				style="display: block; cursor: grab;"
			/>
		</div>
	}
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
	use super::*;
	use crate::components::graph_view::sample;
	use wasm_bindgen_test::*;

	wasm_bindgen_test_configure!(run_in_browser);

	#[wasm_bindgen_test]
	fn disposed_timer_releases_its_tick() {
		let (text, schedule) = sample::hourglass_network();
		let mut viewer = ViewerState::new(LayoutConfig::default(), 800.0, 600.0);
		viewer.load(&text, schedule);
		let state = Rc::new(RefCell::new(viewer));

		let timer = PlaybackTimer::default();
		timer.start(state, ControlSignals::new(), 1000);
		assert!(timer.handle.get().is_some());
		// Only the timer itself refers to the tick slot.
		assert_eq!(Rc::strong_count(&timer.tick), 1);

		timer.dispose();
		assert!(timer.handle.get().is_none());
		assert!(timer.tick.borrow().is_none());
	}

	#[wasm_bindgen_test]
	fn released_hooks_drop_the_frame_loop() {
		let hooks = WindowHooks::default();
		let inner = hooks.clone();
		*hooks.animate.borrow_mut() = Some(Closure::new(move || {
			if let Some(win) = web_sys::window() {
				inner.request_frame(&win);
			}
		}));
		*hooks.keydown.borrow_mut() = Some(Closure::new(|_: KeyboardEvent| {}));
		let window = web_sys::window().unwrap();
		hooks.request_frame(&window);
		assert!(hooks.frame.get().is_some());
		assert_eq!(Rc::strong_count(&hooks.animate), 2);

		hooks.release();
		assert!(hooks.frame.get().is_none());
		assert!(hooks.keydown.borrow().is_none());
		assert_eq!(Rc::strong_count(&hooks.animate), 1);
	}
}
