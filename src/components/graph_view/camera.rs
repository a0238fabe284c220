use super::types::Rect;

pub const MIN_ZOOM: f64 = 0.1;
pub const MAX_ZOOM: f64 = 5.0;
const ZOOM_OUT_STEP: f64 = 0.9;
const ZOOM_IN_STEP: f64 = 1.1;

/// Screen-space translation plus uniform scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Camera {
	pub x: f64,
	pub y: f64,
	zoom: f64,
}

impl Default for Camera {
	fn default() -> Self {
		Self::new(0.0, 0.0, 1.0)
	}
}

impl Camera {
	pub fn new(x: f64, y: f64, zoom: f64) -> Self {
		Self {
			x,
			y,
			zoom: zoom.clamp(MIN_ZOOM, MAX_ZOOM),
		}
	}

	pub fn zoom(&self) -> f64 {
		self.zoom
	}

	pub fn world_to_screen(&self, wx: f64, wy: f64) -> (f64, f64) {
		(wx * self.zoom + self.x, wy * self.zoom + self.y)
	}

	pub fn screen_to_world(&self, sx: f64, sy: f64) -> (f64, f64) {
		((sx - self.x) / self.zoom, (sy - self.y) / self.zoom)
	}

	/// Screen-space delta, applied unscaled.
	pub fn pan_by(&mut self, dx: f64, dy: f64) {
		self.x += dx;
		self.y += dy;
	}

	/// One wheel notch at a screen point: positive `delta_y` zooms out.
	pub fn zoom_at(&mut self, sx: f64, sy: f64, delta_y: f64) {
		let factor = if delta_y > 0.0 {
			ZOOM_OUT_STEP
		} else {
			ZOOM_IN_STEP
		};
		self.zoom_by(sx, sy, factor);
	}

	/// Scales around a screen point, keeping the world point under it fixed.
	pub fn zoom_by(&mut self, sx: f64, sy: f64, factor: f64) {
		let (before_x, before_y) = self.screen_to_world(sx, sy);
		self.zoom = (self.zoom * factor).clamp(MIN_ZOOM, MAX_ZOOM);
		let (after_x, after_y) = self.screen_to_world(sx, sy);
		self.x += (after_x - before_x) * self.zoom;
		self.y += (after_y - before_y) * self.zoom;
	}

	/// World rectangle covered by a `width` x `height` screen.
	pub fn viewport_bounds(&self, width: f64, height: f64) -> Rect {
		let (left, top) = self.screen_to_world(0.0, 0.0);
		let (right, bottom) = self.screen_to_world(width, height);
		Rect::new(left, top, right, bottom)
	}

	/// Puts the centre of `rect` in the middle of the screen.
	pub fn center_on(&mut self, rect: &Rect, width: f64, height: f64) {
		let (cx, cy) = rect.center();
		let (sx, sy) = self.world_to_screen(cx, cy);
		self.pan_by(width / 2.0 - sx, height / 2.0 - sy);
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use proptest::prelude::*;

	fn close(a: f64, b: f64) -> bool {
		(a - b).abs() <= 1e-6 * (1.0 + a.abs().max(b.abs()))
	}

	#[test]
	fn transforms_are_inverse() {
		let camera = Camera::new(120.0, -40.0, 2.5);
		let (sx, sy) = camera.world_to_screen(10.0, 20.0);
		assert_eq!((sx, sy), (145.0, 10.0));
		assert_eq!(camera.screen_to_world(sx, sy), (10.0, 20.0));
	}

	#[test]
	fn zoom_is_clamped() {
		let mut camera = Camera::default();
		for _ in 0..100 {
			camera.zoom_at(0.0, 0.0, 1.0);
		}
		assert_eq!(camera.zoom(), MIN_ZOOM);
		for _ in 0..100 {
			camera.zoom_at(0.0, 0.0, -1.0);
		}
		assert_eq!(camera.zoom(), MAX_ZOOM);
		assert_eq!(Camera::new(0.0, 0.0, 42.0).zoom(), MAX_ZOOM);
	}

	#[test]
	fn pan_is_not_scaled_by_zoom() {
		let mut camera = Camera::new(0.0, 0.0, 3.0);
		camera.pan_by(10.0, -5.0);
		assert_eq!((camera.x, camera.y), (10.0, -5.0));
	}

	#[test]
	fn viewport_bounds_follow_offset_and_zoom() {
		let camera = Camera::new(-200.0, 100.0, 0.5);
		let rect = camera.viewport_bounds(800.0, 600.0);
		assert_eq!(rect, Rect::new(400.0, -200.0, 2000.0, 1000.0));
	}

	#[test]
	fn center_on_puts_rect_centre_mid_screen() {
		let mut camera = Camera::new(0.0, 0.0, 2.0);
		camera.center_on(&Rect::new(0.0, 0.0, 100.0, 50.0), 800.0, 600.0);
		assert_eq!(camera.world_to_screen(50.0, 25.0), (400.0, 300.0));
	}

	proptest! {
		#[test]
		fn zoom_keeps_cursor_anchored(
			(x, y) in (-5000.0f64..5000.0, -5000.0f64..5000.0),
			zoom in MIN_ZOOM..MAX_ZOOM,
			(sx, sy) in (0.0f64..1920.0, 0.0f64..1080.0),
			notches in proptest::collection::vec(any::<bool>(), 1..20),
		) {
			let mut camera = Camera::new(x, y, zoom);
			let (wx, wy) = camera.screen_to_world(sx, sy);
			for zoom_out in notches {
				camera.zoom_at(sx, sy, if zoom_out { 1.0 } else { -1.0 });
			}
			let (ax, ay) = camera.world_to_screen(wx, wy);
			prop_assert!(close(ax, sx), "{} vs {}", ax, sx);
			prop_assert!(close(ay, sy), "{} vs {}", ay, sy);
		}
	}
}
