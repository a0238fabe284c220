pub const NODE_HEIGHT: f64 = 40.0;
pub const NODE_MIN_WIDTH: f64 = 80.0;
const CHAR_WIDTH: f64 = 12.0;
const LABEL_PADDING: f64 = 20.0;

/// Axis-aligned rectangle in world or screen space.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rect {
	pub left: f64,
	pub top: f64,
	pub right: f64,
	pub bottom: f64,
}

impl Rect {
	pub fn new(left: f64, top: f64, right: f64, bottom: f64) -> Self {
		Self {
			left,
			top,
			right,
			bottom,
		}
	}

	pub fn center(&self) -> (f64, f64) {
		(
			(self.left + self.right) / 2.0,
			(self.top + self.bottom) / 2.0,
		)
	}

	/// Inclusive on every edge, so touching rectangles intersect.
	pub fn intersects(&self, other: &Rect) -> bool {
		!(self.right < other.left
			|| self.left > other.right
			|| self.bottom < other.top
			|| self.top > other.bottom)
	}

	pub fn contains(&self, x: f64, y: f64) -> bool {
		x >= self.left && x <= self.right && y >= self.top && y <= self.bottom
	}

	pub fn union(&self, other: &Rect) -> Rect {
		Rect {
			left: self.left.min(other.left),
			top: self.top.min(other.top),
			right: self.right.max(other.right),
			bottom: self.bottom.max(other.bottom),
		}
	}
}

/// A graph vertex. `x`/`y` is the centre of its box.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
	pub id: String,
	pub label: String,
	pub x: f64,
	pub y: f64,
	width: f64,
	height: f64,
	pub highlighted: bool,
	pub scheduled: bool,
	pub hovered: bool,
	pub selected: bool,
}

impl Node {
	pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
		let label = label.into();
		let width = (label.chars().count() as f64 * CHAR_WIDTH + LABEL_PADDING).max(NODE_MIN_WIDTH);
		Self {
			id: id.into(),
			label,
			x: 0.0,
			y: 0.0,
			width,
			height: NODE_HEIGHT,
			highlighted: false,
			scheduled: false,
			hovered: false,
			selected: false,
		}
	}

	pub fn width(&self) -> f64 {
		self.width
	}

	pub fn height(&self) -> f64 {
		self.height
	}

	pub fn bounds(&self) -> Rect {
		Rect {
			left: self.x - self.width / 2.0,
			top: self.y - self.height / 2.0,
			right: self.x + self.width / 2.0,
			bottom: self.y + self.height / 2.0,
		}
	}

	pub fn contains_point(&self, x: f64, y: f64) -> bool {
		self.bounds().contains(x, y)
	}
}

/// Directed edge referencing nodes by id. The ids may dangle.
#[derive(Clone, Debug, PartialEq)]
pub struct Edge {
	pub from_id: String,
	pub to_id: String,
	pub highlighted: bool,
	pub selected: bool,
}

impl Edge {
	pub fn new(from_id: impl Into<String>, to_id: impl Into<String>) -> Self {
		Self {
			from_id: from_id.into(),
			to_id: to_id.into(),
			highlighted: false,
			selected: false,
		}
	}
}
